// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # dotsizer
//!
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/dotsizer/blob/main/LICENSE-APACHE)
//!
//! Static size analysis for .NET modules. `dotsizer` estimates how many bytes of a compiled
//! module's on-disk footprint each of its structural elements accounts for (types, methods,
//! fields, properties, events and embedded resources) without executing anything, and
//! presents the result as a size-annotated tree that adds up exactly to the file size.
//!
//! ## Features
//!
//! - **📐 Heuristic costing** - Configurable per-kind overhead constants plus content-dependent
//!   terms (names, instruction streams, parameters, static data)
//! - **🌳 Exact reconciliation** - Every tree sums to the real file length through an explicit
//!   `Other Overhead` residual
//! - **🧩 Pluggable metadata** - Works with any reader that implements the provider traits
//! - **📄 JSON snapshots** - A ready-made provider for metadata dumped by external tools
//! - **⚡ Batch analysis** - Independent modules are analyzed in parallel
//!
//! ## Quick Start
//!
//! ### Using the Prelude
//!
//! ```rust,no_run
//! use dotsizer::prelude::*;
//!
//! let module = ModuleSnapshot::from_path("tests/samples/hello.json")?;
//! let report = Sizer::new().analyze_file(&module, "bin/Hello.dll")?;
//!
//! for node in report.tree().root().children() {
//!     println!("{:>10}  {}", node.cost(), node.label());
//! }
//! # Ok::<(), dotsizer::Error>(())
//! ```
//!
//! ### Decluttering
//!
//! ```rust,no_run
//! use dotsizer::{prelude::*, sizer::cost::CostModel};
//!
//! let module = ModuleSnapshot::from_path("tests/samples/hello.json")?;
//! let sizer = Sizer::new()
//!     .with_cost_model(CostModel::from_path("calibrated.json")?)
//!     .with_filter(1024);
//!
//! let report = sizer.analyze(&module, 64 * 1024)?;
//! println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
//! # Ok::<(), dotsizer::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - The provider contract, value and resource types, JSON snapshots
//! - [`sizer`] - Cost model, metadata walk, size tree and the [`Sizer`] entry point
//! - [`file`] - File length and content comparison
//! - [`Error`] and [`Result`] - Error handling
//!
//! ### The Size Tree
//!
//! The root of a tree is the module. Below it, every type contributes one path node per
//! namespace segment and nesting level (`Contoso.Data.Reader+Cursor` becomes four nodes), and
//! the type's members hang below its own node. Module-level methods and fields hang directly
//! below the root, resources below a `Resources` node. Each level is
//! sorted by descending size.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result):
//!
//! ```rust,no_run
//! use dotsizer::{metadata::snapshot::ModuleSnapshot, Error, Sizer};
//!
//! let module = ModuleSnapshot::from_path("tests/samples/hello.json")?;
//! match Sizer::new().analyze(&module, 128) {
//!     Ok(report) => println!("{} nodes", report.tree().len()),
//!     Err(Error::NegativeResidual { estimated, .. }) => println!("overestimated: {estimated}"),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! # Ok::<(), dotsizer::Error>(())
//! ```
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! cargo +nightly fuzz run snapshot --release
//! ```
#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust
/// use dotsizer::prelude::*;
///
/// let module = ModuleSnapshot::from_json(r#"{ "name": "Empty" }"#)?;
/// let report = Sizer::new().analyze(&module, 0)?;
/// assert_eq!(report.tree().total(), 0);
/// # Ok::<(), dotsizer::Error>(())
/// ```
pub mod prelude;

/// File length and byte comparison of module files.
pub mod file;

/// The metadata provider contract and the data it exchanges.
///
/// See [`metadata::provider::ModuleMetadata`] for the entry point a metadata reader implements
/// and [`metadata::snapshot::ModuleSnapshot`] for the bundled JSON provider.
pub mod metadata;

/// Cost model, metadata walk and size tree aggregation.
pub mod sizer;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `dotsizer` Error type
///
/// The main error type for all operations in this crate. Provides detailed error information
/// for cost model validation, snapshot loading and tree consistency checks.
pub use error::Error;

/// Main entry point for size analysis.
///
/// See [`sizer::Sizer`] for configuration and batch analysis.
pub use sizer::{SizeReport, Sizer};
