//! Metadata contract between a module reader and the sizer.
//!
//! The sizer never parses PE files or ECMA-335 tables itself. Instead it consumes any type that
//! implements the traits in [`provider`], describing the module's types, members and resources.
//! This module also hosts the plain data types those traits exchange and a ready-made provider
//! backed by JSON snapshots.
//!
//! # Key Components
//!
//! - [`provider`] - [`provider::ModuleMetadata`] and the per-element traits
//! - [`value`] - Declared field layouts ([`value::ValueShape`]) and stored values
//! - [`resources`] - Manifest resources and native resource directory entries
//! - [`snapshot`] - [`snapshot::ModuleSnapshot`], a serde-backed provider
//!
//! # Examples
//!
//! ```rust
//! use dotsizer::metadata::{provider::ModuleMetadata, snapshot::ModuleSnapshot};
//!
//! let module = ModuleSnapshot::from_json(r#"{ "name": "Empty", "unresolved_types": 2 }"#)?;
//! assert_eq!(module.name(), "Empty");
//! assert_eq!(module.unresolved_type_count(), 2);
//! # Ok::<(), dotsizer::Error>(())
//! ```

pub mod provider;
pub mod resources;
pub mod snapshot;
pub mod value;
