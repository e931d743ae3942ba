//! Size estimation of .NET modules.
//!
//! This module ties the pieces together: the [`walker::MetadataWalker`] prices the elements of
//! a module with a [`cost::CostModel`], the [`tree::SizeTreeBuilder`] aggregates them, and the
//! finished [`tree::SizeTree`] is reconciled against the real file length. [`Sizer`] runs the
//! whole pipeline and returns a [`SizeReport`].
//!
//! # Key Components
//!
//! - [`Sizer`] - Configurable entry point for single and batch analysis
//! - [`SizeReport`] - The finished tree plus analysis statistics
//! - [`cost`] - Per-kind overhead constants
//! - [`content`] - Data size of static field values
//! - [`walker`] - Metadata walk and element pricing
//! - [`tree`] - The aggregating size tree
//!
//! # Examples
//!
//! ```rust
//! use dotsizer::{metadata::snapshot::ModuleSnapshot, Sizer};
//!
//! let module = ModuleSnapshot::from_json(r#"{
//!     "name": "Hello",
//!     "types": [{ "name": "Hello.Program", "methods": [{ "name": "Main" }] }]
//! }"#)?;
//!
//! let report = Sizer::new().analyze(&module, 4096)?;
//! assert_eq!(report.tree().root().cost(), 4096);
//! assert_eq!(report.unresolved_types(), 0);
//! # Ok::<(), dotsizer::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! A [`Sizer`] holds only its configuration and can be shared between threads.
//! [`Sizer::analyze_batch`] analyzes independent modules in parallel, each into its own tree.

pub mod content;
pub mod cost;
pub mod tree;
pub mod walker;

use std::path::Path;

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    file::file_length,
    metadata::provider::ModuleMetadata,
    sizer::{
        cost::CostModel,
        tree::{SizeTree, SizeTreeBuilder},
        walker::MetadataWalker,
    },
    Result,
};

/// Runs size analyses with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Sizer {
    model: CostModel,
    threshold: Option<u64>,
}

impl Sizer {
    /// Creates a sizer with the default cost model and no filtering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cost model.
    #[must_use]
    pub fn with_cost_model(mut self, model: CostModel) -> Self {
        self.model = model;
        self
    }

    /// Prunes every node cheaper than `threshold` bytes from finished trees.
    #[must_use]
    pub fn with_filter(mut self, threshold: u64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Returns the cost model in use.
    #[must_use]
    pub fn cost_model(&self) -> &CostModel {
        &self.model
    }

    /// Analyzes `module`, whose file is `total_len` bytes long.
    ///
    /// # Errors
    /// Returns [`crate::Error::Inconsistency`] if the cost model produces a negative element
    /// cost, or [`crate::Error::NegativeResidual`] if the estimate exceeds `total_len`.
    pub fn analyze<M: ModuleMetadata>(&self, module: &M, total_len: u64) -> Result<SizeReport> {
        let mut builder = SizeTreeBuilder::new(module.name());
        MetadataWalker::new(&self.model).walk(module, &mut builder)?;

        let estimated = builder.cost();
        let mut tree = builder.finalize(total_len)?;
        if let Some(threshold) = self.threshold {
            tree.filter(threshold);
        }

        let unresolved_types = module.unresolved_type_count();
        if unresolved_types != 0 {
            warn!(
                "{} types of '{}' could not be evaluated, their size is included in 'Other Overhead'",
                unresolved_types,
                module.name()
            );
        }
        info!(
            "Sized '{}': {} of {} bytes attributed, {} nodes",
            module.name(),
            estimated,
            total_len,
            tree.len()
        );

        Ok(SizeReport {
            name: module.name().to_string(),
            total_size: total_len,
            estimated_size: estimated,
            unresolved_types,
            tree,
        })
    }

    /// Analyzes `module` against the length of the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file length cannot be read, otherwise see
    /// [`Sizer::analyze`].
    pub fn analyze_file<M: ModuleMetadata>(
        &self,
        module: &M,
        path: impl AsRef<Path>,
    ) -> Result<SizeReport> {
        let total_len = file_length(path)?;
        self.analyze(module, total_len)
    }

    /// Analyzes several modules in parallel, one result per input in input order.
    pub fn analyze_batch<M>(&self, modules: &[(M, u64)]) -> Vec<Result<SizeReport>>
    where
        M: ModuleMetadata + Sync,
    {
        modules
            .par_iter()
            .map(|(module, total_len)| self.analyze(module, *total_len))
            .collect()
    }
}

/// Result of one size analysis.
#[derive(Debug, Clone, Serialize)]
pub struct SizeReport {
    name: String,
    total_size: u64,
    estimated_size: u64,
    unresolved_types: usize,
    tree: SizeTree,
}

impl SizeReport {
    /// Name of the analyzed module.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reconciled size tree.
    #[must_use]
    pub fn tree(&self) -> &SizeTree {
        &self.tree
    }

    /// Length of the module file in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes attributed to costed elements, before reconciliation.
    #[must_use]
    pub fn estimated_size(&self) -> u64 {
        self.estimated_size
    }

    /// Bytes that no element accounts for.
    #[must_use]
    pub fn overhead_size(&self) -> u64 {
        self.total_size - self.estimated_size
    }

    /// Number of types that could not be resolved, 0 if the analysis was complete.
    #[must_use]
    pub fn unresolved_types(&self) -> usize {
        self.unresolved_types
    }
}
