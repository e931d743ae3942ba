use std::path::Path;

use anyhow::{anyhow, Context};
use dotsizer::{
    file::{file_length, is_substituted},
    metadata::snapshot::ModuleSnapshot,
    sizer::cost::CostModel,
    Sizer,
};
use log::{debug, warn};

/// Load a metadata snapshot.
pub fn load_snapshot(path: &Path) -> anyhow::Result<ModuleSnapshot> {
    ModuleSnapshot::from_path(path)
        .with_context(|| format!("failed to load snapshot: {}", path.display()))
}

/// Build a sizer from an optional cost model file.
pub fn build_sizer(cost_model: Option<&Path>) -> anyhow::Result<Sizer> {
    let sizer = Sizer::new();
    match cost_model {
        Some(path) => {
            let model = CostModel::from_path(path)
                .with_context(|| format!("failed to load cost model: {}", path.display()))?;
            Ok(sizer.with_cost_model(model))
        }
        None => Ok(sizer),
    }
}

/// Determine the length the tree is reconciled against: the `assembly` file if given,
/// otherwise the size recorded in the snapshot.
///
/// Warns when the snapshot was taken from a different file than `assembly` with different
/// contents, i.e. the loader substituted the requested module.
pub fn total_length(snapshot: &ModuleSnapshot, assembly: Option<&Path>) -> anyhow::Result<u64> {
    let Some(assembly) = assembly else {
        return snapshot.file_size.ok_or_else(|| {
            anyhow!(
                "snapshot of '{}' records no file size, pass --assembly",
                snapshot.name
            )
        });
    };

    if let Some(location) = &snapshot.location {
        match is_substituted(assembly, location) {
            Ok(true) => warn!(
                "'{}' was requested but '{}' was loaded, sizes refer to the requested file",
                assembly.display(),
                location.display()
            ),
            Ok(false) => {}
            Err(error) => debug!(
                "could not compare '{}' with '{}': {}",
                assembly.display(),
                location.display(),
                error
            ),
        }
    }

    file_length(assembly).with_context(|| format!("failed to read length: {}", assembly.display()))
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}
