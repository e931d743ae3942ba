//! File system access needed by the size analysis.
//!
//! The sizer never parses a module itself; the only facts it needs from disk are the total
//! length of the module being analyzed and, when the loader had to substitute the requested
//! file with another one (for example a same-named assembly from a global cache), whether the
//! two files are byte-identical.
//!
//! # Key Components
//!
//! - [`file_length`] - Total on-disk length of a module
//! - [`contents_match`] - Byte-for-byte comparison of two files
//! - [`is_substituted`] - Detects a load-time substitution
//! - [`physical::Physical`] - Memory-mapped read-only file used for comparisons
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotsizer::file::{file_length, is_substituted};
//! use std::path::Path;
//!
//! let requested = Path::new("bin/MyApp.dll");
//! let loaded = Path::new("/usr/lib/mono/gac/MyApp.dll");
//!
//! if is_substituted(requested, loaded)? {
//!     println!("loader picked a different file than requested");
//! }
//! println!("{} bytes", file_length(requested)?);
//! # Ok::<(), dotsizer::Error>(())
//! ```

pub mod physical;

use std::{fs, path::Path};

use log::debug;

use crate::Result;
use physical::Physical;

/// Returns the on-disk length of the file at `path` in bytes.
///
/// # Errors
/// Returns [`crate::Error::FileError`] if the file metadata cannot be read.
pub fn file_length(path: impl AsRef<Path>) -> Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Compares two files byte for byte.
///
/// Files of different length never match; otherwise both are memory-mapped and compared.
/// A missing file is reported as an error rather than a mismatch.
///
/// # Errors
/// Returns [`crate::Error::FileError`] if either file cannot be opened, or
/// [`crate::Error::Error`] if mapping fails.
pub fn contents_match(first: impl AsRef<Path>, second: impl AsRef<Path>) -> Result<bool> {
    let (first, second) = (first.as_ref(), second.as_ref());
    if file_length(first)? != file_length(second)? {
        return Ok(false);
    }

    let first = Physical::new(first)?;
    let second = Physical::new(second)?;
    Ok(first.data() == second.data())
}

/// Returns true if the module the loader actually loaded differs from the requested one.
///
/// Identical paths are never a substitution. Different paths count as a substitution only
/// when the file contents differ, so a byte-identical copy in another location is accepted.
///
/// # Errors
/// Propagates errors from [`contents_match`].
pub fn is_substituted(requested: impl AsRef<Path>, loaded: impl AsRef<Path>) -> Result<bool> {
    let (requested, loaded) = (requested.as_ref(), loaded.as_ref());
    if requested == loaded {
        return Ok(false);
    }

    let substituted = !contents_match(requested, loaded)?;
    debug!(
        "Compared {} against loaded {}: substituted={substituted}",
        requested.display(),
        loaded.display()
    );
    Ok(substituted)
}
