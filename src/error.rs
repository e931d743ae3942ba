use thiserror::Error;

macro_rules! inconsistency_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Inconsistency {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Inconsistency {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into three groups, which callers are expected to treat differently:
///
/// ## Degradation Errors
/// - [`Error::Unavailable`] - A metadata accessor could not produce its data
/// - [`Error::NotSupported`] - An optional provider capability is absent
///
/// The walker recovers from these locally by treating the missing term as zero. They only
/// reach a caller when a provider is queried directly.
///
/// ## Internal Consistency Errors
/// - [`Error::Inconsistency`] - Negative cost, broken sum invariant, broken ordering
/// - [`Error::NegativeResidual`] - The estimated total exceeds the real file size
///
/// These indicate that the cost model double counted or overestimated and abort the analysis
/// of the affected module.
///
/// ## Collaborator Errors
/// - [`Error::FileError`] - File length or comparison failed
/// - [`Error::Snapshot`] - A metadata snapshot or cost model could not be deserialized
/// - [`Error::Config`] - A cost model failed validation
/// - [`Error::Error`] - Miscellaneous failures
///
/// # Examples
///
/// ```rust,no_run
/// use dotsizer::{metadata::snapshot::ModuleSnapshot, Error, Sizer};
///
/// let module = ModuleSnapshot::from_path("tests/samples/hello.json")?;
/// match Sizer::new().analyze(&module, 512) {
///     Ok(report) => println!("{} bytes attributed", report.tree().root().cost()),
///     Err(Error::NegativeResidual { total, estimated }) => {
///         eprintln!("cost model estimated {estimated} bytes for a {total} byte file");
///     }
///     Err(e) => eprintln!("analysis failed: {e}"),
/// }
/// # Ok::<(), dotsizer::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An internal invariant of the size tree or the cost model was violated.
    ///
    /// Carries the source location where the violation was detected.
    #[error("Inconsistency - {file}:{line}: {message}")]
    Inconsistency {
        /// Description of the violated invariant
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The costed elements add up to more than the module's file size.
    #[error("Estimated {estimated} bytes exceed the file size of {total} bytes")]
    NegativeResidual {
        /// The real on-disk length of the module
        total: u64,
        /// The aggregated cost of all walked elements
        estimated: u64,
    },

    /// A metadata accessor could not produce the requested data.
    ///
    /// The associated value names the accessor, e.g. `"interfaces"` or `"method body"`.
    #[error("Metadata not available - {0}")]
    Unavailable(&'static str),

    /// The metadata provider does not implement an optional capability.
    #[error("This capability is not supported by the metadata provider")]
    NotSupported,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// A JSON document (metadata snapshot or cost model) could not be deserialized.
    #[error("{0}")]
    Snapshot(#[from] serde_json::Error),

    /// A cost model failed validation.
    #[error("Invalid cost model - {0}")]
    Config(String),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}
