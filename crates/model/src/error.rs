use std::fmt;

use yices_native::ErrorReport;

/// Errors from model queries and value decoding.
#[derive(Debug, Clone)]
pub enum YicesError {
    /// A native call returned its failure sentinel.
    NativeCallFailed {
        /// Name of the native function, e.g. `yices_val_expand_tuple`.
        operation: &'static str,
        /// Error report captured right after the failure.
        report: ErrorReport,
    },
    /// Decoding reached a value kind this binding does not materialize.
    NotImplemented(&'static str),
    /// The native library produced something outside the known protocol.
    InternalError(String),
    /// The value tree nests deeper than the configured limit.
    RecursionLimit(usize),
}

impl YicesError {
    /// Name of the native operation that failed, if this is a native failure.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            YicesError::NativeCallFailed { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            YicesError::NativeCallFailed { report, .. } => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for YicesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YicesError::NativeCallFailed { operation, report } => {
                if report.message.is_empty() {
                    write!(f, "{operation} failed (error code {})", report.code)
                } else {
                    write!(
                        f,
                        "{operation} failed: {} (error code {})",
                        report.message, report.code
                    )
                }
            }
            YicesError::NotImplemented(what) => write!(f, "Not implemented: {what}"),
            YicesError::InternalError(msg) => write!(f, "Internal error: {msg}"),
            YicesError::RecursionLimit(limit) => {
                write!(f, "Model value nests deeper than {limit} levels")
            }
        }
    }
}

impl std::error::Error for YicesError {}

impl PartialEq for YicesError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                YicesError::NativeCallFailed {
                    operation: a,
                    report: ra,
                },
                YicesError::NativeCallFailed {
                    operation: b,
                    report: rb,
                },
            ) => a == b && ra.code == rb.code,
            (YicesError::NotImplemented(a), YicesError::NotImplemented(b)) => a == b,
            (YicesError::InternalError(a), YicesError::InternalError(b)) => a == b,
            (YicesError::RecursionLimit(a), YicesError::RecursionLimit(b)) => a == b,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, YicesError>;
