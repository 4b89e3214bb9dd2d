//! Translation of native failure sentinels into [`YicesError`].
//!
//! Every native call made by this crate passes its raw result through one of
//! these helpers. On failure the current error report is captured into the
//! returned error and the native error state is cleared, so the next call
//! starts from "no error". A failure that left no report behind (a rejected
//! slice length, say) becomes [`YicesError::InternalError`].

use yices_native::{ErrorCode, STATUS_ERROR, Term, YicesApi};

use crate::error::{Result, YicesError};

/// Capture the native error report for `operation` and clear it.
pub(crate) fn native_failure<A: YicesApi + ?Sized>(api: &A, operation: &'static str) -> YicesError {
    let report = api.error_report();
    if report.code == ErrorCode::NO_ERROR {
        tracing::warn!(operation, "native call failed without an error report");
        return YicesError::InternalError(format!(
            "{operation} failed without reporting an error"
        ));
    }
    api.clear_error();
    tracing::debug!(
        operation,
        code = report.code.0,
        message = %report.message,
        "native call failed"
    );
    YicesError::NativeCallFailed { operation, report }
}

/// Check a `0` / `-1` status code.
pub(crate) fn check_status<A: YicesApi + ?Sized>(
    api: &A,
    status: i32,
    operation: &'static str,
) -> Result<()> {
    if status == STATUS_ERROR {
        return Err(native_failure(api, operation));
    }
    Ok(())
}

/// Check a `1` / `0` / `-1` truth value.
pub(crate) fn check_truth<A: YicesApi + ?Sized>(
    api: &A,
    status: i32,
    operation: &'static str,
) -> Result<bool> {
    match status {
        STATUS_ERROR => Err(native_failure(api, operation)),
        0 => Ok(false),
        _ => Ok(true),
    }
}

/// Check a term result against `NULL_TERM`.
pub(crate) fn check_term<A: YicesApi + ?Sized>(api: &A, term: Term, operation: &'static str) -> Result<Term> {
    if term.is_null() {
        return Err(native_failure(api, operation));
    }
    Ok(term)
}

/// Check a handle result against null.
pub(crate) fn check_handle<A: YicesApi + ?Sized, H>(
    api: &A,
    handle: Option<H>,
    operation: &'static str,
) -> Result<H> {
    handle.ok_or_else(|| native_failure(api, operation))
}
