//! Library-wide state and error reporting.

use yices_native::{ErrorCode, ErrorReport, Term, Type, YicesApi};

use crate::boundary::{check_status, check_term};
use crate::error::Result;
use crate::model::Model;

/// Handle to the native library's global state.
///
/// The library keeps one error report per process. Failures surfaced as
/// [`crate::YicesError`] have already been captured and cleared, so these
/// accessors mostly matter for diagnosing calls made outside this crate.
pub struct Yices<'a, A: YicesApi> {
    api: &'a A,
}

impl<'a, A: YicesApi> Yices<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub fn init(&self) {
        tracing::debug!("initializing library");
        self.api.init();
    }

    pub fn exit(&self) {
        tracing::debug!("shutting down library");
        self.api.exit();
    }

    /// Delete every term, type, context and model and clear the error state.
    pub fn reset(&self) {
        tracing::debug!("resetting library");
        self.api.reset();
    }

    pub fn is_inited(&self) -> bool {
        self.api.is_inited()
    }

    pub fn error_code(&self) -> ErrorCode {
        self.api.error_code()
    }

    pub fn error_string(&self) -> String {
        self.api.error_string()
    }

    pub fn error_report(&self) -> ErrorReport {
        self.api.error_report()
    }

    pub fn clear_error(&self) {
        self.api.clear_error();
    }

    /// Print the current error on file descriptor `fd`.
    pub fn print_error(&self, fd: i32) -> Result<()> {
        check_status(self.api, self.api.print_error_fd(fd), "yices_print_error_fd")
    }

    /// The constant of index `index` in the scalar or uninterpreted type `tau`.
    pub fn constant(&self, tau: Type, index: i32) -> Result<Term> {
        check_term(self.api, self.api.constant(tau, index), "yices_constant")
    }

    /// Shorthand for [`Model::from_context`].
    pub fn model(&self, ctx: A::Context, keep_subst: bool) -> Result<Model<'a, A>> {
        Model::from_context(self.api, ctx, keep_subst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yices_native::MockYices;

    #[test]
    fn init_and_exit() {
        let api = MockYices::new();
        let yices = Yices::new(&api);
        yices.exit();
        assert!(!yices.is_inited());
        yices.init();
        assert!(yices.is_inited());
    }

    #[test]
    fn no_error_after_reset() {
        let api = MockYices::new();
        let yices = Yices::new(&api);
        yices.reset();
        assert_eq!(yices.error_code(), ErrorCode::NO_ERROR);
        assert_eq!(yices.error_report().code, ErrorCode::NO_ERROR);
        assert_eq!(yices.error_string(), "no error");
        assert!(yices.print_error(1).is_ok());
    }

    #[test]
    fn failed_constant_leaves_no_error() {
        let api = MockYices::new();
        let yices = Yices::new(&api);
        let bool_t = api.bool_type();
        assert!(api.type_is_bool(bool_t));

        let err = yices.constant(bool_t, 0).unwrap_err();
        assert!(err.to_string().contains("invalid type in constant creation"));

        let report = yices.error_report();
        assert_eq!(yices.error_code(), ErrorCode::NO_ERROR);
        assert_eq!(yices.error_code(), report.code);
        assert_eq!(yices.error_string(), "no error");
        yices.clear_error();
        assert_eq!(yices.error_code(), ErrorCode::NO_ERROR);
    }

    #[test]
    fn print_error_rejects_bad_descriptor() {
        let api = MockYices::new();
        let yices = Yices::new(&api);
        let err = yices.print_error(-5).unwrap_err();
        assert_eq!(err.operation(), Some("yices_print_error_fd"));
        assert_eq!(err.report().unwrap().code, ErrorCode::OUTPUT_ERROR);
        assert_eq!(yices.error_code(), ErrorCode::NO_ERROR);
    }
}
