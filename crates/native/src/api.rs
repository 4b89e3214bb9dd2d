//! The native boundary as a trait.
//!
//! `YicesApi` mirrors the subset of the Yices C API that the model layer
//! calls, keeping the C calling convention: status codes (`0` / `-1`),
//! sentinel handles and out-parameters. Nothing here interprets a failure;
//! that is the job of the error boundary in `yices-model`.
//!
//! Two implementations exist: `LibYices` (feature `libyices`) forwards to the
//! linked library, `MockYices` (feature `mock`) is an in-memory scripted
//! solver used by tests.

use crate::types::{ErrorCode, ErrorReport, GenMode, Term, Type, Yval};

/// Status returned by a successful native call.
pub const STATUS_OK: i32 = 0;

/// Status returned by a failed native call.
pub const STATUS_ERROR: i32 = -1;

/// Trait abstracting over implementations of the native Yices API.
///
/// All methods take `&self`: the library keeps its own global state, and a
/// scripted implementation uses interior mutability.
pub trait YicesApi {
    /// Handle to a context whose last check returned SAT.
    type Context: Copy;
    /// Handle to a native model (`model_t *`).
    type Model: Copy;
    /// Native growable term array (`term_vector_t`).
    type TermVector;
    /// Native growable value-node array (`yval_vector_t`).
    type YvalVector;

    // ---- library state ----

    fn init(&self);
    fn exit(&self);
    fn reset(&self);
    fn is_inited(&self) -> bool;

    // ---- error reporting ----

    fn error_code(&self) -> ErrorCode;
    /// The current error report. `message` is filled from `error_string`.
    fn error_report(&self) -> ErrorReport;
    fn error_string(&self) -> String;
    fn clear_error(&self);
    /// Print the current error to a file descriptor; `-1` on failure.
    fn print_error_fd(&self, fd: i32) -> i32;

    // ---- model lifecycle ----

    /// `None` when the context has no model.
    fn get_model(&self, ctx: Self::Context, keep_subst: bool) -> Option<Self::Model>;
    /// `vars` and `values` have the same length.
    fn model_from_map(&self, vars: &[Term], values: &[Term]) -> Option<Self::Model>;
    fn free_model(&self, mdl: Self::Model);

    // ---- typed leaf extraction ----

    fn get_bool_value(&self, mdl: Self::Model, t: Term, val: &mut i32) -> i32;
    fn get_int64_value(&self, mdl: Self::Model, t: Term, val: &mut i64) -> i32;
    fn get_rational64_value(&self, mdl: Self::Model, t: Term, num: &mut i64, den: &mut u64) -> i32;
    fn get_double_value(&self, mdl: Self::Model, t: Term, val: &mut f64) -> i32;
    fn get_scalar_value(&self, mdl: Self::Model, t: Term, val: &mut i32) -> i32;

    // ---- root value retrieval ----

    fn get_value(&self, mdl: Self::Model, t: Term, val: &mut Yval) -> i32;
    /// `NULL_TERM` on failure.
    fn get_value_as_term(&self, mdl: Self::Model, t: Term) -> Term;

    // ---- value node introspection ----

    fn val_is_int64(&self, mdl: Self::Model, v: &Yval) -> bool;
    fn val_is_rational64(&self, mdl: Self::Model, v: &Yval) -> bool;
    /// `0` when the node is not a bit-vector.
    fn val_bitsize(&self, mdl: Self::Model, v: &Yval) -> u32;
    fn val_tuple_arity(&self, mdl: Self::Model, v: &Yval) -> u32;
    fn val_mapping_arity(&self, mdl: Self::Model, v: &Yval) -> u32;
    fn val_function_arity(&self, mdl: Self::Model, v: &Yval) -> u32;

    fn val_get_bool(&self, mdl: Self::Model, v: &Yval, val: &mut i32) -> i32;
    fn val_get_int64(&self, mdl: Self::Model, v: &Yval, val: &mut i64) -> i32;
    fn val_get_rational64(&self, mdl: Self::Model, v: &Yval, num: &mut i64, den: &mut u64) -> i32;
    fn val_get_double(&self, mdl: Self::Model, v: &Yval, val: &mut f64) -> i32;
    /// `bits.len()` equals the node's bitsize.
    fn val_get_bv(&self, mdl: Self::Model, v: &Yval, bits: &mut [i32]) -> i32;
    fn val_get_scalar(&self, mdl: Self::Model, v: &Yval, val: &mut i32, tau: &mut Type) -> i32;

    /// `children.len()` equals the tuple arity.
    fn val_expand_tuple(&self, mdl: Self::Model, v: &Yval, children: &mut [Yval]) -> i32;
    /// `args.len()` equals the mapping arity.
    fn val_expand_mapping(&self, mdl: Self::Model, v: &Yval, args: &mut [Yval], result: &mut Yval) -> i32;
    fn val_expand_function(
        &self,
        mdl: Self::Model,
        v: &Yval,
        default: &mut Yval,
        mappings: &mut Self::YvalVector,
    ) -> i32;

    // ---- vectors ----

    fn init_term_vector(&self) -> Self::TermVector;
    fn delete_term_vector(&self, v: &mut Self::TermVector);
    fn term_vector_elems<'v>(&self, v: &'v Self::TermVector) -> &'v [Term];

    fn init_yval_vector(&self) -> Self::YvalVector;
    fn delete_yval_vector(&self, v: &mut Self::YvalVector);
    fn yval_vector_elems<'v>(&self, v: &'v Self::YvalVector) -> &'v [Yval];

    // ---- evaluation and derived operations ----

    /// `1` true, `0` false, `-1` error.
    fn formula_true_in_model(&self, mdl: Self::Model, f: Term) -> i32;
    fn formulas_true_in_model(&self, mdl: Self::Model, f: &[Term]) -> i32;
    fn model_collect_defined_terms(&self, mdl: Self::Model, v: &mut Self::TermVector);
    fn implicant_for_formula(&self, mdl: Self::Model, t: Term, v: &mut Self::TermVector) -> i32;
    fn implicant_for_formulas(&self, mdl: Self::Model, a: &[Term], v: &mut Self::TermVector) -> i32;
    fn generalize_model(
        &self,
        mdl: Self::Model,
        t: Term,
        elims: &[Term],
        mode: GenMode,
        v: &mut Self::TermVector,
    ) -> i32;
    fn generalize_model_array(
        &self,
        mdl: Self::Model,
        a: &[Term],
        elims: &[Term],
        mode: GenMode,
        v: &mut Self::TermVector,
    ) -> i32;

    // ---- term construction used by the scalar decoder ----

    /// Constant of index `index` in scalar or uninterpreted type `tau`;
    /// `NULL_TERM` on failure.
    fn constant(&self, tau: Type, index: i32) -> Term;
}
