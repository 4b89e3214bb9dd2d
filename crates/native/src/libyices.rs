//! `YicesApi` over the linked `libyices`.
//!
//! ## Requirements
//!
//! Yices 2.6 or later must be installed with its shared library on the
//! linker path:
//! - macOS: `brew install SRI-CSL/sri-csl/yices2`
//! - Ubuntu/Debian: `apt-get install libyices2-dev`
//!
//! The library is process-global, so `LibYices` is a zero-sized handle.
//! Callers must `init` before first use unless another component already
//! did.

use std::ffi::CStr;
use std::ptr::{self, NonNull};

use crate::api::{STATUS_ERROR, YicesApi};
use crate::ffi;
use crate::types::{ErrorCode, ErrorReport, GenMode, NULL_TERM, Term, Type, Yval};

/// The system Yices library.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibYices;

impl LibYices {
    pub fn new() -> Self {
        LibYices
    }
}

/// Native array length, or `None` when it does not fit the C `uint32_t`.
fn native_len(n: usize) -> Option<u32> {
    u32::try_from(n).ok()
}

fn empty_term_vector() -> ffi::term_vector_t {
    ffi::term_vector_t {
        capacity: 0,
        size: 0,
        data: ptr::null_mut(),
    }
}

fn empty_yval_vector() -> ffi::yval_vector_t {
    ffi::yval_vector_t {
        capacity: 0,
        size: 0,
        data: ptr::null_mut(),
    }
}

impl YicesApi for LibYices {
    type Context = NonNull<ffi::context_t>;
    type Model = NonNull<ffi::model_t>;
    type TermVector = ffi::term_vector_t;
    type YvalVector = ffi::yval_vector_t;

    fn init(&self) {
        unsafe { ffi::yices_init() }
    }

    fn exit(&self) {
        unsafe { ffi::yices_exit() }
    }

    fn reset(&self) {
        unsafe { ffi::yices_reset() }
    }

    fn is_inited(&self) -> bool {
        unsafe { ffi::yices_is_inited() != 0 }
    }

    fn error_code(&self) -> ErrorCode {
        ErrorCode(unsafe { ffi::yices_error_code() })
    }

    fn error_report(&self) -> ErrorReport {
        let raw = unsafe { ffi::yices_error_report() };
        let message = self.error_string();
        // SAFETY: yices_error_report returns a pointer to a static struct.
        match unsafe { raw.as_ref() } {
            Some(r) => ErrorReport {
                code: ErrorCode(r.code),
                line: r.line,
                column: r.column,
                term1: r.term1,
                type1: r.type1,
                term2: r.term2,
                type2: r.type2,
                badval: r.badval,
                message,
            },
            None => ErrorReport {
                code: self.error_code(),
                message,
                ..ErrorReport::default()
            },
        }
    }

    fn error_string(&self) -> String {
        let raw = unsafe { ffi::yices_error_string() };
        if raw.is_null() {
            return String::new();
        }
        // SAFETY: non-null, NUL-terminated, owned by us until yices_free_string.
        let message = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        unsafe { ffi::yices_free_string(raw) };
        message
    }

    fn clear_error(&self) {
        unsafe { ffi::yices_clear_error() }
    }

    fn print_error_fd(&self, fd: i32) -> i32 {
        unsafe { ffi::yices_print_error_fd(fd) }
    }

    fn get_model(&self, ctx: Self::Context, keep_subst: bool) -> Option<Self::Model> {
        NonNull::new(unsafe { ffi::yices_get_model(ctx.as_ptr(), i32::from(keep_subst)) })
    }

    fn model_from_map(&self, vars: &[Term], values: &[Term]) -> Option<Self::Model> {
        if vars.len() != values.len() {
            return None;
        }
        let n = native_len(vars.len())?;
        NonNull::new(unsafe { ffi::yices_model_from_map(n, vars.as_ptr(), values.as_ptr()) })
    }

    fn free_model(&self, mdl: Self::Model) {
        unsafe { ffi::yices_free_model(mdl.as_ptr()) }
    }

    fn get_bool_value(&self, mdl: Self::Model, t: Term, val: &mut i32) -> i32 {
        unsafe { ffi::yices_get_bool_value(mdl.as_ptr(), t, val) }
    }

    fn get_int64_value(&self, mdl: Self::Model, t: Term, val: &mut i64) -> i32 {
        unsafe { ffi::yices_get_int64_value(mdl.as_ptr(), t, val) }
    }

    fn get_rational64_value(&self, mdl: Self::Model, t: Term, num: &mut i64, den: &mut u64) -> i32 {
        unsafe { ffi::yices_get_rational64_value(mdl.as_ptr(), t, num, den) }
    }

    fn get_double_value(&self, mdl: Self::Model, t: Term, val: &mut f64) -> i32 {
        unsafe { ffi::yices_get_double_value(mdl.as_ptr(), t, val) }
    }

    fn get_scalar_value(&self, mdl: Self::Model, t: Term, val: &mut i32) -> i32 {
        unsafe { ffi::yices_get_scalar_value(mdl.as_ptr(), t, val) }
    }

    fn get_value(&self, mdl: Self::Model, t: Term, val: &mut Yval) -> i32 {
        unsafe { ffi::yices_get_value(mdl.as_ptr(), t, val) }
    }

    fn get_value_as_term(&self, mdl: Self::Model, t: Term) -> Term {
        unsafe { ffi::yices_get_value_as_term(mdl.as_ptr(), t) }
    }

    fn val_is_int64(&self, mdl: Self::Model, v: &Yval) -> bool {
        unsafe { ffi::yices_val_is_int64(mdl.as_ptr(), v) != 0 }
    }

    fn val_is_rational64(&self, mdl: Self::Model, v: &Yval) -> bool {
        unsafe { ffi::yices_val_is_rational64(mdl.as_ptr(), v) != 0 }
    }

    fn val_bitsize(&self, mdl: Self::Model, v: &Yval) -> u32 {
        unsafe { ffi::yices_val_bitsize(mdl.as_ptr(), v) }
    }

    fn val_tuple_arity(&self, mdl: Self::Model, v: &Yval) -> u32 {
        unsafe { ffi::yices_val_tuple_arity(mdl.as_ptr(), v) }
    }

    fn val_mapping_arity(&self, mdl: Self::Model, v: &Yval) -> u32 {
        unsafe { ffi::yices_val_mapping_arity(mdl.as_ptr(), v) }
    }

    fn val_function_arity(&self, mdl: Self::Model, v: &Yval) -> u32 {
        unsafe { ffi::yices_val_function_arity(mdl.as_ptr(), v) }
    }

    fn val_get_bool(&self, mdl: Self::Model, v: &Yval, val: &mut i32) -> i32 {
        unsafe { ffi::yices_val_get_bool(mdl.as_ptr(), v, val) }
    }

    fn val_get_int64(&self, mdl: Self::Model, v: &Yval, val: &mut i64) -> i32 {
        unsafe { ffi::yices_val_get_int64(mdl.as_ptr(), v, val) }
    }

    fn val_get_rational64(&self, mdl: Self::Model, v: &Yval, num: &mut i64, den: &mut u64) -> i32 {
        unsafe { ffi::yices_val_get_rational64(mdl.as_ptr(), v, num, den) }
    }

    fn val_get_double(&self, mdl: Self::Model, v: &Yval, val: &mut f64) -> i32 {
        unsafe { ffi::yices_val_get_double(mdl.as_ptr(), v, val) }
    }

    fn val_get_bv(&self, mdl: Self::Model, v: &Yval, bits: &mut [i32]) -> i32 {
        // The library writes exactly bitsize(v) entries.
        if native_len(bits.len()) != Some(self.val_bitsize(mdl, v)) {
            return STATUS_ERROR;
        }
        unsafe { ffi::yices_val_get_bv(mdl.as_ptr(), v, bits.as_mut_ptr()) }
    }

    fn val_get_scalar(&self, mdl: Self::Model, v: &Yval, val: &mut i32, tau: &mut Type) -> i32 {
        unsafe { ffi::yices_val_get_scalar(mdl.as_ptr(), v, val, tau) }
    }

    fn val_expand_tuple(&self, mdl: Self::Model, v: &Yval, children: &mut [Yval]) -> i32 {
        if native_len(children.len()) != Some(self.val_tuple_arity(mdl, v)) {
            return STATUS_ERROR;
        }
        unsafe { ffi::yices_val_expand_tuple(mdl.as_ptr(), v, children.as_mut_ptr()) }
    }

    fn val_expand_mapping(&self, mdl: Self::Model, v: &Yval, args: &mut [Yval], result: &mut Yval) -> i32 {
        if native_len(args.len()) != Some(self.val_mapping_arity(mdl, v)) {
            return STATUS_ERROR;
        }
        unsafe { ffi::yices_val_expand_mapping(mdl.as_ptr(), v, args.as_mut_ptr(), result) }
    }

    fn val_expand_function(
        &self,
        mdl: Self::Model,
        v: &Yval,
        default: &mut Yval,
        mappings: &mut Self::YvalVector,
    ) -> i32 {
        unsafe { ffi::yices_val_expand_function(mdl.as_ptr(), v, default, mappings) }
    }

    fn init_term_vector(&self) -> Self::TermVector {
        let mut v = empty_term_vector();
        unsafe { ffi::yices_init_term_vector(&mut v) };
        v
    }

    fn delete_term_vector(&self, v: &mut Self::TermVector) {
        unsafe { ffi::yices_delete_term_vector(v) }
    }

    fn term_vector_elems<'v>(&self, v: &'v Self::TermVector) -> &'v [Term] {
        if v.data.is_null() || v.size == 0 {
            return &[];
        }
        // SAFETY: the library keeps `size` initialised entries at `data`.
        unsafe { std::slice::from_raw_parts(v.data, v.size as usize) }
    }

    fn init_yval_vector(&self) -> Self::YvalVector {
        let mut v = empty_yval_vector();
        unsafe { ffi::yices_init_yval_vector(&mut v) };
        v
    }

    fn delete_yval_vector(&self, v: &mut Self::YvalVector) {
        unsafe { ffi::yices_delete_yval_vector(v) }
    }

    fn yval_vector_elems<'v>(&self, v: &'v Self::YvalVector) -> &'v [Yval] {
        if v.data.is_null() || v.size == 0 {
            return &[];
        }
        // SAFETY: as for term vectors.
        unsafe { std::slice::from_raw_parts(v.data, v.size as usize) }
    }

    fn formula_true_in_model(&self, mdl: Self::Model, f: Term) -> i32 {
        unsafe { ffi::yices_formula_true_in_model(mdl.as_ptr(), f) }
    }

    fn formulas_true_in_model(&self, mdl: Self::Model, f: &[Term]) -> i32 {
        let Some(n) = native_len(f.len()) else {
            return STATUS_ERROR;
        };
        unsafe { ffi::yices_formulas_true_in_model(mdl.as_ptr(), n, f.as_ptr()) }
    }

    fn model_collect_defined_terms(&self, mdl: Self::Model, v: &mut Self::TermVector) {
        unsafe { ffi::yices_model_collect_defined_terms(mdl.as_ptr(), v) }
    }

    fn implicant_for_formula(&self, mdl: Self::Model, t: Term, v: &mut Self::TermVector) -> i32 {
        unsafe { ffi::yices_implicant_for_formula(mdl.as_ptr(), t, v) }
    }

    fn implicant_for_formulas(&self, mdl: Self::Model, a: &[Term], v: &mut Self::TermVector) -> i32 {
        let Some(n) = native_len(a.len()) else {
            return STATUS_ERROR;
        };
        unsafe { ffi::yices_implicant_for_formulas(mdl.as_ptr(), n, a.as_ptr(), v) }
    }

    fn generalize_model(
        &self,
        mdl: Self::Model,
        t: Term,
        elims: &[Term],
        mode: GenMode,
        v: &mut Self::TermVector,
    ) -> i32 {
        let Some(nelims) = native_len(elims.len()) else {
            return STATUS_ERROR;
        };
        unsafe { ffi::yices_generalize_model(mdl.as_ptr(), t, nelims, elims.as_ptr(), mode.raw(), v) }
    }

    fn generalize_model_array(
        &self,
        mdl: Self::Model,
        a: &[Term],
        elims: &[Term],
        mode: GenMode,
        v: &mut Self::TermVector,
    ) -> i32 {
        let (Some(n), Some(nelims)) = (native_len(a.len()), native_len(elims.len())) else {
            return STATUS_ERROR;
        };
        unsafe {
            ffi::yices_generalize_model_array(
                mdl.as_ptr(),
                n,
                a.as_ptr(),
                nelims,
                elims.as_ptr(),
                mode.raw(),
                v,
            )
        }
    }

    fn constant(&self, tau: Type, index: i32) -> Term {
        let t = unsafe { ffi::yices_constant(tau, index) };
        if t.is_null() {
            tracing::debug!("yices_constant({tau}, {index}) returned NULL_TERM");
            return NULL_TERM;
        }
        t
    }
}
