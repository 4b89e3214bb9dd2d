//! Raw declarations from `yices.h` for the calls the model layer uses.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int};

use crate::types::{Term, Type, Yval};

pub type term_t = Term;
pub type type_t = Type;
pub type yval_t = Yval;
pub type error_code_t = i32;
pub type yices_gen_mode_t = i32;

#[repr(C)]
pub struct context_t {
    _private: [u8; 0],
}

#[repr(C)]
pub struct model_t {
    _private: [u8; 0],
}

#[repr(C)]
pub struct term_vector_t {
    pub capacity: u32,
    pub size: u32,
    pub data: *mut term_t,
}

#[repr(C)]
pub struct yval_vector_t {
    pub capacity: u32,
    pub size: u32,
    pub data: *mut yval_t,
}

#[repr(C)]
pub struct error_report_t {
    pub code: error_code_t,
    pub line: u32,
    pub column: u32,
    pub term1: term_t,
    pub type1: type_t,
    pub term2: term_t,
    pub type2: type_t,
    pub badval: i64,
}

#[link(name = "yices")]
unsafe extern "C" {
    pub fn yices_init();
    pub fn yices_exit();
    pub fn yices_reset();
    pub fn yices_is_inited() -> i32;

    pub fn yices_error_code() -> error_code_t;
    pub fn yices_error_report() -> *mut error_report_t;
    pub fn yices_clear_error();
    pub fn yices_print_error_fd(fd: c_int) -> i32;
    pub fn yices_error_string() -> *mut c_char;
    pub fn yices_free_string(s: *mut c_char);

    pub fn yices_get_model(ctx: *mut context_t, keep_subst: i32) -> *mut model_t;
    pub fn yices_model_from_map(n: u32, var: *const term_t, map: *const term_t) -> *mut model_t;
    pub fn yices_free_model(mdl: *mut model_t);

    pub fn yices_get_bool_value(mdl: *mut model_t, t: term_t, val: *mut i32) -> i32;
    pub fn yices_get_int64_value(mdl: *mut model_t, t: term_t, val: *mut i64) -> i32;
    pub fn yices_get_rational64_value(
        mdl: *mut model_t,
        t: term_t,
        num: *mut i64,
        den: *mut u64,
    ) -> i32;
    pub fn yices_get_double_value(mdl: *mut model_t, t: term_t, val: *mut f64) -> i32;
    pub fn yices_get_scalar_value(mdl: *mut model_t, t: term_t, val: *mut i32) -> i32;

    pub fn yices_get_value(mdl: *mut model_t, t: term_t, val: *mut yval_t) -> i32;
    pub fn yices_get_value_as_term(mdl: *mut model_t, t: term_t) -> term_t;

    pub fn yices_val_is_int64(mdl: *mut model_t, v: *const yval_t) -> i32;
    pub fn yices_val_is_rational64(mdl: *mut model_t, v: *const yval_t) -> i32;
    pub fn yices_val_bitsize(mdl: *mut model_t, v: *const yval_t) -> u32;
    pub fn yices_val_tuple_arity(mdl: *mut model_t, v: *const yval_t) -> u32;
    pub fn yices_val_mapping_arity(mdl: *mut model_t, v: *const yval_t) -> u32;
    pub fn yices_val_function_arity(mdl: *mut model_t, v: *const yval_t) -> u32;

    pub fn yices_val_get_bool(mdl: *mut model_t, v: *const yval_t, val: *mut i32) -> i32;
    pub fn yices_val_get_int64(mdl: *mut model_t, v: *const yval_t, val: *mut i64) -> i32;
    pub fn yices_val_get_rational64(
        mdl: *mut model_t,
        v: *const yval_t,
        num: *mut i64,
        den: *mut u64,
    ) -> i32;
    pub fn yices_val_get_double(mdl: *mut model_t, v: *const yval_t, val: *mut f64) -> i32;
    pub fn yices_val_get_bv(mdl: *mut model_t, v: *const yval_t, val: *mut i32) -> i32;
    pub fn yices_val_get_scalar(
        mdl: *mut model_t,
        v: *const yval_t,
        val: *mut i32,
        tau: *mut type_t,
    ) -> i32;

    pub fn yices_val_expand_tuple(mdl: *mut model_t, v: *const yval_t, child: *mut yval_t) -> i32;
    pub fn yices_val_expand_mapping(
        mdl: *mut model_t,
        m: *const yval_t,
        tup: *mut yval_t,
        val: *mut yval_t,
    ) -> i32;
    pub fn yices_val_expand_function(
        mdl: *mut model_t,
        f: *const yval_t,
        def: *mut yval_t,
        v: *mut yval_vector_t,
    ) -> i32;

    pub fn yices_init_term_vector(v: *mut term_vector_t);
    pub fn yices_delete_term_vector(v: *mut term_vector_t);
    pub fn yices_init_yval_vector(v: *mut yval_vector_t);
    pub fn yices_delete_yval_vector(v: *mut yval_vector_t);

    pub fn yices_formula_true_in_model(mdl: *mut model_t, f: term_t) -> i32;
    pub fn yices_formulas_true_in_model(mdl: *mut model_t, n: u32, f: *const term_t) -> i32;
    pub fn yices_model_collect_defined_terms(mdl: *mut model_t, v: *mut term_vector_t);
    pub fn yices_implicant_for_formula(
        mdl: *mut model_t,
        t: term_t,
        v: *mut term_vector_t,
    ) -> i32;
    pub fn yices_implicant_for_formulas(
        mdl: *mut model_t,
        n: u32,
        a: *const term_t,
        v: *mut term_vector_t,
    ) -> i32;
    pub fn yices_generalize_model(
        mdl: *mut model_t,
        t: term_t,
        nelims: u32,
        elim: *const term_t,
        mode: yices_gen_mode_t,
        v: *mut term_vector_t,
    ) -> i32;
    pub fn yices_generalize_model_array(
        mdl: *mut model_t,
        n: u32,
        a: *const term_t,
        nelims: u32,
        elim: *const term_t,
        mode: yices_gen_mode_t,
        v: *mut term_vector_t,
    ) -> i32;

    pub fn yices_constant(tau: type_t, index: i32) -> term_t;
}
