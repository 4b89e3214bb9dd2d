//! In-memory scripted implementation of [`YicesApi`].
//!
//! `MockYices` stands in for `libyices` in tests and benches. It does not
//! solve anything: a test declares types and terms, scripts contexts with a
//! ready-made assignment, and the mock answers model queries from that
//! assignment with the same status codes, sentinels and error reports the
//! library would produce.
//!
//! Every vector init/release is counted, a vector released twice or used
//! after release panics, and any operation can be made to fail on demand
//! with [`MockYices::fail_on`].

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};

use crate::api::{STATUS_ERROR, STATUS_OK, YicesApi};
use crate::types::{ErrorCode, ErrorReport, GenMode, NULL_TERM, NULL_TYPE, Term, Type, Yval, YvalTag};

/// Error code reported for failures injected with [`MockYices::fail_on`].
pub const INJECTED_FAILURE: ErrorCode = ErrorCode::INTERNAL_EXCEPTION;

/// A value in a scripted assignment, shaped like the solver's value nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    Bool(bool),
    Rational(BigRational),
    Algebraic,
    /// Bits in native order.
    Bv(Vec<i32>),
    Scalar { ty: Type, index: i32 },
    Tuple(Vec<MockValue>),
    Function {
        arity: u32,
        default: Box<MockValue>,
        entries: Vec<(Vec<MockValue>, MockValue)>,
    },
    Mapping(Vec<MockValue>, Box<MockValue>),
    /// A node carrying a tag outside the native enumeration.
    RawTag(i32),
}

impl MockValue {
    pub fn int(n: i64) -> Self {
        MockValue::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn big_int(n: BigInt) -> Self {
        MockValue::Rational(BigRational::from_integer(n))
    }

    /// A rational kept exactly as given, without reduction.
    pub fn rational(num: i64, den: i64) -> Self {
        MockValue::Rational(BigRational::new_raw(BigInt::from(num), BigInt::from(den)))
    }

    pub fn big_rational(num: BigInt, den: BigInt) -> Self {
        MockValue::Rational(BigRational::new_raw(num, den))
    }

    /// Bit-vector of `width` bits holding `value`, least significant bit first.
    pub fn bv_from_u64(value: u64, width: u32) -> Self {
        MockValue::Bv(
            (0..width)
                .map(|i| if i < 64 { ((value >> i) & 1) as i32 } else { 0 })
                .collect(),
        )
    }

    pub fn function(arity: u32, default: MockValue, entries: Vec<(Vec<MockValue>, MockValue)>) -> Self {
        MockValue::Function {
            arity,
            default: Box::new(default),
            entries,
        }
    }

    fn tag(&self) -> i32 {
        match self {
            MockValue::Bool(_) => YvalTag::Bool.raw(),
            MockValue::Rational(_) => YvalTag::Rational.raw(),
            MockValue::Algebraic => YvalTag::Algebraic.raw(),
            MockValue::Bv(_) => YvalTag::Bv.raw(),
            MockValue::Scalar { .. } => YvalTag::Scalar.raw(),
            MockValue::Tuple(_) => YvalTag::Tuple.raw(),
            MockValue::Function { .. } => YvalTag::Function.raw(),
            MockValue::Mapping(..) => YvalTag::Mapping.raw(),
            MockValue::RawTag(tag) => *tag,
        }
    }
}

/// Scripted context handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockContext(usize);

/// Scripted model handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockModel(usize);

#[derive(Debug)]
pub struct MockTermVector {
    id: usize,
    data: Vec<Term>,
}

#[derive(Debug)]
pub struct MockYvalVector {
    id: usize,
    data: Vec<Yval>,
}

/// Counts of vector lifecycle calls since the mock was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorCounters {
    pub term_inits: usize,
    pub term_releases: usize,
    pub yval_inits: usize,
    pub yval_releases: usize,
}

impl VectorCounters {
    /// Vectors initialised but not yet released.
    pub fn outstanding(&self) -> usize {
        (self.term_inits + self.yval_inits) - (self.term_releases + self.yval_releases)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockType {
    Bool,
    Int,
    Real,
    BitVector(u32),
    Scalar(u32),
    Compound,
}

#[derive(Debug, Clone)]
enum TermKind {
    Uninterpreted,
    Constant(MockValue),
}

#[derive(Debug, Clone)]
struct TermInfo {
    ty: Type,
    kind: TermKind,
}

#[derive(Debug)]
struct ModelState {
    assignments: Vec<(Term, MockValue)>,
    nodes: Vec<MockValue>,
    keep_subst: bool,
}

#[derive(Debug, Default)]
struct State {
    inited: bool,
    error: ErrorCode,
    error_term: Option<Term>,
    types: Vec<MockType>,
    terms: Vec<TermInfo>,
    contexts: Vec<Option<Vec<(Term, MockValue)>>>,
    models: Vec<Option<ModelState>>,
    live_vectors: HashSet<usize>,
    next_vector: usize,
    counters: VectorCounters,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, usize>,
}

impl State {
    fn set_error(&mut self, code: ErrorCode) -> i32 {
        self.error = code;
        STATUS_ERROR
    }

    fn set_term_error(&mut self, code: ErrorCode, t: Term) -> i32 {
        self.error_term = Some(t);
        self.set_error(code)
    }

    /// Records the call and reports whether it was scripted to fail.
    fn enter(&mut self, op: &'static str) -> bool {
        *self.calls.entry(op).or_insert(0) += 1;
        if self.failing.contains(op) {
            self.error = INJECTED_FAILURE;
            return true;
        }
        false
    }

    fn model(&self, mdl: MockModel) -> &ModelState {
        match self.models.get(mdl.0).and_then(Option::as_ref) {
            Some(m) => m,
            None => panic!("mock model {} used after free", mdl.0),
        }
    }

    fn model_mut(&mut self, mdl: MockModel) -> &mut ModelState {
        match self.models.get_mut(mdl.0).and_then(Option::as_mut) {
            Some(m) => m,
            None => panic!("mock model {} used after free", mdl.0),
        }
    }

    fn term(&self, t: Term) -> Option<&TermInfo> {
        usize::try_from(t.0).ok().and_then(|i| self.terms.get(i))
    }

    fn push_term(&mut self, ty: Type, kind: TermKind) -> Term {
        self.terms.push(TermInfo { ty, kind });
        Term((self.terms.len() - 1) as i32)
    }

    fn value_of(&mut self, mdl: MockModel, t: Term) -> Result<MockValue, i32> {
        let Some(info) = self.term(t).cloned() else {
            return Err(self.set_term_error(ErrorCode::INVALID_TERM, t));
        };
        if let Some((_, v)) = self.model(mdl).assignments.iter().find(|(k, _)| *k == t) {
            return Ok(v.clone());
        }
        match info.kind {
            TermKind::Constant(v) => Ok(v),
            TermKind::Uninterpreted => Err(self.set_term_error(ErrorCode::EVAL_UNKNOWN_TERM, t)),
        }
    }

    fn node(&mut self, mdl: MockModel, v: &Yval) -> Result<MockValue, i32> {
        let found = usize::try_from(v.node_id)
            .ok()
            .and_then(|i| self.model(mdl).nodes.get(i))
            .cloned();
        match found {
            Some(node) => Ok(node),
            None => Err(self.set_error(ErrorCode::YVAL_INVALID_OP)),
        }
    }

    fn push_node(&mut self, mdl: MockModel, value: MockValue) -> Yval {
        let tag = value.tag();
        let nodes = &mut self.model_mut(mdl).nodes;
        nodes.push(value);
        Yval {
            node_id: (nodes.len() - 1) as i32,
            node_tag: tag,
        }
    }

    fn check_live(&self, id: usize) {
        if !self.live_vectors.contains(&id) {
            panic!("mock vector {id} used after release");
        }
    }

    fn release(&mut self, id: usize) {
        if !self.live_vectors.remove(&id) {
            panic!("mock vector {id} released twice");
        }
    }

    fn is_true(&mut self, mdl: MockModel, f: Term) -> i32 {
        match self.value_of(mdl, f) {
            Ok(MockValue::Bool(b)) => i32::from(b),
            Ok(_) => self.set_term_error(ErrorCode::TYPE_MISMATCH, f),
            Err(status) => status,
        }
    }
}

/// Scripted stand-in for the Yices library.
#[derive(Debug, Default)]
pub struct MockYices {
    state: RefCell<State>,
}

impl MockYices {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.state.borrow_mut().inited = true;
        mock
    }

    // ---- scripting: types and terms ----

    fn push_type(&self, ty: MockType) -> Type {
        let mut st = self.state.borrow_mut();
        st.types.push(ty);
        Type((st.types.len() - 1) as i32)
    }

    pub fn bool_type(&self) -> Type {
        self.push_type(MockType::Bool)
    }

    pub fn int_type(&self) -> Type {
        self.push_type(MockType::Int)
    }

    pub fn real_type(&self) -> Type {
        self.push_type(MockType::Real)
    }

    pub fn bv_type(&self, width: u32) -> Type {
        self.push_type(MockType::BitVector(width))
    }

    /// Enumerated type with `card` elements.
    pub fn scalar_type(&self, card: u32) -> Type {
        self.push_type(MockType::Scalar(card))
    }

    /// Tuple or function type; the mock does not track the components.
    pub fn compound_type(&self) -> Type {
        self.push_type(MockType::Compound)
    }

    pub fn type_is_bool(&self, tau: Type) -> bool {
        let st = self.state.borrow();
        usize::try_from(tau.0).ok().and_then(|i| st.types.get(i)) == Some(&MockType::Bool)
    }

    /// Fresh uninterpreted term of type `tau`.
    pub fn new_variable(&self, tau: Type) -> Term {
        self.state.borrow_mut().push_term(tau, TermKind::Uninterpreted)
    }

    /// Constant term denoting `value`.
    pub fn value_term(&self, tau: Type, value: MockValue) -> Term {
        self.state.borrow_mut().push_term(tau, TermKind::Constant(value))
    }

    pub fn term_type(&self, t: Term) -> Type {
        self.state.borrow().term(t).map_or(NULL_TYPE, |info| info.ty)
    }

    // ---- scripting: contexts ----

    /// Context whose last check was SAT with the given assignment.
    pub fn sat_context(&self, assignment: Vec<(Term, MockValue)>) -> MockContext {
        let mut st = self.state.borrow_mut();
        st.contexts.push(Some(assignment));
        MockContext(st.contexts.len() - 1)
    }

    /// Context with no model available.
    pub fn unsat_context(&self) -> MockContext {
        let mut st = self.state.borrow_mut();
        st.contexts.push(None);
        MockContext(st.contexts.len() - 1)
    }

    // ---- scripting: failures and inspection ----

    /// Make every later call of the named native operation fail.
    pub fn fail_on(&self, operation: &'static str) {
        self.state.borrow_mut().failing.insert(operation);
    }

    pub fn clear_failures(&self) {
        self.state.borrow_mut().failing.clear();
    }

    pub fn vector_counters(&self) -> VectorCounters {
        self.state.borrow().counters
    }

    /// Number of times the named native operation was called.
    pub fn calls(&self, operation: &str) -> usize {
        self.state.borrow().calls.get(operation).copied().unwrap_or(0)
    }

    pub fn live_models(&self) -> usize {
        self.state.borrow().models.iter().filter(|m| m.is_some()).count()
    }

    pub fn kept_substitution(&self, mdl: MockModel) -> bool {
        self.state.borrow().model(mdl).keep_subst
    }

    fn new_vector_id(&self) -> usize {
        let mut st = self.state.borrow_mut();
        let id = st.next_vector;
        st.next_vector += 1;
        st.live_vectors.insert(id);
        id
    }
}

fn error_message(code: ErrorCode) -> String {
    let msg = match code {
        ErrorCode::NO_ERROR => "no error",
        ErrorCode::INVALID_TYPE => "invalid type",
        ErrorCode::INVALID_TERM => "invalid term",
        ErrorCode::INVALID_CONSTANT_INDEX => "invalid index in constant creation",
        ErrorCode::SCALAR_OR_UTYPE_REQUIRED => "invalid type in constant creation",
        ErrorCode::TYPE_MISMATCH => "type mismatch: invalid argument",
        ErrorCode::CTX_INVALID_OPERATION => "invalid operation on context",
        ErrorCode::EVAL_UNKNOWN_TERM => "eval error: unknown term",
        ErrorCode::EVAL_CONVERSION_FAILED => "eval error: conversion to a term failed",
        ErrorCode::EVAL_NO_IMPLICANT => "eval error: no implicant: formula is false in the model",
        ErrorCode::MDL_CONSTANT_REQUIRED => "model construction: a constant term is required",
        ErrorCode::MDL_DUPLICATE_VAR => "model construction: duplicate variable",
        ErrorCode::YVAL_INVALID_OP => "invalid operation on yval",
        ErrorCode::YVAL_OVERFLOW => "overflow: yval is too large",
        ErrorCode::MDL_GEN_FAILED => "model generalization failed",
        ErrorCode::OUTPUT_ERROR => "error when attempting to write to a stream",
        INJECTED_FAILURE => "internal error",
        other => return format!("error code {other}"),
    };
    msg.to_string()
}

fn as_int64(r: &BigRational) -> Option<i64> {
    if r.denom().is_one() { r.numer().to_i64() } else { None }
}

fn as_rational64(r: &BigRational) -> Option<(i64, u64)> {
    Some((r.numer().to_i64()?, r.denom().to_u64()?))
}

fn as_f64(r: &BigRational) -> f64 {
    let num = r.numer().to_f64().unwrap_or(f64::NAN);
    let den = r.denom().to_f64().unwrap_or(f64::NAN);
    num / den
}

impl YicesApi for MockYices {
    type Context = MockContext;
    type Model = MockModel;
    type TermVector = MockTermVector;
    type YvalVector = MockYvalVector;

    fn init(&self) {
        self.state.borrow_mut().inited = true;
    }

    fn exit(&self) {
        self.state.borrow_mut().inited = false;
    }

    /// Clears the error state and frees every model.
    fn reset(&self) {
        let mut st = self.state.borrow_mut();
        st.error = ErrorCode::NO_ERROR;
        st.error_term = None;
        for m in st.models.iter_mut() {
            *m = None;
        }
    }

    fn is_inited(&self) -> bool {
        self.state.borrow().inited
    }

    fn error_code(&self) -> ErrorCode {
        self.state.borrow().error
    }

    fn error_report(&self) -> ErrorReport {
        let st = self.state.borrow();
        ErrorReport {
            code: st.error,
            term1: st.error_term.unwrap_or(NULL_TERM),
            message: error_message(st.error),
            ..ErrorReport::default()
        }
    }

    fn error_string(&self) -> String {
        error_message(self.state.borrow().error)
    }

    fn clear_error(&self) {
        let mut st = self.state.borrow_mut();
        st.error = ErrorCode::NO_ERROR;
        st.error_term = None;
    }

    fn print_error_fd(&self, fd: i32) -> i32 {
        let msg = self.error_string();
        match fd {
            1 => println!("Error: {msg}"),
            2 => eprintln!("Error: {msg}"),
            _ => return self.state.borrow_mut().set_error(ErrorCode::OUTPUT_ERROR),
        }
        STATUS_OK
    }

    fn get_model(&self, ctx: MockContext, keep_subst: bool) -> Option<MockModel> {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_get_model") {
            return None;
        }
        let Some(assignments) = st.contexts.get(ctx.0).cloned().flatten() else {
            st.set_error(ErrorCode::CTX_INVALID_OPERATION);
            return None;
        };
        st.models.push(Some(ModelState {
            assignments,
            nodes: Vec::new(),
            keep_subst,
        }));
        Some(MockModel(st.models.len() - 1))
    }

    fn model_from_map(&self, vars: &[Term], values: &[Term]) -> Option<MockModel> {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_model_from_map") {
            return None;
        }
        if vars.len() != values.len() {
            st.set_error(ErrorCode::INVALID_TERM);
            return None;
        }
        let mut seen = HashSet::new();
        let mut assignments = Vec::with_capacity(vars.len());
        for (&var, &val) in vars.iter().zip(values) {
            let is_variable = st.term(var).map(|i| matches!(i.kind, TermKind::Uninterpreted));
            match is_variable {
                Some(true) => {}
                Some(false) => {
                    st.set_term_error(ErrorCode::MDL_CONSTANT_REQUIRED, var);
                    return None;
                }
                None => {
                    st.set_term_error(ErrorCode::INVALID_TERM, var);
                    return None;
                }
            }
            if !seen.insert(var) {
                st.set_term_error(ErrorCode::MDL_DUPLICATE_VAR, var);
                return None;
            }
            match st.term(val).map(|i| i.kind.clone()) {
                Some(TermKind::Constant(v)) => assignments.push((var, v)),
                _ => {
                    st.set_term_error(ErrorCode::MDL_CONSTANT_REQUIRED, val);
                    return None;
                }
            }
        }
        st.models.push(Some(ModelState {
            assignments,
            nodes: Vec::new(),
            keep_subst: false,
        }));
        Some(MockModel(st.models.len() - 1))
    }

    fn free_model(&self, mdl: MockModel) {
        let mut st = self.state.borrow_mut();
        match st.models.get_mut(mdl.0) {
            Some(slot) if slot.is_some() => *slot = None,
            _ => panic!("mock model {} freed twice", mdl.0),
        }
    }

    fn get_bool_value(&self, mdl: MockModel, t: Term, val: &mut i32) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_get_bool_value") {
            return STATUS_ERROR;
        }
        match st.value_of(mdl, t) {
            Ok(MockValue::Bool(b)) => {
                *val = i32::from(b);
                STATUS_OK
            }
            Ok(_) => st.set_term_error(ErrorCode::TYPE_MISMATCH, t),
            Err(status) => status,
        }
    }

    fn get_int64_value(&self, mdl: MockModel, t: Term, val: &mut i64) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_get_int64_value") {
            return STATUS_ERROR;
        }
        match st.value_of(mdl, t) {
            Ok(MockValue::Rational(r)) => match as_int64(&r) {
                Some(n) => {
                    *val = n;
                    STATUS_OK
                }
                None => st.set_term_error(ErrorCode::EVAL_CONVERSION_FAILED, t),
            },
            Ok(_) => st.set_term_error(ErrorCode::TYPE_MISMATCH, t),
            Err(status) => status,
        }
    }

    fn get_rational64_value(&self, mdl: MockModel, t: Term, num: &mut i64, den: &mut u64) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_get_rational64_value") {
            return STATUS_ERROR;
        }
        match st.value_of(mdl, t) {
            Ok(MockValue::Rational(r)) => match as_rational64(&r) {
                Some((n, d)) => {
                    *num = n;
                    *den = d;
                    STATUS_OK
                }
                None => st.set_term_error(ErrorCode::EVAL_CONVERSION_FAILED, t),
            },
            Ok(_) => st.set_term_error(ErrorCode::TYPE_MISMATCH, t),
            Err(status) => status,
        }
    }

    fn get_double_value(&self, mdl: MockModel, t: Term, val: &mut f64) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_get_double_value") {
            return STATUS_ERROR;
        }
        match st.value_of(mdl, t) {
            Ok(MockValue::Rational(r)) => {
                *val = as_f64(&r);
                STATUS_OK
            }
            Ok(_) => st.set_term_error(ErrorCode::TYPE_MISMATCH, t),
            Err(status) => status,
        }
    }

    fn get_scalar_value(&self, mdl: MockModel, t: Term, val: &mut i32) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_get_scalar_value") {
            return STATUS_ERROR;
        }
        match st.value_of(mdl, t) {
            Ok(MockValue::Scalar { index, .. }) => {
                *val = index;
                STATUS_OK
            }
            Ok(_) => st.set_term_error(ErrorCode::TYPE_MISMATCH, t),
            Err(status) => status,
        }
    }

    fn get_value(&self, mdl: MockModel, t: Term, val: &mut Yval) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_get_value") {
            return STATUS_ERROR;
        }
        match st.value_of(mdl, t) {
            Ok(v) => {
                *val = st.push_node(mdl, v);
                STATUS_OK
            }
            Err(status) => status,
        }
    }

    fn get_value_as_term(&self, mdl: MockModel, t: Term) -> Term {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_get_value_as_term") {
            return NULL_TERM;
        }
        let ty = st.term(t).map_or(NULL_TYPE, |info| info.ty);
        match st.value_of(mdl, t) {
            Ok(v) => st.push_term(ty, TermKind::Constant(v)),
            Err(_) => NULL_TERM,
        }
    }

    fn val_is_int64(&self, mdl: MockModel, v: &Yval) -> bool {
        let mut st = self.state.borrow_mut();
        matches!(st.node(mdl, v), Ok(MockValue::Rational(r)) if as_int64(&r).is_some())
    }

    fn val_is_rational64(&self, mdl: MockModel, v: &Yval) -> bool {
        let mut st = self.state.borrow_mut();
        matches!(st.node(mdl, v), Ok(MockValue::Rational(r)) if as_rational64(&r).is_some())
    }

    fn val_bitsize(&self, mdl: MockModel, v: &Yval) -> u32 {
        let mut st = self.state.borrow_mut();
        match st.node(mdl, v) {
            Ok(MockValue::Bv(bits)) => bits.len() as u32,
            _ => 0,
        }
    }

    fn val_tuple_arity(&self, mdl: MockModel, v: &Yval) -> u32 {
        let mut st = self.state.borrow_mut();
        match st.node(mdl, v) {
            Ok(MockValue::Tuple(items)) => items.len() as u32,
            _ => 0,
        }
    }

    fn val_mapping_arity(&self, mdl: MockModel, v: &Yval) -> u32 {
        let mut st = self.state.borrow_mut();
        match st.node(mdl, v) {
            Ok(MockValue::Mapping(args, _)) => args.len() as u32,
            _ => 0,
        }
    }

    fn val_function_arity(&self, mdl: MockModel, v: &Yval) -> u32 {
        let mut st = self.state.borrow_mut();
        match st.node(mdl, v) {
            Ok(MockValue::Function { arity, .. }) => arity,
            _ => 0,
        }
    }

    fn val_get_bool(&self, mdl: MockModel, v: &Yval, val: &mut i32) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_val_get_bool") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Bool(b)) => {
                *val = i32::from(b);
                STATUS_OK
            }
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn val_get_int64(&self, mdl: MockModel, v: &Yval, val: &mut i64) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_val_get_int64") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Rational(r)) => match as_int64(&r) {
                Some(n) => {
                    *val = n;
                    STATUS_OK
                }
                None => st.set_error(ErrorCode::YVAL_OVERFLOW),
            },
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn val_get_rational64(&self, mdl: MockModel, v: &Yval, num: &mut i64, den: &mut u64) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_val_get_rational64") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Rational(r)) => match as_rational64(&r) {
                Some((n, d)) => {
                    *num = n;
                    *den = d;
                    STATUS_OK
                }
                None => st.set_error(ErrorCode::YVAL_OVERFLOW),
            },
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn val_get_double(&self, mdl: MockModel, v: &Yval, val: &mut f64) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_val_get_double") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Rational(r)) => {
                *val = as_f64(&r);
                STATUS_OK
            }
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn val_get_bv(&self, mdl: MockModel, v: &Yval, bits: &mut [i32]) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_val_get_bv") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Bv(b)) if b.len() == bits.len() => {
                bits.copy_from_slice(&b);
                STATUS_OK
            }
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn val_get_scalar(&self, mdl: MockModel, v: &Yval, val: &mut i32, tau: &mut Type) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_val_get_scalar") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Scalar { ty, index }) => {
                *val = index;
                *tau = ty;
                STATUS_OK
            }
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn val_expand_tuple(&self, mdl: MockModel, v: &Yval, children: &mut [Yval]) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_val_expand_tuple") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Tuple(items)) if items.len() == children.len() => {
                for (slot, item) in children.iter_mut().zip(items) {
                    *slot = st.push_node(mdl, item);
                }
                STATUS_OK
            }
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn val_expand_mapping(&self, mdl: MockModel, v: &Yval, args: &mut [Yval], result: &mut Yval) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_val_expand_mapping") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Mapping(src, tgt)) if src.len() == args.len() => {
                for (slot, item) in args.iter_mut().zip(src) {
                    *slot = st.push_node(mdl, item);
                }
                *result = st.push_node(mdl, *tgt);
                STATUS_OK
            }
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn val_expand_function(
        &self,
        mdl: MockModel,
        v: &Yval,
        default: &mut Yval,
        mappings: &mut MockYvalVector,
    ) -> i32 {
        let mut st = self.state.borrow_mut();
        st.check_live(mappings.id);
        if st.enter("yices_val_expand_function") {
            return STATUS_ERROR;
        }
        match st.node(mdl, v) {
            Ok(MockValue::Function {
                default: def,
                entries,
                ..
            }) => {
                *default = st.push_node(mdl, *def);
                mappings.data.clear();
                for (args, result) in entries {
                    let node = st.push_node(mdl, MockValue::Mapping(args, Box::new(result)));
                    mappings.data.push(node);
                }
                STATUS_OK
            }
            Ok(_) => st.set_error(ErrorCode::YVAL_INVALID_OP),
            Err(status) => status,
        }
    }

    fn init_term_vector(&self) -> MockTermVector {
        let id = self.new_vector_id();
        self.state.borrow_mut().counters.term_inits += 1;
        MockTermVector { id, data: Vec::new() }
    }

    fn delete_term_vector(&self, v: &mut MockTermVector) {
        let mut st = self.state.borrow_mut();
        st.release(v.id);
        st.counters.term_releases += 1;
        v.data.clear();
    }

    fn term_vector_elems<'v>(&self, v: &'v MockTermVector) -> &'v [Term] {
        &v.data
    }

    fn init_yval_vector(&self) -> MockYvalVector {
        let id = self.new_vector_id();
        self.state.borrow_mut().counters.yval_inits += 1;
        MockYvalVector { id, data: Vec::new() }
    }

    fn delete_yval_vector(&self, v: &mut MockYvalVector) {
        let mut st = self.state.borrow_mut();
        st.release(v.id);
        st.counters.yval_releases += 1;
        v.data.clear();
    }

    fn yval_vector_elems<'v>(&self, v: &'v MockYvalVector) -> &'v [Yval] {
        &v.data
    }

    fn formula_true_in_model(&self, mdl: MockModel, f: Term) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_formula_true_in_model") {
            return STATUS_ERROR;
        }
        st.is_true(mdl, f)
    }

    fn formulas_true_in_model(&self, mdl: MockModel, f: &[Term]) -> i32 {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_formulas_true_in_model") {
            return STATUS_ERROR;
        }
        let mut all = 1;
        for &t in f {
            match st.is_true(mdl, t) {
                STATUS_ERROR => return STATUS_ERROR,
                0 => all = 0,
                _ => {}
            }
        }
        all
    }

    fn model_collect_defined_terms(&self, mdl: MockModel, v: &mut MockTermVector) {
        let mut st = self.state.borrow_mut();
        st.check_live(v.id);
        // The native call has no failure status; an injected failure yields
        // an empty vector.
        if st.enter("yices_model_collect_defined_terms") {
            v.data.clear();
            return;
        }
        v.data = st.model(mdl).assignments.iter().map(|(t, _)| *t).collect();
    }

    fn implicant_for_formula(&self, mdl: MockModel, t: Term, v: &mut MockTermVector) -> i32 {
        self.implicant_for_formulas_named("yices_implicant_for_formula", mdl, &[t], v)
    }

    fn implicant_for_formulas(&self, mdl: MockModel, a: &[Term], v: &mut MockTermVector) -> i32 {
        self.implicant_for_formulas_named("yices_implicant_for_formulas", mdl, a, v)
    }

    fn generalize_model(
        &self,
        mdl: MockModel,
        t: Term,
        elims: &[Term],
        mode: GenMode,
        v: &mut MockTermVector,
    ) -> i32 {
        self.generalize_named("yices_generalize_model", mdl, &[t], elims, mode, v)
    }

    fn generalize_model_array(
        &self,
        mdl: MockModel,
        a: &[Term],
        elims: &[Term],
        mode: GenMode,
        v: &mut MockTermVector,
    ) -> i32 {
        self.generalize_named("yices_generalize_model_array", mdl, a, elims, mode, v)
    }

    fn constant(&self, tau: Type, index: i32) -> Term {
        let mut st = self.state.borrow_mut();
        if st.enter("yices_constant") {
            return NULL_TERM;
        }
        let ty = usize::try_from(tau.0).ok().and_then(|i| st.types.get(i)).copied();
        match ty {
            Some(MockType::Scalar(card)) => {
                if index < 0 || index as u32 >= card {
                    st.set_error(ErrorCode::INVALID_CONSTANT_INDEX);
                    return NULL_TERM;
                }
                let existing = st.terms.iter().position(|info| {
                    matches!(&info.kind, TermKind::Constant(MockValue::Scalar { ty, index: i }) if *ty == tau && *i == index)
                });
                match existing {
                    Some(pos) => Term(pos as i32),
                    None => st.push_term(tau, TermKind::Constant(MockValue::Scalar { ty: tau, index })),
                }
            }
            Some(_) => {
                st.set_error(ErrorCode::SCALAR_OR_UTYPE_REQUIRED);
                NULL_TERM
            }
            None => {
                st.set_error(ErrorCode::INVALID_TYPE);
                NULL_TERM
            }
        }
    }
}

impl MockYices {
    /// The mock's implicant is the input formulas themselves when all hold.
    fn implicant_for_formulas_named(
        &self,
        op: &'static str,
        mdl: MockModel,
        a: &[Term],
        v: &mut MockTermVector,
    ) -> i32 {
        let mut st = self.state.borrow_mut();
        st.check_live(v.id);
        if st.enter(op) {
            return STATUS_ERROR;
        }
        for &t in a {
            match st.is_true(mdl, t) {
                STATUS_ERROR => return STATUS_ERROR,
                0 => return st.set_term_error(ErrorCode::EVAL_NO_IMPLICANT, t),
                _ => {}
            }
        }
        v.data = a.to_vec();
        STATUS_OK
    }

    /// Generalization keeps the formulas and checks that every eliminated
    /// term is a variable; it does not rewrite anything.
    fn generalize_named(
        &self,
        op: &'static str,
        mdl: MockModel,
        a: &[Term],
        elims: &[Term],
        _mode: GenMode,
        v: &mut MockTermVector,
    ) -> i32 {
        let mut st = self.state.borrow_mut();
        st.check_live(v.id);
        if st.enter(op) {
            return STATUS_ERROR;
        }
        for &x in elims {
            if !matches!(st.term(x).map(|i| &i.kind), Some(TermKind::Uninterpreted)) {
                return st.set_term_error(ErrorCode::MDL_GEN_FAILED, x);
            }
        }
        for &t in a {
            match st.is_true(mdl, t) {
                STATUS_ERROR => return STATUS_ERROR,
                0 => return st.set_term_error(ErrorCode::MDL_GEN_FAILED, t),
                _ => {}
            }
        }
        v.data = a.to_vec();
        STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_bool_value() {
        let y = MockYices::new();
        let b = y.new_variable(y.bool_type());
        let ctx = y.sat_context(vec![(b, MockValue::Bool(true))]);
        let mdl = y.get_model(ctx, true).unwrap();
        let mut out = 0;
        assert_eq!(y.get_bool_value(mdl, b, &mut out), STATUS_OK);
        assert_eq!(out, 1);
        assert!(y.kept_substitution(mdl));
        y.free_model(mdl);
        assert_eq!(y.live_models(), 0);
    }

    #[test]
    fn unsat_context_has_no_model() {
        let y = MockYices::new();
        let ctx = y.unsat_context();
        assert!(y.get_model(ctx, false).is_none());
        assert_eq!(y.error_code(), ErrorCode::CTX_INVALID_OPERATION);
    }

    #[test]
    fn constant_rejects_non_scalar_type() {
        let y = MockYices::new();
        let bool_t = y.bool_type();
        assert!(y.type_is_bool(bool_t));
        assert_eq!(y.constant(bool_t, 0), NULL_TERM);
        assert_eq!(y.error_string(), "invalid type in constant creation");
        y.clear_error();
        assert_eq!(y.error_code(), ErrorCode::NO_ERROR);
    }

    #[test]
    fn scalar_constants_are_interned() {
        let y = MockYices::new();
        let color = y.scalar_type(3);
        let a = y.constant(color, 2);
        let b = y.constant(color, 2);
        assert_eq!(a, b);
        assert_eq!(y.term_type(a), color);
        assert_eq!(y.constant(color, 3), NULL_TERM);
        assert_eq!(y.error_code(), ErrorCode::INVALID_CONSTANT_INDEX);
    }

    #[test]
    fn injected_failure_sets_error() {
        let y = MockYices::new();
        let x = y.new_variable(y.int_type());
        let ctx = y.sat_context(vec![(x, MockValue::int(3))]);
        let mdl = y.get_model(ctx, false).unwrap();
        y.fail_on("yices_get_int64_value");
        let mut out = 0;
        assert_eq!(y.get_int64_value(mdl, x, &mut out), STATUS_ERROR);
        assert_eq!(y.error_code(), INJECTED_FAILURE);
        assert_eq!(y.calls("yices_get_int64_value"), 1);
    }

    #[test]
    #[should_panic(expected = "released twice")]
    fn double_release_panics() {
        let y = MockYices::new();
        let mut v = y.init_term_vector();
        y.delete_term_vector(&mut v);
        y.delete_term_vector(&mut v);
    }

    #[test]
    fn bv_from_u64_is_lsb_first() {
        assert_eq!(MockValue::bv_from_u64(0b110, 4), MockValue::Bv(vec![0, 1, 1, 0]));
    }

    #[test]
    fn model_from_map_rejects_duplicates() {
        let y = MockYices::new();
        let int_t = y.int_type();
        let x = y.new_variable(int_t);
        let one = y.value_term(int_t, MockValue::int(1));
        assert!(y.model_from_map(&[x, x], &[one, one]).is_none());
        assert_eq!(y.error_code(), ErrorCode::MDL_DUPLICATE_VAR);
    }

    #[test]
    fn collect_defined_terms_failure_leaves_vector_empty() {
        let y = MockYices::new();
        let x = y.new_variable(y.int_type());
        let ctx = y.sat_context(vec![(x, MockValue::int(3))]);
        let mdl = y.get_model(ctx, false).unwrap();
        let mut v = y.init_term_vector();
        y.model_collect_defined_terms(mdl, &mut v);
        assert_eq!(y.term_vector_elems(&v), &[x]);

        y.fail_on("yices_model_collect_defined_terms");
        y.model_collect_defined_terms(mdl, &mut v);
        assert!(y.term_vector_elems(&v).is_empty());
        assert_eq!(y.error_code(), INJECTED_FAILURE);
        y.delete_term_vector(&mut v);
    }

    #[test]
    fn print_error_rejects_unknown_descriptor() {
        let y = MockYices::new();
        assert_eq!(y.print_error_fd(7), STATUS_ERROR);
        assert_eq!(y.error_code(), ErrorCode::OUTPUT_ERROR);
    }
}
