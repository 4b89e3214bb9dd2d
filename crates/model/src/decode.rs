//! Recursive decoding of model value nodes into [`Value`]s.
//!
//! [`Decoder::decode`] is the only entry point. It dispatches on the node
//! tag, and composite decoders call back into it for their children with
//! the depth increased by one. Node handles never leave this module.

use num_bigint::BigInt;
use num_rational::BigRational;
use yices_native::{NULL_TYPE, Yval, YvalTag, YicesApi};

use crate::boundary::{check_status, check_term};
use crate::error::{Result, YicesError};
use crate::value::{FunctionValue, Mapping, ScalarValue, Value};
use crate::vector::YvalVec;

/// Stack left before a nested decode moves to a fresh segment (1 MB).
///
/// Native expansion calls run on the decoder's stack, so the red zone covers
/// them as well as the decoder's own frames.
const STACK_RED_ZONE: usize = 1024 * 1024;

/// Size of each fresh stack segment (8 MB).
const STACK_GROWTH_SIZE: usize = 8 * 1024 * 1024;

pub(crate) struct Decoder<'m, A: YicesApi + ?Sized> {
    api: &'m A,
    model: A::Model,
    max_depth: usize,
}

impl<'m, A: YicesApi + ?Sized> Decoder<'m, A> {
    pub(crate) fn new(api: &'m A, model: A::Model, max_depth: usize) -> Self {
        Self {
            api,
            model,
            max_depth,
        }
    }

    pub(crate) fn decode(&self, yval: &Yval) -> Result<Value> {
        self.decode_at(yval, 0)
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.max_depth {
            return Err(YicesError::RecursionLimit(self.max_depth));
        }
        Ok(())
    }

    fn decode_at(&self, yval: &Yval, depth: usize) -> Result<Value> {
        self.enter(depth)?;
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.decode_node(yval, depth)
        })
    }

    fn decode_node(&self, yval: &Yval, depth: usize) -> Result<Value> {
        tracing::trace!(
            node = yval.node_id,
            tag = yval.node_tag,
            depth,
            "decoding value node"
        );
        let tag = yval.tag().map_err(unexpected_tag)?;
        match tag {
            YvalTag::Bool => self.decode_bool(yval),
            YvalTag::Rational => self.decode_rational(yval),
            YvalTag::Scalar => self.decode_scalar(yval),
            YvalTag::Bv => self.decode_bv(yval),
            YvalTag::Algebraic => Err(YicesError::NotImplemented("algebraic number decoding")),
            YvalTag::Tuple => self.decode_tuple(yval, depth),
            YvalTag::Mapping => Ok(self
                .decode_mapping(yval, depth)?
                .map_or(Value::Absent, Value::Mapping)),
            YvalTag::Function => self.decode_function(yval, depth),
            YvalTag::Unknown => Err(unexpected_tag(tag.raw())),
        }
    }

    fn decode_bool(&self, yval: &Yval) -> Result<Value> {
        let mut val = 0;
        check_status(
            self.api,
            self.api.val_get_bool(self.model, yval, &mut val),
            "yices_val_get_bool",
        )?;
        Ok(Value::Bool(val != 0))
    }

    /// Exact integer if it fits in 64 bits, else exact fraction if both
    /// parts fit, else a float approximation.
    fn decode_rational(&self, yval: &Yval) -> Result<Value> {
        if self.api.val_is_int64(self.model, yval) {
            let mut n = 0i64;
            check_status(
                self.api,
                self.api.val_get_int64(self.model, yval, &mut n),
                "yices_val_get_int64",
            )?;
            return Ok(Value::Int(BigInt::from(n)));
        }
        if self.api.val_is_rational64(self.model, yval) {
            let mut num = 0i64;
            let mut den = 0u64;
            check_status(
                self.api,
                self.api.val_get_rational64(self.model, yval, &mut num, &mut den),
                "yices_val_get_rational64",
            )?;
            return Ok(Value::Rational(BigRational::new_raw(
                BigInt::from(num),
                BigInt::from(den),
            )));
        }
        let mut x = 0.0f64;
        check_status(
            self.api,
            self.api.val_get_double(self.model, yval, &mut x),
            "yices_val_get_double",
        )?;
        Ok(Value::Float(x))
    }

    fn decode_scalar(&self, yval: &Yval) -> Result<Value> {
        let mut index = 0;
        let mut ty = NULL_TYPE;
        check_status(
            self.api,
            self.api.val_get_scalar(self.model, yval, &mut index, &mut ty),
            "yices_val_get_scalar",
        )?;
        let constant = check_term(self.api, self.api.constant(ty, index), "yices_constant")?;
        Ok(Value::Scalar(ScalarValue {
            constant,
            ty,
            index,
        }))
    }

    fn decode_bv(&self, yval: &Yval) -> Result<Value> {
        let width = self.api.val_bitsize(self.model, yval);
        if width == 0 {
            return Ok(Value::Absent);
        }
        let mut bits = vec![0i32; width as usize];
        check_status(
            self.api,
            self.api.val_get_bv(self.model, yval, &mut bits),
            "yices_val_get_bv",
        )?;
        Ok(Value::BitVector(
            bits.into_iter().map(|b| u8::from(b != 0)).collect(),
        ))
    }

    fn decode_tuple(&self, yval: &Yval, depth: usize) -> Result<Value> {
        let arity = self.api.val_tuple_arity(self.model, yval);
        if arity == 0 {
            return Ok(Value::Absent);
        }
        let mut children = vec![Yval::default(); arity as usize];
        check_status(
            self.api,
            self.api.val_expand_tuple(self.model, yval, &mut children),
            "yices_val_expand_tuple",
        )?;
        let items = children
            .iter()
            .map(|child| self.decode_at(child, depth + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Tuple(items))
    }

    /// `None` for a mapping of arity zero.
    fn decode_mapping(&self, yval: &Yval, depth: usize) -> Result<Option<Mapping>> {
        let arity = self.api.val_mapping_arity(self.model, yval);
        if arity == 0 {
            return Ok(None);
        }
        let mut sources = vec![Yval::default(); arity as usize];
        let mut target = Yval::default();
        check_status(
            self.api,
            self.api
                .val_expand_mapping(self.model, yval, &mut sources, &mut target),
            "yices_val_expand_mapping",
        )?;
        let args = sources
            .iter()
            .map(|src| self.decode_at(src, depth + 1))
            .collect::<Result<Vec<_>>>()?;
        let result = self.decode_at(&target, depth + 1)?;
        Ok(Some(Mapping::new(args, result)))
    }

    fn decode_function(&self, yval: &Yval, depth: usize) -> Result<Value> {
        let arity = self.api.val_function_arity(self.model, yval);
        if arity == 0 {
            return Ok(Value::Absent);
        }
        let mut default = Yval::default();
        let mut entries = YvalVec::new(self.api);
        check_status(
            self.api,
            self.api
                .val_expand_function(self.model, yval, &mut default, entries.raw_mut()),
            "yices_val_expand_function",
        )?;

        let mut function = FunctionValue::new(self.decode_at(&default, depth + 1)?);
        for entry in entries.as_slice() {
            self.enter(depth + 1)?;
            if entry.tag() != Ok(YvalTag::Mapping) {
                return Err(YicesError::InternalError(format!(
                    "function entry has value tag {}",
                    entry.node_tag
                )));
            }
            let Some(mapping) = self.decode_mapping(entry, depth + 1)? else {
                return Err(YicesError::InternalError(
                    "function entry has no arguments".to_string(),
                ));
            };
            if let Some(replaced) = function.insert(mapping) {
                tracing::warn!(
                    %replaced,
                    "duplicate function entry, keeping the later result"
                );
            }
        }
        Ok(Value::Function(function))
    }
}

fn unexpected_tag(raw: i32) -> YicesError {
    YicesError::InternalError(format!("unexpected value tag {raw}"))
}
