//! Owned Rust representation of decoded model values.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use serde::{Deserialize, Serialize};
use yices_native::{Term, Type};

/// A fully decoded model value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// "No value": the native library reported an empty bit-vector or a
    /// composite of arity zero.
    Absent,
    Bool(bool),
    Int(BigInt),
    /// Exact rational as the library produced it. The fraction is not
    /// reduced; equality still compares numerically.
    Rational(BigRational),
    /// Approximation of a rational too large for a 64-bit numerator and
    /// denominator.
    Float(f64),
    Scalar(ScalarValue),
    /// Bits (each 0 or 1) in the order the library returns them.
    BitVector(Vec<u8>),
    Tuple(Vec<Value>),
    Mapping(Mapping),
    Function(FunctionValue),
}

/// An element of an enumerated type, re-materialized as a constant term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScalarValue {
    /// `yices_constant(ty, index)`.
    pub constant: Term,
    pub ty: Type,
    pub index: i32,
}

/// One point of a function graph: `args ↦ result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub args: Vec<Value>,
    pub result: Box<Value>,
}

impl Mapping {
    pub fn new(args: Vec<Value>, result: Value) -> Self {
        Self {
            args,
            result: Box::new(result),
        }
    }
}

/// A finite function: explicit points plus a default for everything else.
///
/// Entries are unique by argument tuple and keep the order in which the
/// library listed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionValue {
    default: Box<Value>,
    entries: Vec<Mapping>,
}

impl FunctionValue {
    pub fn new(default: Value) -> Self {
        Self {
            default: Box::new(default),
            entries: Vec::new(),
        }
    }

    /// Build from a default and a list of points. A later point with the
    /// same arguments replaces an earlier one in place.
    pub fn from_mappings(default: Value, mappings: impl IntoIterator<Item = Mapping>) -> Self {
        let mut f = Self::new(default);
        for m in mappings {
            f.insert(m);
        }
        f
    }

    /// Add a point; returns the result it replaced, if any.
    pub fn insert(&mut self, mapping: Mapping) -> Option<Value> {
        match self.entries.iter_mut().find(|e| e.args == mapping.args) {
            Some(existing) => Some(*std::mem::replace(&mut existing.result, mapping.result)),
            None => {
                self.entries.push(mapping);
                None
            }
        }
    }

    /// Value of the function at `args`: the explicit point if there is
    /// one, the default otherwise.
    pub fn apply(&self, args: &[Value]) -> &Value {
        self.get(args).unwrap_or(&self.default)
    }

    /// The explicit point at `args`, without falling back to the default.
    pub fn get(&self, args: &[Value]) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.args.as_slice() == args)
            .map(|e| e.result.as_ref())
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn entries(&self) -> &[Mapping] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Value::Rational(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bits(&self) -> Option<&[u8]> {
        match self {
            Value::BitVector(bits) => Some(bits),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Int(n)
    }
}

impl From<BigRational> for Value {
    fn from(r: BigRational) -> Self {
        Value::Rational(r)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "<absent>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Value::Float(x) => write!(f, "{x}"),
            Value::Scalar(s) => write!(f, "{}!{}", s.ty, s.index),
            Value::BitVector(bits) => {
                write!(f, "#b")?;
                // Most significant bit first, as in SMT-LIB literals.
                for bit in bits.iter().rev() {
                    write!(f, "{bit}")?;
                }
                Ok(())
            }
            Value::Tuple(items) => {
                write!(f, "(mk-tuple ")?;
                write_list(f, items)?;
                write!(f, ")")
            }
            Value::Mapping(m) => {
                write!(f, "(")?;
                write_list(f, &m.args)?;
                write!(f, " |-> {})", m.result)
            }
            Value::Function(func) => {
                write!(f, "(function")?;
                for m in func.entries() {
                    write!(f, " (")?;
                    write_list(f, &m.args)?;
                    write!(f, " |-> {})", m.result)?;
                }
                write!(f, " (default {}))", func.default_value())
            }
        }
    }
}
