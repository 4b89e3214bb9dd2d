//! Plain-data handles shared by every implementation of the native API.
//!
//! These mirror the integer and struct typedefs of `yices_types.h`. None of
//! them own native memory: terms and types are indices into the solver's
//! global tables, and a [`Yval`] is a node reference into one model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A term handle (`term_t`).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term(pub i32);

/// A type handle (`type_t`).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Type(pub i32);

/// Sentinel returned by term-producing calls on failure.
pub const NULL_TERM: Term = Term(-1);

/// Sentinel returned by type-producing calls on failure.
pub const NULL_TYPE: Type = Type(-1);

impl Term {
    pub fn is_null(self) -> bool {
        self == NULL_TERM
    }
}

impl Type {
    pub fn is_null(self) -> bool {
        self == NULL_TYPE
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "term#{}", self.0)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Discriminant of a model value node (`yval_tag_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YvalTag {
    Unknown,
    Bool,
    Rational,
    Algebraic,
    Bv,
    Scalar,
    Tuple,
    Function,
    Mapping,
}

impl YvalTag {
    /// The native enumeration value.
    pub fn raw(self) -> i32 {
        match self {
            YvalTag::Unknown => 0,
            YvalTag::Bool => 1,
            YvalTag::Rational => 2,
            YvalTag::Algebraic => 3,
            YvalTag::Bv => 4,
            YvalTag::Scalar => 5,
            YvalTag::Tuple => 6,
            YvalTag::Function => 7,
            YvalTag::Mapping => 8,
        }
    }
}

impl TryFrom<i32> for YvalTag {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(YvalTag::Unknown),
            1 => Ok(YvalTag::Bool),
            2 => Ok(YvalTag::Rational),
            3 => Ok(YvalTag::Algebraic),
            4 => Ok(YvalTag::Bv),
            5 => Ok(YvalTag::Scalar),
            6 => Ok(YvalTag::Tuple),
            7 => Ok(YvalTag::Function),
            8 => Ok(YvalTag::Mapping),
            other => Err(other),
        }
    }
}

impl fmt::Display for YvalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            YvalTag::Unknown => "unknown",
            YvalTag::Bool => "bool",
            YvalTag::Rational => "rational",
            YvalTag::Algebraic => "algebraic",
            YvalTag::Bv => "bv",
            YvalTag::Scalar => "scalar",
            YvalTag::Tuple => "tuple",
            YvalTag::Function => "function",
            YvalTag::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

/// One node of a model's value tree (`yval_t`).
///
/// The node id is only meaningful to the model that produced it, and only
/// until that model is freed. The tag is kept raw so that a tag unknown to
/// this binding survives the trip across the boundary and can be reported.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Yval {
    pub node_id: i32,
    pub node_tag: i32,
}

impl Yval {
    pub fn new(node_id: i32, tag: YvalTag) -> Self {
        Self {
            node_id,
            node_tag: tag.raw(),
        }
    }

    /// Decode the raw tag; `Err` carries a value outside the native enumeration.
    pub fn tag(&self) -> Result<YvalTag, i32> {
        YvalTag::try_from(self.node_tag)
    }
}

/// Model generalization mode (`yices_gen_mode_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GenMode {
    /// Let the solver pick substitution or projection from the variable types.
    #[default]
    Default,
    BySubstitution,
    ByProjection,
}

impl GenMode {
    pub fn raw(self) -> i32 {
        match self {
            GenMode::Default => 0,
            GenMode::BySubstitution => 1,
            GenMode::ByProjection => 2,
        }
    }
}

impl fmt::Display for GenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenMode::Default => write!(f, "default"),
            GenMode::BySubstitution => write!(f, "by-substitution"),
            GenMode::ByProjection => write!(f, "by-projection"),
        }
    }
}

impl std::str::FromStr for GenMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(GenMode::Default),
            "subst" | "by-substitution" | "substitution" => Ok(GenMode::BySubstitution),
            "proj" | "by-projection" | "projection" => Ok(GenMode::ByProjection),
            _ => Err(format!(
                "Unknown generalization mode: {s}. Valid options: default, by-substitution, by-projection"
            )),
        }
    }
}

/// Native error code (`error_code_t`).
///
/// Only the codes this workspace inspects by name are listed; any other
/// value the library reports is carried through unchanged.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    pub const NO_ERROR: ErrorCode = ErrorCode(0);
    pub const INVALID_TYPE: ErrorCode = ErrorCode(1);
    pub const INVALID_TERM: ErrorCode = ErrorCode(2);
    pub const INVALID_CONSTANT_INDEX: ErrorCode = ErrorCode(3);
    // 4 (INVALID_VAR_INDEX) is reserved and no longer reported.
    pub const NONNEG_INT_REQUIRED: ErrorCode = ErrorCode(19);
    pub const SCALAR_OR_UTYPE_REQUIRED: ErrorCode = ErrorCode(20);
    pub const WRONG_NUMBER_OF_ARGUMENTS: ErrorCode = ErrorCode(27);
    pub const TYPE_MISMATCH: ErrorCode = ErrorCode(28);
    pub const CTX_INVALID_OPERATION: ErrorCode = ErrorCode(400);
    pub const EVAL_UNKNOWN_TERM: ErrorCode = ErrorCode(600);
    pub const EVAL_CONVERSION_FAILED: ErrorCode = ErrorCode(606);
    pub const EVAL_NO_IMPLICANT: ErrorCode = ErrorCode(607);
    pub const MDL_CONSTANT_REQUIRED: ErrorCode = ErrorCode(701);
    pub const MDL_DUPLICATE_VAR: ErrorCode = ErrorCode(702);
    pub const YVAL_INVALID_OP: ErrorCode = ErrorCode(800);
    pub const YVAL_OVERFLOW: ErrorCode = ErrorCode(801);
    pub const MDL_GEN_FAILED: ErrorCode = ErrorCode(902);
    pub const OUTPUT_ERROR: ErrorCode = ErrorCode(9000);
    pub const INTERNAL_EXCEPTION: ErrorCode = ErrorCode(9999);

    pub fn is_error(self) -> bool {
        self != ErrorCode::NO_ERROR
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the native error report (`error_report_t`) plus its message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub line: u32,
    pub column: u32,
    pub term1: Term,
    pub type1: Type,
    pub term2: Term,
    pub type2: Type,
    pub badval: i64,
    /// Text of `yices_error_string` at the time of the snapshot.
    pub message: String,
}

impl Default for Term {
    fn default() -> Self {
        NULL_TERM
    }
}

impl Default for Type {
    fn default() -> Self {
        NULL_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_through_raw() {
        for raw in 0..=8 {
            let tag = YvalTag::try_from(raw).unwrap();
            assert_eq!(tag.raw(), raw);
        }
    }

    #[test]
    fn unknown_raw_tag_is_rejected() {
        assert_eq!(YvalTag::try_from(9), Err(9));
        assert_eq!(YvalTag::try_from(-3), Err(-3));
        let yval = Yval {
            node_id: 4,
            node_tag: 42,
        };
        assert_eq!(yval.tag(), Err(42));
    }

    #[test]
    fn null_sentinels() {
        assert!(NULL_TERM.is_null());
        assert!(NULL_TYPE.is_null());
        assert!(!Term(0).is_null());
        assert_eq!(Term::default(), NULL_TERM);
    }

    #[test]
    fn gen_mode_from_str() {
        assert_eq!("default".parse::<GenMode>().unwrap(), GenMode::Default);
        assert_eq!("subst".parse::<GenMode>().unwrap(), GenMode::BySubstitution);
        assert_eq!(
            "By-Projection".parse::<GenMode>().unwrap(),
            GenMode::ByProjection
        );
        assert!("eliminate".parse::<GenMode>().is_err());
    }

    #[test]
    fn gen_mode_raw_values() {
        assert_eq!(GenMode::Default.raw(), 0);
        assert_eq!(GenMode::BySubstitution.raw(), 1);
        assert_eq!(GenMode::ByProjection.raw(), 2);
        assert_eq!(GenMode::ByProjection.to_string(), "by-projection");
    }

    #[test]
    fn error_code_no_error() {
        assert!(!ErrorCode::NO_ERROR.is_error());
        assert!(ErrorCode::INVALID_TERM.is_error());
        assert_eq!(ErrorReport::default().code, ErrorCode::NO_ERROR);
    }

    #[test]
    fn error_codes_match_native_numbering() {
        let codes = [
            (ErrorCode::INVALID_CONSTANT_INDEX, 3),
            (ErrorCode::NONNEG_INT_REQUIRED, 19),
            (ErrorCode::SCALAR_OR_UTYPE_REQUIRED, 20),
            (ErrorCode::WRONG_NUMBER_OF_ARGUMENTS, 27),
            (ErrorCode::TYPE_MISMATCH, 28),
            (ErrorCode::CTX_INVALID_OPERATION, 400),
            (ErrorCode::EVAL_UNKNOWN_TERM, 600),
            (ErrorCode::EVAL_NO_IMPLICANT, 607),
            (ErrorCode::MDL_DUPLICATE_VAR, 702),
            (ErrorCode::YVAL_INVALID_OP, 800),
            (ErrorCode::MDL_GEN_FAILED, 902),
            (ErrorCode::OUTPUT_ERROR, 9000),
            (ErrorCode::INTERNAL_EXCEPTION, 9999),
        ];
        for (code, raw) in codes {
            assert_eq!(code.0, raw);
        }
    }
}
