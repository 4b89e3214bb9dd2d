//! # yices-model
//!
//! Typed access to Yices models.
//!
//! A [`Model`] owns one native model handle and answers queries about it.
//! Typed getters return plain Rust values; [`Model::get_value`] decodes the
//! full value tree of a term into an owned [`Value`] (integers, exact
//! rationals, scalars, bit-vectors, tuples, mappings and finite functions).
//! Every native failure is reported as a [`YicesError`] naming the native
//! operation together with the library's error report.
//!
//! The crate is generic over [`yices_native::YicesApi`]; enable the
//! `libyices` feature for the real library, or `mock` for the scripted
//! in-memory backend.
//!
//! ## Usage
//!
//! ```no_run
//! # #[cfg(feature = "libyices")]
//! # fn demo(ctx: std::ptr::NonNull<yices_native::ffi::context_t>) -> yices_model::Result<()> {
//! use yices_model::{Model, Value};
//! use yices_native::{LibYices, Term};
//!
//! let api = LibYices;
//! let model = Model::from_context(&api, ctx, true)?;
//! match model.get_value(Term(42))? {
//!     Value::Function(f) => println!("{} explicit points", f.len()),
//!     other => println!("{other}"),
//! }
//! model.dispose();
//! # Ok(())
//! # }
//! ```

mod boundary;
pub mod config;
mod decode;
pub mod error;
pub mod model;
pub mod value;
mod vector;
pub mod yices;

// Re-export primary types for ergonomic use
pub use config::{DEFAULT_MAX_DEPTH, DecodeConfig};
pub use error::{Result, YicesError};
pub use model::Model;
pub use value::{FunctionValue, Mapping, ScalarValue, Value};
pub use yices::Yices;
pub use yices_native::{ErrorCode, ErrorReport, GenMode, Term, Type};
