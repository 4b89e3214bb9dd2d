//! # yices-native
//!
//! Native boundary of the Yices model API.
//!
//! This crate holds the plain-data handle types shared with the C library,
//! the [`YicesApi`] trait that the model layer programs against, and two
//! implementations of it:
//!
//! - `LibYices` (feature `libyices`): `extern "C"` bindings to the system
//!   `libyices`.
//! - `MockYices` (feature `mock`): an in-memory scripted solver for tests.
//!
//! The trait keeps the C conventions (status codes, sentinel handles,
//! out-parameters). Turning those into `Result`s is left to `yices-model`.

pub mod api;
pub mod types;

#[cfg(feature = "libyices")]
pub mod ffi;
#[cfg(feature = "libyices")]
mod libyices;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use api::{STATUS_ERROR, STATUS_OK, YicesApi};
pub use types::{ErrorCode, ErrorReport, GenMode, NULL_TERM, NULL_TYPE, Term, Type, Yval, YvalTag};

#[cfg(feature = "libyices")]
pub use libyices::LibYices;

#[cfg(feature = "mock")]
pub use mock::{MockContext, MockModel, MockValue, MockYices, VectorCounters};
