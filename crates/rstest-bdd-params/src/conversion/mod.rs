//! Conversions applied when an argument is requested as a type other than the
//! one it was stored with.
//!
//! Rust has no boxed primitives, so the boxing rules of a managed runtime map
//! onto `Option`: a scalar `T` and `Option<T>` satisfy each other when the
//! value is present, and the null argument satisfies `Option<T>` only. On top
//! of that the default context widens numbers losslessly and parses text into
//! scalars.

mod builtin;
mod context;
mod error;

pub use context::ConversionContext;
pub use error::ConversionError;

#[cfg(test)]
mod tests;
