//! Positional access to the arguments of a parameterized test invocation.
//!
//! A parameterized test runs once per argument set. For each run the execution
//! context builds an [`ArgumentsAccessor`] over the ordered arguments, and the
//! test body reads them by position, either raw via
//! [`ArgumentsAccessor::get`] or as a concrete type via
//! [`ArgumentsAccessor::get_typed`] and [`ArgumentsAccessor::get_as`].
//!
//! Typed reads accept the stored type itself and anything the accessor's
//! [`ConversionContext`] can convert it to. Failures carry a fixed message
//! naming the index, the value, and both types, so tests can assert on it
//! exactly.
//!
//! ```
//! use rstest_bdd_params::arguments;
//!
//! let accessor = arguments![1; 1_i32];
//! let err = accessor.get_char(0).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Argument at index [0] with value [1] and type [i32] could not be converted or cast to type [char]."
//! );
//! ```

mod accessor;
mod argument;
pub mod config;
pub mod conversion;
mod error;
mod macros;
mod types;

pub use accessor::ArgumentsAccessor;
pub use argument::Argument;
pub use conversion::{ConversionContext, ConversionError};
pub use error::ArgumentAccessError;
pub use types::{ArgumentType, TypeDescriptor};
