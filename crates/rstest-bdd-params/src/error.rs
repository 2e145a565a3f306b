//! Error types surfaced by the arguments accessor.

use thiserror::Error;

use crate::conversion::ConversionError;

/// Errors raised when reading an argument from an
/// [`ArgumentsAccessor`](crate::ArgumentsAccessor).
///
/// A failed read never invalidates the accessor; later reads behave as if the
/// failure had not happened.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArgumentAccessError {
    /// Raised when the requested position lies outside the invocation's
    /// arguments.
    #[error("argument index {index} is out of range: index must be >= 0 and < {len}")]
    IndexOutOfBounds {
        /// Zero-based position that was requested.
        index: usize,
        /// Number of arguments bound to the invocation.
        len: usize,
    },
    /// Raised when the argument cannot be converted or cast to the requested
    /// type.
    #[error(
        "Argument at index [{index}] with value [{value}] and type [{actual_type}] could not be converted or cast to type [{expected_type}]."
    )]
    Conversion {
        /// Zero-based position of the argument.
        index: usize,
        /// Rendered value of the argument.
        value: String,
        /// Fully-qualified type name of the stored value.
        actual_type: &'static str,
        /// Fully-qualified type name that was requested.
        expected_type: &'static str,
        /// Reason the conversion failed.
        #[source]
        source: ConversionError,
    },
}

impl ArgumentAccessError {
    /// Returns `true` for [`ArgumentAccessError::IndexOutOfBounds`].
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::IndexOutOfBounds { .. })
    }

    /// Returns `true` for [`ArgumentAccessError::Conversion`].
    #[must_use]
    pub const fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }
}
