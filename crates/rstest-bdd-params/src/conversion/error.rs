//! Causes of a failed argument conversion.

use std::error::Error as StdError;

use thiserror::Error;

/// Reason a value could not be converted to a requested type.
///
/// Conversion failures surface to callers wrapped in
/// [`ArgumentAccessError::Conversion`](crate::ArgumentAccessError::Conversion),
/// which adds the argument's index and rendering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// Raised when a null or empty value is requested as a type that cannot
    /// represent absence.
    #[error("cannot convert a null value to `{target_type}`")]
    Null {
        /// Fully-qualified name of the requested type.
        target_type: &'static str,
    },
    /// Raised when no conversion between the two types is registered.
    #[error("no conversion from `{source_type}` to `{target_type}`")]
    Unsupported {
        /// Fully-qualified name of the stored value's type.
        source_type: &'static str,
        /// Fully-qualified name of the requested type.
        target_type: &'static str,
    },
    /// Raised when a conversion produced a value of a type other than the
    /// one requested. Registered conversions are typed, so this signals a
    /// broken invariant rather than bad input.
    #[error("conversion to `{target_type}` produced a value of another type")]
    Mistyped {
        /// Fully-qualified name of the requested type.
        target_type: &'static str,
    },
    /// Raised when text could not be parsed into the requested type.
    #[error("failed to parse '{value}' as `{target_type}`: {source}")]
    Parse {
        /// Text that failed to parse.
        value: String,
        /// Fully-qualified name of the requested type.
        target_type: &'static str,
        /// Root cause reported by the parser.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl ConversionError {
    /// Wrap a parser failure for `value`.
    pub fn parse<E>(value: impl Into<String>, target_type: &'static str, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Parse {
            value: value.into(),
            target_type,
            source: Box::new(err),
        }
    }
}
