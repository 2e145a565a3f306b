//! Positional, type-checked access to the arguments of one test invocation.
//!
//! The execution context builds one [`ArgumentsAccessor`] per invocation and
//! hands it to the test body. The accessor never changes after construction:
//! every read either returns a value or an [`ArgumentAccessError`], and a
//! failed read leaves the accessor usable for later reads.

use std::any::Any;
use std::sync::Arc;

use log::{debug, trace};

use crate::argument::Argument;
use crate::conversion::{ConversionContext, ConversionError};
use crate::error::ArgumentAccessError;
use crate::types::{ArgumentType, TypeDescriptor};

/// Read-only view over the ordered arguments of a single invocation.
///
/// Typed reads clone the stored value when its type matches the request and
/// otherwise consult the accessor's [`ConversionContext`].
///
/// # Examples
///
/// ```
/// use rstest_bdd_params::{ArgumentType, arguments};
///
/// let accessor = arguments![1; 1_i32, 'A'];
/// assert_eq!(accessor.len(), 2);
///
/// let number: i32 = accessor.get_typed(0).unwrap();
/// assert_eq!(number, 1);
/// assert_eq!(accessor.get_as(1, ArgumentType::<char>::new()).unwrap(), 'A');
///
/// let err = accessor.get_typed::<char>(0).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Argument at index [0] with value [1] and type [i32] could not be converted or cast to type [char]."
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentsAccessor {
    invocation_index: usize,
    context: Arc<ConversionContext>,
    arguments: Arc<[Argument]>,
}

impl ArgumentsAccessor {
    /// Wrap `arguments` for the invocation identified by `invocation_index`.
    ///
    /// The arguments are taken verbatim; no validation is performed.
    #[must_use]
    pub fn new(
        invocation_index: usize,
        context: Arc<ConversionContext>,
        arguments: impl Into<Arc<[Argument]>>,
    ) -> Self {
        Self {
            invocation_index,
            context,
            arguments: arguments.into(),
        }
    }

    /// Wrap `arguments` using a freshly built default [`ConversionContext`].
    #[must_use]
    pub fn from_arguments(invocation_index: usize, arguments: impl Into<Arc<[Argument]>>) -> Self {
        Self::new(
            invocation_index,
            Arc::new(ConversionContext::new()),
            arguments,
        )
    }

    /// Index of the invocation that produced these arguments.
    #[must_use]
    pub const fn invocation_index(&self) -> usize {
        self.invocation_index
    }

    /// Conversions consulted by typed reads.
    #[must_use]
    pub fn context(&self) -> &ConversionContext {
        &self.context
    }

    /// Number of arguments bound to the invocation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Returns `true` when the invocation has no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Raw argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentAccessError::IndexOutOfBounds`] when `index` is not
    /// below [`len`](Self::len).
    pub fn get(&self, index: usize) -> Result<&Argument, ArgumentAccessError> {
        self.arguments
            .get(index)
            .ok_or_else(|| ArgumentAccessError::IndexOutOfBounds {
                index,
                len: self.arguments.len(),
            })
    }

    /// Argument at `index` as the type named by `expected`.
    ///
    /// # Errors
    ///
    /// - [`ArgumentAccessError::IndexOutOfBounds`] when `index` is not below
    ///   [`len`](Self::len).
    /// - [`ArgumentAccessError::Conversion`] when the value is neither of type
    ///   `T` nor convertible to it.
    pub fn get_as<T: Any>(
        &self,
        index: usize,
        expected: ArgumentType<T>,
    ) -> Result<T, ArgumentAccessError> {
        let target = expected.descriptor();
        let argument = self.get(index)?;
        self.convert(index, argument, target)?
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| {
                let source = ConversionError::Mistyped {
                    target_type: target.name(),
                };
                self.conversion_failure(index, argument, target, source)
            })
    }

    /// Argument at `index` as the type inferred at the call site.
    ///
    /// Behaves exactly like [`get_as`](Self::get_as) with
    /// `ArgumentType::<T>::new()`.
    ///
    /// # Errors
    ///
    /// See [`get_as`](Self::get_as).
    pub fn get_typed<T: Any>(&self, index: usize) -> Result<T, ArgumentAccessError> {
        self.get_as(index, ArgumentType::<T>::new())
    }

    /// Argument at `index` converted to `target`, still type-erased.
    ///
    /// # Errors
    ///
    /// See [`get_as`](Self::get_as).
    pub fn get_erased(
        &self,
        index: usize,
        target: TypeDescriptor,
    ) -> Result<Box<dyn Any + Send + Sync>, ArgumentAccessError> {
        let argument = self.get(index)?;
        self.convert(index, argument, target)
    }

    fn convert(
        &self,
        index: usize,
        argument: &Argument,
        target: TypeDescriptor,
    ) -> Result<Box<dyn Any + Send + Sync>, ArgumentAccessError> {
        trace!(
            "invocation {}: reading argument {index} as `{target}`",
            self.invocation_index
        );
        self.context
            .convert(argument, target)
            .map_err(|source| self.conversion_failure(index, argument, target, source))
    }

    fn conversion_failure(
        &self,
        index: usize,
        argument: &Argument,
        target: TypeDescriptor,
        source: ConversionError,
    ) -> ArgumentAccessError {
        debug!(
            "invocation {}: argument {index} of type `{}` is not a `{target}`: {source}",
            self.invocation_index,
            argument.type_name()
        );
        ArgumentAccessError::Conversion {
            index,
            value: argument.to_string(),
            actual_type: argument.type_name(),
            expected_type: target.name(),
            source,
        }
    }

    /// Shared access to the arguments in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[Argument] {
        &self.arguments
    }

    /// Returns an iterator over the arguments.
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.arguments.iter()
    }

    /// Copy the arguments into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Argument> {
        self.arguments.to_vec()
    }
}

macro_rules! typed_getters {
    ($($name:ident => $ty:ty),* $(,)?) => {
        impl ArgumentsAccessor {
            $(
                #[doc = concat!("Argument at `index` as `", stringify!($ty), "`.")]
                ///
                /// # Errors
                ///
                /// See [`get_as`](Self::get_as).
                pub fn $name(&self, index: usize) -> Result<$ty, ArgumentAccessError> {
                    self.get_typed::<$ty>(index)
                }
            )*
        }
    };
}

typed_getters!(
    get_bool => bool,
    get_char => char,
    get_i8 => i8,
    get_i16 => i16,
    get_i32 => i32,
    get_i64 => i64,
    get_u8 => u8,
    get_u16 => u16,
    get_u32 => u32,
    get_u64 => u64,
    get_f32 => f32,
    get_f64 => f64,
    get_string => String,
);

impl<'a> IntoIterator for &'a ArgumentsAccessor {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
