//! Public macro helpers exported by `rstest-bdd-params`.
//!
//! The macros live in a dedicated module to keep `lib.rs` small and focused on
//! type exports. They remain available at the crate root via `#[macro_export]`.

/// Build an [`ArgumentsAccessor`](crate::ArgumentsAccessor) from literal
/// values.
///
/// The invocation index comes first, followed by a semicolon and the
/// arguments in declaration order. Each value is converted with
/// [`Argument::from`](crate::Argument), so scalars, strings and their
/// `Option`s can be written directly; wrap other values with
/// [`Argument::new`](crate::Argument::new) or use
/// [`Argument::null`](crate::Argument::null) for an absent value.
///
/// # Examples
///
/// ```
/// use rstest_bdd_params::{Argument, arguments};
///
/// let accessor = arguments![2; 1_i32, "two", Argument::null()];
/// assert_eq!(accessor.invocation_index(), 2);
/// assert_eq!(accessor.len(), 3);
///
/// let empty = arguments![1];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! arguments {
    ($index:expr $(,)?) => {
        $crate::ArgumentsAccessor::from_arguments(
            $index,
            ::std::vec::Vec::<$crate::Argument>::new(),
        )
    };
    ($index:expr; $($value:expr),* $(,)?) => {
        $crate::ArgumentsAccessor::from_arguments(
            $index,
            ::std::vec![$(<$crate::Argument as ::std::convert::From<_>>::from($value)),*],
        )
    };
}
