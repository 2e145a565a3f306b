//! Type-erased invocation arguments.
//!
//! An [`Argument`] owns one value of any `'static + Clone + Send + Sync` type,
//! or nothing at all for the null argument. Alongside the value it remembers
//! the fully-qualified type name and how to render the value, so conversion
//! failures can be reported without knowing the concrete type.

use std::any::{Any, TypeId, type_name};
use std::fmt;

const NULL: &str = "null";

trait ErasedValue: Send + Sync {
    fn as_any(&self) -> &(dyn Any + Send + Sync);
    fn value_type_id(&self) -> TypeId;
    fn value_type_name(&self) -> &'static str;
    fn clone_value(&self) -> Box<dyn Any + Send + Sync>;
    fn clone_erased(&self) -> Box<dyn ErasedValue>;
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! erased_value {
    ($wrapper:ident, $bound:ident, |$value:ident, $f:ident| $render:expr) => {
        #[derive(Clone)]
        struct $wrapper<T>(T);

        impl<T> ErasedValue for $wrapper<T>
        where
            T: Any + Clone + Send + Sync + fmt::$bound,
        {
            fn as_any(&self) -> &(dyn Any + Send + Sync) {
                &self.0
            }

            fn value_type_id(&self) -> TypeId {
                TypeId::of::<T>()
            }

            fn value_type_name(&self) -> &'static str {
                type_name::<T>()
            }

            fn clone_value(&self) -> Box<dyn Any + Send + Sync> {
                Box::new(self.0.clone())
            }

            fn clone_erased(&self) -> Box<dyn ErasedValue> {
                Box::new(self.clone())
            }

            fn render(&self, $f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let $value = &self.0;
                $render
            }
        }
    };
}

erased_value!(Debugged, Debug, |value, f| fmt::Debug::fmt(value, f));
erased_value!(Displayed, Display, |value, f| fmt::Display::fmt(value, f));

#[derive(Clone)]
struct Optional<T>(Option<T>);

impl<T> ErasedValue for Optional<T>
where
    T: Any + Clone + Send + Sync + fmt::Display,
{
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        &self.0
    }

    fn value_type_id(&self) -> TypeId {
        TypeId::of::<Option<T>>()
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<Option<T>>()
    }

    fn clone_value(&self) -> Box<dyn Any + Send + Sync> {
        Box::new(self.0.clone())
    }

    fn clone_erased(&self) -> Box<dyn ErasedValue> {
        Box::new(self.clone())
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = &self.0 else {
            return f.write_str(NULL);
        };
        fmt::Display::fmt(value, f)
    }
}

/// One argument of a test invocation.
///
/// # Examples
///
/// ```
/// use rstest_bdd_params::Argument;
///
/// let argument = Argument::from(7_i32);
/// assert_eq!(argument.type_name(), "i32");
/// assert_eq!(argument.to_string(), "7");
/// assert_eq!(argument.downcast_ref::<i32>(), Some(&7));
///
/// assert!(Argument::null().is_null());
/// ```
pub struct Argument {
    value: Option<Box<dyn ErasedValue>>,
}

impl Argument {
    /// Wrap a value rendered with its [`Debug`](fmt::Debug) implementation.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + Send + Sync + fmt::Debug,
    {
        Self {
            value: Some(Box::new(Debugged(value))),
        }
    }

    /// Wrap a value rendered with its [`Display`](fmt::Display)
    /// implementation.
    #[must_use]
    pub fn displayed<T>(value: T) -> Self
    where
        T: Any + Clone + Send + Sync + fmt::Display,
    {
        Self {
            value: Some(Box::new(Displayed(value))),
        }
    }

    /// Wrap an optional value. `None` renders as `null` but keeps the
    /// `Option<T>` type, unlike [`Argument::null`].
    #[must_use]
    pub fn optional<T>(value: Option<T>) -> Self
    where
        T: Any + Clone + Send + Sync + fmt::Display,
    {
        Self {
            value: Some(Box::new(Optional(value))),
        }
    }

    /// The null argument: no value and no type.
    #[must_use]
    pub const fn null() -> Self {
        Self { value: None }
    }

    /// Returns `true` for the null argument.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Fully-qualified type name of the stored value, or `null`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.value
            .as_ref()
            .map_or(NULL, |value| value.value_type_name())
    }

    /// Identity of the stored value's type; `None` for the null argument.
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.value.as_ref().map(|value| value.value_type_id())
    }

    /// Borrow the stored value when it has exactly the type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any()?.downcast_ref::<T>()
    }

    /// Borrow the stored value as [`Any`].
    #[must_use]
    pub fn as_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.value.as_ref().map(|value| value.as_any())
    }

    /// Clone the stored value into a fresh box.
    pub(crate) fn clone_value(&self) -> Option<Box<dyn Any + Send + Sync>> {
        self.value.as_ref().map(|value| value.clone_value())
    }
}

impl Clone for Argument {
    fn clone(&self) -> Self {
        Self {
            value: self.value.as_ref().map(|value| value.clone_erased()),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = &self.value else {
            return f.write_str(NULL);
        };
        value.render(f)
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("type", &self.type_name())
            .field("value", &format_args!("{self}"))
            .finish()
    }
}

macro_rules! scalar_arguments {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Self::displayed(value)
                }
            }

            impl From<Option<$ty>> for Argument {
                fn from(value: Option<$ty>) -> Self {
                    Self::optional(value)
                }
            }
        )*
    };
}

scalar_arguments!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);
