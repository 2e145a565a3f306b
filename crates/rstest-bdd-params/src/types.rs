//! Type descriptors used to request a target type from an accessor.
//!
//! [`TypeDescriptor`] pairs a [`TypeId`] with the fully-qualified type name
//! reported in diagnostics. [`ArgumentType`] is its typed counterpart: callers
//! pass it to [`ArgumentsAccessor::get_as`](crate::ArgumentsAccessor::get_as)
//! to name the expected type explicitly instead of relying on inference.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Erased identity of a Rust type together with its fully-qualified name.
///
/// Equality and hashing consider the [`TypeId`] only.
///
/// # Examples
///
/// ```
/// use rstest_bdd_params::TypeDescriptor;
///
/// let descriptor = TypeDescriptor::of::<String>();
/// assert_eq!(descriptor.name(), "alloc::string::String");
/// assert_eq!(descriptor, TypeDescriptor::of::<String>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    /// Describe the type `T`.
    #[must_use]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Descriptor for a type known only through its erased identity.
    pub(crate) const fn erased(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Identity of the described type.
    #[must_use]
    pub const fn id(self) -> TypeId {
        self.id
    }

    /// Fully-qualified name of the described type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns `true` when the descriptor names `T`.
    #[must_use]
    pub fn is<T: Any + ?Sized>(self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Typed handle naming the type a caller expects an argument to have.
///
/// # Examples
///
/// ```
/// use rstest_bdd_params::{ArgumentType, arguments};
///
/// let accessor = arguments![1; 'A'];
/// let letter = accessor.get_as(0, ArgumentType::<char>::new()).unwrap();
/// assert_eq!(letter, 'A');
/// ```
pub struct ArgumentType<T: ?Sized>(PhantomData<fn() -> T>);

impl<T: Any + ?Sized> ArgumentType<T> {
    /// Create a handle for `T`.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    /// Erase the handle into a [`TypeDescriptor`].
    #[must_use]
    pub fn descriptor(self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }
}

impl<T: Any + ?Sized> Default for ArgumentType<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for ArgumentType<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ArgumentType<T> {}

impl<T: ?Sized> fmt::Debug for ArgumentType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArgumentType")
            .field(&type_name::<T>())
            .finish()
    }
}

impl<T: Any + ?Sized> From<ArgumentType<T>> for TypeDescriptor {
    fn from(value: ArgumentType<T>) -> Self {
        value.descriptor()
    }
}
