//! Registry of conversions an accessor may apply before a cast fails.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use log::{debug, trace};

use super::{ConversionError, builtin};
use crate::argument::Argument;
use crate::config;
use crate::types::TypeDescriptor;

type BoxedValue = Box<dyn Any + Send + Sync>;
type Converter =
    Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Result<BoxedValue, ConversionError> + Send + Sync>;
type ConversionKey = (TypeId, TypeId);

/// Erased view of `Option<T>` used to chain boxing with other conversions.
#[derive(Clone, Copy)]
struct OptionShape {
    inner: TypeDescriptor,
    empty: fn() -> BoxedValue,
    wrap: fn(BoxedValue) -> Option<BoxedValue>,
    unwrap: fn(&(dyn Any + Send + Sync)) -> Option<BoxedValue>,
}

impl OptionShape {
    fn of<T: Any + Clone + Send + Sync>() -> Self {
        Self {
            inner: TypeDescriptor::of::<T>(),
            empty: empty_option::<T>,
            wrap: wrap_some::<T>,
            unwrap: unwrap_some::<T>,
        }
    }
}

fn empty_option<T: Any + Send + Sync>() -> BoxedValue {
    Box::new(None::<T>)
}

fn wrap_some<T: Any + Send + Sync>(value: BoxedValue) -> Option<BoxedValue> {
    let value = value.downcast::<T>().ok()?;
    Some(Box::new(Some(*value)) as BoxedValue)
}

/// Clone the content of an `Option<T>`; `None` when it is empty.
fn unwrap_some<T: Any + Clone + Send + Sync>(
    value: &(dyn Any + Send + Sync),
) -> Option<BoxedValue> {
    let inner = value.downcast_ref::<Option<T>>()?.clone()?;
    Some(Box::new(inner) as BoxedValue)
}

fn unsupported(source: TypeDescriptor, target: TypeDescriptor) -> ConversionError {
    ConversionError::Unsupported {
        source_type: source.name(),
        target_type: target.name(),
    }
}

/// Report a failed intermediate hop against the outer request.
fn restate(
    err: ConversionError,
    source: TypeDescriptor,
    target: TypeDescriptor,
) -> ConversionError {
    match err {
        ConversionError::Unsupported { .. } => unsupported(source, target),
        other => other,
    }
}

/// Conversions available to an [`ArgumentsAccessor`](crate::ArgumentsAccessor).
///
/// The context is consulted only when the stored value's type differs from
/// the requested one. Types registered with
/// [`register_optional`](Self::register_optional) combine with every other
/// conversion: a `u8` reads as `Option<u32>` and `Some(7_u8)` reads as `u32`
/// whenever `u8` widens to `u32`. [`ConversionContext::new`] carries the built-in
/// conversions; [`ConversionContext::empty`] accepts exact type matches only.
///
/// # Examples
///
/// ```
/// use rstest_bdd_params::{Argument, ConversionContext, ConversionError, TypeDescriptor};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Celsius(f64);
///
/// let mut context = ConversionContext::empty();
/// context.register(|value: &f64| Ok::<_, ConversionError>(Celsius(*value)));
///
/// let converted = context
///     .convert(&Argument::from(21.5_f64), TypeDescriptor::of::<Celsius>())
///     .unwrap();
/// assert_eq!(converted.downcast_ref::<Celsius>(), Some(&Celsius(21.5)));
/// ```
#[derive(Clone)]
pub struct ConversionContext {
    converters: HashMap<ConversionKey, Converter>,
    optionals: HashMap<TypeId, OptionShape>,
}

impl ConversionContext {
    /// Build a context with the built-in conversions.
    ///
    /// Text-to-scalar parsing is included when
    /// [`config::implicit_string_conversion`] is enabled.
    #[must_use]
    pub fn new() -> Self {
        let mut context = Self::empty();
        builtin::register_optionals(&mut context);
        builtin::register_widening(&mut context);
        builtin::register_text(&mut context);
        if config::implicit_string_conversion() {
            builtin::register_parsing(&mut context);
        }
        context
    }

    /// Build a context without conversions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
            optionals: HashMap::new(),
        }
    }

    /// Register a conversion from `S` to `T`, replacing any previous one.
    pub fn register<S, T, E, F>(&mut self, converter: F) -> &mut Self
    where
        S: Any,
        T: Any + Send + Sync,
        E: Into<ConversionError>,
        F: Fn(&S) -> Result<T, E> + Send + Sync + 'static,
    {
        let source = TypeDescriptor::of::<S>();
        let target = TypeDescriptor::of::<T>();
        let erased: Converter = Arc::new(move |value: &(dyn Any + Send + Sync)| {
            let typed = value
                .downcast_ref::<S>()
                .ok_or_else(|| ConversionError::Unsupported {
                    source_type: source.name(),
                    target_type: target.name(),
                })?;
            converter(typed)
                .map(|converted| Box::new(converted) as BoxedValue)
                .map_err(Into::into)
        });
        let key = (source.id(), target.id());
        if self.converters.insert(key, erased).is_some() {
            debug!("replaced conversion from `{source}` to `{target}`");
        }
        self
    }

    /// Treat `Option<S>` as the nullable counterpart of `S`.
    ///
    /// Registers `S → Option<S>`, `Option<S> → S` (failing on `None`) and
    /// lets the null argument convert to `Option<S>`. Conversions into `S`
    /// also reach `Option<S>`, and conversions out of `S` also accept a
    /// populated `Option<S>`.
    pub fn register_optional<S>(&mut self) -> &mut Self
    where
        S: Any + Clone + Send + Sync,
    {
        self.register(|value: &S| Ok::<_, ConversionError>(Some(value.clone())));
        self.register(|value: &Option<S>| {
            value.clone().ok_or_else(|| ConversionError::Null {
                target_type: std::any::type_name::<S>(),
            })
        });
        self.optionals
            .insert(TypeId::of::<Option<S>>(), OptionShape::of::<S>());
        self
    }

    /// Returns `true` when a value of `source` can be requested as `target`.
    #[must_use]
    pub fn supports(&self, source: TypeDescriptor, target: TypeDescriptor) -> bool {
        if source == target || self.converters.contains_key(&(source.id(), target.id())) {
            return true;
        }
        let through_target = self
            .optionals
            .get(&target.id())
            .is_some_and(|shape| shape.inner != source && self.supports(source, shape.inner));
        through_target
            || self
                .optionals
                .get(&source.id())
                .is_some_and(|shape| self.supports(shape.inner, target))
    }

    /// Returns `true` when the null argument can be requested as `target`.
    #[must_use]
    pub fn accepts_null(&self, target: TypeDescriptor) -> bool {
        self.optionals.contains_key(&target.id())
    }

    /// Number of registered conversions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns `true` when no conversions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Convert `argument` to the type described by `target`.
    ///
    /// # Errors
    ///
    /// - [`ConversionError::Null`] when the argument is null and `target` is
    ///   not nullable, or an empty `Option` is unwrapped.
    /// - [`ConversionError::Unsupported`] when no conversion is registered.
    /// - [`ConversionError::Parse`] when text parsing fails.
    /// - [`ConversionError::Mistyped`] when a conversion breaks its own
    ///   signature.
    pub fn convert(
        &self,
        argument: &Argument,
        target: TypeDescriptor,
    ) -> Result<BoxedValue, ConversionError> {
        let (Some(value), Some(source_id)) = (argument.as_any(), argument.type_id()) else {
            trace!("converting null to `{target}`");
            return self
                .optionals
                .get(&target.id())
                .map(|shape| (shape.empty)())
                .ok_or_else(|| ConversionError::Null {
                    target_type: target.name(),
                });
        };
        if source_id == target.id() {
            return argument.clone_value().ok_or_else(|| ConversionError::Null {
                target_type: target.name(),
            });
        }
        let source = TypeDescriptor::erased(source_id, argument.type_name());
        self.convert_value(value, source, target)
    }

    /// Direct conversion first, then through the `Option` shape of the
    /// target, then through the `Option` shape of the source. Every hop
    /// strips one `Option` layer, so the recursion terminates.
    fn convert_value(
        &self,
        value: &(dyn Any + Send + Sync),
        source: TypeDescriptor,
        target: TypeDescriptor,
    ) -> Result<BoxedValue, ConversionError> {
        trace!("converting `{source}` to `{target}`");
        if let Some(converter) = self.converters.get(&(source.id(), target.id())) {
            return converter(value);
        }
        let source_shape = self.optionals.get(&source.id());
        let target_shape = self
            .optionals
            .get(&target.id())
            .filter(|shape| shape.inner != source);
        if let Some(target_shape) = target_shape {
            if source_shape.is_some_and(|shape| (shape.unwrap)(value).is_none()) {
                return Ok((target_shape.empty)());
            }
            let inner = self
                .convert_value(value, source, target_shape.inner)
                .map_err(|err| restate(err, source, target))?;
            return (target_shape.wrap)(inner).ok_or_else(|| ConversionError::Mistyped {
                target_type: target.name(),
            });
        }
        let Some(shape) = source_shape else {
            return Err(unsupported(source, target));
        };
        let inner = (shape.unwrap)(value).ok_or_else(|| ConversionError::Null {
            target_type: target.name(),
        })?;
        if shape.inner == target {
            return Ok(inner);
        }
        self.convert_value(&*inner, shape.inner, target)
            .map_err(|err| restate(err, source, target))
    }
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConversionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionContext")
            .field("converters", &self.converters.len())
            .field("optionals", &self.optionals.len())
            .finish()
    }
}
