//! Built-in conversions installed by [`ConversionContext::new`].

use std::any::{Any, type_name};
use std::error::Error as StdError;
use std::str::FromStr;

use super::{ConversionContext, ConversionError};

macro_rules! optionals {
    ($context:ident: $($ty:ty),* $(,)?) => {
        $($context.register_optional::<$ty>();)*
    };
}

macro_rules! widen {
    ($context:ident: $($from:ty => [$($to:ty),* $(,)?]);* $(;)?) => {
        $($(
            $context.register(|value: &$from| Ok::<_, ConversionError>(<$to>::from(*value)));
        )*)*
    };
}

macro_rules! parse_from_text {
    ($context:ident: $($ty:ty),* $(,)?) => {
        $(
            $context.register(|value: &String| parse_text::<$ty>(value));
            $context.register(|value: &&'static str| parse_text::<$ty>(value));
        )*
    };
}

/// `T` ⇄ `Option<T>` for every scalar type and `String`.
pub(super) fn register_optionals(context: &mut ConversionContext) {
    optionals!(context:
        bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
        String, &'static str,
    );
}

/// Lossless widening, mirroring the standard library's `From` impls.
pub(super) fn register_widening(context: &mut ConversionContext) {
    widen!(context:
        i8 => [i16, i32, i64, i128, isize, f32, f64];
        i16 => [i32, i64, i128, isize, f32, f64];
        i32 => [i64, i128, f64];
        i64 => [i128];
        u8 => [u16, u32, u64, u128, usize, i16, i32, i64, i128, isize, f32, f64];
        u16 => [u32, u64, u128, usize, i32, i64, i128, f32, f64];
        u32 => [u64, u128, i64, i128, f64];
        u64 => [u128, i128];
        f32 => [f64];
        char => [u32, u64, u128];
    );
}

/// Borrowed text to owned text.
pub(super) fn register_text(context: &mut ConversionContext) {
    context.register(|value: &&'static str| Ok::<_, ConversionError>((*value).to_owned()));
}

/// Text to scalar parsing.
pub(super) fn register_parsing(context: &mut ConversionContext) {
    parse_from_text!(context:
        char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    );
    context.register(|value: &String| parse_bool(value));
    context.register(|value: &&'static str| parse_bool(value));
}

fn parse_text<T>(text: &str) -> Result<T, ConversionError>
where
    T: FromStr + Any,
    T::Err: StdError + Send + Sync + 'static,
{
    text.parse::<T>()
        .map_err(|err| ConversionError::parse(text, type_name::<T>(), err))
}

fn parse_bool(text: &str) -> Result<bool, ConversionError> {
    text.to_ascii_lowercase()
        .parse::<bool>()
        .map_err(|err| ConversionError::parse(text, type_name::<bool>(), err))
}
