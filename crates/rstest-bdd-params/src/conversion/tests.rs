//! Tests for the conversion registry and the built-in conversions.

use std::any::Any;

use rstest::{fixture, rstest};
use serial_test::serial;

use super::{ConversionContext, ConversionError};
use crate::argument::Argument;
use crate::config;
use crate::types::TypeDescriptor;

#[fixture]
fn context() -> ConversionContext {
    ConversionContext::new()
}

fn convert_to<T: Any>(
    context: &ConversionContext,
    argument: &Argument,
) -> Result<T, ConversionError> {
    let converted = context.convert(argument, TypeDescriptor::of::<T>())?;
    match converted.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => panic!("conversion produced a value of the wrong type"),
    }
}

#[rstest]
fn exact_type_is_cloned(context: ConversionContext) {
    let argument = Argument::from(String::from("kept"));
    let value = convert_to::<String>(&context, &argument)
        .unwrap_or_else(|err| panic!("exact match should convert: {err}"));
    assert_eq!(value, "kept");
}

#[rstest]
fn empty_context_accepts_exact_matches_only() {
    let context = ConversionContext::empty();
    assert!(context.is_empty());
    assert_eq!(convert_to::<i32>(&context, &Argument::from(5_i32)).ok(), Some(5));
    let err = convert_to::<Option<i32>>(&context, &Argument::from(5_i32))
        .err()
        .unwrap_or_else(|| panic!("boxing requires a registered conversion"));
    assert!(matches!(
        err,
        ConversionError::Unsupported {
            source_type: "i32",
            target_type: "core::option::Option<i32>",
        }
    ));
}

#[rstest]
fn scalars_box_into_options(context: ConversionContext) {
    assert_eq!(
        convert_to::<Option<i32>>(&context, &Argument::from(1_i32)).ok(),
        Some(Some(1))
    );
    assert_eq!(
        convert_to::<Option<char>>(&context, &Argument::from('A')).ok(),
        Some(Some('A'))
    );
}

#[rstest]
fn options_unbox_into_scalars(context: ConversionContext) {
    assert_eq!(
        convert_to::<char>(&context, &Argument::from(Some('A'))).ok(),
        Some('A')
    );
    let err = convert_to::<char>(&context, &Argument::from(None::<char>))
        .err()
        .unwrap_or_else(|| panic!("an empty option cannot unbox"));
    assert_eq!(err.to_string(), "cannot convert a null value to `char`");
}

#[rstest]
fn null_converts_only_to_nullable_targets(context: ConversionContext) {
    assert_eq!(
        convert_to::<Option<u16>>(&context, &Argument::null()).ok(),
        Some(None)
    );
    assert!(context.accepts_null(TypeDescriptor::of::<Option<u16>>()));
    assert!(!context.accepts_null(TypeDescriptor::of::<u16>()));
    let err = convert_to::<u16>(&context, &Argument::null())
        .err()
        .unwrap_or_else(|| panic!("null must not convert to a scalar"));
    assert!(matches!(err, ConversionError::Null { target_type: "u16" }));
}

#[rstest]
#[case(Argument::from(7_i8), 7_i64)]
#[case(Argument::from(7_i16), 7_i64)]
#[case(Argument::from(7_i32), 7_i64)]
#[case(Argument::from(7_u8), 7_i64)]
#[case(Argument::from(7_u16), 7_i64)]
#[case(Argument::from(7_u32), 7_i64)]
fn integers_widen_losslessly(
    context: ConversionContext,
    #[case] argument: Argument,
    #[case] expected: i64,
) {
    assert_eq!(convert_to::<i64>(&context, &argument).ok(), Some(expected));
}

#[rstest]
fn narrowing_is_not_offered(context: ConversionContext) {
    assert!(!context.supports(TypeDescriptor::of::<i64>(), TypeDescriptor::of::<i32>()));
    assert!(!context.supports(TypeDescriptor::of::<i32>(), TypeDescriptor::of::<char>()));
    assert!(context.supports(TypeDescriptor::of::<char>(), TypeDescriptor::of::<u32>()));
    assert!(context.supports(TypeDescriptor::of::<f32>(), TypeDescriptor::of::<f64>()));
}

#[rstest]
fn boxing_chains_with_widening(context: ConversionContext) {
    assert_eq!(
        convert_to::<Option<u64>>(&context, &Argument::from(7_u8)).ok(),
        Some(Some(7))
    );
    assert_eq!(
        convert_to::<u64>(&context, &Argument::from(Some(7_u8))).ok(),
        Some(7)
    );
    assert_eq!(
        convert_to::<Option<u64>>(&context, &Argument::from(Some(7_u8))).ok(),
        Some(Some(7))
    );
    assert_eq!(
        convert_to::<Option<u64>>(&context, &Argument::from(None::<u8>)).ok(),
        Some(None)
    );
    assert!(context.supports(
        TypeDescriptor::of::<u8>(),
        TypeDescriptor::of::<Option<u64>>()
    ));
    assert!(context.supports(
        TypeDescriptor::of::<Option<u8>>(),
        TypeDescriptor::of::<u64>()
    ));
    assert!(!context.supports(
        TypeDescriptor::of::<Option<u64>>(),
        TypeDescriptor::of::<u8>()
    ));
}

#[rstest]
fn boxing_chain_reports_the_outer_types(context: ConversionContext) {
    let err = convert_to::<char>(&context, &Argument::from(Some(1_i64)))
        .err()
        .unwrap_or_else(|| panic!("i64 must not read as char"));
    assert_eq!(
        err.to_string(),
        "no conversion from `core::option::Option<i64>` to `char`"
    );
}

#[rstest]
#[serial]
fn boxing_chains_with_parsing() {
    config::set_implicit_string_conversion(true);
    let context = ConversionContext::new();
    config::clear_implicit_string_conversion_override();
    assert_eq!(
        convert_to::<Option<u32>>(&context, &Argument::from("42")).ok(),
        Some(Some(42))
    );
    let err = convert_to::<Option<u8>>(&context, &Argument::from("300"))
        .err()
        .unwrap_or_else(|| panic!("300 does not fit in u8"));
    assert!(matches!(err, ConversionError::Parse { target_type: "u8", .. }));
}

#[test]
fn mistyped_conversions_name_the_requested_type() {
    let err = ConversionError::Mistyped { target_type: "u32" };
    assert_eq!(
        err.to_string(),
        "conversion to `u32` produced a value of another type"
    );
}

#[rstest]
fn borrowed_text_becomes_owned(context: ConversionContext) {
    assert_eq!(
        convert_to::<String>(&context, &Argument::from("owned")).ok(),
        Some(String::from("owned"))
    );
}

#[rstest]
#[serial]
fn text_parses_into_scalars() {
    config::clear_implicit_string_conversion_override();
    let context = ConversionContext::new();
    assert_eq!(convert_to::<u32>(&context, &Argument::from("42")).ok(), Some(42));
    assert_eq!(
        convert_to::<i64>(&context, &Argument::from(String::from("-9"))).ok(),
        Some(-9)
    );
    assert_eq!(convert_to::<char>(&context, &Argument::from("Z")).ok(), Some('Z'));
    assert_eq!(convert_to::<bool>(&context, &Argument::from("TRUE")).ok(), Some(true));
    assert_eq!(convert_to::<bool>(&context, &Argument::from("false")).ok(), Some(false));
}

#[rstest]
#[serial]
fn unparsable_text_reports_the_parser_error() {
    config::clear_implicit_string_conversion_override();
    let context = ConversionContext::new();
    let err = convert_to::<u8>(&context, &Argument::from("300"))
        .err()
        .unwrap_or_else(|| panic!("300 does not fit in u8"));
    assert_eq!(
        err.to_string(),
        "failed to parse '300' as `u8`: number too large to fit in target type"
    );
    let err = convert_to::<char>(&context, &Argument::from("AB"))
        .err()
        .unwrap_or_else(|| panic!("two characters do not make a char"));
    assert!(matches!(err, ConversionError::Parse { target_type: "char", .. }));
}

#[rstest]
#[serial]
fn parsing_can_be_disabled() {
    config::set_implicit_string_conversion(false);
    let context = ConversionContext::new();
    config::clear_implicit_string_conversion_override();
    assert!(!context.supports(
        TypeDescriptor::of::<&'static str>(),
        TypeDescriptor::of::<u32>()
    ));
    assert!(context.supports(
        TypeDescriptor::of::<&'static str>(),
        TypeDescriptor::of::<String>()
    ));
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Celsius(i32);

#[rstest]
fn custom_conversions_can_be_registered() {
    let mut context = ConversionContext::empty();
    context.register(|value: &i32| Ok::<_, ConversionError>(Celsius(*value)));
    assert_eq!(context.len(), 1);
    assert_eq!(
        convert_to::<Celsius>(&context, &Argument::from(21_i32)).ok(),
        Some(Celsius(21))
    );
}

#[rstest]
fn registering_again_replaces_the_conversion() {
    let mut context = ConversionContext::empty();
    context.register(|value: &i32| Ok::<_, ConversionError>(Celsius(*value)));
    context.register(|value: &i32| Ok::<_, ConversionError>(Celsius(value * 10)));
    assert_eq!(context.len(), 1);
    assert_eq!(
        convert_to::<Celsius>(&context, &Argument::from(2_i32)).ok(),
        Some(Celsius(20))
    );
}

#[rstest]
fn custom_conversions_may_fail() {
    let mut context = ConversionContext::empty();
    context.register(|value: &i32| {
        if *value < -273 {
            Err(ConversionError::Unsupported {
                source_type: "i32",
                target_type: "below absolute zero",
            })
        } else {
            Ok(Celsius(*value))
        }
    });
    assert!(convert_to::<Celsius>(&context, &Argument::from(-300_i32)).is_err());
}
