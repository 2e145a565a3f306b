//! Runtime configuration for argument conversion.
//!
//! The module exposes the `implicit_string_conversion` flag controlling
//! whether [`ConversionContext::new`](crate::ConversionContext::new) installs
//! the text-to-scalar conversions. Contexts read the flag once, when they are
//! built.

use std::sync::atomic::{AtomicU8, Ordering};

use log::warn;

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_FALSE: u8 = 1;
const OVERRIDE_TRUE: u8 = 2;

/// Environment variable consulted when no in-process override is set.
pub const STRING_CONVERSION_ENV: &str = "RSTEST_BDD_PARAMS_STRING_CONVERSION";

static STRING_CONVERSION_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

/// Interpret a flag value, ignoring case and surrounding whitespace.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn override_state() -> Option<bool> {
    match STRING_CONVERSION_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_FALSE => Some(false),
        OVERRIDE_TRUE => Some(true),
        _ => None,
    }
}

/// The override wins over the environment; an unset or unrecognised
/// environment value leaves parsing enabled.
fn resolve(overridden: Option<bool>, env_value: Option<&str>) -> bool {
    overridden
        .or_else(|| {
            let value = env_value?;
            let parsed = parse_flag(value);
            if parsed.is_none() {
                warn!("ignoring unrecognised {STRING_CONVERSION_ENV} value '{value}'");
            }
            parsed
        })
        .unwrap_or(true)
}

/// Determine whether default contexts parse text into scalars.
#[must_use]
pub fn implicit_string_conversion() -> bool {
    let env_value = std::env::var(STRING_CONVERSION_ENV).ok();
    resolve(override_state(), env_value.as_deref())
}

/// Override the `implicit_string_conversion` flag for the current process.
///
/// Tests may call [`clear_implicit_string_conversion_override`] to restore
/// environment driven behaviour after toggling the override.
pub fn set_implicit_string_conversion(enabled: bool) {
    let value = if enabled {
        OVERRIDE_TRUE
    } else {
        OVERRIDE_FALSE
    };
    STRING_CONVERSION_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Remove any in-process override for the `implicit_string_conversion` flag.
pub fn clear_implicit_string_conversion_override() {
    STRING_CONVERSION_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;

    #[test]
    fn unset_flag_leaves_parsing_enabled() {
        assert!(resolve(None, None));
    }

    #[rstest]
    #[case::numeric_on("1", true)]
    #[case::numeric_off("0", false)]
    #[case::mixed_case("Yes", true)]
    #[case::shouting("OFF", false)]
    #[case::padded(" false ", false)]
    #[case::unrecognised_keeps_default("maybe", true)]
    #[case::empty_keeps_default("", true)]
    fn environment_value_controls_parsing(#[case] env_value: &str, #[case] expected: bool) {
        assert_eq!(resolve(None, Some(env_value)), expected);
    }

    #[rstest]
    #[case(true, "off")]
    #[case(false, "on")]
    #[case(false, "maybe")]
    fn override_wins_over_environment(#[case] overridden: bool, #[case] env_value: &str) {
        assert_eq!(resolve(Some(overridden), Some(env_value)), overridden);
    }

    #[test]
    #[serial]
    fn override_sets_flag() {
        set_implicit_string_conversion(false);
        assert!(!implicit_string_conversion());
        set_implicit_string_conversion(true);
        assert!(implicit_string_conversion());
        clear_implicit_string_conversion_override();
        assert_eq!(override_state(), None);
    }
}
