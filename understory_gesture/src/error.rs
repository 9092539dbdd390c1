// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration validation errors.
//!
//! Invalid configuration is a programmer error: setters and `attach_*`
//! panic with the [`ConfigError`] message. Call a config's `validate` first
//! when values come from somewhere untrusted.

use core::fmt;

use crate::state::GestureKind;

/// Why a recognizer configuration was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A count that must be at least one was zero.
    ZeroCount {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The minimum touch count exceeds the maximum.
    TouchRange {
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: usize,
    },
    /// A distance, speed or angle threshold was negative, zero where zero is
    /// meaningless, or not finite.
    Threshold {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCount { field } => write!(f, "`{field}` must be at least 1"),
            Self::TouchRange { min, max } => {
                write!(f, "minimum touch count {min} exceeds maximum {max}")
            }
            Self::Threshold { field, value } => {
                write!(f, "`{field}` has invalid value {value}")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

pub(crate) fn check_count(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroCount { field });
    }
    Ok(())
}

pub(crate) fn check_range(min: usize, max: usize) -> Result<(), ConfigError> {
    check_count("min_touches", min)?;
    if max < min {
        return Err(ConfigError::TouchRange { min, max });
    }
    Ok(())
}

/// Accepts finite values `>= 0`, or `> 0` when `allow_zero` is false.
pub(crate) fn check_threshold(
    field: &'static str,
    value: f64,
    allow_zero: bool,
) -> Result<(), ConfigError> {
    let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if !ok {
        return Err(ConfigError::Threshold { field, value });
    }
    Ok(())
}

#[track_caller]
pub(crate) fn assert_valid(kind: GestureKind, result: Result<(), ConfigError>) {
    if let Err(err) = result {
        panic!("invalid {kind:?} configuration: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn thresholds() {
        assert!(check_threshold("d", 0.0, true).is_ok());
        assert!(check_threshold("d", 0.0, false).is_err());
        assert!(check_threshold("d", -1.0, true).is_err());
        assert!(check_threshold("d", f64::INFINITY, true).is_err());
        assert!(check_threshold("d", f64::NAN, true).is_err());
        assert!(check_threshold("d", 6.0, false).is_ok());
    }

    #[test]
    fn ranges() {
        assert!(check_range(1, usize::MAX).is_ok());
        assert_eq!(
            check_range(0, 3),
            Err(ConfigError::ZeroCount {
                field: "min_touches"
            })
        );
        assert_eq!(
            check_range(3, 2),
            Err(ConfigError::TouchRange { min: 3, max: 2 })
        );
    }

    #[test]
    fn messages_name_the_field() {
        let err = ConfigError::Threshold {
            field: "move_hysteresis",
            value: -2.0,
        };
        assert_eq!(err.to_string(), "`move_hysteresis` has invalid value -2");
        assert_eq!(
            ConfigError::TouchRange { min: 3, max: 2 }.to_string(),
            "minimum touch count 3 exceeds maximum 2"
        );
    }

    #[test]
    #[should_panic(expected = "invalid Pan configuration")]
    fn assert_valid_panics_on_error() {
        assert_valid(GestureKind::Pan, check_range(0, 1));
    }
}
