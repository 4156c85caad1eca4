//! Field checks for partial updates and formatting of `validator` errors.
//!
//! Create inputs use `#[derive(Validate)]`. Update inputs hold [`Patch`] fields,
//! which the derive cannot see through, so they collect failures with
//! [`FieldChecks`] instead. Both paths produce the same `field: message` lines.

use crate::{
    errors::{Error, Result},
    models::Patch,
};
use validator::{ValidateEmail, ValidateLength, ValidateRange, ValidationErrors};

/// Accumulates field failures; [`FieldChecks::finish`] turns them into an error.
#[derive(Debug, Default)]
pub struct FieldChecks {
    errors: Vec<String>,
}

impl FieldChecks {
    /// Rejects an explicit `null` on a column that cannot hold one.
    pub fn not_null<T>(&mut self, field: &str, value: &Patch<T>) {
        if value.is_null() {
            self.errors.push(format!("{field}: may not be null"));
        }
    }

    /// Character count of `value` must lie in `min..=max`.
    ///
    /// Counting is done by `validator`, the same as for `#[validate(length)]` on
    /// create inputs, so both paths agree on multi-byte text.
    pub fn length(&mut self, field: &str, value: &str, min: u64, max: u64) {
        if !value.validate_length(Some(min), Some(max), None) {
            let message = if min == 0 {
                format!("{field}: must be at most {max} characters")
            } else {
                format!("{field}: must be between {min} and {max} characters")
            };
            self.errors.push(message);
        }
    }

    /// `value` must lie in `min..=max`, both ends inclusive.
    pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64) {
        if !value.validate_range(Some(min), Some(max), None, None) {
            self.errors
                .push(format!("{field}: must be between {min} and {max}"));
        }
    }

    /// `value` must be an email address `validator` accepts.
    pub fn email(&mut self, field: &str, value: &str) {
        if !value.validate_email() {
            self.errors
                .push(format!("{field}: must be a valid email address"));
        }
    }

    /// Returns every collected failure as one `Validation` error, or `Ok` if
    /// nothing failed.
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Flattens `validator` output into sorted `field: message` lines.
#[must_use]
pub fn describe(errors: &ValidationErrors) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map_or_else(|| err.code.to_string(), ToString::to_string);
                format!("{field}: {message}")
            })
        })
        .collect();
    lines.sort();
    lines
}
