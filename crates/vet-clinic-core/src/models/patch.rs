//! Partial-update helpers.
//!
//! A patch field is `Option<Option<T>>`:
//!
//! - `None`: the field was absent, leave the stored value alone
//! - `Some(None)`: the field was an explicit `null`
//! - `Some(Some(v))`: the field was set to `v` (empty strings included)

use serde::{Deserialize, Deserializer};

use crate::error::{ClinicError, ClinicResult};

/// Deserialize a present field (including `null`) as `Some(..)`.
///
/// Combine with `#[serde(default)]` so an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Resolve a patch entry for a required field.
///
/// Returns `Ok(None)` when the field was absent. Rejects `null` and blank strings.
pub fn required_text(field: &str, value: Option<Option<String>>) -> ClinicResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(None) => Err(ClinicError::Validation(format!("{field} cannot be null"))),
        Some(Some(text)) => require_text(field, Some(text)).map(Some),
    }
}

/// Require a non-blank string.
pub fn require_text(field: &str, value: Option<String>) -> ClinicResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ClinicError::Validation(format!("{field} is required"))),
    }
}

/// Overwrite `target` only if the patch carried the field.
pub fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
