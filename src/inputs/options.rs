use std::str::FromStr;

use crate::core::InputError;

/// Coerce `true`/`false` in any case. Anything else leaves the option unset.
pub fn to_boolean(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Coerce a base-10 number. Empty text leaves the option unset, text that
/// does not parse is rejected.
pub fn to_number<T: FromStr>(name: &str, value: &str) -> Result<Option<T>, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    value.parse::<T>().map(Some).map_err(|_| InputError::InvalidNumber {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Pass text through, treating empty text as unset
pub fn to_string(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
