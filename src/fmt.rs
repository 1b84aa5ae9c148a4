//! Debug formatting helpers for [`custom_debug_derive`].

use std::fmt;

/// Hides a secret while still showing whether one was set.
///
/// Use with `#[debug(with = "crate::fmt::redacted")]` on credential fields.
pub fn redacted<T>(value: &Option<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Some(_) => f.write_str("Some(\"***\")"),
        None => f.write_str("None"),
    }
}
