//! # advis-id
//!
//! Typed identifiers for the advis allocation service.
//!
//! All identifiers use a prefixed format: `{prefix}_{ulid}`, for example
//! `upl_01HV4Z2WQXKJNM8GPQY6VBKC3D`. The ULID part makes identifiers sort by
//! creation time, which the dashboard relies on to evict its oldest sessions
//! first.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;

/// Splits `input` into its ULID part after checking the expected prefix.
#[doc(hidden)]
pub fn parse_prefixed(input: &str, expected: &'static str) -> Result<Ulid, IdError> {
    if input.is_empty() {
        return Err(IdError::Empty);
    }

    let Some((prefix, ulid_str)) = input.split_once('_') else {
        return Err(IdError::MissingSeparator);
    };

    if prefix != expected {
        return Err(IdError::InvalidPrefix {
            expected,
            actual: prefix.to_string(),
        });
    }

    ulid_str
        .parse::<Ulid>()
        .map_err(|e| IdError::InvalidUlid(e.to_string()))
}
