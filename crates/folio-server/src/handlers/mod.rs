//! HTTP request handlers.

pub(crate) mod contact;
pub(crate) mod notes;
pub(crate) mod quotes;
pub(crate) mod service;

use crate::error::ServerError;

/// Apply the default to an optional `limit` and check it lies in `min..=max`.
pub(crate) fn check_limit(
    limit: Option<usize>,
    default: usize,
    max: usize,
) -> Result<usize, ServerError> {
    let limit = limit.unwrap_or(default);
    if (1..=max).contains(&limit) {
        Ok(limit)
    } else {
        Err(ServerError::Validation(format!(
            "limit must be between 1 and {max}"
        )))
    }
}
