//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use masquerade_core::error::DomainError;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the caller's user id.
pub const MODERATOR_HEADER: &str = "x-moderator-id";

/// The caller issuing a game action, taken from [`MODERATOR_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moderator(pub Uuid);

/// Reads the caller id from `headers`.
///
/// # Errors
///
/// Returns a `Validation` error if the header is absent or not a UUID.
pub fn moderator_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let value = headers.get(MODERATOR_HEADER).ok_or_else(|| {
        ApiError(DomainError::Validation(format!(
            "missing {MODERATOR_HEADER} header"
        )))
    })?;
    value
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .ok_or_else(|| {
            ApiError(DomainError::Validation(format!(
                "{MODERATOR_HEADER} header must be a UUID"
            )))
        })
}

impl<S: Send + Sync> FromRequestParts<S> for Moderator {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        moderator_id(&parts.headers).map(Moderator)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_moderator_id_parses_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(MODERATOR_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());

        assert_eq!(moderator_id(&headers).unwrap(), id);
    }

    #[test]
    fn test_missing_or_malformed_header_is_a_validation_error() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            moderator_id(&headers),
            Err(ApiError(DomainError::Validation(_)))
        ));

        headers.insert(MODERATOR_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(
            moderator_id(&headers),
            Err(ApiError(DomainError::Validation(_)))
        ));
    }
}
