use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::types::ErrorResponse;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Check the `X-API-Key` header against the configured secret.
///
/// Missing and wrong keys are both rejected with 403.
pub fn ensure_api_key(
    headers: &HeaderMap,
    expected: &str,
) -> std::result::Result<(), (StatusCode, Json<ErrorResponse>)> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    match provided {
        Some(key) if key == expected => Ok(()),
        Some(_) => Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                detail: "Invalid API key".to_string(),
            }),
        )),
        None => Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                detail: "Not authenticated".to_string(),
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_api_key_checks() {
        let mut headers = HeaderMap::new();
        let (status, body) = ensure_api_key(&headers, "secret").unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.0.detail, "Not authenticated");

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("wrong"));
        let (status, _) = ensure_api_key(&headers, "secret").unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("secret"));
        assert!(ensure_api_key(&headers, "secret").is_ok());
    }
}
