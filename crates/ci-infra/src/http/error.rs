use ci_core::ports::ApiError;
use reqwest::StatusCode;

use super::dto::ErrorBody;

pub(crate) fn map_reqwest_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        return ApiError::Timeout;
    }
    if let Some(status) = error.status() {
        return map_status_code(status, error.to_string());
    }
    if error.is_decode() {
        return ApiError::Decode(error.to_string());
    }
    ApiError::Network(error.to_string())
}

pub(crate) fn map_status_code(code: StatusCode, message: String) -> ApiError {
    match code {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiError::Timeout,
        _ => ApiError::Status {
            code: code.as_u16(),
            message,
        },
    }
}

/// Prefer the backend's `message` field over the raw body.
pub(crate) fn error_message(body: &str, code: StatusCode) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        return message;
    }
    let body = body.trim();
    if body.is_empty() {
        code.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.to_string()
    }
}
