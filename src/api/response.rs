use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

// ============================================================================
// Result codes
// ============================================================================

/// Flat outcome taxonomy reported in every response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    InvalidRequest,
    Unexpected,
    Unauthorized,
    MissingPermission,
    AlreadyExists,
}

impl ResultCode {
    pub fn code(self) -> u8 {
        match self {
            ResultCode::Success => 0,
            ResultCode::InvalidRequest => 1,
            ResultCode::Unexpected => 2,
            ResultCode::Unauthorized => 10,
            ResultCode::MissingPermission => 11,
            ResultCode::AlreadyExists => 20,
        }
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// `{"resultCode": n, ...payload}`
#[derive(Debug, Serialize)]
pub struct Outcome<T: Serialize> {
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "resultCode")]
    pub result_code: ResultCode,
}

impl<T: Serialize> Outcome<T> {
    pub fn success(data: T) -> Json<Outcome<T>> {
        Json(Outcome {
            data: Some(data),
            message: None,
            result_code: ResultCode::Success,
        })
    }
}

/// Payload of operations that return nothing
#[derive(Debug, Serialize)]
pub struct Empty {}

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// A failed operation. Always rendered as HTTP 200 carrying its result code,
/// the transport status is not part of the contract.
#[derive(Debug)]
pub struct ApiError {
    pub code: ResultCode,
    pub message: String,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        Json(Outcome::<Empty> {
            data: None,
            message: Some(self.message),
            result_code: self.code,
        })
        .into_response()
    }
}

impl ApiError {
    pub fn new(code: ResultCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ResultCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ResultCode::Unauthorized, message)
    }

    pub fn missing_permission(message: impl Into<String>) -> Self {
        Self::new(ResultCode::MissingPermission, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ResultCode::AlreadyExists, message)
    }

    /// Internal failure; logged here, reported to the client without detail
    pub fn unexpected(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(error = %message, "Request failed unexpectedly");
        Self::new(ResultCode::Unexpected, "Unexpected error")
    }
}

// ============================================================================
// JSON body extractor
// ============================================================================

/// JSON body extractor whose failures become `InvalidRequest` outcomes.
///
/// The content type is not checked, and an empty body is the default value
/// so token-only requests may carry their token in a header instead.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_request(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(AppJson(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(AppJson)
            .map_err(|e| ApiError::invalid_request(format!("Malformed JSON body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Token {
        token: String,
    }

    #[test]
    fn test_result_code_values() {
        let codes: Vec<u8> = [
            ResultCode::Success,
            ResultCode::InvalidRequest,
            ResultCode::Unexpected,
            ResultCode::Unauthorized,
            ResultCode::MissingPermission,
            ResultCode::AlreadyExists,
        ]
        .iter()
        .map(|c| c.code())
        .collect();
        assert_eq!(codes, vec![0, 1, 2, 10, 11, 20]);
    }

    #[test]
    fn test_success_envelope_is_flat() {
        let Json(outcome) = Outcome::success(Token {
            token: "abc".to_string(),
        });
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({"resultCode": 0, "token": "abc"}));

        let Json(outcome) = Outcome::success(Empty {});
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({"resultCode": 0}));
    }

    #[test]
    fn test_failure_envelope() {
        let outcome = Outcome::<Empty> {
            data: None,
            message: Some("Invalid token".to_string()),
            result_code: ResultCode::Unauthorized,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({"resultCode": 10, "message": "Invalid token"}));
    }
}
