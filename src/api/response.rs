use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The envelope every endpoint answers with, on success and on failure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_status(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.is_success(),
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, data, message)
    }
}

impl ApiResponse<()> {
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self::with_status(status, (), message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let value = serde_json::to_value(ApiResponse::created(vec![1, 2], "done")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "statusCode": 201,
                "data": [1, 2],
                "message": "done",
                "success": true,
            })
        );
    }

    #[test]
    fn failure_envelope_has_null_data() {
        let value =
            serde_json::to_value(ApiResponse::failure(StatusCode::NOT_FOUND, "gone")).unwrap();
        assert_eq!(value["data"], serde_json::Value::Null);
        assert_eq!(value["success"], false);
        assert_eq!(value["statusCode"], 404);
    }
}
