use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Envelope shared by every endpoint: `{status, success, message, data?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn ok<T: Serialize>(message: &str, data: T) -> Response {
    let body = ApiResponse {
        status: StatusCode::OK.as_u16(),
        success: true,
        message: message.to_string(),
        data: Some(data),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn ok_empty(message: &str) -> Response {
    let body = ApiResponse::<()> {
        status: StatusCode::OK.as_u16(),
        success: true,
        message: message.to_string(),
        data: None,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn fail(status: StatusCode, message: &str) -> Response {
    let body = ApiResponse::<()> {
        status: status.as_u16(),
        success: false,
        message: message.to_string(),
        data: None,
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_data() {
        let body = ApiResponse::<()> {
            status: 401,
            success: false,
            message: "unauthorized".into(),
            data: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], 401);
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn envelope_carries_data() {
        let body = ApiResponse {
            status: 200,
            success: true,
            message: "ok".into(),
            data: Some(serde_json::json!({"user": {"id": 1}})),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["data"]["user"]["id"], 1);
    }
}
