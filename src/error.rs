use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

/// Every failure a request can end with. Each variant carries the message
/// shown to the client; `kind` is the stable machine-readable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    MissingParameter(String),
    InvalidParameter(String),
    InvalidDateFormat(String),
    InvalidRange(String),
    InvalidExpense(String),
    Unauthorized(String),
    NoExpensesFound,
    NotFound(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) => "MissingParameter",
            ApiError::InvalidParameter(_) => "InvalidParameter",
            ApiError::InvalidDateFormat(_) => "InvalidDateFormat",
            ApiError::InvalidRange(_) => "InvalidRange",
            ApiError::InvalidExpense(_) => "InvalidExpense",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::NoExpensesFound => "NoExpensesFound",
            ApiError::NotFound(_) => "NotFound",
            ApiError::Internal(_) => "Internal",
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::MissingParameter(msg)
            | ApiError::InvalidParameter(msg)
            | ApiError::InvalidDateFormat(msg)
            | ApiError::InvalidRange(msg)
            | ApiError::InvalidExpense(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg) => msg.clone(),
            ApiError::NoExpensesFound => "No expenses found.".to_string(),
            // Storage details stay in the server log
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::Internal(cause) => write!(f, "{}: {}", self.kind(), cause),
            _ => write!(f, "{}: {}", self.kind(), self.public_message()),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_)
            | ApiError::InvalidParameter(_)
            | ApiError::InvalidDateFormat(_)
            | ApiError::InvalidRange(_)
            | ApiError::InvalidExpense(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NoExpensesFound | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(cause) = self {
            tracing::error!(%cause, "request failed");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.kind(),
            message: self.public_message(),
        })
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_kinds_to_status_codes() {
        let cases = [
            (ApiError::MissingParameter("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidParameter("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidDateFormat("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidRange("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidExpense("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::NoExpensesFound, StatusCode::NOT_FOUND),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err.kind());
        }
    }

    #[actix_web::test]
    async fn body_carries_kind_and_message() {
        let response = ApiError::InvalidRange("start_date cannot be later than end_date".into())
            .error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "InvalidRange");
        assert_eq!(json["message"], "start_date cannot be later than end_date");
    }

    #[actix_web::test]
    async fn internal_errors_hide_their_cause() {
        let response = ApiError::Internal("connection reset by mongo-0".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("mongo-0"));
        assert!(text.contains("Internal server error"));
    }
}
