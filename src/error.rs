use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json};
use serde_json::json;
use tracing::{error, warn};

use crate::schema::EnumField;

#[derive(Debug)]
pub enum AppError {
    InvalidEnumValue(&'static EnumField),
    InvalidDate,
    NoUpdateField,
    BadRequest(&'static str),
    PayloadTooLarge,
    NotFound,
    Database(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidEnumValue(_)
            | AppError::InvalidDate
            | AppError::NoUpdateField
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidEnumValue(field) => write!(f, "Invalid Todo {}", field.label),
            AppError::InvalidDate => f.write_str("Invalid Due Date"),
            AppError::NoUpdateField => f.write_str("No Todo Field To Update"),
            AppError::BadRequest(msg) => f.write_str(msg),
            AppError::PayloadTooLarge => f.write_str("Payload Too Large"),
            AppError::NotFound => f.write_str("Todo Not Found"),
            // Storage details stay in the logs.
            AppError::Database(_) => f.write_str("Internal Server Error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Database(ref msg) = self {
            error!(error = %msg, "Datastore failure");
        }

        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

// Extractor rejections quote serde internals; only the log keeps them.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(reason = %rejection.body_text(), "Rejected request body");
        match rejection {
            JsonRejection::BytesRejection(_) => AppError::PayloadTooLarge,
            _ => AppError::BadRequest("Invalid Request Body"),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        warn!(reason = %rejection.body_text(), "Rejected todo id");
        AppError::BadRequest("Invalid Todo Id")
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(reason = %rejection.body_text(), "Rejected query string");
        AppError::BadRequest("Invalid Query String")
    }
}
