use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::{ErrorKind, FileServiceError};

/// Failure of any file route, rendered as `{kind, message}`
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    #[error(transparent)]
    Service(#[from] FileServiceError),
    #[error("node not found: {0}")]
    UnknownId(String),
    #[error("invalid request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
}

impl FilesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilesError::Service(e) => e.kind(),
            FilesError::UnknownId(_) => ErrorKind::NotFound,
            FilesError::BadRequest(_) => ErrorKind::ValidationError,
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidParent | ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            FilesError::Service(e) => e.public_message(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for FilesError {
    fn from(rejection: JsonRejection) -> Self {
        FilesError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for FilesError {
    fn from(rejection: QueryRejection) -> Self {
        FilesError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for FilesError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "file request failed");
        } else {
            tracing::debug!(error = %self, "file request rejected");
        }
        let body = ErrorResponse {
            kind: self.kind().as_str().to_string(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Ids arrive as free-form strings; anything that is not a uuid cannot
///  name a node.
pub fn parse_id(raw: &str) -> Result<Uuid, FilesError> {
    Uuid::parse_str(raw).map_err(|_| FilesError::UnknownId(raw.to_string()))
}
