use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

/// Error body returned by the file routes
#[derive(Debug, Deserialize)]
struct ErrorBody {
    kind: String,
    message: String,
}

impl ApiError {
    /// Build a status error, unpacking `{kind, message}` bodies when present
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(ErrorBody { kind, message }) => {
                ApiError::HttpStatus(status, format!("{}: {}", kind, message))
            }
            Err(_) => ApiError::HttpStatus(status, body),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatus(status, _) => Some(*status),
            ApiError::Reqwest(e) => e.status(),
            ApiError::UrlParse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_unpacks_error_body() {
        let err = ApiError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"kind":"not_found","message":"node not found"}"#.to_string(),
        );
        assert_eq!(err.to_string(), "HTTP status 404 Not Found: not_found: node not found");

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream".to_string());
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(err.to_string().ends_with("upstream"));
    }
}
