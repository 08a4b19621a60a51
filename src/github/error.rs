//! Error taxonomy for the GitHub API boundary
//!
//! The driver logic distinguishes four signals: not-found (skip the scope
//! value), forbidden/throttled (gate and retry), unprocessable (drop the
//! query), and everything else (fatal to the run).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404 - the user, org or other resource does not exist.
    #[error("not found")]
    NotFound,

    /// 403 or 429 - primary or secondary rate limit, or abuse detection.
    #[error("forbidden or rate limited")]
    Forbidden,

    /// 422 - the query itself was rejected (e.g. an empty scope filter).
    #[error("query rejected: {0}")]
    Unprocessable(String),

    /// Any other non-success status. Fatal to the run.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// Transport-level failure (DNS, TLS, connection, body decode).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Local I/O failure (e.g. the two-factor prompt).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Map an HTTP status code to the taxonomy above.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => ApiError::NotFound,
            403 | 429 => ApiError::Forbidden,
            422 => ApiError::Unprocessable(message),
            _ => ApiError::Status { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_not_found() {
        assert!(matches!(
            ApiError::from_status(404, String::new()),
            ApiError::NotFound
        ));
    }

    #[test]
    fn test_from_status_throttle_signals() {
        assert!(matches!(
            ApiError::from_status(403, String::new()),
            ApiError::Forbidden
        ));
        assert!(matches!(
            ApiError::from_status(429, String::new()),
            ApiError::Forbidden
        ));
    }

    #[test]
    fn test_from_status_unprocessable_keeps_message() {
        match ApiError::from_status(422, "Validation Failed".to_string()) {
            ApiError::Unprocessable(msg) => assert_eq!(msg, "Validation Failed"),
            other => panic!("expected Unprocessable, got {:?}", other),
        }
    }

    #[test]
    fn test_from_status_other_is_generic() {
        match ApiError::from_status(500, "boom".to_string()) {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Status, got {:?}", other),
        }
    }
}
