use thiserror::Error;

/// Document store operation errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl StoreError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => Self::Validation(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            429 => Self::RateLimited(message),
            500..=599 => Self::Server { status, message },
            _ => Self::UnexpectedResponse(format!("HTTP {status}: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(StoreError::from_status(400, "bad"), StoreError::Validation(_)));
        assert!(matches!(StoreError::from_status(401, "x"), StoreError::Unauthorized(_)));
        assert!(matches!(StoreError::from_status(403, "x"), StoreError::Forbidden(_)));
        assert!(matches!(StoreError::from_status(404, "x"), StoreError::NotFound(_)));
        assert!(matches!(StoreError::from_status(409, "x"), StoreError::Conflict(_)));
        assert!(matches!(StoreError::from_status(429, "x"), StoreError::RateLimited(_)));
        assert!(matches!(
            StoreError::from_status(502, "x"),
            StoreError::Server { status: 502, .. }
        ));
        match StoreError::from_status(418, "teapot") {
            StoreError::UnexpectedResponse(msg) => assert_eq!(msg, "HTTP 418: teapot"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
