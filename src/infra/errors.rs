// src/infra/errors.rs — Error types for pulsedeck

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulsedeckError {
    // Authorization failure. Handling this clears the session and routes
    // back to the login screen.
    #[error("Not authorized. Run `pulsedeck login` to sign in again.")]
    Unauthorized,

    // Transport errors (timeouts, connection resets). The query cache
    // retries these once before surfacing them.
    #[error("Transport error calling {endpoint}: {message}")]
    Transport {
        endpoint: String,
        message: String,
        retriable: bool,
    },

    // Non-401 HTTP errors from the platform API.
    #[error("API error {status} on {endpoint}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    // Local validation: blocks submission without a network call.
    #[error("Invalid input: {0}")]
    Validation(String),

    // Third-party generation endpoints. Shown inline; never touches the session.
    #[error("External service '{service}' failed: {message}")]
    ExternalService { service: String, message: String },

    #[error("Recording error: {0}")]
    Recording(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PulsedeckError {
    /// Whether the query cache should retry this failure once.
    pub fn is_retriable(&self) -> bool {
        match self {
            PulsedeckError::Transport { retriable, .. } => *retriable,
            // Server-side errors are worth one more attempt; 4xx are not.
            PulsedeckError::Api { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_transport() {
        let err = PulsedeckError::Transport {
            endpoint: "/analytics/dashboard".into(),
            message: "connection reset".into(),
            retriable: true,
        };
        assert!(err.is_retriable());
    }

    #[test]
    fn test_non_retriable_transport() {
        let err = PulsedeckError::Transport {
            endpoint: "/analytics/dashboard".into(),
            message: "invalid body".into(),
            retriable: false,
        };
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_server_error_is_retriable() {
        let err = PulsedeckError::Api {
            endpoint: "/accounts".into(),
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.is_retriable());
    }

    #[test]
    fn test_client_error_not_retriable() {
        let err = PulsedeckError::Api {
            endpoint: "/accounts".into(),
            status: 404,
            message: "not found".into(),
        };
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_unauthorized_not_retriable() {
        assert!(!PulsedeckError::Unauthorized.is_retriable());
    }
}
