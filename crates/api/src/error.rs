use thiserror::Error;

pub const NETWORK_ERROR: &str = "Network Error";
pub const NOT_LOGGED_IN: &str = "You must be logged in to JIRA to see this project.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network Error")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    AuthenticationFailed { message: String },

    /// First entry of a JIRA `errorMessages` array.
    #[error("{0}")]
    Api(String),

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    pub fn not_logged_in() -> Self {
        ApiError::AuthenticationFailed {
            message: NOT_LOGGED_IN.to_string(),
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::AuthenticationFailed { .. } => {
                Some("Set JIRA_ACTIVITY_TOKEN (and an email in the options) for private projects")
            }
            ApiError::Network(_) => Some("Check your network connection and the configured base URL"),
            ApiError::Api(_) => Some("Review the project, status and user values"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_message() {
        let err = ApiError::not_logged_in();
        assert_eq!(err.to_string(), NOT_LOGGED_IN);
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_api_message_is_verbatim() {
        let err = ApiError::Api("The value 'Nope' does not exist for the field 'project'.".into());
        assert_eq!(
            err.to_string(),
            "The value 'Nope' does not exist for the field 'project'."
        );
    }

    #[test]
    fn test_server_error_message() {
        let err = ApiError::ServerError {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.to_string(), "Server error: 503 - down");
        assert!(err.suggestion().is_none());
    }
}
