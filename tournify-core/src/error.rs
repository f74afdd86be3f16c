use http::StatusCode;
use serde::Deserialize;

/// The normalized error shape surfaced to callers.
///
/// Every variant renders a human-readable message through `Display`, and
/// [`AuthError::status`] exposes the originating HTTP status when there was one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend rejected the email/password pair (401 on an auth endpoint).
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// The backend rejected the submitted data (400).
    #[error("{0}")]
    InvalidInput(String),
    /// The resource already exists (409), e.g. an email already registered.
    #[error("{0}")]
    Conflict(String),
    /// The server could not be reached. The user may retry; nothing is retried automatically.
    #[error("Cannot reach server: {0}")]
    Network(String),
    /// An authorized request was rejected with 401; the session has been invalidated.
    #[error("Session expired")]
    SessionExpired,
    /// Any other non-success response.
    #[error("{message}")]
    Server {
        /// HTTP status code of the response.
        status: u16,
        /// Server-provided message, or a generic one built from the status.
        message: String,
    },
    /// Reading or writing persisted client state failed.
    #[error("Storage error: {0}")]
    Storage(String),
    /// A response or stored payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The client configuration is unusable (e.g. an unparseable base URL).
    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extracts the `message` field of a JSON error body, if any.
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()?
        .message
        .filter(|m| !m.trim().is_empty())
}

impl AuthError {
    /// Classifies a failed response from the login/register endpoints.
    ///
    /// A 401 here means the submitted credentials were wrong, not that a session expired.
    pub fn from_auth_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body);
        match status {
            StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials,
            StatusCode::BAD_REQUEST => {
                AuthError::InvalidInput(message.unwrap_or_else(|| "Invalid input".to_string()))
            }
            StatusCode::CONFLICT => AuthError::Conflict("Email already registered".to_string()),
            _ => AuthError::server(status, message),
        }
    }

    /// Classifies a failed response from any authorized, non-auth endpoint.
    pub fn from_api_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body);
        match status {
            StatusCode::UNAUTHORIZED => AuthError::SessionExpired,
            StatusCode::BAD_REQUEST => {
                AuthError::InvalidInput(message.unwrap_or_else(|| "Invalid input".to_string()))
            }
            StatusCode::CONFLICT => {
                AuthError::Conflict(message.unwrap_or_else(|| "Already in use".to_string()))
            }
            _ => AuthError::server(status, message),
        }
    }

    fn server(status: StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("Error {}: {}", status.as_u16(), reason),
            None => format!("Error {}", status.as_u16()),
        });
        AuthError::Server {
            status: status.as_u16(),
            message,
        }
    }

    /// The HTTP status this error was derived from, when it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::InvalidCredentials | AuthError::SessionExpired => Some(401),
            AuthError::InvalidInput(_) => Some(400),
            AuthError::Conflict(_) => Some(409),
            AuthError::Server { status, .. } => Some(*status),
            AuthError::Network(_)
            | AuthError::Storage(_)
            | AuthError::Decode(_)
            | AuthError::Config(_) => None,
        }
    }

    /// Returns true for transport failures, the only category worth retrying by hand.
    pub fn is_network(&self) -> bool {
        matches!(self, AuthError::Network(_))
    }
}
