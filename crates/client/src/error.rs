// Gateway error type.
//
// devstate error responses carry a structured `{ "message": ... }`
// payload; that message is the only server-side contract the client
// relies on for user-facing text. Anything else (connection refused,
// timeouts, malformed bodies) is a transport error.

use serde::Deserialize;

/// Failure of one devstate request.
#[derive(Debug, thiserror::Error)]
pub enum DevstateError {
    /// The server answered with a non-success status.
    #[error("devstate error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable server answer.
    #[error("devstate request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl DevstateError {
    /// Text to surface to the user: the server's verbatim `message` for
    /// structured failures, the transport description otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Transport(error) => error.to_string(),
        }
    }

    /// HTTP status of a structured server failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
}

/// Extract the user-facing message from an error response body.
///
/// Falls back to the raw body when it is not the structured payload, and
/// to a generic status line when the body is empty.
pub(crate) fn error_message_from_body(status: u16, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if !payload.message.is_empty() {
            return payload.message;
        }
    }
    if body.trim().is_empty() {
        format!("request failed with status {status}")
    } else {
        body.trim().to_string()
    }
}
