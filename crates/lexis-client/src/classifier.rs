//! Maps failed gateway calls onto the three categories shown to the user.
//!
//! The mapping is total: every [`GatewayError`] lands in exactly one
//! [`ErrorCategory`]. Nothing here retries; a retry is always a fresh send or
//! an explicit health check.

use crate::error::GatewayError;

/// Fixed opening of every synthesized failure message
pub const APOLOGY_PREFIX: &str =
    "I apologize, but I'm having trouble processing your message right now. ";

/// Short banner text set after a failed send
pub const SEND_FAILED_BANNER: &str = "Message failed to send. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// HTTP 5xx
    ServerError,
    /// Timeout or the backend could not be reached
    NetworkError,
    /// Everything else, 4xx included
    Unknown,
}

impl ErrorCategory {
    pub fn classify(err: &GatewayError) -> Self {
        match err {
            GatewayError::Status { status, .. } if (500..=599).contains(status) => {
                Self::ServerError
            }
            GatewayError::Timeout(_) | GatewayError::Connect(_) => Self::NetworkError,
            GatewayError::Status { .. }
            | GatewayError::Decode(_)
            | GatewayError::Request(_)
            | GatewayError::Config(_) => Self::Unknown,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::ServerError => "There seems to be a server issue. Please try again in a moment.",
            Self::NetworkError => "Please check your internet connection and try again.",
            Self::Unknown => "Please try again or rephrase your question.",
        }
    }

    /// Full assistant text: apology prefix plus category suffix
    pub fn user_message(&self) -> String {
        format!("{}{}", APOLOGY_PREFIX, self.suffix())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ServerError => "server_error",
            Self::NetworkError => "network_error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

pub fn classify(err: &GatewayError) -> ErrorCategory {
    ErrorCategory::classify(err)
}
