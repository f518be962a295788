use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection refused, DNS failure, timeout and the like. No response was received.
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status { endpoint: String, status: u16, body: String },

    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl SourceError {
    pub fn transport(endpoint: impl Into<String>, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("timed out ({})", err)
        } else {
            err.to_string()
        };
        Self::Transport { endpoint: endpoint.into(), message }
    }

    /// Failures worth retrying: no response at all, server-side errors, and rate limiting
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode { .. } | Self::InvalidConfig(_) => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
