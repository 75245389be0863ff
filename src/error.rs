use thiserror::Error;

/// Message used when OMDb reports a failure without saying why.
pub const REMOTE_FALLBACK_MESSAGE: &str = "API request failed";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum MovieError {
    /// OMDb answered with `"Response": "False"`. Displays as the remote message only.
    #[error("{message}")]
    Remote { message: String },

    /// The request never produced a usable OMDb payload.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MovieError {
    pub fn remote(message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| REMOTE_FALLBACK_MESSAGE.to_string());
        MovieError::Remote { message }
    }

    pub fn transport(
        context: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        MovieError::Transport {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            MovieError::Remote { message } => {
                let message = message.to_ascii_lowercase();
                message.contains("not found") || message.contains("incorrect imdb id")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, MovieError>;
