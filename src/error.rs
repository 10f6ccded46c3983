use thiserror::Error;

/// Prefix shown to the user whenever the completion call fails.
pub const COMPLETION_ERROR_PREFIX: &str = "Error with OpenAI API";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY environment variable is not set!")]
    MissingApiKey,
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("API request failed ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response contained no choices")]
    NoChoices,
    /// For `CompletionClient` implementations whose failures fit none of the above.
    #[error("{0}")]
    Other(String),
}

impl CompletionError {
    /// Short label for logs; the page never shows it.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Transport(_) => "transport",
            CompletionError::Status { .. } => "status",
            CompletionError::Malformed(_) => "malformed",
            CompletionError::NoChoices => "no_choices",
            CompletionError::Other(_) => "other",
        }
    }
}

/// Turns any completion failure into the text rendered in the results panel.
pub fn display_error(err: &CompletionError) -> String {
    format!("{COMPLETION_ERROR_PREFIX}: {err}")
}
