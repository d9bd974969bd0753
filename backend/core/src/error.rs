use thiserror::Error;

/// Top-level error type for the Storymap runtime.
#[derive(Debug, Error)]
pub enum StorymapError {
    /// A credential needed by a feature is not configured. The feature is
    /// disabled, never the process.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorymapError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
