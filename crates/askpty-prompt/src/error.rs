//! Error types for prompts.

use thiserror::Error;

/// Why a prompt did not produce an answer.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Reading or writing the terminal failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Switching the terminal mode failed.
    #[error("terminal setup failed: {0}")]
    Terminal(#[from] askpty_pty::PtyError),

    /// The user pressed Ctrl-C.
    #[error("interrupt")]
    Interrupted,

    /// Input ended (Ctrl-D or a closed terminal) before an answer.
    #[error("end of input")]
    Eof,

    /// A select prompt was given nothing to choose from.
    #[error("please provide options to select from")]
    NoOptions,

    /// Answers did not fit the requested type.
    #[error("could not decode answers: {0}")]
    Decode(#[from] serde_json::Error),

    /// An ask option callback failed.
    #[error("invalid ask option: {0}")]
    Options(String),
}

/// Result type for prompts.
pub type Result<T> = std::result::Result<T, PromptError>;

impl PromptError {
    /// Whether the user cancelled, by interrupt or end of input.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Eof)
    }
}
