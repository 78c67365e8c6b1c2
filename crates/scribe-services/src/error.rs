use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("note {0} not found")]
    UnknownNote(String),

    #[error("suggestion {index} out of range ({len} pending)")]
    SuggestionOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
