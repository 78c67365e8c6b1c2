use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("API key not found in environment variable {var}")]
    MissingCredential { var: String },

    #[error("no text provided")]
    EmptyInput,

    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model request failed: {status} {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

impl AssistError {
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, AssistError::MissingCredential { .. })
    }
}
