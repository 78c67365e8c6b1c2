mod assistant;
mod error;
mod gemini;
mod provider;

pub use assistant::{MIN_ANALYSIS_CHARS, MIN_TITLE_CHARS, WritingAssistant};
pub use error::AssistError;
pub use gemini::GeminiClient;
pub use provider::{GenerationRequest, ModelBackend};
