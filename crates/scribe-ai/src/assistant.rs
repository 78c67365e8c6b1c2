use std::sync::Arc;

use scribe_core::{DEFAULT_NOTE_TITLE, Suggestion, Tone};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::AssistError;
use crate::provider::{GenerationRequest, ModelBackend};

/// Texts shorter than this (after trimming) are not worth analysing.
pub const MIN_ANALYSIS_CHARS: usize = 5;
/// Texts shorter than this keep the default title.
pub const MIN_TITLE_CHARS: usize = 10;
const TITLE_EXCERPT_CHARS: usize = 500;

/// Grammar checking, tone rewriting and titling on top of a [`ModelBackend`].
#[derive(Clone)]
pub struct WritingAssistant {
    backend: Arc<dyn ModelBackend>,
}

impl WritingAssistant {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Asks the model for grammar, spelling and style fixes.
    ///
    /// A response that is not a valid suggestion array is an error.
    pub async fn check_grammar(&self, text: &str) -> Result<Vec<Suggestion>, AssistError> {
        if text.trim().chars().count() < MIN_ANALYSIS_CHARS {
            return Ok(Vec::new());
        }

        let prompt = format!(
            "Analyze the following text for grammar, spelling, and clarity issues.\n\
             Return a list of specific improvements.\n\
             Text to analyze: \"{text}\""
        );
        let raw = self
            .backend
            .generate(&GenerationRequest::json(prompt, analysis_schema()))
            .await?;

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let suggestions: Vec<Suggestion> = serde_json::from_str(&raw)
            .map_err(|err| AssistError::MalformedResponse(err.to_string()))?;
        info!(count = suggestions.len(), "grammar check complete");
        Ok(suggestions)
    }

    /// Rewrites `text` in the given tone.
    ///
    /// An unparseable answer keeps the original text rather than failing.
    pub async fn rewrite(&self, text: &str, tone: Tone) -> Result<Suggestion, AssistError> {
        if text.is_empty() {
            return Err(AssistError::EmptyInput);
        }

        let prompt = format!(
            "Rewrite the following text to have a {tone} tone. Keep the core meaning but \
             improve the flow and vocabulary.\n\nOriginal Text:\n\"{text}\""
        );
        let raw = self
            .backend
            .generate(&GenerationRequest::json(prompt, rewrite_schema()))
            .await?;

        let replacement = parse_rewrite(&raw).unwrap_or_else(|| text.to_owned());
        Ok(Suggestion::rewrite(
            text,
            replacement,
            format!("Rewritten to be more {}.", tone.label().to_lowercase()),
        ))
    }

    /// Produces a short title. Short text and blank answers yield the default;
    /// backend errors are returned so the caller can pick its fallback.
    pub async fn generate_title(&self, text: &str) -> Result<String, AssistError> {
        if text.chars().count() < MIN_TITLE_CHARS {
            return Ok(DEFAULT_NOTE_TITLE.to_owned());
        }

        let excerpt: String = text.chars().take(TITLE_EXCERPT_CHARS).collect();
        let prompt = format!(
            "Generate a very short, concise title (max 5 words) for this note: \"{excerpt}...\""
        );

        let raw = self
            .backend
            .generate(&GenerationRequest::text(prompt))
            .await?;
        Ok(sanitize_title(&raw))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewriteResponse {
    rewritten_text: Option<String>,
}

fn parse_rewrite(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<RewriteResponse>(raw) {
        Ok(parsed) => parsed.rewritten_text.filter(|text| !text.is_empty()),
        Err(err) => {
            warn!(error = %err, "failed to parse rewrite response");
            None
        }
    }
}

fn sanitize_title(raw: &str) -> String {
    let title: String = raw.chars().filter(|c| *c != '\'' && *c != '"').collect();
    let title = title.trim();
    if title.is_empty() {
        DEFAULT_NOTE_TITLE.to_owned()
    } else {
        title.to_owned()
    }
}

fn analysis_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "original": {
                    "type": "STRING",
                    "description": "The specific substring in the text that needs changing."
                },
                "correction": {
                    "type": "STRING",
                    "description": "The suggested replacement text."
                },
                "explanation": {
                    "type": "STRING",
                    "description": "A brief reason for the change."
                },
                "type": {
                    "type": "STRING",
                    "enum": ["grammar", "spelling", "style"]
                }
            },
            "required": ["original", "correction", "explanation", "type"]
        }
    })
}

fn rewrite_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "rewrittenText": {
                "type": "STRING",
                "description": "The completely rewritten version of the provided text."
            }
        },
        "required": ["rewrittenText"]
    })
}
