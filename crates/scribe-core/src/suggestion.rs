use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Grammar,
    Spelling,
    Style,
    Rewrite,
}

/// A proposed edit to the draft.
///
/// For [`SuggestionKind::Rewrite`] the `replacement` is the whole new draft and
/// `original` only records what was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub original: String,
    #[serde(rename = "correction")]
    pub replacement: String,
    pub explanation: String,
}

impl Suggestion {
    pub fn rewrite(
        original: impl Into<String>,
        replacement: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            kind: SuggestionKind::Rewrite,
            original: original.into(),
            replacement: replacement.into(),
            explanation: explanation.into(),
        }
    }

    /// Returns the draft with this suggestion applied.
    ///
    /// Span suggestions replace the first literal occurrence of `original`. A
    /// draft that no longer contains it comes back unchanged.
    pub fn apply_to(&self, draft: &str) -> String {
        match self.kind {
            SuggestionKind::Rewrite => self.replacement.clone(),
            SuggestionKind::Grammar | SuggestionKind::Spelling | SuggestionKind::Style => {
                draft.replacen(&self.original, &self.replacement, 1)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Professional,
    Casual,
    Concise,
    Expanded,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Concise,
        Tone::Expanded,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Concise => "Concise",
            Tone::Expanded => "Expanded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(kind: SuggestionKind, original: &str, replacement: &str) -> Suggestion {
        Suggestion {
            kind,
            original: original.to_owned(),
            replacement: replacement.to_owned(),
            explanation: String::new(),
        }
    }

    #[test]
    fn rewrite_replaces_whole_draft() {
        let suggestion = Suggestion::rewrite("old text", "Brand new text.", "why");
        assert_eq!(suggestion.apply_to("something else entirely"), "Brand new text.");
    }

    #[test]
    fn span_replaces_first_occurrence_only() {
        let suggestion = span(SuggestionKind::Spelling, "teh", "the");
        assert_eq!(suggestion.apply_to("teh cat and teh dog"), "the cat and teh dog");
    }

    #[test]
    fn span_missing_from_draft_is_noop() {
        let suggestion = span(SuggestionKind::Style, "very very", "very");
        assert_eq!(suggestion.apply_to("nothing to change"), "nothing to change");
    }

    #[test]
    fn decodes_model_payload() {
        let raw = r#"{"original":"has","correction":"have","explanation":"subject-verb agreement","type":"grammar"}"#;
        let suggestion: Suggestion = serde_json::from_str(raw).expect("decode");
        assert_eq!(suggestion.kind, SuggestionKind::Grammar);
        assert_eq!(suggestion.replacement, "have");
    }

    #[test]
    fn tone_parses_case_insensitively() {
        assert_eq!(Tone::parse("casual"), Some(Tone::Casual));
        assert_eq!(Tone::parse(" CONCISE "), Some(Tone::Concise));
        assert_eq!(Tone::parse("angry"), None);
    }
}
