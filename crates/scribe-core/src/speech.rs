use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn interim(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: false,
        }
    }

    pub fn finalized(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechErrorCode {
    NoSpeech,
    Network,
    NotAllowed,
    Other(String),
}

impl SpeechErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "network" => Self::Network,
            "not-allowed" => Self::NotAllowed,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSpeech => "no-speech",
            Self::Network => "network",
            Self::NotAllowed => "not-allowed",
            Self::Other(code) => code.as_str(),
        }
    }
}

/// Events a recognizer session emits while listening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechEvent {
    /// `results` is the whole session buffer; entries before `result_index`
    /// were already delivered.
    Result {
        result_index: usize,
        results: Vec<RecognitionResult>,
    },
    Error(SpeechErrorCode),
    End,
}

/// Joins the final transcripts from `result_index` onward.
pub fn finalized_transcript(result_index: usize, results: &[RecognitionResult]) -> String {
    results
        .iter()
        .skip(result_index)
        .filter(|result| result.is_final)
        .map(|result| result.transcript.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_delivered_and_interim_results() {
        let results = vec![
            RecognitionResult::finalized("already seen"),
            RecognitionResult::finalized("hello"),
            RecognitionResult::interim(" wor"),
            RecognitionResult::finalized(" there"),
        ];
        assert_eq!(finalized_transcript(1, &results), "hello there");
    }

    #[test]
    fn maps_platform_error_codes() {
        assert_eq!(SpeechErrorCode::parse("no-speech"), SpeechErrorCode::NoSpeech);
        assert_eq!(SpeechErrorCode::parse("not-allowed"), SpeechErrorCode::NotAllowed);
        assert_eq!(
            SpeechErrorCode::parse("aborted"),
            SpeechErrorCode::Other("aborted".to_owned())
        );
        assert_eq!(SpeechErrorCode::parse("network").as_str(), "network");
    }
}
