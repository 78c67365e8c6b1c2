use anyhow::Result;
use config::SpeechConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl From<&SpeechConfig> for RecognitionOptions {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            language: config.language.clone(),
            continuous: config.continuous,
            interim_results: config.interim_results,
        }
    }
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self::from(&SpeechConfig::default())
    }
}

/// Platform speech recognition. Results arrive separately as
/// [`scribe_core::SpeechEvent`]s fed to the session by the host.
pub trait SpeechRecognizer: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&self, options: &RecognitionOptions) -> Result<()>;

    fn stop(&self);
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}
