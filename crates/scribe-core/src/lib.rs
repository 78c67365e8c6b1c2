pub mod locale;
pub mod note;
pub mod speech;
pub mod suggestion;

pub use locale::UiLanguage;
pub use note::{DEFAULT_NOTE_TITLE, Note};
pub use speech::{RecognitionResult, SpeechErrorCode, SpeechEvent, finalized_transcript};
pub use suggestion::{Suggestion, SuggestionKind, Tone};
