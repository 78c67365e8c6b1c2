use std::sync::Arc;

use scribe_core::{SpeechErrorCode, SpeechEvent, finalized_transcript};
use tracing::{debug, info, warn};

use crate::capability::{RecognitionOptions, SpeechRecognizer};

/// Appends a finalized segment, separated by a single space when the draft
/// does not already end in whitespace.
pub fn merge_transcript(draft: &mut String, segment: &str) {
    if segment.is_empty() {
        return;
    }
    if draft.chars().next_back().is_some_and(|c| !c.is_whitespace()) {
        draft.push(' ');
    }
    draft.push_str(segment);
}

/// Recording state around an optional recognizer.
pub struct SpeechCapture {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    options: RecognitionOptions,
    recording: bool,
}

impl SpeechCapture {
    pub fn new(recognizer: Option<Arc<dyn SpeechRecognizer>>, options: RecognitionOptions) -> Self {
        let recognizer = recognizer.filter(|recognizer| recognizer.is_available());
        Self {
            recognizer,
            options,
            recording: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Starts or stops listening. Returns the new recording state.
    pub fn toggle(&mut self) -> bool {
        let Some(recognizer) = self.recognizer.as_ref() else {
            return false;
        };

        if self.recording {
            recognizer.stop();
            self.recording = false;
            info!("speech capture stopped");
            return false;
        }

        match recognizer.start(&self.options) {
            Ok(()) => {
                self.recording = true;
                info!(language = %self.options.language, "speech capture started");
            }
            Err(err) => {
                warn!(error = %err, "could not start speech capture");
            }
        }
        self.recording
    }

    /// Applies one recognizer event. Returns the notice key to show, if any.
    pub fn handle(&mut self, event: SpeechEvent, draft: &mut String) -> Option<&'static str> {
        match event {
            SpeechEvent::Result {
                result_index,
                results,
            } => {
                let segment = finalized_transcript(result_index, &results);
                if !segment.is_empty() {
                    debug!(chars = segment.len(), "appending transcript");
                    merge_transcript(draft, &segment);
                }
                None
            }
            SpeechEvent::Error(code) => {
                warn!(code = code.as_str(), "speech recognition error");
                self.recording = false;
                match code {
                    SpeechErrorCode::NoSpeech => Some("notice.speech_no_speech"),
                    SpeechErrorCode::Network => Some("notice.speech_network"),
                    SpeechErrorCode::NotAllowed => Some("notice.speech_not_allowed"),
                    SpeechErrorCode::Other(_) => None,
                }
            }
            SpeechEvent::End => {
                self.recording = false;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow};
    use parking_lot::Mutex;
    use scribe_core::RecognitionResult;

    use super::*;

    #[derive(Default)]
    struct FakeRecognizer {
        fail_start: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start(&self, _options: &RecognitionOptions) -> Result<()> {
            self.calls.lock().push("start");
            if self.fail_start {
                return Err(anyhow!("already started"));
            }
            Ok(())
        }

        fn stop(&self) {
            self.calls.lock().push("stop");
        }
    }

    struct Unavailable;

    impl SpeechRecognizer for Unavailable {
        fn is_available(&self) -> bool {
            false
        }

        fn start(&self, _options: &RecognitionOptions) -> Result<()> {
            Ok(())
        }

        fn stop(&self) {}
    }

    #[test]
    fn merge_inserts_single_separator() {
        let mut draft = String::new();
        merge_transcript(&mut draft, "hello");
        assert_eq!(draft, "hello");
        merge_transcript(&mut draft, "world");
        assert_eq!(draft, "hello world");

        let mut spaced = "line one\n".to_owned();
        merge_transcript(&mut spaced, "line two");
        assert_eq!(spaced, "line one\nline two");
    }

    #[test]
    fn toggle_starts_then_stops() {
        let recognizer = Arc::new(FakeRecognizer::default());
        let mut capture = SpeechCapture::new(Some(recognizer.clone()), RecognitionOptions::default());
        assert!(capture.toggle());
        assert!(capture.is_recording());
        assert!(!capture.toggle());
        assert_eq!(*recognizer.calls.lock(), vec!["start", "stop"]);
    }

    #[test]
    fn failed_start_leaves_flag_clear() {
        let recognizer = Arc::new(FakeRecognizer {
            fail_start: true,
            ..FakeRecognizer::default()
        });
        let mut capture = SpeechCapture::new(Some(recognizer), RecognitionOptions::default());
        assert!(!capture.toggle());
        assert!(!capture.is_recording());
    }

    #[test]
    fn unavailable_recognizer_is_dropped() {
        let mut capture = SpeechCapture::new(Some(Arc::new(Unavailable)), RecognitionOptions::default());
        assert!(!capture.is_available());
        assert!(!capture.toggle());
    }

    #[test]
    fn errors_map_to_notices_and_stop_recording() {
        let mut capture = SpeechCapture::new(
            Some(Arc::new(FakeRecognizer::default())),
            RecognitionOptions::default(),
        );
        let mut draft = String::new();

        let cases = [
            ("no-speech", Some("notice.speech_no_speech")),
            ("network", Some("notice.speech_network")),
            ("not-allowed", Some("notice.speech_not_allowed")),
            ("audio-capture", None),
        ];
        for (code, expected) in cases {
            capture.toggle();
            assert!(capture.is_recording());
            let notice = capture.handle(SpeechEvent::Error(SpeechErrorCode::parse(code)), &mut draft);
            assert_eq!(notice, expected, "code {code}");
            assert!(!capture.is_recording());
        }
        assert!(draft.is_empty());
    }

    #[test]
    fn end_clears_flag_and_results_append() {
        let mut capture = SpeechCapture::new(
            Some(Arc::new(FakeRecognizer::default())),
            RecognitionOptions::default(),
        );
        capture.toggle();
        let mut draft = "Dear team,".to_owned();
        let notice = capture.handle(
            SpeechEvent::Result {
                result_index: 0,
                results: vec![
                    RecognitionResult::finalized("thanks for coming"),
                    RecognitionResult::interim(" and"),
                ],
            },
            &mut draft,
        );
        assert_eq!(notice, None);
        assert_eq!(draft, "Dear team, thanks for coming");

        assert_eq!(capture.handle(SpeechEvent::End, &mut draft), None);
        assert!(!capture.is_recording());
    }
}
