use std::sync::Arc;
use std::time::Duration;

use config::AppConfig;
use i18n::I18n;
use scribe_ai::{AssistError, WritingAssistant};
use scribe_core::{DEFAULT_NOTE_TITLE, Note, SpeechEvent, Suggestion, Tone, UiLanguage};
use scribe_store::NoteStore;
use tracing::{debug, info, warn};

use crate::capability::{Clipboard, RecognitionOptions, SpeechRecognizer};
use crate::error::SessionError;
use crate::notice::{Notice, NoticeBoard};
use crate::speech::SpeechCapture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Analysis,
    Rewrite(Tone),
}

/// An AI request that has been issued but not yet completed.
///
/// Only the most recently issued request may update the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub seq: u64,
    pub kind: RequestKind,
    pub text: String,
}

pub struct SessionBuilder {
    notes: NoteStore,
    assistant: WritingAssistant,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    clipboard: Option<Arc<dyn Clipboard>>,
    language: UiLanguage,
    notice_ttl: Duration,
    speech_options: RecognitionOptions,
}

impl SessionBuilder {
    pub fn new(notes: NoteStore, assistant: WritingAssistant) -> Self {
        Self {
            notes,
            assistant,
            recognizer: None,
            clipboard: None,
            language: UiLanguage::EnUs,
            notice_ttl: Duration::from_millis(3000),
            speech_options: RecognitionOptions::default(),
        }
    }

    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.language = config.language;
        self.notice_ttl = Duration::from_millis(config.notice_ttl_ms);
        self.speech_options = RecognitionOptions::from(&config.speech);
        self
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn build(self) -> Session {
        let mut session = Session {
            draft: String::new(),
            active_note_id: None,
            suggestions: Vec::new(),
            analyzing: false,
            rewriting: false,
            last_seq: 0,
            ai_available: true,
            notes: self.notes,
            assistant: self.assistant,
            speech: SpeechCapture::new(self.recognizer, self.speech_options),
            clipboard: self.clipboard,
            i18n: I18n::new(self.language),
            notices: NoticeBoard::new(self.notice_ttl),
        };

        if !session.speech.is_available() {
            info!("speech recognition unavailable");
            session.notify("notice.speech_unsupported");
        }
        session
    }
}

/// The editing session: draft text, pending suggestions, the note it is bound
/// to and the note collection.
pub struct Session {
    draft: String,
    active_note_id: Option<String>,
    suggestions: Vec<Suggestion>,
    analyzing: bool,
    rewriting: bool,
    last_seq: u64,
    ai_available: bool,
    notes: NoteStore,
    assistant: WritingAssistant,
    speech: SpeechCapture,
    clipboard: Option<Arc<dyn Clipboard>>,
    i18n: I18n,
    notices: NoticeBoard,
}

impl Session {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn active_note_id(&self) -> Option<&str> {
        self.active_note_id.as_deref()
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.active_note_id
            .as_deref()
            .and_then(|id| self.notes.get(id))
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.notes()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn is_rewriting(&self) -> bool {
        self.rewriting
    }

    pub fn is_busy(&self) -> bool {
        self.analyzing || self.rewriting
    }

    pub fn ai_available(&self) -> bool {
        self.ai_available
    }

    pub fn speech_available(&self) -> bool {
        self.speech.is_available()
    }

    pub fn is_recording(&self) -> bool {
        self.speech.is_recording()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// "Editing / <title>" for a bound draft, "Drafting / Untitled" otherwise.
    pub fn header_label(&self) -> String {
        match self.active_note() {
            Some(note) => format!("{} / {}", self.i18n.t("header.editing"), note.title),
            None => format!(
                "{} / {}",
                self.i18n.t("header.drafting"),
                self.i18n.t("header.untitled")
            ),
        }
    }

    pub fn begin_analysis(&mut self) -> Option<PendingRequest> {
        self.begin(RequestKind::Analysis)
    }

    pub fn begin_rewrite(&mut self, tone: Tone) -> Option<PendingRequest> {
        self.begin(RequestKind::Rewrite(tone))
    }

    fn begin(&mut self, kind: RequestKind) -> Option<PendingRequest> {
        if self.draft.trim().is_empty() || !self.ai_available {
            return None;
        }

        self.last_seq += 1;
        self.suggestions.clear();
        self.analyzing = kind == RequestKind::Analysis;
        self.rewriting = !self.analyzing;
        debug!(seq = self.last_seq, ?kind, "issuing ai request");

        Some(PendingRequest {
            seq: self.last_seq,
            kind,
            text: self.draft.clone(),
        })
    }

    fn is_latest(&self, request: &PendingRequest) -> bool {
        if request.seq == self.last_seq {
            return true;
        }
        debug!(
            seq = request.seq,
            latest = self.last_seq,
            "discarding superseded ai response"
        );
        false
    }

    /// Installs an analysis result. Returns `false` if the response was stale.
    pub fn complete_analysis(
        &mut self,
        request: &PendingRequest,
        result: Result<Vec<Suggestion>, AssistError>,
    ) -> bool {
        if !self.is_latest(request) {
            return false;
        }
        self.analyzing = false;

        match result {
            Ok(suggestions) => {
                if suggestions.is_empty() {
                    self.notify("notice.analysis_clean");
                }
                self.suggestions = suggestions;
            }
            Err(err) => self.report_ai_failure(&err, "notice.analysis_failed"),
        }
        true
    }

    /// Installs a rewrite result. Returns `false` if the response was stale.
    pub fn complete_rewrite(
        &mut self,
        request: &PendingRequest,
        result: Result<Suggestion, AssistError>,
    ) -> bool {
        if !self.is_latest(request) {
            return false;
        }
        self.rewriting = false;

        match result {
            Ok(suggestion) => {
                self.suggestions = vec![suggestion];
                self.notify("notice.rewrite_ready");
            }
            Err(err) => self.report_ai_failure(&err, "notice.rewrite_failed"),
        }
        true
    }

    pub async fn request_analysis(&mut self) {
        let Some(request) = self.begin_analysis() else {
            return;
        };
        let result = self.assistant.check_grammar(&request.text).await;
        self.complete_analysis(&request, result);
    }

    pub async fn request_rewrite(&mut self, tone: Tone) {
        let Some(request) = self.begin_rewrite(tone) else {
            return;
        };
        let result = self.assistant.rewrite(&request.text, tone).await;
        self.complete_rewrite(&request, result);
    }

    fn report_ai_failure(&mut self, err: &AssistError, notice_key: &'static str) {
        if err.is_missing_credential() {
            self.disable_ai(err);
            return;
        }
        warn!(error = %err, "ai request failed");
        self.notify(notice_key);
    }

    fn disable_ai(&mut self, err: &AssistError) {
        warn!(error = %err, "disabling ai features");
        self.ai_available = false;
        self.notify("notice.ai_unavailable");
    }

    pub fn apply_suggestion(&mut self, index: usize) -> Result<Suggestion, SessionError> {
        let suggestion = self.take_suggestion(index)?;
        self.draft = suggestion.apply_to(&self.draft);
        Ok(suggestion)
    }

    pub fn dismiss_suggestion(&mut self, index: usize) -> Result<Suggestion, SessionError> {
        self.take_suggestion(index)
    }

    fn take_suggestion(&mut self, index: usize) -> Result<Suggestion, SessionError> {
        if index >= self.suggestions.len() {
            return Err(SessionError::SuggestionOutOfRange {
                index,
                len: self.suggestions.len(),
            });
        }
        Ok(self.suggestions.remove(index))
    }

    /// Saves the draft: updates the bound note, or creates and binds a new one.
    pub async fn save(&mut self) -> Result<(), SessionError> {
        if self.draft.trim().is_empty() {
            return Ok(());
        }

        if let Some(id) = self.active_note_id.clone() {
            let updated = self.notes.update_content(&id, &self.draft);
            return match updated {
                Ok(true) => {
                    self.notify("notice.saved");
                    Ok(())
                }
                Ok(false) => Err(SessionError::UnknownNote(id)),
                Err(err) => Err(self.storage_failure(err)),
            };
        }

        let mut title_error = None;
        let title = if self.ai_available {
            match self.assistant.generate_title(&self.draft).await {
                Ok(title) => title,
                Err(err) => {
                    title_error = Some(err);
                    DEFAULT_NOTE_TITLE.to_owned()
                }
            }
        } else {
            DEFAULT_NOTE_TITLE.to_owned()
        };
        let note = Note::new(title, self.draft.clone(), self.notes.notes());
        let id = note.id.clone();
        info!(id = %id, title = %note.title, "creating note");

        let persisted = self.notes.prepend(note);
        self.active_note_id = Some(id);
        if persisted.is_ok() {
            self.notify("notice.note_created");
        }
        match title_error {
            Some(err) if err.is_missing_credential() => self.disable_ai(&err),
            Some(err) => warn!(error = %err, "title generation failed"),
            None => {}
        }
        persisted.map_err(|err| self.storage_failure(err))
    }

    /// Resets to an empty, unbound draft.
    pub fn new_note(&mut self) {
        self.draft.clear();
        self.active_note_id = None;
        self.suggestions.clear();
    }

    pub fn open_note(&mut self, id: &str) -> Result<(), SessionError> {
        let note = self
            .notes
            .get(id)
            .ok_or_else(|| SessionError::UnknownNote(id.to_owned()))?;
        self.draft = note.content.clone();
        self.active_note_id = Some(note.id.clone());
        self.suggestions.clear();
        Ok(())
    }

    pub fn delete_note(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.notes.contains(id) {
            return Err(SessionError::UnknownNote(id.to_owned()));
        }

        let persisted = self.notes.remove(id);
        if self.active_note_id.as_deref() == Some(id) {
            self.new_note();
        }
        info!(id, "deleted note");
        persisted
            .map(|_| ())
            .map_err(|err| self.storage_failure(err))
    }

    /// Writes the draft to the clipboard. Returns whether it succeeded.
    pub fn copy_draft(&mut self) -> bool {
        let Some(clipboard) = self.clipboard.clone() else {
            self.notify("notice.copy_failed");
            return false;
        };
        match clipboard.write_text(&self.draft) {
            Ok(()) => {
                self.notify("notice.copied");
                true
            }
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                self.notify("notice.copy_failed");
                false
            }
        }
    }

    pub fn toggle_recording(&mut self) -> bool {
        self.speech.toggle()
    }

    pub fn handle_speech_event(&mut self, event: SpeechEvent) {
        if let Some(key) = self.speech.handle(event, &mut self.draft) {
            self.notify(key);
        }
    }

    fn storage_failure(&mut self, err: anyhow::Error) -> SessionError {
        warn!(error = %err, "failed to persist notes");
        self.notify("notice.persist_failed");
        SessionError::Storage(err)
    }

    fn notify(&mut self, key: &'static str) {
        let message = self.i18n.t(key).to_owned();
        self.notices.raise(key, message);
    }
}
