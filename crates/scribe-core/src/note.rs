use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTE_TITLE: &str = "New Note";

/// A persisted note. Field names follow the stored blob layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Note {
    /// Creates a note stamped with the current time. The id is the creation
    /// time in milliseconds, moved forward past any id already in `existing`.
    pub fn new(title: impl Into<String>, content: impl Into<String>, existing: &[Note]) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: next_note_id(now, existing),
            title: title.into(),
            content: content.into(),
            created_at: now,
        }
    }
}

fn next_note_id(now_ms: i64, existing: &[Note]) -> String {
    let mut candidate = now_ms;
    while existing.iter().any(|note| note.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_fields() {
        let note = Note {
            id: "1".to_owned(),
            title: "A".to_owned(),
            content: "x".to_owned(),
            created_at: 1000,
        };
        let value = serde_json::to_value(&note).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"id": "1", "title": "A", "content": "x", "createdAt": 1000})
        );
    }

    #[test]
    fn id_skips_values_already_taken() {
        let taken = vec![
            Note {
                id: "500".to_owned(),
                title: String::new(),
                content: String::new(),
                created_at: 500,
            },
            Note {
                id: "501".to_owned(),
                title: String::new(),
                content: String::new(),
                created_at: 501,
            },
        ];
        assert_eq!(next_note_id(500, &taken), "502");
        assert_eq!(next_note_id(499, &taken), "499");
    }

    #[test]
    fn new_note_uses_creation_time_as_id() {
        let note = Note::new("Title", "body", &[]);
        assert_eq!(note.id, note.created_at.to_string());
        assert_eq!(note.title, "Title");
    }
}
