//! Shared domain models mirroring the OpenReview wire format.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `{ "value": ... }` wrapper inside a content map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentField {
    /// Raw field value: string, string list, number, or null.
    #[serde(default)]
    pub value: Value,
}

/// String-keyed content map attached to groups, notes, and replies.
///
/// Fields are optional by nature; lookups expose an explicit absent
/// branch instead of panicking on missing keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentMap(HashMap<String, ContentField>);

impl ContentMap {
    /// Look up a field value by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).map(|field| &field.value)
    }

    /// Field value as a string slice, when present and textual.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Clone a field value, normalising an absent field to JSON null.
    pub fn value_or_null(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Insert a field value under the given name.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), ContentField { value });
    }

    /// Names of the fields currently present.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A group record returned by the group lookup endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    /// Opaque group identifier (e.g. `ICLR.cc/2025/Conference`).
    pub id: String,
    /// Member ids, populated for pseudo-groups such as `venues`.
    #[serde(default)]
    pub members: Vec<String>,
    /// Venue configuration keys (stage names and stage venue ids).
    #[serde(default)]
    pub content: ContentMap,
}

impl Group {
    /// Resolve a required content key, failing with the key name when absent.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.content
            .str_value(key)
            .ok_or_else(|| anyhow!("group {} is missing content key '{key}'", self.id))
    }
}

/// A note record: a submission or any other addressable post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Note {
    /// Unique note id.
    pub id: String,
    /// Discussion-thread id used as the stable external key.
    #[serde(default)]
    pub forum: String,
    /// Sequence number within the venue.
    #[serde(default)]
    pub number: u64,
    /// Named submission fields.
    #[serde(default)]
    pub content: ContentMap,
    /// Detail payloads attached by a deep fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<NoteDetails>,
}

impl Note {
    /// Replies attached by a deep fetch, empty when none were requested.
    pub fn replies(&self) -> &[Reply] {
        self.details
            .as_ref()
            .map(|details| details.replies.as_slice())
            .unwrap_or_default()
    }
}

/// Detail payloads requested alongside a note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteDetails {
    /// Reply notes nested under the submission's forum.
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// A reply nested under a submission, tagged with its invitations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reply {
    /// Invitation ids describing the reply's role.
    #[serde(default)]
    pub invitations: Vec<String>,
    /// Reply fields (e.g. numeric rating and confidence).
    #[serde(default)]
    pub content: ContentMap,
}

/// Flattened projection of an accepted submission with review statistics.
///
/// Every metadata field is emitted even when absent upstream; absent
/// fields hold JSON null rather than dropping the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedRecord {
    /// One-sentence summary, when the authors provided one.
    #[serde(rename = "TLDR")]
    pub tldr: Value,
    /// Paper abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: Value,
    /// Author display names.
    pub authors: Value,
    /// Author profile ids.
    pub authorids: Value,
    /// Author-supplied keywords.
    pub keywords: Value,
    /// Paper title.
    pub title: Value,
    /// Venue label carrying the disposition (e.g. `ICLR 2025 Poster`).
    pub venue: Value,
    /// Primary subject area.
    pub primary_area: Value,
    /// Relative path to the PDF.
    pub pdf: Value,
    /// Forum id of the submission.
    pub forum: String,
    /// Review ratings in reply-encounter order.
    pub ratings: Vec<Value>,
    /// Review confidences, parallel to `ratings`.
    pub confidence: Vec<Value>,
    /// Arithmetic mean of `ratings`; null when no reviews matched.
    pub average_rating: Option<f64>,
}

/// Flattened projection of a workshop submission, unfiltered by disposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkshopRecord {
    /// One-sentence summary, when the authors provided one.
    #[serde(rename = "TLDR")]
    pub tldr: Value,
    /// Paper abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: Value,
    /// Author display names.
    pub authors: Value,
    /// Author profile ids.
    pub authorids: Value,
    /// Author-supplied keywords.
    pub keywords: Value,
    /// Paper title.
    pub title: Value,
    /// Venue label as recorded on the submission.
    pub venue: Value,
    /// Relative path to the PDF.
    pub pdf: Value,
    /// Forum id of the submission.
    pub forum: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_map_exposes_absent_fields_as_none() {
        let map: ContentMap = serde_json::from_value(json!({
            "title": { "value": "A Paper" }
        }))
        .unwrap();

        assert_eq!(map.get("title"), Some(&json!("A Paper")));
        assert_eq!(map.get("abstract"), None);
        assert_eq!(map.value_or_null("abstract"), Value::Null);
        assert_eq!(map.str_value("title"), Some("A Paper"));
    }

    #[test]
    fn group_require_str_names_the_missing_key() {
        let group: Group = serde_json::from_value(json!({
            "id": "ICLR.cc/2025/Conference",
            "content": { "submission_name": { "value": "Submission" } }
        }))
        .unwrap();

        assert_eq!(group.require_str("submission_name").unwrap(), "Submission");
        let err = group.require_str("review_name").unwrap_err();
        assert!(err.to_string().contains("review_name"));
        assert!(err.to_string().contains("ICLR.cc/2025/Conference"));
    }

    #[test]
    fn note_without_details_has_no_replies() {
        let note: Note = serde_json::from_value(json!({
            "id": "n1",
            "forum": "n1",
            "number": 7
        }))
        .unwrap();

        assert!(note.replies().is_empty());
        assert_eq!(note.number, 7);
    }
}
