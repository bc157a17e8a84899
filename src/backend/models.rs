use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Entry identifier. The backend sends it as a number or a string depending on
/// the endpoint, so both are accepted and kept in textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => EntryId(s),
            Raw::Number(n) => EntryId(n.to_string()),
        })
    }
}

/// A full pasta as returned by `/pasta`
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    pub timestamp: i64,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub order_index: u64,
    #[serde(default)]
    pub last_in_order: bool,
    #[serde(default)]
    pub num_contents: u64,
}

impl Entry {
    pub fn is_modified(&self) -> bool {
        self.num_contents > 1
    }
}

/// Row of `/browse` and `/search`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListItem {
    pub id: EntryId,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentKind {
    Edit,
    ImageAdded,
    #[serde(other)]
    Created,
}

impl RecentKind {
    pub fn label(self) -> &'static str {
        match self {
            RecentKind::Edit => "edited",
            RecentKind::ImageAdded => "image added",
            RecentKind::Created => "created",
        }
    }
}

/// Row of `/recent_edits`. For `image_added` rows the content is the image file name.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentItem {
    pub id: EntryId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub timestamp: i64,
    #[serde(rename = "type", default = "default_recent_kind")]
    pub kind: RecentKind,
}

fn default_recent_kind() -> RecentKind {
    RecentKind::Created
}

/// One historical version of an entry's text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    pub content: String,
    pub timestamp: i64,
}

/// `/history` payload, snapshots ordered oldest first
#[derive(Debug, Clone, Deserialize)]
pub struct History {
    #[serde(default)]
    pub title: String,
    pub contents: Vec<Snapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryRef {
    pub id: EntryId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaQuestion {
    pub question: String,
    pub index: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaValidity {
    #[serde(default)]
    pub valid: bool,
}

/// What `/delete` removed: the whole article or a single revision
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteOutcome {
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl DeleteOutcome {
    pub fn removed_article(&self) -> bool {
        self.kind == "article"
    }
}

#[derive(Serialize)]
pub(crate) struct CaptchaAnswerRequest<'a> {
    pub answer: &'a str,
    pub index: i64,
}

#[derive(Serialize)]
pub(crate) struct EditRequest<'a> {
    pub id: &'a str,
    pub content: &'a str,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub code: &'a str,
}

#[derive(Serialize)]
pub(crate) struct DeleteRequest<'a> {
    pub id: &'a str,
    pub timestamp: i64,
}

#[derive(Serialize)]
pub(crate) struct IdRequest<'a> {
    pub id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_accepts_numbers_and_strings() {
        let numeric: EntryRef = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        let textual: EntryRef = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(numeric.id, EntryId::from("42"));
        assert_eq!(textual.id.as_str(), "abc");
    }

    #[test]
    fn entry_defaults_optional_fields() {
        let entry: Entry = serde_json::from_str(
            r#"{"id": 7, "title": "Otsikko", "content": "rivi", "timestamp": 1700000000}"#,
        )
        .unwrap();
        assert_eq!(entry.filename, None);
        assert_eq!(entry.order_index, 0);
        assert!(!entry.last_in_order);
        assert!(!entry.is_modified());
    }

    #[test]
    fn recent_kinds() {
        let items: Vec<RecentItem> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "a", "content": "x", "timestamp": 1, "type": "edit"},
                {"id": 2, "title": "b", "content": "img.png", "timestamp": 2, "type": "image_added"},
                {"id": 3, "title": "c", "content": "y", "timestamp": 3, "type": "new"},
                {"id": 4, "title": "d", "content": "z", "timestamp": 4}
            ]"#,
        )
        .unwrap();
        let kinds: Vec<RecentKind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecentKind::Edit,
                RecentKind::ImageAdded,
                RecentKind::Created,
                RecentKind::Created
            ]
        );
    }

    #[test]
    fn history_keeps_service_order() {
        let history: History = serde_json::from_str(
            r#"{"title": "t", "contents": [
                {"content": "old", "timestamp": 1},
                {"content": "new", "timestamp": 2}
            ]}"#,
        )
        .unwrap();
        assert_eq!(history.contents[0].content, "old");
        assert_eq!(history.contents[1].timestamp, 2);
    }

    #[test]
    fn delete_outcome() {
        let outcome: DeleteOutcome = serde_json::from_str(r#"{"type": "article"}"#).unwrap();
        assert!(outcome.removed_article());
        let outcome: DeleteOutcome = serde_json::from_str(r#"{"type": "content"}"#).unwrap();
        assert!(!outcome.removed_article());
    }
}
