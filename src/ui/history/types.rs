use crate::backend::models::Snapshot;

/// Comparison of one line position between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDiffEntry {
    Same { text: String },
    Added { text: String },
    Removed { text: String },
    Changed { old_text: String, new_text: String },
}

/// One entry per line position, in order
pub type DiffResult = Vec<LineDiffEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Plain,
    Removal,
    Addition,
}

/// A single rendered row of the diff view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub kind: DisplayKind,
    pub prefix: &'static str,
    /// Line text, with empty lines already replaced by the placeholder
    pub text: String,
}

impl DisplayLine {
    pub fn rendered(&self) -> String {
        format!("{}{}", self.prefix, self.text)
    }
}

#[derive(Debug, Clone)]
pub struct RevisionDiff {
    pub entries: DiffResult,
    pub added_count: usize,
    pub removed_count: usize,
}

#[derive(Debug, Clone)]
pub struct RevisionData {
    pub snapshot: Snapshot,
    /// Lazily computed diff against the chronologically previous revision
    pub diff: Option<RevisionDiff>,
}
