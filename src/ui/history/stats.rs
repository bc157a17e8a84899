use super::types::LineDiffEntry;
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added_count: usize,
    pub removed_count: usize,
}

/// Calculate character-level statistics from diff entries
pub fn calculate_stats(entries: &[LineDiffEntry]) -> DiffStats {
    let mut stats = DiffStats::default();

    for entry in entries {
        match entry {
            LineDiffEntry::Added { text } => stats.added_count += text.chars().count(),
            LineDiffEntry::Removed { text } => stats.removed_count += text.chars().count(),
            LineDiffEntry::Changed { old_text, new_text } => {
                let diff = TextDiff::from_chars(old_text.as_str(), new_text.as_str());
                for change in diff.iter_all_changes() {
                    match change.tag() {
                        ChangeTag::Insert => stats.added_count += change.value().chars().count(),
                        ChangeTag::Delete => stats.removed_count += change.value().chars().count(),
                        ChangeTag::Equal => {}
                    }
                }
            }
            LineDiffEntry::Same { .. } => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::history::diff::compute_diff;

    #[test]
    fn stats_counting_changed_line() {
        // "hello " is shared, "cat" removed and "dog" added
        let stats = calculate_stats(&compute_diff("hello cat", "hello dog"));
        assert_eq!(stats.added_count, 3);
        assert_eq!(stats.removed_count, 3);
    }

    #[test]
    fn stats_counting_whole_lines() {
        let stats = calculate_stats(&compute_diff("keep\ngone", "keep\n\nnew line"));
        assert_eq!(stats.removed_count, 4);
        assert_eq!(stats.added_count, 8);
    }

    #[test]
    fn stats_counting_multibyte() {
        let stats = calculate_stats(&compute_diff("äiti", "äite"));
        assert_eq!(stats.added_count, 1);
        assert_eq!(stats.removed_count, 1);
        let unchanged = calculate_stats(&compute_diff("äö", "äö"));
        assert_eq!(unchanged, DiffStats::default());
    }
}
