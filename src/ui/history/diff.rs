//! Positional line diff between two revisions.
//!
//! Line `i` of the old text is compared with line `i` of the new text; there is
//! no alignment search. Small in-place edits come out exactly, but a line
//! inserted or removed in the middle of a document shifts every following line
//! and is reported as a run of [`LineDiffEntry::Changed`] entries. History views
//! of the site have always shown revisions this way, so the behaviour is kept.

use super::types::{DiffResult, DisplayKind, DisplayLine, LineDiffEntry};

/// Shown in place of an empty line so it keeps its height
pub const EMPTY_LINE_PLACEHOLDER: &str = "\u{00A0}";

const REMOVED_PREFIX: &str = "- ";
const ADDED_PREFIX: &str = "+ ";

/// Split text on `\n` only. The empty text has no lines at all, while a
/// trailing newline produces an explicit empty last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

pub fn line_count(text: &str) -> usize {
    split_lines(text).len()
}

/// Compute positional line-based diff between old and new text
pub fn compute_diff(old: &str, new: &str) -> DiffResult {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let len = old_lines.len().max(new_lines.len());

    (0..len)
        .map(|i| classify(old_lines.get(i).copied(), new_lines.get(i).copied()))
        .collect()
}

// An absent line never equals an empty one; both count as "blank" for the
// added/removed decision.
fn classify(old: Option<&str>, new: Option<&str>) -> LineDiffEntry {
    let is_blank = |line: Option<&str>| line.is_none_or(str::is_empty);

    match (old, new) {
        (Some(o), Some(n)) if o == n => LineDiffEntry::Same {
            text: o.to_string(),
        },
        (Some(o), n) if !o.is_empty() && is_blank(n) => LineDiffEntry::Removed {
            text: o.to_string(),
        },
        (o, Some(n)) if is_blank(o) && !n.is_empty() => LineDiffEntry::Added {
            text: n.to_string(),
        },
        (o, n) => LineDiffEntry::Changed {
            old_text: o.unwrap_or_default().to_string(),
            new_text: n.unwrap_or_default().to_string(),
        },
    }
}

/// Map diff entries to display rows; a changed line becomes a removal row
/// followed by an addition row.
pub fn display_lines(entries: &[LineDiffEntry]) -> Vec<DisplayLine> {
    let mut lines = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry {
            LineDiffEntry::Same { text } => {
                lines.push(display_line(DisplayKind::Plain, text));
            }
            LineDiffEntry::Added { text } => {
                lines.push(display_line(DisplayKind::Addition, text));
            }
            LineDiffEntry::Removed { text } => {
                lines.push(display_line(DisplayKind::Removal, text));
            }
            LineDiffEntry::Changed { old_text, new_text } => {
                lines.push(display_line(DisplayKind::Removal, old_text));
                lines.push(display_line(DisplayKind::Addition, new_text));
            }
        }
    }

    lines
}

pub fn display_line(kind: DisplayKind, text: &str) -> DisplayLine {
    let prefix = match kind {
        DisplayKind::Plain => "",
        DisplayKind::Removal => REMOVED_PREFIX,
        DisplayKind::Addition => ADDED_PREFIX,
    };
    DisplayLine {
        kind,
        prefix,
        text: visible_text(text).to_string(),
    }
}

pub fn visible_text(text: &str) -> &str {
    if text.is_empty() {
        EMPTY_LINE_PLACEHOLDER
    } else {
        text
    }
}

/// Check if diff entries contain anything besides unchanged lines
pub fn has_changes(entries: &[LineDiffEntry]) -> bool {
    entries
        .iter()
        .any(|entry| !matches!(entry, LineDiffEntry::Same { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same(text: &str) -> LineDiffEntry {
        LineDiffEntry::Same {
            text: text.to_string(),
        }
    }

    fn added(text: &str) -> LineDiffEntry {
        LineDiffEntry::Added {
            text: text.to_string(),
        }
    }

    fn removed(text: &str) -> LineDiffEntry {
        LineDiffEntry::Removed {
            text: text.to_string(),
        }
    }

    fn changed(old: &str, new: &str) -> LineDiffEntry {
        LineDiffEntry::Changed {
            old_text: old.to_string(),
            new_text: new.to_string(),
        }
    }

    #[test]
    fn identical_texts_are_all_same() {
        let text = "first\n\n  indented\r\nlast";
        let diff = compute_diff(text, text);
        assert_eq!(
            diff,
            vec![same("first"), same(""), same("  indented\r"), same("last")]
        );
    }

    #[test]
    fn empty_texts_have_no_lines() {
        assert!(compute_diff("", "").is_empty());
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("\n"), 2);
    }

    #[test]
    fn everything_added_to_empty_text() {
        assert_eq!(compute_diff("", "x\ny"), vec![added("x"), added("y")]);
    }

    #[test]
    fn everything_removed() {
        assert_eq!(compute_diff("x\ny", ""), vec![removed("x"), removed("y")]);
    }

    #[test]
    fn single_line_changed_in_place() {
        assert_eq!(
            compute_diff("a\nb\nc", "a\nX\nc"),
            vec![same("a"), changed("b", "X"), same("c")]
        );
    }

    #[test]
    fn appended_line() {
        assert_eq!(
            compute_diff("a\nb", "a\nb\nc"),
            vec![same("a"), same("b"), added("c")]
        );
    }

    #[test]
    fn blank_line_replaced_with_text_is_added() {
        assert_eq!(
            compute_diff("a\n\nc", "a\nb\nc"),
            vec![same("a"), added("b"), same("c")]
        );
        assert_eq!(
            compute_diff("a\nb\nc", "a\n\nc"),
            vec![same("a"), removed("b"), same("c")]
        );
    }

    #[test]
    fn trailing_newline_is_not_absent_line() {
        // "a\n" has an explicit empty second line, "a" has none
        assert_eq!(compute_diff("a", "a\n"), vec![same("a"), changed("", "")]);
        assert_eq!(compute_diff("a\n", "a"), vec![same("a"), changed("", "")]);
        assert_eq!(compute_diff("a\n", "a\n"), vec![same("a"), same("")]);
    }

    #[test]
    fn middle_insertion_cascades() {
        assert_eq!(
            compute_diff("a\nb\nc", "a\nnew\nb\nc"),
            vec![same("a"), changed("b", "new"), changed("c", "b"), added("c")]
        );
    }

    const SAMPLES: [&str; 8] = ["", "one", "one\n", "a\nb\nc", "a\nX\nc", "\n\n\n", "x\r\ny", "\n"];

    #[test]
    fn length_is_max_line_count() {
        for old in SAMPLES {
            for new in SAMPLES {
                assert_eq!(
                    compute_diff(old, new).len(),
                    line_count(old).max(line_count(new)),
                    "old={old:?} new={new:?}"
                );
            }
        }
    }

    #[test]
    fn display_of_changed_line_is_removal_then_addition() {
        let lines = display_lines(&[same("a"), changed("b", "X"), removed("c"), added("d")]);
        let rendered: Vec<String> = lines.iter().map(DisplayLine::rendered).collect();
        assert_eq!(rendered, vec!["a", "- b", "+ X", "- c", "+ d"]);
        assert_eq!(lines[1].kind, DisplayKind::Removal);
        assert_eq!(lines[2].kind, DisplayKind::Addition);
    }

    #[test]
    fn empty_lines_render_as_placeholder() {
        let lines = display_lines(&[same(""), changed("", "")]);
        assert_eq!(lines[0].rendered(), "\u{00A0}");
        assert_eq!(lines[1].rendered(), "- \u{00A0}");
        assert_eq!(lines[2].rendered(), "+ \u{00A0}");
        assert!(lines.iter().all(|l| !l.text.is_empty()));
    }

    #[test]
    fn only_identical_texts_are_all_same() {
        for old in SAMPLES {
            for new in SAMPLES {
                let diff = compute_diff(old, new);
                if old == new {
                    let expected: Vec<LineDiffEntry> =
                        split_lines(old).into_iter().map(same).collect();
                    assert_eq!(diff, expected, "text={old:?}");
                    assert!(!has_changes(&diff));
                } else {
                    assert!(has_changes(&diff), "old={old:?} new={new:?}");
                }
            }
        }
    }

    #[test]
    fn detects_changes() {
        assert!(!has_changes(&compute_diff("a\nb", "a\nb")));
        assert!(has_changes(&compute_diff("a", "b")));
    }
}
