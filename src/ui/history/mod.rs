pub mod diff;
pub mod stats;
pub mod types;
mod ui;

use crate::backend::models::{EntryId, History};
use crate::ui::content::{format_timestamp, render_content};
use egui::{Color32, RichText, ScrollArea, Ui};
use std::collections::HashMap;

pub use types::{DiffResult, DisplayKind, DisplayLine, LineDiffEntry, RevisionData, RevisionDiff};

#[derive(Debug, PartialEq, Eq)]
pub enum HistoryAction {
    OpenEntry(EntryId),
}

/// Revision list of one entry, newest first, with a per-revision diff toggle
pub struct HistoryView {
    id: EntryId,
    title: String,
    revisions: Option<Vec<RevisionData>>,
    show_diff: HashMap<usize, bool>,
    error: Option<String>,
}

impl HistoryView {
    pub fn new(id: EntryId) -> Self {
        Self {
            id,
            title: String::new(),
            revisions: None,
            show_diff: HashMap::new(),
            error: None,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn is_loading(&self) -> bool {
        self.revisions.is_none() && self.error.is_none()
    }

    /// Replace the revision list; toggles from a previous load are dropped
    pub fn set_history(&mut self, history: History) {
        let revisions = history
            .contents
            .into_iter()
            .rev()
            .map(|snapshot| RevisionData {
                snapshot,
                diff: None,
            })
            .collect();

        self.title = history.title;
        self.revisions = Some(revisions);
        self.show_diff.clear();
        self.error = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn revisions(&self) -> &[RevisionData] {
        self.revisions.as_deref().unwrap_or_default()
    }

    /// The oldest revision has nothing to compare against
    pub fn has_previous(&self, index: usize) -> bool {
        index + 1 < self.revisions().len()
    }

    pub fn is_diff_shown(&self, index: usize) -> bool {
        self.has_previous(index) && self.show_diff.get(&index).copied().unwrap_or(false)
    }

    pub fn toggle_diff(&mut self, index: usize) {
        if !self.has_previous(index) {
            return;
        }
        let shown = self.show_diff.entry(index).or_insert(false);
        *shown = !*shown;
        if *shown {
            self.ensure_diff(index);
        }
    }

    /// Diff of revision `index` against the chronologically previous one,
    /// computed on first use
    pub fn diff_for(&mut self, index: usize) -> Option<&RevisionDiff> {
        self.ensure_diff(index);
        self.revisions
            .as_ref()?
            .get(index)
            .and_then(|revision| revision.diff.as_ref())
    }

    fn ensure_diff(&mut self, index: usize) {
        if !self.has_previous(index) {
            return;
        }
        let Some(revisions) = self.revisions.as_mut() else {
            return;
        };
        if revisions[index].diff.is_some() {
            return;
        }

        let entries = diff::compute_diff(
            &revisions[index + 1].snapshot.content,
            &revisions[index].snapshot.content,
        );
        let stats = stats::calculate_stats(&entries);
        revisions[index].diff = Some(RevisionDiff {
            entries,
            added_count: stats.added_count,
            removed_count: stats.removed_count,
        });
    }

    pub fn show(&mut self, ui: &mut Ui) -> Option<HistoryAction> {
        let mut action = None;

        if let Some(error) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }

        if self.revisions.is_none() {
            if self.error.is_none() {
                ui.vertical_centered(|ui| {
                    ui.add_space(100.0);
                    ui.heading("Loading history...");
                    ui.add_space(10.0);
                    ui.spinner();
                });
            }
            return None;
        }

        ui.vertical_centered(|ui| {
            if ui
                .link(RichText::new(format!("History of {}", self.title)).heading())
                .clicked()
            {
                action = Some(HistoryAction::OpenEntry(self.id.clone()));
            }
        });
        ui.add_space(8.0);

        if self.revisions().is_empty() {
            ui.vertical_centered(|ui| {
                ui.label("No history available for this entry");
            });
            return action;
        }

        let mut toggled = None;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for index in 0..self.revisions().len() {
                    let has_previous = self.has_previous(index);
                    let shown = self.is_diff_shown(index);
                    // Stats need the diff even while it is hidden
                    if has_previous {
                        self.ensure_diff(index);
                    }
                    let revision = &self.revisions()[index];

                    ui.push_id(index, |ui| {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(format!(
                                        "Timestamp {}",
                                        format_timestamp(revision.snapshot.timestamp)
                                    ))
                                    .small(),
                                );
                                if has_previous && ui.small_button("Differences").clicked() {
                                    toggled = Some(index);
                                }
                                if let Some(diff) = &revision.diff {
                                    ui.label(
                                        RichText::new(format!("+{}", diff.added_count))
                                            .color(Color32::from_rgb(0, 128, 0)),
                                    );
                                    ui.label(
                                        RichText::new(format!("-{}", diff.removed_count))
                                            .color(Color32::from_rgb(200, 0, 0)),
                                    );
                                }
                            });

                            match (&revision.diff, shown) {
                                (Some(diff), true) => {
                                    ui.separator();
                                    if diff::has_changes(&diff.entries) {
                                        ui.label("Differences to previous version");
                                        ui::render_diff_view(ui, &diff.entries);
                                    } else {
                                        ui.label(
                                            RichText::new("No changes to previous version").italics(),
                                        );
                                    }
                                }
                                _ => render_content(ui, &revision.snapshot.content),
                            }
                        });
                    });
                    ui.add_space(12.0);
                }
            });

        if let Some(index) = toggled {
            self.toggle_diff(index);
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::Snapshot;

    fn history(contents: &[(&str, i64)]) -> History {
        History {
            title: "Testi".to_string(),
            contents: contents
                .iter()
                .map(|(content, timestamp)| Snapshot {
                    content: content.to_string(),
                    timestamp: *timestamp,
                })
                .collect(),
        }
    }

    #[test]
    fn revisions_are_newest_first() {
        let mut view = HistoryView::new(EntryId::from("1"));
        assert!(view.is_loading());
        view.set_history(history(&[("v1", 1), ("v2", 2), ("v3", 3)]));

        let timestamps: Vec<i64> = view.revisions().iter().map(|r| r.snapshot.timestamp).collect();
        assert_eq!(timestamps, vec![3, 2, 1]);
        assert!(!view.is_loading());
    }

    #[test]
    fn diff_compares_with_chronologically_previous() {
        let mut view = HistoryView::new(EntryId::from("1"));
        view.set_history(history(&[("a\nb", 1), ("a\nc", 2), ("a\nc\nd", 3)]));

        let newest = view.diff_for(0).unwrap();
        assert_eq!(
            newest.entries,
            vec![
                LineDiffEntry::Same { text: "a".into() },
                LineDiffEntry::Same { text: "c".into() },
                LineDiffEntry::Added { text: "d".into() },
            ]
        );
        assert_eq!(newest.added_count, 1);

        let middle = view.diff_for(1).unwrap();
        assert_eq!(
            middle.entries[1],
            LineDiffEntry::Changed {
                old_text: "b".into(),
                new_text: "c".into()
            }
        );

        assert!(view.diff_for(2).is_none());
    }

    #[test]
    fn toggles_are_independent_and_default_off() {
        let mut view = HistoryView::new(EntryId::from("1"));
        view.set_history(history(&[("a", 1), ("b", 2), ("c", 3)]));

        assert!(!view.is_diff_shown(0));
        assert!(!view.is_diff_shown(1));

        view.toggle_diff(1);
        assert!(!view.is_diff_shown(0));
        assert!(view.is_diff_shown(1));
        assert!(view.revisions()[1].diff.is_some());
        assert!(view.revisions()[0].diff.is_none());

        view.toggle_diff(1);
        assert!(!view.is_diff_shown(1));
    }

    #[test]
    fn oldest_revision_has_no_toggle() {
        let mut view = HistoryView::new(EntryId::from("1"));
        view.set_history(history(&[("a", 1), ("b", 2)]));

        view.toggle_diff(1);
        assert!(!view.is_diff_shown(1));
        view.toggle_diff(7);
        assert!(!view.is_diff_shown(7));
    }

    #[test]
    fn reload_resets_toggles() {
        let mut view = HistoryView::new(EntryId::from("1"));
        view.set_history(history(&[("a", 1), ("b", 2)]));
        view.toggle_diff(0);
        assert!(view.is_diff_shown(0));

        view.set_history(history(&[("a", 1), ("b", 2), ("c", 3)]));
        assert!(!view.is_diff_shown(0));
        assert!(view.revisions().iter().all(|r| r.diff.is_none()));
    }

    #[test]
    fn error_ends_loading() {
        let mut view = HistoryView::new(EntryId::from("1"));
        view.set_error("Error 404: Not Found".to_string());
        assert!(!view.is_loading());
        assert!(view.revisions().is_empty());
    }
}
