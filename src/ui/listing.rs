//! Paged entry lists: the browse pages and the recent edits feed.

use crate::backend::api_backend::ApiError;
use crate::backend::models::{EntryId, ListItem, RecentItem, RecentKind};
use crate::constant::PAGE_SIZE;
use crate::ui::content::format_timestamp;
use egui::{RichText, ScrollArea, Ui};

#[derive(Debug, PartialEq, Eq)]
pub enum ListAction {
    Open(EntryId),
    Page(usize),
    LoadMore,
    Delete(usize),
}

pub struct BrowseView {
    page: usize,
    entries: Vec<ListItem>,
    loading: bool,
    error: Option<String>,
}

impl BrowseView {
    pub fn new(page: usize) -> Self {
        Self {
            page: page.max(1),
            entries: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// `start..end` item range of the current page
    pub fn range(&self) -> (usize, usize) {
        ((self.page - 1) * PAGE_SIZE, self.page * PAGE_SIZE)
    }

    pub fn can_go_back(&self) -> bool {
        self.page > 1
    }

    /// Only a full page suggests there is another one
    pub fn can_go_forward(&self) -> bool {
        self.entries.len() == PAGE_SIZE
    }

    pub fn entries(&self) -> &[ListItem] {
        &self.entries
    }

    /// Apply a response; answers for another page are ignored
    pub fn apply(&mut self, start: usize, end: usize, result: Result<Vec<ListItem>, ApiError>) {
        if (start, end) != self.range() {
            return;
        }
        self.loading = false;
        match result {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn show(&self, ui: &mut Ui) -> Option<ListAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.heading("Browse copypastas");
        });
        if let Some(error) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.can_go_back(), egui::Button::new("Previous"))
                .clicked()
            {
                action = Some(ListAction::Page(self.page - 1));
            }
            ui.label(format!("Page {}", self.page));
            if ui
                .add_enabled(self.can_go_forward(), egui::Button::new("Next"))
                .clicked()
            {
                action = Some(ListAction::Page(self.page + 1));
            }
            if self.loading {
                ui.spinner();
            }
        });
        ui.separator();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in &self.entries {
                    if list_row(ui, &entry.title, &entry.content) {
                        action = Some(ListAction::Open(entry.id.clone()));
                    }
                }
            });

        action
    }
}

/// Clickable title plus a one-paragraph preview; returns true when clicked
pub fn list_row(ui: &mut Ui, title: &str, preview: &str) -> bool {
    let mut clicked = false;
    ui.vertical(|ui| {
        clicked = ui.link(RichText::new(title).strong()).clicked();
        let preview = preview.replace('\n', " ");
        ui.add(egui::Label::new(RichText::new(preview).small()).truncate());
    });
    ui.add_space(6.0);
    clicked
}

pub struct RecentView {
    page: usize,
    entries: Vec<RecentItem>,
    current_end: usize,
    loading: bool,
    loading_more: bool,
    error: Option<String>,
    pending_delete: Option<usize>,
}

impl RecentView {
    pub fn new(page: usize) -> Self {
        let page = page.max(1);
        Self {
            page,
            entries: Vec::new(),
            current_end: page * PAGE_SIZE,
            loading: true,
            loading_more: false,
            error: None,
            pending_delete: None,
        }
    }

    /// The first load covers every page up to the requested one
    pub fn initial_range(&self) -> (usize, usize) {
        (0, self.page * PAGE_SIZE)
    }

    pub fn can_load_more(&self) -> bool {
        !self.loading && !self.loading_more && self.entries.len() == self.current_end
    }

    /// Range for the next batch; marks the view as busy
    pub fn begin_load_more(&mut self) -> Option<(usize, usize)> {
        if !self.can_load_more() {
            return None;
        }
        self.loading_more = true;
        Some((self.current_end, self.current_end + PAGE_SIZE))
    }

    pub fn entries(&self) -> &[RecentItem] {
        &self.entries
    }

    pub fn apply(&mut self, start: usize, end: usize, result: Result<Vec<RecentItem>, ApiError>) {
        if start == 0 {
            self.loading = false;
            match result {
                Ok(entries) => {
                    self.entries = entries;
                    self.current_end = end;
                    self.error = None;
                }
                Err(e) => self.error = Some(e.to_string()),
            }
        } else if start == self.current_end {
            self.loading_more = false;
            match result {
                Ok(entries) => {
                    self.entries.extend(entries);
                    self.current_end = end;
                }
                Err(e) => tracing::error!("Failed to load more recent edits: {}", e),
            }
        }
    }

    pub fn item(&self, index: usize) -> Option<&RecentItem> {
        self.entries.get(index)
    }

    /// Drop the row of a deleted revision or image. Rows that moved or
    /// vanished since the delete was requested are matched all the same.
    pub fn remove(&mut self, id: &EntryId, timestamp: i64) {
        self.entries
            .retain(|entry| !(&entry.id == id && entry.timestamp == timestamp));
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn show(&mut self, ui: &mut Ui, logged_in: bool) -> Option<ListAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.heading("Recent edits");
        });
        if let Some(error) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }
        if self.loading {
            ui.vertical_centered(|ui| ui.spinner());
            return None;
        }
        ui.separator();

        let mut delete_request = None;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, entry) in self.entries.iter().enumerate() {
                    ui.push_id(index, |ui| {
                        ui.horizontal(|ui| {
                            let title = format!("{} ({})", entry.title, entry.kind.label());
                            let preview = match entry.kind {
                                RecentKind::ImageAdded => format!("🖼 {}", entry.content),
                                _ => entry.content.clone(),
                            };
                            ui.vertical(|ui| {
                                if list_row(ui, &title, &preview) {
                                    action = Some(ListAction::Open(entry.id.clone()));
                                }
                                ui.label(RichText::new(format_timestamp(entry.timestamp)).small().weak());
                            });
                            if logged_in
                                && ui.small_button("🗑").on_hover_text("Delete").clicked()
                            {
                                delete_request = Some(index);
                            }
                        });
                    });
                }

                ui.add_space(8.0);
                if self.loading_more {
                    ui.vertical_centered(|ui| ui.spinner());
                } else if self.entries.len() == self.current_end
                    && ui.button("Load more").clicked()
                {
                    action = Some(ListAction::LoadMore);
                }
            });

        if delete_request.is_some() {
            self.pending_delete = delete_request;
        }

        if let Some(index) = self.pending_delete
            && let Some(entry) = self.entries.get(index)
        {
            let question = match entry.kind {
                RecentKind::ImageAdded => "Delete this image?",
                _ => "Delete this revision?",
            };
            match crate::ui::confirm(ui.ctx(), question) {
                Some(true) => {
                    action = Some(ListAction::Delete(index));
                    self.pending_delete = None;
                }
                Some(false) => self.pending_delete = None,
                None => {}
            }
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<ListItem> {
        (0..count)
            .map(|i| ListItem {
                id: EntryId(i.to_string()),
                title: format!("title {i}"),
                content: String::new(),
            })
            .collect()
    }

    fn recent(count: usize) -> Vec<RecentItem> {
        (0..count)
            .map(|i| RecentItem {
                id: EntryId(i.to_string()),
                title: format!("title {i}"),
                content: String::new(),
                timestamp: i as i64,
                kind: RecentKind::Edit,
            })
            .collect()
    }

    #[test]
    fn browse_page_ranges() {
        assert_eq!(BrowseView::new(1).range(), (0, 100));
        assert_eq!(BrowseView::new(3).range(), (200, 300));
        assert_eq!(BrowseView::new(0).page(), 1);
    }

    #[test]
    fn browse_next_only_after_full_page() {
        let mut view = BrowseView::new(2);
        assert!(view.can_go_back());
        view.apply(100, 200, Ok(items(100)));
        assert!(view.can_go_forward());

        let mut last = BrowseView::new(1);
        assert!(!last.can_go_back());
        last.apply(0, 100, Ok(items(42)));
        assert!(!last.can_go_forward());
    }

    #[test]
    fn browse_ignores_other_pages() {
        let mut view = BrowseView::new(1);
        view.apply(100, 200, Ok(items(5)));
        assert!(view.entries().is_empty());
    }

    #[test]
    fn recent_load_more_appends() {
        let mut view = RecentView::new(1);
        assert_eq!(view.initial_range(), (0, 100));
        assert!(view.begin_load_more().is_none());

        view.apply(0, 100, Ok(recent(100)));
        assert!(view.can_load_more());
        assert_eq!(view.begin_load_more(), Some((100, 200)));
        assert!(!view.can_load_more());

        view.apply(100, 200, Ok(recent(30)));
        assert_eq!(view.entries().len(), 130);
        assert!(!view.can_load_more());
    }

    #[test]
    fn recent_failed_load_more_keeps_entries() {
        let mut view = RecentView::new(1);
        view.apply(0, 100, Ok(recent(100)));
        let range = view.begin_load_more().unwrap();
        view.apply(
            range.0,
            range.1,
            Err(ApiError::Status {
                status: 500,
                message: "boom".into(),
            }),
        );
        assert_eq!(view.entries().len(), 100);
        assert!(view.can_load_more());
    }

    fn ids(view: &RecentView) -> Vec<&str> {
        view.entries().iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn recent_remove_row() {
        let mut view = RecentView::new(1);
        view.apply(0, 100, Ok(recent(3)));
        view.remove(&EntryId::from("1"), 1);
        assert_eq!(ids(&view), vec!["0", "2"]);
        view.remove(&EntryId::from("10"), 10);
        assert_eq!(view.entries().len(), 2);
    }

    #[test]
    fn overlapping_deletes_remove_the_right_rows() {
        let mut view = RecentView::new(1);
        view.apply(0, 100, Ok(recent(4)));
        let first = view.item(1).map(|e| (e.id.clone(), e.timestamp)).unwrap();
        let second = view.item(2).map(|e| (e.id.clone(), e.timestamp)).unwrap();

        view.remove(&first.0, first.1);
        view.remove(&second.0, second.1);
        assert_eq!(ids(&view), vec!["0", "3"]);
    }

    #[test]
    fn late_delete_after_reload_keeps_other_rows() {
        let mut view = RecentView::new(1);
        view.apply(0, 100, Ok(recent(3)));
        // Same entry, older revision than the one on screen
        view.remove(&EntryId::from("1"), 0);
        assert_eq!(ids(&view), vec!["0", "1", "2"]);
    }
}
