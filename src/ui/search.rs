use crate::backend::api_backend::ApiError;
use crate::backend::models::{EntryId, ListItem};
use crate::constant::{PREVIEW_CHARS, SEARCH_MIN_CHARS};
use crate::ui::content::excerpt;
use crate::ui::listing::list_row;
use egui::{ScrollArea, Ui};

#[derive(Debug, PartialEq, Eq)]
pub enum SearchAction {
    Open(EntryId),
    Search(String),
}

#[derive(Default)]
pub struct SearchView {
    query: String,
    results: Vec<ListItem>,
    loading: bool,
    error: Option<String>,
}

impl SearchView {
    pub fn results(&self) -> &[ListItem] {
        &self.results
    }

    /// Called after every edit of the query. Short queries clear the results
    /// instead of hitting the backend.
    pub fn set_query(&mut self, query: String) -> Option<String> {
        self.query = query;
        if self.query.chars().count() >= SEARCH_MIN_CHARS {
            self.loading = true;
            self.error = None;
            Some(self.query.clone())
        } else {
            self.results.clear();
            self.loading = false;
            self.error = None;
            None
        }
    }

    /// Results for anything but the current query are stale and dropped
    pub fn apply(&mut self, query: &str, result: Result<Vec<ListItem>, ApiError>) {
        if query != self.query {
            return;
        }
        self.loading = false;
        match result {
            Ok(results) => {
                if results != self.results {
                    self.results = results;
                }
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn show(&mut self, ui: &mut Ui) -> Option<SearchAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.heading("Search");
        });

        let mut query = self.query.clone();
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("Search copypastas...")
                    .desired_width(f32::INFINITY),
            );
            if response.changed()
                && let Some(q) = self.set_query(query)
            {
                action = Some(SearchAction::Search(q));
            }
        });
        if self.loading {
            ui.spinner();
        }
        if let Some(error) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }
        ui.separator();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for result in &self.results {
                    if list_row(ui, &result.title, &excerpt(&result.content, PREVIEW_CHARS)) {
                        action = Some(SearchAction::Open(result.id.clone()));
                    }
                }
            });

        action
    }
}
