use crate::backend::models::{Entry, EntryId};
use crate::ui::content::{format_timestamp, render_content};
use egui::{RichText, ScrollArea, Ui};

#[derive(Debug, PartialEq, Eq)]
pub enum PastaAction {
    Previous(u64),
    Next(u64),
    Random,
    Copy(String),
    Edit(EntryId),
    History(EntryId),
    Delete { id: EntryId, timestamp: i64 },
    OpenImage { id: EntryId, filename: String },
    DownloadImage { id: EntryId, filename: String },
}

/// Single entry page
pub struct PastaView {
    id: EntryId,
    entry: Option<Entry>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    confirm_delete: bool,
}

impl PastaView {
    pub fn new(id: EntryId) -> Self {
        Self {
            id,
            entry: None,
            loading: true,
            error: None,
            notice: None,
            confirm_delete: false,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn set_entry(&mut self, entry: Entry) {
        self.entry = Some(entry);
        self.loading = false;
        self.error = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn previous_order(&self) -> Option<u64> {
        let entry = self.entry.as_ref()?;
        entry.order_index.checked_sub(1)
    }

    pub fn next_order(&self) -> Option<u64> {
        let entry = self.entry.as_ref()?;
        (!entry.last_in_order).then_some(entry.order_index + 1)
    }

    pub fn show(&mut self, ui: &mut Ui, logged_in: bool) -> Option<PastaAction> {
        let mut action = None;

        let Some(entry) = &self.entry else {
            ui.vertical_centered(|ui| {
                ui.add_space(100.0);
                if self.loading {
                    ui.spinner();
                    ui.label("Loading...");
                } else {
                    ui.heading("Entry not found");
                    if let Some(error) = &self.error {
                        ui.colored_label(ui.visuals().error_fg_color, error);
                    }
                }
            });
            return None;
        };

        let previous = self.previous_order();
        let next = self.next_order();

        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(previous.is_some(), egui::Button::new("◀"))
                    .on_hover_text("Previous")
                    .clicked()
                    && let Some(order) = previous
                {
                    action = Some(PastaAction::Previous(order));
                }
                if ui.button("🔀").on_hover_text("Random").clicked() {
                    action = Some(PastaAction::Random);
                }
                if let Some(order) = next
                    && ui.button("▶").on_hover_text("Next").clicked()
                {
                    action = Some(PastaAction::Next(order));
                }
            });
        });
        ui.add_space(8.0);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(&entry.title);
                ui.add_space(6.0);
                render_content(ui, &entry.content);
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.small_button("📋").on_hover_text("Copy text").clicked() {
                        action = Some(PastaAction::Copy(entry.content.clone()));
                    }
                    if ui.small_button("✏").on_hover_text("Edit").clicked() {
                        action = Some(PastaAction::Edit(entry.id.clone()));
                    }
                    if logged_in && ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        self.confirm_delete = true;
                    }
                    if let Some(filename) = &entry.filename {
                        if ui.small_button("🖼").on_hover_text("Open image").clicked() {
                            action = Some(PastaAction::OpenImage {
                                id: entry.id.clone(),
                                filename: filename.clone(),
                            });
                        }
                        if ui.small_button("💾").on_hover_text("Download image").clicked() {
                            action = Some(PastaAction::DownloadImage {
                                id: entry.id.clone(),
                                filename: filename.clone(),
                            });
                        }
                    }
                    if let Some(notice) = &self.notice {
                        ui.label(RichText::new(notice).small().italics());
                    }
                });

                let timestamp = format_timestamp(entry.timestamp);
                if entry.is_modified() {
                    if ui
                        .link(RichText::new(format!("Modified at {}", timestamp)).small())
                        .clicked()
                    {
                        action = Some(PastaAction::History(entry.id.clone()));
                    }
                } else {
                    ui.label(RichText::new(format!("Created at {}", timestamp)).small());
                }

                if let Some(error) = &self.error {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }
            });

        if self.confirm_delete {
            match crate::ui::confirm(ui.ctx(), "Delete this entry?") {
                Some(true) => {
                    self.confirm_delete = false;
                    action = Some(PastaAction::Delete {
                        id: entry.id.clone(),
                        timestamp: entry.timestamp,
                    });
                }
                Some(false) => self.confirm_delete = false,
                None => {}
            }
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(order_index: u64, last_in_order: bool) -> Entry {
        Entry {
            id: EntryId::from("5"),
            title: "t".into(),
            content: "c".into(),
            timestamp: 0,
            filename: None,
            order_index,
            last_in_order,
            num_contents: 1,
        }
    }

    #[test]
    fn first_entry_has_no_previous() {
        let mut view = PastaView::new(EntryId::from("5"));
        assert_eq!(view.previous_order(), None);
        view.set_entry(entry(0, false));
        assert_eq!(view.previous_order(), None);
        assert_eq!(view.next_order(), Some(1));
    }

    #[test]
    fn last_entry_has_no_next() {
        let mut view = PastaView::new(EntryId::from("5"));
        view.set_entry(entry(9, true));
        assert_eq!(view.previous_order(), Some(8));
        assert_eq!(view.next_order(), None);
    }
}
