use crate::backend::models::EntryId;
use crate::config::Theme;
use egui::{Align, Layout, RichText, Ui};

#[derive(Debug, PartialEq, Eq)]
pub enum HeaderAction {
    Home,
    New,
    Recent,
    Random,
    Search,
    DownloadBackup,
    Login,
    Logout,
    ToggleTheme,
    Settings,
    Edit(EntryId),
}

pub struct Header;

pub struct HeaderState<'a> {
    pub title: &'a str,
    pub logged_in: bool,
    pub theme: Theme,
    /// Entry currently on screen, if any
    pub current_entry: Option<&'a EntryId>,
}

impl Header {
    pub fn show(ui: &mut Ui, state: HeaderState<'_>) -> Option<HeaderAction> {
        let HeaderState {
            title,
            logged_in,
            theme,
            current_entry,
        } = state;

        let mut action = None;

        ui.horizontal(|ui| {
            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                if ui.link(RichText::new(title).strong()).clicked() {
                    action = Some(HeaderAction::Home);
                }
                ui.add_space(16.0);

                if ui.button("➕").on_hover_text("New copypasta").clicked() {
                    action = Some(HeaderAction::New);
                }
                if ui.button("🕑").on_hover_text("Recent edits").clicked() {
                    action = Some(HeaderAction::Recent);
                }
                if ui.button("🔀").on_hover_text("Random").clicked() {
                    action = Some(HeaderAction::Random);
                }
                if ui.button("🔍").on_hover_text("Search").clicked() {
                    action = Some(HeaderAction::Search);
                }
                if let Some(id) = current_entry
                    && ui.button("✏").on_hover_text("Edit this entry").clicked()
                {
                    action = Some(HeaderAction::Edit(id.clone()));
                }
            });

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 8.0;

                if ui.button("⚙").on_hover_text("Settings").clicked() {
                    action = Some(HeaderAction::Settings);
                }
                let theme_icon = match theme {
                    Theme::Light => "🌙",
                    Theme::Dark => "☀",
                };
                if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
                    action = Some(HeaderAction::ToggleTheme);
                }
                if logged_in {
                    if ui.button("Logout").clicked() {
                        action = Some(HeaderAction::Logout);
                    }
                } else if ui.button("Login").clicked() {
                    action = Some(HeaderAction::Login);
                }
                if ui.button("💾").on_hover_text("Download backup").clicked() {
                    action = Some(HeaderAction::DownloadBackup);
                }
            });
        });

        action
    }
}
