use crate::backend::api_backend::ApiError;
use crate::config::Theme;
use egui::{RichText, Ui};
use serde_json::Value;

#[derive(Debug, PartialEq, Eq)]
pub enum SettingsAction {
    ToggleTheme,
    DownloadBackup,
    Login,
    Logout,
    SetApiUrl(String),
}

pub struct SettingsView {
    api_url: String,
    data_version: Option<Result<String, String>>,
}

impl SettingsView {
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            data_version: None,
        }
    }

    pub fn set_data_version(&mut self, result: Result<Value, ApiError>) {
        self.data_version = Some(match result {
            Ok(Value::String(version)) => Ok(version),
            Ok(value) => Ok(value.to_string()),
            Err(e) => Err(e.to_string()),
        });
    }

    pub fn show(&mut self, ui: &mut Ui, theme: Theme, logged_in: bool) -> Option<SettingsAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.heading("Settings");
        });
        ui.add_space(12.0);

        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([16.0, 12.0])
            .show(ui, |ui| {
                ui.label("Theme");
                let label = match theme {
                    Theme::Light => "Light",
                    Theme::Dark => "Dark",
                };
                if ui.button(label).on_hover_text("Toggle theme").clicked() {
                    action = Some(SettingsAction::ToggleTheme);
                }
                ui.end_row();

                ui.label("Backup");
                if ui.button("Download backup").clicked() {
                    action = Some(SettingsAction::DownloadBackup);
                }
                ui.end_row();

                ui.label("Account");
                if logged_in {
                    if ui.button("Logout").clicked() {
                        action = Some(SettingsAction::Logout);
                    }
                } else if ui.button("Login").clicked() {
                    action = Some(SettingsAction::Login);
                }
                ui.end_row();

                ui.label("API URL");
                ui.horizontal(|ui| {
                    ui.add(egui::TextEdit::singleline(&mut self.api_url).desired_width(280.0));
                    if ui.button("Apply").clicked() {
                        action = Some(SettingsAction::SetApiUrl(self.api_url.clone()));
                    }
                });
                ui.end_row();

                ui.label("Data version");
                match &self.data_version {
                    None => {
                        ui.spinner();
                    }
                    Some(Ok(version)) => {
                        ui.label(RichText::new(version).monospace());
                    }
                    Some(Err(e)) => {
                        ui.colored_label(ui.visuals().error_fg_color, e);
                    }
                }
                ui.end_row();
            });

        action
    }
}
