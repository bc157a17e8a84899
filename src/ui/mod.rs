pub mod content;
pub mod editor;
pub mod header;
pub mod history;
pub mod listing;
pub mod login;
pub mod pasta;
pub mod search;
pub mod settings;
pub mod viewport;

use egui::{Align2, Context};

/// Modal yes/no question. `Some(answer)` once the user picked a button.
pub fn confirm(ctx: &Context, question: &str) -> Option<bool> {
    let mut answer = None;
    egui::Window::new("Confirm")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(question);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    answer = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(false);
                }
            });
        });
    answer
}
