use crate::config::Theme;
use egui::{Color32, Context, Stroke, Style, Visuals};

/// Theme that applies when the user never picked one
pub fn system_theme(ctx: &Context) -> Theme {
    match ctx.system_theme() {
        Some(egui::Theme::Dark) => Theme::Dark,
        _ => Theme::Light,
    }
}

pub fn configure_style(ctx: &Context, theme: Theme) {
    let mut style = Style::default();

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(12);

    ctx.set_style(style);

    let mut visuals = match theme {
        Theme::Light => Visuals::light(),
        Theme::Dark => Visuals::dark(),
    };
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(0.0, Color32::TRANSPARENT);

    match theme {
        Theme::Light => {
            visuals.widgets.hovered.bg_fill = Color32::from_gray(240);
            visuals.widgets.active.bg_fill = Color32::from_gray(230);
            visuals.selection.bg_fill = Color32::from_rgb(200, 220, 255);
        }
        Theme::Dark => {
            visuals.widgets.hovered.bg_fill = Color32::from_gray(60);
            visuals.widgets.active.bg_fill = Color32::from_gray(70);
            visuals.selection.bg_fill = Color32::from_rgb(50, 80, 130);
        }
    }

    ctx.set_visuals(visuals);
}
