use crate::ui::history::diff::visible_text;
use chrono::{DateTime, Local, TimeZone};
use egui::{Color32, RichText, Ui};

const QUOTE_COLOR: Color32 = Color32::from_rgb(120, 153, 34);
const RESPONSE_COLOR: Color32 = Color32::from_rgb(224, 114, 127);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Default,
    /// `>` greentext
    Quote,
    /// `<` reply text
    Response,
}

pub fn line_style(line: &str) -> LineStyle {
    if line.starts_with('>') {
        LineStyle::Quote
    } else if line.starts_with('<') {
        LineStyle::Response
    } else {
        LineStyle::Default
    }
}

/// Render pasta text line by line, keeping empty lines visible
pub fn render_content(ui: &mut Ui, content: &str) {
    ui.style_mut().spacing.item_spacing.y = 2.0;
    for line in content.split('\n') {
        let text = RichText::new(visible_text(line)).size(15.0);
        let text = match line_style(line) {
            LineStyle::Default => text,
            LineStyle::Quote => text.color(QUOTE_COLOR),
            LineStyle::Response => text.color(RESPONSE_COLOR),
        };
        ui.add(egui::Label::new(text).wrap());
    }
}

/// First `max_chars` characters, with an ellipsis when something was cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Unix seconds in the site's Finnish date style, in local time
pub fn format_timestamp(timestamp: i64) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%-d.%-m.%Y klo %-H.%M.%S")
            .to_string(),
        None => timestamp.to_string(),
    }
}
