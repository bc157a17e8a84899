use super::diff::{display_line, display_lines};
use super::types::{DisplayKind, DisplayLine, LineDiffEntry};
use egui::{Color32, FontId, TextFormat, Ui, text::LayoutJob};
use similar::{ChangeTag, TextDiff};

const REMOVED_TEXT_COLOR: Color32 = Color32::from_rgb(255, 0, 0);
const ADDED_TEXT_COLOR: Color32 = Color32::from_rgb(0, 128, 0);
const REMOVED_CHAR_BG: Color32 = Color32::from_rgba_premultiplied(90, 0, 0, 60);
const ADDED_CHAR_BG: Color32 = Color32::from_rgba_premultiplied(0, 70, 0, 60);
const LINE_HEIGHT: f32 = 20.0;

/// Render diff entries as prefixed, coloured lines.
/// Changed lines additionally mark the characters that differ.
pub fn render_diff_view(ui: &mut Ui, entries: &[LineDiffEntry]) {
    ui.style_mut().spacing.item_spacing.y = 1.0;

    for (idx, entry) in entries.iter().enumerate() {
        match entry {
            LineDiffEntry::Changed { old_text, new_text } => {
                ui.push_id(idx, |ui| {
                    render_changed_line(ui, old_text, new_text, true);
                    render_changed_line(ui, old_text, new_text, false);
                });
            }
            other => {
                for line in display_lines(std::slice::from_ref(other)) {
                    render_line(ui, &line);
                }
            }
        }
    }
}

fn text_color(ui: &Ui, kind: DisplayKind) -> Color32 {
    match kind {
        DisplayKind::Plain => ui.visuals().text_color(),
        DisplayKind::Removal => REMOVED_TEXT_COLOR,
        DisplayKind::Addition => ADDED_TEXT_COLOR,
    }
}

fn format(color: Color32, background: Color32) -> TextFormat {
    TextFormat {
        font_id: FontId::monospace(14.0),
        color,
        background,
        line_height: Some(LINE_HEIGHT),
        ..Default::default()
    }
}

fn render_line(ui: &mut Ui, line: &DisplayLine) {
    let mut job = LayoutJob::default();
    job.append(
        &line.rendered(),
        0.0,
        format(text_color(ui, line.kind), Color32::TRANSPARENT),
    );
    job.wrap.max_width = ui.available_width();
    ui.add(egui::Label::new(job).wrap());
}

/// One side of a changed line: the removal row for the old text or the
/// addition row for the new text, with the differing characters highlighted
fn render_changed_line(ui: &mut Ui, old: &str, new: &str, is_old: bool) {
    let (kind, text, highlight) = if is_old {
        (DisplayKind::Removal, old, REMOVED_CHAR_BG)
    } else {
        (DisplayKind::Addition, new, ADDED_CHAR_BG)
    };
    let line = display_line(kind, text);
    let color = text_color(ui, kind);

    let mut job = LayoutJob::default();
    job.append(line.prefix, 0.0, format(color, Color32::TRANSPARENT));

    if text.is_empty() {
        job.append(&line.text, 0.0, format(color, Color32::TRANSPARENT));
    } else {
        // Character level diff reads better than word level for Finnish compounds
        let diff = TextDiff::from_chars(old, new);
        for change in diff.iter_all_changes() {
            match (change.tag(), is_old) {
                (ChangeTag::Equal, _) => {
                    job.append(change.value(), 0.0, format(color, Color32::TRANSPARENT));
                }
                (ChangeTag::Delete, true) | (ChangeTag::Insert, false) => {
                    job.append(change.value(), 0.0, format(color, highlight));
                }
                _ => {}
            }
        }
    }

    job.wrap.max_width = ui.available_width();
    ui.add(egui::Label::new(job).wrap());
}
