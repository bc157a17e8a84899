//! Forms for creating a new entry and editing an existing one.

use crate::backend::api_backend::{ApiError, ImageUpload};
use crate::backend::models::{CaptchaQuestion, Entry, EntryId};
use egui::{RichText, Ui};
use std::path::Path;

pub const CAPTCHA_REQUIRED: &str = "Please solve the CAPTCHA first.";
pub const CAPTCHA_INCORRECT: &str = "Incorrect CAPTCHA";
pub const FIELDS_REQUIRED: &str = "Title and content are required.";

#[derive(Debug)]
pub enum EditorAction {
    PickImage,
    Save {
        id: EntryId,
        content: String,
        image: Option<ImageUpload>,
    },
    Cancel(EntryId),
    DeleteImage(EntryId),
    Create {
        title: String,
        content: String,
        image: Option<ImageUpload>,
        found_in_google: bool,
    },
    AnswerCaptcha {
        answer: String,
        index: i64,
    },
}

fn image_picker(ui: &mut Ui, image: &mut Option<ImageUpload>, action: &mut Option<EditorAction>) {
    ui.horizontal(|ui| {
        if ui.button("Choose image...").clicked() {
            *action = Some(EditorAction::PickImage);
        }
        match image {
            Some(upload) => {
                ui.label(RichText::new(format!("Selected: {}", upload.filename)).small());
                if ui.small_button("Clear").clicked() {
                    *image = None;
                }
            }
            None => {
                ui.label(RichText::new("No file chosen").small());
            }
        }
    });
}

fn pick_image(path: &Path) -> Result<ImageUpload, String> {
    ImageUpload::from_path(path).map_err(|e| e.to_string())
}

pub struct EditView {
    id: EntryId,
    entry: Option<Entry>,
    content: String,
    image: Option<ImageUpload>,
    loading: bool,
    saving: bool,
    error: Option<String>,
    confirm_delete_image: bool,
}

impl EditView {
    pub fn new(id: EntryId) -> Self {
        Self {
            id,
            entry: None,
            content: String::new(),
            image: None,
            loading: true,
            saving: false,
            error: None,
            confirm_delete_image: false,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn set_entry(&mut self, entry: Entry) {
        self.content = entry.content.clone();
        self.entry = Some(entry);
        self.loading = false;
        self.error = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.loading = false;
        self.saving = false;
        self.error = Some(message);
    }

    pub fn set_image(&mut self, path: &Path) {
        match pick_image(path) {
            Ok(upload) => self.image = Some(upload),
            Err(e) => self.error = Some(e),
        }
    }

    pub fn image_deleted(&mut self) {
        if let Some(entry) = self.entry.as_mut() {
            entry.filename = None;
        }
    }

    pub fn show(&mut self, ui: &mut Ui, logged_in: bool) -> Option<EditorAction> {
        let mut action = None;

        let Some(entry) = &self.entry else {
            ui.vertical_centered(|ui| {
                ui.add_space(100.0);
                if self.loading {
                    ui.spinner();
                } else {
                    ui.heading("Entry not found");
                }
                if let Some(error) = &self.error {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }
            });
            return None;
        };

        ui.vertical_centered(|ui| {
            ui.heading(&entry.title);
        });
        ui.label("Content");
        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 120.0)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.content)
                        .desired_rows(10)
                        .desired_width(f32::INFINITY),
                );
            });

        match &entry.filename {
            Some(filename) => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("Current image: {}", filename)).small());
                    if logged_in && ui.small_button("Delete image").clicked() {
                        self.confirm_delete_image = true;
                    }
                });
            }
            None => image_picker(ui, &mut self.image, &mut action),
        }

        ui.horizontal(|ui| {
            if ui.button("Cancel").clicked() {
                action = Some(EditorAction::Cancel(self.id.clone()));
            }
            if ui
                .add_enabled(!self.saving, egui::Button::new("Save"))
                .clicked()
            {
                self.saving = true;
                self.error = None;
                action = Some(EditorAction::Save {
                    id: self.id.clone(),
                    content: self.content.clone(),
                    image: self.image.clone(),
                });
            }
            if self.saving {
                ui.spinner();
            }
        });

        if let Some(error) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }

        if self.confirm_delete_image {
            match crate::ui::confirm(ui.ctx(), "Delete the image of this entry?") {
                Some(true) => {
                    self.confirm_delete_image = false;
                    action = Some(EditorAction::DeleteImage(self.id.clone()));
                }
                Some(false) => self.confirm_delete_image = false,
                None => {}
            }
        }

        action
    }
}

/// Captcha progress of the new-entry form
#[derive(Debug, Default)]
pub struct CaptchaState {
    question: Option<CaptchaQuestion>,
    answer: String,
    solved: bool,
    error: Option<String>,
}

impl CaptchaState {
    pub fn is_solved(&self) -> bool {
        self.solved
    }
}

pub struct NewView {
    title: String,
    content: String,
    found_in_google: bool,
    image: Option<ImageUpload>,
    captcha: CaptchaState,
    submitting: bool,
    error: Option<String>,
}

impl NewView {
    /// Logged-in users skip the captcha entirely
    pub fn new(logged_in: bool) -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            found_in_google: false,
            image: None,
            captcha: CaptchaState {
                solved: logged_in,
                ..Default::default()
            },
            submitting: false,
            error: None,
        }
    }

    pub fn captcha(&self) -> &CaptchaState {
        &self.captcha
    }

    /// Outcome of checking a stored captcha token.
    /// Returns true when a fresh question is needed.
    pub fn apply_verification(&mut self, result: &Result<bool, ApiError>) -> bool {
        if matches!(result, Ok(true)) {
            self.captcha.solved = true;
            false
        } else {
            true
        }
    }

    pub fn set_question(&mut self, result: Result<CaptchaQuestion, ApiError>) {
        match result {
            Ok(question) => {
                self.captcha.question = Some(question);
                self.captcha.answer.clear();
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Returns the token to store when the answer was accepted.
    /// A rejected answer needs a fresh question.
    pub fn apply_answer(&mut self, result: Result<String, ApiError>) -> Option<String> {
        match result {
            Ok(token) => {
                self.captcha.solved = true;
                self.captcha.error = None;
                Some(token)
            }
            Err(e) => {
                tracing::warn!("Captcha rejected: {}", e);
                self.captcha.error = Some(CAPTCHA_INCORRECT.to_string());
                self.captcha.question = None;
                None
            }
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }

    pub fn set_image(&mut self, path: &Path) {
        match pick_image(path) {
            Ok(upload) => self.image = Some(upload),
            Err(e) => self.error = Some(e),
        }
    }

    pub fn set_fields(&mut self, title: &str, content: &str, found_in_google: bool) {
        self.title = title.to_string();
        self.content = content.to_string();
        self.found_in_google = found_in_google;
    }

    /// Validate the form and build the create request
    pub fn submit(&mut self, logged_in: bool) -> Result<EditorAction, String> {
        if !logged_in && !self.captcha.solved {
            return Err(CAPTCHA_REQUIRED.to_string());
        }
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(FIELDS_REQUIRED.to_string());
        }
        self.submitting = true;
        self.error = None;
        Ok(EditorAction::Create {
            title: self.title.clone(),
            content: self.content.clone(),
            image: self.image.clone(),
            found_in_google: self.found_in_google,
        })
    }

    pub fn show(&mut self, ui: &mut Ui, logged_in: bool) -> Option<EditorAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.heading("New copypasta");
        });

        ui.label("Title");
        ui.add(egui::TextEdit::singleline(&mut self.title).desired_width(f32::INFINITY));
        ui.label("Content");
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 200.0).max(120.0))
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.content)
                        .desired_rows(10)
                        .desired_width(f32::INFINITY),
                );
            });
        ui.checkbox(&mut self.found_in_google, "Found in Google");
        image_picker(ui, &mut self.image, &mut action);

        if !logged_in && !self.captcha.solved {
            ui.separator();
            match &self.captcha.question {
                Some(question) => {
                    ui.label(format!("CAPTCHA: {}", question.question));
                    let index = question.index;
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut self.captcha.answer);
                        if ui.small_button("Verify").clicked() {
                            self.captcha.error = None;
                            action = Some(EditorAction::AnswerCaptcha {
                                answer: self.captcha.answer.clone(),
                                index,
                            });
                        }
                    });
                }
                None => {
                    ui.spinner();
                }
            }
            if let Some(error) = &self.captcha.error {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }
        }

        ui.add_space(8.0);
        let can_submit = (logged_in || self.captcha.solved) && !self.submitting;
        if ui
            .add_enabled(can_submit, egui::Button::new("Create"))
            .clicked()
        {
            match self.submit(logged_in) {
                Ok(create) => action = Some(create),
                Err(message) => self.error = Some(message),
            }
        }

        if let Some(error) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> CaptchaQuestion {
        CaptchaQuestion {
            question: "2 + 2?".into(),
            index: 3,
        }
    }

    #[test]
    fn anonymous_submit_requires_captcha() {
        let mut view = NewView::new(false);
        view.set_fields("Otsikko", "Teksti", false);
        assert_eq!(view.submit(false).unwrap_err(), CAPTCHA_REQUIRED);

        view.set_question(Ok(question()));
        let token = view.apply_answer(Ok("tok".into()));
        assert_eq!(token.as_deref(), Some("tok"));
        assert!(view.captcha().is_solved());
        assert!(matches!(
            view.submit(false),
            Ok(EditorAction::Create { found_in_google: false, .. })
        ));
    }

    #[test]
    fn logged_in_skips_captcha() {
        let mut view = NewView::new(true);
        assert!(view.captcha().is_solved());
        view.set_fields("a", "b", true);
        assert!(matches!(
            view.submit(true),
            Ok(EditorAction::Create { found_in_google: true, .. })
        ));
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut view = NewView::new(true);
        view.set_fields("  ", "text", false);
        assert_eq!(view.submit(true).unwrap_err(), FIELDS_REQUIRED);
    }

    #[test]
    fn wrong_answer_needs_new_question() {
        let mut view = NewView::new(false);
        view.set_question(Ok(question()));
        let token = view.apply_answer(Err(ApiError::Status {
            status: 400,
            message: "wrong".into(),
        }));
        assert!(token.is_none());
        assert!(!view.captcha().is_solved());
        assert!(view.captcha().question.is_none());
        assert_eq!(view.captcha().error.as_deref(), Some(CAPTCHA_INCORRECT));
    }

    #[test]
    fn stored_token_verification() {
        let mut view = NewView::new(false);
        assert!(!view.apply_verification(&Ok(true)));
        assert!(view.captcha().is_solved());

        let mut view = NewView::new(false);
        assert!(view.apply_verification(&Ok(false)));
        assert!(view.apply_verification(&Err(ApiError::Status {
            status: 403,
            message: "expired".into()
        })));
        assert!(!view.captcha().is_solved());
    }

    #[test]
    fn unsupported_image_is_reported() {
        let mut view = NewView::new(true);
        view.set_image(Path::new("/tmp/notes.txt"));
        assert!(view.error.is_some());
        assert!(view.image.is_none());

        let mut edit = EditView::new(EntryId::from("1"));
        edit.set_image(Path::new("/tmp/kuva.avif"));
        assert_eq!(edit.image.as_ref().unwrap().mime, "image/avif");
    }
}
