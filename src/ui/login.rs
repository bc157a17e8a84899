use crate::backend::api_backend::ApiError;
use egui::Ui;

#[derive(Default)]
pub struct LoginView {
    code: String,
    pending: bool,
    error: Option<String>,
}

impl LoginView {
    /// Returns the code to send, or `None` while a request is in flight or
    /// nothing was typed
    pub fn submit(&mut self) -> Option<String> {
        let code = self.code.trim();
        if self.pending || code.is_empty() {
            return None;
        }
        self.pending = true;
        self.error = None;
        Some(code.to_string())
    }

    /// The token is handed back to the caller to store
    pub fn apply(&mut self, result: Result<String, ApiError>) -> Option<String> {
        self.pending = false;
        match result {
            Ok(token) => {
                self.code.clear();
                Some(token)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui) -> Option<String> {
        let mut submitted = None;

        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Login");
            ui.add_space(12.0);

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.code)
                    .password(true)
                    .hint_text("Code")
                    .desired_width(240.0),
            );
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if (ui
                .add_enabled(!self.pending, egui::Button::new("Login"))
                .clicked()
                || entered)
                && let Some(code) = self.submit()
            {
                submitted = Some(code);
            }

            if self.pending {
                ui.spinner();
            }
            if let Some(error) = &self.error {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }
        });

        submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_code_is_not_sent() {
        let mut view = LoginView::default();
        assert_eq!(view.submit(), None);
        view.code = "  ".into();
        assert_eq!(view.submit(), None);
    }

    #[test]
    fn one_request_at_a_time() {
        let mut view = LoginView {
            code: " salasana ".into(),
            ..Default::default()
        };
        assert_eq!(view.submit().as_deref(), Some("salasana"));
        assert_eq!(view.submit(), None);

        let token = view.apply(Ok("tok".into()));
        assert_eq!(token.as_deref(), Some("tok"));
        assert!(view.code.is_empty());
    }

    #[test]
    fn rejected_code_shows_error() {
        let mut view = LoginView {
            code: "väärä".into(),
            ..Default::default()
        };
        view.submit();
        let token = view.apply(Err(ApiError::Status {
            status: 401,
            message: "Invalid code".into(),
        }));
        assert!(token.is_none());
        assert_eq!(view.error.as_deref(), Some("Invalid code"));
        assert_eq!(view.code, "väärä");
    }
}
