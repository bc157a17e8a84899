use crate::backend::Backend;
use crate::backend::api_backend::ApiError;
use crate::backend::models::{EntryId, RecentKind};
use crate::config::{Config, Theme};
use crate::constant::DEFAULT_WINDOW_TITLE;
use crate::messages::{PickTarget, ResponseMessage};
use crate::style::{configure_style, system_theme};
use crate::ui::editor::{EditView, EditorAction, NewView};
use crate::ui::header::{Header, HeaderAction, HeaderState};
use crate::ui::history::{HistoryAction, HistoryView};
use crate::ui::listing::{BrowseView, ListAction, RecentView};
use crate::ui::login::LoginView;
use crate::ui::pasta::{PastaAction, PastaView};
use crate::ui::search::{SearchAction, SearchView};
use crate::ui::settings::{SettingsAction, SettingsView};
use chrono::NaiveDate;
use std::sync::mpsc::{Receiver, Sender, channel};
use tracing::{info, warn};

enum View {
    Browse(BrowseView),
    Recent(RecentView),
    Search(SearchView),
    Pasta(PastaView),
    Edit(EditView),
    New(NewView),
    History(HistoryView),
    Login(LoginView),
    Settings(SettingsView),
}

enum Action {
    Header(HeaderAction),
    List(ListAction),
    Search(SearchAction),
    Pasta(PastaAction),
    Editor(EditorAction),
    History(HistoryAction),
    Login(String),
    Settings(SettingsAction),
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("kopiopastat-backup-{}", date.format("%Y-%m-%d"))
}

/// A rejected token is dropped so the user can log in again.
/// Returns true when the token was cleared.
pub fn apply_auth_error(config: &mut Config, error: &ApiError) -> bool {
    if !error.is_unauthorized() {
        return false;
    }
    warn!("Session rejected by the server, clearing token");
    config.set_auth_token(None);
    true
}

/// Anything but a confirmed valid token removes the stored captcha token
pub fn apply_captcha_verification(config: &mut Config, result: &Result<bool, ApiError>) {
    if !matches!(result, Ok(true)) {
        info!("Stored captcha token is no longer valid");
        config.set_captcha_token(None);
    }
}

pub struct KopiopastaApp {
    config: Config,
    backend: Backend,
    sender: Sender<ResponseMessage>,
    receiver: Receiver<ResponseMessage>,
    view: View,
    theme: Theme,
    status: Option<String>,
}

impl KopiopastaApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::default();
        let theme = config
            .settings
            .theme
            .unwrap_or_else(|| system_theme(&cc.egui_ctx));
        configure_style(&cc.egui_ctx, theme);

        let (sender, receiver) = channel();
        let backend = Backend::new(config.api_url(), sender.clone(), cc.egui_ctx.clone());

        let mut app = Self {
            config,
            backend,
            sender,
            receiver,
            view: View::Browse(BrowseView::new(1)),
            theme,
            status: None,
        };
        app.open_browse(1);
        app
    }

    fn logged_in(&self) -> bool {
        self.config.session().is_logged_in()
    }

    // Navigation

    fn open_browse(&mut self, page: usize) {
        let view = BrowseView::new(page);
        let (start, end) = view.range();
        info!("Browse page {}", view.page());
        self.backend.load_browse(start, end);
        self.view = View::Browse(view);
    }

    fn open_recent(&mut self) {
        let view = RecentView::new(1);
        let (start, end) = view.initial_range();
        self.backend.load_recent(start, end);
        self.view = View::Recent(view);
    }

    fn open_search(&mut self) {
        self.view = View::Search(SearchView::default());
    }

    fn open_entry(&mut self, id: EntryId) {
        info!("Open entry {}", id);
        self.backend.load_entry(id.clone());
        self.view = View::Pasta(PastaView::new(id));
    }

    fn open_edit(&mut self, id: EntryId) {
        info!("Edit entry {}", id);
        self.backend.load_entry(id.clone());
        self.view = View::Edit(EditView::new(id));
    }

    fn open_history(&mut self, id: EntryId) {
        info!("History of entry {}", id);
        self.backend.load_history(id.clone());
        self.view = View::History(HistoryView::new(id));
    }

    fn open_new(&mut self) {
        let session = self.config.session();
        let logged_in = session.is_logged_in();
        self.view = View::New(NewView::new(logged_in));
        if logged_in {
            return;
        }
        if session.captcha_token.is_some() {
            self.backend.verify_captcha(session);
        } else {
            self.backend.load_captcha_question();
        }
    }

    fn open_login(&mut self) {
        if self.logged_in() {
            self.open_browse(1);
        } else {
            self.view = View::Login(LoginView::default());
        }
    }

    fn open_settings(&mut self) {
        self.backend.load_data_version();
        self.view = View::Settings(SettingsView::new(self.config.settings.api_url.clone()));
    }

    // Shared operations

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = self.theme.toggled();
        self.config.set_theme(self.theme);
        configure_style(ctx, self.theme);
    }

    fn logout(&mut self) {
        let session = self.config.session();
        self.config.set_auth_token(None);
        self.backend.logout(session);
        if let View::New(_) = self.view {
            self.open_new();
        }
    }

    fn download_backup(&self) {
        let name = backup_file_name(chrono::Local::now().date_naive());
        self.backend
            .download(self.backend.client().backup_url(), name, self.config.download_dir());
    }

    /// Requests already in flight still answer on the shared channel
    fn set_api_url(&mut self, ctx: &egui::Context, url: &str) {
        self.config.set_api_url(url);
        self.backend = Backend::new(self.config.api_url(), self.sender.clone(), ctx.clone());
        self.status = Some(format!("Using {}", self.config.api_url()));
        self.backend.load_data_version();
    }

    fn report(&mut self, message: String) {
        tracing::error!("{}", message);
        self.status = Some(message);
    }

    // Responses

    fn handle_response(&mut self, message: ResponseMessage) {
        match message {
            ResponseMessage::BrowseLoaded { start, end, result } => {
                if let View::Browse(view) = &mut self.view {
                    view.apply(start, end, result);
                }
            }
            ResponseMessage::RecentLoaded { start, end, result } => {
                if let View::Recent(view) = &mut self.view {
                    view.apply(start, end, result);
                }
            }
            ResponseMessage::SearchLoaded { query, result } => {
                if let View::Search(view) = &mut self.view {
                    view.apply(&query, result);
                }
            }
            ResponseMessage::EntryLoaded { id, result } => match &mut self.view {
                View::Pasta(view) if view.id() == &id => match result {
                    Ok(entry) => view.set_entry(entry),
                    Err(e) => view.set_error(e.to_string()),
                },
                View::Edit(view) if view.id() == &id => match result {
                    Ok(entry) => view.set_entry(entry),
                    Err(e) => view.set_error(e.to_string()),
                },
                _ => {}
            },
            ResponseMessage::EntryResolved(result) => match result {
                Ok(entry) => self.open_entry(entry.id),
                Err(e) => match &mut self.view {
                    View::Pasta(view) => view.set_error(e.to_string()),
                    _ => self.report(e.to_string()),
                },
            },
            ResponseMessage::HistoryLoaded { id, result } => {
                if let View::History(view) = &mut self.view
                    && view.id() == &id
                {
                    match result {
                        Ok(history) => view.set_history(history),
                        Err(e) => view.set_error(e.to_string()),
                    }
                }
            }
            ResponseMessage::DataVersionLoaded(result) => {
                if let View::Settings(view) = &mut self.view {
                    view.set_data_version(result);
                }
            }
            ResponseMessage::CaptchaQuestionLoaded(result) => {
                if let View::New(view) = &mut self.view {
                    view.set_question(result);
                }
            }
            ResponseMessage::CaptchaAnswered(result) => {
                if let View::New(view) = &mut self.view {
                    match view.apply_answer(result) {
                        Some(token) => self.config.set_captcha_token(Some(token)),
                        None => self.backend.load_captcha_question(),
                    }
                }
            }
            ResponseMessage::CaptchaVerified(result) => {
                apply_captcha_verification(&mut self.config, &result);
                if let View::New(view) = &mut self.view
                    && view.apply_verification(&result)
                {
                    self.backend.load_captcha_question();
                }
            }
            ResponseMessage::EntryCreated(result) => match result {
                Ok(entry) => {
                    info!("Created entry {}", entry.id);
                    self.open_entry(entry.id);
                }
                Err(e) => {
                    apply_auth_error(&mut self.config, &e);
                    if let View::New(view) = &mut self.view {
                        view.set_error(e.to_string());
                    }
                }
            },
            ResponseMessage::EntrySaved { id, result } => match result {
                Ok(()) => {
                    if matches!(&self.view, View::Edit(view) if view.id() == &id) {
                        self.open_entry(id);
                    }
                }
                Err(e) => {
                    apply_auth_error(&mut self.config, &e);
                    if let View::Edit(view) = &mut self.view {
                        view.set_error(e.to_string());
                    }
                }
            },
            ResponseMessage::EntryDeleted { id, result } => match result {
                Ok(outcome) => {
                    info!("Deleted {} of entry {}", outcome.kind, id);
                    if outcome.removed_article() {
                        self.open_browse(1);
                    } else if matches!(&self.view, View::Pasta(view) if view.id() == &id) {
                        self.open_entry(id);
                    }
                }
                Err(e) => {
                    apply_auth_error(&mut self.config, &e);
                    if let View::Pasta(view) = &mut self.view {
                        view.set_error(e.to_string());
                    }
                }
            },
            ResponseMessage::RecentItemDeleted {
                id,
                timestamp,
                result,
            } => {
                if let Err(e) = &result {
                    apply_auth_error(&mut self.config, e);
                }
                if let View::Recent(view) = &mut self.view {
                    match result {
                        Ok(()) => view.remove(&id, timestamp),
                        Err(e) => view.set_error(e.to_string()),
                    }
                }
            }
            ResponseMessage::ImageDeleted { id, result } => {
                if let Err(e) = &result {
                    apply_auth_error(&mut self.config, e);
                }
                if let View::Edit(view) = &mut self.view
                    && view.id() == &id
                {
                    match result {
                        Ok(()) => view.image_deleted(),
                        Err(e) => view.set_error(e.to_string()),
                    }
                }
            }
            ResponseMessage::LoggedIn(result) => {
                if let View::Login(view) = &mut self.view
                    && let Some(token) = view.apply(result)
                {
                    info!("Logged in");
                    self.config.set_auth_token(Some(token));
                    self.open_browse(1);
                }
            }
            ResponseMessage::LoggedOut(result) => match result {
                Ok(()) => info!("Logged out"),
                Err(e) => warn!("Logout request failed: {}", e),
            },
            ResponseMessage::Downloaded(result) => match result {
                Ok(Some(path)) => self.status = Some(format!("Saved to {}", path.display())),
                Ok(None) => {}
                Err(e) => self.report(format!("Download failed: {}", e)),
            },
            ResponseMessage::ImagePicked { target, path } => match (&mut self.view, target) {
                (View::New(view), PickTarget::NewEntry) => view.set_image(&path),
                (View::Edit(view), PickTarget::EditEntry) => view.set_image(&path),
                _ => {}
            },
        }
    }

    // Actions

    fn dispatch(&mut self, ctx: &egui::Context, action: Action) {
        match action {
            Action::Header(action) => self.handle_header(ctx, action),
            Action::List(action) => self.handle_list(action),
            Action::Search(SearchAction::Open(id)) => self.open_entry(id),
            Action::Search(SearchAction::Search(query)) => self.backend.search(query),
            Action::Pasta(action) => self.handle_pasta(ctx, action),
            Action::Editor(action) => self.handle_editor(action),
            Action::History(HistoryAction::OpenEntry(id)) => self.open_entry(id),
            Action::Login(code) => self.backend.login(code),
            Action::Settings(action) => match action {
                SettingsAction::ToggleTheme => self.toggle_theme(ctx),
                SettingsAction::DownloadBackup => self.download_backup(),
                SettingsAction::Login => self.open_login(),
                SettingsAction::Logout => self.logout(),
                SettingsAction::SetApiUrl(url) => self.set_api_url(ctx, &url),
            },
        }
    }

    fn handle_header(&mut self, ctx: &egui::Context, action: HeaderAction) {
        match action {
            HeaderAction::Home => self.open_browse(1),
            HeaderAction::New => self.open_new(),
            HeaderAction::Recent => self.open_recent(),
            HeaderAction::Random => self.backend.load_random(),
            HeaderAction::Search => self.open_search(),
            HeaderAction::DownloadBackup => self.download_backup(),
            HeaderAction::Login => self.open_login(),
            HeaderAction::Logout => self.logout(),
            HeaderAction::ToggleTheme => self.toggle_theme(ctx),
            HeaderAction::Settings => self.open_settings(),
            HeaderAction::Edit(id) => self.open_edit(id),
        }
    }

    fn handle_list(&mut self, action: ListAction) {
        match action {
            ListAction::Open(id) => self.open_entry(id),
            ListAction::Page(page) => self.open_browse(page),
            ListAction::LoadMore => {
                if let View::Recent(view) = &mut self.view
                    && let Some((start, end)) = view.begin_load_more()
                {
                    self.backend.load_recent(start, end);
                }
            }
            ListAction::Delete(index) => {
                let session = self.config.session();
                if let View::Recent(view) = &self.view
                    && let Some(item) = view.item(index)
                {
                    self.backend.delete_recent(
                        session,
                        item.id.clone(),
                        item.timestamp,
                        item.kind == RecentKind::ImageAdded,
                    );
                }
            }
        }
    }

    fn handle_pasta(&mut self, ctx: &egui::Context, action: PastaAction) {
        match action {
            PastaAction::Previous(order) | PastaAction::Next(order) => {
                self.backend.load_by_order(order)
            }
            PastaAction::Random => self.backend.load_random(),
            PastaAction::Copy(text) => {
                ctx.copy_text(text);
                if let View::Pasta(view) = &mut self.view {
                    view.set_notice("Copied to clipboard");
                }
            }
            PastaAction::Edit(id) => self.open_edit(id),
            PastaAction::History(id) => self.open_history(id),
            PastaAction::Delete { id, timestamp } => {
                self.backend
                    .delete_entry(self.config.session(), id, timestamp)
            }
            PastaAction::OpenImage { id, filename } => {
                let url = self.backend.client().image_url(&id, &filename);
                ctx.open_url(egui::OpenUrl::new_tab(url));
            }
            PastaAction::DownloadImage { id, filename } => {
                let url = self.backend.client().image_url(&id, &filename);
                self.backend
                    .download(url, filename, self.config.download_dir());
            }
        }
    }

    fn handle_editor(&mut self, action: EditorAction) {
        let session = self.config.session();
        match action {
            EditorAction::PickImage => match self.view {
                View::New(_) => self.backend.pick_image(PickTarget::NewEntry),
                View::Edit(_) => self.backend.pick_image(PickTarget::EditEntry),
                _ => {}
            },
            EditorAction::Save { id, content, image } => {
                self.backend.save_entry(session, id, content, image)
            }
            EditorAction::Cancel(id) => self.open_entry(id),
            EditorAction::DeleteImage(id) => self.backend.delete_image(session, id),
            EditorAction::Create {
                title,
                content,
                image,
                found_in_google,
            } => self
                .backend
                .create_entry(session, title, content, image, found_in_google),
            EditorAction::AnswerCaptcha { answer, index } => {
                self.backend.answer_captcha(answer, index)
            }
        }
    }
}

impl eframe::App for KopiopastaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(message) = self.receiver.try_recv() {
            self.handle_response(message);
        }

        let logged_in = self.logged_in();
        let mut action = None;

        egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
            let current_entry = match &self.view {
                View::Pasta(view) => Some(view.id()),
                _ => None,
            };
            action = Header::show(
                ui,
                HeaderState {
                    title: DEFAULT_WINDOW_TITLE,
                    logged_in,
                    theme: self.theme,
                    current_entry,
                },
            )
            .map(Action::Header);
        });

        if let Some(status) = &self.status {
            let mut dismissed = false;
            egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(status).small());
                    if ui.small_button("✖").clicked() {
                        dismissed = true;
                    }
                });
            });
            if dismissed {
                self.status = None;
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let view_action = match &mut self.view {
                View::Browse(view) => view.show(ui).map(Action::List),
                View::Recent(view) => view.show(ui, logged_in).map(Action::List),
                View::Search(view) => view.show(ui).map(Action::Search),
                View::Pasta(view) => view.show(ui, logged_in).map(Action::Pasta),
                View::Edit(view) => view.show(ui, logged_in).map(Action::Editor),
                View::New(view) => view.show(ui, logged_in).map(Action::Editor),
                View::History(view) => view.show(ui).map(Action::History),
                View::Login(view) => view.show(ui).map(Action::Login),
                View::Settings(view) => view.show(ui, self.theme, logged_in).map(Action::Settings),
            };
            if view_action.is_some() {
                action = view_action;
            }
        });

        if let Some(action) = action {
            self.dispatch(ctx, action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_config() -> (Config, PathBuf) {
        let test_dir = std::env::temp_dir().join(format!("test_app_{}", Uuid::new_v4()));
        fs::create_dir_all(&test_dir).unwrap();
        let mut config = Config::load_from(&test_dir.join("settings.toml")).unwrap();
        config.set_auth_token(Some("secret".to_string()));
        config.set_captcha_token(Some("solved".to_string()));
        (config, test_dir)
    }

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            status: code,
            message: "failed".to_string(),
        }
    }

    #[test]
    fn unauthorized_write_clears_auth_token() {
        let (mut config, test_dir) = temp_config();

        assert!(!apply_auth_error(&mut config, &status(500)));
        assert!(config.session().is_logged_in());

        let rejected = ApiError::Unauthorized("Invalid token".to_string());
        assert!(apply_auth_error(&mut config, &rejected));
        assert!(!config.session().is_logged_in());
        assert_eq!(config.session().captcha_token.as_deref(), Some("solved"));

        let reloaded = Config::load_from(&test_dir.join("settings.toml")).unwrap();
        assert_eq!(reloaded.session().auth_token, None);

        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn valid_captcha_token_is_kept() {
        let (mut config, test_dir) = temp_config();

        apply_captcha_verification(&mut config, &Ok(true));
        assert_eq!(config.session().captcha_token.as_deref(), Some("solved"));

        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn failed_captcha_verification_clears_token() {
        for result in [Ok(false), Err(status(403))] {
            let (mut config, test_dir) = temp_config();

            apply_captcha_verification(&mut config, &result);
            assert_eq!(config.session().captcha_token, None);
            assert!(config.session().is_logged_in());

            let reloaded = Config::load_from(&test_dir.join("settings.toml")).unwrap();
            assert_eq!(reloaded.session().captcha_token, None);

            let _ = fs::remove_dir_all(test_dir);
        }
    }

    #[test]
    fn backup_name_carries_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(backup_file_name(date), "kopiopastat-backup-2024-03-07");
    }
}
