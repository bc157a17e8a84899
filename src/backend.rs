//! Background access to the kopiopasta API.
//!
//! Every call runs on its own thread and reports back through a
//! [`ResponseMessage`]. Calls are neither retried nor cancelled; the app decides
//! on arrival whether the answer still matters.

pub mod api_backend;
pub mod models;

use crate::config::Session;
use crate::messages::{PickTarget, ResponseMessage};
use api_backend::{ApiClient, ImageUpload};
use models::EntryId;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

pub struct Backend {
    client: Arc<ApiClient>,
    sender: Sender<ResponseMessage>,
    ctx: egui::Context,
}

impl Backend {
    pub fn new(base_url: String, sender: Sender<ResponseMessage>, ctx: egui::Context) -> Self {
        tracing::info!("Using API at {}", base_url);
        Self {
            client: Arc::new(ApiClient::new(base_url)),
            sender,
            ctx,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce(&ApiClient) -> ResponseMessage + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        thread::spawn(move || {
            let message = job(&client);
            if sender.send(message).is_err() {
                tracing::warn!("Response dropped, UI is gone");
            }
            ctx.request_repaint();
        });
    }

    pub fn load_browse(&self, start: usize, end: usize) {
        self.spawn(move |c| ResponseMessage::BrowseLoaded {
            start,
            end,
            result: c.browse(start, end),
        });
    }

    pub fn load_recent(&self, start: usize, end: usize) {
        self.spawn(move |c| ResponseMessage::RecentLoaded {
            start,
            end,
            result: c.recent(start, end),
        });
    }

    pub fn search(&self, query: String) {
        self.spawn(move |c| {
            let result = c.search(&query);
            ResponseMessage::SearchLoaded { query, result }
        });
    }

    pub fn load_entry(&self, id: EntryId) {
        self.spawn(move |c| {
            let result = c.entry(&id);
            ResponseMessage::EntryLoaded { id, result }
        });
    }

    pub fn load_random(&self) {
        self.spawn(|c| ResponseMessage::EntryResolved(c.random()));
    }

    pub fn load_by_order(&self, order: u64) {
        self.spawn(move |c| ResponseMessage::EntryResolved(c.get_by_order(order)));
    }

    pub fn load_history(&self, id: EntryId) {
        self.spawn(move |c| {
            let result = c.history(&id);
            ResponseMessage::HistoryLoaded { id, result }
        });
    }

    pub fn load_data_version(&self) {
        self.spawn(|c| ResponseMessage::DataVersionLoaded(c.data_version()));
    }

    pub fn load_captcha_question(&self) {
        self.spawn(|c| ResponseMessage::CaptchaQuestionLoaded(c.captcha_question()));
    }

    pub fn answer_captcha(&self, answer: String, index: i64) {
        self.spawn(move |c| ResponseMessage::CaptchaAnswered(c.captcha_answer(&answer, index)));
    }

    pub fn verify_captcha(&self, session: Session) {
        self.spawn(move |c| ResponseMessage::CaptchaVerified(c.verify_captcha(&session)));
    }

    pub fn create_entry(
        &self,
        session: Session,
        title: String,
        content: String,
        image: Option<ImageUpload>,
        found_in_google: bool,
    ) {
        self.spawn(move |c| {
            ResponseMessage::EntryCreated(c.create(
                &session,
                &title,
                &content,
                image.as_ref(),
                found_in_google,
            ))
        });
    }

    /// Post the edit, then upload the image if one was chosen
    pub fn save_entry(&self, session: Session, id: EntryId, content: String, image: Option<ImageUpload>) {
        self.spawn(move |c| {
            let result = c.edit(&session, &id, &content).and_then(|_| match &image {
                Some(image) => c.upload_image(&session, &id, image).map(|_| ()),
                None => Ok(()),
            });
            ResponseMessage::EntrySaved { id, result }
        });
    }

    pub fn delete_entry(&self, session: Session, id: EntryId, timestamp: i64) {
        self.spawn(move |c| {
            let result = c.delete(&session, &id, timestamp);
            ResponseMessage::EntryDeleted { id, result }
        });
    }

    pub fn delete_image(&self, session: Session, id: EntryId) {
        self.spawn(move |c| {
            let result = c.delete_image(&session, &id).map(|_| ());
            ResponseMessage::ImageDeleted { id, result }
        });
    }

    /// Delete a row of the recent list: an added image or a single revision
    pub fn delete_recent(&self, session: Session, id: EntryId, timestamp: i64, image_only: bool) {
        self.spawn(move |c| {
            let result = if image_only {
                c.delete_image(&session, &id).map(|_| ())
            } else {
                c.delete(&session, &id, timestamp).map(|_| ())
            };
            ResponseMessage::RecentItemDeleted {
                id,
                timestamp,
                result,
            }
        });
    }

    pub fn login(&self, code: String) {
        self.spawn(move |c| ResponseMessage::LoggedIn(c.login(&code)));
    }

    pub fn logout(&self, session: Session) {
        self.spawn(move |c| ResponseMessage::LoggedOut(c.logout(&session)));
    }

    /// Ask for a target file, then download `url` into it
    pub fn download(&self, url: String, suggested_name: String, directory: PathBuf) {
        self.spawn(move |c| {
            let target = rfd::FileDialog::new()
                .set_directory(&directory)
                .set_file_name(&suggested_name)
                .save_file();
            let result = match target {
                Some(path) => c.download(&url, &path).map(Some),
                None => Ok(None),
            };
            ResponseMessage::Downloaded(result)
        });
    }

    /// Open a native picker for an image without blocking the UI thread
    pub fn pick_image(&self, target: PickTarget) {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        thread::spawn(move || {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Image", crate::constant::IMAGE_EXTENSIONS)
                .pick_file()
                && let Err(e) = sender.send(ResponseMessage::ImagePicked { target, path })
            {
                tracing::error!("Failed to send picked image: {}", e);
            }
            ctx.request_repaint();
        });
    }
}
