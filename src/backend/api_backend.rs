use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::models::{
    CaptchaAnswerRequest, CaptchaQuestion, CaptchaValidity, DeleteOutcome, DeleteRequest,
    EditRequest, Entry, EntryId, EntryRef, History, IdRequest, ListItem, LoginRequest,
    RecentItem, TokenResponse,
};
use crate::config::Session;
use crate::constant::IMAGE_EXTENSIONS;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported image type: {0}")]
    UnsupportedImage(PathBuf),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// An image picked from disk, ready to be sent as a multipart file part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub path: PathBuf,
    pub filename: String,
    pub mime: &'static str,
}

impl ImageUpload {
    /// Accepts the formats the backend stores: jpg, jpeg, png and avif
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let mime = image_mime(path).ok_or_else(|| ApiError::UnsupportedImage(path.to_path_buf()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::UnsupportedImage(path.to_path_buf()))?
            .to_string();
        Ok(Self {
            path: path.to_path_buf(),
            filename,
            mime,
        })
    }

    fn to_part(&self) -> Result<Part, ApiError> {
        let bytes = fs::read(&self.path)?;
        Ok(Part::bytes(bytes)
            .file_name(self.filename.clone())
            .mime_str(self.mime)?)
    }
}

pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(match ext.as_str() {
        "png" => "image/png",
        "avif" => "image/avif",
        _ => "image/jpeg",
    })
}

/// Human readable message for a failed response.
///
/// Uses the `detail` field of the JSON body when the backend sent one: a plain
/// string as-is, a list of validation errors joined by their `msg`.
pub fn error_message(body: &Value, status: StatusCode) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item
                .get("msg")
                .and_then(Value::as_str)
                .filter(|msg| !msg.is_empty())
            {
                Some(msg) => msg.to_string(),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => format!(
            "Error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ),
    }
}

/// Turn a non-success status and its body into an error.
/// Authenticated writes report 401 separately so the caller can drop the token.
pub fn status_error(status: StatusCode, body: &str, auth_required: bool) -> ApiError {
    let payload = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
    let message = error_message(&payload, status);
    if auth_required && status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized(message)
    } else {
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Blocking client for the kopiopasta REST API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn image_url(&self, id: &EntryId, filename: &str) -> String {
        self.endpoint(&format!("images/{}/{}", id, filename))
    }

    pub fn backup_url(&self) -> String {
        self.endpoint("download_backup")
    }

    fn with_auth(builder: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.auth_token.as_deref() {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    fn with_captcha(builder: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.captcha_token.as_deref() {
            Some(token) if !token.is_empty() => builder.header("X-Captcha", token),
            _ => builder,
        }
    }

    fn check(response: Response, auth_required: bool) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let error = status_error(status, &body, auth_required);
        tracing::warn!("Request failed with {}: {}", status, error);
        Err(error)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::info!("GET {}", url);
        let response = self.client.get(&url).query(query).send()?;
        Self::decode(Self::check(response, false)?)
    }

    pub fn browse(&self, start: usize, end: usize) -> Result<Vec<ListItem>, ApiError> {
        self.get_json(
            "browse",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
    }

    pub fn entry(&self, id: &EntryId) -> Result<Entry, ApiError> {
        self.get_json("pasta", &[("id", id.to_string())])
    }

    pub fn random(&self) -> Result<EntryRef, ApiError> {
        self.get_json("random", &[])
    }

    pub fn history(&self, id: &EntryId) -> Result<History, ApiError> {
        self.get_json("history", &[("id", id.to_string())])
    }

    pub fn search(&self, query: &str) -> Result<Vec<ListItem>, ApiError> {
        self.get_json("search", &[("q", query.to_string())])
    }

    pub fn recent(&self, start: usize, end: usize) -> Result<Vec<RecentItem>, ApiError> {
        self.get_json(
            "recent_edits",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
    }

    pub fn data_version(&self) -> Result<Value, ApiError> {
        self.get_json("data_version", &[])
    }

    pub fn get_by_order(&self, order: u64) -> Result<EntryRef, ApiError> {
        self.get_json("get_by_order", &[("order", order.to_string())])
    }

    pub fn captcha_question(&self) -> Result<CaptchaQuestion, ApiError> {
        self.get_json("captcha_question", &[])
    }

    /// Returns the captcha token to store on success
    pub fn captcha_answer(&self, answer: &str, index: i64) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.endpoint("captcha_answer"))
            .json(&CaptchaAnswerRequest { answer, index })
            .send()?;
        let token: TokenResponse = Self::decode(Self::check(response, false)?)?;
        Ok(token.token)
    }

    pub fn verify_captcha(&self, session: &Session) -> Result<bool, ApiError> {
        let builder = self.client.get(self.endpoint("verify_captcha"));
        let response = Self::with_captcha(builder, session).send()?;
        let validity: CaptchaValidity = Self::decode(Self::check(response, false)?)?;
        Ok(validity.valid)
    }

    pub fn edit(&self, session: &Session, id: &EntryId, content: &str) -> Result<Value, ApiError> {
        let builder = self.client.post(self.endpoint("edit")).json(&EditRequest {
            id: id.as_str(),
            content,
        });
        let response = Self::with_auth(builder, session).send()?;
        Self::decode(Self::check(response, true)?)
    }

    pub fn create(
        &self,
        session: &Session,
        title: &str,
        content: &str,
        image: Option<&ImageUpload>,
        found_in_google: bool,
    ) -> Result<EntryRef, ApiError> {
        let mut form = Form::new()
            .text("title", title.to_string())
            .text("content", content.to_string())
            .text("found_in_google", found_in_google.to_string());
        if let Some(image) = image {
            form = form
                .text("filename", image.filename.clone())
                .part("file", image.to_part()?);
        }

        let builder = self.client.post(self.endpoint("new")).multipart(form);
        let builder = Self::with_captcha(Self::with_auth(builder, session), session);
        let response = builder.send()?;
        Self::decode(Self::check(response, true)?)
    }

    /// Returns the auth token
    pub fn login(&self, code: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.endpoint("login"))
            .json(&LoginRequest { code })
            .send()?;
        let token: TokenResponse = Self::decode(Self::check(response, false)?)?;
        Ok(token.token)
    }

    pub fn logout(&self, session: &Session) -> Result<(), ApiError> {
        let builder = self.client.post(self.endpoint("logout"));
        let response = Self::with_auth(builder, session).send()?;
        Self::check(response, false)?;
        Ok(())
    }

    pub fn delete(&self, session: &Session, id: &EntryId, timestamp: i64) -> Result<DeleteOutcome, ApiError> {
        let builder = self.client.post(self.endpoint("delete")).json(&DeleteRequest {
            id: id.as_str(),
            timestamp,
        });
        let response = Self::with_auth(builder, session).send()?;
        Self::decode(Self::check(response, true)?)
    }

    pub fn upload_image(&self, session: &Session, id: &EntryId, image: &ImageUpload) -> Result<Value, ApiError> {
        let form = Form::new()
            .text("id", id.to_string())
            .text("filename", image.filename.clone())
            .part("file", image.to_part()?);
        let builder = self.client.post(self.endpoint("upload_image")).multipart(form);
        let builder = Self::with_captcha(Self::with_auth(builder, session), session);
        let response = builder.send()?;
        Self::decode(Self::check(response, true)?)
    }

    pub fn delete_image(&self, session: &Session, id: &EntryId) -> Result<Value, ApiError> {
        let builder = self
            .client
            .post(self.endpoint("delete_image"))
            .json(&IdRequest { id: id.as_str() });
        let response = Self::with_auth(builder, session).send()?;
        Self::decode(Self::check(response, true)?)
    }

    /// Fetch raw bytes from a URL on this backend and write them to `target`
    pub fn download(&self, url: &str, target: &Path) -> Result<PathBuf, ApiError> {
        tracing::info!("Downloading {} to {:?}", url, target);
        let response = Self::check(self.client.get(url).send()?, false)?;
        let bytes = response.bytes()?;
        fs::write(target, &bytes)?;
        Ok(target.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_from_string_detail() {
        let body = json!({"detail": "Pasta not found"});
        assert_eq!(error_message(&body, StatusCode::NOT_FOUND), "Pasta not found");
    }

    #[test]
    fn message_from_validation_list() {
        let body = json!({"detail": [
            {"loc": ["body", "title"], "msg": "field required"},
            {"loc": ["body", "content"]}
        ]});
        assert_eq!(
            error_message(&body, StatusCode::UNPROCESSABLE_ENTITY),
            r#"field required, {"loc":["body","content"]}"#
        );
    }

    #[test]
    fn empty_detail_falls_back() {
        assert_eq!(
            error_message(&json!({"detail": ""}), StatusCode::NOT_FOUND),
            "Error 404: Not Found"
        );
        assert_eq!(
            error_message(&json!({"detail": [{"msg": "", "type": "missing"}]}), StatusCode::BAD_REQUEST),
            r#"{"msg":"","type":"missing"}"#
        );
    }

    #[test]
    fn message_falls_back_to_status() {
        assert_eq!(
            error_message(&json!({}), StatusCode::INTERNAL_SERVER_ERROR),
            "Error 500: Internal Server Error"
        );
        assert_eq!(
            error_message(&Value::Null, StatusCode::BAD_GATEWAY),
            "Error 502: Bad Gateway"
        );
    }

    #[test]
    fn unauthorized_only_for_authenticated_calls() {
        let body = r#"{"detail": "Invalid token"}"#;
        let error = status_error(StatusCode::UNAUTHORIZED, body, true);
        assert!(error.is_unauthorized());
        assert_eq!(error.to_string(), "Invalid token");

        let error = status_error(StatusCode::UNAUTHORIZED, body, false);
        assert!(!error.is_unauthorized());
        assert!(matches!(error, ApiError::Status { status: 401, .. }));
    }

    #[test]
    fn non_json_error_body() {
        let error = status_error(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>", false);
        assert_eq!(error.to_string(), "Error 503: Service Unavailable");
    }

    #[test]
    fn urls_are_built_from_base() {
        let client = ApiClient::new("https://example.org/api/");
        assert_eq!(client.base_url(), "https://example.org/api");
        assert_eq!(client.endpoint("/browse"), "https://example.org/api/browse");
        assert_eq!(
            client.image_url(&EntryId::from("12"), "kuva.png"),
            "https://example.org/api/images/12/kuva.png"
        );
        assert_eq!(client.backup_url(), "https://example.org/api/download_backup");
    }

    #[test]
    fn image_types() {
        assert_eq!(image_mime(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(image_mime(Path::new("a.jpg")), Some("image/jpeg"));
        assert_eq!(image_mime(Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime(Path::new("a.avif")), Some("image/avif"));
        assert_eq!(image_mime(Path::new("a.gif")), None);
        assert_eq!(image_mime(Path::new("noext")), None);

        let upload = ImageUpload::from_path(Path::new("/tmp/kuva.png")).unwrap();
        assert_eq!(upload.filename, "kuva.png");
        assert!(matches!(
            ImageUpload::from_path(Path::new("/tmp/doc.txt")),
            Err(ApiError::UnsupportedImage(_))
        ));
    }
}
