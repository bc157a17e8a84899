// Window size constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 900.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 640.0;
pub const DEFAULT_WINDOW_TITLE: &str = "Kopiopastat";

/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "org";
pub const APP_ORGANIZATION: &str = "kopiopastat";
pub const APP_NAME: &str = "Kopiopasta";

/// Backend defaults
pub const DEFAULT_API_URL: &str = "https://kopiopastat.org/api";
pub const API_URL_ENV: &str = "KOPIOPASTA_API_URL";

/// App related Magic Numbers
pub const PAGE_SIZE: usize = 100;
pub const SEARCH_MIN_CHARS: usize = 3;
pub const PREVIEW_CHARS: usize = 128;

/// Image formats the backend accepts
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "avif"];
