use crate::backend::api_backend::ApiError;
use crate::backend::models::{
    CaptchaQuestion, DeleteOutcome, Entry, EntryId, EntryRef, History, ListItem, RecentItem,
};
use serde_json::Value;
use std::path::PathBuf;

/// Where a picked image file should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    NewEntry,
    EditEntry,
}

/// Response messages from background operations
pub enum ResponseMessage {
    BrowseLoaded {
        start: usize,
        end: usize,
        result: Result<Vec<ListItem>, ApiError>,
    },
    RecentLoaded {
        start: usize,
        end: usize,
        result: Result<Vec<RecentItem>, ApiError>,
    },
    SearchLoaded {
        query: String,
        result: Result<Vec<ListItem>, ApiError>,
    },
    EntryLoaded {
        id: EntryId,
        result: Result<Entry, ApiError>,
    },
    /// Random or prev/next lookup finished; the app navigates on success
    EntryResolved(Result<EntryRef, ApiError>),
    HistoryLoaded {
        id: EntryId,
        result: Result<History, ApiError>,
    },
    DataVersionLoaded(Result<Value, ApiError>),
    CaptchaQuestionLoaded(Result<CaptchaQuestion, ApiError>),
    CaptchaAnswered(Result<String, ApiError>),
    CaptchaVerified(Result<bool, ApiError>),
    EntryCreated(Result<EntryRef, ApiError>),
    EntrySaved {
        id: EntryId,
        result: Result<(), ApiError>,
    },
    EntryDeleted {
        id: EntryId,
        result: Result<DeleteOutcome, ApiError>,
    },
    /// Rows are matched by entry and revision, never by list position
    RecentItemDeleted {
        id: EntryId,
        timestamp: i64,
        result: Result<(), ApiError>,
    },
    ImageDeleted {
        id: EntryId,
        result: Result<(), ApiError>,
    },
    LoggedIn(Result<String, ApiError>),
    LoggedOut(Result<(), ApiError>),
    /// `None` when the save dialog was cancelled
    Downloaded(Result<Option<PathBuf>, ApiError>),
    ImagePicked {
        target: PickTarget,
        path: PathBuf,
    },
}
