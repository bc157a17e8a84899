//! Kopiopasta desktop client library
//!
//! Exposes the API client, configuration, revision diff engine and views
//! so they can be exercised from tests.

pub mod app;
pub mod backend;
pub mod config;
pub mod constant;
pub mod messages;
pub mod style;
pub mod ui;
