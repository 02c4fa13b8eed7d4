//! Application constants and configuration

pub const APP_NAME: &str = "Online Clipboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when neither the environment nor settings.json name one
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
/// Environment variable that overrides the configured backend URL
pub const BACKEND_URL_ENV: &str = "CLIPBOARD_BACKEND_URL";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;

/// How long the backend keeps a saved entry
pub const SERVER_TTL_SECS: i64 = 10 * 60;

pub const HISTORY_LIMIT: usize = 20;
pub const HISTORY_PREVIEW_CHARS: usize = 80;

// Toasts
pub const TOAST_VISIBLE_SECS: f32 = 3.0;
pub const TOAST_FADE_SECS: f32 = 0.5;
pub const TOAST_MAX: usize = 5;

// User-facing messages
pub const MSG_EMPTY_TEXT: &str = "Text cannot be empty";
pub const MSG_EMPTY_KEY: &str = "Key cannot be empty, Please enter a key";
// Same wording the backend uses for unknown keys
pub const MSG_INVALID_KEY: &str = "Invalid Key";
pub const MSG_SAVE_MISSING_KEY: &str = "Failed to save data";
pub const MSG_GET_MISSING_DATA: &str = "Failed to retrieve data";
pub const TOAST_SAVING: &str = "Saving...";
pub const TOAST_SAVED: &str = "Saved successfully";
pub const TOAST_SAVE_FAILED: &str = "Failed to save";
pub const TOAST_RETRIEVING: &str = "Retrieving...";
pub const TOAST_RETRIEVED: &str = "Retrieved successfully";
pub const TOAST_RETRIEVE_FAILED: &str = "Failed to retrieve";
pub const TOAST_COPIED: &str = "Copied to clipboard!";
pub const TOAST_COPY_FAILED: &str = "Failed to copy.";
