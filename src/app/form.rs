//! Form state: the text to save, the key to fetch, and what came back

use crate::api::ApiError;
use crate::constants::{MSG_EMPTY_KEY, MSG_EMPTY_TEXT, MSG_INVALID_KEY};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClipboardForm {
    /// Text the user wants to store
    pub value: String,
    /// Key typed into the retrieve field
    pub key: String,
    /// Key issued by the last successful save
    pub response_key: String,
    /// Error line shown under the text area
    pub error: String,
    /// Text fetched by the last successful get
    pub retrieved_value: String,
}

impl ClipboardForm {
    /// Text to send, or `None` after flagging an empty input.
    /// The text goes out untrimmed; the backend trims it.
    pub fn prepare_save(&mut self) -> Option<String> {
        if self.value.trim().is_empty() {
            self.error = MSG_EMPTY_TEXT.to_string();
            self.value.clear();
            return None;
        }
        Some(self.value.clone())
    }

    /// Trimmed key to fetch, or `None` after flagging an empty input.
    /// `.` and `..` are refused: URL normalization would drop them from the path.
    pub fn prepare_get(&mut self) -> Option<String> {
        let key = self.key.trim();
        if key.is_empty() {
            self.error = MSG_EMPTY_KEY.to_string();
            self.key.clear();
            return None;
        }
        if key == "." || key == ".." {
            self.error = MSG_INVALID_KEY.to_string();
            return None;
        }
        Some(key.to_string())
    }

    pub fn apply_save(&mut self, result: &Result<String, ApiError>) {
        match result {
            Ok(key) => {
                self.response_key = key.clone();
                self.error.clear();
            }
            Err(e) => {
                if let Some(msg) = e.server_message() {
                    self.error = msg.to_string();
                    self.response_key.clear();
                }
            }
        }
    }

    pub fn apply_get(&mut self, result: &Result<String, ApiError>) {
        match result {
            Ok(data) => {
                self.retrieved_value = data.clone();
                self.error.clear();
                self.response_key.clear();
            }
            Err(e) => {
                if let Some(msg) = e.server_message() {
                    self.error = msg.to_string();
                }
            }
        }
    }

    pub fn show_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn show_response_key(&self) -> bool {
        !self.response_key.is_empty()
    }

    pub fn show_retrieved(&self) -> bool {
        !self.retrieved_value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_text_is_rejected_and_cleared() {
        let mut form = ClipboardForm {
            value: "  \n\t ".into(),
            ..Default::default()
        };
        assert_eq!(form.prepare_save(), None);
        assert_eq!(form.error, MSG_EMPTY_TEXT);
        assert!(form.value.is_empty());
        assert!(form.show_error());
    }

    #[test]
    fn text_is_sent_untrimmed() {
        let mut form = ClipboardForm {
            value: "  hello  ".into(),
            error: "old".into(),
            ..Default::default()
        };
        assert_eq!(form.prepare_save().as_deref(), Some("  hello  "));
        // The error line is only cleared once the save succeeds
        assert_eq!(form.error, "old");
    }

    #[test]
    fn empty_key_is_rejected_and_cleared() {
        let mut form = ClipboardForm {
            key: "   ".into(),
            ..Default::default()
        };
        assert_eq!(form.prepare_get(), None);
        assert_eq!(form.error, MSG_EMPTY_KEY);
        assert!(form.key.is_empty());
    }

    #[test]
    fn dot_keys_are_rejected() {
        for key in [".", "..", " .. "] {
            let mut form = ClipboardForm {
                key: key.into(),
                ..Default::default()
            };
            assert_eq!(form.prepare_get(), None, "{key:?}");
            assert_eq!(form.error, MSG_INVALID_KEY);
        }

        let mut form = ClipboardForm {
            key: "...".into(),
            ..Default::default()
        };
        assert_eq!(form.prepare_get().as_deref(), Some("..."));
    }

    #[test]
    fn key_is_trimmed() {
        let mut form = ClipboardForm {
            key: " a1b2c3 ".into(),
            ..Default::default()
        };
        assert_eq!(form.prepare_get().as_deref(), Some("a1b2c3"));
        assert_eq!(form.key, " a1b2c3 ");
    }

    #[test]
    fn successful_save_shows_key_and_clears_error() {
        let mut form = ClipboardForm {
            error: MSG_EMPTY_TEXT.into(),
            ..Default::default()
        };
        form.apply_save(&Ok("0f3a9c".into()));
        assert_eq!(form.response_key, "0f3a9c");
        assert!(!form.show_error());
        assert!(form.show_response_key());
    }

    #[test]
    fn server_error_on_save_replaces_key() {
        let mut form = ClipboardForm {
            response_key: "0f3a9c".into(),
            ..Default::default()
        };
        form.apply_save(&Err(ApiError::Server("Failed to save data".into())));
        assert_eq!(form.error, "Failed to save data");
        assert!(form.response_key.is_empty());
    }

    #[test]
    fn transport_error_leaves_form_untouched() {
        let form = ClipboardForm {
            response_key: "0f3a9c".into(),
            error: "previous".into(),
            retrieved_value: "text".into(),
            ..Default::default()
        };

        let mut after_save = form.clone();
        after_save.apply_save(&Err(ApiError::Transport("connection refused".into())));
        assert_eq!(after_save, form);

        let mut after_get = form.clone();
        after_get.apply_get(&Err(ApiError::Status(502)));
        assert_eq!(after_get, form);

        let mut after_missing = form.clone();
        after_missing.apply_get(&Err(ApiError::MissingField("Failed to retrieve data")));
        assert_eq!(after_missing, form);
    }

    #[test]
    fn successful_get_shows_text_and_clears_key_and_error() {
        let mut form = ClipboardForm {
            response_key: "0f3a9c".into(),
            error: "Invalid Key".into(),
            ..Default::default()
        };
        form.apply_get(&Ok("stored text".into()));
        assert_eq!(form.retrieved_value, "stored text");
        assert!(form.error.is_empty());
        assert!(form.response_key.is_empty());
        assert!(form.show_retrieved());
    }

    #[test]
    fn server_error_on_get_is_shown_verbatim() {
        let mut form = ClipboardForm {
            retrieved_value: "earlier text".into(),
            ..Default::default()
        };
        form.apply_get(&Err(ApiError::Server("Invalid Key".into())));
        assert_eq!(form.error, "Invalid Key");
        assert_eq!(form.retrieved_value, "earlier text");
    }
}
