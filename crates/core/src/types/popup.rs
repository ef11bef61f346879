//! Transient result messages carried across a navigation boundary.

use serde::{Deserialize, Serialize};

/// Background color used for success messages.
pub const SUCCESS_COLOR: &str = "#008236";

/// Background color used for failure messages.
pub const FAILURE_COLOR: &str = "red";

/// A one-shot popup message.
///
/// Stored as `{"backgroundColor", "header", "content", "showCloseButton"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupMessage {
    pub background_color: String,
    pub header: String,
    pub content: String,
    pub show_close_button: bool,
}

impl PopupMessage {
    /// A success message. Closes on its own, so no close button.
    #[must_use]
    pub fn success(header: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            background_color: SUCCESS_COLOR.to_string(),
            header: header.into(),
            content: content.into(),
            show_close_button: false,
        }
    }

    /// A failure message with a close button.
    #[must_use]
    pub fn failure(header: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            background_color: FAILURE_COLOR.to_string(),
            header: header.into(),
            content: content.into(),
            show_close_button: true,
        }
    }

    /// Whether this is a failure message.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.background_color == FAILURE_COLOR
    }
}
