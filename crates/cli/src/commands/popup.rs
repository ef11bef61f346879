//! Pending popup display.

use shopfront_core::PopupMessage;
use shopfront_storefront::state::AppState;

/// Show the pending popup, if any, and clear it.
pub fn show(state: &AppState) {
    match state.popups().take() {
        Some(message) => print(&message),
        None => tracing::info!("No pending popup"),
    }
}

/// Print a popup message.
#[allow(clippy::print_stdout)]
pub fn print(message: &PopupMessage) {
    let marker = if message.is_failure() { "!" } else { "*" };
    println!("[{marker}] {}: {}", message.header, message.content);
}
