//! Builders for timestamped message values.

use chrono::Utc;

use super::types::{ChatMessage, Coordinates, LocationMessage};

/// Sender name used for system notices.
pub const ADMIN_SENDER: &str = "Admin";

/// Stamps a text message with the current time.
pub fn format_message(sender: &str, text: &str) -> ChatMessage {
    ChatMessage {
        sender: sender.to_string(),
        body: text.to_string(),
        created_at: Utc::now(),
    }
}

/// Stamps a location message with the current time.
pub fn format_location_message(sender: &str, url: &str) -> LocationMessage {
    LocationMessage {
        sender: sender.to_string(),
        url: url.to_string(),
        created_at: Utc::now(),
    }
}

/// Map link for a pair of coordinates.
pub fn location_url(coords: Coordinates) -> String {
    format!(
        "https://google.com/maps?q={},{}",
        coords.latitude, coords.longitude
    )
}

/// Greeting sent to a connection that just joined.
pub fn welcome_notice(room: &str) -> ChatMessage {
    format_message(ADMIN_SENDER, &format!("Welcome to room, {room}"))
}

/// Notice sent to the rest of the room when someone joins.
pub fn joined_notice(username: &str) -> ChatMessage {
    format_message(ADMIN_SENDER, &format!("{username} has joined!"))
}

/// Notice sent to the remaining members when someone leaves.
pub fn left_notice(username: &str) -> ChatMessage {
    format_message(ADMIN_SENDER, &format!("{username} has left!"))
}
