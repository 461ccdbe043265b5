//! Errors reported to a client on the acknowledgement channel.
//!
//! The `Display` text is exactly what the client receives, so messages are
//! written for people rather than logs.

use thiserror::Error;

/// Why an inbound event was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AckError {
    /// Username or room missing, blank, or too long.
    #[error("{0}")]
    Validation(String),

    /// Another member of the room already uses this name.
    #[error("Username is in use!")]
    NameTaken {
        /// Normalized room key.
        room: String,
        /// Requested username.
        username: String,
    },

    /// The connection already owns a session.
    #[error("You have already joined a room!")]
    AlreadyJoined,

    /// The connection has been torn down.
    #[error("Connection is closed")]
    Disconnected,

    /// Message text failed the profanity check.
    #[error("Profanity is not allowed!")]
    ProfanityRejected,

    /// The frame named an event the server does not handle.
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// The payload did not match the event's schema.
    #[error("Invalid payload for {event}: {reason}")]
    InvalidPayload {
        /// Event name.
        event: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// The frame could not be decoded at all.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// The frame exceeded the configured size limit.
    #[error("Frame exceeds maximum size of {max} bytes")]
    FrameTooLarge {
        /// Configured limit.
        max: usize,
    },
}

impl AckError {
    /// Builds the error for a missing username or room.
    pub fn required() -> Self {
        Self::Validation("Username and room are required!".to_string())
    }

    /// Short machine-readable code for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::NameTaken { .. } => "NAME_TAKEN",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::Disconnected => "DISCONNECTED",
            Self::ProfanityRejected => "PROFANITY",
            Self::UnknownEvent(_) => "UNKNOWN_EVENT",
            Self::InvalidPayload { .. } => "INVALID_PAYLOAD",
            Self::MalformedFrame(_) => "MALFORMED_FRAME",
            Self::FrameTooLarge { .. } => "FRAME_TOO_LARGE",
        }
    }
}
