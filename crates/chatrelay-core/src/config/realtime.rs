//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-connection outbound queue capacity.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// WebSocket ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Grace period after a missed ping before the connection is dropped.
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_seconds: u64,
    /// Largest accepted inbound text frame in bytes.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
    /// Maximum username and room name length in characters (after trimming).
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Profanity filter settings.
    #[serde(default)]
    pub profanity: ProfanityConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            ping_interval_seconds: default_ping_interval(),
            ping_timeout_seconds: default_ping_timeout(),
            max_frame_bytes: default_max_frame_bytes(),
            max_name_length: default_max_name_length(),
            profanity: ProfanityConfig::default(),
        }
    }
}

/// Word-list profanity filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfanityConfig {
    /// Whether `sendMessage` text is checked at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Words rejected in addition to the built-in list.
    #[serde(default)]
    pub extra_words: Vec<String>,
    /// Built-in words that should be allowed.
    #[serde(default)]
    pub allowed_words: Vec<String>,
}

impl Default for ProfanityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_words: Vec::new(),
            allowed_words: Vec::new(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_ping_interval() -> u64 {
    25
}

fn default_ping_timeout() -> u64 {
    20
}

fn default_max_frame_bytes() -> usize {
    65_536
}

fn default_max_name_length() -> usize {
    64
}

fn default_true() -> bool {
    true
}
