//! Shared protocol definitions for Mouthpiece client-server communication.
//!
//! The protocol is simple:
//! - Client sends: JSON text message with a [`Request`]
//! - Server returns: JSON [`Response`]; a speech request is answered with
//!   [`Response::SpeechReady`] (metadata and viseme timeline) followed by one
//!   binary message holding the WAV audio.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use mouthpiece_viseme::{TimelineEntry, VisemeId};

/// Request from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Request {
    /// Synthesize speech and return audio with its viseme timeline
    Speak(SpeakRequest),
    /// Viseme label table
    VisemeMapping,
    /// Supported avatar formats and animation features
    AvatarInfo,
    /// Service health
    Health,
    /// Ping to keep connection alive
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakRequest {
    /// The text to speak
    pub text: String,
    /// Language code (e.g., "en")
    #[serde(default = "default_language")]
    pub language: String,
    /// Speech provider name
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

impl SpeakRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: default_language(),
            provider: default_provider(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }
}

/// Response from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Audio is coming next as a binary message
    SpeechReady {
        /// Duration in seconds
        duration_secs: f64,
        sample_rate: u32,
        channels: u16,
        /// Container format of the binary message
        format: String,
        /// Size of the audio data in bytes
        size_bytes: usize,
        /// The text that was spoken, after trimming
        text: String,
        language: String,
        provider: String,
        visemes: Vec<TimelineEntry>,
    },
    VisemeMapping {
        viseme_map: BTreeMap<String, VisemeId>,
        /// Articulatory category name keyed by viseme id in decimal, since
        /// JSON object keys are strings
        categories: BTreeMap<String, String>,
        viseme_count: usize,
        description: String,
    },
    AvatarInfo {
        supported_formats: Vec<String>,
        avatar_providers: Vec<String>,
        animation_features: Vec<String>,
        viseme_count: usize,
        real_time_capable: bool,
    },
    Health {
        status: String,
        /// RFC 3339
        timestamp: String,
        service: String,
    },
    /// Pong response to ping
    Pong,
    /// Error occurred
    Error { message: String },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

pub const DEFAULT_PROVIDER: &str = "espeak";
pub const SERVICE_NAME: &str = "Mouthpiece Avatar Speech API";
pub const AUDIO_FORMAT: &str = "wav";
