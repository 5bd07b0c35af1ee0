//! Mouthpiece speech server: synthesizes speech and pairs it with a viseme
//! timeline for avatar lip-sync.

pub mod config;
pub mod server;
pub mod synth;

pub use config::ServerConfig;
pub use server::{handle_connection, handle_request, parse_request, serve, Reply};
pub use synth::{EspeakSynthesizer, SpeechSynthesizer, SynthError, SynthesizedSpeech};
