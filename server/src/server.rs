//! WebSocket transport: accepts connections and answers protocol requests.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

use mouthpiece_protocol::{Request, Response, SpeakRequest, AUDIO_FORMAT, SERVICE_NAME};
use mouthpiece_viseme::{category_of, phoneme_table, VisemeId, VISEME_COUNT};

use crate::synth::SpeechSynthesizer;

/// What to send back for one request: a JSON response, optionally followed by
/// a binary audio message.
#[derive(Debug)]
pub struct Reply {
    pub response: Response,
    pub audio: Option<Vec<u8>>,
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self {
            response,
            audio: None,
        }
    }
}

/// Accept connections until the listener fails, one task per peer.
pub async fn serve<S: SpeechSynthesizer>(listener: TcpListener, synth: Arc<S>) -> Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let synth = Arc::clone(&synth);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, synth).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

pub async fn handle_connection<S: SpeechSynthesizer>(
    stream: TcpStream,
    peer_addr: SocketAddr,
    synth: Arc<S>,
) -> Result<()> {
    info!("New connection from: {}", peer_addr);

    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    while let Some(msg) = ws_receiver.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let reply = match parse_request(&text) {
                    Ok(request) => handle_request(request, synth.as_ref(), peer_addr).await,
                    Err(message) => Response::error(message).into(),
                };

                ws_sender
                    .send(Message::Text(serde_json::to_string(&reply.response)?))
                    .await?;
                if let Some(audio) = reply.audio {
                    ws_sender.send(Message::Binary(audio)).await?;
                }
            }
            Message::Binary(_) => {
                warn!("Received unexpected binary message from {}", peer_addr);
            }
            Message::Ping(data) => {
                ws_sender.send(Message::Pong(data)).await?;
            }
            Message::Pong(_) => {}
            Message::Close(_) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Message::Frame(_) => {}
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Parse a request, reporting a speak request without text distinctly from
/// other malformed input.
pub fn parse_request(text: &str) -> Result<Request, String> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| format!("Invalid request: {}", e))?;

    let is_speak = value.get("type").and_then(Value::as_str) == Some("Speak");
    if is_speak && value.get("data").and_then(|d| d.get("text")).is_none() {
        return Err("Text input required".to_string());
    }

    serde_json::from_value(value).map_err(|e| format!("Invalid request: {}", e))
}

pub async fn handle_request<S: SpeechSynthesizer>(
    request: Request,
    synth: &S,
    peer_addr: SocketAddr,
) -> Reply {
    match request {
        Request::Ping => Response::Pong.into(),
        Request::Health => Response::Health {
            status: "healthy".to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
            service: SERVICE_NAME.to_string(),
        }
        .into(),
        Request::VisemeMapping => viseme_mapping().into(),
        Request::AvatarInfo => avatar_info().into(),
        Request::Speak(req) => speak(req, synth, peer_addr).await,
    }
}

async fn speak<S: SpeechSynthesizer>(req: SpeakRequest, synth: &S, peer_addr: SocketAddr) -> Reply {
    let text = req.text.trim();
    if text.is_empty() {
        return Response::error("Empty text input").into();
    }
    if req.provider != synth.provider() {
        return Response::error(format!("Unsupported provider: {}", req.provider)).into();
    }

    info!(
        "Speaking {} chars for {} (language: {}, provider: {})",
        text.chars().count(),
        peer_addr,
        req.language,
        req.provider
    );

    let start = Instant::now();

    let speech = match synth.synthesize(text, &req.language).await {
        Ok(speech) => speech,
        Err(e) => {
            error!("TTS error: {}", e);
            return Response::error(format!("TTS error: {}", e)).into();
        }
    };

    let visemes = match mouthpiece_viseme::generate(text, speech.duration_secs) {
        Ok(visemes) => visemes,
        Err(e) => {
            error!("Viseme error: {}", e);
            return Response::error(e.to_string()).into();
        }
    };

    info!(
        "Generated {:.2}s audio ({} bytes, {} visemes) in {:?}",
        speech.duration_secs,
        speech.wav.len(),
        visemes.len(),
        start.elapsed()
    );

    Reply {
        response: Response::SpeechReady {
            duration_secs: speech.duration_secs,
            sample_rate: speech.sample_rate,
            channels: speech.channels,
            format: AUDIO_FORMAT.to_string(),
            size_bytes: speech.wav.len(),
            text: text.to_string(),
            language: req.language,
            provider: req.provider,
            visemes,
        },
        audio: Some(speech.wav),
    }
}

fn viseme_mapping() -> Response {
    let viseme_map: BTreeMap<String, _> = phoneme_table()
        .iter()
        .map(|(label, id)| (label.to_string(), *id))
        .collect();

    let categories = (0..VISEME_COUNT as VisemeId)
        .filter_map(|id| category_of(id).map(|c| (id.to_string(), c.as_str().to_string())))
        .collect();

    Response::VisemeMapping {
        viseme_map,
        categories,
        viseme_count: VISEME_COUNT,
        description: "Standard viseme mapping for lip-sync animation".to_string(),
    }
}

fn avatar_info() -> Response {
    let strings = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };

    Response::AvatarInfo {
        supported_formats: strings(&["GLB", "GLTF"]),
        avatar_providers: strings(&["Ready Player Me", "Custom"]),
        animation_features: strings(&["lip_sync", "facial_expressions", "eye_movement"]),
        viseme_count: VISEME_COUNT,
        real_time_capable: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speak_without_text_needs_text() {
        for raw in [r#"{"type":"Speak","data":{}}"#, r#"{"type":"Speak"}"#] {
            assert_eq!(parse_request(raw).unwrap_err(), "Text input required", "{raw}");
        }
    }

    #[test]
    fn other_bad_input_is_invalid_request() {
        for raw in ["{not json", r#"{"type":"Dance"}"#, r#"{"type":"Speak","data":{"text":7}}"#] {
            assert!(parse_request(raw).unwrap_err().starts_with("Invalid request"), "{raw}");
        }
    }

    #[test]
    fn well_formed_speak_parses() {
        match parse_request(r#"{"type":"Speak","data":{"text":"hi","language":"de"}}"#) {
            Ok(Request::Speak(req)) => {
                assert_eq!(req.text, "hi");
                assert_eq!(req.language, "de");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
