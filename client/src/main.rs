//! Mouthpiece Client
//!
//! A WebSocket client that sends text to the Mouthpiece server, prints the
//! returned viseme timeline and plays the audio.
//!
//! Usage:
//!   # Interactive mode (type text, press Enter to speak)
//!   cargo run --release -p mouthpiece-client
//!
//!   # Single text mode
//!   cargo run --release -p mouthpiece-client -- --text "Hello world"
//!
//!   # Save to file instead of playing
//!   cargo run --release -p mouthpiece-client -- --text "Hello world" --output hello.wav
//!
//!   # Print the viseme mapping
//!   cargo run --release -p mouthpiece-client -- --mapping

mod audio;
mod timeline;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info};

use mouthpiece_protocol::{Request, Response, SpeakRequest, DEFAULT_PROVIDER};

#[derive(Parser, Debug)]
#[command(author, version, about = "Mouthpiece Client")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "ws://127.0.0.1:9876")]
    server: String,

    /// Text to speak (if not provided, runs in interactive mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Output WAV file (if not provided, plays audio directly)
    #[arg(short, long)]
    output: Option<String>,

    /// Language code
    #[arg(short, long, default_value = "en")]
    language: String,

    /// Speech provider
    #[arg(short, long, default_value = DEFAULT_PROVIDER)]
    provider: String,

    /// Print the viseme mapping and exit
    #[arg(short, long)]
    mapping: bool,

    /// Do not play audio
    #[arg(long)]
    no_play: bool,
}

struct SpeakOptions<'a> {
    language: &'a str,
    provider: &'a str,
    output: Option<&'a str>,
    play: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mouthpiece_client=info".parse()?)
                .add_directive("tokio_tungstenite=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    info!("Connecting to {}", args.server);
    let (ws_stream, _) = tokio_tungstenite::connect_async(&args.server).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    info!("Connected!");

    if args.mapping {
        print_mapping(&mut ws_sender, &mut ws_receiver).await?;
    } else if let Some(text) = args.text.as_deref() {
        let opts = SpeakOptions {
            language: &args.language,
            provider: &args.provider,
            output: args.output.as_deref(),
            play: !args.no_play,
        };
        speak(&mut ws_sender, &mut ws_receiver, text, &opts).await?;
    } else {
        println!("Mouthpiece Client - Interactive Mode");
        println!("====================================");
        println!("Type text and press Enter to speak it.");
        println!("Commands:");
        println!("  :q or :quit - Exit");
        println!("  :l <lang>   - Change language");
        println!("  :m          - Show viseme mapping");
        println!();

        let mut language = args.language.clone();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("> ");
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line == ":q" || line == ":quit" {
                println!("Goodbye!");
                break;
            }

            if let Some(new_language) = line.strip_prefix(":l ") {
                language = new_language.trim().to_string();
                println!("Language changed to: {}", language);
                continue;
            }

            if line == ":m" {
                if let Err(e) = print_mapping(&mut ws_sender, &mut ws_receiver).await {
                    error!("Error: {}", e);
                }
                continue;
            }

            let opts = SpeakOptions {
                language: &language,
                provider: &args.provider,
                output: None,
                play: !args.no_play,
            };
            if let Err(e) = speak(&mut ws_sender, &mut ws_receiver, line, &opts).await {
                error!("Error: {}", e);
            }
        }
    }

    // Close the connection gracefully
    ws_sender.send(Message::Close(None)).await?;

    Ok(())
}

async fn send_request<S>(sender: &mut S, request: &Request) -> Result<()>
where
    S: SinkExt<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let request_json = serde_json::to_string(request)?;
    sender
        .send(Message::Text(request_json))
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(())
}

async fn print_mapping<S, R>(sender: &mut S, receiver: &mut R) -> Result<()>
where
    S: SinkExt<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
    R: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    send_request(sender, &Request::VisemeMapping).await?;

    while let Some(msg) = receiver.next().await {
        match msg? {
            Message::Text(text) => match serde_json::from_str::<Response>(&text)? {
                Response::VisemeMapping {
                    viseme_map,
                    viseme_count,
                    ..
                } => {
                    print!("{}", timeline::format_mapping(&viseme_map, viseme_count));
                    return Ok(());
                }
                Response::Error { message } => {
                    return Err(anyhow::anyhow!("Server error: {}", message));
                }
                _ => {}
            },
            Message::Close(_) => {
                return Err(anyhow::anyhow!("Connection closed by server"));
            }
            _ => {}
        }
    }

    Err(anyhow::anyhow!("No mapping received"))
}

async fn speak<S, R>(
    sender: &mut S,
    receiver: &mut R,
    text: &str,
    opts: &SpeakOptions<'_>,
) -> Result<()>
where
    S: SinkExt<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
    R: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let request = Request::Speak(
        SpeakRequest::new(text)
            .with_language(opts.language)
            .with_provider(opts.provider),
    );
    send_request(sender, &request).await?;

    // Metadata arrives first, then the audio
    let mut speech_ready = false;

    while let Some(msg) = receiver.next().await {
        match msg? {
            Message::Text(text) => match serde_json::from_str::<Response>(&text)? {
                Response::SpeechReady {
                    duration_secs,
                    size_bytes,
                    visemes,
                    ..
                } => {
                    info!(
                        "Receiving audio: {:.2}s, {} bytes, {} visemes",
                        duration_secs,
                        size_bytes,
                        visemes.len()
                    );
                    print!("{}", timeline::format_timeline(&visemes));
                    speech_ready = true;
                }
                Response::Error { message } => {
                    return Err(anyhow::anyhow!("Server error: {}", message));
                }
                _ => {}
            },
            Message::Binary(data) => {
                if !speech_ready {
                    continue;
                }
                info!("Received {} bytes of audio data", data.len());

                if let Some(output_path) = opts.output {
                    std::fs::write(output_path, &data)?;
                    println!("Audio saved to: {}", output_path);
                } else if opts.play {
                    println!("Playing audio...");
                    audio::play_wav_bytes(&data)?;
                }

                return Ok(());
            }
            Message::Close(_) => {
                return Err(anyhow::anyhow!("Connection closed by server"));
            }
            _ => {}
        }
    }

    Err(anyhow::anyhow!("No audio received"))
}
