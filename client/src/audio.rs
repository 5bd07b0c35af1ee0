//! Audio playback module using rodio

use std::io::Cursor;

use anyhow::Result;
use rodio::{Decoder, OutputStream, Sink};

/// Play WAV audio from bytes, blocking until playback finishes
pub fn play_wav_bytes(wav_data: &[u8]) -> Result<()> {
    let (_stream, stream_handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&stream_handle)?;

    let source = Decoder::new(Cursor::new(wav_data.to_vec()))?;
    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}
