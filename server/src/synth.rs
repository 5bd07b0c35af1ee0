//! Speech synthesis backed by an external espeak-ng process

use std::future::Future;
use std::io::Cursor;
use std::process::Stdio;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("failed to run speech program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("speech program '{program}' failed: {stderr}")]
    Failed { program: String, stderr: String },
    #[error("speech program produced no audio")]
    EmptyOutput,
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

/// Encoded speech plus its measured length.
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    pub wav: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_secs: f64,
}

pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Provider name clients select in a speak request.
    fn provider(&self) -> &str;

    fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> impl Future<Output = Result<SynthesizedSpeech, SynthError>> + Send;
}

#[derive(Debug, Clone)]
pub struct EspeakSynthesizer {
    program: String,
}

impl EspeakSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SpeechSynthesizer for EspeakSynthesizer {
    fn provider(&self) -> &str {
        mouthpiece_protocol::DEFAULT_PROVIDER
    }

    fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> impl Future<Output = Result<SynthesizedSpeech, SynthError>> + Send {
        let program = self.program.clone();
        let text = text.to_string();
        let language = language.to_string();

        async move {
            let output = Command::new(&program)
                .args(["-v", &language, "--stdout", "--", &text])
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|source| SynthError::Spawn {
                    program: program.clone(),
                    source,
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                return Err(SynthError::Failed { program, stderr });
            }

            debug!("{} wrote {} bytes", program, output.stdout.len());
            measure_wav(&output.stdout)
        }
    }
}

/// Decode a WAV buffer, measure its duration and re-encode it with a correct
/// header.
///
/// Streamed WAV (as espeak-ng writes to stdout) carries placeholder chunk
/// sizes, so samples are read until the data runs out instead of trusting the
/// header.
pub fn measure_wav(bytes: &[u8]) -> Result<SynthesizedSpeech, SynthError> {
    if bytes.is_empty() {
        return Err(SynthError::EmptyOutput);
    }

    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map_while(Result::ok)
            .collect(),
        // Anything else gets converted through f32.
        (SampleFormat::Float, _) => reader
            .into_samples::<f32>()
            .map_while(Result::ok)
            .map(to_i16)
            .collect(),
        (SampleFormat::Int, bits) => {
            let scale = (1_i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map_while(Result::ok)
                .map(|s| to_i16(s as f32 / scale))
                .collect()
        }
    };

    if samples.is_empty() {
        return Err(SynthError::EmptyOutput);
    }

    let frames = samples.len() / spec.channels.max(1) as usize;
    let duration_secs = frames as f64 / spec.sample_rate as f64;
    let wav = encode_wav(&samples, spec.channels, spec.sample_rate)?;

    Ok(SynthesizedSpeech {
        wav,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        duration_secs,
    })
}

fn to_i16(s: f32) -> i16 {
    (s.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Encode 16-bit samples as WAV bytes
pub fn encode_wav(samples: &[i16], channels: u16, sample_rate: u32) -> Result<Vec<u8>, SynthError> {
    let mut wav_buffer = Cursor::new(Vec::new());
    {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::new(&mut wav_buffer, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(wav_buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_duration_from_samples() {
        let wav = encode_wav(&[0_i16; 22050], 1, 22050).unwrap();
        let speech = measure_wav(&wav).unwrap();
        assert_eq!(speech.sample_rate, 22050);
        assert_eq!(speech.channels, 1);
        assert!((speech.duration_secs - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stereo_counts_frames() {
        let wav = encode_wav(&[0_i16; 16000], 2, 16000).unwrap();
        let speech = measure_wav(&wav).unwrap();
        assert!((speech.duration_secs - 0.5).abs() < 1e-12);
    }

    #[test]
    fn tolerates_streamed_header_sizes() {
        let mut wav = encode_wav(&[100_i16; 2205], 1, 22050).unwrap();
        // Placeholder sizes espeak-ng writes when streaming to stdout.
        wav[4..8].copy_from_slice(&0x7fff_f024_u32.to_le_bytes());
        wav[40..44].copy_from_slice(&0x7fff_f000_u32.to_le_bytes());
        let speech = measure_wav(&wav).unwrap();
        assert!((speech.duration_secs - 0.1).abs() < 1e-12);
        // Re-encoded header is valid again.
        let reader = WavReader::new(Cursor::new(&speech.wav)).unwrap();
        assert_eq!(reader.len(), 2205);
    }

    #[test]
    fn empty_output_is_an_error() {
        assert!(matches!(measure_wav(&[]), Err(SynthError::EmptyOutput)));
        let wav = encode_wav(&[], 1, 22050).unwrap();
        assert!(matches!(measure_wav(&wav), Err(SynthError::EmptyOutput)));
    }

    #[test]
    fn garbage_is_a_wav_error() {
        assert!(matches!(measure_wav(b"not a wav file"), Err(SynthError::Wav(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_reports_failure() {
        let synth = EspeakSynthesizer::new("false");
        let err = synth.synthesize("hello", "en").await.unwrap_err();
        assert!(matches!(err, SynthError::Failed { ref program, .. } if program == "false"));
    }

    #[tokio::test]
    async fn missing_program_reports_spawn_error() {
        let synth = EspeakSynthesizer::new("mouthpiece-no-such-program");
        let err = synth.synthesize("hello", "en").await.unwrap_err();
        assert!(matches!(err, SynthError::Spawn { .. }));
    }
}
