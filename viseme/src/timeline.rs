//! Distributes a word/character viseme approximation across an audio duration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{lookup_character, VisemeId, SILENCE};
use crate::VisemeError;

/// One viseme held for `duration` seconds starting at `time_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub viseme_id: VisemeId,
    pub time_offset: f64,
    pub duration: f64,
}

/// Character-by-character viseme sequence for a single word.
///
/// Never empty: a word without characters yields a single silence viseme.
pub fn word_visemes(word: &str) -> Vec<VisemeId> {
    let visemes: Vec<VisemeId> = word.chars().map(lookup_character).collect();
    if visemes.is_empty() {
        vec![SILENCE]
    } else {
        visemes
    }
}

/// Build the viseme timeline for `text` spoken over `audio_duration` seconds.
///
/// Every word gets the same share of the duration regardless of its length.
/// Within a word the share is split evenly across its characters. The result
/// tiles `[0, audio_duration]` contiguously and is empty when `text` has no
/// words.
pub fn generate(text: &str, audio_duration: f64) -> Result<Vec<TimelineEntry>, VisemeError> {
    if !audio_duration.is_finite() || audio_duration < 0.0 {
        return Err(VisemeError::InvalidArgument(format!(
            "audio duration must be a finite, non-negative number of seconds, got {audio_duration}"
        )));
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    // A zero word count still divides by one.
    let time_per_word = audio_duration / words.len().max(1) as f64;

    let mut entries = Vec::new();
    let mut cursor = 0.0_f64;
    for word in &words {
        let visemes = word_visemes(word);
        let viseme_duration = time_per_word / visemes.len().max(1) as f64;

        for viseme_id in visemes {
            entries.push(TimelineEntry {
                viseme_id,
                time_offset: cursor,
                duration: viseme_duration,
            });
            cursor += viseme_duration;
        }
    }

    debug!(
        words = words.len(),
        entries = entries.len(),
        audio_duration,
        "generated viseme timeline"
    );

    Ok(entries)
}

/// Sum of all entry durations.
pub fn total_duration(entries: &[TimelineEntry]) -> f64 {
    entries.iter().map(|e| e.duration).sum()
}
