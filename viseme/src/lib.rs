//! Viseme catalog and text-to-viseme timeline generation for lip-sync.
//!
//! The timeline is a grapheme approximation: each whitespace-separated word
//! receives an equal share of the audio duration, which is then split evenly
//! across the word's characters. No phonetic alignment is attempted.

pub mod catalog;
mod error;
pub mod timeline;

pub use catalog::{
    category_of, lookup_character, lookup_character_str, lookup_phoneme, phoneme_table, Category,
    VisemeId, SILENCE, VISEME_COUNT,
};
pub use error::VisemeError;
pub use timeline::{generate, total_duration, word_visemes, TimelineEntry};
