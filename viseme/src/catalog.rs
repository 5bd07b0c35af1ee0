//! Static phoneme and character tables mapping onto viseme ids.
//!
//! Both tables are built once and never mutated. Every lookup is total:
//! anything that is not in a table resolves to [`SILENCE`].

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Identifier of a canonical mouth shape, in `0..VISEME_COUNT`.
pub type VisemeId = u8;

/// Total number of visemes (ids `0..=14`).
pub const VISEME_COUNT: usize = 15;

/// Silence, also used for anything unknown.
pub const SILENCE: VisemeId = 0;

static PHONEME_TABLE: Lazy<BTreeMap<&'static str, VisemeId>> = Lazy::new(|| {
    const ENTRIES: &[(&[&str], VisemeId)] = &[
        (&["sil", "sp", ""], 0),
        (&["p", "b", "m"], 1),
        (&["f", "v"], 2),
        (&["th", "dh"], 3),
        (&["t", "d", "n", "l", "s", "z"], 4),
        (&["sh", "zh", "ch", "jh", "r"], 5),
        (&["k", "g", "ng", "y", "w"], 6),
        (&["h"], 7),
        (&["aa", "ao"], 8),
        (&["ae", "ah"], 9),
        (&["eh", "er"], 10),
        (&["ih", "iy"], 11),
        (&["ow", "oo", "uh", "uw"], 12),
        (&["ay", "ey"], 13),
        (&["oy", "aw"], 14),
    ];

    ENTRIES
        .iter()
        .flat_map(|(labels, id)| labels.iter().map(move |label| (*label, *id)))
        .collect()
});

/// Read-only view of the full phoneme label table.
pub fn phoneme_table() -> &'static BTreeMap<&'static str, VisemeId> {
    &PHONEME_TABLE
}

/// Map a phoneme label (e.g. `"sh"`, `"AA"`) to its viseme.
///
/// The label is trimmed and lower-cased first; unknown labels give [`SILENCE`].
pub fn lookup_phoneme(label: &str) -> VisemeId {
    let label = label.trim().to_lowercase();
    PHONEME_TABLE.get(label.as_str()).copied().unwrap_or(SILENCE)
}

/// Map a single written character to its approximate viseme.
pub fn lookup_character(ch: char) -> VisemeId {
    let mut lower = ch.to_lowercase();
    let ch = match (lower.next(), lower.next()) {
        (Some(c), None) => c,
        // Multi-char lowercase expansions are not in the table.
        _ => return SILENCE,
    };

    match ch {
        'a' => 8,
        'e' => 10,
        'i' => 11,
        'o' | 'u' => 12,
        'p' | 'b' | 'm' => 1,
        'f' | 'v' => 2,
        't' | 'd' | 'n' | 'l' | 's' => 4,
        'r' => 5,
        'k' | 'g' | 'w' | 'y' => 6,
        'h' => 7,
        _ => SILENCE,
    }
}

/// String form of [`lookup_character`]. Resolves only when the trimmed input
/// is exactly one character.
pub fn lookup_character_str(label: &str) -> VisemeId {
    let mut chars = label.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => lookup_character(ch),
        _ => SILENCE,
    }
}

/// Articulatory grouping of visemes. Descriptive only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Silence,
    Bilabial,
    Labiodental,
    Dental,
    Alveolar,
    PostAlveolar,
    Velar,
    Glottal,
    OpenBackVowel,
    OpenFrontVowel,
    MidVowel,
    CloseFrontVowel,
    BackRoundedVowel,
    Diphthong,
    ComplexDiphthong,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silence => "silence",
            Self::Bilabial => "bilabial",
            Self::Labiodental => "labiodental",
            Self::Dental => "dental",
            Self::Alveolar => "alveolar",
            Self::PostAlveolar => "post_alveolar",
            Self::Velar => "velar",
            Self::Glottal => "glottal",
            Self::OpenBackVowel => "open_back_vowel",
            Self::OpenFrontVowel => "open_front_vowel",
            Self::MidVowel => "mid_vowel",
            Self::CloseFrontVowel => "close_front_vowel",
            Self::BackRoundedVowel => "back_rounded_vowel",
            Self::Diphthong => "diphthong",
            Self::ComplexDiphthong => "complex_diphthong",
        }
    }
}

/// Category of a viseme id, `None` when the id is out of range.
pub fn category_of(id: VisemeId) -> Option<Category> {
    let category = match id {
        0 => Category::Silence,
        1 => Category::Bilabial,
        2 => Category::Labiodental,
        3 => Category::Dental,
        4 => Category::Alveolar,
        5 => Category::PostAlveolar,
        6 => Category::Velar,
        7 => Category::Glottal,
        8 => Category::OpenBackVowel,
        9 => Category::OpenFrontVowel,
        10 => Category::MidVowel,
        11 => Category::CloseFrontVowel,
        12 => Category::BackRoundedVowel,
        13 => Category::Diphthong,
        14 => Category::ComplexDiphthong,
        _ => return None,
    };
    Some(category)
}
