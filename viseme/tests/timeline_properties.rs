use mouthpiece_viseme::{
    generate, lookup_phoneme, phoneme_table, total_duration, TimelineEntry, VisemeError,
    VISEME_COUNT,
};

const SAMPLES: &[(&str, f64)] = &[
    ("hi", 2.0),
    ("a b", 1.0),
    ("Hello, world! How are you today?", 3.7),
    ("the quick brown fox jumps over the lazy dog", 0.1),
    ("   leading and trailing   ", 12.345),
    ("x", 1e-6),
    ("numbers 123 and symbols #$%", 5.0),
    ("Grüße aus Köln", 2.2),
    ("一 二 三", 0.9),
    ("supercalifragilisticexpialidocious a", 7.0),
];

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn durations_cover_the_audio() {
    for &(text, d) in SAMPLES {
        let entries = generate(text, d).expect("valid input");
        assert!(!entries.is_empty(), "{text:?}");
        let total = total_duration(&entries);
        assert!(close(total, d), "{text:?}: {total} != {d}");
    }
}

#[test]
fn entries_are_contiguous_from_zero() {
    for &(text, d) in SAMPLES {
        let entries = generate(text, d).expect("valid input");
        assert_eq!(entries[0].time_offset, 0.0, "{text:?}");
        for pair in entries.windows(2) {
            let expected = pair[0].time_offset + pair[0].duration;
            assert!(close(pair[1].time_offset, expected), "{text:?}");
            assert!(pair[1].time_offset >= pair[0].time_offset, "{text:?}");
        }
    }
}

#[test]
fn ids_are_in_range() {
    for &(text, d) in SAMPLES {
        for entry in generate(text, d).expect("valid input") {
            assert!((entry.viseme_id as usize) < VISEME_COUNT);
        }
    }
}

#[test]
fn generation_is_deterministic() {
    for &(text, d) in SAMPLES {
        assert_eq!(generate(text, d).unwrap(), generate(text, d).unwrap());
    }
}

#[test]
fn empty_text_yields_nothing() {
    for d in [0.0, 1.0, 1000.0] {
        assert!(generate("", d).unwrap().is_empty());
    }
}

#[test]
fn negative_duration_is_invalid_argument() {
    let err = generate("hi", -1.0).unwrap_err();
    assert!(matches!(err, VisemeError::InvalidArgument(_)));
    assert!(err.to_string().starts_with("invalid argument"));
}

#[test]
fn single_word_splits_evenly_across_characters() {
    let entries = generate("hi", 2.0).unwrap();
    assert_eq!(
        entries,
        vec![
            TimelineEntry { viseme_id: 7, time_offset: 0.0, duration: 1.0 },
            TimelineEntry { viseme_id: 11, time_offset: 1.0, duration: 1.0 },
        ]
    );
}

#[test]
fn two_words_get_half_each() {
    let entries = generate("a b", 1.0).unwrap();
    assert_eq!(
        entries,
        vec![
            TimelineEntry { viseme_id: 8, time_offset: 0.0, duration: 0.5 },
            TimelineEntry { viseme_id: 1, time_offset: 0.5, duration: 0.5 },
        ]
    );
}

#[test]
fn phoneme_lookup_ignores_case() {
    assert_eq!(lookup_phoneme("SH"), lookup_phoneme("sh"));
    assert_eq!(lookup_phoneme("sh"), 5);
}

#[test]
fn catalog_has_fifteen_visemes() {
    assert_eq!(VISEME_COUNT, 15);
    assert!(phoneme_table().values().all(|&id| id <= 14));
    for id in 0..VISEME_COUNT as u8 {
        assert!(phoneme_table().values().any(|&v| v == id), "id {id} unused");
    }
}

#[test]
fn timeline_serializes_with_plain_field_names() {
    let entries = generate("a", 0.5).unwrap();
    let json = serde_json::to_value(&entries).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!([{ "viseme_id": 8, "time_offset": 0.0, "duration": 0.5 }])
    );
}
