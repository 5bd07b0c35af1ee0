//! Text rendering of viseme timelines and mappings.

use std::collections::BTreeMap;
use std::fmt::Write;

use mouthpiece_protocol::{TimelineEntry, VisemeId};

pub fn format_timeline(entries: &[TimelineEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:>9}  {:>9}  viseme", "#", "start", "length");
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:>8.3}s  {:>8.3}s  {:>2}",
            i, entry.time_offset, entry.duration, entry.viseme_id
        );
    }
    out
}

/// One line per viseme id listing the labels that map to it.
pub fn format_mapping(viseme_map: &BTreeMap<String, VisemeId>, viseme_count: usize) -> String {
    let mut by_id: BTreeMap<VisemeId, Vec<&str>> = BTreeMap::new();
    for (label, id) in viseme_map {
        let label = if label.is_empty() { "''" } else { label.as_str() };
        by_id.entry(*id).or_default().push(label);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{viseme_count} visemes");
    for (id, labels) in by_id {
        let _ = writeln!(out, "{:>2}: {}", id, labels.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_has_header_and_one_row_per_entry() {
        let entries = [
            TimelineEntry { viseme_id: 8, time_offset: 0.0, duration: 0.5 },
            TimelineEntry { viseme_id: 1, time_offset: 0.5, duration: 0.5 },
        ];
        let text = format_timeline(&entries);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("0.500s"));
        assert!(lines[2].trim_end().ends_with('1'));
    }

    #[test]
    fn mapping_groups_labels_by_id() {
        let map: BTreeMap<String, VisemeId> = [("", 0), ("sil", 0), ("p", 1), ("b", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let text = format_mapping(&map, 15);
        assert_eq!(text, "15 visemes\n 0: '' sil\n 1: b p\n");
    }
}
