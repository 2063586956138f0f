use gwaei_core::Relevance;

use crate::query::Query;

/// Marker left behind by lossy decoding of a mangled line. Such lines
/// are skipped outright, as are comment lines.
const MALFORMED_MARKER: char = '\u{FFFD}';

/// Comment and malformed lines are never classified, not even
/// existence-tested.
pub fn is_skippable(line: &str) -> bool {
    line.starts_with('#') || line.contains(MALFORMED_MARKER)
}

/// True iff every AND-term matches somewhere in the line. Kanji
/// dictionaries use the structured-atom variant instead.
pub fn exists(query: &Query, line: &str) -> bool {
    if query.engine().is_kanji() {
        return exists_kanji(query, line);
    }
    query.terms().iter().all(|term| term.exists_in(line))
}

/// Kanji dictionary existence: all structured atoms match, or the
/// kanji/radical character terms themselves match. Either side alone
/// qualifies the line.
fn exists_kanji(query: &Query, line: &str) -> bool {
    let atoms = query.atoms();
    let terms = query.terms();

    let fields_match = !atoms.is_empty() && atoms.iter().all(|atom| atom.matches(line));
    let characters_match = !terms.is_empty() && terms.iter().all(|term| term.exists_in(line));

    fields_match || characters_match
}

/// Bucket a line that already passed the existence test. Any single
/// term's high pattern elevates the whole line; this is intentionally
/// looser than the all-terms existence test because it rewards exact
/// headword matches in multi-term queries.
pub fn classify_relevance(query: &Query, line: &str) -> Relevance {
    if query.terms().iter().any(|term| term.is_high_in(line)) {
        Relevance::High
    } else if query.terms().iter().any(|term| term.is_medium_in(line)) {
        Relevance::Medium
    } else {
        Relevance::Low
    }
}
