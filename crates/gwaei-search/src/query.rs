use std::ops::Range;

use gwaei_config::Preferences;
use gwaei_core::{EngineKind, SearchError};
use gwaei_lang_japanese::{
    QueryKind, classify, hiragana_to_katakana, katakana_to_hiragana, prepare_query, romaji_to_kana,
};
use regex::{Regex, RegexBuilder};

/// Internal AND-term separator. Sanitization turns every control
/// character into a space, so user text can never contain it; the
/// user-facing separator `&` is rewritten to it during preformatting.
pub(crate) const DELIMITER: char = '\u{1F}';

/// Which pattern shapes a term compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Kanji,
    Kana,
    Romaji,
}

/// One AND-term with its compiled pattern bundle.
#[derive(Debug)]
pub struct QueryTerm {
    text: String,
    kind: TermKind,
    exist: Regex,
    high: Regex,
    medium: Regex,
}

impl QueryTerm {
    fn compile(text: &str) -> Result<Self, SearchError> {
        let kind = match classify(text) {
            QueryKind::Kanji => TermKind::Kanji,
            QueryKind::Hiragana | QueryKind::Katakana | QueryKind::Furigana => TermKind::Kana,
            _ => TermKind::Romaji,
        };

        let high_pattern = match kind {
            TermKind::Kanji => format!(
                "((^無)|(^不)|(^非)|(^)|(^お)|(^御))({text})((\\])|(\\))|(\\}})|( ))"
            ),
            TermKind::Kana => format!(
                "((^)|(\\[)|(\\()|(\\{{)|( )|(^お))({text})((\\])|(\\))|(\\}})|( ))"
            ),
            TermKind::Romaji => format!(
                "(\\{{({text})\\}})|(((\\) )|(/))((to )|(to be )|())({text})(( \\([^/]+\\)/)|(/)))|(\\[({text})\\])|(^({text})\\b)"
            ),
        };

        let medium_pattern = match kind {
            TermKind::Kanji | TermKind::Kana => format!(
                "((^)|( )|(\\[)|(\\()|(\\{{)|(お)|(を)|(に)|(で)|(は)|(と)|(が)|(の))({text})(($)|( )|(\\])|(\\))|(\\}})|(を)|(に)|(で)|(は)|(と)|(が)|(の))"
            ),
            TermKind::Romaji => format!("\\b({text})\\b"),
        };

        Ok(Self {
            text: text.to_string(),
            kind,
            exist: case_insensitive(text)?,
            high: case_insensitive(&high_pattern)?,
            medium: case_insensitive(&medium_pattern)?,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TermKind {
        self.kind
    }

    /// Existence test: present somewhere in the line, no relevance implied
    pub fn exists_in(&self, line: &str) -> bool {
        self.exist.is_match(line)
    }

    /// Match offsets for substring highlighting
    pub fn locate_in(&self, line: &str) -> Option<Range<usize>> {
        self.exist.find(line).map(|m| m.range())
    }

    pub fn is_high_in(&self, line: &str) -> bool {
        self.high.is_match(line)
    }

    pub fn is_medium_in(&self, line: &str) -> bool {
        self.medium.is_match(line)
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, SearchError> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// A structured kanji-dictionary query atom: grade, stroke count,
/// frequency rank or JLPT level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    Grade,
    Strokes,
    Frequency,
    Jlpt,
}

#[derive(Debug)]
pub struct KanjiAtom {
    kind: AtomKind,
    text: String,
    pattern: Regex,
}

impl KanjiAtom {
    fn compile(text: &str) -> Result<Self, SearchError> {
        let kind = match text.as_bytes().first() {
            Some(b'G') => AtomKind::Grade,
            Some(b'S') => AtomKind::Strokes,
            Some(b'F') => AtomKind::Frequency,
            _ => AtomKind::Jlpt,
        };
        // Field codes are case sensitive in KANJIDIC lines
        let pattern = Regex::new(&format!("(^| ){text}( |$)"))?;
        Ok(Self {
            kind,
            text: text.to_string(),
            pattern,
        })
    }

    pub fn kind(&self) -> AtomKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// A normalized query with its compiled per-term pattern sets.
///
/// Terms are stored in right-to-left order of appearance; that ordering
/// matches the compiled pattern arrays index for index and must not be
/// changed.
#[derive(Debug)]
pub struct Query {
    canonical: String,
    engine: EngineKind,
    terms: Vec<QueryTerm>,
    atoms: Vec<KanjiAtom>,
}

impl Query {
    /// Normalize, preformat and compile a raw query for one dictionary.
    /// Fails if nothing searchable remains after normalization or if any
    /// pattern refuses to compile; nothing partially compiled survives a
    /// failure.
    pub fn build(
        raw: &str,
        engine: EngineKind,
        prefs: &Preferences,
        locale_is_japanese: bool,
    ) -> Result<Self, SearchError> {
        let canonical = prepare_query(raw, true);
        if canonical.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        if engine.is_kanji() {
            Self::build_kanji(canonical, engine)
        } else {
            Self::build_general(canonical, engine, prefs, locale_is_japanese)
        }
    }

    fn build_general(
        canonical: String,
        engine: EngineKind,
        prefs: &Preferences,
        locale_is_japanese: bool,
    ) -> Result<Self, SearchError> {
        // The user-facing AND separator becomes the internal delimiter
        // before any expansion, so a term's alternation parentheses can
        // never straddle a term boundary
        let romaji_enabled = prefs.romaji_mode.enabled(locale_is_japanese);
        let delimited = canonical.replace('&', &DELIMITER.to_string());

        let mut terms = Vec::new();
        for piece in delimited.rsplit(DELIMITER) {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            let preformatted = preformat_term(piece, prefs, romaji_enabled);
            terms.push(QueryTerm::compile(&preformatted)?);
        }
        if terms.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        Ok(Self {
            canonical,
            engine,
            terms,
            atoms: Vec::new(),
        })
    }

    fn build_kanji(canonical: String, engine: EngineKind) -> Result<Self, SearchError> {
        // Structured atoms are pulled out first; the rest is free text
        let atom_pattern = Regex::new(r"\b(G\d+|S\d+|F\d+|J[0-4])\b")?;
        let mut atoms = Vec::new();
        for capture in atom_pattern.find_iter(&canonical) {
            atoms.push(KanjiAtom::compile(capture.as_str())?);
        }
        let remainder = atom_pattern.replace_all(&canonical, " ");
        let remainder = remainder.trim();

        let terms = if remainder.is_empty() {
            Vec::new()
        } else {
            compile_terms(&remainder.replace('&', &DELIMITER.to_string()))?
        };

        if terms.is_empty() && atoms.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        Ok(Self {
            canonical,
            engine,
            terms,
            atoms,
        })
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    pub fn terms(&self) -> &[QueryTerm] {
        &self.terms
    }

    pub fn atoms(&self) -> &[KanjiAtom] {
        &self.atoms
    }
}

/// Kind-specific expansion of one AND-term: kana duality, four-kanji
/// compound halves, romaji to kana alternation.
fn preformat_term(term: &str, prefs: &Preferences, romaji_enabled: bool) -> String {
    match classify(term) {
        QueryKind::Hiragana if prefs.hiragana_to_katakana => {
            format!("({})|({})", term, hiragana_to_katakana(term))
        }
        QueryKind::Katakana if prefs.katakana_to_hiragana => {
            format!("({})|({})", term, katakana_to_hiragana(term))
        }
        QueryKind::Kanji if term.chars().count() == 4 => {
            // Four-kanji compounds also match either half
            let chars: Vec<char> = term.chars().collect();
            let first: String = chars[..2].iter().collect();
            let second: String = chars[2..].iter().collect();
            format!("({term})|({first})|({second})")
        }
        _ if romaji_enabled => match romaji_to_kana(term) {
            Some(hiragana) => {
                let katakana = hiragana_to_katakana(&hiragana);
                format!("({term})|({hiragana})|({katakana})")
            }
            None => term.to_string(),
        },
        _ => term.to_string(),
    }
}

/// Split on the internal delimiter and compile each term, right to left.
fn compile_terms(delimited: &str) -> Result<Vec<QueryTerm>, SearchError> {
    let mut terms = Vec::new();
    for piece in delimited.rsplit(DELIMITER) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        terms.push(QueryTerm::compile(piece)?);
    }
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences {
        Preferences::new()
    }

    fn build(raw: &str, engine: EngineKind) -> Result<Query, SearchError> {
        Query::build(raw, engine, &prefs(), false)
    }

    #[test]
    fn empty_query_fails_construction() {
        assert!(matches!(
            build("   ", EngineKind::Edict),
            Err(SearchError::EmptyQuery)
        ));
        assert!(matches!(
            build("", EngineKind::Edict),
            Err(SearchError::EmptyQuery)
        ));
    }

    #[test]
    fn term_count_matches_pattern_set_count() {
        let query = build("neko&inu&tori", EngineKind::Unknown).unwrap();
        assert_eq!(query.terms().len(), 3);
        // Right-to-left ordering
        assert!(query.terms()[0].text().contains("tori"));
        assert!(query.terms()[2].text().contains("neko"));
    }

    #[test]
    fn romaji_query_expands_to_kana_alternation() {
        let query = build("nihongo", EngineKind::Edict).unwrap();
        assert_eq!(query.terms().len(), 1);
        let text = query.terms()[0].text();
        assert!(text.contains("nihongo"));
        assert!(text.contains("にほんご"));
        assert!(text.contains("ニホンゴ"));

        // A line carrying only the hiragana form still matches
        assert!(query.terms()[0].exists_in("日本語 [にほんご] /Japanese language/"));
    }

    #[test]
    fn romaji_expansion_disabled_by_preference() {
        let mut prefs = Preferences::new();
        prefs.romaji_mode = gwaei_config::RomajiMode::Never;
        let query = Query::build("nihongo", EngineKind::Edict, &prefs, false).unwrap();
        assert_eq!(query.terms()[0].text(), "nihongo");
    }

    #[test]
    fn hiragana_query_matches_both_scripts() {
        let query = build("ねこ", EngineKind::Edict).unwrap();
        let term = &query.terms()[0];
        assert!(term.exists_in("猫 [ねこ] /(n) cat/"));
        assert!(term.exists_in("ネコ /(n) cat/"));
    }

    #[test]
    fn four_kanji_compound_matches_either_half() {
        let query = build("四字熟語", EngineKind::Edict).unwrap();
        let term = &query.terms()[0];
        assert!(term.exists_in("四字熟語 [よじじゅくご] /(n) idiom/"));
        assert!(term.exists_in("熟語 [じゅくご] /(n) compound word/"));
        assert!(term.exists_in("四字 /(n) four characters/"));
    }

    #[test]
    fn three_kanji_string_is_not_split() {
        let query = build("日本語", EngineKind::Edict).unwrap();
        let term = &query.terms()[0];
        assert!(!term.exists_in("日本 [にほん] /Japan/"));
        assert!(term.exists_in("日本語 [にほんご] /Japanese language/"));
    }

    #[test]
    fn kanji_engine_extracts_structured_atoms() {
        let query = build("G2 S10 water", EngineKind::Kanjidict).unwrap();
        assert_eq!(query.atoms().len(), 2);
        assert_eq!(query.atoms()[0].kind(), AtomKind::Grade);
        assert_eq!(query.atoms()[1].kind(), AtomKind::Strokes);
        assert_eq!(query.terms().len(), 1);
        assert!(query.terms()[0].text().contains("water"));
    }

    #[test]
    fn atom_only_kanji_query_is_valid() {
        let query = build("J2", EngineKind::Kanjidict).unwrap();
        assert!(query.terms().is_empty());
        assert_eq!(query.atoms().len(), 1);
        assert!(query.atoms()[0].matches("語 B149 S14 G2 J2 ゴ {word}"));
        assert!(!query.atoms()[0].matches("語 B149 S14 G2 J3 ゴ {word}"));
    }

    #[test]
    fn kana_and_query_expands_each_term_separately() {
        let query = build("ねこ&いぬ", EngineKind::Edict).unwrap();
        assert_eq!(query.terms().len(), 2);
        // Each term keeps its own kana duality alternation
        assert!(query.terms()[1].exists_in("猫 [ねこ] /(n) cat/"));
        assert!(query.terms()[1].exists_in("ネコ /(n) cat/"));
        assert!(query.terms()[0].exists_in("犬 [いぬ] /(n) dog/"));
        assert!(query.terms()[0].exists_in("イヌ /(n) dog/"));
    }

    #[test]
    fn romaji_and_query_keeps_kana_expansion_per_term() {
        let query = build("neko&inu", EngineKind::Edict).unwrap();
        assert_eq!(query.terms().len(), 2);
        assert!(query.terms()[0].text().contains("いぬ"));
        assert!(query.terms()[1].text().contains("ねこ"));
        assert!(query.terms()[0].exists_in("犬 [いぬ] /(n) dog/"));
        assert!(query.terms()[1].exists_in("猫 [ねこ] /(n) cat/"));
    }

    #[test]
    fn mixed_script_and_query_compiles() {
        let query = build("日本語&language", EngineKind::Edict).unwrap();
        assert_eq!(query.terms().len(), 2);
        assert!(query.terms()[1].exists_in("日本語 [にほんご] /Japanese language/"));
        assert!(query.terms()[0].exists_in("日本語 [にほんご] /Japanese language/"));
    }

    #[test]
    fn four_kanji_term_splits_inside_an_and_query() {
        let query = build("四字熟語&いぬ", EngineKind::Edict).unwrap();
        assert_eq!(query.terms().len(), 2);
        assert!(query.terms()[1].exists_in("熟語 [じゅくご] /(n) compound word/"));
    }

    #[test]
    fn kanji_query_does_not_panic_with_romaji_conversion_enabled() {
        let mut prefs = Preferences::new();
        prefs.romaji_mode = gwaei_config::RomajiMode::Always;
        let query = Query::build("日本語", EngineKind::Edict, &prefs, false).unwrap();
        assert_eq!(query.terms()[0].text(), "日本語");
    }

    #[test]
    fn locate_reports_match_offsets() {
        let query = build("cat", EngineKind::Edict).unwrap();
        let range = query.terms()[0].locate_in("猫 [ねこ] /(n) cat/").unwrap();
        assert_eq!(&"猫 [ねこ] /(n) cat/"[range], "cat");
    }

    #[test]
    fn broken_regex_in_query_fails_construction() {
        assert!(matches!(
            build("(unclosed", EngineKind::Edict),
            Err(SearchError::Pattern(_))
        ));
    }
}
