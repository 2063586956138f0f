/// Coarse ranking of how likely a matched line is the intended sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    High,
    Medium,
    Low,
}

/// One entry from an EDICT-style general dictionary line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdictRecord {
    pub headword: String,
    pub furigana: Option<String>,
    /// Part-of-speech tag from the leading parenthesized group
    pub classification: Option<String>,
    /// The (P) common-word marker
    pub is_common: bool,
    pub definitions: Vec<String>,
}

/// One entry from a KANJIDIC-style line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KanjiRecord {
    pub kanji: String,
    pub radicals: Vec<String>,
    pub strokes: Option<u32>,
    pub frequency: Option<u32>,
    pub grade: Option<u32>,
    pub jlpt: Option<u32>,
    pub readings: Vec<String>,
    pub meanings: Vec<String>,
}

/// One example-corpus entry: the A/B primary pair plus any supplementary
/// numbered lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleRecord {
    pub primary: Vec<String>,
    pub supplementary: Vec<String>,
}

/// A parsed dictionary entry. Closed over the known engine kinds so an
/// unrecognized dictionary degrades to an opaque line instead of a missing
/// parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRecord {
    Edict(EdictRecord),
    Kanji(KanjiRecord),
    Example(ExampleRecord),
    Plain(String),
}

impl ResultRecord {
    pub fn headword(&self) -> &str {
        match self {
            ResultRecord::Edict(r) => &r.headword,
            ResultRecord::Kanji(r) => &r.kanji,
            ResultRecord::Example(r) => r.primary.first().map(String::as_str).unwrap_or(""),
            ResultRecord::Plain(line) => line,
        }
    }

    pub fn furigana(&self) -> Option<&str> {
        match self {
            ResultRecord::Edict(r) => r.furigana.as_deref(),
            _ => None,
        }
    }

    pub fn definition_count(&self) -> usize {
        match self {
            ResultRecord::Edict(r) => r.definitions.len(),
            ResultRecord::Kanji(r) => r.meanings.len(),
            ResultRecord::Example(r) => r.primary.len() + r.supplementary.len(),
            ResultRecord::Plain(_) => 1,
        }
    }

    pub fn first_definition(&self) -> Option<&str> {
        match self {
            ResultRecord::Edict(r) => r.definitions.first().map(String::as_str),
            ResultRecord::Kanji(r) => r.meanings.first().map(String::as_str),
            ResultRecord::Example(r) => r.primary.first().map(String::as_str),
            ResultRecord::Plain(line) => Some(line),
        }
    }

    /// The "same headword, show once" test used for duplicate-adjacent
    /// suppression: headword, furigana, definition count and first
    /// definition all equal.
    pub fn same_entry_as(&self, other: &ResultRecord) -> bool {
        self.headword() == other.headword()
            && self.furigana() == other.furigana()
            && self.definition_count() == other.definition_count()
            && self.first_definition() == other.first_definition()
    }
}
