/// Whole-string classification of a query. A string belongs to a class
/// only if every non-punctuation, non-digit, non-bracket character falls
/// in that class's range; anything else is Mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Hiragana,
    Katakana,
    /// Kana of both scripts, no kanji
    Furigana,
    Kanji,
    Romaji,
    Mixed,
}

pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c) || ('\u{3400}'..='\u{4DBF}').contains(&c)
}

/// Characters classification ignores: ASCII punctuation, digits and
/// bracket/quote noise that can appear around any script.
fn is_ignored(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_punctuation() || c.is_whitespace()
}

/// Classify a whole query string by script range
pub fn classify(text: &str) -> QueryKind {
    let significant: Vec<char> = text.chars().filter(|c| !is_ignored(*c)).collect();
    if significant.is_empty() {
        return QueryKind::Mixed;
    }

    if significant.iter().all(|&c| is_hiragana(c)) {
        QueryKind::Hiragana
    } else if significant.iter().all(|&c| is_katakana(c)) {
        QueryKind::Katakana
    } else if significant.iter().all(|&c| is_kana(c)) {
        QueryKind::Furigana
    } else if significant.iter().all(|&c| is_kanji(c)) {
        QueryKind::Kanji
    } else if significant.iter().all(|&c| c.is_ascii_alphabetic()) {
        QueryKind::Romaji
    } else {
        QueryKind::Mixed
    }
}

/// Shift hiragana code points to their katakana equivalents. The two
/// blocks are offset by 0x60 for the shared syllables.
pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            c => c,
        })
        .collect()
}

/// Shift katakana code points to their hiragana equivalents
pub fn katakana_to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            c => c,
        })
        .collect()
}
