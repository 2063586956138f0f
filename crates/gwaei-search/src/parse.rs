use gwaei_core::{EdictRecord, EngineKind, ExampleRecord, KanjiRecord, ResultRecord};

/// Split one matched, already-joined line into a structured record.
///
/// Parsing is tolerant by design: dictionary files are externally
/// sourced and not always well formed, so missing structure yields
/// absent fields, never an error.
pub fn parse_line(kind: EngineKind, line: &str) -> ResultRecord {
    match kind {
        EngineKind::Edict => ResultRecord::Edict(parse_edict(line)),
        EngineKind::Kanjidict | EngineKind::Radicals => ResultRecord::Kanji(parse_kanjidict(line)),
        EngineKind::Examples => ResultRecord::Example(parse_examples(line)),
        EngineKind::Unknown => ResultRecord::Plain(line.to_string()),
    }
}

/// EDICT: `headword [furigana] /(tag) definition/definition/(P)/`
fn parse_edict(line: &str) -> EdictRecord {
    let mut record = EdictRecord::default();

    let (headword, rest) = match line.split_once(' ') {
        Some((head, rest)) => (head, rest),
        None => (line, ""),
    };
    record.headword = headword.to_string();

    let rest = match rest.trim_start().strip_prefix('[') {
        Some(bracketed) => match bracketed.split_once(']') {
            Some((furigana, tail)) => {
                record.furigana = Some(furigana.to_string());
                tail
            }
            None => bracketed,
        },
        None => rest,
    };

    for definition in rest
        .find('/')
        .map(|start| &rest[start..])
        .unwrap_or("")
        .split('/')
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        if definition == "(P)" {
            record.is_common = true;
        } else {
            record.definitions.push(definition.to_string());
        }
    }

    // Leading parenthesized group of the first definition is the
    // classification tag
    if let Some(first) = record.definitions.first() {
        if let Some(tagged) = first.strip_prefix('(') {
            if let Some((tag, _)) = tagged.split_once(')') {
                record.classification = Some(tag.to_string());
            }
        }
    }

    record
}

/// KANJIDIC: `kanji [radicals] B85 G1 S4 F123 J2 readings T1 readings {meaning} {meaning}`
fn parse_kanjidict(line: &str) -> KanjiRecord {
    let mut record = KanjiRecord::default();

    let field_end = line.find('{').unwrap_or(line.len());
    let mut tokens = line[..field_end].split_whitespace();

    match tokens.next() {
        Some(kanji) => record.kanji = kanji.to_string(),
        None => return record,
    }

    let mut seen_reading = false;
    for token in tokens {
        // The T1 marker introduces a second reading group; skip it
        if token == "T1" {
            continue;
        }

        let first = match token.chars().next() {
            Some(c) => c,
            None => continue,
        };

        if gwaei_lang_japanese::is_hiragana(first) || gwaei_lang_japanese::is_katakana(first) {
            record.readings.push(token.to_string());
            seen_reading = true;
        } else if first > '\u{30FF}' && !seen_reading {
            // A glyph above the kana blocks before any reading is a
            // radical candidate
            record.radicals.push(token.to_string());
        } else if let Some(value) = coded_field(token, 'G') {
            record.grade = Some(value);
        } else if let Some(value) = coded_field(token, 'S') {
            record.strokes = Some(value);
        } else if let Some(value) = coded_field(token, 'F') {
            record.frequency = Some(value);
        } else if let Some(value) = coded_field(token, 'J') {
            record.jlpt = Some(value);
        }
    }

    for meaning in meaning_blocks(&line[field_end..]) {
        record.meanings.push(meaning);
    }

    record
}

/// Single-letter-coded numeric field, e.g. `S4` with code `S`
fn coded_field(token: &str, code: char) -> Option<u32> {
    token
        .strip_prefix(code)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
}

fn meaning_blocks(text: &str) -> Vec<String> {
    let mut meanings = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        match rest[start..].find('}') {
            Some(offset) => {
                meanings.push(rest[start + 1..start + offset].to_string());
                rest = &rest[start + offset + 1..];
            }
            None => break,
        }
    }
    meanings
}

/// Example corpus: `A:`/`B:`-numbered segments are the primary pair,
/// other numbered segments are supplementary.
fn parse_examples(line: &str) -> ExampleRecord {
    let mut record = ExampleRecord::default();

    for segment in line.split('\n') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        match segment.split_once(':') {
            Some((number, text)) if number.starts_with('A') || number.starts_with('B') => {
                record.primary.push(text.trim().to_string());
            }
            Some((_, text)) => {
                record.supplementary.push(text.trim().to_string());
            }
            None => record.supplementary.push(segment.to_string()),
        }
    }

    record
}
