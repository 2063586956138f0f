use unicode_normalization::UnicodeNormalization;

const HALFWIDTH_KANA_FIRST: char = '\u{FF61}';
const HALFWIDTH_KANA_LAST: char = '\u{FF9F}';

/// Turn raw input bytes into a canonical string safe for pattern
/// compilation. Invalid UTF-8 truncates at the last valid boundary
/// instead of failing the whole request; the result is NFC-composed and
/// every non-printable code point becomes a space.
pub fn sanitize(input: &[u8], strip: bool) -> String {
    let valid = match std::str::from_utf8(input) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(
                "Query contained invalid UTF-8; truncating at byte {}",
                e.valid_up_to()
            );
            // The prefix up to valid_up_to is valid by contract
            std::str::from_utf8(&input[..e.valid_up_to()]).unwrap_or("")
        }
    };

    let cleaned: String = valid
        .nfc()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if strip {
        cleaned.trim().to_string()
    } else {
        cleaned
    }
}

/// True if any code point lies in the half-width kana block
/// (U+FF61..=U+FF9F).
pub fn contains_halfwidth_kana(text: &str) -> bool {
    text.chars()
        .any(|c| (HALFWIDTH_KANA_FIRST..=HALFWIDTH_KANA_LAST).contains(&c))
}

/// Replace each half-width kana code point with its full-width
/// equivalent. The voiced/semi-voiced sound marks become combining marks
/// so a trailing NFC pass composes ｶﾞ into ガ. Everything outside the
/// block passes through unchanged.
pub fn expand_halfwidth_kana(text: &str) -> String {
    let widened: String = text
        .chars()
        .flat_map(|c| {
            let expanded: Vec<char> = match c {
                '\u{FF9E}' => vec!['\u{3099}'],
                '\u{FF9F}' => vec!['\u{309A}'],
                c if (HALFWIDTH_KANA_FIRST..=HALFWIDTH_KANA_LAST).contains(&c) => {
                    c.nfkc().collect()
                }
                c => vec![c],
            };
            expanded
        })
        .collect();
    widened.nfc().collect()
}

/// The single entry point used before any further query processing:
/// sanitize, then widen half-width kana if any is present. Applying this
/// twice is a no-op.
pub fn prepare_query(text: &str, strip: bool) -> String {
    let sanitized = sanitize(text.as_bytes(), strip);
    if contains_halfwidth_kana(&sanitized) {
        expand_halfwidth_kana(&sanitized)
    } else {
        sanitized
    }
}
