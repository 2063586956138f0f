/// Best-effort romaji to hiragana transliteration.
///
/// Longest-match over a fixed syllable table, with three special cases:
/// a doubled consonant becomes the small tsu, `n` before a consonant (or
/// at the end, or before an apostrophe) becomes ん, and any unmatchable
/// syllable abandons the whole transliteration so the caller falls back
/// to literal romaji matching.
pub fn romaji_to_kana(input: &str) -> Option<String> {
    // Romanization is ASCII by definition; anything else already
    // carries its own script and is not transliterable
    if !input.is_ascii() {
        return None;
    }

    let lower = input.to_lowercase();
    let bytes = lower.as_bytes();
    let mut kana = String::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;

        // Gemination: doubled consonant other than n
        if c.is_ascii_alphabetic()
            && !is_vowel(c)
            && c != 'n'
            && bytes.get(i + 1) == Some(&bytes[i])
        {
            kana.push('っ');
            i += 1;
            continue;
        }

        // Syllabic n: end of input, n', or n before a non-y consonant
        if c == 'n' {
            let next = bytes.get(i + 1).map(|&b| b as char);
            match next {
                None => {
                    kana.push('ん');
                    i += 1;
                    continue;
                }
                Some('\'') => {
                    kana.push('ん');
                    i += 2;
                    continue;
                }
                Some(n) if n.is_ascii_alphabetic() && !is_vowel(n) && n != 'y' => {
                    kana.push('ん');
                    i += 1;
                    continue;
                }
                _ => {}
            }
        }

        let rest = &lower[i..];
        let mut matched = false;
        for len in (1..=3.min(rest.len())).rev() {
            if let Some(syllable) = lookup(&rest[..len]) {
                kana.push_str(syllable);
                i += len;
                matched = true;
                break;
            }
        }
        if !matched {
            tracing::debug!("No syllable match at {:?}; abandoning transliteration", rest);
            return None;
        }
    }

    Some(kana)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'i' | 'u' | 'e' | 'o')
}

/// The syllable table. Multiple accepted romanizations map to the same
/// kana (shi/si, tsu/tu, ji/zi/di, fu/hu, ...).
fn lookup(syllable: &str) -> Option<&'static str> {
    Some(match syllable {
        "a" => "あ",
        "i" => "い",
        "u" => "う",
        "e" => "え",
        "o" => "お",

        "ka" => "か",
        "ki" => "き",
        "ku" => "く",
        "ke" => "け",
        "ko" => "こ",
        "kya" => "きゃ",
        "kyu" => "きゅ",
        "kyo" => "きょ",

        "ga" => "が",
        "gi" => "ぎ",
        "gu" => "ぐ",
        "ge" => "げ",
        "go" => "ご",
        "gya" => "ぎゃ",
        "gyu" => "ぎゅ",
        "gyo" => "ぎょ",

        "sa" => "さ",
        "shi" | "si" => "し",
        "su" => "す",
        "se" => "せ",
        "so" => "そ",
        "sha" | "sya" => "しゃ",
        "shu" | "syu" => "しゅ",
        "sho" | "syo" => "しょ",

        "za" => "ざ",
        "ji" | "zi" => "じ",
        "zu" => "ず",
        "ze" => "ぜ",
        "zo" => "ぞ",
        "ja" | "jya" | "zya" => "じゃ",
        "ju" | "jyu" | "zyu" => "じゅ",
        "jo" | "jyo" | "zyo" => "じょ",

        "ta" => "た",
        "chi" | "ti" => "ち",
        "tsu" | "tu" => "つ",
        "te" => "て",
        "to" => "と",
        "cha" | "tya" => "ちゃ",
        "chu" | "tyu" => "ちゅ",
        "cho" | "tyo" => "ちょ",

        "da" => "だ",
        "di" => "ぢ",
        "du" | "dzu" => "づ",
        "de" => "で",
        "do" => "ど",
        "dya" => "ぢゃ",
        "dyu" => "ぢゅ",
        "dyo" => "ぢょ",

        "na" => "な",
        "ni" => "に",
        "nu" => "ぬ",
        "ne" => "ね",
        "no" => "の",
        "nya" => "にゃ",
        "nyu" => "にゅ",
        "nyo" => "にょ",

        "ha" => "は",
        "hi" => "ひ",
        "fu" | "hu" => "ふ",
        "he" => "へ",
        "ho" => "ほ",
        "hya" => "ひゃ",
        "hyu" => "ひゅ",
        "hyo" => "ひょ",

        "ba" => "ば",
        "bi" => "び",
        "bu" => "ぶ",
        "be" => "べ",
        "bo" => "ぼ",
        "bya" => "びゃ",
        "byu" => "びゅ",
        "byo" => "びょ",

        "pa" => "ぱ",
        "pi" => "ぴ",
        "pu" => "ぷ",
        "pe" => "ぺ",
        "po" => "ぽ",
        "pya" => "ぴゃ",
        "pyu" => "ぴゅ",
        "pyo" => "ぴょ",

        "ma" => "ま",
        "mi" => "み",
        "mu" => "む",
        "me" => "め",
        "mo" => "も",
        "mya" => "みゃ",
        "myu" => "みゅ",
        "myo" => "みょ",

        "ya" => "や",
        "yu" => "ゆ",
        "yo" => "よ",

        "ra" => "ら",
        "ri" => "り",
        "ru" => "る",
        "re" => "れ",
        "ro" => "ろ",
        "rya" => "りゃ",
        "ryu" => "りゅ",
        "ryo" => "りょ",

        "wa" => "わ",
        "wo" => "を",

        "fa" => "ふぁ",
        "fi" => "ふぃ",
        "fe" => "ふぇ",
        "fo" => "ふぉ",
        "va" => "ゔぁ",
        "vi" => "ゔぃ",
        "vu" => "ゔ",
        "ve" => "ゔぇ",
        "vo" => "ゔぉ",

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_words() {
        assert_eq!(romaji_to_kana("nihongo").as_deref(), Some("にほんご"));
        assert_eq!(romaji_to_kana("neko").as_deref(), Some("ねこ"));
        assert_eq!(romaji_to_kana("sakura").as_deref(), Some("さくら"));
    }

    #[test]
    fn gemination_becomes_small_tsu() {
        assert_eq!(romaji_to_kana("gakkou").as_deref(), Some("がっこう"));
        assert_eq!(romaji_to_kana("zasshi").as_deref(), Some("ざっし"));
    }

    #[test]
    fn syllabic_n() {
        assert_eq!(romaji_to_kana("hon").as_deref(), Some("ほん"));
        assert_eq!(romaji_to_kana("konnichi").as_deref(), Some("こんにち"));
        assert_eq!(romaji_to_kana("kin'en").as_deref(), Some("きんえん"));
        // n before y is a syllable start, not syllabic n
        assert_eq!(romaji_to_kana("nyuu").as_deref(), Some("にゅう"));
    }

    #[test]
    fn alternate_romanizations() {
        assert_eq!(romaji_to_kana("shi"), romaji_to_kana("si"));
        assert_eq!(romaji_to_kana("tsu"), romaji_to_kana("tu"));
        assert_eq!(romaji_to_kana("ji"), romaji_to_kana("zi"));
        assert_eq!(romaji_to_kana("fu"), romaji_to_kana("hu"));
    }

    #[test]
    fn unmatchable_input_returns_none() {
        assert_eq!(romaji_to_kana("xyz"), None);
        assert_eq!(romaji_to_kana("neko&inu"), None);
        assert_eq!(romaji_to_kana("ne ko"), None);
    }

    #[test]
    fn non_ascii_input_returns_none() {
        assert_eq!(romaji_to_kana("日本語"), None);
        assert_eq!(romaji_to_kana("ねこ"), None);
        assert_eq!(romaji_to_kana("neko猫"), None);
    }

    #[test]
    fn uppercase_is_folded() {
        assert_eq!(romaji_to_kana("NIHONGO").as_deref(), Some("にほんご"));
    }
}
