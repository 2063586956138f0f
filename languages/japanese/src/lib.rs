pub mod normalize;
pub mod romaji;
pub mod script;

pub use normalize::{contains_halfwidth_kana, expand_halfwidth_kana, prepare_query, sanitize};
pub use romaji::romaji_to_kana;
pub use script::{
    QueryKind, classify, hiragana_to_katakana, is_hiragana, is_kanji, is_katakana,
    katakana_to_hiragana,
};
