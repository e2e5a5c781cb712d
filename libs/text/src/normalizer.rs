use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

lazy_static::lazy_static! {
    static ref DIGIT_RGX: Regex = Regex::new(r"\d").unwrap();
    static ref SYMBOL_RGX: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref SPACE_RGX: Regex = Regex::new(r"\s+").unwrap();
}

/// Lowercases `raw` and drops its diacritical marks ('á' becomes 'a', 'ñ' becomes 'n').
/// Whitespace and punctuation are left where they are so the text can still be split into terms.
/// Only characters that decompose into a base letter and combining marks are folded, so this is
/// an approximation of full transliteration: 'ß', 'æ', 'ø' and curly quotes pass through as is.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Splits normalized text into terms, in document order.
/// An empty separator yields the whole text as a single term.
pub fn split_terms<'a>(
    text: &'a str,
    separator: &'a str,
) -> Box<dyn Iterator<Item = &'a str> + Send + 'a> {
    if separator.is_empty() {
        return Box::new(std::iter::once(text));
    }
    Box::new(text.split(separator))
}

/// Removes digits and replaces every other non-word character with a space.
pub fn strip_symbols(text: &str) -> String {
    let without_digits = DIGIT_RGX.replace_all(text, "");
    SYMBOL_RGX.replace_all(&without_digits, " ").into_owned()
}

/// Prepares a configured keyword so it compares equal to the tokens of normalized text.
pub fn normalize_keyword(keyword: &str) -> String {
    let cleaned = strip_symbols(&normalize(keyword));
    SPACE_RGX.replace_all(cleaned.trim(), " ").into_owned()
}
