//! Alphabetical ordering of display names.
//!
//! City names are Greek, genre names mostly Latin. Byte order would put every
//! accented letter after `ω` and every capital before every lowercase letter,
//! so names are compared through a collation key instead:
//!
//! - accents and case are ignored at the first level
//! - punctuation < digits < Greek < Latin < anything else
//! - Greek letters follow the Greek alphabet (`ς` sorts as `σ`)
//!
//! Ties on the key fall back to plain string order so the result is total.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const GREEK_ALPHABET: &str = "αβγδεζηθικλμνξοπρστυφχψω";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Punctuation,
    Digit,
    Greek,
    Latin,
    Other,
}

fn weight(c: char) -> (Class, u32) {
    if c.is_ascii_digit() {
        return (Class::Digit, c as u32);
    }
    if c.is_ascii_lowercase() {
        return (Class::Latin, c as u32);
    }
    let greek = if c == 'ς' { 'σ' } else { c };
    if let Some(pos) = GREEK_ALPHABET.chars().position(|g| g == greek) {
        return (Class::Greek, pos as u32);
    }
    if c.is_whitespace() || c.is_ascii_punctuation() {
        return (Class::Punctuation, c as u32);
    }
    (Class::Other, c as u32)
}

/// Primary collation key for a display name.
pub fn sort_key(name: &str) -> Vec<(u8, u32)> {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| {
            let (class, w) = weight(c);
            (class as u8, w)
        })
        .collect()
}

/// Compare two display names in Greek-first alphabetical order.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
}
