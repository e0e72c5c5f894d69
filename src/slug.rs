//! URL slugs for station, city and genre names.
//!
//! Every facet key in the site (city directory, genre directory, letter hub)
//! is derived from free text through [`slugify`]. The input is mostly Greek,
//! so the pipeline transliterates before it filters:
//!
//! ```text
//! "Θεσσαλονίκη"  →  NFD + strip accents  →  "θεσσαλονικη"
//!                →  transliterate        →  "thessaloniki"
//!                →  collapse non [a-z0-9] runs to "-"
//! ```
//!
//! ## Fallback
//!
//! Input with nothing that maps to `[a-z0-9]` (empty string, punctuation,
//! scripts outside Greek and Latin) becomes [`FALLBACK_SLUG`]. A slug is
//! therefore never empty.
//!
//! ## Display Titles
//!
//! [`title_from_slug`] only reformats: dashes become spaces and each word is
//! capitalized. It cannot recover accents, casing or Greek spelling.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Slug used when the input contains nothing slug-worthy.
pub const FALLBACK_SLUG: &str = "unknown";

/// Greek lowercase letter to Latin transliteration.
///
/// Accented forms never reach this table: accents are stripped after NFD.
fn transliterate_greek(c: char) -> Option<&'static str> {
    let latin = match c {
        'α' => "a",
        'β' => "v",
        'γ' => "g",
        'δ' => "d",
        'ε' => "e",
        'ζ' => "z",
        'η' => "i",
        'θ' => "th",
        'ι' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' => "y",
        'φ' => "f",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' => "o",
        _ => return None,
    };
    Some(latin)
}

/// Decompose, drop combining marks, lowercase, transliterate Greek.
fn to_ascii_lowercase_latin(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.nfd().filter(|c| !is_combining_mark(*c)) {
        for lower in c.to_lowercase() {
            match transliterate_greek(lower) {
                Some(latin) => out.push_str(latin),
                None => out.push(lower),
            }
        }
    }
    out
}

/// Turn free text into a URL-safe slug.
///
/// Output matches `^[a-z0-9]+(-[a-z0-9]+)*$`, or is [`FALLBACK_SLUG`].
/// Applying it to its own output returns the same value.
pub fn slugify(input: &str) -> String {
    let latin = to_ascii_lowercase_latin(input);
    let mut slug = String::with_capacity(latin.len());
    let mut pending_dash = false;
    for c in latin.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Slug for a genre tag. Genres are case-folded before slugging.
pub fn normalize_genre(genre: &str) -> String {
    slugify(&genre.to_lowercase())
}

/// Display title for a slug: `"greek-pop"` → `"Greek Pop"`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `true` if `s` is a well-formed slug as produced by [`slugify`].
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
