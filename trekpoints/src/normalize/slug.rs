//! Stable slug generation.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Scale applied to coordinates in slugs (five decimal places).
pub const COORDINATE_SCALE: f64 = 100_000.0;

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"))
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// URL-safe form of `s`: lowercased, diacritics stripped, non-alphanumeric
/// runs collapsed to a single `-`, edge hyphens trimmed.
pub fn slugify(s: &str) -> String {
    let folded: String = s
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    separator_pattern()
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_string()
}

/// Rounds half toward positive infinity, matching common web rounding.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Scaled integer form of one coordinate.
pub fn coordinate_component(value: f64) -> i64 {
    round_half_up(value * COORDINATE_SCALE)
}

/// Slug for a record without one of its own.
///
/// Same-named sites are disambiguated by coordinates rounded to 1e-5 degrees.
/// Without both coordinates the slug is the bare name.
pub fn stable_slug(name: &str, lat: Option<f64>, lon: Option<f64>) -> String {
    let base = slugify(if name.is_empty() { "unnamed" } else { name });
    match (lat, lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => format!(
            "{}-{}-{}",
            base,
            coordinate_component(lat),
            coordinate_component(lon)
        ),
        _ => base,
    }
}
