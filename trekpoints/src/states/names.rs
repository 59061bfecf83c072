//! State abbreviation ↔ name table (50 states + DC).

/// Terminal value for records whose state could not be inferred.
pub const UNKNOWN_STATE: &str = "unknown";

/// `(abbr, lowercase name)` pairs.
///
/// Iteration order is load-bearing: free-text name matching takes the first
/// name found as a substring, so "west virginia" text matches `va` first.
pub const STATES: &[(&str, &str)] = &[
    ("al", "alabama"),
    ("ak", "alaska"),
    ("az", "arizona"),
    ("ar", "arkansas"),
    ("ca", "california"),
    ("co", "colorado"),
    ("ct", "connecticut"),
    ("de", "delaware"),
    ("fl", "florida"),
    ("ga", "georgia"),
    ("hi", "hawaii"),
    ("id", "idaho"),
    ("il", "illinois"),
    ("in", "indiana"),
    ("ia", "iowa"),
    ("ks", "kansas"),
    ("ky", "kentucky"),
    ("la", "louisiana"),
    ("me", "maine"),
    ("md", "maryland"),
    ("ma", "massachusetts"),
    ("mi", "michigan"),
    ("mn", "minnesota"),
    ("ms", "mississippi"),
    ("mo", "missouri"),
    ("mt", "montana"),
    ("ne", "nebraska"),
    ("nv", "nevada"),
    ("nh", "new hampshire"),
    ("nj", "new jersey"),
    ("nm", "new mexico"),
    ("ny", "new york"),
    ("nc", "north carolina"),
    ("nd", "north dakota"),
    ("oh", "ohio"),
    ("ok", "oklahoma"),
    ("or", "oregon"),
    ("pa", "pennsylvania"),
    ("ri", "rhode island"),
    ("sc", "south carolina"),
    ("sd", "south dakota"),
    ("tn", "tennessee"),
    ("tx", "texas"),
    ("ut", "utah"),
    ("vt", "vermont"),
    ("va", "virginia"),
    ("wa", "washington"),
    ("wv", "west virginia"),
    ("wi", "wisconsin"),
    ("wy", "wyoming"),
    ("dc", "district of columbia"),
];

/// Returns true if `s` (any case) is a known two-letter code.
pub fn is_state_abbr(s: &str) -> bool {
    STATES.iter().any(|(abbr, _)| abbr.eq_ignore_ascii_case(s))
}

/// Maps a full state name (any case, surrounding whitespace ignored) to its code.
pub fn abbr_for_name(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase();
    STATES
        .iter()
        .find(|(_, n)| *n == wanted)
        .map(|(abbr, _)| *abbr)
}

/// Lowercase full name for a code.
pub fn name_for_abbr(abbr: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(a, _)| a.eq_ignore_ascii_case(abbr))
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_fifty_states_and_dc() {
        assert_eq!(STATES.len(), 51);
        assert!(is_state_abbr("dc"));
    }

    #[test]
    fn test_abbr_lookup_is_case_insensitive() {
        assert!(is_state_abbr("CO"));
        assert!(is_state_abbr("wy"));
        assert!(!is_state_abbr("xx"));
        assert!(!is_state_abbr("colorado"));
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(abbr_for_name("New Mexico"), Some("nm"));
        assert_eq!(abbr_for_name("  district of columbia "), Some("dc"));
        assert_eq!(abbr_for_name("Ontario"), None);
        assert_eq!(name_for_abbr("NC"), Some("north carolina"));
    }
}
