//! State FIPS codes for the 50 states, D.C. and the five inhabited territories.

/// Returned by [`resolve_state`] for codes outside the table.
pub const UNKNOWN_STATE: &str = "Unknown";

/// Sorted by code; [`state_name`] binary-searches it.
pub const STATES: [(&str, &str); 56] = [
    ("01", "Alabama"),
    ("02", "Alaska"),
    ("04", "Arizona"),
    ("05", "Arkansas"),
    ("06", "California"),
    ("08", "Colorado"),
    ("09", "Connecticut"),
    ("10", "Delaware"),
    ("11", "District of Columbia"),
    ("12", "Florida"),
    ("13", "Georgia"),
    ("15", "Hawaii"),
    ("16", "Idaho"),
    ("17", "Illinois"),
    ("18", "Indiana"),
    ("19", "Iowa"),
    ("20", "Kansas"),
    ("21", "Kentucky"),
    ("22", "Louisiana"),
    ("23", "Maine"),
    ("24", "Maryland"),
    ("25", "Massachusetts"),
    ("26", "Michigan"),
    ("27", "Minnesota"),
    ("28", "Mississippi"),
    ("29", "Missouri"),
    ("30", "Montana"),
    ("31", "Nebraska"),
    ("32", "Nevada"),
    ("33", "New Hampshire"),
    ("34", "New Jersey"),
    ("35", "New Mexico"),
    ("36", "New York"),
    ("37", "North Carolina"),
    ("38", "North Dakota"),
    ("39", "Ohio"),
    ("40", "Oklahoma"),
    ("41", "Oregon"),
    ("42", "Pennsylvania"),
    ("44", "Rhode Island"),
    ("45", "South Carolina"),
    ("46", "South Dakota"),
    ("47", "Tennessee"),
    ("48", "Texas"),
    ("49", "Utah"),
    ("50", "Vermont"),
    ("51", "Virginia"),
    ("53", "Washington"),
    ("54", "West Virginia"),
    ("55", "Wisconsin"),
    ("56", "Wyoming"),
    ("60", "American Samoa"),
    ("66", "Guam"),
    ("69", "Northern Mariana Islands"),
    ("72", "Puerto Rico"),
    ("78", "U.S. Virgin Islands"),
];

/// Canonical two-digit form of a state code.
///
/// Accepts surrounding whitespace and unpadded single digits ("6" → "06").
/// Returns `None` for anything that is not one or two ASCII digits.
pub fn normalize_code(code: &str) -> Option<[u8; 2]> {
    match code.trim().as_bytes() {
        [d] if d.is_ascii_digit() => Some([b'0', *d]),
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Some([*a, *b]),
        _ => None,
    }
}

/// Full state name for a FIPS code, if the code is in the table.
pub fn state_name(code: &str) -> Option<&'static str> {
    let key = normalize_code(code)?;
    STATES
        .binary_search_by(|(c, _)| c.as_bytes().cmp(&key[..]))
        .ok()
        .map(|i| STATES[i].1)
}

/// Like [`state_name`], but never fails: unknown codes map to [`UNKNOWN_STATE`].
pub fn resolve_state(code: &str) -> &'static str {
    state_name(code).unwrap_or(UNKNOWN_STATE)
}

/// Reverse lookup, exact match on the full name.
pub fn code_for_state(name: &str) -> Option<&'static str> {
    STATES.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
}

#[cfg(test)]
mod tests {
    use super::{STATES, UNKNOWN_STATE, code_for_state, resolve_state, state_name};

    #[test]
    fn table_is_sorted_and_complete() {
        assert!(STATES.windows(2).all(|w| w[0].0 < w[1].0));
        // 50 states + D.C. + 5 territories.
        assert_eq!(STATES.len(), 56);
    }

    #[test]
    fn every_code_resolves_to_its_name() {
        for (code, name) in STATES {
            assert_eq!(resolve_state(code), name);
        }
    }

    #[test]
    fn codes_outside_the_table_are_unknown() {
        for code in ["03", "07", "14", "43", "52", "57", "99", "", "XX", "048", "4a"] {
            assert_eq!(resolve_state(code), UNKNOWN_STATE, "code {code:?}");
        }
    }

    #[test]
    fn unpadded_codes_are_accepted() {
        assert_eq!(state_name("6"), Some("California"));
        assert_eq!(state_name(" 48 "), Some("Texas"));
    }

    #[test]
    fn reverse_lookup() {
        assert_eq!(code_for_state("Wyoming"), Some("56"));
        assert_eq!(code_for_state("Atlantis"), None);
    }
}
