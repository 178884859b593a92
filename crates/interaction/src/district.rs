//! Reading the congressional district out of a boundary feature.
//!
//! Census vintages disagree on where the district code lives, so extraction
//! walks [`DISTRICT_STRATEGIES`] in order and takes the first non-empty value.

use std::borrow::Cow;

use formats::BoundaryFeature;

/// A House seat within a state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DistrictLabel {
    /// The whole state is one seat (also used for non-voting delegates).
    AtLarge,
    Numbered(u32),
}

impl DistrictLabel {
    /// Roster key: at-large seats are `None`.
    pub fn district(self) -> Option<u32> {
        match self {
            DistrictLabel::AtLarge => None,
            DistrictLabel::Numbered(n) => Some(n),
        }
    }

    /// Normalizes a raw label.
    ///
    /// At-large sentinels: the "(at Large)" suffix of long names, the Census
    /// codes `00` (at-large) and `98` (delegate), and `AL`. Numbers compare by
    /// value, so `"02"` and `"2"` are the same seat. Anything else, such as
    /// the Census `ZZ` placeholder for water areas, is `None`.
    pub fn parse(raw: &str) -> Option<DistrictLabel> {
        let token = raw.trim();
        let lowered = token.to_ascii_lowercase();
        let lowered = lowered.trim_matches(|c| c == '(' || c == ')');
        if matches!(lowered, "at large" | "at-large" | "atlarge" | "al") {
            return Some(DistrictLabel::AtLarge);
        }
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match token.parse::<u32>().ok()? {
            0 | 98 => Some(DistrictLabel::AtLarge),
            n => Some(DistrictLabel::Numbered(n)),
        }
    }
}

impl std::fmt::Display for DistrictLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistrictLabel::AtLarge => f.write_str("(at Large)"),
            DistrictLabel::Numbered(n) => write!(f, "{n}"),
        }
    }
}

/// One way of finding the raw district label on a feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DistrictStrategy {
    /// A structured property such as `CD119FP`.
    Property(&'static str),
    /// The tail of `NAMELSAD`, e.g. "Congressional District 12" → "12".
    LongName,
}

/// Newest vintage first; the long name is the last resort.
pub const DISTRICT_STRATEGIES: [DistrictStrategy; 8] = [
    DistrictStrategy::Property("CD119FP"),
    DistrictStrategy::Property("CD118FP"),
    DistrictStrategy::Property("CD117FP"),
    DistrictStrategy::Property("CD116FP"),
    DistrictStrategy::Property("DISTRICT"),
    DistrictStrategy::Property("CD"),
    DistrictStrategy::Property("districtCode"),
    DistrictStrategy::LongName,
];

impl DistrictStrategy {
    /// Raw label this strategy finds on `feature`, if any. Blank values count
    /// as absent.
    pub fn extract<'a>(&self, feature: &'a BoundaryFeature) -> Option<Cow<'a, str>> {
        let raw = match self {
            DistrictStrategy::Property(key) => feature.property_text(key)?,
            DistrictStrategy::LongName => long_name_tail(feature.long_name()?)?,
        };
        if raw.trim().is_empty() { None } else { Some(raw) }
    }
}

/// First label found by [`DISTRICT_STRATEGIES`], with the strategy that found it.
pub fn extract_label(feature: &BoundaryFeature) -> Option<(DistrictStrategy, Cow<'_, str>)> {
    DISTRICT_STRATEGIES
        .iter()
        .find_map(|s| s.extract(feature).map(|raw| (*s, raw)))
}

fn long_name_tail(name: Cow<'_, str>) -> Option<Cow<'_, str>> {
    // "Congressional District 12", "Delegate District (at Large)",
    // "Resident Commissioner District (at Large)".
    let tail = match name.rfind("District") {
        Some(i) => name[i + "District".len()..].trim().to_string(),
        None => name.split_whitespace().last()?.to_string(),
    };
    Some(Cow::Owned(tail))
}
