use formats::BoundaryFeature;
use foundation::{Chamber, fips};
use roster::{RosterIndex, RosterMember};
use tracing::debug;

use crate::district::{DistrictLabel, extract_label};

/// Who a boundary feature maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NoMatch,
    Single(RosterMember),
    /// Two or more members; only Senate states produce this.
    Candidates(Vec<RosterMember>),
}

impl Resolution {
    pub fn members(&self) -> &[RosterMember] {
        match self {
            Resolution::NoMatch => &[],
            Resolution::Single(m) => std::slice::from_ref(m),
            Resolution::Candidates(list) => list,
        }
    }
}

/// The seat a feature stands for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Seat {
    District(DistrictLabel),
    /// Every senator of the state.
    Statewide,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Region {
    pub state: &'static str,
    pub seat: Seat,
}

/// Why a feature could not be placed. All of these resolve to
/// [`Resolution::NoMatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    MissingStateCode,
    UnknownStateCode(String),
    MissingDistrictLabel { state: &'static str },
    MalformedDistrictLabel { state: &'static str, label: String },
}

impl RegionError {
    /// State name when the state part resolved, for tooltips.
    pub fn state(&self) -> Option<&'static str> {
        match self {
            RegionError::MissingStateCode | RegionError::UnknownStateCode(_) => None,
            RegionError::MissingDistrictLabel { state }
            | RegionError::MalformedDistrictLabel { state, .. } => Some(*state),
        }
    }
}

impl std::fmt::Display for RegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionError::MissingStateCode => write!(f, "feature has no STATEFP"),
            RegionError::UnknownStateCode(code) => write!(f, "unknown state code {code:?}"),
            RegionError::MissingDistrictLabel { state } => {
                write!(f, "{state} feature has no district label")
            }
            RegionError::MalformedDistrictLabel { state, label } => {
                write!(f, "{state} feature has malformed district label {label:?}")
            }
        }
    }
}

impl std::error::Error for RegionError {}

/// Places a feature: state from `STATEFP`, plus the district in House mode.
pub fn locate(feature: &BoundaryFeature, chamber: Chamber) -> Result<Region, RegionError> {
    let code = feature.state_code().ok_or(RegionError::MissingStateCode)?;
    let state = fips::state_name(&code)
        .ok_or_else(|| RegionError::UnknownStateCode(code.into_owned()))?;

    let seat = match chamber {
        Chamber::Senate => Seat::Statewide,
        Chamber::House => {
            let (_, raw) =
                extract_label(feature).ok_or(RegionError::MissingDistrictLabel { state })?;
            let label = DistrictLabel::parse(&raw).ok_or_else(|| {
                RegionError::MalformedDistrictLabel {
                    state,
                    label: raw.into_owned(),
                }
            })?;
            Seat::District(label)
        }
    };

    Ok(Region { state, seat })
}

/// Looks a placed region up in the roster.
pub fn lookup(region: &Region, index: &RosterIndex) -> Resolution {
    match region.seat {
        Seat::District(label) => index
            .by_state_and_district(region.state, label.district())
            .cloned()
            .map_or(Resolution::NoMatch, Resolution::Single),
        Seat::Statewide => match index.by_state(region.state) {
            [] => Resolution::NoMatch,
            [only] => Resolution::Single(only.clone()),
            many => Resolution::Candidates(many.to_vec()),
        },
    }
}

/// Feature → officials. Never fails: anything that cannot be placed or has
/// nobody seated is [`Resolution::NoMatch`].
pub fn resolve(feature: &BoundaryFeature, chamber: Chamber, index: &RosterIndex) -> Resolution {
    match locate(feature, chamber) {
        Ok(region) => lookup(&region, index),
        Err(err) => {
            debug!(%chamber, id = ?feature.id, "unresolvable feature: {err}");
            Resolution::NoMatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Region, RegionError, Resolution, Seat, locate, resolve};
    use crate::district::DistrictLabel;
    use formats::BoundaryFeature;
    use foundation::{Chamber, fips};
    use pretty_assertions::assert_eq;
    use roster::{RosterIndex, RosterMember};
    use serde_json::{Value, json};

    fn feature(props: Value) -> BoundaryFeature {
        let Value::Object(map) = props else {
            panic!("props must be an object");
        };
        BoundaryFeature::new(None, map)
    }

    fn house() -> RosterIndex {
        RosterIndex::build(
            Chamber::House,
            vec![
                RosterMember::new("Doe", "Texas", Chamber::House, Some(12)),
                RosterMember::new("Two", "Texas", Chamber::House, Some(2)),
                RosterMember::new("Wyo", "Wyoming", Chamber::House, None),
            ],
        )
    }

    fn senate() -> RosterIndex {
        RosterIndex::build(
            Chamber::Senate,
            vec![
                RosterMember::new("Ca One", "California", Chamber::Senate, None),
                RosterMember::new("Ca Two", "California", Chamber::Senate, None),
                RosterMember::new("Wy One", "Wyoming", Chamber::Senate, None),
            ],
        )
    }

    #[test]
    fn texas_twelfth_resolves_to_doe() {
        let f = feature(json!({"STATEFP": "48", "CD119FP": "12"}));
        assert_eq!(
            resolve(&f, Chamber::House, &house()),
            Resolution::Single(RosterMember::new("Doe", "Texas", Chamber::House, Some(12)))
        );
    }

    #[test]
    fn district_padding_is_ignored() {
        for label in ["02", "2"] {
            let f = feature(json!({"STATEFP": "48", "CD119FP": label}));
            let got = resolve(&f, Chamber::House, &house());
            assert_eq!(got.members()[0].name, "Two", "label {label}");
        }
    }

    #[test]
    fn at_large_features_match_only_at_large_members() {
        let wy = feature(json!({"STATEFP": "56", "NAMELSAD": "Congressional District (at Large)"}));
        assert_eq!(resolve(&wy, Chamber::House, &house()).members()[0].name, "Wyo");

        // Texas has no at-large member, only numbered seats.
        let tx = feature(json!({"STATEFP": "48", "CD119FP": "00"}));
        assert_eq!(resolve(&tx, Chamber::House, &house()), Resolution::NoMatch);

        // A numbered label never lands on the at-large member.
        let wy1 = feature(json!({"STATEFP": "56", "CD119FP": "01"}));
        assert_eq!(resolve(&wy1, Chamber::House, &house()), Resolution::NoMatch);
    }

    #[test]
    fn senate_states_resolve_by_member_count() {
        let ca = feature(json!({"STATEFP": "06"}));
        match resolve(&ca, Chamber::Senate, &senate()) {
            Resolution::Candidates(list) => {
                let names: Vec<&str> = list.iter().map(|m| m.name.as_str()).collect();
                assert_eq!(names, vec!["Ca One", "Ca Two"]);
            }
            other => panic!("expected candidates, got {other:?}"),
        }

        let wy = feature(json!({"STATEFP": "56"}));
        assert!(matches!(
            resolve(&wy, Chamber::Senate, &senate()),
            Resolution::Single(_)
        ));

        // Vacancy: a state with no senators is a miss, not an error.
        let vt = feature(json!({"STATEFP": "50"}));
        assert_eq!(resolve(&vt, Chamber::Senate, &senate()), Resolution::NoMatch);
    }

    #[test]
    fn unknown_and_missing_state_codes_never_match() {
        for props in [
            json!({"STATEFP": "99", "CD119FP": "12"}),
            json!({"STATEFP": "3"}),
            json!({"CD119FP": "12"}),
        ] {
            let f = feature(props);
            assert_eq!(resolve(&f, Chamber::House, &house()), Resolution::NoMatch);
            assert_eq!(resolve(&f, Chamber::Senate, &senate()), Resolution::NoMatch);
        }
        assert_eq!(
            locate(&feature(json!({"STATEFP": "99"})), Chamber::Senate),
            Err(RegionError::UnknownStateCode("99".to_string()))
        );
    }

    #[test]
    fn malformed_district_is_reported_with_its_state() {
        let f = feature(json!({"STATEFP": "26", "CD119FP": "ZZ"}));
        let err = locate(&f, Chamber::House).unwrap_err();
        assert_eq!(err.state(), Some("Michigan"));
        assert!(matches!(err, RegionError::MalformedDistrictLabel { .. }));
        assert_eq!(resolve(&f, Chamber::House, &house()), Resolution::NoMatch);
    }

    #[test]
    fn every_table_state_locates_in_senate_mode() {
        for (code, name) in fips::STATES {
            let f = feature(json!({ "STATEFP": code }));
            assert_eq!(
                locate(&f, Chamber::Senate),
                Ok(Region {
                    state: name,
                    seat: Seat::Statewide
                })
            );
        }
        let f = feature(json!({"STATEFP": "11", "CD119FP": "98"}));
        assert_eq!(
            locate(&f, Chamber::House).map(|r| r.seat),
            Ok(Seat::District(DistrictLabel::AtLarge))
        );
    }
}
