use foundation::{Chamber, fips};
use serde::Serialize;

use crate::pointer::ScreenPoint;
use crate::resolver::{Region, RegionError, Resolution, Seat};

pub const NOT_FOUND: &str = "Not found";

/// Tooltip content while hovering a feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverPreview {
    pub position: ScreenPoint,
    pub state: String,
    pub detail: PreviewDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chamber", rename_all = "lowercase")]
pub enum PreviewDetail {
    House {
        /// "12", "(at Large)", or empty when the feature carries no district.
        district: String,
        /// Representative's name, or [`NOT_FOUND`].
        representative: String,
    },
    Senate { senators: Vec<String> },
}

impl HoverPreview {
    pub fn new(
        chamber: Chamber,
        position: ScreenPoint,
        located: &Result<Region, RegionError>,
        resolution: &Resolution,
    ) -> Self {
        let state = match located {
            Ok(region) => region.state,
            Err(err) => err.state().unwrap_or(fips::UNKNOWN_STATE),
        }
        .to_string();
        let region = located.as_ref().ok();
        let detail = match chamber {
            Chamber::House => PreviewDetail::House {
                district: match region.map(|r| r.seat) {
                    Some(Seat::District(label)) => label.to_string(),
                    _ => String::new(),
                },
                representative: resolution
                    .members()
                    .first()
                    .map_or_else(|| NOT_FOUND.to_string(), |m| m.name.clone()),
            },
            Chamber::Senate => PreviewDetail::Senate {
                senators: resolution.members().iter().map(|m| m.name.clone()).collect(),
            },
        };
        Self {
            position,
            state,
            detail,
        }
    }

    /// Plain-text tooltip, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        match &self.detail {
            PreviewDetail::House {
                district,
                representative,
            } => vec![
                format!("{} - District {district}", self.state),
                format!("{} {representative}", Chamber::House.title()),
            ],
            PreviewDetail::Senate { senators } => {
                let mut out = vec![self.state.clone()];
                out.extend(
                    senators
                        .iter()
                        .map(|s| format!("{} {s}", Chamber::Senate.title())),
                );
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HoverPreview, NOT_FOUND, PreviewDetail};
    use crate::district::DistrictLabel;
    use crate::pointer::ScreenPoint;
    use crate::resolver::{Region, RegionError, Resolution, Seat};
    use foundation::Chamber;
    use pretty_assertions::assert_eq;
    use roster::RosterMember;

    #[test]
    fn house_preview_names_the_representative() {
        let region = Region {
            state: "Texas",
            seat: Seat::District(DistrictLabel::Numbered(12)),
        };
        let res = Resolution::Single(RosterMember::new("Doe", "Texas", Chamber::House, Some(12)));
        let p = HoverPreview::new(Chamber::House, ScreenPoint::new(5.0, 6.0), &Ok(region), &res);
        assert_eq!(p.lines(), vec!["Texas - District 12", "Rep. Doe"]);
    }

    #[test]
    fn misses_say_not_found() {
        let region = Region {
            state: "Wyoming",
            seat: Seat::District(DistrictLabel::AtLarge),
        };
        let p = HoverPreview::new(
            Chamber::House,
            ScreenPoint::default(),
            &Ok(region),
            &Resolution::NoMatch,
        );
        assert_eq!(
            p.detail,
            PreviewDetail::House {
                district: "(at Large)".to_string(),
                representative: NOT_FOUND.to_string(),
            }
        );

        let unknown = HoverPreview::new(
            Chamber::Senate,
            ScreenPoint::default(),
            &Err(RegionError::UnknownStateCode("99".to_string())),
            &Resolution::NoMatch,
        );
        assert_eq!(unknown.lines(), vec!["Unknown"]);

        let malformed = HoverPreview::new(
            Chamber::House,
            ScreenPoint::default(),
            &Err(RegionError::MalformedDistrictLabel {
                state: "Michigan",
                label: "ZZ".to_string(),
            }),
            &Resolution::NoMatch,
        );
        assert_eq!(malformed.lines(), vec!["Michigan - District ", "Rep. Not found"]);
    }

    #[test]
    fn senate_preview_lists_every_senator() {
        let region = Region {
            state: "California",
            seat: Seat::Statewide,
        };
        let res = Resolution::Candidates(vec![
            RosterMember::new("A", "California", Chamber::Senate, None),
            RosterMember::new("B", "California", Chamber::Senate, None),
        ]);
        let p = HoverPreview::new(Chamber::Senate, ScreenPoint::default(), &Ok(region), &res);
        assert_eq!(p.lines(), vec!["California", "Senator A", "Senator B"]);

        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["detail"]["chamber"], "senate");
        assert_eq!(v["detail"]["senators"][1], "B");
    }
}
