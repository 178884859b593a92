use foundation::Chamber;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A sitting member of Congress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    pub name: String,
    /// Full state name, e.g. "Texas".
    pub state: String,
    pub chamber: Chamber,
    /// `None` for senators and for at-large House seats.
    pub district: Option<u32>,
    pub image_url: String,
    #[serde(rename = "partyName", skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
}

impl RosterMember {
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        chamber: Chamber,
        district: Option<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            chamber,
            district,
            image_url: String::new(),
            party: None,
        }
    }

    /// "Texas - 12", "Wyoming - (at Large)", or just the state for senators.
    pub fn seat_label(&self) -> String {
        match (self.chamber, self.district) {
            (Chamber::Senate, _) => self.state.clone(),
            (Chamber::House, Some(d)) => format!("{} - {d}", self.state),
            (Chamber::House, None) => format!("{} - (at Large)", self.state),
        }
    }

    /// "Rep. Jane Doe" / "Senator John Roe".
    pub fn addressed_name(&self) -> String {
        format!("{} {}", self.chamber.title(), self.name)
    }
}

/// One entry of the roster service's JSON response. Carries no chamber: the
/// endpoint it came from decides that.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub district: Option<i64>,
    #[serde(default)]
    pub party_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl MemberRecord {
    /// Names arrive display-ready ("First Last", suffixes included) and are
    /// only trimmed.
    pub fn into_member(self, chamber: Chamber) -> RosterMember {
        let district = match chamber {
            Chamber::House => self.house_district(),
            Chamber::Senate => None,
        };
        RosterMember {
            name: self.name.trim().to_string(),
            state: self.state.trim().to_string(),
            chamber,
            district,
            image_url: self.image_url.unwrap_or_default(),
            party: self.party_name.filter(|p| !p.is_empty()),
        }
    }

    // The roster service reports at-large seats as district 0 or not at all.
    fn house_district(&self) -> Option<u32> {
        match self.district {
            None | Some(0) => None,
            Some(d) => match u32::try_from(d) {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(
                        name = %self.name,
                        state = %self.state,
                        district = d,
                        "invalid House district in roster; treating as at-large"
                    );
                    None
                }
            },
        }
    }
}

/// Parses a roster JSON array for one chamber.
pub fn parse_roster(chamber: Chamber, payload: &str) -> Result<Vec<RosterMember>, serde_json::Error> {
    let records: Vec<MemberRecord> = serde_json::from_str(payload)?;
    Ok(records
        .into_iter()
        .map(|r| r.into_member(chamber))
        .collect())
}
