use serde::{Deserialize, Serialize};

/// Legislative chamber the map is currently showing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    House,
    Senate,
}

/// Boundary datasets the map can show.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryDataset {
    CongressionalDistricts,
    States,
}

impl Chamber {
    pub const ALL: [Chamber; 2] = [Chamber::House, Chamber::Senate];

    /// Geometry used to pick officials of this chamber.
    pub fn dataset(self) -> BoundaryDataset {
        match self {
            Chamber::House => BoundaryDataset::CongressionalDistricts,
            Chamber::Senate => BoundaryDataset::States,
        }
    }

    /// Name used by the roster service.
    pub fn display_name(self) -> &'static str {
        match self {
            Chamber::House => "House of Representatives",
            Chamber::Senate => "Senate",
        }
    }

    /// Honorific used in tooltips ("Rep. Doe", "Senator Roe").
    pub fn title(self) -> &'static str {
        match self {
            Chamber::House => "Rep.",
            Chamber::Senate => "Senator",
        }
    }
}

impl std::fmt::Display for Chamber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Chamber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" | "house of representatives" | "representatives" => Ok(Chamber::House),
            "senate" => Ok(Chamber::Senate),
            other => Err(format!("unknown chamber: {other}")),
        }
    }
}

impl BoundaryDataset {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryDataset::CongressionalDistricts => "congressional_districts",
            BoundaryDataset::States => "states",
        }
    }
}

impl std::fmt::Display for BoundaryDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
