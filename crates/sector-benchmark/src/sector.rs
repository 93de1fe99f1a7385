use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statement_core::AnalysisError;

/// Activity sectors covered by the reference benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    IndustrieManufacturiere,
    CommerceDetail,
    ServicesProfessionnels,
    ConstructionBtp,
    Agriculture,
    CommerceGros,
}

impl Sector {
    pub const ALL: [Sector; 6] = [
        Sector::IndustrieManufacturiere,
        Sector::CommerceDetail,
        Sector::ServicesProfessionnels,
        Sector::ConstructionBtp,
        Sector::Agriculture,
        Sector::CommerceGros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::IndustrieManufacturiere => "industrie_manufacturiere",
            Sector::CommerceDetail => "commerce_detail",
            Sector::ServicesProfessionnels => "services_professionnels",
            Sector::ConstructionBtp => "construction_btp",
            Sector::Agriculture => "agriculture",
            Sector::CommerceGros => "commerce_gros",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sector::IndustrieManufacturiere => "Industrie manufacturière",
            Sector::CommerceDetail => "Commerce de détail",
            Sector::ServicesProfessionnels => "Services professionnels",
            Sector::ConstructionBtp => "Construction et BTP",
            Sector::Agriculture => "Agriculture",
            Sector::CommerceGros => "Commerce de gros",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.as_str() == tag)
            .ok_or_else(|| AnalysisError::InvalidBenchmark(format!("unknown sector: {tag}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        for sector in Sector::ALL {
            assert_eq!(sector.as_str().parse::<Sector>().unwrap(), sector);
        }
        assert_eq!(" agriculture ".parse::<Sector>().unwrap(), Sector::Agriculture);
    }

    #[test]
    fn test_parse_unknown_tag() {
        assert!("sector_not_in_table".parse::<Sector>().is_err());
        assert!("".parse::<Sector>().is_err());
    }
}
