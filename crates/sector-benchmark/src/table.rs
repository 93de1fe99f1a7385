use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use statement_core::{AnalysisError, QuartileBand, RatioKey};

use crate::Sector;

/// Quartile bands of one sector, keyed by ratio.
pub type SectorBands = BTreeMap<RatioKey, QuartileBand>;

/// Sector reference distributions.
///
/// JSON form: `{ "<sector>": { "<ratio_key>": { "q1": .., "median": .., "q3": .. } } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkTable {
    sectors: BTreeMap<String, SectorBands>,
}

impl BenchmarkTable {
    /// Built-in table: six sectors, four ratios each.
    pub fn reference() -> Self {
        let rows: [(Sector, [f64; 3], [f64; 3], [f64; 3], [f64; 3]); 6] = [
            // liquidité générale, autonomie (%), ROE (%), marge nette (%)
            (Sector::IndustrieManufacturiere, [1.2, 1.8, 2.5], [25.0, 40.0, 55.0], [8.0, 15.0, 22.0], [2.0, 4.5, 8.0]),
            (Sector::CommerceDetail, [1.0, 1.5, 2.2], [20.0, 35.0, 50.0], [5.0, 12.0, 20.0], [0.5, 2.0, 4.0]),
            (Sector::ServicesProfessionnels, [1.2, 1.7, 2.5], [30.0, 45.0, 65.0], [15.0, 25.0, 40.0], [5.0, 10.0, 18.0]),
            (Sector::ConstructionBtp, [1.2, 1.5, 1.9], [22.0, 35.0, 48.0], [8.0, 16.0, 28.0], [1.5, 3.5, 6.0]),
            (Sector::Agriculture, [1.1, 1.6, 2.3], [35.0, 50.0, 70.0], [2.0, 8.0, 15.0], [-5.0, 2.0, 8.0]),
            (Sector::CommerceGros, [1.1, 1.4, 1.8], [18.0, 30.0, 45.0], [6.0, 12.0, 20.0], [0.5, 1.5, 3.0]),
        ];

        let band = |[q1, median, q3]: [f64; 3]| QuartileBand::new(q1, median, q3);
        let sectors = rows
            .into_iter()
            .map(|(sector, liquidite, autonomie, roe, marge_nette)| {
                let bands = SectorBands::from([
                    (RatioKey::RatioLiquiditeGenerale, band(liquidite)),
                    (RatioKey::RatioAutonomieFinanciere, band(autonomie)),
                    (RatioKey::Roe, band(roe)),
                    (RatioKey::MargeNette, band(marge_nette)),
                ]);
                (sector.as_str().to_string(), bands)
            })
            .collect();

        Self { sectors }
    }

    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::InvalidBenchmark(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (sector, bands) in &self.sectors {
            if sector.trim().is_empty() {
                return Err(AnalysisError::InvalidBenchmark(
                    "sector name must not be empty".to_string(),
                ));
            }
            for (ratio, band) in bands {
                if !band.is_ordered() {
                    return Err(AnalysisError::InvalidBenchmark(format!(
                        "{sector}/{ratio}: expected finite q1 <= median <= q3, got {} / {} / {}",
                        band.q1, band.median, band.q3
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn sector(&self, sector: &str) -> Option<&SectorBands> {
        self.sectors.get(sector)
    }

    pub fn band(&self, sector: &str, ratio: RatioKey) -> Option<QuartileBand> {
        self.sector(sector).and_then(|bands| bands.get(&ratio).copied())
    }

    pub fn sectors(&self) -> impl Iterator<Item = (&str, &SectorBands)> + '_ {
        self.sectors.iter().map(|(name, bands)| (name.as_str(), bands))
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}
