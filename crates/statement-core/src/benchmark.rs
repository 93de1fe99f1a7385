use serde::{Deserialize, Serialize};

use crate::RatioKey;

/// Sector reference distribution for one ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuartileBand {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl QuartileBand {
    pub const fn new(q1: f64, median: f64, q3: f64) -> Self {
        Self { q1, median, q3 }
    }

    pub fn is_ordered(&self) -> bool {
        self.q1.is_finite()
            && self.median.is_finite()
            && self.q3.is_finite()
            && self.q1 <= self.median
            && self.median <= self.q3
    }
}

/// Quartile of the sector distribution a company falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quartile {
    pub fn label(&self) -> &'static str {
        match self {
            Quartile::Q4 => "Q4 (Top 25%)",
            Quartile::Q3 => "Q3 (50-75%)",
            Quartile::Q2 => "Q2 (25-50%)",
            Quartile::Q1 => "Q1 (Bottom 25%)",
        }
    }
}

/// Position against the sector median with a ±20% dead zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedianPosition {
    #[serde(rename = "Supérieure")]
    Superieure,
    #[serde(rename = "Médiane")]
    Mediane,
    #[serde(rename = "Inférieure")]
    Inferieure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub ratio: RatioKey,
    pub company_value: f64,
    pub band: QuartileBand,
    pub quartile: Quartile,
    pub quartile_label: String,
    /// Approximate percentile (0 to 100) interpolated between the quartile anchors.
    pub estimated_percentile: f64,
    pub median_position: MedianPosition,
}

/// Result of comparing a ratio set with a sector.
///
/// An unknown or empty sector yields an empty comparison rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub sector: Option<String>,
    pub entries: Vec<BenchmarkEntry>,
}

impl BenchmarkComparison {
    pub fn unavailable(sector: Option<String>) -> Self {
        Self {
            sector,
            entries: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn entry(&self, ratio: RatioKey) -> Option<&BenchmarkEntry> {
        self.entries.iter().find(|e| e.ratio == ratio)
    }
}
