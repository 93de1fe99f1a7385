use statement_core::{
    BenchmarkComparison, BenchmarkEntry, MedianPosition, Quartile, QuartileBand, RatioSet,
};

use crate::BenchmarkTable;

/// Quartile of `value` within `band`. Lower bounds are inclusive.
pub fn quartile_for(value: f64, band: &QuartileBand) -> Quartile {
    if value >= band.q3 {
        Quartile::Q4
    } else if value >= band.median {
        Quartile::Q3
    } else if value >= band.q1 {
        Quartile::Q2
    } else {
        Quartile::Q1
    }
}

/// Position against the median: at least 120% is above, at least 80% is median.
pub fn median_position(value: f64, median: f64) -> MedianPosition {
    if value >= median * 1.2 {
        MedianPosition::Superieure
    } else if value >= median * 0.8 {
        MedianPosition::Mediane
    } else {
        MedianPosition::Inferieure
    }
}

/// Piecewise-linear percentile anchored at Q1 = 25, median = 50 and Q3 = 75.
///
/// The tails reuse the width of the adjacent inner band and are clamped to
/// `[0, 100]`. A zero-width band resolves to the start of its range.
pub fn estimated_percentile(value: f64, band: &QuartileBand) -> f64 {
    let QuartileBand { q1, median, q3 } = *band;
    let scaled = |from: f64, width: f64| -> f64 {
        if width > 0.0 {
            (value - from) / width * 25.0
        } else {
            0.0
        }
    };

    let percentile = if value >= q3 {
        75.0 + scaled(q3, q3 - median)
    } else if value >= median {
        50.0 + scaled(median, q3 - median)
    } else if median > q1 {
        25.0 + scaled(q1, median - q1)
    } else {
        0.0
    };

    percentile.clamp(0.0, 100.0)
}

/// Compares company ratios with a sector's reference distributions.
#[derive(Debug, Clone)]
pub struct SectorBenchmarkService {
    table: BenchmarkTable,
}

impl Default for SectorBenchmarkService {
    fn default() -> Self {
        Self::new(BenchmarkTable::reference())
    }
}

impl SectorBenchmarkService {
    pub fn new(table: BenchmarkTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BenchmarkTable {
        &self.table
    }

    /// Entries for every ratio present in both the ratio set and the sector
    /// table. Unknown or empty sectors yield an unavailable comparison.
    pub fn compare(&self, ratios: &RatioSet, sector: &str) -> BenchmarkComparison {
        let sector = sector.trim();
        if sector.is_empty() {
            tracing::debug!("No sector given, skipping benchmark");
            return BenchmarkComparison::unavailable(None);
        }

        let Some(bands) = self.table.sector(sector) else {
            tracing::debug!(sector, "No benchmark data for sector");
            return BenchmarkComparison::unavailable(Some(sector.to_string()));
        };

        let entries: Vec<BenchmarkEntry> = bands
            .iter()
            .filter_map(|(ratio, band)| {
                let company_value = ratios.value(*ratio)?;
                let quartile = quartile_for(company_value, band);
                Some(BenchmarkEntry {
                    ratio: *ratio,
                    company_value,
                    band: *band,
                    quartile,
                    quartile_label: quartile.label().to_string(),
                    estimated_percentile: estimated_percentile(company_value, band),
                    median_position: median_position(company_value, band.median),
                })
            })
            .collect();

        tracing::debug!(sector, compared = entries.len(), "Sector benchmark computed");

        BenchmarkComparison {
            sector: Some(sector.to_string()),
            entries,
        }
    }
}
