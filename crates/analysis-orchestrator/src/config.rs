use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use statement_core::{AnalysisError, DEFAULT_BALANCE_TOLERANCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Accepted gap between the balance-sheet sides, in currency units.
    pub balance_tolerance: f64,
    /// JSON benchmark table replacing the built-in sector references.
    pub benchmarks_path: Option<PathBuf>,
    /// Sector used when a request names none.
    pub default_sector: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: DEFAULT_BALANCE_TOLERANCE,
            benchmarks_path: None,
            default_sector: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load from `ANALYZER_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AnalysisError> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let balance_tolerance = match non_empty("ANALYZER_BALANCE_TOLERANCE") {
            Some(raw) => {
                let tolerance: f64 = raw.parse().map_err(|_| {
                    AnalysisError::Config(format!("ANALYZER_BALANCE_TOLERANCE is not a number: {raw}"))
                })?;
                if !tolerance.is_finite() || tolerance < 0.0 {
                    return Err(AnalysisError::Config(format!(
                        "ANALYZER_BALANCE_TOLERANCE must be a non-negative amount, got {raw}"
                    )));
                }
                tolerance
            }
            None => DEFAULT_BALANCE_TOLERANCE,
        };

        Ok(Self {
            balance_tolerance,
            benchmarks_path: non_empty("ANALYZER_BENCHMARKS_PATH").map(PathBuf::from),
            default_sector: non_empty("ANALYZER_DEFAULT_SECTOR"),
        })
    }
}
