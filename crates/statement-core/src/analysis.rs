use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    BalanceCheck, BenchmarkComparison, Classification, RatioAssessment, RatioSet, ScoreSet,
    StatementAggregates, StatementRecord,
};

/// Where the statement record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    ExcelImport,
    ManualEntry,
    Api,
}

impl SourceType {
    pub fn label(&self) -> &'static str {
        match self {
            SourceType::ExcelImport => "Excel Import",
            SourceType::ManualEntry => "Saisie Manuelle",
            SourceType::Api => "API",
        }
    }
}

/// Provenance of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub source: SourceType,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Narrative findings derived from scores and ratios.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub priority_actions: Vec<String>,
    pub action_plan: Vec<ActionGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionHorizon {
    /// 0-1 month
    Urgent,
    /// 1-3 months
    Important,
    /// 3-6 months
    MediumTerm,
}

impl ActionHorizon {
    pub fn label(&self) -> &'static str {
        match self {
            ActionHorizon::Urgent => "Actions Urgentes (0-1 mois)",
            ActionHorizon::Important => "Actions Importantes (1-3 mois)",
            ActionHorizon::MediumTerm => "Actions Moyen Terme (3-6 mois)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionGroup {
    pub horizon: ActionHorizon,
    /// Heading of the horizon, e.g. "Actions Urgentes (0-1 mois)".
    pub label: String,
    pub actions: Vec<String>,
}

impl ActionGroup {
    pub fn new(horizon: ActionHorizon, actions: &[&str]) -> Self {
        Self {
            horizon,
            label: horizon.label().to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Complete outcome of one analysis. Immutable once built; the caller owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub record: StatementRecord,
    pub aggregates: StatementAggregates,
    pub ratios: RatioSet,
    pub scores: ScoreSet,
    pub classification: Classification,
    pub assessments: Vec<RatioAssessment>,
    pub benchmark: BenchmarkComparison,
    pub balance: BalanceCheck,
    pub diagnostics: Diagnostics,
    pub metadata: AnalysisMetadata,
}
