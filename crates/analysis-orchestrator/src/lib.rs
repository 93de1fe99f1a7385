//! End-to-end financial statement analysis.
//!
//! [`FinancialAnalyzer`] runs the ratio engine, the scoring grid, grade
//! classification and the sector benchmark over one statement record, and
//! packages everything into an [`AnalysisResult`].

pub mod config;
pub mod diagnostics;

pub use config::AnalyzerConfig;

use chrono::Utc;
use ratio_engine::RatioEngine;
use scoring_engine::{classify, ScoringEngine};
use sector_benchmark::{BenchmarkTable, SectorBenchmarkService};
use serde::{Deserialize, Serialize};
use statement_core::{
    AnalysisError, AnalysisMetadata, AnalysisResult, RatioCalculator, ScoreCalculator, SourceType,
    StatementRecord,
};

/// Caller-supplied context for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub source: SourceType,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl AnalysisRequest {
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            sector: None,
            company_name: None,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }
}

pub struct FinancialAnalyzer {
    config: AnalyzerConfig,
    ratio_calculator: Box<dyn RatioCalculator>,
    score_calculator: Box<dyn ScoreCalculator>,
    benchmarks: SectorBenchmarkService,
}

impl Default for FinancialAnalyzer {
    fn default() -> Self {
        Self::with_benchmarks(AnalyzerConfig::default(), SectorBenchmarkService::default())
    }
}

impl FinancialAnalyzer {
    /// Builds an analyzer, loading the benchmark override named by the
    /// config if there is one.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        let table = match &config.benchmarks_path {
            Some(path) => {
                let table = BenchmarkTable::from_path(path)?;
                tracing::info!(
                    path = %path.display(),
                    sectors = table.len(),
                    "Loaded sector benchmarks"
                );
                table
            }
            None => BenchmarkTable::reference(),
        };
        Ok(Self::with_benchmarks(config, SectorBenchmarkService::new(table)))
    }

    pub fn with_benchmarks(config: AnalyzerConfig, benchmarks: SectorBenchmarkService) -> Self {
        Self {
            config,
            ratio_calculator: Box::new(RatioEngine::new()),
            score_calculator: Box::new(ScoringEngine::new()),
            benchmarks,
        }
    }

    /// Replace the ratio engine
    pub fn with_ratio_calculator(mut self, calculator: impl RatioCalculator + 'static) -> Self {
        self.ratio_calculator = Box::new(calculator);
        self
    }

    /// Replace the scoring engine
    pub fn with_score_calculator(mut self, calculator: impl ScoreCalculator + 'static) -> Self {
        self.score_calculator = Box::new(calculator);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn benchmarks(&self) -> &SectorBenchmarkService {
        &self.benchmarks
    }

    pub fn analyze(&self, record: StatementRecord, request: AnalysisRequest) -> AnalysisResult {
        let sector = request
            .sector
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| self.config.default_sector.clone());

        let ratios = self.ratio_calculator.compute_ratios(&record);
        let assessments = self.score_calculator.assess(&ratios);
        let scores = self.score_calculator.compute_scores(&ratios);
        let classification = classify(scores.global);
        let benchmark = self
            .benchmarks
            .compare(&ratios, sector.as_deref().unwrap_or_default());

        let balance = record.balance_check(self.config.balance_tolerance);
        if !balance.balanced {
            tracing::warn!(
                asset_gap = balance.asset_gap,
                liability_gap = balance.liability_gap,
                tolerance = balance.tolerance,
                "Balance sheet does not balance"
            );
        }

        let diagnostics = diagnostics::diagnose(&scores, &ratios);

        tracing::info!(
            company = request.company_name.as_deref().unwrap_or("-"),
            source = request.source.label(),
            global_score = scores.global,
            grade = %classification.grade,
            "Analysis complete"
        );

        AnalysisResult {
            aggregates: record.aggregates(),
            record,
            ratios,
            scores,
            classification,
            assessments,
            benchmark,
            balance,
            diagnostics,
            metadata: AnalysisMetadata {
                source: request.source,
                sector,
                company_name: request.company_name,
                timestamp: Utc::now(),
            },
        }
    }

    /// Builds a record from raw line items, then analyzes it.
    pub fn analyze_entries<I, K>(
        &self,
        entries: I,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let record = StatementRecord::from_entries(entries)?;
        Ok(self.analyze(record, request))
    }

    /// Analyzes each record independently, in order.
    pub fn analyze_batch(
        &self,
        items: Vec<(StatementRecord, AnalysisRequest)>,
    ) -> Vec<AnalysisResult> {
        items
            .into_iter()
            .map(|(record, request)| self.analyze(record, request))
            .collect()
    }
}
