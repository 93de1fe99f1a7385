use crate::{RatioAssessment, RatioSet, ScoreSet, StatementRecord};

/// Trait for ratio computation engines
pub trait RatioCalculator: Send + Sync {
    fn compute_ratios(&self, record: &StatementRecord) -> RatioSet;
}

/// Trait for scoring engines
pub trait ScoreCalculator: Send + Sync {
    fn compute_scores(&self, ratios: &RatioSet) -> ScoreSet;

    /// Per-ratio breakdown behind [`ScoreCalculator::compute_scores`].
    fn assess(&self, ratios: &RatioSet) -> Vec<RatioAssessment>;
}
