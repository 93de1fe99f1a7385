use statement_core::{
    AnalysisError, Category, RatioAssessment, RatioSet, ScoreCalculator, ScoreSet, Tier,
    RAW_SCORE_MAX,
};

use crate::rules::{ScoringRule, SCORING_RULES};

/// Rescales a raw total (out of 140) to the global score out of 100,
/// rounding half up.
pub fn global_score(raw_total: u32) -> u32 {
    let raw = raw_total.min(RAW_SCORE_MAX);
    ((raw * 100 + RAW_SCORE_MAX / 2) / RAW_SCORE_MAX).min(100)
}

/// Threshold-based scoring engine.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rules: Vec<ScoringRule>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            rules: SCORING_RULES.to_vec(),
        }
    }

    /// Engine over a custom rule table. Every rule is validated first.
    pub fn with_rules(rules: Vec<ScoringRule>) -> Result<Self, AnalysisError> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    fn assess_rule(rule: &ScoringRule, ratios: &RatioSet) -> RatioAssessment {
        // A ratio missing from the set contributes nothing, whatever its polarity.
        let (value, tier) = match ratios.value(rule.ratio) {
            Some(value) => (value, rule.tier(value)),
            None => (0.0, Tier::Faible),
        };
        RatioAssessment {
            ratio: rule.ratio,
            label: rule.ratio.label().to_string(),
            unit: rule.ratio.unit(),
            category: rule.category(),
            value,
            tier,
            points: rule.points_for(tier),
            max_points: rule.max_points(),
        }
    }

    fn scores_from(assessments: &[RatioAssessment]) -> ScoreSet {
        let mut scores = ScoreSet::default();
        for category in Category::ALL {
            let earned: u32 = assessments
                .iter()
                .filter(|a| a.category == category)
                .map(|a| a.points)
                .sum();
            scores.set(category, earned);
        }
        scores.global = global_score(scores.raw_total());
        scores
    }
}

impl ScoreCalculator for ScoringEngine {
    fn compute_scores(&self, ratios: &RatioSet) -> ScoreSet {
        let scores = Self::scores_from(&self.assess(ratios));
        tracing::debug!(
            liquidite = scores.liquidite,
            solvabilite = scores.solvabilite,
            rentabilite = scores.rentabilite,
            activite = scores.activite,
            gestion = scores.gestion,
            global = scores.global,
            "Computed scores"
        );
        scores
    }

    fn assess(&self, ratios: &RatioSet) -> Vec<RatioAssessment> {
        self.rules
            .iter()
            .map(|rule| Self::assess_rule(rule, ratios))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Polarity;
    use statement_core::{RatioKey, RatioUnit};

    /// A ratio set that reaches the Excellent tier on every rule.
    fn excellent_ratios() -> RatioSet {
        SCORING_RULES
            .iter()
            .map(|rule| (rule.ratio, rule.breakpoints[0]))
            .collect()
    }

    #[test]
    fn test_global_score_rescale() {
        assert_eq!(global_score(0), 0);
        assert_eq!(global_score(140), 100);
        assert_eq!(global_score(70), 50);
        // 98 * 100 / 140 = 70.0
        assert_eq!(global_score(98), 70);
        // 97 * 100 / 140 = 69.28
        assert_eq!(global_score(97), 69);
        // 7 * 100 / 140 = 5.0, 1 * 100 / 140 = 0.71
        assert_eq!(global_score(7), 5);
        assert_eq!(global_score(1), 1);
        assert_eq!(global_score(500), 100);
    }

    #[test]
    fn test_full_marks() {
        let engine = ScoringEngine::new();
        let scores = engine.compute_scores(&excellent_ratios());
        for category in Category::ALL {
            assert_eq!(scores.get(category), category.max_points());
        }
        assert_eq!(scores.raw_total(), RAW_SCORE_MAX);
        assert_eq!(scores.global, 100);
    }

    #[test]
    fn test_empty_ratio_set_scores_zero() {
        let engine = ScoringEngine::new();
        let scores = engine.compute_scores(&RatioSet::new());
        assert_eq!(scores, ScoreSet::default());
        assert!(engine
            .assess(&RatioSet::new())
            .iter()
            .all(|a| a.points == 0 && a.tier == Tier::Faible));
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let extremes = [
            0.0,
            -1.0,
            1.0,
            1e-12,
            -1e12,
            1e12,
            f64::MAX,
            f64::MIN,
            f64::MIN_POSITIVE,
        ];
        let engine = ScoringEngine::new();
        for (i, a) in extremes.iter().enumerate() {
            for b in extremes.iter().skip(i) {
                let ratios: RatioSet = RatioKey::ALL
                    .iter()
                    .enumerate()
                    .map(|(n, key)| (*key, if n % 2 == 0 { *a } else { *b }))
                    .collect();
                let scores = engine.compute_scores(&ratios);
                for category in Category::ALL {
                    assert!(scores.get(category) <= category.max_points());
                }
                assert!(scores.global <= 100);
                assert_eq!(scores.global, global_score(scores.raw_total()));
            }
        }
    }

    #[test]
    fn test_strong_liquidity_earns_full_points() {
        let mut ratios = RatioSet::new();
        ratios.insert(RatioKey::RatioLiquiditeGenerale, 3.0);
        ratios.insert(RatioKey::RatioLiquiditeImmediate, 1.5);
        ratios.insert(RatioKey::BfrJoursCa, 20.0);

        let engine = ScoringEngine::new();
        let assessments = engine.assess(&ratios);
        let generale = assessments
            .iter()
            .find(|a| a.ratio == RatioKey::RatioLiquiditeGenerale)
            .unwrap();
        assert_eq!(generale.tier, Tier::Excellent);
        assert_eq!(generale.points, 15);
        assert_eq!(engine.compute_scores(&ratios).liquidite, 40);
    }

    #[test]
    fn test_assessments_carry_label_and_unit() {
        let assessments = ScoringEngine::new().assess(&excellent_ratios());
        assert_eq!(assessments.len(), SCORING_RULES.len());
        for a in &assessments {
            assert_eq!(a.label, a.ratio.label());
            assert_eq!(a.unit, a.ratio.unit());
        }
        let bfr = assessments
            .iter()
            .find(|a| a.ratio == RatioKey::BfrJoursCa)
            .unwrap();
        assert_eq!(bfr.label, "BFR en jours de CA");
        assert_eq!(bfr.unit, RatioUnit::Days);

        let json = serde_json::to_value(bfr).unwrap();
        assert_eq!(json["unit"], "days");
        assert_eq!(json["label"], "BFR en jours de CA");
    }

    #[test]
    fn test_lower_is_better_rule_ignores_missing_ratio() {
        // Endettement absent must not be read as 0% and rewarded.
        let mut ratios = RatioSet::new();
        ratios.insert(RatioKey::RatioAutonomieFinanciere, 55.0);
        let scores = ScoringEngine::new().compute_scores(&ratios);
        assert_eq!(scores.solvabilite, 12);
    }

    #[test]
    fn test_mixed_tiers() {
        let mut ratios = RatioSet::new();
        ratios.insert(RatioKey::Roe, 12.0); // Bon: 6
        ratios.insert(RatioKey::Roa, 1.0); // Acceptable: 2
        ratios.insert(RatioKey::MargeNette, 1.0); // Faible: 0
        ratios.insert(RatioKey::MargeExploitation, 10.0); // Excellent: 6
        ratios.insert(RatioKey::MargeBrute, 30.0); // Bon: 3
        let scores = ScoringEngine::new().compute_scores(&ratios);
        assert_eq!(scores.rentabilite, 17);
        assert_eq!(scores.global, global_score(17));
    }

    #[test]
    fn test_custom_rules_are_clamped_per_category() {
        let rules = vec![
            ScoringRule::higher(RatioKey::Roe, [1.0, 0.5, 0.0], [30, 20, 10]),
            ScoringRule::higher(RatioKey::Roa, [1.0, 0.5, 0.0], [30, 20, 10]),
        ];
        let engine = ScoringEngine::with_rules(rules).unwrap();
        let mut ratios = RatioSet::new();
        ratios.insert(RatioKey::Roe, 5.0);
        ratios.insert(RatioKey::Roa, 5.0);
        assert_eq!(engine.compute_scores(&ratios).rentabilite, 30);
    }

    #[test]
    fn test_with_rules_rejects_invalid_rule() {
        let rule = ScoringRule {
            ratio: RatioKey::Roe,
            polarity: Polarity::HigherIsBetter,
            breakpoints: [f64::NAN, 1.0, 0.0],
            points: [3, 2, 1],
        };
        assert!(matches!(
            ScoringEngine::with_rules(vec![rule]),
            Err(AnalysisError::InvalidScoringRule(_))
        ));
    }
}
