use serde::{Deserialize, Serialize};
use statement_core::{AnalysisError, Category, RatioKey, Tier};

/// Direction in which a ratio improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

/// Tiered threshold rule for one ratio.
///
/// Breakpoints are inclusive on the better side: a value exactly on a
/// breakpoint earns the better tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub ratio: RatioKey,
    pub polarity: Polarity,
    /// Thresholds for Excellent, Bon and Acceptable.
    pub breakpoints: [f64; 3],
    /// Points for Excellent, Bon and Acceptable. Faible earns nothing.
    pub points: [u32; 3],
}

impl ScoringRule {
    pub const fn higher(ratio: RatioKey, breakpoints: [f64; 3], points: [u32; 3]) -> Self {
        Self {
            ratio,
            polarity: Polarity::HigherIsBetter,
            breakpoints,
            points,
        }
    }

    pub const fn lower(ratio: RatioKey, breakpoints: [f64; 3], points: [u32; 3]) -> Self {
        Self {
            ratio,
            polarity: Polarity::LowerIsBetter,
            breakpoints,
            points,
        }
    }

    pub fn category(&self) -> Category {
        self.ratio.category()
    }

    pub fn max_points(&self) -> u32 {
        self.points[0]
    }

    fn reaches(&self, value: f64, breakpoint: f64) -> bool {
        match self.polarity {
            Polarity::HigherIsBetter => value >= breakpoint,
            Polarity::LowerIsBetter => value <= breakpoint,
        }
    }

    /// Tier reached by `value`. NaN never reaches a breakpoint and lands in Faible.
    pub fn tier(&self, value: f64) -> Tier {
        let [excellent, good, acceptable] = self.breakpoints;
        if self.reaches(value, excellent) {
            Tier::Excellent
        } else if self.reaches(value, good) {
            Tier::Bon
        } else if self.reaches(value, acceptable) {
            Tier::Acceptable
        } else {
            Tier::Faible
        }
    }

    pub fn points_for(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Excellent => self.points[0],
            Tier::Bon => self.points[1],
            Tier::Acceptable => self.points[2],
            Tier::Faible => 0,
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let [e, g, a] = self.breakpoints;
        if !(e.is_finite() && g.is_finite() && a.is_finite()) {
            return Err(AnalysisError::InvalidScoringRule(format!(
                "{}: breakpoints must be finite",
                self.ratio
            )));
        }
        let ordered = match self.polarity {
            Polarity::HigherIsBetter => e >= g && g >= a,
            Polarity::LowerIsBetter => e <= g && g <= a,
        };
        if !ordered {
            return Err(AnalysisError::InvalidScoringRule(format!(
                "{}: breakpoints {:?} are out of order for {:?}",
                self.ratio, self.breakpoints, self.polarity
            )));
        }
        if !(self.points[0] >= self.points[1] && self.points[1] >= self.points[2]) {
            return Err(AnalysisError::InvalidScoringRule(format!(
                "{}: points {:?} must not increase for worse tiers",
                self.ratio, self.points
            )));
        }
        let max = self.category().max_points();
        if self.max_points() > max {
            return Err(AnalysisError::InvalidScoringRule(format!(
                "{}: {} points exceed the {} maximum of {}",
                self.ratio,
                self.max_points(),
                self.category(),
                max
            )));
        }
        Ok(())
    }
}

/// BCEAO-derived scoring grid. Excellent points of each category add up to
/// the category maximum (40/40/30/15/15).
pub const SCORING_RULES: [ScoringRule; 20] = [
    // Liquidité
    ScoringRule::higher(RatioKey::RatioLiquiditeGenerale, [2.0, 1.5, 1.2], [15, 11, 7]),
    ScoringRule::higher(RatioKey::RatioLiquiditeImmediate, [1.2, 1.0, 0.8], [15, 11, 7]),
    ScoringRule::lower(RatioKey::BfrJoursCa, [30.0, 60.0, 90.0], [10, 7, 4]),
    // Solvabilité
    ScoringRule::higher(RatioKey::RatioAutonomieFinanciere, [50.0, 30.0, 20.0], [12, 9, 5]),
    ScoringRule::lower(RatioKey::RatioEndettement, [40.0, 50.0, 65.0], [10, 7, 4]),
    ScoringRule::lower(RatioKey::CapaciteRemboursement, [3.0, 4.0, 5.0], [10, 7, 4]),
    ScoringRule::higher(RatioKey::RatioCouvertureImmobilisations, [1.3, 1.1, 1.0], [8, 6, 3]),
    // Rentabilité
    ScoringRule::higher(RatioKey::Roe, [15.0, 10.0, 5.0], [8, 6, 3]),
    ScoringRule::higher(RatioKey::Roa, [5.0, 2.0, 1.0], [6, 4, 2]),
    ScoringRule::higher(RatioKey::MargeNette, [8.0, 5.0, 2.0], [6, 4, 2]),
    ScoringRule::higher(RatioKey::MargeExploitation, [10.0, 5.0, 2.0], [6, 4, 2]),
    ScoringRule::higher(RatioKey::MargeBrute, [40.0, 25.0, 15.0], [4, 3, 1]),
    // Activité
    ScoringRule::higher(RatioKey::RotationActif, [2.0, 1.5, 1.0], [4, 3, 1]),
    ScoringRule::higher(RatioKey::RotationStocks, [8.0, 6.0, 4.0], [4, 3, 1]),
    ScoringRule::lower(RatioKey::DelaiRecouvrementClients, [30.0, 45.0, 60.0], [4, 3, 1]),
    ScoringRule::higher(RatioKey::DelaiReglementFournisseurs, [60.0, 45.0, 30.0], [3, 2, 1]),
    // Gestion
    ScoringRule::higher(RatioKey::ProductivitePersonnel, [3.0, 2.0, 1.5], [4, 3, 1]),
    ScoringRule::lower(RatioKey::TauxChargesPersonnel, [40.0, 50.0, 60.0], [4, 3, 1]),
    ScoringRule::higher(RatioKey::RatioCafgCa, [10.0, 7.0, 5.0], [4, 3, 1]),
    ScoringRule::lower(RatioKey::IntensiteCapitaliste, [2.0, 3.0, 4.0], [3, 2, 1]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_rules_are_valid() {
        for rule in SCORING_RULES.iter() {
            rule.validate().unwrap();
        }
    }

    #[test]
    fn test_excellent_points_fill_each_category() {
        for category in Category::ALL {
            let total: u32 = SCORING_RULES
                .iter()
                .filter(|r| r.category() == category)
                .map(|r| r.max_points())
                .sum();
            assert_eq!(total, category.max_points(), "{category}");
        }
    }

    #[test]
    fn test_each_ratio_scored_once() {
        let mut ratios: Vec<RatioKey> = SCORING_RULES.iter().map(|r| r.ratio).collect();
        ratios.sort();
        ratios.dedup();
        assert_eq!(ratios.len(), SCORING_RULES.len());
    }

    #[test]
    fn test_boundaries_favor_better_tier() {
        let higher = ScoringRule::higher(RatioKey::RatioLiquiditeGenerale, [2.0, 1.5, 1.2], [15, 11, 7]);
        assert_eq!(higher.tier(2.0), Tier::Excellent);
        assert_eq!(higher.tier(1.999), Tier::Bon);
        assert_eq!(higher.tier(1.5), Tier::Bon);
        assert_eq!(higher.tier(1.2), Tier::Acceptable);
        assert_eq!(higher.tier(1.19), Tier::Faible);

        let lower = ScoringRule::lower(RatioKey::CapaciteRemboursement, [3.0, 4.0, 5.0], [10, 7, 4]);
        assert_eq!(lower.tier(3.0), Tier::Excellent);
        assert_eq!(lower.tier(3.01), Tier::Bon);
        assert_eq!(lower.tier(4.0), Tier::Bon);
        assert_eq!(lower.tier(5.0), Tier::Acceptable);
        assert_eq!(lower.tier(5.01), Tier::Faible);
    }

    #[test]
    fn test_nan_is_faible() {
        for rule in SCORING_RULES.iter() {
            assert_eq!(rule.tier(f64::NAN), Tier::Faible);
            assert_eq!(rule.points_for(rule.tier(f64::NAN)), 0);
        }
    }

    #[test]
    fn test_validate_rejects_misordered_breakpoints() {
        let rule = ScoringRule::lower(RatioKey::RatioEndettement, [65.0, 50.0, 40.0], [10, 7, 4]);
        assert!(matches!(rule.validate(), Err(AnalysisError::InvalidScoringRule(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_points() {
        let rule = ScoringRule::higher(RatioKey::RotationActif, [2.0, 1.5, 1.0], [16, 3, 1]);
        assert!(rule.validate().is_err());
    }
}
