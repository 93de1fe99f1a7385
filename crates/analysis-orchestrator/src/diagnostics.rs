//! Strengths, weaknesses and recommended actions read off the scores.

use statement_core::{ActionGroup, ActionHorizon, Diagnostics, RatioKey, RatioSet, ScoreSet};

const MAX_STRENGTHS: usize = 5;
const MAX_WEAKNESSES: usize = 5;
const MAX_PRIORITY_ACTIONS: usize = 3;

fn strengths(scores: &ScoreSet, ratios: &RatioSet) -> Vec<String> {
    let checks = [
        (scores.liquidite >= 30, "Excellente liquidité"),
        (scores.solvabilite >= 30, "Structure financière solide"),
        (scores.rentabilite >= 20, "Rentabilité satisfaisante"),
        (
            ratios.get(RatioKey::Roe) >= 15.0,
            "Excellente rentabilité des capitaux propres",
        ),
        (
            ratios.get(RatioKey::RatioAutonomieFinanciere) >= 40.0,
            "Forte autonomie financière",
        ),
    ];
    collect_messages(&checks, MAX_STRENGTHS)
}

fn weaknesses(scores: &ScoreSet, ratios: &RatioSet) -> Vec<String> {
    let checks = [
        (scores.liquidite < 20, "Liquidité insuffisante"),
        (scores.solvabilite < 20, "Structure financière fragile"),
        (scores.rentabilite < 15, "Rentabilité faible"),
        (
            ratios.get(RatioKey::RatioLiquiditeGenerale) < 1.2,
            "Ratio de liquidité critique",
        ),
        (ratios.get(RatioKey::MargeNette) < 3.0, "Marge nette insuffisante"),
    ];
    collect_messages(&checks, MAX_WEAKNESSES)
}

fn priority_actions(scores: &ScoreSet) -> Vec<String> {
    let checks = [
        (scores.liquidite < 25, "Améliorer la liquidité immédiatement"),
        (scores.solvabilite < 25, "Renforcer la structure financière"),
        (scores.rentabilite < 15, "Optimiser la rentabilité opérationnelle"),
    ];
    collect_messages(&checks, MAX_PRIORITY_ACTIONS)
}

fn action_plan(scores: &ScoreSet) -> Vec<ActionGroup> {
    let plan = [
        (
            scores.liquidite < 25,
            ActionHorizon::Urgent,
            [
                "Négocier des délais de paiement avec les fournisseurs",
                "Accélérer le recouvrement des créances clients",
            ],
        ),
        (
            scores.solvabilite < 25,
            ActionHorizon::Important,
            [
                "Préparer une augmentation de capital",
                "Renégocier les dettes financières",
            ],
        ),
        (
            scores.rentabilite < 15,
            ActionHorizon::MediumTerm,
            [
                "Analyser et optimiser la structure des coûts",
                "Améliorer les marges commerciales",
            ],
        ),
    ];

    plan.into_iter()
        .filter(|(triggered, _, _)| *triggered)
        .map(|(_, horizon, actions)| ActionGroup::new(horizon, &actions))
        .collect()
}

fn collect_messages(checks: &[(bool, &str)], limit: usize) -> Vec<String> {
    checks
        .iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, message)| message.to_string())
        .take(limit)
        .collect()
}

/// Builds the narrative diagnostics for one analysis.
pub fn diagnose(scores: &ScoreSet, ratios: &RatioSet) -> Diagnostics {
    Diagnostics {
        strengths: strengths(scores, ratios),
        weaknesses: weaknesses(scores, ratios),
        priority_actions: priority_actions(scores),
        action_plan: action_plan(scores),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(liquidite: u32, solvabilite: u32, rentabilite: u32) -> ScoreSet {
        ScoreSet {
            liquidite,
            solvabilite,
            rentabilite,
            ..Default::default()
        }
    }

    #[test]
    fn test_healthy_company() {
        let mut ratios = RatioSet::new();
        ratios.insert(RatioKey::Roe, 18.0);
        ratios.insert(RatioKey::RatioAutonomieFinanciere, 45.0);
        ratios.insert(RatioKey::RatioLiquiditeGenerale, 2.1);
        ratios.insert(RatioKey::MargeNette, 9.0);

        let diagnostics = diagnose(&scores(36, 33, 24), &ratios);
        assert_eq!(diagnostics.strengths.len(), 5);
        assert!(diagnostics.weaknesses.is_empty());
        assert!(diagnostics.priority_actions.is_empty());
        assert!(diagnostics.action_plan.is_empty());
    }

    #[test]
    fn test_distressed_company() {
        let mut ratios = RatioSet::new();
        ratios.insert(RatioKey::RatioLiquiditeGenerale, 0.8);
        ratios.insert(RatioKey::MargeNette, 0.5);

        let diagnostics = diagnose(&scores(5, 10, 4), &ratios);
        assert!(diagnostics.strengths.is_empty());
        assert_eq!(
            diagnostics.weaknesses,
            vec![
                "Liquidité insuffisante",
                "Structure financière fragile",
                "Rentabilité faible",
                "Ratio de liquidité critique",
                "Marge nette insuffisante",
            ]
        );
        assert_eq!(diagnostics.priority_actions.len(), 3);

        let horizons: Vec<ActionHorizon> =
            diagnostics.action_plan.iter().map(|g| g.horizon).collect();
        assert_eq!(
            horizons,
            vec![ActionHorizon::Urgent, ActionHorizon::Important, ActionHorizon::MediumTerm]
        );
        assert!(diagnostics.action_plan.iter().all(|g| g.actions.len() == 2));
    }

    #[test]
    fn test_action_groups_are_labelled() {
        let diagnostics = diagnose(&scores(5, 10, 4), &RatioSet::new());
        let labels: Vec<&str> = diagnostics
            .action_plan
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Actions Urgentes (0-1 mois)",
                "Actions Importantes (1-3 mois)",
                "Actions Moyen Terme (3-6 mois)",
            ]
        );

        let only_solvency = diagnose(&scores(30, 10, 20), &RatioSet::new());
        assert_eq!(only_solvency.action_plan.len(), 1);
        assert_eq!(only_solvency.action_plan[0].horizon, ActionHorizon::Important);
        assert_eq!(only_solvency.action_plan[0].label, "Actions Importantes (1-3 mois)");
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let mut ratios = RatioSet::new();
        ratios.insert(RatioKey::RatioLiquiditeGenerale, 1.2);
        ratios.insert(RatioKey::MargeNette, 3.0);

        let diagnostics = diagnose(&scores(25, 25, 15), &ratios);
        assert!(diagnostics.priority_actions.is_empty());
        assert!(diagnostics.action_plan.is_empty());
        assert!(!diagnostics
            .weaknesses
            .iter()
            .any(|w| w == "Ratio de liquidité critique" || w == "Marge nette insuffisante"));
    }
}
