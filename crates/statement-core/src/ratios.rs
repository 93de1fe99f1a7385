use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AnalysisError, Category};

/// Every ratio the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKey {
    // Liquidité
    RatioLiquiditeGenerale,
    RatioLiquiditeReduite,
    RatioLiquiditeImmediate,
    BfrJoursCa,
    // Solvabilité
    RatioAutonomieFinanciere,
    RatioEndettement,
    CapaciteRemboursement,
    RatioCouvertureImmobilisations,
    RatioSolvabiliteGenerale,
    RatioEndettementFinancier,
    RatioCouvertureFraisFinanciers,
    // Rentabilité
    Roe,
    Roa,
    MargeNette,
    MargeExploitation,
    MargeBrute,
    TauxValeurAjoutee,
    TauxMargeEbe,
    // Activité
    RotationActif,
    RotationStocks,
    DelaiRecouvrementClients,
    DelaiReglementFournisseurs,
    DureeStockage,
    // Gestion
    ProductivitePersonnel,
    TauxChargesPersonnel,
    RatioCafgCa,
    IntensiteCapitaliste,
}

/// How a ratio value should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioUnit {
    Ratio,
    Percent,
    Days,
    Years,
}

impl RatioKey {
    pub const ALL: [RatioKey; 27] = [
        RatioKey::RatioLiquiditeGenerale,
        RatioKey::RatioLiquiditeReduite,
        RatioKey::RatioLiquiditeImmediate,
        RatioKey::BfrJoursCa,
        RatioKey::RatioAutonomieFinanciere,
        RatioKey::RatioEndettement,
        RatioKey::CapaciteRemboursement,
        RatioKey::RatioCouvertureImmobilisations,
        RatioKey::RatioSolvabiliteGenerale,
        RatioKey::RatioEndettementFinancier,
        RatioKey::RatioCouvertureFraisFinanciers,
        RatioKey::Roe,
        RatioKey::Roa,
        RatioKey::MargeNette,
        RatioKey::MargeExploitation,
        RatioKey::MargeBrute,
        RatioKey::TauxValeurAjoutee,
        RatioKey::TauxMargeEbe,
        RatioKey::RotationActif,
        RatioKey::RotationStocks,
        RatioKey::DelaiRecouvrementClients,
        RatioKey::DelaiReglementFournisseurs,
        RatioKey::DureeStockage,
        RatioKey::ProductivitePersonnel,
        RatioKey::TauxChargesPersonnel,
        RatioKey::RatioCafgCa,
        RatioKey::IntensiteCapitaliste,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatioKey::RatioLiquiditeGenerale => "ratio_liquidite_generale",
            RatioKey::RatioLiquiditeReduite => "ratio_liquidite_reduite",
            RatioKey::RatioLiquiditeImmediate => "ratio_liquidite_immediate",
            RatioKey::BfrJoursCa => "bfr_jours_ca",
            RatioKey::RatioAutonomieFinanciere => "ratio_autonomie_financiere",
            RatioKey::RatioEndettement => "ratio_endettement",
            RatioKey::CapaciteRemboursement => "capacite_remboursement",
            RatioKey::RatioCouvertureImmobilisations => "ratio_couverture_immobilisations",
            RatioKey::RatioSolvabiliteGenerale => "ratio_solvabilite_generale",
            RatioKey::RatioEndettementFinancier => "ratio_endettement_financier",
            RatioKey::RatioCouvertureFraisFinanciers => "ratio_couverture_frais_financiers",
            RatioKey::Roe => "roe",
            RatioKey::Roa => "roa",
            RatioKey::MargeNette => "marge_nette",
            RatioKey::MargeExploitation => "marge_exploitation",
            RatioKey::MargeBrute => "marge_brute",
            RatioKey::TauxValeurAjoutee => "taux_valeur_ajoutee",
            RatioKey::TauxMargeEbe => "taux_marge_ebe",
            RatioKey::RotationActif => "rotation_actif",
            RatioKey::RotationStocks => "rotation_stocks",
            RatioKey::DelaiRecouvrementClients => "delai_recouvrement_clients",
            RatioKey::DelaiReglementFournisseurs => "delai_reglement_fournisseurs",
            RatioKey::DureeStockage => "duree_stockage",
            RatioKey::ProductivitePersonnel => "productivite_personnel",
            RatioKey::TauxChargesPersonnel => "taux_charges_personnel",
            RatioKey::RatioCafgCa => "ratio_cafg_ca",
            RatioKey::IntensiteCapitaliste => "intensite_capitaliste",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatioKey::RatioLiquiditeGenerale => "Liquidité Générale",
            RatioKey::RatioLiquiditeReduite => "Liquidité Réduite",
            RatioKey::RatioLiquiditeImmediate => "Liquidité Immédiate",
            RatioKey::BfrJoursCa => "BFR en jours de CA",
            RatioKey::RatioAutonomieFinanciere => "Autonomie Financière",
            RatioKey::RatioEndettement => "Endettement Global",
            RatioKey::CapaciteRemboursement => "Capacité de Remboursement",
            RatioKey::RatioCouvertureImmobilisations => "Couverture des Immobilisations",
            RatioKey::RatioSolvabiliteGenerale => "Solvabilité Générale",
            RatioKey::RatioEndettementFinancier => "Endettement Financier",
            RatioKey::RatioCouvertureFraisFinanciers => "Couverture des Frais Financiers",
            RatioKey::Roe => "Rentabilité des Capitaux Propres (ROE)",
            RatioKey::Roa => "Rentabilité de l'Actif (ROA)",
            RatioKey::MargeNette => "Marge Nette",
            RatioKey::MargeExploitation => "Marge d'Exploitation",
            RatioKey::MargeBrute => "Marge Brute",
            RatioKey::TauxValeurAjoutee => "Taux de Valeur Ajoutée",
            RatioKey::TauxMargeEbe => "Taux de Marge EBE",
            RatioKey::RotationActif => "Rotation de l'Actif",
            RatioKey::RotationStocks => "Rotation des Stocks",
            RatioKey::DelaiRecouvrementClients => "Délai de Recouvrement Clients",
            RatioKey::DelaiReglementFournisseurs => "Délai de Règlement Fournisseurs",
            RatioKey::DureeStockage => "Durée de Stockage",
            RatioKey::ProductivitePersonnel => "Productivité du Personnel",
            RatioKey::TauxChargesPersonnel => "Taux de Charges de Personnel",
            RatioKey::RatioCafgCa => "CAFG / Chiffre d'Affaires",
            RatioKey::IntensiteCapitaliste => "Intensité Capitalistique",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            RatioKey::RatioLiquiditeGenerale
            | RatioKey::RatioLiquiditeReduite
            | RatioKey::RatioLiquiditeImmediate
            | RatioKey::BfrJoursCa => Category::Liquidite,
            RatioKey::RatioAutonomieFinanciere
            | RatioKey::RatioEndettement
            | RatioKey::CapaciteRemboursement
            | RatioKey::RatioCouvertureImmobilisations
            | RatioKey::RatioSolvabiliteGenerale
            | RatioKey::RatioEndettementFinancier
            | RatioKey::RatioCouvertureFraisFinanciers => Category::Solvabilite,
            RatioKey::Roe
            | RatioKey::Roa
            | RatioKey::MargeNette
            | RatioKey::MargeExploitation
            | RatioKey::MargeBrute
            | RatioKey::TauxValeurAjoutee
            | RatioKey::TauxMargeEbe => Category::Rentabilite,
            RatioKey::RotationActif
            | RatioKey::RotationStocks
            | RatioKey::DelaiRecouvrementClients
            | RatioKey::DelaiReglementFournisseurs
            | RatioKey::DureeStockage => Category::Activite,
            RatioKey::ProductivitePersonnel
            | RatioKey::TauxChargesPersonnel
            | RatioKey::RatioCafgCa
            | RatioKey::IntensiteCapitaliste => Category::Gestion,
        }
    }

    pub fn unit(&self) -> RatioUnit {
        match self {
            RatioKey::BfrJoursCa
            | RatioKey::DelaiRecouvrementClients
            | RatioKey::DelaiReglementFournisseurs
            | RatioKey::DureeStockage => RatioUnit::Days,
            RatioKey::CapaciteRemboursement => RatioUnit::Years,
            RatioKey::RatioAutonomieFinanciere
            | RatioKey::RatioEndettement
            | RatioKey::RatioEndettementFinancier
            | RatioKey::Roe
            | RatioKey::Roa
            | RatioKey::MargeNette
            | RatioKey::MargeExploitation
            | RatioKey::MargeBrute
            | RatioKey::TauxValeurAjoutee
            | RatioKey::TauxMargeEbe
            | RatioKey::TauxChargesPersonnel
            | RatioKey::RatioCafgCa => RatioUnit::Percent,
            _ => RatioUnit::Ratio,
        }
    }
}

impl fmt::Display for RatioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatioKey {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RatioKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownRatio(s.to_string()))
    }
}

/// Computed ratios keyed by [`RatioKey`].
///
/// Serializes as a flat `{"roe": 12.5, ...}` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioSet {
    values: BTreeMap<RatioKey, f64>,
}

impl RatioSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value; non-finite input is stored as `0.0`.
    pub fn insert(&mut self, key: RatioKey, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.values.insert(key, value);
    }

    /// Value for `key`, `0.0` when absent.
    pub fn get(&self, key: RatioKey) -> f64 {
        self.values.get(&key).copied().unwrap_or(0.0)
    }

    pub fn value(&self, key: RatioKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    pub fn contains(&self, key: RatioKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RatioKey, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(RatioKey, f64)> for RatioSet {
    fn from_iter<T: IntoIterator<Item = (RatioKey, f64)>>(iter: T) -> Self {
        let mut set = RatioSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}
