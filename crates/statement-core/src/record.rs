//! Normalized financial-statement record.
//!
//! One `f64` per recognized line item. The canonical keys are the
//! French account labels used by the spreadsheet and manual-entry
//! collaborators (`chiffre_affaires`, `total_actif`, ...). A missing
//! line item is `0.0`.

use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Default tolerance (monetary units) for the balance-sheet check.
pub const DEFAULT_BALANCE_TOLERANCE: f64 = 1000.0;

macro_rules! line_items {
    ($( $(#[$meta:meta])* $field:ident ),+ $(,)?) => {
        /// Raw line items of one company's financial statements.
        ///
        /// Built once per analysis and never mutated afterwards. Unknown keys
        /// are rejected on deserialization so a typo cannot silently produce
        /// an always-zero ratio.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct StatementRecord {
            $( $(#[$meta])* pub $field: f64, )+
        }

        impl StatementRecord {
            /// Every canonical line-item key, in declaration order.
            pub const LINE_ITEMS: &'static [&'static str] = &[ $( stringify!($field) ),+ ];

            /// Amount for a canonical key, `None` when the key is not recognized.
            pub fn get(&self, key: &str) -> Option<f64> {
                match canonical_key(key) {
                    $( stringify!($field) => Some(self.$field), )+
                    _ => None,
                }
            }

            fn slot_mut(&mut self, key: &str) -> Option<&mut f64> {
                match key {
                    $( stringify!($field) => Some(&mut self.$field), )+
                    _ => None,
                }
            }
        }
    };
}

line_items! {
    // Actif immobilisé
    terrains,
    batiments,
    materiel_equipement,
    materiel_transport,
    mobilier_bureau,
    immobilisations_financieres,
    immobilisations_nettes,

    // Actif circulant
    stocks_matieres_premieres,
    stocks_produits_finis,
    stocks_marchandises,
    stocks,
    creances_clients,
    autres_creances,
    #[serde(alias = "total_actif_circulant")]
    actif_circulant,

    // Trésorerie actif
    banques_actif,
    caisse,
    ccp,
    tresorerie,
    total_actif,

    // Capitaux propres
    capital,
    reserves,
    report_nouveau,
    capitaux_propres,

    // Dettes financières
    emprunts_bancaires_long_terme,
    emprunts_obligataires,
    autres_dettes_financieres,
    dettes_financieres,

    // Passif circulant
    #[serde(alias = "fournisseurs")]
    dettes_fournisseurs,
    dettes_fiscales,
    dettes_sociales,
    autres_dettes,
    dettes_court_terme,

    // Trésorerie passif
    banques_credits_tresorerie,
    banques_credits_escompte,
    tresorerie_passif,

    // Compte de résultat: produits
    ventes_marchandises,
    ventes_produits_fabriques,
    travaux_services_vendus,
    produits_accessoires,
    chiffre_affaires,
    marge_commerciale,
    production_stockee,
    production_immobilisee,
    subventions_exploitation,
    autres_produits,

    // Compte de résultat: charges
    achats_marchandises,
    achats_matieres_premieres,
    autres_achats,
    transports,
    services_exterieurs,
    impots_taxes,
    autres_charges,
    charges_personnel,
    dotations_amortissements,

    // Soldes intermédiaires
    valeur_ajoutee,
    excedent_brut,
    resultat_exploitation,
    revenus_financiers,
    frais_financiers,
    resultat_financier,
    impots_resultat,
    resultat_net,

    // Tableau des flux
    cafg,
    variation_bfr,
    flux_activites_operationnelles,
    acquisitions_immobilisations,
    cessions_immobilisations,
    flux_activites_investissement,
    augmentation_capital,
    nouveaux_emprunts,
    remboursements_emprunts,
    dividendes_verses,
    flux_activites_financement,
    variation_tresorerie,
    tresorerie_ouverture,
    tresorerie_cloture,
}

/// Maps the legacy spreadsheet labels onto their canonical key.
fn canonical_key(key: &str) -> &str {
    match key {
        "total_actif_circulant" => "actif_circulant",
        "fournisseurs" => "dettes_fournisseurs",
        other => other,
    }
}

/// Explicit total when it was provided, otherwise the sum of its parts.
fn explicit_or(total: f64, parts: f64) -> f64 {
    if total != 0.0 {
        total
    } else {
        parts
    }
}

impl StatementRecord {
    /// Validated construction from a string-keyed mapping.
    ///
    /// Later entries overwrite earlier ones for the same key.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut record = Self::default();
        for (key, value) in entries {
            let key = canonical_key(key.as_ref().trim());
            if !value.is_finite() {
                return Err(AnalysisError::NonFiniteAmount {
                    key: key.to_string(),
                    value,
                });
            }
            let slot = record
                .slot_mut(key)
                .ok_or_else(|| AnalysisError::UnknownLineItem(key.to_string()))?;
            *slot = value;
        }
        Ok(record)
    }

    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_recognized(key: &str) -> bool {
        Self::LINE_ITEMS.contains(&canonical_key(key))
    }

    // --- Balance sheet aggregates ---

    pub fn fixed_assets(&self) -> f64 {
        explicit_or(
            self.immobilisations_nettes,
            self.terrains
                + self.batiments
                + self.materiel_equipement
                + self.materiel_transport
                + self.mobilier_bureau
                + self.immobilisations_financieres,
        )
    }

    pub fn inventory(&self) -> f64 {
        explicit_or(
            self.stocks,
            self.stocks_matieres_premieres + self.stocks_produits_finis + self.stocks_marchandises,
        )
    }

    pub fn receivables(&self) -> f64 {
        self.creances_clients + self.autres_creances
    }

    /// Actif circulant, treasury excluded.
    pub fn current_assets(&self) -> f64 {
        explicit_or(self.actif_circulant, self.inventory() + self.receivables())
    }

    pub fn cash(&self) -> f64 {
        explicit_or(self.tresorerie, self.banques_actif + self.caisse + self.ccp)
    }

    pub fn total_assets(&self) -> f64 {
        explicit_or(
            self.total_actif,
            self.fixed_assets() + self.current_assets() + self.cash(),
        )
    }

    pub fn equity(&self) -> f64 {
        explicit_or(
            self.capitaux_propres,
            self.capital + self.reserves + self.report_nouveau + self.resultat_net,
        )
    }

    pub fn financial_debt(&self) -> f64 {
        explicit_or(
            self.dettes_financieres,
            self.emprunts_bancaires_long_terme
                + self.emprunts_obligataires
                + self.autres_dettes_financieres,
        )
    }

    pub fn short_term_debt(&self) -> f64 {
        explicit_or(
            self.dettes_court_terme,
            self.dettes_fournisseurs + self.dettes_fiscales + self.dettes_sociales + self.autres_dettes,
        )
    }

    pub fn bank_overdrafts(&self) -> f64 {
        explicit_or(
            self.tresorerie_passif,
            self.banques_credits_tresorerie + self.banques_credits_escompte,
        )
    }

    pub fn total_debt(&self) -> f64 {
        self.financial_debt() + self.short_term_debt() + self.bank_overdrafts()
    }

    /// Capitaux permanents.
    pub fn permanent_capital(&self) -> f64 {
        self.equity() + self.financial_debt()
    }

    /// Besoin en fonds de roulement.
    pub fn working_capital_need(&self) -> f64 {
        self.current_assets() - self.short_term_debt()
    }

    /// Fonds de roulement.
    pub fn working_capital(&self) -> f64 {
        self.permanent_capital() - self.fixed_assets()
    }

    pub fn net_cash(&self) -> f64 {
        self.working_capital() - self.working_capital_need()
    }

    /// Stock moyen. Opening inventory is not part of the record, so this is
    /// the closing inventory.
    pub fn average_inventory(&self) -> f64 {
        self.inventory()
    }

    // --- Income statement aggregates ---

    pub fn revenue(&self) -> f64 {
        explicit_or(
            self.chiffre_affaires,
            self.ventes_marchandises
                + self.ventes_produits_fabriques
                + self.travaux_services_vendus
                + self.produits_accessoires,
        )
    }

    pub fn purchases(&self) -> f64 {
        self.achats_marchandises + self.achats_matieres_premieres + self.autres_achats
    }

    pub fn cost_of_sales(&self) -> f64 {
        self.achats_marchandises + self.achats_matieres_premieres
    }

    pub fn external_consumption(&self) -> f64 {
        self.purchases() + self.transports + self.services_exterieurs + self.autres_charges
    }

    pub fn commercial_margin(&self) -> f64 {
        explicit_or(
            self.marge_commerciale,
            self.ventes_marchandises - self.achats_marchandises,
        )
    }

    pub fn value_added(&self) -> f64 {
        explicit_or(
            self.valeur_ajoutee,
            self.revenue() + self.production_stockee + self.production_immobilisee
                - self.external_consumption(),
        )
    }

    /// Excédent brut d'exploitation.
    pub fn gross_operating_surplus(&self) -> f64 {
        explicit_or(
            self.excedent_brut,
            self.value_added() + self.subventions_exploitation
                - self.impots_taxes
                - self.charges_personnel,
        )
    }

    pub fn operating_income(&self) -> f64 {
        explicit_or(
            self.resultat_exploitation,
            self.gross_operating_surplus() - self.dotations_amortissements,
        )
    }

    /// Capacité d'autofinancement globale.
    pub fn self_financing_capacity(&self) -> f64 {
        explicit_or(self.cafg, self.resultat_net + self.dotations_amortissements)
    }

    pub fn aggregates(&self) -> StatementAggregates {
        StatementAggregates {
            fixed_assets: self.fixed_assets(),
            current_assets: self.current_assets(),
            cash: self.cash(),
            total_assets: self.total_assets(),
            equity: self.equity(),
            financial_debt: self.financial_debt(),
            short_term_debt: self.short_term_debt(),
            bank_overdrafts: self.bank_overdrafts(),
            total_debt: self.total_debt(),
            permanent_capital: self.permanent_capital(),
            working_capital: self.working_capital(),
            working_capital_need: self.working_capital_need(),
            net_cash: self.net_cash(),
            revenue: self.revenue(),
            value_added: self.value_added(),
            gross_operating_surplus: self.gross_operating_surplus(),
            operating_income: self.operating_income(),
            self_financing_capacity: self.self_financing_capacity(),
        }
    }

    /// Soft balance-sheet check. Imbalances are reported, never rejected.
    pub fn balance_check(&self, tolerance: f64) -> BalanceCheck {
        let asset_gap =
            self.total_actif - (self.fixed_assets() + self.current_assets() + self.cash());
        let liability_gap = self.total_actif
            - (self.equity() + self.financial_debt() + self.short_term_debt() + self.bank_overdrafts());
        let tolerance = tolerance.abs();

        BalanceCheck {
            asset_gap,
            liability_gap,
            tolerance,
            balanced: asset_gap.abs() <= tolerance && liability_gap.abs() <= tolerance,
        }
    }
}

/// Derived totals and intermediate balances of a [`StatementRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementAggregates {
    pub fixed_assets: f64,
    pub current_assets: f64,
    pub cash: f64,
    pub total_assets: f64,
    pub equity: f64,
    pub financial_debt: f64,
    pub short_term_debt: f64,
    pub bank_overdrafts: f64,
    pub total_debt: f64,
    pub permanent_capital: f64,
    pub working_capital: f64,
    pub working_capital_need: f64,
    pub net_cash: f64,
    pub revenue: f64,
    pub value_added: f64,
    pub gross_operating_surplus: f64,
    pub operating_income: f64,
    pub self_financing_capacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// `total_actif - (immobilisations + actif circulant + trésorerie)`
    pub asset_gap: f64,
    /// `total_actif - (capitaux propres + dettes financières + DCT + trésorerie passif)`
    pub liability_gap: f64,
    pub tolerance: f64,
    pub balanced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_items_default_to_zero() {
        let record = StatementRecord::default();
        assert_eq!(record.get("chiffre_affaires"), Some(0.0));
        assert_eq!(record.total_assets(), 0.0);
    }

    #[test]
    fn test_from_entries_rejects_unknown_key() {
        let err = StatementRecord::from_entries([("chifre_affaires", 100.0)]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownLineItem(k) if k == "chifre_affaires"));
    }

    #[test]
    fn test_from_entries_rejects_non_finite() {
        let err = StatementRecord::from_entries([("stocks", f64::NAN)]).unwrap_err();
        assert!(matches!(err, AnalysisError::NonFiniteAmount { .. }));
    }

    #[test]
    fn test_from_entries_accepts_aliases() {
        let record = StatementRecord::from_entries([
            ("total_actif_circulant", 300.0),
            ("fournisseurs", 40.0),
        ])
        .unwrap();
        assert_eq!(record.actif_circulant, 300.0);
        assert_eq!(record.dettes_fournisseurs, 40.0);
        assert_eq!(record.get("fournisseurs"), Some(40.0));
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        assert!(StatementRecord::from_json_str(r#"{"stocks": 10, "stock": 5}"#).is_err());
        let record = StatementRecord::from_json_str(r#"{"stocks": 10, "fournisseurs": 5}"#).unwrap();
        assert_eq!(record.stocks, 10.0);
        assert_eq!(record.dettes_fournisseurs, 5.0);
    }

    #[test]
    fn test_line_items_are_unique_and_resolvable() {
        let mut keys: Vec<&str> = StatementRecord::LINE_ITEMS.to_vec();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), StatementRecord::LINE_ITEMS.len());
        for key in StatementRecord::LINE_ITEMS {
            assert!(StatementRecord::is_recognized(key));
        }
    }

    #[test]
    fn test_aggregates_fall_back_to_components() {
        let record = StatementRecord {
            stocks_marchandises: 50.0,
            stocks_matieres_premieres: 30.0,
            creances_clients: 100.0,
            autres_creances: 20.0,
            banques_actif: 15.0,
            caisse: 5.0,
            terrains: 200.0,
            batiments: 300.0,
            ..Default::default()
        };
        assert_relative_eq!(record.inventory(), 80.0);
        assert_relative_eq!(record.current_assets(), 200.0);
        assert_relative_eq!(record.cash(), 20.0);
        assert_relative_eq!(record.fixed_assets(), 500.0);
        assert_relative_eq!(record.total_assets(), 720.0);
    }

    #[test]
    fn test_explicit_totals_win() {
        let record = StatementRecord {
            actif_circulant: 999.0,
            stocks: 10.0,
            creances_clients: 10.0,
            ..Default::default()
        };
        assert_relative_eq!(record.current_assets(), 999.0);
    }

    #[test]
    fn test_income_statement_cascade() {
        let record = StatementRecord {
            chiffre_affaires: 1000.0,
            achats_marchandises: 300.0,
            autres_achats: 50.0,
            services_exterieurs: 50.0,
            charges_personnel: 250.0,
            impots_taxes: 20.0,
            subventions_exploitation: 10.0,
            dotations_amortissements: 40.0,
            resultat_net: 60.0,
            ..Default::default()
        };
        assert_relative_eq!(record.value_added(), 600.0);
        assert_relative_eq!(record.gross_operating_surplus(), 340.0);
        assert_relative_eq!(record.operating_income(), 300.0);
        assert_relative_eq!(record.self_financing_capacity(), 100.0);
    }

    #[test]
    fn test_balance_check() {
        let balanced = StatementRecord {
            immobilisations_nettes: 500.0,
            actif_circulant: 300.0,
            tresorerie: 200.0,
            total_actif: 1000.0,
            capitaux_propres: 400.0,
            dettes_financieres: 300.0,
            dettes_court_terme: 300.0,
            ..Default::default()
        };
        let check = balanced.balance_check(DEFAULT_BALANCE_TOLERANCE);
        assert!(check.balanced);
        assert_relative_eq!(check.asset_gap, 0.0);

        let skewed = StatementRecord {
            total_actif: 10_000.0,
            ..balanced
        };
        let check = skewed.balance_check(DEFAULT_BALANCE_TOLERANCE);
        assert!(!check.balanced);
        assert_relative_eq!(check.asset_gap, 9000.0);
        assert_relative_eq!(check.liability_gap, 9000.0);
    }

    #[test]
    fn test_cash_flow_items_accepted() {
        let json = r#"{"resultat_net":90,"cafg":150,"variation_bfr":-20,"tresorerie_ouverture":80,"tresorerie_cloture":100}"#;
        let record = StatementRecord::from_json_str(json).unwrap();
        assert_relative_eq!(record.variation_bfr, -20.0);
        assert_relative_eq!(record.tresorerie_ouverture, 80.0);
        assert_relative_eq!(record.tresorerie_cloture, 100.0);

        let back: StatementRecord =
            StatementRecord::from_json_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(back, record);

        let entries = StatementRecord::from_entries([
            ("variation_bfr", -20.0),
            ("tresorerie_ouverture", 80.0),
            ("tresorerie_cloture", 100.0),
        ])
        .unwrap();
        assert_eq!(entries.get("variation_bfr"), Some(-20.0));
        assert_eq!(entries.get("tresorerie_cloture"), Some(100.0));
    }
}
