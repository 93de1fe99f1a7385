//! Ratio engine: turns a [`StatementRecord`] into the full [`RatioSet`].
//!
//! Every ratio is computed eagerly. A zero divisor, or any arithmetic that
//! would leave a non-finite result, resolves to `0.0` so scoring never sees
//! NaN or infinity.

use statement_core::{RatioCalculator, RatioKey, RatioSet, StatementRecord};

/// Days in the commercial year used for delay ratios.
pub const DAYS_PER_YEAR: f64 = 360.0;

/// `numerator / denominator`, or `None` when the quotient is degenerate.
pub fn checked_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return None;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// Safe division: `0.0` whenever [`checked_ratio`] is degenerate.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    or_zero(checked_ratio(numerator, denominator))
}

fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RatioEngine;

impl RatioEngine {
    pub fn new() -> Self {
        Self
    }

    fn calculate_percentage(&self, part: f64, whole: f64) -> Option<f64> {
        checked_ratio(part, whole).map(|r| r * 100.0)
    }

    fn calculate_days(&self, amount: f64, annual_flow: f64) -> Option<f64> {
        checked_ratio(amount * DAYS_PER_YEAR, annual_flow)
    }

    fn calculate_current_ratio(&self, record: &StatementRecord) -> Option<f64> {
        checked_ratio(record.current_assets(), record.short_term_debt())
    }

    fn calculate_quick_ratio(&self, record: &StatementRecord) -> Option<f64> {
        checked_ratio(
            record.current_assets() - record.inventory(),
            record.short_term_debt(),
        )
    }

    fn calculate_cash_ratio(&self, record: &StatementRecord) -> Option<f64> {
        checked_ratio(record.receivables() + record.cash(), record.short_term_debt())
    }

    fn calculate_debt_ratio(&self, record: &StatementRecord) -> Option<f64> {
        self.calculate_percentage(record.total_debt(), record.total_assets())
    }

    /// Years of self-financing needed to repay financial debt.
    fn calculate_repayment_capacity(&self, record: &StatementRecord) -> Option<f64> {
        checked_ratio(record.financial_debt(), record.self_financing_capacity())
    }

    fn calculate_roe(&self, net_income: f64, equity: f64) -> Option<f64> {
        self.calculate_percentage(net_income, equity)
    }

    fn calculate_roa(&self, net_income: f64, total_assets: f64) -> Option<f64> {
        self.calculate_percentage(net_income, total_assets)
    }

    fn calculate_profit_margin(&self, net_income: f64, revenue: f64) -> Option<f64> {
        self.calculate_percentage(net_income, revenue)
    }

    fn calculate_operating_margin(&self, operating_income: f64, revenue: f64) -> Option<f64> {
        self.calculate_percentage(operating_income, revenue)
    }

    fn calculate_gross_margin(&self, commercial_margin: f64, revenue: f64) -> Option<f64> {
        self.calculate_percentage(commercial_margin, revenue)
    }

    fn ratio_values(&self, r: &StatementRecord) -> [(RatioKey, Option<f64>); 27] {
        let revenue = r.revenue();
        let total_assets = r.total_assets();
        let equity = r.equity();
        let value_added = r.value_added();
        let ebe = r.gross_operating_surplus();
        let cost_of_sales = r.cost_of_sales();

        [
            (RatioKey::RatioLiquiditeGenerale, self.calculate_current_ratio(r)),
            (RatioKey::RatioLiquiditeReduite, self.calculate_quick_ratio(r)),
            (RatioKey::RatioLiquiditeImmediate, self.calculate_cash_ratio(r)),
            (
                RatioKey::BfrJoursCa,
                self.calculate_days(r.working_capital_need(), revenue),
            ),
            (
                RatioKey::RatioAutonomieFinanciere,
                self.calculate_percentage(equity, total_assets),
            ),
            (RatioKey::RatioEndettement, self.calculate_debt_ratio(r)),
            (RatioKey::CapaciteRemboursement, self.calculate_repayment_capacity(r)),
            (
                RatioKey::RatioCouvertureImmobilisations,
                checked_ratio(r.permanent_capital(), r.fixed_assets()),
            ),
            (
                RatioKey::RatioSolvabiliteGenerale,
                checked_ratio(total_assets, r.total_debt()),
            ),
            (
                RatioKey::RatioEndettementFinancier,
                self.calculate_percentage(r.financial_debt(), equity),
            ),
            (
                RatioKey::RatioCouvertureFraisFinanciers,
                checked_ratio(ebe, r.frais_financiers),
            ),
            (RatioKey::Roe, self.calculate_roe(r.resultat_net, equity)),
            (RatioKey::Roa, self.calculate_roa(r.resultat_net, total_assets)),
            (RatioKey::MargeNette, self.calculate_profit_margin(r.resultat_net, revenue)),
            (
                RatioKey::MargeExploitation,
                self.calculate_operating_margin(r.operating_income(), revenue),
            ),
            (
                RatioKey::MargeBrute,
                self.calculate_gross_margin(r.commercial_margin(), revenue),
            ),
            (
                RatioKey::TauxValeurAjoutee,
                self.calculate_percentage(value_added, revenue),
            ),
            (RatioKey::TauxMargeEbe, self.calculate_percentage(ebe, revenue)),
            (RatioKey::RotationActif, checked_ratio(revenue, total_assets)),
            (
                RatioKey::RotationStocks,
                checked_ratio(cost_of_sales, r.average_inventory()),
            ),
            (
                RatioKey::DelaiRecouvrementClients,
                self.calculate_days(r.creances_clients, revenue),
            ),
            (
                RatioKey::DelaiReglementFournisseurs,
                self.calculate_days(r.dettes_fournisseurs, r.purchases()),
            ),
            (
                RatioKey::DureeStockage,
                self.calculate_days(r.inventory(), cost_of_sales),
            ),
            (
                RatioKey::ProductivitePersonnel,
                checked_ratio(value_added, r.charges_personnel),
            ),
            (
                RatioKey::TauxChargesPersonnel,
                self.calculate_percentage(r.charges_personnel, value_added),
            ),
            (
                RatioKey::RatioCafgCa,
                self.calculate_percentage(r.self_financing_capacity(), revenue),
            ),
            (
                RatioKey::IntensiteCapitaliste,
                checked_ratio(r.fixed_assets(), value_added),
            ),
        ]
    }

    /// Computes every ratio. Degenerate ratios are stored as `0.0`.
    pub fn compute_ratios(&self, record: &StatementRecord) -> RatioSet {
        let values = self.ratio_values(record);
        let degenerate = values.iter().filter(|(_, v)| v.is_none()).count();

        let ratios: RatioSet = values
            .into_iter()
            .map(|(key, value)| (key, or_zero(value)))
            .collect();

        tracing::debug!(
            ratios = ratios.len(),
            degenerate,
            "computed financial ratios"
        );
        ratios
    }
}

impl RatioCalculator for RatioEngine {
    fn compute_ratios(&self, record: &StatementRecord) -> RatioSet {
        RatioEngine::compute_ratios(self, record)
    }
}
