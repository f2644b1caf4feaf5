//! Merges sized calls and allocated puts into the final recommendation set.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use odss_core::{CashPosition, Holding, OptionType, Recommendation};

use crate::allocation;
use crate::optimizer::Selection;

/// Ordered recommendations for one run: calls in holding order, then funded puts
/// in allocation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub strategy: String,
    pub generated_at: DateTime<Utc>,
    pub cash: CashPosition,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationReport {
    /// Builds the report from per-holding selections.
    ///
    /// Every call candidate is emitted, sized by shares held (possibly zero
    /// contracts). Put candidates are pooled in holding order and handed to the
    /// allocator with `cash`.
    #[must_use]
    pub fn assemble(
        strategy: &str,
        generated_at: DateTime<Utc>,
        cash: CashPosition,
        selections: &[(Holding, Selection)],
    ) -> Self {
        let mut recommendations: Vec<Recommendation> = selections
            .iter()
            .filter_map(|(holding, selection)| {
                selection
                    .call
                    .as_ref()
                    .map(|call| allocation::size_call(holding, call))
            })
            .collect();

        let puts: Vec<_> = selections
            .iter()
            .filter_map(|(_, selection)| selection.put.clone())
            .collect();
        recommendations.extend(allocation::allocate(&puts, cash));

        Self {
            strategy: strategy.to_string(),
            generated_at,
            cash,
            recommendations,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn calls(&self) -> impl Iterator<Item = &Recommendation> {
        self.of_type(OptionType::Call)
    }

    pub fn puts(&self) -> impl Iterator<Item = &Recommendation> {
        self.of_type(OptionType::Put)
    }

    fn of_type(&self, kind: OptionType) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(move |r| r.option_type == kind)
    }

    /// Expected daily income across every position.
    #[must_use]
    pub fn total_income_per_day(&self) -> Decimal {
        self.recommendations
            .iter()
            .map(|r| r.income_per_day)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Cash set aside to secure the recommended puts.
    #[must_use]
    pub fn committed_cash(&self) -> Decimal {
        self.puts()
            .map(Recommendation::committed_capital)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    #[must_use]
    pub fn uncommitted_cash(&self) -> Decimal {
        self.cash.amount().saturating_sub(self.committed_cash())
    }

    /// Pretty JSON rendering of the whole report.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
