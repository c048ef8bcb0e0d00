//! Fixed-cost ledger and the allocation (rateio) ratio

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::arith;
use crate::error::{PricingError, Result};
use crate::models::{CostCategory, FixedCostItem};

/// Fixed operating costs against a monthly revenue baseline
#[derive(Debug, Clone, Default)]
pub struct CostLedger {
    items: Vec<FixedCostItem>,
    revenue_baseline: Option<Decimal>,
}

impl CostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_revenue_baseline(value: Decimal) -> Result<Self> {
        let mut ledger = Self::new();
        ledger.set_revenue_baseline(value)?;
        Ok(ledger)
    }

    /// Rebuild a ledger from stored items, validating each one again
    pub fn from_items(items: Vec<FixedCostItem>, revenue_baseline: Option<Decimal>) -> Result<Self> {
        let mut ledger = Self::new();
        if let Some(value) = revenue_baseline {
            ledger.set_revenue_baseline(value)?;
        }
        for item in items {
            ledger.add_item(&item.description, item.amount, item.category)?;
        }
        Ok(ledger)
    }

    pub fn add_item(
        &mut self,
        description: &str,
        amount: Decimal,
        category: CostCategory,
    ) -> Result<FixedCostItem> {
        let description = description.trim();
        if description.is_empty() {
            return Err(PricingError::validation("cost description must not be empty"));
        }
        if amount < Decimal::ZERO {
            return Err(PricingError::validation(format!(
                "cost amount must not be negative (got {})",
                amount
            )));
        }

        let item = FixedCostItem {
            description: description.to_string(),
            amount,
            category,
        };
        debug!(description, %amount, %category, "Added fixed cost");
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn set_revenue_baseline(&mut self, value: Decimal) -> Result<()> {
        if value <= Decimal::ZERO {
            return Err(PricingError::validation(format!(
                "revenue baseline must be positive (got {})",
                value
            )));
        }
        debug!(%value, "Set revenue baseline");
        self.revenue_baseline = Some(value);
        Ok(())
    }

    pub fn revenue_baseline(&self) -> Option<Decimal> {
        self.revenue_baseline
    }

    pub fn items(&self) -> &[FixedCostItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_fixed_cost(&self) -> Result<Decimal> {
        arith::sum(self.items.iter().map(|item| item.amount), "total fixed cost")
    }

    /// Share of every unit of product cost that goes to covering fixed costs
    pub fn allocation_ratio(&self) -> Result<Decimal> {
        let baseline = self
            .revenue_baseline
            .ok_or_else(|| PricingError::InvalidState("revenue baseline has not been set".into()))?;

        // The setter already refuses this; a ledger built any other way must not divide by zero.
        if baseline.is_zero() {
            return Err(PricingError::DivisionByZero("revenue baseline is zero".into()));
        }

        arith::div(self.total_fixed_cost()?, baseline, "allocation ratio")
    }

    /// `allocation_ratio` expressed as a percentage
    pub fn allocation_percent(&self) -> Result<Decimal> {
        arith::mul(self.allocation_ratio()?, Decimal::ONE_HUNDRED, "allocation percent")
    }

    pub fn clear(&mut self) {
        info!(count = self.items.len(), "Clearing fixed costs");
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ledger() -> CostLedger {
        CostLedger::with_revenue_baseline(dec!(20000)).unwrap()
    }

    #[test]
    fn test_ratio_is_total_over_baseline() {
        let mut ledger = ledger();
        ledger.add_item("Rent", dec!(1500), CostCategory::FixedExpense).unwrap();
        ledger.add_item("Internet", dec!(100), CostCategory::FixedExpense).unwrap();
        ledger.add_item("Pro-labore", dec!(400), CostCategory::Personnel).unwrap();

        assert_eq!(ledger.total_fixed_cost().unwrap(), dec!(2000));
        assert_eq!(ledger.allocation_ratio().unwrap(), dec!(0.1));
        assert_eq!(ledger.allocation_percent().unwrap(), dec!(10));
    }

    #[test]
    fn test_empty_ledger_has_zero_ratio() {
        let ledger = ledger();
        assert_eq!(ledger.total_fixed_cost().unwrap(), Decimal::ZERO);
        assert_eq!(ledger.allocation_ratio().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_ratio_scales_linearly_with_an_item() {
        let mut single = ledger();
        single.add_item("Rent", dec!(1000), CostCategory::FixedExpense).unwrap();
        let mut doubled = ledger();
        doubled.add_item("Rent", dec!(2000), CostCategory::FixedExpense).unwrap();

        assert_eq!(
            doubled.allocation_ratio().unwrap(),
            single.allocation_ratio().unwrap() * dec!(2)
        );
    }

    #[test]
    fn test_rejects_negative_amount_and_empty_description() {
        let mut ledger = ledger();
        assert!(matches!(
            ledger.add_item("Rent", dec!(-1), CostCategory::FixedExpense),
            Err(PricingError::Validation(_))
        ));
        assert!(matches!(
            ledger.add_item("   ", dec!(10), CostCategory::Other),
            Err(PricingError::Validation(_))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_zero_amount_is_accepted_and_duplicates_kept() {
        let mut ledger = ledger();
        ledger.add_item("Free tier", dec!(0), CostCategory::Other).unwrap();
        ledger.add_item("Free tier", dec!(0), CostCategory::Other).unwrap();
        assert_eq!(ledger.items().len(), 2);
    }

    #[test]
    fn test_baseline_must_be_positive() {
        let mut ledger = CostLedger::new();
        assert!(matches!(
            ledger.set_revenue_baseline(dec!(0)),
            Err(PricingError::Validation(_))
        ));
        assert!(matches!(
            ledger.set_revenue_baseline(dec!(-500)),
            Err(PricingError::Validation(_))
        ));
        assert_eq!(ledger.revenue_baseline(), None);
    }

    #[test]
    fn test_ratio_without_baseline_is_invalid_state() {
        let mut ledger = CostLedger::new();
        ledger.add_item("Rent", dec!(1000), CostCategory::FixedExpense).unwrap();
        assert!(matches!(
            ledger.allocation_ratio(),
            Err(PricingError::InvalidState(_))
        ));
    }

    #[test]
    fn test_zero_baseline_is_division_by_zero() {
        let ledger = CostLedger {
            items: Vec::new(),
            revenue_baseline: Some(Decimal::ZERO),
        };
        assert!(matches!(
            ledger.allocation_ratio(),
            Err(PricingError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_clear_resets_ratio_to_zero() {
        let mut ledger = ledger();
        ledger.add_item("Rent", dec!(1500), CostCategory::FixedExpense).unwrap();
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.allocation_ratio().unwrap(), Decimal::ZERO);
        assert_eq!(ledger.revenue_baseline(), Some(dec!(20000)));
    }

    #[test]
    fn test_tiny_baseline_overflow_is_an_error() {
        let mut ledger =
            CostLedger::with_revenue_baseline(dec!(0.0000000000000000000000000001)).unwrap();
        ledger.add_item("Rent", dec!(1000), CostCategory::FixedExpense).unwrap();
        assert!(matches!(
            ledger.allocation_ratio(),
            Err(PricingError::Validation(_))
        ));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let mut ledger = ledger();
        ledger.add_item("Huge", Decimal::MAX, CostCategory::Other).unwrap();
        ledger.add_item("Huge again", Decimal::MAX, CostCategory::Other).unwrap();
        assert!(matches!(
            ledger.total_fixed_cost(),
            Err(PricingError::Validation(_))
        ));
        assert!(ledger.allocation_ratio().is_err());
    }

    #[test]
    fn test_from_items_revalidates() {
        let items = vec![FixedCostItem {
            description: "Rent".to_string(),
            amount: dec!(-5),
            category: CostCategory::FixedExpense,
        }];
        assert!(CostLedger::from_items(items, Some(dec!(1000))).is_err());
    }
}
