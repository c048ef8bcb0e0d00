//! Purchased ingredients and their unit costs

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::arith;
use crate::error::{PricingError, Result};
use crate::models::{IngredientRecord, Unit};

/// What to do with an ingredient bought in a zero (or negative) quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroQuantityPolicy {
    /// Refuse the record
    #[default]
    Reject,
    /// Accept the record with a unit cost of zero
    ZeroCost,
}

#[derive(Debug, Clone, Default)]
pub struct IngredientCatalog {
    records: Vec<IngredientRecord>,
    policy: ZeroQuantityPolicy,
}

impl IngredientCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ZeroQuantityPolicy) -> Self {
        Self {
            records: Vec::new(),
            policy,
        }
    }

    /// Rebuild a catalog from stored records.
    ///
    /// Stored records are accepted as they were saved, whatever the current
    /// zero-quantity policy is, as long as they are non-negative and their
    /// unit cost agrees with the purchase figures.
    pub fn from_records(records: Vec<IngredientRecord>, policy: ZeroQuantityPolicy) -> Result<Self> {
        let mut catalog = Self::with_policy(policy);
        for record in records {
            catalog.restore_record(record)?;
        }
        Ok(catalog)
    }

    fn restore_record(&mut self, record: IngredientRecord) -> Result<()> {
        self.check_name(&record.name)?;
        if record.purchase_qty < Decimal::ZERO
            || record.purchase_cost < Decimal::ZERO
            || record.unit_cost < Decimal::ZERO
        {
            return Err(PricingError::Validation(format!(
                "stored ingredient '{}' has a negative quantity or cost",
                record.name
            )));
        }

        let expected = if record.purchase_qty > Decimal::ZERO {
            arith::div(record.purchase_cost, record.purchase_qty, "unit cost")?
        } else {
            Decimal::ZERO
        };
        if record.unit_cost != expected {
            return Err(PricingError::Validation(format!(
                "stored ingredient '{}' has unit cost {} but its purchase gives {}",
                record.name, record.unit_cost, expected
            )));
        }

        self.records.push(record);
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(PricingError::validation("ingredient name must not be empty"));
        }
        if self.records.iter().any(|r| r.name == name) {
            return Err(PricingError::Validation(format!(
                "ingredient '{}' is already registered",
                name
            )));
        }
        Ok(())
    }

    pub fn policy(&self) -> ZeroQuantityPolicy {
        self.policy
    }

    pub fn add_ingredient(
        &mut self,
        name: &str,
        unit: Unit,
        purchase_qty: Decimal,
        purchase_cost: Decimal,
    ) -> Result<IngredientRecord> {
        let name = name.trim();
        self.check_name(name)?;
        if purchase_cost < Decimal::ZERO {
            return Err(PricingError::Validation(format!(
                "purchase cost must not be negative (got {})",
                purchase_cost
            )));
        }

        let unit_cost = if purchase_qty > Decimal::ZERO {
            arith::div(purchase_cost, purchase_qty, "unit cost")?
        } else {
            match self.policy {
                ZeroQuantityPolicy::Reject => {
                    return Err(PricingError::Validation(format!(
                        "purchase quantity must be positive (got {})",
                        purchase_qty
                    )));
                }
                ZeroQuantityPolicy::ZeroCost => Decimal::ZERO,
            }
        };

        let record = IngredientRecord {
            name: name.to_string(),
            unit,
            purchase_qty,
            purchase_cost,
            unit_cost,
        };
        debug!(name, %unit, %unit_cost, "Registered ingredient");
        self.records.push(record.clone());
        Ok(record)
    }

    pub fn find_by_name(&self, name: &str) -> Result<&IngredientRecord> {
        let name = name.trim();
        self.records
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| PricingError::NotFound(format!("ingredient '{}'", name)))
    }

    pub fn list(&self) -> &[IngredientRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recipes keep their snapshotted costs, so clearing never reprices them.
    pub fn clear(&mut self) {
        info!(count = self.records.len(), "Clearing ingredient catalog");
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_cost_is_cost_over_quantity() {
        let mut catalog = IngredientCatalog::new();
        let flour = catalog
            .add_ingredient("Flour", Unit::Kg, dec!(5), dec!(25))
            .unwrap();
        assert_eq!(flour.unit_cost, dec!(5));

        let ribbon = catalog
            .add_ingredient("Ribbon", Unit::Meter, dec!(50), dec!(12.5))
            .unwrap();
        assert_eq!(ribbon.unit_cost, dec!(0.25));
    }

    #[test]
    fn test_reject_policy_refuses_zero_quantity() {
        let mut catalog = IngredientCatalog::with_policy(ZeroQuantityPolicy::Reject);
        assert!(matches!(
            catalog.add_ingredient("Sugar", Unit::G, dec!(0), dec!(10)),
            Err(PricingError::Validation(_))
        ));
        assert!(matches!(
            catalog.add_ingredient("Sugar", Unit::G, dec!(-1), dec!(10)),
            Err(PricingError::Validation(_))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_zero_cost_policy_accepts_zero_quantity() {
        let mut catalog = IngredientCatalog::with_policy(ZeroQuantityPolicy::ZeroCost);
        let sugar = catalog
            .add_ingredient("Sugar", Unit::G, dec!(0), dec!(10))
            .unwrap();
        assert_eq!(sugar.unit_cost, Decimal::ZERO);
        assert_eq!(catalog.list().len(), 1);
    }

    #[test]
    fn test_rejects_negative_cost_empty_and_duplicate_names() {
        let mut catalog = IngredientCatalog::new();
        assert!(catalog.add_ingredient("Milk", Unit::Liter, dec!(1), dec!(-2)).is_err());
        assert!(catalog.add_ingredient("", Unit::Liter, dec!(1), dec!(2)).is_err());

        catalog.add_ingredient("Milk", Unit::Liter, dec!(1), dec!(4)).unwrap();
        assert!(matches!(
            catalog.add_ingredient("Milk", Unit::Ml, dec!(1000), dec!(5)),
            Err(PricingError::Validation(_))
        ));
    }

    #[test]
    fn test_tiny_quantity_overflow_is_an_error() {
        let mut catalog = IngredientCatalog::new();
        assert!(matches!(
            catalog.add_ingredient("Dust", Unit::G, dec!(0.0000000000000000000000000001), dec!(1000)),
            Err(PricingError::Validation(_))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_stored_zero_quantity_record_loads_under_reject_policy() {
        let mut lenient = IngredientCatalog::with_policy(ZeroQuantityPolicy::ZeroCost);
        let sample = lenient
            .add_ingredient("Sample", Unit::Unit, dec!(0), dec!(5))
            .unwrap();

        let catalog =
            IngredientCatalog::from_records(vec![sample], ZeroQuantityPolicy::Reject).unwrap();
        assert_eq!(catalog.find_by_name("Sample").unwrap().unit_cost, Decimal::ZERO);
        assert_eq!(catalog.policy(), ZeroQuantityPolicy::Reject);
    }

    #[test]
    fn test_stored_record_with_inconsistent_unit_cost_is_rejected() {
        let tampered = IngredientRecord {
            name: "Flour".to_string(),
            unit: Unit::Kg,
            purchase_qty: dec!(5),
            purchase_cost: dec!(25),
            unit_cost: dec!(4),
        };
        assert!(matches!(
            IngredientCatalog::from_records(vec![tampered], ZeroQuantityPolicy::Reject),
            Err(PricingError::Validation(_))
        ));
    }

    #[test]
    fn test_find_by_name() {
        let mut catalog = IngredientCatalog::new();
        catalog.add_ingredient("Box", Unit::Unit, dec!(10), dec!(15)).unwrap();

        assert_eq!(catalog.find_by_name("Box").unwrap().unit_cost, dec!(1.5));
        assert!(matches!(
            catalog.find_by_name("Tape"),
            Err(PricingError::NotFound(_))
        ));
    }

    #[test]
    fn test_clear_empties_catalog() {
        let mut catalog = IngredientCatalog::new();
        catalog.add_ingredient("Box", Unit::Unit, dec!(10), dec!(15)).unwrap();
        catalog.clear();
        assert!(catalog.is_empty());
        assert!(catalog.find_by_name("Box").is_err());
    }
}
