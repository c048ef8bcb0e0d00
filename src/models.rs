//! Data models for costs, ingredients, recipes and resale pricing

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::PricingError;

/// Bucket a fixed cost belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CostCategory {
    #[default]
    FixedExpense,
    Personnel,
    Other,
}

impl CostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::FixedExpense => "fixed",
            CostCategory::Personnel => "personnel",
            CostCategory::Other => "other",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostCategory {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" | "fixed_expense" => Ok(CostCategory::FixedExpense),
            "personnel" => Ok(CostCategory::Personnel),
            "other" => Ok(CostCategory::Other),
            other => Err(PricingError::Validation(format!(
                "unknown cost category '{}'",
                other
            ))),
        }
    }
}

/// Unit an ingredient is purchased and consumed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Unit,
    Kg,
    G,
    Liter,
    Ml,
    Meter,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Unit => "unit",
            Unit::Kg => "kg",
            Unit::G => "g",
            Unit::Liter => "liter",
            Unit::Ml => "ml",
            Unit::Meter => "meter",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unit" => Ok(Unit::Unit),
            "kg" => Ok(Unit::Kg),
            "g" => Ok(Unit::G),
            "liter" | "l" => Ok(Unit::Liter),
            "ml" => Ok(Unit::Ml),
            "meter" | "m" => Ok(Unit::Meter),
            other => Err(PricingError::Validation(format!("unknown unit '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedCostItem {
    pub description: String,
    pub amount: Decimal,
    pub category: CostCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRecord {
    pub name: String,
    pub unit: Unit,
    pub purchase_qty: Decimal,
    pub purchase_cost: Decimal,
    pub unit_cost: Decimal,
}

/// One line of a recipe. Unit cost is a snapshot taken when the line was
/// added, so later catalog changes never reprice it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeLine {
    pub ingredient_name: String,
    pub unit: Unit,
    pub quantity_used: Decimal,
    pub unit_cost: Decimal,
    pub line_cost: Decimal,
}

/// Inputs for pricing a single resold product. Rates are fractions (0.04 = 4%).
#[derive(Debug, Clone, PartialEq)]
pub struct ResalePriceInput {
    pub acquisition_cost: Decimal,
    pub packaging_cost: Decimal,
    pub tax_rate: Decimal,
    pub marketplace_fee_rate: Decimal,
    pub desired_markup_rate: Decimal,
    pub fixed_fee_per_sale: Decimal,
}

/// Advisory verdict on a resale margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginHealth {
    LowMargin,
    HealthyMargin,
}

impl MarginHealth {
    /// Margins strictly below `threshold` percent are low.
    pub fn classify(margin_percent: Decimal, threshold: Decimal) -> Self {
        if margin_percent < threshold {
            MarginHealth::LowMargin
        } else {
            MarginHealth::HealthyMargin
        }
    }
}

/// Suggested price and its composition
#[derive(Debug, Clone, PartialEq)]
pub struct ResalePriceResult {
    pub product_cost: Decimal,
    pub allocated_fixed_cost: Decimal,
    pub tax_amount: Decimal,
    pub marketplace_fee_amount: Decimal,
    pub fixed_fee_amount: Decimal,
    pub net_profit: Decimal,
    pub suggested_price: Decimal,
    pub margin_percent: Decimal,
    pub margin_health: MarginHealth,
}
