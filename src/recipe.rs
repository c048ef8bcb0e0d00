//! Recipe / kit composition and its raw-material cost (CMV)

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::arith;
use crate::catalog::IngredientCatalog;
use crate::error::{PricingError, Result};
use crate::models::RecipeLine;

#[derive(Debug, Clone, Default)]
pub struct Recipe {
    lines: Vec<RecipeLine>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a recipe from stored lines. Lines carry their own unit cost
    /// snapshot, so no catalog is needed.
    pub fn from_lines(lines: Vec<RecipeLine>) -> Result<Self> {
        for line in &lines {
            if line.quantity_used < Decimal::ZERO || line.unit_cost < Decimal::ZERO {
                return Err(PricingError::Validation(format!(
                    "stored recipe line for '{}' has a negative quantity or cost",
                    line.ingredient_name
                )));
            }
        }
        Ok(Self { lines })
    }

    /// Append `quantity_used` of a catalog ingredient, snapshotting its
    /// current unit cost.
    pub fn add_line(
        &mut self,
        catalog: &IngredientCatalog,
        ingredient_name: &str,
        quantity_used: Decimal,
    ) -> Result<RecipeLine> {
        let ingredient = catalog.find_by_name(ingredient_name)?;
        if quantity_used < Decimal::ZERO {
            return Err(PricingError::Validation(format!(
                "quantity used must not be negative (got {})",
                quantity_used
            )));
        }

        let line = RecipeLine {
            ingredient_name: ingredient.name.clone(),
            unit: ingredient.unit,
            quantity_used,
            unit_cost: ingredient.unit_cost,
            line_cost: arith::mul(ingredient.unit_cost, quantity_used, "line cost")?,
        };
        debug!(
            ingredient = %line.ingredient_name,
            quantity = %quantity_used,
            line_cost = %line.line_cost,
            "Added recipe line"
        );
        self.lines.push(line.clone());
        Ok(line)
    }

    pub fn lines(&self) -> &[RecipeLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_cost(&self) -> Result<Decimal> {
        arith::sum(self.lines.iter().map(|line| line.line_cost), "recipe total cost")
    }

    pub fn clear(&mut self) {
        info!(count = self.lines.len(), "Clearing recipe");
        self.lines.clear();
    }
}
