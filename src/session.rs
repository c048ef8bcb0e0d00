//! One user's working set: a cost ledger, an ingredient catalog and the
//! recipe under construction, loaded from and saved back to the store.

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

use crate::catalog::IngredientCatalog;
use crate::config::PricingConfig;
use crate::db;
use crate::ledger::CostLedger;
use crate::recipe::Recipe;

#[derive(Debug, Clone)]
pub struct Session {
    pub ledger: CostLedger,
    pub catalog: IngredientCatalog,
    pub recipe: Recipe,
}

impl Session {
    /// Empty session using the configured baseline and catalog policy
    pub fn new(config: &PricingConfig) -> Result<Self> {
        Ok(Self {
            ledger: CostLedger::with_revenue_baseline(config.ledger.default_revenue_baseline)?,
            catalog: IngredientCatalog::with_policy(config.catalog.zero_quantity_policy),
            recipe: Recipe::new(),
        })
    }

    /// Load a session from the store. A store without a revenue baseline
    /// falls back to the configured default.
    pub fn load(conn: &Connection, config: &PricingConfig) -> Result<Self> {
        let baseline = db::load_revenue_baseline(conn)?
            .unwrap_or(config.ledger.default_revenue_baseline);

        let ledger = CostLedger::from_items(db::load_fixed_costs(conn)?, Some(baseline))
            .context("Stored fixed costs are invalid")?;
        let catalog = IngredientCatalog::from_records(
            db::load_ingredients(conn)?,
            config.catalog.zero_quantity_policy,
        )
        .context("Stored ingredients are invalid")?;
        let recipe = Recipe::from_lines(db::load_recipe_lines(conn)?)
            .context("Stored recipe is invalid")?;

        debug!(
            costs = ledger.items().len(),
            ingredients = catalog.list().len(),
            recipe_lines = recipe.lines().len(),
            "Loaded session"
        );
        Ok(Self {
            ledger,
            catalog,
            recipe,
        })
    }

    /// Persist every collection of the session
    pub fn save(&self, conn: &Connection) -> Result<()> {
        db::save_fixed_costs(conn, self.ledger.items())?;
        if let Some(baseline) = self.ledger.revenue_baseline() {
            db::save_revenue_baseline(conn, baseline)?;
        }
        db::save_ingredients(conn, self.catalog.list())?;
        db::save_recipe_lines(conn, self.recipe.lines())?;
        Ok(())
    }
}
