//! Pricing engine for small businesses
//!
//! Allocates fixed operating costs onto product cost, prices resold
//! products with a divide-through markup that accounts for taxes and
//! marketplace fees, and rolls up recipe/kit material costs.

pub mod arith;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod recipe;
pub mod session;

pub use calculator::{compute_kit_price, compute_resale_price, KitMarkupBounds};
pub use catalog::{IngredientCatalog, ZeroQuantityPolicy};
pub use config::PricingConfig;
pub use error::{PricingError, Result};
pub use ledger::CostLedger;
pub use models::{
    CostCategory, FixedCostItem, IngredientRecord, MarginHealth, RecipeLine, ResalePriceInput,
    ResalePriceResult, Unit,
};
pub use recipe::Recipe;
pub use session::Session;
