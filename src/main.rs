//! Pricing Calculator
//!
//! Command-line front end for the small-business pricing engine.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

use pricing_calculator::arith::rounded;
use pricing_calculator::calculator::{self, compute_kit_price};
use pricing_calculator::db;
use pricing_calculator::{CostCategory, PricingConfig, ResalePriceInput, Session, Unit};

#[derive(Parser)]
#[command(name = "pricing-calculator")]
#[command(about = "Resale and recipe pricing calculator for small businesses")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, default_value = "pricing.db")]
    database: PathBuf,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty database with schema
    Init,

    /// Manage fixed operating costs
    Cost {
        #[command(subcommand)]
        action: CostAction,
    },

    /// Set the average monthly revenue used to allocate fixed costs
    Revenue {
        value: Decimal,
    },

    /// Manage purchased ingredients and raw materials
    Ingredient {
        #[command(subcommand)]
        action: IngredientAction,
    },

    /// Build and price a recipe or kit
    Recipe {
        #[command(subcommand)]
        action: RecipeAction,
    },

    /// Suggest a resale price for a single product
    Resale {
        /// Acquisition cost of the product
        #[arg(long)]
        acquisition: Decimal,

        /// Packaging and label cost
        #[arg(long, default_value = "0")]
        packaging: Decimal,

        /// Tax rate as a fraction (e.g. 0.04)
        #[arg(long)]
        tax: Option<Decimal>,

        /// Marketplace commission plus card fee as a fraction
        #[arg(long)]
        fee: Option<Decimal>,

        /// Fixed fee charged per sale
        #[arg(long)]
        fixed_fee: Option<Decimal>,

        /// Desired markup as a fraction
        #[arg(long)]
        markup: Option<Decimal>,
    },
}

#[derive(Subcommand)]
enum CostAction {
    /// Add a fixed cost
    Add {
        description: String,
        amount: Decimal,

        /// fixed, personnel or other
        #[arg(long, default_value = "fixed")]
        category: CostCategory,
    },
    /// Show costs and the resulting allocation
    List,
    /// Remove all fixed costs
    Clear,
}

#[derive(Subcommand)]
enum IngredientAction {
    /// Register an ingredient from a purchase
    Add {
        name: String,

        /// Quantity in the purchased package
        quantity: Decimal,

        /// Price paid for the package
        cost: Decimal,

        /// unit, kg, g, liter, ml or meter
        #[arg(long, default_value = "unit")]
        unit: Unit,
    },
    /// List registered ingredients
    List,
    /// Remove all ingredients
    Clear,
}

#[derive(Subcommand)]
enum RecipeAction {
    /// Add an ingredient line to the current recipe
    Add {
        ingredient: String,
        quantity: Decimal,
    },
    /// Show the recipe lines and material cost
    Show,
    /// Price the recipe with a markup multiplier
    Price {
        #[arg(short, long)]
        multiplier: Option<Decimal>,
    },
    /// Start a new recipe
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PricingConfig::load_or_default(cli.config.as_deref())?;

    let conn = Connection::open(&cli.database)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::Cost { action } => run_cost(&conn, &config, action)?,

        Commands::Revenue { value } => {
            let mut session = Session::load(&conn, &config)?;
            session.ledger.set_revenue_baseline(value)?;
            db::save_revenue_baseline(&conn, value)?;
            info!(%value, "Revenue baseline updated");
            print_allocation(&session);
        }

        Commands::Ingredient { action } => run_ingredient(&conn, &config, action)?,

        Commands::Recipe { action } => run_recipe(&conn, &config, action)?,

        Commands::Resale {
            acquisition,
            packaging,
            tax,
            fee,
            fixed_fee,
            markup,
        } => {
            let session = Session::load(&conn, &config)?;
            let input = ResalePriceInput {
                acquisition_cost: acquisition,
                packaging_cost: packaging,
                tax_rate: tax.unwrap_or(config.resale.tax_rate),
                marketplace_fee_rate: fee.unwrap_or(config.resale.marketplace_fee_rate),
                desired_markup_rate: markup.unwrap_or(config.resale.desired_markup_rate),
                fixed_fee_per_sale: fixed_fee.unwrap_or(config.resale.fixed_fee_per_sale),
            };

            let ratio = session.ledger.allocation_ratio()?;
            match calculator::compute_resale_price_with_threshold(
                &input,
                ratio,
                config.resale.low_margin_threshold,
            )? {
                Some(result) => println!("{}", result),
                None => println!("Enter an acquisition cost above zero to compute a price."),
            }
        }
    }

    Ok(())
}

fn run_cost(conn: &Connection, config: &PricingConfig, action: CostAction) -> Result<()> {
    let mut session = Session::load(conn, config)?;

    match action {
        CostAction::Add {
            description,
            amount,
            category,
        } => {
            let item = session.ledger.add_item(&description, amount, category)?;
            db::save_fixed_costs(conn, session.ledger.items())?;
            println!(
                "Added cost: {} ({}, {})",
                item.description,
                rounded(item.amount, 2),
                item.category
            );
        }

        CostAction::List => {
            if session.ledger.is_empty() {
                println!("No fixed costs recorded. Add some with 'cost add' to compute the allocation.");
                return Ok(());
            }

            println!("{:<30} {:>12} {:>12}", "Description", "Amount", "Category");
            println!("{}", "-".repeat(56));
            for item in session.ledger.items() {
                println!(
                    "{:<30} {:>12} {:>12}",
                    item.description,
                    rounded(item.amount, 2),
                    item.category
                );
            }
            println!();
            print_allocation(&session);
        }

        CostAction::Clear => {
            session.ledger.clear();
            db::clear_fixed_costs(conn)?;
            println!("Fixed costs cleared.");
        }
    }

    Ok(())
}

fn print_allocation(session: &Session) {
    let ledger = &session.ledger;
    match ledger.total_fixed_cost() {
        Ok(total) => println!("Total fixed costs: {}", rounded(total, 2)),
        Err(e) => println!("Total fixed costs unavailable: {}", e),
    }
    if let Some(baseline) = ledger.revenue_baseline() {
        println!("Revenue baseline:  {}", rounded(baseline, 2));
    }
    // The share is applied to product cost, not to the sale price.
    match ledger.allocation_percent() {
        Ok(percent) => {
            let percent = rounded(percent, 2);
            println!("Fixed cost share:  {}%", percent);
            println!(
                "Fixed expenses add {}% on top of the cost of each product sold.",
                percent
            );
        }
        Err(e) => println!("Fixed cost share unavailable: {}", e),
    }
}

fn run_ingredient(conn: &Connection, config: &PricingConfig, action: IngredientAction) -> Result<()> {
    let mut session = Session::load(conn, config)?;

    match action {
        IngredientAction::Add {
            name,
            quantity,
            cost,
            unit,
        } => {
            let record = session.catalog.add_ingredient(&name, unit, quantity, cost)?;
            db::save_ingredients(conn, session.catalog.list())?;
            println!(
                "{} registered with unit cost {} per {}",
                record.name,
                rounded(record.unit_cost, 4),
                record.unit
            );
        }

        IngredientAction::List => {
            if session.catalog.is_empty() {
                println!("No ingredients registered. Run 'ingredient add' first.");
                return Ok(());
            }

            println!(
                "{:<24} {:>6} {:>10} {:>12} {:>12}",
                "Ingredient", "Unit", "Qty", "Paid", "Unit cost"
            );
            println!("{}", "-".repeat(68));
            for r in session.catalog.list() {
                println!(
                    "{:<24} {:>6} {:>10} {:>12} {:>12}",
                    r.name,
                    r.unit,
                    r.purchase_qty,
                    rounded(r.purchase_cost, 2),
                    rounded(r.unit_cost, 4)
                );
            }
        }

        IngredientAction::Clear => {
            session.catalog.clear();
            db::clear_ingredients(conn)?;
            println!("Ingredients cleared. Existing recipe lines keep their recorded costs.");
        }
    }

    Ok(())
}

fn run_recipe(conn: &Connection, config: &PricingConfig, action: RecipeAction) -> Result<()> {
    let mut session = Session::load(conn, config)?;

    match action {
        RecipeAction::Add {
            ingredient,
            quantity,
        } => {
            let line = session
                .recipe
                .add_line(&session.catalog, &ingredient, quantity)?;
            db::save_recipe_lines(conn, session.recipe.lines())?;
            println!(
                "Added {} {} of {} ({})",
                line.quantity_used,
                line.unit,
                line.ingredient_name,
                rounded(line.line_cost, 2)
            );
        }

        RecipeAction::Show => {
            if session.recipe.is_empty() {
                println!("Recipe is empty. Add lines with 'recipe add'.");
                return Ok(());
            }

            println!(
                "{:<24} {:>10} {:>6} {:>12}",
                "Ingredient", "Qty", "Unit", "Cost"
            );
            println!("{}", "-".repeat(55));
            for line in session.recipe.lines() {
                println!(
                    "{:<24} {:>10} {:>6} {:>12}",
                    line.ingredient_name,
                    line.quantity_used,
                    line.unit,
                    rounded(line.line_cost, 2)
                );
            }
            println!();
            println!("Material cost (CMV): {}", rounded(session.recipe.total_cost()?, 2));
        }

        RecipeAction::Price { multiplier } => {
            let multiplier = multiplier.unwrap_or(config.kit.default_multiplier);
            let bounds = config.kit.bounds()?;
            let total = session.recipe.total_cost()?;
            let price = compute_kit_price(total, multiplier, &bounds)?;
            println!("Material cost (CMV): {}", rounded(total, 2));
            println!("Markup multiplier:   {}", multiplier);
            println!("Suggested price:     {}", rounded(price, 2));
        }

        RecipeAction::Clear => {
            session.recipe.clear();
            db::clear_recipe_lines(conn)?;
            println!("Recipe cleared.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resale_args() {
        let cli = Cli::try_parse_from([
            "pricing-calculator",
            "resale",
            "--acquisition",
            "90",
            "--packaging",
            "10",
            "--tax",
            "0.06",
        ])
        .unwrap();

        match cli.command {
            Commands::Resale {
                acquisition,
                tax,
                fee,
                ..
            } => {
                assert_eq!(acquisition, Decimal::from(90));
                assert_eq!(tax, Some(Decimal::new(6, 2)));
                assert_eq!(fee, None);
            }
            _ => panic!("expected resale command"),
        }
    }

    #[test]
    fn test_parse_cost_category() {
        let cli = Cli::try_parse_from([
            "pricing-calculator",
            "cost",
            "add",
            "Pro-labore",
            "3000",
            "--category",
            "personnel",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Cost {
                action: CostAction::Add {
                    category: CostCategory::Personnel,
                    ..
                }
            }
        ));
    }
}
