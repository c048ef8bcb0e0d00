//! Database schema and operations
//!
//! Each collection is loaded and saved as a whole; `save_*` replaces the
//! stored collection in a single transaction. Decimals are stored as TEXT so
//! values round-trip exactly.

use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::info;

use crate::models::{CostCategory, FixedCostItem, IngredientRecord, RecipeLine, Unit};

const REVENUE_BASELINE_KEY: &str = "revenue_baseline";

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Fixed operating costs, in entry order
        CREATE TABLE IF NOT EXISTS fixed_costs (
            position INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL
        );

        -- Purchased ingredients / raw materials
        CREATE TABLE IF NOT EXISTS ingredients (
            position INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            unit TEXT NOT NULL,
            purchase_qty TEXT NOT NULL,
            purchase_cost TEXT NOT NULL,
            unit_cost TEXT NOT NULL
        );

        -- Lines of the recipe being built, with unit cost frozen at add time
        CREATE TABLE IF NOT EXISTS recipe_lines (
            position INTEGER PRIMARY KEY,
            ingredient_name TEXT NOT NULL,
            unit TEXT NOT NULL,
            quantity_used TEXT NOT NULL,
            unit_cost TEXT NOT NULL,
            line_cost TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn decimal_column(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parsed_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Load all fixed costs in entry order
pub fn load_fixed_costs(conn: &Connection) -> Result<Vec<FixedCostItem>> {
    let mut stmt = conn.prepare(
        "SELECT description, amount, category FROM fixed_costs ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(FixedCostItem {
            description: row.get(0)?,
            amount: decimal_column(row, 1)?,
            category: parsed_column(row, 2)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.context("Failed to read fixed cost row")?);
    }
    Ok(results)
}

/// Replace the stored fixed costs
pub fn save_fixed_costs(conn: &Connection, items: &[FixedCostItem]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM fixed_costs", [])?;
    for (position, item) in items.iter().enumerate() {
        tx.execute(
            "INSERT INTO fixed_costs (position, description, amount, category)
             VALUES (?1, ?2, ?3, ?4)",
            (
                position as i64,
                &item.description,
                item.amount.to_string(),
                item.category.as_str(),
            ),
        )?;
    }
    tx.commit()?;
    info!(count = items.len(), "Saved fixed costs");
    Ok(())
}

pub fn clear_fixed_costs(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM fixed_costs", [])?;
    Ok(())
}

/// Load all ingredients in entry order
pub fn load_ingredients(conn: &Connection) -> Result<Vec<IngredientRecord>> {
    let mut stmt = conn.prepare(
        "SELECT name, unit, purchase_qty, purchase_cost, unit_cost
         FROM ingredients ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(IngredientRecord {
            name: row.get(0)?,
            unit: parsed_column::<Unit>(row, 1)?,
            purchase_qty: decimal_column(row, 2)?,
            purchase_cost: decimal_column(row, 3)?,
            unit_cost: decimal_column(row, 4)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.context("Failed to read ingredient row")?);
    }
    Ok(results)
}

/// Replace the stored ingredients
pub fn save_ingredients(conn: &Connection, records: &[IngredientRecord]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM ingredients", [])?;
    for (position, record) in records.iter().enumerate() {
        tx.execute(
            "INSERT INTO ingredients (position, name, unit, purchase_qty, purchase_cost, unit_cost)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                position as i64,
                &record.name,
                record.unit.as_str(),
                record.purchase_qty.to_string(),
                record.purchase_cost.to_string(),
                record.unit_cost.to_string(),
            ),
        )?;
    }
    tx.commit()?;
    info!(count = records.len(), "Saved ingredients");
    Ok(())
}

pub fn clear_ingredients(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM ingredients", [])?;
    Ok(())
}

/// Load the recipe lines in entry order
pub fn load_recipe_lines(conn: &Connection) -> Result<Vec<RecipeLine>> {
    let mut stmt = conn.prepare(
        "SELECT ingredient_name, unit, quantity_used, unit_cost, line_cost
         FROM recipe_lines ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(RecipeLine {
            ingredient_name: row.get(0)?,
            unit: parsed_column::<Unit>(row, 1)?,
            quantity_used: decimal_column(row, 2)?,
            unit_cost: decimal_column(row, 3)?,
            line_cost: decimal_column(row, 4)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.context("Failed to read recipe line row")?);
    }
    Ok(results)
}

/// Replace the stored recipe lines
pub fn save_recipe_lines(conn: &Connection, lines: &[RecipeLine]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM recipe_lines", [])?;
    for (position, line) in lines.iter().enumerate() {
        tx.execute(
            "INSERT INTO recipe_lines (position, ingredient_name, unit, quantity_used, unit_cost, line_cost)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                position as i64,
                &line.ingredient_name,
                line.unit.as_str(),
                line.quantity_used.to_string(),
                line.unit_cost.to_string(),
                line.line_cost.to_string(),
            ),
        )?;
    }
    tx.commit()?;
    info!(count = lines.len(), "Saved recipe lines");
    Ok(())
}

pub fn clear_recipe_lines(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM recipe_lines", [])?;
    Ok(())
}

pub fn load_revenue_baseline(conn: &Connection) -> Result<Option<Decimal>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [REVENUE_BASELINE_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|text| {
            Decimal::from_str(&text)
                .with_context(|| format!("Stored revenue baseline is not a number: {}", text))
        })
        .transpose()
}

pub fn save_revenue_baseline(conn: &Connection, value: Decimal) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        (REVENUE_BASELINE_KEY, value.to_string()),
    )?;
    Ok(())
}
