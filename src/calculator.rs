//! Resale and kit pricing formulas

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::arith::{self, rounded};
use crate::error::{PricingError, Result};
use crate::models::{MarginHealth, ResalePriceInput, ResalePriceResult};

/// Margin percentage below which a resale price is flagged as low
pub const DEFAULT_LOW_MARGIN_THRESHOLD: Decimal = dec!(10);

/// Price a resold product with the divide-through formula, using the
/// default low-margin threshold.
///
/// Returns `Ok(None)` when the acquisition cost is zero: there is no
/// product to price yet.
pub fn compute_resale_price(
    input: &ResalePriceInput,
    allocation_ratio: Decimal,
) -> Result<Option<ResalePriceResult>> {
    compute_resale_price_with_threshold(input, allocation_ratio, DEFAULT_LOW_MARGIN_THRESHOLD)
}

/// Price a resold product so that tax and marketplace fee, both taken as a
/// share of the final price, still leave the desired markup over cost.
///
/// `price = (cost + cost * ratio) * (1 + markup) / (1 - (tax + fee)) + fixed_fee`
pub fn compute_resale_price_with_threshold(
    input: &ResalePriceInput,
    allocation_ratio: Decimal,
    low_margin_threshold: Decimal,
) -> Result<Option<ResalePriceResult>> {
    validate_resale_input(input, allocation_ratio)?;

    if input.acquisition_cost.is_zero() {
        debug!("Acquisition cost is zero, resale price not computed");
        return Ok(None);
    }

    let product_cost = arith::add(input.acquisition_cost, input.packaging_cost, "product cost")?;
    let allocated_fixed_cost = arith::mul(product_cost, allocation_ratio, "allocated fixed cost")?;
    let base_cost = arith::add(product_cost, allocated_fixed_cost, "base cost")?;

    let invalid_rate = || PricingError::InvalidRate {
        tax_rate: input.tax_rate,
        fee_rate: input.marketplace_fee_rate,
    };
    let deduction_rate = arith::add(input.tax_rate, input.marketplace_fee_rate, "deduction rate")?;
    let divisor = Decimal::ONE - deduction_rate;
    if divisor <= Decimal::ZERO {
        return Err(invalid_rate());
    }

    let marked_up = arith::mul(
        base_cost,
        Decimal::ONE + input.desired_markup_rate,
        "marked-up cost",
    )?;
    // Deductions that leave almost nothing of the price blow the quotient up.
    let gross = marked_up.checked_div(divisor).ok_or_else(invalid_rate)?;
    let suggested_price = arith::add(gross, input.fixed_fee_per_sale, "suggested price")?;

    let tax_amount = arith::mul(suggested_price, input.tax_rate, "tax amount")?;
    let marketplace_fee_amount =
        arith::mul(suggested_price, input.marketplace_fee_rate, "marketplace fee amount")?;
    let fixed_fee_amount = input.fixed_fee_per_sale;
    let deductions = arith::sum(
        [
            product_cost,
            allocated_fixed_cost,
            tax_amount,
            marketplace_fee_amount,
            fixed_fee_amount,
        ],
        "price deductions",
    )?;
    let net_profit = arith::sub(suggested_price, deductions, "net profit")?;

    // Unreachable with a positive acquisition cost and non-negative inputs.
    if suggested_price.is_zero() {
        return Err(PricingError::DivisionByZero(
            "suggested price is zero, margin is undefined".into(),
        ));
    }
    let margin_percent = arith::mul(
        arith::div(net_profit, suggested_price, "margin")?,
        Decimal::ONE_HUNDRED,
        "margin percent",
    )?;
    let margin_health = MarginHealth::classify(margin_percent, low_margin_threshold);

    debug!(%product_cost, %allocated_fixed_cost, %suggested_price, %margin_percent, "Computed resale price");
    if margin_health == MarginHealth::LowMargin {
        warn!(
            margin = %margin_percent.round_dp(1),
            threshold = %low_margin_threshold,
            "Net margin below threshold"
        );
    }

    Ok(Some(ResalePriceResult {
        product_cost,
        allocated_fixed_cost,
        tax_amount,
        marketplace_fee_amount,
        fixed_fee_amount,
        net_profit,
        suggested_price,
        margin_percent,
        margin_health,
    }))
}

fn validate_resale_input(input: &ResalePriceInput, allocation_ratio: Decimal) -> Result<()> {
    let non_negative = [
        ("acquisition cost", input.acquisition_cost),
        ("packaging cost", input.packaging_cost),
        ("fixed fee per sale", input.fixed_fee_per_sale),
        ("allocation ratio", allocation_ratio),
        ("tax rate", input.tax_rate),
        ("marketplace fee rate", input.marketplace_fee_rate),
        ("desired markup rate", input.desired_markup_rate),
    ];
    for (label, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(PricingError::Validation(format!(
                "{} must not be negative (got {})",
                label, value
            )));
        }
    }

    if input.desired_markup_rate >= Decimal::ONE {
        return Err(PricingError::Validation(format!(
            "desired markup rate must be below 1 (got {})",
            input.desired_markup_rate
        )));
    }
    Ok(())
}

/// Allowed range for the kit markup multiplier, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KitMarkupBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl KitMarkupBounds {
    pub fn new(min: Decimal, max: Decimal) -> Result<Self> {
        if min <= Decimal::ZERO || min > max {
            return Err(PricingError::Validation(format!(
                "kit multiplier bounds must satisfy 0 < min <= max (got [{}, {}])",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, multiplier: Decimal) -> bool {
        multiplier >= self.min && multiplier <= self.max
    }
}

impl Default for KitMarkupBounds {
    fn default() -> Self {
        Self {
            min: dec!(1.0),
            max: dec!(4.0),
        }
    }
}

/// Price a produced kit as its raw-material cost times a multiplier.
/// Multipliers outside `bounds` are rejected, never clamped.
pub fn compute_kit_price(
    recipe_total_cost: Decimal,
    markup_multiplier: Decimal,
    bounds: &KitMarkupBounds,
) -> Result<Decimal> {
    if recipe_total_cost < Decimal::ZERO {
        return Err(PricingError::Validation(format!(
            "recipe cost must not be negative (got {})",
            recipe_total_cost
        )));
    }
    if !bounds.contains(markup_multiplier) {
        return Err(PricingError::Validation(format!(
            "markup multiplier {} is outside [{}, {}]",
            markup_multiplier, bounds.min, bounds.max
        )));
    }

    let price = arith::mul(recipe_total_cost, markup_multiplier, "kit price")?;
    debug!(%recipe_total_cost, %markup_multiplier, %price, "Computed kit price");
    Ok(price)
}

impl fmt::Display for ResalePriceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Suggested Price: {} ===", rounded(self.suggested_price, 2))?;
        writeln!(f)?;

        writeln!(f, "Price composition:")?;
        let rows = [
            ("Product + packaging", self.product_cost),
            ("Fixed cost share", self.allocated_fixed_cost),
            ("Taxes", self.tax_amount),
            ("Marketplace fees", self.marketplace_fee_amount),
            ("Fixed fee per sale", self.fixed_fee_amount),
            ("Net profit", self.net_profit),
        ];
        for (label, value) in rows {
            writeln!(f, "  {:<22} {:>12}", label, rounded(value, 2))?;
        }
        writeln!(f)?;

        match self.margin_health {
            MarginHealth::LowMargin => {
                writeln!(f, "Low net margin: {}%", rounded(self.margin_percent, 1))?
            }
            MarginHealth::HealthyMargin => {
                writeln!(f, "Healthy net margin: {}%", rounded(self.margin_percent, 1))?
            }
        }

        Ok(())
    }
}
