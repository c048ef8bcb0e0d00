//! Overflow-checked decimal arithmetic
//!
//! The plain `Decimal` operators panic once a result leaves the 96-bit
//! mantissa. Every engine computation goes through these helpers instead so
//! an out-of-range input surfaces as a `PricingError`.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{PricingError, Result};

fn out_of_range(what: &str) -> PricingError {
    PricingError::Validation(format!("{} is out of the representable range", what))
}

pub(crate) fn add(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn sub(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn mul(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(what))
}

/// Callers rule out a zero divisor first; `None` here means overflow.
pub(crate) fn div(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_div(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn sum<I>(values: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| add(acc, value, what))
}

/// Round half away from zero to exactly `dp` places, the way a receipt
/// shows money. `Decimal`'s own `{:.2}` truncates instead.
pub fn rounded(value: Decimal, dp: u32) -> Decimal {
    let mut value = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(dp);
    value
}
