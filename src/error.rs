//! Error types for the pricing engine

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Malformed or out-of-range input; the caller should re-prompt
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// A precondition for a ratio computation was never established
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Tax and marketplace fee together take the whole price or more
    #[error("Invalid rates: tax {tax_rate} + marketplace fee {fee_rate} must stay below 1")]
    InvalidRate { tax_rate: Decimal, fee_rate: Decimal },
}

impl PricingError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        PricingError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
