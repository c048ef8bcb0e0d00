//! Configuration file parsing
//!
//! Supports TOML files with the following sections, all optional:
//! - [ledger] - Default revenue baseline
//! - [resale] - Default tax, fee and markup rates, low-margin threshold
//! - [kit] - Markup multiplier bounds and default
//! - [catalog] - Zero purchase quantity policy

use std::path::Path;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::calculator::{KitMarkupBounds, DEFAULT_LOW_MARGIN_THRESHOLD};
use crate::catalog::ZeroQuantityPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub ledger: LedgerSection,

    #[serde(default)]
    pub resale: ResaleSection,

    #[serde(default)]
    pub kit: KitSection,

    #[serde(default)]
    pub catalog: CatalogSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    /// Monthly revenue used until one is stored
    pub default_revenue_baseline: Decimal,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            default_revenue_baseline: dec!(20000),
        }
    }
}

/// Defaults for resale inputs the user leaves out. Rates are fractions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResaleSection {
    pub tax_rate: Decimal,
    pub marketplace_fee_rate: Decimal,
    pub fixed_fee_per_sale: Decimal,
    pub desired_markup_rate: Decimal,
    /// Net margin percentage below which a price is flagged
    pub low_margin_threshold: Decimal,
}

impl Default for ResaleSection {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.04),
            marketplace_fee_rate: dec!(0.18),
            fixed_fee_per_sale: dec!(3.00),
            desired_markup_rate: dec!(0.30),
            low_margin_threshold: DEFAULT_LOW_MARGIN_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KitSection {
    pub min_multiplier: Decimal,
    pub max_multiplier: Decimal,
    pub default_multiplier: Decimal,
}

impl Default for KitSection {
    fn default() -> Self {
        let bounds = KitMarkupBounds::default();
        Self {
            min_multiplier: bounds.min,
            max_multiplier: bounds.max,
            default_multiplier: dec!(2.0),
        }
    }
}

impl KitSection {
    pub fn bounds(&self) -> Result<KitMarkupBounds> {
        Ok(KitMarkupBounds::new(self.min_multiplier, self.max_multiplier)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub zero_quantity_policy: ZeroQuantityPolicy,
}

impl PricingConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: PricingConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ledger.default_revenue_baseline <= Decimal::ZERO {
            bail!(
                "ledger.default_revenue_baseline must be positive (got {})",
                self.ledger.default_revenue_baseline
            );
        }

        let rates = [
            ("resale.tax_rate", self.resale.tax_rate),
            ("resale.marketplace_fee_rate", self.resale.marketplace_fee_rate),
            ("resale.desired_markup_rate", self.resale.desired_markup_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                bail!("{} must be in [0, 1) (got {})", name, rate);
            }
        }
        if self.resale.tax_rate + self.resale.marketplace_fee_rate >= Decimal::ONE {
            bail!("resale.tax_rate + resale.marketplace_fee_rate must stay below 1");
        }
        if self.resale.fixed_fee_per_sale < Decimal::ZERO {
            bail!("resale.fixed_fee_per_sale must not be negative");
        }

        let bounds = self.kit.bounds().context("Invalid [kit] section")?;
        if !bounds.contains(self.kit.default_multiplier) {
            bail!(
                "kit.default_multiplier {} is outside [{}, {}]",
                self.kit.default_multiplier,
                bounds.min,
                bounds.max
            );
        }

        Ok(())
    }
}
