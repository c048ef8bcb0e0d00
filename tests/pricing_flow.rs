use pricing_calculator::calculator::compute_resale_price_with_threshold;
use pricing_calculator::{
    compute_kit_price, db, CostCategory, MarginHealth, PricingConfig, PricingError,
    ResalePriceInput, Session, Unit,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn store() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn resale_price_uses_ledger_allocation() {
    let conn = store();
    let config = PricingConfig::default();
    let mut session = Session::load(&conn, &config).unwrap();

    session
        .ledger
        .add_item("Rent", dec!(1200), CostCategory::FixedExpense)
        .unwrap();
    session
        .ledger
        .add_item("Assistant", dec!(800), CostCategory::Personnel)
        .unwrap();
    session.save(&conn).unwrap();

    let session = Session::load(&conn, &config).unwrap();
    let ratio = session.ledger.allocation_ratio().unwrap();
    assert_eq!(ratio, dec!(0.1));

    let input = ResalePriceInput {
        acquisition_cost: dec!(80),
        packaging_cost: dec!(20),
        tax_rate: config.resale.tax_rate,
        marketplace_fee_rate: config.resale.marketplace_fee_rate,
        desired_markup_rate: config.resale.desired_markup_rate,
        fixed_fee_per_sale: config.resale.fixed_fee_per_sale,
    };
    let result = compute_resale_price_with_threshold(&input, ratio, config.resale.low_margin_threshold)
        .unwrap()
        .unwrap();

    assert_eq!(result.allocated_fixed_cost, dec!(10));
    assert_eq!(result.suggested_price.round_dp(2), dec!(186.33));
    assert_eq!(result.margin_health, MarginHealth::HealthyMargin);
}

#[test]
fn kit_price_from_recipe_survives_catalog_clear() {
    let conn = store();
    let config = PricingConfig::default();
    let mut session = Session::load(&conn, &config).unwrap();

    session
        .catalog
        .add_ingredient("Brigadeiro mix", Unit::Kg, dec!(1), dec!(40))
        .unwrap();
    session
        .catalog
        .add_ingredient("Gift box", Unit::Unit, dec!(10), dec!(20))
        .unwrap();
    session
        .recipe
        .add_line(&session.catalog, "Brigadeiro mix", dec!(0.5))
        .unwrap();
    session
        .recipe
        .add_line(&session.catalog, "Gift box", dec!(1))
        .unwrap();
    session.save(&conn).unwrap();

    db::clear_ingredients(&conn).unwrap();
    let session = Session::load(&conn, &config).unwrap();
    assert!(session.catalog.is_empty());

    let total = session.recipe.total_cost().unwrap();
    assert_eq!(total, dec!(22));

    let bounds = config.kit.bounds().unwrap();
    let price = compute_kit_price(total, config.kit.default_multiplier, &bounds).unwrap();
    assert_eq!(price, dec!(44));

    assert!(matches!(
        compute_kit_price(total, dec!(5), &bounds),
        Err(PricingError::Validation(_))
    ));
}

#[test]
fn cleared_ledger_prices_without_fixed_cost_share() {
    let config = PricingConfig::default();
    let mut session = Session::new(&config).unwrap();
    session
        .ledger
        .add_item("Rent", dec!(5000), CostCategory::FixedExpense)
        .unwrap();
    session.ledger.clear();

    let ratio = session.ledger.allocation_ratio().unwrap();
    assert_eq!(ratio, Decimal::ZERO);

    let input = ResalePriceInput {
        acquisition_cost: dec!(50),
        packaging_cost: dec!(0),
        tax_rate: dec!(0),
        marketplace_fee_rate: dec!(0),
        desired_markup_rate: dec!(0.5),
        fixed_fee_per_sale: dec!(0),
    };
    let result = pricing_calculator::compute_resale_price(&input, ratio)
        .unwrap()
        .unwrap();
    assert_eq!(result.allocated_fixed_cost, Decimal::ZERO);
    assert_eq!(result.suggested_price, dec!(75));
}
