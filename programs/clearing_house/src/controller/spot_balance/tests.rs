use crate::controller::spot_balance::{transfer_spot_balances, update_spot_balances};
use crate::error::ErrorCode;
use crate::math::constants::QUOTE_PRECISION;
use crate::state::perp_market::PoolBalance;
use crate::state::spot_market::{SpotBalance, SpotBalanceType, SpotMarket};
use crate::state::user::SpotPosition;

#[test]
fn deposit_then_withdraw_into_borrow() {
    let mut spot_market = SpotMarket::default_quote_market();
    let mut spot_position = SpotPosition::default();

    update_spot_balances(
        100 * QUOTE_PRECISION,
        &SpotBalanceType::Deposit,
        &mut spot_market,
        &mut spot_position,
    )
    .unwrap();

    assert_eq!(spot_position.balance, 100_000_000);
    assert_eq!(spot_market.deposit_balance, 100 * QUOTE_PRECISION);

    update_spot_balances(
        150 * QUOTE_PRECISION,
        &SpotBalanceType::Borrow,
        &mut spot_market,
        &mut spot_position,
    )
    .unwrap();

    assert_eq!(spot_position.balance_type, SpotBalanceType::Borrow);
    assert_eq!(spot_position.balance, 50_000_000);
    assert_eq!(spot_market.deposit_balance, 0);
    assert_eq!(spot_market.borrow_balance, 50 * QUOTE_PRECISION);

    // repaying flips it back
    update_spot_balances(
        60 * QUOTE_PRECISION,
        &SpotBalanceType::Deposit,
        &mut spot_market,
        &mut spot_position,
    )
    .unwrap();

    assert_eq!(spot_position.balance_type, SpotBalanceType::Deposit);
    assert_eq!(spot_position.balance, 10_000_000);
    assert_eq!(spot_market.deposit_balance, 10 * QUOTE_PRECISION);
    assert_eq!(spot_market.borrow_balance, 0);
}

#[test]
fn transfer_between_user_and_pool() {
    let mut spot_market = SpotMarket::default_quote_market();
    let mut spot_position = SpotPosition::default();
    let mut pool = PoolBalance::default();

    update_spot_balances(
        100 * QUOTE_PRECISION,
        &SpotBalanceType::Deposit,
        &mut spot_market,
        &mut spot_position,
    )
    .unwrap();

    transfer_spot_balances(
        40 * QUOTE_PRECISION as i128,
        &mut spot_market,
        &mut spot_position,
        &mut pool,
    )
    .unwrap();

    assert_eq!(spot_position.balance, 60_000_000);
    assert_eq!(pool.balance(), 40 * QUOTE_PRECISION);
    // transfers keep the market total
    assert_eq!(spot_market.deposit_balance, 100 * QUOTE_PRECISION);

    transfer_spot_balances(
        -10 * QUOTE_PRECISION as i128,
        &mut spot_market,
        &mut spot_position,
        &mut pool,
    )
    .unwrap();

    assert_eq!(spot_position.balance, 70_000_000);
    assert_eq!(pool.balance(), 30 * QUOTE_PRECISION);
}

#[test]
fn pool_cannot_go_negative() {
    let mut spot_market = SpotMarket::default_quote_market();
    let mut spot_position = SpotPosition::default();
    let mut pool = PoolBalance::default();

    update_spot_balances(
        5 * QUOTE_PRECISION,
        &SpotBalanceType::Deposit,
        &mut spot_market,
        &mut pool,
    )
    .unwrap();

    let result = transfer_spot_balances(
        10 * QUOTE_PRECISION as i128,
        &mut spot_market,
        &mut pool,
        &mut spot_position,
    );

    assert_eq!(result, Err(ErrorCode::CantUpdatePoolBalanceType));
}

#[test]
fn balance_for_other_market_rejected() {
    let mut spot_market = SpotMarket::default_base_market();
    let mut spot_position = SpotPosition::default();

    let result = update_spot_balances(
        1,
        &SpotBalanceType::Deposit,
        &mut spot_market,
        &mut spot_position,
    );

    assert_eq!(result, Err(ErrorCode::InvalidSpotPosition));
}
