use std::collections::BTreeMap;

use crate::controller::pnl::{settle_expired_position, settle_pnl};
use crate::error::ErrorCode;
use crate::math::constants::{
    BASE_PRECISION_I64, PRICE_PRECISION_I64, QUOTE_PRECISION,
    QUOTE_PRECISION_I128, QUOTE_PRECISION_I64, QUOTE_PRECISION_U64,
};
use crate::math::fixed_point::Price;
use crate::state::events::SettlePnlExplanation;
use crate::state::oracle_map::OracleMap;
use crate::state::perp_market::{MarketStatus, PerpMarket, PoolBalance, AMM};
use crate::state::perp_market_map::PerpMarketMap;
use crate::state::spot_market::{InsuranceFund, SpotBalanceType, SpotMarket};
use crate::state::spot_market_map::SpotMarketMap;
use crate::state::state::OracleGuardRails;
use crate::state::user::{PerpPosition, SpotPosition, User, UserStatus};
use crate::test_utils::{get_positions, get_spot_positions};

fn user_with_position(base_asset_amount: i64, quote_asset_amount: i64) -> User {
    User {
        spot_positions: get_spot_positions(SpotPosition {
            market_index: 0,
            balance_type: SpotBalanceType::Deposit,
            balance: 100 * QUOTE_PRECISION_U64,
        }),
        perp_positions: get_positions(PerpPosition {
            market_index: 0,
            base_asset_amount,
            quote_asset_amount,
            quote_entry_amount: quote_asset_amount,
            ..PerpPosition::default()
        }),
        ..User::default()
    }
}

fn market_with_pnl_pool(pnl_pool: u128) -> PerpMarket {
    PerpMarket {
        pnl_pool: PoolBalance {
            balance: pnl_pool,
            market_index: 0,
        },
        ..PerpMarket::default_test()
    }
}

fn quote_market_with_deposits(deposit_balance: u128) -> SpotMarket {
    SpotMarket {
        deposit_balance,
        ..SpotMarket::default_quote_market()
    }
}

#[test]
fn positive_pnl_capped_at_pnl_pool() {
    let mut market = market_with_pnl_pool(50 * QUOTE_PRECISION);
    market.amm.quote_asset_amount_long = -900 * QUOTE_PRECISION_I128;
    let perp_market_map = PerpMarketMap::load_one(market);
    let spot_market_map =
        SpotMarketMap::load_multiple(vec![quote_market_with_deposits(150 * QUOTE_PRECISION)]);
    let price_feed = BTreeMap::new();
    let mut oracle_map = OracleMap::new(&price_feed, 0, OracleGuardRails::default());

    // entered at 90, mark is 100
    let mut user = user_with_position(10 * BASE_PRECISION_I64, -900 * QUOTE_PRECISION_I64);

    let record = settle_pnl(
        0,
        &mut user,
        &perp_market_map,
        &spot_market_map,
        &mut oracle_map,
        1,
    )
    .unwrap();

    assert_eq!(record.pnl, 50 * QUOTE_PRECISION_I128);
    assert_eq!(record.settle_price, 100 * PRICE_PRECISION_I64);
    assert_eq!(record.explanation, SettlePnlExplanation::None);

    assert_eq!(user.spot_positions[0].balance, 150 * QUOTE_PRECISION_U64);
    assert_eq!(
        user.perp_positions[0].quote_asset_amount,
        -950 * QUOTE_PRECISION_I64
    );
    assert_eq!(user.perp_positions[0].base_asset_amount, 10 * BASE_PRECISION_I64);
    assert_eq!(user.perp_positions[0].settled_pnl, 50 * QUOTE_PRECISION_I64);
    assert_eq!(user.settled_perp_pnl, 50 * QUOTE_PRECISION_I64);

    let market = perp_market_map.get_ref(&0).unwrap();
    assert_eq!(market.pnl_pool.balance, 0);
    assert_eq!(
        market.amm.quote_asset_amount_long,
        -950 * QUOTE_PRECISION_I128
    );
    assert_eq!(
        spot_market_map.get_ref(&0).unwrap().deposit_balance,
        150 * QUOTE_PRECISION
    );
}

#[test]
fn negative_pnl_paid_into_pool() {
    let perp_market_map = PerpMarketMap::load_one(market_with_pnl_pool(0));
    let spot_market_map =
        SpotMarketMap::load_multiple(vec![quote_market_with_deposits(100 * QUOTE_PRECISION)]);
    let price_feed = BTreeMap::new();
    let mut oracle_map = OracleMap::new(&price_feed, 0, OracleGuardRails::default());

    // entered at 105, exactly at maintenance
    let mut user = user_with_position(10 * BASE_PRECISION_I64, -1_050 * QUOTE_PRECISION_I64);

    let record = settle_pnl(
        0,
        &mut user,
        &perp_market_map,
        &spot_market_map,
        &mut oracle_map,
        1,
    )
    .unwrap();

    assert_eq!(record.pnl, -50 * QUOTE_PRECISION_I128);
    assert_eq!(user.spot_positions[0].balance, 50 * QUOTE_PRECISION_U64);
    assert_eq!(
        user.perp_positions[0].quote_asset_amount,
        -1_000 * QUOTE_PRECISION_I64
    );
    assert_eq!(
        perp_market_map.get_ref(&0).unwrap().pnl_pool.balance,
        50 * QUOTE_PRECISION
    );

    // deeper under water the loss is left for liquidation
    let mut user = user_with_position(10 * BASE_PRECISION_I64, -1_060 * QUOTE_PRECISION_I64);
    assert_eq!(
        settle_pnl(
            0,
            &mut user,
            &perp_market_map,
            &spot_market_map,
            &mut oracle_map,
            1,
        ),
        Err(ErrorCode::InsufficientCollateralForSettlingPNL)
    );
}

#[test]
fn settle_pnl_rejected() {
    let spot_market_map =
        SpotMarketMap::load_multiple(vec![quote_market_with_deposits(100 * QUOTE_PRECISION)]);
    let price_feed = BTreeMap::new();
    let mut oracle_map = OracleMap::new(&price_feed, 0, OracleGuardRails::default());

    let settled_market = PerpMarket {
        status: MarketStatus::Settlement,
        expiry_price: Price(100 * PRICE_PRECISION_I64),
        ..PerpMarket::default_test()
    };
    let perp_market_map = PerpMarketMap::load_one(settled_market);
    let mut user = user_with_position(10 * BASE_PRECISION_I64, -900 * QUOTE_PRECISION_I64);
    assert_eq!(
        settle_pnl(
            0,
            &mut user,
            &perp_market_map,
            &spot_market_map,
            &mut oracle_map,
            1,
        ),
        Err(ErrorCode::InvalidMarketStatus)
    );

    let perp_market_map = PerpMarketMap::load_one(PerpMarket::default_test());
    let mut bankrupt_user = User {
        status: UserStatus::Bankrupt,
        ..user_with_position(10 * BASE_PRECISION_I64, -900 * QUOTE_PRECISION_I64)
    };
    assert_eq!(
        settle_pnl(
            0,
            &mut bankrupt_user,
            &perp_market_map,
            &spot_market_map,
            &mut oracle_map,
            1,
        ),
        Err(ErrorCode::UserBankrupt)
    );

    let mut flat_user = user_with_position(0, 0);
    assert_eq!(
        settle_pnl(
            0,
            &mut flat_user,
            &perp_market_map,
            &spot_market_map,
            &mut oracle_map,
            1,
        ),
        Err(ErrorCode::UserHasNoPositionInMarket)
    );
}

fn settled_market(pnl_pool: u128, base_asset_amount: i64, quote_asset_amount: i64) -> PerpMarket {
    let market = PerpMarket::default_test();
    let (base_long, base_short, quote_long, quote_short) = if base_asset_amount > 0 {
        (base_asset_amount as i128, 0, quote_asset_amount as i128, 0)
    } else {
        (0, base_asset_amount as i128, 0, quote_asset_amount as i128)
    };

    PerpMarket {
        status: MarketStatus::Settlement,
        expiry_ts: 100,
        expiry_price: Price(110 * PRICE_PRECISION_I64),
        pnl_pool: PoolBalance {
            balance: pnl_pool,
            market_index: 0,
        },
        number_of_users: 1,
        number_of_users_with_base: 1,
        amm: AMM {
            base_asset_amount_long: base_long,
            base_asset_amount_short: base_short,
            base_asset_amount_with_amm: base_asset_amount as i128,
            quote_asset_amount_long: quote_long,
            quote_asset_amount_short: quote_short,
            quote_entry_amount_long: quote_long,
            quote_entry_amount_short: quote_short,
            ..market.amm
        },
        ..market
    }
}

#[test]
fn expired_long_paid_from_pnl_pool() {
    let perp_market_map = PerpMarketMap::load_one(settled_market(
        150 * QUOTE_PRECISION,
        10 * BASE_PRECISION_I64,
        -1_000 * QUOTE_PRECISION_I64,
    ));
    let spot_market_map =
        SpotMarketMap::load_multiple(vec![quote_market_with_deposits(250 * QUOTE_PRECISION)]);

    let mut user = user_with_position(10 * BASE_PRECISION_I64, -1_000 * QUOTE_PRECISION_I64);

    let record =
        settle_expired_position(0, &mut user, &perp_market_map, &spot_market_map, 101).unwrap();

    // (110 - 100) * 10
    assert_eq!(record.pnl, 100 * QUOTE_PRECISION_I128);
    assert_eq!(record.base_asset_amount, 10 * BASE_PRECISION_I64);
    assert_eq!(record.quote_asset_amount_after, 0);
    assert_eq!(record.settle_price, 110 * PRICE_PRECISION_I64);
    assert_eq!(record.insurance_fund_draw, 0);
    assert_eq!(record.explanation, SettlePnlExplanation::ExpiredPosition);

    assert_eq!(user.perp_positions[0].base_asset_amount, 0);
    assert_eq!(user.perp_positions[0].quote_asset_amount, 0);
    assert_eq!(user.perp_positions[0].quote_entry_amount, 0);
    assert_eq!(user.spot_positions[0].balance, 200 * QUOTE_PRECISION_U64);

    let market = perp_market_map.get_ref(&0).unwrap();
    assert_eq!(market.pnl_pool.balance, 50 * QUOTE_PRECISION);
    assert_eq!(market.number_of_users, 0);
    assert_eq!(market.number_of_users_with_base, 0);
    assert_eq!(market.amm.base_asset_amount_long, 0);
    assert_eq!(market.amm.base_asset_amount_with_amm, 0);
    assert_eq!(market.amm.quote_asset_amount_long, 0);
    assert_eq!(market.amm.quote_entry_amount_long, 0);
}

#[test]
fn expired_long_draws_on_insurance_fund() {
    let perp_market_map = PerpMarketMap::load_one(settled_market(
        30 * QUOTE_PRECISION,
        10 * BASE_PRECISION_I64,
        -1_000 * QUOTE_PRECISION_I64,
    ));
    let spot_market_map = SpotMarketMap::load_multiple(vec![SpotMarket {
        insurance_fund: InsuranceFund {
            balance: 100 * QUOTE_PRECISION_U64,
            total_deposits: 100 * QUOTE_PRECISION_U64,
            total_transferred_to_markets: 0,
        },
        ..quote_market_with_deposits(130 * QUOTE_PRECISION)
    }]);

    let mut user = user_with_position(10 * BASE_PRECISION_I64, -1_000 * QUOTE_PRECISION_I64);

    let record =
        settle_expired_position(0, &mut user, &perp_market_map, &spot_market_map, 101).unwrap();

    assert_eq!(record.pnl, 100 * QUOTE_PRECISION_I128);
    assert_eq!(record.insurance_fund_draw, 70 * QUOTE_PRECISION_U64);
    assert_eq!(user.spot_positions[0].balance, 200 * QUOTE_PRECISION_U64);
    assert!(user.perp_positions[0].is_available());

    let market = perp_market_map.get_ref(&0).unwrap();
    assert_eq!(market.pnl_pool.balance, 0);
    assert_eq!(market.amm.fee_pool.balance, 0);
    assert_eq!(
        market.amm.total_fee_minus_distributions,
        70 * QUOTE_PRECISION_I128
    );

    let spot_market = spot_market_map.get_ref(&0).unwrap();
    assert_eq!(spot_market.insurance_fund.balance, 30 * QUOTE_PRECISION_U64);
    assert_eq!(spot_market.deposit_balance, 200 * QUOTE_PRECISION);
}

#[test]
fn expired_long_with_empty_insurance_fund() {
    let perp_market_map = PerpMarketMap::load_one(settled_market(
        30 * QUOTE_PRECISION,
        10 * BASE_PRECISION_I64,
        -1_000 * QUOTE_PRECISION_I64,
    ));
    let spot_market_map = SpotMarketMap::load_multiple(vec![SpotMarket {
        insurance_fund: InsuranceFund {
            balance: 50 * QUOTE_PRECISION_U64,
            ..InsuranceFund::default()
        },
        ..quote_market_with_deposits(130 * QUOTE_PRECISION)
    }]);

    let mut user = user_with_position(10 * BASE_PRECISION_I64, -1_000 * QUOTE_PRECISION_I64);

    assert_eq!(
        settle_expired_position(0, &mut user, &perp_market_map, &spot_market_map, 101),
        Err(ErrorCode::InsuranceFundInsufficient)
    );
}

#[test]
fn expired_short_pays_loss_into_pool() {
    let perp_market_map = PerpMarketMap::load_one(settled_market(
        0,
        -10 * BASE_PRECISION_I64,
        1_000 * QUOTE_PRECISION_I64,
    ));
    let spot_market_map =
        SpotMarketMap::load_multiple(vec![quote_market_with_deposits(100 * QUOTE_PRECISION)]);

    let mut user = user_with_position(-10 * BASE_PRECISION_I64, 1_000 * QUOTE_PRECISION_I64);

    let record =
        settle_expired_position(0, &mut user, &perp_market_map, &spot_market_map, 101).unwrap();

    assert_eq!(record.pnl, -100 * QUOTE_PRECISION_I128);
    assert!(user.perp_positions[0].is_available());
    assert_eq!(user.spot_positions[0].balance, 0);

    let market = perp_market_map.get_ref(&0).unwrap();
    assert_eq!(market.pnl_pool.balance, 100 * QUOTE_PRECISION);
    assert_eq!(market.amm.base_asset_amount_short, 0);
    assert_eq!(market.amm.quote_asset_amount_short, 0);
    assert_eq!(market.amm.base_asset_amount_with_amm, 0);
    assert_eq!(market.amm.quote_entry_amount_short, 0);
}

#[test]
fn expired_position_requires_settlement() {
    let perp_market_map = PerpMarketMap::load_one(PerpMarket {
        status: MarketStatus::ReduceOnly,
        expiry_ts: 100,
        ..PerpMarket::default_test()
    });
    let spot_market_map =
        SpotMarketMap::load_multiple(vec![quote_market_with_deposits(100 * QUOTE_PRECISION)]);

    let mut user = user_with_position(10 * BASE_PRECISION_I64, -1_000 * QUOTE_PRECISION_I64);

    assert_eq!(
        settle_expired_position(0, &mut user, &perp_market_map, &spot_market_map, 101),
        Err(ErrorCode::InvalidMarketStatus)
    );
}
