use anchor_lang::prelude::Pubkey;

use crate::controller::repeg::{move_amm_price, settle_expired_market, update_k};
use crate::error::ErrorCode;
use crate::math::constants::{
    AMM_RESERVE_PRECISION, AMM_RESERVE_PRECISION_I128, PRICE_PRECISION_I64, QUOTE_PRECISION,
    QUOTE_PRECISION_I128,
};
use crate::math::fixed_point::Price;
use crate::state::oracle_map::OracleMap;
use crate::state::perp_market::{MarketStatus, PerpMarket, PoolBalance};
use crate::state::perp_market_map::PerpMarketMap;
use crate::state::spot_market::SpotMarket;
use crate::state::spot_market_map::SpotMarketMap;
use crate::state::state::OracleGuardRails;
use crate::test_utils::{get_price_feed, set_price};

fn net_long_market(total_fee_minus_distributions: i128) -> PerpMarket {
    let mut market = PerpMarket::default_test();
    market.amm.curve_update_intensity = 100;
    market.amm.base_asset_amount_long = 10 * AMM_RESERVE_PRECISION_I128;
    market.amm.base_asset_amount_with_amm = 10 * AMM_RESERVE_PRECISION_I128;
    market.amm.total_fee_minus_distributions = total_fee_minus_distributions;
    market
}

#[test]
fn deeper_curve_paid_from_fees() {
    let mut market = net_long_market(10 * QUOTE_PRECISION_I128);

    let record = update_k(&mut market, 110 * AMM_RESERVE_PRECISION, 5).unwrap();

    assert_eq!(record.adjustment_cost, 7_575_757);
    assert_eq!(record.sqrt_k_before, 100 * AMM_RESERVE_PRECISION);
    assert_eq!(record.sqrt_k_after, 110 * AMM_RESERVE_PRECISION);
    assert_eq!(record.mark_price_before, record.mark_price_after);
    assert_eq!(market.amm.total_fee_minus_distributions, 2_424_243);
    assert_eq!(record.total_fee_minus_distributions, 2_424_243);
    assert_eq!(market.amm.base_asset_reserve, 110 * AMM_RESERVE_PRECISION);
    assert_eq!(market.amm.quote_asset_reserve, 110 * AMM_RESERVE_PRECISION);
}

#[test]
fn shallower_curve_is_revenue() {
    let mut market = net_long_market(0);

    let record = update_k(&mut market, 90 * AMM_RESERVE_PRECISION, 5).unwrap();

    assert!(record.adjustment_cost < 0);
    assert_eq!(
        market.amm.total_fee_minus_distributions,
        -record.adjustment_cost
    );
    assert_eq!(market.amm.sqrt_k, 90 * AMM_RESERVE_PRECISION);
}

#[test]
fn update_k_rejected() {
    // fees don't cover the cost
    let mut market = net_long_market(5 * QUOTE_PRECISION_I128);
    assert_eq!(
        update_k(&mut market, 110 * AMM_RESERVE_PRECISION, 5),
        Err(ErrorCode::InvalidUpdateK)
    );
    assert_eq!(market.amm.sqrt_k, 100 * AMM_RESERVE_PRECISION);

    let mut market = net_long_market(10 * QUOTE_PRECISION_I128);
    market.amm.curve_update_intensity = 0;
    assert_eq!(
        update_k(&mut market, 110 * AMM_RESERVE_PRECISION, 5),
        Err(ErrorCode::InvalidUpdateK)
    );

    let mut market = net_long_market(10 * QUOTE_PRECISION_I128);
    market.status = MarketStatus::Settlement;
    assert_eq!(
        update_k(&mut market, 110 * AMM_RESERVE_PRECISION, 5),
        Err(ErrorCode::InvalidMarketStatus)
    );
}

#[test]
fn move_price_keeps_k() {
    let mut market = PerpMarket::default_test();

    let record = move_amm_price(&mut market, Price(90 * PRICE_PRECISION_I64), 5).unwrap();

    assert_eq!(record.mark_price_before, 100 * PRICE_PRECISION_I64);
    assert_eq!(record.mark_price_after, 900_000_000_007);
    assert_eq!(record.adjustment_cost, 0);
    assert_eq!(market.amm.sqrt_k, 100 * AMM_RESERVE_PRECISION);
    assert_eq!(market.amm.base_asset_reserve, 105_409_255_338);
    assert_eq!(market.amm.quote_asset_reserve, 94_868_329_805);

    assert_eq!(
        move_amm_price(&mut market, Price(0), 5),
        Err(ErrorCode::InvalidAmmPriceTarget)
    );
}

fn expiring_market(oracle: Pubkey) -> PerpMarket {
    let mut market = PerpMarket {
        status: MarketStatus::ReduceOnly,
        expiry_ts: 100,
        ..PerpMarket::default_test()
    };
    market.amm.oracle = oracle;
    market.amm.total_exchange_fee = 10 * QUOTE_PRECISION;
    market.amm.total_fee_minus_distributions = 30 * QUOTE_PRECISION_I128;
    market.amm.fee_pool = PoolBalance {
        balance: 25 * QUOTE_PRECISION,
        market_index: 0,
    };
    market
}

fn quote_market() -> SpotMarket {
    SpotMarket {
        deposit_balance: 25 * QUOTE_PRECISION,
        ..SpotMarket::default_quote_market()
    }
}

#[test]
fn expired_market_settles_at_oracle_price() {
    let oracle = Pubkey::new_unique();
    let perp_market_map = PerpMarketMap::load_one(expiring_market(oracle));
    let spot_market_map = SpotMarketMap::load_multiple(vec![quote_market()]);
    let price_feed = get_price_feed(&[(oracle, Price(95 * PRICE_PRECISION_I64))], 100);

    let mut oracle_map = OracleMap::new(&price_feed, 99, OracleGuardRails::default());
    assert_eq!(
        settle_expired_market(0, &perp_market_map, &spot_market_map, &mut oracle_map, 99),
        Err(ErrorCode::MarketNotExpired)
    );

    let mut oracle_map = OracleMap::new(&price_feed, 101, OracleGuardRails::default());
    let record =
        settle_expired_market(0, &perp_market_map, &spot_market_map, &mut oracle_map, 101)
            .unwrap();

    assert_eq!(record.status_before, MarketStatus::ReduceOnly);
    assert_eq!(record.status_after, MarketStatus::Settlement);
    assert_eq!(record.expiry_price, 95 * PRICE_PRECISION_I64);
    // 25 in the pool, 5 kept back for the protocol
    assert_eq!(record.fee_pool_transfer, 20 * QUOTE_PRECISION);

    {
        let market = perp_market_map.get_ref(&0).unwrap();
        assert_eq!(market.status, MarketStatus::Settlement);
        assert_eq!(market.expiry_price, Price(95 * PRICE_PRECISION_I64));
        assert_eq!(market.amm.fee_pool.balance, 5 * QUOTE_PRECISION);
        assert_eq!(market.pnl_pool.balance, 20 * QUOTE_PRECISION);
    }
    assert_eq!(
        spot_market_map.get_ref(&0).unwrap().deposit_balance,
        25 * QUOTE_PRECISION
    );

    // a second settlement never takes a new price
    let mut moved_feed = price_feed.clone();
    set_price(&mut moved_feed, &oracle, Price(80 * PRICE_PRECISION_I64), 102);
    let mut oracle_map = OracleMap::new(&moved_feed, 102, OracleGuardRails::default());
    assert_eq!(
        settle_expired_market(0, &perp_market_map, &spot_market_map, &mut oracle_map, 102),
        Err(ErrorCode::AlreadySettled)
    );
    assert_eq!(
        perp_market_map.get_ref(&0).unwrap().expiry_price,
        Price(95 * PRICE_PRECISION_I64)
    );
}

#[test]
fn fee_transfer_bounded_by_undistributed_fees() {
    let oracle = Pubkey::new_unique();
    let mut market = expiring_market(oracle);
    market.amm.total_fee_minus_distributions = 12 * QUOTE_PRECISION_I128;
    let perp_market_map = PerpMarketMap::load_one(market);
    let spot_market_map = SpotMarketMap::load_multiple(vec![quote_market()]);
    let price_feed = get_price_feed(&[(oracle, Price(95 * PRICE_PRECISION_I64))], 100);
    let mut oracle_map = OracleMap::new(&price_feed, 101, OracleGuardRails::default());

    let record =
        settle_expired_market(0, &perp_market_map, &spot_market_map, &mut oracle_map, 101)
            .unwrap();

    assert_eq!(record.fee_pool_transfer, 7 * QUOTE_PRECISION);
}

#[test]
fn expired_market_rejected() {
    let oracle = Pubkey::new_unique();
    let spot_market_map = SpotMarketMap::load_multiple(vec![quote_market()]);
    let price_feed = get_price_feed(&[(oracle, Price(95 * PRICE_PRECISION_I64))], 100);

    let perp_market_map = PerpMarketMap::load_one(PerpMarket {
        status: MarketStatus::Active,
        expiry_ts: 0,
        ..expiring_market(oracle)
    });
    let mut oracle_map = OracleMap::new(&price_feed, 101, OracleGuardRails::default());
    assert_eq!(
        settle_expired_market(0, &perp_market_map, &spot_market_map, &mut oracle_map, 101),
        Err(ErrorCode::InvalidMarketStatus)
    );

    // a minute past the last publish
    let perp_market_map = PerpMarketMap::load_one(expiring_market(oracle));
    let mut oracle_map = OracleMap::new(&price_feed, 161, OracleGuardRails::default());
    assert_eq!(
        settle_expired_market(0, &perp_market_map, &spot_market_map, &mut oracle_map, 161),
        Err(ErrorCode::StaleOracle)
    );
    assert_eq!(
        perp_market_map.get_ref(&0).unwrap().status,
        MarketStatus::ReduceOnly
    );

    let bad_feed = get_price_feed(&[(oracle, Price(0))], 100);
    let mut oracle_map = OracleMap::new(&bad_feed, 101, OracleGuardRails::default());
    assert_eq!(
        settle_expired_market(0, &perp_market_map, &spot_market_map, &mut oracle_map, 101),
        Err(ErrorCode::InvalidOracle)
    );

    let other_feed = get_price_feed(&[(Pubkey::new_unique(), Price(1))], 100);
    let mut oracle_map = OracleMap::new(&other_feed, 101, OracleGuardRails::default());
    assert_eq!(
        settle_expired_market(0, &perp_market_map, &spot_market_map, &mut oracle_map, 101),
        Err(ErrorCode::OracleNotFound)
    );
}
