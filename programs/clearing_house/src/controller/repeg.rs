use solana_program::msg;

use crate::controller::amm::{move_price_to, transfer_fee_pool_to_pnl_pool};
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::bn::U192;
use crate::math::casting::Cast;
use crate::math::cp_curve;
use crate::math::fixed_point::Price;
use crate::math::oracle::OracleValidity;
use crate::math::safe_math::SafeMath;
use crate::state::events::{CurveRecord, MarketStatusRecord};
use crate::state::oracle_map::OracleMap;
use crate::state::perp_market::{MarketStatus, PerpMarket};
use crate::state::perp_market_map::PerpMarketMap;
use crate::state::spot_market::SpotBalance;
use crate::state::spot_market_map::SpotMarketMap;
use crate::validate;
use crate::validation::perp_market::validate_perp_market;

#[cfg(test)]
mod tests;

/// Moves the curve to `new_sqrt_k` at the current price, paying for the change in what the
/// users' net position is worth out of the market's fees.
pub fn update_k(
    market: &mut PerpMarket,
    new_sqrt_k: u128,
    now: i64,
) -> ClearingHouseResult<CurveRecord> {
    validate!(
        !market.is_in_settlement(),
        ErrorCode::InvalidMarketStatus,
        "market {} is settled",
        market.market_index
    )?;

    cp_curve::validate_curve_update_intensity(market, new_sqrt_k)?;

    let base_asset_reserve_before = market.amm.base_asset_reserve;
    let quote_asset_reserve_before = market.amm.quote_asset_reserve;
    let sqrt_k_before = market.amm.sqrt_k;
    let mark_price_before = market.amm.reserve_price()?;

    let update_k_result = cp_curve::get_update_k_result(market, U192::from(new_sqrt_k))?;
    let adjustment_cost = cp_curve::adjust_k_cost(market, &update_k_result)?;

    apply_cost_to_market(market, adjustment_cost)?;

    cp_curve::update_k(market, &update_k_result);

    validate_perp_market(market)?;

    let record = CurveRecord {
        ts: now,
        market_index: market.market_index,
        peg_multiplier: market.amm.peg_multiplier,
        base_asset_reserve_before,
        quote_asset_reserve_before,
        sqrt_k_before,
        base_asset_reserve_after: market.amm.base_asset_reserve,
        quote_asset_reserve_after: market.amm.quote_asset_reserve,
        sqrt_k_after: market.amm.sqrt_k,
        mark_price_before: mark_price_before.value(),
        mark_price_after: market.amm.reserve_price()?.value(),
        base_asset_amount_with_amm: market.amm.base_asset_amount_with_amm,
        adjustment_cost,
        total_fee_minus_distributions: market.amm.total_fee_minus_distributions,
    };

    Ok(record)
}

/// Positive cost is an expense and must be covered by `total_fee_minus_distributions`, negative
/// cost is revenue.
pub fn apply_cost_to_market(market: &mut PerpMarket, cost: i128) -> ClearingHouseResult {
    if cost > 0 {
        validate!(
            cost <= market.amm.total_fee_minus_distributions,
            ErrorCode::InvalidUpdateK,
            "cost {} exceeds total_fee_minus_distributions {}",
            cost,
            market.amm.total_fee_minus_distributions
        )?;
    }

    market.amm.total_fee_minus_distributions =
        market.amm.total_fee_minus_distributions.safe_sub(cost)?;

    Ok(())
}

/// Reprices the curve without a trade. `sqrt_k` is kept, so this shifts what every open position
/// is worth at no cost to the market.
pub fn move_amm_price(
    market: &mut PerpMarket,
    target_price: Price,
    now: i64,
) -> ClearingHouseResult<CurveRecord> {
    validate!(
        !market.is_in_settlement(),
        ErrorCode::InvalidMarketStatus,
        "market {} is settled",
        market.market_index
    )?;

    let base_asset_reserve_before = market.amm.base_asset_reserve;
    let quote_asset_reserve_before = market.amm.quote_asset_reserve;
    let mark_price_before = market.amm.reserve_price()?;

    move_price_to(market, target_price)?;

    validate_perp_market(market)?;

    let record = CurveRecord {
        ts: now,
        market_index: market.market_index,
        peg_multiplier: market.amm.peg_multiplier,
        base_asset_reserve_before,
        quote_asset_reserve_before,
        sqrt_k_before: market.amm.sqrt_k,
        base_asset_reserve_after: market.amm.base_asset_reserve,
        quote_asset_reserve_after: market.amm.quote_asset_reserve,
        sqrt_k_after: market.amm.sqrt_k,
        mark_price_before: mark_price_before.value(),
        mark_price_after: market.amm.reserve_price()?.value(),
        base_asset_amount_with_amm: market.amm.base_asset_amount_with_amm,
        adjustment_cost: 0,
        total_fee_minus_distributions: market.amm.total_fee_minus_distributions,
    };

    Ok(record)
}

/// Takes an expired reduce only market into settlement: snapshots the oracle price every
/// remaining position closes at and moves the fee pool surplus into the pnl pool.
pub fn settle_expired_market(
    market_index: u16,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
    now: i64,
) -> ClearingHouseResult<MarketStatusRecord> {
    let market = &mut perp_market_map.get_ref_mut(&market_index)?;

    match market.status {
        MarketStatus::Settlement => {
            msg!(
                "market {} already settled at {}",
                market_index,
                market.expiry_price
            );
            return Err(ErrorCode::AlreadySettled);
        }
        MarketStatus::Active => {
            msg!("market {} isn't set to expire", market_index);
            return Err(ErrorCode::InvalidMarketStatus);
        }
        MarketStatus::ReduceOnly => {}
    }

    validate!(
        market.expiry_ts != 0,
        ErrorCode::InvalidMarketStatus,
        "market {} isn't set to expire",
        market_index
    )?;

    validate!(
        market.expiry_ts <= now,
        ErrorCode::MarketNotExpired,
        "market {} expires at {}, now {}",
        market_index,
        market.expiry_ts,
        now
    )?;

    let (oracle_price_data, oracle_validity) =
        oracle_map.get_price_data_and_validity(&market.amm.oracle)?;

    match oracle_validity {
        OracleValidity::Valid => {}
        OracleValidity::Stale => {
            msg!(
                "oracle for market {} published at {}, now {}",
                market_index,
                oracle_price_data.publish_ts,
                now
            );
            return Err(ErrorCode::StaleOracle);
        }
        OracleValidity::NonPositive => {
            msg!(
                "oracle for market {} reports {}",
                market_index,
                oracle_price_data.price
            );
            return Err(ErrorCode::InvalidOracle);
        }
    }

    let spot_market = &mut spot_market_map.get_ref_mut(&market.quote_spot_market_index)?;

    // half the exchange fees stay with the protocol
    let fee_reserved_for_protocol = market.amm.total_exchange_fee.safe_div(2)?.cast::<i128>()?;

    let budget = market
        .amm
        .total_fee_minus_distributions
        .safe_sub(fee_reserved_for_protocol)?
        .max(0);

    let available_fee_pool = market
        .amm
        .fee_pool
        .balance()
        .cast::<i128>()?
        .safe_sub(fee_reserved_for_protocol)?
        .max(0);

    let fee_pool_transfer = budget.min(available_fee_pool).unsigned_abs();

    if fee_pool_transfer > 0 {
        transfer_fee_pool_to_pnl_pool(market, spot_market, fee_pool_transfer)?;
    }

    let status_before = market.status;
    market.expiry_price = oracle_price_data.price;
    market.status = MarketStatus::Settlement;

    let record = MarketStatusRecord {
        ts: now,
        market_index,
        status_before,
        status_after: market.status,
        expiry_ts: market.expiry_ts,
        expiry_price: market.expiry_price.value(),
        fee_pool_transfer,
    };

    Ok(record)
}
