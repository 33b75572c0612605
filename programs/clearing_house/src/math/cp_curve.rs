use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::bn::U192;
use crate::math::casting::Cast;
use crate::math::constants::{AMM_RESERVE_PRECISION, PERCENTAGE_PRECISION};
use crate::math::position::{calculate_base_asset_value, calculate_base_asset_value_and_pnl};
use crate::math::safe_math::SafeMath;
use crate::state::perp_market::{MarketStatus, PerpMarket};
use crate::validate;


#[derive(Debug, PartialEq, Eq)]
pub struct UpdateKResult {
    pub sqrt_k: u128,
    pub base_asset_reserve: u128,
    pub quote_asset_reserve: u128,
}

/// Rejects a move of `sqrt_k` larger than the market's curve update intensity, in percent.
pub fn validate_curve_update_intensity(
    market: &PerpMarket,
    new_sqrt_k: u128,
) -> ClearingHouseResult {
    let curve_update_intensity = market.amm.curve_update_intensity;

    validate!(
        curve_update_intensity > 0,
        ErrorCode::InvalidUpdateK,
        "curve updates disabled for market {}",
        market.market_index
    )?;

    let old_sqrt_k = market.amm.sqrt_k;
    let change = new_sqrt_k.max(old_sqrt_k).safe_sub(new_sqrt_k.min(old_sqrt_k))?;

    // change / old > intensity / 100
    validate!(
        change.safe_mul(PERCENTAGE_PRECISION)?
            <= old_sqrt_k.safe_mul(curve_update_intensity.cast()?)?,
        ErrorCode::InvalidUpdateK,
        "sqrt_k {} -> {} moves more than {}%",
        old_sqrt_k,
        new_sqrt_k,
        curve_update_intensity
    )
}

/// Reserves for `new_sqrt_k` that keep the current price.
pub fn get_update_k_result(
    market: &PerpMarket,
    new_sqrt_k: U192,
) -> ClearingHouseResult<UpdateKResult> {
    let sqrt_k_ratio_precision = U192::from(AMM_RESERVE_PRECISION);

    let old_sqrt_k = U192::from(market.amm.sqrt_k);
    let mut sqrt_k_ratio = new_sqrt_k
        .safe_mul(sqrt_k_ratio_precision)?
        .safe_div(old_sqrt_k)?;

    // round toward a smaller decrease
    if sqrt_k_ratio < sqrt_k_ratio_precision {
        sqrt_k_ratio = sqrt_k_ratio + 1;
    }

    let sqrt_k = new_sqrt_k.try_to_u128()?;

    // only allow too small when market is in reduce only mode
    if market.status != MarketStatus::ReduceOnly
        && new_sqrt_k < old_sqrt_k
        && market.amm.base_asset_amount_with_amm.unsigned_abs() > sqrt_k
    {
        msg!("new_sqrt_k too small relative to market imbalance");
        return Err(ErrorCode::InvalidUpdateK);
    }

    let base_asset_reserve = U192::from(market.amm.base_asset_reserve)
        .safe_mul(sqrt_k_ratio)?
        .safe_div(sqrt_k_ratio_precision)?
        .try_to_u128()?;

    validate!(
        base_asset_reserve > 0,
        ErrorCode::InvalidUpdateK,
        "sqrt_k {} empties the base reserve",
        sqrt_k
    )?;

    let invariant_sqrt_u192 = U192::from(sqrt_k);
    let invariant = invariant_sqrt_u192.safe_mul(invariant_sqrt_u192)?;

    let quote_asset_reserve = invariant
        .safe_div(U192::from(base_asset_reserve))?
        .try_to_u128()?;

    validate!(
        quote_asset_reserve > 0,
        ErrorCode::InvalidUpdateK,
        "sqrt_k {} empties the quote reserve",
        sqrt_k
    )?;

    Ok(UpdateKResult {
        sqrt_k,
        base_asset_reserve,
        quote_asset_reserve,
    })
}

pub fn update_k(market: &mut PerpMarket, update_k_result: &UpdateKResult) {
    market.amm.base_asset_reserve = update_k_result.base_asset_reserve;
    market.amm.quote_asset_reserve = update_k_result.quote_asset_reserve;
    market.amm.sqrt_k = update_k_result.sqrt_k;
}

/// Change in what the users' net position would receive for closing against the curve once k
/// moves. Positive is an expense for the market: a deeper curve improves the exit price.
pub fn adjust_k_cost(
    market: &PerpMarket,
    update_k_result: &UpdateKResult,
) -> ClearingHouseResult<i128> {
    let mut market_clone = *market;

    let current_net_market_value =
        calculate_base_asset_value(market_clone.amm.base_asset_amount_with_amm, &market_clone.amm)?;

    update_k(&mut market_clone, update_k_result);

    let (_new_net_market_value, cost) = calculate_base_asset_value_and_pnl(
        market_clone.amm.base_asset_amount_with_amm,
        current_net_market_value,
        &market_clone.amm,
    )?;

    Ok(cost)
}
