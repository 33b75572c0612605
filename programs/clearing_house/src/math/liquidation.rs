use crate::controller::position::PositionDirection;
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::casting::Cast;
use crate::math::fixed_point::{BaseAssetAmount, Price, QuoteAmount};
use crate::math::position::standardize_base_asset_amount;
use crate::validate;
use solana_program::msg;


/// Base the liquidator takes over: the request clamped to the position, rounded down to the step
/// size unless it closes the position outright.
pub fn calculate_base_asset_amount_to_liquidate(
    liquidator_max_base_asset_amount: u64,
    user_base_asset_amount: i64,
    order_step_size: u64,
) -> ClearingHouseResult<u64> {
    let user_base_asset_amount = user_base_asset_amount.unsigned_abs();

    let base_asset_amount = if liquidator_max_base_asset_amount >= user_base_asset_amount {
        user_base_asset_amount
    } else {
        standardize_base_asset_amount(liquidator_max_base_asset_amount, order_step_size)?
    };

    validate!(
        base_asset_amount != 0,
        ErrorCode::InvalidLiquidationAmount,
        "liquidating {} of {} rounds to zero with step size {}",
        liquidator_max_base_asset_amount,
        user_base_asset_amount,
        order_step_size
    )?;

    Ok(base_asset_amount)
}

/// Price the position changes hands at. A long liquidatee sells below the mark, a short one buys
/// back above it.
pub fn calculate_liquidation_transfer_price(
    mark_price: Price,
    user_direction: PositionDirection,
    liquidator_fee: u32,
) -> ClearingHouseResult<Price> {
    match user_direction {
        PositionDirection::Long => mark_price.discount(liquidator_fee),
        PositionDirection::Short => mark_price.premium(liquidator_fee),
    }
}

/// Quote that changes hands for `base_asset_amount` at `transfer_price`, and the penalty it
/// carries versus a close at the mark.
pub fn calculate_liquidation_quote_amount_and_fee(
    base_asset_amount: u64,
    mark_price: Price,
    transfer_price: Price,
) -> ClearingHouseResult<(QuoteAmount, QuoteAmount)> {
    let base_asset_amount = BaseAssetAmount(base_asset_amount.cast()?);

    let quote_asset_amount = base_asset_amount.quote_value(transfer_price)?;
    let mark_quote_asset_amount = base_asset_amount.quote_value(mark_price)?;

    let liquidator_fee = mark_quote_asset_amount
        .safe_sub(quote_asset_amount)?
        .abs()?;

    Ok((quote_asset_amount, liquidator_fee))
}

/// Liquidatee's side of the transfer: the base leaves the position and the quote settles at the
/// transfer price.
pub fn calculate_liquidation_deltas(
    user_direction: PositionDirection,
    base_asset_amount: u64,
    quote_asset_amount: QuoteAmount,
) -> ClearingHouseResult<(i64, i64)> {
    let base_asset_amount = base_asset_amount.cast::<i64>()?;

    match user_direction {
        PositionDirection::Long => Ok((-base_asset_amount, quote_asset_amount.value())),
        PositionDirection::Short => Ok((base_asset_amount, quote_asset_amount.safe_neg()?.value())),
    }
}
