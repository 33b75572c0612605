use solana_program::msg;

use crate::controller::amm::SwapDirection;
use crate::controller::position::{PositionDelta, PositionDirection};
use crate::error::ClearingHouseResult;
use crate::math::amm;
use crate::math::casting::Cast;
use crate::math::safe_math::SafeMath;
use crate::math_error;
use crate::state::perp_market::AMM;
use crate::state::user::PerpPosition;


pub fn swap_direction_to_close_position(base_asset_amount: i64) -> SwapDirection {
    if base_asset_amount >= 0 {
        SwapDirection::Add
    } else {
        SwapDirection::Remove
    }
}

pub fn swap_direction_for_trade(direction: PositionDirection) -> SwapDirection {
    match direction {
        PositionDirection::Long => SwapDirection::Remove,
        PositionDirection::Short => SwapDirection::Add,
    }
}

/// Quote the amm would pay (or charge) to take `base_asset_amount` of user position back onto
/// the curve.
pub fn calculate_base_asset_value(base_asset_amount: i128, amm: &AMM) -> ClearingHouseResult<u128> {
    if base_asset_amount == 0 {
        return Ok(0);
    }

    let swap_direction = swap_direction_to_close_position(base_asset_amount.cast()?);

    let (new_quote_asset_reserve, _new_base_asset_reserve) = amm::calculate_swap_output(
        base_asset_amount.unsigned_abs(),
        amm.base_asset_reserve,
        swap_direction,
        amm.sqrt_k,
    )?;

    amm::calculate_quote_asset_amount_swapped(
        amm.quote_asset_reserve,
        new_quote_asset_reserve,
        swap_direction,
        amm.peg_multiplier,
    )
}

pub fn calculate_base_asset_value_and_pnl(
    base_asset_amount: i128,
    quote_asset_amount: u128,
    amm: &AMM,
) -> ClearingHouseResult<(u128, i128)> {
    if base_asset_amount == 0 {
        return Ok((0, 0));
    }

    let swap_direction = swap_direction_to_close_position(base_asset_amount.cast()?);
    let base_asset_value = calculate_base_asset_value(base_asset_amount, amm)?;
    let pnl = calculate_pnl(base_asset_value, quote_asset_amount, swap_direction)?;

    Ok((base_asset_value, pnl))
}

pub fn calculate_pnl(
    exit_value: u128,
    entry_value: u128,
    swap_direction_to_close: SwapDirection,
) -> ClearingHouseResult<i128> {
    match swap_direction_to_close {
        SwapDirection::Add => exit_value.cast::<i128>()?.safe_sub(entry_value.cast()?),
        SwapDirection::Remove => entry_value.cast::<i128>()?.safe_sub(exit_value.cast()?),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionUpdateType {
    Open,
    Increase,
    Reduce,
    Close,
    Flip,
}

pub fn get_position_update_type(
    position: &PerpPosition,
    delta: &PositionDelta,
) -> PositionUpdateType {
    if position.base_asset_amount == 0 {
        return PositionUpdateType::Open;
    }

    let position_base = position.base_asset_amount;
    let delta_base = delta.base_asset_amount;

    if position_base.signum() == delta_base.signum() {
        PositionUpdateType::Increase
    } else if position_base.abs() > delta_base.abs() {
        PositionUpdateType::Reduce
    } else if position_base.abs() == delta_base.abs() {
        PositionUpdateType::Close
    } else {
        PositionUpdateType::Flip
    }
}

pub fn standardize_base_asset_amount(base_asset_amount: u64, step_size: u64) -> ClearingHouseResult<u64> {
    let remainder = base_asset_amount
        .checked_rem_euclid(step_size)
        .ok_or_else(math_error!())?;

    base_asset_amount.safe_sub(remainder)
}

pub fn is_multiple_of_step_size(base_asset_amount: u64, step_size: u64) -> ClearingHouseResult<bool> {
    let remainder = base_asset_amount
        .checked_rem_euclid(step_size)
        .ok_or_else(math_error!())?;

    Ok(remainder == 0)
}

/// A trade that only shrinks the existing position, up to closing it.
pub fn is_trade_position_reducing(
    direction: &PositionDirection,
    base_asset_amount: u64,
    position_base_asset_amount: i64,
) -> bool {
    match direction {
        // User is short and trade is long
        PositionDirection::Long if position_base_asset_amount < 0 => {
            base_asset_amount <= position_base_asset_amount.unsigned_abs()
        }
        // User is long and trade is short
        PositionDirection::Short if position_base_asset_amount > 0 => {
            base_asset_amount <= position_base_asset_amount.unsigned_abs()
        }
        _ => false,
    }
}

/// Opening, growing or flipping a position.
pub fn is_trade_risk_increasing(
    direction: &PositionDirection,
    base_asset_amount: u64,
    position_base_asset_amount: i64,
) -> bool {
    !is_trade_position_reducing(direction, base_asset_amount, position_base_asset_amount)
}
