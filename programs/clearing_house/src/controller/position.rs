use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::casting::Cast;
use crate::math::position::{get_position_update_type, PositionUpdateType};
use crate::math::safe_math::SafeMath;
use crate::math_error;
use crate::state::perp_market::PerpMarket;
use crate::state::user::{PerpPosition, User};


#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, PartialEq, Debug, Eq)]
pub enum PositionDirection {
    Long,
    Short,
}

impl Default for PositionDirection {
    fn default() -> Self {
        PositionDirection::Long
    }
}

pub fn add_new_position(
    user_positions: &mut [PerpPosition],
    market_index: u16,
) -> ClearingHouseResult<usize> {
    let new_position_index = user_positions
        .iter()
        .position(|market_position| market_position.is_available())
        .ok_or(ErrorCode::MaxNumberOfPositions)?;

    let new_market_position = PerpPosition {
        market_index,
        ..PerpPosition::default()
    };

    user_positions[new_position_index] = new_market_position;

    Ok(new_position_index)
}

pub fn get_position_index(
    user_positions: &[PerpPosition],
    market_index: u16,
) -> ClearingHouseResult<usize> {
    let position_index = user_positions
        .iter()
        .position(|market_position| market_position.is_for(market_index));

    match position_index {
        Some(position_index) => Ok(position_index),
        None => Err(ErrorCode::UserHasNoPositionInMarket),
    }
}

#[derive(Default, PartialEq, Debug)]
pub struct PositionDelta {
    pub quote_asset_amount: i64,
    pub base_asset_amount: i64,
}

/// Applies a fill to a position and keeps the market's aggregates in step. Returns the pnl the
/// fill realized.
pub fn update_position_and_market(
    position: &mut PerpPosition,
    market: &mut PerpMarket,
    delta: &PositionDelta,
) -> ClearingHouseResult<i64> {
    if delta.base_asset_amount == 0 {
        update_quote_asset_amount(position, market, delta.quote_asset_amount)?;
        return Ok(delta.quote_asset_amount);
    }

    let update_type = get_position_update_type(position, delta);

    let new_quote_asset_amount = position
        .quote_asset_amount
        .safe_add(delta.quote_asset_amount)?;

    let new_base_asset_amount = position
        .base_asset_amount
        .safe_add(delta.base_asset_amount)?;

    let (new_quote_entry_amount, pnl) = match update_type {
        PositionUpdateType::Open | PositionUpdateType::Increase => {
            let new_quote_entry_amount = position
                .quote_entry_amount
                .safe_add(delta.quote_asset_amount)?;

            (new_quote_entry_amount, 0_i64)
        }
        PositionUpdateType::Reduce | PositionUpdateType::Close => {
            let new_quote_entry_amount = position.quote_entry_amount.safe_sub(
                position
                    .quote_entry_amount
                    .cast::<i128>()?
                    .safe_mul(delta.base_asset_amount.abs().cast()?)?
                    .safe_div(position.base_asset_amount.abs().cast()?)?
                    .cast()?,
            )?;

            let pnl = position
                .quote_entry_amount
                .safe_sub(new_quote_entry_amount)?
                .safe_add(delta.quote_asset_amount)?;

            (new_quote_entry_amount, pnl)
        }
        PositionUpdateType::Flip => {
            // the part of the fill beyond the old position opens the new one
            let new_quote_entry_amount = delta.quote_asset_amount.safe_sub(
                delta
                    .quote_asset_amount
                    .cast::<i128>()?
                    .safe_mul(position.base_asset_amount.abs().cast()?)?
                    .safe_div(delta.base_asset_amount.abs().cast()?)?
                    .cast()?,
            )?;

            let pnl = position.quote_entry_amount.safe_add(
                delta
                    .quote_asset_amount
                    .safe_sub(new_quote_entry_amount)?,
            )?;

            (new_quote_entry_amount, pnl)
        }
    };

    // Update Market open interest
    if let PositionUpdateType::Open = update_type {
        if position.quote_asset_amount == 0 && position.base_asset_amount == 0 {
            market.number_of_users = market.number_of_users.safe_add(1)?;
        }

        market.number_of_users_with_base = market.number_of_users_with_base.safe_add(1)?;
    } else if let PositionUpdateType::Close = update_type {
        if new_base_asset_amount == 0 && new_quote_asset_amount == 0 {
            market.number_of_users = market.number_of_users.safe_sub(1)?;
        }

        market.number_of_users_with_base = market.number_of_users_with_base.safe_sub(1)?;
    }

    match update_type {
        PositionUpdateType::Open | PositionUpdateType::Increase => {
            if new_base_asset_amount > 0 {
                market.amm.base_asset_amount_long = market
                    .amm
                    .base_asset_amount_long
                    .safe_add(delta.base_asset_amount.cast()?)?;
                market.amm.quote_entry_amount_long = market
                    .amm
                    .quote_entry_amount_long
                    .safe_add(delta.quote_asset_amount.cast()?)?;
            } else {
                market.amm.base_asset_amount_short = market
                    .amm
                    .base_asset_amount_short
                    .safe_add(delta.base_asset_amount.cast()?)?;
                market.amm.quote_entry_amount_short = market
                    .amm
                    .quote_entry_amount_short
                    .safe_add(delta.quote_asset_amount.cast()?)?;
            }
        }
        PositionUpdateType::Reduce | PositionUpdateType::Close => {
            if position.base_asset_amount > 0 {
                market.amm.base_asset_amount_long = market
                    .amm
                    .base_asset_amount_long
                    .safe_add(delta.base_asset_amount.cast()?)?;
                market.amm.quote_entry_amount_long = market.amm.quote_entry_amount_long.safe_sub(
                    position
                        .quote_entry_amount
                        .safe_sub(new_quote_entry_amount)?
                        .cast()?,
                )?;
            } else {
                market.amm.base_asset_amount_short = market
                    .amm
                    .base_asset_amount_short
                    .safe_add(delta.base_asset_amount.cast()?)?;
                market.amm.quote_entry_amount_short =
                    market.amm.quote_entry_amount_short.safe_sub(
                        position
                            .quote_entry_amount
                            .safe_sub(new_quote_entry_amount)?
                            .cast()?,
                    )?;
            }
        }
        PositionUpdateType::Flip => {
            if new_base_asset_amount > 0 {
                market.amm.base_asset_amount_short = market
                    .amm
                    .base_asset_amount_short
                    .safe_sub(position.base_asset_amount.cast()?)?;
                market.amm.base_asset_amount_long = market
                    .amm
                    .base_asset_amount_long
                    .safe_add(new_base_asset_amount.cast()?)?;

                market.amm.quote_entry_amount_short = market
                    .amm
                    .quote_entry_amount_short
                    .safe_sub(position.quote_entry_amount.cast()?)?;
                market.amm.quote_entry_amount_long = market
                    .amm
                    .quote_entry_amount_long
                    .safe_add(new_quote_entry_amount.cast()?)?;
            } else {
                market.amm.base_asset_amount_long = market
                    .amm
                    .base_asset_amount_long
                    .safe_sub(position.base_asset_amount.cast()?)?;
                market.amm.base_asset_amount_short = market
                    .amm
                    .base_asset_amount_short
                    .safe_add(new_base_asset_amount.cast()?)?;

                market.amm.quote_entry_amount_long = market
                    .amm
                    .quote_entry_amount_long
                    .safe_sub(position.quote_entry_amount.cast()?)?;
                market.amm.quote_entry_amount_short = market
                    .amm
                    .quote_entry_amount_short
                    .safe_add(new_quote_entry_amount.cast()?)?;
            }
        }
    }

    // the quote trackers follow the side a position's quote amount sits on
    remove_from_quote_tracker(market, position.base_asset_amount, position.quote_asset_amount)?;
    add_to_quote_tracker(market, new_base_asset_amount, new_quote_asset_amount)?;

    market.amm.base_asset_amount_with_amm = market
        .amm
        .base_asset_amount_with_amm
        .safe_add(delta.base_asset_amount.cast()?)?;

    position.quote_asset_amount = new_quote_asset_amount;
    position.quote_entry_amount = new_quote_entry_amount;
    position.base_asset_amount = new_base_asset_amount;

    Ok(pnl)
}

pub fn update_quote_asset_amount(
    position: &mut PerpPosition,
    market: &mut PerpMarket,
    delta: i64,
) -> ClearingHouseResult<()> {
    if delta == 0 {
        return Ok(());
    }

    if position.quote_asset_amount == 0 && position.base_asset_amount == 0 {
        market.number_of_users = market.number_of_users.safe_add(1)?;
    }

    position.quote_asset_amount = position.quote_asset_amount.safe_add(delta)?;

    add_to_quote_tracker(market, position.base_asset_amount, delta)?;

    if position.quote_asset_amount == 0 && position.base_asset_amount == 0 {
        market.number_of_users = market.number_of_users.safe_sub(1)?;
    }

    Ok(())
}

fn add_to_quote_tracker(
    market: &mut PerpMarket,
    base_asset_amount: i64,
    quote_asset_amount: i64,
) -> ClearingHouseResult {
    if base_asset_amount > 0 {
        market.amm.quote_asset_amount_long = market
            .amm
            .quote_asset_amount_long
            .safe_add(quote_asset_amount.cast()?)?;
    } else if base_asset_amount < 0 {
        market.amm.quote_asset_amount_short = market
            .amm
            .quote_asset_amount_short
            .safe_add(quote_asset_amount.cast()?)?;
    }

    Ok(())
}

fn remove_from_quote_tracker(
    market: &mut PerpMarket,
    base_asset_amount: i64,
    quote_asset_amount: i64,
) -> ClearingHouseResult {
    add_to_quote_tracker(
        market,
        base_asset_amount,
        quote_asset_amount
            .checked_neg()
            .ok_or_else(math_error!())?,
    )
}

pub fn update_settled_pnl(
    user: &mut User,
    position_index: usize,
    delta: i64,
) -> ClearingHouseResult<()> {
    user.update_settled_perp_pnl(delta)?;
    update_position_settled_pnl(&mut user.perp_positions[position_index], delta)?;
    Ok(())
}

pub fn update_position_settled_pnl(
    position: &mut PerpPosition,
    delta: i64,
) -> ClearingHouseResult<()> {
    position.settled_pnl = position.settled_pnl.safe_add(delta)?;

    Ok(())
}
