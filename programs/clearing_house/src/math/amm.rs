use solana_program::msg;

use crate::controller::amm::SwapDirection;
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::bn::U192;
use crate::math::casting::Cast;
use crate::math::constants::PRICE_TO_PEG_PRECISION_RATIO;
use crate::math::fixed_point::Price;
use crate::math::quote_asset::reserve_to_asset_amount;
use crate::math::safe_math::SafeMath;
use crate::validate;

#[cfg(test)]
mod tests;

/// `quote_reserve * peg / base_reserve`, in PRICE_PRECISION
pub fn calculate_price(
    quote_asset_reserve: u128,
    base_asset_reserve: u128,
    peg_multiplier: u128,
) -> ClearingHouseResult<Price> {
    let peg_quote_asset_amount = quote_asset_reserve.safe_mul(peg_multiplier)?;

    U192::from(peg_quote_asset_amount)
        .safe_mul(U192::from(PRICE_TO_PEG_PRECISION_RATIO))?
        .safe_div(U192::from(base_asset_reserve))?
        .try_to_u64()?
        .cast::<i64>()
        .map(Price)
}

pub fn calculate_swap_output(
    swap_amount: u128,
    input_asset_reserve: u128,
    direction: SwapDirection,
    invariant_sqrt: u128,
) -> ClearingHouseResult<(u128, u128)> {
    let invariant_sqrt_u192 = U192::from(invariant_sqrt);
    let invariant = invariant_sqrt_u192.safe_mul(invariant_sqrt_u192)?;

    if direction == SwapDirection::Remove && swap_amount >= input_asset_reserve {
        msg!("{:?} >= {:?}", swap_amount, input_asset_reserve);
        return Err(ErrorCode::TradeSizeTooLarge);
    }

    let new_input_asset_reserve = if let SwapDirection::Add = direction {
        input_asset_reserve.safe_add(swap_amount)?
    } else {
        input_asset_reserve.safe_sub(swap_amount)?
    };

    let new_input_amount_u192 = U192::from(new_input_asset_reserve);
    let new_output_asset_reserve = invariant.safe_div(new_input_amount_u192)?.try_to_u128()?;

    validate!(
        new_output_asset_reserve > 0,
        ErrorCode::TradeSizeTooLarge,
        "swap of {} empties the output reserve",
        swap_amount
    )?;

    Ok((new_output_asset_reserve, new_input_asset_reserve))
}

pub fn calculate_quote_asset_amount_swapped(
    quote_asset_reserve_before: u128,
    quote_asset_reserve_after: u128,
    swap_direction: SwapDirection,
    peg_multiplier: u128,
) -> ClearingHouseResult<u128> {
    let mut quote_asset_reserve_change = match swap_direction {
        SwapDirection::Add => quote_asset_reserve_before.safe_sub(quote_asset_reserve_after)?,
        SwapDirection::Remove => quote_asset_reserve_after.safe_sub(quote_asset_reserve_before)?,
    };

    // when a user goes long base asset, make the base asset slightly more expensive
    // by adding one unit of quote asset
    if swap_direction == SwapDirection::Remove {
        quote_asset_reserve_change = quote_asset_reserve_change.safe_add(1)?;
    }

    let mut quote_asset_amount =
        reserve_to_asset_amount(quote_asset_reserve_change, peg_multiplier)?;

    if swap_direction == SwapDirection::Remove {
        quote_asset_amount = quote_asset_amount.safe_add(1)?;
    }

    Ok(quote_asset_amount)
}

/// Reserves on the curve `sqrt_k^2` whose price is `target_price`.
///
/// `base = sqrt(k * peg * PRICE_TO_PEG_PRECISION_RATIO / target)`, `quote = k / base`
pub fn calculate_reserves_for_price(
    sqrt_k: u128,
    peg_multiplier: u128,
    target_price: Price,
) -> ClearingHouseResult<(u128, u128)> {
    validate!(
        target_price.is_positive(),
        ErrorCode::InvalidAmmPriceTarget,
        "target price {} must be positive",
        target_price
    )?;

    let sqrt_k_u192 = U192::from(sqrt_k);
    let invariant = sqrt_k_u192.safe_mul(sqrt_k_u192)?;

    let base_asset_reserve = invariant
        .safe_mul(U192::from(peg_multiplier))?
        .safe_mul(U192::from(PRICE_TO_PEG_PRECISION_RATIO))?
        .safe_div(U192::from(target_price.value().cast::<u64>()?))?
        .integer_sqrt()
        .try_to_u128()?;

    validate!(
        base_asset_reserve > 0,
        ErrorCode::InvalidAmmPriceTarget,
        "target price {} out of range for the curve",
        target_price
    )?;

    let quote_asset_reserve = invariant
        .safe_div(U192::from(base_asset_reserve))?
        .try_to_u128()?;

    validate!(
        quote_asset_reserve > 0,
        ErrorCode::InvalidAmmPriceTarget,
        "target price {} out of range for the curve",
        target_price
    )?;

    Ok((base_asset_reserve, quote_asset_reserve))
}
