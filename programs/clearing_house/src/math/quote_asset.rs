use crate::error::ClearingHouseResult;
use crate::math::constants::AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO;
use crate::math::safe_math::SafeMath;

use std::ops::Div;

pub fn reserve_to_asset_amount(
    quote_asset_reserve: u128,
    peg_multiplier: u128,
) -> ClearingHouseResult<u128> {
    Ok(quote_asset_reserve
        .safe_mul(peg_multiplier)?
        .div(AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO))
}
