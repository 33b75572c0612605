use crate::error::ClearingHouseResult;
use crate::math::casting::Cast;
use crate::math::constants::PRICE_TO_QUOTE_PRECISION_RATIO;
use crate::math::fixed_point::{Price, QuoteAmount};
use crate::math::safe_math::SafeMath;
use crate::state::spot_market::SpotBalanceType;
use solana_program::msg;

pub fn get_signed_token_amount(
    token_amount: i128,
    balance_type: &SpotBalanceType,
) -> ClearingHouseResult<i128> {
    match balance_type {
        SpotBalanceType::Deposit => Ok(token_amount),
        SpotBalanceType::Borrow => token_amount.checked_neg().ok_or_else(crate::math_error!()),
    }
}

/// Quote value of a signed token amount. The quote asset is always valued at par.
pub fn get_token_value(
    token_amount: i128,
    spot_decimals: u32,
    oracle_price: Price,
) -> ClearingHouseResult<QuoteAmount> {
    if token_amount == 0 {
        return Ok(QuoteAmount(0));
    }

    let precision_decrease = 10_i128
        .pow(spot_decimals)
        .safe_mul(PRICE_TO_QUOTE_PRECISION_RATIO.cast()?)?;

    token_amount
        .safe_mul(oracle_price.value().cast()?)?
        .safe_div(precision_decrease)?
        .cast::<i64>()
        .map(QuoteAmount)
}
