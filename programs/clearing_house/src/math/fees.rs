use crate::error::ClearingHouseResult;
use crate::math::casting::Cast;
use crate::math::constants::BID_ASK_SPREAD_PRECISION_U128;
use crate::math::safe_math::SafeMath;
use crate::state::state::FeeStructure;


#[derive(Debug, Default, PartialEq, Eq)]
pub struct FeeResult {
    /// paid by the user into the fee pool
    pub exchange_fee: u64,
    /// paid by the user into the pnl pool, compensates the amm for half its spread
    pub mm_fee: u64,
}

impl FeeResult {
    pub fn user_fee(&self) -> ClearingHouseResult<u64> {
        self.exchange_fee.safe_add(self.mm_fee)
    }
}

pub fn calculate_fee_for_trade(
    quote_asset_amount: u64,
    fee_structure: &FeeStructure,
    base_spread: u32,
) -> ClearingHouseResult<FeeResult> {
    let exchange_fee = quote_asset_amount
        .cast::<u128>()?
        .safe_mul(fee_structure.fee_numerator)?
        .safe_div_ceil(fee_structure.fee_denominator)?
        .cast::<u64>()?;

    let mm_fee = quote_asset_amount
        .cast::<u128>()?
        .safe_mul(base_spread.cast()?)?
        .safe_div(BID_ASK_SPREAD_PRECISION_U128.safe_mul(2)?)?
        .cast::<u64>()?;

    Ok(FeeResult {
        exchange_fee,
        mm_fee,
    })
}
