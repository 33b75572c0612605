use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::constants::{LIQUIDATION_FEE_TO_MARGIN_PRECISION_RATIO, MARGIN_PRECISION_U32};
use crate::math::fixed_point::MarginRatio;
use crate::validate;
use solana_program::msg;

pub fn validate_margin(
    margin_ratio_initial: MarginRatio,
    margin_ratio_maintenance: MarginRatio,
    liquidator_fee: u32,
) -> ClearingHouseResult {
    if !(1..=MARGIN_PRECISION_U32).contains(&margin_ratio_initial.value()) {
        return Err(ErrorCode::InvalidMarginRatio);
    }

    if margin_ratio_initial <= margin_ratio_maintenance {
        return Err(ErrorCode::InvalidMarginRatio);
    }

    if margin_ratio_maintenance.is_zero() {
        return Err(ErrorCode::InvalidMarginRatio);
    }

    validate!(
        margin_ratio_maintenance.value() * LIQUIDATION_FEE_TO_MARGIN_PRECISION_RATIO
            > liquidator_fee,
        ErrorCode::InvalidLiquidationFee,
        "margin_ratio_maintenance must be greater than liquidator fee"
    )?;

    Ok(())
}
