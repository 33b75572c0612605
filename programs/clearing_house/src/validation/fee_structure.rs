use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::constants::{MAX_FEE_NUMERATOR_TO_DENOMINATOR_PCT, PERCENTAGE_PRECISION};
use crate::math::safe_math::SafeMath;
use crate::state::state::FeeStructure;
use crate::validate;

pub fn validate_fee_structure(fee_structure: &FeeStructure) -> ClearingHouseResult {
    validate!(
        fee_structure.fee_denominator > 0,
        ErrorCode::InvalidFeeStructure,
        "fee denominator can not be zero"
    )?;

    validate!(
        fee_structure.fee_numerator.safe_mul(PERCENTAGE_PRECISION)?
            <= fee_structure
                .fee_denominator
                .safe_mul(MAX_FEE_NUMERATOR_TO_DENOMINATOR_PCT)?,
        ErrorCode::InvalidFeeStructure,
        "fee {}/{} above {}%",
        fee_structure.fee_numerator,
        fee_structure.fee_denominator,
        MAX_FEE_NUMERATOR_TO_DENOMINATOR_PCT
    )
}

#[cfg(test)]
mod test {
    use crate::error::ErrorCode;
    use crate::state::state::FeeStructure;
    use crate::validation::fee_structure::validate_fee_structure;

    #[test]
    fn fee_bounds() {
        assert!(validate_fee_structure(&FeeStructure::default()).is_ok());
        assert!(validate_fee_structure(&FeeStructure {
            fee_numerator: 5,
            fee_denominator: 100,
        })
        .is_ok());

        assert_eq!(
            validate_fee_structure(&FeeStructure {
                fee_numerator: 6,
                fee_denominator: 100,
            }),
            Err(ErrorCode::InvalidFeeStructure)
        );
        assert_eq!(
            validate_fee_structure(&FeeStructure {
                fee_numerator: 0,
                fee_denominator: 0,
            }),
            Err(ErrorCode::InvalidFeeStructure)
        );
    }
}
