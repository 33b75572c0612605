use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::bn::U192;
use crate::math::casting::Cast;
use crate::math::safe_math::SafeMath;
use crate::state::perp_market::{MarketStatus, PerpMarket};
use crate::validate;

#[allow(clippy::comparison_chain)]
pub fn validate_perp_market(market: &PerpMarket) -> ClearingHouseResult {
    validate!(
        market
            .amm
            .base_asset_amount_long
            .safe_add(market.amm.base_asset_amount_short)?
            == market.amm.base_asset_amount_with_amm,
        ErrorCode::InvalidAmmDetected,
        "Market NET_BAA Error: long={} + short={} != with_amm={}",
        market.amm.base_asset_amount_long,
        market.amm.base_asset_amount_short,
        market.amm.base_asset_amount_with_amm
    )?;

    validate!(
        market.amm.peg_multiplier > 0,
        ErrorCode::InvalidAmmDetected,
        "peg_multiplier out of wack"
    )?;

    validate!(
        market.amm.base_asset_reserve > 0 && market.amm.quote_asset_reserve > 0,
        ErrorCode::InvalidAmmDetected,
        "empty reserve: bar={}, qar={}",
        market.amm.base_asset_reserve,
        market.amm.quote_asset_reserve
    )?;

    if market.status != MarketStatus::ReduceOnly {
        validate!(
            market.amm.sqrt_k > market.amm.base_asset_amount_with_amm.unsigned_abs(),
            ErrorCode::InvalidAmmDetected,
            "k out of wack: k={}, net_baa={}",
            market.amm.sqrt_k,
            market.amm.base_asset_amount_with_amm
        )?;
    }

    let invariant_sqrt_u192 = U192::from(market.amm.sqrt_k);
    let invariant = invariant_sqrt_u192.safe_mul(invariant_sqrt_u192)?;
    let quote_asset_reserve = invariant
        .safe_div(U192::from(market.amm.base_asset_reserve))?
        .try_to_u128()?;

    let rounding_diff = quote_asset_reserve
        .cast::<i128>()?
        .safe_sub(market.amm.quote_asset_reserve.cast()?)?
        .abs();

    validate!(
        rounding_diff <= 10,
        ErrorCode::InvalidAmmDetected,
        "qar/bar/sqrt_k out of wack: bar={}, qar={}, qar'={} (rounding: {})",
        market.amm.base_asset_reserve,
        market.amm.quote_asset_reserve,
        quote_asset_reserve,
        rounding_diff
    )?;

    validate!(
        market.number_of_users >= market.number_of_users_with_base,
        ErrorCode::InvalidAmmDetected,
        "number_of_users {} < number_of_users_with_base {}",
        market.number_of_users,
        market.number_of_users_with_base
    )?;

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::error::ErrorCode;
    use crate::math::constants::AMM_RESERVE_PRECISION;
    use crate::state::perp_market::PerpMarket;
    use crate::validation::perp_market::validate_perp_market;

    #[test]
    fn healthy_market() {
        assert!(validate_perp_market(&PerpMarket::default_test()).is_ok());
    }

    #[test]
    fn net_base_mismatch() {
        let mut market = PerpMarket::default_test();
        market.amm.base_asset_amount_long = AMM_RESERVE_PRECISION as i128;

        assert_eq!(
            validate_perp_market(&market),
            Err(ErrorCode::InvalidAmmDetected)
        );
    }

    #[test]
    fn reserves_off_the_curve() {
        let mut market = PerpMarket::default_test();
        market.amm.quote_asset_reserve += 1_000;

        assert_eq!(
            validate_perp_market(&market),
            Err(ErrorCode::InvalidAmmDetected)
        );
    }
}
