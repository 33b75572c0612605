use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::casting::Cast;
use crate::math::constants::{MARGIN_PRECISION, PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO_I128};
use crate::math::fixed_point::{Price, QuoteAmount};
use crate::math::safe_math::SafeMath;
use crate::math::spot_balance::get_token_value;
use crate::state::oracle_map::OracleMap;
use crate::state::perp_market::PerpMarket;
use crate::state::perp_market_map::PerpMarketMap;
use crate::state::spot_market::SpotMarket;
use crate::state::spot_market_map::SpotMarketMap;
use crate::state::user::{PerpPosition, SpotPosition, User};
use crate::validate;


#[derive(Clone, Copy, PartialEq, Debug, Eq)]
pub enum MarginRequirementType {
    Initial,
    Maintenance,
}

#[derive(Clone, Copy, Default, PartialEq, Debug, Eq)]
pub struct MarginCalculation {
    /// spot value plus unrealized perp pnl
    pub total_collateral: QuoteAmount,
    pub margin_requirement: QuoteAmount,
    /// sum of |notional| over open perp positions
    pub total_perp_notional: QuoteAmount,
    pub spot_asset_value: QuoteAmount,
    pub unrealized_pnl: QuoteAmount,
}

impl MarginCalculation {
    pub fn meets_margin_requirement(&self) -> bool {
        self.total_collateral >= self.margin_requirement
    }

    /// Collateral left after covering the requirement, negative when short of it.
    pub fn free_collateral(&self) -> ClearingHouseResult<QuoteAmount> {
        self.total_collateral.safe_sub(self.margin_requirement)
    }
}

pub fn calculate_spot_position_value(
    spot_position: &SpotPosition,
    spot_market: &SpotMarket,
    oracle_map: &mut OracleMap,
) -> ClearingHouseResult<QuoteAmount> {
    let token_amount = spot_position.get_signed_token_amount()?;
    if token_amount == 0 {
        return Ok(QuoteAmount::ZERO);
    }

    let oracle_price = if spot_market.is_quote_asset() {
        Price::ONE
    } else {
        oracle_map.get_valid_price_data(&spot_market.oracle)?.price
    };

    get_token_value(token_amount, spot_market.decimals, oracle_price)
}

/// Value of the user's balance in one spot market, zero when it holds none.
pub fn calculate_spot_market_asset_value(
    user: &User,
    spot_market_index: u16,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
) -> ClearingHouseResult<QuoteAmount> {
    let spot_position = match user.get_spot_position(spot_market_index) {
        Ok(spot_position) => spot_position,
        Err(_) => return Ok(QuoteAmount::ZERO),
    };

    let spot_market = spot_market_map.get_ref(&spot_market_index)?;
    calculate_spot_position_value(spot_position, &spot_market, oracle_map)
}

/// Returns `(notional, unrealized_pnl)` of a perp position at the market's valuation price.
pub fn calculate_perp_position_value_and_pnl(
    market_position: &PerpPosition,
    market: &PerpMarket,
) -> ClearingHouseResult<(QuoteAmount, QuoteAmount)> {
    if market_position.base_asset_amount == 0 {
        return Ok((QuoteAmount::ZERO, market_position.quote()));
    }

    let valuation_price = market.get_valuation_price()?;
    let base_asset_value = market_position.base().quote_value(valuation_price)?;
    let unrealized_pnl = base_asset_value.safe_add(market_position.quote())?;

    Ok((base_asset_value.abs()?, unrealized_pnl))
}

pub fn calculate_margin_requirement_and_total_collateral(
    user: &User,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
    margin_requirement_type: MarginRequirementType,
) -> ClearingHouseResult<MarginCalculation> {
    let mut calculation = MarginCalculation::default();

    for spot_position in user.spot_positions.iter() {
        if spot_position.is_available() {
            continue;
        }

        let spot_market = spot_market_map.get_ref(&spot_position.market_index)?;
        let value = calculate_spot_position_value(spot_position, &spot_market, oracle_map)?;
        calculation.spot_asset_value = calculation.spot_asset_value.safe_add(value)?;
    }

    for market_position in user.perp_positions.iter() {
        if market_position.is_available() {
            continue;
        }

        let market = perp_market_map.get_ref(&market_position.market_index)?;
        let (notional, unrealized_pnl) =
            calculate_perp_position_value_and_pnl(market_position, &market)?;

        calculation.unrealized_pnl = calculation.unrealized_pnl.safe_add(unrealized_pnl)?;
        calculation.total_perp_notional = calculation.total_perp_notional.safe_add(notional)?;
        calculation.margin_requirement = calculation.margin_requirement.safe_add(
            notional.apply_margin_ratio(market.get_margin_ratio(margin_requirement_type))?,
        )?;
    }

    calculation.total_collateral = calculation
        .spot_asset_value
        .safe_add(calculation.unrealized_pnl)?;

    Ok(calculation)
}

pub fn meets_initial_margin_requirement(
    user: &User,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
) -> ClearingHouseResult<bool> {
    calculate_margin_requirement_and_total_collateral(
        user,
        perp_market_map,
        spot_market_map,
        oracle_map,
        MarginRequirementType::Initial,
    )
    .map(|calculation| calculation.meets_margin_requirement())
}

pub fn meets_maintenance_margin_requirement(
    user: &User,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
) -> ClearingHouseResult<bool> {
    calculate_margin_requirement_and_total_collateral(
        user,
        perp_market_map,
        spot_market_map,
        oracle_map,
        MarginRequirementType::Maintenance,
    )
    .map(|calculation| calculation.meets_margin_requirement())
}

pub fn is_user_liquidatable(
    user: &User,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
) -> ClearingHouseResult<bool> {
    meets_maintenance_margin_requirement(user, perp_market_map, spot_market_map, oracle_map)
        .map(|meets| !meets)
}

/// `total_perp_notional / total_collateral` in MARGIN_PRECISION. Saturates when there is no
/// positive collateral backing open notional.
pub fn calculate_leverage(calculation: &MarginCalculation) -> ClearingHouseResult<u128> {
    if calculation.total_perp_notional.is_zero() {
        return Ok(0);
    }

    if !calculation.total_collateral.is_positive() {
        return Ok(u128::MAX);
    }

    calculation
        .total_perp_notional
        .value()
        .cast::<u128>()?
        .safe_mul(MARGIN_PRECISION)?
        .safe_div(calculation.total_collateral.value().cast()?)
}

/// Valuation price at which the user's maintenance requirement equals its collateral, holding
/// every other position and balance fixed.
///
/// With `b` the base amount, `p0` the current price, `m` the maintenance ratio and `free` the
/// collateral left after the requirement of everything but this position:
/// `p = (b * p0 - free) / (b - m * |b|)`. Floors at zero.
pub fn calculate_liquidation_price(
    user: &User,
    market_index: u16,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
) -> ClearingHouseResult<Price> {
    let market_position = *user.get_perp_position(market_index)?;

    validate!(
        market_position.is_open_position(),
        ErrorCode::UserHasNoPositionInMarket,
        "user has no base in market {}",
        market_index
    )?;

    let calculation = calculate_margin_requirement_and_total_collateral(
        user,
        perp_market_map,
        spot_market_map,
        oracle_map,
        MarginRequirementType::Maintenance,
    )?;

    let market = perp_market_map.get_ref(&market_index)?;
    let current_price = market.get_valuation_price()?;
    let margin_ratio = market.get_margin_ratio(MarginRequirementType::Maintenance);

    let (notional, _) = calculate_perp_position_value_and_pnl(&market_position, &market)?;
    let position_requirement = notional.apply_margin_ratio(margin_ratio)?;

    let free_collateral = calculation
        .free_collateral()?
        .safe_add(position_requirement)?
        .value()
        .cast::<i128>()?;

    let base_asset_amount = market_position.base_asset_amount.cast::<i128>()?;

    let numerator = base_asset_amount
        .safe_mul(current_price.value().cast()?)?
        .safe_div(PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO_I128)?
        .safe_sub(free_collateral)?;

    let denominator = base_asset_amount.safe_sub(
        base_asset_amount
            .unsigned_abs()
            .safe_mul(margin_ratio.value().cast()?)?
            .safe_div(MARGIN_PRECISION)?
            .cast()?,
    )?;

    if denominator == 0 {
        msg!("position in market {} can not be liquidated", market_index);
        return Ok(Price::ZERO);
    }

    let liquidation_price = numerator
        .safe_mul(PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO_I128)?
        .safe_div(denominator)?;

    if liquidation_price <= 0 {
        return Ok(Price::ZERO);
    }

    liquidation_price.cast::<i64>().map(Price)
}
