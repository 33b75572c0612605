use solana_program::msg;

use crate::controller::position::{update_position_and_market, PositionDelta};
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::bankruptcy::is_user_bankrupt;
use crate::math::casting::Cast;
use crate::math::liquidation::{
    calculate_base_asset_amount_to_liquidate, calculate_liquidation_deltas,
    calculate_liquidation_quote_amount_and_fee, calculate_liquidation_transfer_price,
};
use crate::math::margin::{
    calculate_margin_requirement_and_total_collateral, meets_initial_margin_requirement,
    MarginRequirementType,
};
use crate::math::safe_math::SafeMath;
use crate::math_error;
use crate::state::events::LiquidationRecord;
use crate::state::oracle_map::OracleMap;
use crate::state::perp_market::MarketStatus;
use crate::state::perp_market_map::PerpMarketMap;
use crate::state::spot_market_map::SpotMarketMap;
use crate::state::user::User;
use crate::validate;


/// Moves up to `liquidator_max_base_asset_amount` of an under-margined user's position in
/// `market_index` onto the liquidator at a discount to the mark price.
///
/// Returns `None` without moving anything when a user already being liquidated has recovered
/// maintenance margin; the user is set back to active.
pub fn liquidate_perp(
    market_index: u16,
    liquidator_max_base_asset_amount: u64,
    user: &mut User,
    liquidator: &mut User,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
    now: i64,
) -> ClearingHouseResult<Option<LiquidationRecord>> {
    validate!(
        liquidator_max_base_asset_amount > 0,
        ErrorCode::InvalidLiquidationAmount,
        "liquidator_max_base_asset_amount must be positive"
    )?;

    validate!(
        user.authority != liquidator.authority,
        ErrorCode::InvalidLiquidationAmount,
        "user {} can not liquidate themselves",
        user.authority
    )?;

    validate!(!user.is_bankrupt(), ErrorCode::UserBankrupt, "user bankrupt")?;

    validate!(
        !liquidator.is_bankrupt(),
        ErrorCode::UserBankrupt,
        "liquidator bankrupt"
    )?;

    validate!(
        !liquidator.is_being_liquidated(),
        ErrorCode::InsufficientCollateral,
        "liquidator is being liquidated"
    )?;

    {
        let market = perp_market_map.get_ref(&market_index)?;
        match market.status {
            MarketStatus::Active | MarketStatus::ReduceOnly => {}
            MarketStatus::Settlement => {
                msg!(
                    "market {} is in settlement, positions close at the expiry price",
                    market_index
                );
                return Err(ErrorCode::InvalidMarketStatus);
            }
        }
    }

    let margin_before = calculate_margin_requirement_and_total_collateral(
        user,
        perp_market_map,
        spot_market_map,
        oracle_map,
        MarginRequirementType::Maintenance,
    )?;

    if !user.is_being_liquidated() && margin_before.meets_margin_requirement() {
        msg!(
            "total_collateral {} >= margin_requirement {}",
            margin_before.total_collateral,
            margin_before.margin_requirement
        );
        return Err(ErrorCode::NotLiquidatable);
    } else if user.is_being_liquidated() && margin_before.meets_margin_requirement() {
        msg!("user {} recovered, exiting liquidation", user.authority);
        user.exit_liquidation();
        return Ok(None);
    }

    let user_position = *user.get_perp_position(market_index).map_err(|e| {
        msg!(
            "User does not have a position for perp market {}",
            market_index
        );
        e
    })?;

    validate!(
        user_position.is_open_position(),
        ErrorCode::UserHasNoPositionInMarket,
        "user has no base in perp market {}",
        market_index
    )?;

    let liquidation_id = if user.is_being_liquidated() {
        user.next_liquidation_id
            .checked_sub(1)
            .ok_or_else(math_error!())?
    } else {
        user.enter_liquidation()
    };

    let (base_asset_amount_delta, quote_asset_amount_delta, mark_price, transfer_price, fee) = {
        let market = &mut perp_market_map.get_ref_mut(&market_index)?;

        let mark_price = market.amm.reserve_price()?;
        let user_direction = user_position.get_direction();

        let base_asset_amount = calculate_base_asset_amount_to_liquidate(
            liquidator_max_base_asset_amount,
            user_position.base_asset_amount,
            market.amm.order_step_size,
        )?;

        let transfer_price =
            calculate_liquidation_transfer_price(mark_price, user_direction, market.liquidator_fee)?;

        let (quote_asset_amount, fee) =
            calculate_liquidation_quote_amount_and_fee(base_asset_amount, mark_price, transfer_price)?;

        let (base_asset_amount_delta, quote_asset_amount_delta) =
            calculate_liquidation_deltas(user_direction, base_asset_amount, quote_asset_amount)?;

        let user_position = user.get_perp_position_mut(market_index)?;
        update_position_and_market(
            user_position,
            market,
            &PositionDelta {
                base_asset_amount: base_asset_amount_delta,
                quote_asset_amount: quote_asset_amount_delta,
            },
        )?;

        let liquidator_position = liquidator.force_get_perp_position_mut(market_index).map_err(|e| {
            msg!(
                "Liquidator has no available positions to take on perp position in market {}",
                market_index
            );
            e
        })?;
        update_position_and_market(
            liquidator_position,
            market,
            &PositionDelta {
                base_asset_amount: base_asset_amount_delta
                    .checked_neg()
                    .ok_or_else(math_error!())?,
                quote_asset_amount: quote_asset_amount_delta
                    .checked_neg()
                    .ok_or_else(math_error!())?,
            },
        )?;

        market.amm.total_liquidation_fee = market
            .amm
            .total_liquidation_fee
            .safe_add(fee.unsigned_abs().cast()?)?;

        (
            base_asset_amount_delta,
            quote_asset_amount_delta,
            mark_price,
            transfer_price,
            fee,
        )
    };

    validate!(
        meets_initial_margin_requirement(liquidator, perp_market_map, spot_market_map, oracle_map)?,
        ErrorCode::InsufficientCollateral,
        "liquidator {} does not meet initial margin after taking over the position",
        liquidator.authority
    )?;

    let margin_after = calculate_margin_requirement_and_total_collateral(
        user,
        perp_market_map,
        spot_market_map,
        oracle_map,
        MarginRequirementType::Maintenance,
    )?;

    if is_user_bankrupt(user, margin_after.total_collateral) {
        msg!(
            "user {} bankrupt with total_collateral {}",
            user.authority,
            margin_after.total_collateral
        );
        user.enter_bankruptcy();
    } else if margin_after.meets_margin_requirement() {
        user.exit_liquidation();
    }

    let record = LiquidationRecord {
        ts: now,
        liquidation_id,
        user: user.authority,
        liquidator: liquidator.authority,
        market_index,
        base_asset_amount: base_asset_amount_delta,
        quote_asset_amount: quote_asset_amount_delta,
        mark_price: mark_price.value(),
        transfer_price: transfer_price.value(),
        liquidator_fee: fee.unsigned_abs(),
        total_collateral_before: margin_before.total_collateral.value(),
        margin_requirement_before: margin_before.margin_requirement.value(),
        total_collateral_after: margin_after.total_collateral.value(),
        margin_requirement_after: margin_after.margin_requirement.value(),
        user_status_after: user.status,
    };

    Ok(Some(record))
}
