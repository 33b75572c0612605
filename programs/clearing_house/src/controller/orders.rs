use solana_program::msg;

use crate::controller::amm::swap_base_asset;
use crate::controller::position::{update_position_and_market, PositionDelta, PositionDirection};
use crate::controller::spot_balance::transfer_spot_balances;
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::casting::Cast;
use crate::math::fees::{calculate_fee_for_trade, FeeResult};
use crate::math::fixed_point::{BaseAssetAmount, Price, QuoteAmount};
use crate::math::margin::meets_initial_margin_requirement;
use crate::math::position::{
    is_multiple_of_step_size, is_trade_risk_increasing, swap_direction_for_trade,
};
use crate::math::safe_math::SafeMath;
use crate::state::events::TradeRecord;
use crate::state::oracle_map::OracleMap;
use crate::state::perp_market::{MarketStatus, PerpMarket};
use crate::state::perp_market_map::PerpMarketMap;
use crate::state::spot_market::SpotMarket;
use crate::state::spot_market_map::SpotMarketMap;
use crate::state::state::FeeStructure;
use crate::state::user::User;
use crate::validate;


/// Fills `base_asset_amount` against the market's amm. A non-zero `limit_price` bounds the
/// average fill price.
pub fn open_position(
    market_index: u16,
    direction: PositionDirection,
    base_asset_amount: u64,
    limit_price: Price,
    user: &mut User,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
    fee_structure: &FeeStructure,
    now: i64,
) -> ClearingHouseResult<TradeRecord> {
    validate!(!user.is_bankrupt(), ErrorCode::UserBankrupt, "user bankrupt")?;

    validate!(
        !user.is_being_liquidated(),
        ErrorCode::InsufficientCollateral,
        "user is being liquidated"
    )?;

    validate!(
        base_asset_amount > 0,
        ErrorCode::TradeSizeTooSmall,
        "base_asset_amount must be positive"
    )?;

    let existing_base_asset_amount = user
        .get_perp_position(market_index)
        .map(|position| position.base_asset_amount)
        .unwrap_or(0);

    let risk_increasing =
        is_trade_risk_increasing(&direction, base_asset_amount, existing_base_asset_amount);

    let record = {
        let market = &mut perp_market_map.get_ref_mut(&market_index)?;

        match market.status {
            MarketStatus::Active => {}
            MarketStatus::ReduceOnly => {
                validate!(
                    !risk_increasing,
                    ErrorCode::InvalidMarketStatus,
                    "market {} is reduce only",
                    market_index
                )?;
            }
            MarketStatus::Settlement => {
                msg!("market {} is in settlement", market_index);
                return Err(ErrorCode::InvalidMarketStatus);
            }
        }

        validate!(
            is_multiple_of_step_size(base_asset_amount, market.amm.order_step_size)?,
            ErrorCode::InvalidBaseAssetAmount,
            "base_asset_amount {} not a multiple of step size {}",
            base_asset_amount,
            market.amm.order_step_size
        )?;

        let mark_price_before = market.amm.reserve_price()?;

        let quote_asset_amount =
            swap_base_asset(market, base_asset_amount, swap_direction_for_trade(direction))?;

        let base = BaseAssetAmount(base_asset_amount.cast()?);
        let quote = QuoteAmount(quote_asset_amount.cast()?);

        if limit_price.is_positive() {
            let fill_price = Price::from_fill(quote, base)?;
            let within_limit = match direction {
                PositionDirection::Long => fill_price <= limit_price,
                PositionDirection::Short => fill_price >= limit_price,
            };

            validate!(
                within_limit,
                ErrorCode::SlippageOutsideLimit,
                "fill price {} beyond limit {}",
                fill_price,
                limit_price
            )?;
        }

        let delta = match direction {
            PositionDirection::Long => PositionDelta {
                base_asset_amount: base.value(),
                quote_asset_amount: quote.safe_neg()?.value(),
            },
            PositionDirection::Short => PositionDelta {
                base_asset_amount: base.safe_neg()?.value(),
                quote_asset_amount: quote.value(),
            },
        };

        let position = user.force_get_perp_position_mut(market_index)?;
        let pnl = update_position_and_market(position, market, &delta)?;

        let fees = calculate_fee_for_trade(
            quote_asset_amount,
            fee_structure,
            market.amm.base_spread,
        )?;

        let spot_market = &mut spot_market_map.get_ref_mut(&market.quote_spot_market_index)?;
        pay_fees(&fees, user, market, spot_market)?;

        TradeRecord {
            ts: now,
            user_authority: user.authority,
            direction,
            base_asset_amount,
            quote_asset_amount,
            mark_price_before: mark_price_before.value(),
            mark_price_after: market.amm.reserve_price()?.value(),
            exchange_fee: fees.exchange_fee,
            mm_fee: fees.mm_fee,
            pnl,
            market_index,
        }
    };

    if risk_increasing {
        validate!(
            meets_initial_margin_requirement(user, perp_market_map, spot_market_map, oracle_map)?,
            ErrorCode::InsufficientCollateral,
            "user {} does not meet initial margin after trade",
            user.authority
        )?;
    }

    Ok(record)
}

/// Exchange fee goes to the fee pool, the market maker fee to the pnl pool. Both come out of the
/// user's quote deposit.
fn pay_fees(
    fees: &FeeResult,
    user: &mut User,
    market: &mut PerpMarket,
    spot_market: &mut SpotMarket,
) -> ClearingHouseResult {
    let user_fee = fees.user_fee()?;

    transfer_spot_balances(
        fees.exchange_fee.cast()?,
        spot_market,
        user.get_quote_spot_position_mut(),
        &mut market.amm.fee_pool,
    )?;

    transfer_spot_balances(
        fees.mm_fee.cast()?,
        spot_market,
        user.get_quote_spot_position_mut(),
        &mut market.pnl_pool,
    )?;

    market.amm.total_exchange_fee = market
        .amm
        .total_exchange_fee
        .safe_add(fees.exchange_fee.cast()?)?;
    market.amm.total_mm_fee = market.amm.total_mm_fee.safe_add(fees.mm_fee.cast()?)?;
    market.amm.total_fee = market.amm.total_fee.safe_add(user_fee.cast()?)?;
    market.amm.total_fee_minus_distributions = market
        .amm
        .total_fee_minus_distributions
        .safe_add(user_fee.cast()?)?;

    user.total_fee_paid = user.total_fee_paid.safe_add(user_fee)?;

    Ok(())
}
