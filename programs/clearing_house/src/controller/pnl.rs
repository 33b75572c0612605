use solana_program::msg;

use crate::controller::amm::{transfer_fee_pool_to_pnl_pool, update_pnl_pool_and_user_balance};
use crate::controller::insurance::transfer_insurance_fund_to_market;
use crate::controller::position::{
    get_position_index, update_position_and_market, update_quote_asset_amount, update_settled_pnl,
    PositionDelta,
};
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::casting::Cast;
use crate::math::margin::meets_maintenance_margin_requirement;
use crate::math::safe_math::SafeMath;
use crate::state::events::{SettlePnlExplanation, SettlePnlRecord};
use crate::state::oracle_map::OracleMap;
use crate::state::perp_market::MarketStatus;
use crate::state::perp_market_map::PerpMarketMap;
use crate::state::spot_market::SpotBalance;
use crate::state::spot_market_map::SpotMarketMap;
use crate::state::user::User;
use crate::{math_error, validate};

#[cfg(test)]
mod tests;

/// Realizes the unrealized pnl of an open or closed position against the market's pnl pool
/// without touching its base.
pub fn settle_pnl(
    market_index: u16,
    user: &mut User,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    oracle_map: &mut OracleMap,
    now: i64,
) -> ClearingHouseResult<SettlePnlRecord> {
    validate!(
        !user.is_bankrupt(),
        ErrorCode::UserBankrupt,
        "user {} is bankrupt",
        user.authority
    )?;

    {
        let market = perp_market_map.get_ref(&market_index)?;
        match market.status {
            MarketStatus::Active | MarketStatus::ReduceOnly => {}
            MarketStatus::Settlement => {
                msg!(
                    "market {} is in settlement, use settle_expired_position",
                    market_index
                );
                return Err(ErrorCode::InvalidMarketStatus);
            }
        }
    }

    let position_index = get_position_index(&user.perp_positions, market_index)?;

    let unrealized_pnl = {
        let market = perp_market_map.get_ref(&market_index)?;
        user.perp_positions[position_index]
            .get_unrealized_pnl(market.get_valuation_price()?)?
    };

    // paying a loss out of a position in liquidation territory is the liquidator's job
    if unrealized_pnl.is_negative()
        && !meets_maintenance_margin_requirement(
            user,
            perp_market_map,
            spot_market_map,
            oracle_map,
        )?
    {
        msg!("user {} does not meet maintenance margin", user.authority);
        return Err(ErrorCode::InsufficientCollateralForSettlingPNL);
    }

    let market = &mut perp_market_map.get_ref_mut(&market_index)?;
    let spot_market = &mut spot_market_map.get_ref_mut(&market.quote_spot_market_index)?;

    let pnl_to_settle_with_user = update_pnl_pool_and_user_balance(
        market,
        spot_market,
        user,
        unrealized_pnl.value().cast()?,
    )?
    .cast::<i64>()?;

    update_quote_asset_amount(
        &mut user.perp_positions[position_index],
        market,
        -pnl_to_settle_with_user,
    )?;

    update_settled_pnl(user, position_index, pnl_to_settle_with_user)?;

    let position = &user.perp_positions[position_index];
    let record = SettlePnlRecord {
        ts: now,
        user: user.authority,
        market_index,
        pnl: pnl_to_settle_with_user.cast()?,
        base_asset_amount: position.base_asset_amount,
        quote_asset_amount_after: position.quote_asset_amount,
        quote_entry_amount: position.quote_entry_amount,
        settle_price: market.get_valuation_price()?.value(),
        insurance_fund_draw: 0,
        explanation: SettlePnlExplanation::None,
    };

    Ok(record)
}

/// Closes a position in a settled market at the expiry price and pays out everything it is
/// owed. A payout the pnl pool can't cover is drawn from the insurance fund first.
pub fn settle_expired_position(
    market_index: u16,
    user: &mut User,
    perp_market_map: &PerpMarketMap,
    spot_market_map: &SpotMarketMap,
    now: i64,
) -> ClearingHouseResult<SettlePnlRecord> {
    let market = &mut perp_market_map.get_ref_mut(&market_index)?;

    validate!(
        market.is_in_settlement(),
        ErrorCode::InvalidMarketStatus,
        "market {} is not in settlement",
        market_index
    )?;

    let settle_price = market.get_valuation_price()?;
    let position_index = get_position_index(&user.perp_positions, market_index)?;
    let base_asset_amount = user.perp_positions[position_index].base_asset_amount;

    if base_asset_amount != 0 {
        let delta = PositionDelta {
            quote_asset_amount: user.perp_positions[position_index]
                .base()
                .quote_value(settle_price)?
                .value(),
            base_asset_amount: base_asset_amount
                .checked_neg()
                .ok_or_else(math_error!())?,
        };

        update_position_and_market(&mut user.perp_positions[position_index], market, &delta)?;
    }

    let pnl = user.perp_positions[position_index].quote_asset_amount;

    let spot_market = &mut spot_market_map.get_ref_mut(&market.quote_spot_market_index)?;

    let mut insurance_fund_draw = 0_u64;
    let pnl_pool_balance = market.pnl_pool.balance();
    if pnl > 0 && pnl.cast::<u128>()? > pnl_pool_balance {
        let deficit = pnl.cast::<u128>()?.safe_sub(pnl_pool_balance)?;
        msg!(
            "pnl pool short {} for market {}, drawing on insurance fund",
            deficit,
            market_index
        );

        transfer_insurance_fund_to_market(deficit.cast()?, spot_market, market, now)?;
        transfer_fee_pool_to_pnl_pool(market, spot_market, deficit)?;
        insurance_fund_draw = deficit.cast()?;
    }

    let pnl_to_settle_with_user =
        update_pnl_pool_and_user_balance(market, spot_market, user, pnl.cast()?)?.cast::<i64>()?;

    update_quote_asset_amount(
        &mut user.perp_positions[position_index],
        market,
        -pnl_to_settle_with_user,
    )?;

    update_settled_pnl(user, position_index, pnl_to_settle_with_user)?;

    let position = &user.perp_positions[position_index];

    validate!(
        position.is_available(),
        ErrorCode::InvalidPerpPosition,
        "position in market {} left with base {} quote {}",
        market_index,
        position.base_asset_amount,
        position.quote_asset_amount
    )?;

    let record = SettlePnlRecord {
        ts: now,
        user: user.authority,
        market_index,
        pnl: pnl_to_settle_with_user.cast()?,
        base_asset_amount,
        quote_asset_amount_after: position.quote_asset_amount,
        quote_entry_amount: position.quote_entry_amount,
        settle_price: settle_price.value(),
        insurance_fund_draw,
        explanation: SettlePnlExplanation::ExpiredPosition,
    };

    Ok(record)
}
