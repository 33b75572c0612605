use solana_program::msg;

use crate::controller::spot_balance::{transfer_spot_balances, update_spot_balances};
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::amm;
use crate::math::casting::Cast;
use crate::math::fixed_point::Price;
use crate::math::safe_math::SafeMath;
use crate::state::events::QuoteTrackerReconciliationRecord;
use crate::state::perp_market::PerpMarket;
use crate::state::spot_market::{SpotBalance, SpotBalanceType, SpotMarket};
use crate::state::user::{PerpPosition, User};
use crate::validate;


#[derive(Clone, Copy, PartialEq, Debug, Eq)]
pub enum SwapDirection {
    Add,
    Remove,
}

/// Swaps `base_asset_swap_amount` against the curve and returns the quote amount that changed
/// hands. `Remove` takes base out of the pool (user buys), `Add` puts it in (user sells).
pub fn swap_base_asset(
    market: &mut PerpMarket,
    base_asset_swap_amount: u64,
    direction: SwapDirection,
) -> ClearingHouseResult<u64> {
    let (new_quote_asset_reserve, new_base_asset_reserve) = amm::calculate_swap_output(
        base_asset_swap_amount.cast()?,
        market.amm.base_asset_reserve,
        direction,
        market.amm.sqrt_k,
    )?;

    let quote_asset_amount = amm::calculate_quote_asset_amount_swapped(
        market.amm.quote_asset_reserve,
        new_quote_asset_reserve,
        direction,
        market.amm.peg_multiplier,
    )?;

    market.amm.base_asset_reserve = new_base_asset_reserve;
    market.amm.quote_asset_reserve = new_quote_asset_reserve;

    quote_asset_amount.cast()
}

/// Resets the reserves so the mark price equals `target_price` while keeping `sqrt_k`.
pub fn move_price_to(market: &mut PerpMarket, target_price: Price) -> ClearingHouseResult {
    let (base_asset_reserve, quote_asset_reserve) = amm::calculate_reserves_for_price(
        market.amm.sqrt_k,
        market.amm.peg_multiplier,
        target_price,
    )?;

    market.amm.base_asset_reserve = base_asset_reserve;
    market.amm.quote_asset_reserve = quote_asset_reserve;

    Ok(())
}

/// Pays positive pnl out of the pnl pool (capped at what the pool holds) or takes negative pnl
/// into it. Returns the amount settled with the user.
pub fn update_pnl_pool_and_user_balance(
    market: &mut PerpMarket,
    bank: &mut SpotMarket,
    user: &mut User,
    unrealized_pnl: i128,
) -> ClearingHouseResult<i128> {
    let pnl_to_settle_with_user = if unrealized_pnl > 0 {
        unrealized_pnl.min(market.pnl_pool.balance().cast()?)
    } else {
        unrealized_pnl
    };

    if unrealized_pnl == 0 {
        msg!(
            "User has no unsettled pnl for market {}",
            market.market_index
        );
        return Ok(0);
    } else if pnl_to_settle_with_user == 0 {
        msg!(
            "Pnl Pool cannot currently settle with user for market {}",
            market.market_index
        );
        return Ok(0);
    }

    let user_spot_position = user.get_quote_spot_position_mut();

    transfer_spot_balances(
        pnl_to_settle_with_user,
        bank,
        &mut market.pnl_pool,
        user_spot_position,
    )?;

    Ok(pnl_to_settle_with_user)
}

/// Moves tokens out of the fee pool into the pnl pool.
pub fn transfer_fee_pool_to_pnl_pool(
    market: &mut PerpMarket,
    bank: &mut SpotMarket,
    amount: u128,
) -> ClearingHouseResult {
    validate!(
        market.amm.fee_pool.balance() >= amount,
        ErrorCode::InvalidAmmDetected,
        "fee pool holds {} < {}",
        market.amm.fee_pool.balance(),
        amount
    )?;

    update_spot_balances(
        amount,
        &SpotBalanceType::Borrow,
        bank,
        &mut market.amm.fee_pool,
    )?;

    update_spot_balances(
        amount,
        &SpotBalanceType::Deposit,
        bank,
        &mut market.pnl_pool,
    )?;

    Ok(())
}

/// Credits the fee pool with tokens that enter the market from outside the users' balances.
pub fn credit_fee_pool(
    market: &mut PerpMarket,
    bank: &mut SpotMarket,
    amount: u128,
) -> ClearingHouseResult {
    update_spot_balances(
        amount,
        &SpotBalanceType::Deposit,
        bank,
        &mut market.amm.fee_pool,
    )?;

    market.amm.total_fee_minus_distributions = market
        .amm
        .total_fee_minus_distributions
        .safe_add(amount.cast()?)?;

    Ok(())
}

/// Recomputes the long and short quote trackers from `positions`, every user's position in the
/// market, and overwrites the running totals with them.
pub fn reconcile_quote_asset_amounts(
    market: &mut PerpMarket,
    positions: &[PerpPosition],
    now: i64,
) -> ClearingHouseResult<QuoteTrackerReconciliationRecord> {
    let mut quote_asset_amount_long: i128 = 0;
    let mut quote_asset_amount_short: i128 = 0;

    for position in positions.iter().filter(|p| p.is_for(market.market_index)) {
        if position.base_asset_amount > 0 {
            quote_asset_amount_long =
                quote_asset_amount_long.safe_add(position.quote_asset_amount.cast()?)?;
        } else if position.base_asset_amount < 0 {
            quote_asset_amount_short =
                quote_asset_amount_short.safe_add(position.quote_asset_amount.cast()?)?;
        }
    }

    let record = QuoteTrackerReconciliationRecord {
        ts: now,
        market_index: market.market_index,
        quote_asset_amount_long_before: market.amm.quote_asset_amount_long,
        quote_asset_amount_long_after: quote_asset_amount_long,
        quote_asset_amount_short_before: market.amm.quote_asset_amount_short,
        quote_asset_amount_short_after: quote_asset_amount_short,
    };

    if record.quote_asset_amount_long_before != quote_asset_amount_long
        || record.quote_asset_amount_short_before != quote_asset_amount_short
    {
        msg!(
            "market {} quote trackers drifted: long {} -> {}, short {} -> {}",
            market.market_index,
            record.quote_asset_amount_long_before,
            quote_asset_amount_long,
            record.quote_asset_amount_short_before,
            quote_asset_amount_short
        );
    }

    market.amm.quote_asset_amount_long = quote_asset_amount_long;
    market.amm.quote_asset_amount_short = quote_asset_amount_short;

    Ok(record)
}
