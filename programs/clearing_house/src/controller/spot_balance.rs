use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::safe_math::SafeMath;
use crate::state::spot_market::{validate_balance_market, SpotBalance, SpotBalanceType, SpotMarket};
use crate::validate;

#[cfg(test)]
mod tests;

/// Moves `token_amount` into a balance in `update_direction`. A move against the balance's
/// current type first nets against it and flips the type with whatever is left.
pub fn update_spot_balances(
    mut token_amount: u128,
    update_direction: &SpotBalanceType,
    spot_market: &mut SpotMarket,
    spot_balance: &mut dyn SpotBalance,
) -> ClearingHouseResult {
    validate_balance_market(spot_balance, spot_market)?;

    if token_amount == 0 {
        return Ok(());
    }

    let increase_user_existing_balance = update_direction == spot_balance.balance_type();
    if increase_user_existing_balance {
        spot_balance.increase_balance(token_amount)?;
        spot_market.increase_balance(update_direction, token_amount)?;
    } else {
        let current_token_amount = spot_balance.balance();

        let reduce_user_existing_balance = current_token_amount != 0;
        if reduce_user_existing_balance {
            // determine how much to reduce balance based on size of current token amount
            let token_delta = current_token_amount.min(token_amount);
            let balance_type = *spot_balance.balance_type();

            spot_market.decrease_balance(&balance_type, token_delta)?;
            spot_balance.decrease_balance(token_delta)?;
            token_amount = token_amount.safe_sub(token_delta)?;
        }

        if token_amount > 0 {
            spot_balance.update_balance_type(*update_direction)?;
            spot_balance.increase_balance(token_amount)?;
            spot_market.increase_balance(update_direction, token_amount)?;
        }
    }

    Ok(())
}

/// Positive `token_amount` flows from `from_spot_balance` to `to_spot_balance`, negative the
/// other way.
pub fn transfer_spot_balances(
    token_amount: i128,
    spot_market: &mut SpotMarket,
    from_spot_balance: &mut dyn SpotBalance,
    to_spot_balance: &mut dyn SpotBalance,
) -> ClearingHouseResult {
    validate!(
        from_spot_balance.market_index() == to_spot_balance.market_index(),
        ErrorCode::InvalidSpotPosition,
        "transfer market indexes arent equal",
    )?;

    if token_amount == 0 {
        return Ok(());
    }

    if from_spot_balance.balance_type() == &SpotBalanceType::Deposit {
        validate!(
            spot_market.deposit_balance >= from_spot_balance.balance(),
            ErrorCode::InvalidSpotMarketState,
            "spot_market.deposit_balance={} lower than individual spot balance={}",
            spot_market.deposit_balance,
            from_spot_balance.balance()
        )?;
    }

    update_spot_balances(
        token_amount.unsigned_abs(),
        if token_amount < 0 {
            &SpotBalanceType::Deposit
        } else {
            &SpotBalanceType::Borrow
        },
        spot_market,
        from_spot_balance,
    )?;

    update_spot_balances(
        token_amount.unsigned_abs(),
        if token_amount < 0 {
            &SpotBalanceType::Borrow
        } else {
            &SpotBalanceType::Deposit
        },
        spot_market,
        to_spot_balance,
    )?;

    Ok(())
}
