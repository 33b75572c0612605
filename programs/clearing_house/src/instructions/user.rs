use anchor_lang::prelude::*;
use solana_program::msg;

use crate::controller;
use crate::controller::position::PositionDirection;
use crate::controller::spot_balance::update_spot_balances;
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::instructions::constraints::*;
use crate::math::casting::Cast;
use crate::math::fixed_point::Price;
use crate::math::margin::{meets_initial_margin_requirement, meets_maintenance_margin_requirement};
use crate::state::clearing_house::ClearingHouse;
use crate::state::events::{DepositDirection, DepositRecord, TradeRecord};
use crate::state::oracle::PriceFeed;
use crate::state::spot_market::SpotBalanceType;
use crate::state::user::User;
use crate::validate;

/// Credits `amount` to the user's balance in `market_index`, creating the user on its first
/// deposit. A borrow is repaid before anything is deposited. A user being liquidated who is back
/// above maintenance margin afterwards is set active again.
pub fn handle_deposit(
    ch: &mut ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: Pubkey,
    market_index: u16,
    amount: u64,
) -> ClearingHouseResult<DepositRecord> {
    deposit_not_paused(&ch.state)?;

    if amount == 0 {
        return Err(ErrorCode::InsufficientDeposit);
    }

    if !ch.user_map.contains(&authority) {
        msg!("initializing user {}", authority);
        ch.user_map.insert(User::new(authority));
    }

    let now = clock.unix_timestamp;
    let mut oracle_map = ch.oracle_map(price_feed, clock);

    let user = &mut ch.user_map.get_ref_mut(&authority)?;

    validate!(!user.is_bankrupt(), ErrorCode::UserBankrupt)?;

    let (oracle_price, market_deposit_balance, market_borrow_balance) = {
        let spot_market = &mut ch.spot_market_map.get_ref_mut(&market_index)?;
        let oracle_price = oracle_map.get_price_data(&spot_market.oracle)?.price;

        let spot_position = user.force_get_spot_position_mut(spot_market.market_index)?;

        update_spot_balances(
            amount.cast()?,
            &SpotBalanceType::Deposit,
            spot_market,
            spot_position,
        )?;

        (
            oracle_price,
            spot_market.deposit_balance,
            spot_market.borrow_balance,
        )
    };

    if user.is_being_liquidated()
        && meets_maintenance_margin_requirement(
            user,
            &ch.perp_market_map,
            &ch.spot_market_map,
            &mut oracle_map,
        )?
    {
        msg!("deposit brings user {} back above maintenance margin", authority);
        user.exit_liquidation();
    }

    let deposit_record = DepositRecord {
        ts: now,
        user_authority: user.authority,
        direction: DepositDirection::Deposit,
        amount,
        market_index,
        oracle_price: oracle_price.value(),
        market_deposit_balance,
        market_borrow_balance,
    };

    Ok(deposit_record)
}

/// Takes `amount` out of the user's deposit. The user must hold at least `amount` and still meet
/// its initial margin requirement afterwards.
pub fn handle_withdraw(
    ch: &mut ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: Pubkey,
    market_index: u16,
    amount: u64,
) -> ClearingHouseResult<DepositRecord> {
    withdraw_not_paused(&ch.state)?;

    if amount == 0 {
        return Err(ErrorCode::InsufficientDeposit);
    }

    let now = clock.unix_timestamp;
    let mut oracle_map = ch.oracle_map(price_feed, clock);

    let user = &mut ch.user_map.get_ref_mut(&authority)?;

    validate!(!user.is_bankrupt(), ErrorCode::UserBankrupt)?;

    validate!(
        !user.is_being_liquidated(),
        ErrorCode::InsufficientCollateral,
        "user {} is being liquidated",
        authority
    )?;

    let (oracle_price, market_deposit_balance, market_borrow_balance) = {
        let spot_market = &mut ch.spot_market_map.get_ref_mut(&market_index)?;
        let oracle_price = oracle_map.get_price_data(&spot_market.oracle)?.price;

        let spot_position = user.get_spot_position_mut(market_index)?;

        validate!(
            spot_position.balance_type == SpotBalanceType::Deposit
                && spot_position.balance >= amount,
            ErrorCode::InsufficientDeposit,
            "user {} holds {} {:?} in spot market {}, withdrawing {}",
            authority,
            spot_position.balance,
            spot_position.balance_type,
            market_index,
            amount
        )?;

        update_spot_balances(
            amount.cast()?,
            &SpotBalanceType::Borrow,
            spot_market,
            spot_position,
        )?;

        (
            oracle_price,
            spot_market.deposit_balance,
            spot_market.borrow_balance,
        )
    };

    validate!(
        meets_initial_margin_requirement(
            user,
            &ch.perp_market_map,
            &ch.spot_market_map,
            &mut oracle_map
        )?,
        ErrorCode::InsufficientCollateral,
        "withdraw leaves user {} below initial margin",
        authority
    )?;

    let withdraw_record = DepositRecord {
        ts: now,
        user_authority: user.authority,
        direction: DepositDirection::Withdraw,
        amount,
        market_index,
        oracle_price: oracle_price.value(),
        market_deposit_balance,
        market_borrow_balance,
    };

    Ok(withdraw_record)
}

pub fn handle_open_position(
    ch: &mut ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: Pubkey,
    direction: PositionDirection,
    base_asset_amount: u64,
    market_index: u16,
    limit_price: Price,
) -> ClearingHouseResult<TradeRecord> {
    amm_not_paused(&ch.state)?;

    let mut oracle_map = ch.oracle_map(price_feed, clock);
    let user = &mut ch.user_map.get_ref_mut(&authority)?;

    controller::orders::open_position(
        market_index,
        direction,
        base_asset_amount,
        limit_price,
        user,
        &ch.perp_market_map,
        &ch.spot_market_map,
        &mut oracle_map,
        &ch.state.perp_fee_structure,
        clock.unix_timestamp,
    )
}
