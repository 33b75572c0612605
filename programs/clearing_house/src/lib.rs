#![allow(clippy::too_many_arguments)]
#![allow(clippy::comparison_chain)]

use anchor_lang::prelude::*;

pub mod controller;
pub mod error;
pub mod instructions;
pub mod macros;
pub mod math;
pub mod state;
#[cfg(test)]
mod test_utils;
mod validation;

#[cfg(feature = "mainnet-beta")]
declare_id!("dammHkt7jmytvbS3nHTxQNEcP59aE57nxwV21YdqEDN");
#[cfg(not(feature = "mainnet-beta"))]
declare_id!("4oyTJnAQ9FqJj1y9mPytbWsLeeHmBzGYfuFqypwyQvuh");

/// Entry points of the clearing house. Every mutating operation runs inside
/// [`ClearingHouse::transact`](state::clearing_house::ClearingHouse::transact): it either commits
/// all of its effects or returns the error with every record untouched. Events are logged once the
/// operation has committed.
pub mod clearing_house {
    use super::*;

    use crate::controller::position::PositionDirection;
    use crate::error::ClearingHouseResult;
    use crate::instructions::*;
    use crate::math::fixed_point::Price;
    use crate::state::clearing_house::ClearingHouse;
    use crate::state::events::{
        CurveRecord, DepositRecord, InsuranceFundRecord, LiquidationRecord, MarketStatusRecord,
        QuoteTrackerReconciliationRecord, SettlePnlRecord, TradeRecord,
    };
    use crate::state::oracle::{OracleSource, PriceFeed};
    use crate::state::state::{FeeStructure, OracleGuardRails};

    pub use crate::instructions::{
        get_perp_market_account, get_spot_market_account, get_user_account,
        insurance_vault_balance, is_liquidatable, leverage, liquidation_price, margin_requirement,
        spot_market_asset_value, total_collateral,
    };

    // admin

    pub fn initialize(admin: Pubkey) -> ClearingHouse {
        handle_initialize(admin)
    }

    pub fn initialize_spot_market(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        oracle: Pubkey,
        oracle_source: OracleSource,
        decimals: u32,
    ) -> ClearingHouseResult<u16> {
        ch.transact(|ch| handle_initialize_spot_market(ch, admin, oracle, oracle_source, decimals))
    }

    pub fn initialize_market(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        oracle: Pubkey,
        amm_base_asset_reserve: u128,
        amm_quote_asset_reserve: u128,
        amm_peg_multiplier: u128,
        margin_ratio_initial: u32,
        margin_ratio_maintenance: u32,
    ) -> ClearingHouseResult<u16> {
        ch.transact(|ch| {
            handle_initialize_market(
                ch,
                admin,
                oracle,
                amm_base_asset_reserve,
                amm_quote_asset_reserve,
                amm_peg_multiplier,
                margin_ratio_initial,
                margin_ratio_maintenance,
            )
        })
    }

    pub fn update_market_expiry(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        clock: &Clock,
        market_index: u16,
        expiry_ts: i64,
    ) -> ClearingHouseResult<MarketStatusRecord> {
        let record = ch.transact(|ch| {
            handle_update_market_expiry(ch, admin, clock, market_index, expiry_ts)
        })?;
        emit!(record);

        Ok(record)
    }

    pub fn move_amm_price(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        clock: &Clock,
        market_index: u16,
        target_price: Price,
    ) -> ClearingHouseResult<CurveRecord> {
        let record =
            ch.transact(|ch| handle_move_amm_price(ch, admin, clock, market_index, target_price))?;
        emit!(record);

        Ok(record)
    }

    pub fn update_k(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        clock: &Clock,
        market_index: u16,
        sqrt_k: u128,
    ) -> ClearingHouseResult<CurveRecord> {
        let record = ch.transact(|ch| handle_update_k(ch, admin, clock, market_index, sqrt_k))?;
        emit!(record);

        Ok(record)
    }

    pub fn update_perp_market_margin_ratio(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        market_index: u16,
        margin_ratio_initial: u32,
        margin_ratio_maintenance: u32,
    ) -> ClearingHouseResult {
        ch.transact(|ch| {
            handle_update_perp_market_margin_ratio(
                ch,
                admin,
                market_index,
                margin_ratio_initial,
                margin_ratio_maintenance,
            )
        })
    }

    pub fn update_perp_market_liquidation_fee(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        market_index: u16,
        liquidator_fee: u32,
    ) -> ClearingHouseResult {
        ch.transact(|ch| {
            handle_update_perp_market_liquidation_fee(ch, admin, market_index, liquidator_fee)
        })
    }

    pub fn update_perp_market_base_spread(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        market_index: u16,
        base_spread: u32,
    ) -> ClearingHouseResult {
        ch.transact(|ch| {
            handle_update_perp_market_base_spread(ch, admin, market_index, base_spread)
        })
    }

    pub fn update_curve_update_intensity(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        market_index: u16,
        curve_update_intensity: u8,
    ) -> ClearingHouseResult {
        ch.transact(|ch| {
            handle_update_curve_update_intensity(ch, admin, market_index, curve_update_intensity)
        })
    }

    pub fn update_perp_market_step_size(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        market_index: u16,
        order_step_size: u64,
    ) -> ClearingHouseResult {
        ch.transact(|ch| {
            handle_update_perp_market_step_size(ch, admin, market_index, order_step_size)
        })
    }

    pub fn update_perp_fee_structure(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        fee_structure: FeeStructure,
    ) -> ClearingHouseResult {
        ch.transact(|ch| handle_update_perp_fee_structure(ch, admin, fee_structure))
    }

    pub fn update_oracle_guard_rails(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        oracle_guard_rails: OracleGuardRails,
    ) -> ClearingHouseResult {
        ch.transact(|ch| handle_update_oracle_guard_rails(ch, admin, oracle_guard_rails))
    }

    pub fn update_exchange_status(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        exchange_status: u8,
    ) -> ClearingHouseResult {
        ch.transact(|ch| handle_update_exchange_status(ch, admin, exchange_status))
    }

    pub fn deposit_into_insurance_fund(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        clock: &Clock,
        amount: u64,
    ) -> ClearingHouseResult<InsuranceFundRecord> {
        let record =
            ch.transact(|ch| handle_deposit_into_insurance_fund(ch, admin, clock, amount))?;
        emit!(record);

        Ok(record)
    }

    pub fn withdraw_from_insurance_vault_to_market(
        ch: &mut ClearingHouse,
        admin: &Pubkey,
        clock: &Clock,
        market_index: u16,
        amount: u64,
    ) -> ClearingHouseResult<InsuranceFundRecord> {
        let record = ch.transact(|ch| {
            handle_withdraw_from_insurance_vault_to_market(ch, admin, clock, market_index, amount)
        })?;
        emit!(record);

        Ok(record)
    }

    // user

    pub fn deposit(
        ch: &mut ClearingHouse,
        clock: &Clock,
        price_feed: &dyn PriceFeed,
        authority: Pubkey,
        market_index: u16,
        amount: u64,
    ) -> ClearingHouseResult<DepositRecord> {
        let record = ch.transact(|ch| {
            handle_deposit(ch, clock, price_feed, authority, market_index, amount)
        })?;
        emit!(record);

        Ok(record)
    }

    pub fn withdraw(
        ch: &mut ClearingHouse,
        clock: &Clock,
        price_feed: &dyn PriceFeed,
        authority: Pubkey,
        market_index: u16,
        amount: u64,
    ) -> ClearingHouseResult<DepositRecord> {
        let record = ch.transact(|ch| {
            handle_withdraw(ch, clock, price_feed, authority, market_index, amount)
        })?;
        emit!(record);

        Ok(record)
    }

    pub fn open_position(
        ch: &mut ClearingHouse,
        clock: &Clock,
        price_feed: &dyn PriceFeed,
        authority: Pubkey,
        direction: PositionDirection,
        base_asset_amount: u64,
        market_index: u16,
        limit_price: Price,
    ) -> ClearingHouseResult<TradeRecord> {
        let record = ch.transact(|ch| {
            handle_open_position(
                ch,
                clock,
                price_feed,
                authority,
                direction,
                base_asset_amount,
                market_index,
                limit_price,
            )
        })?;
        emit!(record);

        Ok(record)
    }

    // keeper

    pub fn liquidate_perp(
        ch: &mut ClearingHouse,
        clock: &Clock,
        price_feed: &dyn PriceFeed,
        liquidator_authority: Pubkey,
        user_authority: Pubkey,
        market_index: u16,
        liquidator_max_base_asset_amount: u64,
    ) -> ClearingHouseResult<Option<LiquidationRecord>> {
        let record = ch.transact(|ch| {
            handle_liquidate_perp(
                ch,
                clock,
                price_feed,
                liquidator_authority,
                user_authority,
                market_index,
                liquidator_max_base_asset_amount,
            )
        })?;

        if let Some(record) = record {
            emit!(record);
        }

        Ok(record)
    }

    pub fn settle_pnl(
        ch: &mut ClearingHouse,
        clock: &Clock,
        price_feed: &dyn PriceFeed,
        user_authority: Pubkey,
        market_index: u16,
    ) -> ClearingHouseResult<SettlePnlRecord> {
        let record = ch.transact(|ch| {
            handle_settle_pnl(ch, clock, price_feed, user_authority, market_index)
        })?;
        emit!(record);

        Ok(record)
    }

    pub fn settle_expired_market(
        ch: &mut ClearingHouse,
        clock: &Clock,
        price_feed: &dyn PriceFeed,
        market_index: u16,
    ) -> ClearingHouseResult<MarketStatusRecord> {
        let record =
            ch.transact(|ch| handle_settle_expired_market(ch, clock, price_feed, market_index))?;
        emit!(record);

        Ok(record)
    }

    pub fn settle_expired_position(
        ch: &mut ClearingHouse,
        clock: &Clock,
        user_authority: Pubkey,
        market_index: u16,
    ) -> ClearingHouseResult<SettlePnlRecord> {
        let record = ch.transact(|ch| {
            handle_settle_expired_position(ch, clock, user_authority, market_index)
        })?;
        emit!(record);

        Ok(record)
    }

    pub fn reconcile_quote_asset_amounts(
        ch: &mut ClearingHouse,
        clock: &Clock,
        market_index: u16,
    ) -> ClearingHouseResult<QuoteTrackerReconciliationRecord> {
        let record =
            ch.transact(|ch| handle_reconcile_quote_asset_amounts(ch, clock, market_index))?;
        emit!(record);

        Ok(record)
    }
}
