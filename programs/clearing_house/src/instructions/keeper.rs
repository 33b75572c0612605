use anchor_lang::prelude::*;
use solana_program::msg;

use crate::controller;
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::instructions::constraints::*;
use crate::state::clearing_house::ClearingHouse;
use crate::state::events::{
    LiquidationRecord, MarketStatusRecord, QuoteTrackerReconciliationRecord, SettlePnlRecord,
};
use crate::state::oracle::PriceFeed;
use crate::state::user::PerpPosition;
use crate::validate;

pub fn handle_liquidate_perp(
    ch: &mut ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    liquidator_authority: Pubkey,
    user_authority: Pubkey,
    market_index: u16,
    liquidator_max_base_asset_amount: u64,
) -> ClearingHouseResult<Option<LiquidationRecord>> {
    liq_not_paused(&ch.state)?;

    validate!(
        liquidator_authority != user_authority,
        ErrorCode::InvalidLiquidationAmount,
        "user {} can not liquidate themselves",
        user_authority
    )?;

    let mut oracle_map = ch.oracle_map(price_feed, clock);
    let user = &mut ch.user_map.get_ref_mut(&user_authority)?;
    let liquidator = &mut ch.user_map.get_ref_mut(&liquidator_authority)?;

    controller::liquidation::liquidate_perp(
        market_index,
        liquidator_max_base_asset_amount,
        user,
        liquidator,
        &ch.perp_market_map,
        &ch.spot_market_map,
        &mut oracle_map,
        clock.unix_timestamp,
    )
}

pub fn handle_settle_pnl(
    ch: &mut ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    user_authority: Pubkey,
    market_index: u16,
) -> ClearingHouseResult<SettlePnlRecord> {
    settle_pnl_not_paused(&ch.state)?;

    let mut oracle_map = ch.oracle_map(price_feed, clock);
    let user = &mut ch.user_map.get_ref_mut(&user_authority)?;

    controller::pnl::settle_pnl(
        market_index,
        user,
        &ch.perp_market_map,
        &ch.spot_market_map,
        &mut oracle_map,
        clock.unix_timestamp,
    )
}

pub fn handle_settle_expired_market(
    ch: &mut ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    market_index: u16,
) -> ClearingHouseResult<MarketStatusRecord> {
    let mut oracle_map = ch.oracle_map(price_feed, clock);

    controller::repeg::settle_expired_market(
        market_index,
        &ch.perp_market_map,
        &ch.spot_market_map,
        &mut oracle_map,
        clock.unix_timestamp,
    )
}

pub fn handle_settle_expired_position(
    ch: &mut ClearingHouse,
    clock: &Clock,
    user_authority: Pubkey,
    market_index: u16,
) -> ClearingHouseResult<SettlePnlRecord> {
    settle_pnl_not_paused(&ch.state)?;

    let user = &mut ch.user_map.get_ref_mut(&user_authority)?;

    controller::pnl::settle_expired_position(
        market_index,
        user,
        &ch.perp_market_map,
        &ch.spot_market_map,
        clock.unix_timestamp,
    )
}

pub fn handle_reconcile_quote_asset_amounts(
    ch: &mut ClearingHouse,
    clock: &Clock,
    market_index: u16,
) -> ClearingHouseResult<QuoteTrackerReconciliationRecord> {
    let mut positions: Vec<PerpPosition> = vec![];
    for user_authority in ch.user_map.0.keys() {
        let user = ch.user_map.get_ref(user_authority)?;
        if let Ok(position) = user.get_perp_position(market_index) {
            positions.push(*position);
        }
    }

    msg!(
        "reconciling market {} against {} positions",
        market_index,
        positions.len()
    );

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;
    controller::amm::reconcile_quote_asset_amounts(market, &positions, clock.unix_timestamp)
}
