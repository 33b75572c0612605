//! Read-only views over the clearing house. Nothing here mutates a record.

use anchor_lang::prelude::*;

use crate::error::ClearingHouseResult;
use crate::math::fixed_point::{Price, QuoteAmount};
use crate::math::margin::{
    calculate_leverage, calculate_liquidation_price, calculate_margin_requirement_and_total_collateral,
    calculate_spot_market_asset_value, is_user_liquidatable, MarginCalculation,
    MarginRequirementType,
};
use crate::state::clearing_house::ClearingHouse;
use crate::state::oracle::PriceFeed;
use crate::state::perp_market::PerpMarket;
use crate::state::spot_market::SpotMarket;
use crate::state::user::User;

pub fn get_perp_market_account(ch: &ClearingHouse, market_index: u16) -> ClearingHouseResult<PerpMarket> {
    ch.perp_market_map.get_ref(&market_index).map(|market| *market)
}

pub fn get_spot_market_account(ch: &ClearingHouse, market_index: u16) -> ClearingHouseResult<SpotMarket> {
    ch.spot_market_map.get_ref(&market_index).map(|market| *market)
}

pub fn get_user_account(ch: &ClearingHouse, authority: &Pubkey) -> ClearingHouseResult<User> {
    ch.user_map.get_ref(authority).map(|user| *user)
}

fn maintenance_margin_calculation(
    ch: &ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: &Pubkey,
) -> ClearingHouseResult<MarginCalculation> {
    let user = ch.user_map.get_ref(authority)?;
    let mut oracle_map = ch.oracle_map(price_feed, clock);

    calculate_margin_requirement_and_total_collateral(
        &user,
        &ch.perp_market_map,
        &ch.spot_market_map,
        &mut oracle_map,
        MarginRequirementType::Maintenance,
    )
}

pub fn total_collateral(
    ch: &ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: &Pubkey,
) -> ClearingHouseResult<QuoteAmount> {
    maintenance_margin_calculation(ch, clock, price_feed, authority)
        .map(|calculation| calculation.total_collateral)
}

pub fn margin_requirement(
    ch: &ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: &Pubkey,
) -> ClearingHouseResult<QuoteAmount> {
    maintenance_margin_calculation(ch, clock, price_feed, authority)
        .map(|calculation| calculation.margin_requirement)
}

/// precision: MARGIN_PRECISION
pub fn leverage(
    ch: &ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: &Pubkey,
) -> ClearingHouseResult<u128> {
    calculate_leverage(&maintenance_margin_calculation(
        ch, clock, price_feed, authority,
    )?)
}

pub fn liquidation_price(
    ch: &ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: &Pubkey,
    market_index: u16,
) -> ClearingHouseResult<Price> {
    let user = ch.user_map.get_ref(authority)?;
    let mut oracle_map = ch.oracle_map(price_feed, clock);

    calculate_liquidation_price(
        &user,
        market_index,
        &ch.perp_market_map,
        &ch.spot_market_map,
        &mut oracle_map,
    )
}

pub fn is_liquidatable(
    ch: &ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: &Pubkey,
) -> ClearingHouseResult<bool> {
    let user = ch.user_map.get_ref(authority)?;
    let mut oracle_map = ch.oracle_map(price_feed, clock);

    is_user_liquidatable(
        &user,
        &ch.perp_market_map,
        &ch.spot_market_map,
        &mut oracle_map,
    )
}

pub fn spot_market_asset_value(
    ch: &ClearingHouse,
    clock: &Clock,
    price_feed: &dyn PriceFeed,
    authority: &Pubkey,
    spot_market_index: u16,
) -> ClearingHouseResult<QuoteAmount> {
    let user = ch.user_map.get_ref(authority)?;
    let mut oracle_map = ch.oracle_map(price_feed, clock);

    calculate_spot_market_asset_value(
        &user,
        spot_market_index,
        &ch.spot_market_map,
        &mut oracle_map,
    )
}

/// precision: QUOTE_PRECISION
pub fn insurance_vault_balance(ch: &ClearingHouse) -> ClearingHouseResult<u64> {
    ch.spot_market_map
        .get_quote_spot_market()
        .map(|spot_market| spot_market.insurance_fund.balance)
}
