use anchor_lang::prelude::*;
use enumflags2::BitFlags;
use solana_program::msg;

use crate::controller;
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::get_then_update_id;
use crate::math::amm::calculate_price;
use crate::math::bn::U192;
use crate::math::constants::{
    DEFAULT_LIQUIDATOR_FEE, DEFAULT_ORDER_STEP_SIZE, MAX_BASE_SPREAD, MAX_CURVE_UPDATE_INTENSITY,
    MAX_SPOT_DECIMALS, MIN_SPOT_DECIMALS, QUOTE_ASSET_DECIMALS, QUOTE_SPOT_MARKET_INDEX,
};
use crate::math::fixed_point::{MarginRatio, Price};
use crate::math::safe_math::SafeMath;
use crate::state::clearing_house::ClearingHouse;
use crate::state::events::{CurveRecord, InsuranceFundRecord, MarketStatusRecord};
use crate::state::oracle::OracleSource;
use crate::state::perp_market::{MarketStatus, PerpMarket, PoolBalance, AMM};
use crate::state::spot_market::SpotMarket;
use crate::state::state::{ExchangeStatus, FeeStructure, OracleGuardRails};
use crate::validate;
use crate::validation::fee_structure::validate_fee_structure;
use crate::validation::margin::validate_margin;
use crate::validation::perp_market::validate_perp_market;

pub fn handle_initialize(admin: Pubkey) -> ClearingHouse {
    ClearingHouse::new(admin)
}

pub fn handle_initialize_spot_market(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    oracle: Pubkey,
    oracle_source: OracleSource,
    decimals: u32,
) -> ClearingHouseResult<u16> {
    ch.state.validate_admin(admin)?;

    let spot_market_index = get_then_update_id!(ch.state, number_of_spot_markets);

    if spot_market_index == QUOTE_SPOT_MARKET_INDEX {
        validate!(
            oracle == Pubkey::default(),
            ErrorCode::InvalidSpotMarketInitialization,
            "For quote asset spot market, oracle must be default public key"
        )?;

        validate!(
            oracle_source == OracleSource::QuoteAsset,
            ErrorCode::InvalidSpotMarketInitialization,
            "For quote asset spot market, oracle source must be QuoteAsset"
        )?;

        validate!(
            decimals == QUOTE_ASSET_DECIMALS,
            ErrorCode::InvalidSpotMarketInitialization,
            "For quote asset spot market, mint decimals must be {}",
            QUOTE_ASSET_DECIMALS
        )?;
    } else {
        validate!(
            oracle != Pubkey::default() && oracle_source == OracleSource::PriceFeed,
            ErrorCode::InvalidSpotMarketInitialization,
            "spot market {} needs a price feed oracle",
            spot_market_index
        )?;

        validate!(
            (MIN_SPOT_DECIMALS..=MAX_SPOT_DECIMALS).contains(&decimals),
            ErrorCode::InvalidSpotMarketInitialization,
            "Mint decimals must be within [{}, {}]",
            MIN_SPOT_DECIMALS,
            MAX_SPOT_DECIMALS
        )?;
    }

    let (pubkey, _) = Pubkey::find_program_address(
        &[b"spot_market".as_ref(), spot_market_index.to_le_bytes().as_ref()],
        &crate::id(),
    );

    ch.spot_market_map.insert(SpotMarket {
        pubkey,
        oracle,
        decimals,
        market_index: spot_market_index,
        oracle_source,
        ..SpotMarket::default()
    });

    Ok(spot_market_index)
}

pub fn handle_initialize_market(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    oracle: Pubkey,
    amm_base_asset_reserve: u128,
    amm_quote_asset_reserve: u128,
    amm_peg_multiplier: u128,
    margin_ratio_initial: u32,
    margin_ratio_maintenance: u32,
) -> ClearingHouseResult<u16> {
    ch.state.validate_admin(admin)?;

    validate!(
        ch.spot_market_map.contains(&QUOTE_SPOT_MARKET_INDEX),
        ErrorCode::SpotMarketNotFound,
        "quote spot market must be initialized first"
    )?;

    validate!(
        amm_base_asset_reserve > 0 && amm_quote_asset_reserve > 0,
        ErrorCode::InvalidAmmReserves,
        "reserves must be positive: base={} quote={}",
        amm_base_asset_reserve,
        amm_quote_asset_reserve
    )?;

    validate!(
        amm_peg_multiplier > 0,
        ErrorCode::InvalidInitialPeg,
        "peg must be positive"
    )?;

    let margin_ratio_initial = MarginRatio(margin_ratio_initial);
    let margin_ratio_maintenance = MarginRatio(margin_ratio_maintenance);
    validate_margin(
        margin_ratio_initial,
        margin_ratio_maintenance,
        DEFAULT_LIQUIDATOR_FEE,
    )?;

    // Verify there's no overflow
    let sqrt_k = U192::from(amm_base_asset_reserve)
        .safe_mul(U192::from(amm_quote_asset_reserve))?
        .integer_sqrt()
        .try_to_u128()?;

    let init_reserve_price = calculate_price(
        amm_quote_asset_reserve,
        amm_base_asset_reserve,
        amm_peg_multiplier,
    )?;

    validate!(
        init_reserve_price.is_positive(),
        ErrorCode::InvalidAmmReserves,
        "reserves give a zero price"
    )?;

    let market_index = get_then_update_id!(ch.state, number_of_markets);

    let (pubkey, _) = Pubkey::find_program_address(
        &[b"perp_market".as_ref(), market_index.to_le_bytes().as_ref()],
        &crate::id(),
    );

    let market = PerpMarket {
        pubkey,
        amm: AMM {
            oracle,
            oracle_source: OracleSource::PriceFeed,
            fee_pool: PoolBalance {
                balance: 0,
                market_index: QUOTE_SPOT_MARKET_INDEX,
            },
            base_asset_reserve: amm_base_asset_reserve,
            quote_asset_reserve: amm_quote_asset_reserve,
            sqrt_k,
            peg_multiplier: amm_peg_multiplier,
            order_step_size: DEFAULT_ORDER_STEP_SIZE,
            base_spread: 0,
            curve_update_intensity: 0,
            ..AMM::default()
        },
        pnl_pool: PoolBalance {
            balance: 0,
            market_index: QUOTE_SPOT_MARKET_INDEX,
        },
        expiry_ts: 0,
        expiry_price: Price::ZERO,
        margin_ratio_initial,
        margin_ratio_maintenance,
        liquidator_fee: DEFAULT_LIQUIDATOR_FEE,
        market_index,
        quote_spot_market_index: QUOTE_SPOT_MARKET_INDEX,
        status: MarketStatus::Active,
        ..PerpMarket::default()
    };

    validate_perp_market(&market)?;

    msg!(
        "perp market {} initialized at {}",
        market_index,
        init_reserve_price
    );

    ch.perp_market_map.insert(market);

    Ok(market_index)
}

pub fn handle_update_market_expiry(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    clock: &Clock,
    market_index: u16,
    expiry_ts: i64,
) -> ClearingHouseResult<MarketStatusRecord> {
    ch.state.validate_admin(admin)?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;

    validate!(
        market.status == MarketStatus::Active,
        ErrorCode::InvalidMarketStatus,
        "market {} expiry can only be set while active",
        market_index
    )?;

    validate!(
        clock.unix_timestamp < expiry_ts,
        ErrorCode::InvalidExpiryTs,
        "Market expiry ts must later than current clock timestamp"
    )?;

    let status_before = market.status;

    // automatically enter reduce only
    market.status = MarketStatus::ReduceOnly;
    market.expiry_ts = expiry_ts;

    let record = MarketStatusRecord {
        ts: clock.unix_timestamp,
        market_index,
        status_before,
        status_after: market.status,
        expiry_ts,
        expiry_price: 0,
        fee_pool_transfer: 0,
    };

    Ok(record)
}

pub fn handle_move_amm_price(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    clock: &Clock,
    market_index: u16,
    target_price: Price,
) -> ClearingHouseResult<CurveRecord> {
    ch.state.validate_admin(admin)?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;
    controller::repeg::move_amm_price(market, target_price, clock.unix_timestamp)
}

pub fn handle_update_k(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    clock: &Clock,
    market_index: u16,
    sqrt_k: u128,
) -> ClearingHouseResult<CurveRecord> {
    ch.state.validate_admin(admin)?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;
    controller::repeg::update_k(market, sqrt_k, clock.unix_timestamp)
}

pub fn handle_update_perp_market_margin_ratio(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    market_index: u16,
    margin_ratio_initial: u32,
    margin_ratio_maintenance: u32,
) -> ClearingHouseResult {
    ch.state.validate_admin(admin)?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;

    validate_margin(
        MarginRatio(margin_ratio_initial),
        MarginRatio(margin_ratio_maintenance),
        market.liquidator_fee,
    )?;

    market.margin_ratio_initial = MarginRatio(margin_ratio_initial);
    market.margin_ratio_maintenance = MarginRatio(margin_ratio_maintenance);

    Ok(())
}

pub fn handle_update_perp_market_liquidation_fee(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    market_index: u16,
    liquidator_fee: u32,
) -> ClearingHouseResult {
    ch.state.validate_admin(admin)?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;

    validate_margin(
        market.margin_ratio_initial,
        market.margin_ratio_maintenance,
        liquidator_fee,
    )?;

    market.liquidator_fee = liquidator_fee;

    Ok(())
}

pub fn handle_update_perp_market_base_spread(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    market_index: u16,
    base_spread: u32,
) -> ClearingHouseResult {
    ch.state.validate_admin(admin)?;

    validate!(
        base_spread <= MAX_BASE_SPREAD,
        ErrorCode::InvalidBaseSpread,
        "base_spread {} above max {}",
        base_spread,
        MAX_BASE_SPREAD
    )?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;
    market.amm.base_spread = base_spread;

    Ok(())
}

pub fn handle_update_curve_update_intensity(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    market_index: u16,
    curve_update_intensity: u8,
) -> ClearingHouseResult {
    ch.state.validate_admin(admin)?;

    validate!(
        curve_update_intensity <= MAX_CURVE_UPDATE_INTENSITY,
        ErrorCode::InvalidCurveUpdateIntensity,
        "invalid curve_update_intensity {}",
        curve_update_intensity
    )?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;
    market.amm.curve_update_intensity = curve_update_intensity;

    Ok(())
}

pub fn handle_update_perp_market_step_size(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    market_index: u16,
    order_step_size: u64,
) -> ClearingHouseResult {
    ch.state.validate_admin(admin)?;

    validate!(
        order_step_size > 0,
        ErrorCode::InvalidOrderStepSize,
        "step size must be positive"
    )?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;
    market.amm.order_step_size = order_step_size;

    Ok(())
}

pub fn handle_update_perp_fee_structure(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    fee_structure: FeeStructure,
) -> ClearingHouseResult {
    ch.state.validate_admin(admin)?;

    validate_fee_structure(&fee_structure)?;

    ch.state.perp_fee_structure = fee_structure;

    Ok(())
}

pub fn handle_update_oracle_guard_rails(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    oracle_guard_rails: OracleGuardRails,
) -> ClearingHouseResult {
    ch.state.validate_admin(admin)?;

    validate!(
        oracle_guard_rails.max_oracle_staleness > 0,
        ErrorCode::InvalidOracleGuardRails,
        "max_oracle_staleness must be positive"
    )?;

    ch.state.oracle_guard_rails = oracle_guard_rails;

    Ok(())
}

pub fn handle_update_exchange_status(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    exchange_status: u8,
) -> ClearingHouseResult {
    ch.state.validate_admin(admin)?;

    validate!(
        BitFlags::<ExchangeStatus>::from_bits(usize::from(exchange_status)).is_ok(),
        ErrorCode::InvalidExchangeStatus,
        "unknown exchange status bits {:#010b}",
        exchange_status
    )?;

    ch.state.exchange_status = exchange_status;

    Ok(())
}

pub fn handle_deposit_into_insurance_fund(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    clock: &Clock,
    amount: u64,
) -> ClearingHouseResult<InsuranceFundRecord> {
    ch.state.validate_admin(admin)?;

    let spot_market = &mut ch.spot_market_map.get_quote_spot_market_mut()?;
    controller::insurance::add_to_insurance_fund(amount, spot_market, clock.unix_timestamp)
}

pub fn handle_withdraw_from_insurance_vault_to_market(
    ch: &mut ClearingHouse,
    admin: &Pubkey,
    clock: &Clock,
    market_index: u16,
    amount: u64,
) -> ClearingHouseResult<InsuranceFundRecord> {
    ch.state.validate_admin(admin)?;

    let market = &mut ch.perp_market_map.get_ref_mut(&market_index)?;
    let spot_market = &mut ch
        .spot_market_map
        .get_ref_mut(&market.quote_spot_market_index)?;

    controller::insurance::transfer_insurance_fund_to_market(
        amount,
        spot_market,
        market,
        clock.unix_timestamp,
    )
}
