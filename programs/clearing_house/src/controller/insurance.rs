use solana_program::msg;

use crate::controller::amm::credit_fee_pool;
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::casting::Cast;
use crate::math::safe_math::SafeMath;
use crate::state::events::InsuranceFundRecord;
use crate::state::perp_market::PerpMarket;
use crate::state::spot_market::SpotMarket;
use crate::validate;


pub fn add_to_insurance_fund(
    amount: u64,
    spot_market: &mut SpotMarket,
    now: i64,
) -> ClearingHouseResult<InsuranceFundRecord> {
    validate!(
        amount > 0,
        ErrorCode::InvalidInsuranceFundTransfer,
        "insurance fund deposit must be positive"
    )?;

    let vault_amount_before = spot_market.insurance_fund.balance;

    spot_market.insurance_fund.balance = vault_amount_before.safe_add(amount)?;
    spot_market.insurance_fund.total_deposits =
        spot_market.insurance_fund.total_deposits.safe_add(amount)?;

    let record = InsuranceFundRecord {
        ts: now,
        spot_market_index: spot_market.market_index,
        perp_market_index: u16::MAX,
        amount: amount.cast()?,
        vault_amount_before,
        vault_amount_after: spot_market.insurance_fund.balance,
    };

    Ok(record)
}

/// Moves tokens out of the insurance vault into a perp market's fee pool.
pub fn transfer_insurance_fund_to_market(
    amount: u64,
    spot_market: &mut SpotMarket,
    perp_market: &mut PerpMarket,
    now: i64,
) -> ClearingHouseResult<InsuranceFundRecord> {
    validate!(
        amount > 0,
        ErrorCode::InvalidInsuranceFundTransfer,
        "insurance fund transfer must be positive"
    )?;

    validate!(
        spot_market.market_index == perp_market.quote_spot_market_index,
        ErrorCode::InvalidInsuranceFundTransfer,
        "perp market {} is not quoted in spot market {}",
        perp_market.market_index,
        spot_market.market_index
    )?;

    let vault_amount_before = spot_market.insurance_fund.balance;

    validate!(
        vault_amount_before >= amount,
        ErrorCode::InsuranceFundInsufficient,
        "insurance fund holds {} < {}",
        vault_amount_before,
        amount
    )?;

    spot_market.insurance_fund.balance = vault_amount_before.safe_sub(amount)?;
    spot_market.insurance_fund.total_transferred_to_markets = spot_market
        .insurance_fund
        .total_transferred_to_markets
        .safe_add(amount)?;

    credit_fee_pool(perp_market, spot_market, amount.cast()?)?;

    let record = InsuranceFundRecord {
        ts: now,
        spot_market_index: spot_market.market_index,
        perp_market_index: perp_market.market_index,
        amount: -amount.cast::<i64>()?,
        vault_amount_before,
        vault_amount_after: spot_market.insurance_fund.balance,
    };

    Ok(record)
}
