use anchor_lang::prelude::*;
use borsh::{BorshDeserialize, BorshSerialize};

use crate::controller::position::PositionDirection;
use crate::state::perp_market::MarketStatus;
use crate::state::user::UserStatus;

#[event]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositRecord {
    pub ts: i64,
    pub user_authority: Pubkey,
    pub direction: DepositDirection,
    /// precision: token mint precision
    pub amount: u64,
    pub market_index: u16,
    pub oracle_price: i64,
    pub market_deposit_balance: u128,
    pub market_borrow_balance: u128,
}

#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, PartialEq, Debug, Eq)]
pub enum DepositDirection {
    Deposit,
    Withdraw,
}

impl Default for DepositDirection {
    fn default() -> Self {
        DepositDirection::Deposit
    }
}

#[event]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeRecord {
    pub ts: i64,
    pub user_authority: Pubkey,
    pub direction: PositionDirection,
    pub base_asset_amount: u64,
    pub quote_asset_amount: u64,
    pub mark_price_before: i64,
    pub mark_price_after: i64,
    pub exchange_fee: u64,
    pub mm_fee: u64,
    pub pnl: i64,
    pub market_index: u16,
}

#[event]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiquidationRecord {
    pub ts: i64,
    pub liquidation_id: u16,
    pub user: Pubkey,
    pub liquidator: Pubkey,
    pub market_index: u16,
    /// change in the liquidatee's base, the liquidator's is the opposite
    pub base_asset_amount: i64,
    /// change in the liquidatee's quote, the liquidator's is the opposite
    pub quote_asset_amount: i64,
    pub mark_price: i64,
    pub transfer_price: i64,
    /// discount ceded to the liquidator versus a close at the mark
    pub liquidator_fee: u64,
    pub total_collateral_before: i64,
    pub margin_requirement_before: i64,
    pub total_collateral_after: i64,
    pub margin_requirement_after: i64,
    pub user_status_after: UserStatus,
}

#[event]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlePnlRecord {
    pub ts: i64,
    pub user: Pubkey,
    pub market_index: u16,
    pub pnl: i128,
    pub base_asset_amount: i64,
    pub quote_asset_amount_after: i64,
    pub quote_entry_amount: i64,
    pub settle_price: i64,
    /// drawn from the insurance fund to cover the payout
    pub insurance_fund_draw: u64,
    pub explanation: SettlePnlExplanation,
}

#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, PartialEq, Debug, Eq)]
pub enum SettlePnlExplanation {
    None,
    ExpiredPosition,
}

impl Default for SettlePnlExplanation {
    fn default() -> Self {
        SettlePnlExplanation::None
    }
}

#[event]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsuranceFundRecord {
    pub ts: i64,
    pub spot_market_index: u16,
    /// u16::MAX for deposits that don't target a perp market
    pub perp_market_index: u16,
    /// positive into the vault, negative out of it
    pub amount: i64,
    pub vault_amount_before: u64,
    pub vault_amount_after: u64,
}

#[event]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveRecord {
    pub ts: i64,
    pub market_index: u16,
    pub peg_multiplier: u128,
    pub base_asset_reserve_before: u128,
    pub quote_asset_reserve_before: u128,
    pub sqrt_k_before: u128,
    pub base_asset_reserve_after: u128,
    pub quote_asset_reserve_after: u128,
    pub sqrt_k_after: u128,
    pub mark_price_before: i64,
    pub mark_price_after: i64,
    pub base_asset_amount_with_amm: i128,
    pub adjustment_cost: i128,
    pub total_fee_minus_distributions: i128,
}

#[event]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarketStatusRecord {
    pub ts: i64,
    pub market_index: u16,
    pub status_before: MarketStatus,
    pub status_after: MarketStatus,
    pub expiry_ts: i64,
    pub expiry_price: i64,
    /// moved from the fee pool into the pnl pool when the market settled
    pub fee_pool_transfer: u128,
}

#[event]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuoteTrackerReconciliationRecord {
    pub ts: i64,
    pub market_index: u16,
    pub quote_asset_amount_long_before: i128,
    pub quote_asset_amount_long_after: i128,
    pub quote_asset_amount_short_before: i128,
    pub quote_asset_amount_short_after: i128,
}
