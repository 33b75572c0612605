use anchor_lang::prelude::*;
use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::constants::QUOTE_SPOT_MARKET_INDEX;
use crate::math::safe_math::SafeMath;
use crate::state::oracle::OracleSource;

#[account(zero_copy(unsafe))]
#[derive(Default, PartialEq, Eq, Debug)]
#[repr(C)]
pub struct SpotMarket {
    pub pubkey: Pubkey,
    /// oracle price data public key, default for the quote asset
    pub oracle: Pubkey,
    pub insurance_fund: InsuranceFund,
    /// sum of all deposit balances, pools included
    /// precision: token mint precision
    pub deposit_balance: u128,
    /// sum of all borrow balances
    /// precision: token mint precision
    pub borrow_balance: u128,
    pub decimals: u32,
    pub market_index: u16,
    pub oracle_source: OracleSource,
}

impl SpotMarket {
    pub fn is_quote_asset(&self) -> bool {
        self.market_index == QUOTE_SPOT_MARKET_INDEX
    }

    pub fn increase_balance(
        &mut self,
        balance_type: &SpotBalanceType,
        delta: u128,
    ) -> ClearingHouseResult {
        match balance_type {
            SpotBalanceType::Deposit => {
                self.deposit_balance = self.deposit_balance.safe_add(delta)?
            }
            SpotBalanceType::Borrow => self.borrow_balance = self.borrow_balance.safe_add(delta)?,
        }
        Ok(())
    }

    pub fn decrease_balance(
        &mut self,
        balance_type: &SpotBalanceType,
        delta: u128,
    ) -> ClearingHouseResult {
        match balance_type {
            SpotBalanceType::Deposit => {
                self.deposit_balance = self.deposit_balance.safe_sub(delta)?
            }
            SpotBalanceType::Borrow => self.borrow_balance = self.borrow_balance.safe_sub(delta)?,
        }
        Ok(())
    }
}

#[cfg(test)]
impl SpotMarket {
    pub fn default_quote_market() -> Self {
        SpotMarket {
            decimals: 6,
            market_index: QUOTE_SPOT_MARKET_INDEX,
            oracle_source: OracleSource::QuoteAsset,
            ..SpotMarket::default()
        }
    }

    pub fn default_base_market() -> Self {
        SpotMarket {
            oracle: Pubkey::new_unique(),
            decimals: 9,
            market_index: 1,
            oracle_source: OracleSource::PriceFeed,
            ..SpotMarket::default()
        }
    }
}

#[zero_copy(unsafe)]
#[derive(Default, Eq, PartialEq, Debug)]
#[repr(C)]
pub struct InsuranceFund {
    /// tokens held by the vault
    /// precision: token mint precision
    pub balance: u64,
    pub total_deposits: u64,
    /// tokens moved out of the vault into perp market fee pools
    pub total_transferred_to_markets: u64,
}

#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, PartialEq, Debug, Eq)]
pub enum SpotBalanceType {
    Deposit,
    Borrow,
}

impl Default for SpotBalanceType {
    fn default() -> Self {
        SpotBalanceType::Deposit
    }
}

pub trait SpotBalance {
    fn market_index(&self) -> u16;

    fn balance_type(&self) -> &SpotBalanceType;

    fn balance(&self) -> u128;

    fn increase_balance(&mut self, delta: u128) -> ClearingHouseResult;

    fn decrease_balance(&mut self, delta: u128) -> ClearingHouseResult;

    fn update_balance_type(&mut self, balance_type: SpotBalanceType) -> ClearingHouseResult;
}

pub(crate) fn validate_balance_market(
    spot_balance: &dyn SpotBalance,
    spot_market: &SpotMarket,
) -> ClearingHouseResult {
    if spot_balance.market_index() != spot_market.market_index {
        msg!(
            "balance for market {} updated with spot market {}",
            spot_balance.market_index(),
            spot_market.market_index
        );
        return Err(ErrorCode::InvalidSpotPosition);
    }
    Ok(())
}
