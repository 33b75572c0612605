use anchor_lang::prelude::*;
use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::amm;
use crate::math::fixed_point::{MarginRatio, Price};
use crate::math::margin::MarginRequirementType;
use crate::math::safe_math::SafeMath;
use crate::state::oracle::OracleSource;
use crate::state::spot_market::{SpotBalance, SpotBalanceType};


#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, PartialEq, Debug, Eq)]
pub enum MarketStatus {
    /// trading in both directions
    Active,
    /// scheduled for delisting, only risk reducing trades
    ReduceOnly,
    /// expired, positions close at the settlement price
    Settlement,
}

impl Default for MarketStatus {
    fn default() -> Self {
        MarketStatus::Active
    }
}

#[account(zero_copy(unsafe))]
#[derive(Default, Eq, PartialEq, Debug)]
#[repr(C)]
pub struct PerpMarket {
    pub pubkey: Pubkey,
    pub amm: AMM,
    /// pays and receives realized pnl of the market's traders
    pub pnl_pool: PoolBalance,
    /// zero for a perpetual market, the scheduled expiry otherwise
    pub expiry_ts: i64,
    /// oracle price snapshotted when the market enters settlement
    /// precision: PRICE_PRECISION
    pub expiry_price: Price,
    pub number_of_users_with_base: u32,
    pub number_of_users: u32,
    pub margin_ratio_initial: MarginRatio,
    pub margin_ratio_maintenance: MarginRatio,
    /// discount the liquidator receives versus the mark price
    /// precision: LIQUIDATION_FEE_PRECISION
    pub liquidator_fee: u32,
    pub market_index: u16,
    pub quote_spot_market_index: u16,
    pub status: MarketStatus,
}

impl PerpMarket {
    pub fn is_in_settlement(&self) -> bool {
        self.status == MarketStatus::Settlement
    }

    pub fn get_margin_ratio(&self, margin_type: MarginRequirementType) -> MarginRatio {
        match self.status {
            MarketStatus::Settlement => MarginRatio(0), // no liability once expired
            MarketStatus::Active | MarketStatus::ReduceOnly => match margin_type {
                MarginRequirementType::Initial => self.margin_ratio_initial,
                MarginRequirementType::Maintenance => self.margin_ratio_maintenance,
            },
        }
    }

    /// Price open positions are marked at.
    pub fn get_valuation_price(&self) -> ClearingHouseResult<Price> {
        match self.status {
            MarketStatus::Settlement => {
                if !self.expiry_price.is_positive() {
                    msg!("market {} settled without a price", self.market_index);
                    return Err(ErrorCode::InvalidOracle);
                }
                Ok(self.expiry_price)
            }
            MarketStatus::Active | MarketStatus::ReduceOnly => self.amm.reserve_price(),
        }
    }
}

#[cfg(test)]
impl PerpMarket {
    pub fn default_test() -> Self {
        use crate::math::constants::{
            AMM_RESERVE_PRECISION, DEFAULT_LIQUIDATOR_FEE, DEFAULT_ORDER_STEP_SIZE, PEG_PRECISION,
        };

        PerpMarket {
            amm: AMM {
                base_asset_reserve: 100 * AMM_RESERVE_PRECISION,
                quote_asset_reserve: 100 * AMM_RESERVE_PRECISION,
                sqrt_k: 100 * AMM_RESERVE_PRECISION,
                peg_multiplier: 100 * PEG_PRECISION,
                order_step_size: DEFAULT_ORDER_STEP_SIZE,
                ..AMM::default()
            },
            margin_ratio_initial: MarginRatio(1000),
            margin_ratio_maintenance: MarginRatio(500),
            liquidator_fee: DEFAULT_LIQUIDATOR_FEE,
            status: MarketStatus::Active,
            ..PerpMarket::default()
        }
    }
}

#[zero_copy(unsafe)]
#[derive(Default, Eq, PartialEq, Debug)]
#[repr(C)]
pub struct PoolBalance {
    /// precision: QUOTE_PRECISION
    pub balance: u128,
    /// The spot market the pool is for
    pub market_index: u16,
}

impl SpotBalance for PoolBalance {
    fn market_index(&self) -> u16 {
        self.market_index
    }

    fn balance_type(&self) -> &SpotBalanceType {
        &SpotBalanceType::Deposit
    }

    fn balance(&self) -> u128 {
        self.balance
    }

    fn increase_balance(&mut self, delta: u128) -> ClearingHouseResult {
        self.balance = self.balance.safe_add(delta)?;
        Ok(())
    }

    fn decrease_balance(&mut self, delta: u128) -> ClearingHouseResult {
        self.balance = self.balance.safe_sub(delta)?;
        Ok(())
    }

    fn update_balance_type(&mut self, _balance_type: SpotBalanceType) -> ClearingHouseResult {
        Err(ErrorCode::CantUpdatePoolBalanceType)
    }
}

#[zero_copy(unsafe)]
#[derive(Default, Eq, PartialEq, Debug)]
#[repr(C)]
pub struct AMM {
    /// oracle price data public key
    pub oracle: Pubkey,
    /// fees and insurance transfers not yet distributed
    pub fee_pool: PoolBalance,
    /// `x` reserves for constant product mm formula (x * y = k)
    /// precision: AMM_RESERVE_PRECISION
    pub base_asset_reserve: u128,
    /// `y` reserves for constant product mm formula (x * y = k)
    /// precision: AMM_RESERVE_PRECISION
    pub quote_asset_reserve: u128,
    /// `sqrt(k)` in constant product mm formula (x * y = k). stored to avoid drift caused by integer math issues
    /// precision: AMM_RESERVE_PRECISION
    pub sqrt_k: u128,
    /// normalizing numerical factor for y, its use offers lowest slippage in cp-curve when market is balanced
    /// precision: PEG_PRECISION
    pub peg_multiplier: u128,
    /// precision: BASE_PRECISION
    pub base_asset_amount_long: i128,
    /// precision: BASE_PRECISION
    pub base_asset_amount_short: i128,
    /// net user position, the amm holds the opposite
    /// precision: BASE_PRECISION
    pub base_asset_amount_with_amm: i128,
    /// running sum of quote_asset_amount across long positions
    /// precision: QUOTE_PRECISION
    pub quote_asset_amount_long: i128,
    /// running sum of quote_asset_amount across short positions
    /// precision: QUOTE_PRECISION
    pub quote_asset_amount_short: i128,
    /// precision: QUOTE_PRECISION
    pub quote_entry_amount_long: i128,
    /// precision: QUOTE_PRECISION
    pub quote_entry_amount_short: i128,
    /// precision: QUOTE_PRECISION
    pub total_fee: i128,
    /// precision: QUOTE_PRECISION
    pub total_mm_fee: i128,
    /// precision: QUOTE_PRECISION
    pub total_exchange_fee: u128,
    /// fees collected plus insurance transfers, minus costs paid out of them
    /// precision: QUOTE_PRECISION
    pub total_fee_minus_distributions: i128,
    /// precision: QUOTE_PRECISION
    pub total_liquidation_fee: u128,
    /// precision: BASE_PRECISION
    pub order_step_size: u64,
    /// precision: BID_ASK_SPREAD_PRECISION
    pub base_spread: u32,
    /// max percentage sqrt_k may move in a single curve update, 0 disables updates
    pub curve_update_intensity: u8,
    pub oracle_source: OracleSource,
}

impl AMM {
    pub fn reserve_price(&self) -> ClearingHouseResult<Price> {
        amm::calculate_price(
            self.quote_asset_reserve,
            self.base_asset_reserve,
            self.peg_multiplier,
        )
    }
}
