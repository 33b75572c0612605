use anchor_lang::prelude::*;
use borsh::{BorshDeserialize, BorshSerialize};

use crate::controller::position::{add_new_position, get_position_index, PositionDirection};
use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::casting::Cast;
use crate::math::constants::{MAX_PERP_POSITIONS, MAX_SPOT_POSITIONS, QUOTE_SPOT_MARKET_INDEX};
use crate::math::fixed_point::{BaseAssetAmount, Price, QuoteAmount};
use crate::math::safe_math::SafeMath;
use crate::math::spot_balance::get_signed_token_amount;
use crate::state::spot_market::{SpotBalance, SpotBalanceType};
use crate::validate;


#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, PartialEq, Debug, Eq)]
pub enum UserStatus {
    Active,
    BeingLiquidated,
    Bankrupt,
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

#[account(zero_copy(unsafe))]
#[derive(Default, Eq, PartialEq, Debug)]
#[repr(C)]
pub struct User {
    pub authority: Pubkey,
    /// slot 0 always holds the quote asset
    pub spot_positions: [SpotPosition; MAX_SPOT_POSITIONS],
    pub perp_positions: [PerpPosition; MAX_PERP_POSITIONS],
    /// precision: QUOTE_PRECISION
    pub total_fee_paid: u64,
    /// pnl moved between the user's quote balance and perp pnl pools
    /// precision: QUOTE_PRECISION
    pub settled_perp_pnl: i64,
    pub next_liquidation_id: u16,
    pub status: UserStatus,
}

impl User {
    pub fn new(authority: Pubkey) -> Self {
        User {
            authority,
            next_liquidation_id: 1,
            ..User::default()
        }
    }

    pub fn is_being_liquidated(&self) -> bool {
        self.status == UserStatus::BeingLiquidated
    }

    pub fn is_bankrupt(&self) -> bool {
        self.status == UserStatus::Bankrupt
    }

    pub fn enter_liquidation(&mut self) -> u16 {
        self.status = UserStatus::BeingLiquidated;
        crate::get_then_update_id!(self, next_liquidation_id)
    }

    pub fn exit_liquidation(&mut self) {
        self.status = UserStatus::Active;
    }

    /// Marks an account whose collateral went negative. Nothing liquidates it further; covering
    /// the loss is left to a socialization step that consumes this status.
    pub fn enter_bankruptcy(&mut self) {
        self.status = UserStatus::Bankrupt;
    }

    pub fn get_spot_position_index(&self, market_index: u16) -> ClearingHouseResult<usize> {
        // first spot position is always quote asset
        if market_index == QUOTE_SPOT_MARKET_INDEX {
            validate!(
                self.spot_positions[0].market_index == QUOTE_SPOT_MARKET_INDEX,
                ErrorCode::InvalidSpotPosition,
                "User position 0 not market_index=0"
            )?;
            return Ok(0);
        }

        self.spot_positions
            .iter()
            .position(|spot_position| spot_position.market_index == market_index)
            .ok_or(ErrorCode::InvalidSpotPosition)
    }

    pub fn get_spot_position(&self, market_index: u16) -> ClearingHouseResult<&SpotPosition> {
        self.get_spot_position_index(market_index)
            .map(|position_index| &self.spot_positions[position_index])
    }

    pub fn get_spot_position_mut(
        &mut self,
        market_index: u16,
    ) -> ClearingHouseResult<&mut SpotPosition> {
        self.get_spot_position_index(market_index)
            .map(move |position_index| &mut self.spot_positions[position_index])
    }

    pub fn get_quote_spot_position_mut(&mut self) -> &mut SpotPosition {
        &mut self.spot_positions[0]
    }

    pub fn add_spot_position(
        &mut self,
        market_index: u16,
        balance_type: SpotBalanceType,
    ) -> ClearingHouseResult<usize> {
        let new_spot_position_index = self
            .spot_positions
            .iter()
            .enumerate()
            .position(|(index, spot_position)| index != 0 && spot_position.is_available())
            .ok_or(ErrorCode::MaxNumberOfPositions)?;

        let new_spot_position = SpotPosition {
            market_index,
            balance_type,
            ..SpotPosition::default()
        };

        self.spot_positions[new_spot_position_index] = new_spot_position;

        Ok(new_spot_position_index)
    }

    pub fn force_get_spot_position_mut(
        &mut self,
        market_index: u16,
    ) -> ClearingHouseResult<&mut SpotPosition> {
        self.get_spot_position_index(market_index)
            .or_else(|_| self.add_spot_position(market_index, SpotBalanceType::Deposit))
            .map(move |position_index| &mut self.spot_positions[position_index])
    }

    pub fn get_perp_position(&self, market_index: u16) -> ClearingHouseResult<&PerpPosition> {
        Ok(&self.perp_positions[get_position_index(&self.perp_positions, market_index)?])
    }

    pub fn get_perp_position_mut(
        &mut self,
        market_index: u16,
    ) -> ClearingHouseResult<&mut PerpPosition> {
        Ok(&mut self.perp_positions[get_position_index(&self.perp_positions, market_index)?])
    }

    pub fn force_get_perp_position_mut(
        &mut self,
        market_index: u16,
    ) -> ClearingHouseResult<&mut PerpPosition> {
        let position_index = get_position_index(&self.perp_positions, market_index)
            .or_else(|_| add_new_position(&mut self.perp_positions, market_index))?;
        Ok(&mut self.perp_positions[position_index])
    }

    pub fn update_settled_perp_pnl(&mut self, pnl: i64) -> ClearingHouseResult {
        self.settled_perp_pnl = self.settled_perp_pnl.safe_add(pnl)?;
        Ok(())
    }
}

#[zero_copy(unsafe)]
#[derive(Default, Eq, PartialEq, Debug)]
#[repr(C)]
pub struct SpotPosition {
    /// precision: token mint precision
    pub balance: u64,
    pub market_index: u16,
    pub balance_type: SpotBalanceType,
}

impl SpotBalance for SpotPosition {
    fn market_index(&self) -> u16 {
        self.market_index
    }

    fn balance_type(&self) -> &SpotBalanceType {
        &self.balance_type
    }

    fn balance(&self) -> u128 {
        self.balance as u128
    }

    fn increase_balance(&mut self, delta: u128) -> ClearingHouseResult {
        self.balance = self.balance.safe_add(delta.cast()?)?;
        Ok(())
    }

    fn decrease_balance(&mut self, delta: u128) -> ClearingHouseResult {
        self.balance = self.balance.safe_sub(delta.cast()?)?;
        Ok(())
    }

    fn update_balance_type(&mut self, balance_type: SpotBalanceType) -> ClearingHouseResult {
        self.balance_type = balance_type;
        Ok(())
    }
}

impl SpotPosition {
    pub fn is_available(&self) -> bool {
        self.balance == 0
    }

    pub fn get_signed_token_amount(&self) -> ClearingHouseResult<i128> {
        get_signed_token_amount(self.balance.cast()?, &self.balance_type)
    }
}

#[zero_copy(unsafe)]
#[derive(Default, Debug, Eq, PartialEq)]
#[repr(C)]
pub struct PerpPosition {
    /// the size of the users perp position
    /// precision: BASE_PRECISION
    pub base_asset_amount: i64,
    /// cost basis of the position plus realized pnl not yet settled
    /// precision: QUOTE_PRECISION
    pub quote_asset_amount: i64,
    /// the amount of quote the user paid or received to open what is still open
    /// precision: QUOTE_PRECISION
    pub quote_entry_amount: i64,
    /// pnl settled out of this position since it was opened
    /// precision: QUOTE_PRECISION
    pub settled_pnl: i64,
    pub market_index: u16,
}

impl PerpPosition {
    pub fn is_for(&self, market_index: u16) -> bool {
        self.market_index == market_index && !self.is_available()
    }

    pub fn is_available(&self) -> bool {
        !self.is_open_position() && !self.has_unsettled_pnl()
    }

    pub fn is_open_position(&self) -> bool {
        self.base_asset_amount != 0
    }

    pub fn has_unsettled_pnl(&self) -> bool {
        self.base_asset_amount == 0 && self.quote_asset_amount != 0
    }

    pub fn base(&self) -> BaseAssetAmount {
        BaseAssetAmount(self.base_asset_amount)
    }

    pub fn quote(&self) -> QuoteAmount {
        QuoteAmount(self.quote_asset_amount)
    }

    pub fn get_direction(&self) -> PositionDirection {
        if self.base_asset_amount >= 0 {
            PositionDirection::Long
        } else {
            PositionDirection::Short
        }
    }

    /// `price * base + quote`
    pub fn get_unrealized_pnl(&self, valuation_price: Price) -> ClearingHouseResult<QuoteAmount> {
        self.base().quote_value(valuation_price)?.safe_add(self.quote())
    }
}
