use anchor_lang::prelude::*;
use enumflags2::BitFlags;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::constants::{
    DEFAULT_FEE_DENOMINATOR, DEFAULT_FEE_NUMERATOR, DEFAULT_MAX_ORACLE_STALENESS,
};
use crate::math::safe_unwrap::SafeUnwrap;
use crate::validate;

#[account]
#[derive(Default, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct State {
    pub admin: Pubkey,
    pub perp_fee_structure: FeeStructure,
    pub oracle_guard_rails: OracleGuardRails,
    pub number_of_markets: u16,
    pub number_of_spot_markets: u16,
    pub exchange_status: u8,
}

#[derive(BitFlags, Clone, Copy, PartialEq, Debug, Eq)]
pub enum ExchangeStatus {
    // Active = 0b00000000
    DepositPaused = 0b00000001,
    WithdrawPaused = 0b00000010,
    AmmPaused = 0b00000100,
    LiqPaused = 0b00001000,
    SettlePnlPaused = 0b00010000,
    // Paused = 0b00011111
}

impl ExchangeStatus {
    pub fn active() -> u8 {
        BitFlags::<ExchangeStatus>::empty().bits() as u8
    }
}

impl State {
    pub fn new(admin: Pubkey) -> Self {
        State {
            admin,
            exchange_status: ExchangeStatus::active(),
            ..State::default()
        }
    }

    pub fn get_exchange_status(&self) -> ClearingHouseResult<BitFlags<ExchangeStatus>> {
        BitFlags::<ExchangeStatus>::from_bits(usize::from(self.exchange_status)).safe_unwrap()
    }

    pub fn is_paused(&self, operation: ExchangeStatus) -> ClearingHouseResult<bool> {
        Ok(self.get_exchange_status()?.contains(operation))
    }

    pub fn validate_not_paused(&self, operation: ExchangeStatus) -> ClearingHouseResult {
        validate!(
            !self.is_paused(operation)?,
            ErrorCode::ExchangePaused,
            "{:?} is paused",
            operation
        )
    }

    pub fn validate_admin(&self, admin: &Pubkey) -> ClearingHouseResult {
        validate!(
            &self.admin == admin,
            ErrorCode::InvalidAdmin,
            "{} is not the admin",
            admin
        )
    }
}

#[derive(Copy, AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct OracleGuardRails {
    /// seconds after publication an oracle price stops being usable
    pub max_oracle_staleness: i64,
}

impl Default for OracleGuardRails {
    fn default() -> Self {
        OracleGuardRails {
            max_oracle_staleness: DEFAULT_MAX_ORACLE_STALENESS,
        }
    }
}

#[derive(Copy, AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct FeeStructure {
    pub fee_numerator: u128,
    pub fee_denominator: u128,
}

impl Default for FeeStructure {
    fn default() -> Self {
        FeeStructure {
            fee_numerator: DEFAULT_FEE_NUMERATOR,
            fee_denominator: DEFAULT_FEE_DENOMINATOR,
        }
    }
}
