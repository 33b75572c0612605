use crate::error::ClearingHouseResult;
use crate::state::state::{ExchangeStatus, State};

pub fn deposit_not_paused(state: &State) -> ClearingHouseResult {
    state.validate_not_paused(ExchangeStatus::DepositPaused)
}

pub fn withdraw_not_paused(state: &State) -> ClearingHouseResult {
    state.validate_not_paused(ExchangeStatus::WithdrawPaused)
}

pub fn amm_not_paused(state: &State) -> ClearingHouseResult {
    state.validate_not_paused(ExchangeStatus::AmmPaused)
}

pub fn liq_not_paused(state: &State) -> ClearingHouseResult {
    state.validate_not_paused(ExchangeStatus::LiqPaused)
}

pub fn settle_pnl_not_paused(state: &State) -> ClearingHouseResult {
    state.validate_not_paused(ExchangeStatus::SettlePnlPaused)
}
