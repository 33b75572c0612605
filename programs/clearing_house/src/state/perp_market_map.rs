use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::panic::Location;

use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::state::perp_market::PerpMarket;

#[derive(Clone, Default, Debug)]
pub struct PerpMarketMap(pub BTreeMap<u16, RefCell<PerpMarket>>);

impl PerpMarketMap {
    #[track_caller]
    #[inline(always)]
    pub fn get_ref(&self, market_index: &u16) -> ClearingHouseResult<Ref<PerpMarket>> {
        let cell = match self.0.get(market_index) {
            Some(cell) => cell,
            None => {
                let caller = Location::caller();
                msg!(
                    "Could not find perp market {} at {}:{}",
                    market_index,
                    caller.file(),
                    caller.line()
                );
                return Err(ErrorCode::PerpMarketNotFound);
            }
        };

        match cell.try_borrow() {
            Ok(perp_market) => Ok(perp_market),
            Err(e) => {
                let caller = Location::caller();
                msg!("{:?}", e);
                msg!(
                    "Could not load perp market {} at {}:{}",
                    market_index,
                    caller.file(),
                    caller.line()
                );
                Err(ErrorCode::UnableToLoadPerpMarketAccount)
            }
        }
    }

    #[track_caller]
    #[inline(always)]
    pub fn get_ref_mut(&self, market_index: &u16) -> ClearingHouseResult<RefMut<PerpMarket>> {
        let cell = match self.0.get(market_index) {
            Some(cell) => cell,
            None => {
                let caller = Location::caller();
                msg!(
                    "Could not find perp market {} at {}:{}",
                    market_index,
                    caller.file(),
                    caller.line()
                );
                return Err(ErrorCode::PerpMarketNotFound);
            }
        };

        match cell.try_borrow_mut() {
            Ok(perp_market) => Ok(perp_market),
            Err(e) => {
                let caller = Location::caller();
                msg!("{:?}", e);
                msg!(
                    "Could not load perp market {} at {}:{}",
                    market_index,
                    caller.file(),
                    caller.line()
                );
                Err(ErrorCode::UnableToLoadPerpMarketAccount)
            }
        }
    }

    pub fn insert(&mut self, perp_market: PerpMarket) {
        self.0
            .insert(perp_market.market_index, RefCell::new(perp_market));
    }

    pub fn contains(&self, market_index: &u16) -> bool {
        self.0.contains_key(market_index)
    }
}

#[cfg(test)]
impl PerpMarketMap {
    pub fn load_one(perp_market: PerpMarket) -> Self {
        let mut perp_market_map = PerpMarketMap::default();
        perp_market_map.insert(perp_market);
        perp_market_map
    }
}
