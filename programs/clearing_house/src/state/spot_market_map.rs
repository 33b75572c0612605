use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::panic::Location;

use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::constants::QUOTE_SPOT_MARKET_INDEX;
use crate::state::spot_market::SpotMarket;

#[derive(Clone, Default, Debug)]
pub struct SpotMarketMap(pub BTreeMap<u16, RefCell<SpotMarket>>);

impl SpotMarketMap {
    #[track_caller]
    #[inline(always)]
    pub fn get_ref(&self, market_index: &u16) -> ClearingHouseResult<Ref<SpotMarket>> {
        let cell = match self.0.get(market_index) {
            Some(cell) => cell,
            None => {
                let caller = Location::caller();
                msg!(
                    "Could not find spot market {} at {}:{}",
                    market_index,
                    caller.file(),
                    caller.line()
                );
                return Err(ErrorCode::SpotMarketNotFound);
            }
        };

        match cell.try_borrow() {
            Ok(spot_market) => Ok(spot_market),
            Err(e) => {
                let caller = Location::caller();
                msg!("{:?}", e);
                msg!(
                    "Could not load spot market {} at {}:{}",
                    market_index,
                    caller.file(),
                    caller.line()
                );
                Err(ErrorCode::UnableToLoadSpotMarketAccount)
            }
        }
    }

    #[track_caller]
    #[inline(always)]
    pub fn get_ref_mut(&self, market_index: &u16) -> ClearingHouseResult<RefMut<SpotMarket>> {
        let cell = match self.0.get(market_index) {
            Some(cell) => cell,
            None => {
                let caller = Location::caller();
                msg!(
                    "Could not find spot market {} at {}:{}",
                    market_index,
                    caller.file(),
                    caller.line()
                );
                return Err(ErrorCode::SpotMarketNotFound);
            }
        };

        match cell.try_borrow_mut() {
            Ok(spot_market) => Ok(spot_market),
            Err(e) => {
                let caller = Location::caller();
                msg!("{:?}", e);
                msg!(
                    "Could not load spot market {} at {}:{}",
                    market_index,
                    caller.file(),
                    caller.line()
                );
                Err(ErrorCode::UnableToLoadSpotMarketAccount)
            }
        }
    }

    #[track_caller]
    #[inline(always)]
    pub fn get_quote_spot_market(&self) -> ClearingHouseResult<Ref<SpotMarket>> {
        self.get_ref(&QUOTE_SPOT_MARKET_INDEX)
    }

    #[track_caller]
    #[inline(always)]
    pub fn get_quote_spot_market_mut(&self) -> ClearingHouseResult<RefMut<SpotMarket>> {
        self.get_ref_mut(&QUOTE_SPOT_MARKET_INDEX)
    }

    pub fn insert(&mut self, spot_market: SpotMarket) {
        self.0
            .insert(spot_market.market_index, RefCell::new(spot_market));
    }

    pub fn contains(&self, market_index: &u16) -> bool {
        self.0.contains_key(market_index)
    }
}

#[cfg(test)]
impl SpotMarketMap {
    pub fn load_multiple(spot_markets: Vec<SpotMarket>) -> Self {
        let mut spot_market_map = SpotMarketMap::default();
        for spot_market in spot_markets {
            spot_market_map.insert(spot_market);
        }
        spot_market_map
    }
}
