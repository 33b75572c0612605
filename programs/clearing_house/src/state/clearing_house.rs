use anchor_lang::prelude::{Clock, Pubkey};

use crate::error::ClearingHouseResult;
use crate::state::oracle::PriceFeed;
use crate::state::oracle_map::OracleMap;
use crate::state::perp_market_map::PerpMarketMap;
use crate::state::spot_market_map::SpotMarketMap;
use crate::state::state::State;
use crate::state::user_map::UserMap;

/// Every record the clearing house owns. Operations receive it explicitly and never reach for
/// ambient state.
#[derive(Clone, Default)]
pub struct ClearingHouse {
    pub state: State,
    pub perp_market_map: PerpMarketMap,
    pub spot_market_map: SpotMarketMap,
    pub user_map: UserMap,
}

impl ClearingHouse {
    pub fn new(admin: Pubkey) -> Self {
        ClearingHouse {
            state: State::new(admin),
            ..ClearingHouse::default()
        }
    }

    /// Runs `operation` against a working copy and commits it only if the operation succeeds, so
    /// a failed operation leaves every record as it was.
    pub fn transact<T, F>(&mut self, operation: F) -> ClearingHouseResult<T>
    where
        F: FnOnce(&mut ClearingHouse) -> ClearingHouseResult<T>,
    {
        let mut working_copy = self.clone();
        let result = operation(&mut working_copy)?;
        *self = working_copy;
        Ok(result)
    }

    pub fn oracle_map<'a>(&self, price_feed: &'a dyn PriceFeed, clock: &Clock) -> OracleMap<'a> {
        OracleMap::new(
            price_feed,
            clock.unix_timestamp,
            self.state.oracle_guard_rails,
        )
    }
}
