use std::collections::BTreeMap;

use anchor_lang::prelude::Pubkey;
use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::oracle::{oracle_validity, OracleValidity};
use crate::math::safe_unwrap::SafeUnwrap;
use crate::state::oracle::{OraclePriceData, PriceFeed};
use crate::state::state::OracleGuardRails;

/// Per-operation view over a [`PriceFeed`]. Reads are cached so one operation observes a single
/// price per oracle.
pub struct OracleMap<'a> {
    price_feed: &'a dyn PriceFeed,
    price_data: BTreeMap<Pubkey, OraclePriceData>,
    pub now: i64,
    pub oracle_guard_rails: OracleGuardRails,
    pub quote_asset_price_data: OraclePriceData,
}

impl<'a> OracleMap<'a> {
    pub fn new(
        price_feed: &'a dyn PriceFeed,
        now: i64,
        oracle_guard_rails: OracleGuardRails,
    ) -> Self {
        OracleMap {
            price_feed,
            price_data: BTreeMap::new(),
            now,
            oracle_guard_rails,
            quote_asset_price_data: OraclePriceData::default_usd(now),
        }
    }

    fn should_get_quote_asset_price_data(&self, pubkey: &Pubkey) -> bool {
        pubkey == &Pubkey::default()
    }

    pub fn get_price_data(&mut self, pubkey: &Pubkey) -> ClearingHouseResult<&OraclePriceData> {
        if self.should_get_quote_asset_price_data(pubkey) {
            return Ok(&self.quote_asset_price_data);
        }

        if !self.price_data.contains_key(pubkey) {
            let price_data = self.price_feed.get_price_data(pubkey).map_err(|e| {
                msg!("unable to read oracle {}", pubkey);
                e
            })?;
            self.price_data.insert(*pubkey, price_data);
        }

        self.price_data.get(pubkey).safe_unwrap()
    }

    pub fn get_price_data_and_validity(
        &mut self,
        pubkey: &Pubkey,
    ) -> ClearingHouseResult<(OraclePriceData, OracleValidity)> {
        let now = self.now;
        let guard_rails = self.oracle_guard_rails;
        let price_data = *self.get_price_data(pubkey)?;
        let validity = oracle_validity(&price_data, now, &guard_rails);
        Ok((price_data, validity))
    }

    /// Price for margin purposes; anything but a valid read is rejected.
    pub fn get_valid_price_data(&mut self, pubkey: &Pubkey) -> ClearingHouseResult<OraclePriceData> {
        let (price_data, validity) = self.get_price_data_and_validity(pubkey)?;
        if validity != OracleValidity::Valid {
            msg!("oracle {} invalid: {}", pubkey, validity);
            return Err(ErrorCode::InvalidOracle);
        }
        Ok(price_data)
    }
}
