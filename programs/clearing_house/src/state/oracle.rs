use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::constants::PRICE_PRECISION_I64;
use crate::math::fixed_point::Price;


#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Eq, PartialEq, Debug)]
pub enum OracleSource {
    PriceFeed,
    QuoteAsset,
}

impl Default for OracleSource {
    fn default() -> Self {
        OracleSource::PriceFeed
    }
}

#[derive(Default, Clone, Copy, Debug, Eq, PartialEq)]
pub struct OraclePriceData {
    pub price: Price,
    pub confidence: u64,
    /// unix_timestamp the price was published at
    pub publish_ts: i64,
}

impl OraclePriceData {
    pub fn default_usd(now: i64) -> Self {
        OraclePriceData {
            price: Price(PRICE_PRECISION_I64),
            confidence: 1,
            publish_ts: now,
        }
    }

    pub fn staleness(&self, now: i64) -> i64 {
        now.saturating_sub(self.publish_ts)
    }
}

/// Source of external prices. The clearing house never produces prices itself; every read goes
/// through an implementation of this trait supplied by the caller.
pub trait PriceFeed {
    fn get_price_data(&self, oracle: &Pubkey) -> ClearingHouseResult<OraclePriceData>;
}

impl PriceFeed for BTreeMap<Pubkey, OraclePriceData> {
    fn get_price_data(&self, oracle: &Pubkey) -> ClearingHouseResult<OraclePriceData> {
        match self.get(oracle) {
            Some(price_data) => Ok(*price_data),
            None => {
                msg!("oracle {} not found in price feed", oracle);
                Err(ErrorCode::OracleNotFound)
            }
        }
    }
}
