use std::collections::BTreeMap;

use anchor_lang::prelude::{Clock, Pubkey};

use crate::math::constants::MAX_PERP_POSITIONS;
use crate::math::constants::MAX_SPOT_POSITIONS;
use crate::math::fixed_point::Price;
use crate::state::oracle::OraclePriceData;
use crate::state::user::{PerpPosition, SpotPosition};

pub fn get_positions(position: PerpPosition) -> [PerpPosition; MAX_PERP_POSITIONS] {
    let mut positions = [PerpPosition::default(); MAX_PERP_POSITIONS];
    positions[0] = position;
    positions
}

pub fn get_spot_positions(spot_position: SpotPosition) -> [SpotPosition; MAX_SPOT_POSITIONS] {
    let mut spot_positions = [SpotPosition::default(); MAX_SPOT_POSITIONS];
    if spot_position.market_index == 0 {
        spot_positions[0] = spot_position;
    } else {
        spot_positions[1] = spot_position;
    }
    spot_positions
}

pub fn get_price_feed(prices: &[(Pubkey, Price)], publish_ts: i64) -> BTreeMap<Pubkey, OraclePriceData> {
    prices
        .iter()
        .map(|(oracle, price)| {
            (
                *oracle,
                OraclePriceData {
                    price: *price,
                    confidence: 1,
                    publish_ts,
                },
            )
        })
        .collect()
}

pub fn set_price(
    price_feed: &mut BTreeMap<Pubkey, OraclePriceData>,
    oracle: &Pubkey,
    price: Price,
    publish_ts: i64,
) {
    price_feed.insert(
        *oracle,
        OraclePriceData {
            price,
            confidence: 1,
            publish_ts,
        },
    );
}

pub fn get_clock(unix_timestamp: i64) -> Clock {
    Clock {
        slot: 6893025720,
        epoch_start_timestamp: unix_timestamp - 1000,
        epoch: 2424,
        leader_schedule_epoch: 2425,
        unix_timestamp,
    }
}
