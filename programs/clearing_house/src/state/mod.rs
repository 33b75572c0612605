pub mod clearing_house;
pub mod events;
pub mod oracle;
pub mod oracle_map;
pub mod perp_market;
pub mod perp_market_map;
pub mod spot_market;
pub mod spot_market_map;
pub mod state;
pub mod user;
pub mod user_map;
