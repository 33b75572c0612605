pub mod fee_structure;
pub mod margin;
pub mod perp_market;
