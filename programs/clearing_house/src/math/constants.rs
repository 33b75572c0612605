// PRECISIONS
pub const AMM_RESERVE_PRECISION: u128 = 1_000_000_000; // expo = -9;
pub const AMM_RESERVE_PRECISION_I128: i128 = AMM_RESERVE_PRECISION as i128;
pub const BASE_PRECISION: u128 = AMM_RESERVE_PRECISION; // expo = -9;
pub const BASE_PRECISION_I128: i128 = AMM_RESERVE_PRECISION_I128;
pub const BASE_PRECISION_U64: u64 = AMM_RESERVE_PRECISION as u64;
pub const BASE_PRECISION_I64: i64 = AMM_RESERVE_PRECISION_I128 as i64;
pub const QUOTE_PRECISION: u128 = 1_000_000; // expo = -6
pub const QUOTE_PRECISION_I128: i128 = 1_000_000; // expo = -6
pub const QUOTE_PRECISION_I64: i64 = 1_000_000; // expo = -6
pub const QUOTE_PRECISION_U64: u64 = 1_000_000; // expo = -6
pub const PRICE_PRECISION: u128 = 10_000_000_000; //expo = -10;
pub const PRICE_PRECISION_I128: i128 = PRICE_PRECISION as i128;
pub const PRICE_PRECISION_I64: i64 = 10_000_000_000; //expo = -10;
pub const PRICE_PRECISION_U64: u64 = 10_000_000_000; //expo = -10;
pub const PEG_PRECISION: u128 = 1_000_000; //expo = -6
pub const MARGIN_PRECISION: u128 = 10_000; // expo = -4
pub const MARGIN_PRECISION_U32: u32 = 10_000; // expo = -4
pub const LIQUIDATION_FEE_PRECISION: u32 = 1_000_000; // expo = -6
pub const LIQUIDATION_FEE_PRECISION_U128: u128 = LIQUIDATION_FEE_PRECISION as u128;
pub const BID_ASK_SPREAD_PRECISION: u64 = 1_000_000; // expo = -6
pub const BID_ASK_SPREAD_PRECISION_U128: u128 = BID_ASK_SPREAD_PRECISION as u128;
pub const PERCENTAGE_PRECISION: u128 = 100; // expo = -2

// PRECISION CONVERSIONS
pub const PRICE_TO_PEG_PRECISION_RATIO: u128 = PRICE_PRECISION / PEG_PRECISION; // expo: 4
pub const AMM_TO_QUOTE_PRECISION_RATIO: u128 = AMM_RESERVE_PRECISION / QUOTE_PRECISION; // expo: 3
pub const AMM_TIMES_PEG_TO_QUOTE_PRECISION_RATIO: u128 =
    AMM_RESERVE_PRECISION * PEG_PRECISION / QUOTE_PRECISION; // expo: 9
pub const PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO: u128 =
    PRICE_PRECISION * AMM_RESERVE_PRECISION / QUOTE_PRECISION; // expo: 13
pub const PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO_I128: i128 =
    PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO as i128;
pub const PRICE_TO_QUOTE_PRECISION_RATIO: u128 = PRICE_PRECISION / QUOTE_PRECISION; // expo: 4
pub const LIQUIDATION_FEE_TO_MARGIN_PRECISION_RATIO: u32 =
    LIQUIDATION_FEE_PRECISION / MARGIN_PRECISION_U32; // expo: 2

// SPOT MARKETS
pub const QUOTE_SPOT_MARKET_INDEX: u16 = 0;
pub const QUOTE_ASSET_DECIMALS: u32 = 6;
pub const MAX_SPOT_DECIMALS: u32 = 19;
pub const MIN_SPOT_DECIMALS: u32 = 5;

// FEES
pub const DEFAULT_FEE_NUMERATOR: u128 = 10;
pub const DEFAULT_FEE_DENOMINATOR: u128 = 10_000;
pub const MAX_FEE_NUMERATOR_TO_DENOMINATOR_PCT: u128 = 5; // 5%
pub const DEFAULT_LIQUIDATOR_FEE: u32 = 10_000; // 1%

// AMM
pub const MAX_CURVE_UPDATE_INTENSITY: u8 = 100;
pub const DEFAULT_ORDER_STEP_SIZE: u64 = BASE_PRECISION_U64 / 1_000; // 0.001
pub const MAX_BASE_SPREAD: u32 = 100_000; // 10%

// ORACLE
pub const DEFAULT_MAX_ORACLE_STALENESS: i64 = 60; // seconds

// USER
pub const MAX_PERP_POSITIONS: usize = 8;
pub const MAX_SPOT_POSITIONS: usize = 8;
