pub mod amm;
pub mod bankruptcy;
pub mod bn;
pub mod casting;
pub mod ceil_div;
pub mod constants;
pub mod cp_curve;
pub mod fees;
pub mod fixed_point;
pub mod liquidation;
pub mod margin;
pub mod oracle;
pub mod position;
pub mod quote_asset;
pub mod safe_math;
pub mod safe_unwrap;
pub mod spot_balance;
