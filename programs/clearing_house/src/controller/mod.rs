pub mod amm;
pub mod insurance;
pub mod liquidation;
pub mod orders;
pub mod pnl;
pub mod position;
pub mod repeg;
pub mod spot_balance;
