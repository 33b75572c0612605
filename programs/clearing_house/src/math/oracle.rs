use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::state::oracle::OraclePriceData;
use crate::state::state::OracleGuardRails;

// ordered by "severity"
#[derive(Clone, Copy, BorshSerialize, BorshDeserialize, PartialEq, Debug, Eq)]
pub enum OracleValidity {
    NonPositive,
    Stale,
    Valid,
}

impl Default for OracleValidity {
    fn default() -> Self {
        OracleValidity::Valid
    }
}

impl fmt::Display for OracleValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleValidity::NonPositive => write!(f, "NonPositive"),
            OracleValidity::Stale => write!(f, "Stale"),
            OracleValidity::Valid => write!(f, "Valid"),
        }
    }
}

pub fn oracle_validity(
    oracle_price_data: &OraclePriceData,
    now: i64,
    guard_rails: &OracleGuardRails,
) -> OracleValidity {
    if !oracle_price_data.price.is_positive() {
        OracleValidity::NonPositive
    } else if oracle_price_data.staleness(now) > guard_rails.max_oracle_staleness {
        OracleValidity::Stale
    } else {
        OracleValidity::Valid
    }
}
