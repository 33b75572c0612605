//! Scaled integer types, one per precision domain.
//!
//! Values of different domains never mix through operators; a conversion between domains is a
//! named method that knows both precisions.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::msg;
use static_assertions::assert_eq_size;

use crate::error::ClearingHouseResult;
use crate::math::casting::Cast;
use crate::math::constants::{
    BASE_PRECISION_I64, LIQUIDATION_FEE_PRECISION, MARGIN_PRECISION_U32, PRICE_PRECISION_I64,
    PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO_I128, QUOTE_PRECISION_I64,
};
use crate::math::safe_math::SafeMath;
use crate::math_error;

macro_rules! fixed_point_type {
    ($name:ident, $inner:ty, $precision:expr) => {
        #[derive(
            Clone,
            Copy,
            Default,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            BorshSerialize,
            BorshDeserialize,
        )]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            pub const ZERO: Self = $name(0);
            pub const ONE: Self = $name($precision);

            pub const fn new(value: $inner) -> Self {
                $name(value)
            }

            pub const fn value(self) -> $inner {
                self.0
            }

            pub fn is_zero(self) -> bool {
                self.0 == 0
            }

            pub fn safe_add(self, rhs: Self) -> ClearingHouseResult<Self> {
                self.0.safe_add(rhs.0).map($name)
            }

            pub fn safe_sub(self, rhs: Self) -> ClearingHouseResult<Self> {
                self.0.safe_sub(rhs.0).map($name)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

macro_rules! signed_fixed_point_type {
    ($name:ident) => {
        impl $name {
            pub fn abs(self) -> ClearingHouseResult<Self> {
                self.0.checked_abs().map($name).ok_or_else(math_error!())
            }

            pub fn unsigned_abs(self) -> u64 {
                self.0.unsigned_abs()
            }

            pub fn safe_neg(self) -> ClearingHouseResult<Self> {
                self.0.checked_neg().map($name).ok_or_else(math_error!())
            }

            pub fn is_positive(self) -> bool {
                self.0 > 0
            }

            pub fn is_negative(self) -> bool {
                self.0 < 0
            }

            pub fn signum(self) -> i64 {
                self.0.signum()
            }
        }
    };
}

fixed_point_type!(Price, i64, PRICE_PRECISION_I64);
fixed_point_type!(QuoteAmount, i64, QUOTE_PRECISION_I64);
fixed_point_type!(BaseAssetAmount, i64, BASE_PRECISION_I64);
fixed_point_type!(MarginRatio, u32, MARGIN_PRECISION_U32);

signed_fixed_point_type!(Price);
signed_fixed_point_type!(QuoteAmount);
signed_fixed_point_type!(BaseAssetAmount);

assert_eq_size!(Price, i64);
assert_eq_size!(QuoteAmount, i64);
assert_eq_size!(BaseAssetAmount, i64);
assert_eq_size!(MarginRatio, u32);

impl BaseAssetAmount {
    /// Signed notional of the amount at `price`, truncated toward zero.
    pub fn quote_value(self, price: Price) -> ClearingHouseResult<QuoteAmount> {
        self.0
            .cast::<i128>()?
            .safe_mul(price.0.cast()?)?
            .safe_div(PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO_I128)?
            .cast::<i64>()
            .map(QuoteAmount)
    }
}

impl QuoteAmount {
    pub fn apply_margin_ratio(self, margin_ratio: MarginRatio) -> ClearingHouseResult<QuoteAmount> {
        self.0
            .cast::<i128>()?
            .safe_mul(margin_ratio.0.cast()?)?
            .safe_div(MARGIN_PRECISION_U32.cast()?)?
            .cast::<i64>()
            .map(QuoteAmount)
    }
}

impl Price {
    /// Average price paid or received for `base_asset_amount` when `quote_asset_amount` changed
    /// hands.
    pub fn from_fill(
        quote_asset_amount: QuoteAmount,
        base_asset_amount: BaseAssetAmount,
    ) -> ClearingHouseResult<Price> {
        quote_asset_amount
            .unsigned_abs()
            .cast::<i128>()?
            .safe_mul(PRICE_TIMES_AMM_TO_QUOTE_PRECISION_RATIO_I128)?
            .safe_div(base_asset_amount.unsigned_abs().cast()?)?
            .cast::<i64>()
            .map(Price)
    }

    /// Price shifted down by `fee`, expressed in liquidation fee precision.
    pub fn discount(self, fee: u32) -> ClearingHouseResult<Price> {
        self.scale_by_fee(LIQUIDATION_FEE_PRECISION.safe_sub(fee)?)
    }

    /// Price shifted up by `fee`, expressed in liquidation fee precision.
    pub fn premium(self, fee: u32) -> ClearingHouseResult<Price> {
        self.scale_by_fee(LIQUIDATION_FEE_PRECISION.safe_add(fee)?)
    }

    fn scale_by_fee(self, numerator: u32) -> ClearingHouseResult<Price> {
        self.0
            .cast::<i128>()?
            .safe_mul(numerator.cast()?)?
            .safe_div(LIQUIDATION_FEE_PRECISION.cast()?)?
            .cast::<i64>()
            .map(Price)
    }
}
