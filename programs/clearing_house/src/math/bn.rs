//! Big number types

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use crate::error::ClearingHouseResult;
use crate::error::ErrorCode::BnConversionError;
use std::convert::TryInto;
use uint::construct_uint;

construct_uint! {
    /// 192-bit unsigned integer.
    pub struct U192(3);
}

impl U192 {
    /// Convert u192 to u64
    pub fn try_to_u64(self) -> ClearingHouseResult<u64> {
        self.try_into().map_err(|_| BnConversionError)
    }

    /// Convert u192 to u128
    pub fn try_to_u128(self) -> ClearingHouseResult<u128> {
        self.try_into().map_err(|_| BnConversionError)
    }
}
