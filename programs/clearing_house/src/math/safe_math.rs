use crate::error::{ClearingHouseResult, ErrorCode};
use crate::math::bn::U192;
use crate::math::ceil_div::CheckedCeilDiv;
use solana_program::msg;
use std::panic::Location;

pub trait SafeMath: Sized {
    fn safe_add(self, rhs: Self) -> ClearingHouseResult<Self>;
    fn safe_sub(self, rhs: Self) -> ClearingHouseResult<Self>;
    fn safe_mul(self, rhs: Self) -> ClearingHouseResult<Self>;
    fn safe_div(self, rhs: Self) -> ClearingHouseResult<Self>;
    fn safe_div_ceil(self, rhs: Self) -> ClearingHouseResult<Self>;
}

macro_rules! checked_impl {
    ($t:ty) => {
        impl SafeMath for $t {
            #[track_caller]
            #[inline(always)]
            fn safe_add(self, v: $t) -> ClearingHouseResult<$t> {
                match self.checked_add(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        msg!("Math error thrown at {}:{}", caller.file(), caller.line());
                        Err(ErrorCode::MathError)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_sub(self, v: $t) -> ClearingHouseResult<$t> {
                match self.checked_sub(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        msg!("Math error thrown at {}:{}", caller.file(), caller.line());
                        Err(ErrorCode::MathError)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_mul(self, v: $t) -> ClearingHouseResult<$t> {
                match self.checked_mul(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        msg!("Math error thrown at {}:{}", caller.file(), caller.line());
                        Err(ErrorCode::MathError)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div(self, v: $t) -> ClearingHouseResult<$t> {
                match self.checked_div(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        msg!("Math error thrown at {}:{}", caller.file(), caller.line());
                        Err(ErrorCode::MathError)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div_ceil(self, v: $t) -> ClearingHouseResult<$t> {
                match self.checked_ceil_div(v) {
                    Some(result) => Ok(result),
                    None => {
                        let caller = Location::caller();
                        msg!("Math error thrown at {}:{}", caller.file(), caller.line());
                        Err(ErrorCode::MathError)
                    }
                }
            }
        }
    };
}

checked_impl!(U192);
checked_impl!(u128);
checked_impl!(u64);
checked_impl!(u32);
checked_impl!(i128);
checked_impl!(i64);

#[cfg(test)]
mod test {
    use crate::error::ErrorCode;
    use crate::math::safe_math::SafeMath;

    #[test]
    fn safe_math() {
        assert_eq!(1_u128.safe_add(1).unwrap(), 2);
        assert_eq!(1_u128.safe_add(u128::MAX), Err(ErrorCode::MathError));

        assert_eq!(1_u128.safe_sub(1).unwrap(), 0);
        assert_eq!(0_u128.safe_sub(1), Err(ErrorCode::MathError));

        assert_eq!(4_i64.safe_mul(-1).unwrap(), -4);
        assert_eq!(i64::MAX.safe_mul(2), Err(ErrorCode::MathError));

        assert_eq!(2_u64.safe_div(1).unwrap(), 2);
        assert_eq!(2_u64.safe_div(0), Err(ErrorCode::MathError));

        assert_eq!(3_u32.safe_div_ceil(2).unwrap(), 2);
        assert_eq!(3_u32.safe_div_ceil(0), Err(ErrorCode::MathError));
    }
}
