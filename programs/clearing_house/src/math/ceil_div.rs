use crate::math::bn::U192;
use num_traits::{One, Zero};

pub trait CheckedCeilDiv: Sized {
    /// Perform ceiling division
    fn checked_ceil_div(&self, rhs: Self) -> Option<Self>;
}

macro_rules! checked_impl {
    ($t:ty) => {
        impl CheckedCeilDiv for $t {
            #[track_caller]
            #[inline]
            fn checked_ceil_div(&self, rhs: $t) -> Option<$t> {
                let quotient = self.checked_div(rhs)?;

                let remainder = self.checked_rem(rhs)?;

                if remainder > <$t>::zero() {
                    quotient.checked_add(<$t>::one())
                } else {
                    Some(quotient)
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
    use crate::math::ceil_div::CheckedCeilDiv;

    #[test]
    fn rounds_up_only_with_remainder() {
        assert_eq!(7_u64.checked_ceil_div(2), Some(4));
        assert_eq!(8_u64.checked_ceil_div(2), Some(4));
        assert_eq!(8_u64.checked_ceil_div(0), None);
    }
}
