use crate::math::bankruptcy::is_user_bankrupt;
use crate::math::constants::{BASE_PRECISION_I64, QUOTE_PRECISION_I64};
use crate::math::fixed_point::QuoteAmount;
use crate::state::user::{PerpPosition, User};
use crate::test_utils::get_positions;

#[test]
fn user_has_position_with_base() {
    let user = User {
        perp_positions: get_positions(PerpPosition {
            base_asset_amount: BASE_PRECISION_I64,
            quote_asset_amount: -200 * QUOTE_PRECISION_I64,
            ..PerpPosition::default()
        }),
        ..User::default()
    };

    assert!(!is_user_bankrupt(
        &user,
        QuoteAmount(-50 * QUOTE_PRECISION_I64)
    ));
}

#[test]
fn user_has_only_quote_left() {
    let user = User {
        perp_positions: get_positions(PerpPosition {
            quote_asset_amount: -200 * QUOTE_PRECISION_I64,
            ..PerpPosition::default()
        }),
        ..User::default()
    };

    assert!(is_user_bankrupt(&user, QuoteAmount(-1)));
    assert!(!is_user_bankrupt(&user, QuoteAmount(0)));
}

#[test]
fn user_with_empty_positions() {
    assert!(!is_user_bankrupt(&User::default(), QuoteAmount(0)));
}
