use crate::math::fixed_point::QuoteAmount;
use crate::state::user::User;

#[cfg(test)]
mod tests;

/// A user is only bankrupt once every perp base has been liquidated and the collateral left over
/// is still negative. While any base remains, further liquidation passes can reduce the loss.
pub fn is_user_bankrupt(user: &User, total_collateral: QuoteAmount) -> bool {
    if user
        .perp_positions
        .iter()
        .any(|perp_position| perp_position.base_asset_amount != 0)
    {
        return false;
    }

    total_collateral.is_negative()
}
