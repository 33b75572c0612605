use crate::controller::amm::SwapDirection;
use crate::error::ErrorCode;
use crate::math::amm::{
    calculate_price, calculate_quote_asset_amount_swapped, calculate_reserves_for_price,
    calculate_swap_output,
};
use crate::math::constants::{AMM_RESERVE_PRECISION, PEG_PRECISION, PRICE_PRECISION_I64};
use crate::math::fixed_point::Price;

#[test]
fn price_from_reserves() {
    let reserve = 10_412 * AMM_RESERVE_PRECISION;
    let peg = 43_133_700;

    let price = calculate_price(reserve, reserve, peg).unwrap();
    assert_eq!(price, Price(431_337_000_000));

    let price = calculate_price(2 * reserve, reserve, PEG_PRECISION).unwrap();
    assert_eq!(price, Price(2 * PRICE_PRECISION_I64));
}

#[test]
fn swap_output() {
    let sqrt_k = 100 * AMM_RESERVE_PRECISION;

    let (new_output, new_input) = calculate_swap_output(
        AMM_RESERVE_PRECISION,
        100 * AMM_RESERVE_PRECISION,
        SwapDirection::Add,
        sqrt_k,
    )
    .unwrap();

    assert_eq!(new_input, 101 * AMM_RESERVE_PRECISION);
    assert_eq!(new_output, 99_009_900_990);

    assert_eq!(
        calculate_swap_output(
            100 * AMM_RESERVE_PRECISION,
            100 * AMM_RESERVE_PRECISION,
            SwapDirection::Remove,
            sqrt_k,
        ),
        Err(ErrorCode::TradeSizeTooLarge)
    );
}

#[test]
fn buying_costs_an_extra_unit() {
    let before = 100 * AMM_RESERVE_PRECISION;
    let after = 101 * AMM_RESERVE_PRECISION;

    let sold = calculate_quote_asset_amount_swapped(after, before, SwapDirection::Add, PEG_PRECISION)
        .unwrap();
    let bought =
        calculate_quote_asset_amount_swapped(before, after, SwapDirection::Remove, PEG_PRECISION)
            .unwrap();

    assert_eq!(sold, 1_000_000);
    assert_eq!(bought, 1_000_001);
}

#[test]
fn reserves_for_price() {
    let sqrt_k = 10_412 * AMM_RESERVE_PRECISION;
    let peg = 43_133_700;
    let target = Price(405 * PRICE_PRECISION_I64 / 10);

    let (base, quote) = calculate_reserves_for_price(sqrt_k, peg, target).unwrap();
    let price = calculate_price(quote, base, peg).unwrap();

    assert!(base > sqrt_k);
    assert!(quote < sqrt_k);
    assert!((price.value() - target.value()).abs() < 100);

    assert_eq!(
        calculate_reserves_for_price(sqrt_k, peg, Price(-1)),
        Err(ErrorCode::InvalidAmmPriceTarget)
    );
}
