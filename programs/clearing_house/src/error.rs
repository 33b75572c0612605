use anchor_lang::prelude::*;

pub type ClearingHouseResult<T = ()> = std::result::Result<T, ErrorCode>;

#[error_code]
#[derive(PartialEq, Eq)]
pub enum ErrorCode {
    #[msg("Invalid admin")]
    InvalidAdmin,
    #[msg("Exchange is paused")]
    ExchangePaused,
    #[msg("Insufficient deposit")]
    InsufficientDeposit,
    #[msg("Insufficient collateral")]
    InsufficientCollateral,
    #[msg("User is not liquidatable")]
    NotLiquidatable,
    #[msg("Invalid liquidation amount")]
    InvalidLiquidationAmount,
    #[msg("User is bankrupt")]
    UserBankrupt,
    #[msg("Max number of positions taken")]
    MaxNumberOfPositions,
    #[msg("User Has No Position In Market")]
    UserHasNoPositionInMarket,
    #[msg("Invalid market status for operation")]
    InvalidMarketStatus,
    #[msg("Market has not expired")]
    MarketNotExpired,
    #[msg("Market already settled")]
    AlreadySettled,
    #[msg("Market expiry must be later than now")]
    InvalidExpiryTs,
    #[msg("Oracle price is stale")]
    StaleOracle,
    #[msg("Invalid oracle price")]
    InvalidOracle,
    #[msg("Oracle not found")]
    OracleNotFound,
    #[msg("Insurance fund balance insufficient")]
    InsuranceFundInsufficient,
    #[msg("Invalid insurance fund transfer")]
    InvalidInsuranceFundTransfer,
    #[msg("Trade Size Too Large")]
    TradeSizeTooLarge,
    #[msg("Trade Size Too Small")]
    TradeSizeTooSmall,
    #[msg("Slippage Outside Limit Price")]
    SlippageOutsideLimit,
    #[msg("Invalid base asset amount for step size")]
    InvalidBaseAssetAmount,
    #[msg("Invalid amm reserves")]
    InvalidAmmReserves,
    #[msg("AMM peg must be positive")]
    InvalidInitialPeg,
    #[msg("Price change too large when updating K")]
    InvalidUpdateK,
    #[msg("Invalid amm price target")]
    InvalidAmmPriceTarget,
    #[msg("Invalid margin ratio")]
    InvalidMarginRatio,
    #[msg("Invalid liquidation fee")]
    InvalidLiquidationFee,
    #[msg("Invalid curve update intensity")]
    InvalidCurveUpdateIntensity,
    #[msg("Invalid fee structure")]
    InvalidFeeStructure,
    #[msg("Invalid base spread")]
    InvalidBaseSpread,
    #[msg("Invalid order step size")]
    InvalidOrderStepSize,
    #[msg("Invalid oracle guard rails")]
    InvalidOracleGuardRails,
    #[msg("Invalid exchange status")]
    InvalidExchangeStatus,
    #[msg("Invalid spot market initialization")]
    InvalidSpotMarketInitialization,
    #[msg("Invalid spot position")]
    InvalidSpotPosition,
    #[msg("Invalid perp position")]
    InvalidPerpPosition,
    #[msg("Invalid spot market state")]
    InvalidSpotMarketState,
    #[msg("Can not update pool balance type")]
    CantUpdatePoolBalanceType,
    #[msg("Insufficient collateral to settle negative pnl")]
    InsufficientCollateralForSettlingPNL,
    #[msg("Invalid amm detected")]
    InvalidAmmDetected,
    #[msg("Perp market not found")]
    PerpMarketNotFound,
    #[msg("Spot market not found")]
    SpotMarketNotFound,
    #[msg("User not found")]
    UserNotFound,
    #[msg("Unable to load perp market")]
    UnableToLoadPerpMarketAccount,
    #[msg("Unable to load spot market")]
    UnableToLoadSpotMarketAccount,
    #[msg("Unable to load user")]
    UnableToLoadUserAccount,
    #[msg("Math Error")]
    MathError,
    #[msg("Conversion to u128/u64 failed with an overflow or underflow")]
    BnConversionError,
    #[msg("Casting Failure")]
    CastingFailure,
    #[msg("Failed Unwrap")]
    FailedUnwrap,
}

#[macro_export]
macro_rules! math_error {
    () => {{
        || {
            let error_code = $crate::error::ErrorCode::MathError;
            msg!("Error {} thrown at {}:{}", error_code, file!(), line!());
            error_code
        }
    }};
}
