use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    InvalidAmount = 700,
    InsufficientStake = 701,
    Unauthorized = 702,
    UnknownPool = 703,
    PoolAlreadyExists = 704,
    InvalidBaseRatio = 705,
    InvalidRewardPerBlock = 706,
    ContractMathError = 707,
    AdminNotSet = 708,
    SameAdmin = 709,
    NoAdminChangeInPlace = 710,
    AdminChangeExpired = 711,
    ConfigNotSet = 712,
}
