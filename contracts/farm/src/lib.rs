#![no_std]
mod accumulator;
mod contract;
mod error;
mod ledger;
mod msg;
mod registry;
mod storage;

pub use contract::{Farm, FarmClient};

/// Fixed-point scale of `PoolInfo::acc_reward_per_share`.
pub const PRECISION: u128 = 1_000_000_000_000;

/// `base_ratio` is expressed in 256ths of the total emission.
pub const BASE_RATIO_DENOMINATOR: u32 = 256;
