use soroban_sdk::{Env, U256};

use crate::{
    error::ContractError,
    ledger::StakeEntry,
    storage::{PoolInfo, PoolRef},
    BASE_RATIO_DENOMINATOR, PRECISION,
};

/// Effective weights used to split the emission between the base pool and the weighted pools.
///
/// The base pool receives `base_ratio / BASE_RATIO_DENOMINATOR` of the emission as long as any
/// weighted pool carries weight, independently of how that weight is spread between the pools.
/// The weighted pools share the remainder proportionally to their own weights. Scaling every
/// weight by the denominator keeps the split exact in integers:
///
/// - base: `total_weight * base_ratio`
/// - pool `i`: `weight_i * (BASE_RATIO_DENOMINATOR - base_ratio)`
/// - total: `total_weight * BASE_RATIO_DENOMINATOR`
///
/// Without any weighted pool weight the base pool takes the whole emission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionSplit {
    base_weight: u128,
    pool_scale: u128,
    total_weight: u128,
}

impl EmissionSplit {
    pub fn new(total_weight: u64, base_ratio: u32) -> Self {
        if total_weight == 0 {
            return EmissionSplit {
                base_weight: 1,
                pool_scale: 0,
                total_weight: 1,
            };
        }

        let total_weight = total_weight as u128;
        EmissionSplit {
            base_weight: total_weight * base_ratio as u128,
            pool_scale: (BASE_RATIO_DENOMINATOR - base_ratio) as u128,
            total_weight: total_weight * BASE_RATIO_DENOMINATOR as u128,
        }
    }

    pub fn effective_weight(&self, pool_ref: &PoolRef, pool: &PoolInfo) -> u128 {
        match pool_ref {
            PoolRef::Base => self.base_weight,
            PoolRef::Indexed(_) => pool.weight as u128 * self.pool_scale,
        }
    }

    pub fn total_effective_weight(&self) -> u128 {
        self.total_weight
    }
}

/// Reward emitted to a pool over `elapsed` ledgers.
pub fn pool_reward(
    elapsed: u32,
    reward_per_block: i128,
    effective_weight: u128,
    total_effective_weight: u128,
) -> Result<u128, ContractError> {
    if total_effective_weight == 0 {
        return Ok(0);
    }
    let reward_per_block =
        u128::try_from(reward_per_block).map_err(|_| ContractError::ContractMathError)?;

    (elapsed as u128)
        .checked_mul(reward_per_block)
        .and_then(|emitted| emitted.checked_mul(effective_weight))
        .map(|weighted| weighted / total_effective_weight)
        .ok_or(ContractError::ContractMathError)
}

/// Brings `acc_reward_per_share` of the pool up to `current_block`.
///
/// Ledgers during which nothing is staked in the pool are skipped: their share of the emission
/// is never minted.
pub fn checkpoint(
    pool: &mut PoolInfo,
    pool_ref: &PoolRef,
    split: &EmissionSplit,
    reward_per_block: i128,
    current_block: u32,
) -> Result<(), ContractError> {
    if current_block <= pool.last_reward_block {
        return Ok(());
    }
    if pool.total_staked == 0 {
        pool.last_reward_block = current_block;
        return Ok(());
    }

    let reward = pool_reward(
        current_block - pool.last_reward_block,
        reward_per_block,
        split.effective_weight(pool_ref, pool),
        split.total_effective_weight(),
    )?;
    let increment = reward
        .checked_mul(PRECISION)
        .ok_or(ContractError::ContractMathError)?
        / pool.total_staked as u128;

    pool.acc_reward_per_share = pool
        .acc_reward_per_share
        .checked_add(increment)
        .ok_or(ContractError::ContractMathError)?;
    pool.last_reward_block = current_block;

    Ok(())
}

/// `amount * acc_reward_per_share / PRECISION`, rounded down. The product is taken in 256 bits,
/// only the quotient has to fit in `u128`.
pub fn accumulated(
    env: &Env,
    amount: i128,
    acc_reward_per_share: u128,
) -> Result<u128, ContractError> {
    let amount = u128::try_from(amount).map_err(|_| ContractError::ContractMathError)?;

    U256::from_u128(env, amount)
        .mul(&U256::from_u128(env, acc_reward_per_share))
        .div(&U256::from_u128(env, PRECISION))
        .to_u128()
        .ok_or(ContractError::ContractMathError)
}

pub fn pending_reward(
    env: &Env,
    entry: &StakeEntry,
    acc_reward_per_share: u128,
) -> Result<u128, ContractError> {
    if entry.amount == 0 {
        return Ok(0);
    }
    // a negative result means the pool was not checkpointed before the entry changed
    accumulated(env, entry.amount, acc_reward_per_share)?
        .checked_sub(entry.reward_debt)
        .ok_or(ContractError::ContractMathError)
}

/// Settles the pending reward of `entry` against an already checkpointed pool.
/// Minting the returned amount is left to the caller.
pub fn harvest(
    env: &Env,
    pool: &PoolInfo,
    entry: &mut StakeEntry,
) -> Result<u128, ContractError> {
    let reward = pending_reward(env, entry, pool.acc_reward_per_share)?;
    entry.reward_debt = accumulated(env, entry.amount, pool.acc_reward_per_share)?;

    Ok(reward)
}
