use farm_common::{admin::AdminChange, ttl::extend_instance};
use soroban_sdk::{
    contract, contractimpl, contractmeta, log, panic_with_error, token, Address, Env, Vec,
};

use crate::{
    accumulator,
    error::ContractError,
    ledger::{self, get_stake, save_stake},
    msg::{ConfigResponse, PoolResponse},
    registry,
    storage::{
        get_admin, get_base_pool, get_base_ratio, get_config, get_pending_admin, get_pool,
        get_pool_count, get_pool_id_by_token, get_total_weight, remove_pending_admin, save_admin,
        save_base_pool, save_base_ratio, save_config, save_pending_admin, save_pool_count,
        save_total_weight, Config, PoolInfo, PoolRef,
    },
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Reward farm splitting a fixed per-ledger emission between a base pool and weighted pools"
);

#[contract]
pub struct Farm;

pub trait FarmTrait {
    // ADMIN

    /// Appends a weighted pool staking `staked_token` and returns its id.
    fn add_pool(
        env: Env,
        sender: Address,
        staked_token: Address,
        weight: u64,
    ) -> Result<u32, ContractError>;

    fn set_pool_weight(
        env: Env,
        sender: Address,
        pool_id: u32,
        weight: u64,
    ) -> Result<(), ContractError>;

    /// `base_ratio` is the share of the emission going to the base pool, in 256ths.
    fn set_base_ratio(env: Env, sender: Address, base_ratio: u32) -> Result<(), ContractError>;

    fn propose_admin(
        env: Env,
        new_admin: Address,
        time_limit: Option<u64>,
    ) -> Result<Address, ContractError>;

    fn revoke_admin_change(env: Env) -> Result<(), ContractError>;

    fn accept_admin(env: Env) -> Result<Address, ContractError>;

    // PARTICIPANTS

    fn update_pools(env: Env) -> Result<(), ContractError>;

    fn deposit(env: Env, sender: Address, amount: i128) -> Result<(), ContractError>;

    fn deposit_pool(
        env: Env,
        sender: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError>;

    fn withdraw(env: Env, sender: Address, amount: i128) -> Result<(), ContractError>;

    fn withdraw_pool(
        env: Env,
        sender: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError>;

    /// Mints the pending base pool reward to `sender` and returns the amount.
    fn claim(env: Env, sender: Address) -> Result<i128, ContractError>;

    fn claim_pool(env: Env, sender: Address, pool_id: u32) -> Result<i128, ContractError>;

    // QUERIES

    fn query_config(env: Env) -> ConfigResponse;

    fn query_admin(env: Env) -> Result<Address, ContractError>;

    fn query_base_pool(env: Env) -> PoolResponse;

    fn query_pool(env: Env, pool_id: u32) -> Result<PoolResponse, ContractError>;

    fn query_pools(env: Env) -> Result<Vec<PoolResponse>, ContractError>;

    fn query_pool_id(env: Env, staked_token: Address) -> Result<u32, ContractError>;

    fn query_total_staked(env: Env) -> i128;

    fn query_total_staked_pool(env: Env, pool_id: u32) -> Result<i128, ContractError>;

    fn query_staked(env: Env, address: Address) -> Result<i128, ContractError>;

    fn query_staked_pool(
        env: Env,
        address: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError>;

    fn query_pending_reward(env: Env, address: Address) -> Result<i128, ContractError>;

    fn query_pending_reward_pool(
        env: Env,
        address: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError>;
}

#[contractimpl]
impl Farm {
    pub fn __constructor(
        env: Env,
        admin: Address,
        reward_token: Address,
        reward_per_block: i128,
        base_ratio: u32,
    ) {
        if reward_per_block <= 0 {
            log!(
                &env,
                "Farm: Initialize: reward per block must be greater than zero, got {}",
                reward_per_block
            );
            panic_with_error!(&env, ContractError::InvalidRewardPerBlock);
        }
        if let Err(err) = registry::validate_base_ratio(&env, base_ratio) {
            panic_with_error!(&env, err);
        }

        save_admin(&env, &admin);
        save_config(
            &env,
            &Config {
                reward_token: reward_token.clone(),
                reward_per_block,
            },
        );
        save_base_ratio(&env, base_ratio);
        save_total_weight(&env, 0);
        save_pool_count(&env, 0);
        save_base_pool(
            &env,
            &PoolInfo::new(reward_token, 0, env.ledger().sequence()),
        );
        extend_instance(&env);

        env.events().publish(("initialize", "farm"), admin);
    }
}

#[contractimpl]
impl FarmTrait for Farm {
    fn add_pool(
        env: Env,
        sender: Address,
        staked_token: Address,
        weight: u64,
    ) -> Result<u32, ContractError> {
        sender.require_auth();
        extend_instance(&env);
        ensure_admin(&env, &sender)?;

        if let Some(pool_id) = get_pool_id_by_token(&env, &staked_token) {
            log!(
                &env,
                "Farm: Add pool: token is already staked in pool {}",
                pool_id
            );
            return Err(ContractError::PoolAlreadyExists);
        }

        let config = get_config(&env);
        let current_block = env.ledger().sequence();
        registry::checkpoint_all(&env, &config, current_block)?;
        let pool_id = registry::register_pool(&env, &staked_token, weight, current_block)?;

        env.events()
            .publish(("add_pool", "pool"), (pool_id, staked_token, weight));

        Ok(pool_id)
    }

    fn set_pool_weight(
        env: Env,
        sender: Address,
        pool_id: u32,
        weight: u64,
    ) -> Result<(), ContractError> {
        sender.require_auth();
        extend_instance(&env);
        ensure_admin(&env, &sender)?;
        registry::load(&env, &PoolRef::Indexed(pool_id))?;

        let config = get_config(&env);
        registry::checkpoint_all(&env, &config, env.ledger().sequence())?;
        let old_weight = registry::reweight_pool(&env, pool_id, weight)?;

        env.events()
            .publish(("set_pool_weight", "pool"), (pool_id, old_weight, weight));

        Ok(())
    }

    fn set_base_ratio(env: Env, sender: Address, base_ratio: u32) -> Result<(), ContractError> {
        sender.require_auth();
        extend_instance(&env);
        ensure_admin(&env, &sender)?;
        registry::validate_base_ratio(&env, base_ratio)?;

        let config = get_config(&env);
        registry::checkpoint_all(&env, &config, env.ledger().sequence())?;
        let old_ratio = registry::replace_base_ratio(&env, base_ratio)?;

        env.events()
            .publish(("set_base_ratio", "ratio"), (old_ratio, base_ratio));

        Ok(())
    }

    fn propose_admin(
        env: Env,
        new_admin: Address,
        time_limit: Option<u64>,
    ) -> Result<Address, ContractError> {
        let current_admin = get_admin(&env)?;
        current_admin.require_auth();
        extend_instance(&env);

        if current_admin == new_admin {
            log!(&env, "Farm: Propose admin: new admin is the current admin");
            return Err(ContractError::SameAdmin);
        }

        save_pending_admin(&env, &AdminChange::new(new_admin.clone(), time_limit));

        env.events().publish(
            ("propose_admin", "current_admin"),
            (current_admin, new_admin.clone(), time_limit),
        );

        Ok(new_admin)
    }

    fn revoke_admin_change(env: Env) -> Result<(), ContractError> {
        let current_admin = get_admin(&env)?;
        current_admin.require_auth();
        extend_instance(&env);

        if get_pending_admin(&env).is_none() {
            log!(&env, "Farm: Revoke admin change: no admin change in place");
            return Err(ContractError::NoAdminChangeInPlace);
        }

        remove_pending_admin(&env);

        env.events()
            .publish(("revoke_admin_change", "admin"), current_admin);

        Ok(())
    }

    fn accept_admin(env: Env) -> Result<Address, ContractError> {
        extend_instance(&env);
        let change = get_pending_admin(&env).ok_or_else(|| {
            log!(&env, "Farm: Accept admin: no admin change in place");
            ContractError::NoAdminChangeInPlace
        })?;

        if change.is_expired(env.ledger().timestamp()) {
            log!(&env, "Farm: Accept admin: admin change expired");
            return Err(ContractError::AdminChangeExpired);
        }

        change.new_admin.require_auth();

        save_admin(&env, &change.new_admin);
        remove_pending_admin(&env);

        env.events()
            .publish(("accept_admin", "new_admin"), change.new_admin.clone());

        Ok(change.new_admin)
    }

    fn update_pools(env: Env) -> Result<(), ContractError> {
        extend_instance(&env);

        let current_block = env.ledger().sequence();
        registry::checkpoint_all(&env, &get_config(&env), current_block)?;

        env.events()
            .publish(("update_pools", "block"), current_block);

        Ok(())
    }

    fn deposit(env: Env, sender: Address, amount: i128) -> Result<(), ContractError> {
        sender.require_auth();
        extend_instance(&env);

        let total = deposit_into(&env, &sender, &PoolRef::Base, amount)?;

        env.events()
            .publish(("deposit", "base"), (sender, amount, total));

        Ok(())
    }

    fn deposit_pool(
        env: Env,
        sender: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        sender.require_auth();
        extend_instance(&env);

        let total = deposit_into(&env, &sender, &PoolRef::Indexed(pool_id), amount)?;

        env.events()
            .publish(("deposit", "pool"), (sender, pool_id, amount, total));

        Ok(())
    }

    fn withdraw(env: Env, sender: Address, amount: i128) -> Result<(), ContractError> {
        sender.require_auth();
        extend_instance(&env);

        let remaining = withdraw_from(&env, &sender, &PoolRef::Base, amount)?;

        env.events()
            .publish(("withdraw", "base"), (sender, amount, remaining));

        Ok(())
    }

    fn withdraw_pool(
        env: Env,
        sender: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        sender.require_auth();
        extend_instance(&env);

        let remaining = withdraw_from(&env, &sender, &PoolRef::Indexed(pool_id), amount)?;

        env.events()
            .publish(("withdraw", "pool"), (sender, pool_id, amount, remaining));

        Ok(())
    }

    fn claim(env: Env, sender: Address) -> Result<i128, ContractError> {
        sender.require_auth();
        extend_instance(&env);

        let reward = claim_from(&env, &sender, &PoolRef::Base)?;

        env.events().publish(("claim", "base"), (sender, reward));

        Ok(reward)
    }

    fn claim_pool(env: Env, sender: Address, pool_id: u32) -> Result<i128, ContractError> {
        sender.require_auth();
        extend_instance(&env);

        let reward = claim_from(&env, &sender, &PoolRef::Indexed(pool_id))?;

        env.events()
            .publish(("claim", "pool"), (sender, pool_id, reward));

        Ok(reward)
    }

    // QUERIES

    fn query_config(env: Env) -> ConfigResponse {
        ConfigResponse {
            config: get_config(&env),
            base_ratio: get_base_ratio(&env),
            total_weight: get_total_weight(&env),
            pool_count: get_pool_count(&env),
        }
    }

    fn query_admin(env: Env) -> Result<Address, ContractError> {
        get_admin(&env)
    }

    fn query_base_pool(env: Env) -> PoolResponse {
        pool_response(&env, PoolRef::Base, get_base_pool(&env))
    }

    fn query_pool(env: Env, pool_id: u32) -> Result<PoolResponse, ContractError> {
        Ok(pool_response(
            &env,
            PoolRef::Indexed(pool_id),
            get_pool(&env, pool_id)?,
        ))
    }

    fn query_pools(env: Env) -> Result<Vec<PoolResponse>, ContractError> {
        let mut pools = Vec::new(&env);
        for pool_id in 0..get_pool_count(&env) {
            pools.push_back(pool_response(
                &env,
                PoolRef::Indexed(pool_id),
                get_pool(&env, pool_id)?,
            ));
        }

        Ok(pools)
    }

    fn query_pool_id(env: Env, staked_token: Address) -> Result<u32, ContractError> {
        get_pool_id_by_token(&env, &staked_token).ok_or_else(|| {
            log!(&env, "Farm: Query pool id: no pool stakes the given token");
            ContractError::UnknownPool
        })
    }

    fn query_total_staked(env: Env) -> i128 {
        get_base_pool(&env).total_staked
    }

    fn query_total_staked_pool(env: Env, pool_id: u32) -> Result<i128, ContractError> {
        Ok(get_pool(&env, pool_id)?.total_staked)
    }

    fn query_staked(env: Env, address: Address) -> Result<i128, ContractError> {
        ledger::staked_balance(&env, &address, &PoolRef::Base)
    }

    fn query_staked_pool(
        env: Env,
        address: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError> {
        ledger::staked_balance(&env, &address, &PoolRef::Indexed(pool_id))
    }

    fn query_pending_reward(env: Env, address: Address) -> Result<i128, ContractError> {
        ledger::pending_reward(&env, &address, &PoolRef::Base)
    }

    fn query_pending_reward_pool(
        env: Env,
        address: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError> {
        ledger::pending_reward(&env, &address, &PoolRef::Indexed(pool_id))
    }
}

fn ensure_admin(env: &Env, sender: &Address) -> Result<(), ContractError> {
    if *sender != get_admin(env)? {
        log!(
            env,
            "Farm: Unauthorized administrative call from {}",
            sender.clone()
        );
        return Err(ContractError::Unauthorized);
    }

    Ok(())
}

fn pool_response(env: &Env, pool_ref: PoolRef, pool: PoolInfo) -> PoolResponse {
    let effective_weight = registry::emission_split(env).effective_weight(&pool_ref, &pool);

    PoolResponse {
        pool_ref,
        pool,
        effective_weight,
    }
}

/// Mints `reward` of the reward token to `to`. Zero rewards are skipped.
fn issue_reward(
    env: &Env,
    config: &Config,
    to: &Address,
    reward: u128,
) -> Result<i128, ContractError> {
    let reward = i128::try_from(reward).map_err(|_| ContractError::ContractMathError)?;
    if reward > 0 {
        token::StellarAssetClient::new(env, &config.reward_token).mint(to, &reward);
    }

    Ok(reward)
}

/// Returns the deposited amount of `sender` after the deposit.
fn deposit_into(
    env: &Env,
    sender: &Address,
    pool_ref: &PoolRef,
    amount: i128,
) -> Result<i128, ContractError> {
    if amount <= 0 {
        log!(
            env,
            "Farm: Deposit: amount must be greater than zero, got {}",
            amount
        );
        return Err(ContractError::InvalidAmount);
    }

    let config = get_config(env);
    let mut pool = registry::checkpointed(env, &config, pool_ref, env.ledger().sequence())?;
    let mut entry = get_stake(env, sender, pool_ref);
    let reward = accumulator::harvest(env, &pool, &mut entry)?;

    entry.amount = entry
        .amount
        .checked_add(amount)
        .ok_or(ContractError::ContractMathError)?;
    pool.total_staked = pool
        .total_staked
        .checked_add(amount)
        .ok_or(ContractError::ContractMathError)?;
    entry.reward_debt = accumulator::accumulated(env, entry.amount, pool.acc_reward_per_share)?;

    issue_reward(env, &config, sender, reward)?;
    token::Client::new(env, &pool.staked_token).transfer(
        sender,
        &env.current_contract_address(),
        &amount,
    );

    registry::store(env, pool_ref, &pool);
    save_stake(env, sender, pool_ref, &entry);

    Ok(entry.amount)
}

/// Returns the amount `sender` still has deposited after the withdrawal.
fn withdraw_from(
    env: &Env,
    sender: &Address,
    pool_ref: &PoolRef,
    amount: i128,
) -> Result<i128, ContractError> {
    if amount <= 0 {
        log!(
            env,
            "Farm: Withdraw: amount must be greater than zero, got {}",
            amount
        );
        return Err(ContractError::InvalidAmount);
    }

    let config = get_config(env);
    let mut pool = registry::checkpointed(env, &config, pool_ref, env.ledger().sequence())?;
    let mut entry = get_stake(env, sender, pool_ref);
    if amount > entry.amount {
        log!(
            env,
            "Farm: Withdraw: trying to withdraw {} with only {} deposited",
            amount,
            entry.amount
        );
        return Err(ContractError::InsufficientStake);
    }

    let reward = accumulator::harvest(env, &pool, &mut entry)?;

    entry.amount -= amount;
    pool.total_staked = pool
        .total_staked
        .checked_sub(amount)
        .ok_or(ContractError::ContractMathError)?;
    entry.reward_debt = accumulator::accumulated(env, entry.amount, pool.acc_reward_per_share)?;

    issue_reward(env, &config, sender, reward)?;
    token::Client::new(env, &pool.staked_token).transfer(
        &env.current_contract_address(),
        sender,
        &amount,
    );

    registry::store(env, pool_ref, &pool);
    save_stake(env, sender, pool_ref, &entry);

    Ok(entry.amount)
}

fn claim_from(env: &Env, sender: &Address, pool_ref: &PoolRef) -> Result<i128, ContractError> {
    let config = get_config(env);
    let pool = registry::checkpointed(env, &config, pool_ref, env.ledger().sequence())?;
    let mut entry = get_stake(env, sender, pool_ref);
    let reward = accumulator::harvest(env, &pool, &mut entry)?;

    let issued = issue_reward(env, &config, sender, reward)?;

    registry::store(env, pool_ref, &pool);
    save_stake(env, sender, pool_ref, &entry);

    Ok(issued)
}
