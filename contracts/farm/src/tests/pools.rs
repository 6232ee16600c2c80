extern crate std;

use pretty_assertions::assert_eq;
use soroban_sdk::{
    testutils::{Address as _, AuthorizedFunction, AuthorizedInvocation},
    Address, IntoVal, Symbol,
};

use super::setup::{Farming, START_BLOCK};
use crate::{
    error::ContractError,
    msg::PoolResponse,
    storage::{PoolInfo, PoolRef},
};

#[test]
fn add_pool_assigns_sequential_ids() {
    let farming = Farming::new();
    let farm = &farming.farm;

    assert_eq!(farm.add_pool(&farming.admin, &farming.lp_token.address, &100), 0);
    farming.assert_last_event(
        ("add_pool", "pool"),
        (0u32, farming.lp_token.address.clone(), 100u64),
    );
    assert_eq!(farm.add_pool(&farming.admin, &farming.lp_token_2.address, &300), 1);
    farming.assert_last_event(
        ("add_pool", "pool"),
        (1u32, farming.lp_token_2.address.clone(), 300u64),
    );

    let config = farm.query_config();
    assert_eq!(config.pool_count, 2);
    assert_eq!(config.total_weight, 400);

    assert_eq!(
        farm.query_pool(&1),
        PoolResponse {
            pool_ref: PoolRef::Indexed(1),
            pool: PoolInfo {
                staked_token: farming.lp_token_2.address.clone(),
                weight: 300,
                acc_reward_per_share: 0,
                last_reward_block: START_BLOCK,
                total_staked: 0,
            },
            // 300 * (256 - 64)
            effective_weight: 57_600,
        }
    );
    assert_eq!(farm.query_pools().len(), 2);
    assert_eq!(farm.query_pool_id(&farming.lp_token_2.address), 1);
    // 400 * 64
    assert_eq!(farm.query_base_pool().effective_weight, 25_600);
}

#[test]
fn add_pool_requires_admin_auth() {
    let farming = Farming::new();
    let env = &farming.env;

    farming
        .farm
        .add_pool(&farming.admin, &farming.lp_token.address, &100);

    assert_eq!(
        env.auths(),
        std::vec![(
            farming.admin.clone(),
            AuthorizedInvocation {
                function: AuthorizedFunction::Contract((
                    farming.farm.address.clone(),
                    Symbol::new(env, "add_pool"),
                    (farming.admin.clone(), farming.lp_token.address.clone(), 100u64)
                        .into_val(env),
                )),
                sub_invocations: std::vec![],
            }
        )]
    );
}

#[test]
fn add_pool_by_non_admin_fails_and_creates_nothing() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    assert_eq!(
        farm.try_add_pool(user, &farming.lp_token.address, &100),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(farm.query_config().pool_count, 0);
    assert_eq!(farm.query_config().total_weight, 0);
    farming.assert_no_event(("add_pool", "pool"));

    // the failed attempt did not consume an id
    assert_eq!(farm.add_pool(&farming.admin, &farming.lp_token.address, &100), 0);
}

#[test]
fn add_pool_twice_for_the_same_token_fails() {
    let farming = Farming::new();
    let farm = &farming.farm;

    farm.add_pool(&farming.admin, &farming.lp_token.address, &100);

    assert_eq!(
        farm.try_add_pool(&farming.admin, &farming.lp_token.address, &50),
        Err(Ok(ContractError::PoolAlreadyExists))
    );
    assert_eq!(farm.query_config().pool_count, 1);
    assert_eq!(farm.query_config().total_weight, 100);
}

#[test]
fn unknown_pool_is_reported() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    farm.add_pool(&farming.admin, &farming.lp_token.address, &100);

    assert_eq!(farm.try_query_pool(&1), Err(Ok(ContractError::UnknownPool)));
    assert_eq!(
        farm.try_query_pool_id(&Address::generate(&farming.env)),
        Err(Ok(ContractError::UnknownPool))
    );
    assert_eq!(
        farm.try_deposit_pool(user, &1, &1_000),
        Err(Ok(ContractError::UnknownPool))
    );
    assert_eq!(
        farm.try_withdraw_pool(user, &1, &1_000),
        Err(Ok(ContractError::UnknownPool))
    );
    assert_eq!(farm.try_claim_pool(user, &1), Err(Ok(ContractError::UnknownPool)));
    assert_eq!(
        farm.try_query_pending_reward_pool(user, &1),
        Err(Ok(ContractError::UnknownPool))
    );
    assert_eq!(
        farm.try_query_staked_pool(user, &1),
        Err(Ok(ContractError::UnknownPool))
    );
    assert_eq!(
        farm.try_set_pool_weight(&farming.admin, &1, &10),
        Err(Ok(ContractError::UnknownPool))
    );
}

#[test]
fn set_pool_weight_updates_total_weight() {
    let farming = Farming::new();
    let farm = &farming.farm;

    farm.add_pool(&farming.admin, &farming.lp_token.address, &100);
    farm.add_pool(&farming.admin, &farming.lp_token_2.address, &100);

    farm.set_pool_weight(&farming.admin, &1, &300);
    farming.assert_last_event(("set_pool_weight", "pool"), (1u32, 100u64, 300u64));

    assert_eq!(farm.query_pool(&1).pool.weight, 300);
    assert_eq!(farm.query_config().total_weight, 400);

    farm.set_pool_weight(&farming.admin, &0, &0);
    assert_eq!(farm.query_config().total_weight, 300);
    assert_eq!(farm.query_pool(&0).effective_weight, 0);
}

#[test]
fn set_pool_weight_by_non_admin_fails() {
    let farming = Farming::new();
    let farm = &farming.farm;

    farm.add_pool(&farming.admin, &farming.lp_token.address, &100);

    assert_eq!(
        farm.try_set_pool_weight(&farming.users[0], &0, &1),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(farm.query_pool(&0).pool.weight, 100);
}

#[test]
fn set_base_ratio_emits_old_and_new_ratio() {
    let farming = Farming::new();
    let farm = &farming.farm;

    farm.set_base_ratio(&farming.admin, &128);

    farming.assert_last_event(("set_base_ratio", "ratio"), (64u32, 128u32));
    assert_eq!(farm.query_config().base_ratio, 128);
}

#[test]
fn set_base_ratio_validates_caller_and_value() {
    let farming = Farming::new();
    let farm = &farming.farm;

    assert_eq!(
        farm.try_set_base_ratio(&farming.users[0], &128),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        farm.try_set_base_ratio(&farming.admin, &257),
        Err(Ok(ContractError::InvalidBaseRatio))
    );
    assert_eq!(farm.query_config().base_ratio, 64);
    farming.assert_no_event(("set_base_ratio", "ratio"));

    // both bounds are allowed
    farm.set_base_ratio(&farming.admin, &0);
    farm.set_base_ratio(&farming.admin, &256);
    assert_eq!(farm.query_config().base_ratio, 256);
}

#[test]
fn update_pools_checkpoints_every_pool() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    farm.add_pool(&farming.admin, &farming.lp_token.address, &100);
    farm.add_pool(&farming.admin, &farming.lp_token_2.address, &100);
    farm.deposit(user, &1_000);
    farm.deposit_pool(user, &1, &1_000);

    farming.jump_to_block(START_BLOCK + 8);
    farm.update_pools();
    farming.assert_last_event(("update_pools", "block"), START_BLOCK + 8);

    let base = farm.query_base_pool().pool;
    assert_eq!(base.last_reward_block, START_BLOCK + 8);
    // 8 blocks * 100 * 1/4 over 1_000 staked
    assert_eq!(base.acc_reward_per_share, 200 * crate::PRECISION / 1_000);

    // nobody staked in pool 0, its share is skipped
    let empty = farm.query_pool(&0).pool;
    assert_eq!(empty.last_reward_block, START_BLOCK + 8);
    assert_eq!(empty.acc_reward_per_share, 0);

    // 8 blocks * 100 * 3/8 over 1_000 staked
    let staked = farm.query_pool(&1).pool;
    assert_eq!(staked.acc_reward_per_share, 300 * crate::PRECISION / 1_000);

    // checkpointing does not pay anybody
    assert_eq!(farm.query_pending_reward(user), 200);
    assert_eq!(farm.query_pending_reward_pool(user, &1), 300);
}
