use pretty_assertions::assert_eq;

use super::setup::{Farming, START_BLOCK, USER_BALANCE};
use crate::error::ContractError;

#[test]
fn withdraw_of_zero_fails() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    farm.deposit(user, &1_000);

    assert_eq!(farm.try_withdraw(user, &0), Err(Ok(ContractError::InvalidAmount)));
    assert_eq!(farm.try_withdraw(user, &-1), Err(Ok(ContractError::InvalidAmount)));
}

#[test]
fn withdraw_without_deposit_fails() {
    let farming = Farming::new();
    let farm = &farming.farm;

    assert_eq!(
        farm.try_withdraw(&farming.users[0], &1),
        Err(Ok(ContractError::InsufficientStake))
    );
}

#[test]
fn withdraw_above_stake_fails_and_keeps_stake() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    farm.deposit(user, &1_000);
    farming.jump_to_block(START_BLOCK + 1);

    assert_eq!(
        farm.try_withdraw(user, &2_000),
        Err(Ok(ContractError::InsufficientStake))
    );

    assert_eq!(farm.query_staked(user), 1_000);
    assert_eq!(farm.query_total_staked(), 1_000);
    assert_eq!(farm.query_pending_reward(user), 100);
    assert_eq!(farming.reward_token.balance(user), USER_BALANCE - 1_000);
    farming.assert_no_event(("withdraw", "base"));
}

#[test]
fn withdraw_everything_pays_out_reward() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    farm.deposit(user, &1_000);
    farming.jump_to_block(START_BLOCK + 1);

    farm.withdraw(user, &1_000);
    farming.assert_last_event(("withdraw", "base"), (user.clone(), 1_000i128, 0i128));

    assert_eq!(farm.query_staked(user), 0);
    assert_eq!(farm.query_total_staked(), 0);
    assert_eq!(farming.reward_token.balance(user), USER_BALANCE + 100);
    assert_eq!(farming.reward_token.balance(&farm.address), 0);
}

#[test]
fn withdraw_in_two_steps() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    farm.deposit(user, &1_000);

    farming.jump_to_block(START_BLOCK + 1);
    farm.withdraw(user, &500);
    farming.assert_last_event(("withdraw", "base"), (user.clone(), 500i128, 500i128));
    assert_eq!(farming.reward_token.balance(user), USER_BALANCE - 500 + 100);

    farming.jump_to_block(START_BLOCK + 2);
    farm.withdraw(user, &500);
    assert_eq!(farming.reward_token.balance(user), USER_BALANCE + 200);
    assert_eq!(farm.query_staked(user), 0);
}

#[test]
fn deposit_again_after_withdrawing_everything() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    farm.deposit(user, &1_000);
    farming.jump_to_block(START_BLOCK + 1);
    farm.withdraw(user, &1_000);

    // nothing staked in between, those blocks pay nobody
    farming.jump_to_block(START_BLOCK + 5);
    farm.deposit(user, &1_000);
    assert_eq!(farming.reward_token.balance(user), USER_BALANCE + 100 - 1_000);
    assert_eq!(farm.query_pending_reward(user), 0);

    farming.jump_to_block(START_BLOCK + 6);
    assert_eq!(farm.query_pending_reward(user), 100);
}

#[test]
fn withdraw_from_weighted_pool() {
    let farming = Farming::new();
    let farm = &farming.farm;
    let user = &farming.users[0];

    farm.add_pool(&farming.admin, &farming.lp_token.address, &100);
    farm.deposit_pool(user, &0, &1_000);
    farming.jump_to_block(START_BLOCK + 4);

    farm.withdraw_pool(user, &0, &400);
    farming.assert_last_event(
        ("withdraw", "pool"),
        (user.clone(), 0u32, 400i128, 600i128),
    );

    assert_eq!(farm.query_staked_pool(user, &0), 600);
    assert_eq!(farm.query_total_staked_pool(&0), 600);
    assert_eq!(farming.lp_token.balance(user), USER_BALANCE - 600);
    assert_eq!(farming.lp_token.balance(&farm.address), 600);
    // 4 blocks at 75 per block
    assert_eq!(farming.reward_token.balance(user), USER_BALANCE + 300);

    assert_eq!(
        farm.try_withdraw_pool(user, &0, &601),
        Err(Ok(ContractError::InsufficientStake))
    );
}
