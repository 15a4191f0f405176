pub mod account_structs;
/// # stake pool - Token Staking with Epoch-Based Reward Accrual
///
/// ## Business Process Flow
///
/// 1. Pool Setup:
///    - Admin creates a pool for a staking mint, choosing the reward mint
///      and the initial annual reward rate (basis points)
///    - Pool ids are handed out sequentially per staking mint by a counter
///      PDA, so several pools can coexist for one mint
///    - The pool PDA owns two token vaults: one for staked principal and one
///      for undistributed rewards
///
/// 2. User Staking Flow:
///    a. Deposit:
///       - User deposits staking tokens into the pool vault
///       - A per-(pool, user) stake entry is created lazily on first deposit
///         and reused for the life of the pool
///    b. Accrual:
///       - Rewards accrue continuously per slot at the pool's rate and are
///         settled lazily whenever the entry is touched
///       - Rate changes append epochs to a bounded history, so accrual spans
///         rate changes correctly without retroactive edits
///    c. Exit:
///       - Withdrawing principal always works, even on a disabled pool
///       - Rewards are paid from the reward vault as far as it can cover;
///         any shortfall stays on the entry as unclaimed for a later claim
///
/// 3. Administrative Functions:
///    - Fund or drain the reward vault
///    - Update the reward rate or (while no one is staked) the reward mint
///    - Enable/disable staking, rotate the pool authority
///
/// Security is maintained through PDAs (Program Derived Addresses): every
/// account is re-derived from its parents (pool from mint and id, vaults and
/// stake entries from the pool) and every admin or user operation checks the
/// signer against the recorded owner.
pub mod error;
pub mod events;
pub mod guard;
pub mod processor;
pub mod state;

use account_structs::*;
use anchor_lang::prelude::*;
use state::{PoolData, UserStakeData, UserStakeWithReward};

declare_id!("GtgbhnDFLdbh1kBu4htmBbZrB3c5C8MP8px8Yq5jbstX");

#[program]
pub mod stake_pool {
    use super::*;

    /// Creates a staking pool for `staking_mint` with the given initial
    /// annual reward rate (basis points, 10_000 = 100% APY). `pool_id` must
    /// equal the counter's next id; the owner defaults to the signer.
    pub fn create_pool(
        ctx: Context<CreatePool>,
        maybe_owner: Option<Pubkey>,
        reward_bps: u64,
        pool_id: u64,
    ) -> Result<()> {
        processor::create_pool(ctx, maybe_owner, reward_bps, pool_id)
    }

    /// Enables or disables staking. Disabling blocks new deposits and
    /// claims but never principal withdrawal or reward funding.
    pub fn set_staking_active(
        ctx: Context<SetStakingActive>,
        pool_id: u64,
        active: bool,
    ) -> Result<()> {
        processor::set_staking_active(ctx, pool_id, active)
    }

    /// Appends a new rate epoch effective at the current slot. Owner only.
    pub fn update_reward_percentage(
        ctx: Context<UpdateRewardPercentage>,
        pool_id: u64,
        new_bps: u64,
    ) -> Result<()> {
        processor::update_reward_percentage(ctx, pool_id, new_bps)
    }

    /// Switches the pool to a new reward mint and vault. Owner only, and
    /// only while nothing is staked.
    pub fn update_reward_mint(ctx: Context<UpdateRewardMint>, pool_id: u64) -> Result<()> {
        processor::update_reward_mint(ctx, pool_id)
    }

    /// Rotates the pool authority. Current authority only.
    pub fn update_pool_authority(
        ctx: Context<UpdatePoolAuthority>,
        pool_id: u64,
        new_authority: Pubkey,
    ) -> Result<()> {
        processor::update_pool_authority(ctx, pool_id, new_authority)
    }

    /// Moves reward tokens from the owner's account into the reward vault.
    pub fn deposit_reward(ctx: Context<DepositReward>, pool_id: u64, amount: u64) -> Result<()> {
        processor::deposit_reward(ctx, pool_id, amount)
    }

    /// Moves reward tokens from the reward vault back to the owner.
    pub fn withdraw_reward(ctx: Context<WithdrawReward>, pool_id: u64, amount: u64) -> Result<()> {
        processor::withdraw_reward(ctx, pool_id, amount)
    }

    /// Stakes `amount` tokens, settling any accrued reward first.
    pub fn deposit_stake(ctx: Context<DepositStake>, pool_id: u64, amount: u64) -> Result<()> {
        processor::deposit_stake(ctx, pool_id, amount)
    }

    /// Withdraws `amount` staked tokens and pays out as much of the settled
    /// reward as the vault covers. `amount == 0` is a claim-only call.
    pub fn withdraw_stake(ctx: Context<WithdrawStake>, pool_id: u64, amount: u64) -> Result<()> {
        processor::withdraw_stake(ctx, pool_id, amount)
    }

    /// Claims accrued rewards without touching the staked principal.
    pub fn claim_reward(ctx: Context<ClaimReward>, pool_id: u64) -> Result<()> {
        processor::claim_reward(ctx, pool_id)
    }

    pub fn get_pool_info(ctx: Context<GetPoolInfo>, pool_id: u64) -> Result<PoolData> {
        processor::get_pool_info(ctx, pool_id)
    }

    pub fn get_user_stake_info(
        ctx: Context<GetUserStakeInfo>,
        pool_id: u64,
    ) -> Result<UserStakeData> {
        processor::get_user_stake_info(ctx, pool_id)
    }

    pub fn get_user_stake_with_reward(
        ctx: Context<GetUserStakeInfo>,
        pool_id: u64,
    ) -> Result<UserStakeWithReward> {
        processor::get_user_stake_with_reward(ctx, pool_id)
    }
}
