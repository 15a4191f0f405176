use crate::account_structs::*;
use crate::error::*;
use crate::events::*;
#[cfg(feature = "restricted-creator")]
use crate::guard::validate_program_update_authority;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

/// Rejects withdrawal destinations that can never be legitimate: the zero
/// address, the pool PDA, a vault PDA, or a token mint. The owning wallet is
/// checked the same way.
fn validate_withdrawal_address(
    token_account_address: &Pubkey,
    token_account_owner: &Pubkey,
    pool_pda: &Pubkey,
    reward_vault_pda: &Pubkey,
    staking_mint: &Pubkey,
    reward_mint: &Pubkey,
) -> Result<()> {
    require!(
        *token_account_address != Pubkey::default(),
        StakeError::InvalidWithdrawalAddress
    );
    require!(
        *token_account_address != *pool_pda,
        StakeError::InvalidWithdrawalAddress
    );
    require!(
        *token_account_address != *reward_vault_pda,
        StakeError::InvalidWithdrawalAddress
    );
    require!(
        *token_account_address != *staking_mint,
        StakeError::InvalidWithdrawalAddress
    );
    require!(
        *token_account_address != *reward_mint,
        StakeError::InvalidWithdrawalAddress
    );
    require!(
        *token_account_owner != Pubkey::default(),
        StakeError::InvalidWithdrawalAddress
    );
    require!(
        *token_account_owner != *pool_pda,
        StakeError::InvalidWithdrawalAddress
    );
    Ok(())
}

/// A PDA cannot sign, so rotating the authority to the pool PDA or the zero
/// address would permanently lock the pool out of admin operations.
fn validate_authority_address(address: &Pubkey, pool_pda: &Pubkey) -> Result<()> {
    require!(
        *address != Pubkey::default(),
        StakeError::InvalidAuthorityAddress
    );
    require!(*address != *pool_pda, StakeError::InvalidAuthorityAddress);
    Ok(())
}

pub fn create_pool(
    ctx: Context<CreatePool>,
    maybe_owner: Option<Pubkey>,
    reward_bps: u64,
    pool_id: u64,
) -> Result<()> {
    #[cfg(feature = "restricted-creator")]
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.admin)?;

    #[cfg(feature = "same-asset-only")]
    require_keys_eq!(
        ctx.accounts.reward_mint.key(),
        ctx.accounts.staking_mint.key(),
        StakeError::RewardMintMustMatchStakeMint
    );

    require!(
        reward_bps <= MAX_REWARD_BPS,
        StakeError::InvalidRewardPercentage
    );

    let pool_key = ctx.accounts.pool.key();

    let counter = &mut ctx.accounts.pool_id_counter;
    if counter.staking_mint == Pubkey::default() {
        counter.staking_mint = ctx.accounts.staking_mint.key();
        counter.bump = ctx.bumps.pool_id_counter;
    }

    // Ids are handed out strictly sequentially per staking mint.
    require!(pool_id == counter.next_pool_id, StakeError::InvalidPoolId);
    counter.next_pool_id = counter
        .next_pool_id
        .checked_add(1)
        .ok_or(StakeError::PoolCounterOverflow)?;

    let clock = Clock::get()?;
    let pool = &mut ctx.accounts.pool;
    pool.owner = maybe_owner.unwrap_or(ctx.accounts.admin.key());
    pool.staking_mint = ctx.accounts.staking_mint.key();
    pool.reward_mint = ctx.accounts.reward_mint.key();
    pool.reward_vault = ctx.accounts.reward_vault.key();
    pool.total_staked = 0;
    pool.bump = ctx.bumps.pool;
    pool.is_active = true;
    pool.pool_id = pool_id;
    pool.push_epoch(reward_bps, clock.slot);

    emit!(PoolCreatedEvent {
        pool: pool_key,
        staking_mint: pool.staking_mint,
        reward_mint: pool.reward_mint,
        owner: pool.owner,
        reward_bps,
        pool_id,
        slot: clock.slot,
    });

    msg!("Staking pool {} created at {}", pool_id, pool_key);

    Ok(())
}

pub fn set_staking_active(ctx: Context<SetStakingActive>, _pool_id: u64, active: bool) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    require!(
        pool.owner == ctx.accounts.admin.key(),
        StakeError::Unauthorized
    );
    pool.is_active = active;

    let clock = Clock::get()?;
    emit!(StakingActiveChangedEvent {
        pool: pool.key(),
        is_active: active,
        admin: ctx.accounts.admin.key(),
        slot: clock.slot,
    });

    msg!(
        "Pool staking is now {}",
        if active { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub fn update_reward_percentage(
    ctx: Context<UpdateRewardPercentage>,
    _pool_id: u64,
    new_bps: u64,
) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    require!(
        pool.owner == ctx.accounts.admin.key(),
        StakeError::Unauthorized
    );
    require!(new_bps <= MAX_REWARD_BPS, StakeError::InvalidRewardPercentage);

    let old_bps = pool.reward_bps;
    let clock = Clock::get()?;
    // Appends a new rate epoch; already-settled rewards are never recomputed.
    pool.push_epoch(new_bps, clock.slot);

    emit!(RewardRateUpdatedEvent {
        pool: pool.key(),
        old_bps,
        new_bps,
        admin: ctx.accounts.admin.key(),
        slot: clock.slot,
    });

    msg!("Reward rate updated to {} bps", new_bps);

    Ok(())
}

pub fn update_reward_mint(ctx: Context<UpdateRewardMint>, _pool_id: u64) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    require!(
        pool.owner == ctx.accounts.admin.key(),
        StakeError::Unauthorized
    );
    // Accrued rewards are denominated in the current reward mint; swapping it
    // out from under active stakers would strand their unclaimed balances.
    require!(
        pool.total_staked == 0,
        StakeError::CannotChangeRewardAssetWithActiveStakers
    );

    pool.reward_mint = ctx.accounts.new_reward_mint.key();
    pool.reward_vault = ctx.accounts.reward_vault.key();

    let clock = Clock::get()?;
    emit!(RewardMintUpdatedEvent {
        pool: pool.key(),
        new_reward_mint: pool.reward_mint,
        new_reward_vault: pool.reward_vault,
        admin: ctx.accounts.admin.key(),
        slot: clock.slot,
    });

    msg!("Reward mint updated to {}", pool.reward_mint);

    Ok(())
}

pub fn update_pool_authority(
    ctx: Context<UpdatePoolAuthority>,
    _pool_id: u64,
    new_authority: Pubkey,
) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    require!(
        pool.owner == ctx.accounts.current_authority.key(),
        StakeError::Unauthorized
    );
    validate_authority_address(&new_authority, &pool.key())?;

    let old_authority = pool.owner;
    pool.owner = new_authority;

    let clock = Clock::get()?;
    emit!(PoolAuthorityUpdatedEvent {
        pool: pool.key(),
        old_authority,
        new_authority,
        slot: clock.slot,
    });

    msg!("Pool authority rotated to {}", new_authority);

    Ok(())
}

pub fn deposit_reward(ctx: Context<DepositReward>, _pool_id: u64, amount: u64) -> Result<()> {
    let pool = &ctx.accounts.pool;
    require!(
        pool.owner == ctx.accounts.admin.key(),
        StakeError::Unauthorized
    );

    // Deliberately not gated on is_active: refilling the reward reserve must
    // stay possible while a pool is disabled.
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.admin_reward_account.to_account_info(),
                to: ctx.accounts.reward_vault.to_account_info(),
                authority: ctx.accounts.admin.to_account_info(),
            },
        ),
        amount,
    )?;

    let clock = Clock::get()?;
    emit!(RewardDepositedEvent {
        pool: pool.key(),
        amount,
        admin: ctx.accounts.admin.key(),
        slot: clock.slot,
    });

    msg!("Reward deposited: {} tokens", amount);

    Ok(())
}

pub fn withdraw_reward(ctx: Context<WithdrawReward>, _pool_id: u64, amount: u64) -> Result<()> {
    let pool = &ctx.accounts.pool;
    require!(
        pool.owner == ctx.accounts.admin.key(),
        StakeError::Unauthorized
    );

    validate_withdrawal_address(
        &ctx.accounts.admin_reward_account.key(),
        &ctx.accounts.admin_reward_account.owner,
        &pool.key(),
        &ctx.accounts.reward_vault.key(),
        &pool.staking_mint,
        &pool.reward_mint,
    )?;

    let pool_id_bytes = pool.pool_id.to_le_bytes();
    let seeds = &[
        b"staking_pool".as_ref(),
        pool.staking_mint.as_ref(),
        pool_id_bytes.as_ref(),
        &[pool.bump],
    ];
    let signer = &[&seeds[..]];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.reward_vault.to_account_info(),
                to: ctx.accounts.admin_reward_account.to_account_info(),
                authority: pool.to_account_info(),
            },
            signer,
        ),
        amount,
    )?;

    let clock = Clock::get()?;
    emit!(RewardWithdrawnEvent {
        pool: pool.key(),
        amount,
        admin: ctx.accounts.admin.key(),
        slot: clock.slot,
    });

    msg!("Admin withdrew {} reward tokens", amount);

    Ok(())
}

pub fn deposit_stake(ctx: Context<DepositStake>, _pool_id: u64, amount: u64) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let user_stake = &mut ctx.accounts.user_stake;
    let user = &ctx.accounts.user;
    let clock = Clock::get()?;

    require!(pool.is_active, StakeError::StakingDisabled);

    if user_stake.owner == Pubkey::default() {
        user_stake.owner = user.key();
        user_stake.pool = pool.key();
        user_stake.bump = ctx.bumps.user_stake;
        user_stake.last_accrual_slot = clock.slot;
    } else {
        // Entry may be reused after a full withdrawal; it must still belong
        // to this pool, and anything accrued since the last touch is settled
        // before the principal changes.
        require!(
            user_stake.pool == pool.key(),
            StakeError::InvalidPoolAssociation
        );
        user_stake.settle(pool, clock.slot)?;
    }

    user_stake.amount = user_stake
        .amount
        .checked_add(amount)
        .ok_or(StakeError::ArithmeticOverflow)?;
    pool.total_staked = pool
        .total_staked
        .checked_add(amount)
        .ok_or(StakeError::ArithmeticOverflow)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user_token_account.to_account_info(),
                to: ctx.accounts.pool_vault.to_account_info(),
                authority: user.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(StakeDepositedEvent {
        user: user.key(),
        pool: pool.key(),
        amount,
        total_user_stake: user_stake.amount,
        total_pool_stake: pool.total_staked,
        slot: clock.slot,
    });

    msg!("{} tokens staked by {}", amount, user.key());

    Ok(())
}

pub fn withdraw_stake(ctx: Context<WithdrawStake>, _pool_id: u64, amount: u64) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let user_stake = &mut ctx.accounts.user_stake;
    let clock = Clock::get()?;

    // A zero-amount withdrawal is a claim without exiting and is treated as a
    // staking action: it stays gated on is_active. Withdrawing principal is
    // never gated, so users can always exit a disabled pool.
    if amount == 0 {
        require!(pool.is_active, StakeError::StakingDisabled);
    }
    require!(user_stake.amount >= amount, StakeError::InsufficientStake);

    user_stake.settle(pool, clock.slot)?;

    // Pay out whatever the reward vault can cover; the rest stays unclaimed
    // so an underfunded vault can never block a principal withdrawal.
    let reward_to_send = user_stake.unclaimed.min(ctx.accounts.reward_vault.amount);
    user_stake.unclaimed -= reward_to_send;

    user_stake.amount = user_stake
        .amount
        .checked_sub(amount)
        .ok_or(StakeError::ArithmeticOverflow)?;
    pool.total_staked = pool
        .total_staked
        .checked_sub(amount)
        .ok_or(StakeError::ArithmeticOverflow)?;

    let pool_id_bytes = pool.pool_id.to_le_bytes();
    let seeds = &[
        b"staking_pool".as_ref(),
        pool.staking_mint.as_ref(),
        pool_id_bytes.as_ref(),
        &[pool.bump],
    ];
    let signer = &[&seeds[..]];

    if amount > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.pool_vault.to_account_info(),
                    to: ctx.accounts.user_token_account.to_account_info(),
                    authority: pool.to_account_info(),
                },
                signer,
            ),
            amount,
        )?;
    }

    if reward_to_send > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.reward_vault.to_account_info(),
                    to: ctx.accounts.user_reward_account.to_account_info(),
                    authority: pool.to_account_info(),
                },
                signer,
            ),
            reward_to_send,
        )?;
    }

    emit!(StakeWithdrawnEvent {
        user: ctx.accounts.user.key(),
        pool: pool.key(),
        amount,
        rewards_sent: reward_to_send,
        rewards_unclaimed: user_stake.unclaimed,
        remaining_user_stake: user_stake.amount,
        total_pool_stake: pool.total_staked,
        slot: clock.slot,
    });

    msg!("Withdrawn stake: {}", amount);
    if user_stake.unclaimed > 0 {
        msg!(
            "Reward vault short: {} tokens kept as unclaimed",
            user_stake.unclaimed
        );
    }

    Ok(())
}

pub fn claim_reward(ctx: Context<ClaimReward>, _pool_id: u64) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let user_stake = &mut ctx.accounts.user_stake;
    let clock = Clock::get()?;

    require!(pool.is_active, StakeError::StakingDisabled);
    require!(
        user_stake.amount > 0 || user_stake.unclaimed > 0,
        StakeError::NoRewardsAvailable
    );

    user_stake.settle(pool, clock.slot)?;

    let reward_to_send = user_stake.unclaimed.min(ctx.accounts.reward_vault.amount);
    user_stake.unclaimed -= reward_to_send;

    if reward_to_send > 0 {
        let pool_id_bytes = pool.pool_id.to_le_bytes();
        let seeds = &[
            b"staking_pool".as_ref(),
            pool.staking_mint.as_ref(),
            pool_id_bytes.as_ref(),
            &[pool.bump],
        ];
        let signer = &[&seeds[..]];

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.reward_vault.to_account_info(),
                    to: ctx.accounts.user_reward_account.to_account_info(),
                    authority: pool.to_account_info(),
                },
                signer,
            ),
            reward_to_send,
        )?;
    }

    emit!(RewardClaimedEvent {
        user: ctx.accounts.user.key(),
        pool: pool.key(),
        amount: reward_to_send,
        unclaimed_remaining: user_stake.unclaimed,
        total_earned: user_stake.total_earned,
        slot: clock.slot,
    });

    msg!("Claimed {} reward tokens", reward_to_send);

    Ok(())
}

pub fn get_pool_info(ctx: Context<GetPoolInfo>, _pool_id: u64) -> Result<PoolData> {
    let pool = &ctx.accounts.pool;
    Ok(PoolData {
        staking_mint: pool.staking_mint,
        reward_mint: pool.reward_mint,
        reward_vault: pool.reward_vault,
        owner: pool.owner,
        total_staked: pool.total_staked,
        reward_bps: pool.reward_bps,
        bump: pool.bump,
        is_active: pool.is_active,
        reward_epochs: pool.reward_epochs.clone(),
        last_rate_update_slot: pool.last_rate_update_slot,
        pool_id: pool.pool_id,
    })
}

pub fn get_user_stake_info(ctx: Context<GetUserStakeInfo>, _pool_id: u64) -> Result<UserStakeData> {
    let user_stake = &ctx.accounts.user_stake;
    Ok(UserStakeData {
        owner: user_stake.owner,
        pool: user_stake.pool,
        amount: user_stake.amount,
        last_accrual_slot: user_stake.last_accrual_slot,
        total_earned: user_stake.total_earned,
        unclaimed: user_stake.unclaimed,
        bump: user_stake.bump,
    })
}

pub fn get_user_stake_with_reward(
    ctx: Context<GetUserStakeInfo>,
    _pool_id: u64,
) -> Result<UserStakeWithReward> {
    let user_stake = &ctx.accounts.user_stake;
    let pool = &ctx.accounts.pool;
    let clock = Clock::get()?;

    let pending_reward =
        pool.pending_reward(user_stake.amount, user_stake.last_accrual_slot, clock.slot)?;

    Ok(UserStakeWithReward {
        owner: user_stake.owner,
        pool: user_stake.pool,
        amount: user_stake.amount,
        last_accrual_slot: user_stake.last_accrual_slot,
        total_earned: user_stake.total_earned,
        unclaimed: user_stake.unclaimed,
        bump: user_stake.bump,
        pending_reward,
    })
}
