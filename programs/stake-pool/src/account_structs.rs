use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use anchor_lang::solana_program::bpf_loader_upgradeable::{self};

#[derive(Accounts)]
#[instruction(maybe_owner: Option<Pubkey>, reward_bps: u64, pool_id: u64)]
pub struct CreatePool<'info> {
    /// Per-mint counter handing out sequential pool ids.
    #[account(
        init_if_needed,
        payer = admin,
        space = PoolIdCounter::LEN,
        seeds = [b"pool_id_counter", staking_mint.key().as_ref()],
        bump
    )]
    pub pool_id_counter: Account<'info, PoolIdCounter>,

    /// Must not exist prior to creation; `init` rejects re-initialization.
    #[account(
        init,
        payer = admin,
        space = Pool::LEN,
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump
    )]
    pub pool: Account<'info, Pool>,

    pub staking_mint: Account<'info, Mint>,
    pub reward_mint: Account<'info, Mint>,

    /// Holds undistributed rewards; authority is the pool PDA.
    #[account(
        init,
        payer = admin,
        seeds = [b"reward_vault", pool.key().as_ref(), reward_mint.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = pool
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    /// Holds all users' staked principal; authority is the pool PDA.
    #[account(
        init,
        payer = admin,
        seeds = [b"vault", pool.key().as_ref(), staking_mint.key().as_ref()],
        bump,
        token::mint = staking_mint,
        token::authority = pool
    )]
    pub pool_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ StakeError::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct GetPoolInfo<'info> {
    #[account(
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,
    pub staking_mint: Account<'info, Mint>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct SetStakingActive<'info> {
    #[account(
        mut,
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    pub admin: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct UpdateRewardPercentage<'info> {
    #[account(
        mut,
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    pub admin: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct UpdateRewardMint<'info> {
    #[account(
        mut,
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,

    pub new_reward_mint: Account<'info, Mint>,

    /// Vault for the new reward mint. `init_if_needed` is acceptable here:
    /// the handler is owner-gated, the address is derived from the pool and
    /// the new mint, and the authority is always the pool PDA.
    #[account(
        init_if_needed,
        payer = admin,
        seeds = [b"reward_vault", pool.key().as_ref(), new_reward_mint.key().as_ref()],
        bump,
        token::mint = new_reward_mint,
        token::authority = pool,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct UpdatePoolAuthority<'info> {
    #[account(
        mut,
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// Current authority must sign to authorize the rotation.
    pub current_authority: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct DepositReward<'info> {
    #[account(
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    pub admin: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = admin_reward_account.mint == pool.reward_mint
    )]
    pub admin_reward_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [b"reward_vault", pool.key().as_ref(), pool.reward_mint.as_ref()],
        bump
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct WithdrawReward<'info> {
    #[account(
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    pub admin: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = admin_reward_account.mint == pool.reward_mint
    )]
    pub admin_reward_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [b"reward_vault", pool.key().as_ref(), pool.reward_mint.as_ref()],
        bump
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct DepositStake<'info> {
    #[account(
        mut,
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// The user's stake ledger entry, created lazily on first deposit. The
    /// seeds bind it to (pool, user), so a signer can never present another
    /// user's entry or an entry from a different pool.
    #[account(
        init_if_needed,
        payer = user,
        space = UserStake::LEN,
        seeds = [b"user_stake", pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub user_stake: Account<'info, UserStake>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = user_token_account.mint == pool.staking_mint,
        constraint = user_token_account.owner == user.key(),
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [b"vault", pool.key().as_ref(), pool.staking_mint.as_ref()],
        bump,
    )]
    pub pool_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct WithdrawStake<'info> {
    #[account(
        mut,
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// Both checks are required: the entry must derive from this pool and the
    /// signer must be its recorded owner.
    #[account(
        mut,
        constraint = user_stake.owner == user.key() @ StakeError::Unauthorized,
        constraint = user_stake.pool == pool.key() @ StakeError::InvalidPoolAssociation,
        seeds = [b"user_stake", pool.key().as_ref(), user.key().as_ref()],
        bump = user_stake.bump,
    )]
    pub user_stake: Account<'info, UserStake>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = user_token_account.mint == pool.staking_mint,
        constraint = user_token_account.owner == user.key(),
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = user_reward_account.mint == pool.reward_mint,
        constraint = user_reward_account.owner == user.key(),
    )]
    pub user_reward_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [b"vault", pool.key().as_ref(), pool.staking_mint.as_ref()],
        bump,
    )]
    pub pool_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [b"reward_vault", pool.key().as_ref(), pool.reward_mint.as_ref()],
        bump,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct ClaimReward<'info> {
    #[account(
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        constraint = user_stake.owner == user.key() @ StakeError::Unauthorized,
        constraint = user_stake.pool == pool.key() @ StakeError::InvalidPoolAssociation,
        seeds = [b"user_stake", pool.key().as_ref(), user.key().as_ref()],
        bump = user_stake.bump,
    )]
    pub user_stake: Account<'info, UserStake>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub staking_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = user_reward_account.mint == pool.reward_mint,
        constraint = user_reward_account.owner == user.key(),
    )]
    pub user_reward_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [b"reward_vault", pool.key().as_ref(), pool.reward_mint.as_ref()],
        bump
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct GetUserStakeInfo<'info> {
    #[account(
        constraint = user_stake.pool == pool.key() @ StakeError::InvalidPoolAssociation
    )]
    pub user_stake: Account<'info, UserStake>,

    #[account(
        seeds = [b"staking_pool", staking_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    pub staking_mint: Account<'info, Mint>,
}

// Helper function to derive the program data address
fn get_program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}
