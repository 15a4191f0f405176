use anchor_lang::prelude::*;

#[event]
pub struct PoolCreatedEvent {
    pub pool: Pubkey,
    pub staking_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub owner: Pubkey,
    pub reward_bps: u64,
    pub pool_id: u64,
    pub slot: u64,
}

#[event]
pub struct StakingActiveChangedEvent {
    pub pool: Pubkey,
    pub is_active: bool,
    pub admin: Pubkey,
    pub slot: u64,
}

#[event]
pub struct RewardMintUpdatedEvent {
    pub pool: Pubkey,
    pub new_reward_mint: Pubkey,
    pub new_reward_vault: Pubkey,
    pub admin: Pubkey,
    pub slot: u64,
}

#[event]
pub struct RewardRateUpdatedEvent {
    pub pool: Pubkey,
    pub old_bps: u64,
    pub new_bps: u64,
    pub admin: Pubkey,
    pub slot: u64,
}

#[event]
pub struct PoolAuthorityUpdatedEvent {
    pub pool: Pubkey,
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
    pub slot: u64,
}

#[event]
pub struct RewardDepositedEvent {
    pub pool: Pubkey,
    pub amount: u64,
    pub admin: Pubkey,
    pub slot: u64,
}

#[event]
pub struct RewardWithdrawnEvent {
    pub pool: Pubkey,
    pub amount: u64,
    pub admin: Pubkey,
    pub slot: u64,
}

#[event]
pub struct StakeDepositedEvent {
    pub user: Pubkey,
    pub pool: Pubkey,
    pub amount: u64,
    pub total_user_stake: u64,
    pub total_pool_stake: u64,
    pub slot: u64,
}

#[event]
pub struct StakeWithdrawnEvent {
    pub user: Pubkey,
    pub pool: Pubkey,
    pub amount: u64,
    pub rewards_sent: u64,
    pub rewards_unclaimed: u64,
    pub remaining_user_stake: u64,
    pub total_pool_stake: u64,
    pub slot: u64,
}

#[event]
pub struct RewardClaimedEvent {
    pub user: Pubkey,
    pub pool: Pubkey,
    pub amount: u64,
    pub unclaimed_remaining: u64,
    pub total_earned: u64,
    pub slot: u64,
}
