use anchor_lang::prelude::*;

#[error_code]
pub enum StakeError {
    #[msg("Unauthorized: only the pool owner can perform this action")]
    Unauthorized = 1,
    #[msg("Staking is currently disabled for this pool")]
    StakingDisabled = 2,
    #[msg("No rewards available to claim")]
    NoRewardsAvailable = 3,
    #[msg("Invalid reward percentage: must be <= 100,000,000 bps")]
    InvalidRewardPercentage = 4,
    #[msg("Invalid withdrawal address: cannot be the zero address, a pool or vault PDA, or a token mint")]
    InvalidWithdrawalAddress = 5,
    #[msg("Invalid authority address: cannot be the zero address or the pool PDA")]
    InvalidAuthorityAddress = 6,
    #[msg("User stake account does not belong to this pool")]
    InvalidPoolAssociation = 7,
    #[msg("Invalid pool id: must match the next expected pool id from the counter")]
    InvalidPoolId = 8,
    #[msg("Pool counter overflow: maximum number of pools reached for this mint")]
    PoolCounterOverflow = 9,
    #[msg("Insufficient staked balance for the requested withdrawal")]
    InsufficientStake = 10,
    #[msg("Arithmetic overflow in reward or balance computation")]
    ArithmeticOverflow = 11,

    #[msg("Reward mint must match the staking mint")]
    RewardMintMustMatchStakeMint = 12,
    #[msg("Signer is not authorized to create pools")]
    UnauthorizedPoolCreator = 13,
    #[msg("Cannot change the reward mint while stakers are active")]
    CannotChangeRewardAssetWithActiveStakers = 14,

    #[msg("ProgramData account did not match expected PDA.")]
    InvalidProgramData = 15,
    #[msg("Program has no upgrade authority (set to None).")]
    NoUpgradeAuthority = 16,
}
