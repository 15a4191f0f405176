use anchor_lang::prelude::*;

use crate::error::StakeError;

/// Slots per year used for reward accrual.
/// Solana produces blocks at roughly 400ms per slot (2.5 slots/second):
/// 365 days * 24h * 60m * 60s * 2.5, rounded down to a conservative estimate.
pub const SLOTS_PER_YEAR: u64 = 78_840_000;

/// Basis-point denominator: 10_000 bps = 100% APY.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Upper bound on the reward rate (1,000,000% APY) to catch fat-fingered values.
pub const MAX_REWARD_BPS: u64 = 100_000_000;

/// Retained reward-rate history. Older epochs are evicted; stakes left
/// unsettled across more than this many rate changes understate accrual.
pub const MAX_REWARD_EPOCHS: usize = 10;

/// One period with a fixed reward rate, starting at `start_slot` and running
/// until the next epoch begins (or until now, for the most recent epoch).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct RewardEpoch {
    pub reward_bps: u64,
    pub start_slot: u64,
}

#[account]
pub struct Pool {
    pub staking_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub owner: Pubkey,
    pub total_staked: u64,
    /// Current annual reward rate in basis points (10_000 bps = 100% APY).
    pub reward_bps: u64,
    pub bump: u8,
    pub is_active: bool,
    /// Rate history, chronological, most recent last. Capped at
    /// `MAX_REWARD_EPOCHS`; the oldest epoch is dropped on overflow.
    pub reward_epochs: Vec<RewardEpoch>,
    pub last_rate_update_slot: u64,
    /// Immutable identifier assigned from the per-mint counter at creation.
    pub pool_id: u64,
}

impl Pool {
    pub const LEN: usize =
        8 + 32 + 32 + 32 + 32 + 8 + 8 + 1 + 1 + 4 + (MAX_REWARD_EPOCHS * 16) + 8 + 8;

    /// Records a rate change effective at `slot`. Evicts the oldest epoch
    /// once the history is full.
    pub fn push_epoch(&mut self, reward_bps: u64, slot: u64) {
        if self.reward_epochs.len() >= MAX_REWARD_EPOCHS {
            self.reward_epochs.remove(0);
        }
        self.reward_epochs.push(RewardEpoch {
            reward_bps,
            start_slot: slot,
        });
        self.reward_bps = reward_bps;
        self.last_rate_update_slot = slot;
    }

    /// Reward accrued by `amount` over `[from_slot, to_slot)`, summed across
    /// every rate epoch the range overlaps. The principal must be constant
    /// over the range; callers settle before changing it.
    pub fn pending_reward(&self, amount: u64, from_slot: u64, to_slot: u64) -> Result<u64> {
        if amount == 0 || to_slot <= from_slot {
            return Ok(0);
        }

        let mut total: u64 = 0;
        let mut period_start = from_slot;

        for (i, epoch) in self.reward_epochs.iter().enumerate() {
            if epoch.start_slot >= to_slot {
                break;
            }

            let period_end = match self.reward_epochs.get(i + 1) {
                Some(next) => {
                    if next.start_slot <= period_start {
                        // Epoch ended before the accrual range began.
                        continue;
                    }
                    next.start_slot.min(to_slot)
                }
                None => to_slot,
            };

            let effective_start = period_start.max(epoch.start_slot);
            if period_end > effective_start {
                let reward = accrued(amount, epoch.reward_bps, period_end - effective_start)?;
                total = total
                    .checked_add(reward)
                    .ok_or(StakeError::ArithmeticOverflow)?;
            }

            period_start = period_end;
            if period_start >= to_slot {
                break;
            }
        }

        Ok(total)
    }
}

/// Tracks the next pool id for one staking mint, so several pools can exist
/// for the same mint without colliding.
#[account]
pub struct PoolIdCounter {
    pub staking_mint: Pubkey,
    pub next_pool_id: u64,
    pub bump: u8,
}

impl PoolIdCounter {
    pub const LEN: usize = 8 + 32 + 8 + 1;
}

#[account]
pub struct UserStake {
    pub owner: Pubkey,
    pub pool: Pubkey,
    /// Currently staked principal.
    pub amount: u64,
    /// Slot at which rewards were last settled into `unclaimed`.
    pub last_accrual_slot: u64,
    /// Lifetime rewards credited, paid out or not. Monotone non-decreasing.
    pub total_earned: u64,
    /// Rewards credited but not yet paid out. Only decreases when a transfer
    /// to the user actually succeeds.
    pub unclaimed: u64,
    pub bump: u8,
}

impl UserStake {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 8 + 8 + 8 + 1;

    /// Settles rewards accrued since the last settlement into `unclaimed`
    /// and `total_earned`. Must run before any change to `amount`.
    pub fn settle(&mut self, pool: &Pool, now_slot: u64) -> Result<()> {
        let pending = pool.pending_reward(self.amount, self.last_accrual_slot, now_slot)?;
        if pending > 0 {
            self.unclaimed = self
                .unclaimed
                .checked_add(pending)
                .ok_or(StakeError::ArithmeticOverflow)?;
            self.total_earned = self
                .total_earned
                .checked_add(pending)
                .ok_or(StakeError::ArithmeticOverflow)?;
        }
        self.last_accrual_slot = now_slot;
        Ok(())
    }
}

/// Return data for `get_pool_info`.
#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct PoolData {
    pub staking_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub owner: Pubkey,
    pub total_staked: u64,
    pub reward_bps: u64,
    pub bump: u8,
    pub is_active: bool,
    pub reward_epochs: Vec<RewardEpoch>,
    pub last_rate_update_slot: u64,
    pub pool_id: u64,
}

/// Return data for `get_user_stake_info`.
#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct UserStakeData {
    pub owner: Pubkey,
    pub pool: Pubkey,
    pub amount: u64,
    pub last_accrual_slot: u64,
    pub total_earned: u64,
    pub unclaimed: u64,
    pub bump: u8,
}

/// Return data for `get_user_stake_with_reward`: the stake entry plus the
/// reward accrued since the last settlement, computed at the current slot.
#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct UserStakeWithReward {
    pub owner: Pubkey,
    pub pool: Pubkey,
    pub amount: u64,
    pub last_accrual_slot: u64,
    pub total_earned: u64,
    pub unclaimed: u64,
    pub bump: u8,
    pub pending_reward: u64,
}

/// `floor(amount * rate_bps * elapsed_slots / SLOTS_PER_YEAR / 10_000)`,
/// computed in u128. Multiplications are checked; overflow surfaces as
/// `ArithmeticOverflow`. Division truncates, so small principals over short
/// intervals legitimately round to zero.
pub fn accrued(amount: u64, rate_bps: u64, elapsed_slots: u64) -> Result<u64> {
    let reward = (amount as u128)
        .checked_mul(rate_bps as u128)
        .and_then(|v| v.checked_mul(elapsed_slots as u128))
        .ok_or(StakeError::ArithmeticOverflow)?
        / SLOTS_PER_YEAR as u128
        / BPS_DENOMINATOR;
    u64::try_from(reward).map_err(|_| error!(StakeError::ArithmeticOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with_epochs(epochs: Vec<RewardEpoch>) -> Pool {
        let current = epochs.last().map(|e| e.reward_bps).unwrap_or(0);
        let last_slot = epochs.last().map(|e| e.start_slot).unwrap_or(0);
        Pool {
            staking_mint: Pubkey::default(),
            reward_mint: Pubkey::default(),
            reward_vault: Pubkey::default(),
            owner: Pubkey::default(),
            total_staked: 0,
            reward_bps: current,
            bump: 255,
            is_active: true,
            reward_epochs: epochs,
            last_rate_update_slot: last_slot,
            pool_id: 0,
        }
    }

    fn stake(amount: u64, last_accrual_slot: u64) -> UserStake {
        UserStake {
            owner: Pubkey::default(),
            pool: Pubkey::default(),
            amount,
            last_accrual_slot,
            total_earned: 0,
            unclaimed: 0,
            bump: 255,
        }
    }

    #[test]
    fn test_accrued_ten_percent_over_hundred_slots() {
        // 100M units at 10% APY for 100 slots:
        // floor(100_000_000 * 1000 * 100 / 78_840_000 / 10_000) = 12
        assert_eq!(accrued(100_000_000, 1_000, 100).unwrap(), 12);
    }

    #[test]
    fn test_accrued_truncates_to_zero() {
        assert_eq!(accrued(100, 10, 1).unwrap(), 0);
        assert_eq!(accrued(1_000_000, 1_000, 0).unwrap(), 0);
        assert_eq!(accrued(0, 1_000, 1_000_000).unwrap(), 0);
    }

    #[test]
    fn test_accrued_overflow_is_an_error() {
        assert!(accrued(u64::MAX, u64::MAX, 2).is_err());
        // Fits in u128 but the quotient no longer fits in u64.
        assert!(accrued(u64::MAX, MAX_REWARD_BPS, SLOTS_PER_YEAR).is_err());
    }

    #[test]
    fn test_epoch_history_evicts_oldest() {
        let mut pool = pool_with_epochs(vec![]);
        for i in 0..12u64 {
            pool.push_epoch(100 * i, 10 * i);
        }
        assert_eq!(pool.reward_epochs.len(), MAX_REWARD_EPOCHS);
        // Epochs 0 and 1 were evicted.
        assert_eq!(pool.reward_epochs[0].start_slot, 20);
        assert_eq!(pool.reward_bps, 1_100);
        assert_eq!(pool.last_rate_update_slot, 110);
    }

    #[test]
    fn test_pending_reward_single_epoch() {
        let pool = pool_with_epochs(vec![RewardEpoch {
            reward_bps: 1_000,
            start_slot: 0,
        }]);
        assert_eq!(
            pool.pending_reward(100_000_000, 0, 100).unwrap(),
            accrued(100_000_000, 1_000, 100).unwrap()
        );
    }

    #[test]
    fn test_pending_reward_spans_rate_change() {
        let pool = pool_with_epochs(vec![
            RewardEpoch {
                reward_bps: 1_000,
                start_slot: 0,
            },
            RewardEpoch {
                reward_bps: 2_000,
                start_slot: 1_000_000,
            },
        ]);
        let amount = 500_000_000_000u64;
        let expected = accrued(amount, 1_000, 1_000_000).unwrap()
            + accrued(amount, 2_000, 1_000_000).unwrap();
        assert_eq!(pool.pending_reward(amount, 0, 2_000_000).unwrap(), expected);
    }

    #[test]
    fn test_pending_reward_starts_mid_epoch() {
        let pool = pool_with_epochs(vec![
            RewardEpoch {
                reward_bps: 1_000,
                start_slot: 0,
            },
            RewardEpoch {
                reward_bps: 3_000,
                start_slot: 1_000_000,
            },
        ]);
        let amount = 500_000_000_000u64;
        // Range begins inside the first epoch and ends inside the second.
        let expected = accrued(amount, 1_000, 600_000).unwrap()
            + accrued(amount, 3_000, 500_000).unwrap();
        assert_eq!(
            pool.pending_reward(amount, 400_000, 1_500_000).unwrap(),
            expected
        );
    }

    #[test]
    fn test_pending_reward_ignores_future_epochs() {
        let pool = pool_with_epochs(vec![
            RewardEpoch {
                reward_bps: 1_000,
                start_slot: 0,
            },
            RewardEpoch {
                reward_bps: 9_999,
                start_slot: 5_000_000,
            },
        ]);
        let amount = 500_000_000_000u64;
        assert_eq!(
            pool.pending_reward(amount, 0, 1_000_000).unwrap(),
            accrued(amount, 1_000, 1_000_000).unwrap()
        );
    }

    #[test]
    fn test_pending_reward_skips_expired_epochs() {
        let pool = pool_with_epochs(vec![
            RewardEpoch {
                reward_bps: 5_000,
                start_slot: 0,
            },
            RewardEpoch {
                reward_bps: 1_000,
                start_slot: 1_000,
            },
        ]);
        let amount = 500_000_000_000u64;
        // The accrual range begins after the first epoch ended.
        assert_eq!(
            pool.pending_reward(amount, 2_000, 1_002_000).unwrap(),
            accrued(amount, 1_000, 1_000_000).unwrap()
        );
    }

    #[test]
    fn test_settle_credits_unclaimed_and_total_earned() {
        let pool = pool_with_epochs(vec![RewardEpoch {
            reward_bps: 1_000,
            start_slot: 0,
        }]);
        let mut user = stake(100_000_000, 0);
        user.settle(&pool, 100).unwrap();
        assert_eq!(user.unclaimed, 12);
        assert_eq!(user.total_earned, 12);
        assert_eq!(user.last_accrual_slot, 100);
    }

    #[test]
    fn test_settle_is_idempotent_at_fixed_slot() {
        let pool = pool_with_epochs(vec![RewardEpoch {
            reward_bps: 1_000,
            start_slot: 0,
        }]);
        let mut user = stake(100_000_000, 0);
        user.settle(&pool, 100).unwrap();
        let after_first = user.unclaimed;
        user.settle(&pool, 100).unwrap();
        assert_eq!(user.unclaimed, after_first);
        assert_eq!(user.total_earned, after_first);
    }

    #[test]
    fn test_settle_with_zero_principal_only_advances_clock() {
        let pool = pool_with_epochs(vec![RewardEpoch {
            reward_bps: 1_000,
            start_slot: 0,
        }]);
        let mut user = stake(0, 0);
        user.settle(&pool, 1_000_000).unwrap();
        assert_eq!(user.unclaimed, 0);
        assert_eq!(user.total_earned, 0);
        assert_eq!(user.last_accrual_slot, 1_000_000);
    }

    #[test]
    fn test_account_sizes() {
        assert_eq!(Pool::LEN, 8 + 32 * 4 + 8 + 8 + 1 + 1 + 4 + 160 + 8 + 8);
        assert_eq!(UserStake::LEN, 105);
        assert_eq!(PoolIdCounter::LEN, 49);
        assert!(Pool::LEN < 1024);
    }
}
