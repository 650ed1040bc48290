//! Reward accrual: integrate a staking position against the condition
//! timeline.
//!
//! Each regime the position has lived through since its last checkpoint is
//! one segment. A segment pays
//! `floor(duration × amount_staked × rate / time_unit)`, truncated on its
//! own. Summing the truncated segments (rather than truncating the sum)
//! loses a little at every regime boundary; that loss is part of the
//! expected numbers and must not be corrected.

use crate::condition::{ConditionId, ConditionRecord, ConditionTimeline};
use crate::error::LedgerError;
use crate::position::StakingPosition;
use vault_types::Timestamp;

/// Reward earned by a position during one condition record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentAccrual {
    pub condition_id: ConditionId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub reward: u128,
}

/// Total reward owed to `position` over `[last_update, now)`.
///
/// Pure: reads the position and timeline, mutates nothing. An empty timeline
/// or an inactive position yields zero.
pub fn settle(
    position: &StakingPosition,
    timeline: &ConditionTimeline,
    now: Timestamp,
) -> Result<u128, LedgerError> {
    segments(position, timeline, now)?
        .iter()
        .try_fold(0u128, |earned, seg| earned.checked_add(seg.reward))
        .ok_or(LedgerError::Overflow)
}

/// Per-record breakdown of what `settle` sums, in ascending id order.
///
/// Records the position did not overlap (zero-length segments) are skipped.
pub fn segments(
    position: &StakingPosition,
    timeline: &ConditionTimeline,
    now: Timestamp,
) -> Result<Vec<SegmentAccrual>, LedgerError> {
    if position.amount_staked == 0 {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for record in timeline.since(position.checkpoint_condition_id) {
        // The checkpoint record starts at last_update; later records start at
        // their own boundary. A position anchored on an empty timeline never
        // accrues before the first record begins.
        let start = position.last_update.max(record.start);
        let end = record.end.unwrap_or(now);
        let duration = start.elapsed_until(end);
        if duration == 0 {
            continue;
        }
        out.push(SegmentAccrual {
            condition_id: record.id,
            start,
            end,
            reward: segment_reward(duration, position.amount_staked, record)?,
        });
    }
    Ok(out)
}

/// `floor(duration × amount × rate / time_unit)` with checked multiplication.
pub fn segment_reward(
    duration: u64,
    amount_staked: u64,
    record: &ConditionRecord,
) -> Result<u128, LedgerError> {
    if record.time_unit == 0 {
        return Err(LedgerError::ZeroTimeUnit);
    }
    let product = u128::from(duration)
        .checked_mul(u128::from(amount_staked))
        .and_then(|v| v.checked_mul(record.rate))
        .ok_or(LedgerError::Overflow)?;
    Ok(product / u128::from(record.time_unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn position(amount: u64, last_update: u64, checkpoint: ConditionId) -> StakingPosition {
        StakingPosition {
            amount_staked: amount,
            unclaimed_rewards: 0,
            last_update: ts(last_update),
            checkpoint_condition_id: checkpoint,
        }
    }

    #[test]
    fn single_open_record_accrues_linearly() {
        let t = ConditionTimeline::with_initial(1, 10, ts(0)).unwrap();
        let p = position(2, 0, 0);
        assert_eq!(settle(&p, &t, ts(100)).unwrap(), 2000);
    }

    #[test]
    fn zero_elapsed_is_zero() {
        let t = ConditionTimeline::with_initial(1, 10, ts(0)).unwrap();
        let p = position(2, 50, 0);
        assert_eq!(settle(&p, &t, ts(50)).unwrap(), 0);
    }

    #[test]
    fn regime_change_splits_accrual() {
        let mut t = ConditionTimeline::with_initial(1, 10, ts(0)).unwrap();
        t.append(1, 5, ts(100)).unwrap();
        let p = position(2, 0, 0);
        // 100 × 2 × 10 + 50 × 2 × 5
        assert_eq!(settle(&p, &t, ts(150)).unwrap(), 2500);
    }

    #[test]
    fn truncation_happens_per_segment() {
        let mut t = ConditionTimeline::with_initial(3, 1, ts(0)).unwrap();
        t.append(2, 1, ts(7)).unwrap();
        let p = position(1, 0, 0);
        let segs = segments(&p, &t, ts(14)).unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].reward, 2); // floor(7/3)
        assert_eq!(segs[1].reward, 3); // floor(7/2)
        assert_eq!(settle(&p, &t, ts(14)).unwrap(), 5);
    }

    #[test]
    fn boundary_loss_is_kept() {
        // Both records pay 0.5 per second, expressed differently.
        let mut t = ConditionTimeline::with_initial(2, 1, ts(0)).unwrap();
        t.append(4, 2, ts(3)).unwrap();
        let p = position(1, 0, 0);
        // floor(3×1/2) + floor(3×2/4) = 1 + 1, not floor(6 × 0.5) = 3.
        assert_eq!(settle(&p, &t, ts(6)).unwrap(), 2);
    }

    #[test]
    fn walks_only_from_checkpoint_record() {
        let mut t = ConditionTimeline::with_initial(1, 100, ts(0)).unwrap();
        t.append(1, 10, ts(50)).unwrap();
        t.append(1, 1, ts(80)).unwrap();
        // checkpointed inside record 1 at t=60
        let p = position(1, 60, 1);
        // record 1: 60..80 at 10 = 200; record 2: 80..100 at 1 = 20
        assert_eq!(settle(&p, &t, ts(100)).unwrap(), 220);
    }

    #[test]
    fn empty_timeline_accrues_nothing() {
        let t = ConditionTimeline::new();
        let p = position(5, 0, 0);
        assert_eq!(settle(&p, &t, ts(1_000)).unwrap(), 0);
    }

    #[test]
    fn position_anchored_before_first_record_starts_at_record() {
        let mut t = ConditionTimeline::new();
        let p = position(1, 10, t.anchor_id());
        t.append(1, 3, ts(40)).unwrap();
        assert_eq!(settle(&p, &t, ts(50)).unwrap(), 30);
    }

    #[test]
    fn inactive_position_accrues_nothing() {
        let t = ConditionTimeline::with_initial(1, 10, ts(0)).unwrap();
        let p = position(0, 0, 0);
        assert_eq!(settle(&p, &t, ts(100)).unwrap(), 0);
    }

    #[test]
    fn overflow_is_reported() {
        let t = ConditionTimeline::with_initial(1, u128::MAX, ts(0)).unwrap();
        let p = position(2, 0, 0);
        assert_eq!(settle(&p, &t, ts(1)), Err(LedgerError::Overflow));
    }

    #[test]
    fn settle_is_idempotent() {
        let mut t = ConditionTimeline::with_initial(7, 3, ts(0)).unwrap();
        t.append(11, 5, ts(33)).unwrap();
        let p = position(4, 2, 0);
        let a = settle(&p, &t, ts(90)).unwrap();
        let b = settle(&p, &t, ts(90)).unwrap();
        assert_eq!(a, b);
    }
}
