use proptest::prelude::*;

use vault_staking::accrual::segments;
use vault_staking::{settle, ConditionTimeline, LedgerState, StakingPosition};
use vault_types::{AccountId, Timestamp, UnitId};

/// A timeline starting at 0 with regime changes every `gap` seconds.
fn timeline_from(regimes: &[(u64, u128)], gap: u64) -> ConditionTimeline {
    let mut timeline = ConditionTimeline::new();
    for (i, &(time_unit, rate)) in regimes.iter().enumerate() {
        // Consecutive duplicates are skipped, like a rejected update.
        let _ = timeline.append(time_unit, rate, Timestamp::new(i as u64 * gap));
    }
    timeline
}

fn regimes() -> impl Strategy<Value = Vec<(u64, u128)>> {
    prop::collection::vec((1u64..100, 0u128..10_000), 1..12)
}

/// Start of the open record: the earliest time a caller could observe.
fn open_start(timeline: &ConditionTimeline) -> u64 {
    timeline.current().map(|c| c.start.as_secs()).unwrap_or(0)
}

fn position(amount: u64) -> StakingPosition {
    StakingPosition {
        amount_staked: amount,
        ..StakingPosition::default()
    }
}

#[derive(Clone, Debug)]
enum Op {
    Stake { account: u8, unit: u64 },
    Withdraw { account: u8, unit: u64 },
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        (0u8..3, 0u64..16).prop_map(|(account, unit)| Op::Stake { account, unit }),
        (0u8..3, 0u64..16).prop_map(|(account, unit)| Op::Withdraw { account, unit }),
    ];
    prop::collection::vec(op, 1..60)
}

fn account(i: u8) -> AccountId {
    AccountId::new(format!("acct-{i}"))
}

proptest! {
    /// Rewards never go down as time moves forward.
    #[test]
    fn accrual_is_monotonic(
        regimes in regimes(),
        amount in 1u64..1_000,
        t1 in 0u64..5_000,
        dt in 0u64..5_000,
    ) {
        let timeline = timeline_from(&regimes, 300);
        let t1 = open_start(&timeline) + t1;
        let p = position(amount);
        let r1 = settle(&p, &timeline, Timestamp::new(t1)).unwrap();
        let r2 = settle(&p, &timeline, Timestamp::new(t1 + dt)).unwrap();
        prop_assert!(r2 >= r1, "rewards decreased: {} -> {}", r1, r2);
    }

    /// Settling equals the sum of independently truncated segments.
    #[test]
    fn settle_sums_truncated_segments(
        regimes in regimes(),
        amount in 1u64..1_000,
        now in 0u64..5_000,
    ) {
        let timeline = timeline_from(&regimes, 300);
        let now = open_start(&timeline) + now;
        let p = position(amount);

        let mut expected = 0u128;
        for record in timeline.records() {
            let end = record.end.unwrap_or(Timestamp::new(now));
            let duration = record.start.elapsed_until(end) as u128;
            expected += duration * amount as u128 * record.rate / record.time_unit as u128;
        }

        let settled = settle(&p, &timeline, Timestamp::new(now)).unwrap();
        let parts: u128 = segments(&p, &timeline, Timestamp::new(now))
            .unwrap()
            .iter()
            .map(|s| s.reward)
            .sum();
        prop_assert_eq!(settled, parts);
        prop_assert_eq!(settled, expected);
    }

    /// With unit time units nothing truncates, so checkpointing midway
    /// neither creates nor loses rewards.
    #[test]
    fn checkpoint_preserves_exact_rewards(
        rates in prop::collection::vec(0u128..10_000, 1..8),
        amount in 1u64..1_000,
        mid in 0u64..3_000,
        tail in 0u64..3_000,
    ) {
        let regimes: Vec<_> = rates.iter().map(|&r| (1u64, r)).collect();
        let timeline = timeline_from(&regimes, 300);
        let mid = open_start(&timeline) + mid;
        let end = Timestamp::new(mid + tail);

        let untouched = position(amount);
        let mut checkpointed = position(amount);
        checkpointed.checkpoint(&timeline, Timestamp::new(mid)).unwrap();

        prop_assert_eq!(
            checkpointed.available_rewards(&timeline, end).unwrap(),
            untouched.available_rewards(&timeline, end).unwrap()
        );
    }

    /// Any sequence of stakes and withdraws keeps positions and the token
    /// index in agreement; rejected operations change nothing.
    #[test]
    fn positions_and_index_stay_consistent(ops in ops()) {
        let timeline = ConditionTimeline::with_initial(1, 10, Timestamp::EPOCH).unwrap();
        let mut state = LedgerState::new(timeline);

        for (t, op) in ops.iter().enumerate() {
            let now = Timestamp::new(t as u64);
            let before = state.clone();
            let result = match *op {
                Op::Stake { account: a, unit } => state.apply_stake(&account(a), &[UnitId::new(unit)], now),
                Op::Withdraw { account: a, unit } => state.apply_withdraw(&account(a), &[UnitId::new(unit)], now),
            };
            if result.is_err() {
                for a in 0..3 {
                    let acct = account(a);
                    prop_assert_eq!(state.positions.get(&acct), before.positions.get(&acct));
                    prop_assert_eq!(state.tokens.units_of(&acct), before.tokens.units_of(&acct));
                }
            }
            prop_assert!(state.is_consistent());
            prop_assert_eq!(state.positions.total_staked(), state.tokens.staked_count() as u64);
        }
    }

    /// A fully withdrawn account keeps its rewards and stops accruing.
    #[test]
    fn full_withdraw_stops_accrual(
        count in 1u64..8,
        held in 1u64..1_000,
        later in 0u64..10_000,
    ) {
        let timeline = ConditionTimeline::with_initial(1, 3, Timestamp::EPOCH).unwrap();
        let mut state = LedgerState::new(timeline);
        let alice = account(0);
        let units: Vec<_> = (0..count).map(UnitId::new).collect();

        state.apply_stake(&alice, &units, Timestamp::EPOCH).unwrap();
        state.apply_withdraw(&alice, &units, Timestamp::new(held)).unwrap();

        let owed = (held * count * 3) as u128;
        prop_assert_eq!(state.available_rewards(&alice, Timestamp::new(held + later)).unwrap(), owed);
        prop_assert!(state.tokens.units_of(&alice).is_empty());
    }

    /// Staking and withdrawing the same units at one instant changes no
    /// rewards and leaves the index as it was.
    #[test]
    fn same_instant_round_trip_is_reward_neutral(
        rate in 0u128..10_000,
        time_unit in 1u64..100,
        held in 1u64..8,
        extra in 1u64..8,
        at in 0u64..10_000,
    ) {
        let timeline = ConditionTimeline::with_initial(time_unit, rate, Timestamp::EPOCH).unwrap();
        let mut state = LedgerState::new(timeline);
        let alice = account(0);
        let base: Vec<_> = (0..held).map(UnitId::new).collect();
        let round: Vec<_> = (100..100 + extra).map(UnitId::new).collect();
        let now = Timestamp::new(at);

        state.apply_stake(&alice, &base, Timestamp::EPOCH).unwrap();
        let before = state.available_rewards(&alice, now).unwrap();

        state.apply_stake(&alice, &round, now).unwrap();
        state.apply_withdraw(&alice, &round, now).unwrap();

        prop_assert_eq!(state.available_rewards(&alice, now).unwrap(), before);
        prop_assert_eq!(state.tokens.units_of(&alice), &base[..]);
        prop_assert!(state.is_consistent());
    }
}
