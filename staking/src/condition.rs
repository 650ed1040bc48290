//! Global staking-condition timeline.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use vault_types::Timestamp;

/// Sequential identifier of a condition record. Ids start at 0 and equal the
/// record's position in the timeline.
pub type ConditionId = u64;

/// One reward-rate regime.
///
/// Stored ONCE in the global `ConditionTimeline`, not per account. Every
/// staker accrues under the same regime at the same time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub id: ConditionId,
    /// Duration divisor: `rate` is paid per staked unit per `time_unit` seconds.
    pub time_unit: u64,
    /// Reward per staked unit per `time_unit`.
    pub rate: u128,
    /// When this regime became effective.
    pub start: Timestamp,
    /// When this regime was superseded (None while it is the open record).
    pub end: Option<Timestamp>,
}

impl ConditionRecord {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Append-only history of staking conditions.
///
/// A regime change closes the open record and appends a new one: O(1).
/// Accrual for any position walks only the records since its last
/// checkpoint, so stale positions can always be settled exactly.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConditionTimeline {
    records: Vec<ConditionRecord>,
}

impl ConditionTimeline {
    /// An empty timeline: accrual is disabled until the first append.
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline seeded with one open record starting at `start`.
    pub fn with_initial(time_unit: u64, rate: u128, start: Timestamp) -> Result<Self, LedgerError> {
        let mut timeline = Self::new();
        timeline.append(time_unit, rate, start)?;
        Ok(timeline)
    }

    /// Close the open record at `now` and append a new open record.
    ///
    /// At least one of `time_unit` and `rate` must differ from the open
    /// record. Returns the new record's id.
    pub fn append(
        &mut self,
        time_unit: u64,
        rate: u128,
        now: Timestamp,
    ) -> Result<ConditionId, LedgerError> {
        if time_unit == 0 {
            return Err(LedgerError::ZeroTimeUnit);
        }
        if let Some(current) = self.records.last() {
            if current.time_unit == time_unit && current.rate == rate {
                return Err(LedgerError::UnchangedValue);
            }
            if now < current.start {
                return Err(LedgerError::InvalidTimestamp(now));
            }
        }
        if let Some(current) = self.records.last_mut() {
            current.end = Some(now);
        }
        let id = self.next_id();
        self.records.push(ConditionRecord {
            id,
            time_unit,
            rate,
            start: now,
            end: None,
        });
        Ok(id)
    }

    /// Change only the time unit, carrying the current rate over.
    ///
    /// Returns the new record id and the previous time unit (0 when the
    /// timeline was empty).
    pub fn set_time_unit(
        &mut self,
        time_unit: u64,
        now: Timestamp,
    ) -> Result<(ConditionId, u64), LedgerError> {
        let old = self.current_time_unit();
        if self.current().is_some() && old == time_unit {
            return Err(LedgerError::UnchangedValue);
        }
        let id = self.append(time_unit, self.current_rate(), now)?;
        Ok((id, old))
    }

    /// Change only the rate, carrying the current time unit over.
    ///
    /// On an empty timeline there is no time unit to carry, so this fails
    /// with `ZeroTimeUnit`.
    pub fn set_rate(&mut self, rate: u128, now: Timestamp) -> Result<(ConditionId, u128), LedgerError> {
        let old = self.current_rate();
        if self.current().is_some() && old == rate {
            return Err(LedgerError::UnchangedValue);
        }
        let id = self.append(self.current_time_unit(), rate, now)?;
        Ok((id, old))
    }

    /// The most recently appended record, `None` if no regime exists yet.
    pub fn current(&self) -> Option<&ConditionRecord> {
        self.records.last()
    }

    /// Id of the most recently appended record.
    pub fn current_id(&self) -> Option<ConditionId> {
        self.current().map(|c| c.id)
    }

    /// Id the next append will receive.
    pub fn next_id(&self) -> ConditionId {
        self.records.len() as ConditionId
    }

    /// Id a fresh checkpoint refers to: the current record, or the first
    /// record to be appended when the timeline is still empty.
    pub fn anchor_id(&self) -> ConditionId {
        self.current_id().unwrap_or_else(|| self.next_id())
    }

    pub fn current_rate(&self) -> u128 {
        self.current().map(|c| c.rate).unwrap_or(0)
    }

    pub fn current_time_unit(&self) -> u64 {
        self.current().map(|c| c.time_unit).unwrap_or(0)
    }

    pub fn get(&self, id: ConditionId) -> Option<&ConditionRecord> {
        usize::try_from(id).ok().and_then(|i| self.records.get(i))
    }

    /// Records with id `>= from`, in ascending id order.
    pub fn since(&self, from: ConditionId) -> &[ConditionRecord] {
        let start = usize::try_from(from)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    pub fn records(&self) -> &[ConditionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    #[test]
    fn empty_timeline_has_no_regime() {
        let t = ConditionTimeline::new();
        assert!(t.current().is_none());
        assert_eq!(t.current_id(), None);
        assert_eq!(t.anchor_id(), 0);
        assert_eq!(t.current_rate(), 0);
    }

    #[test]
    fn append_assigns_sequential_ids_and_closes_previous() {
        let mut t = ConditionTimeline::new();
        assert_eq!(t.append(1, 10, ts(0)).unwrap(), 0);
        assert_eq!(t.append(1, 5, ts(100)).unwrap(), 1);
        assert_eq!(t.append(60, 5, ts(250)).unwrap(), 2);

        let records = t.records();
        assert_eq!(records[0].end, Some(ts(100)));
        assert_eq!(records[1].start, ts(100));
        assert_eq!(records[1].end, Some(ts(250)));
        assert!(records[2].is_open());
        assert_eq!(records.iter().filter(|r| r.is_open()).count(), 1);
    }

    #[test]
    fn current_id_is_last_appended() {
        let mut t = ConditionTimeline::with_initial(1, 10, ts(0)).unwrap();
        assert_eq!(t.current_id(), Some(0));
        t.append(2, 10, ts(5)).unwrap();
        assert_eq!(t.current_id(), Some(1));
        assert_eq!(t.current().unwrap().time_unit, 2);
        assert_eq!(t.next_id(), 2);
    }

    #[test]
    fn append_rejects_zero_time_unit() {
        let mut t = ConditionTimeline::new();
        assert_eq!(t.append(0, 10, ts(0)), Err(LedgerError::ZeroTimeUnit));
        assert!(t.is_empty());
    }

    #[test]
    fn append_rejects_identical_regime() {
        let mut t = ConditionTimeline::with_initial(1, 10, ts(0)).unwrap();
        assert_eq!(t.append(1, 10, ts(50)), Err(LedgerError::UnchangedValue));
        assert_eq!(t.len(), 1);
        assert!(t.current().unwrap().is_open());
    }

    #[test]
    fn append_rejects_backwards_boundary() {
        let mut t = ConditionTimeline::with_initial(1, 10, ts(1000)).unwrap();
        assert_eq!(t.append(1, 20, ts(500)), Err(LedgerError::InvalidTimestamp(ts(500))));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn set_time_unit_checks_only_its_own_field() {
        let mut t = ConditionTimeline::with_initial(1, 10, ts(0)).unwrap();
        assert_eq!(t.set_time_unit(1, ts(10)), Err(LedgerError::UnchangedValue));
        let (id, old) = t.set_time_unit(3600, ts(10)).unwrap();
        assert_eq!((id, old), (1, 1));
        assert_eq!(t.current().unwrap().rate, 10);
    }

    #[test]
    fn set_rate_checks_only_its_own_field() {
        let mut t = ConditionTimeline::with_initial(60, 10, ts(0)).unwrap();
        assert_eq!(t.set_rate(10, ts(10)), Err(LedgerError::UnchangedValue));
        let (id, old) = t.set_rate(0, ts(10)).unwrap();
        assert_eq!((id, old), (1, 10));
        assert_eq!(t.current().unwrap().time_unit, 60);
    }

    #[test]
    fn set_rate_on_empty_timeline_has_no_time_unit() {
        let mut t = ConditionTimeline::new();
        assert_eq!(t.set_rate(5, ts(0)), Err(LedgerError::ZeroTimeUnit));
    }

    #[test]
    fn since_clamps_past_end() {
        let mut t = ConditionTimeline::with_initial(1, 1, ts(0)).unwrap();
        t.append(1, 2, ts(1)).unwrap();
        assert_eq!(t.since(0).len(), 2);
        assert_eq!(t.since(1).len(), 1);
        assert!(t.since(7).is_empty());
        assert_eq!(t.get(1).unwrap().rate, 2);
        assert!(t.get(2).is_none());
    }
}
