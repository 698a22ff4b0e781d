//! Schedule Engine: maps wall-clock time to trading status and drives the
//! dispatcher's cursor through a sequence of non-overlapping session
//! intervals.

use crate::error::{EngineError, EngineResult};
use crate::types::{SessionInterval, SessionStatus};

/// A validated, non-overlapping, start-sorted sequence of trading sessions.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    intervals: Vec<SessionInterval>,
}

impl Schedule {
    /// Validate and install `intervals`.
    ///
    /// # Errors
    /// `InvalidSchedule` if intervals are not sorted by `start_ns`, or if
    /// any two overlap.
    pub fn new(mut intervals: Vec<SessionInterval>) -> EngineResult<Self> {
        intervals.sort_by_key(|i| i.start_ns);
        for pair in intervals.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.end_ns > b.start_ns {
                return Err(EngineError::InvalidSchedule(format!(
                    "interval [{}, {}) overlaps following interval [{}, {})",
                    a.start_ns, a.end_ns, b.start_ns, b.end_ns
                )));
            }
            if a.start_ns >= a.end_ns {
                return Err(EngineError::InvalidSchedule(format!(
                    "interval [{}, {}) is not a valid forward range",
                    a.start_ns, a.end_ns
                )));
            }
        }
        if let Some(last) = intervals.last() {
            if last.start_ns >= last.end_ns {
                return Err(EngineError::InvalidSchedule(format!(
                    "interval [{}, {}) is not a valid forward range",
                    last.start_ns, last.end_ns
                )));
            }
        }
        Ok(Self { intervals })
    }

    /// The preset A-share calendar: a pre-opening call auction, a morning
    /// and afternoon continuous session, and a closing call auction. All
    /// timestamps are nanoseconds since the session's own midnight
    /// (`00:00:00`).
    #[must_use]
    pub fn a_share_default() -> Self {
        const NS_PER_HOUR: i64 = 3_600_000_000_000;
        const NS_PER_MIN: i64 = 60_000_000_000;
        let hm = |h: i64, m: i64| h * NS_PER_HOUR + m * NS_PER_MIN;
        Self::new(vec![
            SessionInterval { status: SessionStatus::CallAuction, start_ns: hm(9, 15), end_ns: hm(9, 25) },
            SessionInterval { status: SessionStatus::ContinuousTrading, start_ns: hm(9, 30), end_ns: hm(11, 30) },
            SessionInterval { status: SessionStatus::ContinuousTrading, start_ns: hm(13, 0), end_ns: hm(14, 57) },
            SessionInterval { status: SessionStatus::CallAuction, start_ns: hm(14, 57), end_ns: hm(15, 0) },
        ])
        .expect("built-in A-share schedule is internally consistent")
    }

    /// The interval covering `ts`, or `None` if `ts` falls in a gap
    /// (status is `Closed` there).
    #[must_use]
    pub fn interval_at(&self, ts: i64) -> Option<SessionInterval> {
        self.intervals.iter().find(|i| i.contains(ts)).copied()
    }

    /// The status in effect at `ts`: `Closed` if no interval covers it.
    #[must_use]
    pub fn status_at(&self, ts: i64) -> SessionStatus {
        self.interval_at(ts)
            .map(|i| i.status)
            .unwrap_or(SessionStatus::Closed)
    }

    /// The next interval boundary strictly after `ts`: either the end of
    /// the interval containing `ts`, or the start of the next interval if
    /// `ts` is in a gap. `None` past the end of the last interval.
    #[must_use]
    pub fn next_boundary_after(&self, ts: i64) -> Option<i64> {
        if let Some(interval) = self.interval_at(ts) {
            return Some(interval.end_ns);
        }
        self.intervals
            .iter()
            .map(|i| i.start_ns)
            .filter(|&start| start > ts)
            .min()
    }

    /// All configured intervals, in start order.
    #[must_use]
    pub fn intervals(&self) -> &[SessionInterval] {
        &self.intervals
    }
}
