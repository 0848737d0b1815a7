///! Early-termination bookkeeping
use chrono::NaiveDate;

/// Countdown over distinct departure dates that produced no awards.
///
/// The counter starts at the configured threshold (0 disables the tracker
/// entirely), loses one each time a departure date finishes with zero
/// awards, and snaps back to the threshold the moment any date finds one.
/// Once it goes negative the run stops issuing queries.
#[derive(Debug)]
pub struct TerminationTracker {
    threshold: i64,
    remaining: i64,
    /// Date currently being processed and whether it has found awards
    current: Option<(NaiveDate, bool)>,
}

impl TerminationTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold as i64,
            remaining: threshold as i64,
            current: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.threshold > 0
    }

    /// Note that a query for `date` is about to run. Finishes the previous
    /// date's accounting on the first query of each new date. Returns true
    /// when the run should stop instead.
    pub fn advance(&mut self, date: NaiveDate) -> bool {
        if !self.enabled() {
            return false;
        }
        if let Some((current, _)) = self.current {
            if current == date {
                return false;
            }
        }
        if let Some((_, found)) = self.current.take() {
            if !found {
                self.remaining -= 1;
            }
        }
        self.current = Some((date, false));
        self.remaining < 0
    }

    /// Record how many awards the last query produced.
    pub fn record_awards(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.remaining = self.threshold;
        if let Some((date, _)) = self.current {
            self.current = Some((date, true));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_disabled_never_stops() {
        let mut tracker = TerminationTracker::new(0);
        for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"] {
            assert!(!tracker.advance(date(day)));
            tracker.record_awards(0);
        }
    }

    #[test]
    fn test_stops_after_threshold_plus_one_empty_days() {
        let mut tracker = TerminationTracker::new(2);
        assert!(!tracker.advance(date("2024-01-01")));
        tracker.record_awards(0);
        assert!(!tracker.advance(date("2024-01-02")));
        tracker.record_awards(0);
        assert!(!tracker.advance(date("2024-01-03")));
        tracker.record_awards(0);
        // Three empty dates have drained the countdown below zero.
        assert!(tracker.advance(date("2024-01-04")));
    }

    #[test]
    fn test_award_resets_countdown() {
        let mut tracker = TerminationTracker::new(2);
        assert!(!tracker.advance(date("2024-01-01")));
        tracker.record_awards(0);
        assert!(!tracker.advance(date("2024-01-02")));
        tracker.record_awards(3);
        assert!(!tracker.advance(date("2024-01-03")));
        tracker.record_awards(0);
        assert!(!tracker.advance(date("2024-01-04")));
        tracker.record_awards(0);
        assert!(!tracker.advance(date("2024-01-05")));
        tracker.record_awards(0);
        assert!(tracker.advance(date("2024-01-06")));
    }

    #[test]
    fn test_decrements_once_per_date_not_per_query() {
        let mut tracker = TerminationTracker::new(1);
        // Two queries on the same empty date count once.
        assert!(!tracker.advance(date("2024-01-01")));
        tracker.record_awards(0);
        assert!(!tracker.advance(date("2024-01-01")));
        tracker.record_awards(0);
        assert!(!tracker.advance(date("2024-01-02")));
        tracker.record_awards(0);
        assert!(tracker.advance(date("2024-01-03")));
    }
}
