//! # Fallback Current Model
//!
//! When no current-table events are available the resolver estimates the flow
//! from a single semidiurnal sine wave. The strait reverses roughly twice per
//! lunar day, so the model only has to say which way the water is running and
//! whether it is near slack.
//!
//! ## Model Characteristics
//! - **Period**: 12.4 hours (principal lunar semidiurnal approximation)
//! - **Anchor**: 2024-01-01 00:00 local time, where the cycle value is zero
//! - **Thresholds**: cycle above +0.3 runs west, below -0.3 runs east, anything
//!   in between is reported as slack
//!
//! ### Accuracy Trade-offs
//! - ✅ **Correct period**: reversals arrive at a realistic cadence
//! - ❌ **No phase fitting**: not synchronised to the real strait
//! - ❌ **No spring-neap envelope**: slack windows are the same width every day
//!
//! Every status produced here carries [`TideOrigin::Estimated`] so the report
//! can flag it.

use crate::{TideOrigin, TideState, TideStatus};
use chrono::{NaiveDate, NaiveDateTime};

/// Semidiurnal period in hours.
pub const PERIOD_HOURS: f64 = 12.4;

/// Cycle magnitude below which the current counts as slack.
pub const SLACK_THRESHOLD: f64 = 0.3;

/// Fixed model anchor, 2024-01-01 00:00.
pub fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Raw cycle value in [-1, 1] at `time`.
pub fn cycle(time: NaiveDateTime) -> f64 {
    let elapsed_hours = (time - anchor()).num_seconds() as f64 / 3600.0;
    (elapsed_hours * std::f64::consts::TAU / PERIOD_HOURS).sin()
}

/// Estimate the acting current at `time`.
///
/// # Example
/// ```
/// use tide_seat_lib::fallback::{anchor, estimate};
///
/// let status = estimate(anchor());
/// assert_eq!(status.label(), "calm (estimated)");
/// ```
pub fn estimate(time: NaiveDateTime) -> TideStatus {
    let cycle = cycle(time);
    let state = if cycle > SLACK_THRESHOLD {
        TideState::WestFlow
    } else if cycle < -SLACK_THRESHOLD {
        TideState::EastFlow
    } else {
        TideState::Calm
    };
    TideStatus::new(state, TideOrigin::Estimated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_anchor_is_calm() {
        let status = estimate(anchor());
        assert_eq!(status.state, TideState::Calm);
        assert_eq!(status.direction(), None);
        assert_eq!(status.origin, TideOrigin::Estimated);
    }

    #[test]
    fn test_quarter_periods_hit_both_flows() {
        // 3.1 h is a quarter of the 12.4 h period: sin peaks at +1
        let west = estimate(anchor() + Duration::minutes(186));
        assert_eq!(west.state, TideState::WestFlow);
        assert_eq!(west.label(), "west-flow (estimated)");
        assert_eq!(west.direction(), Some(270));

        // Three quarters: sin bottoms at -1
        let east = estimate(anchor() + Duration::minutes(558));
        assert_eq!(east.state, TideState::EastFlow);
        assert_eq!(east.label(), "east-flow (estimated)");
        assert_eq!(east.direction(), Some(90));
    }

    #[test]
    fn test_half_period_returns_to_slack() {
        let half = estimate(anchor() + Duration::minutes(372));
        assert_eq!(half.state, TideState::Calm);
    }

    #[test]
    fn test_model_repeats_each_period() {
        let t = NaiveDate::from_ymd_opt(2025, 7, 24)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let later = t + Duration::minutes(744);
        assert!((cycle(t) - cycle(later)).abs() < 1e-6);
        assert_eq!(estimate(t), estimate(later));
    }

    #[test]
    fn test_state_agrees_with_cycle_sign() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for step in 0..(24 * 6) {
            let t = start + Duration::minutes(step * 10);
            let c = cycle(t);
            let expected = if c > SLACK_THRESHOLD {
                TideState::WestFlow
            } else if c < -SLACK_THRESHOLD {
                TideState::EastFlow
            } else {
                TideState::Calm
            };
            assert_eq!(estimate(t).state, expected, "at {t} cycle {c}");
        }
    }
}
