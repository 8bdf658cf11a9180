//! # Tide Resolver
//!
//! Turns a list of current-table events into the current acting at a given
//! instant. Resolution order matters and is fixed:
//!
//! 1. **Slack window**: if the event closest to the query is a turning event
//!    no more than 40 minutes away, the water is slack. This check runs before
//!    anything else, so a nearer-looking flow event never overrides it.
//! 2. **Past event**: otherwise the latest event at or before the query acts,
//!    or the earliest event of the day when the query precedes all of them.
//! 3. **Turning look-ahead**: a turning event outside its slack window is not a
//!    sustained state, so the first event after the query is used instead.
//!
//! When the list is absent or empty the [`fallback`](crate::fallback) model
//! answers instead.
//!
//! Ties on "closest" go to the first event in iteration order. Callers should
//! pass events sorted by time so that tie-breaks are stable; the tide-table
//! parser already does.

use crate::{fallback, TideEvent, TideEventKind, TideOrigin, TideState, TideStatus};
use chrono::{Duration, NaiveDateTime};

/// Half-width of the slack window around a turning event, in minutes.
pub const SLACK_WINDOW_MINUTES: i64 = 40;

/// Resolve the current at `time`.
///
/// # Example
/// ```
/// use chrono::{Duration, NaiveDate};
/// use tide_seat_lib::{tide, TideEvent, TideEventKind};
///
/// let t = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let events = [
///     TideEvent::new(t - Duration::hours(2), TideEventKind::EastFlow),
///     TideEvent::new(t, TideEventKind::Turning),
///     TideEvent::new(t + Duration::hours(2), TideEventKind::WestFlow),
/// ];
///
/// assert_eq!(tide::resolve(t + Duration::minutes(30), Some(&events[..])).label(), "calm");
/// assert_eq!(tide::resolve(t + Duration::minutes(90), Some(&events[..])).direction(), Some(270));
/// assert_eq!(tide::resolve(t, None).label(), "west-flow (estimated)");
/// ```
pub fn resolve(time: NaiveDateTime, events: Option<&[TideEvent]>) -> TideStatus {
    match events {
        Some(events) if !events.is_empty() => resolve_observed(time, events),
        _ => fallback::estimate(time),
    }
}

fn resolve_observed(time: NaiveDateTime, events: &[TideEvent]) -> TideStatus {
    let offset = |e: &TideEvent| (time - e.time).num_seconds().abs();

    // min_by_key keeps the first of equal minima
    if let Some(closest) = events.iter().min_by_key(|e| offset(e)) {
        let window = Duration::minutes(SLACK_WINDOW_MINUTES).num_seconds();
        if closest.kind == TideEventKind::Turning && offset(closest) <= window {
            return TideStatus::new(TideState::Calm, TideOrigin::Observed);
        }
    }

    // max_by_key keeps the last of equal maxima, i.e. the later-listed event
    let past = events.iter().filter(|e| e.time <= time).max_by_key(|e| e.time);
    let mut current = match past.or_else(|| events.iter().min_by_key(|e| e.time)) {
        Some(event) => event,
        None => return fallback::estimate(time),
    };

    if current.kind == TideEventKind::Turning {
        if let Some(next) = events.iter().filter(|e| e.time > time).min_by_key(|e| e.time) {
            current = next;
        }
    }

    TideStatus::new(current.kind.into(), TideOrigin::Observed)
}
