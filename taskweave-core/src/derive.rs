//! Pure field derivation.
//!
//! Every function here is total, side-effect-free, and deterministic:
//! identical inputs always produce identical outputs, which is what makes
//! duplicate webhook deliveries safe to reprocess.
//!
//! The upstream service has no way to say "date without time". Its
//! convention is a sentinel: a date-only value is stored with a wall-clock
//! time of exactly 04:00 in a fixed reference timezone. Anything else is an
//! explicit time entered by a user. This is a quirk of that source system,
//! not a general rule; it is preserved verbatim here and must not be
//! generalized or made configurable.

use taskweave_sdk::objects::{EventStatus, RelevanceUnit, TaskStatus};
use time::macros::{offset, time};
use time::{Duration, OffsetDateTime, Time, UtcOffset};

/// Fixed reference timezone of the upstream source system.
pub const REFERENCE_OFFSET: UtcOffset = offset!(UTC);

/// Wall-clock time (in the reference timezone) that marks "no time entered".
pub const NO_TIME_SENTINEL: Time = time!(04:00:00);

/// Whether a timestamp carries an explicit time-of-day, per the upstream
/// sentinel convention.
pub fn has_explicit_time(ts: OffsetDateTime) -> bool {
    ts.to_offset(REFERENCE_OFFSET).time() != NO_TIME_SENTINEL
}

/// Midnight of the timestamp's day, in the reference timezone.
fn midnight_of(ts: OffsetDateTime) -> OffsetDateTime {
    ts.to_offset(REFERENCE_OFFSET).replace_time(Time::MIDNIGHT)
}

/// Midnight of the day after the timestamp's day, in the reference timezone.
fn next_midnight(ts: OffsetDateTime) -> OffsetDateTime {
    midnight_of(ts) + Duration::days(1)
}

/// Derive the effective start time of an event.
///
/// An explicit start time is kept as-is; a date-only start normalizes to
/// that day's midnight. Without a start, a date-only due date stands in
/// (its midnight); a due date with an explicit time does not.
pub fn calculate_start_time(
    start_date: Option<OffsetDateTime>,
    due_date: Option<OffsetDateTime>,
) -> Option<OffsetDateTime> {
    match (start_date, due_date) {
        (Some(start), _) if has_explicit_time(start) => Some(start),
        (Some(start), _) => Some(midnight_of(start)),
        (None, Some(due)) if !has_explicit_time(due) => Some(midnight_of(due)),
        _ => None,
    }
}

/// Derive the effective end time of an event.
///
/// An explicit due time is kept as-is; a date-only due date means
/// end-of-day, normalized to midnight of the following day.
pub fn calculate_end_time(due_date: Option<OffsetDateTime>) -> Option<OffsetDateTime> {
    let due = due_date?;
    if has_explicit_time(due) {
        Some(due)
    } else {
        Some(next_midnight(due))
    }
}

/// Compute the schedule status of an event at `now`. Boundaries are
/// inclusive, so the status is monotonic as `now` advances.
pub fn calculate_event_status(
    start_time: Option<OffsetDateTime>,
    end_time: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> EventStatus {
    match (start_time, end_time) {
        (None, None) => EventStatus::NotScheduled,
        (None, Some(end)) => {
            if now >= end {
                EventStatus::Occurred
            } else {
                EventStatus::Upcoming
            }
        }
        (Some(start), None) => {
            if now >= start {
                EventStatus::Occurring
            } else {
                EventStatus::Upcoming
            }
        }
        (Some(start), Some(end)) => {
            if now >= end {
                EventStatus::Occurred
            } else if now >= start {
                EventStatus::Occurring
            } else {
                EventStatus::Upcoming
            }
        }
    }
}

/// Compute the relevance ("remind-by") date: the anchor time (start,
/// falling back to end) minus the configured offset. Requires a complete
/// `(num, unit)` pair.
pub fn calculate_relevance_date(
    start_time: Option<OffsetDateTime>,
    end_time: Option<OffsetDateTime>,
    num: Option<i64>,
    unit: Option<RelevanceUnit>,
) -> Option<OffsetDateTime> {
    let anchor = start_time.or(end_time)?;
    let (num, unit) = num.zip(unit)?;
    Some(anchor - unit.duration(num))
}

/// Error returned when a task-status recompute falls through to "keep the
/// previous status" but no previous status exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no previous status to keep and no date transition applies")]
pub struct MissingPreviousStatus;

/// Derive the status of a plain date-tracked task from its date presence.
///
/// Gaining a first date moves a `Backlog` task to `ToDo`; losing all dates
/// moves a non-`Backlog` task back to `Backlog`; otherwise the previous
/// status is kept. The fallthrough requires a previous status; callers
/// that cannot supply one get [`MissingPreviousStatus`] and must decide for
/// themselves (the write is skipped, never guessed).
pub fn calculate_task_status(
    start_date: Option<OffsetDateTime>,
    due_date: Option<OffsetDateTime>,
    previous: Option<TaskStatus>,
) -> Result<TaskStatus, MissingPreviousStatus> {
    let any_date = start_date.is_some() || due_date.is_some();
    match previous {
        Some(TaskStatus::Backlog) if any_date => Ok(TaskStatus::ToDo),
        Some(prev) if !any_date && prev != TaskStatus::Backlog => Ok(TaskStatus::Backlog),
        Some(prev) => Ok(prev),
        None => Err(MissingPreviousStatus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    // 04:00 in the reference timezone: the "no time entered" sentinel.
    const DATE_ONLY: OffsetDateTime = datetime!(2024-03-10 04:00:00 UTC);
    const WITH_TIME: OffsetDateTime = datetime!(2024-03-10 14:30:00 UTC);

    #[test]
    fn sentinel_detection() {
        assert!(!has_explicit_time(DATE_ONLY));
        assert!(has_explicit_time(WITH_TIME));
        // Midnight is an explicit time; only the sentinel means date-only.
        assert!(has_explicit_time(datetime!(2024-03-10 00:00:00 UTC)));
        // The sentinel is a wall-clock rule in the reference timezone, so an
        // offset timestamp that reads 04:00 there also counts as date-only.
        assert!(!has_explicit_time(datetime!(2024-03-10 06:00:00 +2)));
    }

    #[test]
    fn start_time_keeps_explicit_time() {
        assert_eq!(calculate_start_time(Some(WITH_TIME), None), Some(WITH_TIME));
        assert_eq!(
            calculate_start_time(Some(WITH_TIME), Some(DATE_ONLY)),
            Some(WITH_TIME)
        );
    }

    #[test]
    fn start_time_normalizes_date_only_to_midnight() {
        assert_eq!(
            calculate_start_time(Some(DATE_ONLY), None),
            Some(datetime!(2024-03-10 00:00:00 UTC))
        );
    }

    #[test]
    fn start_time_falls_back_to_date_only_due() {
        assert_eq!(
            calculate_start_time(None, Some(DATE_ONLY)),
            Some(datetime!(2024-03-10 00:00:00 UTC))
        );
        // A due date with an explicit time does not produce a start.
        assert_eq!(calculate_start_time(None, Some(WITH_TIME)), None);
        assert_eq!(calculate_start_time(None, None), None);
    }

    #[test]
    fn end_time_semantics() {
        assert_eq!(calculate_end_time(Some(WITH_TIME)), Some(WITH_TIME));
        // Date-only due means end of day: midnight of the following day.
        assert_eq!(
            calculate_end_time(Some(DATE_ONLY)),
            Some(datetime!(2024-03-11 00:00:00 UTC))
        );
        assert_eq!(calculate_end_time(None), None);
    }

    #[test]
    fn event_status_table() {
        let start = datetime!(2024-03-10 10:00:00 UTC);
        let end = datetime!(2024-03-10 12:00:00 UTC);
        let before = datetime!(2024-03-10 09:00:00 UTC);
        let during = datetime!(2024-03-10 11:00:00 UTC);
        let after = datetime!(2024-03-10 13:00:00 UTC);

        assert_eq!(
            calculate_event_status(None, None, during),
            EventStatus::NotScheduled
        );
        assert_eq!(
            calculate_event_status(None, Some(end), before),
            EventStatus::Upcoming
        );
        assert_eq!(
            calculate_event_status(None, Some(end), after),
            EventStatus::Occurred
        );
        assert_eq!(
            calculate_event_status(Some(start), None, before),
            EventStatus::Upcoming
        );
        assert_eq!(
            calculate_event_status(Some(start), None, after),
            EventStatus::Occurring
        );
        assert_eq!(
            calculate_event_status(Some(start), Some(end), before),
            EventStatus::Upcoming
        );
        assert_eq!(
            calculate_event_status(Some(start), Some(end), during),
            EventStatus::Occurring
        );
        assert_eq!(
            calculate_event_status(Some(start), Some(end), after),
            EventStatus::Occurred
        );
    }

    #[test]
    fn event_status_boundaries_are_inclusive() {
        let start = datetime!(2024-03-10 10:00:00 UTC);
        let end = datetime!(2024-03-10 12:00:00 UTC);
        assert_eq!(
            calculate_event_status(Some(start), Some(end), start),
            EventStatus::Occurring
        );
        assert_eq!(
            calculate_event_status(Some(start), Some(end), end),
            EventStatus::Occurred
        );
    }

    #[test]
    fn event_status_is_monotonic_in_now() {
        let start = datetime!(2024-03-10 10:00:00 UTC);
        let end = datetime!(2024-03-10 12:00:00 UTC);
        fn rank(s: EventStatus) -> u8 {
            match s {
                EventStatus::NotScheduled => 0,
                EventStatus::Upcoming => 1,
                EventStatus::Occurring => 2,
                EventStatus::Occurred => 3,
            }
        }
        let mut last = 0;
        for minutes in 0..300 {
            let now = datetime!(2024-03-10 08:00:00 UTC) + Duration::minutes(minutes);
            let r = rank(calculate_event_status(Some(start), Some(end), now));
            assert!(r >= last, "status moved backwards at minute {minutes}");
            last = r;
        }
    }

    #[test]
    fn relevance_date_offsets_backwards_from_anchor() {
        let start = datetime!(2024-03-10 10:00:00 UTC);
        let end = datetime!(2024-03-12 10:00:00 UTC);
        assert_eq!(
            calculate_relevance_date(Some(start), Some(end), Some(2), Some(RelevanceUnit::Days)),
            Some(datetime!(2024-03-08 10:00:00 UTC))
        );
        // Without a start the end anchors.
        assert_eq!(
            calculate_relevance_date(None, Some(end), Some(1), Some(RelevanceUnit::Weeks)),
            Some(datetime!(2024-03-05 10:00:00 UTC))
        );
        // Months are a fixed 30 days.
        assert_eq!(
            calculate_relevance_date(Some(start), None, Some(1), Some(RelevanceUnit::Months)),
            Some(datetime!(2024-02-09 10:00:00 UTC))
        );
    }

    #[test]
    fn relevance_date_requires_anchor_and_complete_pair() {
        let start = datetime!(2024-03-10 10:00:00 UTC);
        assert_eq!(
            calculate_relevance_date(None, None, Some(2), Some(RelevanceUnit::Days)),
            None
        );
        assert_eq!(
            calculate_relevance_date(Some(start), None, None, Some(RelevanceUnit::Days)),
            None
        );
        assert_eq!(calculate_relevance_date(Some(start), None, Some(2), None), None);
    }

    #[test]
    fn backlog_with_any_date_becomes_todo() {
        for (start, due) in [
            (Some(WITH_TIME), None),
            (None, Some(WITH_TIME)),
            (Some(WITH_TIME), Some(DATE_ONLY)),
        ] {
            assert_eq!(
                calculate_task_status(start, due, Some(TaskStatus::Backlog)),
                Ok(TaskStatus::ToDo)
            );
        }
    }

    #[test]
    fn dateless_non_backlog_returns_to_backlog() {
        for prev in [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Complete] {
            assert_eq!(
                calculate_task_status(None, None, Some(prev)),
                Ok(TaskStatus::Backlog)
            );
        }
    }

    #[test]
    fn otherwise_previous_status_is_kept() {
        assert_eq!(
            calculate_task_status(Some(WITH_TIME), None, Some(TaskStatus::InProgress)),
            Ok(TaskStatus::InProgress)
        );
        assert_eq!(
            calculate_task_status(None, None, Some(TaskStatus::Backlog)),
            Ok(TaskStatus::Backlog)
        );
    }

    #[test]
    fn missing_previous_status_is_an_error() {
        assert_eq!(
            calculate_task_status(Some(WITH_TIME), None, None),
            Err(MissingPreviousStatus)
        );
        assert_eq!(calculate_task_status(None, None, None), Err(MissingPreviousStatus));
    }

    #[test]
    fn derivations_are_deterministic() {
        let now = datetime!(2024-03-10 11:00:00 UTC);
        for _ in 0..2 {
            assert_eq!(
                calculate_start_time(Some(DATE_ONLY), Some(WITH_TIME)),
                calculate_start_time(Some(DATE_ONLY), Some(WITH_TIME))
            );
            assert_eq!(
                calculate_event_status(Some(WITH_TIME), None, now),
                calculate_event_status(Some(WITH_TIME), None, now)
            );
        }
    }
}
