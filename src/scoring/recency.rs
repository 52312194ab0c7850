use chrono::NaiveDate;

use crate::scoring::config::VisitPolicy;

/// Whole days between the last visit and `today`.
pub fn days_since(last_visit: NaiveDate, today: NaiveDate) -> i64 {
    (today - last_visit).num_days()
}

/// Recency multiplier for a hall given its most recent visit.
///
/// The comparison is strict: with the default threshold of 0 the penalty
/// only applies to visits dated in the future.
pub fn recent_penalty(last_visit: NaiveDate, today: NaiveDate, policy: &VisitPolicy) -> f64 {
    if days_since(last_visit, today) < policy.days_threshold {
        policy.recency_penalty
    } else {
        1.0
    }
}

/// Penalty for a hall that may have no visit history (neutral without one).
pub fn recent_penalty_or_neutral(
    last_visit: Option<NaiveDate>,
    today: NaiveDate,
    policy: &VisitPolicy,
) -> f64 {
    last_visit
        .map(|date| recent_penalty(date, today, policy))
        .unwrap_or(1.0)
}
