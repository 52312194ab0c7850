use std::collections::HashSet;

use crate::models::Visit;
use crate::scoring::config::VisitPolicy;

/// Unique meals divided by total visits. `None` when there are no visits.
pub fn raw_variety<'a, I>(meal_names: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut unique = HashSet::new();
    let mut total = 0usize;
    for name in meal_names {
        unique.insert(name);
        total += 1;
    }

    if total == 0 {
        return None;
    }
    Some(unique.len() as f64 / total as f64)
}

/// Apply the threshold punishment to a raw variety ratio.
///
/// Strictly below the threshold the ratio is multiplied by the punishment
/// factor; at or above it is returned unchanged. There is no smoothing across
/// the cutoff.
pub fn variety_ratio_signal(raw: f64, policy: &VisitPolicy) -> f64 {
    if raw < policy.variety_threshold {
        raw * policy.punishment_factor
    } else {
        raw
    }
}

/// Food variety for one hall's visits, or `None` without history.
pub fn food_variety(visits: &[&Visit], policy: &VisitPolicy) -> Option<f64> {
    raw_variety(visits.iter().map(|v| v.meal_name.as_str()))
        .map(|raw| variety_ratio_signal(raw, policy))
}
