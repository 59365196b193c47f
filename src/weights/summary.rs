use crate::error::ApiError;
use crate::weights::repo::WeightEntry;

/// Derived statistics over one user's history. Computed on demand,
/// never persisted.
#[derive(Debug, Clone)]
pub struct WeightSummary {
    pub lowest_weight: WeightEntry,
    pub highest_weight: WeightEntry,
    pub average_satisfaction: f64,
}

/// Pure aggregation over the ordered history. Empty input is a normal
/// state for a fresh account and comes back as `EmptyHistory` rather
/// than a panic. Weight ties go to the earliest `created_at`.
pub fn summarize(entries: &[WeightEntry]) -> Result<WeightSummary, ApiError> {
    if entries.is_empty() {
        return Err(ApiError::EmptyHistory);
    }

    let lowest_weight = entries
        .iter()
        .min_by(|a, b| {
            a.weight
                .cmp(&b.weight)
                .then_with(|| a.created_at.cmp(&b.created_at))
        })
        .cloned()
        .ok_or(ApiError::EmptyHistory)?;

    let highest_weight = entries
        .iter()
        .max_by(|a, b| {
            a.weight
                .cmp(&b.weight)
                .then_with(|| b.created_at.cmp(&a.created_at))
        })
        .cloned()
        .ok_or(ApiError::EmptyHistory)?;

    let average_satisfaction = entries
        .iter()
        .map(|e| f64::from(e.satisfaction))
        .sum::<f64>()
        / entries.len() as f64;

    Ok(WeightSummary {
        lowest_weight,
        highest_weight,
        average_satisfaction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn entry(weight: i32, satisfaction: i32, at: i64) -> WeightEntry {
        WeightEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            weight,
            satisfaction,
            created_at: OffsetDateTime::from_unix_timestamp(at).unwrap(),
        }
    }

    #[test]
    fn picks_extremes_and_mean() {
        let entries = vec![entry(70, 3, 30), entry(65, 5, 20), entry(80, 4, 10)];
        let summary = summarize(&entries).expect("non-empty history");
        assert_eq!(summary.lowest_weight.weight, 65);
        assert_eq!(summary.highest_weight.weight, 80);
        assert_eq!(summary.average_satisfaction, 4.0);
    }

    #[test]
    fn empty_history_is_an_explicit_error() {
        let err = summarize(&[]).unwrap_err();
        assert!(matches!(err, ApiError::EmptyHistory));
    }

    #[test]
    fn single_entry_is_both_extremes() {
        let entries = vec![entry(72, 2, 10)];
        let summary = summarize(&entries).expect("non-empty history");
        assert_eq!(summary.lowest_weight.id, entries[0].id);
        assert_eq!(summary.highest_weight.id, entries[0].id);
        assert_eq!(summary.average_satisfaction, 2.0);
    }

    #[test]
    fn weight_ties_go_to_the_earliest_entry() {
        let early_low = entry(65, 1, 10);
        let late_low = entry(65, 1, 20);
        let early_high = entry(90, 1, 10);
        let late_high = entry(90, 1, 20);
        let entries = vec![
            late_low.clone(),
            early_low.clone(),
            late_high.clone(),
            early_high.clone(),
        ];
        let summary = summarize(&entries).expect("non-empty history");
        assert_eq!(summary.lowest_weight.id, early_low.id);
        assert_eq!(summary.highest_weight.id, early_high.id);
    }

    #[test]
    fn mean_is_fractional_when_it_should_be() {
        let entries = vec![entry(70, 3, 10), entry(71, 4, 20)];
        let summary = summarize(&entries).expect("non-empty history");
        assert_eq!(summary.average_satisfaction, 3.5);
    }

    #[test]
    fn accepts_non_physical_values() {
        // No bounds by default: zero and negative values aggregate fine.
        let entries = vec![entry(-5, -10, 10), entry(0, 10, 20)];
        let summary = summarize(&entries).expect("non-empty history");
        assert_eq!(summary.lowest_weight.weight, -5);
        assert_eq!(summary.highest_weight.weight, 0);
        assert_eq!(summary.average_satisfaction, 0.0);
    }
}
