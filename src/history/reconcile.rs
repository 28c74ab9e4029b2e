use chrono::{Days, NaiveDate};

use crate::history::config::StageDurations;
use crate::models::{
    is_pest_free, DetectionRecord, GrowthStage, HistoryEntry, PestTransition, PestTransitionKind,
    StageTransition, TransitionDirection,
};

/// Annotates a chronologically ordered sequence of records with stage
/// transitions, pest transitions and maturity estimates.
///
/// Pure apart from `today`, which only feeds `days_remaining`.
pub fn reconcile_history(
    records: &[DetectionRecord],
    today: NaiveDate,
    durations: &StageDurations,
) -> Vec<HistoryEntry> {
    let mut last_known_stage: Option<GrowthStage> = None;
    let mut previous_pest: Option<&str> = None;
    let mut entries = Vec::with_capacity(records.len());

    for record in records {
        // Unknown stages take the last known stage and never update the tracker.
        let current_stage = record.growth.stage().or(last_known_stage);

        let stage_transition = match (last_known_stage, current_stage) {
            (Some(from), Some(to)) if from != to => Some(stage_transition(from, to)),
            _ => None,
        };

        let current_pest = record.growth.pest_detected.as_str();
        let pest_transition =
            previous_pest.and_then(|previous| pest_transition(previous, current_pest));

        let estimated_maturity_date =
            current_stage.and_then(|stage| estimate_maturity(record, stage, durations));
        let days_remaining =
            estimated_maturity_date.map(|estimated| (estimated - today).num_days().max(0));

        entries.push(HistoryEntry {
            record: record.clone(),
            stage_transition,
            pest_transition,
            days_remaining,
            estimated_maturity_date,
        });

        if current_stage.is_some() {
            last_known_stage = current_stage;
        }
        previous_pest = Some(current_pest);
    }

    entries
}

fn stage_transition(from: GrowthStage, to: GrowthStage) -> StageTransition {
    let direction = if to.ordinal() > from.ordinal() {
        TransitionDirection::Improving
    } else {
        TransitionDirection::Regressing
    };

    StageTransition {
        from,
        to,
        direction,
        description: format!("{from} → {to} ({})", direction.as_str()),
    }
}

fn pest_transition(previous: &str, current: &str) -> Option<PestTransition> {
    let previous_free = is_pest_free(previous);
    let current_free = is_pest_free(current);

    if previous_free && current_free {
        return None;
    }
    if previous == current {
        return None;
    }

    let kind = if current_free {
        PestTransitionKind::Resolved
    } else if previous_free {
        PestTransitionKind::New
    } else {
        PestTransitionKind::Changed
    };

    Some(PestTransition {
        from: previous.to_string(),
        to: current.to_string(),
        kind,
        description: format!("{previous} → {current} ({})", kind.as_str()),
    })
}

/// Capture date plus the stage's remaining duration. `None` for terminal
/// stages and ids that do not carry a date.
fn estimate_maturity(
    record: &DetectionRecord,
    stage: GrowthStage,
    durations: &StageDurations,
) -> Option<NaiveDate> {
    let days = durations.days_for(stage);
    if days == 0 {
        return None;
    }

    record
        .capture_date()?
        .checked_add_days(Days::new(u64::from(days)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Environment, Growth};

    fn record(id: &str, stage: &str, pest: &str) -> DetectionRecord {
        DetectionRecord {
            id: id.into(),
            raw_image_ref: None,
            detected_image_ref: None,
            environment: Environment::default(),
            growth: Growth {
                growth_stage: stage.into(),
                pest_detected: pest.into(),
                ..Growth::default()
            },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seedling_to_vegetative_is_improving_on_second_record_only() {
        let records = vec![
            record("2024-01-01_10-00-00", "Seedling", "None"),
            record("2024-01-05_10-00-00", "Vegetative", "None"),
        ];
        let entries = reconcile_history(&records, date(2024, 1, 6), &StageDurations::default());

        assert!(entries[0].stage_transition.is_none());
        let transition = entries[1].stage_transition.as_ref().unwrap();
        assert_eq!(transition.from, GrowthStage::Seedling);
        assert_eq!(transition.to, GrowthStage::Vegetative);
        assert_eq!(transition.direction, TransitionDirection::Improving);
        assert_eq!(transition.description, "Seedling → Vegetative (improving)");
    }

    #[test]
    fn going_back_a_stage_is_regressing() {
        let records = vec![
            record("2024-01-01_10-00-00", "Mature", "None"),
            record("2024-01-02_10-00-00", "Vegetative", "None"),
        ];
        let entries = reconcile_history(&records, date(2024, 1, 2), &StageDurations::default());
        assert_eq!(
            entries[1].stage_transition.as_ref().unwrap().direction,
            TransitionDirection::Regressing
        );
    }

    #[test]
    fn unknown_stage_carries_forward_without_spurious_transitions() {
        let records = vec![
            record("2024-01-01_10-00-00", "Seedling", "None"),
            record("2024-01-02_10-00-00", "N/A", "None"),
            record("2024-01-03_10-00-00", "Seedling", "None"),
            record("2024-01-04_10-00-00", "garbage", "None"),
            record("2024-01-05_10-00-00", "Vegetative", "None"),
        ];
        let entries = reconcile_history(&records, date(2024, 1, 1), &StageDurations::default());

        let with_transition: Vec<_> = entries
            .iter()
            .filter(|entry| entry.stage_transition.is_some())
            .map(|entry| entry.record.id.as_str())
            .collect();
        assert_eq!(with_transition, vec!["2024-01-05_10-00-00"]);
        assert_eq!(
            entries[4].stage_transition.as_ref().unwrap().from,
            GrowthStage::Seedling
        );
    }

    #[test]
    fn leading_unknown_stages_produce_nothing() {
        let records = vec![
            record("2024-01-01_10-00-00", "N/A", "None"),
            record("2024-01-02_10-00-00", "Vegetative", "None"),
        ];
        let entries = reconcile_history(&records, date(2024, 1, 1), &StageDurations::default());

        assert!(entries[0].stage_transition.is_none());
        assert!(entries[0].days_remaining.is_none());
        assert!(entries[1].stage_transition.is_none());
    }

    #[test]
    fn pest_transitions_cover_new_changed_and_resolved() {
        let records = vec![
            record("2024-01-01_10-00-00", "Seedling", "None"),
            record("2024-01-02_10-00-00", "Seedling", "none"),
            record("2024-01-03_10-00-00", "Seedling", "Aphid"),
            record("2024-01-04_10-00-00", "Seedling", "Aphid"),
            record("2024-01-05_10-00-00", "Seedling", "Thrips"),
            record("2024-01-06_10-00-00", "Seedling", "None"),
        ];
        let entries = reconcile_history(&records, date(2024, 1, 1), &StageDurations::default());
        let kinds: Vec<_> = entries
            .iter()
            .map(|entry| entry.pest_transition.as_ref().map(|t| t.kind))
            .collect();

        assert_eq!(
            kinds,
            vec![
                None,
                None,
                Some(PestTransitionKind::New),
                None,
                Some(PestTransitionKind::Changed),
                Some(PestTransitionKind::Resolved),
            ]
        );
        assert_eq!(
            entries[5].pest_transition.as_ref().unwrap().description,
            "Thrips → None (resolved)"
        );
    }

    #[test]
    fn first_record_with_pest_has_no_transition() {
        let records = vec![record("2024-01-01_10-00-00", "Seedling", "Aphid")];
        let entries = reconcile_history(&records, date(2024, 1, 1), &StageDurations::default());
        assert!(entries[0].pest_transition.is_none());
    }

    #[test]
    fn maturity_estimate_uses_stage_duration_from_capture_date() {
        let records = vec![record("2024-01-05_10-00-00", "Vegetative", "None")];
        let entries = reconcile_history(&records, date(2024, 1, 8), &StageDurations::default());

        assert_eq!(entries[0].estimated_maturity_date, Some(date(2024, 1, 15)));
        assert_eq!(entries[0].days_remaining, Some(7));
    }

    #[test]
    fn days_remaining_never_negative() {
        let records = vec![record("2024-01-01_10-00-00", "Seedling", "None")];
        let entries = reconcile_history(&records, date(2025, 6, 1), &StageDurations::default());

        assert_eq!(entries[0].estimated_maturity_date, Some(date(2024, 1, 6)));
        assert_eq!(entries[0].days_remaining, Some(0));
    }

    #[test]
    fn mature_and_undated_records_have_no_estimate() {
        let records = vec![
            record("2024-01-01_10-00-00", "Mature", "None"),
            record("latest", "Seedling", "None"),
        ];
        let entries = reconcile_history(&records, date(2024, 1, 1), &StageDurations::default());

        assert!(entries[0].days_remaining.is_none());
        assert!(entries[0].estimated_maturity_date.is_none());
        assert!(entries[1].days_remaining.is_none());
    }

    #[test]
    fn carried_stage_drives_the_estimate() {
        let records = vec![
            record("2024-01-01_10-00-00", "Seedling", "None"),
            record("2024-01-02_10-00-00", "N/A", "None"),
        ];
        let entries = reconcile_history(&records, date(2024, 1, 2), &StageDurations::default());
        assert_eq!(entries[1].estimated_maturity_date, Some(date(2024, 1, 7)));
        assert_eq!(entries[1].days_remaining, Some(5));
    }

    #[test]
    fn source_records_are_preserved() {
        let records = vec![
            record("2024-01-01_10-00-00", "Seedling", "None"),
            record("2024-01-02_10-00-00", "Vegetative", "Aphid"),
        ];
        let entries = reconcile_history(&records, date(2024, 1, 2), &StageDurations::default());
        let echoed: Vec<_> = entries.into_iter().map(|entry| entry.record).collect();
        assert_eq!(echoed, records);
    }
}
