use crate::models::{InputRecord, RelationshipStatus, SubstanceFrequency};

/// Lists the contributing factors triggered by `record`.
///
/// Factors come out grouped as academics, lifestyle, relationships and then
/// substances, and keep that order; an empty list means nothing tripped.
pub fn explain(record: &InputRecord) -> Vec<String> {
    let mut reasons = Vec::new();

    academics(record, &mut reasons);
    lifestyle(record, &mut reasons);
    relationships(record, &mut reasons);
    substances(record, &mut reasons);

    reasons.into_iter().map(str::to_string).collect()
}

fn academics(record: &InputRecord, reasons: &mut Vec<&'static str>) {
    if record.study_hours > 7 {
        reasons.push("High study workload (>7 hrs/day)");
    }
    if record.assignment_load > 3 {
        reasons.push("Heavy assignment load");
    }
    if record.attendance < 75 {
        reasons.push("Low attendance pressure (<75%)");
    }
}

fn lifestyle(record: &InputRecord, reasons: &mut Vec<&'static str>) {
    if record.sleep_hours < 6 {
        reasons.push("Insufficient sleep (<6 hrs/day)");
    }
    if record.screen_time > 6 {
        reasons.push("Excessive screen time (>6 hrs/day)");
    }
    if record.physical_activity < 2 {
        reasons.push("Low physical activity (<2 hrs/week)");
    }
    if record.social_interaction < 3 {
        reasons.push("Low social interaction");
    }
}

fn relationships(record: &InputRecord, reasons: &mut Vec<&'static str>) {
    let satisfaction = record.relationship_satisfaction;

    match record.relationship_status {
        RelationshipStatus::Single => {}
        RelationshipStatus::Situationship => reasons.push("Uncertain 'Situationship' status"),
        RelationshipStatus::Casual => {
            if satisfaction <= 2 {
                reasons.push("Unsatisfying casual relationship");
            }
        }
        RelationshipStatus::Committed => match satisfaction {
            0..=2 => reasons.push("Low satisfaction in committed relationship"),
            3..=4 => reasons.push("Moderate relationship stress"),
            _ => {}
        },
    }
}

// Occasional use never flags, whatever the number of substances.
fn substances(record: &InputRecord, reasons: &mut Vec<&'static str>) {
    let count = record.substance_count();
    let frequent = record.substance_frequency == SubstanceFrequency::Frequent;

    if count > 0 && frequent {
        reasons.push("Frequent substance use");
    }
    if count >= 2 && frequent {
        reasons.push("High risk: Multiple frequent substances");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_record() -> InputRecord {
        InputRecord {
            study_hours: 5,
            attendance: 90,
            assignment_load: 2,
            sleep_hours: 8,
            screen_time: 3,
            physical_activity: 4,
            social_interaction: 4,
            relationship_status: RelationshipStatus::Single,
            relationship_satisfaction: 0,
            alcohol_use: false,
            smoking_use: false,
            weed_use: false,
            substance_frequency: SubstanceFrequency::None,
        }
    }

    fn in_relationship(status: RelationshipStatus, satisfaction: u32) -> InputRecord {
        InputRecord {
            relationship_status: status,
            relationship_satisfaction: satisfaction,
            ..healthy_record()
        }
    }

    #[test]
    fn healthy_midpoints_produce_no_reasons() {
        assert!(explain(&healthy_record()).is_empty());
    }

    #[test]
    fn stressed_student_lists_factors_in_fixed_order() {
        let record = InputRecord {
            study_hours: 8,
            attendance: 70,
            assignment_load: 4,
            sleep_hours: 5,
            screen_time: 7,
            physical_activity: 1,
            social_interaction: 2,
            relationship_status: RelationshipStatus::Committed,
            relationship_satisfaction: 2,
            ..healthy_record()
        };

        assert_eq!(
            explain(&record),
            vec![
                "High study workload (>7 hrs/day)",
                "Heavy assignment load",
                "Low attendance pressure (<75%)",
                "Insufficient sleep (<6 hrs/day)",
                "Excessive screen time (>6 hrs/day)",
                "Low physical activity (<2 hrs/week)",
                "Low social interaction",
                "Low satisfaction in committed relationship",
            ]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let record = InputRecord {
            study_hours: 7,
            attendance: 75,
            assignment_load: 3,
            sleep_hours: 6,
            screen_time: 6,
            physical_activity: 2,
            social_interaction: 3,
            ..healthy_record()
        };
        assert!(explain(&record).is_empty());
    }

    #[test]
    fn repeated_calls_agree() {
        let record = InputRecord {
            sleep_hours: 4,
            weed_use: true,
            smoking_use: true,
            substance_frequency: SubstanceFrequency::Frequent,
            ..in_relationship(RelationshipStatus::Casual, 1)
        };
        assert_eq!(explain(&record), explain(&record));
    }

    #[test]
    fn situationship_fires_regardless_of_satisfaction() {
        for satisfaction in 0..=5 {
            let reasons = explain(&in_relationship(RelationshipStatus::Situationship, satisfaction));
            assert_eq!(reasons, vec!["Uncertain 'Situationship' status"]);
        }
    }

    #[test]
    fn single_never_produces_relationship_reason() {
        for satisfaction in 0..=5 {
            assert!(explain(&in_relationship(RelationshipStatus::Single, satisfaction)).is_empty());
        }
    }

    #[test]
    fn casual_flags_only_low_satisfaction() {
        assert_eq!(
            explain(&in_relationship(RelationshipStatus::Casual, 2)),
            vec!["Unsatisfying casual relationship"]
        );
        assert!(explain(&in_relationship(RelationshipStatus::Casual, 3)).is_empty());
    }

    #[test]
    fn committed_satisfaction_tiers() {
        assert_eq!(
            explain(&in_relationship(RelationshipStatus::Committed, 0)),
            vec!["Low satisfaction in committed relationship"]
        );
        assert_eq!(
            explain(&in_relationship(RelationshipStatus::Committed, 3)),
            vec!["Moderate relationship stress"]
        );
        assert_eq!(
            explain(&in_relationship(RelationshipStatus::Committed, 4)),
            vec!["Moderate relationship stress"]
        );
        assert!(explain(&in_relationship(RelationshipStatus::Committed, 5)).is_empty());
    }

    #[test]
    fn two_frequent_substances_add_high_risk() {
        let record = InputRecord {
            alcohol_use: true,
            smoking_use: true,
            substance_frequency: SubstanceFrequency::Frequent,
            ..healthy_record()
        };
        assert_eq!(
            explain(&record),
            vec!["Frequent substance use", "High risk: Multiple frequent substances"]
        );
    }

    #[test]
    fn single_frequent_substance() {
        let record = InputRecord {
            alcohol_use: true,
            substance_frequency: SubstanceFrequency::Frequent,
            ..healthy_record()
        };
        assert_eq!(explain(&record), vec!["Frequent substance use"]);
    }

    #[test]
    fn occasional_use_never_flags() {
        let record = InputRecord {
            alcohol_use: true,
            smoking_use: true,
            weed_use: true,
            substance_frequency: SubstanceFrequency::Occasional,
            ..healthy_record()
        };
        assert!(explain(&record).is_empty());
    }

    #[test]
    fn domains_stay_in_order_when_all_fire() {
        let record = InputRecord {
            study_hours: 10,
            social_interaction: 1,
            weed_use: true,
            substance_frequency: SubstanceFrequency::Frequent,
            ..in_relationship(RelationshipStatus::Situationship, 4)
        };
        assert_eq!(
            explain(&record),
            vec![
                "High study workload (>7 hrs/day)",
                "Low social interaction",
                "Uncertain 'Situationship' status",
                "Frequent substance use",
            ]
        );
    }
}
