use std::io::Read;

use anyhow::Context;
use serde::Deserialize;

use crate::error::RecordError;
use crate::models::{InputRecord, RelationshipStatus, SubstanceFrequency};

/// A bounded numeric question on the survey form.
#[derive(Debug, Clone, Copy)]
pub struct Slider {
    pub field: &'static str,
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

pub const STUDY_HOURS: Slider = Slider {
    field: "study_hours",
    label: "Study Hours (Daily)",
    min: 0,
    max: 12,
    default: 5,
};
pub const ATTENDANCE: Slider = Slider {
    field: "attendance",
    label: "Attendance (%)",
    min: 0,
    max: 100,
    default: 80,
};
pub const ASSIGNMENT_LOAD: Slider = Slider {
    field: "assignment_load",
    label: "Assignment Load (1-5)",
    min: 1,
    max: 5,
    default: 3,
};
pub const SLEEP_HOURS: Slider = Slider {
    field: "sleep_hours",
    label: "Sleep Hours",
    min: 0,
    max: 12,
    default: 7,
};
pub const SCREEN_TIME: Slider = Slider {
    field: "screen_time",
    label: "Screen Time (Hours)",
    min: 0,
    max: 12,
    default: 4,
};
pub const PHYSICAL_ACTIVITY: Slider = Slider {
    field: "physical_activity",
    label: "Physical Activity (Hrs/Week)",
    min: 0,
    max: 10,
    default: 2,
};
pub const SOCIAL_INTERACTION: Slider = Slider {
    field: "social_interaction",
    label: "Social Interaction (1-5)",
    min: 1,
    max: 5,
    default: 3,
};
pub const RELATIONSHIP_SATISFACTION: Slider = Slider {
    field: "relationship_satisfaction",
    label: "Relationship Satisfaction (0-5)",
    min: 0,
    max: 5,
    default: 3,
};

impl Slider {
    pub fn check(&self, value: i64) -> Result<u32, RecordError> {
        if value < self.min || value > self.max {
            return Err(RecordError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value as u32)
    }
}

/// Raw answers as the form collects them, before bounds are enforced.
///
/// `relationship_satisfaction` is ignored for single students and
/// `substance_frequency` is ignored when no substance is ticked, the same
/// way the form hides those questions. A ticked substance without a chosen
/// frequency counts as occasional use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyAnswers {
    pub study_hours: i64,
    pub attendance: i64,
    pub assignment_load: i64,
    pub sleep_hours: i64,
    pub screen_time: i64,
    pub physical_activity: i64,
    pub social_interaction: i64,
    pub relationship_status: i64,
    pub relationship_satisfaction: i64,
    pub alcohol_use: bool,
    pub smoking_use: bool,
    pub weed_use: bool,
    pub substance_frequency: Option<i64>,
}

impl Default for SurveyAnswers {
    fn default() -> Self {
        SurveyAnswers {
            study_hours: STUDY_HOURS.default,
            attendance: ATTENDANCE.default,
            assignment_load: ASSIGNMENT_LOAD.default,
            sleep_hours: SLEEP_HOURS.default,
            screen_time: SCREEN_TIME.default,
            physical_activity: PHYSICAL_ACTIVITY.default,
            social_interaction: SOCIAL_INTERACTION.default,
            relationship_status: 0,
            relationship_satisfaction: RELATIONSHIP_SATISFACTION.default,
            alcohol_use: false,
            smoking_use: false,
            weed_use: false,
            substance_frequency: None,
        }
    }
}

impl SurveyAnswers {
    pub fn build(&self) -> Result<InputRecord, RecordError> {
        let relationship_status = u8::try_from(self.relationship_status)
            .ok()
            .and_then(|code| RelationshipStatus::try_from(code).ok())
            .ok_or(RecordError::UnknownOption {
                field: "relationship_status",
                value: self.relationship_status,
            })?;

        let relationship_satisfaction = match relationship_status {
            RelationshipStatus::Single => 0,
            _ => RELATIONSHIP_SATISFACTION.check(self.relationship_satisfaction)?,
        };

        let any_substance = self.alcohol_use || self.smoking_use || self.weed_use;
        let substance_frequency = if !any_substance {
            SubstanceFrequency::None
        } else {
            match self.substance_frequency.unwrap_or(1) {
                1 => SubstanceFrequency::Occasional,
                2 => SubstanceFrequency::Frequent,
                other => {
                    return Err(RecordError::UnknownOption {
                        field: "substance_frequency",
                        value: other,
                    })
                }
            }
        };

        Ok(InputRecord {
            study_hours: STUDY_HOURS.check(self.study_hours)?,
            attendance: ATTENDANCE.check(self.attendance)?,
            assignment_load: ASSIGNMENT_LOAD.check(self.assignment_load)?,
            sleep_hours: SLEEP_HOURS.check(self.sleep_hours)?,
            screen_time: SCREEN_TIME.check(self.screen_time)?,
            physical_activity: PHYSICAL_ACTIVITY.check(self.physical_activity)?,
            social_interaction: SOCIAL_INTERACTION.check(self.social_interaction)?,
            relationship_status,
            relationship_satisfaction,
            alcohol_use: self.alcohol_use,
            smoking_use: self.smoking_use,
            weed_use: self.weed_use,
            substance_frequency,
        })
    }
}

#[derive(Deserialize)]
struct CsvRow {
    study_hours: i64,
    attendance: i64,
    assignment_load: i64,
    sleep_hours: i64,
    screen_time: i64,
    physical_activity: i64,
    social_interaction: i64,
    relationship_status: i64,
    #[serde(default)]
    relationship_satisfaction: i64,
    alcohol_use: u8,
    smoking_use: u8,
    weed_use: u8,
    #[serde(default)]
    substance_frequency: i64,
}

fn flag(field: &'static str, value: u8) -> Result<bool, RecordError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RecordError::OutOfRange {
            field,
            value: i64::from(other),
            min: 0,
            max: 1,
        }),
    }
}

// Unlike the form, a file has no hidden questions, so rows that break the
// record invariants are rejected instead of normalized.
impl CsvRow {
    fn check_invariants(&self) -> Result<(), RecordError> {
        if self.relationship_status == 0 && self.relationship_satisfaction != 0 {
            return Err(RecordError::Inconsistent {
                field: "relationship_satisfaction",
                value: self.relationship_satisfaction,
                rule: "single students must report 0",
            });
        }

        let any_substance = self.alcohol_use != 0 || self.smoking_use != 0 || self.weed_use != 0;
        if !any_substance && self.substance_frequency != 0 {
            return Err(RecordError::Inconsistent {
                field: "substance_frequency",
                value: self.substance_frequency,
                rule: "no substance use was reported",
            });
        }
        if any_substance && self.substance_frequency == 0 {
            return Err(RecordError::Inconsistent {
                field: "substance_frequency",
                value: 0,
                rule: "substance use was reported",
            });
        }
        Ok(())
    }

    fn into_record(self) -> Result<InputRecord, RecordError> {
        self.check_invariants()?;
        SurveyAnswers {
            study_hours: self.study_hours,
            attendance: self.attendance,
            assignment_load: self.assignment_load,
            sleep_hours: self.sleep_hours,
            screen_time: self.screen_time,
            physical_activity: self.physical_activity,
            social_interaction: self.social_interaction,
            relationship_status: self.relationship_status,
            relationship_satisfaction: self.relationship_satisfaction,
            alcohol_use: flag("alcohol_use", self.alcohol_use)?,
            smoking_use: flag("smoking_use", self.smoking_use)?,
            weed_use: flag("weed_use", self.weed_use)?,
            substance_frequency: Some(self.substance_frequency),
        }
        .build()
    }
}

/// Reads survey rows from CSV, one record per row. Rows go through the
/// same bounds as the form and must already satisfy the record invariants;
/// the first bad row aborts the import.
pub fn read_csv<R: Read>(source: R) -> anyhow::Result<Vec<InputRecord>> {
    let mut reader = csv::Reader::from_reader(source);
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("failed to parse survey row on line {line}"))?;
        let record = row
            .into_record()
            .with_context(|| format!("invalid survey row on line {line}"))?;
        records.push(record);
    }

    Ok(records)
}
