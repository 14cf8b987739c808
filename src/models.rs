use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RelationshipStatus {
    #[default]
    Single,
    Situationship,
    Committed,
    Casual,
}

impl RelationshipStatus {
    pub const ALL: [RelationshipStatus; 4] = [
        RelationshipStatus::Single,
        RelationshipStatus::Situationship,
        RelationshipStatus::Committed,
        RelationshipStatus::Casual,
    ];

    pub fn code(self) -> u8 {
        match self {
            RelationshipStatus::Single => 0,
            RelationshipStatus::Situationship => 1,
            RelationshipStatus::Committed => 2,
            RelationshipStatus::Casual => 3,
        }
    }

    /// Label shown in the relationship picker.
    pub fn display_name(self) -> &'static str {
        match self {
            RelationshipStatus::Single => "Single",
            RelationshipStatus::Situationship => "Talking/Situationship",
            RelationshipStatus::Committed => "Committed",
            RelationshipStatus::Casual => "Casual/Hookup",
        }
    }
}

impl TryFrom<u8> for RelationshipStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RelationshipStatus::ALL
            .into_iter()
            .find(|status| status.code() == value)
            .ok_or_else(|| format!("unknown relationship status code {value}"))
    }
}

impl From<RelationshipStatus> for u8 {
    fn from(value: RelationshipStatus) -> Self {
        value.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SubstanceFrequency {
    #[default]
    None,
    Occasional,
    Frequent,
}

impl SubstanceFrequency {
    pub fn code(self) -> u8 {
        match self {
            SubstanceFrequency::None => 0,
            SubstanceFrequency::Occasional => 1,
            SubstanceFrequency::Frequent => 2,
        }
    }
}

impl TryFrom<u8> for SubstanceFrequency {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SubstanceFrequency::None),
            1 => Ok(SubstanceFrequency::Occasional),
            2 => Ok(SubstanceFrequency::Frequent),
            other => Err(format!("unknown substance frequency code {other}")),
        }
    }
}

impl From<SubstanceFrequency> for u8 {
    fn from(value: SubstanceFrequency) -> Self {
        value.code()
    }
}

/// One student's survey answers, as consumed by both the classifier and
/// the explanation rules.
///
/// Fields are not range-checked here; build through
/// [`SurveyAnswers`](crate::survey::SurveyAnswers) to get a record that
/// respects the form's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub study_hours: u32,
    pub attendance: u32,
    pub assignment_load: u32,
    pub sleep_hours: u32,
    pub screen_time: u32,
    pub physical_activity: u32,
    pub social_interaction: u32,
    pub relationship_status: RelationshipStatus,
    pub relationship_satisfaction: u32,
    pub alcohol_use: bool,
    pub smoking_use: bool,
    pub weed_use: bool,
    pub substance_frequency: SubstanceFrequency,
}

impl InputRecord {
    pub fn substance_count(&self) -> u32 {
        [self.alcohol_use, self.smoking_use, self.weed_use]
            .into_iter()
            .filter(|used| *used)
            .count() as u32
    }

    pub fn feature(&self, feature: Feature) -> f64 {
        let value = match feature {
            Feature::StudyHours => self.study_hours,
            Feature::SleepHours => self.sleep_hours,
            Feature::ScreenTime => self.screen_time,
            Feature::Attendance => self.attendance,
            Feature::AssignmentLoad => self.assignment_load,
            Feature::PhysicalActivity => self.physical_activity,
            Feature::SocialInteraction => self.social_interaction,
            Feature::RelationshipStatus => u32::from(self.relationship_status.code()),
            Feature::RelationshipSatisfaction => self.relationship_satisfaction,
            Feature::AlcoholUse => u32::from(self.alcohol_use),
            Feature::SmokingUse => u32::from(self.smoking_use),
            Feature::WeedUse => u32::from(self.weed_use),
            Feature::SubstanceFrequency => u32::from(self.substance_frequency.code()),
        };
        f64::from(value)
    }
}

/// Record columns a trained model may split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    StudyHours,
    SleepHours,
    ScreenTime,
    Attendance,
    AssignmentLoad,
    PhysicalActivity,
    SocialInteraction,
    RelationshipStatus,
    RelationshipSatisfaction,
    AlcoholUse,
    SmokingUse,
    WeedUse,
    SubstanceFrequency,
}

impl Feature {
    /// Column order of the training frame.
    pub const COLUMNS: [Feature; 13] = [
        Feature::StudyHours,
        Feature::SleepHours,
        Feature::ScreenTime,
        Feature::Attendance,
        Feature::AssignmentLoad,
        Feature::PhysicalActivity,
        Feature::SocialInteraction,
        Feature::RelationshipStatus,
        Feature::RelationshipSatisfaction,
        Feature::AlcoholUse,
        Feature::SmokingUse,
        Feature::WeedUse,
        Feature::SubstanceFrequency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::StudyHours => "study_hours",
            Feature::SleepHours => "sleep_hours",
            Feature::ScreenTime => "screen_time",
            Feature::Attendance => "attendance",
            Feature::AssignmentLoad => "assignment_load",
            Feature::PhysicalActivity => "physical_activity",
            Feature::SocialInteraction => "social_interaction",
            Feature::RelationshipStatus => "relationship_status",
            Feature::RelationshipSatisfaction => "relationship_satisfaction",
            Feature::AlcoholUse => "alcohol_use",
            Feature::SmokingUse => "smoking_use",
            Feature::WeedUse => "weed_use",
            Feature::SubstanceFrequency => "substance_frequency",
        }
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::COLUMNS
            .into_iter()
            .find(|feature| feature.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    pub const ALL: [StressLevel; 3] = [StressLevel::Low, StressLevel::Medium, StressLevel::High];

    pub fn as_str(self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Medium => "Medium",
            StressLevel::High => "High",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            StressLevel::Low => Tone::Positive,
            StressLevel::Medium => Tone::Cautionary,
            StressLevel::High => Tone::Warning,
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            StressLevel::Low => "You seem to be managing stress well. Keep it up!",
            StressLevel::Medium => {
                "Small lifestyle adjustments (sleep, routine, balance) could help reduce stress."
            }
            StressLevel::High => {
                "Consider addressing the highlighted factors gradually. Support and balance matter."
            }
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StressLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StressLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == value)
            .ok_or_else(|| format!("unknown stress level {value:?}"))
    }
}

/// Display tier for a predicted level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Cautionary,
    Warning,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Tone::Positive => "green",
            Tone::Cautionary => "orange",
            Tone::Warning => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: StressLevel,
    pub reasons: Vec<String>,
}

impl PredictionResult {
    pub fn tone(&self) -> Tone {
        self.label.tone()
    }
}
