use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{PredictionResult, StressLevel};

pub const NO_FACTORS: &str = "Based on the inputs, there are no major stress factors detected.";

/// A prediction tagged with the request that produced it.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub request_id: Uuid,
    pub result: PredictionResult,
}

impl ReportEntry {
    pub fn new(request_id: Uuid, result: PredictionResult) -> Self {
        ReportEntry { request_id, result }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSummary {
    pub label: StressLevel,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorSummary {
    pub factor: String,
    pub count: usize,
}

/// Counts per stress level, always listing Low, Medium and High.
pub fn summarize_by_label(entries: &[ReportEntry]) -> Vec<LabelSummary> {
    StressLevel::ALL
        .into_iter()
        .map(|label| {
            let count = entries
                .iter()
                .filter(|entry| entry.result.label == label)
                .count();
            LabelSummary {
                label,
                count,
                share: if entries.is_empty() {
                    0.0
                } else {
                    count as f64 / entries.len() as f64
                },
            }
        })
        .collect()
}

pub fn summarize_factors(entries: &[ReportEntry]) -> Vec<FactorSummary> {
    let mut map: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        for reason in &entry.result.reasons {
            *map.entry(reason.as_str()).or_insert(0) += 1;
        }
    }

    let mut summaries: Vec<FactorSummary> = map
        .into_iter()
        .map(|(factor, count)| FactorSummary {
            factor: factor.to_string(),
            count,
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.factor.cmp(&b.factor)));
    summaries
}

/// Plain-text rendering used by the terminal front end.
pub fn render_result(result: &PredictionResult) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Predicted Stress Level: {} ({})",
        result.label,
        result.tone().color()
    );
    let _ = writeln!(output);

    if result.reasons.is_empty() {
        let _ = writeln!(output, "{NO_FACTORS}");
    } else {
        let _ = writeln!(output, "Possible Contributing Factors:");
        for reason in &result.reasons {
            let _ = writeln!(output, "- {reason}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{}", result.label.advice());
    output
}

pub fn build_report(entry: &ReportEntry, generated_at: DateTime<Utc>) -> String {
    let result = &entry.result;
    let mut output = String::new();

    let _ = writeln!(output, "# Prediction Result");
    let _ = writeln!(
        output,
        "Request {} generated {}",
        entry.request_id,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Predicted Stress Level: {} ({})",
        result.label,
        result.tone().color()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Possible Contributing Factors");

    if result.reasons.is_empty() {
        let _ = writeln!(output, "{NO_FACTORS}");
    } else {
        for reason in &result.reasons {
            let _ = writeln!(output, "- {reason}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggestion");
    let _ = writeln!(output, "{}", result.label.advice());
    output
}

pub fn build_batch_report(
    source: &str,
    entries: &[ReportEntry],
    generated_at: DateTime<Utc>,
) -> String {
    let labels = summarize_by_label(entries);
    let factors = summarize_factors(entries);

    let mut output = String::new();

    let _ = writeln!(output, "# Stress Prediction Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} surveys) at {}",
        source,
        entries.len(),
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Stress Level Mix");

    if entries.is_empty() {
        let _ = writeln!(output, "No surveys in this batch.");
    } else {
        for summary in &labels {
            let _ = writeln!(
                output,
                "- {}: {} surveys ({:.0}%)",
                summary.label,
                summary.count,
                summary.share * 100.0
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Common Factors");

    if factors.is_empty() {
        let _ = writeln!(output, "No contributing factors detected.");
    } else {
        for summary in factors.iter().take(10) {
            let _ = writeln!(output, "- {}: {} surveys", summary.factor, summary.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Surveys");

    for (index, entry) in entries.iter().enumerate() {
        let reasons = if entry.result.reasons.is_empty() {
            "no major factors".to_string()
        } else {
            entry.result.reasons.join("; ")
        };
        let _ = writeln!(
            output,
            "- #{} {}: {} ({})",
            index + 1,
            entry.request_id,
            entry.result.label,
            reasons
        );
    }

    output
}
