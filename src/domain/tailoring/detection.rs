use serde_json::Value;

use crate::domain::profile::CvProfile;

/// A summary shorter than this counts as missing
pub const MIN_SUMMARY_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIssue {
    SummaryMissing,
    SummaryIdentical,
    FirstExperienceIdentical,
    TitleIdentical,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub issues: Vec<CopyIssue>,
}

impl CopyReport {
    /// A missing or copied summary is enough on its own; otherwise two
    /// independent signs of copying are required.
    pub fn is_unchanged(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i, CopyIssue::SummaryMissing | CopyIssue::SummaryIdentical))
            || self.issues.len() >= 2
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Compare the model's raw tailored profile with the source profile using
/// exact string equality.
pub fn detect_copy(ai_profile: &Value, original: &CvProfile) -> CopyReport {
    let mut issues = Vec::new();
    let personal = &ai_profile["personal"];

    let ai_summary = non_empty_str(&personal["summary"]);
    let original_summary = original.personal.summary.as_str();

    match ai_summary {
        None => issues.push(CopyIssue::SummaryMissing),
        Some(summary) if summary.chars().count() < MIN_SUMMARY_CHARS => {
            issues.push(CopyIssue::SummaryMissing)
        }
        Some(summary)
            if summary == original_summary
                && original_summary.chars().count() > MIN_SUMMARY_CHARS =>
        {
            issues.push(CopyIssue::SummaryIdentical)
        }
        Some(_) => {}
    }

    let ai_first_description = non_empty_str(&ai_profile["experience"][0]["description"]);
    let original_first_description = original
        .experience
        .first()
        .map(|e| e.description.as_str())
        .filter(|d| !d.is_empty());
    if let (Some(ai), Some(orig)) = (ai_first_description, original_first_description) {
        if ai == orig {
            issues.push(CopyIssue::FirstExperienceIdentical);
        }
    }

    let original_title = original.personal.title.as_str();
    if !original_title.is_empty() && personal["title"].as_str() == Some(original_title) {
        issues.push(CopyIssue::TitleIdentical);
    }

    CopyReport { issues }
}
