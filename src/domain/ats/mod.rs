//! Heuristic applicant-tracking-system compatibility score.
//!
//! Five categories worth up to 20 points each: contact details, section
//! coverage, content length, formatting signals and keyword overlap.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::domain::profile::CvProfile;

const CATEGORY_MAX: i32 = 20;
const MAX_SUGGESTIONS: usize = 5;
/// Upper bound on distinct job-description words considered for the ratio
const KEYWORD_SAMPLE: usize = 50;

const ACTION_VERBS: [&str; 12] = [
    "led",
    "developed",
    "created",
    "improved",
    "managed",
    "increased",
    "reduced",
    "implemented",
    "designed",
    "built",
    "launched",
    "achieved",
];

static METRICS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+%|\$\d+|\d+ (users|customers|projects|team|million|billion)").unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsBreakdown {
    pub keywords: i32,
    pub formatting: i32,
    pub sections: i32,
    pub length: i32,
    pub contact: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsScore {
    pub score: i32,
    pub breakdown: AtsBreakdown,
    pub suggestions: Vec<String>,
}

/// Request for POST /api/cv/ats-score
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreRequest {
    pub profile: Option<Value>,
    pub job_description: Option<String>,
}

fn word_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split(' ').count()
    }
}

pub fn score(profile: &CvProfile, job_description: Option<&str>) -> AtsScore {
    let mut suggestions: Vec<&str> = Vec::new();
    let personal = &profile.personal;

    let mut contact = 0;
    for (value, points) in [
        (&personal.full_name, 5),
        (&personal.email, 5),
        (&personal.phone, 4),
        (&personal.location, 3),
        (&personal.linkedin, 3),
    ] {
        if !value.is_empty() {
            contact += points;
        }
    }
    if personal.email.is_empty() {
        suggestions.push("Add your email address");
    }
    if personal.phone.is_empty() {
        suggestions.push("Add your phone number");
    }
    if personal.linkedin.is_empty() {
        suggestions.push("Add your LinkedIn profile URL");
    }

    let mut sections = 0;
    if !profile.experience.is_empty() {
        sections += 7;
    }
    if !profile.education.is_empty() {
        sections += 5;
    }
    if !profile.skills.is_empty() {
        sections += 5;
    }
    if !personal.summary.is_empty() {
        sections += 3;
    }
    if profile.experience.is_empty() {
        suggestions.push("Add at least one work experience");
    }
    if profile.skills.is_empty() {
        suggestions.push("Add relevant skills to match job requirements");
    }
    if personal.summary.is_empty() {
        suggestions.push("Write a professional summary (2-3 sentences)");
    }

    let summary_words = word_count(&personal.summary);
    let mut length = match summary_words {
        20..=80 => 5,
        0 => 0,
        _ => 2,
    };
    for exp in &profile.experience {
        length += match word_count(&exp.description) {
            30..=150 => 3,
            0 => 0,
            _ => 1,
        };
    }
    let length = length.min(CATEGORY_MAX);
    if (1..20).contains(&summary_words) {
        suggestions.push("Expand your summary to 20-80 words");
    }

    let mut formatting = 0;
    let mut has_action_verbs = false;
    let mut has_metrics = false;
    for exp in &profile.experience {
        let description = exp.description.to_lowercase();
        if ACTION_VERBS.iter().any(|verb| description.contains(verb)) {
            has_action_verbs = true;
        }
        if METRICS_PATTERN.is_match(&description) {
            has_metrics = true;
        }
        if !exp.start_date.is_empty() && !exp.end_date.is_empty() {
            formatting += 2;
        }
    }
    if has_action_verbs {
        formatting += 5;
    }
    if has_metrics {
        formatting += 5;
    }
    let formatting = formatting.min(CATEGORY_MAX);
    if !has_action_verbs {
        suggestions.push("Use action verbs (led, developed, improved) in experience descriptions");
    }
    if !has_metrics {
        suggestions.push("Add quantifiable achievements (%, $, numbers)");
    }

    let keywords = match job_description.filter(|jd| !jd.is_empty()) {
        Some(jd) => {
            let keywords = keyword_score(profile, jd);
            if keywords < 10 {
                suggestions.push("Add more keywords from the job description to your profile");
            }
            keywords
        }
        None => {
            if profile.skills.len() < 5 {
                suggestions.push("Add more skills (aim for 8-15 relevant skills)");
            }
            (profile.skills.len() as i32 * 2).min(CATEGORY_MAX)
        }
    };

    AtsScore {
        score: contact + sections + length + formatting + keywords,
        breakdown: AtsBreakdown {
            keywords,
            formatting,
            sections,
            length,
            contact,
        },
        suggestions: suggestions
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(str::to_string)
            .collect(),
    }
}

fn keyword_score(profile: &CvProfile, job_description: &str) -> i32 {
    let normalized: String = job_description
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let mut seen = HashSet::new();
    let job_words: Vec<&str> = normalized
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .filter(|w| seen.insert(*w))
        .collect();
    if job_words.is_empty() {
        return 0;
    }

    let mut content = vec![profile.personal.summary.clone()];
    content.extend(profile.skills.iter().cloned());
    content.extend(
        profile
            .experience
            .iter()
            .map(|e| format!("{} {}", e.role, e.description)),
    );
    content.extend(
        profile
            .projects
            .iter()
            .map(|p| format!("{} {}", p.name, p.description)),
    );
    let content = content.join(" ").to_lowercase();

    let matched = job_words.iter().filter(|w| content.contains(**w)).count();
    let ratio = matched as f64 / job_words.len().min(KEYWORD_SAMPLE) as f64;
    ((ratio * CATEGORY_MAX as f64).round() as i32).min(CATEGORY_MAX)
}
