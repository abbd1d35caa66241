use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::profile::lenient::{items_from_value, strings_from_value, value_to_string};
use crate::domain::profile::model::{ensure_ids, Identified};
use crate::domain::profile::{CvProfile, LayoutStrategy, PersonalDetails, DEFAULT_SECTION_ORDER};

fn non_empty(value: &Value) -> Option<String> {
    let text = value_to_string(value);
    (!text.is_empty()).then_some(text)
}

/// Model's list when it sent an array, else the source list; ids ensured
fn section<T>(ai_value: &Value, original: &[T]) -> Vec<T>
where
    T: DeserializeOwned + Clone + Identified,
{
    let mut items = match ai_value {
        Value::Array(_) => items_from_value(ai_value),
        _ => original.to_vec(),
    };
    ensure_ids(&mut items);
    items
}

/// Coerce the model's tailored profile into a complete [`CvProfile`].
///
/// Contact details always come from `original`. Location keeps the
/// original unless it is empty. Title and summary take the model's value
/// when non-empty. Sections the model left out fall back to the original.
pub fn sanitize_tailored_profile(ai_profile: &Value, original: &CvProfile) -> CvProfile {
    let ai_personal = &ai_profile["personal"];
    let source = &original.personal;

    let personal = PersonalDetails {
        full_name: source.full_name.clone(),
        email: source.email.clone(),
        phone: source.phone.clone(),
        linkedin: source.linkedin.clone(),
        website: source.website.clone(),
        github: source.github.clone(),
        medium: source.medium.clone(),
        location: if source.location.is_empty() {
            value_to_string(&ai_personal["location"])
        } else {
            source.location.clone()
        },
        title: non_empty(&ai_personal["title"]).unwrap_or_else(|| source.title.clone()),
        summary: non_empty(&ai_personal["summary"]).unwrap_or_else(|| source.summary.clone()),
    };

    let skills = match &ai_profile["skills"] {
        value @ Value::Array(_) => strings_from_value(value),
        _ => original.skills.clone(),
    };

    CvProfile {
        personal,
        experience: section(&ai_profile["experience"], &original.experience),
        education: section(&ai_profile["education"], &original.education),
        skills,
        languages: section(&ai_profile["languages"], &original.languages),
        projects: section(&ai_profile["projects"], &original.projects),
        certifications: section(&ai_profile["certifications"], &original.certifications),
        volunteer: section(&ai_profile["volunteer"], &original.volunteer),
        awards: section(&ai_profile["awards"], &original.awards),
        publications: section(&ai_profile["publications"], &original.publications),
        references: section(&ai_profile["references"], &original.references),
    }
}

/// Default the layout when absent, repairing each malformed field on its own
pub fn sanitize_layout(value: &Value) -> LayoutStrategy {
    if !value.is_object() {
        return LayoutStrategy::default();
    }

    let section_order = match &value["sectionOrder"] {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|e| e.as_str().map(str::to_string))
            .collect(),
        _ => DEFAULT_SECTION_ORDER.iter().map(|s| s.to_string()).collect(),
    };

    LayoutStrategy {
        section_order,
        has_intro: value["hasIntro"].as_bool().unwrap_or(true),
        reasoning: value_to_string(&value["reasoning"]),
    }
}

/// Clamp to 0..=100; anything non-numeric scores 0
pub fn sanitize_match_score(value: &Value) -> i32 {
    let score = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as i32
}

pub fn sanitize_suggestions(value: &Value) -> Vec<String> {
    match value {
        Value::Array(_) => strings_from_value(value),
        _ => Vec::new(),
    }
}
