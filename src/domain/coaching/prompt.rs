use serde_json::Value;

use super::{CoverLetterOptions, InterviewQuestion};
use crate::domain::profile::lenient::items_from_value;
use crate::domain::profile::CvProfile;

/// Job description budget for coaching prompts, in characters
pub const COACHING_JOB_DESCRIPTION_CHARS: usize = 2000;
pub const TOP_SKILLS: usize = 10;

pub const COACHING_TEMPERATURE: f32 = 0.7;
pub const COVER_LETTER_MAX_TOKENS: u32 = 1000;
pub const INTERVIEW_MAX_TOKENS: u32 = 2000;

pub const COVER_LETTER_SYSTEM_PROMPT: &str =
    "You are an expert cover letter writer with years of HR experience.";
pub const INTERVIEW_SYSTEM_PROMPT: &str = "You are an expert career coach and interview preparation specialist. You MUST return valid JSON.";

fn head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn top_skills(profile: &CvProfile) -> String {
    if profile.skills.is_empty() {
        return "Not specified".to_string();
    }
    profile
        .skills
        .iter()
        .take(TOP_SKILLS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_cover_letter_prompt(
    profile: &CvProfile,
    job_description: &str,
    options: &CoverLetterOptions,
) -> String {
    let company = options
        .company_name
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("[Company]");
    let job_title = options
        .job_title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("the position");
    let (recent_role, recent_company) = profile
        .experience
        .first()
        .map(|e| (e.role.as_str(), e.company.as_str()))
        .unwrap_or(("", ""));

    format!(
        r#"Generate a professional cover letter for the following candidate applying to {company} for {job_title}.

CANDIDATE PROFILE:
Name: {name}
Current Title: {title}
Summary: {summary}
Key Skills: {skills}
Recent Experience: {recent_role} at {recent_company}

JOB DESCRIPTION:
{job}

TONE: {tone}

Write a compelling cover letter that:
1. Opens with a strong hook that shows genuine interest
2. Highlights 2-3 relevant achievements that match the job requirements
3. Shows knowledge of the company and role
4. Closes with a clear call to action
5. Is approximately 300-400 words
6. Does NOT include any salutation or signature placeholders like [Your Name]

Return ONLY the cover letter text, no additional formatting or labels."#,
        company = company,
        job_title = job_title,
        name = or(&profile.personal.full_name, "Candidate"),
        title = profile.personal.title,
        summary = profile.personal.summary,
        skills = top_skills(profile),
        recent_role = recent_role,
        recent_company = recent_company,
        job = head(job_description, COACHING_JOB_DESCRIPTION_CHARS),
        tone = options.tone.instruction(),
    )
}

/// `all` (or nothing) asks for every question category
pub fn question_focus(question_type: Option<&str>) -> &str {
    match question_type.map(str::trim) {
        None | Some("") | Some("all") => "behavioral, technical, and situational",
        Some(other) => other,
    }
}

pub fn build_interview_prompt(
    profile: Option<&CvProfile>,
    job_description: &str,
    question_type: Option<&str>,
) -> String {
    let (name, skills, recent_role) = match profile {
        Some(p) => (
            or(&p.personal.full_name, "Candidate").to_string(),
            top_skills(p),
            p.experience
                .first()
                .map(|e| or(&e.role, "Not specified").to_string())
                .unwrap_or_else(|| "Not specified".to_string()),
        ),
        None => (
            "Candidate".to_string(),
            "Not specified".to_string(),
            "Not specified".to_string(),
        ),
    };

    format!(
        r#"Based on the job description and candidate profile below, generate 8-10 likely interview questions.

JOB DESCRIPTION:
{job}

CANDIDATE PROFILE:
Name: {name}
Skills: {skills}
Recent Role: {recent_role}

Generate {focus} questions that interviewers would likely ask.

Return a JSON object with a "questions" key containing an array of objects.
Example Format:
{{
  "questions": [
    {{
      "question": "The interview question",
      "type": "behavioral",
      "tip": "A brief tip on how to answer this question well"
    }}
  ]
}}

Focus on questions relevant to the specific job requirements."#,
        job = head(job_description, COACHING_JOB_DESCRIPTION_CHARS),
        name = name,
        skills = skills,
        recent_role = recent_role,
        focus = question_focus(question_type),
    )
}

/// Pull the question list out of whatever shape the model chose: a bare
/// array, `questions`, `data`, or the first array-valued field.
pub fn extract_questions(response: &Value) -> Vec<InterviewQuestion> {
    let list = match response {
        Value::Array(_) => Some(response),
        Value::Object(fields) => ["questions", "data"]
            .iter()
            .filter_map(|key| fields.get(*key))
            .find(|v| v.is_array())
            .or_else(|| fields.values().find(|v| v.is_array())),
        _ => None,
    };

    list.map(|l| items_from_value::<InterviewQuestion>(l))
        .unwrap_or_default()
        .into_iter()
        .filter(|q| !q.question.trim().is_empty())
        .collect()
}
