use std::borrow::Cow;

use super::{TailorMode, TailorOptions};
use crate::domain::profile::CvProfile;

/// Longest job description sent to the model, in characters
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 8000;
pub const TRUNCATION_MARKER: &str = "\n\n[Job description truncated for processing]";

pub const TAILOR_MAX_TOKENS: u32 = 8000;
pub const RETRY_TEMPERATURE: f32 = 0.9;

pub const PARSE_TEMPERATURE: f32 = 0.2;
pub const PARSE_MAX_TOKENS: u32 = 4000;

pub const TAILOR_SYSTEM_PROMPT: &str = r#"You are an expert CV consultant and applicant-tracking-system (ATS) optimization specialist. You rewrite a candidate's master profile into a resume targeted at one specific job.

Respond with a single JSON object shaped exactly like this:
{
  "tailoredProfile": {
    "personal": {
      "fullName": "unchanged",
      "email": "unchanged",
      "phone": "unchanged",
      "linkedin": "unchanged",
      "website": "unchanged",
      "github": "unchanged",
      "location": "unchanged",
      "title": "tailored to the target job title",
      "summary": "a new 3-5 sentence summary written for this job"
    },
    "experience": [ experience entries with rewritten descriptions ],
    "education": [ education entries ],
    "skills": [ skills, most relevant first ],
    "projects": [ projects with descriptions emphasising relevant work ],
    "languages": [ languages ],
    "certifications": [ certifications ]
  },
  "layoutStrategy": {
    "sectionOrder": ["experience", "education", "skills", "projects"],
    "hasIntro": true,
    "reasoning": "why this order suits the job"
  },
  "matchScore": 0-100,
  "suggestions": ["concrete improvement", "..."],
  "jobTitle": "job title as written in the job description",
  "companyName": "company name from the job description"
}

Rules:
- Detect the language of the job description and write the whole tailored profile in that language. Contact details stay as they are.
- Write a new summary: open with experience and core expertise aligned to the role, name two or three relevant achievements, use the job's keywords naturally.
- Rewrite every experience description with action verbs, metrics where the source supports them and the job's keywords. Keep each entry substantial.
- Put job-relevant skills first. Related skills the experience clearly implies may be added.
- Keep every experience from the source unless it is truly irrelevant. The result must read as a full one-to-two page resume, never a skeleton.
- Never invent employers, roles, degrees or dates.
- Never return the profile unchanged. The output must be noticeably more targeted than the input."#;

const STRICT_INSTRUCTION: &str =
    "STRICT MODE: Only use facts directly stated in the profile. No inference or embellishment.";
const CREATIVE_INSTRUCTION: &str = "CREATIVE MODE: You may infer transferable skills and adapt tone, but never fabricate experience.";
const RETRY_INSTRUCTION: &str = "IMPORTANT: Your previous answer copied the original text instead of rewriting it. Rewrite every section in your own words for this job. Do not copy any sentence verbatim from the input profile.";

pub const PARSE_SYSTEM_PROMPT: &str =
    "You are a CV/Resume parser. Extract structured data from text. Return ONLY valid JSON.";

const PARSE_SHAPE: &str = r#"{
  "personal": { "fullName": "", "title": "", "email": "", "phone": "", "location": "", "linkedin": "", "website": "", "github": "", "summary": "" },
  "experience": [{ "id": "", "company": "", "role": "", "location": "", "locationType": "", "startDate": "", "endDate": "", "current": false, "description": "", "technologies": [] }],
  "education": [{ "id": "", "institution": "", "degree": "", "location": "", "startDate": "", "endDate": "", "current": false, "gpa": "", "description": "" }],
  "skills": ["skill"],
  "projects": [],
  "certifications": [],
  "languages": [],
  "volunteer": [],
  "awards": [],
  "publications": []
}"#;

/// Hard cut at [`MAX_JOB_DESCRIPTION_CHARS`] characters, marking the cut
pub fn truncate_job_description(job_description: &str) -> Cow<'_, str> {
    match job_description.char_indices().nth(MAX_JOB_DESCRIPTION_CHARS) {
        Some((byte_index, _)) => Cow::Owned(format!(
            "{}{}",
            &job_description[..byte_index],
            TRUNCATION_MARKER
        )),
        None => Cow::Borrowed(job_description),
    }
}

pub fn temperature(mode: TailorMode, retry: bool) -> f32 {
    if retry {
        return RETRY_TEMPERATURE;
    }
    match mode {
        TailorMode::Strict => 0.3,
        TailorMode::Creative => 0.7,
    }
}

pub fn build_tailor_prompt(
    profile: &CvProfile,
    job_description: &str,
    options: &TailorOptions,
    retry: bool,
) -> String {
    let mut preamble = String::from(match options.mode {
        TailorMode::Strict => STRICT_INSTRUCTION,
        TailorMode::Creative => CREATIVE_INSTRUCTION,
    });

    if let Some(custom) = options
        .custom_instructions
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    {
        preamble.push_str(&format!("\n\nADDITIONAL USER INSTRUCTIONS: {}", custom));
    }

    if let Some(style) = options.template_style {
        preamble.push_str(&format!(
            "\n\nTEMPLATE STYLE: The user prefers the \"{}\" style. Adjust section order and content density accordingly.",
            style
        ));
    }

    if retry {
        preamble.push_str("\n\n");
        preamble.push_str(RETRY_INSTRUCTION);
    }

    let profile_json =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"{preamble}

=== CANDIDATE MASTER PROFILE (SOURCE DATA) ===
{profile_json}

=== TARGET JOB DESCRIPTION ===
{job}

=== TASK ===
1. Detect the language of the job description.
2. Identify its key requirements, skills and keywords.
3. Turn the candidate profile into a tailored, compelling resume for this job.

The summary must be written from scratch for this job and must not reuse the source summary's wording or opening.
Keep unchanged: fullName, email, phone, linkedin, website, github.
Rewrite: summary, title, experience descriptions, skill order.

Return ONLY valid JSON."#,
        preamble = preamble,
        profile_json = profile_json,
        job = truncate_job_description(job_description),
    )
}

pub fn build_parse_prompt(raw_text: &str) -> String {
    format!(
        "Extract structured CV/Resume data from the following text. Return a JSON object matching this structure:\n{}\n\nLeave ids empty. Extract as much information as possible.\n\nTEXT TO PARSE:\n{}",
        PARSE_SHAPE, raw_text
    )
}
