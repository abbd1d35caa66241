//! Request bodies and scripted model answers shared across tests

use serde_json::{json, Value};

pub const JOB_DESCRIPTION: &str = "Senior Rust engineer at Ferrous Systems. \
    Build async network services with tokio and PostgreSQL.";

pub const ORIGINAL_SUMMARY: &str = "Backend developer with eight years of experience building APIs.";

pub fn sample_profile() -> Value {
    json!({
        "personal": {
            "fullName": "Ada Lovelace",
            "title": "Backend Developer",
            "email": "ada@example.com",
            "phone": "+44 20 7946 0000",
            "location": "London",
            "summary": ORIGINAL_SUMMARY
        },
        "experience": [{
            "id": "exp-1",
            "company": "Analytical Engines Ltd",
            "role": "Software Engineer",
            "startDate": "2019-01",
            "current": true,
            "description": "Maintained REST services in Go and Python."
        }],
        "education": [{
            "id": "edu-1",
            "institution": "University of London",
            "degree": "BSc Mathematics"
        }],
        "skills": ["Go", "Python", "PostgreSQL"]
    })
}

/// A properly rewritten answer; its contact details try to change the email
pub fn tailored_answer() -> Value {
    json!({
        "tailoredProfile": {
            "personal": {
                "fullName": "Ada Lovelace",
                "title": "Senior Rust Engineer",
                "email": "attacker@example.com",
                "summary": "Systems engineer focused on async Rust services and PostgreSQL performance."
            },
            "experience": [{
                "id": "exp-1",
                "company": "Analytical Engines Ltd",
                "role": "Software Engineer",
                "description": "Designed high-throughput network services backed by PostgreSQL."
            }],
            "skills": ["Rust", "tokio", "PostgreSQL"]
        },
        "layoutStrategy": {
            "sectionOrder": ["skills", "experience", "education"],
            "hasIntro": true,
            "reasoning": "Lead with the matching stack"
        },
        "matchScore": 87,
        "suggestions": ["Mention tokio in a project"],
        "jobTitle": "Senior Rust Engineer",
        "companyName": "Ferrous Systems"
    })
}

/// An answer that hands the source profile back unchanged
pub fn copied_answer() -> Value {
    let profile = sample_profile();
    json!({
        "tailoredProfile": profile,
        "layoutStrategy": { "sectionOrder": ["experience"], "hasIntro": true },
        "matchScore": 40,
        "suggestions": []
    })
}

pub fn generate_request() -> Value {
    json!({
        "profile": sample_profile(),
        "jobDescription": JOB_DESCRIPTION,
        "options": { "mode": "strict" }
    })
}
