use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalDetails {
    #[serde(deserialize_with = "lenient::string")]
    pub full_name: String,
    /// Target job title
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub linkedin: String,
    #[serde(deserialize_with = "lenient::string")]
    pub website: String,
    #[serde(deserialize_with = "lenient::string")]
    pub github: String,
    #[serde(deserialize_with = "lenient::string")]
    pub medium: String,
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    /// onsite, remote, hybrid or empty
    #[serde(deserialize_with = "lenient::string")]
    pub location_type: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub current: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub current: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub gpa: String,
    #[serde(deserialize_with = "lenient::string")]
    pub coursework: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub link: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub issuer: String,
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Volunteer {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub organization: String,
    #[serde(deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub current: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Award {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub issuer: String,
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub publisher: String,
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub language: String,
    /// Native, Fluent, Proficient, Intermediate or Basic
    #[serde(deserialize_with = "lenient::string")]
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reference {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub relationship: String,
}

/// The canonical career profile. Every field defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CvProfile {
    #[serde(deserialize_with = "lenient::object")]
    pub personal: PersonalDetails,
    #[serde(deserialize_with = "lenient::items")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "lenient::items")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient::items")]
    pub languages: Vec<Language>,
    #[serde(deserialize_with = "lenient::items")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "lenient::items")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "lenient::items")]
    pub volunteer: Vec<Volunteer>,
    #[serde(deserialize_with = "lenient::items")]
    pub awards: Vec<Award>,
    #[serde(deserialize_with = "lenient::items")]
    pub publications: Vec<Publication>,
    #[serde(deserialize_with = "lenient::items")]
    pub references: Vec<Reference>,
}

/// List entries that carry a client-visible identifier
pub trait Identified {
    fn id_mut(&mut self) -> &mut String;
}

macro_rules! identified {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn id_mut(&mut self) -> &mut String {
                &mut self.id
            }
        })*
    };
}

identified!(
    Experience,
    Education,
    Project,
    Certification,
    Volunteer,
    Award,
    Publication,
    Language,
    Reference
);

/// Give every entry without an id a fresh UUID.
pub fn ensure_ids<T: Identified>(items: &mut [T]) {
    for item in items.iter_mut() {
        let id = item.id_mut();
        if id.trim().is_empty() {
            *id = Uuid::new_v4().to_string();
        }
    }
}

impl CvProfile {
    pub fn ensure_ids(&mut self) {
        ensure_ids(&mut self.experience);
        ensure_ids(&mut self.education);
        ensure_ids(&mut self.languages);
        ensure_ids(&mut self.projects);
        ensure_ids(&mut self.certifications);
        ensure_ids(&mut self.volunteer);
        ensure_ids(&mut self.awards);
        ensure_ids(&mut self.publications);
        ensure_ids(&mut self.references);
    }

    /// Normalize an arbitrary JSON document into a profile with ids.
    pub fn from_value_lenient(value: &Value) -> Self {
        let mut profile = if value.is_object() {
            serde_json::from_value(value.clone()).unwrap_or_default()
        } else {
            CvProfile::default()
        };
        profile.ensure_ids();
        profile
    }
}

/// Sections of a stored document whose entries carry an `id`
pub const ITEM_SECTIONS: [&str; 9] = [
    "experience",
    "education",
    "languages",
    "projects",
    "certifications",
    "volunteer",
    "awards",
    "publications",
    "references",
];

/// Fill missing entry ids in a raw profile document. Nothing else is touched,
/// so unknown fields and client formatting survive storage.
pub fn ensure_document_ids(document: &mut Value) {
    let Some(sections) = document.as_object_mut() else {
        return;
    };
    for name in ITEM_SECTIONS {
        let Some(Value::Array(entries)) = sections.get_mut(name) else {
            continue;
        };
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            let missing = match entry.get("id") {
                Some(Value::String(id)) => id.trim().is_empty(),
                Some(Value::Number(_)) => false,
                _ => true,
            };
            if missing {
                entry.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
            }
        }
    }
}

/// Presentation decisions returned by the tailoring model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStrategy {
    pub section_order: Vec<String>,
    pub has_intro: bool,
    pub reasoning: String,
}

pub const DEFAULT_SECTION_ORDER: [&str; 4] = ["experience", "education", "skills", "projects"];

impl Default for LayoutStrategy {
    fn default() -> Self {
        Self {
            section_order: DEFAULT_SECTION_ORDER.iter().map(|s| s.to_string()).collect(),
            has_intro: true,
            reasoning: "Default layout".to_string(),
        }
    }
}
