use std::fmt::Write;

use super::escape_html;
use crate::domain::profile::CvProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Experience,
    Education,
    Skills,
    Projects,
    Languages,
    Certifications,
    Volunteer,
    Awards,
    Publications,
    References,
}

/// Order used for sections the layout does not mention
pub const ALL_SECTIONS: [Section; 10] = [
    Section::Experience,
    Section::Education,
    Section::Skills,
    Section::Projects,
    Section::Languages,
    Section::Certifications,
    Section::Volunteer,
    Section::Awards,
    Section::Publications,
    Section::References,
];

impl Section {
    pub fn key(self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Languages => "languages",
            Section::Certifications => "certifications",
            Section::Volunteer => "volunteer",
            Section::Awards => "awards",
            Section::Publications => "publications",
            Section::References => "references",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        ALL_SECTIONS.into_iter().find(|s| s.key() == key)
    }

    /// Inner HTML for this section, `None` when the profile has nothing for it
    pub fn render_content(self, profile: &CvProfile) -> Option<String> {
        let mut html = String::new();
        match self {
            Section::Experience => {
                for exp in &profile.experience {
                    let end = if !exp.end_date.is_empty() {
                        exp.end_date.as_str()
                    } else if exp.current {
                        "Present"
                    } else {
                        ""
                    };
                    let _ = write!(
                        html,
                        r#"<div class="cv-item"><div class="cv-row"><strong>{}</strong>{}<span class="cv-date">{}</span></div><div class="cv-role">{}</div>{}{}</div>"#,
                        escape_html(&exp.company),
                        suffix(", ", &exp.location),
                        date_range(&exp.start_date, end),
                        escape_html(&exp.role),
                        paragraph(&exp.description),
                        stack(&exp.technologies),
                    );
                }
            }
            Section::Education => {
                for edu in &profile.education {
                    let _ = write!(
                        html,
                        r#"<div class="cv-item"><div class="cv-row"><strong>{}</strong>{}<span class="cv-date">{}</span></div><div class="cv-role">{}</div>{}{}{}</div>"#,
                        escape_html(&edu.institution),
                        suffix(", ", &edu.location),
                        escape_html(&edu.end_date),
                        escape_html(&edu.degree),
                        labelled("GPA", &edu.gpa),
                        labelled("Relevant Coursework", &edu.coursework),
                        paragraph(&edu.description),
                    );
                }
            }
            Section::Skills => {
                if !profile.skills.is_empty() {
                    html.push_str(r#"<ul class="cv-tags">"#);
                    for skill in &profile.skills {
                        let _ = write!(html, "<li>{}</li>", escape_html(skill));
                    }
                    html.push_str("</ul>");
                }
            }
            Section::Projects => {
                for project in &profile.projects {
                    let link = if project.link.is_empty() {
                        String::new()
                    } else {
                        format!(
                            r#" <a href="{}" rel="noreferrer">Link</a>"#,
                            escape_html(&project.link)
                        )
                    };
                    let _ = write!(
                        html,
                        r#"<div class="cv-item"><div class="cv-row"><strong>{}</strong>{}</div><div class="cv-role">{}</div>{}{}</div>"#,
                        escape_html(&project.name),
                        link,
                        escape_html(&project.role),
                        paragraph(&project.description),
                        stack(&project.technologies),
                    );
                }
            }
            Section::Languages => {
                let entries: Vec<String> = profile
                    .languages
                    .iter()
                    .map(|l| {
                        if l.proficiency.is_empty() {
                            escape_html(&l.language)
                        } else {
                            format!(
                                "{} ({})",
                                escape_html(&l.language),
                                escape_html(&l.proficiency)
                            )
                        }
                    })
                    .collect();
                if !entries.is_empty() {
                    let _ = write!(html, r#"<p class="cv-description">{}</p>"#, entries.join(", "));
                }
            }
            Section::Certifications => {
                for cert in &profile.certifications {
                    let _ = write!(
                        html,
                        r#"<div class="cv-item"><div class="cv-row"><span><strong>{}</strong>{}</span><span class="cv-date">{}</span></div></div>"#,
                        escape_html(&cert.name),
                        suffix(", ", &cert.issuer),
                        escape_html(&cert.date),
                    );
                }
            }
            Section::Volunteer => {
                for vol in &profile.volunteer {
                    let end = if vol.end_date.is_empty() {
                        "Present"
                    } else {
                        vol.end_date.as_str()
                    };
                    let _ = write!(
                        html,
                        r#"<div class="cv-item"><div class="cv-row"><strong>{}</strong><span class="cv-date">{}</span></div><div class="cv-role">{}</div>{}</div>"#,
                        escape_html(&vol.organization),
                        date_range(&vol.start_date, end),
                        escape_html(&vol.role),
                        paragraph(&vol.description),
                    );
                }
            }
            Section::Awards => {
                for award in &profile.awards {
                    let _ = write!(
                        html,
                        r#"<div class="cv-item"><div class="cv-row"><span><strong>{}</strong>{}</span><span class="cv-date">{}</span></div>{}</div>"#,
                        escape_html(&award.title),
                        suffix(", ", &award.issuer),
                        escape_html(&award.date),
                        paragraph(&award.description),
                    );
                }
            }
            Section::Publications => {
                for publication in &profile.publications {
                    let date = if publication.date.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", escape_html(&publication.date))
                    };
                    let _ = write!(
                        html,
                        r#"<div class="cv-item"><p class="cv-description"><strong>{}</strong>{}{}</p></div>"#,
                        escape_html(&publication.title),
                        suffix(", ", &publication.publisher),
                        date,
                    );
                }
            }
            Section::References => {
                for reference in &profile.references {
                    let _ = write!(
                        html,
                        r#"<div class="cv-item"><strong>{}</strong>{}{}<div class="cv-contact">{}{}</div></div>"#,
                        escape_html(&reference.name),
                        suffix(", ", &reference.title),
                        suffix(", ", &reference.company),
                        escape_html(&reference.email),
                        suffix(" • ", &reference.phone),
                    );
                }
            }
        }

        (!html.is_empty()).then_some(html)
    }
}

/// Resolve the body order: listed known sections first (case-insensitive,
/// duplicates dropped), then every remaining section in default order.
pub fn resolve_section_order(requested: &[String]) -> Vec<Section> {
    let mut order: Vec<Section> = Vec::with_capacity(ALL_SECTIONS.len());
    for key in requested {
        if let Some(section) = Section::from_key(key) {
            if !order.contains(&section) {
                order.push(section);
            }
        }
    }
    for section in ALL_SECTIONS {
        if !order.contains(&section) {
            order.push(section);
        }
    }
    order
}

fn suffix(separator: &str, value: &str) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        format!("{}{}", separator, escape_html(value))
    }
}

fn date_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => escape_html(start),
        (true, false) => escape_html(end),
        (false, false) => format!("{} – {}", escape_html(start), escape_html(end)),
    }
}

fn paragraph(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    format!(r#"<p class="cv-description">{}</p>"#, escape_html(text))
}

fn labelled(label: &str, value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    format!(
        r#"<p class="cv-description">{}: {}</p>"#,
        label,
        escape_html(value)
    )
}

fn stack(technologies: &[String]) -> String {
    if technologies.is_empty() {
        return String::new();
    }
    let joined: Vec<String> = technologies.iter().map(|t| escape_html(t)).collect();
    format!(r#"<p class="cv-stack">Stack: {}</p>"#, joined.join(", "))
}
