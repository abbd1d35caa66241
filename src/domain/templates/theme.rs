use super::{escape_html, Section, TemplateStyle};
use crate::domain::profile::PersonalDetails;

const HARVARD_CSS: &str = "body{margin:0;background:#fff}\
.harvard-cv{font-family:'Times New Roman',Georgia,serif;font-size:11pt;line-height:1.35;color:#000;max-width:8.5in;margin:0 auto;padding:0.6in}\
.harvard-cv header{border-bottom:1px solid #000;padding-bottom:4px;margin-bottom:16px;text-align:center}\
.harvard-cv h1{font-size:1.5rem;text-transform:uppercase;margin:0 0 4px}\
.harvard-cv h2{font-size:1rem;text-transform:uppercase;border-bottom:1px solid #000;margin:14px 0 6px}\
.cv-row{display:flex;justify-content:space-between;gap:8px}.cv-role{font-style:italic}\
.cv-item{margin-bottom:8px}.cv-description{margin:2px 0;white-space:pre-line}\
.cv-stack{margin:2px 0;font-style:italic;font-size:0.85em}\
.cv-tags{list-style:none;padding:0;margin:0}.cv-tags li{display:inline}.cv-tags li+li:before{content:', '}\
@page{size:letter;margin:0}";

const MODERN_CSS: &str = "body{margin:0;background:#fff}\
.modern-cv{font-family:'Inter',-apple-system,sans-serif;font-size:10pt;line-height:1.5;color:#1F2937;max-width:8.5in;margin:0 auto}\
.modern-grid{display:grid;grid-template-columns:240px 1fr;min-height:11in}\
.modern-cv aside{background:#F3F4F6;padding:24px;border-right:3px solid #2563EB}\
.modern-cv main{padding:24px 32px}\
.modern-cv h1{font-size:20pt;margin:0;color:#111827}.modern-cv .cv-title{color:#2563EB;font-weight:600}\
.modern-cv h2{font-size:11pt;text-transform:uppercase;letter-spacing:1px;color:#2563EB;margin:18px 0 8px}\
.cv-row{display:flex;justify-content:space-between;gap:8px}.cv-role{color:#4B5563}\
.cv-item{margin-bottom:10px;break-inside:avoid}.cv-description{margin:2px 0;white-space:pre-line}\
.cv-stack{margin:2px 0;font-size:0.85em;color:#6B7280}\
.cv-tags{list-style:none;padding:0;margin:0;display:flex;flex-wrap:wrap;gap:4px}\
.cv-tags li{background:#DBEAFE;color:#1E40AF;border-radius:4px;padding:1px 6px}\
.cv-contact div{margin-bottom:4px;word-break:break-all}\
@page{size:letter;margin:0}";

const CREATIVE_CSS: &str = "body{margin:0;background:#fff}\
.creative-cv{font-family:'Poppins',-apple-system,sans-serif;font-size:10pt;line-height:1.5;color:#1a1a2e;max-width:8.5in;margin:0 auto}\
.creative-cv header{background:linear-gradient(135deg,#6366F1,#8B5CF6);color:#fff;padding:32px 40px}\
.creative-cv h1{font-size:24pt;margin:0}.creative-cv .cv-title{opacity:0.9}\
.creative-cv .cv-contact{margin-top:8px;font-size:9pt}\
.creative-cv main{padding:24px 40px}\
.creative-cv h2{font-size:12pt;color:#6366F1;border-left:4px solid #6366F1;padding-left:8px;margin:20px 0 8px}\
.cv-row{display:flex;justify-content:space-between;gap:8px}.cv-role{color:#6B7280}\
.cv-item{margin-bottom:12px;break-inside:avoid}.cv-description{margin:2px 0;color:#4B5563;white-space:pre-line}\
.cv-stack{margin:2px 0;font-size:0.85em;color:#6B7280}\
.cv-tags{list-style:none;padding:0;margin:0;display:flex;flex-wrap:wrap;gap:6px}\
.cv-tags li{background:#6366F1;color:#fff;border-radius:12px;padding:2px 10px}\
@page{size:letter;margin:0}";

const MINIMAL_CSS: &str = "body{margin:0;background:#fff}\
.minimal-cv{font-family:'Helvetica Neue',Arial,sans-serif;font-size:10pt;line-height:1.6;color:#2D2D2D;max-width:8.5in;margin:0 auto;padding:0.75in}\
.minimal-cv h1{font-size:22pt;font-weight:300;margin:0;color:#1A1A1A}.minimal-cv .cv-title{color:#666}\
.minimal-cv .cv-contact{color:#888;font-size:9pt;margin-top:6px}\
.minimal-cv h2{font-size:9pt;font-weight:500;text-transform:uppercase;letter-spacing:2px;color:#888;margin:24px 0 8px}\
.cv-row{display:flex;justify-content:space-between;gap:8px}.cv-role{color:#666}\
.cv-item{margin-bottom:12px}.cv-description{margin:2px 0;color:#444;white-space:pre-line}\
.cv-stack{margin:2px 0;font-size:0.85em;color:#888}\
.cv-tags{list-style:none;padding:0;margin:0}.cv-tags li{display:inline}.cv-tags li+li:before{content:' · '}\
@page{size:letter;margin:0}";

/// Per-style markup and styling
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub style: TemplateStyle,
    pub class: &'static str,
    pub stylesheet: &'static str,
    pub summary_title: &'static str,
}

impl Theme {
    pub fn for_style(style: TemplateStyle) -> Self {
        match style {
            TemplateStyle::Harvard => Theme {
                style,
                class: "harvard-cv",
                stylesheet: HARVARD_CSS,
                summary_title: "Professional Summary",
            },
            TemplateStyle::Modern => Theme {
                style,
                class: "modern-cv",
                stylesheet: MODERN_CSS,
                summary_title: "Profile",
            },
            TemplateStyle::Creative => Theme {
                style,
                class: "creative-cv",
                stylesheet: CREATIVE_CSS,
                summary_title: "About Me",
            },
            TemplateStyle::Minimal => Theme {
                style,
                class: "minimal-cv",
                stylesheet: MINIMAL_CSS,
                summary_title: "Summary",
            },
        }
    }

    pub fn title(&self, section: Section) -> &'static str {
        match (self.style, section) {
            (TemplateStyle::Harvard, Section::Skills) => "Skills &amp; Interests",
            (TemplateStyle::Harvard, Section::Awards) => "Honors &amp; Awards",
            (TemplateStyle::Creative, Section::Experience) => "Work Experience",
            (TemplateStyle::Creative, Section::Skills) => "Expertise",
            (_, Section::Experience) => "Experience",
            (_, Section::Education) => "Education",
            (_, Section::Skills) => "Skills",
            (_, Section::Projects) => "Projects",
            (_, Section::Languages) => "Languages",
            (_, Section::Certifications) => "Certifications",
            (_, Section::Volunteer) => "Volunteering",
            (_, Section::Awards) => "Awards",
            (_, Section::Publications) => "Publications",
            (_, Section::References) => "References",
        }
    }

    pub fn section(&self, key: &str, title: &str, content: &str) -> String {
        format!(
            r#"<section class="cv-section" data-section="{}"><h2>{}</h2>{}</section>"#,
            key, title, content
        )
    }

    /// Wrap the rendered body sections with the style's header or sidebar
    pub fn frame(&self, personal: &PersonalDetails, body: &str) -> String {
        let name = escape_html(&personal.full_name);
        let title = if personal.title.is_empty() {
            String::new()
        } else {
            format!(r#"<div class="cv-title">{}</div>"#, escape_html(&personal.title))
        };

        match self.style {
            TemplateStyle::Modern => {
                let contact: String = contact_items(personal)
                    .into_iter()
                    .map(|item| format!("<div>{}</div>", item))
                    .collect();
                format!(
                    r#"<div class="modern-grid"><aside><h1>{}</h1>{}<div class="cv-contact">{}</div></aside><main>{}</main></div>"#,
                    name, title, contact, body
                )
            }
            TemplateStyle::Creative => format!(
                r#"<header><h1>{}</h1>{}<div class="cv-contact">{}</div></header><main>{}</main>"#,
                name,
                title,
                contact_items(personal).join(" | "),
                body
            ),
            TemplateStyle::Harvard | TemplateStyle::Minimal => format!(
                r#"<header><h1>{}</h1>{}<div class="cv-contact">{}</div></header>{}"#,
                name,
                title,
                contact_items(personal).join(" • "),
                body
            ),
        }
    }
}

fn contact_items(personal: &PersonalDetails) -> Vec<String> {
    let mut items = Vec::new();
    for value in [&personal.location, &personal.phone, &personal.email] {
        if !value.is_empty() {
            items.push(escape_html(value));
        }
    }
    for (label, url) in [
        ("LinkedIn", &personal.linkedin),
        ("Portfolio", &personal.website),
        ("GitHub", &personal.github),
        ("Medium", &personal.medium),
    ] {
        if !url.is_empty() {
            items.push(format!(
                r#"<a href="{}" rel="noreferrer">{}</a>"#,
                escape_html(url),
                label
            ));
        }
    }
    items
}
