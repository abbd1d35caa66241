//! Server-side HTML renditions of the four resume styles.
//!
//! Rendering is pure: the same profile, layout and style always produce the
//! same document. Every user-supplied string is escaped.

pub mod sections;
pub mod theme;

pub use sections::{resolve_section_order, Section};
pub use theme::Theme;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::profile::{CvProfile, LayoutStrategy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    #[default]
    Harvard,
    Modern,
    Creative,
    Minimal,
}

impl fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateStyle::Harvard => "harvard",
            TemplateStyle::Modern => "modern",
            TemplateStyle::Creative => "creative",
            TemplateStyle::Minimal => "minimal",
        };
        f.write_str(name)
    }
}

impl FromStr for TemplateStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "harvard" => Ok(TemplateStyle::Harvard),
            "modern" => Ok(TemplateStyle::Modern),
            "creative" => Ok(TemplateStyle::Creative),
            "minimal" => Ok(TemplateStyle::Minimal),
            other => Err(format!("Unknown template: {}", other)),
        }
    }
}

/// Request for POST /api/cv/render
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub profile: Option<Value>,
    pub layout_strategy: Option<Value>,
    pub template: Option<String>,
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render a complete HTML document for `profile`.
pub fn render(profile: &CvProfile, layout: &LayoutStrategy, style: TemplateStyle) -> String {
    let theme = Theme::for_style(style);

    let mut body = String::new();
    if layout.has_intro && !profile.personal.summary.trim().is_empty() {
        body.push_str(&theme.section(
            "summary",
            theme.summary_title,
            &format!(
                r#"<p class="cv-description">{}</p>"#,
                escape_html(&profile.personal.summary)
            ),
        ));
    }
    for section in resolve_section_order(&layout.section_order) {
        if let Some(content) = section.render_content(profile) {
            body.push_str(&theme.section(section.key(), theme.title(section), &content));
        }
    }

    let title = if profile.personal.full_name.is_empty() {
        "Resume".to_string()
    } else {
        escape_html(&profile.personal.full_name)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<div class="{class}">
{layout}
</div>
</body>
</html>
"#,
        title = title,
        css = theme.stylesheet,
        class = theme.class,
        layout = theme.frame(&profile.personal, &body),
    )
}
