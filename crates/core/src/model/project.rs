use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const REQUIRED_HTML: [&str; 5] = ["<header>", "<section>", "<button>", "<nav>", "<main>"];
const REQUIRED_CSS: [&str; 4] = ["display: flex", "display: grid", "transition:", "@media"];
const REQUIRED_JS: [&str; 3] = ["addEventListener", "querySelector", "function"];

/// The three sources of a portfolio project, as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSubmission {
    pub html: String,
    pub css: String,
    pub javascript: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Html,
    Css,
    JavaScript,
}

impl SourceKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::JavaScript => "JavaScript",
        }
    }
}

/// Presence of one required snippet in one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectCheck {
    pub source: SourceKind,
    pub requirement: &'static str,
    pub present: bool,
}

impl ProjectCheck {
    /// Human readable line, e.g. `✅ HTML contains <nav> element`.
    #[must_use]
    pub fn message(&self) -> String {
        match (self.source, self.present) {
            (SourceKind::Html, true) => format!("✅ HTML contains {} element", self.requirement),
            (SourceKind::Html, false) => format!("❌ HTML missing {} element", self.requirement),
            (kind, true) => format!("✅ {} uses {}", kind.label(), self.requirement),
            (kind, false) => format!("❌ {} missing {}", kind.label(), self.requirement),
        }
    }
}

/// Outcome of the substring checks over a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    checks: Vec<ProjectCheck>,
}

impl ProjectReport {
    #[must_use]
    pub fn checks(&self) -> &[ProjectCheck] {
        &self.checks
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.present).count()
    }

    #[must_use]
    pub fn all_present(&self) -> bool {
        self.checks.iter().all(|c| c.present)
    }

    pub fn missing(&self) -> impl Iterator<Item = &ProjectCheck> {
        self.checks.iter().filter(|c| !c.present)
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.checks.iter().map(ProjectCheck::message).collect()
    }
}

impl ProjectSubmission {
    #[must_use]
    pub fn new(
        html: impl Into<String>,
        css: impl Into<String>,
        javascript: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            javascript: javascript.into(),
            submitted_at,
        }
    }

    /// Run the required-snippet checks. Matching is a plain, case-sensitive
    /// substring search.
    #[must_use]
    pub fn check(&self) -> ProjectReport {
        let groups: [(SourceKind, &str, &[&'static str]); 3] = [
            (SourceKind::Html, &self.html, &REQUIRED_HTML),
            (SourceKind::Css, &self.css, &REQUIRED_CSS),
            (SourceKind::JavaScript, &self.javascript, &REQUIRED_JS),
        ];

        let checks = groups
            .iter()
            .flat_map(|(source, code, required)| {
                required.iter().map(move |req| ProjectCheck {
                    source: *source,
                    requirement: *req,
                    present: code.contains(*req),
                })
            })
            .collect();

        ProjectReport { checks }
    }
}
