//! Project Extractor / Mapper: line heuristic over resume text, not a parser.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"projects|experience").expect("header regex is valid"));

static ALL_CAPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-Z ]{3,}$").expect("all-caps regex is valid"));

/// How header lines after the first closed section are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectCaptureMode {
    /// Every header line arms capture again.
    #[default]
    Rearm,
    /// Only the first header arms capture; later sections are ignored.
    FirstSectionOnly,
}

/// One project line and the job keywords it mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMatch {
    pub project: String,
    pub keywords: Vec<String>,
}

/// Collects the lines that follow a "projects"/"experience" header.
///
/// The header line itself is dropped. A blank or all-caps line closes the
/// section. A header seen while capturing keeps capture on.
pub fn extract_projects(resume_text: &str, mode: ProjectCaptureMode) -> Vec<String> {
    let mut projects = Vec::new();
    let mut capture = false;
    let mut armed_once = false;

    for line in resume_text.split('\n') {
        if HEADER_RE.is_match(&line.to_lowercase()) {
            if mode == ProjectCaptureMode::FirstSectionOnly && armed_once && !capture {
                continue;
            }
            capture = true;
            armed_once = true;
            continue;
        }
        if capture {
            if line.trim().is_empty() || ALL_CAPS_RE.is_match(line) {
                capture = false;
            } else {
                projects.push(line.trim().to_string());
            }
        }
    }

    projects
}

/// Tags each project with the keywords it contains (case-insensitive).
/// Projects with no match are left out; a repeated project line appears once.
pub fn map_projects_to_keywords(projects: &[String], keywords: &[String]) -> Vec<ProjectMatch> {
    let mut seen = HashSet::new();
    let mut mappings = Vec::new();

    for project in projects {
        if !seen.insert(project.as_str()) {
            continue;
        }
        let project_lower = project.to_lowercase();
        let matched: Vec<String> = keywords
            .iter()
            .filter(|kw| project_lower.contains(&kw.to_lowercase()))
            .cloned()
            .collect();
        if !matched.is_empty() {
            mappings.push(ProjectMatch {
                project: project.clone(),
                keywords: matched,
            });
        }
    }

    mappings
}
