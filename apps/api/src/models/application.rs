use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::screening::projects::ProjectMatch;

/// Review state of an application. Serialized with the labels the placement team sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    #[serde(rename = "Not Shortlisted")]
    NotShortlisted,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::NotShortlisted => "Not Shortlisted",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Applied" => Ok(ApplicationStatus::Applied),
            "Shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "Not Shortlisted" => Ok(ApplicationStatus::NotShortlisted),
            other => Err(format!(
                "Unknown status '{other}'. Expected one of: Applied, Shortlisted, Not Shortlisted"
            )),
        }
    }
}

/// A stored application, one per (job, candidate email).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub final_score: f64,
    pub semantic_score: f64,
    pub keyword_score: f64,
    pub llm_score: f64,
    pub verdict: String,
    pub ai_feedback: String,
    /// "generated" | "unavailable"
    pub critique_status: String,
    pub status: String,
    pub projects: Json<Vec<String>>,
    pub project_mappings: Json<Vec<ProjectMatch>>,
    pub missing_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Placement-team listing row for one job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationSummary {
    pub id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub final_score: f64,
    pub verdict: String,
    pub status: String,
    pub missing_keywords: Vec<String>,
}

/// Student-facing view of one of their applications.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentApplication {
    pub application_id: Uuid,
    pub title: String,
    pub status: String,
    pub final_score: f64,
    pub ai_feedback: String,
    pub verdict: String,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert an application. Status always starts as `Applied`.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub final_score: f64,
    pub semantic_score: f64,
    pub keyword_score: f64,
    pub llm_score: f64,
    pub verdict: String,
    pub ai_feedback: String,
    pub critique_status: String,
    pub projects: Vec<String>,
    pub project_mappings: Vec<ProjectMatch>,
    pub missing_keywords: Vec<String>,
}

impl From<&ApplicationRow> for ApplicationSummary {
    fn from(row: &ApplicationRow) -> Self {
        ApplicationSummary {
            id: row.id,
            candidate_name: row.candidate_name.clone(),
            candidate_email: row.candidate_email.clone(),
            final_score: row.final_score,
            verdict: row.verdict.clone(),
            status: row.status.clone(),
            missing_keywords: row.missing_keywords.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_round_trip_through_from_str() {
        for status in [
            ApplicationStatus::Applied,
            ApplicationStatus::Shortlisted,
            ApplicationStatus::NotShortlisted,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_not_shortlisted_serializes_with_space() {
        let json = serde_json::to_string(&ApplicationStatus::NotShortlisted).unwrap();
        assert_eq!(json, r#""Not Shortlisted""#);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "Rejected".parse::<ApplicationStatus>().unwrap_err();
        assert!(err.contains("Rejected"));
    }
}
