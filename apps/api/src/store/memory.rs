use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ApplicationStore, ShortlistOutcome, StoreError};
use crate::models::application::{
    ApplicationRow, ApplicationStatus, NewApplication, StudentApplication,
};
use crate::models::job::JobRow;

#[derive(Default)]
struct Tables {
    jobs: Vec<JobRow>,
    applications: Vec<ApplicationRow>,
}

/// In-process store. Rows are kept in insertion order, so "newest first" is
/// a reverse walk and equal timestamps stay deterministic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn create_job(&self, title: &str, description: &str) -> Result<JobRow, StoreError> {
        let job = JobRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.tables.write().await.jobs.push(job.clone());
        Ok(job)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<JobRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().rev().cloned().collect())
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != job_id);
        if tables.jobs.len() == before {
            return Ok(false);
        }
        tables.applications.retain(|a| a.job_id != job_id);
        Ok(true)
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRow, StoreError> {
        // Check and insert under one write lock so concurrent duplicates cannot both land.
        let mut tables = self.tables.write().await;

        if !tables.jobs.iter().any(|j| j.id == application.job_id) {
            return Err(StoreError::JobNotFound(application.job_id));
        }
        if tables.applications.iter().any(|a| {
            a.job_id == application.job_id && a.candidate_email == application.candidate_email
        }) {
            return Err(StoreError::DuplicateApplication {
                job_id: application.job_id,
                email: application.candidate_email,
            });
        }

        let row = ApplicationRow {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            candidate_name: application.candidate_name,
            candidate_email: application.candidate_email,
            final_score: application.final_score,
            semantic_score: application.semantic_score,
            keyword_score: application.keyword_score,
            llm_score: application.llm_score,
            verdict: application.verdict,
            ai_feedback: application.ai_feedback,
            critique_status: application.critique_status,
            status: ApplicationStatus::Applied.as_str().to_string(),
            projects: Json(application.projects),
            project_mappings: Json(application.project_mappings),
            missing_keywords: application.missing_keywords,
            created_at: Utc::now(),
        };
        tables.applications.push(row.clone());
        Ok(row)
    }

    async fn applications_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicationRow>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ApplicationRow> = tables
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });
        Ok(rows)
    }

    async fn applications_for_email(
        &self,
        email: &str,
    ) -> Result<Vec<StudentApplication>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .applications
            .iter()
            .rev()
            .filter(|a| a.candidate_email == email)
            .filter_map(|a| {
                let job = tables.jobs.iter().find(|j| j.id == a.job_id)?;
                Some(StudentApplication {
                    application_id: a.id,
                    title: job.title.clone(),
                    status: a.status.clone(),
                    final_score: a.final_score,
                    ai_feedback: a.ai_feedback.clone(),
                    verdict: a.verdict.clone(),
                    created_at: a.created_at,
                })
            })
            .collect();
        Ok(rows)
    }

    async fn shortlist(
        &self,
        job_id: Uuid,
        threshold: f64,
    ) -> Result<ShortlistOutcome, StoreError> {
        let mut tables = self.tables.write().await;
        let mut outcome = ShortlistOutcome::default();

        for application in tables
            .applications
            .iter_mut()
            .filter(|a| a.job_id == job_id && a.status == ApplicationStatus::Applied.as_str())
        {
            if application.final_score >= threshold {
                application.status = ApplicationStatus::Shortlisted.as_str().to_string();
                outcome.shortlisted += 1;
            } else {
                application.status = ApplicationStatus::NotShortlisted.as_str().to_string();
                outcome.not_shortlisted += 1;
            }
        }

        Ok(outcome)
    }

    async fn update_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.applications.iter_mut().find(|a| a.id == application_id) {
            Some(application) => {
                application.status = status.as_str().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
