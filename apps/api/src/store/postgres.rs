use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{ApplicationStore, ShortlistOutcome, StoreError};
use crate::models::application::{
    ApplicationRow, ApplicationStatus, NewApplication, StudentApplication,
};
use crate::models::job::JobRow;

const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn create_job(&self, title: &str, description: &str) -> Result<JobRow, StoreError> {
        let job = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (id, title, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .fetch_one(&self.db)
        .await?;

        Ok(job)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError> {
        let job = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(job)
    }

    async fn list_jobs(&self) -> Result<Vec<JobRow>, StoreError> {
        let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;
        Ok(jobs)
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRow, StoreError> {
        let inserted = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (
                id, job_id, candidate_name, candidate_email,
                final_score, semantic_score, keyword_score, llm_score,
                verdict, ai_feedback, critique_status, status,
                projects, project_mappings, missing_keywords
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application.job_id)
        .bind(&application.candidate_name)
        .bind(&application.candidate_email)
        .bind(application.final_score)
        .bind(application.semantic_score)
        .bind(application.keyword_score)
        .bind(application.llm_score)
        .bind(&application.verdict)
        .bind(&application.ai_feedback)
        .bind(&application.critique_status)
        .bind(ApplicationStatus::Applied.as_str())
        .bind(Json(application.projects.clone()))
        .bind(Json(application.project_mappings.clone()))
        .bind(&application.missing_keywords)
        .fetch_one(&self.db)
        .await;

        match inserted {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateApplication {
                    job_id: application.job_id,
                    email: application.candidate_email,
                })
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                Err(StoreError::JobNotFound(application.job_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn applications_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicationRow>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE job_id = $1 ORDER BY final_score DESC",
        )
        .bind(job_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn applications_for_email(
        &self,
        email: &str,
    ) -> Result<Vec<StudentApplication>, StoreError> {
        let rows = sqlx::query_as::<_, StudentApplication>(
            r#"
            SELECT a.id AS application_id, j.title, a.status, a.final_score,
                   a.ai_feedback, a.verdict, a.created_at
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.candidate_email = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn shortlist(
        &self,
        job_id: Uuid,
        threshold: f64,
    ) -> Result<ShortlistOutcome, StoreError> {
        let mut tx = self.db.begin().await?;

        let shortlisted = sqlx::query(
            "UPDATE applications SET status = $1 \
             WHERE job_id = $2 AND status = $3 AND final_score >= $4",
        )
        .bind(ApplicationStatus::Shortlisted.as_str())
        .bind(job_id)
        .bind(ApplicationStatus::Applied.as_str())
        .bind(threshold)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let not_shortlisted = sqlx::query(
            "UPDATE applications SET status = $1 \
             WHERE job_id = $2 AND status = $3 AND final_score < $4",
        )
        .bind(ApplicationStatus::NotShortlisted.as_str())
        .bind(job_id)
        .bind(ApplicationStatus::Applied.as_str())
        .bind(threshold)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        info!(%job_id, threshold, shortlisted, not_shortlisted, "Shortlist applied");

        Ok(ShortlistOutcome {
            shortlisted,
            not_shortlisted,
        })
    }

    async fn update_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(application_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
