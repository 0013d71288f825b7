//! Application Store: jobs and applications behind one capability.
//!
//! `PgStore` is the production backend. `MemoryStore` keeps the same contract
//! in process and backs the router tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{
    ApplicationRow, ApplicationStatus, NewApplication, StudentApplication,
};
use crate::models::job::JobRow;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("An application for job {job_id} from {email} already exists")]
    DuplicateApplication { job_id: Uuid, email: String },

    #[error("Job {0} does not exist")]
    JobNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Rows moved by one bulk shortlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShortlistOutcome {
    pub shortlisted: u64,
    pub not_shortlisted: u64,
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn create_job(&self, title: &str, description: &str) -> Result<JobRow, StoreError>;

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError>;

    /// Newest first.
    async fn list_jobs(&self) -> Result<Vec<JobRow>, StoreError>;

    /// Removes the job and every application for it. `false` if it did not exist.
    async fn delete_job(&self, job_id: Uuid) -> Result<bool, StoreError>;

    /// Inserts with status `Applied`. A second application for the same
    /// (job, email) fails with `DuplicateApplication` and stores nothing.
    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRow, StoreError>;

    /// Highest final score first.
    async fn applications_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicationRow>, StoreError>;

    /// Newest first, with the job title attached.
    async fn applications_for_email(
        &self,
        email: &str,
    ) -> Result<Vec<StudentApplication>, StoreError>;

    /// Only rows still `Applied` change: `final >= threshold` becomes
    /// `Shortlisted`, the rest `Not Shortlisted`.
    async fn shortlist(&self, job_id: Uuid, threshold: f64)
        -> Result<ShortlistOutcome, StoreError>;

    /// `false` if no application has this id.
    async fn update_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool, StoreError>;
}
