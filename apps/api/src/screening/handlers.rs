//! Axum route handlers for jobs, applications and placement review.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::documents::{read_document, DocumentFormat};
use crate::errors::AppError;
use crate::models::application::{
    ApplicationStatus, ApplicationSummary, NewApplication, StudentApplication,
};
use crate::models::job::JobRow;
use crate::state::AppState;
use crate::store::ShortlistOutcome;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub message: String,
    pub application_id: Uuid,
    pub score: f64,
    pub verdict: String,
    pub critique_status: String,
}

#[derive(Debug, Deserialize)]
pub struct ShortlistRequest {
    pub threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct ShortlistResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: ShortlistOutcome,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub application_id: Uuid,
    pub new_status: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Fields collected from the apply form.
struct ApplyForm {
    name: String,
    email: String,
    file_name: String,
    bytes: Vec<u8>,
}

// ────────────────────────────────────────────────────────────────────────────
// Student handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// POST /api/v1/jobs/:job_id/apply
///
/// Multipart form: `student_name`, `student_email`, `resume_file`.
/// Reads the resume, screens it against the job and stores the application.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    let form = read_apply_form(multipart).await?;

    let format = DocumentFormat::from_filename(&form.file_name);
    let resume_text = read_document(form.bytes, format).await?;

    let job = state
        .store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found.".to_string()))?;

    let report = state.pipeline.screen(&job.description, &resume_text).await?;

    let row = state
        .store
        .create_application(NewApplication {
            job_id,
            candidate_name: form.name,
            candidate_email: form.email,
            final_score: report.scores.final_score,
            semantic_score: report.scores.semantic,
            keyword_score: report.scores.keyword,
            llm_score: report.scores.llm,
            verdict: report.critique.verdict,
            ai_feedback: report.critique.feedback,
            critique_status: report.critique_status.as_str().to_string(),
            projects: report.projects,
            project_mappings: report.project_mappings,
            missing_keywords: report.missing_keywords,
        })
        .await?;

    info!(
        application_id = %row.id,
        %job_id,
        final_score = row.final_score,
        "Application stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            message: "Application submitted successfully!".to_string(),
            application_id: row.id,
            score: row.final_score,
            verdict: row.verdict,
            critique_status: row.critique_status,
        }),
    ))
}

/// GET /api/v1/students/:email/applications
pub async fn handle_student_applications(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<StudentApplication>>, AppError> {
    let email = email.trim();
    Ok(Json(state.store.applications_for_email(email).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Placement team handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::Validation("description cannot be empty".to_string()));
    }

    let job = state.store.create_job(title, &request.description).await?;
    info!(job_id = %job.id, "Job posted");

    Ok((StatusCode::CREATED, Json(job)))
}

/// DELETE /api/v1/jobs/:job_id
///
/// Removes the job and all of its applications.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.store.delete_job(job_id).await? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    info!(%job_id, "Job deleted");

    Ok(Json(MessageResponse {
        message: format!("Job {job_id} deleted successfully"),
    }))
}

/// GET /api/v1/jobs/:job_id/applications
///
/// Review listing, highest final score first.
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationSummary>>, AppError> {
    let rows = state.store.applications_for_job(job_id).await?;
    Ok(Json(rows.iter().map(ApplicationSummary::from).collect()))
}

/// POST /api/v1/jobs/:job_id/shortlist
///
/// Moves every still-`Applied` application to `Shortlisted` or `Not Shortlisted`.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<ShortlistRequest>,
) -> Result<Json<ShortlistResponse>, AppError> {
    if !request.threshold.is_finite() {
        return Err(AppError::Validation("threshold must be a number".to_string()));
    }

    let outcome = state.store.shortlist(job_id, request.threshold).await?;

    Ok(Json(ShortlistResponse {
        message: "Bulk shortlist applied successfully".to_string(),
        outcome,
    }))
}

/// PUT /api/v1/applications/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let status: ApplicationStatus = request.new_status.parse().map_err(AppError::Validation)?;

    if !state
        .store
        .update_status(request.application_id, status)
        .await?
    {
        return Err(AppError::NotFound(format!(
            "Application {} not found",
            request.application_id
        )));
    }

    Ok(Json(MessageResponse {
        message: "Status updated successfully".to_string(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_apply_form(mut multipart: Multipart) -> Result<ApplyForm, AppError> {
    let mut name = None;
    let mut email = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form: {e}")))?
    {
        match field.name().unwrap_or("") {
            "student_name" => {
                name = Some(field.text().await.map_err(form_error)?);
            }
            "student_email" => {
                email = Some(field.text().await.map_err(form_error)?);
            }
            "resume_file" => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let bytes = field.bytes().await.map_err(form_error)?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let name = required_text(name, "student_name")?;
    let email = required_text(email, "student_email")?;
    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("resume_file is required".to_string()))?;

    Ok(ApplyForm {
        name,
        email,
        file_name,
        bytes,
    })
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

fn form_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Could not read form field: {e}"))
}
