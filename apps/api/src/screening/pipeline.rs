//! Screening Pipeline: runs one resume against one job description.
//!
//! Flow: keywords → missing keywords → critique → parse → embeddings →
//!       hybrid score → projects → project mapping.
//!
//! Capabilities are constructed once at startup and shared; nothing here is global.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::embedding::{Embedder, EmbeddingError};
use crate::errors::AppError;
use crate::screening::critique::{generate_critique, CritiqueFormat, CritiqueModel, CritiqueStatus};
use crate::screening::keywords::{extract_keywords, missing_keywords, PosTagger};
use crate::screening::parser::CritiqueResult;
use crate::screening::projects::{
    extract_projects, map_projects_to_keywords, ProjectCaptureMode, ProjectMatch,
};
use crate::screening::scoring::{calculate_hybrid_score, ScoreBundle, ScoreOptions};

#[derive(Debug, Clone, Copy)]
pub struct ScreeningOptions {
    pub scores: ScoreOptions,
    pub project_capture: ProjectCaptureMode,
    pub critique_format: CritiqueFormat,
    /// Upper bound for each model call (critique and each embedding).
    pub model_timeout: Duration,
}

impl Default for ScreeningOptions {
    fn default() -> Self {
        Self {
            scores: ScoreOptions::default(),
            project_capture: ProjectCaptureMode::default(),
            critique_format: CritiqueFormat::default(),
            model_timeout: Duration::from_secs(60),
        }
    }
}

/// Everything the pipeline derives for one application.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub scores: ScoreBundle,
    pub critique: CritiqueResult,
    #[serde(serialize_with = "serialize_status")]
    pub critique_status: CritiqueStatus,
    pub projects: Vec<String>,
    pub project_mappings: Vec<ProjectMatch>,
}

fn serialize_status<S: serde::Serializer>(status: &CritiqueStatus, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(status.as_str())
}

#[derive(Clone)]
pub struct ScreeningPipeline {
    tagger: Arc<dyn PosTagger>,
    embedder: Arc<dyn Embedder>,
    critic: Option<Arc<dyn CritiqueModel>>,
    options: ScreeningOptions,
}

impl ScreeningPipeline {
    pub fn new(
        tagger: Arc<dyn PosTagger>,
        embedder: Arc<dyn Embedder>,
        critic: Option<Arc<dyn CritiqueModel>>,
        options: ScreeningOptions,
    ) -> Self {
        Self {
            tagger,
            embedder,
            critic,
            options,
        }
    }

    /// Scores `resume_text` against `jd_text`.
    ///
    /// A failed critique degrades to default fields. A failed or timed-out
    /// embedding fails this request with `AppError::ModelUnavailable`.
    pub async fn screen(&self, jd_text: &str, resume_text: &str) -> Result<ScreeningReport, AppError> {
        let keywords = extract_keywords(jd_text, self.tagger.as_ref());
        let missing = missing_keywords(&keywords, resume_text);

        let outcome = generate_critique(
            self.critic.as_deref(),
            self.options.critique_format,
            jd_text,
            resume_text,
            &missing,
            self.options.model_timeout,
        )
        .await;
        let critique = outcome.parse();

        let jd_embedding = self.embed(jd_text).await?;
        let scores = tokio::time::timeout(
            self.options.model_timeout,
            calculate_hybrid_score(
                &jd_embedding,
                resume_text,
                &keywords,
                critique.score,
                self.embedder.as_ref(),
                &self.options.scores,
            ),
        )
        .await
        .map_err(|_| self.timeout_error())?
        .map_err(embedding_error)?;

        let projects = extract_projects(resume_text, self.options.project_capture);
        let project_mappings = map_projects_to_keywords(&projects, &keywords);

        info!(
            final_score = scores.final_score,
            keyword_score = scores.keyword,
            semantic_score = scores.semantic,
            llm_score = scores.llm,
            critique_status = outcome.status().as_str(),
            projects = projects.len(),
            "Resume screened"
        );

        Ok(ScreeningReport {
            keywords,
            missing_keywords: missing,
            scores,
            critique,
            critique_status: outcome.status(),
            projects,
            project_mappings,
        })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        tokio::time::timeout(self.options.model_timeout, self.embedder.embed(text))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(embedding_error)
    }

    fn timeout_error(&self) -> AppError {
        AppError::ModelUnavailable(format!(
            "embedding call timed out after {}s",
            self.options.model_timeout.as_secs()
        ))
    }
}

fn embedding_error(e: EmbeddingError) -> AppError {
    AppError::ModelUnavailable(format!("embedding failed: {e}"))
}
