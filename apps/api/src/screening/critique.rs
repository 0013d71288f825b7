//! Critique Generator: one chat-model call per application.
//!
//! Never fails the pipeline: an unconfigured model, a call error or a timeout
//! all become `CritiqueOutcome::Unavailable`, whose placeholder text parses to
//! the default verdict and score downstream.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::screening::parser::{parse_critique, CritiqueResult};
use crate::screening::prompts::{
    CRITIQUE_PROMPT_TEMPLATE, CRITIQUE_SYSTEM, STRUCTURED_CRITIQUE_PROMPT_TEMPLATE,
    STRUCTURED_CRITIQUE_SYSTEM,
};

pub const NOT_CONFIGURED: &str = "LLM not configured.";

/// Which response layout the critique prompt asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CritiqueFormat {
    /// Labeled `Verdict:` / `Overall Score:` / `Actionable Feedback:` sections.
    #[default]
    Text,
    /// A JSON object with `verdict`, `overall_score`, `actionable_feedback`.
    Structured,
}

/// Chat-style language model capability.
#[async_trait]
pub trait CritiqueModel: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl CritiqueModel for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CritiqueStatus {
    Generated,
    Unavailable,
}

impl CritiqueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CritiqueStatus::Generated => "generated",
            CritiqueStatus::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CritiqueOutcome {
    Generated { raw: String },
    Unavailable { reason: String },
}

impl CritiqueOutcome {
    pub fn status(&self) -> CritiqueStatus {
        match self {
            CritiqueOutcome::Generated { .. } => CritiqueStatus::Generated,
            CritiqueOutcome::Unavailable { .. } => CritiqueStatus::Unavailable,
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            CritiqueOutcome::Generated { raw } => raw,
            CritiqueOutcome::Unavailable { reason } => reason,
        }
    }

    /// Parsed fields. An unavailable critique yields the parser defaults.
    pub fn parse(&self) -> CritiqueResult {
        parse_critique(self.raw_text())
    }
}

pub fn build_critique_prompt(
    format: CritiqueFormat,
    jd_text: &str,
    resume_text: &str,
    missing_keywords: &[String],
) -> (String, &'static str) {
    let (template, system) = match format {
        CritiqueFormat::Text => (CRITIQUE_PROMPT_TEMPLATE, CRITIQUE_SYSTEM),
        CritiqueFormat::Structured => (
            STRUCTURED_CRITIQUE_PROMPT_TEMPLATE,
            STRUCTURED_CRITIQUE_SYSTEM,
        ),
    };
    let prompt = template
        .replace("{missing_keywords}", &missing_keywords.join(", "))
        .replace("{resume}", resume_text)
        .replace("{jd}", jd_text);
    (prompt, system)
}

/// Asks the model for a critique, bounded by `timeout`.
pub async fn generate_critique(
    model: Option<&dyn CritiqueModel>,
    format: CritiqueFormat,
    jd_text: &str,
    resume_text: &str,
    missing_keywords: &[String],
    timeout: Duration,
) -> CritiqueOutcome {
    let Some(model) = model else {
        warn!("Critique skipped: no language model configured");
        return CritiqueOutcome::Unavailable {
            reason: NOT_CONFIGURED.to_string(),
        };
    };

    let (prompt, system) = build_critique_prompt(format, jd_text, resume_text, missing_keywords);

    match tokio::time::timeout(timeout, model.complete(&prompt, system)).await {
        Ok(Ok(raw)) => {
            info!("Critique generated ({} chars)", raw.len());
            CritiqueOutcome::Generated { raw }
        }
        Ok(Err(e)) => {
            warn!("Critique generation failed: {e}");
            CritiqueOutcome::Unavailable {
                reason: format!("Could not generate AI feedback: {e}"),
            }
        }
        Err(_) => {
            warn!("Critique generation timed out after {}s", timeout.as_secs());
            CritiqueOutcome::Unavailable {
                reason: format!(
                    "Could not generate AI feedback: model call timed out after {}s",
                    timeout.as_secs()
                ),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::screening::parser::DEFAULT_VERDICT;

    /// Returns a fixed response and records nothing.
    pub(crate) struct CannedModel(pub String);

    #[async_trait]
    impl CritiqueModel for CannedModel {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    pub(crate) struct FailingModel;

    #[async_trait]
    impl CritiqueModel for FailingModel {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 400,
                message: "invalid request".to_string(),
            })
        }
    }

    struct SlowModel;

    #[async_trait]
    impl CritiqueModel for SlowModel {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok("**Overall Score:** 90".to_string())
        }
    }

    #[test]
    fn test_prompt_includes_inputs_and_missing_keywords() {
        let (prompt, system) = build_critique_prompt(
            CritiqueFormat::Text,
            "Rust engineer",
            "I write Go",
            &["rust".to_string(), "tokio".to_string()],
        );
        assert!(prompt.contains("**Job Description:** Rust engineer"));
        assert!(prompt.contains("**Resume Text:** I write Go"));
        assert!(prompt.contains("**Missing Keywords to consider:** rust, tokio"));
        assert!(prompt.contains("**Overall Score:**"));
        assert_eq!(system, CRITIQUE_SYSTEM);
    }

    #[test]
    fn test_structured_prompt_asks_for_json() {
        let (prompt, system) =
            build_critique_prompt(CritiqueFormat::Structured, "jd", "resume", &[]);
        assert!(prompt.contains("\"overall_score\""));
        assert!(system.contains("valid JSON"));
    }

    #[tokio::test]
    async fn test_missing_model_is_unavailable_with_defaults() {
        let outcome = generate_critique(
            None,
            CritiqueFormat::Text,
            "jd",
            "resume",
            &[],
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(outcome.status(), CritiqueStatus::Unavailable);
        assert_eq!(outcome.raw_text(), NOT_CONFIGURED);
        let parsed = outcome.parse();
        assert_eq!(parsed.verdict, DEFAULT_VERDICT);
        assert_eq!(parsed.score, 0.0);
        assert_eq!(parsed.feedback, NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn test_model_error_is_reported_as_text() {
        let outcome = generate_critique(
            Some(&FailingModel),
            CritiqueFormat::Text,
            "jd",
            "resume",
            &[],
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(outcome.status(), CritiqueStatus::Unavailable);
        assert!(outcome
            .raw_text()
            .starts_with("Could not generate AI feedback:"));
        assert_eq!(outcome.parse().score, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_unavailable() {
        let outcome = generate_critique(
            Some(&SlowModel),
            CritiqueFormat::Text,
            "jd",
            "resume",
            &[],
            Duration::from_secs(30),
        )
        .await;
        assert_eq!(outcome.status(), CritiqueStatus::Unavailable);
        assert!(outcome.raw_text().contains("timed out after 30s"));
    }

    #[tokio::test]
    async fn test_generated_critique_parses() {
        let model = CannedModel("**Verdict:** Good Fit\n**Overall Score:** 70\n**Actionable Feedback:** Add AWS.".to_string());
        let outcome = generate_critique(
            Some(&model),
            CritiqueFormat::Text,
            "jd",
            "resume",
            &[],
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(outcome.status(), CritiqueStatus::Generated);
        let parsed = outcome.parse();
        assert_eq!(parsed.verdict, "Good Fit");
        assert_eq!(parsed.score, 70.0);
        assert_eq!(parsed.feedback, "Add AWS.");
    }
}
