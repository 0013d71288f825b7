//! Hybrid Scorer: keyword overlap, semantic similarity and the model score
//! combined with fixed weights.

use serde::{Deserialize, Serialize};

use crate::embedding::{cosine_similarity, Embedder, EmbeddingError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub semantic: f64,
    pub llm: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 0.3,
            semantic: 0.5,
            llm: 0.2,
        }
    }
}

/// Range handling for the llm and final scores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreOptions {
    pub weights: ScoreWeights,
    /// Off: scores pass through unbounded.
    /// On: llm and final scores are clamped to [0, 100].
    pub clamp_scores: bool,
}

/// The four stored scores, each on a 0–100 scale by intent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBundle {
    #[serde(rename = "final")]
    pub final_score: f64,
    pub semantic: f64,
    pub keyword: f64,
    pub llm: f64,
}

/// Percentage of keywords contained in the lower-cased resume, and the matches.
/// An empty keyword set scores exactly 0.
pub fn keyword_score(resume_text: &str, keywords: &[String]) -> (f64, Vec<String>) {
    if keywords.is_empty() {
        return (0.0, Vec::new());
    }
    let resume_lower = resume_text.to_lowercase();
    let matched: Vec<String> = keywords
        .iter()
        .filter(|kw| resume_lower.contains(kw.as_str()))
        .cloned()
        .collect();
    let score = matched.len() as f64 / keywords.len() as f64 * 100.0;
    (score, matched)
}

/// Cosine similarity scaled to a percentage.
pub fn semantic_score(jd_embedding: &[f32], resume_embedding: &[f32]) -> Result<f64, EmbeddingError> {
    Ok(cosine_similarity(jd_embedding, resume_embedding)? * 100.0)
}

/// final = 0.3*keyword + 0.5*semantic + 0.2*llm (default weights)
pub fn combine_scores(keyword: f64, semantic: f64, llm: f64, options: &ScoreOptions) -> ScoreBundle {
    let llm = if options.clamp_scores {
        llm.clamp(0.0, 100.0)
    } else {
        llm
    };
    let w = &options.weights;
    let final_score = w.keyword * keyword + w.semantic * semantic + w.llm * llm;
    let final_score = if options.clamp_scores {
        final_score.clamp(0.0, 100.0)
    } else {
        final_score
    };

    ScoreBundle {
        final_score,
        semantic,
        keyword,
        llm,
    }
}

/// Embeds the resume and scores it against an already-embedded job description.
pub async fn calculate_hybrid_score(
    jd_embedding: &[f32],
    resume_text: &str,
    jd_keywords: &[String],
    llm_score: f64,
    embedder: &dyn Embedder,
    options: &ScoreOptions,
) -> Result<ScoreBundle, EmbeddingError> {
    let (keyword, _) = keyword_score(resume_text, jd_keywords);
    let resume_embedding = embedder.embed(resume_text).await?;
    let semantic = semantic_score(jd_embedding, &resume_embedding)?;
    Ok(combine_scores(keyword, semantic, llm_score, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(self.0.clone())
        }
    }

    fn kws(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_scenario_keyword_score_two_of_three() {
        let (score, matched) = keyword_score(
            "I have 3 years experience with Python and Docker projects.",
            &kws(&["python", "aws", "docker"]),
        );
        assert_eq!(matched, vec!["python", "docker"]);
        assert!((score - 66.6667).abs() < 0.001, "Score was {score}");
    }

    #[test]
    fn test_empty_keywords_score_exactly_zero() {
        let (score, matched) = keyword_score("anything at all", &[]);
        assert_eq!(score, 0.0);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_keyword_match_is_substring_based() {
        // "java" is contained in "javascript"
        let (score, _) = keyword_score("JavaScript developer", &kws(&["java"]));
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_final_is_fixed_weighted_sum() {
        let options = ScoreOptions::default();
        for (hard, soft, llm) in [(66.67, 48.2, 70.0), (0.0, 0.0, 0.0), (100.0, 91.5, 12.0)] {
            let bundle = combine_scores(hard, soft, llm, &options);
            let expected = 0.3 * hard + 0.5 * soft + 0.2 * llm;
            assert!((bundle.final_score - expected).abs() < 1e-9);
            assert_eq!(bundle.keyword, hard);
            assert_eq!(bundle.semantic, soft);
            assert_eq!(bundle.llm, llm);
        }
    }

    #[test]
    fn test_unclamped_mode_leaves_out_of_range_scores() {
        let bundle = combine_scores(100.0, 100.0, 999.0, &ScoreOptions::default());
        assert!((bundle.final_score - 279.8).abs() < 1e-9);
        assert_eq!(bundle.llm, 999.0);
    }

    #[test]
    fn test_clamp_mode_bounds_llm_and_final() {
        let options = ScoreOptions {
            clamp_scores: true,
            ..ScoreOptions::default()
        };
        let bundle = combine_scores(100.0, 100.0, 999.0, &options);
        assert_eq!(bundle.llm, 100.0);
        assert_eq!(bundle.final_score, 100.0);

        let negative = combine_scores(0.0, -80.0, 0.0, &options);
        assert_eq!(negative.final_score, 0.0);
    }

    #[tokio::test]
    async fn test_hybrid_score_uses_fresh_resume_embedding() {
        let embedder = FixedEmbedder(vec![1.0, 0.0]);
        let bundle = calculate_hybrid_score(
            &[1.0, 0.0],
            "Python and Docker",
            &kws(&["python", "aws", "docker"]),
            50.0,
            &embedder,
            &ScoreOptions::default(),
        )
        .await
        .unwrap();
        assert!((bundle.semantic - 100.0).abs() < 1e-9);
        let expected = 0.3 * (200.0 / 3.0) + 0.5 * 100.0 + 0.2 * 50.0;
        assert!((bundle.final_score - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_hybrid_score_rejects_mismatched_dimensions() {
        let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
        let result = calculate_hybrid_score(
            &[1.0, 0.0],
            "resume",
            &[],
            0.0,
            &embedder,
            &ScoreOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(EmbeddingError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_bundle_serializes_final_field_name() {
        let bundle = combine_scores(10.0, 20.0, 30.0, &ScoreOptions::default());
        let json = serde_json::to_value(bundle).unwrap();
        assert!(json.get("final").is_some());
    }
}
