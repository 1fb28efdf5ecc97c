//! Answer Scorer
//!
//! Asks the completion service to grade one answer and decodes the reply.
//! Decoding never fails: unusable output yields a conservative default.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use interview_coach_llm::{LlmProvider, LlmRequestOptions, Message};

use super::prompts;
use crate::models::Language;
use crate::utils::error::AppResult;
use crate::utils::json::extract_json_from_response;

/// Score used when the model reply cannot be decoded.
pub const FALLBACK_SCORE: f64 = 8.0;

/// Scores below this need improvement unless the model says otherwise.
const IMPROVEMENT_THRESHOLD: f64 = 7.0;

/// Inputs that shape the rubric.
#[derive(Debug, Clone, Default)]
pub struct ScoringContext {
    pub job_description: Option<String>,
    /// Empty means the built-in four-item rubric.
    pub criteria: Vec<String>,
}

/// One graded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredAnswer {
    /// In [0, 10]
    pub score: f64,
    /// Percentage; the model's value when it supplied a sane one
    pub accuracy_rate: f64,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    pub needs_improvement: bool,
    /// Rubric used for this answer
    pub criteria: Vec<String>,
}

impl ScoredAnswer {
    /// Default for undecodable output.
    pub fn fallback(raw_text: &str, criteria: Vec<String>, language: Language) -> Self {
        let feedback = Some(raw_text.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| prompts::fallback_feedback(language))
            .to_string();
        Self {
            score: FALLBACK_SCORE,
            accuracy_rate: FALLBACK_SCORE * 10.0,
            feedback,
            guidance: Some(prompts::fallback_guidance(language).to_string()),
            needs_improvement: true,
            criteria,
        }
    }

    /// Response text shown to the candidate.
    pub fn render(&self, language: Language) -> String {
        let mut out = match language {
            Language::Zh => format!(
                "评分：{:.1}/10（准确率 {:.0}%）\n\n{}",
                self.score, self.accuracy_rate, self.feedback
            ),
            Language::En => format!(
                "Score: {:.1}/10 (accuracy {:.0}%)\n\n{}",
                self.score, self.accuracy_rate, self.feedback
            ),
        };
        if let Some(guidance) = self.guidance.as_deref().filter(|g| !g.trim().is_empty()) {
            out.push_str(&format!(
                "\n\n{}{}",
                language.pick("提示：", "Hint: "),
                guidance
            ));
        }
        out
    }
}

/// Read a number that may have been sent as a JSON string.
fn number_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn text_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Decode a scoring reply. Never fails.
pub fn parse_scored_answer(text: &str, criteria: Vec<String>, language: Language) -> ScoredAnswer {
    let decoded: Option<Value> = serde_json::from_str(&extract_json_from_response(text)).ok();
    let obj = match decoded {
        Some(Value::Object(obj)) => obj,
        _ => {
            debug!("score reply was not a JSON object, using fallback");
            return ScoredAnswer::fallback(text, criteria, language);
        }
    };

    let score = number_field(&obj, "score")
        .unwrap_or(FALLBACK_SCORE)
        .clamp(0.0, 10.0);
    let accuracy_rate = number_field(&obj, "accuracyRate")
        .filter(|rate| (0.0..=100.0).contains(rate))
        .unwrap_or(score * 10.0);
    let needs_improvement = obj
        .get("needsImprovement")
        .and_then(Value::as_bool)
        .unwrap_or(score < IMPROVEMENT_THRESHOLD);
    let feedback = text_field(&obj, "feedback").unwrap_or_else(|| text.trim().to_string());
    let guidance = text_field(&obj, "guidance").or_else(|| {
        needs_improvement.then(|| prompts::fallback_guidance(language).to_string())
    });

    ScoredAnswer {
        score,
        accuracy_rate,
        feedback,
        guidance,
        needs_improvement,
        criteria,
    }
}

/// Grades answers through the completion service.
pub struct AnswerScorer {
    provider: Arc<dyn LlmProvider>,
}

impl AnswerScorer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// One outbound call. Transport failures propagate; bad output does not.
    pub async fn score(
        &self,
        question: &str,
        answer: &str,
        context: &ScoringContext,
        language: Language,
    ) -> AppResult<ScoredAnswer> {
        let criteria = if context.criteria.is_empty() {
            prompts::default_criteria(language)
        } else {
            context.criteria.clone()
        };

        let prompt = prompts::scoring_prompt(
            question,
            answer,
            context.job_description.as_deref(),
            &criteria,
            language,
        );

        let response = self
            .provider
            .send_message(
                vec![Message::user(prompt)],
                None,
                LlmRequestOptions::json(0.2),
            )
            .await?;

        let scored = parse_scored_answer(response.text(), criteria, language);
        debug!(
            score = scored.score,
            accuracy_rate = scored.accuracy_rate,
            needs_improvement = scored.needs_improvement,
            "answer scored"
        );
        Ok(scored)
    }
}
