//! Evaluation Report
//!
//! Whole-conversation evaluation across five dimensions. Unlike per-turn
//! scoring this is requested explicitly, so an undecodable reply is reported
//! as an error after one repair attempt.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use interview_coach_llm::{LlmProvider, LlmRequestOptions, Message};

use super::prompts;
use super::session::{render_transcript, ConversationEntry, InterviewContext};
use crate::models::Language;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json::extract_json_from_response;

/// Hiring recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Recommendation {
    StronglyRecommend,
    Recommend,
    Average,
    NotRecommend,
}

impl Recommendation {
    pub fn label(&self, language: Language) -> &'static str {
        match self {
            Recommendation::StronglyRecommend => language.pick("强烈推荐", "Strongly recommend"),
            Recommendation::Recommend => language.pick("推荐", "Recommend"),
            Recommendation::Average => language.pick("一般", "Average"),
            Recommendation::NotRecommend => language.pick("不推荐", "Not recommended"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DimensionScore {
    /// Score from 0 to 100
    pub score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDimensions {
    /// Technical skills
    pub technical_skills: DimensionScore,
    /// Communication
    pub communication: DimensionScore,
    /// Problem solving
    pub problem_solving: DimensionScore,
    /// Work attitude
    pub attitude: DimensionScore,
    /// Relevant experience
    pub experience: DimensionScore,
}

impl EvaluationDimensions {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &DimensionScore)> {
        [
            ("technicalSkills", &self.technical_skills),
            ("communication", &self.communication),
            ("problemSolving", &self.problem_solving),
            ("attitude", &self.attitude),
            ("experience", &self.experience),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    /// Overall score from 0 to 100
    pub overall_score: f64,
    pub dimensions: EvaluationDimensions,
    /// Strengths and highlights
    pub strengths: Vec<String>,
    /// Areas for improvement
    pub improvements: Vec<String>,
    pub recommendation: Recommendation,
    /// Overall evaluation summary
    pub summary: String,
}

fn check_range(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between 0 and 100, got {}", name, value))
    }
}

impl EvaluationReport {
    pub fn validate(&self) -> Result<(), String> {
        check_range("overallScore", self.overall_score)?;
        for (name, dimension) in self.dimensions.iter() {
            check_range(name, dimension.score)?;
        }
        if self.summary.trim().is_empty() {
            return Err("summary must not be empty".to_string());
        }
        Ok(())
    }

    /// Plain-text rendering for the CLI.
    pub fn render(&self, language: Language) -> String {
        let sep = language.pick("：", ": ");
        let labels = [
            language.pick("技术能力", "Technical skills"),
            language.pick("沟通表达", "Communication"),
            language.pick("问题解决", "Problem solving"),
            language.pick("工作态度", "Attitude"),
            language.pick("相关经验", "Experience"),
        ];

        let mut lines = vec![format!(
            "{}{}{:.0}/100",
            language.pick("综合评分", "Overall score"),
            sep,
            self.overall_score
        )];
        for (label, (_, dimension)) in labels.iter().zip(self.dimensions.iter()) {
            lines.push(format!(
                "- {} {:.0}: {}",
                label, dimension.score, dimension.feedback
            ));
        }
        if !self.strengths.is_empty() {
            lines.push(format!(
                "{}{}{}",
                language.pick("优点", "Strengths"),
                sep,
                self.strengths.join(language.pick("、", ", "))
            ));
        }
        if !self.improvements.is_empty() {
            lines.push(format!(
                "{}{}{}",
                language.pick("改进建议", "Improvements"),
                sep,
                self.improvements.join(language.pick("、", ", "))
            ));
        }
        lines.push(format!(
            "{}{}{}",
            language.pick("录用建议", "Recommendation"),
            sep,
            self.recommendation.label(language)
        ));
        lines.push(self.summary.clone());
        lines.join("\n")
    }
}

/// JSON Schema embedded in the evaluation prompt.
pub fn report_schema_json() -> String {
    let schema = schemars::schema_for!(EvaluationReport);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Decode and validate one reply.
pub fn decode_report(text: &str) -> Result<EvaluationReport, String> {
    let json_str = extract_json_from_response(text);
    let report: EvaluationReport = serde_json::from_str(&json_str).map_err(|e| e.to_string())?;
    report.validate()?;
    Ok(report)
}

/// Generates evaluation reports through the completion service.
pub struct Evaluator {
    provider: Arc<dyn LlmProvider>,
}

impl Evaluator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn evaluate(
        &self,
        history: &[ConversationEntry],
        context: &InterviewContext,
        language: Language,
    ) -> AppResult<EvaluationReport> {
        if history.is_empty() {
            return Err(AppError::validation(
                "Cannot evaluate an empty conversation",
            ));
        }

        let prompt = prompts::evaluation_prompt(
            &render_transcript(history, language),
            context,
            &report_schema_json(),
            language,
        );
        let options = LlmRequestOptions::json(0.3);

        let response = self
            .provider
            .send_message(vec![Message::user(prompt.clone())], None, options.clone())
            .await?;
        let response_text = response.text().to_string();

        // One repair attempt on decode or validation failure
        match decode_report(&response_text) {
            Ok(report) => {
                info!(overall_score = report.overall_score, "evaluation generated");
                Ok(report)
            }
            Err(first_error) => {
                debug!(error = %first_error, "Evaluation parse failed, retrying");

                let retry_response = self
                    .provider
                    .send_message(
                        vec![
                            Message::user(prompt),
                            Message::assistant(response_text),
                            Message::user(prompts::repair_prompt(&first_error)),
                        ],
                        None,
                        options,
                    )
                    .await?;

                decode_report(retry_response.text()).map_err(|e| {
                    AppError::parse(format!("Evaluation failed after retry: {}", e))
                })
            }
        }
    }
}
