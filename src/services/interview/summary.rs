//! Interview Summary
//!
//! Structured end-of-round summary, generated once a termination rule fires.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use interview_coach_llm::{LlmProvider, LlmRequestOptions, Message};

use super::prompts;
use super::session::InterviewSession;
use super::tracker::{SessionTracker, TerminationDecision};
use crate::models::Language;
use crate::utils::error::AppResult;
use crate::utils::json::decode_model_json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// 0-10 scale
    pub overall_score: f64,
    /// Percentage
    pub accuracy_rate: f64,
    pub recommendations: Vec<String>,
    pub next_steps: String,
    pub congratulations: String,
}

/// Raw model payload; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SummaryPayload {
    summary: Option<String>,
    strengths: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
    overall_score: Option<f64>,
    accuracy_rate: Option<f64>,
    recommendations: Option<Vec<String>>,
    next_steps: Option<String>,
    congratulations: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn default_summary_title(language: Language) -> &'static str {
    language.pick("面试总结", "Interview summary")
}

impl InterviewSummary {
    /// Summary built from tracker statistics when the reply is unusable.
    pub fn fallback(raw_text: &str, tracker: &SessionTracker, language: Language) -> Self {
        let summary = Some(raw_text.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| default_summary_title(language))
            .to_string();
        Self {
            summary,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            overall_score: tracker.average_score(),
            accuracy_rate: tracker.rolling_accuracy(tracker.score_history().len()),
            recommendations: Vec::new(),
            next_steps: prompts::fallback_next_steps(language).to_string(),
            congratulations: prompts::fallback_congratulations(language).to_string(),
        }
    }

    /// Response text that closes the round.
    pub fn render(&self, reason: &str, language: Language) -> String {
        let sep = language.pick("：", ": ");
        let joiner = language.pick("、", ", ");
        let mut sections = Vec::new();

        if !reason.trim().is_empty() {
            sections.push(reason.trim().to_string());
        }
        sections.push(format!(
            "{}{}\n{}",
            default_summary_title(language),
            language.pick("：", ":"),
            self.summary
        ));

        let lists = [
            (language.pick("优点", "Strengths"), &self.strengths),
            (language.pick("需要改进", "To improve"), &self.weaknesses),
            (language.pick("建议", "Recommendations"), &self.recommendations),
        ];
        for (label, items) in lists {
            if !items.is_empty() {
                sections.push(format!("{}{}{}", label, sep, items.join(joiner)));
            }
        }

        sections.push(match language {
            Language::Zh => format!(
                "总体评分：{:.1}/10（准确率 {:.1}%）",
                self.overall_score, self.accuracy_rate
            ),
            Language::En => format!(
                "Overall score: {:.1}/10 (accuracy {:.1}%)",
                self.overall_score, self.accuracy_rate
            ),
        });
        sections.push(format!(
            "{}{}{}",
            language.pick("下一步", "Next steps"),
            sep,
            self.next_steps
        ));
        sections.push(format!(
            "{}\n{}",
            self.congratulations,
            language.pick(
                "输入“开始面试”即可开始新一轮面试。",
                "Say \"start\" to begin a new interview round."
            )
        ));

        sections.join("\n\n")
    }
}

/// Decode a summary reply. Never fails; missing fields take tracker values
/// or localized defaults.
pub fn parse_summary(text: &str, tracker: &SessionTracker, language: Language) -> InterviewSummary {
    let Some(payload) = decode_model_json::<SummaryPayload>(text) else {
        debug!("summary reply was not decodable, using fallback");
        return InterviewSummary::fallback(text, tracker, language);
    };

    let overall_score = payload
        .overall_score
        .filter(|s| s.is_finite() && (0.0..=10.0).contains(s))
        .unwrap_or_else(|| tracker.average_score());
    let accuracy_rate = payload
        .accuracy_rate
        .filter(|r| r.is_finite() && (0.0..=100.0).contains(r))
        .unwrap_or_else(|| tracker.rolling_accuracy(tracker.score_history().len()));

    InterviewSummary {
        summary: non_blank(payload.summary)
            .unwrap_or_else(|| default_summary_title(language).to_string()),
        strengths: clean_list(payload.strengths),
        weaknesses: clean_list(payload.weaknesses),
        overall_score,
        accuracy_rate,
        recommendations: clean_list(payload.recommendations),
        next_steps: non_blank(payload.next_steps)
            .unwrap_or_else(|| prompts::fallback_next_steps(language).to_string()),
        congratulations: non_blank(payload.congratulations)
            .unwrap_or_else(|| prompts::fallback_congratulations(language).to_string()),
    }
}

/// Produces end-of-round summaries through the completion service.
pub struct SummaryGenerator {
    provider: Arc<dyn LlmProvider>,
}

impl SummaryGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn summarize(
        &self,
        session: &InterviewSession,
        decision: &TerminationDecision,
    ) -> AppResult<InterviewSummary> {
        let tracker = session.tracker();
        let language = session.language;
        let termination_type = decision
            .termination_type
            .map(|t| t.as_str())
            .unwrap_or_default();

        let prompt = prompts::summary_prompt(
            &session.transcript(),
            session.context.job_description.as_deref(),
            session.context.resume.as_deref(),
            tracker.average_score(),
            tracker.rolling_accuracy(tracker.score_history().len()),
            tracker.question_count(),
            termination_type,
            language,
        );

        let response = self
            .provider
            .send_message(
                vec![Message::user(prompt)],
                None,
                LlmRequestOptions::json(0.5),
            )
            .await?;

        Ok(parse_summary(response.text(), tracker, language))
    }
}
