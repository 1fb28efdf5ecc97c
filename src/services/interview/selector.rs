//! Question Selector
//!
//! Decides where the next question comes from (the attached bank or open
//! synthesis from the job description and resume), builds the generation
//! request, and decodes the generator's reply.
//!
//! Duplicate avoidance against earlier questions is requested in the prompt;
//! the only code-level check is exact trimmed membership in the used set.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use interview_coach_llm::{LlmProvider, LlmRequestOptions, Message};

use super::intent::Intent;
use super::prompts;
use super::session::InterviewSession;
use crate::models::{InterviewSettings, Language};
use crate::utils::error::AppResult;
use crate::utils::json::decode_model_json;

/// Where a question is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Bank,
    Synthesized,
}

/// Presentation of the generation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionFraming {
    /// First question of a round
    Welcome,
    /// Explicitly steer away from earlier questions
    AvoidRepeats,
    Neutral,
}

impl QuestionFraming {
    fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::StartInterview => QuestionFraming::Welcome,
            Intent::NextQuestion => QuestionFraming::AvoidRepeats,
            _ => QuestionFraming::Neutral,
        }
    }
}

/// Everything needed to ask the generator for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRequest {
    pub source: QuestionSource,
    pub framing: QuestionFraming,
    pub question_type: String,
    pub difficulty: String,
    /// Questions already asked this session
    pub exclusions: Vec<String>,
    pub bank_content: Option<String>,
    pub job_description: Option<String>,
    pub resume: Option<String>,
    pub language: Language,
}

impl QuestionRequest {
    pub fn prompt(&self) -> String {
        let framing = prompts::framing_line(self.framing, self.language);
        match (self.source, self.bank_content.as_deref()) {
            (QuestionSource::Bank, Some(bank)) => prompts::bank_question_prompt(
                framing,
                bank,
                &self.question_type,
                &self.difficulty,
                &self.exclusions,
                self.language,
            ),
            _ => prompts::synthesized_question_prompt(
                framing,
                self.job_description.as_deref(),
                self.resume.as_deref(),
                &self.question_type,
                &self.difficulty,
                &self.exclusions,
                self.language,
            ),
        }
    }

    fn fallback_question(&self) -> GeneratedQuestion {
        let question = match self.source {
            QuestionSource::Bank => {
                prompts::fallback_bank_question(&self.question_type, self.language)
            }
            QuestionSource::Synthesized => {
                prompts::fallback_synthesized_question(self.language).to_string()
            }
        };
        GeneratedQuestion {
            question,
            question_type: self.question_type.clone(),
            difficulty: self.difficulty.clone(),
            source: self.source_label(),
        }
    }

    fn source_label(&self) -> String {
        let label = match self.source {
            QuestionSource::Bank => prompts::bank_source_label(self.language),
            QuestionSource::Synthesized => prompts::synthesized_source_label(self.language),
        };
        label.to_string()
    }
}

/// One generated question as the generator reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationPayload {
    #[serde(default)]
    questions: Vec<GeneratedQuestion>,
}

/// Build the request for a question-needing intent; `None` for other intents.
pub fn select(
    intent: Intent,
    session: &InterviewSession,
    settings: &InterviewSettings,
) -> Option<QuestionRequest> {
    if !intent.needs_question() {
        return None;
    }

    let context = &session.context;
    let bank_content = context.question_bank().map(str::to_string);
    let source = if bank_content.is_some() {
        QuestionSource::Bank
    } else {
        QuestionSource::Synthesized
    };

    Some(QuestionRequest {
        source,
        framing: QuestionFraming::for_intent(intent),
        question_type: settings.question_type.clone(),
        difficulty: settings.difficulty.clone(),
        exclusions: session.tracker().used_questions().to_vec(),
        bank_content,
        job_description: context.job_description.clone(),
        resume: context.resume.clone(),
        language: session.language,
    })
}

/// Decode generator output into candidate questions. Never fails: an
/// unusable reply, or one whose every candidate was already used, yields the
/// single localized fallback question.
pub fn parse_generated_questions(text: &str, request: &QuestionRequest) -> Vec<GeneratedQuestion> {
    let decoded = decode_model_json::<GenerationPayload>(text)
        .map(|payload| payload.questions)
        .filter(|questions| !questions.is_empty());
    let mut candidates: Vec<GeneratedQuestion> = match decoded {
        Some(questions) => questions,
        None => match request.source {
            // Open synthesis asks for the bare question text.
            QuestionSource::Synthesized
                if !text.trim().is_empty() && !text.trim_start().starts_with('{') =>
            {
                vec![GeneratedQuestion {
                    question: text.trim().to_string(),
                    question_type: request.question_type.clone(),
                    difficulty: request.difficulty.clone(),
                    source: request.source_label(),
                }]
            }
            _ => Vec::new(),
        },
    };

    for candidate in candidates.iter_mut() {
        candidate.question = candidate.question.trim().to_string();
        if candidate.question_type.is_empty() {
            candidate.question_type = request.question_type.clone();
        }
        if candidate.difficulty.is_empty() {
            candidate.difficulty = request.difficulty.clone();
        }
        if candidate.source.is_empty() {
            candidate.source = request.source_label();
        }
    }
    candidates.retain(|c| !c.question.is_empty() && !request.exclusions.contains(&c.question));

    if candidates.is_empty() {
        debug!(source = ?request.source, "no usable generated question, using fallback");
        candidates.push(request.fallback_question());
    }
    candidates
}

/// Runs question generation against the completion service.
pub struct QuestionSelector {
    provider: Arc<dyn LlmProvider>,
}

impl QuestionSelector {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Generate one question for `request`. Transport failures propagate.
    pub async fn generate(&self, request: &QuestionRequest) -> AppResult<GeneratedQuestion> {
        let options = match request.source {
            QuestionSource::Bank => LlmRequestOptions::json(0.7),
            QuestionSource::Synthesized => LlmRequestOptions {
                temperature_override: Some(0.8),
                ..Default::default()
            },
        };

        debug!(
            source = ?request.source,
            framing = ?request.framing,
            exclusions = request.exclusions.len(),
            "generating question"
        );

        let response = self
            .provider
            .send_message(vec![Message::user(request.prompt())], None, options)
            .await?;

        let mut candidates = parse_generated_questions(response.text(), request);
        // parse_generated_questions always yields at least one entry
        Ok(candidates.swap_remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::interview::session::InterviewContext;

    fn bank_session() -> InterviewSession {
        InterviewSession::new(
            Language::En,
            InterviewContext::default().with_question_bank("1. What is ownership?\n2. What is Send?"),
        )
    }

    fn bank_request(exclusions: &[&str]) -> QuestionRequest {
        let mut session = bank_session();
        for q in exclusions {
            session.issue_question(q);
        }
        select(Intent::NextQuestion, &session, &InterviewSettings::default()).unwrap()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    #[test]
    fn test_bank_source_when_bank_present() {
        let request = select(
            Intent::StartInterview,
            &bank_session(),
            &InterviewSettings::default(),
        )
        .unwrap();
        assert_eq!(request.source, QuestionSource::Bank);
        assert_eq!(request.framing, QuestionFraming::Welcome);
        assert!(request.prompt().contains("What is ownership?"));
    }

    #[test]
    fn test_synthesized_without_bank() {
        let session = InterviewSession::new(
            Language::Zh,
            InterviewContext::default().with_job_description("后端工程师"),
        );
        let request =
            select(Intent::RequestQuestions, &session, &InterviewSettings::default()).unwrap();
        assert_eq!(request.source, QuestionSource::Synthesized);
        assert_eq!(request.framing, QuestionFraming::Neutral);
        assert!(request.prompt().contains("后端工程师"));
    }

    #[test]
    fn test_no_request_for_other_intents() {
        let settings = InterviewSettings::default();
        assert!(select(Intent::Answer, &bank_session(), &settings).is_none());
        assert!(select(Intent::RequestHelp, &bank_session(), &settings).is_none());
    }

    #[test]
    fn test_exclusions_come_from_used_questions() {
        let request = bank_request(&["What is ownership?"]);
        assert_eq!(request.framing, QuestionFraming::AvoidRepeats);
        assert_eq!(request.exclusions, vec!["What is ownership?".to_string()]);
        assert!(request.prompt().contains("What is ownership?"));
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    #[test]
    fn test_parse_bank_payload() {
        let request = bank_request(&[]);
        let raw = r#"{"questions":[{"question":" What is Send? ","type":"technical","difficulty":"medium","source":"question bank"}],"totalQuestions":1}"#;
        let parsed = parse_generated_questions(raw, &request);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].question, "What is Send?");
        assert_eq!(parsed[0].question_type, "technical");
    }

    #[test]
    fn test_parse_filters_exact_repeats() {
        let request = bank_request(&["What is ownership?"]);
        let raw = r#"{"questions":[{"question":"What is ownership?"},{"question":"Explain Pin."}]}"#;
        let parsed = parse_generated_questions(raw, &request);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].question, "Explain Pin.");
        // Missing fields filled from the request
        assert_eq!(parsed[0].difficulty, "medium");
        assert_eq!(parsed[0].source, "question bank");
    }

    #[test]
    fn test_parse_failure_yields_fallback() {
        let request = bank_request(&[]);
        let parsed = parse_generated_questions("not json", &request);
        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed[0].question,
            "Based on the question bank, please answer a question about general."
        );
    }

    #[test]
    fn test_all_repeats_yield_fallback() {
        let request = bank_request(&["What is ownership?"]);
        let parsed = parse_generated_questions(
            r#"{"questions":[{"question":"What is ownership?"}]}"#,
            &request,
        );
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].question.starts_with("Based on the question bank"));
    }

    #[test]
    fn test_synthesized_plain_text_accepted() {
        let session = InterviewSession::new(Language::En, InterviewContext::default());
        let request =
            select(Intent::StartInterview, &session, &InterviewSettings::default()).unwrap();
        let parsed = parse_generated_questions(
            "  Tell me about a production incident you handled.  ",
            &request,
        );
        assert_eq!(
            parsed[0].question,
            "Tell me about a production incident you handled."
        );
        assert_eq!(parsed[0].source, "generated");

        let broken = parse_generated_questions("{\"questions\": [", &request);
        assert_eq!(
            broken[0].question,
            prompts::fallback_synthesized_question(Language::En)
        );
    }
}
