//! Interview Orchestrator
//!
//! Sequences one conversational turn: classify the utterance, then issue a
//! question, give help, or score the answer and check the termination rules.
//!
//! Turns work on a copy of the caller's session. The updated copy is only
//! returned on success, so a failed completion never leaves a session half
//! updated.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use interview_coach_llm::{LlmProvider, LlmRequestOptions, Message};

use super::evaluation::{EvaluationReport, Evaluator};
use super::intent::{classify, Intent};
use super::prompts;
use super::scorer::{AnswerScorer, ScoredAnswer, ScoringContext};
use super::selector::{select, QuestionSelector};
use super::session::InterviewSession;
use super::summary::{InterviewSummary, SummaryGenerator};
use crate::models::InterviewSettings;
use crate::utils::error::{AppError, AppResult};

/// What a turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    QuestionIssued,
    HelpGiven,
    AnswerScored,
    /// A termination rule fired and the round was summarized
    InterviewEnded,
    /// Free conversation; nothing was scored
    Conversation,
}

/// Result of one turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub response_text: String,
    /// Updated session; replaces the caller's copy
    pub session: InterviewSession,
    pub action: TurnAction,
    pub intent: Intent,
    pub scored: Option<ScoredAnswer>,
    pub summary: Option<InterviewSummary>,
}

/// Drives interview turns against one completion service.
pub struct InterviewOrchestrator {
    provider: Arc<dyn LlmProvider>,
    settings: InterviewSettings,
    selector: QuestionSelector,
    scorer: AnswerScorer,
    summarizer: SummaryGenerator,
    evaluator: Evaluator,
}

impl InterviewOrchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: InterviewSettings) -> Self {
        Self {
            selector: QuestionSelector::new(provider.clone()),
            scorer: AnswerScorer::new(provider.clone()),
            summarizer: SummaryGenerator::new(provider.clone()),
            evaluator: Evaluator::new(provider.clone()),
            provider,
            settings,
        }
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    /// Handle one candidate utterance.
    pub async fn handle_turn(
        &self,
        utterance: &str,
        session: &InterviewSession,
    ) -> AppResult<TurnOutcome> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(AppError::validation("Message cannot be empty"));
        }
        if session.is_ended() {
            return Err(AppError::validation(
                "This interview round has ended; start a new session",
            ));
        }

        let intent = classify(utterance);
        debug!(session_id = %session.id(), intent = ?intent, "turn classified");

        let mut next = session.clone();
        let outcome = if intent.needs_question() {
            self.issue_question(intent, utterance, next).await?
        } else if intent == Intent::RequestHelp {
            let open_question = next.open_question().map(str::to_string);
            let prompt =
                prompts::help_prompt(utterance, open_question.as_deref(), next.language);
            let reply = self.converse(&next, prompt).await?;
            next.push_exchange(utterance, &reply);
            self.outcome(reply, next, TurnAction::HelpGiven, intent)
        } else if let Some(question) = next.open_question().map(str::to_string) {
            self.score_answer(&question, utterance, next).await?
        } else {
            let reply = self.converse(&next, utterance.to_string()).await?;
            next.push_exchange(utterance, &reply);
            self.outcome(reply, next, TurnAction::Conversation, intent)
        };

        info!(
            session_id = %outcome.session.id(),
            intent = ?intent,
            action = ?outcome.action,
            question_count = outcome.session.tracker().question_count(),
            "turn handled"
        );
        Ok(outcome)
    }

    /// Evaluation report for the whole conversation so far.
    pub async fn evaluate(&self, session: &InterviewSession) -> AppResult<EvaluationReport> {
        self.evaluator
            .evaluate(session.history(), &session.context, session.language)
            .await
    }

    async fn issue_question(
        &self,
        intent: Intent,
        utterance: &str,
        mut session: InterviewSession,
    ) -> AppResult<TurnOutcome> {
        let request = select(intent, &session, &self.settings)
            .ok_or_else(|| AppError::internal(format!("no question source for {}", intent)))?;
        let generated = self.selector.generate(&request).await?;

        session.issue_question(&generated.question);
        session.push_exchange(utterance, &generated.question);
        Ok(self.outcome(
            generated.question,
            session,
            TurnAction::QuestionIssued,
            intent,
        ))
    }

    async fn score_answer(
        &self,
        question: &str,
        answer: &str,
        mut session: InterviewSession,
    ) -> AppResult<TurnOutcome> {
        let language = session.language;
        let context = ScoringContext {
            job_description: session.context.job_description.clone(),
            criteria: self.settings.criteria.clone(),
        };
        let scored = self
            .scorer
            .score(question, answer, &context, language)
            .await?;

        session.record_score(scored.score);
        session.push_candidate(answer);

        let decision = session.tracker().should_terminate(language);
        if decision.should_terminate {
            let summary = self.summarizer.summarize(&session, &decision).await?;
            let text = summary.render(&decision.reason, language);
            session.push_interviewer(&text);
            session.end();
            info!(
                session_id = %session.id(),
                termination_type = ?decision.termination_type,
                duration_secs = (Utc::now() - session.started_at()).num_seconds(),
                "interview round ended"
            );
            return Ok(TurnOutcome {
                response_text: text,
                session,
                action: TurnAction::InterviewEnded,
                intent: Intent::Answer,
                scored: Some(scored),
                summary: Some(summary),
            });
        }

        let text = scored.render(language);
        session.push_interviewer(&text);
        Ok(TurnOutcome {
            scored: Some(scored),
            ..self.outcome(text, session, TurnAction::AnswerScored, Intent::Answer)
        })
    }

    /// Free-form completion with the interviewer persona and prior history.
    async fn converse(&self, session: &InterviewSession, user_text: String) -> AppResult<String> {
        let system = prompts::interviewer_system_prompt(&session.context, session.language);
        let mut messages: Vec<Message> = session
            .history()
            .iter()
            .map(|entry| entry.to_message())
            .collect();
        messages.push(Message::user(user_text));

        let response = self
            .provider
            .send_message(messages, Some(system), LlmRequestOptions::default())
            .await?;
        Ok(response.text().trim().to_string())
    }

    fn outcome(
        &self,
        response_text: String,
        session: InterviewSession,
        action: TurnAction,
        intent: Intent,
    ) -> TurnOutcome {
        TurnOutcome {
            response_text,
            session,
            action,
            intent,
            scored: None,
            summary: None,
        }
    }
}
