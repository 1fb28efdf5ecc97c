//! Interview Session
//!
//! In-memory state of one interview conversation. Sessions are never
//! persisted; a fresh one is started after a round ends.

use chrono::{DateTime, Utc};
use interview_coach_llm::Message;
use uuid::Uuid;

use super::tracker::SessionTracker;
use crate::models::Language;

/// Materials attached by the candidate. Each blob is opaque text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewContext {
    pub question_bank_content: Option<String>,
    pub job_description: Option<String>,
    pub resume: Option<String>,
    pub knowledge_base: Option<String>,
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    Some(value.into()).filter(|v| !v.trim().is_empty())
}

impl InterviewContext {
    pub fn with_question_bank(mut self, content: impl Into<String>) -> Self {
        self.question_bank_content = non_blank(content);
        self
    }

    pub fn with_job_description(mut self, content: impl Into<String>) -> Self {
        self.job_description = non_blank(content);
        self
    }

    pub fn with_resume(mut self, content: impl Into<String>) -> Self {
        self.resume = non_blank(content);
        self
    }

    pub fn with_knowledge_base(mut self, content: impl Into<String>) -> Self {
        self.knowledge_base = non_blank(content);
        self
    }

    pub fn question_bank(&self) -> Option<&str> {
        self.question_bank_content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }

    pub fn has_question_bank(&self) -> bool {
        self.question_bank().is_some()
    }
}

/// Who said a line of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Candidate,
    Interviewer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    pub content: String,
}

impl ConversationEntry {
    pub fn candidate(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Candidate,
            content: content.into(),
        }
    }

    pub fn interviewer(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Interviewer,
            content: content.into(),
        }
    }

    pub fn to_message(&self) -> Message {
        match self.speaker {
            Speaker::Candidate => Message::user(self.content.clone()),
            Speaker::Interviewer => Message::assistant(self.content.clone()),
        }
    }
}

/// Render a conversation as labelled lines ("面试者: ..." / "Interviewer: ...").
pub fn render_transcript(history: &[ConversationEntry], language: Language) -> String {
    history
        .iter()
        .map(|entry| {
            let label = match entry.speaker {
                Speaker::Candidate => language.pick("面试者", "Interviewee"),
                Speaker::Interviewer => language.pick("面试官", "Interviewer"),
            };
            format!("{}: {}", label, entry.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Ended,
}

/// One interview conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    pub language: Language,
    pub context: InterviewContext,
    tracker: SessionTracker,
    history: Vec<ConversationEntry>,
    current_question: Option<String>,
    status: SessionStatus,
}

impl InterviewSession {
    pub fn new(language: Language, context: InterviewContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            language,
            context,
            tracker: SessionTracker::new(),
            history: Vec::new(),
            current_question: None,
            status: SessionStatus::Active,
        }
    }

    /// Start a new round with the same language and materials.
    pub fn restart(&self) -> Self {
        Self::new(self.language, self.context.clone())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn history(&self) -> &[ConversationEntry] {
        &self.history
    }

    /// The last issued question, if it has not been answered yet.
    pub fn open_question(&self) -> Option<&str> {
        if self.tracker.has_open_question() {
            self.current_question.as_deref()
        } else {
            None
        }
    }

    /// The last issued question, answered or not.
    pub fn current_question(&self) -> Option<&str> {
        self.current_question.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    pub fn transcript(&self) -> String {
        render_transcript(&self.history, self.language)
    }

    pub(crate) fn issue_question(&mut self, question: &str) {
        self.tracker.record_question(question);
        self.current_question = Some(question.trim().to_string());
    }

    pub(crate) fn record_score(&mut self, score: f64) -> bool {
        self.tracker.record_answer(score)
    }

    pub(crate) fn push_candidate(&mut self, utterance: &str) {
        self.history.push(ConversationEntry::candidate(utterance));
    }

    pub(crate) fn push_interviewer(&mut self, reply: &str) {
        self.history.push(ConversationEntry::interviewer(reply));
    }

    pub(crate) fn push_exchange(&mut self, utterance: &str, reply: &str) {
        self.push_candidate(utterance);
        self.push_interviewer(reply);
    }

    pub(crate) fn end(&mut self) {
        self.status = SessionStatus::Ended;
    }
}
