//! Interview Service
//!
//! Mock-interview engine: intent classification, question selection, answer
//! scoring, rolling-accuracy termination and end-of-round reporting.
//!
//! ## Architecture
//! - `intent.rs` - Bilingual keyword classification of candidate utterances
//! - `tracker.rs` - Question/score bookkeeping and the termination rules
//! - `session.rs` - In-memory session state and conversation history
//! - `selector.rs` - Bank vs. synthesized question generation
//! - `scorer.rs` - Model-graded answers with a never-failing decode
//! - `summary.rs` - Structured end-of-round summary
//! - `evaluation.rs` - Schema-checked whole-conversation evaluation report
//! - `bank.rs` - Question bank extraction and random draws
//! - `orchestrator.rs` - Per-turn sequencing of the above
//! - `prompts.rs` - Bilingual prompt templates and fallback strings

pub mod bank;
pub mod evaluation;
pub mod intent;
pub mod orchestrator;
pub mod prompts;
pub mod scorer;
pub mod selector;
pub mod session;
pub mod summary;
pub mod tracker;

pub use bank::{
    draw, extract_questions_manually, BankQuestion, DrawOptions, ParsedQuestionBank,
    QuestionBankService,
};
pub use evaluation::{EvaluationReport, Evaluator, Recommendation};
pub use intent::{classify, detect, Intent, IntentSignals};
pub use orchestrator::{InterviewOrchestrator, TurnAction, TurnOutcome};
pub use scorer::{parse_scored_answer, AnswerScorer, ScoredAnswer, ScoringContext};
pub use selector::{
    parse_generated_questions, select, GeneratedQuestion, QuestionFraming, QuestionRequest,
    QuestionSelector, QuestionSource,
};
pub use session::{ConversationEntry, InterviewContext, InterviewSession, SessionStatus, Speaker};
pub use summary::{parse_summary, InterviewSummary, SummaryGenerator};
pub use tracker::{SessionTracker, TerminationDecision, TerminationType};
