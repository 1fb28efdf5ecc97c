//! Session Tracker
//!
//! Rolling per-session bookkeeping (questions issued, answer scores, used
//! questions) and the termination policy that decides when a round ends.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Language;

/// Window for the high-accuracy rule.
pub const HIGH_ACCURACY_WINDOW: usize = 3;
/// Rolling accuracy (percent) over the last window that ends a round early.
pub const HIGH_ACCURACY_THRESHOLD: f64 = 85.0;
/// Questions required before the overall-accuracy rule can fire.
pub const SUFFICIENT_QUESTIONS: u32 = 5;
/// Overall accuracy (percent) required by the sufficient-questions rule.
pub const SUFFICIENT_ACCURACY_THRESHOLD: f64 = 80.0;
/// Hard cap on questions per round.
pub const MAX_QUESTIONS: u32 = 8;

/// Absorbs float noise in averages like (8.4 + 8.5 + 8.6) / 3.
const EPSILON: f64 = 1e-9;

/// Which termination rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationType {
    HighAccuracy,
    SufficientQuestions,
    MaxQuestions,
}

impl TerminationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationType::HighAccuracy => "high_accuracy",
            TerminationType::SufficientQuestions => "sufficient_questions",
            TerminationType::MaxQuestions => "max_questions",
        }
    }
}

impl std::fmt::Display for TerminationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived decision; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminationDecision {
    pub should_terminate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_type: Option<TerminationType>,
    pub reason: String,
}

impl TerminationDecision {
    fn continue_round() -> Self {
        Self {
            should_terminate: false,
            termination_type: None,
            reason: String::new(),
        }
    }

    fn terminate(termination_type: TerminationType, reason: String) -> Self {
        Self {
            should_terminate: true,
            termination_type: Some(termination_type),
            reason,
        }
    }
}

/// Question/score state for one interview round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTracker {
    question_count: u32,
    score_history: Vec<f64>,
    /// Insertion-ordered, deduplicated on trimmed text.
    used_questions: Vec<String>,
    /// The latest issued question has not been scored yet. A skipped
    /// question is superseded by the next one and never reopens.
    #[serde(default)]
    awaiting_answer: bool,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn score_history(&self) -> &[f64] {
        &self.score_history
    }

    pub fn used_questions(&self) -> &[String] {
        &self.used_questions
    }

    pub fn is_used(&self, question: &str) -> bool {
        let trimmed = question.trim();
        self.used_questions.iter().any(|q| q == trimmed)
    }

    /// Count an issued question. Re-issuing a known question still counts,
    /// but membership in the used set does not change.
    pub fn record_question(&mut self, question: &str) {
        let trimmed = question.trim();
        if !trimmed.is_empty() && !self.is_used(trimmed) {
            self.used_questions.push(trimmed.to_string());
        }
        self.question_count += 1;
        self.awaiting_answer = true;
    }

    /// Append a score in [0, 10] for the latest question. Returns `false`
    /// (and changes nothing) when that question is already answered.
    pub fn record_answer(&mut self, score: f64) -> bool {
        if !self.awaiting_answer {
            warn!(
                question_count = self.question_count,
                answers = self.score_history.len(),
                "answer recorded without an open question; ignoring"
            );
            return false;
        }
        let score = if score.is_finite() {
            score.clamp(0.0, 10.0)
        } else {
            0.0
        };
        self.score_history.push(score);
        self.awaiting_answer = false;
        true
    }

    /// Mean of the last `min(window, len)` scores as a percentage; 0 when empty.
    pub fn rolling_accuracy(&self, window: usize) -> f64 {
        let take = window.min(self.score_history.len());
        if take == 0 {
            return 0.0;
        }
        let recent = &self.score_history[self.score_history.len() - take..];
        let mean = recent.iter().sum::<f64>() / take as f64;
        mean * 10.0
    }

    /// Mean of all scores on the 0-10 scale; 0 when empty.
    pub fn average_score(&self) -> f64 {
        if self.score_history.is_empty() {
            return 0.0;
        }
        self.score_history.iter().sum::<f64>() / self.score_history.len() as f64
    }

    /// Whether the latest issued question is still unanswered.
    pub fn has_open_question(&self) -> bool {
        self.awaiting_answer
    }

    /// Evaluate the termination rules in priority order; first match wins.
    pub fn should_terminate(&self, language: Language) -> TerminationDecision {
        let answered = self.score_history.len();

        if answered >= HIGH_ACCURACY_WINDOW {
            let recent = self.rolling_accuracy(HIGH_ACCURACY_WINDOW);
            if recent + EPSILON >= HIGH_ACCURACY_THRESHOLD {
                let reason = match language {
                    Language::Zh => format!(
                        "恭喜！您最近3个问题的平均准确率达到{:.1}%，表现优秀！",
                        recent
                    ),
                    Language::En => format!(
                        "Congratulations! Your average accuracy over the last 3 questions reached {:.1}%. Excellent work!",
                        recent
                    ),
                };
                return TerminationDecision::terminate(TerminationType::HighAccuracy, reason);
            }
        }

        if self.question_count >= SUFFICIENT_QUESTIONS {
            let overall = self.rolling_accuracy(answered);
            if overall + EPSILON >= SUFFICIENT_ACCURACY_THRESHOLD {
                let reason = match language {
                    Language::Zh => format!(
                        "您已经回答了{}个问题，整体准确率达到{:.1}%，表现良好！",
                        self.question_count, overall
                    ),
                    Language::En => format!(
                        "You have answered {} questions with an overall accuracy of {:.1}%. Well done!",
                        self.question_count, overall
                    ),
                };
                return TerminationDecision::terminate(
                    TerminationType::SufficientQuestions,
                    reason,
                );
            }
        }

        if self.question_count >= MAX_QUESTIONS {
            let reason = match language {
                Language::Zh => format!(
                    "您已经回答了{}个问题，可以结束当前面试轮次了。",
                    self.question_count
                ),
                Language::En => format!(
                    "You have answered {} questions. This interview round can end here.",
                    self.question_count
                ),
            };
            return TerminationDecision::terminate(TerminationType::MaxQuestions, reason);
        }

        TerminationDecision::continue_round()
    }
}
