//! Intent Classification
//!
//! Maps a raw utterance to a session intent with an ordered table of
//! bilingual (Chinese + English) keyword patterns. Both keyword sets are
//! always consulted, whatever the configured interface language.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What the candidate wants from this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    StartInterview,
    NextQuestion,
    RequestQuestions,
    RequestHelp,
    Answer,
}

impl Intent {
    /// Whether the turn is answered by issuing a new question.
    pub fn needs_question(&self) -> bool {
        matches!(
            self,
            Intent::StartInterview | Intent::NextQuestion | Intent::RequestQuestions
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::StartInterview => "start_interview",
            Intent::NextQuestion => "next_question",
            Intent::RequestQuestions => "request_questions",
            Intent::RequestHelp => "request_help",
            Intent::Answer => "answer",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
}

impl IntentRule {
    fn matches(&self, utterance: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(utterance))
    }
}

/// Raw rule table in precedence order: (intent, zh pattern, en pattern).
const RULES: &[(Intent, &str, &str)] = &[
    (
        Intent::StartInterview,
        r"(开始面试|开始|开始吧|我们开始|可以开始了)",
        r"(?i)\b(start|begin|let's start|ready to start)\b",
    ),
    (
        Intent::NextQuestion,
        r"(下一题|下一个|继续|下一个问题|再来一题|出下一题)",
        r"(?i)\b(next|continue|another)\b",
    ),
    (
        Intent::RequestQuestions,
        r"(生成|出|给|提供|问).*(问题|面试题|题目)",
        r"(?i)\b(next|generate|ask)\b.*\b(question|problem)s?\b",
    ),
    (
        Intent::RequestHelp,
        r"(请帮我|给我提示|我不太清楚|能给我一些建议|帮我回答)",
        r"(?i)\b(help|hints?|suggestions?|advice|not sure)\b",
    ),
];

/// Compiled rule table (initialized once).
fn rules() -> &'static [IntentRule] {
    static RULE_TABLE: OnceLock<Vec<IntentRule>> = OnceLock::new();
    RULE_TABLE.get_or_init(|| {
        RULES
            .iter()
            .map(|(intent, zh, en)| IntentRule {
                intent: *intent,
                patterns: [zh, en]
                    .iter()
                    .filter_map(|raw| match Regex::new(raw) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            warn!(pattern = %raw, error = %e, "invalid intent pattern");
                            None
                        }
                    })
                    .collect(),
            })
            .collect()
    })
}

/// Every intent signal present in an utterance, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentSignals {
    matched: Vec<Intent>,
}

impl IntentSignals {
    pub fn contains(&self, intent: Intent) -> bool {
        self.matched.contains(&intent)
    }

    pub fn matched(&self) -> &[Intent] {
        &self.matched
    }

    /// The intent used for branching: the highest-precedence signal, or `Answer`.
    pub fn primary(&self) -> Intent {
        self.matched.first().copied().unwrap_or(Intent::Answer)
    }
}

/// Collect all matching signals. Help can co-occur with the question group.
pub fn detect(utterance: &str) -> IntentSignals {
    let text = utterance.trim();
    if text.is_empty() {
        return IntentSignals::default();
    }
    IntentSignals {
        matched: rules()
            .iter()
            .filter(|rule| rule.matches(text))
            .map(|rule| rule.intent)
            .collect(),
    }
}

/// Classify an utterance. Empty or whitespace-only input is an `Answer`.
pub fn classify(utterance: &str) -> Intent {
    detect(utterance).primary()
}
