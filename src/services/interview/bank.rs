//! Question Bank Tools
//!
//! Extracts structured questions from an uploaded bank (model-assisted, with
//! a line-heuristic fallback) and draws random practice questions from it.

use std::sync::{Arc, OnceLock};

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use interview_coach_llm::{LlmProvider, LlmRequestOptions, Message};

use super::prompts;
use crate::models::Language;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json::decode_model_json;

const DEFAULT_CATEGORY: &str = "通用";
const DEFAULT_DIFFICULTY: &str = "中等";
const DEFAULT_DIFFICULTIES: [&str; 3] = ["简单", "中等", "困难"];

/// Filter value meaning "no filter".
const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankQuestion {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuestionBank {
    #[serde(default)]
    pub questions: Vec<BankQuestion>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub difficulties: Vec<String>,
}

struct LinePatterns {
    question: Vec<Regex>,
    answer: Vec<Regex>,
}

fn line_patterns() -> &'static LinePatterns {
    static PATTERNS: OnceLock<LinePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |sources: &[&str]| -> Vec<Regex> {
            sources
                .iter()
                .filter_map(|s| match Regex::new(s) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(pattern = %s, error = %e, "invalid question bank pattern");
                        None
                    }
                })
                .collect()
        };
        LinePatterns {
            question: compile(&[r"^\d+[.)、]?\s*", r"^[Qq][.:：]?\s+", r"^问题[：:]\s*"]),
            answer: compile(&[r"^[Aa][.:：]?\s+", r"^答案[：:]\s*", r"^答[：:]\s*"]),
        }
    })
}

/// Strip the leading marker if any pattern matches.
fn strip_marker<'a>(line: &'a str, patterns: &[Regex]) -> Option<&'a str> {
    patterns
        .iter()
        .find_map(|re| re.find(line))
        .map(|m| line[m.end()..].trim())
}

fn push_question(out: &mut Vec<BankQuestion>, question: &str, answer: &str) {
    let question = question.trim();
    if question.is_empty() {
        return;
    }
    let answer = answer.trim();
    out.push(BankQuestion {
        question: question.to_string(),
        answer: (!answer.is_empty()).then(|| answer.to_string()),
        category: Some(DEFAULT_CATEGORY.to_string()),
        difficulty: Some(DEFAULT_DIFFICULTY.to_string()),
    });
}

/// Line-heuristic extraction. Numbered, `Q.` and `问题：` lines open a
/// question; `A.`, `答案：` and `答：` lines open its answer; other lines
/// continue whichever part is open.
pub fn extract_questions_manually(content: &str) -> ParsedQuestionBank {
    let patterns = line_patterns();
    let mut questions = Vec::new();
    let mut question = String::new();
    let mut answer = String::new();
    let mut in_answer = false;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = strip_marker(line, &patterns.question) {
            push_question(&mut questions, &question, &answer);
            question = rest.to_string();
            answer.clear();
            in_answer = false;
        } else if question.is_empty() {
            // Preamble before the first question
            continue;
        } else if let Some(rest) = strip_marker(line, &patterns.answer) {
            answer = rest.to_string();
            in_answer = true;
        } else if in_answer {
            answer.push(' ');
            answer.push_str(line);
        } else {
            question.push(' ');
            question.push_str(line);
        }
    }
    push_question(&mut questions, &question, &answer);

    ParsedQuestionBank {
        questions,
        categories: vec![DEFAULT_CATEGORY.to_string()],
        difficulties: DEFAULT_DIFFICULTIES.iter().map(|d| d.to_string()).collect(),
    }
}

/// Options for [`draw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOptions {
    pub count: usize,
    /// `None` or `"all"` means any category
    pub category: Option<String>,
    /// `None` or `"all"` means any difficulty
    pub difficulty: Option<String>,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            count: 5,
            category: None,
            difficulty: None,
        }
    }
}

/// Whether two questions overlap by case-insensitive containment.
fn overlaps(question: &str, used: &str) -> bool {
    let q = question.trim().to_lowercase();
    let u = used.trim().to_lowercase();
    !u.is_empty() && (q.contains(&u) || u.contains(&q))
}

fn field_matches(value: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted.filter(|w| !w.is_empty() && *w != ALL) {
        None => true,
        Some(wanted) => value.map_or(true, |v| v == wanted),
    }
}

/// Draw up to `options.count` random unused questions.
pub fn draw(bank: &ParsedQuestionBank, used: &[String], options: &DrawOptions) -> Vec<BankQuestion> {
    draw_with_rng(bank, used, options, &mut rand::thread_rng())
}

pub fn draw_with_rng<R: Rng + ?Sized>(
    bank: &ParsedQuestionBank,
    used: &[String],
    options: &DrawOptions,
    rng: &mut R,
) -> Vec<BankQuestion> {
    let available: Vec<&BankQuestion> = bank
        .questions
        .iter()
        .filter(|q| !used.iter().any(|u| overlaps(&q.question, u)))
        .collect();

    let filtered: Vec<&BankQuestion> = available
        .iter()
        .copied()
        .filter(|q| {
            field_matches(q.category.as_deref(), options.category.as_deref())
                && field_matches(q.difficulty.as_deref(), options.difficulty.as_deref())
        })
        .collect();

    // Too few matches: ignore the filters
    let mut pool = if filtered.len() < options.count {
        available
    } else {
        filtered
    };

    pool.shuffle(rng);
    pool.into_iter().take(options.count).cloned().collect()
}

/// Model-assisted bank parsing.
pub struct QuestionBankService {
    provider: Arc<dyn LlmProvider>,
}

impl QuestionBankService {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Extract questions from raw bank text. Any model failure falls back to
    /// the line heuristics; only a bank with no recognizable questions fails.
    pub async fn parse(&self, content: &str, language: Language) -> AppResult<ParsedQuestionBank> {
        if content.trim().is_empty() {
            return Err(AppError::validation("Question bank content is empty"));
        }

        let prompt = prompts::bank_parse_prompt(content, language);
        let parsed = match self
            .provider
            .send_message(
                vec![Message::user(prompt)],
                None,
                LlmRequestOptions::json(0.2),
            )
            .await
        {
            Ok(response) => decode_model_json::<ParsedQuestionBank>(response.text())
                .map(clean_parsed)
                .filter(|bank| !bank.questions.is_empty()),
            Err(e) => {
                warn!(error = %e, "question bank parsing request failed, using line heuristics");
                None
            }
        };

        let bank = parsed.unwrap_or_else(|| {
            debug!("falling back to manual question extraction");
            extract_questions_manually(content)
        });

        if bank.questions.is_empty() {
            return Err(AppError::parse(
                "No questions could be extracted from the question bank",
            ));
        }
        Ok(bank)
    }
}

fn clean_parsed(mut bank: ParsedQuestionBank) -> ParsedQuestionBank {
    bank.questions.retain(|q| !q.question.trim().is_empty());
    for q in bank.questions.iter_mut() {
        q.question = q.question.trim().to_string();
    }
    bank
}
