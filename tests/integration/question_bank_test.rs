//! Question Bank Integration Tests
//!
//! Model-assisted parsing with the line-heuristic fallback, then drawing
//! unused questions for practice.

use interview_coach::services::interview::{draw, DrawOptions, QuestionBankService};
use interview_coach::{AppError, Language};
use interview_coach_llm::LlmError;

use super::support::ScriptedProvider;

const BANK: &str = "1. What is ownership?\n\
A. A single owner per value.\n\
2. What is borrowing?\n\
3. What is a lifetime?";

#[tokio::test]
async fn test_parse_uses_model_output() {
    let provider = ScriptedProvider::texts(&[r#"```json
{"questions": [
  {"question": "What is ownership?", "category": "rust", "difficulty": "简单"},
  {"question": "What is TCP?", "category": "network"}
], "categories": ["rust", "network"], "difficulties": ["简单"]}
```"#]);
    let service = QuestionBankService::new(provider.clone());

    let bank = service.parse(BANK, Language::En).await.unwrap();
    assert_eq!(bank.questions.len(), 2);
    assert_eq!(bank.categories, vec!["rust".to_string(), "network".to_string()]);
    assert!(provider.user_prompts()[0].contains("What is borrowing?"));
}

#[tokio::test]
async fn test_parse_falls_back_on_bad_output_and_transport_errors() {
    let provider = ScriptedProvider::texts(&["I could not parse that."]);
    let service = QuestionBankService::new(provider.clone());
    let bank = service.parse(BANK, Language::Zh).await.unwrap();
    assert_eq!(bank.questions.len(), 3);
    assert_eq!(
        bank.questions[0].answer.as_deref(),
        Some("A single owner per value.")
    );

    provider.push(Err(LlmError::RateLimited {
        message: "slow down".to_string(),
        retry_after: Some(10),
    }));
    let bank = service.parse(BANK, Language::Zh).await.unwrap();
    assert_eq!(bank.questions.len(), 3);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_parse_rejects_empty_and_unrecognizable_banks() {
    let provider = ScriptedProvider::texts(&["{}"]);
    let service = QuestionBankService::new(provider.clone());

    assert!(matches!(
        service.parse("   ", Language::En).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service.parse("free-form notes only", Language::En).await,
        Err(AppError::Parse(_))
    ));
}

#[tokio::test]
async fn test_draw_skips_questions_already_asked() {
    let provider = ScriptedProvider::texts(&["not json"]);
    let service = QuestionBankService::new(provider);
    let bank = service.parse(BANK, Language::En).await.unwrap();

    let used = vec!["what is ownership?".to_string(), "What is borrowing".to_string()];
    let drawn = draw(
        &bank,
        &used,
        &DrawOptions {
            count: 3,
            ..Default::default()
        },
    );
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0].question, "What is a lifetime?");
}
