//! Config Integration Tests
//!
//! Settings written through `ConfigService` reach the interview services.

use interview_coach::services::interview::{InterviewContext, InterviewOrchestrator, InterviewSession};
use interview_coach::{ConfigService, Language, SettingsUpdate};
use interview_coach_llm::ProviderType;

use super::support::{question_json, score_json, ScriptedProvider};

#[test]
fn test_update_persists_and_builds_provider_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut service = ConfigService::open(&path).unwrap();
    service
        .update_config(SettingsUpdate {
            provider: Some(ProviderType::DeepSeek),
            api_key: Some("sk-test".to_string()),
            model: Some("deepseek-chat".to_string()),
            ..Default::default()
        })
        .unwrap();

    let reopened = ConfigService::open(&path).unwrap();
    let provider_config = reopened.get_config().provider.to_provider_config();
    assert_eq!(provider_config.provider, ProviderType::DeepSeek);
    assert_eq!(provider_config.model, "deepseek-chat");
    assert_eq!(provider_config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(
        provider_config.effective_base_url(),
        ProviderType::DeepSeek.default_base_url()
    );
}

#[tokio::test]
async fn test_configured_criteria_reach_scoring_prompt() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    let mut service = ConfigService::open(&path).unwrap();
    let config = service
        .update_config(SettingsUpdate {
            language: Some(Language::En),
            criteria: Some(vec!["Mentions lifetimes".to_string()]),
            question_type: Some("technical".to_string()),
            ..Default::default()
        })
        .unwrap();

    let q1 = question_json("What is borrowing?");
    let score = score_json(7.5);
    let provider = ScriptedProvider::texts(&[q1.as_str(), score.as_str()]);
    let orch = InterviewOrchestrator::new(provider.clone(), config.interview.clone());
    let session = InterviewSession::new(
        config.language,
        InterviewContext::default().with_question_bank("1. What is borrowing?"),
    );

    let session = orch.handle_turn("start", &session).await.unwrap().session;
    let outcome = orch
        .handle_turn("Shared or mutable references", &session)
        .await
        .unwrap();

    let scored = outcome.scored.unwrap();
    assert_eq!(scored.criteria, vec!["Mentions lifetimes".to_string()]);
    let prompts = provider.user_prompts();
    assert!(prompts[0].contains("technical"));
    assert!(prompts[1].contains("Criteria: Mentions lifetimes"));
}
