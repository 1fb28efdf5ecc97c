//! Interview Flow Integration Tests
//!
//! Drives complete rounds through `InterviewOrchestrator::handle_turn`:
//! - question issue, scoring and each termination rule
//! - help turns and free conversation
//! - failed completions leaving the session untouched

use interview_coach::services::interview::{
    Intent, InterviewContext, InterviewOrchestrator, InterviewSession, TerminationType, TurnAction,
};
use interview_coach::{AppError, InterviewSettings, Language};
use interview_coach_llm::LlmError;

use super::support::{question_json, score_json, ScriptedProvider};

// ============================================================================
// Helpers
// ============================================================================

fn bank_context() -> InterviewContext {
    InterviewContext::default()
        .with_question_bank("1. What is ownership?\n2. What is borrowing?\n3. What is Pin?")
        .with_job_description("Senior Rust engineer")
}

fn orchestrator(provider: &std::sync::Arc<ScriptedProvider>) -> InterviewOrchestrator {
    InterviewOrchestrator::new(provider.clone(), InterviewSettings::default())
}

// ============================================================================
// Termination rules
// ============================================================================

#[tokio::test]
async fn test_three_strong_answers_end_with_high_accuracy() {
    let q1 = question_json("What is ownership?");
    let q2 = question_json("What is borrowing?");
    let q3 = question_json("What is Pin?");
    let nine = score_json(9.0);
    let provider = ScriptedProvider::texts(&[
        q1.as_str(),
        nine.as_str(),
        q2.as_str(),
        nine.as_str(),
        q3.as_str(),
        nine.as_str(),
        r#"{"summary": "Strong fundamentals", "strengths": ["ownership"], "weaknesses": [], "recommendations": ["practice async"]}"#,
    ]);
    let orch = orchestrator(&provider);
    let mut session = InterviewSession::new(Language::En, bank_context());

    let outcome = orch.handle_turn("Let's start", &session).await.unwrap();
    assert_eq!(outcome.intent, Intent::StartInterview);
    assert_eq!(outcome.response_text, "What is ownership?");
    session = outcome.session;

    let outcome = orch
        .handle_turn("Each value has a single owner that drops it", &session)
        .await
        .unwrap();
    assert_eq!(outcome.action, TurnAction::AnswerScored);
    session = outcome.session;

    let outcome = orch.handle_turn("Next", &session).await.unwrap();
    assert_eq!(outcome.intent, Intent::NextQuestion);
    assert_eq!(outcome.response_text, "What is borrowing?");
    session = outcome.session;

    // The generation prompt for question two excludes question one
    let prompts = provider.user_prompts();
    assert!(prompts[2].contains("What is ownership?"));

    let outcome = orch
        .handle_turn("A reference that does not take ownership", &session)
        .await
        .unwrap();
    session = outcome.session;

    let outcome = orch.handle_turn("next one please", &session).await.unwrap();
    session = outcome.session;
    assert_eq!(session.tracker().question_count(), 3);

    let outcome = orch
        .handle_turn("It keeps a value at a fixed address", &session)
        .await
        .unwrap();

    assert_eq!(outcome.action, TurnAction::InterviewEnded);
    assert!(outcome.session.is_ended());
    assert_eq!(outcome.session.tracker().score_history(), &[9.0, 9.0, 9.0]);
    let decision = outcome.session.tracker().should_terminate(Language::En);
    assert_eq!(decision.termination_type, Some(TerminationType::HighAccuracy));

    let summary = outcome.summary.unwrap();
    assert_eq!(summary.summary, "Strong fundamentals");
    assert!((summary.accuracy_rate - 90.0).abs() < 1e-9);
    assert!(outcome.response_text.contains("Strong fundamentals"));
    assert!(outcome.response_text.contains("Congratulations"));
    assert_eq!(provider.call_count(), 7);
}

#[tokio::test]
async fn test_five_solid_answers_end_with_sufficient_questions() {
    let provider = ScriptedProvider::texts(&[]);
    let orch = orchestrator(&provider);
    let mut session = InterviewSession::new(Language::Zh, bank_context());

    for i in 0..5 {
        provider.push_text(&question_json(&format!("题目 {}", i)));
        provider.push_text(&score_json(8.0));
        let opener = if i == 0 { "开始面试" } else { "下一题" };

        let outcome = orch.handle_turn(opener, &session).await.unwrap();
        assert_eq!(outcome.action, TurnAction::QuestionIssued);
        session = outcome.session;

        if i == 4 {
            provider.push_text("总结：表现稳定");
        }
        let outcome = orch
            .handle_turn("所有权保证内存安全", &session)
            .await
            .unwrap();
        session = outcome.session;

        if i < 4 {
            assert_eq!(outcome.action, TurnAction::AnswerScored);
        } else {
            assert_eq!(outcome.action, TurnAction::InterviewEnded);
            // Undecodable summary falls back to the raw text
            assert!(outcome.response_text.contains("总结：表现稳定"));
        }
    }

    let decision = session.tracker().should_terminate(Language::Zh);
    assert_eq!(
        decision.termination_type,
        Some(TerminationType::SufficientQuestions)
    );
    assert!(session.is_ended());
}

#[tokio::test]
async fn test_weak_answers_end_at_max_questions() {
    let provider = ScriptedProvider::texts(&[]);
    let orch = orchestrator(&provider);
    let mut session = InterviewSession::new(Language::En, bank_context());

    for i in 0..8 {
        provider.push_text(&question_json(&format!("Question {}", i)));
        provider.push_text(&score_json(5.0));
        let outcome = orch.handle_turn("Next", &session).await.unwrap();
        session = outcome.session;

        if i == 7 {
            provider.push_text(r#"{"summary": "Keep practicing"}"#);
        }
        let outcome = orch
            .handle_turn("I would use a mutex there", &session)
            .await
            .unwrap();
        session = outcome.session;
        assert_eq!(outcome.action == TurnAction::InterviewEnded, i == 7);
    }

    assert_eq!(
        session.tracker().should_terminate(Language::En).termination_type,
        Some(TerminationType::MaxQuestions)
    );
}

// ============================================================================
// Other turn kinds
// ============================================================================

#[tokio::test]
async fn test_help_then_answer_scores_open_question() {
    let q1 = question_json("What is ownership?");
    let score = score_json(6.0);
    let provider = ScriptedProvider::texts(&[q1.as_str(), "Think about scope and drop.", score.as_str()]);
    let orch = orchestrator(&provider);
    let session = InterviewSession::new(Language::En, bank_context());

    let session = orch.handle_turn("start", &session).await.unwrap().session;
    let outcome = orch.handle_turn("I'm not sure, any hint?", &session).await.unwrap();
    assert_eq!(outcome.action, TurnAction::HelpGiven);
    assert_eq!(outcome.response_text, "Think about scope and drop.");
    assert!(outcome.session.tracker().score_history().is_empty());

    let outcome = orch
        .handle_turn("Values are dropped when the owner leaves scope", &outcome.session)
        .await
        .unwrap();
    assert_eq!(outcome.action, TurnAction::AnswerScored);
    assert_eq!(outcome.session.tracker().score_history(), &[6.0]);

    // Scoring prompt carries the open question and the answer
    let prompts = provider.user_prompts();
    assert!(prompts[2].contains("What is ownership?"));
    assert!(prompts[2].contains("Values are dropped when the owner leaves scope"));
}

#[tokio::test]
async fn test_synthesized_question_without_bank() {
    let provider = ScriptedProvider::texts(&["请介绍一个你解决过的线上故障。"]);
    let orch = orchestrator(&provider);
    let session = InterviewSession::new(
        Language::Zh,
        InterviewContext::default().with_job_description("后端工程师"),
    );

    let outcome = orch.handle_turn("开始", &session).await.unwrap();
    assert_eq!(outcome.response_text, "请介绍一个你解决过的线上故障。");
    assert!(provider.user_prompts()[0].contains("后端工程师"));
}

#[tokio::test]
async fn test_repeated_question_replaced_by_fallback() {
    let q1 = question_json("What is ownership?");
    let score = score_json(7.0);
    let provider = ScriptedProvider::texts(&[q1.as_str(), score.as_str(), q1.as_str()]);
    let orch = orchestrator(&provider);
    let session = InterviewSession::new(Language::En, bank_context());

    let session = orch.handle_turn("start", &session).await.unwrap().session;
    let session = orch
        .handle_turn("Single owner semantics", &session)
        .await
        .unwrap()
        .session;
    let outcome = orch.handle_turn("next", &session).await.unwrap();

    assert_eq!(
        outcome.response_text,
        "Based on the question bank, please answer a question about general."
    );
    assert_eq!(outcome.session.tracker().question_count(), 2);
    assert_eq!(outcome.session.tracker().used_questions().len(), 2);
}

#[tokio::test]
async fn test_skipped_question_is_not_scored_twice() {
    let q1 = question_json("What is ownership?");
    let q2 = question_json("What is borrowing?");
    let score = score_json(3.0);
    let provider = ScriptedProvider::texts(&[
        q1.as_str(),
        q2.as_str(),
        score.as_str(),
        "Glad it helped.",
    ]);
    let orch = orchestrator(&provider);
    let session = InterviewSession::new(Language::En, bank_context());

    let session = orch.handle_turn("start", &session).await.unwrap().session;
    let session = orch.handle_turn("skip, next", &session).await.unwrap().session;
    assert_eq!(session.open_question(), Some("What is borrowing?"));

    let outcome = orch
        .handle_turn("You lend a reference without moving", &session)
        .await
        .unwrap();
    assert_eq!(outcome.action, TurnAction::AnswerScored);
    assert_eq!(outcome.session.open_question(), None);
    assert_eq!(outcome.session.tracker().score_history(), &[3.0]);

    let outcome = orch
        .handle_turn("Thanks, that makes sense", &outcome.session)
        .await
        .unwrap();
    assert_eq!(outcome.action, TurnAction::Conversation);
    assert_eq!(outcome.response_text, "Glad it helped.");
    assert_eq!(outcome.session.tracker().score_history(), &[3.0]);
    assert_eq!(outcome.session.tracker().question_count(), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_failed_scoring_leaves_session_untouched() {
    let q1 = question_json("What is ownership?");
    let provider = ScriptedProvider::texts(&[q1.as_str()]);
    let orch = orchestrator(&provider);
    let session = InterviewSession::new(Language::En, bank_context());
    let session = orch.handle_turn("start", &session).await.unwrap().session;
    let before = session.clone();

    provider.push(Err(LlmError::AuthenticationFailed {
        message: "invalid key".to_string(),
    }));
    let err = orch
        .handle_turn("Each value has a single owner", &session)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Generation(_)));
    assert_eq!(session, before);

    // The same answer succeeds once the service recovers
    provider.push_text(&score_json(8.0));
    let outcome = orch
        .handle_turn("Each value has a single owner", &session)
        .await
        .unwrap();
    assert_eq!(outcome.session.tracker().score_history(), &[8.0]);
}

#[tokio::test]
async fn test_failed_summary_keeps_round_open() {
    let provider = ScriptedProvider::texts(&[]);
    let orch = orchestrator(&provider);
    let mut session = InterviewSession::new(Language::En, bank_context());

    for i in 0..3 {
        provider.push_text(&question_json(&format!("Question {}", i)));
        session = orch.handle_turn("next", &session).await.unwrap().session;
        provider.push_text(&score_json(10.0));
        if i == 2 {
            provider.push(Err(LlmError::NetworkError {
                message: "reset".to_string(),
            }));
        }
        let result = orch.handle_turn("A complete answer", &session).await;
        if i < 2 {
            session = result.unwrap().session;
        } else {
            assert!(result.unwrap_err().is_generation_failure());
        }
    }

    assert!(!session.is_ended());
    assert_eq!(session.tracker().score_history().len(), 2);
}
