//! Scripted completion provider for integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use interview_coach_llm::{LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message};

/// Returns predefined responses in order and records every prompt.
pub struct ScriptedProvider {
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<LlmResult<LlmResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn texts(texts: &[&str]) -> Arc<Self> {
        Self::new(
            texts
                .iter()
                .map(|t| Ok(LlmResponse::from_text(*t, "scripted")))
                .collect(),
        )
    }

    pub fn push(&self, response: LlmResult<LlmResponse>) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn push_text(&self, text: &str) {
        self.push(Ok(LlmResponse::from_text(text, "scripted")));
    }

    /// Last user message of every request, in order.
    pub fn user_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter_map(|messages| messages.last().map(|m| m.content.clone()))
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.prompts.lock().unwrap().push(messages);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(LlmError::Other {
                message: "script exhausted".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }
}

pub fn question_json(question: &str) -> String {
    serde_json::json!({
        "questions": [{"question": question, "type": "technical", "difficulty": "medium"}],
        "totalQuestions": 1
    })
    .to_string()
}

pub fn score_json(score: f64) -> String {
    serde_json::json!({
        "score": score,
        "feedback": format!("Scored {}", score),
        "guidance": "",
        "needsImprovement": score < 7.0
    })
    .to_string()
}
