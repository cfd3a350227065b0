use crate::embeddings::check_status;
use crate::error::ChatError;
use crate::models::{ConversationTurn, GeminiConfig, TurnRole};
use crate::traits::ChatModel;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Completion client for the hosted Gemini `generateContent` endpoint.
/// Temperature is pinned to zero so answers are nominally deterministic
/// for identical inputs.
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/{}:generateContent?key={}",
            self.config.api_base, self.config.generation_model, self.config.api_key
        )
    }
}

fn turn_role(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "user",
        TurnRole::Assistant => "model",
    }
}

fn build_contents(history: &[ConversationTurn], user_message: &str) -> Vec<Value> {
    let mut contents = history
        .iter()
        .map(|turn| {
            json!({
                "role": turn_role(turn.role),
                "parts": [{ "text": turn.text }],
            })
        })
        .collect::<Vec<_>>();

    contents.push(json!({
        "role": "user",
        "parts": [{ "text": user_message }],
    }));

    contents
}

fn parse_answer(value: &Value) -> Result<String, ChatError> {
    value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ChatError::Generation("model returned no candidate text".to_string()))
}

#[async_trait]
impl ChatModel for GeminiGenerator {
    async fn complete(
        &self,
        system_instruction: &str,
        history: &[ConversationTurn],
        user_message: &str,
    ) -> Result<String, ChatError> {
        let payload = json!({
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "contents": build_contents(history, user_message),
            "generationConfig": { "temperature": 0.0 },
        });

        let response = self
            .client
            .post(self.generate_url())
            .json(&payload)
            .send()
            .await?;
        check_status("gemini-generation", &response)?;

        let parsed: Value = response.json().await?;
        parse_answer(&parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_maps_to_user_and_model_roles() {
        let history = vec![
            ConversationTurn::user("Do you have pizza?"),
            ConversationTurn::assistant("Yes, thirty one kinds."),
        ];

        let contents = build_contents(&history, "Which is cheapest?");
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "Which is cheapest?");
    }

    #[test]
    fn candidate_text_is_extracted() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "  We open at noon. " }] } }]
        });
        let answer = parse_answer(&payload).expect("candidate present");
        assert_eq!(answer, "We open at noon.");
    }

    #[test]
    fn missing_candidates_are_a_generation_error() {
        let payload = json!({ "candidates": [] });
        assert!(matches!(
            parse_answer(&payload),
            Err(ChatError::Generation(_))
        ));
    }
}
