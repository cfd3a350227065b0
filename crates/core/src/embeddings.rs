use crate::error::ChatError;
use crate::models::GeminiConfig;
use crate::traits::Embedder;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Embedding client for the hosted Gemini `embedContent` endpoint.
pub struct GeminiEmbedder {
    client: Client,
    config: GeminiConfig,
}

impl GeminiEmbedder {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn embed_url(&self) -> String {
        format!(
            "{}/v1beta/{}:embedContent?key={}",
            self.config.api_base, self.config.embedding_model, self.config.api_key
        )
    }

    fn batch_url(&self) -> String {
        format!(
            "{}/v1beta/{}:batchEmbedContents?key={}",
            self.config.api_base, self.config.embedding_model, self.config.api_key
        )
    }
}

pub(crate) fn check_status(service: &str, response: &reqwest::Response) -> Result<(), ChatError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ChatError::RateLimited {
            service: service.to_string(),
            details: status.to_string(),
        });
    }
    if !status.is_success() {
        return Err(ChatError::BackendResponse {
            service: service.to_string(),
            details: status.to_string(),
        });
    }
    Ok(())
}

fn parse_values(value: &Value, pointer: &str) -> Result<Vec<f32>, ChatError> {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_f64)
                .map(|v| v as f32)
                .collect::<Vec<f32>>()
        })
        .filter(|vector| !vector.is_empty())
        .ok_or_else(|| ChatError::BackendResponse {
            service: "gemini-embedding".to_string(),
            details: format!("missing embedding values at {pointer}"),
        })
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ChatError> {
        let payload = json!({
            "model": self.config.embedding_model,
            "content": { "parts": [{ "text": text }] },
        });

        let response = self.client.post(self.embed_url()).json(&payload).send().await?;
        check_status("gemini-embedding", &response)?;

        let parsed: Value = response.json().await?;
        parse_values(&parsed, "/embedding/values")
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ChatError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let requests = texts
            .iter()
            .map(|text| {
                json!({
                    "model": self.config.embedding_model,
                    "content": { "parts": [{ "text": text }] },
                })
            })
            .collect::<Vec<_>>();

        let response = self
            .client
            .post(self.batch_url())
            .json(&json!({ "requests": requests }))
            .send()
            .await?;
        check_status("gemini-embedding", &response)?;

        let parsed: Value = response.json().await?;
        let embeddings = parsed
            .pointer("/embeddings")
            .and_then(Value::as_array)
            .ok_or_else(|| ChatError::BackendResponse {
                service: "gemini-embedding".to_string(),
                details: "missing embeddings array".to_string(),
            })?;

        if embeddings.len() != texts.len() {
            return Err(ChatError::BackendResponse {
                service: "gemini-embedding".to_string(),
                details: format!(
                    "requested {} embeddings, received {}",
                    texts.len(),
                    embeddings.len()
                ),
            });
        }

        embeddings
            .iter()
            .map(|entry| parse_values(entry, "/values"))
            .collect()
    }

    fn model_id(&self) -> &str {
        &self.config.embedding_model
    }
}

#[cfg(test)]
mod tests {
    use super::parse_values;
    use serde_json::json;

    #[test]
    fn embedding_values_are_extracted() {
        let payload = json!({ "embedding": { "values": [0.1, 0.2, 0.3] } });
        let vector = parse_values(&payload, "/embedding/values").expect("values present");
        assert_eq!(vector.len(), 3);
    }

    #[test]
    fn missing_values_are_a_backend_error() {
        let payload = json!({ "embedding": {} });
        assert!(parse_values(&payload, "/embedding/values").is_err());
    }

    #[test]
    fn empty_values_are_a_backend_error() {
        let payload = json!({ "embedding": { "values": [] } });
        assert!(parse_values(&payload, "/embedding/values").is_err());
    }
}
