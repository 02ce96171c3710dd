use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::Resolver;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/ask";

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned HTTP {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response has no answer")]
    EmptyAnswer,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    #[serde(default)]
    answer: Option<String>,
}

/// Client for the remote `/ask` endpoint.
#[derive(Clone)]
pub struct AskClient {
    client: Client,
    endpoint: String,
}

impl AskClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn ask(&self, query: &str) -> Result<String, AnswerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AskRequest { query })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnswerError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let parsed: AskResponse = serde_json::from_slice(&body)?;
        match parsed.answer {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Err(AnswerError::EmptyAnswer),
        }
    }
}

/// Anything that can answer a chat query. Implementations never fail; they
/// degrade to a local answer instead.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn get_answer(&self, query: &str) -> String;
}

/// Remote endpoint first, local resolver on any failure.
#[derive(Clone)]
pub struct AnswerService {
    client: AskClient,
    resolver: Resolver,
}

impl AnswerService {
    pub fn new(client: AskClient, resolver: Resolver) -> Self {
        Self { client, resolver }
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self::new(AskClient::new(endpoint), Resolver::default())
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

#[async_trait]
impl AnswerSource for AnswerService {
    async fn get_answer(&self, query: &str) -> String {
        match self.client.ask(query).await {
            Ok(answer) => {
                tracing::debug!(endpoint = self.client.endpoint(), "remote answer received");
                answer
            }
            Err(e) => {
                tracing::warn!(endpoint = self.client.endpoint(), error = %e, "falling back to local answers");
                self.resolver.resolve(query)
            }
        }
    }
}

/// Resolver-only source for offline runs.
#[derive(Clone, Default)]
pub struct LocalAnswers {
    resolver: Resolver,
}

impl LocalAnswers {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl AnswerSource for LocalAnswers {
    async fn get_answer(&self, query: &str) -> String {
        self.resolver.resolve(query)
    }
}
