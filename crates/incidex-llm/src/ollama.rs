//! Ollama completion client.
//!
//! One long-lived `reqwest::Client` (and its connection pool) is shared by all
//! in-flight requests. The configured model is checked once via `/api/tags`
//! and pulled on demand before the first generation.

use async_trait::async_trait;
use incidex_core::error::excerpt;
use incidex_core::{Error, Result};
use reqwest::{Client, Response};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::client::CompletionClient;
use crate::config::OllamaConfig;
use crate::types::{GenerateOptions, GenerateRequest, GenerateResponse, PullRequest, TagsResponse};

pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
    model_ready: OnceCell<()>,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            model_ready: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Make sure the configured model is available, pulling it if needed.
    /// Succeeds at most once per client; concurrent callers wait on the same check.
    pub async fn ensure_model_ready(&self) -> Result<()> {
        self.model_ready
            .get_or_try_init(|| async {
                let models = self.list_models().await?;
                if models.iter().any(|name| name.contains(&self.config.model)) {
                    debug!("Model {} already available", self.config.model);
                    return Ok(());
                }
                self.pull_model().await
            })
            .await
            .map(|_| ())
            .map_err(|e| {
                error!("Failed to ensure model is ready: {}", e);
                e
            })
    }

    /// Names of the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = self.config.endpoint("/api/tags");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Model listing failed: {}", e)))?;
        let tags: TagsResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Backend(format!("Invalid model listing: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn pull_model(&self) -> Result<()> {
        info!("Downloading model {}", self.config.model);
        let url = self.config.endpoint("/api/pull");
        let response = self
            .client
            .post(&url)
            .timeout(self.config.pull_timeout())
            .json(&PullRequest {
                name: &self.config.model,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Model pull failed: {}", e)))?;
        check_status(response).await?;
        info!("Model {} downloaded", self.config.model);
        Ok(())
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.ensure_model_ready().await?;

        let url = self.config.endpoint("/api/generate");
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        };

        info!(model = %self.config.model, url = %url, "Sending request to Ollama");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("HTTP error communicating with Ollama: {}", e);
                Error::Backend(format!("Request failed: {}", e))
            })?;

        let parsed: GenerateResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Backend(format!("Invalid JSON response: {}", e)))?;

        let content = parsed
            .response
            .ok_or_else(|| Error::Backend("Invalid response format from Ollama".into()))?
            .trim()
            .to_string();

        info!(content_length = content.len(), "Received response from Ollama");
        Ok(content)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Backend(format!("API error {}: {}", status, excerpt(&body))))
}
