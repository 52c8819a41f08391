use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::model_registry::ModelRegistry;
use crate::providers::{Provider, RateLimiter, RetryPolicy};

/// Hugging Face inference client running pretrained translation models
/// such as `Helsinki-NLP/opus-mt-en-de` by model id
#[derive(Debug)]
pub struct HuggingFace {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the inference API
    endpoint: String,
    /// Optional access token sent as a bearer token
    api_token: Option<String>,
    /// Retry behavior for transient failures
    retry: RetryPolicy,
    /// Client-side request spacing
    rate_limiter: RateLimiter,
}

/// Translation request for a single model
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest {
    /// Model to run; part of the URL, not of the body
    #[serde(skip)]
    pub model_id: String,
    /// Text to translate
    pub inputs: String,
    /// Generation parameters
    pub parameters: InferenceParameters,
    /// Service options
    pub options: InferenceOptions,
}

/// Generation parameters for translation models
#[derive(Debug, Clone, Serialize)]
pub struct InferenceParameters {
    /// Maximum length of the generated sequence
    pub max_length: usize,
}

/// Service options for the inference API
#[derive(Debug, Clone, Serialize)]
pub struct InferenceOptions {
    /// Block until a cold model is loaded instead of answering 503
    pub wait_for_model: bool,
}

/// One translated sequence
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationOutput {
    /// The translated text
    pub translation_text: String,
}

/// Response of a translation model: one output per input sequence
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct InferenceResponse {
    pub outputs: Vec<TranslationOutput>,
}

/// Error body returned by the inference API
#[derive(Debug, Deserialize)]
struct InferenceErrorBody {
    error: String,
    #[serde(default)]
    estimated_time: Option<f64>,
}

impl InferenceRequest {
    /// Create a translation request with the given length limit
    pub fn new(model_id: impl Into<String>, inputs: impl Into<String>, max_length: usize) -> Self {
        Self {
            model_id: model_id.into(),
            inputs: inputs.into(),
            parameters: InferenceParameters { max_length },
            options: InferenceOptions { wait_for_model: true },
        }
    }
}

impl HuggingFace {
    /// Create a new client
    pub fn new(
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
        timeout_secs: u64,
        retry: RetryPolicy,
        rate_limit: Option<u32>,
    ) -> Self {
        let api_token = api_token.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_token: if api_token.is_empty() { None } else { Some(api_token) },
            retry,
            rate_limiter: RateLimiter::new(rate_limit),
        }
    }

    /// URL of the inference route for a model
    pub fn model_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.endpoint, model_id)
    }

    async fn send_once(&self, request: &InferenceRequest) -> Result<InferenceResponse, ProviderError> {
        self.rate_limiter.acquire().await;

        let mut builder = self.client.post(self.model_url(&request.model_id)).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Hugging Face API error ({}): {}", status, body);
            return Err(Self::parse_error(status.as_u16(), &body));
        }

        Self::parse_response(&body)
    }

    /// Parse a successful response body
    pub fn parse_response(body: &str) -> Result<InferenceResponse, ProviderError> {
        serde_json::from_str::<InferenceResponse>(body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            ProviderError::ParseError(format!("{} (body: {})", e, preview))
        })
    }

    /// Map an error body onto a provider error, keeping the service's message
    pub fn parse_error(status_code: u16, body: &str) -> ProviderError {
        match serde_json::from_str::<InferenceErrorBody>(body) {
            Ok(error_body) => {
                let message = match error_body.estimated_time {
                    Some(seconds) => format!("{} (estimated time {:.0}s)", error_body.error, seconds),
                    None => error_body.error,
                };
                ProviderError::from_status(status_code, message)
            }
            Err(_) => ProviderError::from_status(status_code, body.to_string()),
        }
    }
}

#[async_trait]
impl Provider for HuggingFace {
    type Request = InferenceRequest;
    type Response = InferenceResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        debug!(
            "Hugging Face request to {} ({} chars, max_length {})",
            request.model_id,
            request.inputs.chars().count(),
            request.parameters.max_length
        );
        self.retry.run("Hugging Face", || self.send_once(&request)).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // The default pair's status route answers only when the token is accepted
        let model_id = ModelRegistry::builtin().default_entry().model_id;
        let mut builder = self.client.get(self.model_url(model_id));
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!("Hugging Face connection test failed ({}): {}", status, body);
        Err(Self::parse_error(status.as_u16(), &body))
    }

    fn extract_text(response: &Self::Response) -> String {
        response
            .outputs
            .iter()
            .map(|o| o.translation_text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
