/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which turns a model
 * pair and a text into a provider request and the provider's answer back
 * into plain translated text.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use std::time::Instant;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::model_registry::ModelEntry;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::huggingface::{HuggingFace, InferenceRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::{Provider, RetryPolicy};

use super::Translator;

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Hugging Face inference running the registry model ids
    HuggingFace {
        /// Client instance
        client: HuggingFace,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },

    /// In-process provider for tests and offline demos
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Translation service backed by one configured provider
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let retry = RetryPolicy::new(config.common.retry_count, config.common.retry_backoff_ms);
        let timeout_secs = config.get_timeout_secs();
        let rate_limit = config.get_rate_limit();

        let provider = match config.provider {
            ConfigTranslationProvider::HuggingFace => TranslationProviderImpl::HuggingFace {
                client: HuggingFace::new(
                    config.get_endpoint(),
                    config.get_api_key(),
                    timeout_secs,
                    retry,
                    rate_limit,
                ),
            },
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(config.get_endpoint(), timeout_secs, retry, rate_limit),
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(
                    config.get_api_key(),
                    config.get_endpoint(),
                    timeout_secs,
                    retry,
                    rate_limit,
                ),
            },
        };

        Ok(Self { provider, config })
    }

    /// Create a service over a mock provider
    pub fn with_mock(client: MockProvider) -> Self {
        Self {
            provider: TranslationProviderImpl::Mock { client },
            config: TranslationConfig::default(),
        }
    }

    /// Display name of the backing provider
    pub fn provider_name(&self) -> &str {
        match &self.provider {
            TranslationProviderImpl::Mock { .. } => "Mock",
            _ => self.config.provider.display_name(),
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        info!("Testing connection to {}", self.provider_name());
        match &self.provider {
            TranslationProviderImpl::HuggingFace { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
            TranslationProviderImpl::Mock { client } => client.test_connection().await,
        }
    }

    /// Translate a single text with a model pair
    pub async fn translate_text(
        &self,
        model: &ModelEntry,
        text: &str,
        max_length: usize,
    ) -> Result<String, TranslationError> {
        let start_time = Instant::now();
        let token_limit = u32::try_from(max_length).unwrap_or(u32::MAX);

        let raw = match &self.provider {
            TranslationProviderImpl::HuggingFace { client } => {
                let request = InferenceRequest::new(model.model_id, text, max_length);
                let response = client.complete(request).await?;
                HuggingFace::extract_text(&response)
            }
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(self.config.get_model(), text)
                    .system(self.system_prompt(model))
                    .temperature(self.config.common.temperature)
                    .num_predict(token_limit);
                let response = client.complete(request).await?;
                Ollama::extract_text(&response)
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(self.config.get_model(), token_limit)
                    .system(self.system_prompt(model))
                    .temperature(self.config.common.temperature)
                    .add_message("user", text);
                let response = client.complete(request).await?;
                Anthropic::extract_text(&response)
            }
            TranslationProviderImpl::Mock { client } => {
                let request = MockRequest {
                    text: text.to_string(),
                    model_id: model.model_id.to_string(),
                    max_length,
                };
                let response = client.complete(request).await?;
                MockProvider::extract_text(&response)
            }
        };

        let translated = raw.trim();
        if translated.is_empty() {
            return Err(TranslationError::EmptyResponse(model.label.to_string()));
        }

        debug!(
            "Translated {} chars with {} via {} in {:?}",
            text.chars().count(),
            model.label,
            self.provider_name(),
            start_time.elapsed()
        );

        Ok(translated.to_string())
    }

    fn system_prompt(&self, model: &ModelEntry) -> String {
        self.config
            .render_system_prompt(&model.source_language_name(), &model.target_language_name())
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        model: &ModelEntry,
        text: &str,
        max_length: usize,
    ) -> Result<String, TranslationError> {
        self.translate_text(model, text, max_length).await
    }

    fn describe(&self) -> String {
        match &self.provider {
            TranslationProviderImpl::HuggingFace { .. } => {
                format!("{} ({})", self.provider_name(), self.config.get_endpoint())
            }
            TranslationProviderImpl::Mock { .. } => self.provider_name().to_string(),
            _ => format!("{} model {}", self.provider_name(), self.config.get_model()),
        }
    }
}
