use anyhow::Result;
use async_openai::{
    config::{AzureConfig, Config as ClientConfig, OpenAIConfig},
    types::{ChatCompletionRequestMessageArgs, CreateChatCompletionRequestArgs, Role},
    Client,
};
use async_trait::async_trait;

use std::sync::Arc;

use crate::config::LlmConfig;

use super::Completion;

pub struct OpenAiCompletion<C: ClientConfig> {
    client: Client<C>,
    model: String,
}

impl OpenAiCompletion<OpenAIConfig> {
    pub fn openai(api_key: &str, api_base: Option<&str>, model: impl Into<String>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = api_base {
            config = config.with_api_base(api_base);
        }

        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }
}

impl OpenAiCompletion<AzureConfig> {
    pub fn azure(api_key: &str, endpoint: &str, api_version: &str, model: impl Into<String>) -> Self {
        let model = model.into();
        let config = AzureConfig::new()
            .with_api_base(endpoint)
            .with_api_key(api_key)
            .with_api_version(api_version)
            .with_deployment_id(model.clone());

        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

/// Builds the completion client selected by the configuration.
pub fn completion_client(config: &LlmConfig) -> Arc<dyn Completion> {
    match config {
        LlmConfig::OpenAi {
            api_key,
            api_base,
            chat_model,
        } => Arc::new(OpenAiCompletion::openai(
            api_key,
            api_base.as_deref(),
            chat_model.clone(),
        )),
        LlmConfig::Azure {
            api_key,
            endpoint,
            api_version,
            chat_model,
        } => Arc::new(OpenAiCompletion::azure(
            api_key,
            endpoint,
            api_version,
            chat_model.clone(),
        )),
    }
}

#[async_trait]
impl<C> Completion for OpenAiCompletion<C>
where
    C: ClientConfig + Send + Sync,
{
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let req = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestMessageArgs::default()
                    .role(Role::System)
                    .content(system)
                    .build()?,
                ChatCompletionRequestMessageArgs::default()
                    .role(Role::User)
                    .content(user)
                    .build()?,
            ])
            .build()?;

        let resp = self.client.chat().create(req).await?;

        let content = resp
            .choices
            .first()
            .ok_or(anyhow::anyhow!("No response from LLM"))?
            .message
            .content
            .clone()
            .ok_or(anyhow::anyhow!("No content in response from LLM"))?;

        if content.trim().is_empty() {
            anyhow::bail!("Empty content in response from LLM");
        }

        Ok(content)
    }
}
