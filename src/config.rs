use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use std::str::FromStr;
use std::time::Duration;

use crate::constant::*;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum LlmConfig {
    OpenAi {
        api_key: String,
        api_base: Option<String>,
        chat_model: String,
    },
    Azure {
        api_key: String,
        endpoint: String,
        api_version: String,
        chat_model: String,
    },
}

impl LlmConfig {
    pub fn chat_model(&self) -> &str {
        match self {
            LlmConfig::OpenAi { chat_model, .. } => chat_model,
            LlmConfig::Azure { chat_model, .. } => chat_model,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    pub deepl_api_key: String,
    pub deepl_api_url: String,
    pub target_lang: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    // Feed configuration
    pub feed_url: String,
    pub recent_hours: i64,

    // Completion service
    pub llm: LlmConfig,
    pub summary_words: u32,

    // Optional stages
    pub translation: Option<TranslationConfig>,
    pub webhook_url: Option<String>,

    pub http_timeout_secs: u64,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| anyhow!("{key} is not set"));

        let feed_url = required("FEED_URL")?;
        let recent_hours = parse_or("RECENT_HOURS", var("RECENT_HOURS"), DEFAULT_RECENT_HOURS)?;
        if recent_hours <= 0 {
            anyhow::bail!("RECENT_HOURS must be positive");
        }
        if chrono::Duration::try_hours(recent_hours).is_none() {
            anyhow::bail!("RECENT_HOURS is out of range");
        }

        let azure = (
            var("AZURE_OPENAI_API_KEY"),
            var("AZURE_OPENAI_ENDPOINT"),
            var("AZURE_OPENAI_API_VERSION"),
            var("AZURE_OPENAI_CHAT_MODEL"),
        );
        let llm = match azure {
            (Some(api_key), Some(endpoint), Some(api_version), Some(chat_model)) => {
                LlmConfig::Azure {
                    api_key,
                    endpoint,
                    api_version,
                    chat_model,
                }
            }
            _ => LlmConfig::OpenAi {
                api_key: required("OPENAI_API_KEY")?,
                api_base: var("OPENAI_API_BASE"),
                chat_model: var("OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.into()),
            },
        };
        let summary_words =
            parse_or("SUMMARY_WORDS", var("SUMMARY_WORDS"), DEFAULT_SUMMARY_WORDS)?;

        let translation = var("DEEPL_API_KEY").map(|deepl_api_key| TranslationConfig {
            deepl_api_key,
            deepl_api_url: var("DEEPL_API_URL").unwrap_or_else(|| DEFAULT_DEEPL_API_URL.into()),
            target_lang: var("TARGET_LANG").unwrap_or_else(|| DEFAULT_TARGET_LANG.into()),
        });
        let webhook_url = var("WEBHOOK_URL");

        let http_timeout_secs = parse_or(
            "HTTP_TIMEOUT_SECS",
            var("HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;

        Ok(Config {
            feed_url,
            recent_hours,
            llm,
            summary_words,
            translation,
            webhook_url,
            http_timeout_secs,
        })
    }

    pub fn recent_window(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.recent_hours).unwrap_or(chrono::Duration::MAX)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}

/// Printed to stderr when required settings are missing.
pub const USAGE: &str = "Required environment variables:
  FEED_URL            RSS feed to summarize
  OPENAI_API_KEY      OpenAI API key (or set all AZURE_OPENAI_* variables)
Optional:
  DEEPL_API_KEY       enables translation of summaries into TARGET_LANG
  WEBHOOK_URL         delivers each summary to a chat webhook
Variables may also be placed in a .env file.";
