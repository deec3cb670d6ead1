use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::article::FinalizedArticle;
use crate::constant::MAX_WEBHOOK_MESSAGE_CHARS;

use super::Notify;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts `{"content": ...}` to a chat webhook (Discord and compatible services).
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

/// Renders the article, capped at the webhook's message length.
pub fn format_message(article: &FinalizedArticle) -> String {
    let message = article.to_string();
    if message.chars().count() <= MAX_WEBHOOK_MESSAGE_CHARS {
        return message;
    }

    let end = message
        .char_indices()
        .nth(MAX_WEBHOOK_MESSAGE_CHARS - 1)
        .map_or(message.len(), |(index, _)| index);
    format!("{}…", &message[..end])
}

#[async_trait]
impl Notify for WebhookNotifier {
    async fn notify(&self, article: &FinalizedArticle) -> Result<()> {
        let message = format_message(article);
        self.client
            .post(&self.url)
            .json(&WebhookPayload { content: &message })
            .send()
            .await
            .context("Webhook request failed")?
            .error_for_status()?;

        tracing::debug!("Delivered \"{}\" to webhook", article.title);
        Ok(())
    }
}
