pub mod deepl;

use async_trait::async_trait;
use futures::future::join_all;

use std::sync::Arc;

use crate::article::{FinalizedArticle, SummarizedArticle};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Non-2xx answer; `body` is whatever diagnostic the service sent back.
    #[error("translation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("translation request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("translation response body could not be read: {0}")]
    UnreadableBody(#[source] reqwest::Error),
    #[error("translation response is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("translation service returned no text")]
    Empty,
}

#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}

pub struct Translator {
    backend: Arc<dyn Translate>,
    target_lang: String,
}

impl Translator {
    pub fn new(backend: Arc<dyn Translate>, target_lang: impl Into<String>) -> Self {
        Self {
            backend,
            target_lang: target_lang.into(),
        }
    }

    /// Translates every present summary concurrently.
    ///
    /// Articles without a summary pass through untouched, and a failed
    /// translation keeps the original summary.
    pub async fn translate(&self, articles: Vec<SummarizedArticle>) -> Vec<FinalizedArticle> {
        tracing::info!(
            "Translating {} summaries into {}",
            articles.iter().filter(|a| a.summary.is_some()).count(),
            self.target_lang
        );

        join_all(articles.into_iter().map(|article| self.translate_one(article))).await
    }

    async fn translate_one(&self, article: SummarizedArticle) -> FinalizedArticle {
        let Some(summary) = article.summary.as_deref() else {
            return article.into();
        };

        let translated = self.backend.translate(summary, &self.target_lang).await;
        match translated {
            Ok(text) => FinalizedArticle::translated(article, text, &self.target_lang),
            Err(e) => {
                tracing::warn!(
                    "Failed to translate summary of \"{}\", keeping original: {}",
                    article.title,
                    e
                );
                article.into()
            }
        }
    }
}
