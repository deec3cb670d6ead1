use anyhow::{Context, Result};
use futures::future::join_all;

use std::sync::Arc;

use crate::article::{Article, SummarizedArticle};
use crate::llm::Completion;

pub fn summary_instruction(words: u32) -> String {
    format!(
        "Summarize the news article at the URL the user sends in about {words} words. \
         Do not include the article title. Reply with the summary text only."
    )
}

pub struct Summarizer {
    completion: Arc<dyn Completion>,
    instruction: Arc<str>,
}

impl Summarizer {
    pub fn new(completion: Arc<dyn Completion>, words: u32) -> Self {
        Self {
            completion,
            instruction: summary_instruction(words).into(),
        }
    }

    /// Requests one summary per article, all at once, and waits for every request.
    ///
    /// A failed request leaves that article's `summary` as `None`; the error is
    /// only returned when a summarization task itself could not be joined.
    pub async fn summarize(&self, articles: Vec<Article>) -> Result<Vec<SummarizedArticle>> {
        if articles.is_empty() {
            return Ok(vec![]);
        }
        tracing::info!("Summarizing {} articles", articles.len());

        let tasks = articles.iter().map(|article| {
            let completion = Arc::clone(&self.completion);
            let instruction = Arc::clone(&self.instruction);
            let link = article.link.to_string();
            tokio::spawn(async move { completion.complete(&instruction, &link).await })
        });
        let outcomes = join_all(tasks).await;

        let mut summarized = Vec::with_capacity(articles.len());
        for (article, outcome) in articles.into_iter().zip(outcomes) {
            let summary = match outcome.with_context(|| {
                format!("Summarization task for {} did not complete", article.link)
            })? {
                Ok(summary) => Some(summary.trim().to_string()),
                Err(e) => {
                    tracing::warn!("Failed to summarize \"{}\": {:#}", article.title, e);
                    None
                }
            };
            summarized.push(SummarizedArticle::new(article, summary));
        }

        Ok(summarized)
    }
}
