use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};

use std::io::Write;
use std::sync::Arc;

use crate::article::FinalizedArticle;
use crate::client::http_client;
use crate::config::Config;
use crate::constant::DEFAULT_RECENT_HOURS;
use crate::feed::rss_feed::RssFeed;
use crate::feed::{recent_articles, FeedSource};
use crate::llm::openai::completion_client;
use crate::notify::webhook::WebhookNotifier;
use crate::notify::{notify_all, Notify};
use crate::summarizer::Summarizer;
use crate::translate::deepl::DeeplTranslator;
use crate::translate::Translator;

/// Counts for one run of the pipeline.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    pub fetched: usize,
    pub recent: usize,
    pub summarized: usize,
    pub summary_failures: usize,
    pub translated: usize,
    pub translation_fallbacks: usize,
    /// `None` when no webhook is configured.
    pub delivered: Option<usize>,
}

pub struct Pipeline {
    feed: Box<dyn FeedSource>,
    summarizer: Summarizer,
    translator: Option<Translator>,
    notifier: Option<Box<dyn Notify>>,
    recent_window: Duration,
}

impl Pipeline {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http_client(config.http_timeout())?;
        tracing::info!("Using chat model {}", config.llm.chat_model());

        let mut builder = PipelineBuilder::new()
            .with_feed(RssFeed::new(client.clone(), config.feed_url.clone()))
            .with_summarizer(Summarizer::new(
                completion_client(&config.llm),
                config.summary_words,
            ))
            .with_recent_window(config.recent_window());

        if let Some(translation) = &config.translation {
            let deepl = DeeplTranslator::new(
                client.clone(),
                translation.deepl_api_url.clone(),
                translation.deepl_api_key.clone(),
            );
            builder = builder.with_translator(Translator::new(
                Arc::new(deepl),
                translation.target_lang.clone(),
            ));
        }

        match &config.webhook_url {
            Some(url) => builder = builder.with_notifier(WebhookNotifier::new(client, url.clone())),
            None => tracing::warn!("WEBHOOK_URL is not set, summaries will only be printed"),
        }

        builder.build()
    }

    /// Fetch, filter, summarize, translate, print and deliver.
    ///
    /// Fails when the feed cannot be fetched, when the summarization batch
    /// breaks down, or when any webhook delivery fails. Individual summary and
    /// translation failures only degrade the affected article.
    pub async fn run_once(&self, now: DateTime<Utc>, out: &mut impl Write) -> Result<RunReport> {
        let mut report = RunReport::default();

        tracing::info!("Fetching feed {}", self.feed.source());
        let entries = self.feed.fetch().await.context("Failed to fetch feed")?;
        report.fetched = entries.len();

        let recent = recent_articles(now, entries, self.recent_window);
        report.recent = recent.len();
        tracing::info!(
            "{} of {} entries published in the last {} hours",
            report.recent,
            report.fetched,
            self.recent_window.num_hours()
        );
        if recent.is_empty() {
            writeln!(out, "No recent articles.")?;
            return Ok(report);
        }

        let summarized = self
            .summarizer
            .summarize(recent)
            .await
            .context("Summarization failed")?;
        report.summarized = summarized.iter().filter(|a| a.summary.is_some()).count();
        report.summary_failures = summarized.len() - report.summarized;

        let finalized: Vec<FinalizedArticle> = match &self.translator {
            Some(translator) => {
                let finalized = translator.translate(summarized).await;
                report.translated = finalized.iter().filter(|a| a.is_translated()).count();
                report.translation_fallbacks = report.summarized - report.translated;
                finalized
            }
            None => summarized.into_iter().map(FinalizedArticle::from).collect(),
        };

        for article in &finalized {
            writeln!(out, "{}\n", article)?;
        }
        out.flush()?;

        if let Some(notifier) = &self.notifier {
            let delivered = notify_all(notifier.as_ref(), &finalized).await?;
            report.delivered = Some(delivered);
        }

        tracing::info!(
            fetched = report.fetched,
            recent = report.recent,
            summarized = report.summarized,
            summary_failures = report.summary_failures,
            translated = report.translated,
            translation_fallbacks = report.translation_fallbacks,
            delivered = ?report.delivered,
            "Run completed"
        );
        Ok(report)
    }
}

pub struct PipelineBuilder {
    feed: Option<Box<dyn FeedSource>>,
    summarizer: Option<Summarizer>,
    translator: Option<Translator>,
    notifier: Option<Box<dyn Notify>>,
    recent_window: Duration,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            feed: None,
            summarizer: None,
            translator: None,
            notifier: None,
            recent_window: Duration::hours(DEFAULT_RECENT_HOURS),
        }
    }

    pub fn build(self) -> Result<Pipeline> {
        Ok(Pipeline {
            feed: self.feed.ok_or(anyhow!("Pipeline needs a feed"))?,
            summarizer: self.summarizer.ok_or(anyhow!("Pipeline needs a summarizer"))?,
            translator: self.translator,
            notifier: self.notifier,
            recent_window: self.recent_window,
        })
    }

    pub fn with_feed(mut self, feed: impl FeedSource + 'static) -> Self {
        self.feed = Some(Box::new(feed));
        self
    }

    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notify + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn with_recent_window(mut self, window: Duration) -> Self {
        self.recent_window = window;
        self
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
