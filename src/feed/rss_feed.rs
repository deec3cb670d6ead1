use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::article::Article;
use crate::constant::UNTITLED;

use super::FeedSource;

pub struct RssFeed {
    client: Client,
    url: String,
}

impl RssFeed {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl FeedSource for RssFeed {
    fn source(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        let rss = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to request feed {}", self.url))?
            .error_for_status()?
            .bytes()
            .await?;

        parse_channel(&rss[..]).with_context(|| format!("Failed to parse feed {}", self.url))
    }
}

/// Reads an RSS channel into articles, skipping items without a usable link.
pub fn parse_channel(content: &[u8]) -> Result<Vec<Article>> {
    let channel = rss::Channel::read_from(content)?;
    tracing::debug!(
        "Feed {} has {} items",
        channel.title(),
        channel.items().len()
    );

    let mut articles = Vec::with_capacity(channel.items().len());
    for item in channel.items() {
        let title = item.title().unwrap_or(UNTITLED).trim();

        let Some(link) = item.link() else {
            tracing::warn!("Skipping feed item without link: {}", title);
            continue;
        };
        let link = match Url::parse(link.trim()) {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!("Skipping feed item {} with invalid link {}: {}", title, link, e);
                continue;
            }
        };

        let pub_date = item.pub_date().unwrap_or_default();
        articles.push(Article::new(title, link, pub_date));
    }

    Ok(articles)
}
