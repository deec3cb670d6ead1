pub mod rss_feed;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::article::Article;

/// Produces the raw entries of a news feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Article>>;

    fn source(&self) -> &str;
}

/// Keeps the entries published strictly after `now - window`, in feed order.
///
/// Entries whose `pub_date` cannot be parsed are dropped. A window reaching
/// past the earliest representable date keeps every dated entry.
pub fn recent_articles(now: DateTime<Utc>, entries: Vec<Article>, window: Duration) -> Vec<Article> {
    let cutoff = now.checked_sub_signed(window);
    entries
        .into_iter()
        .filter(|entry| match entry.published() {
            Some(published) => cutoff.map_or(true, |cutoff| published > cutoff),
            None => {
                tracing::debug!("Unparsable pubDate {:?} for {}", entry.pub_date, entry.link);
                false
            }
        })
        .collect()
}
