pub mod webhook;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;

use crate::article::FinalizedArticle;

/// Delivers a finished article to a chat channel.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify(&self, article: &FinalizedArticle) -> Result<()>;
}

/// Sends every article concurrently and waits for all deliveries.
///
/// Each failure is logged; the first one is returned once the batch is done.
/// Returns the number of successful deliveries.
pub async fn notify_all(notifier: &dyn Notify, articles: &[FinalizedArticle]) -> Result<usize> {
    let outcomes = join_all(articles.iter().map(|article| notifier.notify(article))).await;

    let mut delivered = 0;
    let mut first_error = None;
    for (article, outcome) in articles.iter().zip(outcomes) {
        match outcome {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::error!("Failed to deliver \"{}\": {:#}", article.title, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e.context(format!(
            "{} of {} deliveries failed",
            articles.len() - delivered,
            articles.len()
        ))),
        None => Ok(delivered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::anyhow;
    use std::sync::Mutex;
    use url::Url;

    struct MockNotify {
        failing: Vec<&'static str>,
        delivered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notify for MockNotify {
        async fn notify(&self, article: &FinalizedArticle) -> Result<()> {
            if self.failing.iter().any(|title| *title == article.title) {
                return Err(anyhow!("connection reset"));
            }
            self.delivered.lock().unwrap().push(article.title.clone());
            Ok(())
        }
    }

    fn finalized(title: &str) -> FinalizedArticle {
        FinalizedArticle {
            title: title.to_string(),
            link: Url::parse(&format!("http://x/{title}")).unwrap(),
            published: None,
            summary: Some(format!("summary {title}")),
            translated_to: None,
        }
    }

    #[tokio::test]
    async fn test_notify_all_delivers_everything() {
        let notifier = MockNotify {
            failing: vec![],
            delivered: Mutex::new(vec![]),
        };
        let articles = vec![finalized("a"), finalized("b")];

        let delivered = notify_all(&notifier, &articles).await.unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(notifier.delivered.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_notify_all_attempts_all_before_failing() {
        let notifier = MockNotify {
            failing: vec!["a"],
            delivered: Mutex::new(vec![]),
        };
        let articles = vec![finalized("a"), finalized("b"), finalized("c")];

        let err = notify_all(&notifier, &articles).await.unwrap_err();
        assert!(format!("{err:#}").contains("1 of 3 deliveries failed"));
        assert!(format!("{err:#}").contains("connection reset"));
        assert_eq!(*notifier.delivered.lock().unwrap(), vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_notify_all_empty() {
        let notifier = MockNotify {
            failing: vec![],
            delivered: Mutex::new(vec![]),
        };
        assert_eq!(notify_all(&notifier, &[]).await.unwrap(), 0);
    }
}
