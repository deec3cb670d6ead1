use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A feed entry as handed over by a [`FeedSource`](crate::feed::FeedSource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: Url,
    /// Raw publish timestamp exactly as the feed carried it.
    pub pub_date: String,
}

impl Article {
    pub fn new(title: impl Into<String>, link: Url, pub_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link,
            pub_date: pub_date.into(),
        }
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        parse_pub_date(&self.pub_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizedArticle {
    pub title: String,
    pub link: Url,
    pub published: Option<DateTime<Utc>>,
    /// `None` when the summarization request for this article failed.
    pub summary: Option<String>,
}

impl SummarizedArticle {
    pub fn new(article: Article, summary: Option<String>) -> Self {
        let published = article.published();
        Self {
            title: article.title,
            link: article.link,
            published,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedArticle {
    pub title: String,
    pub link: Url,
    pub published: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    /// Target language code, set only when `summary` holds a translation.
    pub translated_to: Option<String>,
}

impl FinalizedArticle {
    pub fn translated(article: SummarizedArticle, text: String, lang: &str) -> Self {
        Self {
            summary: Some(text),
            translated_to: Some(lang.to_string()),
            ..Self::from(article)
        }
    }

    pub fn is_translated(&self) -> bool {
        self.translated_to.is_some()
    }
}

impl From<SummarizedArticle> for FinalizedArticle {
    fn from(article: SummarizedArticle) -> Self {
        Self {
            title: article.title,
            link: article.link,
            published: article.published,
            summary: article.summary,
            translated_to: None,
        }
    }
}

impl std::fmt::Display for FinalizedArticle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.link)?;
        match &self.summary {
            Some(summary) => write!(f, "{}", summary.trim()),
            None => write!(f, "(summary unavailable)"),
        }
    }
}

/// Parses an RSS `pubDate` (RFC 2822), falling back to RFC 3339.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|date| date.with_timezone(&Utc))
        .ok()
}
