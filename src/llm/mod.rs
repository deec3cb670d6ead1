pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

/// A chat-completion service answering one system instruction plus one user message.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
