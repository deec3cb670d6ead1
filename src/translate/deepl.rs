use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Translate, TranslateError};

#[derive(Debug, Serialize, Deserialize)]
pub struct DeeplResponse {
    pub translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeeplTranslation {
    #[serde(default)]
    pub detected_source_language: Option<String>,
    pub text: String,
}

/// DeepL `/v2/translate` client.
///
/// HTTP 456 is DeepL's "quota exceeded" answer and surfaces as
/// [`TranslateError::Status`] like any other non-2xx status.
pub struct DeeplTranslator {
    client: Client,
    api_url: String,
    api_key: String,
}

impl DeeplTranslator {
    pub fn new(client: Client, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Translate for DeeplTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("DeepL-Auth-Key {}", self.api_key))
            .form(&[("text", text), ("target_lang", target_lang)])
            .send()
            .await
            .map_err(TranslateError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(TranslateError::UnreadableBody)?;
        parse_translation(&body)
    }
}

fn parse_translation(body: &[u8]) -> Result<String, TranslateError> {
    let response: DeeplResponse = serde_json::from_slice(body)?;
    let translation = response
        .translations
        .into_iter()
        .next()
        .ok_or(TranslateError::Empty)?;

    if let Some(source) = &translation.detected_source_language {
        tracing::debug!("DeepL detected source language {}", source);
    }
    if translation.text.trim().is_empty() {
        return Err(TranslateError::Empty);
    }
    Ok(translation.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::{unreachable_url, MockServer};

    fn translator(url: &str) -> DeeplTranslator {
        DeeplTranslator::new(Client::new(), format!("{url}/v2/translate"), "test-key")
    }

    #[tokio::test]
    async fn test_translate_success() {
        let server = MockServer::respond(
            200,
            "application/json",
            r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"}]}"#,
        )
        .await;

        let text = translator(&server.url).translate("hello", "DE").await.unwrap();
        assert_eq!(text, "Hallo");

        let request = server.request().await;
        assert!(request.starts_with("POST /v2/translate "));
        assert!(request
            .to_lowercase()
            .contains("authorization: deepl-auth-key test-key"));
        assert!(request.ends_with("text=hello&target_lang=DE"));
    }

    #[tokio::test]
    async fn test_quota_exceeded_status() {
        let server = MockServer::respond(
            456,
            "application/json",
            r#"{"message":"Quota Exceeded"}"#,
        )
        .await;

        let err = translator(&server.url)
            .translate("hello", "DE")
            .await
            .unwrap_err();
        match err {
            TranslateError::Status { status, body } => {
                assert_eq!(status, 456);
                assert!(body.contains("Quota Exceeded"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_truncated_body_is_unreadable() {
        let raw = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\nconnection: close\r\n\r\n{\"transl"
            .to_string();
        let server = MockServer::respond_raw(raw).await;

        let err = translator(&server.url)
            .translate("hello", "DE")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::UnreadableBody(_)), "{err}");
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::respond(200, "text/html", "<html>maintenance</html>").await;

        let err = translator(&server.url)
            .translate("hello", "DE")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Malformed(_)), "{err}");
    }

    #[tokio::test]
    async fn test_no_translations_is_empty() {
        let server = MockServer::respond(200, "application/json", r#"{"translations":[]}"#).await;

        let err = translator(&server.url)
            .translate("hello", "DE")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Empty));
    }

    #[tokio::test]
    async fn test_blank_text_is_empty() {
        let server = MockServer::respond(
            200,
            "application/json",
            r#"{"translations":[{"detected_source_language":"EN","text":"  "}]}"#,
        )
        .await;

        let err = translator(&server.url)
            .translate("hello", "DE")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Empty));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let url = unreachable_url().await;

        let err = translator(&url).translate("hello", "DE").await.unwrap_err();
        assert!(matches!(err, TranslateError::Transport(_)), "{err}");
    }
}
