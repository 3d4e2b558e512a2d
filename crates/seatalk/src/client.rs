//! Cliente HTTP para o webhook do SeaTalk

use crate::error::{Result, SeaTalkError};
use reqwest::{Client as HttpClient, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Corpo enviado ao webhook: `{"tag": "text", "text": {"format": 1, "content": "..."}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextMessage {
    pub tag: String,
    pub text: TextContent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextContent {
    /// 1 = markdown, 2 = texto puro
    pub format: u8,
    pub content: String,
}

impl TextMessage {
    pub fn markdown(content: impl Into<String>) -> Self {
        Self {
            tag: "text".to_string(),
            text: TextContent {
                format: 1,
                content: content.into(),
            },
        }
    }

    /// Envolve o texto num bloco ```diff (linhas com "- " ficam destacadas)
    pub fn diff_block(body: &str) -> Self {
        Self::markdown(format!("```diff\n{}\n```", body))
    }
}

/// Resposta do webhook. `code == 0` significa sucesso.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

/// Cliente do webhook de grupo
///
/// # Timeouts
///
/// - Total: 30s
/// - Connect: 5s
#[derive(Clone)]
pub struct SeaTalkClient {
    http_client: HttpClient,
    webhook_url: String,
}

impl SeaTalkClient {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        Self::with_timeouts(webhook_url, 30, 5)
    }

    pub fn with_timeouts(
        webhook_url: impl Into<String>,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let webhook_url = webhook_url.into();
        if webhook_url.trim().is_empty() {
            return Err(SeaTalkError::ConfigError("webhook URL vazia".to_string()));
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(total_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| SeaTalkError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            webhook_url,
        })
    }

    /// Envia o texto dentro de um bloco ```diff
    pub async fn send_diff_text(&self, body: &str) -> Result<WebhookResponse> {
        self.send(&TextMessage::diff_block(body)).await
    }

    /// Envia uma mensagem já montada
    pub async fn send(&self, message: &TextMessage) -> Result<WebhookResponse> {
        tracing::debug!(
            "POST {} ({} chars)",
            self.webhook_url,
            message.text.content.chars().count()
        );

        let response = self
            .http_client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .json(message)
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        let body = response.text().await?;

        // Algumas versões do webhook devolvem corpo vazio com 200
        let parsed: WebhookResponse = if body.trim().is_empty() {
            WebhookResponse::default()
        } else {
            serde_json::from_str(&body)?
        };

        if parsed.code != 0 {
            return Err(SeaTalkError::Rejected {
                code: parsed.code,
                message: parsed.message.unwrap_or_default(),
            });
        }

        Ok(parsed)
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!("SeaTalk webhook error ({}): {}", status_code, message);

        Err(SeaTalkError::ApiError {
            status: status_code,
            message,
        })
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}
