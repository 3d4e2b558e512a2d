//! Entrega das mensagens prontas

use async_trait::async_trait;
use seatalk::SeaTalkClient;

use crate::utils::AppResult;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Envia uma parte do relatório (texto já dividido)
    async fn send(&self, text: &str) -> AppResult<()>;
}

/// Webhook de grupo do SeaTalk (bloco ```diff)
pub struct SeaTalkNotifier {
    client: SeaTalkClient,
}

impl SeaTalkNotifier {
    pub fn new(client: SeaTalkClient) -> Self {
        Self { client }
    }

    pub fn from_url(webhook_url: &str) -> AppResult<Self> {
        Ok(Self::new(SeaTalkClient::new(webhook_url)?))
    }
}

#[async_trait]
impl Notifier for SeaTalkNotifier {
    async fn send(&self, text: &str) -> AppResult<()> {
        self.client.send_diff_text(text).await?;
        Ok(())
    }
}

/// Dry run: só registra o texto no log
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> AppResult<()> {
        tracing::info!("📝 [dry-run] mensagem ({} caracteres):\n{}", text.chars().count(), text);
        Ok(())
    }
}
