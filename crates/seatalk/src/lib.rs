//! Cliente mínimo do webhook de grupo do SeaTalk
//!
//! Só cobre o que o relatório de pátio usa: mensagens de texto com
//! formatação markdown (`format: 1`). O conteúdo é enviado dentro de um
//! bloco ```diff para que linhas iniciadas com `-` apareçam em vermelho.
//!
//! ```rust,ignore
//! use seatalk::SeaTalkClient;
//!
//! let client = SeaTalkClient::new(std::env::var("SEATALK_WEBHOOK_URL")?)?;
//! client.send_diff_text("- • LT123 | 07 | ...").await?;
//! ```

pub mod client;
pub mod error;

pub use client::{SeaTalkClient, TextMessage, WebhookResponse};
pub use error::{Result, SeaTalkError};
