//! Tipos de erro para o crate seatalk

use thiserror::Error;

/// Erros do cliente SeaTalk
#[derive(Debug, Error)]
pub enum SeaTalkError {
    /// Erro de requisição HTTP
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Webhook respondeu com status não-2xx
    #[error("SeaTalk webhook error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Webhook respondeu 200 mas com `code` diferente de zero
    #[error("SeaTalk rejected message (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SeaTalkError {
    /// Erros de rede e 5xx/429 valem uma nova tentativa; o resto não
    pub fn is_transient(&self) -> bool {
        match self {
            SeaTalkError::HttpError(_) => true,
            SeaTalkError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, SeaTalkError>;
