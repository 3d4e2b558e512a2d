use std::fmt;

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    /// Coluna estrutural ausente: sem ela não dá para classificar a aba
    MissingColumn { sheet: String, field: String },
    SheetsApi { status: u16, message: String },
    NotifierError { message: String, transient: bool },
    JsonError(serde_json::Error),
    HttpError(reqwest::Error),
    IoError(std::io::Error),
    InternalError(String),
}

impl AppError {
    /// Falhas de rede/limite valem nova tentativa; erros de configuração e
    /// estrutura da planilha não.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::HttpError(_) => true,
            AppError::SheetsApi { status, .. } => *status == 429 || *status >= 500,
            AppError::NotifierError { transient, .. } => *transient,
            AppError::ConfigError(_)
            | AppError::MissingColumn { .. }
            | AppError::JsonError(_)
            | AppError::IoError(_)
            | AppError::InternalError(_) => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::MissingColumn { sheet, field } => write!(
                f,
                "Coluna obrigatória '{}' não encontrada na aba '{}'",
                field, sheet
            ),
            AppError::SheetsApi { status, message } => {
                write!(f, "Sheets API error (status {}): {}", status, message)
            }
            AppError::NotifierError { message, .. } => write!(f, "Notifier error: {}", message),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::HttpError(err) => write!(f, "HTTP error: {}", err),
            AppError::IoError(err) => write!(f, "IO error: {}", err),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::HttpError(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<seatalk::SeaTalkError> for AppError {
    fn from(err: seatalk::SeaTalkError) -> Self {
        AppError::NotifierError {
            transient: err.is_transient(),
            message: err.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
