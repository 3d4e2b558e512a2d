//! Leitura das abas da planilha
//!
//! `SnapshotSource` devolve as linhas cruas de um intervalo (primeira linha
//! = cabeçalho). Produção usa a API de valores do Google Sheets; execuções
//! locais usam um JSON com o mesmo formato.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::settings::SheetsSettings;
use crate::utils::{AppError, AppResult};

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Linhas do intervalo; vazio quando a aba não tem nada
    async fn fetch(&self, sheet: &str, range: &str) -> AppResult<Vec<Vec<String>>>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Células numéricas/booleanas viram texto; o resto da normalização é do extrator
fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn into_rows(values: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    values
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect()
}

/// Cliente da API `spreadsheets.values.get`
#[derive(Clone)]
pub struct SheetsSource {
    http_client: HttpClient,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsSource {
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        })
    }

    pub fn from_settings(settings: &SheetsSettings) -> AppResult<Self> {
        let spreadsheet_id = settings
            .spreadsheet_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("sheets.spreadsheet_id não configurado".to_string()))?;
        let access_token = settings
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("SHEETS_ACCESS_TOKEN não configurado".to_string()))?;

        Self::new(settings.base_url.clone(), spreadsheet_id, access_token)
    }

    /// `{base}/v4/spreadsheets/{id}/values/{aba!intervalo}`
    pub fn values_url(&self, sheet: &str, range: &str) -> String {
        let a1 = format!("{}!{}", sheet, range);
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(&a1)
        )
    }
}

#[async_trait]
impl SnapshotSource for SheetsSource {
    async fn fetch(&self, sheet: &str, range: &str) -> AppResult<Vec<Vec<String>>> {
        let url = self.values_url(sheet, range);
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::SheetsApi {
                status: status.as_u16(),
                message,
            });
        }

        let body: ValueRange = response.json().await?;
        Ok(into_rows(body.values))
    }
}

/// Snapshot salvo em disco: `{"Report": [[...], ...], "Deu chegada": [...]}`
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self, sheet: &str, _range: &str) -> AppResult<Vec<Vec<String>>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut sheets: HashMap<String, Vec<Vec<Value>>> = serde_json::from_str(&content)?;

        Ok(sheets.remove(sheet).map(into_rows).unwrap_or_default())
    }
}
