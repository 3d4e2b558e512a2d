use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::columns::{ColumnAliases, Field};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub sheets: SheetsSettings,
    pub webhook: WebhookSettings,
    pub report: ReportSettings,
    pub retry: RetrySettings,
    /// Overrides de aliases por campo; o resto vem de `ColumnAliases::default()`
    #[serde(default)]
    pub columns: HashMap<Field, Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SheetsSettings {
    pub base_url: String,
    pub spreadsheet_id: Option<String>,
    /// Bearer token obtido fora do job (service account, gcloud, ...)
    pub access_token: Option<String>,
    pub report_sheet: String,
    pub report_range: String,
    /// Aba "Deu chegada"; ausente desliga a seção de confirmações
    pub arrivals_sheet: Option<String>,
    pub arrivals_range: String,
    /// Snapshot JSON local (`{"Report": [[...]], ...}`) no lugar da API
    pub snapshot_file: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WebhookSettings {
    pub url: Option<String>,
    pub max_message_chars: usize,
    /// Só loga as mensagens, não envia
    pub dry_run: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportSettings {
    pub overdue_minutes: i64,
    pub arrival_min_minutes: i64,
    pub utc_offset_hours: i32,
    pub include_pending: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetrySettings {
    pub attempts: u32,
    pub delay_seconds: u64,
}

/// Parte da configuração que o núcleo de classificação enxerga
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub columns: ColumnAliases,
    pub overdue_minutes: i64,
    pub arrival_min_minutes: i64,
    pub include_pending: bool,
    pub max_message_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnAliases::default(),
            overdue_minutes: 120,
            arrival_min_minutes: 10,
            include_pending: true,
            max_message_chars: 4000,
        }
    }
}

impl ReportSettings {
    /// Hora civil local (UTC + offset fixo, padrão São Paulo -3h)
    pub fn local_now(&self) -> NaiveDateTime {
        let offset = FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());
        Utc::now().with_timezone(&offset).naive_local()
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("sheets.base_url", "https://sheets.googleapis.com")?
            .set_default("sheets.report_sheet", "Report")?
            .set_default("sheets.report_range", "A1:L8000")?
            .set_default("sheets.arrivals_sheet", "Deu chegada")?
            .set_default("sheets.arrivals_range", "A1:F1000")?
            .set_default("webhook.max_message_chars", 4000)?
            .set_default("webhook.dry_run", false)?
            .set_default("report.overdue_minutes", 120)?
            .set_default("report.arrival_min_minutes", 10)?
            .set_default("report.utc_offset_hours", -3)?
            .set_default("report.include_pending", true)?
            .set_default("retry.attempts", 3)?
            .set_default("retry.delay_seconds", 3)?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Nomes de variáveis já usados no deploy
        if let Ok(url) = std::env::var("SEATALK_WEBHOOK_URL") {
            builder = builder.set_override("webhook.url", url)?;
        }
        if let Ok(token) = std::env::var("SHEETS_ACCESS_TOKEN") {
            builder = builder.set_override("sheets.access_token", token)?;
        }
        if let Ok(id) = std::env::var("SPREADSHEET_ID") {
            builder = builder.set_override("sheets.spreadsheet_id", id)?;
        }

        builder = builder.add_source(
            Environment::with_prefix("PATIO_REPORT")
                .separator("__")
                .try_parsing(true),
        );

        let s = builder.build()?;

        s.try_deserialize()
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            columns: ColumnAliases::default().with_overrides(self.columns.clone()),
            overdue_minutes: self.report.overdue_minutes,
            arrival_min_minutes: self.report.arrival_min_minutes,
            include_pending: self.report.include_pending,
            max_message_chars: self.webhook.max_message_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_files() {
        let settings = Settings::new().expect("defaults must deserialize");
        assert_eq!(settings.sheets.report_sheet, "Report");
        assert_eq!(settings.sheets.report_range, "A1:L8000");
        assert_eq!(settings.retry.attempts, 3);
        assert_eq!(settings.report.utc_offset_hours, -3);
    }

    #[test]
    fn test_report_config_applies_column_overrides() {
        let mut settings = Settings::new().unwrap();
        settings.columns.insert(Field::Dock, vec!["Doca Atual".to_string()]);
        settings.report.overdue_minutes = 90;

        let config = settings.report_config();
        assert_eq!(config.columns.get(Field::Dock), &["Doca Atual".to_string()]);
        assert_eq!(config.overdue_minutes, 90);
        assert_eq!(config.max_message_chars, 4000);
    }
}
