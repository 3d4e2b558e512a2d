//! Uma execução do relatório: ler abas, classificar, enviar

use chrono::NaiveDateTime;
use std::sync::Arc;

use super::notifier::Notifier;
use super::report::build_messages;
use super::retry::RetryPolicy;
use super::sheets::SnapshotSource;
use crate::config::{ReportConfig, Settings};
use crate::models::Snapshot;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

/// Aba + intervalo A1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub range: String,
}

impl SheetRange {
    pub fn new(sheet: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            range: range.into(),
        }
    }
}

/// Resultado de uma execução bem-sucedida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    NothingToReport,
    Sent { parts: usize },
}

pub struct ReportJob {
    source: Arc<dyn SnapshotSource>,
    notifier: Arc<dyn Notifier>,
    report: SheetRange,
    arrivals: Option<SheetRange>,
    config: ReportConfig,
    retry: RetryPolicy,
}

impl ReportJob {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        notifier: Arc<dyn Notifier>,
        report: SheetRange,
        config: ReportConfig,
    ) -> Self {
        Self {
            source,
            notifier,
            report,
            arrivals: None,
            config,
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_settings(
        settings: &Settings,
        source: Arc<dyn SnapshotSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let sheets = &settings.sheets;
        let arrivals = sheets
            .arrivals_sheet
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| SheetRange::new(name, sheets.arrivals_range.clone()));

        Self::new(
            source,
            notifier,
            SheetRange::new(sheets.report_sheet.clone(), sheets.report_range.clone()),
            settings.report_config(),
        )
        .with_arrivals(arrivals)
        .with_retry(RetryPolicy::from_settings(&settings.retry))
    }

    pub fn with_arrivals(mut self, arrivals: Option<SheetRange>) -> Self {
        self.arrivals = arrivals;
        self
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn run(&self, now: NaiveDateTime) -> AppResult<RunOutcome> {
        log_job_started(&now.format("%d/%m/%Y %H:%M").to_string());

        let report = self.load(&self.report).await?;
        let arrivals = match &self.arrivals {
            Some(range) => Some(self.load(range).await?),
            None => None,
        };

        let messages = match build_messages(&report, arrivals.as_ref(), now, &self.config) {
            Ok(messages) => messages,
            Err(err @ AppError::MissingColumn { .. }) => {
                self.report_failure(&err).await;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        if messages.is_empty() {
            log_nothing_to_report();
            return Ok(RunOutcome::NothingToReport);
        }

        let total = messages.len();
        for (i, message) in messages.iter().enumerate() {
            self.retry
                .run("Envio ao webhook", || self.notifier.send(message))
                .await?;
            log_report_sent(i + 1, total, message.chars().count());
        }

        Ok(RunOutcome::Sent { parts: total })
    }

    /// Lê uma aba com novas tentativas; só cabeçalho (ou nada) conta como
    /// falha e, esgotadas as tentativas, vira snapshot vazio
    async fn load(&self, target: &SheetRange) -> AppResult<Snapshot> {
        let what = format!("Leitura da aba '{}'", target.sheet);
        let attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            match self.source.fetch(&target.sheet, &target.range).await {
                Ok(rows) if rows.len() > 1 => {
                    let snapshot = Snapshot::from_values(target.sheet.clone(), rows);
                    log_snapshot_loaded(snapshot.sheet(), snapshot.rows().len());
                    return Ok(snapshot);
                }
                Ok(rows) if attempt >= attempts => {
                    log_snapshot_empty(&target.sheet);
                    return Ok(Snapshot::from_values(target.sheet.clone(), rows));
                }
                Ok(_) => {
                    log_fetch_attempt_failed(&what, attempt, attempts, "aba sem linhas de dados");
                }
                Err(e) if !e.is_retryable() || attempt >= attempts => return Err(e),
                Err(e) => {
                    log_fetch_attempt_failed(&what, attempt, attempts, &e.to_string());
                }
            }

            tokio::time::sleep(self.retry.delay_after(attempt)).await;
            attempt += 1;
        }
    }

    /// Avisa o grupo que o relatório não saiu (melhor esforço)
    async fn report_failure(&self, err: &AppError) {
        let text = format!("⚠️ Relatório de pátio não gerado: {}", err);
        if let Err(send_err) = self.notifier.send(&text).await {
            log_error(&format!("❌ Falha ao avisar erro no webhook: {}", send_err));
        }
    }
}
