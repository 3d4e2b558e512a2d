/// Relatório de pátio
///
/// Uma execução por chamada (cron / Cloud Scheduler):
/// - Lê as abas "Report" e "Deu chegada" da planilha
/// - Classifica as LHs em descarregando / em doca / em fila / deu chegada / pendentes
/// - Monta o texto, divide em partes e envia ao webhook do SeaTalk
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use patio_report::config::Settings;
use patio_report::services::{
    FileSource, LogNotifier, Notifier, ReportJob, RunOutcome, SeaTalkNotifier, SheetsSource,
    SnapshotSource,
};
use patio_report::utils::logging::*;
use patio_report::utils::AppError;

fn build_source(settings: &Settings) -> Result<Arc<dyn SnapshotSource>, AppError> {
    match settings.sheets.snapshot_file.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            log_info(&format!("📄 Lendo snapshot local: {}", path));
            Ok(Arc::new(FileSource::new(path)))
        }
        None => Ok(Arc::new(SheetsSource::from_settings(&settings.sheets)?)),
    }
}

fn build_notifier(settings: &Settings) -> Result<Arc<dyn Notifier>, AppError> {
    if settings.webhook.dry_run {
        log_warning("📝 Dry run: mensagens serão apenas logadas");
        return Ok(Arc::new(LogNotifier));
    }

    let url = settings
        .webhook
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::ConfigError("SEATALK_WEBHOOK_URL não configurada".to_string()))?;

    Ok(Arc::new(SeaTalkNotifier::from_url(url)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Em produção não existe .env, as variáveis vêm do ambiente
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        tracing::info!("✅ Arquivo .env carregado com sucesso");
    }

    let settings = Settings::new().context("Failed to load settings")?;
    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    let mut report_config = settings.report_config();
    if let Ok(path) = std::env::var("COLUMNS_CONFIG_PATH") {
        report_config.columns = report_config
            .columns
            .load_from_file(&path)
            .await
            .with_context(|| format!("Failed to load column aliases from {}", path))?;
        log_info(&format!("🗂️ Aliases de colunas carregados de {}", path));
    }

    let source = build_source(&settings)?;
    let notifier = build_notifier(&settings)?;
    let now = settings.report.local_now();

    let job = ReportJob::from_settings(&settings, source, notifier).with_config(report_config);

    match job.run(now).await {
        Ok(RunOutcome::Sent { parts }) => {
            log_info(&format!("🏁 Relatório enviado em {} parte(s)", parts));
            Ok(())
        }
        Ok(RunOutcome::NothingToReport) => Ok(()),
        Err(e) => {
            log_error(&format!("❌ Relatório de pátio falhou: {}", e));
            Err(e.into())
        }
    }
}
