use tracing::{debug, error, info, warn};

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_job_started(now: &str) {
    info!("🚀 Relatório de pátio iniciado (agora: {})", now);
}

pub fn log_snapshot_loaded(sheet: &str, rows: usize) {
    info!("📥 Aba '{}' carregada: {} linhas de dados", sheet, rows);
}

pub fn log_snapshot_empty(sheet: &str) {
    warn!("⚠️ Aba '{}' sem dados", sheet);
}

pub fn log_fetch_attempt_failed(what: &str, attempt: u32, max_attempts: u32, error: &str) {
    warn!(
        "🔄 {} falhou (tentativa {}/{}): {}",
        what, attempt, max_attempts, error
    );
}

pub fn log_buckets_summary(unloading: usize, at_dock: usize, queued: usize, arrivals: usize, pending: usize) {
    info!(
        "📊 Descarregando: {} | Em doca: {} | Em fila: {} | Deu chegada: {} | Pendentes: {}",
        unloading, at_dock, queued, arrivals, pending
    );
}

pub fn log_report_sent(part: usize, total: usize, chars: usize) {
    info!("✅ Mensagem {}/{} enviada ({} caracteres)", part, total, chars);
}

pub fn log_nothing_to_report() {
    info!("📭 Nada para reportar nesta execução");
}

pub fn log_row_skipped(trip_id: &str, reason: &str) {
    debug!("Linha ignorada: {} - {}", trip_id, reason);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
