//! Nova tentativa com espera linear para os colaboradores de I/O

use std::future::Future;
use std::time::Duration;

use crate::config::settings::RetrySettings;
use crate::utils::logging::log_fetch_attempt_failed;
use crate::utils::AppResult;

/// Tentativas limitadas; a espera depois da tentativa `n` é `n * base_delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(settings.attempts, Duration::from_secs(settings.delay_seconds))
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Executa `op` até dar certo, até um erro não recuperável ou até
    /// esgotar as tentativas (o último erro é devolvido)
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() || attempt >= self.attempts => return Err(e),
                Err(e) => {
                    log_fetch_attempt_failed(what, attempt, self.attempts, &e.to_string());
                    tokio::time::sleep(self.delay_after(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> AppError {
        AppError::SheetsApi {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    #[test]
    fn test_linear_delay() {
        let policy = RetryPolicy::new(3, Duration::from_secs(3));
        assert_eq!(policy.delay_after(1), Duration::from_secs(3));
        assert_eq!(policy.delay_after(2), Duration::from_secs(6));
    }

    #[test]
    fn test_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts(), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result = policy
            .run("leitura", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(transient())
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_last_attempt() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(2, Duration::ZERO);

        let result: AppResult<()> = policy
            .run("envio", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_structural_error_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(5, Duration::ZERO);

        let result: AppResult<()> = policy
            .run("leitura", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::MissingColumn {
                    sheet: "Report".to_string(),
                    field: "status".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(AppError::MissingColumn { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
