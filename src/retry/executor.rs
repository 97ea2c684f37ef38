//! Executor de chamadas com retry e backoff.

use std::future::Future;

use super::backoff::Backoff;
use super::context::CallContext;
use crate::{TogglrError, TogglrResult};

/// Resultado de uma única tentativa.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome<T> {
    /// Resultado terminal: sucesso ou erro definitivo. Encerra o loop.
    Done(TogglrResult<T>),

    /// Falha elegível para nova tentativa (rede, timeout de transporte).
    Retry(TogglrError),
}

/// Executa uma chamada lógica em até `retries + 1` tentativas.
///
/// Entre tentativas espera `backoff.delay(n)`, sempre concorrendo com o
/// cancelamento/prazo do contexto. Erros de cancelamento nunca são
/// repetidos. O executor não guarda estado entre chamadas.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    retries: u32,
    backoff: Backoff,
}

impl RetryExecutor {
    /// Cria um novo executor.
    pub fn new(retries: u32, backoff: Backoff) -> Self {
        Self { retries, backoff }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Executa `attempt` até obter um resultado terminal ou esgotar as tentativas.
    ///
    /// `attempt` recebe o índice da tentativa (0 = primeira). Cada tentativa
    /// também é abandonada se o contexto encerrar enquanto ela está em curso.
    /// Ao esgotar as tentativas, retorna o último erro observado.
    pub async fn run<T, F, Fut>(
        &self,
        ctx: &CallContext,
        operation: &str,
        mut attempt: F,
    ) -> TogglrResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = AttemptOutcome<T>>,
    {
        let mut last_err = None;

        for attempt_no in 0..=self.retries {
            if attempt_no > 0 {
                let delay = self.backoff.delay(attempt_no);
                tracing::debug!(
                    operation,
                    attempt = attempt_no,
                    delay_ms = delay.as_millis() as u64,
                    "Waiting before retry"
                );

                tokio::select! {
                    biased;
                    err = ctx.done() => {
                        tracing::debug!(operation, error = %err, "Context closed during backoff");
                        return Err(err);
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            match ctx.run(attempt(attempt_no)).await? {
                AttemptOutcome::Done(result) => return result,
                AttemptOutcome::Retry(err) if err.is_cancellation() => return Err(err),
                AttemptOutcome::Retry(err) => {
                    tracing::debug!(
                        operation,
                        attempt = attempt_no,
                        error = %err,
                        "Attempt failed with retryable error"
                    );
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            TogglrError::UnexpectedResponse(format!("{operation}: no attempt was made"))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn executor(retries: u32) -> RetryExecutor {
        RetryExecutor::new(
            retries,
            Backoff::new(Duration::from_millis(100), Duration::from_secs(2), 2.0),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);

        let result = executor(3)
            .run(&CallContext::new(), "test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { AttemptOutcome::Done(Ok("ok")) }
            })
            .await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_retries_and_returns_last_error() {
        let calls = AtomicU32::new(0);

        let result: TogglrResult<()> = executor(2)
            .run(&CallContext::new(), "test", |n| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { AttemptOutcome::Retry(TogglrError::transport(format!("attempt {n}"))) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result, Err(TogglrError::transport("attempt 2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let calls = AtomicU32::new(0);

        let result: TogglrResult<()> = executor(0)
            .run(&CallContext::new(), "test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { AttemptOutcome::Retry(TogglrError::transport("down")) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_stops_immediately() {
        let calls = AtomicU32::new(0);

        let result: TogglrResult<()> = executor(5)
            .run(&CallContext::new(), "test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { AttemptOutcome::Done(Err(TogglrError::Unauthorized)) }
            })
            .await;

        assert_eq!(result, Err(TogglrError::Unauthorized));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let result = executor(3)
            .run(&CallContext::new(), "test", |n| async move {
                if n < 2 {
                    AttemptOutcome::Retry(TogglrError::transport("reset"))
                } else {
                    AttemptOutcome::Done(Ok(n))
                }
            })
            .await;

        assert_eq!(result, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_follow_backoff_schedule() {
        let executor = executor(3);
        let expected: Duration = (1..=executor.retries())
            .map(|n| executor.backoff().delay(n))
            .sum();
        assert_eq!(expected, Duration::from_millis(700));

        let start = tokio::time::Instant::now();
        let _: TogglrResult<()> = executor
            .run(&CallContext::new(), "test", |_| async {
                AttemptOutcome::Retry(TogglrError::transport("down"))
            })
            .await;

        let elapsed = start.elapsed();
        assert!(elapsed >= expected);
        assert!(elapsed < expected + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_backoff_stops_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let ctx = CallContext::new();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let counter = Arc::clone(&calls);
        let result: TogglrResult<()> = executor(5)
            .run(&ctx, "test", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { AttemptOutcome::Retry(TogglrError::transport("down")) }
            })
            .await;

        assert_eq!(result, Err(TogglrError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_during_backoff() {
        let calls = AtomicU32::new(0);
        let ctx = CallContext::new().with_timeout(Duration::from_millis(150));

        let result: TogglrResult<()> = executor(5)
            .run(&ctx, "test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { AttemptOutcome::Retry(TogglrError::transport("down")) }
            })
            .await;

        // Tentativa 0, espera 100ms, tentativa 1, prazo expira durante a espera de 200ms
        assert_eq!(result, Err(TogglrError::DeadlineExceeded));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_error_from_attempt_is_terminal() {
        let calls = AtomicU32::new(0);

        let result: TogglrResult<()> = executor(5)
            .run(&CallContext::new(), "test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { AttemptOutcome::Retry(TogglrError::Cancelled) }
            })
            .await;

        assert_eq!(result, Err(TogglrError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_is_abandoned_at_deadline() {
        let ctx = CallContext::new().with_timeout(Duration::from_millis(300));

        let result: TogglrResult<()> = executor(2)
            .run(&ctx, "test", |_| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                AttemptOutcome::Done(Ok(()))
            })
            .await;

        assert_eq!(result, Err(TogglrError::DeadlineExceeded));
    }
}
