//! Contexto de chamada: cancelamento e prazo.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{TogglrError, TogglrResult};

/// Escopo de cancelamento e prazo de uma chamada.
///
/// Contextos derivados com [`with_timeout`](Self::with_timeout) herdam o
/// cancelamento do pai e ficam com o prazo mais curto entre o do pai e o
/// novo. Cancelar um filho não afeta o pai.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Cria um contexto sem prazo e não cancelado.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cria um contexto controlado por um token externo.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Define um prazo absoluto, mantendo o anterior se for mais cedo.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(earliest(self.deadline, deadline));
        self
    }

    /// Deriva um contexto filho limitado por `timeout` a partir de agora.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now()
            .checked_add(timeout)
            .map(|d| earliest(self.deadline, d))
            .or(self.deadline);

        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    /// Cancela este contexto e todos os seus filhos.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Retorna o erro do contexto, se já foi cancelado ou passou do prazo.
    pub fn err(&self) -> Option<TogglrError> {
        if self.token.is_cancelled() {
            return Some(TogglrError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TogglrError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolve quando o contexto é cancelado ou o prazo expira.
    pub async fn done(&self) -> TogglrError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => TogglrError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => TogglrError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                TogglrError::Cancelled
            }
        }
    }

    /// Executa `fut` até terminar ou até o contexto encerrar.
    pub async fn run<F: Future>(&self, fut: F) -> TogglrResult<F::Output> {
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            output = fut => Ok(output),
        }
    }
}

fn earliest(current: Option<Instant>, candidate: Instant) -> Instant {
    match current {
        Some(current) if current < candidate => current,
        _ => candidate,
    }
}
