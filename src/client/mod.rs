//! Cliente do Togglr.
//!
//! Orquestra o pipeline de avaliação:
//! - consulta o cache por `flag_key:fingerprint`
//! - em caso de miss, chama o serviço remoto com timeout, retry e backoff
//! - grava o resultado no cache e devolve um [`EvalResult`](crate::EvalResult)

mod evaluate;
mod health;

use std::sync::Arc;

use crate::cache::{CacheStats, EvaluationCache};
use crate::metrics::{Metrics, NoopMetrics};
use crate::remote::{RemoteEvaluator, RemoteOutcome};
use crate::retry::{AttemptOutcome, Backoff, CallContext, RetryExecutor};
use crate::types::config::Config;
use crate::{TogglrError, TogglrResult};

/// Cliente de avaliação de feature flags.
///
/// Seguro para uso concorrente: compartilhe uma instância (por exemplo em um
/// `Arc`) entre tarefas. Configuração e cache são fixados na construção.
pub struct Client {
    config: Config,
    remote: Arc<dyn RemoteEvaluator>,
    cache: Option<EvaluationCache>,
    executor: RetryExecutor,
    metrics: Arc<dyn Metrics>,
}

impl Client {
    /// Cria um novo cliente.
    ///
    /// Falha com [`TogglrError::Config`] se a configuração for inválida.
    pub fn new(config: Config, remote: Arc<dyn RemoteEvaluator>) -> TogglrResult<Self> {
        config.validate()?;

        let cache = config
            .cache
            .enabled
            .then(|| EvaluationCache::new(config.cache.size, config.cache.ttl()));
        let executor = RetryExecutor::new(config.retries, Backoff::from(&config.backoff));

        tracing::debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            retries = config.retries,
            cache_enabled = config.cache.enabled,
            "Client created"
        );

        Ok(Self {
            config,
            remote,
            cache,
            executor,
            metrics: Arc::new(NoopMetrics),
        })
    }

    /// Define o coletor de métricas.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Configuração em uso.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Estatísticas do cache, se habilitado.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(EvaluationCache::stats)
    }

    /// Verifica se o serviço remoto está no ar. Uma única tentativa, sem retry.
    pub async fn health_check(&self, ctx: &CallContext) -> TogglrResult<()> {
        let call_ctx = ctx.with_timeout(self.config.timeout());

        match call_ctx.run(self.remote.health_check(&call_ctx)).await? {
            RemoteOutcome::NotFound => Err(TogglrError::UnexpectedResponse(
                "health endpoint not found".to_string(),
            )),
            outcome => match outcome.into_attempt() {
                AttemptOutcome::Done(result) => result.map(|_| ()),
                AttemptOutcome::Retry(err) => Err(err),
            },
        }
    }

    /// Encerra o cliente, descartando o cache.
    pub fn close(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
        tracing::debug!("Client closed");
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("retries", &self.executor.retries())
            .field("backoff", self.executor.backoff())
            .field("cache", &self.cache_stats())
            .finish_non_exhaustive()
    }
}
