//! Avaliação de flags.

use tokio::time::Instant;

use super::Client;
use crate::cache::EvaluationCache;
use crate::retry::CallContext;
use crate::types::requests::RequestContext;
use crate::types::result::EvalResult;
use crate::{TogglrError, TogglrResult};

impl Client {
    /// Avalia uma flag para o contexto dado.
    ///
    /// Nunca falha: erros ficam em [`EvalResult::err`]. Um acerto de cache
    /// não passa pela rede e portanto nunca carrega erro. Flag inexistente é
    /// um resultado válido com `found() == false`.
    pub async fn evaluate(
        &self,
        ctx: &CallContext,
        flag_key: &str,
        attrs: &RequestContext,
    ) -> EvalResult {
        let start = Instant::now();
        self.metrics.inc_evaluate_request();

        let cache_key = match &self.cache {
            Some(cache) => {
                let key = EvaluationCache::cache_key(flag_key, attrs);
                if let Some(entry) = cache.get(&key) {
                    self.metrics.inc_cache_hit();
                    tracing::debug!(flag_key, cache_key = %key, "Cache hit");
                    return EvalResult::new(flag_key, entry.value, entry.enabled, entry.found);
                }
                self.metrics.inc_cache_miss();
                Some(key)
            }
            None => None,
        };

        let call_ctx = ctx.with_timeout(self.config.timeout());
        let remote = self.remote.as_ref();
        let attempt_ctx = &call_ctx;

        let outcome = self
            .executor
            .run(&call_ctx, "evaluate", |_| async move {
                remote
                    .evaluate(attempt_ctx, flag_key, attrs)
                    .await
                    .into_attempt()
            })
            .await;

        self.metrics.observe_evaluate_latency(start.elapsed());

        match outcome {
            Ok(payload) => {
                let (value, enabled, found) = match payload {
                    Some(payload) => (payload.value, payload.enabled, true),
                    None => (String::new(), false, false),
                };

                if let (Some(cache), Some(key)) = (&self.cache, cache_key) {
                    cache.set(key, value.clone(), enabled, found);
                }

                EvalResult::new(flag_key, value, enabled, found)
            }
            Err(err) => {
                self.metrics.inc_evaluate_error(err.code());
                tracing::debug!(flag_key, error = %err, "Evaluation failed");
                EvalResult::failed(flag_key, err)
            }
        }
    }

    /// Verifica se uma flag está habilitada.
    ///
    /// Diferente de [`evaluate`](Self::evaluate), flag inexistente vira
    /// [`TogglrError::FeatureNotFound`].
    pub async fn is_enabled(
        &self,
        ctx: &CallContext,
        flag_key: &str,
        attrs: &RequestContext,
    ) -> TogglrResult<bool> {
        let result = self.evaluate(ctx, flag_key, attrs).await;

        if let Some(err) = result.err() {
            return Err(err.clone());
        }
        if !result.found() {
            return Err(TogglrError::FeatureNotFound(flag_key.to_string()));
        }
        Ok(result.enabled())
    }

    /// Como [`is_enabled`](Self::is_enabled), mas devolve `default` em
    /// qualquer erro (registrando um aviso).
    pub async fn is_enabled_or_default(
        &self,
        ctx: &CallContext,
        flag_key: &str,
        attrs: &RequestContext,
        default: bool,
    ) -> bool {
        match self.is_enabled(ctx, flag_key, attrs).await {
            Ok(enabled) => enabled,
            Err(err) => {
                tracing::warn!(flag_key, error = %err, default, "Evaluation failed, using default");
                default
            }
        }
    }
}
