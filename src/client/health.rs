//! Saúde de features.

use tokio::time::Instant;

use super::Client;
use crate::retry::CallContext;
use crate::types::responses::FeatureHealth;
use crate::{TogglrError, TogglrResult};

impl Client {
    /// Consulta o estado de saúde de uma feature.
    ///
    /// Usa o mesmo timeout e retry da avaliação. Aqui a ausência da feature
    /// é o erro [`TogglrError::FeatureNotFound`].
    pub async fn feature_health(
        &self,
        ctx: &CallContext,
        flag_key: &str,
    ) -> TogglrResult<FeatureHealth> {
        let start = Instant::now();
        self.metrics.inc_feature_health_request();

        let call_ctx = ctx.with_timeout(self.config.timeout());
        let remote = self.remote.as_ref();
        let attempt_ctx = &call_ctx;

        let result = self
            .executor
            .run(&call_ctx, "feature_health", |_| async move {
                remote.feature_health(attempt_ctx, flag_key).await.into_attempt()
            })
            .await
            .and_then(|health| health.ok_or_else(|| TogglrError::FeatureNotFound(flag_key.to_string())));

        self.metrics.observe_feature_health_latency(start.elapsed());
        if let Err(err) = &result {
            self.metrics.inc_feature_health_error(err.code());
            tracing::debug!(flag_key, error = %err, "Feature health request failed");
        }

        result
    }

    /// Saudável = habilitada e não desabilitada automaticamente.
    pub async fn is_feature_healthy(&self, ctx: &CallContext, flag_key: &str) -> TogglrResult<bool> {
        Ok(self.feature_health(ctx, flag_key).await?.is_healthy())
    }
}
