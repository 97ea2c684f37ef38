//! # Togglr
//!
//! Cliente para avaliação de feature flags remotas com latência limitada.
//!
//! Cada avaliação passa por um pipeline que decide entre servir uma resposta
//! em cache, chamar o serviço remoto, repetir a chamada com backoff ou
//! falhar de forma segura.
//!
//! ## Módulos
//!
//! - [`client`] - Orquestrador de avaliação ([`Client`])
//! - [`cache`] - Cache LRU com TTL e fingerprint do contexto
//! - [`retry`] - Backoff exponencial, contexto de cancelamento e executor de retry
//! - [`remote`] - Interface com o transporte do serviço de flags
//! - [`metrics`] - Coletores de métricas
//! - [`logging`] - Inicialização do `tracing-subscriber`
//! - [`types`] - Tipos compartilhados
//!
//! ## Exemplo
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use async_trait::async_trait;
//! use togglr::{
//!     CallContext, Client, Config, FlagPayload, RemoteEvaluator, RemoteOutcome, RequestContext,
//! };
//!
//! struct Static;
//!
//! #[async_trait]
//! impl RemoteEvaluator for Static {
//!     async fn evaluate(
//!         &self,
//!         _ctx: &CallContext,
//!         _flag_key: &str,
//!         _attrs: &RequestContext,
//!     ) -> RemoteOutcome<FlagPayload> {
//!         RemoteOutcome::Success(FlagPayload::new("dark", true))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let config = Config::new("api-key").with_cache(100, Duration::from_secs(5));
//! let client = Client::new(config, Arc::new(Static)).unwrap();
//!
//! let attrs = RequestContext::new().with_user_id("u1").with_country("BR");
//! let result = client.evaluate(&CallContext::new(), "theme", &attrs).await;
//!
//! assert_eq!(result.value(), "dark");
//! assert!(result.enabled());
//! # });
//! ```

pub mod cache;
pub mod client;
pub mod logging;
pub mod metrics;
pub mod remote;
pub mod retry;
pub mod types;

pub use client::Client;
pub use metrics::{CounterMetrics, Metrics, NoopMetrics};
pub use remote::{RemoteEvaluator, RemoteOutcome};
pub use retry::CallContext;
pub use types::config::Config;
pub use types::errors::{TogglrError, TogglrResult};
pub use types::requests::{attrs, AttrValue, RequestContext};
pub use types::responses::{FeatureHealth, FlagPayload};
pub use types::result::EvalResult;
