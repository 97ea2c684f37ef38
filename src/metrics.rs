//! Métricas do cliente.
//!
//! - [`Metrics`]: trait do coletor, com métodos no-op por padrão
//! - [`NoopMetrics`]: coletor padrão, descarta tudo
//! - [`CounterMetrics`]: contadores atômicos em memória

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Coletor de métricas. Chamadas não podem bloquear nem falhar.
pub trait Metrics: Send + Sync {
    fn inc_evaluate_request(&self) {}

    fn inc_evaluate_error(&self, _code: &str) {}

    fn observe_evaluate_latency(&self, _latency: Duration) {}

    fn inc_cache_hit(&self) {}

    fn inc_cache_miss(&self) {}

    fn inc_feature_health_request(&self) {}

    fn inc_feature_health_error(&self, _code: &str) {}

    fn observe_feature_health_latency(&self, _latency: Duration) {}
}

/// Coletor que descarta todas as métricas.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {}

/// Coletor com contadores em memória.
#[derive(Debug, Default)]
pub struct CounterMetrics {
    evaluate_requests: AtomicU64,
    evaluate_errors: AtomicU64,
    evaluate_latency_nanos: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    health_requests: AtomicU64,
    health_errors: AtomicU64,
    health_latency_nanos: AtomicU64,
    errors_by_code: Mutex<HashMap<String, u64>>,
}

/// Retrato dos contadores de [`CounterMetrics`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub evaluate_requests: u64,
    pub evaluate_errors: u64,
    pub evaluate_latency: Duration,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub health_requests: u64,
    pub health_errors: u64,
    pub health_latency: Duration,
    pub errors_by_code: HashMap<String, u64>,
}

impl MetricsSnapshot {
    /// Latência média das avaliações que chegaram a ser medidas.
    pub fn average_evaluate_latency(&self) -> Duration {
        let measured = self.evaluate_requests.saturating_sub(self.cache_hits);
        if measured == 0 {
            Duration::ZERO
        } else {
            let nanos = self.evaluate_latency.as_nanos() / u128::from(measured);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        }
    }
}

impl CounterMetrics {
    /// Cria um novo coletor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna os contadores atuais.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            evaluate_requests: self.evaluate_requests.load(Ordering::Relaxed),
            evaluate_errors: self.evaluate_errors.load(Ordering::Relaxed),
            evaluate_latency: Duration::from_nanos(self.evaluate_latency_nanos.load(Ordering::Relaxed)),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            health_requests: self.health_requests.load(Ordering::Relaxed),
            health_errors: self.health_errors.load(Ordering::Relaxed),
            health_latency: Duration::from_nanos(self.health_latency_nanos.load(Ordering::Relaxed)),
            errors_by_code: self
                .errors_by_code
                .lock()
                .map(|codes| codes.clone())
                .unwrap_or_default(),
        }
    }

    fn count_code(&self, code: &str) {
        if let Ok(mut codes) = self.errors_by_code.lock() {
            *codes.entry(code.to_string()).or_insert(0) += 1;
        }
    }
}

fn add_latency(counter: &AtomicU64, latency: Duration) {
    let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
    counter.fetch_add(nanos, Ordering::Relaxed);
}

impl Metrics for CounterMetrics {
    fn inc_evaluate_request(&self) {
        self.evaluate_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_evaluate_error(&self, code: &str) {
        self.evaluate_errors.fetch_add(1, Ordering::Relaxed);
        self.count_code(code);
    }

    fn observe_evaluate_latency(&self, latency: Duration) {
        add_latency(&self.evaluate_latency_nanos, latency);
    }

    fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_feature_health_request(&self) {
        self.health_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_feature_health_error(&self, code: &str) {
        self.health_errors.fetch_add(1, Ordering::Relaxed);
        self.count_code(code);
    }

    fn observe_feature_health_latency(&self, latency: Duration) {
        add_latency(&self.health_latency_nanos, latency);
    }
}
