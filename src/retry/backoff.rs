//! Cálculo de backoff exponencial com teto.

use std::time::Duration;

use crate::types::config::BackoffConfig;

/// Política de backoff: `base_delay * factor^(attempt-1)`, limitada a `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
}

impl Backoff {
    /// Cria uma nova política.
    pub fn new(base_delay: Duration, max_delay: Duration, factor: f64) -> Self {
        Self {
            base_delay,
            max_delay,
            factor,
        }
    }

    /// Espera antes da tentativa `attempt` (1 = primeiro retry).
    ///
    /// `attempt <= 1` devolve `base_delay`; `factor <= 1` mantém o atraso
    /// constante. Depois de atingir `max_delay` o valor não muda mais.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt <= 1 || self.factor.is_nan() || self.factor <= 1.0 || self.base_delay.is_zero() {
            return self.base_delay;
        }

        let max_nanos = self.max_delay.as_nanos() as f64;
        let mut delay = self.base_delay;
        for _ in 1..attempt {
            let next = delay.as_nanos() as f64 * self.factor;
            if !next.is_finite() || next >= max_nanos {
                return self.max_delay;
            }
            delay = Duration::from_nanos(next.round() as u64);
        }
        delay
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from(&BackoffConfig::default())
    }
}

impl From<&BackoffConfig> for Backoff {
    fn from(config: &BackoffConfig) -> Self {
        Self::new(config.base_delay(), config.max_delay(), config.factor)
    }
}
