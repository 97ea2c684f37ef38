//! Cache LRU com TTL para resultados de avaliação.
//!
//! As entradas são indexadas por `flag_key:fingerprint`, onde o fingerprint
//! é um hash determinístico do contexto da requisição.

mod fingerprint;
mod lru;

pub use self::fingerprint::fingerprint;
pub use self::lru::{CacheEntry, CacheStats, EvaluationCache};
