//! Cache LRU com TTL para resultados de avaliação.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use super::fingerprint::fingerprint;
use crate::types::requests::RequestContext;

/// Entrada em cache. Imutável: um `set` substitui a entrada inteira.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub value: String,
    pub enabled: bool,
    pub found: bool,
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Verifica se a entrada expirou no instante dado.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Estatísticas do cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Número atual de entradas (inclui expiradas ainda não removidas).
    pub size: usize,

    /// Capacidade máxima.
    pub capacity: usize,

    /// Número de acertos (cache hits).
    pub hits: u64,

    /// Número de erros (cache misses).
    pub misses: u64,
}

impl CacheStats {
    /// Calcula a taxa de acerto.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache LRU para resultados de avaliação.
///
/// Entradas expiradas são tratadas como ausentes na leitura, mas só saem do
/// cache quando são sobrescritas ou despejadas pelo LRU.
///
/// Buscas usam o lock de leitura; apenas a promoção de um acerto e as
/// escritas tomam o lock exclusivo. Um lock envenenado degrada para miss.
pub struct EvaluationCache {
    entries: RwLock<LruCache<String, CacheEntry>>,
    capacity: NonZeroUsize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EvaluationCache {
    /// Cria um novo cache.
    ///
    /// # Argumentos
    /// - `capacity`: Número máximo de entradas (mínimo 1)
    /// - `ttl`: Tempo de vida das entradas
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            capacity,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Gera a chave de cache: `flag_key:fingerprint(attrs)`.
    pub fn cache_key(flag_key: &str, attrs: &RequestContext) -> String {
        format!("{}:{}", flag_key, fingerprint(attrs))
    }

    /// Busca no cache.
    ///
    /// Retorna `None` se não encontrado ou se expirado. Um acerto promove a
    /// chave para a posição mais recente; um miss não altera o cache.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let now = Instant::now();

        let live = match self.entries.read() {
            Ok(entries) => entries.peek(key).is_some_and(|e| !e.is_expired_at(now)),
            Err(_) => false,
        };
        if !live {
            return self.miss();
        }

        let Ok(mut entries) = self.entries.write() else {
            return self.miss();
        };

        // Outro escritor pode ter substituído ou despejado a chave entre os locks.
        let entry = match entries.peek(key) {
            Some(entry) if !entry.is_expired_at(now) => entry.clone(),
            _ => return self.miss(),
        };
        entries.promote(key);
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry)
    }

    /// Insere ou substitui uma entrada, com expiração em `agora + ttl`.
    ///
    /// Chave nova com o cache cheio despeja exatamente a entrada menos
    /// recentemente usada.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, enabled: bool, found: bool) {
        let entry = CacheEntry {
            value: value.into(),
            enabled,
            found,
            expires_at: expiry(Instant::now(), self.ttl),
        };

        if let Ok(mut entries) = self.entries.write() {
            entries.put(key.into(), entry);
        }
    }

    /// Limpa todo o cache. A capacidade não muda.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Número atual de entradas.
    pub fn size(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.size(),
            capacity: self.capacity.get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn miss(&self) -> Option<CacheEntry> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }
}

// TTL grande demais para o relógio: a entrada nunca expira na prática.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn expiry(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_cache_key_generation() {
        let ctx = RequestContext::new().with_user_id("u1");
        let key1 = EvaluationCache::cache_key("theme", &ctx);
        let key2 = EvaluationCache::cache_key("theme", &ctx.clone());
        let key3 = EvaluationCache::cache_key("banner", &ctx);

        // Mesmos argumentos = mesma chave
        assert_eq!(key1, key2);

        // Flag diferente = chave diferente
        assert_ne!(key1, key3);
        assert!(key1.starts_with("theme:"));
    }

    #[test]
    fn test_cache_hit() {
        let cache = EvaluationCache::new(10, Duration::from_secs(60));

        cache.set("key1", "value1", true, true);

        let entry = cache.get("key1").expect("entry should be cached");
        assert_eq!(entry.value, "value1");
        assert!(entry.enabled);
        assert!(entry.found);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_cache_miss() {
        let cache = EvaluationCache::new(10, Duration::from_secs(60));

        assert!(cache.get("nonexistent").is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_zero_ttl_is_always_expired() {
        let cache = EvaluationCache::new(10, Duration::ZERO);

        cache.set("key1", "value1", true, true);

        assert!(cache.get("key1").is_none());
        // Expirada, mas não removida
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_unbounded_ttl_never_expires() {
        let cache = EvaluationCache::new(4, Duration::MAX);

        cache.set("key1", "value1", true, true);

        let entry = cache.get("key1").unwrap();
        assert_eq!(entry.value, "value1");
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = EvaluationCache::new(2, Duration::from_millis(100));

        cache.set("key1", "value1", true, true);
        tokio::time::advance(Duration::from_millis(50)).await;
        assert!(cache.get("key1").is_some());

        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(cache.get("key1").is_none());
        assert_eq!(cache.size(), 1);

        // Sobrescrever renova a entrada
        cache.set("key1", "value2", true, true);
        assert_eq!(cache.get("key1").map(|e| e.value), Some("value2".to_string()));
    }

    #[test]
    fn test_lru_eviction() {
        let cache = EvaluationCache::new(2, Duration::from_secs(60));

        cache.set("key1", "v", true, true);
        cache.set("key2", "v", true, true);
        cache.set("key3", "v", true, true); // Deve despejar key1

        assert_eq!(cache.size(), 2);
        assert!(cache.get("key1").is_none());
        assert!(cache.get("key2").is_some());
        assert!(cache.get("key3").is_some());
    }

    #[test]
    fn test_get_promotes_entry() {
        let cache = EvaluationCache::new(2, Duration::from_secs(60));

        cache.set("a", "v", true, true);
        cache.set("b", "v", true, true);
        assert!(cache.get("a").is_some());
        cache.set("c", "v", true, true);

        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_update_existing_key_does_not_evict() {
        let cache = EvaluationCache::new(2, Duration::from_secs(60));

        cache.set("a", "1", true, true);
        cache.set("b", "1", true, true);
        cache.set("a", "2", false, true);

        assert_eq!(cache.size(), 2);
        let a = cache.get("a").unwrap();
        assert_eq!(a.value, "2");
        assert!(!a.enabled);

        // "a" foi promovida pela atualização, então "b" sai primeiro
        cache.set("c", "1", true, true);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let cache = EvaluationCache::new(3, Duration::from_secs(60));

        for i in 0..20 {
            cache.set(format!("key{i}"), "v", true, true);
            assert!(cache.size() <= 3);
        }
        assert!(cache.get("key19").is_some());
        assert!(cache.get("key16").is_none());
    }

    #[test]
    fn test_cache_clear() {
        let cache = EvaluationCache::new(10, Duration::from_secs(60));

        cache.set("key1", "v", true, true);
        cache.set("key2", "v", true, true);
        cache.clear();

        assert!(cache.get("key1").is_none());
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.stats().capacity, 10);
    }

    #[test]
    fn test_cache_stats() {
        let cache = EvaluationCache::new(10, Duration::from_secs(60));

        cache.set("key1", "v", true, true);
        cache.get("key1"); // Hit
        cache.get("key2"); // Miss
        cache.get("key1"); // Hit

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.capacity, 10);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.666).abs() < 0.01);
    }

    #[test]
    fn test_concurrent_access_keeps_bounds() {
        let cache = Arc::new(EvaluationCache::new(8, Duration::from_secs(60)));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("key{}", (t * 7 + i) % 24);
                        cache.set(key.clone(), "v", true, true);
                        cache.get(&key);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.size() <= 8);
    }
}
