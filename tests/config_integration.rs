//! Testes de integração de configuração.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use togglr::{
    CallContext, Client, Config, FlagPayload, RemoteEvaluator, RemoteOutcome, RequestContext,
    TogglrError,
};

struct Fixed;

#[async_trait]
impl RemoteEvaluator for Fixed {
    async fn evaluate(
        &self,
        _ctx: &CallContext,
        _flag_key: &str,
        _attrs: &RequestContext,
    ) -> RemoteOutcome<FlagPayload> {
        RemoteOutcome::Success(FlagPayload::new("on", true))
    }
}

mod config_file_tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("togglr.toml");

        let config = Config::new("secret")
            .with_base_url("https://flags.example.com")
            .with_timeout(Duration::from_millis(500))
            .with_retries(4)
            .with_cache(50, Duration::from_secs(30));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.cache.enabled);
        assert_eq!(loaded.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("togglr.toml");
        std::fs::write(
            &path,
            r#"
api_key = "secret"

[cache]
enabled = true
"#,
        )
        .unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.base_url, "http://localhost:8090");
        assert_eq!(loaded.timeout_ms, 800);
        assert_eq!(loaded.retries, 2);
        assert_eq!(loaded.cache.size, 100);
        assert_eq!(loaded.cache.ttl(), Duration::from_secs(5));
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(TogglrError::Io(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("togglr.toml");
        std::fs::write(&path, "timeout_ms = \"fast\"").unwrap();

        assert!(matches!(Config::load(&path), Err(TogglrError::TomlParse(_))));
    }
}

mod client_config_tests {
    use super::*;

    #[tokio::test]
    async fn test_client_from_loaded_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("togglr.toml");
        Config::new("secret")
            .with_cache(10, Duration::from_secs(5))
            .save(&path)
            .unwrap();

        let client = Client::new(Config::load(&path).unwrap(), Arc::new(Fixed)).unwrap();
        let result = client
            .evaluate(&CallContext::new(), "theme", &RequestContext::new())
            .await;

        assert_eq!(result.value(), "on");
        assert_eq!(client.cache_stats().map(|s| s.size), Some(1));
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let zero_timeout = Config::new("secret").with_timeout(Duration::ZERO);
        assert!(matches!(
            Client::new(zero_timeout, Arc::new(Fixed)),
            Err(TogglrError::Config(_))
        ));

        let empty_cache = Config::new("secret").with_cache(0, Duration::from_secs(5));
        assert!(matches!(
            Client::new(empty_cache, Arc::new(Fixed)),
            Err(TogglrError::Config(_))
        ));
    }
}
