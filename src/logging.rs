//! Inicialização de logging via `tracing-subscriber`.
//!
//! O cliente emite eventos `tracing` sob o alvo `togglr`. Aplicações que já
//! instalam um subscriber não precisam chamar [`init`].

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::config::LoggingConfig;

/// Instala um subscriber global conforme a configuração.
///
/// Retorna `false` se já existia um subscriber instalado.
pub fn init(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::from_default_env().add_directive(togglr_directive(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok()
    }
}

/// Diretiva `togglr=<nível>`. Nível inválido vira `info`.
fn togglr_directive(level: &str) -> Directive {
    let level = level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    format!("togglr={level}")
        .parse()
        .unwrap_or_else(|_| Directive::from(level))
}
