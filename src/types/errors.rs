//! Tipos de erro do Togglr.

use thiserror::Error;

/// Tipo de resultado padrão do Togglr.
pub type TogglrResult<T> = Result<T, TogglrError>;

/// Erros possíveis no Togglr.
///
/// O enum é `Clone` porque um [`EvalResult`](crate::EvalResult) devolve o
/// mesmo erro em todos os acessores tipados.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TogglrError {
    #[error("Configuração inválida: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(String),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("too many requests")]
    TooManyRequests,

    #[error("bad request")]
    BadRequest,

    #[error("internal server error")]
    InternalServerError,

    #[error("Feature '{0}' não encontrada")]
    FeatureNotFound(String),

    #[error("Erro de transporte: {0}")]
    Transport(String),

    #[error("Operação cancelada")]
    Cancelled,

    #[error("Prazo da operação excedido")]
    DeadlineExceeded,

    #[error("Não foi possível converter {value:?} para {target}: {reason}")]
    Conversion {
        value: String,
        target: &'static str,
        reason: String,
    },

    #[error("Erro de JSON: {0}")]
    Json(String),

    #[error("Resposta inesperada: {0}")]
    UnexpectedResponse(String),
}

impl TogglrError {
    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Cria um erro de transporte (sempre elegível para retry).
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Indica cancelamento ou prazo excedido do contexto da chamada.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Código curto e estável, usado como rótulo de métricas.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "invalid_config",
            Self::Io(_) => "io",
            Self::TomlParse(_) => "toml",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::TooManyRequests => "too_many_requests",
            Self::BadRequest => "bad_request",
            Self::InternalServerError => "internal_server_error",
            Self::FeatureNotFound(_) => "feature_not_found",
            Self::Transport(_) => "transport",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::Conversion { .. } => "conversion",
            Self::Json(_) => "json",
            Self::UnexpectedResponse(_) => "unexpected_response",
        }
    }
}

impl From<std::io::Error> for TogglrError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for TogglrError {
    fn from(err: toml::de::Error) -> Self {
        Self::TomlParse(err.to_string())
    }
}

impl From<toml::ser::Error> for TogglrError {
    fn from(err: toml::ser::Error) -> Self {
        Self::TomlParse(err.to_string())
    }
}

impl From<serde_json::Error> for TogglrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
