//! Tipos de resposta do serviço de flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conteúdo de uma avaliação bem-sucedida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPayload {
    /// Valor bruto da flag.
    pub value: String,

    /// Se a flag está habilitada para o contexto avaliado.
    pub enabled: bool,
}

impl FlagPayload {
    /// Cria um novo payload.
    pub fn new(value: impl Into<String>, enabled: bool) -> Self {
        Self {
            value: value.into(),
            enabled,
        }
    }
}

/// Estado de saúde de uma feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureHealth {
    pub feature_key: String,

    pub environment_key: String,

    pub enabled: bool,

    /// Se a feature foi desabilitada automaticamente por taxa de erro.
    pub auto_disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error_at: Option<DateTime<Utc>>,
}

impl FeatureHealth {
    /// Saudável = habilitada e não desabilitada automaticamente.
    pub fn is_healthy(&self) -> bool {
        self.enabled && !self.auto_disabled
    }
}
