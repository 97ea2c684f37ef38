//! Interface com o serviço remoto de flags.
//!
//! O transporte (HTTP, TLS, marshaling) fica fora deste crate: quem usa o
//! cliente fornece uma implementação de [`RemoteEvaluator`]. Cada chamada
//! representa uma única tentativa; retries e timeouts ficam a cargo do
//! [`Client`](crate::Client).

use async_trait::async_trait;

use crate::retry::{AttemptOutcome, CallContext};
use crate::types::requests::RequestContext;
use crate::types::responses::{FeatureHealth, FlagPayload};
use crate::TogglrError;

/// Resposta de uma única chamada ao serviço remoto.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome<T> {
    /// Resposta decodificada com sucesso.
    Success(T),
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
    RateLimited,
    ServerError,
    /// Falha de rede ou timeout de transporte. Única variante repetível.
    Transport(String),
}

impl<T> RemoteOutcome<T> {
    /// Classifica a resposta para o executor de retry.
    ///
    /// `NotFound` é um resultado terminal sem erro (`Ok(None)`); cabe a quem
    /// chama decidir se a ausência é um erro.
    pub fn into_attempt(self) -> AttemptOutcome<Option<T>> {
        match self {
            RemoteOutcome::Success(value) => AttemptOutcome::Done(Ok(Some(value))),
            RemoteOutcome::NotFound => AttemptOutcome::Done(Ok(None)),
            RemoteOutcome::BadRequest => AttemptOutcome::Done(Err(TogglrError::BadRequest)),
            RemoteOutcome::Unauthorized => AttemptOutcome::Done(Err(TogglrError::Unauthorized)),
            RemoteOutcome::Forbidden => AttemptOutcome::Done(Err(TogglrError::Forbidden)),
            RemoteOutcome::RateLimited => AttemptOutcome::Done(Err(TogglrError::TooManyRequests)),
            RemoteOutcome::ServerError => {
                AttemptOutcome::Done(Err(TogglrError::InternalServerError))
            }
            RemoteOutcome::Transport(msg) => AttemptOutcome::Retry(TogglrError::Transport(msg)),
        }
    }
}

/// Trait para o cliente de transporte do serviço de flags.
#[async_trait]
pub trait RemoteEvaluator: Send + Sync {
    /// Avalia uma flag para o contexto dado.
    async fn evaluate(
        &self,
        ctx: &CallContext,
        flag_key: &str,
        attrs: &RequestContext,
    ) -> RemoteOutcome<FlagPayload>;

    /// Consulta o estado de saúde de uma feature.
    ///
    /// A implementação padrão responde `NotFound`, para transportes que não
    /// expõem esse endpoint.
    async fn feature_health(&self, _ctx: &CallContext, _flag_key: &str) -> RemoteOutcome<FeatureHealth> {
        RemoteOutcome::NotFound
    }

    /// Verifica se o serviço está no ar.
    async fn health_check(&self, _ctx: &CallContext) -> RemoteOutcome<()> {
        RemoteOutcome::Success(())
    }
}
