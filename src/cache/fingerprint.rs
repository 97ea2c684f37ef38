//! Fingerprint determinístico do contexto de requisição.

use sha2::{Digest, Sha256};

use crate::types::requests::RequestContext;

/// Número de bytes do hash mantidos no fingerprint (32 caracteres hex).
const FINGERPRINT_BYTES: usize = 16;

/// Gera um hash curto e determinístico dos atributos.
///
/// Os atributos são serializados como JSON canônico (chaves ordenadas) e
/// passados pelo SHA256. Se a serialização falhar, usa a concatenação
/// `chave:valor;` na mesma ordem. Nunca retorna erro.
pub fn fingerprint(ctx: &RequestContext) -> String {
    match serde_json::to_vec(ctx) {
        Ok(json) => digest(&json),
        Err(e) => {
            tracing::debug!(error = %e, "Canonical serialization failed, using fallback fingerprint");
            fallback_fingerprint(ctx)
        }
    }
}

fn fallback_fingerprint(ctx: &RequestContext) -> String {
    let repr: String = ctx.iter().map(|(k, v)| format!("{k}:{v};")).collect();
    digest(repr.as_bytes())
}

fn digest(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    hex::encode(&hash[..FINGERPRINT_BYTES])
}
