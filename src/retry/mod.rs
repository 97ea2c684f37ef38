//! Retry com backoff exponencial e cancelamento.
//!
//! - [`Backoff`]: cálculo puro do atraso entre tentativas
//! - [`CallContext`]: escopo de cancelamento e prazo de uma chamada
//! - [`RetryExecutor`]: loop de tentativas que combina os dois

mod backoff;
mod context;
mod executor;

pub use backoff::Backoff;
pub use context::CallContext;
pub use executor::{AttemptOutcome, RetryExecutor};
