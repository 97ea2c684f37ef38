//! Tipos compartilhados do Togglr.

pub mod config;
pub mod errors;
pub mod requests;
pub mod responses;
pub mod result;
