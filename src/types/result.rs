//! Resultado de uma avaliação de flag.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{TogglrError, TogglrResult};

/// Resultado imutável de uma avaliação.
///
/// Os acessores tipados derivam o valor de `raw_value` sob demanda:
/// - se houve erro, devolvem o erro;
/// - se a flag não foi encontrada ou está desabilitada, devolvem o valor
///   "zero" do tipo, sem erro.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    flag_key: String,
    raw_value: String,
    enabled: bool,
    found: bool,
    err: Option<TogglrError>,
}

impl EvalResult {
    /// Cria um resultado de avaliação bem-sucedida.
    pub fn new(flag_key: impl Into<String>, raw_value: impl Into<String>, enabled: bool, found: bool) -> Self {
        Self {
            flag_key: flag_key.into(),
            raw_value: raw_value.into(),
            enabled,
            found,
            err: None,
        }
    }

    /// Cria um resultado de avaliação que falhou.
    pub fn failed(flag_key: impl Into<String>, err: TogglrError) -> Self {
        Self {
            flag_key: flag_key.into(),
            raw_value: String::new(),
            enabled: false,
            found: false,
            err: Some(err),
        }
    }

    /// Chave da flag avaliada.
    pub fn key(&self) -> &str {
        &self.flag_key
    }

    /// Valor bruto recebido, sem filtragem.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Erro da avaliação, se houve.
    pub fn err(&self) -> Option<&TogglrError> {
        self.err.as_ref()
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Valor da flag, ou string vazia se ausente, desabilitada ou com erro.
    pub fn value(&self) -> &str {
        if self.err.is_some() || !self.found || !self.enabled {
            return "";
        }
        &self.raw_value
    }

    /// Valor da flag como `Result`.
    pub fn result(&self) -> TogglrResult<String> {
        self.check()?;
        Ok(self.value().to_string())
    }

    /// Interpreta o valor como booleano (`true/1/yes/on`, `false/0/no/off`).
    pub fn bool(&self) -> TogglrResult<bool> {
        let Some(raw) = self.active_value()? else {
            return Ok(false);
        };

        match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(self.conversion_error("bool", "unrecognized boolean")),
        }
    }

    pub fn i32(&self) -> TogglrResult<i32> {
        self.parse_number("i32")
    }

    pub fn u32(&self) -> TogglrResult<u32> {
        self.parse_number("u32")
    }

    pub fn i64(&self) -> TogglrResult<i64> {
        self.parse_number("i64")
    }

    pub fn u64(&self) -> TogglrResult<u64> {
        self.parse_number("u64")
    }

    pub fn f32(&self) -> TogglrResult<f32> {
        self.parse_number("f32")
    }

    pub fn f64(&self) -> TogglrResult<f64> {
        self.parse_number("f64")
    }

    /// Interpreta o valor como duração (`300ms`, `1h30m`, `2.5s`).
    pub fn duration(&self) -> TogglrResult<Duration> {
        match self.active_value()? {
            Some(raw) => {
                parse_duration(raw).map_err(|reason| self.conversion_error("duration", reason))
            }
            None => Ok(Duration::ZERO),
        }
    }

    /// Desserializa o valor JSON em `T`.
    pub fn json<T: DeserializeOwned + Default>(&self) -> TogglrResult<T> {
        match self.active_value()? {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(T::default()),
        }
    }

    fn check(&self) -> TogglrResult<()> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// `None` quando o acessor deve devolver o valor zero do tipo.
    fn active_value(&self) -> TogglrResult<Option<&str>> {
        self.check()?;
        if !self.found || !self.enabled || self.raw_value.is_empty() {
            return Ok(None);
        }
        Ok(Some(&self.raw_value))
    }

    fn parse_number<T>(&self, target: &'static str) -> TogglrResult<T>
    where
        T: FromStr + Default,
        T::Err: Display,
    {
        match self.active_value()? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| self.conversion_error(target, e.to_string())),
            None => Ok(T::default()),
        }
    }

    fn conversion_error(&self, target: &'static str, reason: impl Into<String>) -> TogglrError {
        TogglrError::Conversion {
            value: self.raw_value.clone(),
            target,
            reason: reason.into(),
        }
    }
}

/// Parser de durações no formato `<número><unidade>` repetido.
///
/// Unidades aceitas: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. O valor `0`
/// dispensa unidade. Durações negativas não são representáveis.
fn parse_duration(input: &str) -> Result<Duration, String> {
    let mut s = input.trim();
    if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s.starts_with('-') {
        return Err("negative durations are not supported".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut nanos = 0f64;
    while !s.is_empty() {
        let num_end = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (number, rest) = s.split_at(num_end);
        if number.is_empty() || number == "." {
            return Err(format!("invalid duration {input:?}"));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid number {number:?}"))?;

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let (unit, rest) = rest.split_at(unit_end);
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in duration {input:?}")),
            other => return Err(format!("unknown unit {other:?} in duration {input:?}")),
        };

        nanos += value * scale;
        s = rest;
    }

    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(format!("duration {input:?} overflows"));
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}
