//! Tipos de requisição do Togglr.
//!
//! [`RequestContext`] descreve o usuário/dispositivo para o qual uma flag é
//! avaliada. É um mapa simples de atributos; os nomes conhecidos ficam em
//! [`attrs`].

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

/// Nomes de atributos conhecidos pelo serviço de flags.
pub mod attrs {
    pub const USER_ID: &str = "user.id";
    pub const USER_EMAIL: &str = "user.email";
    pub const USER_ANONYMOUS: &str = "user.anonymous";
    pub const COUNTRY_CODE: &str = "country_code";
    pub const REGION: &str = "region";
    pub const CITY: &str = "city";
    pub const MANUFACTURER: &str = "manufacturer";
    pub const DEVICE_TYPE: &str = "device_type";
    pub const OS: &str = "os";
    pub const OS_VERSION: &str = "os_version";
    pub const BROWSER: &str = "browser";
    pub const BROWSER_VERSION: &str = "browser_version";
    pub const LANGUAGE: &str = "language";
    pub const CONNECTION_TYPE: &str = "connection_type";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const IP: &str = "ip";
    pub const APP_VERSION: &str = "app_version";
    pub const PLATFORM: &str = "platform";
}

/// Valor de um atributo.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AttrValue>),
    Map(BTreeMap<String, AttrValue>),
}

// Números não finitos não têm representação JSON: a serialização falha em
// vez de colapsar para `null`.
impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::Null => serializer.serialize_unit(),
            AttrValue::Bool(b) => serializer.serialize_bool(*b),
            AttrValue::Int(i) => serializer.serialize_i64(*i),
            AttrValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            AttrValue::Float(f) => Err(S::Error::custom(format!("non-finite number {f}"))),
            AttrValue::String(s) => serializer.serialize_str(s),
            AttrValue::List(items) => items.serialize(serializer),
            AttrValue::Map(map) => map.serialize(serializer),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => write!(f, "<nil>"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::String(s) => write!(f, "{s}"),
            AttrValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            AttrValue::Map(map) => {
                write!(f, "map[")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(i64::from(v))
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::Int(i64::from(v))
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(v: Vec<AttrValue>) -> Self {
        AttrValue::List(v)
    }
}

impl From<BTreeMap<String, AttrValue>> for AttrValue {
    fn from(v: BTreeMap<String, AttrValue>) -> Self {
        AttrValue::Map(v)
    }
}

/// Contexto da requisição: atributos do usuário avaliado.
///
/// As chaves são mantidas ordenadas, o que torna a serialização canônica.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestContext {
    attrs: BTreeMap<String, AttrValue>,
}

impl RequestContext {
    /// Cria um contexto vazio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define um atributo arbitrário.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Retorna o valor de um atributo.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// Itera pelos atributos em ordem lexicográfica de chave.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.attrs.iter()
    }

    /// Número de atributos.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Verifica se o contexto está vazio.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn with_user_id(self, id: impl Into<String>) -> Self {
        self.set(attrs::USER_ID, AttrValue::String(id.into()))
    }

    pub fn with_user_email(self, email: impl Into<String>) -> Self {
        self.set(attrs::USER_EMAIL, AttrValue::String(email.into()))
    }

    pub fn with_anonymous(self, anonymous: bool) -> Self {
        self.set(attrs::USER_ANONYMOUS, anonymous)
    }

    pub fn with_country(self, code: impl Into<String>) -> Self {
        self.set(attrs::COUNTRY_CODE, AttrValue::String(code.into()))
    }

    pub fn with_region(self, region: impl Into<String>) -> Self {
        self.set(attrs::REGION, AttrValue::String(region.into()))
    }

    pub fn with_city(self, city: impl Into<String>) -> Self {
        self.set(attrs::CITY, AttrValue::String(city.into()))
    }

    pub fn with_manufacturer(self, manufacturer: impl Into<String>) -> Self {
        self.set(attrs::MANUFACTURER, AttrValue::String(manufacturer.into()))
    }

    pub fn with_device_type(self, device_type: impl Into<String>) -> Self {
        self.set(attrs::DEVICE_TYPE, AttrValue::String(device_type.into()))
    }

    pub fn with_os(self, os: impl Into<String>) -> Self {
        self.set(attrs::OS, AttrValue::String(os.into()))
    }

    pub fn with_os_version(self, version: impl Into<String>) -> Self {
        self.set(attrs::OS_VERSION, AttrValue::String(version.into()))
    }

    pub fn with_browser(self, browser: impl Into<String>) -> Self {
        self.set(attrs::BROWSER, AttrValue::String(browser.into()))
    }

    pub fn with_browser_version(self, version: impl Into<String>) -> Self {
        self.set(attrs::BROWSER_VERSION, AttrValue::String(version.into()))
    }

    pub fn with_language(self, language: impl Into<String>) -> Self {
        self.set(attrs::LANGUAGE, AttrValue::String(language.into()))
    }

    pub fn with_connection_type(self, connection_type: impl Into<String>) -> Self {
        self.set(attrs::CONNECTION_TYPE, AttrValue::String(connection_type.into()))
    }

    pub fn with_age(self, age: u32) -> Self {
        self.set(attrs::AGE, age)
    }

    pub fn with_gender(self, gender: impl Into<String>) -> Self {
        self.set(attrs::GENDER, AttrValue::String(gender.into()))
    }

    pub fn with_ip(self, ip: impl Into<String>) -> Self {
        self.set(attrs::IP, AttrValue::String(ip.into()))
    }

    pub fn with_app_version(self, version: impl Into<String>) -> Self {
        self.set(attrs::APP_VERSION, AttrValue::String(version.into()))
    }

    pub fn with_platform(self, platform: impl Into<String>) -> Self {
        self.set(attrs::PLATFORM, AttrValue::String(platform.into()))
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for RequestContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attrs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
