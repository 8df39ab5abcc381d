use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Number(f64),
    Bool(bool),
}

pub type Dict = BTreeMap<String, Scalar>;

/// Anything that can be stored: a scalar, or a string-keyed map of scalars.
///
/// Encoded as plain JSON (`"text"`, `1.5`, `true`, `{"a": 1}`), so a stored
/// value of any other JSON shape reads back as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    Dict(Dict),
}

impl Scalar {
    pub fn is_finite(&self) -> bool {
        match self {
            Scalar::Number(n) => n.is_finite(),
            _ => true,
        }
    }
}

impl Value {
    /// JSON has no encoding for NaN or infinities.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_finite(),
            Value::Dict(d) => d.values().all(Scalar::is_finite),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

macro_rules! value_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Scalar(v.into())
                }
            }
        )*
    };
}

value_from_scalar!(&str, String, f64, i64, bool);

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Namespace prepended to every key the store writes.
    pub prefix: String,
    /// Appended to a key to form its shadow timestamp key.
    pub timestamp_suffix: String,
    /// Prepended to a service name to form its migration guard key.
    pub migration_prefix: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            prefix: "MSAppCenter".to_string(),
            timestamp_suffix: ".timestamp".to_string(),
            migration_prefix: "310MigratedKeys.".to_string(),
        }
    }
}
