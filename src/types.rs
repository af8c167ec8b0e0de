use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::coerce;
use crate::error::DoconfError;

/// The scalar type of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
}

impl VarType {
    /// The short name used in declarations (`str`, `int`, `float`, `bool`).
    pub fn as_str(self) -> &'static str {
        match self {
            VarType::String => "str",
            VarType::Integer => "int",
            VarType::Float => "float",
            VarType::Boolean => "bool",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VarType {
    type Err = DoconfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "string" => Ok(VarType::String),
            "int" | "integer" => Ok(VarType::Integer),
            "float" => Ok(VarType::Float),
            "bool" | "boolean" => Ok(VarType::Boolean),
            other => Err(DoconfError::TypeCoercion {
                value: other.to_string(),
                target: "type".into(),
                reason: "supported types are str, int, float and bool".into(),
            }),
        }
    }
}

/// A coerced configuration value.
///
/// `Null` is what the literals `null` and `none` resolve to. It is distinct
/// from the zero value of every type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Renders values the way they are written in a config file. Strings are
/// quoted whenever reading them back would otherwise change them.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) if needs_quotes(s) => write!(f, "\"{s}\""),
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
        }
    }
}

/// Empty or padded text, a null literal, or text already wrapped in quotes.
fn needs_quotes(s: &str) -> bool {
    let quoted = s.len() >= 2
        && ['"', '\''].iter().any(|&q| s.starts_with(q) && s.ends_with(q));
    s.is_empty() || s.trim() != s || coerce::is_null_literal(s) || quoted
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
///
/// `env` selects the environment to validate against; `None` means `default`.
/// `path` is an explicit config file; `None` means discovery.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    Find,
    Validate {
        path: Option<PathBuf>,
        env: Option<String>,
    },
    Gen {
        output: Option<PathBuf>,
        env: Option<String>,
    },
    List {
        path: Option<PathBuf>,
        env: Option<String>,
        json: bool,
    },
    Get {
        key: String,
        path: Option<PathBuf>,
        env: Option<String>,
    },
}
