//! Tool argument normalization.
//!
//! Agent runtimes disagree on how a single tool argument is delivered: as a
//! bare string, as JSON text, wrapped in a one-element list, or inside an
//! object under the parameter name. An [`ArgumentConvention`] selects how
//! tolerant a tool is when unwrapping that payload into one string.

use std::{error::Error, fmt, str::FromStr};

use serde_json::Value;

/// Strategy used to turn a raw tool payload into a single string argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentConvention {
    /// The payload must be a string and is used as-is.
    Direct,
    /// Accepts bare strings, JSON text, one-element lists and keyed objects.
    #[default]
    Lenient,
    /// The payload must decode to a list or an object.
    Structured,
}

impl ArgumentConvention {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Lenient => "lenient",
            Self::Structured => "structured",
        }
    }

    /// Extracts the argument named `key` from `payload`.
    ///
    /// # Errors
    /// Returns `ArgumentError` if the payload shape is not accepted by this
    /// convention or the extracted value is blank.
    pub fn normalize(self, payload: &Value, key: &str) -> Result<String, ArgumentError> {
        let value = match self {
            Self::Direct => match payload {
                Value::String(text) => text.clone(),
                other => return Err(ArgumentError::wrong_shape("string", other)),
            },
            Self::Lenient => normalize_lenient(payload, key)?,
            Self::Structured => normalize_structured(payload, key)?,
        };
        if value.trim().is_empty() {
            return Err(ArgumentError::Empty);
        }
        Ok(value)
    }
}

impl FromStr for ArgumentConvention {
    type Err = ArgumentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "lenient" => Ok(Self::Lenient),
            "structured" => Ok(Self::Structured),
            other => Err(ArgumentError::UnknownConvention(other.to_string())),
        }
    }
}

impl fmt::Display for ArgumentConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    WrongShape { expected: &'static str, found: &'static str },
    MissingKey(String),
    EmptyList,
    Empty,
    UnknownConvention(String),
}

impl ArgumentError {
    const fn wrong_shape(expected: &'static str, found: &Value) -> Self {
        Self::WrongShape {
            expected,
            found: value_kind(found),
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongShape { expected, found } => {
                write!(f, "invalid argument: expected {expected}, found {found}")
            }
            Self::MissingKey(key) => write!(f, "invalid argument: missing key `{key}`"),
            Self::EmptyList => write!(f, "invalid argument: empty list"),
            Self::Empty => write!(f, "invalid argument: value is empty"),
            Self::UnknownConvention(value) => write!(f, "unknown argument convention: {value}"),
        }
    }
}

impl Error for ArgumentError {}

fn normalize_lenient(payload: &Value, key: &str) -> Result<String, ArgumentError> {
    match payload {
        // JSON text that decodes to a scalar (e.g. `2101.0001`) keeps its raw form.
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(decoded @ (Value::Array(_) | Value::Object(_))) => unwrap_container(&decoded, key),
            Ok(Value::String(inner)) => Ok(inner),
            _ => Ok(text.clone()),
        },
        Value::Array(_) | Value::Object(_) => unwrap_container(payload, key),
        other => Err(ArgumentError::wrong_shape("string, list or object", other)),
    }
}

fn normalize_structured(payload: &Value, key: &str) -> Result<String, ArgumentError> {
    match payload {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(decoded @ (Value::Array(_) | Value::Object(_))) => unwrap_container(&decoded, key),
            Ok(decoded) => Err(ArgumentError::wrong_shape("list or object", &decoded)),
            Err(_) => Err(ArgumentError::wrong_shape("list or object", payload)),
        },
        Value::Array(_) | Value::Object(_) => unwrap_container(payload, key),
        other => Err(ArgumentError::wrong_shape("list or object", other)),
    }
}

fn unwrap_container(container: &Value, key: &str) -> Result<String, ArgumentError> {
    let inner = match container {
        Value::Array(items) => items.first().ok_or(ArgumentError::EmptyList)?,
        Value::Object(map) => map
            .get(key)
            .ok_or_else(|| ArgumentError::MissingKey(key.to_string()))?,
        other => return Err(ArgumentError::wrong_shape("list or object", other)),
    };
    match inner {
        Value::String(text) => Ok(text.clone()),
        other => Err(ArgumentError::wrong_shape("string", other)),
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lenient(payload: &Value) -> Result<String, ArgumentError> {
        ArgumentConvention::Lenient.normalize(payload, "paper_id")
    }

    #[test]
    fn lenient_accepts_every_shape() {
        let expected = Ok("2101.0001".to_string());
        assert_eq!(lenient(&json!("2101.0001")), expected);
        assert_eq!(lenient(&json!(["2101.0001"])), expected);
        assert_eq!(lenient(&json!({"paper_id": "2101.0001"})), expected);
        assert_eq!(lenient(&json!("[\"2101.0001\"]")), expected);
        assert_eq!(lenient(&json!("{\"paper_id\": \"2101.0001\"}")), expected);
        assert_eq!(lenient(&json!("\"2101.0001\"")), expected);
    }

    #[test]
    fn lenient_keeps_bare_topics() {
        let topic = ArgumentConvention::Lenient.normalize(&json!("quantum computing"), "topic");
        assert_eq!(topic, Ok("quantum computing".to_string()));
    }

    #[test]
    fn lenient_rejects_unrecognized_shapes() {
        assert!(matches!(lenient(&json!(42)), Err(ArgumentError::WrongShape { .. })));
        assert_eq!(lenient(&json!([])), Err(ArgumentError::EmptyList));
        assert_eq!(
            lenient(&json!({"topic": "x"})),
            Err(ArgumentError::MissingKey("paper_id".to_string()))
        );
        assert_eq!(lenient(&json!("  ")), Err(ArgumentError::Empty));
    }

    #[test]
    fn structured_requires_container() {
        let convention = ArgumentConvention::Structured;
        assert_eq!(
            convention.normalize(&json!("[\"ai\"]"), "topic"),
            Ok("ai".to_string())
        );
        assert_eq!(
            convention.normalize(&json!("{\"topic\": \"ai\"}"), "topic"),
            Ok("ai".to_string())
        );
        assert!(convention.normalize(&json!("ai"), "topic").is_err());
        assert!(convention.normalize(&json!("\"ai\""), "topic").is_err());
    }

    #[test]
    fn direct_uses_string_verbatim() {
        let convention = ArgumentConvention::Direct;
        assert_eq!(
            convention.normalize(&json!("[\"ai\"]"), "topic"),
            Ok("[\"ai\"]".to_string())
        );
        assert!(convention.normalize(&json!(["ai"]), "topic").is_err());
    }

    #[test]
    fn parses_convention_names() {
        assert_eq!("Structured".parse::<ArgumentConvention>(), Ok(ArgumentConvention::Structured));
        assert!("loose".parse::<ArgumentConvention>().is_err());
    }
}
