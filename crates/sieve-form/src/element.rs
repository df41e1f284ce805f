//! Element kinds and payload coercion.
//!
//! Payloads arrive as loosely typed JSON (query strings are all text). Each
//! child declares an [`ElementKind`] that coerces the raw value before it is
//! validated and stored.

use serde_json::{Number, Value as Json};

/// The kind of value a child holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ElementKind {
    /// Any JSON value, stored as submitted.
    #[default]
    Any,
    /// Text. Numbers and booleans are converted to their text form.
    String,
    /// Signed integer. Numeric strings are parsed.
    Integer,
    /// Floating point number. Numeric strings are parsed.
    Float,
    /// Boolean. Accepts `1`/`0`, `true`/`false`, `on`/`off`, `yes`/`no`.
    Boolean,
    /// List of values, each coerced by the optional leaf kind.
    Array(Option<Box<ElementKind>>),
    /// A nested form.
    Embedded,
}

impl ElementKind {
    /// Coerces a raw payload value.
    ///
    /// `null` and the empty string always coerce to `null` for scalar kinds,
    /// so an absent field and an empty one behave alike.
    pub fn coerce(&self, raw: &Json) -> Result<Json, String> {
        match self {
            ElementKind::Any | ElementKind::Embedded => Ok(raw.clone()),
            ElementKind::String => match raw {
                Json::Null => Ok(Json::Null),
                Json::String(_) => Ok(raw.clone()),
                Json::Number(n) => Ok(Json::String(n.to_string())),
                Json::Bool(b) => Ok(Json::String(b.to_string())),
                _ => Err(invalid("string")),
            },
            ElementKind::Integer => match raw {
                Json::Null => Ok(Json::Null),
                Json::String(s) if s.trim().is_empty() => Ok(Json::Null),
                Json::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Json::from)
                    .map_err(|_| invalid("integer")),
                Json::Number(n) if n.is_i64() || n.is_u64() => Ok(raw.clone()),
                Json::Number(n) => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(Json::from(f as i64))
                    }
                    _ => Err(invalid("integer")),
                },
                _ => Err(invalid("integer")),
            },
            ElementKind::Float => match raw {
                Json::Null => Ok(Json::Null),
                Json::String(s) if s.trim().is_empty() => Ok(Json::Null),
                Json::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Json::Number)
                    .ok_or_else(|| invalid("float")),
                Json::Number(n) => n
                    .as_f64()
                    .and_then(Number::from_f64)
                    .map(Json::Number)
                    .ok_or_else(|| invalid("float")),
                _ => Err(invalid("float")),
            },
            ElementKind::Boolean => match raw {
                Json::Null => Ok(Json::Null),
                Json::Bool(_) => Ok(raw.clone()),
                Json::Number(n) => match n.as_i64() {
                    Some(0) => Ok(Json::Bool(false)),
                    Some(1) => Ok(Json::Bool(true)),
                    _ => Err(invalid("boolean")),
                },
                Json::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "" => Ok(Json::Null),
                    "1" | "true" | "on" | "yes" => Ok(Json::Bool(true)),
                    "0" | "false" | "off" | "no" => Ok(Json::Bool(false)),
                    _ => Err(invalid("boolean")),
                },
                _ => Err(invalid("boolean")),
            },
            ElementKind::Array(leaf) => match raw {
                Json::Null => Ok(Json::Null),
                Json::Array(items) => match leaf {
                    Some(leaf) => items
                        .iter()
                        .map(|item| leaf.coerce(item))
                        .collect::<Result<Vec<_>, _>>()
                        .map(Json::Array),
                    None => Ok(raw.clone()),
                },
                _ => Err(invalid("array")),
            },
        }
    }
}

fn invalid(kind: &str) -> String {
    format!("This value is not a valid {}", kind)
}

/// Returns `true` if a submitted value counts as "not provided".
///
/// `null`, `""`, `[]` and `{}` are empty. Numbers and booleans, including
/// `0` and `false`, are not.
///
/// ```
/// use serde_json::json;
/// use sieve_form::is_input_value_empty;
///
/// assert!(is_input_value_empty(&json!("")));
/// assert!(is_input_value_empty(&json!([])));
/// assert!(!is_input_value_empty(&json!(" ")));
/// assert!(!is_input_value_empty(&json!(0)));
/// ```
pub fn is_input_value_empty(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::String(s) => s.is_empty(),
        Json::Array(items) => items.is_empty(),
        Json::Object(map) => map.is_empty(),
        Json::Bool(_) | Json::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_coercion() {
        assert_eq!(ElementKind::Integer.coerce(&json!("42")), Ok(json!(42)));
        assert_eq!(ElementKind::Integer.coerce(&json!(" 7 ")), Ok(json!(7)));
        assert_eq!(ElementKind::Integer.coerce(&json!(3.0)), Ok(json!(3)));
        assert_eq!(ElementKind::Integer.coerce(&json!("")), Ok(Json::Null));
        assert_eq!(
            ElementKind::Integer.coerce(&json!("abc")),
            Err("This value is not a valid integer".to_string())
        );
        assert!(ElementKind::Integer.coerce(&json!(2.5)).is_err());
    }

    #[test]
    fn string_coercion() {
        assert_eq!(ElementKind::String.coerce(&json!("J")), Ok(json!("J")));
        assert_eq!(ElementKind::String.coerce(&json!(12)), Ok(json!("12")));
        assert!(ElementKind::String.coerce(&json!(["a"])).is_err());
    }

    #[test]
    fn boolean_coercion() {
        assert_eq!(ElementKind::Boolean.coerce(&json!("on")), Ok(json!(true)));
        assert_eq!(ElementKind::Boolean.coerce(&json!("0")), Ok(json!(false)));
        assert_eq!(ElementKind::Boolean.coerce(&json!(1)), Ok(json!(true)));
        assert!(ElementKind::Boolean.coerce(&json!("maybe")).is_err());
    }

    #[test]
    fn float_coercion() {
        assert_eq!(ElementKind::Float.coerce(&json!("1.5")), Ok(json!(1.5)));
        assert_eq!(ElementKind::Float.coerce(&json!(2)), Ok(json!(2.0)));
        assert!(ElementKind::Float.coerce(&json!("x")).is_err());
    }

    #[test]
    fn array_coercion_uses_leaf() {
        let kind = ElementKind::Array(Some(Box::new(ElementKind::Integer)));
        assert_eq!(kind.coerce(&json!(["1", 2])), Ok(json!([1, 2])));
        assert!(kind.coerce(&json!(["x"])).is_err());
        assert!(kind.coerce(&json!("1")).is_err());
        assert_eq!(ElementKind::Array(None).coerce(&json!(["a", 1])), Ok(json!(["a", 1])));
    }

    #[test]
    fn input_emptiness() {
        assert!(is_input_value_empty(&Json::Null));
        assert!(is_input_value_empty(&json!({})));
        assert!(!is_input_value_empty(&json!(false)));
        assert!(!is_input_value_empty(&json!(0.0)));
        assert!(!is_input_value_empty(&json!([0])));
    }
}
