//! Conversions to and from [`serde_json::Value`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::WriteError;
use crate::value::{ArrayValue, ElementValue, Number, ObjectValue};
use crate::visitor::ElementVisitor;

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

struct ToJsonValue;

fn json_number(v: f64) -> Result<Value, WriteError> {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .ok_or(WriteError::NonFiniteNumber(v))
}

impl<'a> ElementVisitor<'a> for ToJsonValue {
    type Output = Result<Value, WriteError>;

    fn visit_null(&mut self) -> Self::Output {
        Ok(Value::Null)
    }

    fn visit_boolean(&mut self, value: bool) -> Self::Output {
        Ok(Value::Bool(value))
    }

    fn visit_number(&mut self, value: Number) -> Self::Output {
        match value {
            Number::Int8(v) => Ok(Value::from(v)),
            Number::Int16(v) => Ok(Value::from(v)),
            Number::Int32(v) => Ok(Value::from(v)),
            Number::Int64(v) => Ok(Value::from(v)),
            Number::UInt32(v) => Ok(Value::from(v)),
            Number::Float32(v) => json_number(v as f64),
            Number::Number64(v) | Number::Float64(v) => {
                if v.fract() == 0.0 && v.abs() < MAX_SAFE_INTEGER {
                    Ok(Value::from(v as i64))
                } else {
                    json_number(v)
                }
            }
        }
    }

    fn visit_string(&mut self, value: &str) -> Self::Output {
        Ok(Value::String(value.to_owned()))
    }

    fn visit_guid(&mut self, value: Uuid) -> Self::Output {
        Ok(Value::String(value.hyphenated().to_string()))
    }

    fn visit_binary(&mut self, value: &[u8]) -> Self::Output {
        Ok(Value::String(format!(
            "data:application/octet-stream;base64,{}",
            STANDARD.encode(value)
        )))
    }

    fn visit_array(&mut self, value: &ArrayValue<'a>) -> Self::Output {
        value
            .iter()
            .map(|item| item.accept(self))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn visit_object(&mut self, value: &ObjectValue<'a>) -> Self::Output {
        let mut map = Map::with_capacity(value.len());
        for (key, item) in value {
            map.insert(key.into_owned(), item.accept(self)?);
        }
        Ok(Value::Object(map))
    }
}

/// Converts any value, lazy or eager, into a [`serde_json::Value`].
///
/// Extended kinds map the same way the JSON text writer prints them. When an
/// object repeats a key the last value wins.
pub fn to_json_value(value: &ElementValue<'_>) -> Result<Value, WriteError> {
    value.accept(&mut ToJsonValue)
}

impl ElementValue<'_> {
    pub fn to_json_value(&self) -> Result<Value, WriteError> {
        to_json_value(self)
    }
}

impl From<Value> for ElementValue<'static> {
    /// Numbers become untyped [`Number::Number64`] values.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ElementValue::Null,
            Value::Bool(b) => ElementValue::Boolean(b),
            Value::Number(n) => ElementValue::Number(Number::Number64(n.as_f64().unwrap_or(0.0))),
            Value::String(s) => ElementValue::from(s),
            Value::Array(items) => {
                ElementValue::Array(items.into_iter().map(ElementValue::from).collect())
            }
            Value::Object(map) => ElementValue::Object(
                map.into_iter()
                    .map(|(key, item)| (key, ElementValue::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for ElementValue<'static> {
    fn from(value: &Value) -> Self {
        ElementValue::from(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::navigator::TextNavigator;

    #[test]
    fn converts_to_serde_values() {
        let value = ElementValue::Object(ObjectValue::new([
            ("n", ElementValue::from(3.0f64)),
            ("f", ElementValue::from(0.25f64)),
            ("i", ElementValue::from(-7i8)),
            ("s", ElementValue::from("x")),
            ("b", ElementValue::from(vec![1u8, 2, 3])),
            ("a", ElementValue::Array(ArrayValue::new([ElementValue::Null]))),
        ]));
        assert_eq!(
            value.to_json_value().unwrap(),
            json!({
                "n": 3,
                "f": 0.25,
                "i": -7,
                "s": "x",
                "b": "data:application/octet-stream;base64,AQID",
                "a": [null],
            })
        );
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let value = ElementValue::Array(ArrayValue::new([ElementValue::from(f64::NAN)]));
        assert!(matches!(
            to_json_value(&value),
            Err(WriteError::NonFiniteNumber(v)) if v.is_nan()
        ));
    }

    #[test]
    fn converts_from_serde_values() {
        let source = json!({"a": [1, true, null], "b": {"c": "d"}, "e": 1.5});
        let value = ElementValue::from(&source);
        assert!(!value.is_lazy());
        let nav = TextNavigator::parse(&source.to_string()).unwrap();
        assert_eq!(value, ElementValue::from_navigator(&nav));
        assert_eq!(to_json_value(&value).unwrap(), source);
    }
}
