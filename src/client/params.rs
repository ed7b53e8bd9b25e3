//! Request parameter values and their wire encodings.
//!
//! Parameters are an ordered mapping from string keys to scalars or ordered
//! lists of scalars. The same flattening rule applies to query strings and
//! multipart form fields: a scalar `k` becomes one `k` entry, a list
//! `k = [a, b]` becomes repeated `k[]` entries in original order. JSON
//! bodies keep the natural structure (lists stay arrays under the plain
//! key).

use crate::constants::multipart::LIST_FIELD_SUFFIX;
use serde_json::{Map, Value};

/// A single scalar parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Int(i64),
}

impl Scalar {
    /// UTF-8 text form used for query pairs and multipart parts
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Int(n) => n.to_string(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::Int(n) => Value::Number((*n).into()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

/// A parameter value: one scalar or an ordered list of scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl From<Scalar> for ParamValue {
    fn from(value: Scalar) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.into())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Scalar(value.into())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Scalar(value.into())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values.into_iter().map(Scalar::Text).collect())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(values: Vec<i64>) -> Self {
        ParamValue::List(values.into_iter().map(Scalar::Int).collect())
    }
}

/// Ordered request parameters. Insertion order is preserved so repeated
/// `key[]` entries come out in the order the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, ParamValue)> {
        self.0.iter()
    }

    /// Flattens parameters into wire pairs: scalars keep their key, lists
    /// expand to one `key[]` pair per element.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            match value {
                ParamValue::Scalar(scalar) => pairs.push((key.clone(), scalar.to_text())),
                ParamValue::List(items) => {
                    for item in items {
                        pairs.push((format!("{key}{LIST_FIELD_SUFFIX}"), item.to_text()));
                    }
                }
            }
        }
        pairs
    }

    /// Natural JSON object form for JSON-encoded request bodies
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (key, value) in &self.0 {
            let json = match value {
                ParamValue::Scalar(scalar) => scalar.to_json(),
                ParamValue::List(items) => {
                    Value::Array(items.iter().map(Scalar::to_json).collect())
                }
            };
            object.insert(key.clone(), json);
        }
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_to_text() {
        assert_eq!(Scalar::from("abc").to_text(), "abc");
        assert_eq!(Scalar::from(42).to_text(), "42");
        assert_eq!(Scalar::from(-7i64).to_text(), "-7");
    }

    #[test]
    fn test_query_pairs_preserve_insertion_order() {
        let params = Params::new()
            .with("b", "second")
            .with("a", "first")
            .with("n", 3);
        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("b".to_string(), "second".to_string()),
                ("a".to_string(), "first".to_string()),
                ("n".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_values_flatten_to_bracketed_keys() {
        let params = Params::new().with("tags", vec!["a", "b"]);
        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("tags[]".to_string(), "a".to_string()),
                ("tags[]".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_int_list_flattening() {
        let params = Params::new().with("ids", vec![3i64, 1, 2]);
        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("ids[]".to_string(), "3".to_string()),
                ("ids[]".to_string(), "1".to_string()),
                ("ids[]".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_json_body_keeps_natural_structure() {
        let params = Params::new()
            .with("name", "walk")
            .with("steps", 4200)
            .with("tags", vec!["daily", "outdoor"]);
        let json = params.to_json();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "walk",
                "steps": 4200,
                "tags": ["daily", "outdoor"],
            })
        );
    }

    #[test]
    fn test_empty_params() {
        let params = Params::new();
        assert!(params.is_empty());
        assert!(params.to_query_pairs().is_empty());
        assert_eq!(params.to_json(), serde_json::json!({}));
    }
}
