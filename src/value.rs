//! Attribute value types.
//!
//! A meta tag attribute holds either a single string or an ordered list of
//! strings. Lists keep their element order and are joined with commas when a
//! tag renders to HTML.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runtime representation of an attribute value.
///
/// Values decoded from JSON coerce numbers and booleans to their canonical
/// text, so `{"a": 1}` and `{"a": "1"}` produce the same attribute. A scalar
/// never equals a list, not even a one-element list holding the same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Single string value (e.g., `name="description"`)
    Scalar(String),

    /// Ordered list of strings (e.g., `content="key,words"`)
    List(Vec<String>),
}

impl AttrValue {
    /// Get the string if this is a Scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            AttrValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Get the list if this is a List.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Check whether the value holds no text at all.
    ///
    /// - Scalar: true for the empty string
    /// - List: true for the empty list
    pub fn is_empty(&self) -> bool {
        match self {
            AttrValue::Scalar(s) => s.is_empty(),
            AttrValue::List(v) => v.is_empty(),
        }
    }

    /// The text that ends up inside the rendered attribute, before escaping.
    ///
    /// Lists join with `,`. Elements containing commas are not quoted; the
    /// joined form does not distinguish them.
    pub fn to_text(&self) -> String {
        match self {
            AttrValue::Scalar(s) => s.clone(),
            AttrValue::List(v) => v.join(","),
        }
    }

    /// Coerce a decoded JSON value into an attribute value.
    ///
    /// Strings, numbers, and booleans become scalars using their canonical
    /// text. Arrays and objects flatten depth-first into a list of their
    /// scalar leaves. `None` means the value is JSON null, which the model
    /// cannot represent; callers drop the attribute.
    pub fn from_json(value: &Value) -> Option<AttrValue> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(AttrValue::Scalar(s.clone())),
            Value::Number(n) => Some(AttrValue::Scalar(n.to_string())),
            Value::Bool(b) => Some(AttrValue::Scalar(b.to_string())),
            Value::Array(_) | Value::Object(_) => {
                let mut leaves = Vec::new();
                collect_leaves(value, &mut leaves);
                Some(AttrValue::List(leaves))
            }
        }
    }
}

/// Depth-first scalar leaves of a JSON value. Nulls contribute nothing.
fn collect_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Array(items) => {
            for item in items {
                collect_leaves(item, out);
            }
        }
        Value::Object(entries) => {
            for item in entries.values() {
                collect_leaves(item, out);
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Scalar(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Scalar(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for AttrValue {
    fn from(values: Vec<S>) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for AttrValue {
    fn from(values: [S; N]) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_text_is_verbatim() {
        assert_eq!(AttrValue::from("viewport").to_text(), "viewport");
    }

    #[test]
    fn list_text_joins_with_commas() {
        assert_eq!(AttrValue::from(["key", "words"]).to_text(), "key,words");
    }

    #[test]
    fn scalar_never_equals_list() {
        assert_ne!(AttrValue::from("x"), AttrValue::from(["x"]));
    }

    #[test]
    fn is_empty_for_scalar_and_list() {
        assert!(AttrValue::from("").is_empty());
        assert!(AttrValue::List(vec![]).is_empty());
        assert!(!AttrValue::from("0").is_empty());
        assert!(!AttrValue::from([""]).is_empty());
    }

    #[test]
    fn as_scalar_extracts_string() {
        assert_eq!(AttrValue::from("a").as_scalar(), Some("a"));
        assert_eq!(AttrValue::from(["a"]).as_scalar(), None);
    }

    #[test]
    fn as_list_extracts_elements() {
        let list = vec!["a".to_string(), "b".to_string()];
        assert_eq!(AttrValue::from(list.clone()).as_list(), Some(list.as_slice()));
        assert_eq!(AttrValue::from("a").as_list(), None);
    }

    #[test]
    fn from_json_coerces_scalars_to_text() {
        assert_eq!(AttrValue::from_json(&json!("a")), Some(AttrValue::from("a")));
        assert_eq!(AttrValue::from_json(&json!(1)), Some(AttrValue::from("1")));
        assert_eq!(AttrValue::from_json(&json!(2.5)), Some(AttrValue::from("2.5")));
        assert_eq!(AttrValue::from_json(&json!(true)), Some(AttrValue::from("true")));
    }

    #[test]
    fn from_json_null_is_unrepresentable() {
        assert_eq!(AttrValue::from_json(&json!(null)), None);
    }

    #[test]
    fn from_json_flattens_nested_containers() {
        let value = json!([1, [2, "three"], { "x": 4 }, null]);
        assert_eq!(
            AttrValue::from_json(&value),
            Some(AttrValue::from(["1", "2", "three", "4"]))
        );
    }

    #[test]
    fn from_json_keeps_empty_lists() {
        assert_eq!(AttrValue::from_json(&json!([])), Some(AttrValue::List(vec![])));
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_string(&AttrValue::from("a")).unwrap(), "\"a\"");
        assert_eq!(
            serde_json::to_string(&AttrValue::from(["a", "b"])).unwrap(),
            "[\"a\",\"b\"]"
        );
    }
}
