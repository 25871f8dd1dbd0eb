//! A single meta tag: an insertion-ordered map of attribute names to values.
//!
//! `MetaTag` plays two roles. As a record it is one `<meta ...>` element in
//! the making; as a pattern it is the attribute subset handed to the bag's
//! matching operations. Both share the same representation, and only the
//! position in a call decides which role a value plays.

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::html::escape_attr;
use crate::value::AttrValue;

/// Attributes that identify a tag for merging, in priority order.
///
/// A tag carrying one of these through [`TagBag::merge`](crate::TagBag::merge)
/// replaces existing tags sharing the same name/value pair for the first of
/// these attributes it has.
pub const IDENTITY_ATTRIBUTES: &[&str] = &["name", "http-equiv", "itemprop", "property"];

/// Validates an attribute name according to the tag key rules.
///
/// Keys that read as positions rather than names are rejected: the empty
/// string, and numeric keys (an optional leading `-`, decimal digits, at
/// most one `.`). Insertion points skip such keys silently; this function is
/// for callers that want the failure.
///
/// # Examples
/// ```
/// use metabag::tag::validate_attribute_name;
///
/// assert!(validate_attribute_name("name").is_ok());
/// assert!(validate_attribute_name("http-equiv").is_ok());
/// assert!(validate_attribute_name("data-x1").is_ok());
///
/// assert!(validate_attribute_name("").is_err());
/// assert!(validate_attribute_name("1").is_err());
/// assert!(validate_attribute_name("-1").is_err());
/// assert!(validate_attribute_name("0.1").is_err());
/// ```
pub fn validate_attribute_name(name: &str) -> Result<(), AttributeNameError> {
    if name.is_empty() {
        return Err(AttributeNameError::Empty);
    }
    if is_numeric(name) {
        return Err(AttributeNameError::Numeric(name.to_string()));
    }
    Ok(())
}

/// Checks whether a key reads as a decimal number.
fn is_numeric(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for ch in digits.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Error type for attribute name validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeNameError {
    /// Attribute name is empty
    Empty,
    /// Attribute name reads as a number, which marks a positional entry
    Numeric(String),
}

impl fmt::Display for AttributeNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeNameError::Empty => write!(f, "attribute name cannot be empty"),
            AttributeNameError::Numeric(name) => {
                write!(f, "attribute name cannot be numeric, found '{}'", name)
            }
        }
    }
}

impl std::error::Error for AttributeNameError {}

/// One meta tag: attribute names mapped to values, in insertion order.
///
/// Equality ignores attribute order (`{a, c}` equals `{c, a}`); rendering
/// and serialization do not. Names failing [`validate_attribute_name`] are
/// silently skipped by every insertion path, so a tag never carries
/// positional keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct MetaTag {
    attrs: IndexMap<String, AttrValue>,
}

impl MetaTag {
    /// Create a tag with no attributes.
    pub fn new() -> Self {
        MetaTag::default()
    }

    /// Set an attribute, consuming and returning the tag for chaining.
    ///
    /// ```
    /// use metabag::MetaTag;
    ///
    /// let tag = MetaTag::new()
    ///     .attr("name", "keywords")
    ///     .attr("content", ["key", "words"]);
    /// assert_eq!(tag.to_html(), "<meta name=\"keywords\" content=\"key,words\">");
    /// ```
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an attribute in place. Re-setting an existing name replaces the
    /// value and keeps the attribute's original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        if validate_attribute_name(&name).is_ok() {
            self.attrs.insert(name, value.into());
        }
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// Check whether an attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// True when the tag has no attributes. Empty tags never survive
    /// normalization, so bags do not contain them.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attrs.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Treat `self` as a pattern and test it against `tag`.
    ///
    /// True when every attribute of the pattern appears in `tag` with a
    /// structurally equal value (lists compare element-wise, in order). A
    /// pattern with no attributes matches any tag; bag operations never
    /// produce one, because normalization drops empty records.
    pub fn matches(&self, tag: &MetaTag) -> bool {
        self.attrs
            .iter()
            .all(|(name, value)| tag.get(name) == Some(value))
    }

    /// The first identity attribute this tag carries, in priority order.
    pub fn identity(&self) -> Option<(&'static str, &AttrValue)> {
        IDENTITY_ATTRIBUTES
            .iter()
            .find_map(|name| self.get(name).map(|value| (*name, value)))
    }

    /// Render this tag as one `<meta ...>` element.
    ///
    /// Attributes appear in insertion order; list values join with `,`;
    /// `&`, `<`, `>`, and `"` are escaped in the attribute text.
    pub fn to_html(&self) -> String {
        let attrs = self
            .attrs
            .iter()
            .map(|(name, value)| format!("{}=\"{}\"", name, escape_attr(&value.to_text())))
            .collect::<Vec<_>>()
            .join(" ");
        format!("<meta {}>", attrs)
    }
}

impl fmt::Display for MetaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for MetaTag
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        let mut tag = MetaTag::new();
        for (name, value) in pairs {
            tag.set(name, value);
        }
        tag
    }
}

impl<'de> Deserialize<'de> for MetaTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Raw maps run through the same key and value rules as normalized
        // input, so positional keys cannot sneak in through serde.
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut tag = MetaTag::new();
        for (name, value) in raw {
            if let Some(value) = AttrValue::from_json(&value) {
                tag.set(name, value);
            }
        }
        Ok(tag)
    }
}
