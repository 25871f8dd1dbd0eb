//! Input normalization: everything a bag accepts funnels through here.
//!
//! Bag operations take "anything tag-shaped": single tags, collections of
//! tags, JSON text, other bags, providers. [`TagInput`] names each accepted
//! shape once, at the call boundary, and [`TagInput::into_tags`] reduces any
//! of them to a flat record list with one recursive walk.
//!
//! ## The key rule
//!
//! A decoded JSON object either *is* a tag or *holds* tags, decided by its
//! keys. If at least one key names an attribute (non-empty, non-numeric),
//! the object is one tag made of exactly those attribute entries, and any
//! positional entries at that level are discarded. If no key does, the
//! object is a list in disguise and each value is walked in order.
//!
//! ## Failure policy
//!
//! Text that does not parse as JSON contributes zero tags, silently. Callers
//! that need strictness validate before handing text in.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::bag::TagBag;
use crate::error::Result;
use crate::tag::{validate_attribute_name, MetaTag};
use crate::value::AttrValue;

/// A source of meta tags, resolved during normalization.
///
/// The bag a provider yields is spliced into the input at the provider's
/// position.
pub trait MetaTagProvider {
    /// The tags this value contributes.
    fn meta_tag_bag(&self) -> TagBag;
}

/// One input to a bag operation, named by shape.
pub enum TagInput {
    /// A single tag.
    Tag(MetaTag),
    /// A sequence of inputs, each normalized in order.
    List(Vec<TagInput>),
    /// JSON text: one object, an array of objects, or nested JSON strings.
    Json(String),
    /// Another bag, contributing its records in order.
    Bag(TagBag),
    /// A provider, contributing the bag it yields.
    Provider(Box<dyn MetaTagProvider>),
}

impl TagInput {
    /// Wrap a provider.
    pub fn provider(provider: impl MetaTagProvider + 'static) -> Self {
        TagInput::Provider(Box::new(provider))
    }

    /// Build an input from any serializable value.
    ///
    /// The value routes through its JSON form, so a struct with named fields
    /// becomes one tag and a sequence of such structs becomes one tag each.
    /// Serialization failures surface as errors; they are programming
    /// mistakes, not input data.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        Ok(TagInput::List(
            tags_from_value(value).into_iter().map(TagInput::Tag).collect(),
        ))
    }

    /// Reduce this input to a flat list of tags.
    ///
    /// Depth-first and left-to-right; empty records drop out. Feeding the
    /// output back in reproduces it.
    pub fn into_tags(self) -> Vec<MetaTag> {
        match self {
            TagInput::Tag(tag) => {
                if tag.is_empty() {
                    Vec::new()
                } else {
                    vec![tag]
                }
            }
            TagInput::List(items) => items.into_iter().flat_map(TagInput::into_tags).collect(),
            TagInput::Json(text) => decode(&text).map(tags_from_value).unwrap_or_default(),
            TagInput::Bag(bag) => bag.into_iter().collect(),
            TagInput::Provider(provider) => provider.meta_tag_bag().into_iter().collect(),
        }
    }
}

impl fmt::Debug for TagInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagInput::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            TagInput::List(items) => f.debug_tuple("List").field(items).finish(),
            TagInput::Json(text) => f.debug_tuple("Json").field(text).finish(),
            TagInput::Bag(bag) => f.debug_tuple("Bag").field(bag).finish(),
            TagInput::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

fn decode(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Walk a decoded JSON value into tags.
fn tags_from_value(value: Value) -> Vec<MetaTag> {
    match value {
        Value::Object(entries) => {
            let is_tag = entries.keys().any(|key| validate_attribute_name(key).is_ok());
            if is_tag {
                let mut tag = MetaTag::new();
                for (name, value) in entries {
                    if let Some(value) = AttrValue::from_json(&value) {
                        tag.set(name, value);
                    }
                }
                if tag.is_empty() {
                    Vec::new()
                } else {
                    vec![tag]
                }
            } else {
                // No attribute keys: the object is a list in disguise.
                entries
                    .into_iter()
                    .flat_map(|(_, value)| tags_from_value(value))
                    .collect()
            }
        }
        Value::Array(items) => items.into_iter().flat_map(tags_from_value).collect(),
        // Strings in list positions get their own decode pass.
        Value::String(text) => decode(&text).map(tags_from_value).unwrap_or_default(),
        // Bare numbers, booleans, and nulls carry no attributes.
        _ => Vec::new(),
    }
}

impl From<MetaTag> for TagInput {
    fn from(tag: MetaTag) -> Self {
        TagInput::Tag(tag)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for TagInput
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        TagInput::Tag(MetaTag::from(pairs))
    }
}

impl<const N: usize> From<[MetaTag; N]> for TagInput {
    fn from(tags: [MetaTag; N]) -> Self {
        TagInput::List(tags.into_iter().map(TagInput::Tag).collect())
    }
}

impl From<Vec<MetaTag>> for TagInput {
    fn from(tags: Vec<MetaTag>) -> Self {
        TagInput::List(tags.into_iter().map(TagInput::Tag).collect())
    }
}

impl From<Vec<TagInput>> for TagInput {
    fn from(items: Vec<TagInput>) -> Self {
        TagInput::List(items)
    }
}

impl From<&str> for TagInput {
    fn from(text: &str) -> Self {
        TagInput::Json(text.to_string())
    }
}

impl From<String> for TagInput {
    fn from(text: String) -> Self {
        TagInput::Json(text)
    }
}

impl From<TagBag> for TagInput {
    fn from(bag: TagBag) -> Self {
        TagInput::Bag(bag)
    }
}

impl From<&TagBag> for TagInput {
    fn from(bag: &TagBag) -> Self {
        TagInput::Bag(bag.clone())
    }
}
