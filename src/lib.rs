//! # Metabag
//!
//! An ordered, deduplicating bag of HTML `<meta>` tags. Collect tag data
//! from wherever it lives (layout defaults, page front matter, JSON
//! config, other bags), let later additions override earlier ones, and
//! render the result as HTML head elements.
//!
//! ## Quick Example
//!
//! ```rust
//! use metabag::TagBag;
//!
//! let mut bag = TagBag::make(r#"[
//!     {"charset": "utf-8"},
//!     {"name": "description", "content": "Stale description"}
//! ]"#);
//! bag.merge([("name", "description"), ("content", "Fresh description")]);
//!
//! assert_eq!(
//!     bag.to_html(),
//!     "<meta charset=\"utf-8\">\n<meta name=\"description\" content=\"Fresh description\">"
//! );
//! ```
//!
//! ## The Pipeline
//!
//! ```text
//! pairs, tags, arrays, JSON text, bags, providers
//!                     │
//!                     ▼  normalization (input)
//!             TagBag of MetaTags
//!                     │
//!                     ▼  unique() + sorted()
//!         <meta ...> elements, one per line
//! ```
//!
//! Every method taking tags or patterns accepts any [`TagInput`] shape, so
//! `add`, `merge`, `forget` and the query methods all share one input
//! vocabulary. Malformed input (invalid JSON, numeric attribute names,
//! null values) is dropped silently rather than reported; a meta tag
//! source should degrade, not take the page down.
//!
//! ## Mutation vs Values
//!
//! `add`, `merge` and `forget` edit the bag in place and return
//! `&mut Self` for chaining. `matching`, `unique`, `unique_by`, `sorted`
//! and `sorted_by` return a new bag and never touch the receiver.
//! Rendering composes the value-returning half: [`TagBag::to_html`] is
//! `unique().sorted()` plus escaping.
//!
//! ## Module Overview
//!
//! - [`bag`]: The [`TagBag`] collection and its operations
//! - [`tag`]: A single [`MetaTag`] and attribute-name validation
//! - [`value`]: Attribute values, scalar or list ([`AttrValue`])
//! - [`input`]: Input normalization ([`TagInput`], [`MetaTagProvider`])
//! - [`order`]: The default rendering order ([`default_order`])
//! - [`error`]: Error types

pub mod bag;
pub mod error;
mod html;
pub mod input;
pub mod order;
pub mod tag;
pub mod value;

pub use bag::TagBag;
pub use error::{MetabagError, Result};
pub use input::{MetaTagProvider, TagInput};
pub use order::default_order;
pub use tag::{validate_attribute_name, AttributeNameError, MetaTag, IDENTITY_ATTRIBUTES};
pub use value::AttrValue;
