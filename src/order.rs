//! Default rendering order for meta tags.

use std::cmp::Ordering;

use crate::tag::MetaTag;
use crate::value::AttrValue;

/// The default comparator used by [`TagBag::sorted`](crate::TagBag::sorted).
///
/// Three tiers: tags with a non-empty `charset` come first, tags declaring
/// `http-equiv="X-UA-Compatible"` follow, everything else sorts last. Ties
/// compare equal; the bag sorts stably, so ties keep their relative order,
/// but that is a property of the current implementation rather than a
/// contract.
pub fn default_order(a: &MetaTag, b: &MetaTag) -> Ordering {
    render_rank(a).cmp(&render_rank(b))
}

/// Rank in the document head: charset, then UA compatibility, then the rest.
fn render_rank(tag: &MetaTag) -> u8 {
    if tag.get("charset").is_some_and(|v| !v.is_empty()) {
        return 0;
    }
    if matches!(tag.get("http-equiv"), Some(AttrValue::Scalar(s)) if s == "X-UA-Compatible") {
        return 1;
    }
    2
}
