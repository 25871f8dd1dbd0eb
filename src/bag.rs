//! The tag bag: an ordered collection of meta tags.
//!
//! Two kinds of operations, split by signature:
//!
//! - **Mutating** (`add`, `merge`, `forget`) edit the bag in place and
//!   return `&mut Self` so calls chain.
//! - **Value-returning** (`matching`, `unique`, `unique_by`, `sorted`,
//!   `sorted_by`) build a new bag and leave the receiver untouched.
//!
//! Every argument carrying tags or patterns accepts any [`TagInput`] shape
//! and is normalized first.

use serde::de::{Deserialize, Deserializer};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::error::Result;
use crate::input::TagInput;
use crate::order::default_order;
use crate::tag::MetaTag;
use crate::value::AttrValue;

/// An ordered bag of meta tags.
///
/// Duplicates are allowed; collapsing them is an explicit operation (and
/// part of rendering). Tags keep the order they were added in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TagBag {
    tags: Vec<MetaTag>,
}

impl TagBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        TagBag::default()
    }

    /// Create a bag from any accepted input shape.
    ///
    /// ```
    /// use metabag::TagBag;
    ///
    /// let bag = TagBag::make([("name", "description"), ("content", "A page")]);
    /// assert_eq!(bag.len(), 1);
    ///
    /// let from_json = TagBag::make(r#"[{"charset":"utf-8"},{"name":"a","content":"b"}]"#);
    /// assert_eq!(from_json.len(), 2);
    /// ```
    pub fn make(input: impl Into<TagInput>) -> Self {
        TagBag {
            tags: input.into().into_tags(),
        }
    }

    /// Number of tags, duplicates included.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True when the bag holds no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The tags in bag order.
    pub fn tags(&self) -> &[MetaTag] {
        &self.tags
    }

    /// Iterate tags in bag order.
    pub fn iter(&self) -> std::slice::Iter<'_, MetaTag> {
        self.tags.iter()
    }

    /// Append tags. Duplicates are kept; use [`unique`](Self::unique) or
    /// [`merge`](Self::merge) to collapse them.
    pub fn add(&mut self, input: impl Into<TagInput>) -> &mut Self {
        self.tags.extend(input.into().into_tags());
        self
    }

    /// Tags matching at least one of the given patterns, in bag order.
    ///
    /// A pattern matches a tag when every one of its attributes appears in
    /// the tag with an equal value. With no patterns the result is empty.
    ///
    /// ```
    /// use metabag::TagBag;
    ///
    /// let mut bag = TagBag::make([("name", "a"), ("content", "1")]);
    /// bag.add([("name", "b"), ("content", "2")]);
    ///
    /// assert_eq!(bag.matching([("name", "b")]).len(), 1);
    /// assert!(bag.matching([("name", "c")]).is_empty());
    /// ```
    pub fn matching(&self, patterns: impl Into<TagInput>) -> TagBag {
        let patterns = patterns.into().into_tags();
        TagBag {
            tags: self
                .tags
                .iter()
                .filter(|tag| patterns.iter().any(|pattern| pattern.matches(tag)))
                .cloned()
                .collect(),
        }
    }

    /// Number of tags matching any of the given patterns.
    pub fn count_matching(&self, patterns: impl Into<TagInput>) -> usize {
        let patterns = patterns.into().into_tags();
        self.tags
            .iter()
            .filter(|tag| patterns.iter().any(|pattern| pattern.matches(tag)))
            .count()
    }

    /// True when at least one tag matches any of the given patterns.
    pub fn has(&self, patterns: impl Into<TagInput>) -> bool {
        let patterns = patterns.into().into_tags();
        self.tags
            .iter()
            .any(|tag| patterns.iter().any(|pattern| pattern.matches(tag)))
    }

    /// The `content` value of the last tag matching the given patterns.
    pub fn content(&self, patterns: impl Into<TagInput>) -> Option<AttrValue> {
        self.last_matching_attribute("content", patterns)
    }

    /// The value of `attribute` on the **last** tag matching any pattern.
    ///
    /// `None` when nothing matches, and also when the last matching tag
    /// lacks the attribute, even if an earlier match carries it.
    pub fn last_matching_attribute(
        &self,
        attribute: &str,
        patterns: impl Into<TagInput>,
    ) -> Option<AttrValue> {
        let patterns = patterns.into().into_tags();
        self.tags
            .iter()
            .rev()
            .find(|tag| patterns.iter().any(|pattern| pattern.matches(tag)))
            .and_then(|tag| tag.get(attribute))
            .cloned()
    }

    /// Collapse duplicates, keeping the latest occurrence of each.
    ///
    /// Tags deduplicate by whole-tag equality (attribute order aside), and
    /// survivors keep their original relative order.
    pub fn unique(&self) -> TagBag {
        self.unique_by(Vec::<MetaTag>::new())
    }

    /// Collapse duplicates, treating tags that match a pattern as one group.
    ///
    /// For each pattern, in order, all matching tags collapse to the latest
    /// of them. Tags matching no pattern deduplicate by whole-tag equality.
    /// Survivors keep their original relative order.
    ///
    /// ```
    /// use metabag::TagBag;
    ///
    /// let mut bag = TagBag::make([("name", "a"), ("content", "old")]);
    /// bag.add([("name", "a"), ("content", "new")]);
    ///
    /// let unique = bag.unique_by([("name", "a")]);
    /// assert_eq!(unique.to_html(), "<meta name=\"a\" content=\"new\">");
    /// ```
    pub fn unique_by(&self, patterns: impl Into<TagInput>) -> TagBag {
        let patterns = patterns.into().into_tags();

        // Work latest-first so "keep the first seen" means "keep the latest".
        let mut tags: Vec<MetaTag> = self.tags.iter().rev().cloned().collect();
        for pattern in &patterns {
            tags = dedup_keeping_first(tags, Some(pattern));
        }
        let mut tags = dedup_keeping_first(tags, None);
        tags.reverse();
        TagBag { tags }
    }

    /// Remove every tag matching any of the given patterns.
    ///
    /// With no patterns nothing is removed.
    pub fn forget(&mut self, patterns: impl Into<TagInput>) -> &mut Self {
        let patterns = patterns.into().into_tags();
        self.tags
            .retain(|tag| !patterns.iter().any(|pattern| pattern.matches(tag)));
        self
    }

    /// Add tags, replacing existing tags that share an identity.
    ///
    /// A tag carrying one of [`IDENTITY_ATTRIBUTES`](crate::IDENTITY_ATTRIBUTES)
    /// (the first present wins) replaces every existing tag with the same
    /// name/value pair for that attribute. When both the incoming and the
    /// replaced tag hold a list `content`, the incoming list absorbs the
    /// existing values: new values first, then missing ones, duplicates
    /// dropped. Tags with no identity attribute are appended as-is.
    ///
    /// Incoming tags are processed one at a time, so later tags in the same
    /// call replace earlier ones sharing an identity.
    ///
    /// ```
    /// use metabag::{AttrValue, TagBag};
    ///
    /// let mut bag = TagBag::make([("name", "description"), ("content", "old")]);
    /// bag.merge([("name", "description"), ("content", "new")]);
    ///
    /// assert_eq!(bag.len(), 1);
    /// assert_eq!(bag.content([("name", "description")]), Some(AttrValue::from("new")));
    /// ```
    pub fn merge(&mut self, input: impl Into<TagInput>) -> &mut Self {
        for mut tag in input.into().into_tags() {
            let identity = tag.identity().map(|(name, value)| (name, value.clone()));
            let Some((name, value)) = identity else {
                self.tags.push(tag);
                continue;
            };
            let target = MetaTag::new().attr(name, value);

            // List contents absorb the values of the tag they replace.
            if let Some(AttrValue::List(existing)) = self.content(target.clone()) {
                if let Some(AttrValue::List(new)) = tag.get("content") {
                    let union = list_union(new, &existing);
                    tag.set("content", AttrValue::List(union));
                }
            }

            self.forget(target);
            self.tags.push(tag);
        }
        self
    }

    /// A copy of this bag in default rendering order.
    ///
    /// See [`default_order`] for the tiers and what happens to ties.
    pub fn sorted(&self) -> TagBag {
        self.sorted_by(default_order)
    }

    /// A copy of this bag ordered by `compare`.
    ///
    /// The comparator fully replaces the default ordering.
    pub fn sorted_by(&self, compare: impl FnMut(&MetaTag, &MetaTag) -> Ordering) -> TagBag {
        let mut tags = self.tags.clone();
        tags.sort_by(compare);
        TagBag { tags }
    }

    /// Render the bag as HTML, one `<meta ...>` element per line.
    ///
    /// Rendering always goes through `unique().sorted()` first, so the text
    /// holds no duplicates and leads with charset and UA compatibility tags.
    /// No trailing newline.
    pub fn to_html(&self) -> String {
        self.unique()
            .sorted()
            .tags
            .iter()
            .map(MetaTag::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The bag as a JSON array of attribute objects.
    ///
    /// Feeding the text back through [`TagBag::make`] reproduces an equal
    /// bag.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One dedup pass over a latest-first sequence. Tags matching `pattern`
/// share one slot (the first kept wins); all other tags deduplicate by
/// equality. Order is preserved.
fn dedup_keeping_first(tags: Vec<MetaTag>, pattern: Option<&MetaTag>) -> Vec<MetaTag> {
    let mut kept: Vec<MetaTag> = Vec::with_capacity(tags.len());
    let mut pattern_taken = false;
    for tag in tags {
        let duplicate = match pattern {
            Some(pattern) if pattern.matches(&tag) => {
                let taken = pattern_taken;
                pattern_taken = true;
                taken
            }
            _ => kept.contains(&tag),
        };
        if !duplicate {
            kept.push(tag);
        }
    }
    kept
}

/// Union of two string lists: `new` first, then whatever `existing` adds.
/// First occurrence of each value wins.
fn list_union(new: &[String], existing: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(new.len() + existing.len());
    for value in new.iter().chain(existing) {
        if !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}

impl fmt::Display for TagBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl FromIterator<MetaTag> for TagBag {
    fn from_iter<I: IntoIterator<Item = MetaTag>>(iter: I) -> Self {
        TagBag {
            tags: iter.into_iter().filter(|tag| !tag.is_empty()).collect(),
        }
    }
}

impl IntoIterator for TagBag {
    type Item = MetaTag;
    type IntoIter = std::vec::IntoIter<MetaTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagBag {
    type Item = &'a MetaTag;
    type IntoIter = std::slice::Iter<'a, MetaTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl<'de> Deserialize<'de> for TagBag {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Each tag filters its own keys; records left empty by that drop
        // out the way they would in normalization.
        let tags = Vec::<MetaTag>::deserialize(deserializer)?;
        Ok(tags.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_accepts_attribute_pairs() {
        let bag = TagBag::make([("name", "description"), ("content", "A description")]);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn add_keeps_duplicates_and_chains() {
        let mut bag = TagBag::new();
        bag.add([("a", "b")]).add([("a", "b")]);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn add_accepts_json_text() {
        let mut bag = TagBag::new();
        bag.add(r#"[{"name":"a","content":"1"},{"name":"b","content":"2"}]"#);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn add_accepts_another_bag() {
        let mut bag = TagBag::make([("a", "1")]);
        let other = TagBag::make([("b", "2")]);
        bag.add(&other);
        assert_eq!(bag.len(), 2);
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn matching_selects_by_attribute_subset() {
        let mut bag = TagBag::make([("name", "a"), ("content", "1")]);
        bag.add([("name", "b"), ("content", "2")]);
        bag.add([("itemprop", "c")]);

        let found = bag.matching([("name", "b")]);
        assert_eq!(found.len(), 1);
        assert_eq!(found.tags()[0].get("content"), Some(&AttrValue::from("2")));
    }

    #[test]
    fn matching_with_several_patterns_is_a_union() {
        let mut bag = TagBag::make([("name", "a")]);
        bag.add([("name", "b")]);
        bag.add([("name", "c")]);

        let found = bag.matching([
            MetaTag::from([("name", "a")]),
            MetaTag::from([("name", "c")]),
        ]);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn matching_without_patterns_is_empty() {
        let bag = TagBag::make([("name", "a")]);
        assert!(bag.matching(Vec::<MetaTag>::new()).is_empty());
    }

    #[test]
    fn count_matching_and_has() {
        let mut bag = TagBag::make([("name", "a"), ("content", "1")]);
        bag.add([("name", "a"), ("content", "2")]);
        bag.add([("name", "b")]);

        assert_eq!(bag.count_matching([("name", "a")]), 2);
        assert!(bag.has([("name", "b")]));
        assert!(!bag.has([("name", "c")]));
    }

    #[test]
    fn content_returns_the_last_matching_value() {
        let mut bag = TagBag::make([("name", "a"), ("content", "skip this")]);
        bag.add([("name", "a"), ("content", "find this")]);
        assert_eq!(bag.content([("name", "a")]), Some(AttrValue::from("find this")));
    }

    #[test]
    fn content_is_none_without_a_match() {
        let bag = TagBag::make([("name", "a"), ("content", "1")]);
        assert_eq!(bag.content([("name", "b")]), None);
    }

    #[test]
    fn last_matching_attribute_reads_only_the_last_match() {
        let mut bag = TagBag::make([("name", "a"), ("other", "yes")]);
        bag.add([("name", "a"), ("content", "2")]);
        // The last match has no "other"; the earlier value is not consulted.
        assert_eq!(bag.last_matching_attribute("other", [("name", "a")]), None);
        assert_eq!(
            bag.last_matching_attribute("content", [("name", "a")]),
            Some(AttrValue::from("2"))
        );
    }

    #[test]
    fn unique_keeps_the_latest_duplicate() {
        let mut bag = TagBag::make([("a", "b"), ("c", "d")]);
        bag.add([("c", "d"), ("a", "b")]);
        bag.add([("a", "b"), ("c", "d"), ("e", "f")]);

        let unique = bag.unique();
        assert_eq!(unique.len(), 2);
        // The survivor is the later duplicate, with its own attribute order.
        assert_eq!(unique.tags()[0].to_html(), "<meta c=\"d\" a=\"b\">");
    }

    #[test]
    fn unique_by_collapses_matching_tags_to_the_latest() {
        let mut bag = TagBag::make([("a", "b"), ("c", "d"), ("loose", "end")]);
        bag.add([("c", "d"), ("a", "b")]);
        bag.add([("keep", "me")]);
        bag.add([("keep", "me too")]);

        let unique = bag.unique_by([("a", "b")]);
        assert_eq!(
            unique.tags(),
            &[
                MetaTag::from([("c", "d"), ("a", "b")]),
                MetaTag::from([("keep", "me")]),
                MetaTag::from([("keep", "me too")]),
            ]
        );
    }

    #[test]
    fn unique_by_cascades_patterns_in_order() {
        let mut bag = TagBag::make([("name", "a"), ("content", "1")]);
        bag.add([("name", "a"), ("content", "2")]);
        bag.add([("name", "b"), ("content", "3")]);
        bag.add([("name", "b"), ("content", "4")]);

        let unique = bag.unique_by([
            MetaTag::from([("name", "a")]),
            MetaTag::from([("name", "b")]),
        ]);
        assert_eq!(
            unique.tags(),
            &[
                MetaTag::from([("name", "a"), ("content", "2")]),
                MetaTag::from([("name", "b"), ("content", "4")]),
            ]
        );
    }

    #[test]
    fn unique_is_idempotent_and_leaves_the_source_alone() {
        let mut bag = TagBag::make([("a", "b")]);
        bag.add([("a", "b")]);

        let once = bag.unique();
        let twice = once.unique();
        assert_eq!(once, twice);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn forget_removes_matching_tags() {
        let mut bag = TagBag::make([("name", "a"), ("content", "1")]);
        bag.add([("name", "b"), ("content", "2")]);
        bag.forget([("name", "a")]);
        assert_eq!(bag.len(), 1);
        assert!(bag.has([("name", "b")]));
    }

    #[test]
    fn forget_with_several_patterns_removes_each() {
        let mut bag = TagBag::make([("name", "a")]);
        bag.add([("name", "b")]);
        bag.add([("name", "c")]);
        bag.forget([MetaTag::from([("name", "a")]), MetaTag::from([("name", "c")])]);
        assert_eq!(bag.len(), 1);
        assert!(bag.has([("name", "b")]));
    }

    #[test]
    fn forget_without_patterns_is_a_no_op() {
        let mut bag = TagBag::make([("name", "a")]);
        bag.forget(Vec::<MetaTag>::new());
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn merge_appends_tags_without_identity() {
        let mut bag = TagBag::make([("charset", "utf-8")]);
        bag.merge([("charset", "utf-8")]);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn merge_replaces_by_each_identity_attribute() {
        for attr in ["name", "http-equiv", "itemprop", "property"] {
            let mut bag = TagBag::new();
            bag.add(MetaTag::new().attr(attr, "x").attr("content", "old"));
            bag.merge(MetaTag::new().attr(attr, "x").attr("content", "new"));
            assert_eq!(bag.len(), 1, "attribute {}", attr);
            assert_eq!(
                bag.content(MetaTag::new().attr(attr, "x")),
                Some(AttrValue::from("new")),
                "attribute {}",
                attr
            );
        }
    }

    #[test]
    fn merge_replaces_the_whole_tag_not_single_attributes() {
        let mut bag = TagBag::make([("name", "a"), ("loose", "me")]);
        bag.merge([("name", "a")]);
        assert_eq!(bag.tags(), &[MetaTag::from([("name", "a")])]);
    }

    #[test]
    fn merge_only_replaces_tags_sharing_the_identity_value() {
        let mut bag = TagBag::make([("name", "a"), ("content", "1")]);
        bag.add([("name", "b"), ("content", "2")]);
        bag.merge([("name", "a"), ("content", "3")]);

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.content([("name", "a")]), Some(AttrValue::from("3")));
        assert_eq!(bag.content([("name", "b")]), Some(AttrValue::from("2")));
    }

    #[test]
    fn merge_uses_the_first_identity_attribute_present() {
        let mut bag = TagBag::make([("name", "a"), ("content", "keep")]);
        bag.add([("property", "p"), ("content", "also keep")]);

        // name outranks property, so only the name tag is replaced.
        bag.merge([("name", "a"), ("property", "p"), ("content", "new")]);

        assert_eq!(bag.len(), 2);
        assert!(bag.has([("content", "also keep")]));
        assert!(!bag.has([("content", "keep")]));
    }

    #[test]
    fn merge_unions_list_contents() {
        let mut bag = TagBag::new();
        bag.add(MetaTag::new().attr("name", "keywords").attr("content", ["1", "2"]));
        bag.merge(MetaTag::new().attr("name", "keywords").attr("content", ["3", "2"]));

        assert_eq!(bag.len(), 1);
        assert_eq!(
            bag.content([("name", "keywords")]),
            Some(AttrValue::from(["3", "2", "1"]))
        );
    }

    #[test]
    fn merge_does_not_union_scalar_contents() {
        let mut bag = TagBag::new();
        bag.add(MetaTag::new().attr("name", "keywords").attr("content", "1,2"));
        bag.merge(MetaTag::new().attr("name", "keywords").attr("content", ["3", "2"]));
        assert_eq!(
            bag.content([("name", "keywords")]),
            Some(AttrValue::from(["3", "2"]))
        );
    }

    #[test]
    fn merge_later_tags_replace_earlier_ones_in_the_same_call() {
        let mut bag = TagBag::new();
        bag.merge(r#"[{"name":"a","content":"1"},{"name":"a","content":"2"}]"#);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.content([("name", "a")]), Some(AttrValue::from("2")));
    }

    #[test]
    fn sorted_orders_charset_then_ua_compatibility_then_the_rest() {
        let mut bag = TagBag::make([("no", "1")]);
        bag.add([("http-equiv", "X-UA-Compatible"), ("content", "IE=edge")]);
        bag.add([("no", "2")]);
        bag.add([("no", "3")]);
        bag.add([("charset", "utf-8")]);

        let rendered: Vec<String> = bag.sorted().iter().map(MetaTag::to_html).collect();
        assert_eq!(
            rendered,
            [
                "<meta charset=\"utf-8\">",
                "<meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">",
                "<meta no=\"1\">",
                "<meta no=\"2\">",
                "<meta no=\"3\">",
            ]
        );
    }

    #[test]
    fn sorted_by_replaces_the_default_order() {
        let mut bag = TagBag::make([("name", "b")]);
        bag.add([("charset", "utf-8")]);

        let sorted = bag.sorted_by(|a, b| b.to_html().cmp(&a.to_html()));
        assert_eq!(sorted.tags()[0], MetaTag::from([("name", "b")]));
    }

    #[test]
    fn sorted_leaves_the_source_alone() {
        let mut bag = TagBag::make([("name", "a")]);
        bag.add([("charset", "utf-8")]);

        let sorted = bag.sorted();
        assert_eq!(bag.tags()[0], MetaTag::from([("name", "a")]));
        assert_eq!(sorted.tags()[0], MetaTag::from([("charset", "utf-8")]));
    }

    #[test]
    fn to_html_renders_one_element_per_line() {
        let mut bag = TagBag::make([("name", "a"), ("content", "1")]);
        bag.add([("name", "b"), ("content", "2")]);
        assert_eq!(
            bag.to_html(),
            "<meta name=\"a\" content=\"1\">\n<meta name=\"b\" content=\"2\">"
        );
    }

    #[test]
    fn to_html_deduplicates_and_sorts() {
        let mut bag = TagBag::make([("name", "a")]);
        bag.add([("charset", "utf-8")]);
        bag.add([("name", "a")]);
        assert_eq!(bag.to_html(), "<meta charset=\"utf-8\">\n<meta name=\"a\">");
    }

    #[test]
    fn display_renders_html() {
        let bag = TagBag::make([("name", "a")]);
        assert_eq!(bag.to_string(), "<meta name=\"a\">");
    }

    #[test]
    fn to_json_round_trips_through_make() {
        let mut bag = TagBag::new();
        bag.add(MetaTag::new().attr("name", "keywords").attr("content", ["key", "words"]));
        bag.add([("charset", "utf-8")]);

        let json = bag.to_json().unwrap();
        assert_eq!(TagBag::make(json), bag);
    }

    #[test]
    fn deserialize_filters_positional_keys_and_empty_tags() {
        let bag: TagBag = serde_json::from_str(r#"[{"name":"a"},{"1":"x"}]"#).unwrap();
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn collects_from_tags_skipping_empty_ones() {
        let bag: TagBag = vec![MetaTag::from([("a", "b")]), MetaTag::new()]
            .into_iter()
            .collect();
        assert_eq!(bag.len(), 1);
    }
}
