//! Formatting attributes and their algebra.
//!
//! An [`AttributeMap`] maps attribute names to JSON values. A value of
//! `null` means "unset this attribute", which is different from the key
//! being absent ("no opinion"). Attribute sets are passed around as
//! `Option<AttributeMap>`: `None` is the canonical empty set and every
//! function in this module returns `None` rather than an empty map.

use indexmap::IndexMap;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap(IndexMap<String, Value>);

impl AttributeMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Collapses the empty map to `None`.
    pub fn into_non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// JSON object form, `null` values included.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl From<Map<String, Value>> for AttributeMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds an [`AttributeMap`] from a JSON object literal.
///
/// ```
/// use rich_delta::attrs;
///
/// let a = attrs! { "bold": true, "font": null };
/// assert_eq!(a.len(), 2);
/// assert!(a.get("font").is_some_and(|v| v.is_null()));
/// ```
#[macro_export]
macro_rules! attrs {
    ($($tt:tt)*) => {
        match $crate::__private::serde_json::json!({ $($tt)* }) {
            $crate::__private::serde_json::Value::Object(map) => $crate::AttributeMap::from(map),
            _ => unreachable!("object literal"),
        }
    };
}

// ── Algebra ───────────────────────────────────────────────────────────────

/// Layers `b` on top of `a`.
///
/// Keys of `b` win. With `keep_null == false` the `null` entries of `b` are
/// dropped, finalizing the removal; with `keep_null == true` they survive so
/// they can later be reconciled against the attributes of the content a
/// retain is applied to. Keys of `a` that `b` does not name are carried over.
pub fn compose(
    a: Option<&AttributeMap>,
    b: Option<&AttributeMap>,
    keep_null: bool,
) -> Option<AttributeMap> {
    let mut attributes = b.cloned().unwrap_or_default();
    if !keep_null {
        attributes.0.retain(|_, value| !value.is_null());
    }
    if let Some(a) = a {
        for (key, value) in a {
            if !b.is_some_and(|b| b.contains_key(key)) {
                attributes.0.insert(key.clone(), value.clone());
            }
        }
    }
    attributes.into_non_empty()
}

/// Attributes that turn `a` into `b`.
///
/// A key absent on one side differs from any value on the other, `null`
/// included. Keys missing from `b` are reported as `null`.
pub fn diff(a: Option<&AttributeMap>, b: Option<&AttributeMap>) -> Option<AttributeMap> {
    let empty = AttributeMap::new();
    let a = a.unwrap_or(&empty);
    let b = b.unwrap_or(&empty);
    let mut attributes = AttributeMap::new();
    for key in a.keys().chain(b.keys()) {
        if attributes.contains_key(key) {
            continue;
        }
        if a.get(key) != b.get(key) {
            attributes.insert(key.clone(), b.get(key).cloned().unwrap_or(Value::Null));
        }
    }
    attributes.into_non_empty()
}

/// Attributes that undo `attr` when applied over content formatted with `base`.
pub fn invert(attr: Option<&AttributeMap>, base: Option<&AttributeMap>) -> Option<AttributeMap> {
    let empty = AttributeMap::new();
    let attr = attr.unwrap_or(&empty);
    let base = base.unwrap_or(&empty);
    let mut inverted = AttributeMap::new();
    for (key, value) in base {
        if attr.get(key).is_some_and(|applied| applied != value) {
            inverted.insert(key.clone(), value.clone());
        }
    }
    // Unsetting a key the base never had leaves nothing to restore.
    for (key, value) in attr {
        if !value.is_null() && !base.contains_key(key) {
            inverted.insert(key.clone(), Value::Null);
        }
    }
    inverted.into_non_empty()
}

/// Resolves `b` against a concurrent `a` made on the same content.
///
/// Without priority `b` simply overwrites. With priority `a` is considered
/// to have happened first and keeps every key it names.
pub fn transform(
    a: Option<&AttributeMap>,
    b: Option<&AttributeMap>,
    priority: bool,
) -> Option<AttributeMap> {
    let Some(a) = a else {
        return b.cloned().and_then(AttributeMap::into_non_empty);
    };
    let b = b?;
    if !priority {
        return b.clone().into_non_empty();
    }
    b.iter()
        .filter(|(key, _)| !a.contains_key(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect::<AttributeMap>()
        .into_non_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    fn format() -> AttributeMap {
        attrs! { "bold": true, "color": "red" }
    }

    // ── compose ─────────────────────────────────────────────────────────

    #[test]
    fn compose_left_is_none() {
        assert_eq!(compose(None, Some(&format()), false), Some(format()));
    }

    #[test]
    fn compose_right_is_none() {
        assert_eq!(compose(Some(&format()), None, false), Some(format()));
    }

    #[test]
    fn compose_both_none() {
        assert_eq!(compose(None, None, false), None);
    }

    #[test]
    fn compose_missing_element() {
        let b = attrs! { "italic": true };
        assert_eq!(
            compose(Some(&format()), Some(&b), false),
            Some(attrs! { "bold": true, "italic": true, "color": "red" })
        );
    }

    #[test]
    fn compose_override_element() {
        let b = attrs! { "color": "blue" };
        assert_eq!(
            compose(Some(&format()), Some(&b), false),
            Some(attrs! { "bold": true, "color": "blue" })
        );
    }

    #[test]
    fn compose_remove_element() {
        let b = attrs! { "bold": null };
        assert_eq!(
            compose(Some(&format()), Some(&b), false),
            Some(attrs! { "color": "red" })
        );
    }

    #[test]
    fn compose_remove_all() {
        let b = attrs! { "bold": null, "color": null };
        assert_eq!(compose(Some(&format()), Some(&b), false), None);
    }

    #[test]
    fn compose_remove_missing() {
        let b = attrs! { "italic": null };
        assert_eq!(compose(Some(&format()), Some(&b), false), Some(format()));
    }

    #[test]
    fn compose_keep_null_retains_unset() {
        let b = attrs! { "bold": null };
        assert_eq!(
            compose(Some(&format()), Some(&b), true),
            Some(attrs! { "bold": null, "color": "red" })
        );
    }

    #[test]
    fn compose_carries_pending_unset_from_left() {
        let a = attrs! { "bold": null };
        let b = attrs! { "color": "red" };
        assert_eq!(
            compose(Some(&a), Some(&b), true),
            Some(attrs! { "bold": null, "color": "red" })
        );
    }

    #[test]
    fn compose_does_not_alias_inputs() {
        let a = format();
        let mut out = compose(Some(&a), None, false).unwrap();
        out.insert("bold", false);
        assert_eq!(a, format());
    }

    // ── diff ────────────────────────────────────────────────────────────

    #[test]
    fn diff_left_none() {
        assert_eq!(diff(None, Some(&format())), Some(format()));
    }

    #[test]
    fn diff_right_none() {
        assert_eq!(
            diff(Some(&format()), None),
            Some(attrs! { "bold": null, "color": null })
        );
    }

    #[test]
    fn diff_same_format() {
        assert_eq!(diff(Some(&format()), Some(&format())), None);
    }

    #[test]
    fn diff_add_format() {
        let added = attrs! { "bold": true, "italic": true, "color": "red" };
        assert_eq!(
            diff(Some(&format()), Some(&added)),
            Some(attrs! { "italic": true })
        );
    }

    #[test]
    fn diff_remove_format() {
        let removed = attrs! { "bold": true };
        assert_eq!(
            diff(Some(&format()), Some(&removed)),
            Some(attrs! { "color": null })
        );
    }

    #[test]
    fn diff_override_format() {
        let overridden = attrs! { "bold": true, "color": "blue" };
        assert_eq!(
            diff(Some(&format()), Some(&overridden)),
            Some(attrs! { "color": "blue" })
        );
    }

    #[test]
    fn diff_absent_versus_explicit_null() {
        let unset = attrs! { "bold": null };
        assert_eq!(diff(None, Some(&unset)), Some(attrs! { "bold": null }));
        assert_eq!(diff(Some(&unset), None), Some(attrs! { "bold": null }));
        assert_eq!(diff(Some(&unset), Some(&unset)), None);
    }

    // ── invert ──────────────────────────────────────────────────────────

    #[test]
    fn invert_attr_none() {
        let base = attrs! { "bold": true };
        assert_eq!(invert(None, Some(&base)), None);
    }

    #[test]
    fn invert_base_none() {
        let attr = attrs! { "bold": true };
        assert_eq!(invert(Some(&attr), None), Some(attrs! { "bold": null }));
    }

    #[test]
    fn invert_both_none() {
        assert_eq!(invert(None, None), None);
    }

    #[test]
    fn invert_merge() {
        let attr = attrs! { "bold": true };
        let base = attrs! { "italic": true };
        assert_eq!(
            invert(Some(&attr), Some(&base)),
            Some(attrs! { "bold": null })
        );
    }

    #[test]
    fn invert_revert_unset() {
        let attr = attrs! { "bold": null };
        let base = attrs! { "bold": true };
        assert_eq!(invert(Some(&attr), Some(&base)), Some(base));
    }

    #[test]
    fn invert_replace() {
        let attr = attrs! { "color": "red" };
        let base = attrs! { "color": "blue" };
        assert_eq!(invert(Some(&attr), Some(&base)), Some(base));
    }

    #[test]
    fn invert_noop() {
        let attr = attrs! { "color": "red" };
        assert_eq!(invert(Some(&attr), Some(&attr)), None);
    }

    #[test]
    fn invert_unset_of_absent_key_is_noop() {
        let attr = attrs! { "font": null };
        let base = attrs! { "bold": true };
        assert_eq!(invert(Some(&attr), Some(&base)), None);
    }

    #[test]
    fn invert_combined() {
        let attr = attrs! { "bold": true, "italic": null, "color": "red", "size": "12px" };
        let base = attrs! { "font": "serif", "italic": true, "color": "blue", "size": "12px" };
        assert_eq!(
            invert(Some(&attr), Some(&base)),
            Some(attrs! { "bold": null, "italic": true, "color": "blue" })
        );
    }

    // ── transform ───────────────────────────────────────────────────────

    fn left() -> AttributeMap {
        attrs! { "bold": true, "color": "red", "font": null }
    }

    fn right() -> AttributeMap {
        attrs! { "color": "blue", "font": "serif", "italic": true }
    }

    #[test]
    fn transform_left_none() {
        assert_eq!(transform(None, Some(&left()), false), Some(left()));
    }

    #[test]
    fn transform_right_none() {
        assert_eq!(transform(Some(&right()), None, false), None);
    }

    #[test]
    fn transform_both_none() {
        assert_eq!(transform(None, None, false), None);
    }

    #[test]
    fn transform_with_priority() {
        assert_eq!(
            transform(Some(&left()), Some(&right()), true),
            Some(attrs! { "italic": true })
        );
    }

    #[test]
    fn transform_without_priority() {
        assert_eq!(transform(Some(&left()), Some(&right()), false), Some(right()));
    }

    #[test]
    fn transform_with_priority_all_claimed() {
        let b = attrs! { "bold": false };
        assert_eq!(transform(Some(&left()), Some(&b), true), None);
    }

    // ── map ─────────────────────────────────────────────────────────────

    #[test]
    fn equality_ignores_insertion_order() {
        let a = attrs! { "bold": true, "color": "red" };
        let b = attrs! { "color": "red", "bold": true };
        assert_eq!(a, b);
    }

    #[test]
    fn to_json_keeps_null() {
        let a = attrs! { "bold": null };
        assert_eq!(a.to_json(), serde_json::json!({ "bold": null }));
    }
}
