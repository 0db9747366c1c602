//! Hypermedia link resolution.
//!
//! Atom `<link>` elements carry a `rel` and an `href`. Most relations (`self`,
//! `up`) are usable keys as-is. Generic `related` links say nothing about what
//! they point to, so the key is derived from the URL path instead:
//! `.../UsagePoint/1/MeterReading` becomes `meter_reading`.

use serde::ser::{Serialize, SerializeMap};

use crate::naming::{is_numeric, to_field_name};

/// The generic relation whose key must be derived from the URL.
pub const RELATED: &str = "related";

/// Derive the lookup key for a link.
///
/// Non-`related` relations are returned verbatim. For `related`, the URL is
/// split on `/` and scanned from the last segment back to the second one; the
/// first segment that is not a number is taken. When every scanned segment is
/// numeric the last one examined is kept, and a URL without any `/` keeps
/// the raw relation.
///
/// # Examples
/// ```
/// use greenbutton::link::derive_link_key;
///
/// assert_eq!(derive_link_key("self", "https://x/UsagePoint/1"), "self");
/// assert_eq!(
///     derive_link_key("related", "https://x/espi/1_1/resource/UsagePoint/1/MeterReading"),
///     "meter_reading"
/// );
/// assert_eq!(
///     derive_link_key("related", "https://x/espi/1_1/resource/LocalTimeParameters/1"),
///     "local_time_parameters"
/// );
/// ```
pub fn derive_link_key(rel: &str, href: &str) -> String {
    if rel != RELATED {
        return rel.to_string();
    }

    let segments: Vec<&str> = href.split('/').collect();
    let mut key = rel;
    for segment in segments.iter().skip(1).rev() {
        key = *segment;
        if !is_numeric(segment) {
            break;
        }
    }

    to_field_name(key)
}

/// Ordered map from derived link key to URL.
///
/// Keys are unique. Inserting an existing key replaces its URL but keeps the
/// position where the key was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    entries: Vec<(String, String)>,
}

impl Links {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a link, replacing any earlier URL under the same key.
    pub fn insert(&mut self, key: impl Into<String>, href: impl Into<String>) {
        let key = key.into();
        let href = href.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = href,
            None => self.entries.push((key, href)),
        }
    }

    /// Resolve a rel/href pair and insert it under the derived key.
    pub fn insert_resolved(&mut self, rel: &str, href: &str) {
        self.insert(derive_link_key(rel, href), href);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, href)| href.as_str())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Links {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, href) in &self.entries {
            map.serialize_entry(key, href)?;
        }
        map.end()
    }
}
