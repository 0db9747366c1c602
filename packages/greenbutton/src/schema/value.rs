//! Decoded field values.

use chrono::{DateTime, TimeDelta, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single decoded value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Element text (empty string for an element without text).
    Text(String),
    /// Comma-separated element text, split into items.
    TextList(Vec<String>),
    /// `key=value;key=value` element text.
    Pairs(Pairs),
    /// A nested fixed-shape record.
    Record(Record),
    /// A start/duration time span.
    Interval(Interval),
}

impl Value {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_interval(&self) -> Option<&Interval> {
        match self {
            Self::Interval(interval) => Some(interval),
            _ => None,
        }
    }
}

/// How a schema field was populated.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Field {
    /// Zero or one value. `None` means the element was absent.
    Scalar(Option<Value>),
    /// Every matching element, in document order. Never unset.
    List(Vec<Value>),
}

impl Field {
    /// Whether this is an unset scalar.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Scalar(None))
    }
}

/// Ordered field name to field map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Field)>,
}

impl Fields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, field: Field) {
        self.entries.push((name.into(), field));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field)
    }

    /// Value of a scalar field, `None` if the field is unset or not a scalar.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            Field::Scalar(value) => value.as_ref(),
            Field::List(_) => None,
        }
    }

    /// Text of a scalar text field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.scalar(name).and_then(Value::as_text)
    }

    /// Items of a list field, `None` if the field is not a list.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[Value]> {
        match self.get(name)? {
            Field::List(values) => Some(values),
            Field::Scalar(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
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

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, field) in &self.entries {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

/// Ordered key/value pairs parsed from `key=value;...` text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairs(pub Vec<(String, String)>);

impl Pairs {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Serialize for Pairs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A nested record decoded by a scalar-only schema.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Record {
    /// Name of the record schema (e.g. `ServiceCategory`).
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub fields: Fields,
}

/// A time span built from `<start>` and `<duration>` children.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Interval {
    /// Both halves present and converted.
    Resolved {
        start: DateTime<Utc>,
        #[serde(serialize_with = "serialize_seconds")]
        duration: TimeDelta,
    },
    /// At least one half missing; whatever text was present is kept as-is.
    Raw {
        start: Option<String>,
        duration: Option<String>,
    },
}

impl Interval {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// End of the span, for resolved intervals.
    #[must_use]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Resolved { start, duration } => start.checked_add_signed(*duration),
            Self::Raw { .. } => None,
        }
    }
}

fn serialize_seconds<S: Serializer>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}
