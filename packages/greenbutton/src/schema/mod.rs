//! Declarative schema engine.
//!
//! A `Schema` is a typed table of `FieldSpec`s: the payload tag to look for,
//! how many matches the field expects and how each match is decoded. The
//! same engine decodes top-level entity payloads and the small fixed-shape
//! records nested inside them.

pub mod decoders;
mod value;

use std::collections::HashSet;

use roxmltree::Node;

use crate::error::Result;
use crate::namespace::Namespaces;
use crate::naming::to_field_name;
use crate::xml::{find_child, find_children};

pub use value::{Field, Fields, Interval, Pairs, Record, Value};

/// Field-level decode function.
pub type DecodeFn = fn(Node<'_, '_>, &Namespaces) -> Result<Value>;

/// Number of matches a structured field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    Many,
}

/// Decoder for a structured field.
#[derive(Debug, Clone)]
pub enum SubDecoder {
    /// A nested scalar-only schema.
    Record(Schema),
    /// A start/duration pair.
    Interval,
}

/// Cardinality of a schema field, together with how it is decoded.
#[derive(Debug, Clone)]
pub enum Cardinality {
    /// First matching child, unset when absent.
    Scalar(DecodeFn),
    /// Every matching child, possibly none.
    List(DecodeFn),
    /// Delegates to a sub-decoder, one or many matches.
    Structured(SubDecoder, Arity),
}

/// One row of a schema table.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Payload tag name (without namespace).
    pub tag: &'static str,
    /// Field name derived from `tag`.
    pub name: String,
    pub cardinality: Cardinality,
}

impl FieldSpec {
    fn new(tag: &'static str, cardinality: Cardinality) -> Self {
        Self {
            tag,
            name: to_field_name(tag),
            cardinality,
        }
    }

    #[must_use]
    pub fn scalar(tag: &'static str, decode: DecodeFn) -> Self {
        Self::new(tag, Cardinality::Scalar(decode))
    }

    /// Scalar field holding the element text.
    #[must_use]
    pub fn text(tag: &'static str) -> Self {
        Self::scalar(tag, decoders::text)
    }

    #[must_use]
    pub fn list(tag: &'static str, decode: DecodeFn) -> Self {
        Self::new(tag, Cardinality::List(decode))
    }

    #[must_use]
    pub fn record(tag: &'static str, schema: Schema) -> Self {
        Self::new(tag, Cardinality::Structured(SubDecoder::Record(schema), Arity::One))
    }

    #[must_use]
    pub fn records(tag: &'static str, schema: Schema) -> Self {
        Self::new(tag, Cardinality::Structured(SubDecoder::Record(schema), Arity::Many))
    }

    #[must_use]
    pub fn interval(tag: &'static str) -> Self {
        Self::new(tag, Cardinality::Structured(SubDecoder::Interval, Arity::One))
    }

    fn is_scalar(&self) -> bool {
        matches!(
            self.cardinality,
            Cardinality::Scalar(_) | Cardinality::Structured(_, Arity::One)
        )
    }
}

/// A named table of field specifications.
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Build a schema from its table.
    ///
    /// Field names must be unique within one table.
    #[must_use]
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        let schema = Self { name, fields };
        debug_assert!(
            schema.collisions().is_empty(),
            "field name collision in schema {name}: {:?}",
            schema.collisions()
        );
        schema
    }

    /// Build a record schema. Records only carry scalar fields.
    #[must_use]
    pub fn record(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        debug_assert!(
            fields.iter().all(FieldSpec::is_scalar),
            "record schema {name} must only contain scalar fields"
        );
        Self::new(name, fields)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names that occur more than once in this table.
    #[must_use]
    pub fn collisions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .map(|spec| spec.name.as_str())
            .filter(|name| !seen.insert(*name))
            .collect()
    }

    /// Apply this table to the children of `element`.
    pub fn decode(&self, element: Node<'_, '_>, ns: &Namespaces) -> Result<Fields> {
        let espi = ns.espi_ns();
        let mut fields = Fields::new();

        for spec in &self.fields {
            let field = match &spec.cardinality {
                Cardinality::Scalar(decode) => {
                    Field::Scalar(decode_one(element, espi, spec.tag, ns, *decode)?)
                }
                Cardinality::List(decode) => {
                    Field::List(decode_all(element, espi, spec.tag, ns, *decode)?)
                }
                Cardinality::Structured(sub, Arity::One) => Field::Scalar(decode_one(
                    element,
                    espi,
                    spec.tag,
                    ns,
                    |node, ns| sub.decode(node, ns),
                )?),
                Cardinality::Structured(sub, Arity::Many) => Field::List(decode_all(
                    element,
                    espi,
                    spec.tag,
                    ns,
                    |node, ns| sub.decode(node, ns),
                )?),
            };
            fields.push(spec.name.clone(), field);
        }

        Ok(fields)
    }

    /// Decode `element` as a nested record of this schema.
    pub fn decode_record(&self, element: Node<'_, '_>, ns: &Namespaces) -> Result<Record> {
        Ok(Record {
            kind: self.name,
            fields: self.decode(element, ns)?,
        })
    }
}

impl SubDecoder {
    fn decode(&self, node: Node<'_, '_>, ns: &Namespaces) -> Result<Value> {
        match self {
            Self::Record(schema) => Ok(Value::Record(schema.decode_record(node, ns)?)),
            Self::Interval => decoders::interval(node, ns),
        }
    }
}

fn decode_one<F>(
    element: Node<'_, '_>,
    espi: &str,
    tag: &str,
    ns: &Namespaces,
    decode: F,
) -> Result<Option<Value>>
where
    F: Fn(Node<'_, '_>, &Namespaces) -> Result<Value>,
{
    find_child(element, espi, tag)
        .map(|node| decode(node, ns))
        .transpose()
}

fn decode_all<F>(
    element: Node<'_, '_>,
    espi: &str,
    tag: &str,
    ns: &Namespaces,
    decode: F,
) -> Result<Vec<Value>>
where
    F: Fn(Node<'_, '_>, &Namespaces) -> Result<Value>,
{
    find_children(element, espi, tag)
        .map(|node| decode(node, ns))
        .collect()
}
