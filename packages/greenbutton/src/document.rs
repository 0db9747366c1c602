//! Document decoding: Atom envelopes, entries and their entities.
//!
//! A `DocumentNode` is the decoded form of any Atom element (a `feed` or a
//! single `entry`): its header, its links and the entities found in its
//! entries. An `Entity` embeds the `DocumentNode` of its entry and adds the
//! fields its shape declares.

use chrono::{DateTime, FixedOffset};
use roxmltree::{Document, Node};
use serde::Serialize;

use crate::client::{Client, Resource};
use crate::dispatch::ShapeRegistry;
use crate::error::{GreenButtonError, Result};
use crate::link::Links;
use crate::namespace::Namespaces;
use crate::schema::{Field, Fields, Schema, Value};
use crate::transport::Transport;
use crate::xml::{find_child, find_children, get_tag_name, get_text, is_element};

/// Local name of the multi-entry feed element.
pub const FEED: &str = "feed";

/// Local name of a single entry element.
pub const ENTRY: &str = "entry";

/// Decoded Atom element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentNode {
    /// Local tag name of the source element, or the shape name for entities.
    pub element_type: String,
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<String>,
    pub links: Links,
    /// Entities found in this node's entries, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<Entity>,
}

impl DocumentNode {
    /// Whether this node is a multi-entry feed.
    #[must_use]
    pub fn is_feed(&self) -> bool {
        self.element_type == FEED
    }

    #[must_use]
    pub fn link(&self, key: &str) -> Option<&str> {
        self.links.get(key)
    }

    /// The `updated` header parsed as an RFC 3339 timestamp.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        self.updated
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    /// Fetch and decode the resource behind a link.
    ///
    /// Every call issues a new request; nothing is cached.
    ///
    /// # Errors
    /// Returns `UnknownLink` without touching the transport if `key` is absent.
    pub fn follow<T: Transport>(&self, client: &Client<T>, key: &str) -> Result<Resource> {
        let href = self
            .links
            .get(key)
            .ok_or_else(|| GreenButtonError::UnknownLink(key.to_string()))?;
        tracing::debug!(key, href, "Following link");
        client.fetch_absolute(href)
    }

    /// Re-fetch this node through its `self` link.
    pub fn follow_self<T: Transport>(&self, client: &Client<T>) -> Result<Resource> {
        self.follow(client, "self")
    }
}

/// A decoded payload together with its entry's header and links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    /// Name of the matched shape (e.g. `UsagePoint`).
    pub shape: &'static str,
    #[serde(flatten)]
    pub node: DocumentNode,
    pub fields: Fields,
}

impl Entity {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.node.id.as_deref()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.node.title.as_deref()
    }

    #[must_use]
    pub fn links(&self) -> &Links {
        &self.node.links
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        self.fields.scalar(name)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.text(name)
    }

    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[Value]> {
        self.fields.list(name)
    }

    pub fn follow<T: Transport>(&self, client: &Client<T>, key: &str) -> Result<Resource> {
        self.node.follow(client, key)
    }

    pub fn follow_self<T: Transport>(&self, client: &Client<T>) -> Result<Resource> {
        self.node.follow_self(client)
    }
}

/// Decoder holding the namespace and shape registries.
///
/// Built once and shared; decoding never mutates it.
#[derive(Debug, Clone)]
pub struct Decoder {
    namespaces: Namespaces,
    shapes: ShapeRegistry,
}

impl Decoder {
    #[must_use]
    pub fn new(namespaces: Namespaces, shapes: ShapeRegistry) -> Self {
        Self { namespaces, shapes }
    }

    /// Decoder for Green Button documents.
    #[must_use]
    pub fn espi() -> Self {
        Self::new(Namespaces::shared().clone(), ShapeRegistry::espi())
    }

    #[must_use]
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    #[must_use]
    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    /// Parse and decode an XML document.
    pub fn decode_str(&self, xml: &str) -> Result<DocumentNode> {
        let doc = Document::parse(xml)?;
        self.decode_document(&doc)
    }

    /// Decode the root element of a parsed document.
    pub fn decode_document(&self, doc: &Document<'_>) -> Result<DocumentNode> {
        self.decode_node(doc.root_element())
    }

    /// Decode an element's header, links and entries.
    ///
    /// Entries are the element's `<entry>` children; an `<entry>` without
    /// nested entries is treated as its own single entry.
    pub fn decode_node(&self, element: Node<'_, '_>) -> Result<DocumentNode> {
        let mut node = self.decode_header(element);
        let atom = self.namespaces.atom();

        let mut entries: Vec<Node<'_, '_>> = find_children(element, atom, ENTRY).collect();
        if entries.is_empty() && is_element(element, atom, ENTRY) {
            entries.push(element);
        }

        for entry in entries {
            let content = find_child(entry, atom, "content").ok_or_else(|| {
                GreenButtonError::MissingElement {
                    element: "content".to_string(),
                    context: entry_context(entry, atom),
                }
            })?;
            let (schema, payload) = self.shapes.dispatch(content, &self.namespaces)?;
            node.elements.push(self.decode_entity(schema, entry, payload)?);
        }

        tracing::debug!(
            element_type = %node.element_type,
            entities = node.elements.len(),
            links = node.links.len(),
            "Decoded document node"
        );
        Ok(node)
    }

    /// Decode one entity: the entry's header and links plus the shape's
    /// fields read from `payload`.
    pub fn decode_entity(
        &self,
        schema: &Schema,
        entry: Node<'_, '_>,
        payload: Node<'_, '_>,
    ) -> Result<Entity> {
        let mut node = self.decode_header(entry);
        node.element_type = schema.name().to_string();
        let fields = schema.decode(payload, &self.namespaces)?;

        Ok(Entity {
            shape: schema.name(),
            node,
            fields,
        })
    }

    /// Header fields and links only; `elements` is left empty.
    fn decode_header(&self, element: Node<'_, '_>) -> DocumentNode {
        let atom = self.namespaces.atom();
        let header = |tag: &str| find_child(element, atom, tag).map(get_text);

        let mut links = Links::new();
        for link in find_children(element, atom, "link") {
            match (link.attribute("rel"), link.attribute("href")) {
                (Some(rel), Some(href)) => links.insert_resolved(rel, href),
                (rel, href) => {
                    tracing::debug!(?rel, ?href, "Skipping incomplete link");
                }
            }
        }

        DocumentNode {
            element_type: get_tag_name(element).to_string(),
            id: header("id"),
            title: header("title"),
            updated: header("updated"),
            links,
            elements: Vec::new(),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::espi()
    }
}

fn entry_context(entry: Node<'_, '_>, atom: &str) -> String {
    match find_child(entry, atom, "id") {
        Some(id) => format!("entry {}", get_text(id)),
        None => ENTRY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const USAGE_POINT_ENTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<entry xmlns="http://www.w3.org/2005/Atom" xmlns:espi="http://naesb.org/espi">
  <id>urn:uuid:48C2A019-5598-4E16-B0F9-49E4FF27F5FB</id>
  <link href="https://x/espi/1_1/resource/Subscription/5/UsagePoint/1" rel="self"/>
  <link href="https://x/espi/1_1/resource/Subscription/5/UsagePoint" rel="up"/>
  <link href="https://x/espi/1_1/resource/Subscription/5/UsagePoint/1/MeterReading" rel="related"/>
  <link href="https://x/espi/1_1/resource/LocalTimeParameters/1" rel="related"/>
  <title>Front Electric Meter</title>
  <content>
    <espi:UsagePoint>
      <espi:ServiceCategory><espi:kind>0</espi:kind></espi:ServiceCategory>
    </espi:UsagePoint>
  </content>
  <updated>2012-10-24T00:00:00Z</updated>
</entry>"#;

    #[test]
    fn test_single_entry_is_its_own_entry() {
        let node = Decoder::espi().decode_str(USAGE_POINT_ENTRY).unwrap();

        assert_eq!(node.element_type, "entry");
        assert!(!node.is_feed());
        assert_eq!(node.elements.len(), 1);

        let entity = &node.elements[0];
        assert_eq!(entity.shape, "UsagePoint");
        assert_eq!(entity.node.element_type, "UsagePoint");
        assert_eq!(entity.title(), Some("Front Electric Meter"));
        assert!(entity.node.elements.is_empty());
    }

    #[test]
    fn test_header_and_links() {
        let node = Decoder::espi().decode_str(USAGE_POINT_ENTRY).unwrap();

        assert_eq!(
            node.id.as_deref(),
            Some("urn:uuid:48C2A019-5598-4E16-B0F9-49E4FF27F5FB")
        );
        assert_eq!(node.updated.as_deref(), Some("2012-10-24T00:00:00Z"));
        assert!(node.updated_at().is_some());
        assert_eq!(
            node.links.keys().collect::<Vec<_>>(),
            vec!["self", "up", "meter_reading", "local_time_parameters"]
        );
    }

    #[test]
    fn test_missing_header_fields_are_unset() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#;
        let node = Decoder::espi().decode_str(xml).unwrap();

        assert!(node.is_feed());
        assert_eq!(node.id, None);
        assert_eq!(node.title, None);
        assert_eq!(node.updated, None);
        assert!(node.links.is_empty());
        assert!(node.elements.is_empty());
    }

    #[test]
    fn test_incomplete_links_are_skipped() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <link rel="self"/>
            <link href="https://x/UsagePoint"/>
            <link rel="up" href="https://x/"/>
        </feed>"#;
        let node = Decoder::espi().decode_str(xml).unwrap();
        assert_eq!(node.links.keys().collect::<Vec<_>>(), vec!["up"]);
    }

    #[test]
    fn test_entry_without_content_is_error() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <entry><id>urn:uuid:1</id></entry>
        </feed>"#;
        let err = Decoder::espi().decode_str(xml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required XML element: content in entry urn:uuid:1"
        );
    }

    #[test]
    fn test_unrecognized_payload_is_surfaced() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:espi="http://naesb.org/espi">
            <entry><content><espi:Subscription/></content></entry>
        </feed>"#;
        let err = Decoder::espi().decode_str(xml).unwrap_err();
        assert!(matches!(err, GreenButtonError::UnrecognizedPayload { .. }));
    }

    #[test]
    fn test_entity_field_accessors() {
        let node = Decoder::espi().decode_str(USAGE_POINT_ENTRY).unwrap();
        let entity = &node.elements[0];

        let category = entity
            .scalar("service_category")
            .and_then(Value::as_record)
            .unwrap();
        assert_eq!(category.fields.text("kind"), Some("0"));
        assert!(entity.field("service_delivery_point").unwrap().is_unset());
        assert_eq!(entity.text("missing"), None);
    }
}
