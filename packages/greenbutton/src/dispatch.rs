//! Content dispatch: choosing the shape for an entry's payload.

use roxmltree::Node;

use crate::error::{GreenButtonError, Result};
use crate::namespace::Namespaces;
use crate::schema::Schema;
use crate::shapes;
use crate::xml::{element_names, find_child};

/// Ordered registry of payload shapes.
///
/// Shapes are tried in registration order; the first payload tag found among
/// the children of `<content>` wins.
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: Vec<Schema>,
}

impl ShapeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Registry with every ESPI shape.
    #[must_use]
    pub fn espi() -> Self {
        let mut registry = Self::new();
        for schema in shapes::all() {
            registry.register(schema);
        }
        registry
    }

    /// Register a shape. Its schema name is the payload tag it matches.
    pub fn register(&mut self, schema: Schema) {
        self.shapes.push(schema);
    }

    /// Look up a shape by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.shapes.iter().find(|schema| schema.name() == name)
    }

    /// Registered shape names, in dispatch order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.shapes.iter().map(Schema::name)
    }

    /// Find the shape and payload element for a `<content>` element.
    ///
    /// # Errors
    /// Returns `UnrecognizedPayload` if no registered payload tag is present.
    pub fn dispatch<'a, 'input>(
        &self,
        content: Node<'a, 'input>,
        ns: &Namespaces,
    ) -> Result<(&Schema, Node<'a, 'input>)> {
        let espi = ns.espi_ns();
        for schema in &self.shapes {
            if let Some(payload) = find_child(content, espi, schema.name()) {
                tracing::debug!(shape = schema.name(), "Dispatched content payload");
                return Ok((schema, payload));
            }
        }

        Err(GreenButtonError::UnrecognizedPayload {
            found: element_names(content),
        })
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use roxmltree::Document;

    #[test]
    fn test_dispatch_known_payload() {
        let xml = r#"<content xmlns="http://www.w3.org/2005/Atom" xmlns:espi="http://naesb.org/espi">
            <espi:ReadingType><espi:uom>72</espi:uom></espi:ReadingType>
        </content>"#;
        let doc = Document::parse(xml).unwrap();
        let registry = ShapeRegistry::espi();

        let (schema, payload) = registry
            .dispatch(doc.root_element(), &Namespaces::espi())
            .unwrap();
        assert_eq!(schema.name(), "ReadingType");
        assert_eq!(payload.tag_name().name(), "ReadingType");
    }

    #[test]
    fn test_dispatch_registration_order_wins() {
        let xml = r#"<content xmlns:espi="http://naesb.org/espi">
            <espi:IntervalBlock/>
            <espi:UsagePoint/>
        </content>"#;
        let doc = Document::parse(xml).unwrap();
        let registry = ShapeRegistry::espi();

        let (schema, _) = registry
            .dispatch(doc.root_element(), &Namespaces::espi())
            .unwrap();
        assert_eq!(schema.name(), "UsagePoint");
    }

    #[test]
    fn test_dispatch_unrecognized_payload() {
        let xml = r#"<content xmlns:espi="http://naesb.org/espi"><espi:Subscription/></content>"#;
        let doc = Document::parse(xml).unwrap();
        let registry = ShapeRegistry::espi();

        let err = registry
            .dispatch(doc.root_element(), &Namespaces::espi())
            .unwrap_err();
        match err {
            GreenButtonError::UnrecognizedPayload { found } => {
                assert_eq!(found, vec!["Subscription"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dispatch_requires_payload_namespace() {
        let xml = r#"<content><UsagePoint/></content>"#;
        let doc = Document::parse(xml).unwrap();
        let registry = ShapeRegistry::espi();

        assert!(registry
            .dispatch(doc.root_element(), &Namespaces::espi())
            .is_err());
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = ShapeRegistry::new();
        registry.register(Schema::new("Subscription", vec![FieldSpec::text("id")]));

        assert!(registry.get("Subscription").is_some());
        assert!(registry.get("UsagePoint").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Subscription"]);
    }
}
