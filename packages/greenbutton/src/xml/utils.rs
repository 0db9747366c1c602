//! XML utility functions for navigating and extracting data from DOM trees.
//!
//! Every lookup is qualified by namespace URI: Green Button documents mix the
//! Atom envelope and the ESPI payload vocabulary, and a bare local name is not
//! enough to tell `atom:title` from a payload field of the same name.

use roxmltree::Node;

/// Get the tag name without namespace.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use greenbutton::xml::get_tag_name;
///
/// let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry/></feed>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "feed");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with the given namespace and local name.
pub fn is_element(node: Node<'_, '_>, ns: &str, tag: &str) -> bool {
    node.is_element() && node.tag_name().namespace() == Some(ns) && get_tag_name(node) == tag
}

/// Find the first child element with the given namespace and tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use greenbutton::xml::find_child;
///
/// let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom"><id>1</id></entry>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child(root, "http://www.w3.org/2005/Atom", "id").is_some());
/// assert!(find_child(root, "http://naesb.org/espi", "id").is_none());
/// ```
pub fn find_child<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &str,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_element(*child, ns, tag))
}

/// Find all child elements with the given namespace and tag name, in
/// document order.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &'a str,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| is_element(*child, ns, tag))
}

/// Get the text content of a node, trimmed.
///
/// An element without text yields an empty string; absence of the element
/// itself is expressed by the caller's `Option`, never here.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Local names of all element children, in document order.
pub fn element_names(node: Node<'_, '_>) -> Vec<String> {
    node.children()
        .filter(|child| child.is_element())
        .map(|child| get_tag_name(child).to_string())
        .collect()
}
