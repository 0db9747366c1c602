//! Namespace-aware helpers for navigating roxmltree documents.

mod utils;

pub use utils::{element_names, find_child, find_children, get_tag_name, get_text, is_element};
