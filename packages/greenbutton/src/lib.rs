//! Green Button - Decode ESPI energy usage feeds.
//!
//! This crate decodes Atom documents carrying ESPI payloads into a typed
//! object graph. The shape of every entity is driven by a declarative schema
//! table, hypermedia links are resolved into short keys, and those keys can
//! be followed to fetch and decode the linked resource.
//!
//! # Example
//!
//! ```
//! use greenbutton::Decoder;
//!
//! let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:espi="http://naesb.org/espi">
//!     <link rel="related" href="https://x/espi/1_1/resource/Subscription/5/UsagePoint/1/MeterReading"/>
//!     <content><espi:UsagePoint/></content>
//! </entry>"#;
//!
//! let node = Decoder::espi().decode_str(xml)?;
//! let usage_point = &node.elements[0];
//! assert_eq!(usage_point.shape, "UsagePoint");
//! assert!(usage_point.links().contains("meter_reading"));
//! # Ok::<(), greenbutton::GreenButtonError>(())
//! ```
//!
//! # Architecture
//!
//! - [`namespace`]: Prefix to URI registry for Atom and ESPI
//! - [`schema`]: Field specs, schemas and decoded values
//! - [`shapes`]: Schema tables for the ESPI resources
//! - [`dispatch`]: Choosing a shape for an entry's payload
//! - [`document`]: Feed, entry and entity decoding
//! - [`link`]: Link key derivation
//! - [`client`]: Fetch dispatcher and link follow
//! - [`paths`]: Resource path builders
//! - [`transport`]: HTTP and file transports
//! - [`render`] and [`output`]: Text, YAML and JSON output
//! - [`config`]: Configuration constants and client settings
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod link;
pub mod namespace;
pub mod naming;
pub mod output;
pub mod paths;
pub mod render;
pub mod schema;
pub mod shapes;
pub mod transport;
pub mod xml;

// Re-export commonly used items
pub use client::{Client, Resource};
pub use config::ClientConfig;
pub use dispatch::ShapeRegistry;
pub use document::{Decoder, DocumentNode, Entity};
pub use error::{GreenButtonError, Result};
pub use link::Links;
pub use namespace::Namespaces;
pub use schema::{Field, Fields, Interval, Value};
pub use transport::{FileTransport, HttpTransport, Response, Transport};
