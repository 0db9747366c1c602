//! Fetch dispatcher: request a resource and decode the response.

use serde::Serialize;

use crate::config::{resource_url, ClientConfig};
use crate::document::{Decoder, DocumentNode, Entity};
use crate::error::{GreenButtonError, Result};
use crate::paths;
use crate::transport::{HttpTransport, Transport};

/// A decoded response.
///
/// Single-entry documents collapse to their entity; feeds stay feeds, even
/// when they have no entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Entity(Entity),
    Feed(DocumentNode),
}

impl Resource {
    #[must_use]
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::Feed(_) => None,
        }
    }

    #[must_use]
    pub fn as_feed(&self) -> Option<&DocumentNode> {
        match self {
            Self::Feed(feed) => Some(feed),
            Self::Entity(_) => None,
        }
    }

    /// Header and links of the resource.
    #[must_use]
    pub fn node(&self) -> &DocumentNode {
        match self {
            Self::Entity(entity) => &entity.node,
            Self::Feed(feed) => feed,
        }
    }

    /// Follow a link of the resource.
    pub fn follow<T: Transport>(&self, client: &Client<T>, key: &str) -> Result<Resource> {
        self.node().follow(client, key)
    }
}

/// Green Button API client.
///
/// Every call issues exactly one GET through the transport and decodes the
/// body with a shared `Decoder`.
#[derive(Debug, Clone)]
pub struct Client<T: Transport = HttpTransport> {
    base_url: String,
    transport: T,
    decoder: Decoder,
}

impl Client<HttpTransport> {
    /// Create a client with an authorized HTTP transport.
    ///
    /// # Arguments
    /// * `config` - Base URL, access token and HTTP limits
    ///
    /// # Returns
    /// The client, or an error if the HTTP client could not be built
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(
            config.base_url.clone(),
            HttpTransport::new(config)?,
        ))
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over any transport.
    ///
    /// The base URL is used verbatim; relative paths are appended to it.
    #[must_use]
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            decoder: Decoder::espi(),
        }
    }

    /// Replace the decoder, e.g. one with extra shapes registered.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = decoder;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Fetch a path relative to the base URL.
    ///
    /// # Examples
    /// ```no_run
    /// use greenbutton::{Client, ClientConfig};
    ///
    /// let config = ClientConfig::new("https://example.com/DataCustodian", "token")?;
    /// let client = Client::new(&config)?;
    /// let points = client.fetch("/espi/1_1/resource/UsagePoint")?;
    /// println!("{points}");
    /// # Ok::<(), greenbutton::GreenButtonError>(())
    /// ```
    pub fn fetch(&self, path: &str) -> Result<Resource> {
        self.request(&resource_url(&self.base_url, path))
    }

    /// Fetch an absolute URL, as found in a link.
    pub fn fetch_absolute(&self, url: &str) -> Result<Resource> {
        self.request(url)
    }

    fn request(&self, url: &str) -> Result<Resource> {
        let response = self.transport.get(url)?;
        if !response.is_success() {
            tracing::warn!(url, status = response.status, "Request failed");
            return Err(GreenButtonError::RequestFailed {
                status: response.status,
                url: url.to_string(),
            });
        }

        let node = self.decoder.decode_str(&response.body)?;
        collapse(node)
    }

    pub fn application_information(
        &self,
        application_information_id: Option<&str>,
    ) -> Result<Resource> {
        self.fetch(&paths::application_information(application_information_id))
    }

    pub fn usage_point(
        &self,
        usage_point_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<Resource> {
        self.fetch(&paths::usage_point(usage_point_id, subscription_id))
    }

    /// # Errors
    /// `InvalidParameterCombination` for partial scoping, before any request.
    pub fn meter_reading(
        &self,
        meter_reading_id: Option<&str>,
        usage_point_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<Resource> {
        self.fetch(&paths::meter_reading(
            meter_reading_id,
            usage_point_id,
            subscription_id,
        )?)
    }

    pub fn reading_type(&self, reading_type_id: Option<&str>) -> Result<Resource> {
        self.fetch(&paths::reading_type(reading_type_id))
    }

    /// # Errors
    /// `InvalidParameterCombination` for partial scoping, before any request.
    pub fn interval_block(
        &self,
        subscription_id: Option<&str>,
        usage_point_id: Option<&str>,
        meter_reading_id: Option<&str>,
        interval_block_id: Option<&str>,
    ) -> Result<Resource> {
        self.fetch(&paths::interval_block(
            subscription_id,
            usage_point_id,
            meter_reading_id,
            interval_block_id,
        )?)
    }

    pub fn local_time_parameters(
        &self,
        local_time_parameters_id: Option<&str>,
    ) -> Result<Resource> {
        self.fetch(&paths::local_time_parameters(local_time_parameters_id))
    }

    pub fn electric_power_usage_summary(
        &self,
        subscription_id: &str,
        usage_point_id: &str,
        electric_power_usage_summary_id: Option<&str>,
    ) -> Result<Resource> {
        self.fetch(&paths::electric_power_usage_summary(
            subscription_id,
            usage_point_id,
            electric_power_usage_summary_id,
        ))
    }

    pub fn electric_power_quality_summary(
        &self,
        subscription_id: &str,
        usage_point_id: &str,
        electric_power_quality_summary_id: Option<&str>,
    ) -> Result<Resource> {
        self.fetch(&paths::electric_power_quality_summary(
            subscription_id,
            usage_point_id,
            electric_power_quality_summary_id,
        ))
    }
}

/// Collapse a decoded root: feeds stay feeds, anything else becomes its
/// first entity.
pub fn collapse(node: DocumentNode) -> Result<Resource> {
    if node.is_feed() {
        return Ok(Resource::Feed(node));
    }

    let element_type = node.element_type;
    node.elements
        .into_iter()
        .next()
        .map(Resource::Entity)
        .ok_or_else(|| GreenButtonError::MissingElement {
            element: "content".to_string(),
            context: element_type,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Response;
    use std::cell::RefCell;

    struct StaticTransport {
        response: Response,
        calls: RefCell<Vec<String>>,
    }

    impl StaticTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: Response::new(status, body),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for StaticTransport {
        fn get(&self, url: &str) -> Result<Response> {
            self.calls.borrow_mut().push(url.to_string());
            Ok(self.response.clone())
        }
    }

    const READING_TYPE_ENTRY: &str = r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:espi="http://naesb.org/espi">
        <id>urn:uuid:1</id>
        <content><espi:ReadingType><espi:uom>72</espi:uom></espi:ReadingType></content>
    </entry>"#;

    #[test]
    fn test_fetch_appends_path_to_base_url() {
        let client = Client::with_transport(
            "https://x/DataCustodian",
            StaticTransport::new(200, READING_TYPE_ENTRY),
        );
        client.reading_type(Some("1")).unwrap();

        assert_eq!(
            *client.transport().calls.borrow(),
            vec!["https://x/DataCustodian/espi/1_1/resource/ReadingType/1"]
        );
    }

    #[test]
    fn test_single_entry_collapses_to_entity() {
        let client = Client::with_transport("https://x", StaticTransport::new(200, READING_TYPE_ENTRY));
        let resource = client.fetch_absolute("https://y/ReadingType/1").unwrap();

        let entity = resource.as_entity().unwrap();
        assert_eq!(entity.shape, "ReadingType");
        assert_eq!(entity.text("uom"), Some("72"));
        assert_eq!(*client.transport().calls.borrow(), vec!["https://y/ReadingType/1"]);
    }

    #[test]
    fn test_non_success_status_is_request_failed() {
        let client = Client::with_transport("https://x", StaticTransport::new(403, "denied"));
        let err = client.fetch("/espi/1_1/resource/UsagePoint").unwrap_err();

        match err {
            GreenButtonError::RequestFailed { status, url } => {
                assert_eq!(status, 403);
                assert_eq!(url, "https://x/espi/1_1/resource/UsagePoint");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(client.transport().calls.borrow().len(), 1);
    }

    #[test]
    fn test_invalid_combination_makes_no_request() {
        let client = Client::with_transport("https://x", StaticTransport::new(200, READING_TYPE_ENTRY));
        let err = client.interval_block(Some("1"), None, None, None).unwrap_err();

        assert!(matches!(
            err,
            GreenButtonError::InvalidParameterCombination { .. }
        ));
        assert!(client.transport().calls.borrow().is_empty());
    }

    #[test]
    fn test_collapse_entry_without_entities() {
        let node = DocumentNode {
            element_type: "entry".to_string(),
            id: None,
            title: None,
            updated: None,
            links: crate::link::Links::new(),
            elements: Vec::new(),
        };
        assert!(matches!(
            collapse(node),
            Err(GreenButtonError::MissingElement { .. })
        ));
    }
}
