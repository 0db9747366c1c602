//! Transport collaborators: how raw documents are obtained.
//!
//! The decoding pipeline only needs `GET url -> (status, body)`. Token
//! acquisition and refresh are the caller's business; `HttpTransport` simply
//! sends the bearer token it was configured with.

use std::io::Read;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client as HttpClient;

use crate::config::ClientConfig;
use crate::error::{GreenButtonError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("greenbutton/", env!("CARGO_PKG_VERSION"));

/// Status code and body of a GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of raw documents.
pub trait Transport {
    /// Issue one GET request for an absolute URL.
    fn get(&self, url: &str) -> Result<Response>;
}

/// Authorized HTTP transport backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
    access_token: String,
    max_response_size: u64,
}

impl HttpTransport {
    /// Create a transport from client settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            access_token: config.access_token.clone(),
            max_response_size: config.max_response_size,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()?;
        let status = response.status().as_u16();

        if let Some(length) = response.content_length() {
            check_size(length, self.max_response_size)?;
        }

        let bytes = read_limited(response, self.max_response_size)?;

        tracing::debug!(url, status, bytes = bytes.len(), "Received response");
        Ok(Response {
            status,
            body: bytes_to_string(&bytes, url),
        })
    }
}

/// Transport that serves one local XML file for every request.
///
/// Useful for decoding saved documents offline; the requested URL is ignored.
#[derive(Debug, Clone)]
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Transport for FileTransport {
    fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!(url, path = %self.path.display(), "Serving request from file");
        let body = std::fs::read_to_string(&self.path)?;
        Ok(Response::new(200, body))
    }
}

fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(GreenButtonError::ResponseTooLarge { size, limit });
    }
    Ok(())
}

/// Read a body, failing as soon as it grows past `limit` bytes.
///
/// Covers chunked responses that carry no `Content-Length`.
fn read_limited(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)?;
    check_size(bytes.len() as u64, limit)?;
    Ok(bytes)
}

/// Decode a response body as UTF-8, replacing invalid sequences.
pub fn bytes_to_string(bytes: &[u8], source: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!(source, error = %e, "Response is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_create_http_transport() {
        let config = ClientConfig::new("https://example.com", "token").unwrap();
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[test]
    fn test_response_success_range() {
        assert!(Response::new(200, "").is_success());
        assert!(Response::new(204, "").is_success());
        assert!(!Response::new(302, "").is_success());
        assert!(!Response::new(404, "").is_success());
    }

    #[test]
    fn test_file_transport_serves_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<feed/>").unwrap();

        let transport = FileTransport::new(file.path());
        let response = transport.get("https://ignored/UsagePoint").unwrap();
        assert_eq!(response, Response::new(200, "<feed/>"));
    }

    #[test]
    fn test_file_transport_missing_file() {
        let transport = FileTransport::new("/nonexistent/greenbutton.xml");
        assert!(matches!(
            transport.get("x"),
            Err(GreenButtonError::Io(_))
        ));
    }

    #[test]
    fn test_check_size() {
        assert!(check_size(10, 10).is_ok());
        assert!(matches!(
            check_size(11, 10),
            Err(GreenButtonError::ResponseTooLarge { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn test_read_limited_stops_past_limit() {
        let body = vec![b'x'; 64];
        assert_eq!(read_limited(&body[..], 64).unwrap().len(), 64);
        assert!(matches!(
            read_limited(&body[..], 16),
            Err(GreenButtonError::ResponseTooLarge { size: 17, limit: 16 })
        ));
    }

    #[test]
    fn test_bytes_to_string_lossy() {
        assert_eq!(bytes_to_string(b"<feed/>", "test"), "<feed/>");
        assert_eq!(bytes_to_string(&[0x3c, 0xff, 0x3e], "test"), "<\u{fffd}>");
    }
}
