//! Transport configuration with builder pattern
//!
//! Defaults point at the public Legistar SDK endpoint and its WSDL.

use std::path::PathBuf;
use std::time::Duration;

/// Default SOAP endpoint
pub const DEFAULT_ENDPOINT: &str = "http://betasdk.legistar.com/main.asmx";
/// Default WSDL location
pub const DEFAULT_WSDL_URL: &str = "http://betasdk.legistar.com/main.asmx?WSDL";
/// Target namespace of the Legistar service
pub const DEFAULT_NAMESPACE: &str = "http://legistar.com/";

/// Where to read the service schema from
#[derive(Debug, Clone, PartialEq)]
pub enum WsdlSource {
    /// Fetch over HTTP(S)
    Url(String),
    /// Read from a local file
    Path(PathBuf),
}

impl WsdlSource {
    /// Interpret a location string: `http(s)://` is a URL, `file://` and anything else a path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            WsdlSource::Url(location.to_string())
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            WsdlSource::Path(PathBuf::from(path))
        }
    }
}

/// Configuration for [`SoapTransport`](super::SoapTransport)
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// SOAP endpoint the envelopes are posted to
    pub endpoint: String,
    /// Target namespace used for operation elements and `SOAPAction`
    pub namespace: String,
    /// Schema used to order structure fields; `None` sends fields in insertion order
    pub wsdl: Option<WsdlSource>,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            wsdl: Some(WsdlSource::Url(DEFAULT_WSDL_URL.to_string())),
            timeout: Duration::from_secs(30),
            user_agent: format!("legistar-lib/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Create a new builder for TransportConfig
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::new()
    }

    /// SOAPAction header value for an operation
    pub fn soap_action(&self, operation: &str) -> String {
        let namespace = if self.namespace.ends_with('/') {
            self.namespace.clone()
        } else {
            format!("{}/", self.namespace)
        };
        format!("\"{}{}\"", namespace, operation)
    }
}

/// Builder for TransportConfig
#[derive(Debug)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TransportConfig::default(),
        }
    }

    /// Set the SOAP endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the target namespace
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    /// Read the schema from a URL or path
    pub fn wsdl(mut self, location: &str) -> Self {
        self.config.wsdl = Some(WsdlSource::parse(location));
        self
    }

    /// Send structure fields in insertion order without loading a schema
    pub fn without_wsdl(mut self) -> Self {
        self.config.wsdl = None;
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> TransportConfig {
        self.config
    }
}

impl Default for TransportConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.namespace, "http://legistar.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(matches!(config.wsdl, Some(WsdlSource::Url(_))));
        assert!(config.user_agent.starts_with("legistar-lib/"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = TransportConfig::builder()
            .endpoint("http://localhost:8080/main.asmx")
            .namespace("http://example.test")
            .without_wsdl()
            .timeout(Duration::from_secs(5))
            .user_agent("tests")
            .build();

        assert_eq!(config.endpoint, "http://localhost:8080/main.asmx");
        assert!(config.wsdl.is_none());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn test_soap_action() {
        let config = TransportConfig::default();
        assert_eq!(config.soap_action("BodyGetAll"), "\"http://legistar.com/BodyGetAll\"");

        let config = TransportConfig::builder().namespace("http://example.test").build();
        assert_eq!(config.soap_action("Ping"), "\"http://example.test/Ping\"");
    }

    #[test]
    fn test_wsdl_source_parsing() {
        assert_eq!(
            WsdlSource::parse("https://host/main.asmx?WSDL"),
            WsdlSource::Url("https://host/main.asmx?WSDL".to_string())
        );
        assert_eq!(
            WsdlSource::parse("file:///opt/legistar.wsdl"),
            WsdlSource::Path(PathBuf::from("/opt/legistar.wsdl"))
        );
        assert_eq!(
            WsdlSource::parse("legistar.wsdl"),
            WsdlSource::Path(PathBuf::from("legistar.wsdl"))
        );
    }
}
