//! Transport layer
//!
//! The client only needs one thing from a transport: send a
//! [`CallDescriptor`] and hand back the raw result. [`SoapTransport`] does
//! that over SOAP 1.1; tests and embedders can supply their own.

pub mod config;
pub mod schema;
pub mod soap;

pub use config::{TransportConfig, TransportConfigBuilder, WsdlSource};
pub use schema::{SchemaField, ServiceSchema};
pub use soap::SoapTransport;

use crate::error::TransportError;
use crate::raw::RawValue;
use crate::request::CallDescriptor;

/// Sends one call and returns its raw result
///
/// Implementations block until the service answers or the call fails.
/// Errors are returned as-is to the caller; the client does not retry.
pub trait Transport: Send + Sync {
    fn invoke(&self, call: &CallDescriptor) -> Result<RawValue, TransportError>;
}
