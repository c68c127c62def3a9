//! SOAP 1.1 transport over blocking HTTP
//!
//! Envelopes are written with quick-xml and responses read back with
//! roxmltree. The HTTP client and the service schema are created on first
//! use and shared by every later call.

use std::io::Cursor;

use log::{debug, trace, warn};
use once_cell::sync::OnceCell;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::config::{TransportConfig, WsdlSource};
use super::schema::{SchemaField, ServiceSchema};
use super::Transport;
use crate::error::TransportError;
use crate::raw::RawValue;
use crate::request::{CallDescriptor, Param};

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Transport speaking SOAP 1.1 document/literal to a Legistar endpoint
pub struct SoapTransport {
    config: TransportConfig,
    http: OnceCell<reqwest::blocking::Client>,
    schema: OnceCell<ServiceSchema>,
}

impl SoapTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            http: OnceCell::new(),
            schema: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn http(&self) -> Result<&reqwest::blocking::Client, TransportError> {
        self.http.get_or_try_init(|| {
            debug!("Creating HTTP client for {}", self.config.endpoint);
            let client = reqwest::blocking::Client::builder()
                .timeout(self.config.timeout)
                .user_agent(self.config.user_agent.clone())
                .build()?;
            Ok(client)
        })
    }

    /// Service schema, loaded once; an empty schema when none is configured
    pub fn schema(&self) -> Result<&ServiceSchema, TransportError> {
        self.schema.get_or_try_init(|| match &self.config.wsdl {
            None => Ok(ServiceSchema::default()),
            Some(WsdlSource::Path(path)) => {
                debug!("Loading service schema from {}", path.display());
                ServiceSchema::from_path(path)
            }
            Some(WsdlSource::Url(url)) => {
                debug!("Fetching service schema from {}", url);
                let response = self.http()?.get(url).send()?;
                let status = response.status();
                let body = response.text()?;
                if !status.is_success() {
                    return Err(TransportError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                ServiceSchema::parse(&body)
            }
        })
    }

    /// Serialize a call into a SOAP envelope
    pub fn envelope(&self, call: &CallDescriptor) -> Result<String, TransportError> {
        let schema = self.schema()?;
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        write(
            &mut writer,
            Event::Start(BytesStart::new("soap:Envelope").with_attributes([
                ("xmlns:soap", SOAP_ENV_NS),
                ("xmlns:xsi", XSI_NS),
                ("xmlns:xsd", XSD_NS),
            ])),
        )?;
        write(&mut writer, Event::Start(BytesStart::new("soap:Body")))?;
        write(
            &mut writer,
            Event::Start(
                BytesStart::new(call.operation())
                    .with_attributes([("xmlns", self.config.namespace.as_str())]),
            ),
        )?;

        let declared = schema.element_fields(call.operation());
        write_fields(&mut writer, schema, call.params(), declared.as_deref())?;

        write(&mut writer, Event::End(BytesEnd::new(call.operation())))?;
        write(&mut writer, Event::End(BytesEnd::new("soap:Body")))?;
        write(&mut writer, Event::End(BytesEnd::new("soap:Envelope")))?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| TransportError::Xml(e.to_string()))
    }
}

impl std::fmt::Debug for SoapTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapTransport")
            .field("endpoint", &self.config.endpoint)
            .field("schema_loaded", &self.schema.get().is_some())
            .finish()
    }
}

impl Transport for SoapTransport {
    fn invoke(&self, call: &CallDescriptor) -> Result<RawValue, TransportError> {
        let envelope = self.envelope(call)?;
        trace!("SOAP request for {}: {}", call.operation(), envelope);

        let response = self
            .http()?
            .post(&self.config.endpoint)
            .header("Content-Type", CONTENT_TYPE)
            .header("SOAPAction", self.config.soap_action(call.operation()))
            .body(envelope)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        trace!("SOAP response for {} ({}): {}", call.operation(), status, body);

        match parse_response(&body, call.operation()) {
            Err(TransportError::Fault { code, message }) => {
                warn!("{} failed with SOAP fault {}: {}", call.operation(), code, message);
                Err(TransportError::Fault { code, message })
            }
            // A non-2xx status without a readable fault
            _ if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }),
            other => other,
        }
    }
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event) -> Result<(), TransportError> {
    writer
        .write_event(event)
        .map_err(|e| TransportError::Xml(e.to_string()))
}

/// Write fields in declared order; undeclared fields follow in insertion order
fn write_fields(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    schema: &ServiceSchema,
    fields: &[(String, Param)],
    declared: Option<&[&SchemaField]>,
) -> Result<(), TransportError> {
    for (name, param, declared_type) in ordered(fields, declared) {
        match param {
            Param::Text(value) => {
                write(writer, Event::Start(BytesStart::new(name)))?;
                write(writer, Event::Text(BytesText::new(value)))?;
                write(writer, Event::End(BytesEnd::new(name)))?;
            }
            Param::Struct { type_name, fields } => {
                let nested = declared_type
                    .and_then(|t| schema.type_fields(t))
                    .or_else(|| schema.type_fields(type_name));
                write(writer, Event::Start(BytesStart::new(name)))?;
                write_fields(writer, schema, fields, nested.as_deref())?;
                write(writer, Event::End(BytesEnd::new(name)))?;
            }
        }
    }
    Ok(())
}

fn ordered<'p>(
    fields: &'p [(String, Param)],
    declared: Option<&'p [&'p SchemaField]>,
) -> Vec<(&'p str, &'p Param, Option<&'p str>)> {
    let Some(declared) = declared else {
        return fields.iter().map(|(n, p)| (n.as_str(), p, None)).collect();
    };

    let mut out: Vec<_> = declared
        .iter()
        .filter_map(|field| {
            fields
                .iter()
                .find(|(n, _)| *n == field.name)
                .map(|(n, p)| (n.as_str(), p, field.type_name.as_deref()))
        })
        .collect();

    out.extend(
        fields
            .iter()
            .filter(|(n, _)| !declared.iter().any(|f| f.name == *n))
            .map(|(n, p)| (n.as_str(), p, None)),
    );
    out
}

/// Extract the operation result (or fault) from a response envelope
fn parse_response(body: &str, operation: &str) -> Result<RawValue, TransportError> {
    let doc = roxmltree::Document::parse(body)
        .map_err(|e| TransportError::Xml(format!("invalid response: {}", e)))?;

    let soap_body = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "Body" && n.tag_name().namespace() == Some(SOAP_ENV_NS))
        .ok_or_else(|| TransportError::Xml("response has no SOAP Body".to_string()))?;

    let Some(payload) = soap_body.children().find(|n| n.is_element()) else {
        return Ok(RawValue::Absent);
    };

    if payload.tag_name().name() == "Fault" {
        let child_text = |name: &str| {
            payload
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == name)
                .and_then(|n| n.text())
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        return Err(TransportError::Fault {
            code: child_text("faultcode"),
            message: child_text("faultstring"),
        });
    }

    let expected = format!("{}Response", operation);
    if payload.tag_name().name() != expected {
        return Err(TransportError::Xml(format!(
            "expected {}, found {}",
            expected,
            payload.tag_name().name()
        )));
    }

    let result = format!("{}Result", operation);
    Ok(payload
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == result)
        .map(to_raw)
        .unwrap_or(RawValue::Absent))
}

fn to_raw(node: roxmltree::Node) -> RawValue {
    if node.attribute((XSI_NS, "nil")) == Some("true") {
        return RawValue::Absent;
    }

    let children: Vec<_> = node.children().filter(|n| n.is_element()).collect();
    if children.is_empty() {
        return RawValue::Text(node.text().unwrap_or_default().to_string());
    }

    RawValue::Struct(
        children
            .into_iter()
            .map(|child| (child.tag_name().name().to_string(), to_raw(child)))
            .collect(),
    )
}
