//! The Legistar client
//!
//! [`Legistar`] holds the credential, the transport and the currently
//! selected government. Every read operation is one request: build a call,
//! invoke the transport, rinse the result into records.

mod operations;
mod search;
mod tenant;

pub use search::{SEARCH_TEXT, SearchCriteria};
pub use tenant::{GuidRef, TenantRef};

use std::sync::Arc;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::models::{Entity, EntityKind};
use crate::raw::RawValue;
use crate::request::{CallDescriptor, RequestBuilder};
use crate::rinse::rinse;
use crate::transport::{SoapTransport, Transport, TransportConfig};

struct Inner {
    credential: String,
    transport: Box<dyn Transport>,
}

/// Entry point to the Legistar service
///
/// Cheap to clone; clones share the transport but each carries its own
/// tenant selection.
///
/// ```no_run
/// use legistar::Legistar;
///
/// # fn main() -> legistar::Result<()> {
/// let mut client = Legistar::connect("partner-guid", Default::default());
/// let governments = client.governments()?;
/// client.select_tenant(&governments[0])?;
/// for body in client.bodies()? {
///     println!("{}", body);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Legistar {
    inner: Arc<Inner>,
    tenant: Option<String>,
}

impl Legistar {
    /// Create a client using the given transport
    pub fn new(credential: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                credential: credential.into(),
                transport: Box::new(transport),
            }),
            tenant: None,
        }
    }

    /// Create a client speaking SOAP with the given configuration
    pub fn connect(credential: impl Into<String>, config: TransportConfig) -> Self {
        Self::new(credential, SoapTransport::new(config))
    }

    /// Preselect a government by GUID or record
    ///
    /// # Errors
    /// Returns [`Error::InvalidTenant`] if no GUID can be read from `tenant`.
    pub fn with_tenant<'a>(mut self, tenant: impl Into<TenantRef<'a>>) -> Result<Self> {
        self.select_tenant(tenant)?;
        Ok(self)
    }

    /// Select the government used by later government-scoped calls
    ///
    /// # Errors
    /// Returns [`Error::InvalidTenant`] if no GUID can be read from `tenant`.
    /// The previous selection is kept in that case.
    pub fn select_tenant<'a>(&mut self, tenant: impl Into<TenantRef<'a>>) -> Result<()> {
        let tenant = tenant.into();
        let guid = tenant
            .guid()
            .ok_or_else(|| Error::InvalidTenant(tenant.describe()))?;
        debug!("Selected government {}", guid);
        self.tenant = Some(guid.to_string());
        Ok(())
    }

    /// GUID of the selected government
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    /// A client sharing this transport, scoped to another government
    ///
    /// This client's own selection is unchanged.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTenant`] if no GUID can be read from `tenant`.
    pub fn using<'a>(&self, tenant: impl Into<TenantRef<'a>>) -> Result<Legistar> {
        let mut scoped = self.clone();
        scoped.select_tenant(tenant)?;
        Ok(scoped)
    }

    pub(crate) fn request(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.inner.credential, self.tenant.as_deref())
    }

    pub(crate) fn invoke(&self, call: &CallDescriptor) -> Result<RawValue> {
        debug!("Invoking {}", call);
        let raw = self.inner.transport.invoke(call)?;
        trace!("{} returned {}", call.operation(), raw.shape());
        Ok(raw)
    }

    /// Invoke a list operation; children named after `kind` become records
    pub(crate) fn fetch_many<E: Entity>(&self, call: CallDescriptor, kind: EntityKind) -> Result<Vec<E>> {
        let raw = self.invoke(&call)?;
        let items = raw.list_of(kind.element());

        // A populated container without a single matching child is not an empty list
        if matches!(&items, RawValue::List(found) if found.is_empty()) && !raw.is_empty() {
            return Err(Error::shape(
                format!("list of {} elements", kind.element()),
                describe_children(&raw),
            ));
        }

        rinse(self, items, kind)?.into_many()
    }

    /// Invoke a list operation whose element name is not known; every child becomes a record
    pub(crate) fn fetch_children<E: Entity>(&self, call: CallDescriptor, kind: EntityKind) -> Result<Vec<E>> {
        let raw = self.invoke(&call)?;
        rinse(self, raw.children(), kind)?.into_many()
    }

    /// Invoke a single-record operation
    pub(crate) fn fetch_one<E: Entity>(&self, call: CallDescriptor, kind: EntityKind) -> Result<Option<E>> {
        let raw = self.invoke(&call)?;
        rinse(self, raw, kind)?.into_one()
    }

    /// Invoke an operation returning a plain value
    pub(crate) fn fetch_scalar(&self, call: CallDescriptor) -> Result<Option<String>> {
        let raw = self.invoke(&call)?;
        rinse::<crate::models::Record>(self, raw, EntityKind::Record)?.into_scalar()
    }
}

fn describe_children(raw: &RawValue) -> String {
    match raw.as_struct() {
        Some(fields) => {
            let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
            format!("struct with children [{}]", names.join(", "))
        }
        None => raw.shape().to_string(),
    }
}

impl std::fmt::Debug for Legistar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Legistar")
            .field("credential", &"***")
            .field("tenant", &self.tenant)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::models::{Body, Government, Record};
    use crate::testing::{client, list, MockTransport};

    fn governments_response() -> RawValue {
        list(
            "Government",
            [
                RawValue::structure([
                    ("GovernmentGUID", RawValue::text("G-1")),
                    ("GovernmentName", RawValue::text("Philadelphia")),
                ]),
                RawValue::structure([
                    ("GovernmentGUID", RawValue::text("G-2")),
                    ("GovernmentName", RawValue::text("Pittsburgh")),
                ]),
            ],
        )
    }

    fn bodies_response() -> RawValue {
        list(
            "Body",
            [RawValue::structure([
                ("BodyGUID", RawValue::text("B-1")),
                ("BodyName", RawValue::text("City Council")),
            ])],
        )
    }

    #[test]
    fn test_governments_have_guid_and_name() {
        let (legistar, transport) = client(None);
        transport.respond("GovernmentGetAll", governments_response());

        let governments = legistar.governments().unwrap();
        assert_eq!(governments.len(), 2);
        for government in &governments {
            assert!(government.guid().is_some());
            assert!(government.name().is_some());
        }

        let call = transport.last_call().unwrap();
        assert_eq!(call.credential(), Some("test-key"));
        assert_eq!(call.tenant(), None);
    }

    #[test]
    fn test_scoped_call_without_tenant_fails_before_transport() {
        let (legistar, transport) = client(None);
        match legistar.bodies().unwrap_err() {
            Error::NoTenantSelected { operation } => assert_eq!(operation, "BodyGetAll"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_select_tenant_from_government() {
        let (mut legistar, transport) = client(None);
        transport.respond("GovernmentGetAll", governments_response());
        transport.respond("BodyGetAll", bodies_response());

        let governments = legistar.governments().unwrap();
        legistar.select_tenant(&governments[0]).unwrap();
        assert_eq!(legistar.tenant(), Some("G-1"));

        let bodies = legistar.bodies().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(transport.last_call().unwrap().tenant(), Some("G-1"));

        bodies[0].meetings().unwrap();
        let call = transport.last_call().unwrap();
        assert_eq!(call.operation(), "MeetingGetAllForBody");
        assert_eq!(call.tenant(), Some("G-1"));
        assert_eq!(call.get_text("BodyGUID"), Some("B-1"));
    }

    #[test]
    fn test_select_tenant_by_guid() {
        let (mut legistar, _) = client(None);
        legistar.select_tenant("G-9").unwrap();
        assert_eq!(legistar.tenant(), Some("G-9"));
    }

    #[test]
    fn test_invalid_tenant_keeps_previous_selection() {
        let (mut legistar, _) = client(Some("G-1"));
        let raw = RawValue::structure([("GovernmentName", RawValue::text("No guid"))]);
        let record = Record::from_raw(&legistar, raw, EntityKind::Government).unwrap();

        assert!(matches!(
            legistar.select_tenant(&record),
            Err(Error::InvalidTenant(_))
        ));
        assert!(matches!(legistar.select_tenant(""), Err(Error::InvalidTenant(_))));
        assert_eq!(legistar.tenant(), Some("G-1"));
    }

    #[test]
    fn test_with_tenant_rejects_blank_guid() {
        let (legistar, transport) = client(None);
        assert!(matches!(
            legistar.clone().with_tenant("   "),
            Err(Error::InvalidTenant(_))
        ));
        assert!(transport.calls().is_empty());

        let scoped = legistar.with_tenant(" G-3 ").unwrap();
        assert_eq!(scoped.tenant(), Some("G-3"));
        scoped.bodies().unwrap();
        assert_eq!(transport.last_call().unwrap().tenant(), Some("G-3"));
    }

    #[test]
    fn test_using_leaves_original_unchanged() {
        let (legistar, transport) = client(Some("G-1"));

        let other = legistar.using("G-2").unwrap();
        other.bodies().unwrap();
        assert_eq!(transport.last_call().unwrap().tenant(), Some("G-2"));

        legistar.bodies().unwrap();
        assert_eq!(transport.last_call().unwrap().tenant(), Some("G-1"));
        assert_eq!(legistar.tenant(), Some("G-1"));
    }

    #[test]
    fn test_records_keep_the_tenant_they_were_fetched_under() {
        let (mut legistar, transport) = client(Some("G-1"));
        transport.respond("BodyGetAll", bodies_response());

        let bodies: Vec<Body> = legistar.bodies().unwrap();
        legistar.select_tenant("G-2").unwrap();

        bodies[0].meetings().unwrap();
        assert_eq!(transport.last_call().unwrap().tenant(), Some("G-1"));
    }

    #[test]
    fn test_government_scoped_client() {
        let (legistar, transport) = client(None);
        transport.respond("GovernmentGetAll", governments_response());

        let governments: Vec<Government> = legistar.governments().unwrap();
        let scoped = governments[1].scoped_client().unwrap();
        scoped.vote_types().unwrap();
        assert_eq!(transport.last_call().unwrap().tenant(), Some("G-2"));
        assert_eq!(legistar.tenant(), None);
    }

    #[test]
    fn test_transport_errors_pass_through() {
        let (legistar, transport) = client(Some("G-1"));
        transport.fail("BodyGetAll", "soap:Server", "Invalid PartnerGUID");

        match legistar.bodies().unwrap_err() {
            Error::Transport(TransportError::Fault { code, message }) => {
                assert_eq!(code, "soap:Server");
                assert_eq!(message, "Invalid PartnerGUID");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_element_list_is_a_list() {
        let (legistar, transport) = client(Some("G-1"));
        transport.respond("BodyGetAll", bodies_response());

        let bodies = legistar.bodies().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].name(), Some("City Council"));
    }

    #[test]
    fn test_empty_list_response() {
        let (legistar, transport) = client(Some("G-1"));
        transport.respond("BodyGetAll", RawValue::Absent);
        assert!(legistar.bodies().unwrap().is_empty());

        transport.respond("BodyGetAll", RawValue::Struct(Vec::new()));
        assert!(legistar.bodies().unwrap().is_empty());
    }

    #[test]
    fn test_container_without_matching_children_fails() {
        let (legistar, transport) = client(Some("G-1"));
        transport.respond(
            "BodyGetAll",
            list("Meeting", [RawValue::structure([("MeetingGUID", RawValue::text("M-1"))])]),
        );

        match legistar.bodies().unwrap_err() {
            Error::UnrecognizedResponseShape { found, .. } => assert!(found.contains("Meeting")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_hides_credential() {
        let legistar = Legistar::new("secret-key", MockTransport::default());
        let shown = format!("{:?}", legistar);
        assert!(!shown.contains("secret-key"));
    }
}
