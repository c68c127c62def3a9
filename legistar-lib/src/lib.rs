//! Client library for the Legistar legislative-records service
//!
//! Legistar exposes governments, their legislative bodies, meetings, agenda
//! items, actions and votes through a SOAP service. This crate turns those
//! responses into normalized [`Record`]s with typed wrappers
//! ([`Government`], [`Body`], [`Meeting`], [`Item`], ...) and relationship
//! lookups between them.
//!
//! ```no_run
//! use legistar::{Legistar, SearchCriteria, TransportConfig};
//!
//! # fn main() -> legistar::Result<()> {
//! let mut client = Legistar::connect("partner-guid", TransportConfig::default());
//! let governments = client.governments()?;
//! client.select_tenant(&governments[0])?;
//!
//! for meeting in client.meetings(&SearchCriteria::new().text("budget"))? {
//!     for item in meeting.items()? {
//!         println!("{}", item);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod naming;
pub mod raw;
pub mod request;
pub mod rinse;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{GuidRef, Legistar, SearchCriteria, TenantRef};
pub use error::{Error, Result, TransportError};
pub use models::{
    Action, ActionText, Attachment, AttendanceType, Body, BodyType, Entity, EntityKind,
    FieldValue, Government, Index, IndexCategory, Item, ItemStatus, ItemType, Meeting,
    MeetingLocation, MeetingStatus, Record, VoteType,
};
pub use raw::RawValue;
pub use transport::{SoapTransport, Transport, TransportConfig};
