//! Legistar entity models
//!
//! Every response element becomes a [`Record`]. Typed wrappers such as
//! [`Body`] and [`Meeting`] add the relationship lookups that make sense for
//! that kind of entity.

pub mod entities;
pub mod kind;
pub mod record;

pub use entities::{
    Action, ActionText, Attachment, AttendanceType, Body, BodyType, Government, Index,
    IndexCategory, Item, ItemStatus, ItemType, Meeting, MeetingLocation, MeetingStatus, VoteType,
};
pub use kind::EntityKind;
pub use record::{FieldValue, Record};

/// A record type the response unwrapper can produce
pub trait Entity: Sized {
    /// Kind used when nothing more specific is known
    const KIND: EntityKind;

    /// Wrap a normalized record
    fn from_record(record: Record) -> Self;

    /// The underlying normalized record
    fn record(&self) -> &Record;
}

impl Entity for Record {
    const KIND: EntityKind = EntityKind::Record;

    fn from_record(record: Record) -> Self {
        record
    }

    fn record(&self) -> &Record {
        self
    }
}
