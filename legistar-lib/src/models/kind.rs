//! Entity kinds and the raw naming conventions attached to them

use serde::Serialize;

/// The kind of record a raw response element was normalized as
///
/// Each kind knows the prefix Legistar puts in front of its field names and
/// the element name its instances carry inside list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    /// Generic record without a known prefix
    Record,
    Action,
    ActionText,
    Attachment,
    AttendanceType,
    Body,
    BodyType,
    Government,
    Index,
    IndexCategory,
    Item,
    ItemStatus,
    ItemType,
    Meeting,
    MeetingItem,
    MeetingLocation,
    MeetingStatus,
    Text,
    VoteType,
}

impl EntityKind {
    /// Prefix stripped from raw field names (`Body` for `BodyGUID`)
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Record => "",
            Self::Action => "Action",
            Self::ActionText => "ActionText",
            Self::Attachment => "Attachment",
            Self::AttendanceType => "AttendanceType",
            Self::Body => "Body",
            Self::BodyType => "BodyType",
            Self::Government => "Government",
            Self::Index => "Index",
            Self::IndexCategory => "IndexCategory",
            Self::Item => "Item",
            Self::ItemStatus => "ItemStatus",
            Self::ItemType => "ItemType",
            Self::Meeting => "Meeting",
            Self::MeetingItem => "MeetingItem",
            Self::MeetingLocation => "MeetingLocation",
            Self::MeetingStatus => "MeetingStatus",
            Self::Text => "Text",
            Self::VoteType => "VoteType",
        }
    }

    /// Element name of one instance inside a list response
    ///
    /// Legistar names list elements after the entity, so this matches the
    /// prefix for every kind except the generic record.
    pub fn element(&self) -> &'static str {
        match self {
            Self::Record => "Record",
            other => other.prefix(),
        }
    }

    /// Human-readable kind name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Action => "action",
            Self::ActionText => "action text",
            Self::Attachment => "attachment",
            Self::AttendanceType => "attendance type",
            Self::Body => "body",
            Self::BodyType => "body type",
            Self::Government => "government",
            Self::Index => "index",
            Self::IndexCategory => "index category",
            Self::Item => "item",
            Self::ItemStatus => "item status",
            Self::ItemType => "item type",
            Self::Meeting => "meeting",
            Self::MeetingItem => "meeting item",
            Self::MeetingLocation => "meeting location",
            Self::MeetingStatus => "meeting status",
            Self::Text => "text",
            Self::VoteType => "vote type",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
