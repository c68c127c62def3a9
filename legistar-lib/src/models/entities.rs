//! Typed entity wrappers and their relationship lookups
//!
//! Relationship methods issue one request each and never cache: calling
//! `body.meetings()` twice asks the service twice. Lookups run against the
//! government the entity was fetched under.

use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::kind::EntityKind;
use super::record::Record;
use super::Entity;
use crate::client::Legistar;
use crate::error::{Error, Result};
use crate::naming::raw_field_name;

macro_rules! entity {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize)]
        #[serde(transparent)]
        pub struct $name(Record);

        impl Entity for $name {
            const KIND: EntityKind = EntityKind::$kind;

            fn from_record(record: Record) -> Self {
                Self(record)
            }

            fn record(&self) -> &Record {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = Record;

            fn deref(&self) -> &Record {
                &self.0
            }
        }

        impl From<$name> for Record {
            fn from(entity: $name) -> Record {
                entity.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

entity!(
    /// An action type (`ActionKey`, `ActionGUID`, `ActionName`, `ActionFinalFlag`, ...)
    Action => Action
);
entity!(ActionText => ActionText);
entity!(Attachment => Attachment);
entity!(
    /// A meeting attendance type (`AttendanceTypeName`, `AttendanceTypePluralName`, ...)
    AttendanceType => AttendanceType
);
entity!(
    /// A legislative body (`BodyGUID`, `BodyName`, `BodyTypeSort`, `BodyOLSUsed`)
    Body => Body
);
entity!(BodyType => BodyType);
entity!(
    /// A government the credential has access to (`GovernmentGUID`, `GovernmentName`)
    Government => Government
);
entity!(Index => Index);
entity!(IndexCategory => IndexCategory);
entity!(
    /// A legislative item, either from an item lookup or from a meeting agenda
    Item => Item
);
entity!(ItemStatus => ItemStatus);
entity!(ItemType => ItemType);
entity!(
    /// A meeting of a body
    Meeting => Meeting
);
entity!(MeetingLocation => MeetingLocation);
entity!(MeetingStatus => MeetingStatus);
entity!(VoteType => VoteType);

impl Action {
    /// Texts recorded for this action
    pub fn texts(&self) -> Result<Vec<ActionText>> {
        let client = self.client();
        let call = client
            .request()
            .build("ActionTextGetAll")
            .tenant_scoped()
            .param("ActionID", self.action_id()?)
            .finish()?;
        client.fetch_many(call, EntityKind::ActionText)
    }

    /// Action lists carry `ActionKey`, single lookups `ActionID`
    fn action_id(&self) -> Result<&str> {
        self.id()
            .or_else(|| self.text("key").filter(|s| !s.trim().is_empty()))
            .ok_or_else(|| Error::missing(self.kind(), "id"))
    }
}

impl Body {
    /// Meetings scheduled for this body
    pub fn meetings(&self) -> Result<Vec<Meeting>> {
        let client = self.client();
        let call = client
            .request()
            .build("MeetingGetAllForBody")
            .tenant_scoped()
            .param(raw_field_name(Self::KIND.prefix(), "GUID"), self.require("guid")?)
            .finish()?;
        client.fetch_many(call, EntityKind::Meeting)
    }

    /// Date of this body's next meeting, as sent by the service
    pub fn next_meeting_date(&self) -> Result<Option<String>> {
        let client = self.client();
        let call = client
            .request()
            .build("BodyGetNextMeetingDate")
            .tenant_scoped()
            .param(raw_field_name(Self::KIND.prefix(), "GUID"), self.require("guid")?)
            .finish()?;
        client.fetch_scalar(call)
    }

    /// Type of this body (committee, council, ...)
    pub fn body_type(&self) -> Result<Option<BodyType>> {
        let client = self.client();
        let call = client
            .request()
            .build("BodyTypeGetOneByBodyID")
            .tenant_scoped()
            .param(raw_field_name(Self::KIND.prefix(), "ID"), self.require("id")?)
            .finish()?;
        client.fetch_one(call, EntityKind::BodyType)
    }
}

impl Government {
    /// A client handle scoped to this government
    pub fn scoped_client(&self) -> Result<Legistar> {
        self.client().using(self)
    }
}

impl Meeting {
    /// Items on this meeting's agenda
    pub fn items(&self) -> Result<Vec<Item>> {
        let client = self.client();
        let call = client
            .request()
            .build("MeetingItemGetAll")
            .tenant_scoped()
            .param(raw_field_name(Self::KIND.prefix(), "GUID"), self.require("guid")?)
            .finish()?;
        client.fetch_many(call, EntityKind::MeetingItem)
    }

    /// Agenda items together with their vote results
    pub fn items_with_votes(&self, use_secondary_vote: bool) -> Result<Vec<Item>> {
        let client = self.client();
        let call = client
            .request()
            .build("MeetingItemGetAllWithVotes")
            .tenant_scoped()
            .param(raw_field_name(Self::KIND.prefix(), "GUID"), self.require("guid")?)
            .param("UseSecondaryVote", use_secondary_vote)
            .finish()?;
        client.fetch_many(call, EntityKind::MeetingItem)
    }

    /// Attendance recorded for this meeting
    pub fn attendance(&self) -> Result<Option<Record>> {
        let client = self.client();
        let call = client
            .request()
            .build("MeetingItemGetAttendance")
            .tenant_scoped()
            .param(raw_field_name(Self::KIND.prefix(), "GUID"), self.require("guid")?)
            .finish()?;
        client.fetch_one(call, EntityKind::Record)
    }

    /// People eligible to vote in this meeting
    pub fn voters(&self) -> Result<Vec<Record>> {
        let client = self.client();
        let call = client
            .request()
            .build("MeetingGetAllVoters")
            .tenant_scoped()
            .param(raw_field_name(Self::KIND.prefix(), "GUID"), self.require("guid")?)
            .finish()?;
        client.fetch_children(call, EntityKind::Record)
    }

    /// Meeting date, parsed from the `date` field
    pub fn date(&self) -> Option<NaiveDate> {
        self.text("date").and_then(parse_date)
    }
}

impl Item {
    /// Whether this item came from a meeting agenda rather than an item lookup
    pub fn is_meeting_item(&self) -> bool {
        self.kind() == EntityKind::MeetingItem
    }

    /// Item ID, wherever this item came from
    pub fn item_id(&self) -> Option<&str> {
        self.item_field("id")
    }

    /// Item GUID, wherever this item came from
    pub fn item_guid(&self) -> Option<&str> {
        self.item_field("guid")
    }

    /// Full text of this item
    pub fn full_text(&self) -> Result<Option<Record>> {
        let client = self.client();
        let call = client
            .request()
            .build("TextGetOne")
            .tenant_scoped()
            .param("ItemID", self.require_item_field("id")?)
            .param("ItemGUID", self.require_item_field("guid")?)
            .finish()?;
        client.fetch_one(call, EntityKind::Text)
    }

    /// Sponsors of this item
    pub fn sponsors(&self) -> Result<Vec<Record>> {
        let client = self.client();
        let call = client
            .request()
            .build("ItemSponsorsGetAll")
            .tenant_scoped()
            .param("ItemID", self.require_item_field("id")?)
            .finish()?;
        client.fetch_children(call, EntityKind::Record)
    }

    /// Index entries filed against this item
    pub fn indexes(&self) -> Result<Vec<Index>> {
        let client = self.client();
        let call = client
            .request()
            .build("IndexGetAllByItemKey")
            .tenant_scoped()
            .param("ItemKey", self.require_item_field("key")?)
            .finish()?;
        client.fetch_many(call, EntityKind::Index)
    }

    /// Attachments of this agenda item
    ///
    /// Only meeting items carry the `MeetingItemGUID` this lookup needs.
    pub fn attachments(&self) -> Result<Vec<Attachment>> {
        let client = self.client();
        let guid = if self.is_meeting_item() {
            self.require("guid")?
        } else {
            return Err(Error::missing(self.kind(), "meeting_item_guid"));
        };
        client.attachments(guid)
    }

    /// Meeting items prefix item fields with `Item` (`MeetingItemItemGUID`)
    fn item_field(&self, name: &str) -> Option<&str> {
        let key = self.item_key(name);
        self.text(&key).filter(|s| !s.trim().is_empty())
    }

    fn require_item_field(&self, name: &str) -> Result<&str> {
        let key = self.item_key(name);
        self.require(&key)
    }

    fn item_key(&self, name: &str) -> String {
        if self.is_meeting_item() {
            format!("item_{}", name)
        } else {
            name.to_string()
        }
    }
}

/// Parse the date formats Legistar sends (`2012-05-01T18:00:00`, `2012-05-01`, `5/1/2012`)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%m/%d/%Y %I:%M:%S %p"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}
