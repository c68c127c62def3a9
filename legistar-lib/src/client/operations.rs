//! Read operations exposed by the service

use super::{GuidRef, Legistar, SearchCriteria};
use crate::error::{Error, Result};
use crate::models::{
    Action, ActionText, Attachment, AttendanceType, Body, BodyType, Entity, EntityKind,
    Government, Index, IndexCategory, Item, ItemStatus, ItemType, Meeting, MeetingLocation,
    MeetingStatus, Record, VoteType,
};
use crate::request::ParamValue;

/// Options type used by the body listings
const BODY_OPTIONS: &str = "BodyOptions";

impl Legistar {
    fn list_all<E: Entity>(&self, operation: &str, kind: EntityKind) -> Result<Vec<E>> {
        let call = self.request().build(operation).tenant_scoped().finish()?;
        self.fetch_many(call, kind)
    }

    fn get_one<E: Entity>(
        &self,
        operation: &str,
        key: &str,
        value: &str,
        kind: EntityKind,
    ) -> Result<Option<E>> {
        let call = self
            .request()
            .build(operation)
            .tenant_scoped()
            .param(key, value)
            .finish()?;
        self.fetch_one(call, kind)
    }

    fn scalar(&self, operation: &str) -> Result<Option<String>> {
        let call = self.request().build(operation).finish()?;
        self.fetch_scalar(call)
    }

    fn years(&self, operation: &str, kind: EntityKind) -> Result<Vec<String>> {
        let records: Vec<Record> = self.list_all(operation, kind)?;
        records
            .iter()
            .map(|r| r.require("year").map(str::to_string))
            .collect()
    }

    // Governments

    /// Governments the credential can access
    pub fn governments(&self) -> Result<Vec<Government>> {
        let call = self.request().build("GovernmentGetAll").finish()?;
        self.fetch_many(call, EntityKind::Government)
    }

    /// One government, by GUID or the selected one
    ///
    /// # Errors
    /// Returns [`Error::NoTenantSelected`] when `guid` is `None` and no
    /// government is selected.
    pub fn government(&self, guid: Option<&str>) -> Result<Option<Government>> {
        let builder = self.request().build("GovernmentGetOne");
        let builder = match guid {
            Some(guid) => builder.param("GovernmentGUID", guid),
            None => builder.tenant_scoped(),
        };
        self.fetch_one(builder.finish()?, EntityKind::Government)
    }

    /// GUID of the government hosted under a Legistar host name
    pub fn government_guid_from_host_name(&self, host_name: &str) -> Result<Option<String>> {
        let call = self
            .request()
            .build("GovernmentGetGUIDFromHostName")
            .param("HostName", host_name)
            .finish()?;
        self.fetch_scalar(call)
    }

    // Actions

    pub fn actions(&self) -> Result<Vec<Action>> {
        self.list_all("ActionGetAll", EntityKind::Action)
    }

    pub fn action(&self, action_id: &str) -> Result<Option<Action>> {
        self.get_one("ActionGetOne", "ActionID", action_id, EntityKind::Action)
    }

    pub fn procedural_actions(&self) -> Result<Vec<Action>> {
        self.list_all("ActionGetProceduralActions", EntityKind::Action)
    }

    pub fn action_texts(&self) -> Result<Vec<ActionText>> {
        self.list_all("ActionTextGetAll", EntityKind::ActionText)
    }

    pub fn action_text(&self, action_text_id: &str) -> Result<Option<ActionText>> {
        self.get_one(
            "ActionTextGetOne",
            "ActionTextID",
            action_text_id,
            EntityKind::ActionText,
        )
    }

    // Attachments and attendance

    /// Attachments of a meeting item, given by GUID or as the item itself
    ///
    /// # Errors
    /// Returns [`Error::MissingField`] if no GUID can be read from `meeting_item`.
    pub fn attachments<'a>(&self, meeting_item: impl Into<GuidRef<'a>>) -> Result<Vec<Attachment>> {
        let meeting_item = meeting_item.into();
        let guid = meeting_item
            .guid()
            .ok_or_else(|| Error::missing(EntityKind::MeetingItem, "guid"))?;
        let call = self
            .request()
            .build("AttachmentGetAll")
            .tenant_scoped()
            .param("MeetingItemGUID", guid)
            .finish()?;
        self.fetch_many(call, EntityKind::Attachment)
    }

    pub fn attendance_types(&self) -> Result<Vec<AttendanceType>> {
        self.list_all("AttendanceTypeGetAll", EntityKind::AttendanceType)
    }

    // Bodies

    /// Bodies of the selected government
    pub fn bodies(&self) -> Result<Vec<Body>> {
        self.bodies_with_options("BodyGetAll", std::iter::empty::<(&str, &str)>())
    }

    /// Bodies that hold meetings
    pub fn bodies_that_meet(&self) -> Result<Vec<Body>> {
        self.bodies_with_options("BodyGetAllThatMeet", std::iter::empty::<(&str, &str)>())
    }

    /// Body listing with `BodyOptions` fields overridden
    ///
    /// `operation` is `BodyGetAll` or `BodyGetAllThatMeet`. Options not
    /// overridden keep the service defaults.
    pub fn bodies_with_options<K, V, I>(&self, operation: &str, overrides: I) -> Result<Vec<Body>>
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let call = self
            .request()
            .build(operation)
            .tenant_scoped()
            .options(BODY_OPTIONS)
            .option_overrides(overrides)
            .finish()?;
        self.fetch_many(call, EntityKind::Body)
    }

    pub fn body(&self, body_id: &str) -> Result<Option<Body>> {
        self.get_one("BodyGetOne", "BodyID", body_id, EntityKind::Body)
    }

    pub fn body_types(&self) -> Result<Vec<BodyType>> {
        self.list_all("BodyTypeGetAll", EntityKind::BodyType)
    }

    // Indexes

    pub fn indexes(&self) -> Result<Vec<Index>> {
        self.list_all("IndexGetAll", EntityKind::Index)
    }

    pub fn index(&self, index_id: &str) -> Result<Option<Index>> {
        self.get_one("IndexGetOne", "IndexID", index_id, EntityKind::Index)
    }

    pub fn index_categories(&self) -> Result<Vec<IndexCategory>> {
        self.list_all("IndexCategoryGetAll", EntityKind::IndexCategory)
    }

    // Items

    pub fn item(&self, item_id: &str) -> Result<Option<Item>> {
        self.get_one("ItemGetOne", "ItemID", item_id, EntityKind::Item)
    }

    /// Items matching the criteria
    pub fn items(&self, criteria: &SearchCriteria) -> Result<Vec<Item>> {
        let call = self
            .request()
            .build("ItemSearch")
            .tenant_scoped()
            .param("ItemSearchCriteria", criteria.to_param())
            .finish()?;
        self.fetch_many(call, EntityKind::Item)
    }

    /// Full text of an item
    pub fn item_text(&self, item_id: &str, item_guid: &str) -> Result<Option<Record>> {
        let call = self
            .request()
            .build("TextGetOne")
            .tenant_scoped()
            .param("ItemID", item_id)
            .param("ItemGUID", item_guid)
            .finish()?;
        self.fetch_one(call, EntityKind::Text)
    }

    pub fn item_statuses(&self) -> Result<Vec<ItemStatus>> {
        self.list_all("ItemStatusGetAll", EntityKind::ItemStatus)
    }

    pub fn item_types(&self) -> Result<Vec<ItemType>> {
        self.list_all("ItemTypeGetAll", EntityKind::ItemType)
    }

    /// Years that have items
    pub fn item_years(&self) -> Result<Vec<String>> {
        self.years("ItemGetYears", EntityKind::Item)
    }

    // Meetings

    pub fn meeting(&self, meeting_guid: &str) -> Result<Option<Meeting>> {
        self.get_one("MeetingGetOne", "MeetingGUID", meeting_guid, EntityKind::Meeting)
    }

    /// Meetings matching the criteria
    pub fn meetings(&self, criteria: &SearchCriteria) -> Result<Vec<Meeting>> {
        let call = self
            .request()
            .build("MeetingSearch")
            .tenant_scoped()
            .param("MeetingSearchCriteria", criteria.to_param())
            .finish()?;
        self.fetch_many(call, EntityKind::Meeting)
    }

    /// Years that have meetings
    pub fn meeting_years(&self) -> Result<Vec<String>> {
        self.years("MeetingGetYears", EntityKind::Meeting)
    }

    pub fn meeting_locations(&self) -> Result<Vec<MeetingLocation>> {
        self.list_all("MeetingLocationGetAll", EntityKind::MeetingLocation)
    }

    pub fn meeting_statuses(&self) -> Result<Vec<MeetingStatus>> {
        self.list_all("MeetingStatusGetAll", EntityKind::MeetingStatus)
    }

    pub fn vote_types(&self) -> Result<Vec<VoteType>> {
        self.list_all("VoteTypeGetAll", EntityKind::VoteType)
    }

    // Service information

    pub fn server_date_time(&self) -> Result<Option<String>> {
        self.scalar("GetDateTime")
    }

    pub fn server_name(&self) -> Result<Option<String>> {
        self.scalar("GetServerName")
    }

    pub fn version(&self) -> Result<Option<String>> {
        self.scalar("GetVersion")
    }

    pub fn culture_name(&self) -> Result<Option<String>> {
        self.scalar("GetCurrentCultureName")
    }

    pub fn long_date_pattern(&self) -> Result<Option<String>> {
        self.scalar("GetCurrentCultureDateTimeFormatLongDatePattern")
    }

    pub fn short_date_pattern(&self) -> Result<Option<String>> {
        self.scalar("GetCurrentCultureDateTimeFormatShortDatePattern")
    }

    /// Name of the partner owning the credential
    pub fn partner_name(&self) -> Result<Option<String>> {
        self.scalar("PartnerGetName")
    }

    pub fn ping(&self) -> Result<Option<String>> {
        self.scalar("Ping")
    }
}
