//! Guid-or-entity arguments

use crate::models::{Entity, Record};

/// A GUID given directly, or read from a fetched record
///
/// Used wherever the service wants a GUID and callers commonly hold the
/// entity instead: tenant selection and attachment lookups.
#[derive(Debug, Clone)]
pub enum GuidRef<'a> {
    Identifier(String),
    Entity(&'a Record),
}

/// A government given by GUID or as a fetched record
pub type TenantRef<'a> = GuidRef<'a>;

impl GuidRef<'_> {
    /// The GUID, if one is available
    ///
    /// Blank identifiers and records without a `guid` field yield `None`.
    pub fn guid(&self) -> Option<&str> {
        let guid = match self {
            GuidRef::Identifier(guid) => Some(guid.as_str()),
            GuidRef::Entity(record) => record.guid(),
        };
        guid.map(str::trim).filter(|g| !g.is_empty())
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            GuidRef::Identifier(guid) => format!("identifier {:?}", guid),
            GuidRef::Entity(record) => format!("{} record", record.kind()),
        }
    }
}

impl From<&str> for GuidRef<'_> {
    fn from(guid: &str) -> Self {
        GuidRef::Identifier(guid.to_string())
    }
}

impl From<String> for GuidRef<'_> {
    fn from(guid: String) -> Self {
        GuidRef::Identifier(guid)
    }
}

impl From<&String> for GuidRef<'_> {
    fn from(guid: &String) -> Self {
        GuidRef::Identifier(guid.clone())
    }
}

impl<'a, E: Entity> From<&'a E> for GuidRef<'a> {
    fn from(entity: &'a E) -> Self {
        GuidRef::Entity(entity.record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityKind, Government};
    use crate::raw::RawValue;
    use crate::testing::client;

    #[test]
    fn test_identifier() {
        assert_eq!(GuidRef::from("g-1").guid(), Some("g-1"));
        assert_eq!(GuidRef::from(" g-1 ".to_string()).guid(), Some("g-1"));
        assert_eq!(GuidRef::from("  ").guid(), None);
    }

    #[test]
    fn test_entity() {
        let (legistar, _) = client(None);
        let raw = RawValue::structure([
            ("GovernmentGUID", RawValue::text("G-1")),
            ("GovernmentName", RawValue::text("Philadelphia")),
        ]);
        let government =
            Government::from_record(Record::from_raw(&legistar, raw, EntityKind::Government).unwrap());

        let guid_ref = GuidRef::from(&government);
        assert_eq!(guid_ref.guid(), Some("G-1"));
        assert_eq!(guid_ref.describe(), "government record");

        let raw = RawValue::structure([("GovernmentName", RawValue::text("No guid"))]);
        let record = Record::from_raw(&legistar, raw, EntityKind::Government).unwrap();
        assert_eq!(GuidRef::from(&record).guid(), None);
    }
}
