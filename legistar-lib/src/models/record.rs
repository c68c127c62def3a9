//! Normalized, read-only records built from raw response elements

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::kind::EntityKind;
use crate::client::Legistar;
use crate::error::{Error, Result};
use crate::naming::normalize_field_name;
use crate::raw::RawValue;

/// A normalized field value
///
/// Legistar sends everything as text: flags arrive as `"1"`/`"0"` and numbers
/// as numeric strings. The typed accessors on [`Record`] interpret them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent or `xsi:nil`
    Null,
    /// Text, flag or numeric string
    Text(String),
    /// Nested structure, normalized with its own element name as prefix
    Nested(BTreeMap<String, FieldValue>),
    /// A child element that occurred more than once
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Try to get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to interpret as a flag (`1`/`0`, `true`/`false`)
    pub fn as_flag(&self) -> Option<bool> {
        match self.as_text()?.trim() {
            "1" => Some(true),
            "0" => Some(false),
            s if s.eq_ignore_ascii_case("true") => Some(true),
            s if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Try to interpret as an integer
    pub fn as_number(&self) -> Option<i64> {
        self.as_text()?.trim().parse().ok()
    }

    /// Try to get as a nested structure
    pub fn as_nested(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Nested(fields) => Some(fields),
            _ => None,
        }
    }

    fn from_raw(raw: &RawValue, prefix: &str) -> Self {
        match raw {
            RawValue::Absent => FieldValue::Null,
            RawValue::Text(s) => FieldValue::Text(s.clone()),
            RawValue::Struct(children) => FieldValue::Nested(normalize_children(children, prefix)),
            RawValue::List(items) => {
                FieldValue::List(items.iter().map(|item| FieldValue::from_raw(item, prefix)).collect())
            }
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => write!(f, "(null)"),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Nested(fields) => write!(f, "{{{} fields}}", fields.len()),
            FieldValue::List(items) => write!(f, "[{} items]", items.len()),
        }
    }
}

/// Normalize a struct's children; repeated names collapse into a list
fn normalize_children(children: &[(String, RawValue)], prefix: &str) -> BTreeMap<String, FieldValue> {
    let mut fields: BTreeMap<String, FieldValue> = BTreeMap::new();

    for (raw_name, raw_value) in children {
        let name = normalize_field_name(raw_name, prefix);
        // Nested structures strip their own element name
        let value = FieldValue::from_raw(raw_value, raw_name);

        match fields.remove(&name) {
            None => {
                fields.insert(name, value);
            }
            Some(FieldValue::List(mut items)) => {
                items.push(value);
                fields.insert(name, FieldValue::List(items));
            }
            Some(previous) => {
                fields.insert(name, FieldValue::List(vec![previous, value]));
            }
        }
    }

    fields
}

/// One normalized Legistar record
///
/// Field names are lower case with underscores and carry no entity prefix.
/// The raw element stays reachable through [`Record::raw`] for anything the
/// normalized view does not cover. Records keep a handle to the client that
/// fetched them, scoped to the government that was selected at the time, so
/// relationship lookups stay within that government.
#[derive(Clone)]
pub struct Record {
    kind: EntityKind,
    fields: BTreeMap<String, FieldValue>,
    raw: RawValue,
    client: Legistar,
}

impl Record {
    /// Normalize a raw struct into a record of the given kind
    pub(crate) fn from_raw(client: &Legistar, raw: RawValue, kind: EntityKind) -> Result<Self> {
        let fields = match &raw {
            RawValue::Struct(children) if !children.is_empty() => {
                normalize_children(children, kind.prefix())
            }
            other => {
                let found = if other.is_empty() { "empty element" } else { other.shape() };
                return Err(Error::shape(format!("{} element", kind.name()), found));
            }
        };

        Ok(Self {
            kind,
            fields,
            raw,
            client: client.clone(),
        })
    }

    /// Kind this record was normalized as
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// All normalized fields
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Normalized field names, sorted
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Field by canonical name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text field by canonical name
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Flag field by canonical name
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_flag)
    }

    /// Numeric field by canonical name
    pub fn number(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    /// Nested structure by canonical name
    pub fn nested(&self, name: &str) -> Option<&BTreeMap<String, FieldValue>> {
        self.get(name).and_then(FieldValue::as_nested)
    }

    /// The record's GUID, if it has a non-empty one
    pub fn guid(&self) -> Option<&str> {
        self.text("guid").filter(|s| !s.trim().is_empty())
    }

    /// The record's numeric ID as text, if any
    pub fn id(&self) -> Option<&str> {
        self.text("id").filter(|s| !s.trim().is_empty())
    }

    /// The record's display name, if any
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    /// Non-empty text field, or an error naming the missing key
    pub(crate) fn require(&self, name: &str) -> Result<&str> {
        self.text(name)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::missing(self.kind, name))
    }

    /// The raw response element this record was built from
    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    /// Client handle scoped to the government this record was fetched under
    pub fn client(&self) -> &Legistar {
        &self.client
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .field("tenant", &self.client.tenant())
            .finish()
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.name(), self.guid()) {
            (Some(name), Some(guid)) => write!(f, "{} {} ({})", self.kind, name, guid),
            (Some(name), None) => write!(f, "{} {}", self.kind, name),
            (None, Some(guid)) => write!(f, "{} {}", self.kind, guid),
            (None, None) => write!(f, "{} with {} fields", self.kind, self.fields.len()),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
