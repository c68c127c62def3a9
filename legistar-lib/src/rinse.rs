//! Response unwrapping ("rinsing")
//!
//! Classifies a raw response as absent, scalar, a single struct, or a list of
//! structs, and turns it into records. Every raw shape lands in exactly one
//! case; elements that cannot become records are reported rather than
//! coerced.

use crate::client::Legistar;
use crate::error::{Error, Result};
use crate::models::{Entity, EntityKind, Record};
use crate::raw::RawValue;

/// A classified response
#[derive(Debug, Clone)]
pub enum Rinsed<E> {
    /// Absent or empty response
    None,
    /// Plain text value, trimmed
    Scalar(String),
    /// Exactly one record
    One(E),
    /// Records in source order
    Many(Vec<E>),
}

impl<E> Rinsed<E> {
    /// Check if the response was empty
    pub fn is_none(&self) -> bool {
        matches!(self, Rinsed::None)
    }

    /// Short name of the classified shape, used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            Rinsed::None => "nothing",
            Rinsed::Scalar(_) => "scalar",
            Rinsed::One(_) => "single record",
            Rinsed::Many(_) => "list",
        }
    }

    /// Take the response as a list; nothing becomes an empty list
    ///
    /// # Errors
    /// Returns [`Error::UnrecognizedResponseShape`] for scalars and single
    /// records.
    pub fn into_many(self) -> Result<Vec<E>> {
        match self {
            Rinsed::None => Ok(Vec::new()),
            Rinsed::Many(records) => Ok(records),
            other => Err(Error::shape("list", other.shape())),
        }
    }

    /// Take the response as at most one record
    ///
    /// # Errors
    /// Returns [`Error::UnrecognizedResponseShape`] for scalars and lists.
    pub fn into_one(self) -> Result<Option<E>> {
        match self {
            Rinsed::None => Ok(None),
            Rinsed::One(record) => Ok(Some(record)),
            other => Err(Error::shape("single record", other.shape())),
        }
    }

    /// Take the response as a plain value
    ///
    /// # Errors
    /// Returns [`Error::UnrecognizedResponseShape`] for records and lists.
    pub fn into_scalar(self) -> Result<Option<String>> {
        match self {
            Rinsed::None => Ok(None),
            Rinsed::Scalar(value) => Ok(Some(value)),
            other => Err(Error::shape("scalar", other.shape())),
        }
    }
}

/// Classify `raw` and build records of `kind`, wrapped as `E`
///
/// # Errors
/// Returns [`Error::UnrecognizedResponseShape`] when a list contains an
/// element that is not a non-empty struct.
pub fn rinse<E: Entity>(client: &Legistar, raw: RawValue, kind: EntityKind) -> Result<Rinsed<E>> {
    if raw.is_empty() {
        return Ok(Rinsed::None);
    }

    match raw {
        RawValue::Text(value) => Ok(Rinsed::Scalar(value.trim().to_string())),
        RawValue::List(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                build(client, item, kind).map_err(|_| {
                    Error::shape(
                        format!("{} element", kind.name()),
                        format!("non-record list element at index {}", index),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Rinsed::Many),
        structure @ RawValue::Struct(_) => build(client, structure, kind).map(Rinsed::One),
        // is_empty() covers Absent
        RawValue::Absent => Ok(Rinsed::None),
    }
}

fn build<E: Entity>(client: &Legistar, raw: RawValue, kind: EntityKind) -> Result<E> {
    Record::from_raw(client, raw, kind).map(E::from_record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Body;
    use crate::testing::client;

    fn raw_body(guid: &str) -> RawValue {
        RawValue::structure([
            ("BodyGUID", RawValue::text(guid)),
            ("BodyName", RawValue::text(format!("Body {}", guid))),
        ])
    }

    #[test]
    fn test_absent_is_none() {
        let (legistar, _) = client(None);
        let rinsed = rinse::<Record>(&legistar, RawValue::Absent, EntityKind::Record).unwrap();
        assert!(rinsed.is_none());

        let rinsed = rinse::<Record>(&legistar, RawValue::Struct(Vec::new()), EntityKind::Record)
            .unwrap();
        assert!(rinsed.is_none());

        let rinsed = rinse::<Record>(&legistar, RawValue::text("   "), EntityKind::Record).unwrap();
        assert!(rinsed.is_none());
    }

    #[test]
    fn test_empty_list_is_empty_list() {
        let (legistar, _) = client(None);
        let rinsed = rinse::<Body>(&legistar, RawValue::List(Vec::new()), EntityKind::Body).unwrap();
        match rinsed {
            Rinsed::Many(items) => assert!(items.is_empty()),
            other => panic!("expected empty list, got {}", other.shape()),
        }
    }

    #[test]
    fn test_single_element_list_stays_a_list() {
        let (legistar, _) = client(None);
        let raw = RawValue::List(vec![raw_body("B-1")]);
        match rinse::<Body>(&legistar, raw, EntityKind::Body).unwrap() {
            Rinsed::Many(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].guid(), Some("B-1"));
            }
            other => panic!("expected list, got {}", other.shape()),
        }
    }

    #[test]
    fn test_list_preserves_order() {
        let (legistar, _) = client(None);
        let raw = RawValue::List(vec![raw_body("B-3"), raw_body("B-1"), raw_body("B-2")]);
        let bodies = rinse::<Body>(&legistar, raw, EntityKind::Body)
            .unwrap()
            .into_many()
            .unwrap();

        let guids: Vec<_> = bodies.iter().filter_map(|b| b.guid()).collect();
        assert_eq!(guids, vec!["B-3", "B-1", "B-2"]);
    }

    #[test]
    fn test_scalar_is_trimmed_text() {
        let (legistar, _) = client(None);
        let rinsed = rinse::<Record>(&legistar, RawValue::text(" 4.1.0\n"), EntityKind::Record)
            .unwrap();
        assert_eq!(rinsed.into_scalar().unwrap().as_deref(), Some("4.1.0"));
    }

    #[test]
    fn test_struct_is_exactly_one_record() {
        let (legistar, _) = client(None);
        let rinsed = rinse::<Body>(&legistar, raw_body("B-1"), EntityKind::Body).unwrap();
        let body = rinsed.into_one().unwrap().unwrap();
        assert_eq!(body.name(), Some("Body B-1"));
        assert_eq!(body.kind(), EntityKind::Body);
    }

    #[test]
    fn test_non_record_list_element_fails_loudly() {
        let (legistar, _) = client(None);
        let raw = RawValue::List(vec![raw_body("B-1"), RawValue::text("stray")]);
        let err = rinse::<Body>(&legistar, raw, EntityKind::Body).unwrap_err();
        match err {
            Error::UnrecognizedResponseShape { found, .. } => assert!(found.contains("index 1")),
            other => panic!("unexpected error: {other}"),
        }

        let raw = RawValue::List(vec![RawValue::List(vec![raw_body("B-1")])]);
        assert!(rinse::<Body>(&legistar, raw, EntityKind::Body).is_err());
    }

    #[test]
    fn test_shape_conversions() {
        let (legistar, _) = client(None);

        let one = rinse::<Body>(&legistar, raw_body("B-1"), EntityKind::Body).unwrap();
        assert!(matches!(
            one.into_many(),
            Err(Error::UnrecognizedResponseShape { .. })
        ));

        let scalar = rinse::<Body>(&legistar, RawValue::text("x"), EntityKind::Body).unwrap();
        assert!(matches!(
            scalar.into_many(),
            Err(Error::UnrecognizedResponseShape { .. })
        ));

        let many =
            rinse::<Body>(&legistar, RawValue::List(vec![raw_body("B-1")]), EntityKind::Body)
                .unwrap();
        assert!(many.into_one().is_err());

        let record = rinse::<Body>(&legistar, raw_body("B-1"), EntityKind::Body).unwrap();
        assert!(record.into_scalar().is_err());

        let none = rinse::<Body>(&legistar, RawValue::Absent, EntityKind::Body).unwrap();
        assert!(none.into_one().unwrap().is_none());
    }
}
