//! Raw response tree handed back by a transport
//!
//! SOAP responses are XML, where a single repeated child and a lone child look
//! the same. The tree therefore never invents lists on its own: a `List` only
//! exists after a caller asks for every child with a given name via
//! [`RawValue::list_of`].

use serde::Serialize;

/// One node of a raw Legistar response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Missing element or `xsi:nil`
    Absent,
    /// Leaf element carrying text
    Text(String),
    /// Element with child elements, in document order (names may repeat)
    Struct(Vec<(String, RawValue)>),
    /// Explicit sequence produced by [`RawValue::list_of`]
    List(Vec<RawValue>),
}

impl RawValue {
    /// Build a text leaf
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// Build a struct from `(name, value)` pairs
    pub fn structure<N, I>(fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, RawValue)>,
    {
        RawValue::Struct(fields.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    /// Check if this node is absent
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }

    /// Check if this node carries nothing: absent, blank text, or a struct without children
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Absent => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Struct(fields) => fields.is_empty(),
            RawValue::List(_) => false,
        }
    }

    /// Short name of the node's shape, used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            RawValue::Absent => "absent",
            RawValue::Text(_) => "text",
            RawValue::Struct(_) => "struct",
            RawValue::List(_) => "list",
        }
    }

    /// Try to get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the struct's children
    pub fn as_struct(&self) -> Option<&[(String, RawValue)]> {
        match self {
            RawValue::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// First child with the given name
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.as_struct()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Text of the first child with the given name
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(RawValue::as_text)
    }

    /// Collect every child named `name` into an explicit list
    ///
    /// This is where the list/struct ambiguity of XML gets resolved: a
    /// container holding one `<Body>` yields a one-element list, a container
    /// holding none (or an absent container) yields an empty list.
    pub fn list_of(&self, name: &str) -> RawValue {
        match self {
            RawValue::Struct(fields) => RawValue::List(
                fields
                    .iter()
                    .filter(|(n, _)| n == name)
                    .map(|(_, v)| v.clone())
                    .collect(),
            ),
            RawValue::List(items) => RawValue::List(items.clone()),
            _ => RawValue::List(Vec::new()),
        }
    }
}

impl RawValue {
    /// Every child of a container as an explicit list, whatever its name
    ///
    /// For list responses whose element name is not known up front.
    pub fn children(&self) -> RawValue {
        match self {
            RawValue::Struct(fields) => {
                RawValue::List(fields.iter().map(|(_, v)| v.clone()).collect())
            }
            RawValue::List(items) => RawValue::List(items.clone()),
            _ => RawValue::List(Vec::new()),
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Absent
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Absent => write!(f, "(absent)"),
            RawValue::Text(s) => write!(f, "{}", s),
            RawValue::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
            RawValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(count: usize) -> RawValue {
        RawValue::structure((0..count).map(|i| {
            (
                "Body",
                RawValue::structure([("BodyGUID", RawValue::text(format!("guid-{}", i)))]),
            )
        }))
    }

    #[test]
    fn test_list_of_single_child_stays_a_list() {
        let list = bodies(1).list_of("Body");
        match list {
            RawValue::List(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].get_text("BodyGUID"), Some("guid-0"));
            }
            other => panic!("expected list, got {}", other.shape()),
        }
    }

    #[test]
    fn test_list_of_keeps_order_and_filters_names() {
        let mut container = bodies(3);
        if let RawValue::Struct(fields) = &mut container {
            fields.push(("Meeting".to_string(), RawValue::text("ignored")));
        }

        let RawValue::List(items) = container.list_of("Body") else {
            panic!("expected list");
        };
        let guids: Vec<_> = items.iter().filter_map(|b| b.get_text("BodyGUID")).collect();
        assert_eq!(guids, vec!["guid-0", "guid-1", "guid-2"]);
    }

    #[test]
    fn test_list_of_absent_is_empty() {
        assert_eq!(RawValue::Absent.list_of("Body"), RawValue::List(Vec::new()));
        assert_eq!(RawValue::text("x").list_of("Body"), RawValue::List(Vec::new()));
    }

    #[test]
    fn test_children_ignores_names() {
        let container = RawValue::structure([
            ("Voter", RawValue::text("a")),
            ("Sponsor", RawValue::text("b")),
        ]);
        assert_eq!(
            container.children(),
            RawValue::List(vec![RawValue::text("a"), RawValue::text("b")])
        );
        assert_eq!(RawValue::Absent.children(), RawValue::List(Vec::new()));
    }

    #[test]
    fn test_emptiness() {
        assert!(RawValue::Absent.is_empty());
        assert!(RawValue::text("  ").is_empty());
        assert!(RawValue::Struct(Vec::new()).is_empty());
        assert!(!RawValue::List(Vec::new()).is_empty());
        assert!(!RawValue::text("0").is_empty());
    }
}
