//! Call descriptors: one outbound Legistar request, fully assembled

use serde::Serialize;

/// A parameter value as it will be sent on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    /// Plain text element
    Text(String),
    /// Nested structure of the given schema type
    Struct {
        /// Schema type name (e.g., "BodyOptions", "MeetingSearchCriteria")
        type_name: String,
        /// Child fields in insertion order
        fields: Vec<(String, Param)>,
    },
}

impl Param {
    /// Try to get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Param::Text(s) => Some(s),
            Param::Struct { .. } => None,
        }
    }

    /// Schema type name of a nested structure
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Param::Struct { type_name, .. } => Some(type_name),
            Param::Text(_) => None,
        }
    }

    /// Child field of a nested structure
    pub fn field(&self, name: &str) -> Option<&Param> {
        match self {
            Param::Struct { fields, .. } => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            Param::Text(_) => None,
        }
    }
}

/// Everything needed to issue one remote operation
///
/// Built by [`CallBuilder::finish`](super::CallBuilder::finish); never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallDescriptor {
    operation: String,
    params: Vec<(String, Param)>,
}

impl CallDescriptor {
    pub(crate) fn new(operation: String, params: Vec<(String, Param)>) -> Self {
        Self { operation, params }
    }

    /// Remote operation name (e.g., "BodyGetAll")
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// All parameters in the order they were added
    pub fn params(&self) -> &[(String, Param)] {
        &self.params
    }

    /// Parameter by name
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Text parameter by name
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Param::as_text)
    }

    /// Credential token sent with the call
    pub fn credential(&self) -> Option<&str> {
        self.get_text(super::PARTNER_PARAM)
    }

    /// Government the call is scoped to, if any
    pub fn tenant(&self) -> Option<&str> {
        self.get_text(super::GOVERNMENT_PARAM)
    }

    /// Nested options structure, if any
    pub fn options(&self) -> Option<&Param> {
        self.get(super::OPTIONS_PARAM)
    }
}

impl std::fmt::Display for CallDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.operation)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                // Never print the credential
                Param::Text(_) if name == super::PARTNER_PARAM => write!(f, "{}=***", name)?,
                Param::Text(s) => write!(f, "{}={:?}", name, s)?,
                Param::Struct { type_name, fields } => {
                    write!(f, "{}=<{}; {} fields>", name, type_name, fields.len())?
                }
            }
        }
        write!(f, ")")
    }
}
