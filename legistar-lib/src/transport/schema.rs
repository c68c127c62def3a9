//! Service schema read from the Legistar WSDL
//!
//! SOAP document/literal calls must send child elements in the order the
//! schema declares them. Only the parts needed for that are kept: each
//! complex type's ordered fields and the field lists of the operation
//! wrapper elements.

use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::error::TransportError;

const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Guard against cyclic `extension base=` chains
const MAX_BASE_DEPTH: usize = 16;

/// One declared child element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// Element name
    pub name: String,
    /// Declared type without namespace prefix (e.g., "BodyOptions", "string")
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct ComplexType {
    base: Option<String>,
    fields: Vec<SchemaField>,
}

/// Complex types and operation elements declared by the service
#[derive(Debug, Clone, Default)]
pub struct ServiceSchema {
    types: HashMap<String, ComplexType>,
    elements: HashMap<String, ComplexType>,
}

impl ServiceSchema {
    /// Parse the schema out of a WSDL document
    ///
    /// # Errors
    /// Returns [`TransportError::Schema`] if the document is not well-formed XML.
    pub fn parse(wsdl: &str) -> Result<Self, TransportError> {
        let doc = roxmltree::Document::parse(wsdl)
            .map_err(|e| TransportError::Schema(format!("invalid WSDL: {}", e)))?;

        let mut schema = ServiceSchema::default();

        for node in doc.descendants().filter(|n| is_xsd(n, "complexType")) {
            let complex = read_complex_type(node);

            if let Some(name) = node.attribute("name") {
                schema.types.insert(name.to_string(), complex);
            } else if let Some(parent) = node.parent_element()
                && is_xsd(&parent, "element")
                && let Some(name) = parent.attribute("name")
            {
                schema.elements.insert(name.to_string(), complex);
            }
        }

        debug!(
            "Loaded service schema: {} types, {} elements",
            schema.types.len(),
            schema.elements.len()
        );
        Ok(schema)
    }

    /// Read and parse a WSDL file
    ///
    /// # Errors
    /// Returns [`TransportError::Io`] if the file cannot be read, or
    /// [`TransportError::Schema`] if it cannot be parsed.
    pub fn from_path(path: &Path) -> Result<Self, TransportError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Check if a complex type is declared
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of declared complex types
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Ordered fields of a complex type, inherited fields first
    pub fn type_fields(&self, name: &str) -> Option<Vec<&SchemaField>> {
        let complex = self.types.get(name)?;
        Some(self.collect_fields(complex, 0))
    }

    /// Ordered fields of an operation's request or response element
    pub fn element_fields(&self, name: &str) -> Option<Vec<&SchemaField>> {
        let complex = self.elements.get(name)?;
        Some(self.collect_fields(complex, 0))
    }

    fn collect_fields<'a>(&'a self, complex: &'a ComplexType, depth: usize) -> Vec<&'a SchemaField> {
        let mut fields = Vec::new();
        if depth < MAX_BASE_DEPTH
            && let Some(base) = complex.base.as_deref().and_then(|b| self.types.get(b))
        {
            fields.extend(self.collect_fields(base, depth + 1));
        }
        fields.extend(complex.fields.iter());
        fields
    }
}

fn is_xsd(node: &roxmltree::Node, local: &str) -> bool {
    node.is_element() && node.tag_name().name() == local && node.tag_name().namespace() == Some(XSD_NS)
}

/// Strip a namespace prefix (`tns:BodyOptions` -> `BodyOptions`)
fn local_name(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

/// Nearest enclosing complexType, excluding the node itself
fn owning_complex_type<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.ancestors().skip(1).find(|a| is_xsd(a, "complexType"))
}

fn read_complex_type(node: roxmltree::Node) -> ComplexType {
    let mut complex = ComplexType::default();

    for child in node.descendants().skip(1) {
        if owning_complex_type(child) != Some(node) {
            continue;
        }

        if is_xsd(&child, "element") {
            let name = child
                .attribute("name")
                .or_else(|| child.attribute("ref").map(local_name));
            if let Some(name) = name {
                complex.fields.push(SchemaField {
                    name: name.to_string(),
                    type_name: child.attribute("type").map(|t| local_name(t).to_string()),
                });
            }
        } else if is_xsd(&child, "extension")
            && let Some(base) = child.attribute("base")
        {
            complex.base = Some(local_name(base).to_string());
        }
    }

    complex
}
