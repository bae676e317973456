use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::types::descriptor::bean_type::BeanType;
use crate::types::ds::operations::collection::CollectionHandlerProvider;
use crate::types::ds::simple_type::SimpleType;

/// The type a field holds once any list wrapping has been removed.
#[derive(Clone)]
pub enum FieldType {
    Simple(SimpleType),
    Complex(Arc<BeanType>),
}

impl FieldType {
    pub fn name(&self) -> String {
        match self {
            FieldType::Simple(simple) => simple.name().to_string(),
            FieldType::Complex(bean_type) => bean_type.id(),
        }
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldType::Simple(a), FieldType::Simple(b)) => a == b,
            (FieldType::Complex(a), FieldType::Complex(b)) => a == b,
            _ => false,
        }
    }
}

impl Debug for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Cardinality, constraint and qualification metadata of one field.
///
/// Inclusive bounds are kept in their lexical form, already normalised against the field's
/// native type.
#[derive(Clone, Default)]
pub struct ElementProperties {
    pub namespace: Option<String>,
    pub qualified: bool,
    pub attribute_qualified_default: Option<bool>,
    pub element_qualified_default: Option<bool>,
    pub nillable: bool,
    pub min_occurs: Option<u32>,
    pub max_occurs: Option<u32>,
    pub length: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub min_inclusive: Option<String>,
    pub max_inclusive: Option<String>,
    pub generated: bool,
    pub primary: bool,
    pub raw: bool,
    pub alias: Option<String>,
    pub collection_handler: Option<Arc<dyn CollectionHandlerProvider>>,
}

impl Debug for ElementProperties {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementProperties")
            .field("namespace", &self.namespace)
            .field("nillable", &self.nillable)
            .field("min_occurs", &self.min_occurs)
            .field("max_occurs", &self.max_occurs)
            .field("length", &self.length)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern)
            .field("min_inclusive", &self.min_inclusive)
            .field("max_inclusive", &self.max_inclusive)
            .field(
                "collection_handler",
                &self.collection_handler.as_ref().map(|h| h.name().to_string()),
            )
            .finish()
    }
}

/// One field of a descriptor.
#[derive(Clone, Debug)]
pub struct Element {
    name: String,
    field_type: FieldType,
    attribute: bool,
    parent: String,
    properties: ElementProperties,
}

impl Element {
    pub fn new(
        name: &str,
        field_type: FieldType,
        attribute: bool,
        parent: &str,
        properties: ElementProperties,
    ) -> Self {
        let attribute = attribute && matches!(field_type, FieldType::Simple(_));
        Element {
            name: name.to_string(),
            field_type,
            attribute,
            parent: parent.to_string(),
            properties,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_attribute(&self) -> bool {
        self.attribute
    }

    /// Id of the descriptor declaring this field.
    pub fn parent_id(&self) -> &str {
        &self.parent
    }

    pub fn properties(&self) -> &ElementProperties {
        &self.properties
    }

    pub fn simple_type(&self) -> Option<SimpleType> {
        match &self.field_type {
            FieldType::Simple(simple) => Some(*simple),
            FieldType::Complex(_) => None,
        }
    }

    pub fn complex_type(&self) -> Option<&Arc<BeanType>> {
        match &self.field_type {
            FieldType::Complex(bean_type) => Some(bean_type),
            FieldType::Simple(_) => None,
        }
    }

    pub fn min_occurs(&self) -> u32 {
        self.properties.min_occurs.unwrap_or(1)
    }

    /// 0 means unbounded.
    pub fn max_occurs(&self) -> u32 {
        self.properties.max_occurs.unwrap_or(1)
    }

    pub fn is_list(&self) -> bool {
        self.max_occurs() != 1
    }

    pub fn is_nillable(&self) -> bool {
        self.properties.nillable
    }
}
