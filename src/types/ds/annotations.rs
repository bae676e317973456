//! Declarative metadata attached to class tables: the field and type level tags the constraint
//! provider reads while building descriptors.

/// Per-accessor metadata. Every tag is optional; a default value means "not annotated".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAnnotations {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub attribute: bool,
    pub transient: bool,
    pub value: bool,
    pub not_null: bool,
    pub min_occurs: Option<u32>,
    pub max_occurs: Option<u32>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub min_decimal: Option<String>,
    pub max_decimal: Option<String>,
    pub generated: bool,
    pub primary: bool,
    pub raw: bool,
    pub alias: Option<String>,
}

impl FieldAnnotations {
    pub fn new() -> Self {
        FieldAnnotations::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn attribute(mut self) -> Self {
        self.attribute = true;
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Marks the accessor holding the single value of a simple type.
    pub fn value(mut self) -> Self {
        self.value = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn occurs(mut self, min: u32, max: u32) -> Self {
        self.min_occurs = Some(min);
        self.max_occurs = Some(max);
        self
    }

    pub fn min_occurs(mut self, min: u32) -> Self {
        self.min_occurs = Some(min);
        self
    }

    pub fn max_occurs(mut self, max: u32) -> Self {
        self.max_occurs = Some(max);
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn min_decimal(mut self, min: &str) -> Self {
        self.min_decimal = Some(min.to_string());
        self
    }

    pub fn max_decimal(mut self, max: &str) -> Self {
        self.max_decimal = Some(max.to_string());
        self
    }

    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }
}

/// Class level metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeAnnotations {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub collection_name: Option<String>,
    pub prop_order: Option<Vec<String>>,
    pub attribute_qualified: bool,
    pub element_qualified: bool,
}

impl TypeAnnotations {
    pub fn new() -> Self {
        TypeAnnotations::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn collection_name(mut self, collection_name: &str) -> Self {
        self.collection_name = Some(collection_name.to_string());
        self
    }

    pub fn prop_order(mut self, order: &[&str]) -> Self {
        self.prop_order = Some(order.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn attribute_qualified(mut self) -> Self {
        self.attribute_qualified = true;
        self
    }

    pub fn element_qualified(mut self) -> Self {
        self.element_qualified = true;
        self
    }
}
