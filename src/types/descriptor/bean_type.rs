//! Type descriptors built from class tables.
//!
//! A [`BeanType`] is cheap to create; the field graph is reflected from the class table the
//! first time anything asks for it and is immutable afterwards. Concurrent first callers block
//! on the same build instead of racing their own.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::types::descriptor::defined_type::DefinedType;
use crate::types::ds::annotations::FieldAnnotations;
use crate::types::ds::class::{
    field_name, is_reader, is_writer, lower_first, BeanClass, ClassKind, ClassRef, Method,
    NativeType,
};
use crate::types::ds::element::{Element, ElementProperties, FieldType};
use crate::types::ds::error::BeanError;
use crate::types::ds::object::{new_object, ObjectRef};
use crate::types::ds::operations::collection::CollectionHandlerProvider;
use crate::types::ds::operations::type_conversion::Converter;
use crate::types::ds::value::Value;
use crate::types::ds::virtual_object::VirtualInstance;
use crate::types::instance::bean_instance::BeanInstance;
use crate::types::plugin::config::ResolverConfig;
use crate::types::plugin::registry::BeanResolver;

/// Type level properties, read from the class annotations when the descriptor is created.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeProperties {
    pub name: String,
    pub namespace: Option<String>,
    pub collection_name: Option<String>,
    pub enumeration: Vec<String>,
}

impl TypeProperties {
    fn load(class: &BeanClass) -> Self {
        let annotations = class.annotations();
        let non_blank = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        TypeProperties {
            name: non_blank(&annotations.name).unwrap_or_else(|| lower_first(class.simple_name())),
            namespace: non_blank(&annotations.namespace),
            collection_name: non_blank(&annotations.collection_name),
            enumeration: match class.kind() {
                ClassKind::Enum => class.enum_constants().to_vec(),
                _ => vec![],
            },
        }
    }
}

struct Structure {
    children: IndexMap<String, Element>,
    getters: HashMap<String, Method>,
    setters: HashMap<String, Method>,
    actual_types: HashMap<String, NativeType>,
    component_types: HashMap<String, NativeType>,
    value_element: Option<String>,
}

pub struct BeanType {
    class: ClassRef,
    id: String,
    resolver: Weak<BeanResolver>,
    include_children_not_in_prop_order: bool,
    allow_varargs_getters: bool,
    properties: TypeProperties,
    structure: OnceCell<Structure>,
    super_type: OnceCell<Option<Arc<BeanType>>>,
}

impl BeanType {
    pub fn new(class: ClassRef, resolver: Weak<BeanResolver>, config: &ResolverConfig) -> Self {
        let table = class.class();
        let id = match table.interfaces().first() {
            Some(interface) if table.is_synthetic() => interface.name(),
            _ => table.name().to_string(),
        };
        BeanType {
            properties: TypeProperties::load(&table),
            class,
            id,
            resolver,
            include_children_not_in_prop_order: config.include_children_not_in_prop_order,
            allow_varargs_getters: config.allow_varargs_getters,
            structure: OnceCell::new(),
            super_type: OnceCell::new(),
        }
    }

    pub fn id(&self) -> String {
        self.id.clone()
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.properties.namespace.as_deref()
    }

    pub fn properties(&self) -> &TypeProperties {
        &self.properties
    }

    pub fn resolver(&self) -> Option<Arc<BeanResolver>> {
        self.resolver.upgrade()
    }

    /// Own fields in their final order; inherited fields are reachable through the super type.
    pub fn elements(&self) -> Result<Vec<&Element>, BeanError> {
        Ok(self.structure()?.children.values().collect())
    }

    /// Inherited fields first, then own fields. A redeclared field keeps its inherited position.
    pub fn all_elements(&self) -> Result<Vec<&Element>, BeanError> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(next) = current.super_type() {
            current = next.as_ref();
            chain.push(current);
        }
        let mut all: IndexMap<&str, &Element> = IndexMap::new();
        for bean_type in chain.into_iter().rev() {
            for element in bean_type.structure()?.children.values() {
                all.insert(element.name(), element);
            }
        }
        Ok(all.into_iter().map(|(_, element)| element).collect())
    }

    pub fn element(&self, name: &str) -> Result<Option<&Element>, BeanError> {
        self.lookup(|s| s.children.get(name))
    }

    pub fn value_element(&self) -> Result<Option<&Element>, BeanError> {
        let structure = self.structure()?;
        Ok(structure
            .value_element
            .as_ref()
            .and_then(|name| structure.children.get(name)))
    }

    /// True when a value element exists and every other own field is an attribute.
    pub fn is_simple_type(&self) -> Result<bool, BeanError> {
        let structure = self.structure()?;
        Ok(match &structure.value_element {
            Some(value) => structure
                .children
                .values()
                .all(|e| e.name() == value || e.is_attribute()),
            None => false,
        })
    }

    pub fn getter(&self, name: &str) -> Result<Option<&Method>, BeanError> {
        self.lookup(|s| s.getters.get(name))
    }

    pub fn setter(&self, name: &str) -> Result<Option<&Method>, BeanError> {
        self.lookup(|s| s.setters.get(name))
    }

    /// Declared type of the field after primitive boxing, before any list unwrapping.
    pub fn actual_type(&self, name: &str) -> Result<Option<&NativeType>, BeanError> {
        self.lookup(|s| s.actual_types.get(name))
    }

    /// Component type of a list-like field.
    pub fn component_type(&self, name: &str) -> Result<Option<&NativeType>, BeanError> {
        self.lookup(|s| s.component_types.get(name))
    }

    pub fn annotations(&self, name: &str) -> Result<Option<&FieldAnnotations>, BeanError> {
        Ok(self.getter(name)?.map(|getter| getter.annotations()))
    }

    /// Concrete superclass, or the first interface when there is no meaningful superclass.
    pub fn super_type(&self) -> Option<&Arc<BeanType>> {
        self.super_type
            .get_or_init(|| {
                let resolver = self.resolver.upgrade()?;
                let class = self.class.class();
                let superclass = class.superclass();
                if class.is_interface() || superclass.is_none() {
                    if let Some(interface) = class.interfaces().first() {
                        return Some(resolver.resolve_class(interface));
                    }
                }
                superclass.map(|s| resolver.resolve_class(s))
            })
            .as_ref()
    }

    pub fn new_instance(self: &Arc<Self>) -> Result<BeanInstance, BeanError> {
        let class = self.class.class();
        let object: ObjectRef = if class.is_interface() {
            new_object(VirtualInstance::new(self.clone()))
        } else {
            match class.factory() {
                Some(factory) => factory(),
                None => {
                    return Err(BeanError::Instantiation {
                        type_id: self.id(),
                        message: "no native factory declared".to_string(),
                    })
                }
            }
        };
        debug!(type_id = %self.id, "created new instance");
        Ok(BeanInstance::new(DefinedType::Bean(self.clone()), object))
    }

    fn lookup<'a, T, F>(&'a self, find: F) -> Result<Option<&'a T>, BeanError>
    where
        F: Fn(&'a Structure) -> Option<&'a T>,
    {
        let mut current: &'a BeanType = self;
        loop {
            if let Some(found) = find(current.structure()?) {
                return Ok(Some(found));
            }
            match current.super_type() {
                Some(next) => current = next.as_ref(),
                None => return Ok(None),
            }
        }
    }

    fn structure(&self) -> Result<&Structure, BeanError> {
        self.structure.get_or_try_init(|| self.build())
    }

    fn build(&self) -> Result<Structure, BeanError> {
        let resolver = self.resolver.upgrade().ok_or_else(|| BeanError::Detached {
            type_id: self.id(),
        })?;
        let class = self.class.class();
        let constraints = resolver.constraints();
        let handler = resolver.collection_handler();
        let wrapper = resolver.simple_types();
        let converter = resolver.converter();
        let element_qualified = constraints.is_element_qualified(&class);
        let attribute_qualified = constraints.is_attribute_qualified(&class);

        let mut children = IndexMap::new();
        let mut mapped_names = HashMap::new();
        let mut getters = HashMap::new();
        let mut setters = HashMap::new();
        let mut actual_types = HashMap::new();
        let mut component_types = HashMap::new();
        let mut value_candidates = vec![];

        for method in class.methods() {
            if !method.is_public() {
                continue;
            }
            if is_reader(method.name()) {
                let varargs_getter = method.params().len() == 1 && method.is_varargs();
                if (!varargs_getter || !self.allow_varargs_getters) && !method.params().is_empty() {
                    continue;
                }
                if method.name() == "getClass" || constraints.is_transient(method) {
                    continue;
                }
                let return_type = match method.return_type() {
                    Some(return_type) => return_type,
                    None => continue,
                };
                let mut name = match field_name(method.name()) {
                    Some(name) => name,
                    None => continue,
                };
                debug!(field = %name, type_id = %self.id, "found getter");
                if let Some(indicated) = constraints.indicated_name(method) {
                    mapped_names.insert(name.clone(), indicated.clone());
                    name = indicated;
                }

                let native = return_type.is_primitive();
                let actual = return_type.boxed();
                actual_types.insert(name.clone(), actual.clone());

                let provider = handler.handler_for(&actual);
                let leaf = match &provider {
                    Some(provider) => {
                        let component = match provider.component_type(&actual) {
                            Some(component) => component,
                            None => self
                                .interface_component_type(&class, method, provider.as_ref())
                                .ok_or_else(|| {
                                    BeanError::construction(
                                        &self.id,
                                        format!(
                                            "can not get the component type for field '{}': {:?}",
                                            name, method
                                        ),
                                    )
                                })?,
                        };
                        component_types.insert(name.clone(), component.clone());
                        component
                    }
                    None => actual.clone(),
                };

                let mut properties = ElementProperties::default();
                let attribute;
                let field_type = match wrapper.wrap(&leaf) {
                    Some(simple) => {
                        attribute = constraints.is_attribute(method);
                        properties.qualified = if attribute {
                            attribute_qualified
                        } else {
                            element_qualified
                        };
                        match (constraints.min_length(method), constraints.max_length(method)) {
                            (Some(min), Some(max)) if min == max => properties.length = Some(min),
                            (min, max) => {
                                properties.min_length = min;
                                properties.max_length = max;
                            }
                        }
                        properties.generated = constraints.is_generated(method);
                        properties.primary = constraints.is_primary(method);
                        properties.pattern = constraints.pattern(method);
                        let bound_type = simple.instance_type();
                        properties.min_inclusive = self.normalise_bound(
                            constraints.min_inclusive(method),
                            &bound_type,
                            converter.as_ref(),
                            &name,
                        );
                        properties.max_inclusive = self.normalise_bound(
                            constraints.max_inclusive(method),
                            &bound_type,
                            converter.as_ref(),
                            &name,
                        );
                        FieldType::Simple(simple)
                    }
                    None => {
                        attribute = false;
                        let nested_class = leaf.class().ok_or_else(|| {
                            BeanError::construction(
                                &self.id,
                                format!("field '{}' has no usable type: {}", name, leaf),
                            )
                        })?;
                        let nested = resolver.resolve_class(nested_class);
                        let nested_table = nested_class.class();
                        properties.attribute_qualified_default =
                            Some(constraints.is_attribute_qualified(&nested_table));
                        properties.element_qualified_default =
                            Some(constraints.is_element_qualified(&nested_table));
                        properties.qualified = element_qualified;
                        FieldType::Complex(nested)
                    }
                };

                properties.collection_handler = provider.clone();
                properties.namespace = constraints.namespace(method);
                if constraints.is_value(method) {
                    value_candidates.push(name.clone());
                }
                properties.nillable = !native && constraints.is_nillable(method);
                properties.alias = constraints.alias(method);
                properties.min_occurs = constraints
                    .min_occurs(method)
                    .or(if properties.nillable { Some(0) } else { None });
                properties.max_occurs = constraints
                    .max_occurs(method)
                    .or(if provider.is_some() { Some(0) } else { None });
                properties.raw = constraints.is_raw(method);

                getters.insert(name.clone(), method.clone());
                children.insert(
                    name.clone(),
                    Element::new(&name, field_type, attribute, &self.id, properties),
                );
            } else if is_writer(method.name()) && method.params().len() == 1 {
                let suffix = method.name()[3..].trim();
                if suffix.is_empty() {
                    continue;
                }
                let reader = class
                    .declared_method(&format!("get{}", suffix))
                    .or_else(|| class.declared_method(&format!("is{}", suffix)));
                let name = reader
                    .and_then(|reader| constraints.indicated_name(reader))
                    .unwrap_or_else(|| lower_first(suffix));
                debug!(field = %name, type_id = %self.id, "found setter");
                setters.insert(name, method.clone());
            }
        }

        let value_element = match value_candidates.len() {
            0 => None,
            1 => value_candidates.pop(),
            _ => {
                warn!(type_id = %self.id, fields = ?value_candidates, "more than one value field, none is used");
                None
            }
        };

        let children = match constraints.prop_order(&class) {
            Some(order) => self.order_children(children, &order, &mapped_names)?,
            None => {
                let mut names: Vec<String> = children.keys().cloned().collect();
                names.sort();
                self.order_children(children, &names, &mapped_names)?
            }
        };

        Ok(Structure {
            children,
            getters,
            setters,
            actual_types,
            component_types,
            value_element,
        })
    }

    /// Synthesized classes lose generic information, their interfaces still carry it.
    fn interface_component_type(
        &self,
        class: &BeanClass,
        method: &Method,
        provider: &dyn CollectionHandlerProvider,
    ) -> Option<NativeType> {
        for interface in class.interfaces() {
            let declared = match interface.class().find_method(method.name(), method.params()) {
                Some(declared) => declared,
                None => continue,
            };
            return declared
                .return_type()
                .and_then(|t| provider.component_type(&t.boxed()));
        }
        None
    }

    fn normalise_bound(
        &self,
        lexical: Option<String>,
        target: &NativeType,
        converter: &dyn Converter,
        field: &str,
    ) -> Option<String> {
        let lexical = lexical?;
        match converter.convert(&Value::String(lexical.clone()), target) {
            Some(value) if !value.is_null() => Some(value.to_string()),
            _ => {
                warn!(type_id = %self.id, field, bound = %lexical, target = %target, "inclusive bound does not fit the field type");
                None
            }
        }
    }

    fn order_children(
        &self,
        mut children: IndexMap<String, Element>,
        order: &[String],
        mapped_names: &HashMap<String, String>,
    ) -> Result<IndexMap<String, Element>, BeanError> {
        let mut available: Vec<String> = children.keys().cloned().collect();
        let mut ordered = IndexMap::new();
        let mut seen = HashSet::new();
        for child in order {
            let mut name = child.clone();
            if let Some(mapped) = mapped_names.get(child) {
                if available.contains(mapped) {
                    name = mapped.clone();
                }
            }
            available.retain(|n| n != &name);
            if !seen.insert(name.clone()) {
                continue;
            }
            let element = children.shift_remove(&name).ok_or_else(|| {
                BeanError::construction(
                    &self.id,
                    format!(
                        "the declared order contains a field that does not exist: {}",
                        name
                    ),
                )
            })?;
            ordered.insert(name, element);
        }
        if self.include_children_not_in_prop_order {
            for name in available {
                if let Some(element) = children.shift_remove(&name) {
                    ordered.insert(name, element);
                }
            }
        }
        Ok(ordered)
    }
}

impl PartialEq for BeanType {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
    }
}

impl Eq for BeanType {}

impl Hash for BeanType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state)
    }
}

impl Display for BeanType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "BeanType: {}", self.class.name())
    }
}

impl Debug for BeanType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}
