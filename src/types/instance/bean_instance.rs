//! Path based access to wrapped native objects.
//!
//! A [`BeanInstance`] pairs a descriptor with a native object and answers `get(path)` and
//! `set(path, value)` by walking the descriptor's field graph and calling the native accessors.
//! Nested objects are wrapped on the fly, never cached.
//!
//! Paths follow `["@"]field["[" index "]"]` segments joined by `.`:
//!
//! ```text
//! name
//! @currency
//! addresses[2].street
//! labels[en]
//! ```

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::parser::ParsedPath;
use crate::types::descriptor::defined_type::DefinedType;
use crate::types::ds::class::{field_name, ClassRef, Method, NativeType};
use crate::types::ds::element::{Element, FieldType};
use crate::types::ds::error::BeanError;
use crate::types::ds::object::{borrow_bean, borrow_bean_mut, ObjectRef};
use crate::types::ds::operations::collection::{CollectionHandler, CollectionHandlerChain};
use crate::types::ds::operations::type_conversion::{Converter, DefaultConverter};
use crate::types::ds::simple_type::{DefaultSimpleTypeWrapper, SimpleTypeWrapper};
use crate::types::ds::value::Value;
use crate::types::instance::conversion::{TypeConverter, TypeConverterChain};
use crate::types::instance::wrapper::BeanContentWrapper;
use crate::types::plugin::config::UnknownFieldPolicy;

lazy_static! {
    // Collaborators for instances whose registry has been dropped.
    static ref DETACHED_COLLECTION_HANDLER: Arc<dyn CollectionHandler> =
        Arc::new(CollectionHandlerChain::default());
    static ref DETACHED_CONVERTER: Arc<dyn Converter> = Arc::new(DefaultConverter);
    static ref DETACHED_TYPE_CONVERTER: Arc<dyn TypeConverter> =
        Arc::new(TypeConverterChain::default());
    static ref DETACHED_SIMPLE_TYPES: Arc<dyn SimpleTypeWrapper> =
        Arc::new(DefaultSimpleTypeWrapper);
}

#[derive(Clone)]
pub struct BeanInstance {
    definition: DefinedType,
    instance: ObjectRef,
    collection_handler: Option<Arc<dyn CollectionHandler>>,
    converter: Option<Arc<dyn Converter>>,
    type_converter: Option<Arc<dyn TypeConverter>>,
    unknown_fields: Option<UnknownFieldPolicy>,
}

impl BeanInstance {
    pub fn new(definition: impl Into<DefinedType>, instance: ObjectRef) -> Self {
        BeanInstance {
            definition: definition.into(),
            instance,
            collection_handler: None,
            converter: None,
            type_converter: None,
            unknown_fields: None,
        }
    }

    pub fn with_collection_handler(mut self, handler: Arc<dyn CollectionHandler>) -> Self {
        self.collection_handler = Some(handler);
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_type_converter(mut self, converter: Arc<dyn TypeConverter>) -> Self {
        self.type_converter = Some(converter);
        self
    }

    /// Overrides the registry wide policy for this instance and every instance it wraps while
    /// walking a path.
    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = Some(policy);
        self
    }

    pub fn definition(&self) -> &DefinedType {
        &self.definition
    }

    pub fn unwrapped(&self) -> &ObjectRef {
        &self.instance
    }

    /// Class of the wrapped object, falling back to the descriptor's while it is borrowed.
    pub fn instance_class(&self) -> ClassRef {
        match self.instance.try_borrow() {
            Ok(bean) => bean.bean_class(),
            Err(_) => self.definition.bean_type().class().clone(),
        }
    }

    /// The wrapped object, if it can stand in for `target`.
    pub fn as_bean(&self, target: &ClassRef) -> Option<ObjectRef> {
        if self.instance_class().class().is_assignable_to(target) {
            Some(self.instance.clone())
        } else {
            None
        }
    }

    pub fn get(&self, path: &str) -> Result<Value, BeanError> {
        self.get_parsed(&ParsedPath::parse(path)?)
    }

    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<(), BeanError> {
        self.set_parsed(&ParsedPath::parse(path)?, value.into())
    }

    pub fn get_parsed(&self, path: &ParsedPath) -> Result<Value, BeanError> {
        trace!(path = %path, type_id = %self.definition.id(), "get");
        let field = path.name();
        let element = match self.definition.element(field)? {
            Some(element) => element.clone(),
            None => return self.unknown_field(field).map(|_| Value::Null),
        };
        self.check_shape(path, &element)?;

        let getter = self.getter(field)?;
        let mut object = self.read(&getter)?;
        if let Some(index) = path.index() {
            if object.is_null() {
                return Ok(Value::Null);
            }
            let provider = self
                .collection_handler()
                .handler_for_value(&object)
                .ok_or_else(|| BeanError::NoCollectionHandler {
                    field: field.to_string(),
                })?;
            let key = provider.unmarshal_index(index, Some(&object))?;
            object = provider.get(&object, &key)?;
        }

        match path.child() {
            None => Ok(object),
            Some(_) if object.is_null() => Ok(Value::Null),
            Some(child) => match object {
                Value::Content(content) => content.get_parsed(child),
                Value::Object(nested) => {
                    let definition = element.complex_type().ok_or_else(|| {
                        BeanError::InvalidRecursion {
                            field: field.to_string(),
                        }
                    })?;
                    self.nested(DefinedType::Bean(definition.clone()), nested)
                        .get_parsed(child)
                }
                _ => Err(BeanError::InvalidRecursion {
                    field: field.to_string(),
                }),
            },
        }
    }

    pub fn set_parsed(&self, path: &ParsedPath, value: Value) -> Result<(), BeanError> {
        trace!(path = %path, type_id = %self.definition.id(), "set");
        let field = path.name();
        let element = match self.definition.element(field)? {
            Some(element) => element.clone(),
            None => return self.unknown_field(field),
        };
        self.check_shape(path, &element)?;
        let create_parent = self.create_parent_for_null_value() || !value.is_null();

        if let Some(index) = path.index() {
            let actual = self.actual_type(field)?;
            let provider = self
                .collection_handler()
                .handler_for(&actual)
                .ok_or_else(|| BeanError::NoCollectionHandler {
                    field: field.to_string(),
                })?;
            let getter = self.getter(field)?;
            let mut container = self.read(&getter)?;
            let key = {
                let current = if container.is_null() {
                    None
                } else {
                    Some(&container)
                };
                provider.unmarshal_index(index, current)?
            };
            if container.is_null() && create_parent {
                container = provider.create(&actual, key.size_hint()?)?;
                self.write(field, container.clone())?;
            }
            if container.is_null() {
                return Ok(());
            }
            match path.child() {
                None => {
                    let component = self
                        .definition
                        .component_type(field)?
                        .cloned()
                        .unwrap_or(NativeType::Object);
                    let converted = self.convert(value, &component, &element)?;
                    let updated = provider.set(container, &key, converted)?;
                    self.write(field, updated)
                }
                Some(child) => {
                    let mut single = provider.get(&container, &key)?;
                    if single.is_null() && create_parent {
                        single = self.create_nested(&element)?;
                        let updated = provider.set(container, &key, single.clone())?;
                        self.write(field, updated)?;
                    }
                    if single.is_null() {
                        return Ok(());
                    }
                    self.descend(&element, single)?.set_parsed(child, value)
                }
            }
        } else if let Some(child) = path.child() {
            let getter = self.getter(field)?;
            let mut single = self.read(&getter)?;
            if single.is_null() && create_parent {
                single = self.create_nested(&element)?;
                self.write(field, single.clone())?;
            }
            if single.is_null() {
                return Ok(());
            }
            self.descend(&element, single)?.set_parsed(child, value)
        } else {
            let actual = self.actual_type(field)?;
            let converted = self.convert(value, &actual, &element)?;
            self.write(field, converted)
        }
    }

    /// Converts `value` so it can be written into a field of native type `target`.
    pub fn convert(
        &self,
        value: Value,
        target: &NativeType,
        element: &Element,
    ) -> Result<Value, BeanError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if let NativeType::Object = target {
            return Ok(value);
        }
        let source = value.native_type();
        let mut converted = match &value {
            Value::Content(content) => match target {
                NativeType::Bean(class) => content.as_bean(class).map(Value::Object),
                _ => None,
            },
            v if target.accepts(v) => Some(v.clone()),
            v => match self.simple_types().wrap(&source) {
                Some(simple) => self
                    .type_converter()
                    .convert(v, &FieldType::Simple(simple), element.field_type())
                    .filter(|c| c.is_null() || target.accepts(c)),
                None => self.converter().convert(v, target),
            },
        };

        if converted.is_none() && !element.is_list() {
            if let Some(provider) = self.collection_handler().handler_for_value(&value) {
                let mut items = provider.as_collection(&value);
                return match items.len() {
                    0 => Ok(Value::Null),
                    1 => self.convert(items.remove(0), target, element),
                    size => Err(BeanError::AmbiguousCollectionCollapse {
                        field: element.name().to_string(),
                        size,
                        to: target.to_string(),
                    }),
                };
            }
        }

        if let NativeType::Array(component) = target {
            if let Value::List(items) | Value::Array { items, .. } = &value {
                let items = items
                    .iter()
                    .map(|item| self.convert(item.clone(), component, element))
                    .collect::<Result<Vec<_>, _>>()?;
                converted = Some(Value::Array {
                    component: (**component).clone(),
                    items,
                });
            }
        }

        converted.ok_or_else(|| BeanError::conversion(source, target))
    }

    fn unknown_field(&self, field: &str) -> Result<(), BeanError> {
        match self.unknown_fields() {
            UnknownFieldPolicy::Lenient => {
                debug!(field, type_id = %self.definition.id(), "ignoring unknown field");
                Ok(())
            }
            UnknownFieldPolicy::Strict => Err(BeanError::UnknownField {
                field: field.to_string(),
                type_id: self.definition.id(),
            }),
        }
    }

    fn check_shape(&self, path: &ParsedPath, element: &Element) -> Result<(), BeanError> {
        if path.index().is_some() && !element.is_list() {
            return Err(BeanError::InvalidIndexUsage {
                field: path.name().to_string(),
            });
        }
        if path.child().is_some() && element.complex_type().is_none() {
            return Err(BeanError::InvalidRecursion {
                field: path.name().to_string(),
            });
        }
        Ok(())
    }

    fn no_accessor(&self, field: &str) -> BeanError {
        BeanError::NoAccessor {
            field: field.to_string(),
            type_id: self.definition.id(),
        }
    }

    fn getter(&self, field: &str) -> Result<Method, BeanError> {
        self.definition
            .getter(field)?
            .cloned()
            .ok_or_else(|| self.no_accessor(field))
    }

    fn actual_type(&self, field: &str) -> Result<NativeType, BeanError> {
        self.definition
            .actual_type(field)?
            .cloned()
            .ok_or_else(|| self.no_accessor(field))
    }

    fn read(&self, getter: &Method) -> Result<Value, BeanError> {
        let args = match getter.params() {
            [NativeType::Array(component)] => vec![Value::empty_array((**component).clone())],
            _ => vec![],
        };
        getter.invoke(&self.instance, args)
    }

    /// Writes through the setter, or into the field store of objects that have none.
    fn write(&self, field: &str, value: Value) -> Result<(), BeanError> {
        if let Some(setter) = self.definition.setter(field)? {
            setter.invoke(&self.instance, vec![value])?;
            return Ok(());
        }
        let name = match self.definition.getter(field)? {
            Some(getter) => field_name(getter.name()).unwrap_or_else(|| field.to_string()),
            None => return Err(self.no_accessor(field)),
        };
        let mut bean = borrow_bean_mut(&self.instance)?;
        let written = match bean.as_sneaky_editable() {
            Some(editable) => {
                trace!(field, stored_as = %name, "sneaky set");
                editable.sneaky_set(&name, value);
                true
            }
            None => false,
        };
        if written {
            Ok(())
        } else {
            Err(self.no_accessor(field))
        }
    }

    fn create_nested(&self, element: &Element) -> Result<Value, BeanError> {
        let definition = element
            .complex_type()
            .ok_or_else(|| BeanError::InvalidRecursion {
                field: element.name().to_string(),
            })?;
        let created = definition.new_instance()?;
        Ok(Value::Object(created.unwrapped().clone()))
    }

    /// Wraps a nested value for recursion, reusing it when it already is wrapped.
    fn descend(&self, element: &Element, value: Value) -> Result<BeanInstance, BeanError> {
        match value {
            Value::Content(content) => Ok(self.nested(content.definition, content.instance)),
            Value::Object(object) => {
                let wrapped = match self.definition.resolver() {
                    Some(resolver) => BeanContentWrapper::new(&resolver).wrap(object)?,
                    None => {
                        let definition = element.complex_type().ok_or_else(|| {
                            BeanError::InvalidRecursion {
                                field: element.name().to_string(),
                            }
                        })?;
                        BeanInstance::new(definition.clone(), object)
                    }
                };
                Ok(self.nested(wrapped.definition, wrapped.instance))
            }
            _ => Err(BeanError::InvalidRecursion {
                field: element.name().to_string(),
            }),
        }
    }

    fn nested(&self, definition: DefinedType, instance: ObjectRef) -> BeanInstance {
        BeanInstance {
            definition,
            instance,
            collection_handler: self.collection_handler.clone(),
            converter: self.converter.clone(),
            type_converter: self.type_converter.clone(),
            unknown_fields: self.unknown_fields,
        }
    }

    fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.unknown_fields
            .or_else(|| self.definition.resolver().map(|r| r.config().unknown_fields))
            .unwrap_or_default()
    }

    fn create_parent_for_null_value(&self) -> bool {
        self.definition
            .resolver()
            .map_or(false, |r| r.config().create_parent_for_null_value)
    }

    fn collection_handler(&self) -> Arc<dyn CollectionHandler> {
        if let Some(handler) = &self.collection_handler {
            return handler.clone();
        }
        match self.definition.resolver() {
            Some(resolver) => resolver.collection_handler().clone(),
            None => DETACHED_COLLECTION_HANDLER.clone(),
        }
    }

    fn converter(&self) -> Arc<dyn Converter> {
        if let Some(converter) = &self.converter {
            return converter.clone();
        }
        match self.definition.resolver() {
            Some(resolver) => resolver.converter().clone(),
            None => DETACHED_CONVERTER.clone(),
        }
    }

    fn type_converter(&self) -> Arc<dyn TypeConverter> {
        if let Some(converter) = &self.type_converter {
            return converter.clone();
        }
        match self.definition.resolver() {
            Some(resolver) => resolver.type_converter().clone(),
            None => DETACHED_TYPE_CONVERTER.clone(),
        }
    }

    fn simple_types(&self) -> Arc<dyn SimpleTypeWrapper> {
        match self.definition.resolver() {
            Some(resolver) => resolver.simple_types().clone(),
            None => DETACHED_SIMPLE_TYPES.clone(),
        }
    }
}

impl Debug for BeanInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rendered = match borrow_bean(&self.instance) {
            Ok(bean) => bean.as_virtual().map(|v| v.to_string()),
            Err(_) => None,
        };
        match rendered {
            Some(virtual_instance) => write!(f, "BeanInstance({})", virtual_instance),
            None => write!(
                f,
                "BeanInstance({}@{:p})",
                self.definition.id(),
                Rc::as_ptr(&self.instance)
            ),
        }
    }
}
