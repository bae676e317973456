//! Typed conversion chain: converts a value between field types.

use std::sync::Arc;

use crate::types::ds::element::FieldType;
use crate::types::ds::operations::type_conversion::{Converter, DefaultConverter};
use crate::types::ds::value::Value;
use crate::types::instance::bean_instance::BeanInstance;

pub trait TypeConverter: Send + Sync {
    /// `None` when this converter does not handle the pair or the value does not fit.
    fn convert(&self, value: &Value, from: &FieldType, to: &FieldType) -> Option<Value>;

    fn can_convert(&self, from: &FieldType, to: &FieldType) -> bool;
}

/// Leaf to leaf conversion through a general purpose [`Converter`].
pub struct SimpleTypeConverter {
    converter: Arc<dyn Converter>,
}

impl SimpleTypeConverter {
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        SimpleTypeConverter { converter }
    }
}

impl Default for SimpleTypeConverter {
    fn default() -> Self {
        SimpleTypeConverter::new(Arc::new(DefaultConverter))
    }
}

impl TypeConverter for SimpleTypeConverter {
    fn convert(&self, value: &Value, _from: &FieldType, to: &FieldType) -> Option<Value> {
        match to {
            FieldType::Simple(simple) => self.converter.convert(value, &simple.instance_type()),
            FieldType::Complex(_) => None,
        }
    }

    fn can_convert(&self, from: &FieldType, to: &FieldType) -> bool {
        match (from, to) {
            (FieldType::Simple(from), FieldType::Simple(to)) => self
                .converter
                .can_convert(&from.instance_type(), &to.instance_type()),
            _ => false,
        }
    }
}

/// Re-wraps a native object (or an already wrapped one) into a bean typed target, provided the
/// target class is assignable from the object's class.
///
/// Path writes only consult the chain for leaf sources, so this converter serves callers that
/// run a `TypeConverterChain` over complex field types themselves.
#[derive(Debug, Default)]
pub struct BeanConverter;

impl TypeConverter for BeanConverter {
    fn convert(&self, value: &Value, _from: &FieldType, to: &FieldType) -> Option<Value> {
        let target = match to {
            FieldType::Complex(target) => target,
            FieldType::Simple(_) => return None,
        };
        let original = value.as_object()?;
        let class = original.try_borrow().ok()?.bean_class();
        if class.class().is_assignable_to(target.class()) {
            Some(Value::Content(BeanInstance::new(
                target.clone(),
                original.clone(),
            )))
        } else {
            None
        }
    }

    fn can_convert(&self, from: &FieldType, to: &FieldType) -> bool {
        match (from, to) {
            (FieldType::Complex(from), FieldType::Complex(to)) => {
                from.class().class().is_assignable_to(to.class())
            }
            _ => false,
        }
    }
}

/// Converters tried in order, first result wins.
pub struct TypeConverterChain {
    converters: Vec<Arc<dyn TypeConverter>>,
}

impl TypeConverterChain {
    pub fn new(converters: Vec<Arc<dyn TypeConverter>>) -> Self {
        TypeConverterChain { converters }
    }

    pub fn with_converter(converter: Arc<dyn Converter>) -> Self {
        TypeConverterChain::new(vec![
            Arc::new(BeanConverter),
            Arc::new(SimpleTypeConverter::new(converter)),
        ])
    }
}

impl Default for TypeConverterChain {
    fn default() -> Self {
        TypeConverterChain::with_converter(Arc::new(DefaultConverter))
    }
}

impl TypeConverter for TypeConverterChain {
    fn convert(&self, value: &Value, from: &FieldType, to: &FieldType) -> Option<Value> {
        self.converters
            .iter()
            .find_map(|converter| converter.convert(value, from, to))
    }

    fn can_convert(&self, from: &FieldType, to: &FieldType) -> bool {
        self.converters.iter().any(|c| c.can_convert(from, to))
    }
}
