use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::types::ds::class::{NativeType, PrimitiveKind};
use crate::types::ds::error::BeanError;
use crate::types::ds::object::ObjectRef;
use crate::types::instance::bean_instance::BeanInstance;

/// Runtime value flowing through accessors and the path engine.
#[derive(Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Character(char),
    String(String),
    List(Vec<Value>),
    Array {
        component: NativeType,
        items: Vec<Value>,
    },
    Map(IndexMap<String, Value>),
    Object(ObjectRef),
    Content(BeanInstance),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn empty_array(component: NativeType) -> Self {
        Value::Array {
            component,
            items: vec![],
        }
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Boolean(_) => Some(PrimitiveKind::Boolean),
            Value::Byte(_) => Some(PrimitiveKind::Byte),
            Value::Short(_) => Some(PrimitiveKind::Short),
            Value::Integer(_) => Some(PrimitiveKind::Integer),
            Value::Long(_) => Some(PrimitiveKind::Long),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            Value::Character(_) => Some(PrimitiveKind::Character),
            _ => None,
        }
    }

    /// Runtime type of the value, `Object` for null.
    pub fn native_type(&self) -> NativeType {
        if let Some(kind) = self.primitive_kind() {
            return NativeType::Boxed(kind);
        }
        match self {
            Value::String(_) => NativeType::String,
            Value::List(_) => NativeType::List(None),
            Value::Array { component, .. } => NativeType::array_of(component.clone()),
            Value::Map(_) => NativeType::Map(None),
            Value::Object(object) => match object.try_borrow() {
                Ok(bean) => NativeType::Bean(bean.bean_class()),
                Err(_) => NativeType::Object,
            },
            Value::Content(content) => NativeType::Bean(content.instance_class()),
            _ => NativeType::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            Value::Content(content) => Some(content.unwrapped()),
            _ => None,
        }
    }

    /// Extracts a native Rust value, typically inside a setter body.
    pub fn into_native<T: FromValue>(self) -> Result<T, BeanError> {
        let from = self.native_type();
        T::from_value(self).ok_or_else(|| BeanError::conversion(from, std::any::type_name::<T>()))
    }
}

pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! from_value_scalar {
    ($ty:ty, $variant:ident) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

from_value_scalar!(bool, Boolean);
from_value_scalar!(i8, Byte);
from_value_scalar!(i16, Short);
from_value_scalar!(i32, Integer);
from_value_scalar!(i64, Long);
from_value_scalar!(f32, Float);
from_value_scalar!(f64, Double);
from_value_scalar!(char, Character);
from_value_scalar!(String, String);

impl FromValue for ObjectRef {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(object) => Some(object),
            Value::Content(content) => Some(content.unwrapped().clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<Value> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) | Value::Array { items, .. } => Some(items),
            _ => None,
        }
    }
}

impl FromValue for IndexMap<String, Value> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

impl From<BeanInstance> for Value {
    fn from(v: BeanInstance) -> Self {
        Value::Content(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (
                Value::Array {
                    component: c1,
                    items: a,
                },
                Value::Array {
                    component: c2,
                    items: b,
                },
            ) => c1 == c2 && a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Content(a), Value::Content(b)) => Rc::ptr_eq(a.unwrapped(), b.unwrapped()),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Character(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::List(items) | Value::Array { items, .. } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Object(object) => match object.try_borrow() {
                Ok(bean) => match bean.as_virtual() {
                    Some(virtual_instance) => write!(f, "{}", virtual_instance),
                    None => write!(f, "{}@{:p}", bean.bean_class().name(), Rc::as_ptr(object)),
                },
                Err(_) => write!(f, "<borrowed>@{:p}", Rc::as_ptr(object)),
            },
            Value::Content(content) => write!(f, "{:?}", content),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => write!(f, "{:?}", v),
            Value::Character(v) => write!(f, "{:?}", v),
            other => write!(f, "{}", other),
        }
    }
}
