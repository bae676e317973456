use std::fmt;
use std::fmt::{Display, Formatter};

use crate::types::ds::class::{NativeType, PrimitiveKind};

/// Leaf types a field can collapse to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Character,
    String,
    Object,
}

impl SimpleType {
    pub fn name(&self) -> &'static str {
        match self {
            SimpleType::Boolean => "boolean",
            SimpleType::Byte => "byte",
            SimpleType::Short => "short",
            SimpleType::Integer => "int",
            SimpleType::Long => "long",
            SimpleType::Float => "float",
            SimpleType::Double => "double",
            SimpleType::Character => "char",
            SimpleType::String => "string",
            SimpleType::Object => "object",
        }
    }

    /// Native type values of this leaf type are converted to.
    pub fn instance_type(&self) -> NativeType {
        match self {
            SimpleType::Boolean => NativeType::Boxed(PrimitiveKind::Boolean),
            SimpleType::Byte => NativeType::Boxed(PrimitiveKind::Byte),
            SimpleType::Short => NativeType::Boxed(PrimitiveKind::Short),
            SimpleType::Integer => NativeType::Boxed(PrimitiveKind::Integer),
            SimpleType::Long => NativeType::Boxed(PrimitiveKind::Long),
            SimpleType::Float => NativeType::Boxed(PrimitiveKind::Float),
            SimpleType::Double => NativeType::Boxed(PrimitiveKind::Double),
            SimpleType::Character => NativeType::Boxed(PrimitiveKind::Character),
            SimpleType::String => NativeType::String,
            SimpleType::Object => NativeType::Object,
        }
    }
}

impl Display for SimpleType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Maps a native type onto a leaf type, `None` when the type is structured.
pub trait SimpleTypeWrapper: Send + Sync {
    fn wrap(&self, native: &NativeType) -> Option<SimpleType>;
}

#[derive(Debug, Default)]
pub struct DefaultSimpleTypeWrapper;

impl SimpleTypeWrapper for DefaultSimpleTypeWrapper {
    fn wrap(&self, native: &NativeType) -> Option<SimpleType> {
        let kind = match native {
            NativeType::String => return Some(SimpleType::String),
            NativeType::Object => return Some(SimpleType::Object),
            NativeType::Primitive(kind) | NativeType::Boxed(kind) => kind,
            _ => return None,
        };
        Some(match kind {
            PrimitiveKind::Boolean => SimpleType::Boolean,
            PrimitiveKind::Byte => SimpleType::Byte,
            PrimitiveKind::Short => SimpleType::Short,
            PrimitiveKind::Integer => SimpleType::Integer,
            PrimitiveKind::Long => SimpleType::Long,
            PrimitiveKind::Float => SimpleType::Float,
            PrimitiveKind::Double => SimpleType::Double,
            PrimitiveKind::Character => SimpleType::Character,
        })
    }
}
