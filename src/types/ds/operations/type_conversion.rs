use std::convert::TryFrom;

use crate::types::ds::class::{NativeType, PrimitiveKind};
use crate::types::ds::value::Value;

/// General purpose value converter, used when no leaf type is known for the source value.
pub trait Converter: Send + Sync {
    /// `None` when the value can not be represented as `target`.
    fn convert(&self, value: &Value, target: &NativeType) -> Option<Value>;

    fn can_convert(&self, from: &NativeType, to: &NativeType) -> bool;
}

/// Scalar conversions between numbers, booleans, characters and their lexical forms.
#[derive(Debug, Default)]
pub struct DefaultConverter;

impl Converter for DefaultConverter {
    fn convert(&self, value: &Value, target: &NativeType) -> Option<Value> {
        if value.is_null() {
            return Some(Value::Null);
        }
        if target.accepts(value) {
            return Some(value.clone());
        }
        match target {
            NativeType::String => to_string(value),
            NativeType::Primitive(kind) | NativeType::Boxed(kind) => to_primitive(value, *kind),
            NativeType::List(_) => match value {
                Value::Array { items, .. } => Some(Value::List(items.clone())),
                _ => None,
            },
            _ => None,
        }
    }

    fn can_convert(&self, from: &NativeType, to: &NativeType) -> bool {
        if from == to || *to == NativeType::Object {
            return true;
        }
        let scalar = |t: &NativeType| t.primitive_kind().is_some() || *t == NativeType::String;
        if scalar(from) && scalar(to) {
            return true;
        }
        matches!((from, to), (NativeType::Array(_), NativeType::List(_)))
    }
}

pub fn to_string(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value.clone()),
        v if v.primitive_kind().is_some() => Some(Value::String(v.to_string())),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Byte(v) => Some(*v as i64),
        Value::Short(v) => Some(*v as i64),
        Value::Integer(v) => Some(*v as i64),
        Value::Long(v) => Some(*v),
        Value::Float(v) => whole(*v as f64),
        Value::Double(v) => whole(*v),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

fn whole(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Byte(v) => Some(*v as f64),
        Value::Short(v) => Some(*v as f64),
        Value::Integer(v) => Some(*v as f64),
        Value::Long(v) => Some(*v as f64),
        Value::Float(v) => Some(*v as f64),
        Value::Double(v) => Some(*v),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn to_primitive(value: &Value, kind: PrimitiveKind) -> Option<Value> {
    match kind {
        PrimitiveKind::Boolean => match value {
            Value::Boolean(_) => Some(value.clone()),
            Value::String(s) => match s.trim() {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            _ => None,
        },
        PrimitiveKind::Character => match value {
            Value::Character(_) => Some(value.clone()),
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Character(c)),
                    _ => None,
                }
            }
            _ => None,
        },
        PrimitiveKind::Byte => as_i64(value)
            .and_then(|v| i8::try_from(v).ok())
            .map(Value::Byte),
        PrimitiveKind::Short => as_i64(value)
            .and_then(|v| i16::try_from(v).ok())
            .map(Value::Short),
        PrimitiveKind::Integer => as_i64(value)
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Integer),
        PrimitiveKind::Long => as_i64(value).map(Value::Long),
        PrimitiveKind::Float => as_f64(value).map(|v| Value::Float(v as f32)),
        PrimitiveKind::Double => as_f64(value).map(Value::Double),
    }
}
