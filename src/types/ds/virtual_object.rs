use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use uuid::Uuid;

use crate::types::descriptor::bean_type::BeanType;
use crate::types::ds::class::{field_name, is_reader, is_writer, ClassRef, Method};
use crate::types::ds::error::BeanError;
use crate::types::ds::object::{Bean, SneakyEditable};
use crate::types::ds::value::Value;

/// In-memory field store standing in for an interface that has no native implementation.
///
/// Reader and writer calls are intercepted by name and mapped onto the store using the same
/// derivation the descriptor builder applies. Equality and formatting only ever look at the
/// identity, never at the stored values, so self-referencing graphs stay finite.
pub struct VirtualInstance {
    id: Uuid,
    values: HashMap<String, Value>,
    original_type: Arc<BeanType>,
}

impl VirtualInstance {
    pub fn new(original_type: Arc<BeanType>) -> Self {
        VirtualInstance {
            id: Uuid::new_v4(),
            values: HashMap::new(),
            original_type,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Descriptor this instance was synthesized for.
    pub fn original_type(&self) -> &Arc<BeanType> {
        &self.original_type
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn invoke(&mut self, method: &Method, args: Vec<Value>) -> Result<Value, BeanError> {
        let name = method.name();
        let no_value = args.is_empty() || (args.len() == 1 && method.is_varargs());
        if is_reader(name) && no_value {
            return Ok(field_name(name)
                .and_then(|field| self.values.get(&field).cloned())
                .unwrap_or(Value::Null));
        }
        if is_writer(name) && args.len() == 1 {
            if let Some(field) = field_name(name) {
                let value = args.into_iter().next().unwrap_or(Value::Null);
                self.values.insert(field, value);
                return Ok(Value::Null);
            }
        }
        Err(BeanError::invocation(
            name,
            format!("no behaviour available on {}", self),
        ))
    }
}

impl SneakyEditable for VirtualInstance {
    fn sneaky_set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

impl Bean for VirtualInstance {
    fn bean_class(&self) -> ClassRef {
        self.original_type.class().clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_virtual(&self) -> Option<&VirtualInstance> {
        Some(self)
    }

    fn as_virtual_mut(&mut self) -> Option<&mut VirtualInstance> {
        Some(self)
    }

    fn as_sneaky_editable(&mut self) -> Option<&mut dyn SneakyEditable> {
        Some(self)
    }
}

impl PartialEq for VirtualInstance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Display for VirtualInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.original_type.id(), self.id.to_hyphenated())
    }
}

impl Debug for VirtualInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "VirtualInstance({})", self)
    }
}
