//! Indexed access strategies for list-like native representations.
//!
//! Containers are owned values: every mutation hands back the (possibly new) container and the
//! caller is responsible for writing it back through the field's writer.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::types::ds::class::NativeType;
use crate::types::ds::error::BeanError;
use crate::types::ds::value::Value;

/// Handler specific key produced from an opaque index token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Position(usize),
    Key(String),
}

impl IndexKey {
    /// Minimum container size able to hold this key.
    pub fn size_hint(&self) -> Result<usize, BeanError> {
        match self {
            IndexKey::Position(position) => grown_len(0, *position),
            IndexKey::Key(_) => Ok(1),
        }
    }
}

/// Most `Null` padding slots a single positional write may add.
pub const MAX_INDEX_GROWTH: usize = 1 << 16;

/// Length a container of `current` items needs to hold `position`.
fn grown_len(current: usize, position: usize) -> Result<usize, BeanError> {
    let needed = position.checked_add(1).ok_or_else(|| out_of_range(position))?;
    if needed > current && needed - current > MAX_INDEX_GROWTH {
        return Err(out_of_range(position));
    }
    Ok(needed)
}

fn out_of_range(position: usize) -> BeanError {
    BeanError::InvalidIndex {
        index: position.to_string(),
        message: format!(
            "growing the container to this position exceeds {} slots",
            MAX_INDEX_GROWTH
        ),
    }
}

pub trait CollectionHandlerProvider: Send + Sync {
    fn name(&self) -> &str;

    fn handles_type(&self, native: &NativeType) -> bool;

    fn handles_value(&self, value: &Value) -> bool;

    fn unmarshal_index(&self, token: &str, container: Option<&Value>) -> Result<IndexKey, BeanError>;

    /// `Null` when the key is not present.
    fn get(&self, container: &Value, key: &IndexKey) -> Result<Value, BeanError>;

    fn set(&self, container: Value, key: &IndexKey, value: Value) -> Result<Value, BeanError>;

    fn create(&self, native: &NativeType, size_hint: usize) -> Result<Value, BeanError>;

    /// `None` when the declared type carries no (or erased) component information.
    fn component_type(&self, declared: &NativeType) -> Option<NativeType>;

    fn as_collection(&self, container: &Value) -> Vec<Value>;
}

/// Finds the provider for a declared type or a runtime value.
pub trait CollectionHandler: Send + Sync {
    fn handler_for(&self, native: &NativeType) -> Option<Arc<dyn CollectionHandlerProvider>>;

    fn handler_for_value(&self, value: &Value) -> Option<Arc<dyn CollectionHandlerProvider>>;
}

/// Providers queried in order, first claim wins.
pub struct CollectionHandlerChain {
    providers: Vec<Arc<dyn CollectionHandlerProvider>>,
}

impl CollectionHandlerChain {
    pub fn new() -> Self {
        CollectionHandlerChain { providers: vec![] }
    }

    /// Registered providers take precedence over the ones already present.
    pub fn register(mut self, provider: Arc<dyn CollectionHandlerProvider>) -> Self {
        self.providers.insert(0, provider);
        self
    }

    pub fn providers(&self) -> &[Arc<dyn CollectionHandlerProvider>] {
        &self.providers
    }
}

impl Default for CollectionHandlerChain {
    fn default() -> Self {
        CollectionHandlerChain {
            providers: vec![
                Arc::new(ListHandler),
                Arc::new(ArrayHandler),
                Arc::new(MapHandler),
            ],
        }
    }
}

impl CollectionHandler for CollectionHandlerChain {
    fn handler_for(&self, native: &NativeType) -> Option<Arc<dyn CollectionHandlerProvider>> {
        self.providers
            .iter()
            .find(|p| p.handles_type(native))
            .cloned()
    }

    fn handler_for_value(&self, value: &Value) -> Option<Arc<dyn CollectionHandlerProvider>> {
        self.providers
            .iter()
            .find(|p| p.handles_value(value))
            .cloned()
    }
}

fn parse_position(token: &str) -> Result<IndexKey, BeanError> {
    token
        .trim()
        .parse::<usize>()
        .map(IndexKey::Position)
        .map_err(|e| BeanError::InvalidIndex {
            index: token.to_string(),
            message: e.to_string(),
        })
}

fn position(key: &IndexKey) -> Result<usize, BeanError> {
    match key {
        IndexKey::Position(position) => Ok(*position),
        IndexKey::Key(key) => Err(BeanError::InvalidIndex {
            index: key.clone(),
            message: "a positional index is required".to_string(),
        }),
    }
}

fn place(items: &mut Vec<Value>, position: usize, value: Value) -> Result<(), BeanError> {
    if items.len() <= position {
        let len = grown_len(items.len(), position)?;
        items.resize(len, Value::Null);
    }
    items[position] = value;
    Ok(())
}

fn mismatch(handler: &str, container: &Value) -> BeanError {
    BeanError::conversion(container.native_type(), handler)
}

#[derive(Debug, Default)]
pub struct ListHandler;

impl CollectionHandlerProvider for ListHandler {
    fn name(&self) -> &str {
        "list"
    }

    fn handles_type(&self, native: &NativeType) -> bool {
        matches!(native, NativeType::List(_))
    }

    fn handles_value(&self, value: &Value) -> bool {
        matches!(value, Value::List(_))
    }

    fn unmarshal_index(&self, token: &str, _container: Option<&Value>) -> Result<IndexKey, BeanError> {
        parse_position(token)
    }

    fn get(&self, container: &Value, key: &IndexKey) -> Result<Value, BeanError> {
        match container {
            Value::List(items) => Ok(items.get(position(key)?).cloned().unwrap_or(Value::Null)),
            other => Err(mismatch(self.name(), other)),
        }
    }

    fn set(&self, container: Value, key: &IndexKey, value: Value) -> Result<Value, BeanError> {
        match container {
            Value::List(mut items) => {
                place(&mut items, position(key)?, value)?;
                Ok(Value::List(items))
            }
            other => Err(mismatch(self.name(), &other)),
        }
    }

    fn create(&self, _native: &NativeType, size_hint: usize) -> Result<Value, BeanError> {
        Ok(Value::List(Vec::with_capacity(size_hint.min(MAX_INDEX_GROWTH))))
    }

    fn component_type(&self, declared: &NativeType) -> Option<NativeType> {
        match declared {
            NativeType::List(Some(component)) => Some((**component).clone()),
            _ => None,
        }
    }

    fn as_collection(&self, container: &Value) -> Vec<Value> {
        match container {
            Value::List(items) => items.clone(),
            _ => vec![],
        }
    }
}

/// Fixed-size arrays: a write beyond the end produces a grown copy.
#[derive(Debug, Default)]
pub struct ArrayHandler;

impl CollectionHandlerProvider for ArrayHandler {
    fn name(&self) -> &str {
        "array"
    }

    fn handles_type(&self, native: &NativeType) -> bool {
        matches!(native, NativeType::Array(_))
    }

    fn handles_value(&self, value: &Value) -> bool {
        matches!(value, Value::Array { .. })
    }

    fn unmarshal_index(&self, token: &str, _container: Option<&Value>) -> Result<IndexKey, BeanError> {
        parse_position(token)
    }

    fn get(&self, container: &Value, key: &IndexKey) -> Result<Value, BeanError> {
        match container {
            Value::Array { items, .. } => {
                Ok(items.get(position(key)?).cloned().unwrap_or(Value::Null))
            }
            other => Err(mismatch(self.name(), other)),
        }
    }

    fn set(&self, container: Value, key: &IndexKey, value: Value) -> Result<Value, BeanError> {
        match container {
            Value::Array { component, items } => {
                let mut grown = items;
                place(&mut grown, position(key)?, value)?;
                Ok(Value::Array {
                    component,
                    items: grown,
                })
            }
            other => Err(mismatch(self.name(), &other)),
        }
    }

    fn create(&self, native: &NativeType, size_hint: usize) -> Result<Value, BeanError> {
        let component = self
            .component_type(native)
            .ok_or_else(|| BeanError::conversion(native, self.name()))?;
        if size_hint > MAX_INDEX_GROWTH {
            return Err(out_of_range(size_hint - 1));
        }
        Ok(Value::Array {
            component,
            items: vec![Value::Null; size_hint],
        })
    }

    fn component_type(&self, declared: &NativeType) -> Option<NativeType> {
        match declared {
            NativeType::Array(component) => Some((**component).clone()),
            _ => None,
        }
    }

    fn as_collection(&self, container: &Value) -> Vec<Value> {
        match container {
            Value::Array { items, .. } => items.clone(),
            _ => vec![],
        }
    }
}

/// String keyed maps, the index token is the key itself.
#[derive(Debug, Default)]
pub struct MapHandler;

impl CollectionHandlerProvider for MapHandler {
    fn name(&self) -> &str {
        "map"
    }

    fn handles_type(&self, native: &NativeType) -> bool {
        matches!(native, NativeType::Map(_))
    }

    fn handles_value(&self, value: &Value) -> bool {
        matches!(value, Value::Map(_))
    }

    fn unmarshal_index(&self, token: &str, _container: Option<&Value>) -> Result<IndexKey, BeanError> {
        Ok(IndexKey::Key(token.to_string()))
    }

    fn get(&self, container: &Value, key: &IndexKey) -> Result<Value, BeanError> {
        match container {
            Value::Map(map) => Ok(map.get(&key_name(key)).cloned().unwrap_or(Value::Null)),
            other => Err(mismatch(self.name(), other)),
        }
    }

    fn set(&self, container: Value, key: &IndexKey, value: Value) -> Result<Value, BeanError> {
        match container {
            Value::Map(mut map) => {
                map.insert(key_name(key), value);
                Ok(Value::Map(map))
            }
            other => Err(mismatch(self.name(), &other)),
        }
    }

    fn create(&self, _native: &NativeType, _size_hint: usize) -> Result<Value, BeanError> {
        Ok(Value::Map(IndexMap::new()))
    }

    fn component_type(&self, declared: &NativeType) -> Option<NativeType> {
        match declared {
            NativeType::Map(Some(value)) => Some((**value).clone()),
            _ => None,
        }
    }

    fn as_collection(&self, container: &Value) -> Vec<Value> {
        match container {
            Value::Map(map) => map.values().cloned().collect(),
            _ => vec![],
        }
    }
}

fn key_name(key: &IndexKey) -> String {
    match key {
        IndexKey::Position(position) => position.to_string(),
        IndexKey::Key(key) => key.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_set_pads_with_null() {
        let handler = ListHandler;
        let key = handler.unmarshal_index("3", None).unwrap();
        let list = handler
            .set(Value::List(vec![]), &key, Value::from("x"))
            .unwrap();
        assert_eq!(
            list,
            Value::List(vec![Value::Null, Value::Null, Value::Null, Value::from("x")])
        );
        assert_eq!(handler.get(&list, &IndexKey::Position(9)).unwrap(), Value::Null);
    }

    #[test]
    fn test_array_create_is_sized() {
        let handler = ArrayHandler;
        let native = NativeType::array_of(NativeType::String);
        let array = handler.create(&native, 2).unwrap();
        assert_eq!(handler.as_collection(&array).len(), 2);
        let grown = handler
            .set(array, &IndexKey::Position(4), Value::from("e"))
            .unwrap();
        assert_eq!(handler.as_collection(&grown).len(), 5);
    }

    #[test]
    fn test_huge_positions_are_rejected() {
        let handler = ListHandler;
        let key = handler.unmarshal_index("18446744073709551615", None).unwrap();
        assert!(matches!(key.size_hint(), Err(BeanError::InvalidIndex { .. })));
        assert!(matches!(
            handler.set(Value::List(vec![]), &key, Value::from("x")),
            Err(BeanError::InvalidIndex { .. })
        ));

        let far = IndexKey::Position(4_000_000_000);
        assert!(matches!(
            handler.set(Value::List(vec![]), &far, Value::from("x")),
            Err(BeanError::InvalidIndex { .. })
        ));
        let native = NativeType::array_of(NativeType::String);
        assert!(matches!(
            ArrayHandler.create(&native, 4_000_000_001),
            Err(BeanError::InvalidIndex { .. })
        ));

        let edge = IndexKey::Position(MAX_INDEX_GROWTH - 1);
        let list = handler
            .set(Value::List(vec![]), &edge, Value::from("x"))
            .unwrap();
        assert_eq!(handler.as_collection(&list).len(), MAX_INDEX_GROWTH);
    }

    #[test]
    fn test_invalid_list_index() {
        assert!(matches!(
            ListHandler.unmarshal_index("first", None),
            Err(BeanError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_map_keys() {
        let handler = MapHandler;
        let key = handler.unmarshal_index("en", None).unwrap();
        let map = handler
            .set(handler.create(&NativeType::Map(None), 1).unwrap(), &key, Value::from("hello"))
            .unwrap();
        assert_eq!(handler.get(&map, &key).unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_chain_lookup() {
        let chain = CollectionHandlerChain::default();
        assert_eq!(
            chain
                .handler_for(&NativeType::list_of(NativeType::String))
                .map(|h| h.name().to_string()),
            Some("list".to_string())
        );
        assert!(chain.handler_for(&NativeType::String).is_none());
        assert!(chain.handler_for_value(&Value::Map(IndexMap::new())).is_some());
    }
}
