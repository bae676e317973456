//! Descriptor registry: memoizes type descriptors by class and by string id.
//!
//! ## Resolution order for ids
//!
//! ```text
//! resolve("demo.Person")
//!      ↓
//! 1. id cache hit?                        → done
//! 2. a cached descriptor of that class?   → cache under the id
//! 3. extension loaders, in order          → first hit owns the id
//! 4. class path                           → default loading
//!      ↓
//! 5. build the descriptor (collapsed to a SimpleBeanType when it is a leaf) and cache it
//! ```
//!
//! Descriptors are created under the class cache's entry lock and build their field graph
//! lazily, once, on first structural access. Id resolution, loader registration and loader
//! removal are serialized by a single lock so removing a loader purges exactly the ids it
//! produced.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::types::descriptor::bean_type::BeanType;
use crate::types::descriptor::constraint::{AnnotationConstraintProvider, ConstraintProvider};
use crate::types::descriptor::defined_type::DefinedType;
use crate::types::descriptor::simple_bean_type::SimpleBeanType;
use crate::types::ds::class::ClassRef;
use crate::types::ds::error::BeanError;
use crate::types::ds::object::ObjectRef;
use crate::types::ds::operations::collection::{CollectionHandler, CollectionHandlerChain};
use crate::types::ds::operations::type_conversion::{Converter, DefaultConverter};
use crate::types::ds::simple_type::{DefaultSimpleTypeWrapper, SimpleTypeWrapper};
use crate::types::instance::bean_instance::BeanInstance;
use crate::types::instance::conversion::{TypeConverter, TypeConverterChain};
use crate::types::instance::wrapper::BeanContentWrapper;
use crate::types::plugin::class_path::ClassPath;
use crate::types::plugin::config::ResolverConfig;
use crate::types::plugin::resolver::ExtensionLoader;

/// Something the registry can resolve: a class, or the string id of one.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Class(ClassRef),
    Id(String),
}

impl From<ClassRef> for Identity {
    fn from(class: ClassRef) -> Self {
        Identity::Class(class)
    }
}

impl From<&ClassRef> for Identity {
    fn from(class: &ClassRef) -> Self {
        Identity::Class(class.clone())
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Identity::Id(id.to_string())
    }
}

impl From<String> for Identity {
    fn from(id: String) -> Self {
        Identity::Id(id)
    }
}

struct LoaderEntry {
    loader: Arc<dyn ExtensionLoader>,
    /// Ids this loader produced, purged when it is removed.
    resolved: Vec<String>,
}

pub struct BeanResolverBuilder {
    config: ResolverConfig,
    class_path: Option<Arc<ClassPath>>,
    constraints: Option<Arc<dyn ConstraintProvider>>,
    collection_handler: Option<Arc<dyn CollectionHandler>>,
    simple_types: Option<Arc<dyn SimpleTypeWrapper>>,
    converter: Option<Arc<dyn Converter>>,
    type_converter: Option<Arc<dyn TypeConverter>>,
}

impl BeanResolverBuilder {
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn class_path(mut self, class_path: Arc<ClassPath>) -> Self {
        self.class_path = Some(class_path);
        self
    }

    pub fn constraints(mut self, constraints: Arc<dyn ConstraintProvider>) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn collection_handler(mut self, handler: Arc<dyn CollectionHandler>) -> Self {
        self.collection_handler = Some(handler);
        self
    }

    pub fn simple_types(mut self, wrapper: Arc<dyn SimpleTypeWrapper>) -> Self {
        self.simple_types = Some(wrapper);
        self
    }

    /// Also backs the default type converter chain unless one is given explicitly.
    pub fn converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn type_converter(mut self, converter: Arc<dyn TypeConverter>) -> Self {
        self.type_converter = Some(converter);
        self
    }

    pub fn build(self) -> Arc<BeanResolver> {
        let converter: Arc<dyn Converter> =
            self.converter.unwrap_or_else(|| Arc::new(DefaultConverter));
        let type_converter = self.type_converter.unwrap_or_else(|| {
            Arc::new(TypeConverterChain::with_converter(converter.clone()))
        });
        let config = self.config;
        let class_path = self.class_path.unwrap_or_default();
        let constraints = self
            .constraints
            .unwrap_or_else(|| Arc::new(AnnotationConstraintProvider));
        let collection_handler = self
            .collection_handler
            .unwrap_or_else(|| Arc::new(CollectionHandlerChain::default()));
        let simple_types = self
            .simple_types
            .unwrap_or_else(|| Arc::new(DefaultSimpleTypeWrapper));

        Arc::new_cyclic(|this| BeanResolver {
            classes: DashMap::new(),
            resolved: DashMap::new(),
            loaders: Mutex::new(Vec::new()),
            class_path,
            config,
            constraints,
            collection_handler,
            simple_types,
            converter,
            type_converter,
            this: this.clone(),
        })
    }
}

/// Registry of type descriptors, shared between threads.
///
/// Descriptors hold a weak reference back to the registry that built them, so the registry is
/// always handed out inside an `Arc`.
pub struct BeanResolver {
    /// Descriptors by class name.
    classes: DashMap<String, Arc<BeanType>>,
    /// Resolved string ids.
    resolved: DashMap<String, DefinedType>,
    loaders: Mutex<Vec<LoaderEntry>>,
    class_path: Arc<ClassPath>,
    config: ResolverConfig,
    constraints: Arc<dyn ConstraintProvider>,
    collection_handler: Arc<dyn CollectionHandler>,
    simple_types: Arc<dyn SimpleTypeWrapper>,
    converter: Arc<dyn Converter>,
    type_converter: Arc<dyn TypeConverter>,
    this: Weak<BeanResolver>,
}

impl BeanResolver {
    /// A registry with default configuration and collaborators.
    pub fn new() -> Arc<Self> {
        BeanResolver::builder().build()
    }

    pub fn with_config(config: ResolverConfig) -> Arc<Self> {
        BeanResolver::builder().config(config).build()
    }

    pub fn builder() -> BeanResolverBuilder {
        BeanResolverBuilder {
            config: ResolverConfig::default(),
            class_path: None,
            constraints: None,
            collection_handler: None,
            simple_types: None,
            converter: None,
            type_converter: None,
        }
    }

    /// Resolve a class or a string id.
    ///
    /// Classes always resolve. Ids resolve to `None` when no loader knows them.
    pub fn resolve(&self, identity: impl Into<Identity>) -> Result<Option<DefinedType>, BeanError> {
        match identity.into() {
            Identity::Class(class) => Ok(Some(DefinedType::Bean(self.resolve_class(&class)))),
            Identity::Id(id) => self.resolve_id(&id),
        }
    }

    /// The descriptor of `class`, created on first request.
    pub fn resolve_class(&self, class: &ClassRef) -> Arc<BeanType> {
        let name = class.name();
        if let Some(cached) = self.classes.get(&name) {
            return cached.value().clone();
        }
        self.classes
            .entry(name)
            .or_insert_with(|| {
                debug!(class = %class.name(), "creating type descriptor");
                Arc::new(BeanType::new(class.clone(), self.this.clone(), &self.config))
            })
            .value()
            .clone()
    }

    pub fn resolve_id(&self, id: &str) -> Result<Option<DefinedType>, BeanError> {
        if let Some(found) = self.resolved.get(id) {
            return Ok(Some(found.value().clone()));
        }

        let mut loaders = self.loaders.lock();
        if let Some(found) = self.resolved.get(id) {
            return Ok(Some(found.value().clone()));
        }

        let mut owner = None;
        let cached = self.classes.get(id).map(|entry| entry.value().clone());
        let bean_type = match cached {
            Some(bean_type) => bean_type,
            None => {
                let mut class = None;
                for (index, entry) in loaders.iter().enumerate() {
                    match entry.loader.load_class(id) {
                        Ok(Some(loaded)) => {
                            debug!(id, loader = entry.loader.name(), "resolved by extension loader");
                            class = Some(loaded);
                            owner = Some(index);
                            break;
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!(id, loader = entry.loader.name(), error = %e, "extension loader failed")
                        }
                    }
                }
                match class.or_else(|| self.class_path.load(id)) {
                    Some(class) => self.resolve_class(&class),
                    None => {
                        debug!(id, "unresolved type id");
                        return Ok(None);
                    }
                }
            }
        };
        let defined = if bean_type.is_simple_type()? {
            DefinedType::Simple(SimpleBeanType::new(bean_type))
        } else {
            DefinedType::Bean(bean_type)
        };
        if let Some(index) = owner {
            loaders[index].resolved.push(id.to_string());
        }
        self.resolved.insert(id.to_string(), defined.clone());
        Ok(Some(defined))
    }

    /// Pre-populates both caches for `class` without building its field graph.
    pub fn register(&self, class: &ClassRef) -> Arc<BeanType> {
        let bean_type = self.resolve_class(class);
        let _loaders = self.loaders.lock();
        self.resolved
            .entry(class.name())
            .or_insert_with(|| DefinedType::Bean(bean_type.clone()));
        bean_type
    }

    pub fn add_extension_loader(&self, loader: Arc<dyn ExtensionLoader>) {
        debug!(loader = loader.name(), "adding extension loader");
        self.loaders.lock().push(LoaderEntry {
            loader,
            resolved: Vec::new(),
        });
    }

    /// Removes `loader` and forgets every id it produced. Returns whether it was registered.
    pub fn remove_extension_loader(&self, loader: &Arc<dyn ExtensionLoader>) -> bool {
        let mut loaders = self.loaders.lock();
        let position = loaders
            .iter()
            .position(|entry| same_loader(&entry.loader, loader));
        match position {
            Some(index) => {
                let entry = loaders.remove(index);
                for id in &entry.resolved {
                    self.resolved.remove(id);
                }
                debug!(
                    loader = entry.loader.name(),
                    purged = entry.resolved.len(),
                    "removed extension loader"
                );
                true
            }
            None => false,
        }
    }

    pub fn extension_loaders(&self) -> Vec<Arc<dyn ExtensionLoader>> {
        self.loaders
            .lock()
            .iter()
            .map(|entry| entry.loader.clone())
            .collect()
    }

    pub fn is_resolved(&self, id: &str) -> bool {
        self.resolved.contains_key(id)
    }

    /// Wraps `object` under the descriptor of its runtime class.
    pub fn wrap(&self, object: ObjectRef) -> Result<BeanInstance, BeanError> {
        let this = self.this.upgrade().ok_or_else(|| BeanError::Detached {
            type_id: "resolver".to_string(),
        })?;
        BeanContentWrapper::new(&this).wrap(object)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn class_path(&self) -> &Arc<ClassPath> {
        &self.class_path
    }

    pub fn constraints(&self) -> &Arc<dyn ConstraintProvider> {
        &self.constraints
    }

    pub fn collection_handler(&self) -> &Arc<dyn CollectionHandler> {
        &self.collection_handler
    }

    pub fn simple_types(&self) -> &Arc<dyn SimpleTypeWrapper> {
        &self.simple_types
    }

    pub fn converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }

    pub fn type_converter(&self) -> &Arc<dyn TypeConverter> {
        &self.type_converter
    }
}

fn same_loader(a: &Arc<dyn ExtensionLoader>, b: &Arc<dyn ExtensionLoader>) -> bool {
    Arc::as_ptr(a) as *const u8 == Arc::as_ptr(b) as *const u8
}
