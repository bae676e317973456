use std::sync::Arc;

use crate::types::descriptor::bean_type::BeanType;
use crate::types::descriptor::simple_bean_type::SimpleBeanType;
use crate::types::ds::class::{Method, NativeType};
use crate::types::ds::element::Element;
use crate::types::ds::error::BeanError;
use crate::types::instance::bean_instance::BeanInstance;
use crate::types::plugin::registry::BeanResolver;

/// What the registry hands out for an id: a structured descriptor, or its leaf presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinedType {
    Bean(Arc<BeanType>),
    Simple(SimpleBeanType),
}

impl DefinedType {
    pub fn bean_type(&self) -> &Arc<BeanType> {
        match self {
            DefinedType::Bean(bean_type) => bean_type,
            DefinedType::Simple(simple) => simple.bean_type(),
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleBeanType> {
        match self {
            DefinedType::Simple(simple) => Some(simple),
            DefinedType::Bean(_) => None,
        }
    }

    pub fn id(&self) -> String {
        self.bean_type().id()
    }

    pub fn name(&self) -> &str {
        self.bean_type().name()
    }

    pub fn resolver(&self) -> Option<Arc<BeanResolver>> {
        self.bean_type().resolver()
    }

    pub fn is_simple_type(&self) -> Result<bool, BeanError> {
        self.bean_type().is_simple_type()
    }

    pub fn elements(&self) -> Result<Vec<&Element>, BeanError> {
        self.bean_type().elements()
    }

    pub fn element(&self, name: &str) -> Result<Option<&Element>, BeanError> {
        match self {
            DefinedType::Bean(bean_type) => bean_type.element(name),
            DefinedType::Simple(simple) => simple.element(name),
        }
    }

    pub fn getter(&self, name: &str) -> Result<Option<&Method>, BeanError> {
        match self {
            DefinedType::Bean(bean_type) => bean_type.getter(name),
            DefinedType::Simple(simple) => simple.getter(name),
        }
    }

    pub fn setter(&self, name: &str) -> Result<Option<&Method>, BeanError> {
        match self {
            DefinedType::Bean(bean_type) => bean_type.setter(name),
            DefinedType::Simple(simple) => simple.setter(name),
        }
    }

    pub fn actual_type(&self, name: &str) -> Result<Option<&NativeType>, BeanError> {
        match self {
            DefinedType::Bean(bean_type) => bean_type.actual_type(name),
            DefinedType::Simple(simple) => simple.actual_type(name),
        }
    }

    pub fn component_type(&self, name: &str) -> Result<Option<&NativeType>, BeanError> {
        match self {
            DefinedType::Bean(bean_type) => bean_type.component_type(name),
            DefinedType::Simple(simple) => simple.component_type(name),
        }
    }

    pub fn super_type(&self) -> Option<&Arc<BeanType>> {
        self.bean_type().super_type()
    }

    /// Instantiates the underlying class, wrapped under this presentation.
    pub fn new_instance(&self) -> Result<BeanInstance, BeanError> {
        let created = self.bean_type().new_instance()?;
        Ok(BeanInstance::new(self.clone(), created.unwrapped().clone()))
    }
}

impl From<Arc<BeanType>> for DefinedType {
    fn from(bean_type: Arc<BeanType>) -> Self {
        DefinedType::Bean(bean_type)
    }
}

impl From<SimpleBeanType> for DefinedType {
    fn from(simple: SimpleBeanType) -> Self {
        DefinedType::Simple(simple)
    }
}
