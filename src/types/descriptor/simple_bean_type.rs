use std::borrow::Cow;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::types::descriptor::bean_type::BeanType;
use crate::types::ds::class::{Method, NativeType};
use crate::types::ds::element::Element;
use crate::types::ds::error::BeanError;
use crate::types::ds::simple_type::SimpleType;
use crate::types::instance::bean_instance::BeanInstance;

/// Reserved path token addressing the value field of a simple type.
pub const SIMPLE_TYPE_VALUE: &str = "$value";

/// Presents a descriptor that collapses to a single value as a leaf type.
///
/// Everything structural is delegated; only [`SIMPLE_TYPE_VALUE`] is redirected to the value
/// element.
#[derive(Clone)]
pub struct SimpleBeanType {
    bean_type: Arc<BeanType>,
}

impl SimpleBeanType {
    pub fn new(bean_type: Arc<BeanType>) -> Self {
        SimpleBeanType { bean_type }
    }

    pub fn bean_type(&self) -> &Arc<BeanType> {
        &self.bean_type
    }

    pub fn simple_type(&self) -> Result<Option<SimpleType>, BeanError> {
        Ok(self.bean_type.value_element()?.and_then(|e| e.simple_type()))
    }

    /// Native type of the value this type collapses to.
    pub fn instance_type(&self) -> Result<Option<NativeType>, BeanError> {
        Ok(self.simple_type()?.map(|simple| simple.instance_type()))
    }

    pub fn id(&self) -> String {
        self.bean_type.id()
    }

    pub fn name(&self) -> &str {
        self.bean_type.name()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.bean_type.namespace()
    }

    pub fn is_simple_type(&self) -> Result<bool, BeanError> {
        self.bean_type.is_simple_type()
    }

    pub fn elements(&self) -> Result<Vec<&Element>, BeanError> {
        self.bean_type.elements()
    }

    pub fn element(&self, name: &str) -> Result<Option<&Element>, BeanError> {
        if name == SIMPLE_TYPE_VALUE {
            self.bean_type.value_element()
        } else {
            self.bean_type.element(name)
        }
    }

    pub fn getter(&self, name: &str) -> Result<Option<&Method>, BeanError> {
        let name = self.redirect(name)?;
        self.bean_type.getter(&name)
    }

    pub fn setter(&self, name: &str) -> Result<Option<&Method>, BeanError> {
        let name = self.redirect(name)?;
        self.bean_type.setter(&name)
    }

    pub fn actual_type(&self, name: &str) -> Result<Option<&NativeType>, BeanError> {
        let name = self.redirect(name)?;
        self.bean_type.actual_type(&name)
    }

    pub fn component_type(&self, name: &str) -> Result<Option<&NativeType>, BeanError> {
        let name = self.redirect(name)?;
        self.bean_type.component_type(&name)
    }

    pub fn super_type(&self) -> Option<&Arc<BeanType>> {
        self.bean_type.super_type()
    }

    pub fn new_instance(&self) -> Result<BeanInstance, BeanError> {
        self.bean_type.new_instance()
    }

    fn redirect<'a>(&self, name: &'a str) -> Result<Cow<'a, str>, BeanError> {
        if name != SIMPLE_TYPE_VALUE {
            return Ok(Cow::Borrowed(name));
        }
        match self.bean_type.value_element()? {
            Some(value) => Ok(Cow::Owned(value.name().to_string())),
            None => Ok(Cow::Borrowed(name)),
        }
    }
}

impl PartialEq for SimpleBeanType {
    fn eq(&self, other: &Self) -> bool {
        self.bean_type == other.bean_type
    }
}

impl Debug for SimpleBeanType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SimpleBeanType: {}", self.bean_type.class().name())
    }
}
