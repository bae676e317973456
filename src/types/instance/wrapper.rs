use std::sync::{Arc, Weak};

use crate::types::ds::error::BeanError;
use crate::types::ds::object::{borrow_bean, ObjectRef};
use crate::types::instance::bean_instance::BeanInstance;
use crate::types::plugin::registry::BeanResolver;

/// Wraps native objects under the descriptor of their runtime class.
///
/// Virtual objects are wrapped under the type they were created for, so an object made for an
/// interface keeps answering to that interface's fields.
#[derive(Clone)]
pub struct BeanContentWrapper {
    resolver: Weak<BeanResolver>,
}

impl BeanContentWrapper {
    pub fn new(resolver: &Arc<BeanResolver>) -> Self {
        BeanContentWrapper {
            resolver: Arc::downgrade(resolver),
        }
    }

    pub fn wrap(&self, object: ObjectRef) -> Result<BeanInstance, BeanError> {
        let (class, original) = {
            let bean = borrow_bean(&object)?;
            let original = bean.as_virtual().map(|v| v.original_type().clone());
            (bean.bean_class(), original)
        };
        if let Some(original) = original {
            return Ok(BeanInstance::new(original, object));
        }
        let resolver = self.resolver.upgrade().ok_or_else(|| BeanError::Detached {
            type_id: class.name(),
        })?;
        Ok(BeanInstance::new(resolver.resolve_class(&class), object))
    }
}
