use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::types::ds::class::ClassRef;
use crate::types::ds::error::BeanError;
use crate::types::ds::value::Value;
use crate::types::ds::virtual_object::VirtualInstance;

/// Shared handle to a native object. Path access is single threaded, mutation goes through the
/// `RefCell`.
pub type ObjectRef = Rc<RefCell<dyn Bean>>;

/// A native object the path engine can drive through its class table.
///
/// Structs embedding the state of a superclass expose it through `as_part`, so accessors
/// declared on the superclass keep working on the subclass. The [`native_bean!`] macro writes
/// the boilerplate.
pub trait Bean: Any {
    fn bean_class(&self) -> ClassRef;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_part(&self, _part: TypeId) -> Option<&dyn Any> {
        None
    }

    fn as_part_mut(&mut self, _part: TypeId) -> Option<&mut dyn Any> {
        None
    }

    fn as_virtual(&self) -> Option<&VirtualInstance> {
        None
    }

    fn as_virtual_mut(&mut self) -> Option<&mut VirtualInstance> {
        None
    }

    /// Objects without setters that still accept writes into a field store.
    fn as_sneaky_editable(&mut self) -> Option<&mut dyn SneakyEditable> {
        None
    }
}

pub trait SneakyEditable {
    /// Stores `value` under an already resolved field name, bypassing accessors.
    fn sneaky_set(&mut self, name: &str, value: Value);
}

pub fn new_object<B: Bean>(bean: B) -> ObjectRef {
    Rc::new(RefCell::new(bean))
}

pub fn borrow_bean(object: &ObjectRef) -> Result<Ref<'_, dyn Bean>, BeanError> {
    object
        .try_borrow()
        .map_err(|e| BeanError::invocation("borrow", e.to_string()))
}

pub fn borrow_bean_mut(object: &ObjectRef) -> Result<RefMut<'_, dyn Bean>, BeanError> {
    object
        .try_borrow_mut()
        .map_err(|e| BeanError::invocation("borrow_mut", e.to_string()))
}

/// Implements [`Bean`] for a struct.
///
/// ```ignore
/// native_bean!(Person, ClassRef::lazy(person_class));
/// native_bean!(Employee, ClassRef::lazy(employee_class), base: Person);
/// ```
#[macro_export]
macro_rules! native_bean {
    ($ty:ty, $class:expr $(, $part:ident : $part_ty:ty)* $(,)?) => {
        impl $crate::types::ds::object::Bean for $ty {
            fn bean_class(&self) -> $crate::types::ds::class::ClassRef {
                $class
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            #[allow(unused_variables)]
            fn as_part(&self, part: ::std::any::TypeId) -> Option<&dyn ::std::any::Any> {
                $(
                    if part == ::std::any::TypeId::of::<$part_ty>() {
                        return Some(&self.$part);
                    }
                )*
                None
            }

            #[allow(unused_variables)]
            fn as_part_mut(&mut self, part: ::std::any::TypeId) -> Option<&mut dyn ::std::any::Any> {
                $(
                    if part == ::std::any::TypeId::of::<$part_ty>() {
                        return Some(&mut self.$part);
                    }
                )*
                None
            }
        }
    };
}
