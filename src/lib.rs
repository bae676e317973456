//! # bean-types - structural type descriptors and path access for native objects
//!
//! Turns statically declared class tables into ordered field graphs and lets callers read and
//! write deeply nested values through string paths:
//! - Type descriptors built once per class, with cardinality and constraint metadata
//! - Path engine with indexed access, on demand creation of intermediates and type conversion
//! - Registry with pluggable extension loaders
//! - Virtual objects backing interface types
//!
//! ## Quick Start
//!
//! ```
//! #[macro_use]
//! extern crate lazy_static;
//!
//! use std::sync::Arc;
//!
//! use bean_types::native_bean;
//! use bean_types::types::ds::class::{BeanClass, ClassRef, NativeType};
//! use bean_types::types::ds::object::new_object;
//! use bean_types::types::ds::value::Value;
//! use bean_types::types::plugin::registry::BeanResolver;
//!
//! #[derive(Default)]
//! struct Person {
//!     name: Option<String>,
//! }
//!
//! lazy_static! {
//!     static ref PERSON: Arc<BeanClass> = BeanClass::class("demo.Person")
//!         .factory(|| new_object(Person::default()))
//!         .getter::<Person, _>("getName", NativeType::String, |p| p.name.clone().into())
//!         .setter::<Person, _>("setName", NativeType::String, |p, v| {
//!             p.name = v.into_native()?;
//!             Ok(())
//!         })
//!         .build();
//! }
//!
//! fn person() -> Arc<BeanClass> {
//!     PERSON.clone()
//! }
//!
//! native_bean!(Person, ClassRef::lazy(person));
//!
//! # fn main() {
//! let resolver = BeanResolver::new();
//! let person_type = resolver.resolve_class(&ClassRef::lazy(person));
//! let bob = person_type.new_instance().unwrap();
//! bob.set("name", "bob").unwrap();
//! assert_eq!(bob.get("name").unwrap(), Value::from("bob"));
//! # }
//! ```
//!
//! ## Paths
//!
//! ```text
//! name                 field `name`
//! @currency            attribute field `currency`
//! friends[0].address   first friend's address
//! labels[en]           map entry `en`
//! $value               value field of a simple type
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - PEG grammar for path expressions
//! - **[`types`]**
//!   - **[`types::ds`]** - Class tables, values, elements, collection handlers and converters
//!   - **[`types::descriptor`]** - Type descriptors and the simple type adapter
//!   - **[`types::instance`]** - Path engine over wrapped native objects
//!   - **[`types::plugin`]** - Registry, extension loaders and configuration

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod types;
