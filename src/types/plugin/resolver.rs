//! Extension loader trait for resolving type ids the registry does not know yet.
//!
//! Loaders are consulted in registration order when an id misses the registry's caches. The
//! first loader that returns a class owns that id until it is removed again.

use crate::types::ds::class::ClassRef;
use crate::types::ds::error::BeanError;

pub trait ExtensionLoader: Send + Sync {
    /// Load the class registered under `id`.
    ///
    /// `Ok(None)` passes the id on to the next loader; an error is logged and also passes it on.
    fn load_class(&self, id: &str) -> Result<Option<ClassRef>, BeanError>;

    /// Human-readable name for this loader (for debugging/logging).
    fn name(&self) -> &str;
}
