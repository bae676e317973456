use dashmap::DashMap;

use crate::types::ds::class::ClassRef;
use crate::types::ds::error::BeanError;
use crate::types::plugin::resolver::ExtensionLoader;

/// Name → class table the host populates. Last resort when no extension loader knows an id.
#[derive(Default)]
pub struct ClassPath {
    classes: DashMap<String, ClassRef>,
}

impl ClassPath {
    pub fn new() -> Self {
        ClassPath::default()
    }

    /// Registers `class` under its fully qualified name, replacing any earlier entry.
    pub fn register(&self, class: ClassRef) {
        self.classes.insert(class.name(), class);
    }

    pub fn unregister(&self, name: &str) -> Option<ClassRef> {
        self.classes.remove(name).map(|(_, class)| class)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn load(&self, name: &str) -> Option<ClassRef> {
        self.classes.get(name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ExtensionLoader for ClassPath {
    fn load_class(&self, id: &str) -> Result<Option<ClassRef>, BeanError> {
        Ok(self.load(id))
    }

    fn name(&self) -> &str {
        "class-path"
    }
}
