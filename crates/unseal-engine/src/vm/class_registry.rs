//! Class registry addressable by name and ID

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::vm::object::{Class, ObjectRef};
use crate::vm::reflect::ClassBuilder;
use crate::vm::value::Value;
use crate::vm::{VmError, VmResult};

/// Registry of every class known to the engine
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Arc<Class>>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, usize>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a built class. Names must be unique.
    pub fn register_class(&mut self, class: Class) -> VmResult<Arc<Class>> {
        if self.name_to_id.contains_key(&class.name) {
            return Err(VmError::DuplicateClass(class.name));
        }
        let id = self.classes.len();
        if class.id != id {
            return Err(VmError::RuntimeError(format!(
                "Class {} built with id {} but next id is {}",
                class.name, class.id, id
            )));
        }

        log::debug!("registered class {} (id {})", class.name, id);
        let class = Arc::new(class);
        self.name_to_id.insert(class.name.clone(), id);
        self.classes.push(class.clone());
        Ok(class)
    }

    /// Build `builder` under the next ID and register it
    pub fn define(&mut self, builder: ClassBuilder) -> VmResult<Arc<Class>> {
        if self.contains(builder.name()) {
            return Err(VmError::DuplicateClass(builder.name().to_string()));
        }
        let class = builder.build(self.next_class_id());
        self.register_class(class)
    }

    /// Get class by ID
    pub fn get_class(&self, id: usize) -> Option<&Arc<Class>> {
        self.classes.get(id)
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<&Arc<Class>> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.classes.get(*id))
    }

    /// Check if a class name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> usize {
        self.classes.len()
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over all classes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Arc<Class>)> {
        self.classes.iter().enumerate()
    }

    /// `new Name(args)`; the constructor must be public
    pub fn construct(&self, name: &str, args: &[Value]) -> VmResult<ObjectRef> {
        let class = self
            .get_class_by_name(name)
            .ok_or_else(|| VmError::ClassNotFound(name.to_string()))?;
        class.instantiate(args)
    }
}
