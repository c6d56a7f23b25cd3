//! Make
//!
//! Entry point routing to the accessors and the singleton factory.

use std::sync::Arc;

use unseal_engine::{ClassRegistry, ObjectRef, Value};

use crate::accessible::AccessibleInstance;
use crate::accessible_static::AccessibleStatic;
use crate::error::{AccessError, AccessResult};
use crate::reflector::Reflector;
use crate::singleton::SingletonFactory;

/// Facade over one class registry
#[derive(Debug, Clone)]
pub struct Make {
    reflector: Reflector,
    factory: SingletonFactory,
}

impl Make {
    /// Facade over `registry`
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self {
            reflector: Reflector::with_registry(registry.clone()),
            factory: SingletonFactory::new(registry),
        }
    }

    /// Expose the members of `instance`, which must hold an object
    pub fn accessible(&self, instance: &Value) -> AccessResult<AccessibleInstance> {
        let object = instance
            .as_object()
            .ok_or_else(|| AccessError::InvalidInstance(instance.type_name().to_string()))?;
        Ok(self.accessible_object(object.clone()))
    }

    /// Expose the members of a live object
    pub fn accessible_object(&self, object: ObjectRef) -> AccessibleInstance {
        AccessibleInstance::new(object, self.reflector.clone())
    }

    /// New instance of a restricted-construction class
    pub fn instance(&self, class_name: &str, args: &[Value]) -> AccessResult<ObjectRef> {
        self.factory.make(class_name, args)
    }

    /// New instance of a restricted-construction class, already exposed
    pub fn accessible_instance(
        &self,
        class_name: &str,
        args: &[Value],
    ) -> AccessResult<AccessibleInstance> {
        let instance = self.instance(class_name, args)?;
        Ok(self.accessible_object(instance))
    }

    /// Expose the static members of a class
    pub fn accessible_static(&self, class_name: &str) -> AccessResult<AccessibleStatic> {
        AccessibleStatic::new(class_name, self.reflector.clone())
    }
}
