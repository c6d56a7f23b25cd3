//! AccessibleInstance
//!
//! Exposes the non-public members of one live object. Every operation
//! resolves the member by name on the object's class (ancestors included),
//! unlocks the handle when the member is not public, and forwards to the
//! object itself. Nothing is cached between calls.

use unseal_engine::{ClassDescriptor, ObjectRef, Value};

use crate::error::{AccessError, AccessResult};
use crate::reflector::Reflector;

/// Proxy over a single target object
#[derive(Debug, Clone)]
pub struct AccessibleInstance {
    target: ObjectRef,
    reflector: Reflector,
    class: ClassDescriptor,
}

impl AccessibleInstance {
    /// Bind to `target`, resolving its class up front
    pub fn new(target: ObjectRef, reflector: Reflector) -> Self {
        let class = ClassDescriptor::of(&target);
        Self {
            target,
            reflector,
            class,
        }
    }

    /// Bind to a value, which must hold an object
    pub fn from_value(value: &Value, reflector: Reflector) -> AccessResult<Self> {
        let class = reflector.reflect(value)?;
        let target = value
            .as_object()
            .cloned()
            .ok_or_else(|| AccessError::InvalidInstance(value.type_name().to_string()))?;
        Ok(Self {
            target,
            reflector,
            class,
        })
    }

    /// The wrapped object (shared, not a copy)
    pub fn target(&self) -> &ObjectRef {
        &self.target
    }

    /// Runtime class name of the target
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Read a field regardless of visibility.
    ///
    /// Arrays come back as copies: writing into the returned array does not
    /// reach the target. Use [`AccessibleInstance::set_array_property_value`].
    pub fn get(&self, name: &str) -> AccessResult<Value> {
        let field = self
            .class
            .field(name)
            .ok_or_else(|| self.property_not_found(name))?;
        self.reflector.make_accessible_if_not(&field);
        Ok(field.get_value(&self.target)?)
    }

    /// Overwrite a field regardless of visibility
    pub fn set(&self, name: &str, value: impl Into<Value>) -> AccessResult<()> {
        let field = self
            .class
            .field(name)
            .ok_or_else(|| self.property_not_found(name))?;
        self.reflector.make_accessible_if_not(&field);
        field.set_value(&self.target, value.into())?;
        Ok(())
    }

    /// Invoke a method regardless of visibility, with the target as receiver
    pub fn call(&self, name: &str, args: &[Value]) -> AccessResult<Value> {
        let method = self
            .class
            .method(name)
            .ok_or_else(|| AccessError::MethodNotFound {
                class: self.class.name().to_string(),
                method: name.to_string(),
            })?;
        self.reflector.make_accessible_if_not(&method);
        Ok(method.invoke(Some(&self.target), args)?)
    }

    /// Set one element of an array field.
    ///
    /// Reads the whole array, stores `value` at `index` (growing the array
    /// with nulls when `index` is past the end) and writes it back.
    pub fn set_array_property_value(
        &self,
        name: &str,
        index: usize,
        value: impl Into<Value>,
    ) -> AccessResult<()> {
        let mut array = self.get(name)?;
        array.set_index(index, value.into())?;
        self.set(name, array)
    }

    fn property_not_found(&self, name: &str) -> AccessError {
        AccessError::PropertyNotFound {
            class: self.class.name().to_string(),
            property: name.to_string(),
        }
    }
}
