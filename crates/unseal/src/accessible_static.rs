//! AccessibleStatic
//!
//! Static-member counterpart of [`crate::AccessibleInstance`]: reads and
//! writes static fields and calls static methods of a named class,
//! whatever their declared visibility.

use unseal_engine::{ClassDescriptor, Value};

use crate::error::{AccessError, AccessResult};
use crate::reflector::Reflector;

/// Proxy over the static members of one class
#[derive(Debug, Clone)]
pub struct AccessibleStatic {
    reflector: Reflector,
    class: ClassDescriptor,
}

impl AccessibleStatic {
    /// Bind to the class registered as `class_name`
    pub fn new(class_name: &str, reflector: Reflector) -> AccessResult<Self> {
        let class = reflector.reflect(class_name)?;
        Ok(Self { reflector, class })
    }

    /// Bound class name
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Read a static field
    pub fn get(&self, name: &str) -> AccessResult<Value> {
        let field = self
            .class
            .static_field(name)
            .ok_or_else(|| self.property_not_found(name))?;
        self.reflector.make_accessible_if_not(&field);
        Ok(field.get_value()?)
    }

    /// Overwrite a static field
    pub fn set(&self, name: &str, value: impl Into<Value>) -> AccessResult<()> {
        let field = self
            .class
            .static_field(name)
            .ok_or_else(|| self.property_not_found(name))?;
        self.reflector.make_accessible_if_not(&field);
        field.set_value(value.into())?;
        Ok(())
    }

    /// Call a static method. Instance methods fail for lack of a receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> AccessResult<Value> {
        let method = self
            .class
            .method(name)
            .ok_or_else(|| AccessError::MethodNotFound {
                class: self.class.name().to_string(),
                method: name.to_string(),
            })?;
        self.reflector.make_accessible_if_not(&method);
        Ok(method.invoke(None, args)?)
    }

    fn property_not_found(&self, name: &str) -> AccessError {
        AccessError::PropertyNotFound {
            class: self.class.name().to_string(),
            property: name.to_string(),
        }
    }
}
