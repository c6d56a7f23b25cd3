//! SingletonFactory
//!
//! Makes fresh instances of classes that only expose a cached instance.
//! Every restricted-construction class declares an explicit, non-public
//! constructor; a class with no constructor at all is not one, and is
//! rejected with `NonSingletonClass`.

use std::sync::Arc;

use unseal_engine::{ClassRegistry, ObjectRef, Value};

use crate::error::{AccessError, AccessResult};
use crate::reflector::Reflector;

/// Builds independent instances of restricted-construction classes
#[derive(Debug, Clone)]
pub struct SingletonFactory {
    registry: Arc<ClassRegistry>,
    reflector: Reflector,
}

impl SingletonFactory {
    /// Factory over the classes in `registry`
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        let reflector = Reflector::with_registry(registry.clone());
        Self {
            registry,
            reflector,
        }
    }

    /// Build a new instance of `class_name`, passing `args` to its constructor.
    ///
    /// Each successful call returns a distinct object; the class's own
    /// cached instance is never returned nor populated.
    pub fn make(&self, class_name: &str, args: &[Value]) -> AccessResult<ObjectRef> {
        if !is_valid_class_name(class_name) || !self.registry.contains(class_name) {
            return Err(AccessError::InvalidSingletonClassName(class_name.to_string()));
        }
        self.reflector.instantiate_singleton(class_name, args)
    }
}

/// Check that `name` is a well-formed class name: identifier segments
/// (`[A-Za-z_][A-Za-z0-9_]*`) joined by `::` or `\`.
pub fn is_valid_class_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    name.split("::")
        .flat_map(|part| part.split('\\'))
        .all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}
