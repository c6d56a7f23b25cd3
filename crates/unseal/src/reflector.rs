//! Reflector
//!
//! Thin layer over the engine's reflection capability: resolves class
//! descriptors, unlocks member handles and performs two-phase construction
//! (allocate without a constructor, then run the constructor explicitly).

use std::sync::Arc;

use unseal_engine::{ClassDescriptor, ClassRegistry, Member, ObjectRef, Value};

use crate::error::{AccessError, AccessResult};

/// What to reflect: a live value or a class name
#[derive(Debug, Clone, Copy)]
pub enum ReflectTarget<'a> {
    /// A value that should hold an object
    Instance(&'a Value),
    /// A live object
    Object(&'a ObjectRef),
    /// A registered class name
    ClassName(&'a str),
}

impl<'a> From<&'a Value> for ReflectTarget<'a> {
    fn from(value: &'a Value) -> Self {
        ReflectTarget::Instance(value)
    }
}

impl<'a> From<&'a ObjectRef> for ReflectTarget<'a> {
    fn from(object: &'a ObjectRef) -> Self {
        ReflectTarget::Object(object)
    }
}

impl<'a> From<&'a str> for ReflectTarget<'a> {
    fn from(name: &'a str) -> Self {
        ReflectTarget::ClassName(name)
    }
}

/// Type-introspection capability
#[derive(Debug, Clone, Default)]
pub struct Reflector {
    registry: Option<Arc<ClassRegistry>>,
}

impl Reflector {
    /// A reflector that can only describe live objects
    pub fn new() -> Self {
        Self::default()
    }

    /// A reflector that can also resolve class names
    pub fn with_registry(registry: Arc<ClassRegistry>) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    /// Describe a live object's runtime class or a class named in the registry.
    ///
    /// A non-object value fails with `InvalidInstance`; an unknown name (or
    /// any name when no registry is attached) fails with
    /// `InvalidSingletonClassName`.
    pub fn reflect<'a>(
        &self,
        target: impl Into<ReflectTarget<'a>>,
    ) -> AccessResult<ClassDescriptor> {
        match target.into() {
            ReflectTarget::Object(object) => Ok(ClassDescriptor::of(object)),
            ReflectTarget::Instance(value) => value
                .as_object()
                .map(ClassDescriptor::of)
                .ok_or_else(|| AccessError::InvalidInstance(value.type_name().to_string())),
            ReflectTarget::ClassName(name) => self
                .registry
                .as_ref()
                .and_then(|registry| registry.get_class_by_name(name))
                .map(|class| ClassDescriptor::new(class.clone()))
                .ok_or_else(|| AccessError::InvalidSingletonClassName(name.to_string())),
        }
    }

    /// True iff the member is declared public
    pub fn is_accessible<M: Member + ?Sized>(&self, member: &M) -> bool {
        member.is_public()
    }

    /// Unlock the member handle whatever its declared visibility
    pub fn make_accessible<M: Member + ?Sized>(&self, member: &M) {
        log::trace!(
            "unlocking {} member {}::{}",
            member.visibility(),
            member.declaring_class(),
            member.name()
        );
        member.set_accessible();
    }

    /// Unlock the member handle unless it is already public
    pub fn make_accessible_if_not<M: Member + ?Sized>(&self, member: &M) {
        if !self.is_accessible(member) {
            self.make_accessible(member);
        }
    }

    /// Build a fresh instance of `class_name`, bypassing its constructor's
    /// visibility.
    ///
    /// The instance is allocated without running any constructor, then the
    /// (unlocked) constructor runs on it in place with `args`. The class's
    /// static fields, including any cached-instance slot, are neither read
    /// nor written.
    pub fn instantiate_singleton(
        &self,
        class_name: &str,
        args: &[Value],
    ) -> AccessResult<ObjectRef> {
        let descriptor = self.reflect(class_name)?;
        let constructor = descriptor
            .constructor()
            .ok_or_else(|| AccessError::NonSingletonClass(class_name.to_string()))?;

        let instance = descriptor.new_instance_without_constructor();
        log::debug!(
            "allocated {} without constructor, running {} constructor with {} argument(s)",
            instance.class_name(),
            constructor.visibility(),
            args.len()
        );

        self.make_accessible(&constructor);
        constructor.invoke(&instance, args)?;
        Ok(instance)
    }
}
