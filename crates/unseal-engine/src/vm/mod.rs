//! Unseal object model
//!
//! This module provides the host side of reflection:
//! - Dynamic values and object references
//! - Classes with declared visibility on every member
//! - A class registry addressable by name
//! - Reflection handles that can be unlocked to bypass visibility
//!
//! Ordinary access (`ObjectRef::get`, `Class::call_static`,
//! `ClassRegistry::construct`, ...) enforces visibility. Only the handles in
//! [`reflect`] can reach non-public members, and only after being unlocked.

pub mod class_registry;
pub mod object;
pub mod reflect;
pub mod value;

pub use class_registry::ClassRegistry;
pub use object::{CallContext, Class, NativeMethod, Object, ObjectRef};
pub use reflect::{
    ClassBuilder, ClassDescriptor, ClassMetadata, ConstructorDefinition, ConstructorHandle,
    FieldDefinition, FieldHandle, Member, MethodDefinition, MethodHandle, StaticFieldHandle,
    Visibility,
};
pub use value::Value;

/// Object model errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VmError {
    /// No class registered under this name
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// A class with this name is already registered
    #[error("Class already defined: {0}")]
    DuplicateClass(String),

    /// Field lookup failed on the class and all of its ancestors
    #[error("No field \"{field}\" on class \"{class}\"")]
    FieldNotFound {
        /// Class searched
        class: String,
        /// Requested field
        field: String,
    },

    /// Method lookup failed on the class and all of its ancestors
    #[error("No method \"{method}\" on class \"{class}\"")]
    MethodNotFound {
        /// Class searched
        class: String,
        /// Requested method
        method: String,
    },

    /// Member exists but its visibility forbids this access
    #[error("Cannot access {visibility} member \"{member}\" of class \"{class}\"")]
    NotAccessible {
        /// Declaring class
        class: String,
        /// Member name
        member: String,
        /// Declared visibility
        visibility: Visibility,
    },

    /// An instance method was invoked without a receiver
    #[error("Method \"{class}::{method}\" requires an instance receiver")]
    MissingReceiver {
        /// Declaring class
        class: String,
        /// Method name
        method: String,
    },

    /// Wrong number of positional arguments
    #[error("{callee} expects {expected} arguments, got {got}")]
    ArgumentCount {
        /// Callee description
        callee: String,
        /// Expected count
        expected: usize,
        /// Supplied count
        got: usize,
    },

    /// Value kind mismatch
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected kind
        expected: String,
        /// Actual kind
        got: String,
    },

    /// Error raised from inside a method body
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Object model result
pub type VmResult<T> = Result<T, VmError>;
