//! Unseal Engine
//!
//! A small dynamic object model with first-class member visibility:
//! - Values, objects and classes with public/protected/private members
//! - A name-addressable class registry
//! - Reflection handles that can be unlocked to reach non-public members
//! - TOML class manifests for declaring classes without Rust code
//!
//! Ordinary access through this crate enforces visibility; the `unseal`
//! crate builds its bypass toolkit on the reflection handles.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod manifest;
pub mod vm;

pub use manifest::{ClassManifest, ClassSpec, ConstructorSpec, FieldSpec, ManifestError};
pub use vm::{
    CallContext, Class, ClassBuilder, ClassDescriptor, ClassMetadata, ClassRegistry,
    ConstructorDefinition, ConstructorHandle, FieldDefinition, FieldHandle, Member,
    MethodDefinition, MethodHandle, NativeMethod, Object, ObjectRef, StaticFieldHandle, Value,
    Visibility, VmError, VmResult,
};
