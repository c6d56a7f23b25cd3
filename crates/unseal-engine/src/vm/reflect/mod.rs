//! Reflection capability
//!
//! This module is the engine's side of visibility bypass:
//! - [`ClassMetadata`]: member tables with declared visibility
//! - [`ClassBuilder`]: describes classes to the engine
//! - [`ClassDescriptor`]: resolves members by name into handles
//! - [`Member`]: the unlock surface shared by all handles
//!
//! ## Usage
//!
//! ```rust,ignore
//! let descriptor = ClassDescriptor::of(&object);
//! let field = descriptor.field("secret").unwrap();
//! field.set_accessible();
//! let value = field.get_value(&object)?;
//! ```

mod class_metadata;
mod introspection;
mod type_builder;

pub use class_metadata::{
    ClassMetadata, ConstructorEntry, FieldSlot, MethodEntry, StaticFieldEntry, Visibility,
};
pub use introspection::{
    ClassDescriptor, ConstructorHandle, FieldHandle, Member, MethodHandle, StaticFieldHandle,
};
pub use type_builder::{ClassBuilder, ConstructorDefinition, FieldDefinition, MethodDefinition};
