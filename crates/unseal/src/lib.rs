//! Unseal
//!
//! Runtime member-access bypass for objects of the unseal engine, meant for
//! tests and diagnostic tooling:
//! - [`AccessibleInstance`]: get/set/call non-public members of one object
//! - [`AccessibleStatic`]: the same for a class's static members
//! - [`SingletonFactory`]: fresh instances of classes whose constructor is
//!   private, built by allocating first and running the constructor after
//! - [`Make`]: facade routing to the above
//!
//! ```rust,ignore
//! let make = Make::new(registry);
//! let quazar = make.accessible(&Value::Object(object))?;
//! assert_eq!(quazar.get("distance")?, Value::from("4.37 l/y"));
//! let calc = make.instance("Calc", &[Value::Int(1), Value::Int(2)])?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod accessible;
mod accessible_static;
mod error;
mod make;
mod reflector;
mod singleton;

pub use accessible::AccessibleInstance;
pub use accessible_static::AccessibleStatic;
pub use error::{AccessError, AccessResult};
pub use make::Make;
pub use reflector::{ReflectTarget, Reflector};
pub use singleton::{is_valid_class_name, SingletonFactory};

pub use unseal_engine::{
    CallContext, Class, ClassBuilder, ClassDescriptor, ClassRegistry, ConstructorDefinition,
    FieldDefinition, Member, MethodDefinition, ObjectRef, Value, Visibility, VmError, VmResult,
};
