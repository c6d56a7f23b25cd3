//! Class Builder
//!
//! Describes a class to the engine: its fields, methods and constructor,
//! each with a declared visibility. Classes are the only things reflection
//! can see, so building one is how a type opts into the toolkit.
//!
//! ```rust,ignore
//! let calc = ClassBuilder::new("Calc")
//!     .field(FieldDefinition::new("a").visibility(Visibility::Private))
//!     .field(FieldDefinition::new("b").visibility(Visibility::Private))
//!     .constructor(ConstructorDefinition::assigning(["a", "b"]).visibility(Visibility::Private))
//!     .method(MethodDefinition::new("sum", |ctx, _| { ... }))
//!     .build(registry.next_class_id());
//! ```

use std::sync::Arc;

use crate::vm::object::{CallContext, Class, NativeMethod};
use crate::vm::reflect::class_metadata::{
    ClassMetadata, ConstructorEntry, FieldSlot, MethodEntry, StaticFieldEntry,
};
use crate::vm::reflect::Visibility;
use crate::vm::value::Value;
use crate::vm::VmResult;

/// Definition for a field
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Declared visibility
    pub visibility: Visibility,
    /// Initial value (null when not set)
    pub initial_value: Value,
    /// Whether this is a static field
    pub is_static: bool,
}

impl FieldDefinition {
    /// Create a public instance field initialised to null
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            initial_value: Value::Null,
            is_static: false,
        }
    }

    /// Set the declared visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the initial value
    pub fn initial_value(mut self, value: impl Into<Value>) -> Self {
        self.initial_value = value.into();
        self
    }

    /// Mark as static field
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Definition for a method
#[derive(Clone)]
pub struct MethodDefinition {
    /// Method name
    pub name: String,
    /// Declared visibility
    pub visibility: Visibility,
    /// Whether this is a static method
    pub is_static: bool,
    /// Native implementation
    pub body: NativeMethod,
}

impl MethodDefinition {
    /// Create a public instance method
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&CallContext<'_>, &[Value]) -> VmResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            body: Arc::new(body),
        }
    }

    /// Set the declared visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark as static method
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Definition for a constructor
#[derive(Clone)]
pub struct ConstructorDefinition {
    /// Declared visibility
    pub visibility: Visibility,
    /// Native implementation
    pub body: NativeMethod,
}

impl ConstructorDefinition {
    /// Create a public constructor
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&CallContext<'_>, &[Value]) -> VmResult<Value> + Send + Sync + 'static,
    {
        Self {
            visibility: Visibility::Public,
            body: Arc::new(body),
        }
    }

    /// A constructor storing its positional arguments into `fields`, in order
    pub fn assigning<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        Self::new(move |ctx, args| {
            ctx.expect_args(args, fields.len())?;
            for (field, value) in fields.iter().zip(args) {
                ctx.set(field, value.clone())?;
            }
            Ok(Value::Null)
        })
    }

    /// Set the declared visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Builder assembling a [`Class`] from member definitions
#[derive(Clone)]
pub struct ClassBuilder {
    name: String,
    parent: Option<Arc<Class>>,
    fields: Vec<FieldDefinition>,
    methods: Vec<MethodDefinition>,
    constructor: Option<ConstructorDefinition>,
}

impl ClassBuilder {
    /// Start a root class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructor: None,
        }
    }

    /// Class name being built
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inherit from `parent`
    pub fn extends(mut self, parent: &Arc<Class>) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Add a field (instance or static)
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a method (instance or static)
    pub fn method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    /// Declare the constructor
    pub fn constructor(mut self, constructor: ConstructorDefinition) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Finish the class under `id`
    pub fn build(self, id: usize) -> Class {
        let mut metadata = match &self.parent {
            Some(parent) => ClassMetadata::inheriting(parent.metadata()),
            None => ClassMetadata::new(),
        };

        for field in self.fields {
            if field.is_static {
                metadata.add_static_field(StaticFieldEntry {
                    name: field.name,
                    visibility: field.visibility,
                    initial_value: field.initial_value,
                });
            } else {
                metadata.add_field(FieldSlot {
                    name: field.name,
                    visibility: field.visibility,
                    declaring_class: self.name.clone(),
                    initial_value: field.initial_value,
                });
            }
        }

        for method in self.methods {
            metadata.add_method(MethodEntry {
                name: method.name,
                visibility: method.visibility,
                is_static: method.is_static,
                body: method.body,
            });
        }

        if let Some(constructor) = self.constructor {
            metadata.set_constructor(ConstructorEntry {
                visibility: constructor.visibility,
                body: constructor.body,
            });
        }

        Class::new(id, self.name, self.parent, metadata)
    }
}
