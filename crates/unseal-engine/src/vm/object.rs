//! Object model and class system

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::vm::reflect::{ClassMetadata, Visibility};
use crate::vm::value::Value;
use crate::vm::{VmError, VmResult};

/// Name under which constructors appear in errors and reflection
pub const CONSTRUCTOR_NAME: &str = "constructor";

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique object ID
fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Native implementation of a method or constructor.
///
/// The body runs in class scope: through the [`CallContext`] it can reach
/// every member of its receiver and class, whatever their visibility.
pub type NativeMethod = Arc<dyn Fn(&CallContext<'_>, &[Value]) -> VmResult<Value> + Send + Sync>;

/// Object instance
#[derive(Debug)]
pub struct Object {
    /// Unique object ID (assigned on creation)
    pub object_id: u64,
    /// Runtime class
    class: Arc<Class>,
    /// Field values, indexed by the class field layout
    pub fields: Vec<Value>,
}

impl Object {
    /// Create an object whose slots hold the declared initial values
    pub fn new(class: Arc<Class>) -> Self {
        let fields = class
            .metadata()
            .fields()
            .iter()
            .map(|slot| slot.initial_value.clone())
            .collect();
        Self {
            object_id: generate_object_id(),
            class,
            fields,
        }
    }

    /// Runtime class of the object
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Get a field value by index
    pub fn get_field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Set a field value by index
    pub fn set_field(&mut self, index: usize, value: Value) -> VmResult<()> {
        match self.fields.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(VmError::RuntimeError(format!(
                "Field index {} out of bounds (object has {} fields)",
                index,
                self.fields.len()
            ))),
        }
    }

    /// Get number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Shared handle to a live object.
///
/// Cloning the handle never copies the object; every clone observes the
/// same state.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Object>>);

impl ObjectRef {
    /// Wrap a freshly built object
    pub fn new(object: Object) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// Unique object ID
    pub fn object_id(&self) -> u64 {
        self.0.read().object_id
    }

    /// Runtime class
    pub fn class(&self) -> Arc<Class> {
        self.0.read().class.clone()
    }

    /// Runtime class name
    pub fn class_name(&self) -> String {
        self.0.read().class.name.clone()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn read_slot(&self, index: usize) -> VmResult<Value> {
        let object = self.0.read();
        object.get_field(index).cloned().ok_or_else(|| {
            VmError::RuntimeError(format!(
                "Field index {} out of bounds (object has {} fields)",
                index,
                object.field_count()
            ))
        })
    }

    pub(crate) fn write_slot(&self, index: usize, value: Value) -> VmResult<()> {
        self.0.write().set_field(index, value)
    }

    /// Read a public field
    pub fn get(&self, name: &str) -> VmResult<Value> {
        let class = self.class();
        let index = field_index(&class, name)?;
        ensure_public(&class, index, name)?;
        self.read_slot(index)
    }

    /// Write a public field
    pub fn set(&self, name: &str, value: Value) -> VmResult<()> {
        let class = self.class();
        let index = field_index(&class, name)?;
        ensure_public(&class, index, name)?;
        self.write_slot(index, value)
    }

    /// Call a public method with this object as receiver
    pub fn call(&self, name: &str, args: &[Value]) -> VmResult<Value> {
        let class = self.class();
        let (declaring, index) = method_index(&class, name)?;
        check_visibility(declaring.method_visibility(index), &declaring.name, name)?;
        invoke_method(&declaring, index, &class, Some(self), args)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(object) => write!(f, "{}#{}", object.class.name, object.object_id),
            None => write!(f, "<locked object>"),
        }
    }
}

/// Class definition
pub struct Class {
    /// Class ID (index into the registry)
    pub id: usize,
    /// Class name
    pub name: String,
    /// Parent class (None for root classes)
    parent: Option<Arc<Class>>,
    /// Member tables
    metadata: ClassMetadata,
    /// Static field values, indexed like `metadata.static_fields()`
    statics: RwLock<Vec<Value>>,
}

impl Class {
    /// Create a class from its member tables
    pub fn new(
        id: usize,
        name: String,
        parent: Option<Arc<Class>>,
        metadata: ClassMetadata,
    ) -> Self {
        let statics = metadata
            .static_fields()
            .iter()
            .map(|entry| entry.initial_value.clone())
            .collect();
        Self {
            id,
            name,
            parent,
            metadata,
            statics: RwLock::new(statics),
        }
    }

    /// Parent class
    pub fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// Member tables
    pub fn metadata(&self) -> &ClassMetadata {
        &self.metadata
    }

    /// Number of instance fields (including inherited)
    pub fn field_count(&self) -> usize {
        self.metadata.field_count()
    }

    /// Check whether `self` is `other` or descends from it
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if std::ptr::eq(class, other) {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }

    /// The class itself followed by its ancestors, nearest first
    pub fn ancestors(self: &Arc<Self>) -> impl Iterator<Item = Arc<Class>> {
        std::iter::successors(Some(self.clone()), |class| class.parent.clone())
    }

    /// Find a method on the class or its ancestors
    pub fn find_method(self: &Arc<Self>, name: &str) -> Option<(Arc<Class>, usize)> {
        self.ancestors().find_map(|class| {
            let index = class.metadata.get_method_index(name)?;
            Some((class, index))
        })
    }

    /// Find a static field on the class or its ancestors
    pub fn find_static_field(self: &Arc<Self>, name: &str) -> Option<(Arc<Class>, usize)> {
        self.ancestors().find_map(|class| {
            let index = class.metadata.get_static_field_index(name)?;
            Some((class, index))
        })
    }

    /// Nearest class in the hierarchy that declares a constructor
    pub fn find_constructor(self: &Arc<Self>) -> Option<Arc<Class>> {
        self.ancestors()
            .find(|class| class.metadata.constructor().is_some())
    }

    pub(crate) fn method_visibility(&self, index: usize) -> Visibility {
        self.metadata
            .method(index)
            .map(|entry| entry.visibility)
            .unwrap_or_default()
    }

    pub(crate) fn static_visibility(&self, index: usize) -> Visibility {
        self.metadata
            .static_field(index)
            .map(|entry| entry.visibility)
            .unwrap_or_default()
    }

    pub(crate) fn constructor_visibility(&self) -> Visibility {
        self.metadata
            .constructor()
            .map(|entry| entry.visibility)
            .unwrap_or_default()
    }

    /// Allocate an instance without running any constructor
    pub(crate) fn allocate(self: &Arc<Self>) -> ObjectRef {
        ObjectRef::new(Object::new(self.clone()))
    }

    pub(crate) fn read_static(&self, index: usize) -> VmResult<Value> {
        self.statics.read().get(index).cloned().ok_or_else(|| {
            VmError::RuntimeError(format!("Static index {} out of bounds on {}", index, self.name))
        })
    }

    pub(crate) fn write_static(&self, index: usize, value: Value) -> VmResult<()> {
        match self.statics.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(VmError::RuntimeError(format!(
                "Static index {} out of bounds on {}",
                index, self.name
            ))),
        }
    }

    /// Call a public static method
    pub fn call_static(self: &Arc<Self>, name: &str, args: &[Value]) -> VmResult<Value> {
        let (declaring, index) = method_index(self, name)?;
        check_visibility(declaring.method_visibility(index), &declaring.name, name)?;
        invoke_method(&declaring, index, self, None, args)
    }

    /// Read a public static field
    pub fn get_static(self: &Arc<Self>, name: &str) -> VmResult<Value> {
        let (declaring, index) = static_index(self, name)?;
        check_visibility(declaring.static_visibility(index), &declaring.name, name)?;
        declaring.read_static(index)
    }

    /// `new Class(args)`: allocate and run the constructor, which must be public
    pub fn instantiate(self: &Arc<Self>, args: &[Value]) -> VmResult<ObjectRef> {
        let constructor = self.find_constructor();
        if let Some(declaring) = &constructor {
            check_visibility(
                declaring.constructor_visibility(),
                &declaring.name,
                CONSTRUCTOR_NAME,
            )?;
        }
        let object = self.allocate();
        if let Some(declaring) = constructor {
            run_constructor(&declaring, &object, args)?;
        }
        Ok(object)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .field("metadata", &self.metadata)
            .finish()
    }
}

fn field_index(class: &Class, name: &str) -> VmResult<usize> {
    class
        .metadata
        .get_field_index(name)
        .ok_or_else(|| VmError::FieldNotFound {
            class: class.name.clone(),
            field: name.to_string(),
        })
}

fn method_index(class: &Arc<Class>, name: &str) -> VmResult<(Arc<Class>, usize)> {
    class
        .find_method(name)
        .ok_or_else(|| VmError::MethodNotFound {
            class: class.name.clone(),
            method: name.to_string(),
        })
}

fn static_index(class: &Arc<Class>, name: &str) -> VmResult<(Arc<Class>, usize)> {
    class
        .find_static_field(name)
        .ok_or_else(|| VmError::FieldNotFound {
            class: class.name.clone(),
            field: name.to_string(),
        })
}

fn ensure_public(class: &Class, index: usize, name: &str) -> VmResult<()> {
    match class.metadata.field(index) {
        Some(slot) => check_visibility(slot.visibility, &slot.declaring_class, name),
        None => Ok(()),
    }
}

pub(crate) fn check_visibility(visibility: Visibility, class: &str, member: &str) -> VmResult<()> {
    if visibility.is_public() {
        Ok(())
    } else {
        Err(VmError::NotAccessible {
            class: class.to_string(),
            member: member.to_string(),
            visibility,
        })
    }
}

/// Run method `index` of `declaring` with no visibility check.
///
/// `called` is the class the call was resolved from; static bodies see it as
/// their class so `construct` builds the subclass when called through one.
pub(crate) fn invoke_method(
    declaring: &Arc<Class>,
    index: usize,
    called: &Arc<Class>,
    receiver: Option<&ObjectRef>,
    args: &[Value],
) -> VmResult<Value> {
    let entry = declaring.metadata.method(index).ok_or_else(|| {
        VmError::RuntimeError(format!("Method index {} out of bounds on {}", index, declaring.name))
    })?;
    let this = if entry.is_static {
        None
    } else {
        Some(receiver.ok_or_else(|| VmError::MissingReceiver {
            class: declaring.name.clone(),
            method: entry.name.clone(),
        })?)
    };
    let ctx = CallContext {
        class: called,
        this,
        callee: &entry.name,
    };
    (entry.body)(&ctx, args)
}

/// Run the constructor declared by `declaring` on an allocated object
pub(crate) fn run_constructor(
    declaring: &Arc<Class>,
    object: &ObjectRef,
    args: &[Value],
) -> VmResult<()> {
    let entry = declaring.metadata.constructor().ok_or_else(|| VmError::MethodNotFound {
        class: declaring.name.clone(),
        method: CONSTRUCTOR_NAME.to_string(),
    })?;
    let class = object.class();
    let ctx = CallContext {
        class: &class,
        this: Some(object),
        callee: CONSTRUCTOR_NAME,
    };
    (entry.body)(&ctx, args)?;
    Ok(())
}

/// Class-scope view handed to native method bodies
pub struct CallContext<'a> {
    class: &'a Arc<Class>,
    this: Option<&'a ObjectRef>,
    callee: &'a str,
}

impl<'a> CallContext<'a> {
    /// The receiver; fails inside static methods
    pub fn this(&self) -> VmResult<&'a ObjectRef> {
        self.this.ok_or_else(|| VmError::MissingReceiver {
            class: self.class.name.clone(),
            method: self.callee.to_string(),
        })
    }

    /// Class the call was resolved from
    pub fn class(&self) -> &Arc<Class> {
        self.class
    }

    /// Name of the running method
    pub fn callee(&self) -> &str {
        self.callee
    }

    /// Fail unless exactly `expected` arguments were passed
    pub fn expect_args(&self, args: &[Value], expected: usize) -> VmResult<()> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(VmError::ArgumentCount {
                callee: format!("{}::{}", self.class.name, self.callee),
                expected,
                got: args.len(),
            })
        }
    }

    /// Read any field of the receiver
    pub fn get(&self, name: &str) -> VmResult<Value> {
        let this = self.this()?;
        let class = this.class();
        this.read_slot(field_index(&class, name)?)
    }

    /// Write any field of the receiver
    pub fn set(&self, name: &str, value: Value) -> VmResult<()> {
        let this = self.this()?;
        let class = this.class();
        this.write_slot(field_index(&class, name)?, value)
    }

    /// Call any method of the receiver (or of the class, for static methods)
    pub fn call(&self, name: &str, args: &[Value]) -> VmResult<Value> {
        match self.this {
            Some(this) => {
                let class = this.class();
                let (declaring, index) = method_index(&class, name)?;
                invoke_method(&declaring, index, &class, Some(this), args)
            }
            None => {
                let (declaring, index) = method_index(self.class, name)?;
                invoke_method(&declaring, index, self.class, None, args)
            }
        }
    }

    /// Read any static field visible from the class
    pub fn get_static(&self, name: &str) -> VmResult<Value> {
        let (declaring, index) = static_index(self.class, name)?;
        declaring.read_static(index)
    }

    /// Write any static field visible from the class
    pub fn set_static(&self, name: &str, value: Value) -> VmResult<()> {
        let (declaring, index) = static_index(self.class, name)?;
        declaring.write_static(index, value)
    }

    /// `new static(args)`: build an instance of the class from inside it,
    /// running the constructor whatever its visibility
    pub fn construct(&self, args: &[Value]) -> VmResult<ObjectRef> {
        let object = self.class.allocate();
        if let Some(declaring) = self.class.find_constructor() {
            run_constructor(&declaring, &object, args)?;
        }
        Ok(object)
    }
}
