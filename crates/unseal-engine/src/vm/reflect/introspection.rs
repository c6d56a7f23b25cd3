//! Class Introspection for Reflection API
//!
//! A [`ClassDescriptor`] hands out member handles resolved by exact name on
//! the class and then on its ancestors, nearest first. Every handle starts
//! locked: it honours the member's declared visibility until
//! [`Member::set_accessible`] is called on it, after which it reaches the
//! member regardless. The flag never reverts.
//!
//! Handles are resolved per call and are not cached. The unlocked flag is a
//! `Cell`, so a handle cannot be shared across threads.

use std::cell::Cell;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::vm::object::{
    check_visibility, invoke_method, run_constructor, Class, ObjectRef, CONSTRUCTOR_NAME,
};
use crate::vm::reflect::Visibility;
use crate::vm::value::Value;
use crate::vm::{VmError, VmResult};

/// Common surface of every member handle
pub trait Member {
    /// Declared member name
    fn name(&self) -> &str;

    /// Declared visibility
    fn visibility(&self) -> Visibility;

    /// Name of the class that declares the member
    fn declaring_class(&self) -> &str;

    /// Whether [`Member::set_accessible`] has been called on this handle
    fn is_unlocked(&self) -> bool;

    /// Lift the visibility check for this handle. Idempotent.
    fn set_accessible(&self);

    /// Check if the member is declared public
    fn is_public(&self) -> bool {
        self.visibility().is_public()
    }

    /// Fail unless the member is public or the handle is unlocked
    fn check_access(&self) -> VmResult<()> {
        if self.is_unlocked() {
            return Ok(());
        }
        check_visibility(self.visibility(), self.declaring_class(), self.name())
    }
}

/// Resolved instance field
#[derive(Debug)]
pub struct FieldHandle {
    owner: Arc<Class>,
    index: usize,
    name: String,
    visibility: Visibility,
    declaring_class: String,
    unlocked: Cell<bool>,
}

impl FieldHandle {
    /// Slot index in the owner's field layout
    pub fn index(&self) -> usize {
        self.index
    }

    /// Read the field from `target`
    pub fn get_value(&self, target: &ObjectRef) -> VmResult<Value> {
        self.check_access()?;
        self.check_receiver(target)?;
        target.read_slot(self.index)
    }

    /// Overwrite the field on `target`
    pub fn set_value(&self, target: &ObjectRef, value: Value) -> VmResult<()> {
        self.check_access()?;
        self.check_receiver(target)?;
        target.write_slot(self.index, value)
    }

    fn check_receiver(&self, target: &ObjectRef) -> VmResult<()> {
        check_receiver(&self.owner, target)
    }
}

impl Member for FieldHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    fn is_unlocked(&self) -> bool {
        self.unlocked.get()
    }

    fn set_accessible(&self) {
        self.unlocked.set(true);
    }
}

/// Resolved method (instance or static)
#[derive(Debug)]
pub struct MethodHandle {
    called: Arc<Class>,
    declaring: Arc<Class>,
    index: usize,
    name: String,
    visibility: Visibility,
    is_static: bool,
    unlocked: Cell<bool>,
}

impl MethodHandle {
    /// Whether the method runs without a receiver
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Invoke with `receiver` and positional `args`.
    ///
    /// Static methods ignore the receiver; instance methods require one of
    /// the resolved class or a subclass.
    pub fn invoke(&self, receiver: Option<&ObjectRef>, args: &[Value]) -> VmResult<Value> {
        self.check_access()?;
        match receiver {
            Some(target) if !self.is_static => {
                check_receiver(&self.declaring, target)?;
                let class = target.class();
                invoke_method(&self.declaring, self.index, &class, Some(target), args)
            }
            _ => invoke_method(&self.declaring, self.index, &self.called, None, args),
        }
    }
}

impl Member for MethodHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn declaring_class(&self) -> &str {
        &self.declaring.name
    }

    fn is_unlocked(&self) -> bool {
        self.unlocked.get()
    }

    fn set_accessible(&self) {
        self.unlocked.set(true);
    }
}

/// Resolved constructor
#[derive(Debug)]
pub struct ConstructorHandle {
    declaring: Arc<Class>,
    visibility: Visibility,
    unlocked: Cell<bool>,
}

impl ConstructorHandle {
    /// Run the constructor on an already allocated `target`, in place
    pub fn invoke(&self, target: &ObjectRef, args: &[Value]) -> VmResult<()> {
        self.check_access()?;
        check_receiver(&self.declaring, target)?;
        run_constructor(&self.declaring, target, args)
    }
}

impl Member for ConstructorHandle {
    fn name(&self) -> &str {
        CONSTRUCTOR_NAME
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn declaring_class(&self) -> &str {
        &self.declaring.name
    }

    fn is_unlocked(&self) -> bool {
        self.unlocked.get()
    }

    fn set_accessible(&self) {
        self.unlocked.set(true);
    }
}

/// Resolved static field
#[derive(Debug)]
pub struct StaticFieldHandle {
    declaring: Arc<Class>,
    index: usize,
    name: String,
    visibility: Visibility,
    unlocked: Cell<bool>,
}

impl StaticFieldHandle {
    /// Read the static value
    pub fn get_value(&self) -> VmResult<Value> {
        self.check_access()?;
        self.declaring.read_static(self.index)
    }

    /// Overwrite the static value
    pub fn set_value(&self, value: Value) -> VmResult<()> {
        self.check_access()?;
        self.declaring.write_static(self.index, value)
    }
}

impl Member for StaticFieldHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn declaring_class(&self) -> &str {
        &self.declaring.name
    }

    fn is_unlocked(&self) -> bool {
        self.unlocked.get()
    }

    fn set_accessible(&self) {
        self.unlocked.set(true);
    }
}

fn check_receiver(owner: &Arc<Class>, target: &ObjectRef) -> VmResult<()> {
    let class = target.class();
    if class.is_subclass_of(owner) {
        Ok(())
    } else {
        Err(VmError::TypeMismatch {
            expected: owner.name.clone(),
            got: class.name.clone(),
        })
    }
}

/// Type metadata for one class
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    class: Arc<Class>,
}

impl ClassDescriptor {
    /// Describe `class`
    pub fn new(class: Arc<Class>) -> Self {
        Self { class }
    }

    /// Describe the runtime class of `object`
    pub fn of(object: &ObjectRef) -> Self {
        Self::new(object.class())
    }

    /// Underlying class
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.class.name
    }

    /// Parent class descriptor
    pub fn parent(&self) -> Option<ClassDescriptor> {
        self.class.parent().cloned().map(Self::new)
    }

    /// Check if the class (or an ancestor) has this instance field
    pub fn has_field(&self, name: &str) -> bool {
        self.class.metadata().has_field(name)
    }

    /// Resolve an instance field
    pub fn field(&self, name: &str) -> Option<FieldHandle> {
        let index = self.class.metadata().get_field_index(name)?;
        self.field_at(index)
    }

    fn field_at(&self, index: usize) -> Option<FieldHandle> {
        let slot = self.class.metadata().field(index)?;
        Some(FieldHandle {
            owner: self.class.clone(),
            index,
            name: slot.name.clone(),
            visibility: slot.visibility,
            declaring_class: slot.declaring_class.clone(),
            unlocked: Cell::new(false),
        })
    }

    /// All instance fields in layout order
    pub fn fields(&self) -> Vec<FieldHandle> {
        (0..self.class.field_count())
            .filter_map(|index| self.field_at(index))
            .collect()
    }

    /// Check if the class (or an ancestor) has this method
    pub fn has_method(&self, name: &str) -> bool {
        self.class.find_method(name).is_some()
    }

    /// Resolve a method
    pub fn method(&self, name: &str) -> Option<MethodHandle> {
        let (declaring, index) = self.class.find_method(name)?;
        self.method_at(declaring, index)
    }

    fn method_at(&self, declaring: Arc<Class>, index: usize) -> Option<MethodHandle> {
        let entry = declaring.metadata().method(index)?;
        Some(MethodHandle {
            called: self.class.clone(),
            name: entry.name.clone(),
            visibility: entry.visibility,
            is_static: entry.is_static,
            declaring,
            index,
            unlocked: Cell::new(false),
        })
    }

    /// All methods, own declarations first; an override hides the ancestor's
    pub fn methods(&self) -> Vec<MethodHandle> {
        let mut seen = FxHashSet::default();
        let mut handles = Vec::new();
        for class in self.class.ancestors() {
            for (index, entry) in class.metadata().methods().iter().enumerate() {
                if seen.insert(entry.name.clone()) {
                    handles.extend(self.method_at(class.clone(), index));
                }
            }
        }
        handles
    }

    /// Resolve the constructor, inherited from the nearest ancestor if the
    /// class declares none
    pub fn constructor(&self) -> Option<ConstructorHandle> {
        let declaring = self.class.find_constructor()?;
        Some(ConstructorHandle {
            visibility: declaring.constructor_visibility(),
            declaring,
            unlocked: Cell::new(false),
        })
    }

    /// Check if the class (or an ancestor) has this static field
    pub fn has_static_field(&self, name: &str) -> bool {
        self.class.find_static_field(name).is_some()
    }

    /// Resolve a static field
    pub fn static_field(&self, name: &str) -> Option<StaticFieldHandle> {
        let (declaring, index) = self.class.find_static_field(name)?;
        let entry = declaring.metadata().static_field(index)?;
        Some(StaticFieldHandle {
            name: entry.name.clone(),
            visibility: entry.visibility,
            declaring,
            index,
            unlocked: Cell::new(false),
        })
    }

    /// Check inheritance relationship
    pub fn is_subclass_of(&self, other: &ClassDescriptor) -> bool {
        self.class.is_subclass_of(&other.class)
    }

    /// Type guard for class membership
    pub fn is_instance(&self, object: &ObjectRef) -> bool {
        object.class().is_subclass_of(&self.class)
    }

    /// Allocate an instance without running any constructor.
    ///
    /// Slots hold their declared initial values; statics are untouched.
    pub fn new_instance_without_constructor(&self) -> ObjectRef {
        self.class.allocate()
    }
}
