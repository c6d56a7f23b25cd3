//! Class Metadata for Reflection
//!
//! Stores the member tables of a class: the flattened instance field layout
//! (inherited slots first), the methods and static fields the class itself
//! declares, and its constructor. Every entry carries its declared visibility.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::vm::object::NativeMethod;
use crate::vm::value::Value;

/// Declared visibility of a class member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Reachable from anywhere
    #[default]
    Public,
    /// Reachable from the class and its descendants
    Protected,
    /// Reachable from the declaring class only
    Private,
}

impl Visibility {
    /// Check if the member is public
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        };
        f.write_str(s)
    }
}

/// One slot of the instance field layout
#[derive(Debug, Clone)]
pub struct FieldSlot {
    /// Field name
    pub name: String,
    /// Declared visibility
    pub visibility: Visibility,
    /// Name of the class that declared the field
    pub declaring_class: String,
    /// Value the slot holds right after allocation
    pub initial_value: Value,
}

/// A static field declared on the class itself
#[derive(Debug, Clone)]
pub struct StaticFieldEntry {
    /// Field name
    pub name: String,
    /// Declared visibility
    pub visibility: Visibility,
    /// Value the field holds when the class is registered
    pub initial_value: Value,
}

/// A method declared on the class itself
#[derive(Clone)]
pub struct MethodEntry {
    /// Method name
    pub name: String,
    /// Declared visibility
    pub visibility: Visibility,
    /// Static methods run without a receiver
    pub is_static: bool,
    /// Native implementation
    pub body: NativeMethod,
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .finish()
    }
}

/// The constructor declared on the class itself
#[derive(Clone)]
pub struct ConstructorEntry {
    /// Declared visibility
    pub visibility: Visibility,
    /// Native implementation, runs with the new instance as receiver
    pub body: NativeMethod,
}

impl fmt::Debug for ConstructorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorEntry")
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Reflection metadata for a single class
#[derive(Debug, Clone, Default)]
pub struct ClassMetadata {
    /// Field name to slot index mapping (including inherited)
    field_indices: FxHashMap<String, usize>,
    /// Field slots in layout order
    fields: Vec<FieldSlot>,

    /// Method name to index mapping (own declarations only)
    method_indices: FxHashMap<String, usize>,
    /// Declared methods in declaration order
    methods: Vec<MethodEntry>,

    /// Static field name to index mapping (own declarations only)
    static_field_indices: FxHashMap<String, usize>,
    /// Declared static fields in declaration order
    static_fields: Vec<StaticFieldEntry>,

    /// Constructor (if the class declares one)
    constructor: Option<ConstructorEntry>,
}

impl ClassMetadata {
    /// Create new empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the parent's field layout so inherited slots keep their index
    pub fn inheriting(parent: &ClassMetadata) -> Self {
        Self {
            field_indices: parent.field_indices.clone(),
            fields: parent.fields.clone(),
            ..Self::default()
        }
    }

    /// Add an instance field. A redeclared name takes over the inherited slot.
    pub fn add_field(&mut self, slot: FieldSlot) -> usize {
        if let Some(&index) = self.field_indices.get(&slot.name) {
            self.fields[index] = slot;
            return index;
        }
        let index = self.fields.len();
        self.field_indices.insert(slot.name.clone(), index);
        self.fields.push(slot);
        index
    }

    /// Add a method, replacing an earlier declaration of the same name
    pub fn add_method(&mut self, entry: MethodEntry) -> usize {
        if let Some(&index) = self.method_indices.get(&entry.name) {
            self.methods[index] = entry;
            return index;
        }
        let index = self.methods.len();
        self.method_indices.insert(entry.name.clone(), index);
        self.methods.push(entry);
        index
    }

    /// Add a static field, replacing an earlier declaration of the same name
    pub fn add_static_field(&mut self, entry: StaticFieldEntry) -> usize {
        if let Some(&index) = self.static_field_indices.get(&entry.name) {
            self.static_fields[index] = entry;
            return index;
        }
        let index = self.static_fields.len();
        self.static_field_indices.insert(entry.name.clone(), index);
        self.static_fields.push(entry);
        index
    }

    /// Set the constructor
    pub fn set_constructor(&mut self, entry: ConstructorEntry) {
        self.constructor = Some(entry);
    }

    /// Get field slot by name
    pub fn get_field_index(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    /// Get field slot metadata
    pub fn field(&self, index: usize) -> Option<&FieldSlot> {
        self.fields.get(index)
    }

    /// All field slots in layout order
    pub fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    /// Number of instance field slots
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Get method index by name
    pub fn get_method_index(&self, name: &str) -> Option<usize> {
        self.method_indices.get(name).copied()
    }

    /// Get declared method
    pub fn method(&self, index: usize) -> Option<&MethodEntry> {
        self.methods.get(index)
    }

    /// Declared methods
    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    /// Get static field index by name
    pub fn get_static_field_index(&self, name: &str) -> Option<usize> {
        self.static_field_indices.get(name).copied()
    }

    /// Get declared static field
    pub fn static_field(&self, index: usize) -> Option<&StaticFieldEntry> {
        self.static_fields.get(index)
    }

    /// Declared static fields
    pub fn static_fields(&self) -> &[StaticFieldEntry] {
        &self.static_fields
    }

    /// Declared constructor
    pub fn constructor(&self) -> Option<&ConstructorEntry> {
        self.constructor.as_ref()
    }

    /// Check if field exists (including inherited)
    pub fn has_field(&self, name: &str) -> bool {
        self.field_indices.contains_key(name)
    }

    /// Check if the class declares this method itself
    pub fn has_method(&self, name: &str) -> bool {
        self.method_indices.contains_key(name)
    }
}
