//! Class manifest parsing (unseal.toml)
//!
//! Declares classes without writing Rust: fields with visibility and
//! defaults, an optional parent, and an optional constructor that stores its
//! positional arguments into named fields. Method bodies can only be given
//! from Rust through [`ClassBuilder`].
//!
//! ```toml
//! [[class]]
//! name = "Calc"
//!
//! [[class.field]]
//! name = "a"
//! visibility = "private"
//! default = 0
//!
//! [class.constructor]
//! visibility = "private"
//! assigns = ["a"]
//! ```

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vm::reflect::{ClassBuilder, ConstructorDefinition, FieldDefinition, Visibility};
use crate::vm::{Class, ClassRegistry, Value, VmError};

/// Errors that can occur while loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid manifest: {0}")]
    ValidationError(String),

    /// Registration rejected by the registry
    #[error("Failed to register class: {0}")]
    Vm(#[from] VmError),
}

/// A set of class declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassManifest {
    /// Classes in declaration order
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassSpec>,
}

/// One declared class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassSpec {
    /// Class name (must be unique in the registry)
    pub name: String,

    /// Parent class name, registered earlier or declared above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Declared fields
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldSpec>,

    /// Declared constructor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor: Option<ConstructorSpec>,
}

/// One declared field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    /// Field name
    pub name: String,

    /// Declared visibility (default public)
    #[serde(default)]
    pub visibility: Visibility,

    /// Initial value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<toml::Value>,

    /// Static field
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

/// A constructor that assigns its arguments to fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstructorSpec {
    /// Declared visibility (default public)
    #[serde(default)]
    pub visibility: Visibility,

    /// Fields receiving the positional arguments, in order
    #[serde(default)]
    pub assigns: Vec<String>,
}

impl ClassManifest {
    /// Load a manifest from a file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a manifest from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: ClassManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest on its own (parents are checked on registration)
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut names = FxHashSet::default();
        for class in &self.classes {
            if class.name.is_empty() {
                return Err(ManifestError::ValidationError(
                    "Class name cannot be empty".to_string(),
                ));
            }
            if !names.insert(class.name.as_str()) {
                return Err(ManifestError::ValidationError(format!(
                    "Class '{}' is declared twice",
                    class.name
                )));
            }
            for field in &class.fields {
                if field.name.is_empty() {
                    return Err(ManifestError::ValidationError(format!(
                        "Class '{}' has a field with an empty name",
                        class.name
                    )));
                }
                if let Some(default) = &field.default {
                    convert_value(default).map_err(|kind| {
                        ManifestError::ValidationError(format!(
                            "Field '{}.{}' has unsupported default of type {}",
                            class.name, field.name, kind
                        ))
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Register every class, in order, into `registry`.
    ///
    /// Parents and constructor assignments are checked for the whole
    /// manifest before anything is registered.
    pub fn register_into(
        &self,
        registry: &mut ClassRegistry,
    ) -> Result<Vec<Arc<Class>>, ManifestError> {
        self.validate()?;
        self.check_against(registry)?;

        let mut registered = Vec::with_capacity(self.classes.len());
        for spec in &self.classes {
            let builder = spec.to_builder(registry)?;
            registered.push(registry.define(builder)?);
        }
        Ok(registered)
    }

    fn check_against(&self, registry: &ClassRegistry) -> Result<(), ManifestError> {
        let mut declared: Vec<&ClassSpec> = Vec::new();
        for spec in &self.classes {
            if registry.contains(&spec.name) {
                return Err(VmError::DuplicateClass(spec.name.clone()).into());
            }

            let mut field_names: FxHashSet<String> = spec
                .fields
                .iter()
                .filter(|field| !field.is_static)
                .map(|field| field.name.clone())
                .collect();

            let mut parent = spec.parent.as_deref();
            while let Some(parent_name) = parent {
                if let Some(earlier) = declared.iter().find(|c| c.name == parent_name) {
                    field_names.extend(
                        earlier
                            .fields
                            .iter()
                            .filter(|field| !field.is_static)
                            .map(|field| field.name.clone()),
                    );
                    parent = earlier.parent.as_deref();
                } else if let Some(class) = registry.get_class_by_name(parent_name) {
                    field_names.extend(
                        class
                            .metadata()
                            .fields()
                            .iter()
                            .map(|slot| slot.name.clone()),
                    );
                    parent = None;
                } else {
                    return Err(VmError::ClassNotFound(parent_name.to_string()).into());
                }
            }

            if let Some(constructor) = &spec.constructor {
                if let Some(missing) = constructor
                    .assigns
                    .iter()
                    .find(|name| !field_names.contains(name.as_str()))
                {
                    return Err(ManifestError::ValidationError(format!(
                        "Constructor of '{}' assigns unknown field '{}'",
                        spec.name, missing
                    )));
                }
            }
            declared.push(spec);
        }
        Ok(())
    }
}

impl ClassSpec {
    fn to_builder(&self, registry: &ClassRegistry) -> Result<ClassBuilder, ManifestError> {
        let mut builder = ClassBuilder::new(self.name.clone());
        if let Some(parent_name) = &self.parent {
            let parent = registry
                .get_class_by_name(parent_name)
                .ok_or_else(|| VmError::ClassNotFound(parent_name.clone()))?;
            builder = builder.extends(parent);
        }

        for field in &self.fields {
            let mut definition =
                FieldDefinition::new(field.name.clone()).visibility(field.visibility);
            if let Some(default) = &field.default {
                let value = convert_value(default).map_err(|kind| {
                    ManifestError::ValidationError(format!(
                        "Field '{}.{}' has unsupported default of type {}",
                        self.name, field.name, kind
                    ))
                })?;
                definition = definition.initial_value(value);
            }
            if field.is_static {
                definition = definition.as_static();
            }
            builder = builder.field(definition);
        }

        if let Some(constructor) = &self.constructor {
            builder = builder.constructor(
                ConstructorDefinition::assigning(constructor.assigns.clone())
                    .visibility(constructor.visibility),
            );
        }
        Ok(builder)
    }
}

/// Convert a TOML value, reporting the offending kind on failure
fn convert_value(value: &toml::Value) -> Result<Value, &'static str> {
    match value {
        toml::Value::String(s) => Ok(Value::Str(s.clone())),
        toml::Value::Integer(i) => Ok(Value::Int(*i)),
        toml::Value::Float(f) => Ok(Value::Float(*f)),
        toml::Value::Boolean(b) => Ok(Value::Bool(*b)),
        toml::Value::Array(items) => items
            .iter()
            .map(convert_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        toml::Value::Datetime(_) => Err("datetime"),
        toml::Value::Table(_) => Err("table"),
    }
}
