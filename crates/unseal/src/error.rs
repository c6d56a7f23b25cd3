//! Toolkit error types.

use unseal_engine::VmError;

/// Errors surfaced by the accessors and the singleton factory.
///
/// None of these are recovered from internally; each one reaches the direct
/// caller unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
    /// A live object was required but something else was supplied
    #[error("Invalid instance provided: expected an object, got {0}")]
    InvalidInstance(String),

    /// The value is not a valid, registered class name
    #[error("Invalid singleton class name provided: \"{0}\"")]
    InvalidSingletonClassName(String),

    /// No method with this name on the class or its ancestors
    #[error("No method \"{method}\" was found on class \"{class}\"")]
    MethodNotFound {
        /// Class searched
        class: String,
        /// Requested method
        method: String,
    },

    /// No field with this name on the class or its ancestors
    #[error("No property \"{property}\" was found on class \"{class}\"")]
    PropertyNotFound {
        /// Class searched
        class: String,
        /// Requested property
        property: String,
    },

    /// The class declares no constructor, so there is nothing to bypass
    #[error("Trying to instantiate a non singleton class: \"{0}\"")]
    NonSingletonClass(String),

    /// Failure raised by the engine or by the invoked member itself
    #[error(transparent)]
    Vm(#[from] VmError),
}

/// Toolkit result
pub type AccessResult<T> = Result<T, AccessError>;
