//! Integration tests for AccessibleStatic

mod common;

use unseal::{AccessError, AccessibleStatic, Reflector, Value, VmError};

fn statics(name: &str) -> AccessibleStatic {
    AccessibleStatic::new(name, Reflector::with_registry(common::registry())).unwrap()
}

#[test]
fn test_get_private_static() {
    let statiq = statics("Statiq");
    assert_eq!(statiq.class_name(), "Statiq");
    assert_eq!(statiq.get("counter").unwrap(), Value::Int(0));
    assert_eq!(statiq.get("label").unwrap(), Value::from("statiq"));
}

#[test]
fn test_call_private_static_method() {
    let statiq = statics("Statiq");
    assert_eq!(statiq.call("increment", &[]).unwrap(), Value::Int(1));
    assert_eq!(statiq.call("increment", &[]).unwrap(), Value::Int(2));
    assert_eq!(statiq.call("count", &[]).unwrap(), Value::Int(2));
}

#[test]
fn test_set_private_static() {
    let registry = common::registry();
    let statiq =
        AccessibleStatic::new("Statiq", Reflector::with_registry(registry.clone())).unwrap();

    statiq.set("counter", 10).unwrap();

    let class = registry.get_class_by_name("Statiq").unwrap();
    assert_eq!(class.call_static("count", &[]).unwrap(), Value::Int(10));
    assert!(matches!(
        class.get_static("counter"),
        Err(VmError::NotAccessible { .. })
    ));
}

#[test]
fn test_read_cached_singleton_slot() {
    let registry = common::registry();
    let statics =
        AccessibleStatic::new("Singleton", Reflector::with_registry(registry.clone())).unwrap();
    assert_eq!(statics.get("instance").unwrap(), Value::Null);

    let class = registry.get_class_by_name("Singleton").unwrap();
    let cached = class.call_static("getInstance", &[]).unwrap();
    assert_eq!(statics.get("instance").unwrap(), cached);
}

#[test]
fn test_unknown_static_members() {
    let statiq = statics("Statiq");
    assert!(matches!(
        statiq.get("missing"),
        Err(AccessError::PropertyNotFound { .. })
    ));
    assert!(matches!(
        statiq.set("missing", 1),
        Err(AccessError::PropertyNotFound { .. })
    ));
    assert!(matches!(
        statiq.call("missing", &[]),
        Err(AccessError::MethodNotFound { .. })
    ));
}

#[test]
fn test_instance_method_needs_receiver() {
    let statiq = statics("Statiq");
    assert!(matches!(
        statiq.call("instanceOnly", &[]),
        Err(AccessError::Vm(VmError::MissingReceiver { .. }))
    ));
}

#[test]
fn test_unknown_class() {
    assert_eq!(
        AccessibleStatic::new("Nowhere", Reflector::with_registry(common::registry())).unwrap_err(),
        AccessError::InvalidSingletonClassName("Nowhere".to_string())
    );
}
