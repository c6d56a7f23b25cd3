//! Integration tests for AccessibleInstance
//!
//! Reads, writes and calls non-public members of live fixture objects.

mod common;

use unseal::{AccessError, AccessibleInstance, Reflector, Value, Visibility, VmError};

fn accessible(name: &str) -> AccessibleInstance {
    let registry = common::registry();
    let target = common::construct(&registry, name);
    AccessibleInstance::new(target, Reflector::with_registry(registry))
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn test_invoke_protected_method() {
    let instance = accessible("Inaccessible");
    assert_eq!(instance.call("protectedMethod", &[]).unwrap(), Value::Bool(true));
}

#[test]
fn test_invoke_private_method() {
    let instance = accessible("Inaccessible");
    assert_eq!(instance.call("privateMethod", &[]).unwrap(), Value::Bool(true));
}

#[test]
fn test_invoke_method_returning_nothing() {
    let instance = accessible("Inaccessible");
    assert_eq!(instance.call("nothing", &[]).unwrap(), Value::Null);
}

#[test]
fn test_private_method_with_arguments() {
    let instance = accessible("Quazar");
    assert_eq!(
        instance.call("sayHi", &[Value::from("Eleandro")]).unwrap(),
        Value::from("Hi Eleandro!")
    );
}

#[test]
fn test_inherited_protected_method() {
    let instance = accessible("Quazar");
    assert_eq!(instance.call("shine", &[]).unwrap(), Value::from("shining"));
}

#[test]
fn test_method_not_found() {
    let instance = accessible("Inaccessible");
    assert_eq!(
        instance.call("blackHole", &[]).unwrap_err(),
        AccessError::MethodNotFound {
            class: "Inaccessible".to_string(),
            method: "blackHole".to_string(),
        }
    );
}

#[test]
fn test_method_errors_propagate() {
    let instance = accessible("Quazar");
    let err = instance.call("sayHi", &[]).unwrap_err();
    assert!(matches!(
        err,
        AccessError::Vm(VmError::ArgumentCount { expected: 1, got: 0, .. })
    ));
}

// ============================================================================
// Fields
// ============================================================================

#[test]
fn test_get_protected_property() {
    let instance = accessible("Inaccessible");
    assert_eq!(instance.get("protectedProperty").unwrap(), Value::Bool(true));
}

#[test]
fn test_get_private_property() {
    let instance = accessible("Inaccessible");
    assert_eq!(instance.get("privateProperty").unwrap(), Value::Bool(true));
}

#[test]
fn test_get_inherited_property() {
    let instance = accessible("Quazar");
    assert_eq!(instance.get("mass").unwrap(), Value::from("2.02 solar masses"));
}

#[test]
fn test_property_not_found_on_get() {
    let instance = accessible("Inaccessible");
    assert_eq!(
        instance.get("nebulosa").unwrap_err(),
        AccessError::PropertyNotFound {
            class: "Inaccessible".to_string(),
            property: "nebulosa".to_string(),
        }
    );
}

#[test]
fn test_property_not_found_on_set() {
    let instance = accessible("Inaccessible");
    assert!(matches!(
        instance.set("unknownProperty", true),
        Err(AccessError::PropertyNotFound { .. })
    ));
}

#[test]
fn test_set_protected_property() {
    let instance = accessible("Inaccessible");
    assert_eq!(instance.get("protectedProperty").unwrap(), Value::Bool(true));

    instance.set("protectedProperty", false).unwrap();

    assert_eq!(instance.get("protectedProperty").unwrap(), Value::Bool(false));
}

#[test]
fn test_set_private_property() {
    let instance = accessible("Inaccessible");
    assert_eq!(instance.get("privateProperty").unwrap(), Value::Bool(true));

    instance.set("privateProperty", false).unwrap();

    assert_eq!(instance.get("privateProperty").unwrap(), Value::Bool(false));
}

#[test]
fn test_public_members_pass_through() {
    let instance = accessible("Inaccessible");
    assert_eq!(instance.get("publicProperty").unwrap(), Value::from("open"));
    instance.set("publicProperty", "shut").unwrap();
    assert_eq!(instance.target().get("publicProperty").unwrap(), Value::from("shut"));
}

// ============================================================================
// Array properties
// ============================================================================

#[test]
fn test_get_private_array_property() {
    let instance = accessible("Inaccessible");
    let array = instance.get("privateArray").unwrap();
    assert_eq!(array.as_array().unwrap(), &[Value::Bool(true), Value::Bool(false)]);
}

#[test]
fn test_set_private_array_property() {
    let instance = accessible("Inaccessible");

    instance.set_array_property_value("privateArray", 1, true).unwrap();

    assert_eq!(
        instance.get("privateArray").unwrap(),
        Value::from(vec![true, true])
    );
}

#[test]
fn test_set_array_property_past_the_end() {
    let instance = accessible("Inaccessible");

    instance.set_array_property_value("privateArray", 3, "tail").unwrap();

    assert_eq!(
        instance.get("privateArray").unwrap().as_array().unwrap(),
        &[
            Value::Bool(true),
            Value::Bool(false),
            Value::Null,
            Value::from("tail"),
        ]
    );
}

#[test]
fn test_set_array_property_index_out_of_range() {
    let instance = accessible("Inaccessible");

    for index in [usize::MAX, usize::MAX / 2] {
        let err = instance
            .set_array_property_value("privateArray", index, true)
            .unwrap_err();
        assert!(matches!(err, AccessError::Vm(VmError::RuntimeError(_))));
    }

    assert_eq!(
        instance.get("privateArray").unwrap(),
        Value::from(vec![true, false])
    );
}

#[test]
fn test_returned_array_is_a_copy() {
    let instance = accessible("Inaccessible");
    let mut array = instance.get("privateArray").unwrap();
    array.set_index(0, Value::Bool(false)).unwrap();

    assert_eq!(
        instance.get("privateArray").unwrap(),
        Value::from(vec![true, false])
    );
}

#[test]
fn test_set_array_property_on_scalar_fails() {
    let instance = accessible("Inaccessible");
    let err = instance
        .set_array_property_value("privateProperty", 0, true)
        .unwrap_err();
    assert!(matches!(err, AccessError::Vm(VmError::TypeMismatch { .. })));
    assert_eq!(instance.get("privateProperty").unwrap(), Value::Bool(true));
}

// ============================================================================
// Target binding
// ============================================================================

#[test]
fn test_scenario_quazar() {
    let instance = accessible("Quazar");

    assert_eq!(instance.get("distance").unwrap(), Value::from("4.37 l/y"));
    assert_eq!(instance.get("speed").unwrap(), Value::from("299.792.458 m/s"));
    assert_eq!(
        instance.call("sayHi", &[Value::from("Eleandro")]).unwrap(),
        Value::from("Hi Eleandro!")
    );

    instance.set("distance", "5 l/y").unwrap();
    assert_eq!(instance.get("distance").unwrap(), Value::from("5 l/y"));

    assert!(matches!(
        instance.get("unknown"),
        Err(AccessError::PropertyNotFound { .. })
    ));
}

#[test]
fn test_proxy_writes_reach_the_target() {
    let instance = accessible("Quazar");
    instance.set("distance", "9 l/y").unwrap();
    assert_eq!(
        instance.target().call("describe", &[]).unwrap(),
        Value::from("9 l/y away")
    );
}

#[test]
fn test_target_writes_reach_the_proxy() {
    let instance = accessible("Greeter");
    instance
        .target()
        .call("setName", &[Value::from("Yomi")])
        .unwrap();
    assert_eq!(instance.get("name").unwrap(), Value::from("Yomi"));
    assert_eq!(instance.call("hasName", &[]).unwrap(), Value::Bool(true));
}

#[test]
fn test_target_still_enforces_visibility() {
    let instance = accessible("Inaccessible");
    instance.get("privateProperty").unwrap();
    assert!(matches!(
        instance.target().get("privateProperty"),
        Err(VmError::NotAccessible { visibility: Visibility::Private, .. })
    ));
}

#[test]
fn test_from_value_requires_object() {
    let reflector = Reflector::new();
    assert_eq!(
        AccessibleInstance::from_value(&Value::from("Pluto"), reflector.clone()).unwrap_err(),
        AccessError::InvalidInstance("string".to_string())
    );

    let registry = common::registry();
    let target = common::construct(&registry, "Greeter");
    let instance =
        AccessibleInstance::from_value(&Value::Object(target.clone()), reflector).unwrap();
    assert!(instance.target().ptr_eq(&target));
    assert_eq!(instance.class_name(), "Greeter");
}
