//! Shared fixture classes for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use unseal::{
    CallContext, Class, ClassBuilder, ClassRegistry, ConstructorDefinition, FieldDefinition,
    MethodDefinition, ObjectRef, Value, Visibility, VmError, VmResult,
};

fn int_field(ctx: &CallContext<'_>, name: &str) -> VmResult<i64> {
    let value = ctx.get(name)?;
    value.as_int().ok_or_else(|| VmError::TypeMismatch {
        expected: "int".to_string(),
        got: value.type_name().to_string(),
    })
}

/// `getInstance` body shared by the singleton fixtures
fn cached_instance(ctx: &CallContext<'_>, args: &[Value]) -> VmResult<Value> {
    let cached = ctx.get_static("instance")?;
    if !cached.is_null() {
        return Ok(cached);
    }
    let instance = Value::Object(ctx.construct(args)?);
    ctx.set_static("instance", instance.clone())?;
    Ok(instance)
}

fn star() -> ClassBuilder {
    ClassBuilder::new("Star")
        .field(
            FieldDefinition::new("mass")
                .visibility(Visibility::Protected)
                .initial_value("2.02 solar masses"),
        )
        .method(
            MethodDefinition::new("shine", |_, _| Ok(Value::from("shining")))
                .visibility(Visibility::Protected),
        )
}

fn quazar(star: &Arc<Class>) -> ClassBuilder {
    ClassBuilder::new("Quazar")
        .extends(star)
        .field(
            FieldDefinition::new("distance")
                .visibility(Visibility::Protected)
                .initial_value("4.37 l/y"),
        )
        .field(
            FieldDefinition::new("speed")
                .visibility(Visibility::Private)
                .initial_value("299.792.458 m/s"),
        )
        .method(
            MethodDefinition::new("sayHi", |ctx, args| {
                ctx.expect_args(args, 1)?;
                let name = args[0].as_str().unwrap_or_default();
                Ok(Value::from(format!("Hi {}!", name)))
            })
            .visibility(Visibility::Private),
        )
        .method(
            MethodDefinition::new("describe", |ctx, _| {
                let distance = ctx.get("distance")?;
                Ok(Value::from(format!(
                    "{} away",
                    distance.as_str().unwrap_or_default()
                )))
            }),
        )
}

fn inaccessible() -> ClassBuilder {
    ClassBuilder::new("Inaccessible")
        .field(
            FieldDefinition::new("privateProperty")
                .visibility(Visibility::Private)
                .initial_value(true),
        )
        .field(
            FieldDefinition::new("protectedProperty")
                .visibility(Visibility::Protected)
                .initial_value(true),
        )
        .field(
            FieldDefinition::new("privateArray")
                .visibility(Visibility::Private)
                .initial_value(vec![true, false]),
        )
        .field(FieldDefinition::new("publicProperty").initial_value("open"))
        .method(
            MethodDefinition::new("privateMethod", |_, _| Ok(Value::Bool(true)))
                .visibility(Visibility::Private),
        )
        .method(
            MethodDefinition::new("protectedMethod", |_, _| Ok(Value::Bool(true)))
                .visibility(Visibility::Protected),
        )
        .method(
            MethodDefinition::new("nothing", |_, _| Ok(Value::Null))
                .visibility(Visibility::Private),
        )
}

fn singleton() -> ClassBuilder {
    ClassBuilder::new("Singleton")
        .field(
            FieldDefinition::new("instance")
                .visibility(Visibility::Private)
                .as_static(),
        )
        .field(FieldDefinition::new("message").visibility(Visibility::Private))
        .constructor(
            ConstructorDefinition::new(|ctx, _| {
                ctx.set("message", Value::from("Works!"))?;
                Ok(Value::Null)
            })
            .visibility(Visibility::Private),
        )
        .method(MethodDefinition::new("getInstance", cached_instance).as_static())
        .method(MethodDefinition::new("getMessage", |ctx, _| ctx.get("message")))
        .method(MethodDefinition::new("isOk", |_, _| Ok(Value::Bool(true))))
        .method(
            MethodDefinition::new("accessible", |_, _| Ok(Value::Bool(true)))
                .visibility(Visibility::Private),
        )
}

fn calc() -> ClassBuilder {
    ClassBuilder::new("Calc")
        .field(
            FieldDefinition::new("instance")
                .visibility(Visibility::Private)
                .as_static(),
        )
        .field(FieldDefinition::new("a").visibility(Visibility::Private))
        .field(FieldDefinition::new("b").visibility(Visibility::Private))
        .constructor(ConstructorDefinition::assigning(["a", "b"]).visibility(Visibility::Private))
        .method(MethodDefinition::new("getInstance", cached_instance).as_static())
        .method(MethodDefinition::new("sum", |ctx, _| {
            Ok(Value::Int(int_field(ctx, "a")? + int_field(ctx, "b")?))
        }))
}

fn greeter() -> ClassBuilder {
    ClassBuilder::new("Greeter")
        .field(FieldDefinition::new("name").visibility(Visibility::Protected))
        .method(MethodDefinition::new("setName", |ctx, args| {
            ctx.expect_args(args, 1)?;
            ctx.set("name", args[0].clone())?;
            Ok(Value::Null)
        }))
        .method(
            MethodDefinition::new("hasName", |ctx, _| Ok(Value::Bool(!ctx.get("name")?.is_null())))
                .visibility(Visibility::Protected),
        )
        .method(MethodDefinition::new("greet", |ctx, _| {
            if ctx.call("hasName", &[])?.as_bool() == Some(true) {
                let name = ctx.get("name")?;
                Ok(Value::from(format!(
                    "Hello {}!",
                    name.as_str().unwrap_or_default()
                )))
            } else {
                Ok(Value::from("Hello!"))
            }
        }))
}

fn statiq() -> ClassBuilder {
    ClassBuilder::new("Statiq")
        .field(
            FieldDefinition::new("counter")
                .visibility(Visibility::Private)
                .initial_value(0)
                .as_static(),
        )
        .field(
            FieldDefinition::new("label")
                .initial_value("statiq")
                .as_static(),
        )
        .method(
            MethodDefinition::new("increment", |ctx, _| {
                let next = ctx.get_static("counter")?.as_int().unwrap_or(0) + 1;
                ctx.set_static("counter", Value::Int(next))?;
                Ok(Value::Int(next))
            })
            .visibility(Visibility::Private)
            .as_static(),
        )
        .method(MethodDefinition::new("count", |ctx, _| ctx.get_static("counter")).as_static())
        .method(MethodDefinition::new("instanceOnly", |ctx, _| {
            ctx.this()?;
            Ok(Value::Null)
        }))
}

fn plain() -> ClassBuilder {
    ClassBuilder::new("Plain").field(FieldDefinition::new("value").initial_value(1))
}

fn refusing() -> ClassBuilder {
    ClassBuilder::new("Refusing").constructor(
        ConstructorDefinition::new(|_, _| Err(VmError::RuntimeError("refused".to_string())))
            .visibility(Visibility::Private),
    )
}

/// Registry holding every fixture class
pub fn registry() -> Arc<ClassRegistry> {
    let mut registry = ClassRegistry::new();
    let star = registry.define(star()).unwrap();
    registry.define(quazar(&star)).unwrap();
    registry.define(inaccessible()).unwrap();
    let singleton = registry.define(singleton()).unwrap();
    registry
        .define(ClassBuilder::new("LateSingleton").extends(&singleton))
        .unwrap();
    registry.define(calc()).unwrap();
    registry.define(greeter()).unwrap();
    registry.define(statiq()).unwrap();
    registry.define(plain()).unwrap();
    registry.define(refusing()).unwrap();
    Arc::new(registry)
}

/// `new Name()` through the ordinary, visibility-enforcing path
pub fn construct(registry: &ClassRegistry, name: &str) -> ObjectRef {
    registry.construct(name, &[]).unwrap()
}
