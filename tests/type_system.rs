mod common;
use crate::common::builders::{ObjectDefBuilder, node, registry};

use specmate::tree::NodeKind;
use specmate::types::{
    TypeDescriptor, TypeError, TypeRegistry, TypedValue, infer, make_default, make_type, methods_for,
};

fn person_registry() -> TypeRegistry {
    registry([ObjectDefBuilder::new("Person")
        .required("name", "string")
        .optional("age", "int")
        .build()])
}

#[test]
fn custom_object_with_optional_property_absent() {
    let reg = person_registry();
    let value = make_type(&reg, "Person", &node::object([("name", node::string("a"))]))
        .expect("name alone is enough");

    let TypedValue::Object(obj) = &value else {
        panic!("expected object, got {value:?}");
    };
    assert_eq!(obj.type_name, "Person");
    assert_eq!(obj.fields.get("name"), Some(&TypedValue::String("a".into())));
    assert!(!obj.fields.contains_key("age"));
}

#[test]
fn custom_object_missing_required_property() {
    let reg = person_registry();
    let err = make_type(&reg, "Person", &node::object([])).unwrap_err();
    assert_eq!(err, TypeError::MissingProperty("name".into()));
    assert_eq!(err.to_string(), "missing required property name");
}

#[test]
fn custom_object_property_type_mismatch() {
    let reg = person_registry();
    let err = make_type(
        &reg,
        "Person",
        &node::object([("name", node::string("a")), ("age", node::string("x"))]),
    )
    .unwrap_err();

    match err {
        TypeError::Property { property, source } => {
            assert_eq!(property, "age");
            assert_eq!(
                *source,
                TypeError::Mismatch {
                    expected: "int".into(),
                    found: "string".into()
                }
            );
        }
        other => panic!("expected property error, got {other:?}"),
    }
}

#[test]
fn nested_objects_and_lists_type_recursively() {
    let reg = registry([
        ObjectDefBuilder::new("Team")
            .required("lead", "Person")
            .optional("members", "list:Person")
            .build(),
        ObjectDefBuilder::new("Person").required("name", "string").build(),
    ]);

    let team = node::object([
        ("lead", node::object([("name", node::string("ada"))])),
        (
            "members",
            node::array([
                node::object([("name", node::string("bob"))]),
                node::object([("nick", node::string("c"))]),
            ]),
        ),
    ]);

    let err = make_type(&reg, "Team", &team).unwrap_err();
    assert_eq!(
        err.to_string(),
        "property members: element 1: missing required property name"
    );
}

#[test]
fn lists_reject_mismatched_elements() {
    let reg = TypeRegistry::new();
    let list = node::array([node::int(1), node::string("2"), node::int(3)]);

    let err = make_type(&reg, "list:int", &list).unwrap_err();
    assert!(matches!(err, TypeError::Element { index: 1, .. }), "{err:?}");

    let ok = make_type(&reg, "list:list:int", &node::array([node::array([node::int(1)])]))
        .expect("nested list");
    assert_eq!(ok.type_name(), "list:list:int");
}

#[test]
fn ints_are_never_widened_to_floats() {
    let reg = TypeRegistry::new();
    let err = make_type(&reg, "float", &node::int(3)).unwrap_err();
    assert_eq!(
        err,
        TypeError::Mismatch {
            expected: "float".into(),
            found: "int".into()
        }
    );

    assert!(TypeDescriptor::Int.accepts_kind(NodeKind::Int));
    assert!(!TypeDescriptor::Float.accepts_kind(NodeKind::Int));
    assert!(!TypeDescriptor::String.accepts_kind(NodeKind::Null));
}

#[test]
fn unknown_object_types_are_reported() {
    let err = make_type(&TypeRegistry::new(), "Server", &node::object([])).unwrap_err();
    assert_eq!(err, TypeError::UnknownType("Server".into()));

    let err = TypeDescriptor::parse("list:").unwrap_err();
    assert_eq!(err, TypeError::UnknownType(String::new()));
}

#[test]
fn unknown_methods_yield_typed_errors() {
    let err = TypedValue::Int(1)
        .call_method("frobnicate", &[])
        .unwrap_err();
    assert_eq!(
        err,
        TypeError::UnknownMethod {
            type_name: "int".into(),
            method: "frobnicate".into()
        }
    );
    assert_eq!(err.to_string(), "type int has no method frobnicate");

    let reg = person_registry();
    let person = make_type(&reg, "Person", &node::object([("name", node::string("a"))])).unwrap();
    let err = person.call_method("len", &[]).unwrap_err();
    assert_eq!(err.to_string(), "type Person has no method len");
}

#[test]
fn object_get_validates_arguments() {
    let reg = person_registry();
    let person = make_type(&reg, "Person", &node::object([("name", node::string("a"))])).unwrap();

    assert_eq!(
        person.call_method("get", &[TypedValue::String("name".into())]),
        Ok(TypedValue::String("a".into()))
    );
    assert!(matches!(
        person.call_method("get", &[]),
        Err(TypeError::Arity { found: 0, .. })
    ));
    assert!(matches!(
        person.call_method("get", &[TypedValue::Int(1)]),
        Err(TypeError::Argument { .. })
    ));
    assert_eq!(
        person.call_method("get", &[TypedValue::String("age".into())]),
        Err(TypeError::NoSuchField {
            type_name: "Person".into(),
            field: "age".into()
        })
    );
}

#[test]
fn method_tables_and_descriptions() {
    let value = TypedValue::Int(5);
    assert!(value.method_names().contains(&"range"));
    assert_eq!(
        value.method_description("range").as_deref(),
        Some("int.range(min int, max int) : Whether min <= value <= max")
    );
    assert_eq!(value.method_description("nope"), None);

    let names: Vec<&str> = methods_for(&TypeDescriptor::Object("Person".into()))
        .iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["get"]);
    assert_eq!(
        TypedValue::Null.method_names(),
        vec!["isNull"]
    );
}

#[test]
fn numeric_methods() {
    let int = TypedValue::Int(8080);
    let call = |v: &TypedValue, m: &str, args: &[TypedValue]| v.call_method(m, args);

    assert_eq!(
        call(&int, "range", &[TypedValue::Int(1), TypedValue::Int(65535)]),
        Ok(TypedValue::Bool(true))
    );
    assert_eq!(call(&int, "gt", &[TypedValue::Int(8080)]), Ok(TypedValue::Bool(false)));
    assert_eq!(call(&int, "gte", &[TypedValue::Int(8080)]), Ok(TypedValue::Bool(true)));
    assert_eq!(call(&int, "toFloat", &[]), Ok(TypedValue::Float(8080.0)));
    assert!(matches!(
        call(&int, "gt", &[TypedValue::Float(1.0)]),
        Err(TypeError::Argument { index: 0, .. })
    ));

    let float = TypedValue::Float(-2.75);
    assert_eq!(call(&float, "toInt", &[]), Ok(TypedValue::Int(-2)));
    assert_eq!(call(&float, "lt", &[TypedValue::Float(0.0)]), Ok(TypedValue::Bool(true)));
    assert!(call(&TypedValue::Float(f64::NAN), "toInt", &[]).is_err());
}

#[test]
fn string_methods() {
    let s = TypedValue::String("héllo".into());
    let arg = |x: &str| TypedValue::String(x.into());

    assert_eq!(s.call_method("len", &[]), Ok(TypedValue::Int(5)));
    assert_eq!(s.call_method("startsWith", &[arg("hé")]), Ok(TypedValue::Bool(true)));
    assert_eq!(s.call_method("endsWith", &[arg("x")]), Ok(TypedValue::Bool(false)));
    assert_eq!(s.call_method("matches", &[arg("^h.llo$")]), Ok(TypedValue::Bool(true)));
    assert_eq!(
        s.call_method("oneOf", &[arg("a"), arg("héllo")]),
        Ok(TypedValue::Bool(true))
    );
    assert_eq!(s.call_method("toUpper", &[]), Ok(arg("HÉLLO")));
    assert!(matches!(
        s.call_method("matches", &[arg("(")]),
        Err(TypeError::InvalidRegex { .. })
    ));
    assert!(matches!(
        s.call_method("oneOf", &[]),
        Err(TypeError::Arity { .. })
    ));

    assert_eq!(arg(" 42 ").call_method("toInt", &[]), Ok(TypedValue::Int(42)));
    assert!(arg("4x").call_method("toInt", &[]).is_err());
}

#[test]
fn list_methods() {
    let reg = TypeRegistry::new();
    let list = make_type(
        &reg,
        "list:string",
        &node::array([node::string("a"), node::string("b")]),
    )
    .unwrap();

    assert_eq!(list.call_method("len", &[]), Ok(TypedValue::Int(2)));
    assert_eq!(
        list.call_method("at", &[TypedValue::Int(1)]),
        Ok(TypedValue::String("b".into()))
    );
    assert_eq!(
        list.call_method("at", &[TypedValue::Int(2)]),
        Err(TypeError::IndexOutOfBounds { index: 2, len: 2 })
    );
    assert_eq!(
        list.call_method("at", &[TypedValue::Int(-1)]),
        Err(TypeError::IndexOutOfBounds { index: -1, len: 2 })
    );
    assert_eq!(
        list.call_method("contains", &[TypedValue::String("a".into())]),
        Ok(TypedValue::Bool(true))
    );
    assert_eq!(
        list.call_method("contains", &[TypedValue::Int(1)]),
        Err(TypeError::Incomparable {
            left: "string".into(),
            right: "int".into(),
        })
    );
    let contains = list
        .methods()
        .iter()
        .find(|m| m.name == "contains")
        .expect("list.contains");
    assert!(contains.description.contains("another element type is an error"));
}

#[test]
fn defaults_convert_through_the_descriptor() {
    assert_eq!(make_default("int", "8_080"), Ok(TypedValue::Int(8080)));
    assert_eq!(make_default("float", "0.5"), Ok(TypedValue::Float(0.5)));
    assert_eq!(make_default("bool", "true"), Ok(TypedValue::Bool(true)));
    assert_eq!(make_default("string", "x y"), Ok(TypedValue::String("x y".into())));
    assert!(matches!(
        make_default("bool", "yes"),
        Err(TypeError::InvalidConversion { .. })
    ));
    assert!(make_default("list:int", "1").is_err());
}

#[test]
fn inference_uses_intrinsic_tags() {
    assert_eq!(infer(&node::null()), TypedValue::Null);
    assert_eq!(infer(&node::bool(true)), TypedValue::Bool(true));
    assert_eq!(infer(&node::array([node::int(1), node::int(2)])).type_name(), "list:int");
    assert_eq!(infer(&node::array([node::int(1), node::float(2.0)])).type_name(), "list:any");
    assert_eq!(infer(&node::object([("a", node::int(1))])).type_name(), "object");
}

#[test]
fn comparisons_are_strict() {
    assert_eq!(TypedValue::Int(1).equals(&TypedValue::Int(1)), Ok(true));
    assert_eq!(TypedValue::Null.equals(&TypedValue::Int(1)), Ok(false));
    assert!(TypedValue::Int(1).equals(&TypedValue::Float(1.0)).is_err());
    assert!(TypedValue::Int(1).ordering(&TypedValue::String("1".into())).is_err());
}
