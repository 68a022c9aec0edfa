mod common;
use crate::common::{compile_err, compile_ok, init_tracing};

use specmate::diagnostics::{DiagnosticKind, Position, Span};
use specmate::spec::{compile, condense_list_type};

#[test]
fn nested_fields_join_paths_without_root_separator() {
    init_tracing();

    let spec = compile_ok(
        r#"
file "config.toml" toml;

field server {
    type: Server;
    field port { type: int; }
    field tls {
        type: Tls;
        field cert { type: string; }
    }
}

field name { type: string; }
field db.url { type: string; }
"#,
    );

    let paths: Vec<&str> = spec.fields.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "server",
            "server.port",
            "server.tls",
            "server.tls.cert",
            "name",
            "db.url"
        ]
    );
}

#[test]
fn file_declaration_and_imports_are_recorded() {
    let spec = compile_ok(
        r#"
file: "conf/app.toml" toml;
import {
    shared: "shared/base.spec";
    net: "net.spec",
}
field port { type: int; }
"#,
    );

    assert_eq!(spec.file, "conf/app.toml");
    assert_eq!(spec.file_format, "toml");
    assert_eq!(spec.file_location.start, Position::new(1, 6));
    assert_eq!(spec.imports.get("shared").map(String::as_str), Some("shared/base.spec"));
    assert_eq!(spec.imports.get("net").map(String::as_str), Some("net.spec"));
    assert!(spec.import_locations.contains_key("shared"));
}

#[test]
fn duplicate_metadata_keeps_first_value_and_reports_each_extra() {
    let compilation = compile(
        r#"
file "config.toml" toml;
field port {
    type: int;
    type: string;
    optional: true;
    optional: false;
    optional: false;
    default: 8080;
    notes: "first";
    notes: "second";
}
"#,
        "test.spec",
    );

    assert_eq!(compilation.diagnostics.len(), 4);
    assert!(
        compilation
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::Semantic)
    );

    let spec = compilation.spec.expect("semantic errors keep the model");
    let port = spec.field("port").expect("port field");
    assert_eq!(port.field_type, "int");
    assert!(port.optional);
    assert_eq!(port.default.as_deref(), Some("8080"));
    assert_eq!(port.notes.as_deref(), Some("first"));
}

#[test]
fn missing_type_is_always_an_error() {
    let errors = compile_err(
        r#"
file "config.toml" toml;
field port { optional: true; default: 1; }
field host { type: string; }
"#,
    );

    assert_eq!(errors.len(), 1);
    let error = errors.iter().next().expect("one error");
    assert_eq!(error.kind, DiagnosticKind::Semantic);
    assert!(error.message.contains("missing type"), "{}", error.message);
    assert!(error.message.contains("port"));
}

#[test]
fn semantic_errors_accumulate_across_fields() {
    let compilation = compile(
        r#"
file "config.toml" toml;
field a { }
field b { type: int; type: int; }
field a { type: int; }
"#,
        "test.spec",
    );

    // missing type on a, duplicate type on b, duplicate field a
    assert_eq!(compilation.diagnostics.len(), 3);
    assert!(compilation.spec.is_some());
    assert!(!compilation.is_clean());
    assert!(!compilation.has_internal_errors());
}

#[test]
fn list_types_are_condensed() {
    let spec = compile_ok(
        r#"
file "config.toml" toml;
field matrix { type: list< list<int> >; }
field tags { type: list<string>; }
field port { type: int; }
"#,
    );

    assert_eq!(spec.field("matrix").map(|f| f.field_type.as_str()), Some("list:list:int"));
    assert_eq!(spec.field("tags").map(|f| f.field_type.as_str()), Some("list:string"));
    assert_eq!(spec.field("port").map(|f| f.field_type.as_str()), Some("int"));

    assert_eq!(condense_list_type("list:list:int"), "list:list:int");
    assert_eq!(condense_list_type("int"), "int");
}

#[test]
fn defaults_and_notes_are_cleaned() {
    let spec = compile_ok(
        r#"
file "config.toml" toml;
field greeting {
    type: string;
    default: "  hello    world ";
    notes: """Shown to users
               on login.""";
}
"#,
    );

    let greeting = spec.field("greeting").expect("greeting field");
    assert_eq!(greeting.default.as_deref(), Some("hello world"));
    assert_eq!(greeting.notes.as_deref(), Some("Shown to users on login."));
}

#[test]
fn checks_are_stored_verbatim_with_spans() {
    let spec = compile_ok(
        "file \"config.toml\" toml;\nfield port {\n    type: int;\n    check: port > 0;\n    check: self.range(1, 65535), \n}\n",
    );

    let port = spec.field("port").expect("port field");
    assert_eq!(port.checks.len(), 2);

    assert_eq!(port.checks[0].check, "port > 0");
    assert_eq!(
        port.checks[0].location,
        Span::new(Position::new(3, 11), Position::new(3, 19))
    );

    assert_eq!(port.checks[1].check, "self.range(1, 65535)");
    assert_eq!(port.checks[1].location.start, Position::new(4, 11));
}

#[test]
fn object_declarations_build_property_lists() {
    let spec = compile_ok(
        r#"
file "config.toml" toml;
object Person {
    name: string;
    age?: int,
    tags?: list<string>
}
field owner { type: Person; }
"#,
    );

    let person = spec.object("Person").expect("Person type");
    let props: Vec<(&str, &str, bool)> = person
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.type_name.as_str(), p.optional))
        .collect();
    assert_eq!(
        props,
        vec![
            ("name", "string", false),
            ("age", "int", true),
            ("tags", "list:string", true)
        ]
    );
}

#[test]
fn duplicate_objects_and_properties_are_errors() {
    let errors = compile_err(
        r#"
file "config.toml" toml;
object A { x: int; x: string; }
object A { y: int; }
"#,
    );

    assert_eq!(errors.len(), 2);
    let messages: Vec<&str> = errors.iter().map(|d| d.message.as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("duplicate property x")));
    assert!(messages.iter().any(|m| m.contains("duplicate object type A")));
}

#[test]
fn objects_cannot_take_builtin_type_names() {
    let errors = compile_err(
        r#"
file "config.toml" toml;
object int { x: int; }
object list { y: int; }
object Server { port: int; }
"#,
    );

    let messages: Vec<&str> = errors.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "object type int shadows a built-in type",
            "object type list shadows a built-in type",
        ]
    );
    let location = errors.iter().next().and_then(|d| d.location.as_ref()).expect("located");
    assert_eq!(location.span.start, Position::new(2, 7));
}

#[test]
fn multiple_syntax_errors_are_all_reported() {
    init_tracing();

    let compilation = compile(
        r#"
file "config.toml" toml;
field a { type: int; bogus: 1; }
field b { optional: maybe; type: int; }
"#,
        "test.spec",
    );

    assert!(compilation.spec.is_none(), "syntax errors abort extraction");
    assert_eq!(compilation.diagnostics.len(), 2);
    assert!(
        compilation
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::Syntax)
    );

    let lines: Vec<usize> = compilation
        .diagnostics
        .iter()
        .filter_map(|d| d.location.as_ref().map(|l| l.span.start.line))
        .collect();
    assert_eq!(lines, vec![2, 3]);
}

#[test]
fn lexical_errors_are_collected() {
    let compilation = compile(
        "file \"config.toml\" toml;\nfield a { type: int; notes: \"unterminated }\nfield b { type: int; }\n",
        "test.spec",
    );

    assert!(compilation.spec.is_none());
    assert!(
        compilation
            .diagnostics
            .iter()
            .any(|d| d.message.contains("unterminated string"))
    );
}

#[test]
fn missing_file_declaration_is_a_syntax_error() {
    let compilation = compile("field port { type: int; }", "test.spec");

    assert!(compilation.spec.is_none());
    let first = compilation.diagnostics.iter().next().expect("an error");
    assert_eq!(first.kind, DiagnosticKind::Syntax);
    assert!(first.message.contains("'file'"), "{}", first.message);
}

#[test]
fn comments_are_ignored() {
    let spec = compile_ok(
        r#"
// target
file "config.toml" toml; /* trailing
block comment */
field port {
    type: int; // inline
}
"#,
    );

    assert_eq!(spec.fields.len(), 1);
}

#[test]
fn diagnostics_display_one_based_positions() {
    let errors = compile_err("file \"config.toml\" toml;\nfield a { }\n");
    let rendered = errors.to_string();
    assert!(rendered.starts_with("test.spec:2:7: error:"), "{rendered}");
}
