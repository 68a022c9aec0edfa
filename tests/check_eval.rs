mod common;
use crate::common::{Fixture, TestResult, init_tracing, toml_tree};

use std::collections::BTreeMap;

use specmate::check::{ConfigView, EvalContext, EvalError, Verdict, evaluate_check};
use specmate::diagnostics::{Position, SourceLocation};
use specmate::types::{TypeError, TypeRegistry, TypedValue};

fn failure_message(verdict: Result<Verdict, EvalError>) -> String {
    match verdict {
        Ok(Verdict::Fail(failure)) => failure.message,
        other => panic!("expected a failed check, got {other:?}"),
    }
}

const PORT_SPEC: &str = r#"
file "config.toml" toml;
field port { type: int; check: port > 0; }
"#;

#[test]
fn failing_comparison_points_at_check_and_config_value() {
    init_tracing();
    let fx = Fixture::new(PORT_SPEC, "port = -1\n");

    let Ok(Verdict::Fail(failure)) = fx.run_one("port") else {
        panic!("port = -1 must fail");
    };

    assert_eq!(failure.message, "port > 0 is false (-1 > 0)");
    assert_eq!(failure.check_location.file, "test.spec");
    assert_eq!(failure.check_location.span.start, Position::new(2, 31));

    let port = fx.tree.lookup("port").expect("port node");
    assert_eq!(
        failure.config_location,
        Some(SourceLocation::value_of("config.toml", port))
    );
}

#[test]
fn passing_comparison() {
    let fx = Fixture::new(PORT_SPEC, "port = 8080\n");
    assert_eq!(fx.run_one("port"), Ok(Verdict::Pass));
}

#[test]
fn unknown_reference_is_an_error_not_a_failure() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field port { type: int; check: missing.port > 0; }
"#,
        "port = 1\n",
    );

    match fx.run_one("port") {
        Err(EvalError::FieldNotFound { path, location }) => {
            assert_eq!(path, "missing.port");
            assert_eq!(location.file, "test.spec");
        }
        other => panic!("expected field-not-found, got {other:?}"),
    }
}

#[test]
fn ints_and_floats_do_not_compare() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field port { type: int; check: port > 1.5; }
"#,
        "port = 2\n",
    );

    match fx.run_one("port") {
        Err(EvalError::Type { source, .. }) => assert_eq!(
            source,
            TypeError::Incomparable {
                left: "int".into(),
                right: "float".into()
            }
        ),
        other => panic!("expected a type error, got {other:?}"),
    }
}

#[test]
fn conjunction_reports_first_false_operand() {
    let spec = r#"
file "config.toml" toml;
field port { type: int; check: port > 0 && port < 100; }
"#;

    let high = Fixture::new(spec, "port = 500\n");
    assert_eq!(
        failure_message(high.run_one("port")),
        "port < 100 is false (500 < 100)"
    );

    let low = Fixture::new(spec, "port = -1\n");
    assert_eq!(
        failure_message(low.run_one("port")),
        "port > 0 is false (-1 > 0)"
    );

    let ok = Fixture::new(spec, "port = 50\n");
    assert_eq!(ok.run_one("port"), Ok(Verdict::Pass));
}

#[test]
fn disjunction_reports_both_operands() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field port { type: int; check: port < 10 || port > 1000; }
"#,
        "port = 500\n",
    );

    assert_eq!(
        failure_message(fx.run_one("port")),
        "port < 10 || port > 1000 is false: port < 10 is false (500 < 10); port > 1000 is false (500 > 1000)"
    );
}

#[test]
fn self_and_method_calls() -> TestResult {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field name {
    type: string;
    check: self.len() > 2 && self.startsWith("ab");
    check: self.oneOf("a", "b");
    check: !self.isEmpty();
}
"#,
        "name = \"abc\"\n",
    );

    let results = fx.run("name");
    assert_eq!(results[0], Ok(Verdict::Pass));
    assert_eq!(results[2], Ok(Verdict::Pass));

    let Ok(Verdict::Fail(failure)) = &results[1] else {
        return Err(format!("oneOf must fail: {:?}", results[1]).into());
    };
    assert_eq!(failure.message, r#"self.oneOf("a", "b") is false"#);

    let node = fx.tree.lookup("name").ok_or("no name node")?;
    assert_eq!(
        failure.config_location,
        Some(SourceLocation::value_of("config.toml", node))
    );
    Ok(())
}

#[test]
fn self_paths_resolve_below_the_field() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
object Server { port: int; host?: string; }
field server {
    type: Server;
    check: self.port > 1024;
    check: self.get("port") == server.port;
}
"#,
        "[server]\nport = 8080\nhost = \"localhost\"\n",
    );

    assert_eq!(fx.run("server"), vec![Ok(Verdict::Pass), Ok(Verdict::Pass)]);
}

#[test]
fn null_equality_is_false_not_an_error() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field port { type: int; check: port != null; check: port == null; }
"#,
        "port = 1\n",
    );

    let results = fx.run("port");
    assert_eq!(results[0], Ok(Verdict::Pass));
    assert!(matches!(results[1], Ok(Verdict::Fail(_))));
}

#[test]
fn non_boolean_checks_are_errors() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field port { type: int; check: port; }
"#,
        "port = 1\n",
    );

    match fx.run_one("port") {
        Err(EvalError::NotBoolean { found, .. }) => assert_eq!(found, "int"),
        other => panic!("expected not-boolean, got {other:?}"),
    }
}

#[test]
fn malformed_checks_report_syntax_errors_at_absolute_positions() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field port {
    type: int;
    check: port > 0 0;
    check: 1 < port < 10;
}
"#,
        "port = 1\n",
    );

    let results = fx.run("port");

    let Err(EvalError::Syntax(trailing)) = &results[0] else {
        panic!("expected syntax error, got {:?}", results[0]);
    };
    let first = trailing.iter().next().expect("a diagnostic");
    assert!(first.message.contains("after expression"), "{}", first.message);
    let location = first.location.as_ref().expect("located");
    assert_eq!(location.file, "test.spec");
    assert_eq!(location.span.start, Position::new(4, 20));

    let Err(EvalError::Syntax(chained)) = &results[1] else {
        panic!("expected syntax error, got {:?}", results[1]);
    };
    assert!(chained.iter().any(|d| d.message.contains("cannot be chained")));
}

#[test]
fn unknown_methods_are_located_at_the_method_name() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field port { type: int; check: self.frobnicate(); }
"#,
        "port = 1\n",
    );

    let err = fx.run_one("port").unwrap_err();
    assert!(!err.is_internal());
    match &err {
        EvalError::Type { source, location } => {
            assert!(matches!(source, TypeError::UnknownMethod { .. }));
            assert_eq!(location.span.start, Position::new(2, 36));
        }
        other => panic!("expected a type error, got {other:?}"),
    }
}

#[test]
fn array_indices_and_list_methods() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field ports {
    type: list<int>;
    check: ports.1 == 443 && ports.len() == 2;
    check: self.contains(80) && self.at(0) < self.at(1);
}
"#,
        "ports = [80, 443]\n",
    );

    assert_eq!(fx.run("ports"), vec![Ok(Verdict::Pass), Ok(Verdict::Pass)]);
}

#[test]
fn references_to_other_fields_use_declared_types() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field min { type: int; }
field max { type: int; check: max >= min; check: max.toFloat() > 1.0; }
"#,
        "min = 1\nmax = 5\n",
    );

    assert_eq!(fx.run("max"), vec![Ok(Verdict::Pass), Ok(Verdict::Pass)]);
}

#[test]
fn evaluation_is_deterministic() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
field port { type: int; check: port < 10 || port > 1000; check: port.toString() == "500"; }
"#,
        "port = 500\n",
    );

    let first = fx.run("port");
    for _ in 0..5 {
        assert_eq!(fx.run("port"), first);
    }
}

#[test]
fn import_aliases_resolve_in_the_imported_tree() {
    let fx = Fixture::new(
        r#"
file "config.toml" toml;
import { net: "net.spec"; }
field mtu { type: int; check: mtu <= net.mtu; check: net.mtu == 1400; }
"#,
        "mtu = 1200\n",
    );

    let net_tree = toml_tree("mtu = 1500\n");
    let registry = TypeRegistry::new();
    let mut imports = BTreeMap::new();
    imports.insert(
        "net".to_string(),
        ConfigView {
            file: "net.toml",
            tree: &net_tree,
            spec: None,
            registry: &registry,
        },
    );

    let field = fx.spec.field("mtu").expect("mtu field");
    let value = TypedValue::Int(1200);
    let origin = SourceLocation::value_of("config.toml", fx.tree.lookup("mtu").expect("mtu"));

    let results: Vec<_> = field
        .checks
        .iter()
        .map(|check| {
            evaluate_check(
                check,
                EvalContext {
                    spec_file: &fx.spec.source,
                    field: "mtu",
                    self_value: &value,
                    self_origin: &origin,
                    main: fx.view(),
                    imports: &imports,
                },
            )
        })
        .collect();

    assert_eq!(results[0], Ok(Verdict::Pass));
    let Ok(Verdict::Fail(failure)) = &results[1] else {
        panic!("net.mtu == 1400 must fail: {:?}", results[1]);
    };
    assert_eq!(failure.message, "net.mtu == 1400 is false (1500 == 1400)");
    assert_eq!(
        failure.config_location.as_ref().map(|l| l.file.as_str()),
        Some("net.toml")
    );
}
