mod common;
use crate::common::{Fixture, compile_ok};

use proptest::prelude::*;
use specmate::check::Verdict;
use specmate::spec::{clean_text, compile, condense_list_type};

// Field names that can never collide with a keyword.
fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_map(|s| format!("k{s}"))
}

fn nested_spec(segments: &[String]) -> String {
    let mut src = String::from("file \"c.toml\" toml;\n");
    for seg in segments {
        src.push_str(&format!("field {seg} {{ type: int;\n"));
    }
    for _ in segments {
        src.push_str("}\n");
    }
    src
}

proptest! {
    #[test]
    fn nested_field_paths_join_with_dots(segments in proptest::collection::vec(segment(), 1..6)) {
        let spec = compile_ok(&nested_spec(&segments));

        prop_assert_eq!(spec.fields.len(), segments.len());
        for (depth, field) in spec.fields.iter().enumerate() {
            prop_assert_eq!(&field.field, &segments[..=depth].join("."));
        }
    }

    #[test]
    fn list_types_condense_to_prefix_form(
        depth in 0usize..5,
        base in prop_oneof![Just("int"), Just("string"), Just("Server")],
        pad in "[ ]{0,2}",
    ) {
        let mut written = String::new();
        for _ in 0..depth {
            written.push_str(&format!("list{pad}<{pad}"));
        }
        written.push_str(base);
        for _ in 0..depth {
            written.push_str(&format!("{pad}>"));
        }

        let condensed = condense_list_type(&written);
        prop_assert_eq!(&condensed, &format!("{}{base}", "list:".repeat(depth)));
        prop_assert_eq!(condense_list_type(&condensed), condensed);
    }

    #[test]
    fn cleaned_text_has_single_spaces(raw in "[a-z \t\n]{0,30}") {
        let cleaned = clean_text(&raw);
        prop_assert!(!cleaned.contains("  "));
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        prop_assert_eq!(clean_text(&cleaned), cleaned.clone());
        prop_assert_eq!(clean_text(&format!("\"{raw}\"")), cleaned);
    }

    #[test]
    fn each_duplicate_metadata_entry_is_one_error(extra in 0usize..6) {
        let mut src = String::from("file \"c.toml\" toml;\nfield port {\n    type: int;\n");
        for _ in 0..=extra {
            src.push_str("    optional: true;\n");
        }
        src.push_str("}\n");

        let compilation = compile(&src, "test.spec");
        prop_assert_eq!(compilation.diagnostics.len(), extra);
        let spec = compilation.spec.expect("semantic errors keep the model");
        prop_assert!(spec.fields[0].optional);
    }

    #[test]
    fn port_check_matches_integer_comparison(port in -100_000i64..100_000) {
        let fx = Fixture::new(
            "file \"config.toml\" toml;\nfield port { type: int; check: port > 0; }\n",
            &format!("port = {port}\n"),
        );

        match fx.run_one("port") {
            Ok(Verdict::Pass) => prop_assert!(port > 0),
            Ok(Verdict::Fail(failure)) => {
                prop_assert!(port <= 0);
                prop_assert_eq!(failure.message, format!("port > 0 is false ({port} > 0)"));
            }
            Err(err) => prop_assert!(false, "unexpected error: {err}"),
        }
    }

    #[test]
    fn check_spans_are_absolute(blank_lines in 0usize..8, indent in 0usize..6) {
        let src = format!(
            "file \"config.toml\" toml;\n{}field port {{\n{}type: int; check: port > 0;\n}}\n",
            "\n".repeat(blank_lines),
            " ".repeat(indent),
        );
        let spec = compile_ok(&src);
        let check = &spec.fields[0].checks[0];

        prop_assert_eq!(check.location.start.line, 2 + blank_lines);
        prop_assert_eq!(check.location.start.column, indent + 18);
    }
}
