#![allow(dead_code, unused_imports)]

pub use specmate_test_utils::builders;
pub use specmate_test_utils::{compile_err, compile_ok, init_tracing, mock_fs, toml_tree};

use std::collections::BTreeMap;

use specmate::check::{ConfigView, EvalContext, EvalError, Verdict, evaluate_check};
use specmate::diagnostics::SourceLocation;
use specmate::spec::Specification;
use specmate::tree::Node;
use specmate::types::{TypeRegistry, make_type};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A compiled specification and a parsed `config.toml`, ready to evaluate
/// checks against.
pub struct Fixture {
    pub spec: Specification,
    pub tree: Node,
    pub registry: TypeRegistry,
}

impl Fixture {
    pub fn new(spec_source: &str, config_source: &str) -> Self {
        let spec = compile_ok(spec_source);
        let registry = TypeRegistry::from_spec(&spec);
        Self {
            tree: toml_tree(config_source),
            spec,
            registry,
        }
    }

    pub fn view(&self) -> ConfigView<'_> {
        ConfigView {
            file: "config.toml",
            tree: &self.tree,
            spec: Some(&self.spec),
            registry: &self.registry,
        }
    }

    /// Evaluate every check of `field`, which must be present in the tree.
    pub fn run(&self, field: &str) -> Vec<Result<Verdict, EvalError>> {
        let spec_field = self
            .spec
            .field(field)
            .unwrap_or_else(|| panic!("no field {field} in specification"));
        let node = self
            .tree
            .lookup(field)
            .unwrap_or_else(|| panic!("no field {field} in configuration"));
        let value = make_type(&self.registry, &spec_field.field_type, node)
            .unwrap_or_else(|e| panic!("field {field} does not type-check: {e}"));
        let origin = SourceLocation::value_of("config.toml", node);
        let imports = BTreeMap::new();

        spec_field
            .checks
            .iter()
            .map(|check| {
                let ctx = EvalContext {
                    spec_file: &self.spec.source,
                    field,
                    self_value: &value,
                    self_origin: &origin,
                    main: self.view(),
                    imports: &imports,
                };
                evaluate_check(check, ctx)
            })
            .collect()
    }

    pub fn run_one(&self, field: &str) -> Result<Verdict, EvalError> {
        let mut results = self.run(field);
        assert_eq!(results.len(), 1, "expected exactly one check on {field}");
        results.remove(0)
    }
}
