pub mod builders;

use std::sync::Once;

use specmate::diagnostics::Diagnostics;
use specmate::fs::MockFileSystem;
use specmate::parsers::{ConfigParser, TomlParser};
use specmate::spec::{Specification, compile};
use specmate::tree::Node;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Compile specification source named `test.spec`, panicking on any
/// diagnostic.
pub fn compile_ok(source: &str) -> Specification {
    match compile(source, "test.spec").into_result() {
        Ok(spec) => spec,
        Err(errors) => panic!("specification failed to compile:\n{errors}"),
    }
}

/// Diagnostics of a specification expected not to compile.
pub fn compile_err(source: &str) -> Diagnostics {
    let compilation = compile(source, "test.spec");
    assert!(
        !compilation.diagnostics.is_empty(),
        "expected diagnostics, got a clean compilation"
    );
    compilation.diagnostics
}

/// Parse TOML source named `config.toml`, panicking on error.
pub fn toml_tree(source: &str) -> Node {
    match TomlParser.parse(source, "config.toml") {
        Ok(node) => node,
        Err(errors) => panic!("toml failed to parse:\n{errors}"),
    }
}

/// In-memory file system holding `files`.
pub fn mock_fs<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> MockFileSystem {
    let fs = MockFileSystem::new();
    for (path, content) in files {
        fs.add_file(path, content);
    }
    fs
}
