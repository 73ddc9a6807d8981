//! Library-level checks of the fixtures through `Session`

use arcc_drv::{Config, Session};
use arcc_util::ErrorCode;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn session() -> Session {
    let config = Config::load_from_path(&fixture("channels.toml")).expect("fixture config");
    Session::new(config).expect("valid channel table")
}

#[test]
fn test_fixture_authorities() {
    let report = session().check_file(&fixture("valve_control.arc")).unwrap();
    assert!(report.diagnostics.is_empty(), "{}", report.diagnostics);

    let authorities = &report.authorities;
    assert_eq!(authorities.default, Some(200));
    assert_eq!(authorities.for_channel(100), Some(100));
    assert_eq!(authorities.for_channel(200), Some(150));
    // Channels without an entry fall back to the default.
    assert_eq!(authorities.for_channel(1), Some(200));
}

#[test]
fn test_fixture_errors_in_order() {
    let report = session().check_file(&fixture("type_errors.arc")).unwrap();
    let codes: Vec<_> = report.diagnostics.errors().map(|d| d.code).collect();
    assert_eq!(codes.len(), 3, "{}", report.diagnostics);
    assert_eq!(codes[0], Some(ErrorCode::TypeMismatch));
    assert_eq!(codes[1], Some(ErrorCode::SymbolUndefined));

    let lines: Vec<_> = report.diagnostics.iter().map(|d| d.start.line).collect();
    assert!(lines.windows(2).all(|w| w[0] <= w[1]), "{lines:?}");
}

#[test]
fn test_session_reused_across_sources() {
    let session = session();
    let first = session.check_source("a.arc", "func f() { x := nope }");
    let second = session.check_source("b.arc", "sensor -> valve");
    assert!(first.has_errors());
    assert!(!second.has_errors(), "{}", second.diagnostics);
}
