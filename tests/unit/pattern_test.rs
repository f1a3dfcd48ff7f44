//! Tests for glob matching through the default scanner

use std::path::PathBuf;

use dirload::{DEFAULT_IGNORE, DEFAULT_PATTERN, GlobMatcher, Scanner, WalkScanner};

use crate::common::TestApp;

const NONE: &[&str] = &[];

fn scan(app: &TestApp, dir: &str, pattern: &[&str], ignore: &[&str]) -> Vec<PathBuf> {
    let matcher = GlobMatcher::new(pattern, ignore).unwrap();
    WalkScanner::new().scan(&app.path().join(dir), &matcher).unwrap()
}

#[test]
fn globby_double_star_segment() {
    let app = TestApp::new();
    let files = scan(&app, "test", &["**/**.test.ts"], NONE);
    assert_eq!(
        files,
        vec![
            PathBuf::from("Test.test.ts"),
            PathBuf::from("Test2.test.ts"),
            PathBuf::from("Test3.test.ts"),
        ]
    );
}

#[test]
fn negation_excludes_declarations() {
    let app = TestApp::new();
    let files = scan(&app, "routes", DEFAULT_PATTERN, NONE);
    assert!(files.contains(&PathBuf::from("user.ts")));
    assert!(!files.contains(&PathBuf::from("user.d.ts")));
}

#[test]
fn without_ignore_node_modules_is_scanned() {
    let app = TestApp::new();
    let files = scan(&app, "routes", DEFAULT_PATTERN, NONE);
    assert!(files.contains(&PathBuf::from("node_modules/dep/index.js")));
}

#[test]
fn default_ignore_prunes_node_modules() {
    let app = TestApp::new();
    let files = scan(&app, "routes", DEFAULT_PATTERN, DEFAULT_IGNORE);
    assert_eq!(files, vec![PathBuf::from("admin/panel.js"), PathBuf::from("user.ts")]);
}

#[test]
fn plain_ignore_pattern() {
    let app = TestApp::new();
    let files = scan(&app, "test", &["**/*.ts"], &["**/helper.ts"]);
    assert_eq!(files.len(), 3);
    assert!(!files.contains(&PathBuf::from("helper.ts")));
}

#[test]
fn hidden_entries_are_skipped() {
    let app = TestApp::new();
    app.add_file("plugins/.secret.js", "");
    app.add_file("plugins/.git/hook.js", "");
    app.add_file("plugins/visible.js", "");

    let files = scan(&app, "plugins", DEFAULT_PATTERN, DEFAULT_IGNORE);
    assert_eq!(files, vec![PathBuf::from("visible.js")]);
}
