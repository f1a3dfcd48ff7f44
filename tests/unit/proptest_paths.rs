//! Property-based tests for path resolution and naming
//!
//! Uses proptest to verify properties that should hold for all inputs.

use std::path::{Path, PathBuf};

use dirload::paths::{check_traversal, logical_name, normalize, resolve_dir};
use dirload::{GlobMatcher, NameRule};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z]{1,5}",
        1 => Just(".".to_string()),
        1 => Just("..".to_string()),
    ]
}

proptest! {
    /// Both naming rules agree when a file has a single extension
    #[test]
    fn name_rules_agree_on_single_extension(
        dir in "[a-z]{1,5}",
        name in "[a-z]{1,10}",
        ext in "(js|ts)"
    ) {
        let path = PathBuf::from(format!("/{dir}/{name}.{ext}"));
        prop_assert_eq!(logical_name(&path, NameRule::FinalExtension), name.clone());
        prop_assert_eq!(logical_name(&path, NameRule::FirstDot), name);
    }

    /// Any `..` segment is a traversal attempt
    #[test]
    fn parent_segment_always_rejected(
        head in prop::collection::vec("[a-z]{1,5}", 0..3),
        tail in prop::collection::vec("[a-z]{1,5}", 0..3)
    ) {
        let mut parts = head;
        parts.push("..".to_string());
        parts.extend(tail);
        let input = parts.join("/");
        prop_assert!(check_traversal(Path::new(&input)).is_err());
    }

    /// Normalizing twice changes nothing
    #[test]
    fn normalize_is_idempotent(
        absolute in any::<bool>(),
        parts in prop::collection::vec(segment(), 0..6)
    ) {
        let joined = parts.join("/");
        let raw = if absolute { format!("/{joined}") } else { joined };
        let once = normalize(Path::new(&raw));
        prop_assert_eq!(normalize(&once), once);
    }

    /// A strict relative resolve never leaves the base
    #[test]
    fn strict_resolve_stays_under_base(parts in prop::collection::vec(segment(), 1..6)) {
        let base = Path::new("/srv/app");
        let dir = parts.join("/");
        if let Ok(resolved) = resolve_dir(base, Path::new(&dir), true) {
            prop_assert!(resolved.starts_with(base));
        }
    }

    /// Extension globs match nested files of that extension only
    #[test]
    fn extension_glob_matches_nested_files(
        dirs in prop::collection::vec("[a-z]{1,5}", 0..3),
        name in "[a-z]{1,10}",
        ext in "[a-z]{2,4}",
        other in "[a-z]{2,4}"
    ) {
        prop_assume!(ext != other);
        let none: [&str; 0] = [];
        let matcher = GlobMatcher::new(&[format!("**/*.{ext}")], &none).unwrap();

        let mut parts = dirs;
        parts.push(format!("{name}.{ext}"));
        prop_assert!(matcher.matches(Path::new(&parts.join("/"))));

        parts.pop();
        parts.push(format!("{name}.{other}"));
        prop_assert!(!matcher.matches(Path::new(&parts.join("/"))));
    }
}
