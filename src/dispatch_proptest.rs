//! Property-based tests for selector resolution, fan-out and sinks.
//!
//! These tests use proptest to generate random registries and line sequences
//! and verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;

    use crate::config::{Registry, Repository};
    use crate::dispatch::{self, Outcome, Resolution, Selector};
    use crate::output::{JsonSink, OutputConfig, Sink, TextSink};
    use crate::path::resolve;

    fn registry_from(names: &[String]) -> Registry {
        Registry {
            root_folder: "/srv".into(),
            repositories: names
                .iter()
                .map(|n| Repository::new(n.as_str(), n.as_str(), "u", false))
                .collect(),
            ..Default::default()
        }
    }

    // ============================================================================
    // Selector resolution
    // ============================================================================

    proptest! {
        /// Property: Single(n) resolves to the first repository named n, or to
        /// NotFound with no action run.
        #[test]
        fn single_resolves_first_match_or_not_found(
            names in prop::collection::vec("[a-d]{1,2}", 0..8),
            wanted in "[a-d]{1,2}",
        ) {
            let registry = registry_from(&names);
            let calls = AtomicUsize::new(0);
            let sink = JsonSink::new();

            let report = dispatch::run(&Selector::Single(wanted.clone()), &registry, &sink, |repo| {
                calls.fetch_add(1, Ordering::SeqCst);
                Outcome::ok(&repo.nickname, "done")
            });

            if names.contains(&wanted) {
                prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
                prop_assert_eq!(report.outcomes.len(), 1);
                prop_assert_eq!(&report.outcomes[0].repository, &wanted);
                match dispatch::resolve(&Selector::Single(wanted.clone()), &registry) {
                    Resolution::Targets(targets) => {
                        let first = registry.repositories.iter().position(|r| r.nickname == wanted).unwrap();
                        prop_assert!(std::ptr::eq(targets[0], &registry.repositories[first]));
                    }
                    Resolution::NotFound(_) => prop_assert!(false, "expected a target"),
                }
            } else {
                prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
                prop_assert!(report.outcomes.is_empty());
                prop_assert_eq!(report.not_found, Some(wanted));
            }
        }

        /// Property: All dispatches exactly k actions, one per descriptor, and
        /// returns k outcomes.
        #[test]
        fn all_dispatches_exactly_k_actions(count in 0usize..12) {
            let names: Vec<String> = (0..count).map(|i| format!("repo{}", i)).collect();
            let registry = registry_from(&names);
            let calls = AtomicUsize::new(0);
            let sink = JsonSink::new();

            let report = dispatch::run(&Selector::All, &registry, &sink, |repo| {
                calls.fetch_add(1, Ordering::SeqCst);
                Outcome::ok(&repo.nickname, "done")
            });

            prop_assert_eq!(calls.load(Ordering::SeqCst), count);
            prop_assert_eq!(report.outcomes.len(), count);
            prop_assert_eq!(sink.lines().len(), count);
            let distinct: HashSet<&str> = report.outcomes.iter().map(|o| o.repository.as_str()).collect();
            prop_assert_eq!(distinct.len(), count);
        }

        /// Property: failures never hide other outcomes.
        #[test]
        fn failures_are_isolated(
            count in 1usize..10,
            failing in prop::collection::hash_set(0usize..10, 0..5),
        ) {
            let names: Vec<String> = (0..count).map(|i| format!("r{}", i)).collect();
            let registry = registry_from(&names);
            let sink = JsonSink::new();

            let report = dispatch::run(&Selector::All, &registry, &sink, |repo| {
                let index: usize = repo.nickname[1..].parse().unwrap();
                if failing.contains(&index) {
                    Outcome::failed(&repo.nickname, "forced failure")
                } else {
                    Outcome::ok(&repo.nickname, "done")
                }
            });

            let expected_failures = failing.iter().filter(|i| **i < count).count();
            prop_assert_eq!(report.outcomes.len(), count);
            prop_assert_eq!(report.failed(), expected_failures);
            prop_assert_eq!(report.succeeded(), count - expected_failures);
        }
    }

    // ============================================================================
    // Sink round-trips
    // ============================================================================

    proptest! {
        /// Property: the text sink renders lines that split back into the input.
        #[test]
        fn text_sink_round_trip(lines in prop::collection::vec("[^\n\r]*", 0..20)) {
            let sink = TextSink::new(OutputConfig::without_color());
            for line in &lines {
                sink.add_line(line);
            }
            let rendered = sink.render();
            let split: Vec<String> = rendered.lines().map(str::to_string).collect();
            prop_assert_eq!(split, lines);
        }

        /// Property: the JSON sink's messages field equals the input.
        #[test]
        fn json_sink_round_trip(lines in prop::collection::vec(".*", 0..20)) {
            let sink = JsonSink::new();
            for line in &lines {
                sink.add_line(line);
            }
            let parsed: serde_json::Value = serde_json::from_str(&sink.render()).unwrap();
            let messages: Vec<String> = serde_json::from_value(parsed["messages"].clone()).unwrap();
            prop_assert_eq!(messages, lines);
        }

        /// Property: render is repeatable.
        #[test]
        fn render_is_repeatable(lines in prop::collection::vec(".*", 0..10)) {
            let sink = JsonSink::new();
            for line in &lines {
                sink.add_line(line);
            }
            prop_assert_eq!(sink.render(), sink.render());
        }
    }

    // ============================================================================
    // Path resolution
    // ============================================================================

    proptest! {
        /// Property: a relative folder name resolves under the root and ends
        /// with the folder name.
        #[test]
        fn resolve_stays_under_root(folder in "[a-zA-Z0-9_-]{1,20}(/[a-zA-Z0-9_-]{1,10}){0,2}") {
            let repo = Repository::new("n", folder.as_str(), "u", false);
            let root = Path::new("/srv/code");
            let resolved = resolve(&repo, root);
            prop_assert!(resolved.starts_with(root));
            prop_assert!(resolved.ends_with(&folder));
        }
    }
}
