//! Integration tests for ord-diff
//!
//! These tests verify end-to-end functionality of input loading, the diff
//! engine, report generation and the command-line binary.

use ord_diff::{
    diff::{DeltaKind, DiffEngine, GroupPlacement},
    model::{LeafKind, LeafPath, NameRule, Record},
    pipeline::{exit_codes, load_collection, load_groups, load_record},
    reports::{DiffReport, JsonReporter, ReportConfig, ReportGenerator},
};
use std::path::Path;
use std::process::Command;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn path(s: &str) -> LeafPath {
    s.parse().expect("valid path")
}

// ============================================================================
// Record Tests
// ============================================================================

mod record_tests {
    use super::*;

    fn load_pair() -> (Record, Record) {
        let rule = NameRule::default();
        (
            load_record(&fixture_path("record_reference.json"), &rule, true).unwrap(),
            load_record(&fixture_path("record_extracted.json"), &rule, true).unwrap(),
        )
    }

    #[test]
    fn test_record_fixture_leaves() {
        let (reference, extracted) = load_pair();
        assert_eq!(reference.leaves().len(), 7);
        assert_eq!(extracted.leaves().len(), 5);
        assert_eq!(reference.name(), Some("ethanol"));
        assert_eq!(reference.leaf_kind_counts()[&LeafKind::Identifiers], 4);
    }

    #[test]
    fn test_record_diff_categories() {
        let (reference, extracted) = load_pair();
        let diff = DiffEngine::new().diff_records(&reference, &extracted).unwrap();

        assert_eq!(
            diff.paths(DeltaKind::Removal),
            vec![&path("identifiers.1.type"), &path("identifiers.1.value")]
        );
        let mut altered: Vec<String> = diff
            .paths(DeltaKind::Alteration)
            .iter()
            .map(ToString::to_string)
            .collect();
        altered.sort();
        assert_eq!(altered, vec!["amount.volume.value", "reactionRole"]);
        assert_eq!(diff.count(DeltaKind::Addition), 0);
        assert!(diff.distance() > 0.0 && diff.distance() < 1.0);
    }

    #[test]
    fn test_record_diff_is_zero_against_itself() {
        let (reference, _) = load_pair();
        let diff = DiffEngine::new().diff_records(&reference, &reference).unwrap();
        assert!(diff.is_identical());
        assert_eq!(diff.distance(), 0.0);
    }

    #[test]
    fn test_reversed_diff_swaps_additions_and_removals() {
        let (reference, extracted) = load_pair();
        let engine = DiffEngine::new();
        let forward = engine.diff_records(&reference, &extracted).unwrap();
        let backward = engine.diff_records(&extracted, &reference).unwrap();

        assert_eq!(forward.count(DeltaKind::Removal), backward.count(DeltaKind::Addition));
        assert_eq!(forward.count(DeltaKind::Addition), backward.count(DeltaKind::Removal));
        assert!((forward.distance() - backward.distance()).abs() < 1e-12);
    }
}

// ============================================================================
// Collection Tests
// ============================================================================

mod collection_tests {
    use super::*;

    fn load_compounds() -> (Vec<Record>, Vec<Record>) {
        let rule = NameRule::default();
        (
            load_collection(&fixture_path("compounds_reference.json"), &rule, true).unwrap(),
            load_collection(&fixture_path("compounds_extracted.json"), &rule, true).unwrap(),
        )
    }

    #[test]
    fn test_collection_fixture_matching() {
        let (reference, extracted) = load_compounds();

        let diff = DiffEngine::new().diff_collection(&reference, &extracted).unwrap();
        assert_eq!(diff.index_match(), &[Some(1), Some(0), None]);
        assert_eq!(diff.n_absent(), 1);
        assert_eq!(diff.n_excess(), 0);
        assert_eq!(diff.n_altered(), 1);

        // Reordered identifiers are not a change
        let ethanol = diff.pair_diffs()[1].as_ref().unwrap();
        assert!(ethanol.is_identical());

        let water = diff.pair_diffs()[0].as_ref().unwrap();
        assert_eq!(water.paths(DeltaKind::Alteration), vec![&path("amount.volume.value")]);

        let counts = diff.element_counts();
        assert_eq!(counts[&DeltaKind::Removal], 1);
        assert_eq!(counts[&DeltaKind::Addition], 0);
        assert_eq!(counts[&DeltaKind::Alteration], 1);
    }

    #[test]
    fn test_collection_json_report() {
        let (reference, extracted) = load_compounds();
        let diff = DiffEngine::new().diff_collection(&reference, &extracted).unwrap();

        let text = JsonReporter::new()
            .generate_diff_report(DiffReport::Collection(&diff), &ReportConfig::default())
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["metadata"]["shape"], "collection");
        assert_eq!(json["metadata"]["old"]["record_count"], 3);
        assert_eq!(json["summary"]["elements"]["absent"], 1);
        assert_eq!(json["details"]["index_match"], serde_json::json!([1, 0, null]));
    }
}

// ============================================================================
// Grouped Collection Tests
// ============================================================================

mod grouped_tests {
    use super::*;

    #[test]
    fn test_group_fixture_placements() {
        let rule = NameRule::default();
        let reference = load_groups(&fixture_path("groups_reference.json"), &rule, true).unwrap();
        let extracted = load_groups(&fixture_path("groups_extracted.json"), &rule, true).unwrap();

        let diff = DiffEngine::new().diff_groups(&reference, &extracted).unwrap();
        assert!(diff.elements().is_identical());
        assert_eq!(diff.n_ref_groups(), 3);
        assert_eq!(diff.n_act_groups(), 2);
        assert_eq!(diff.placements()[0], GroupPlacement::Intact { target: 0 });
        assert_eq!(
            diff.placements()[1],
            GroupPlacement::Expanded {
                target: 1,
                source_size: 1,
                target_size: 2
            }
        );
        assert_eq!(diff.n_misplaced_groups(), 2);
        assert_eq!(diff.misplaced_groups().len(), 2);
    }
}

// ============================================================================
// CLI Tests
// ============================================================================

mod cli_tests {
    use super::*;

    fn ord_diff() -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ord-diff"));
        cmd.env("NO_COLOR", "1").env("RUST_LOG", "off");
        cmd
    }

    #[test]
    fn test_cli_diff_json_to_stdout() {
        let output = ord_diff()
            .args(["--quiet", "diff", "-o", "json"])
            .arg(fixture_path("record_reference.json"))
            .arg(fixture_path("record_extracted.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(exit_codes::SUCCESS));
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["summary"]["leaf_changes"]["removal"], 2);
    }

    #[test]
    fn test_cli_fail_on_change() {
        let output = ord_diff()
            .args(["--quiet", "diff-groups", "--fail-on-change"])
            .arg(fixture_path("groups_reference.json"))
            .arg(fixture_path("groups_extracted.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(exit_codes::CHANGES_DETECTED));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Misplaced: 2"));
    }

    #[test]
    fn test_cli_wrong_shape_is_an_error() {
        let output = ord_diff()
            .args(["--quiet", "diff-list"])
            .arg(fixture_path("record_reference.json"))
            .arg(fixture_path("record_extracted.json"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(exit_codes::ERROR));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("expected array of objects"));
    }
}
