//! Diff command handler.
//!
//! Implements the `diff`, `diff-list` and `diff-groups` subcommands, which
//! differ only in the input shape they load.

use crate::config::{DiffConfig, InputShape};
use crate::pipeline::{
    build_engine, exit_codes, load_collection, load_groups, load_record, output_report,
};
use crate::reports::DiffReport;
use anyhow::{Context, Result};

/// Run a diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: DiffConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let rule = &config.matching.name_rule;
    let engine = build_engine(&config);

    let has_changes = match config.shape {
        InputShape::Record => {
            let old = load_record(&config.paths.old, rule, quiet)?;
            let new = load_record(&config.paths.new, rule, quiet)?;
            let diff = engine
                .diff_records(&old, &new)
                .context("Failed to diff records")?;
            emit(&config, DiffReport::Pairwise(&diff))?
        }
        InputShape::Collection => {
            let old = load_collection(&config.paths.old, rule, quiet)?;
            let new = load_collection(&config.paths.new, rule, quiet)?;
            let diff = engine
                .diff_collection(&old, &new)
                .context("Failed to diff collections")?;
            emit(&config, DiffReport::Collection(&diff))?
        }
        InputShape::Groups => {
            let old = load_groups(&config.paths.old, rule, quiet)?;
            let new = load_groups(&config.paths.new, rule, quiet)?;
            let diff = engine
                .diff_groups(&old, &new)
                .context("Failed to diff groups")?;
            emit(&config, DiffReport::Grouped(&diff))?
        }
    };

    Ok(determine_exit_code(&config, has_changes))
}

/// Write the report and tell whether it found changes.
fn emit(config: &DiffConfig, report: DiffReport<'_, '_>) -> Result<bool> {
    output_report(config, report)?;
    Ok(report.has_changes())
}

/// Determine the appropriate exit code based on diff results and config flags.
const fn determine_exit_code(config: &DiffConfig, has_changes: bool) -> i32 {
    if config.behavior.fail_on_change && has_changes {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, ConfigOverrides, DiffPaths};
    use crate::reports::ReportFormat;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn config(dir: &Path, shape: InputShape, old: &str, new: &str, fail: bool) -> DiffConfig {
        let app = AppConfig::builder()
            .output_format(ReportFormat::Json)
            .output_file(Some(dir.join("out.json")))
            .fail_on_change(fail)
            .quiet(true)
            .build();
        DiffConfig::new(
            DiffPaths {
                old: write(dir, "old.json", old),
                new: write(dir, "new.json", new),
            },
            shape,
            app,
        )
    }

    #[test]
    fn test_exit_code_follows_fail_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let old = r#"{"reactionRole": "REACTANT"}"#;
        let new = r#"{"reactionRole": "SOLVENT"}"#;

        let lenient = config(dir.path(), InputShape::Record, old, new, false);
        assert_eq!(run_diff(lenient).unwrap(), exit_codes::SUCCESS);

        let strict = config(dir.path(), InputShape::Record, old, new, true);
        assert_eq!(run_diff(strict).unwrap(), exit_codes::CHANGES_DETECTED);

        let same = config(dir.path(), InputShape::Record, old, old, true);
        assert_eq!(run_diff(same).unwrap(), exit_codes::SUCCESS);
    }

    #[test]
    fn test_groups_shape_detects_misplacement() {
        let dir = tempfile::tempdir().unwrap();
        let a = r#"{"identifiers": [{"type": "NAME", "value": "a"}]}"#;
        let b = r#"{"identifiers": [{"type": "NAME", "value": "b"}]}"#;
        let old = format!("[[{a}, {b}]]");
        let new = format!("[[{a}], [{b}]]");

        let cfg = config(dir.path(), InputShape::Groups, &old, &new, true);
        assert_eq!(run_diff(cfg).unwrap(), exit_codes::CHANGES_DETECTED);
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("out.json")).unwrap())
                .unwrap();
        assert_eq!(report["summary"]["groups"]["misplaced"], 1);
    }

    #[test]
    fn test_unnamed_collection_member_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), InputShape::Collection, r#"[{"x": 1}]"#, "[]", false);
        let err = run_diff(cfg).unwrap_err();
        assert!(format!("{err:#}").contains("has no name leaf"));
    }

    #[test]
    fn test_flag_equal_to_default_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = write(dir.path(), ".ord-diff.yaml", "matching:\n  max_exact_size: 1\n");
        let list = r#"[
            {"identifiers": [{"type": "NAME", "value": "water"}]},
            {"identifiers": [{"type": "NAME", "value": "ethanol"}]}
        ]"#;
        let paths = DiffPaths {
            old: write(dir.path(), "old.json", list),
            new: write(dir.path(), "new.json", list),
        };
        let base = ConfigOverrides {
            output_file: Some(dir.path().join("out.json")),
            quiet: true,
            ..ConfigOverrides::default()
        };

        let (from_file, loaded) = AppConfig::from_file_with_overrides(Some(&config_file), &base);
        assert_eq!(loaded.as_deref(), Some(config_file.as_path()));
        assert_eq!(from_file.matching.max_exact_size, 1);
        let refused = DiffConfig::new(paths.clone(), InputShape::Collection, from_file);
        assert!(format!("{:#}", run_diff(refused).unwrap_err()).contains("exact matching limit"));

        let explicit = ConfigOverrides {
            max_exact_size: Some(AppConfig::default().matching.max_exact_size),
            ..base
        };
        let (app, _) = AppConfig::from_file_with_overrides(Some(&config_file), &explicit);
        assert_eq!(app.matching.max_exact_size, 1000);
        let cfg = DiffConfig::new(paths, InputShape::Collection, app);
        assert_eq!(run_diff(cfg).unwrap(), exit_codes::SUCCESS);
    }
}
