//! Report output stage.

use crate::config::DiffConfig;
use crate::reports::{create_reporter_with_options, DiffReport, ReportConfig, ReportMetadata};
use anyhow::Result;

use super::{should_use_color, write_output, OutputTarget};

/// Report settings derived from the command configuration.
pub fn report_config(config: &DiffConfig) -> ReportConfig {
    ReportConfig {
        include_unchanged: config.output.include_unchanged,
        metadata: ReportMetadata::new().with_paths(
            config.paths.old.to_string_lossy(),
            config.paths.new.to_string_lossy(),
        ),
        ..ReportConfig::default()
    }
}

/// Render a report and write it to the configured destination.
pub fn output_report(config: &DiffConfig, report: DiffReport<'_, '_>) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let reporter = create_reporter_with_options(config.output.format, should_use_color(&target));
    let text = reporter.generate_diff_report(report, &report_config(config))?;

    write_output(&text, &target, config.behavior.quiet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DiffPaths, InputShape};
    use crate::diff::DiffEngine;
    use crate::model::Record;
    use crate::reports::ReportFormat;
    use serde_json::json;

    #[test]
    fn test_output_report_writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.json");
        let app = AppConfig::builder()
            .output_format(ReportFormat::Json)
            .output_file(Some(out.clone()))
            .quiet(true)
            .build();
        let config = DiffConfig::new(
            DiffPaths {
                old: "old.json".into(),
                new: "new.json".into(),
            },
            InputShape::Record,
            app,
        );

        let record = Record::new(json!({"reactionRole": "REACTANT"}));
        let diff = DiffEngine::new().diff_records(&record, &record).unwrap();
        output_report(&config, DiffReport::Pairwise(&diff)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(written["metadata"]["old"]["file_path"], "old.json");
        assert_eq!(written["summary"]["has_changes"], false);
    }
}
