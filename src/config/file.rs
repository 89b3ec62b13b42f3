//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::matching::OversizeStrategy;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".ord-diff.yaml",
    ".ord-diff.yml",
    "ord-diff.yaml",
    "ord-diff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/ord-diff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // 1. Use explicit path if provided
    if let Some(path) = explicit_path.filter(|path| path.exists()) {
        return Some(path.to_path_buf());
    }

    // 2. Search current directory
    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    // 3. Search git root (if in a repo)
    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    // 4. Search user config directory
    if let Some(path) = dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("ord-diff"))) {
        return Some(path);
    }

    // 5. Search home directory
    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
#[must_use]
pub fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }

        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Command-line Overrides
// ============================================================================

/// Settings given on the command line.
///
/// `None` (or `false` for switches) means the flag was not given and the
/// loaded value stands; anything else replaces it, even when it equals the
/// built-in default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    /// `--name-weight`
    pub name_weight: Option<f64>,
    /// `--max-exact-size`
    pub max_exact_size: Option<usize>,
    /// `--oversize`
    pub oversize: Option<OversizeStrategy>,
    /// `--positional`
    pub positional: bool,
    /// `--output`
    pub format: Option<ReportFormat>,
    /// `--output-file`
    pub output_file: Option<PathBuf>,
    /// `--include-unchanged`
    pub include_unchanged: bool,
    /// `--fail-on-change`
    pub fail_on_change: bool,
    /// `--quiet`
    pub quiet: bool,
}

impl AppConfig {
    /// Apply command-line overrides on top of this config.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(weight) = overrides.name_weight {
            self.matching.name_weight = weight;
        }
        if let Some(size) = overrides.max_exact_size {
            self.matching.max_exact_size = size;
        }
        if let Some(strategy) = overrides.oversize {
            self.matching.oversize = strategy;
        }
        if overrides.positional {
            self.differ.ignore_order = false;
        }

        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if overrides.output_file.is_some() {
            self.output.file.clone_from(&overrides.output_file);
        }
        if overrides.include_unchanged {
            self.output.include_unchanged = true;
        }

        // Switches only turn behaviour on
        if overrides.fail_on_change {
            self.behavior.fail_on_change = true;
        }
        if overrides.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and apply CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.apply_overrides(overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# ord-diff configuration
# Place this file at .ord-diff.yaml in your project root or ~/.config/ord-diff/

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".ord-diff.yaml");
        std::fs::write(&config_path, "matching:\n  name_weight: 10.0\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
matching:
  name_weight: 25.0
  oversize: greedy-with-swaps
  name_rule:
    type_value: IUPAC_NAME
differ:
  ignore_order: false
behavior:
  fail_on_change: true
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.matching.name_weight, 25.0);
        assert_eq!(config.matching.oversize, OversizeStrategy::GreedyWithSwaps);
        assert_eq!(config.matching.name_rule.type_value, "IUPAC_NAME");
        assert_eq!(config.matching.name_rule.list_field, "identifiers");
        assert_eq!(config.matching.max_exact_size, 1000);
        assert!(!config.differ.ignore_order);
        assert!(config.behavior.fail_on_change);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "matching: [unclosed").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut base = AppConfig::default();
        base.matching.max_exact_size = 200;
        base.output.format = ReportFormat::Table;

        base.apply_overrides(&ConfigOverrides {
            name_weight: Some(7.5),
            format: Some(ReportFormat::Json),
            fail_on_change: true,
            ..ConfigOverrides::default()
        });

        assert_eq!(base.matching.name_weight, 7.5);
        assert_eq!(base.matching.max_exact_size, 200);
        assert_eq!(base.output.format, ReportFormat::Json);
        assert!(base.behavior.fail_on_change);
        assert!(base.differ.ignore_order);
    }

    #[test]
    fn test_override_equal_to_default_still_wins() {
        let mut base = AppConfig::default();
        base.matching.max_exact_size = 1;
        base.matching.name_weight = 3.0;
        base.matching.oversize = OversizeStrategy::Greedy;

        let defaults = AppConfig::default();
        base.apply_overrides(&ConfigOverrides {
            name_weight: Some(defaults.matching.name_weight),
            max_exact_size: Some(defaults.matching.max_exact_size),
            oversize: Some(defaults.matching.oversize),
            ..ConfigOverrides::default()
        });

        assert_eq!(base.matching, defaults.matching);
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("matching:"));
        assert!(example.contains("name_weight"));

        let body: String = example.lines().filter(|l| !l.starts_with('#')).collect::<Vec<_>>().join("\n");
        let parsed: AppConfig = serde_yaml::from_str(&body).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_git_root_holds_a_git_entry() {
        if let Some(root) = find_git_root() {
            assert!(root.join(".git").exists());
            let cwd = std::env::current_dir().unwrap();
            assert!(cwd.starts_with(&root));
        }
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "matching:\n  name_weight: 1.0").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
