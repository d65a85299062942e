use crate::adapters::sink::ensure_distinct_stems;
use crate::core::{BlockInput, ConfigProvider};
use crate::domain::model::{OutputFormat, PlotOptions};
use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub analysis: AnalysisInfo,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "ReportConfig::default_output_dir")]
    pub output_dir: String,
    #[serde(default = "ReportConfig::default_group_size")]
    pub group_size: usize,
    #[serde(default = "ReportConfig::default_formats")]
    pub formats: Vec<OutputFormat>,
    /// Write every artifact into a single `report.zip`.
    #[serde(default)]
    pub bundle: bool,
    #[serde(default)]
    pub plot: PlotOptions,
}

impl ReportConfig {
    fn default_output_dir() -> String {
        "./output".to_string()
    }

    fn default_group_size() -> usize {
        10
    }

    fn default_formats() -> Vec<OutputFormat> {
        OutputFormat::ALL.to_vec()
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
            group_size: Self::default_group_size(),
            formats: Self::default_formats(),
            bundle: false,
            plot: PlotOptions::default(),
        }
    }
}

/// One analysis block: either its own samples or a concatenation of earlier
/// sample blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockConfig {
    pub label: String,
    pub samples: Option<Vec<f64>>,
    pub combine: Option<Vec<String>>,
    pub start_ordinal: Option<u32>,
}

impl AnalysisConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalysisError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalysisError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalysisError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Resolves blocks into engine inputs in declaration order.
    ///
    /// A sample block without `start_ordinal` continues after the previous
    /// sample block. A composite block defaults to ordinal 1.
    pub fn resolve_blocks(&self) -> Result<Vec<BlockInput>> {
        let mut resolved = Vec::with_capacity(self.blocks.len());
        let mut samples_by_label: HashMap<&str, &[f64]> = HashMap::new();
        let mut next_ordinal: u64 = 1;

        for block in &self.blocks {
            match (&block.samples, &block.combine) {
                (Some(samples), None) => {
                    let start = match block.start_ordinal {
                        Some(start) => start,
                        None => u32::try_from(next_ordinal).map_err(|_| {
                            AnalysisError::OrdinalOverflow {
                                start: u32::MAX,
                                len: samples.len(),
                            }
                        })?,
                    };
                    next_ordinal = u64::from(start) + samples.len() as u64;
                    samples_by_label.insert(block.label.as_str(), samples.as_slice());
                    resolved.push(BlockInput {
                        label: block.label.clone(),
                        samples: samples.clone(),
                        start_ordinal: start,
                    });
                }
                (None, Some(references)) => {
                    let mut samples = Vec::new();
                    for reference in references {
                        let part = samples_by_label.get(reference.as_str()).ok_or_else(|| {
                            AnalysisError::UnknownBlock {
                                label: block.label.clone(),
                                reference: reference.clone(),
                            }
                        })?;
                        samples.extend_from_slice(part);
                    }
                    resolved.push(BlockInput {
                        label: block.label.clone(),
                        samples,
                        start_ordinal: block.start_ordinal.unwrap_or(1),
                    });
                }
                _ => {
                    return Err(AnalysisError::InvalidConfigValueError {
                        field: format!("blocks.{}", block.label),
                        value: block.label.clone(),
                        reason: "A block needs exactly one of 'samples' or 'combine'".to_string(),
                    });
                }
            }
        }

        Ok(resolved)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("analysis.name", &self.analysis.name)?;
        validation::validate_path("report.output_dir", &self.report.output_dir)?;
        validation::validate_positive_number("report.group_size", self.report.group_size, 1)?;
        validation::validate_finite("report.plot.jitter", self.report.plot.jitter)?;
        validation::validate_range("report.plot.jitter", self.report.plot.jitter, 0.0, 0.5)?;

        if self.report.formats.is_empty() {
            return Err(AnalysisError::MissingConfigError {
                field: "report.formats".to_string(),
            });
        }
        if self.blocks.is_empty() {
            return Err(AnalysisError::MissingConfigError {
                field: "blocks".to_string(),
            });
        }

        for block in &self.blocks {
            validation::validate_non_empty_string("blocks.label", &block.label)?;
            if let Some(start) = block.start_ordinal {
                validation::validate_positive_number(
                    &format!("blocks.{}.start_ordinal", block.label),
                    start as usize,
                    1,
                )?;
            }
        }
        validation::validate_unique_labels(
            "blocks.label",
            self.blocks.iter().map(|b| b.label.as_str()),
        )?;
        ensure_distinct_stems(self.blocks.iter().map(|b| b.label.as_str()))?;

        self.resolve_blocks().map(|_| ())
    }
}

impl ConfigProvider for AnalysisConfig {
    fn output_dir(&self) -> &str {
        &self.report.output_dir
    }

    fn group_size(&self) -> usize {
        self.report.group_size
    }

    fn plot_options(&self) -> PlotOptions {
        self.report.plot
    }

    fn formats(&self) -> &[OutputFormat] {
        &self.report.formats
    }

    fn blocks(&self) -> Result<Vec<BlockInput>> {
        self.resolve_blocks()
    }
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LabelMode, LineMode};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[analysis]
name = "lab1"

[[blocks]]
label = "Row1"
samples = [52, 21, 93]

[[blocks]]
label = "Row2"
samples = [68, 56]

[[blocks]]
label = "Combined"
combine = ["Row1", "Row2"]
"#;

    #[test]
    fn test_parse_basic_config_with_defaults() {
        let config = AnalysisConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.analysis.name, "lab1");
        assert_eq!(config.report.output_dir, "./output");
        assert_eq!(config.report.group_size, 10);
        assert_eq!(config.report.formats, OutputFormat::ALL.to_vec());
        assert!(!config.report.bundle);
        assert_eq!(config.report.plot, PlotOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_blocks_assigns_ordinals() {
        let config = AnalysisConfig::from_toml_str(BASIC).unwrap();
        let blocks = config.resolve_blocks().unwrap();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].start_ordinal, 1);
        assert_eq!(blocks[1].start_ordinal, 4);
        assert_eq!(blocks[2].start_ordinal, 1);
        assert_eq!(blocks[2].samples, vec![52.0, 21.0, 93.0, 68.0, 56.0]);
    }

    #[test]
    fn test_explicit_start_ordinal_moves_continuation() {
        let toml_content = r#"
[analysis]
name = "offsets"

[[blocks]]
label = "First"
samples = [1, 2]
start_ordinal = 10

[[blocks]]
label = "Second"
samples = [3]
"#;
        let blocks = AnalysisConfig::from_toml_str(toml_content)
            .unwrap()
            .resolve_blocks()
            .unwrap();
        assert_eq!(blocks[0].start_ordinal, 10);
        assert_eq!(blocks[1].start_ordinal, 12);
    }

    #[test]
    fn test_report_section() {
        let toml_content = r#"
[analysis]
name = "report"

[report]
output_dir = "./reports"
group_size = 5
formats = ["html"]
bundle = true

[report.plot]
label_mode = "all"
line_mode = "step"
jitter = 0.2

[[blocks]]
label = "Row1"
samples = [12.5, -34]
"#;
        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_dir(), "./reports");
        assert_eq!(config.group_size(), 5);
        assert_eq!(config.formats(), &[OutputFormat::Html]);
        assert!(config.report.bundle);
        assert_eq!(config.plot_options().label_mode, LabelMode::All);
        assert_eq!(config.plot_options().line_mode, LineMode::Step);
        assert_eq!(config.blocks().unwrap()[0].samples, vec![12.5, -34.0]);
    }

    #[test]
    fn test_unknown_combine_reference() {
        let toml_content = r#"
[analysis]
name = "bad"

[[blocks]]
label = "All"
combine = ["Row1"]

[[blocks]]
label = "Row1"
samples = [1]
"#;
        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownBlock { .. }));
    }

    #[test]
    fn test_block_needs_exactly_one_source() {
        let toml_content = r#"
[analysis]
name = "bad"

[[blocks]]
label = "Row1"
"#;
        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();
        assert!(config.resolve_blocks().is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AnalysisConfig::from_toml_str(BASIC).unwrap();
        config.report.group_size = 0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::from_toml_str(BASIC).unwrap();
        config.report.plot.jitter = 0.9;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::from_toml_str(BASIC).unwrap();
        config.blocks[1].label = "Row1".to_string();
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::from_toml_str(BASIC).unwrap();
        config.blocks[0].start_ordinal = Some(0);
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::from_toml_str(BASIC).unwrap();
        config.blocks.clear();
        assert!(matches!(
            config.validate().unwrap_err(),
            AnalysisError::MissingConfigError { .. }
        ));

        let mut config = AnalysisConfig::from_toml_str(BASIC).unwrap();
        config.report.formats.clear();
        config.report.bundle = true;
        assert!(matches!(
            config.validate().unwrap_err(),
            AnalysisError::MissingConfigError { .. }
        ));
    }

    #[test]
    fn test_labels_sharing_a_file_stem_are_rejected() {
        let toml_content = r#"
[analysis]
name = "stems"

[report]
formats = ["csv"]

[[blocks]]
label = "Row 1"
samples = [52, 21, 93]

[[blocks]]
label = "Row_1"
samples = [11]
"#;
        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();
        match config.validate().unwrap_err() {
            AnalysisError::InvalidConfigValueError { field, value, reason } => {
                assert_eq!(field, "blocks.label");
                assert_eq!(value, "Row_1");
                assert!(reason.contains("Row_1"));
                assert!(reason.contains("'Row 1'"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_nan_jitter_is_rejected() {
        let toml_content = r#"
[analysis]
name = "jitter"

[report.plot]
jitter = nan

[[blocks]]
label = "Row1"
samples = [55, 55]
"#;
        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();
        assert!(config.report.plot.jitter.is_nan());
        assert!(matches!(
            config.validate().unwrap_err(),
            AnalysisError::InvalidConfigValueError { ref field, .. } if field == "report.plot.jitter"
        ));
    }

    #[test]
    fn test_invalid_format_is_rejected_at_parse_time() {
        let toml_content = r#"
[analysis]
name = "bad"

[report]
formats = ["pdf"]
"#;
        let err = AnalysisConfig::from_toml_str(toml_content).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DOMINANCE_FRONTS_TEST_OUT", "/tmp/fronts");

        let toml_content = r#"
[analysis]
name = "env"

[report]
output_dir = "${DOMINANCE_FRONTS_TEST_OUT}"

[[blocks]]
label = "Row1"
samples = [1]
"#;
        let config = AnalysisConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.report.output_dir, "/tmp/fronts");

        std::env::remove_var("DOMINANCE_FRONTS_TEST_OUT");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = AnalysisConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.blocks.len(), 3);
    }
}
