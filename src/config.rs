use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PREVIEW: &str = "androidx.compose.ui.tooling.preview.Preview";
pub const PREVIEW_PARAMETER: &str = "androidx.compose.ui.tooling.preview.PreviewParameter";
pub const PREVIEW_TEST: &str = "com.android.tools.screenshot.PreviewTest";
pub const COMPOSABLE: &str = "androidx.compose.runtime.Composable";
pub const IGNORE_PREVIEW: &str = "com.fediim.autoshot.annotation.IgnorePreview";

pub const DEFAULT_REPORT_PATH: &str = "build/autoshot/preview_visibility_report.txt";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessorConfig {
    /// Files whose path contains any of these (ignoring case) are skipped
    pub excluded_paths: Vec<String>,
    /// Base preview annotation
    pub preview_annotation: String,
    /// Marks the parameter that receives sample values
    pub preview_parameter_annotation: String,
    /// Argument of the parameter annotation that survives into generated code
    pub provider_argument: String,
    /// Opt-out annotation
    pub ignore_annotation: String,
    /// Added to every generated test function
    pub screenshot_test_annotation: String,
    pub composable_annotation: String,
    /// Appended to both generated file and function names
    pub suffix: String,
    pub report_path: PathBuf,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            excluded_paths: vec![
                "/generated/".to_string(),
                "/test/".to_string(),
                "/androidTest/".to_string(),
                "/screenshotTest/".to_string(),
            ],
            preview_annotation: PREVIEW.to_string(),
            preview_parameter_annotation: PREVIEW_PARAMETER.to_string(),
            provider_argument: "provider".to_string(),
            ignore_annotation: IGNORE_PREVIEW.to_string(),
            screenshot_test_annotation: PREVIEW_TEST.to_string(),
            composable_annotation: COMPOSABLE.to_string(),
            suffix: "ScreenshotTest".to_string(),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl ProcessorConfig {
    /// Load config from a JSON file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply host processor options (`autoshot.*` keys). Unknown keys are ignored.
    pub fn with_options<'a>(
        mut self,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        for (key, value) in options {
            match key {
                "autoshot.excludedPaths" => {
                    self.excluded_paths = value
                        .split(',')
                        .map(str::trim)
                        .filter(|path| !path.is_empty())
                        .map(String::from)
                        .collect();
                }
                "autoshot.reportPath" => self.report_path = PathBuf::from(value),
                "autoshot.suffix" => self.suffix = value.to_string(),
                _ => tracing::debug!(key, "ignoring unknown processor option"),
            }
        }
        self
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.excluded_paths
            .iter()
            .any(|excluded| path.contains(&excluded.to_lowercase()))
    }
}
