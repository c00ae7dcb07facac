use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

use crate::pipeline::{FileSet, PipelineConfig};

pub const DEFAULT_VERSION: &str = "latest";
pub const DEFAULT_TOOL_NAME: &str = "vectorlint";
pub const DEFAULT_REPORTER: &str = "github-pr-check";
pub const DEFAULT_FILTER_MODE: &str = "added";
pub const DEFAULT_FAIL_ON_ERROR: &str = "false";

/// A boolean kept as the text the reporter will receive.
///
/// YAML may spell it `true` or `"true"`; both become the string `"true"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolText(pub String);

impl<'de> Deserialize<'de> for BoolText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BoolTextVisitor;

        impl<'de> Visitor<'de> for BoolTextVisitor {
            type Value = BoolText;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a boolean or a string")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<BoolText, E> {
                Ok(BoolText(value.to_string()))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<BoolText, E> {
                Ok(BoolText(value.to_string()))
            }
        }

        deserializer.deserialize_any(BoolTextVisitor)
    }
}

/// Options read from a YAML config file. Every field is optional; unset
/// fields fall back to flags/env or built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub vectorlint_version: Option<String>,
    pub reviewdog_version: Option<String>,
    pub tool_name: Option<String>,
    pub reporter: Option<String>,
    pub filter_mode: Option<String>,
    pub fail_on_error: Option<BoolText>,
    pub vectorlint_flags: Option<String>,
    pub skip_install: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub vectorlint_version: String,
    pub reviewdog_version: String,
    pub tool_name: String,
    pub reporter: String,
    pub filter_mode: String,
    pub fail_on_error: String,
    pub vectorlint_flags: String,
    /// Pull request base branch; `None` scans the whole tree.
    pub base_ref: Option<String>,
    pub github_token: Option<String>,
    pub skip_install: bool,
    /// Environment for the linter process only.
    pub linter_env: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vectorlint_version: DEFAULT_VERSION.to_string(),
            reviewdog_version: DEFAULT_VERSION.to_string(),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            reporter: DEFAULT_REPORTER.to_string(),
            filter_mode: DEFAULT_FILTER_MODE.to_string(),
            fail_on_error: DEFAULT_FAIL_ON_ERROR.to_string(),
            vectorlint_flags: String::new(),
            base_ref: None,
            github_token: None,
            skip_install: false,
            linter_env: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn pipeline_config(&self, files: FileSet) -> PipelineConfig {
        PipelineConfig {
            files,
            lint_flags: self.vectorlint_flags.clone(),
            tool_name: self.tool_name.clone(),
            reporter: self.reporter.clone(),
            filter_mode: self.filter_mode.clone(),
            fail_on_error: self.fail_on_error.clone(),
        }
    }
}

/// Treat empty or whitespace-only values as unset.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
