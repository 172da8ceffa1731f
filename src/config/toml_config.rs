use crate::core::TextMode;
use crate::utils::error::{Result, TallyError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: Option<InputConfig>,
    pub gazetteer: Option<GazetteerConfig>,
    pub output: Option<OutputConfig>,
    pub keywords: Option<KeywordsConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub base_dir: Option<String>,
    pub files: Option<Vec<String>>,
    pub mode: Option<TextMode>,
    /// File name -> calendar month. Replaces the built-in 2018 table.
    pub months: Option<BTreeMap<String, u32>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GazetteerConfig {
    /// Inline list of names. Ignored when `file` is set.
    pub cities: Option<Vec<String>>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<String>,
    pub formats: Option<Vec<String>>,
    pub top: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordsConfig {
    /// Include the built-in perk and job-title terms.
    #[serde(default)]
    pub defaults: bool,
    pub terms: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TallyError::ConfigError {
            message: format!("cannot read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TallyError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}
