use crate::config::toml_config::TomlConfig;
use crate::config::{parse_formats, GazetteerSource, TallyConfig};
use crate::core::TextMode;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "city-tally")]
#[command(about = "Count city mentions across hiring-thread dumps")]
pub struct CliConfig {
    /// Files to scan, relative to --base-dir. Defaults to the twelve 2018 thread dumps.
    pub files: Vec<String>,

    /// Directory the input files are read from
    #[arg(long)]
    pub base_dir: Option<String>,

    /// TOML configuration file; flags given here override it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Newline-separated list of city names to match instead of the built-in list
    #[arg(long)]
    pub gazetteer: Option<PathBuf>,

    /// Parse inputs as JSON comment arrays and scan only comment bodies
    #[arg(long)]
    pub comments: bool,

    /// Directory for exported reports
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Export formats (json, csv)
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Also count comments mentioning the built-in perks and job titles
    #[arg(long)]
    pub keywords: bool,

    /// Count comments mentioning TERM (repeatable)
    #[arg(long = "keyword", value_name = "TERM")]
    pub keyword: Vec<String>,

    /// Print only the N most frequent cities in the ranking
    #[arg(long)]
    pub top: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,
}

impl CliConfig {
    /// Defaults, then the TOML file if one was given, then command-line flags.
    pub fn resolve(&self) -> Result<TallyConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TallyConfig::from_toml(&TomlConfig::from_file(path)?)?
            }
            None => TallyConfig::default(),
        };

        if !self.files.is_empty() {
            config.files = self.files.clone();
        }
        if let Some(base_dir) = &self.base_dir {
            config.base_dir = base_dir.clone();
        }
        if let Some(path) = &self.gazetteer {
            config.gazetteer = GazetteerSource::File(path.clone());
        }
        if self.comments {
            config.mode = TextMode::Comments;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if !self.format.is_empty() {
            config.formats = parse_formats(self.format.as_slice())?;
        }
        if self.keywords {
            config.add_default_keywords();
        }
        config.add_keywords(self.keyword.as_slice());
        if self.top.is_some() {
            config.top = self.top;
        }
        config.monitor |= self.monitor;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExportFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_no_flags_gives_defaults() {
        let cli = CliConfig::parse_from(["city-tally"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.files.len(), 12);
        assert_eq!(config.gazetteer, GazetteerSource::BuiltIn);
        assert_eq!(config.mode, TextMode::Raw);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "city-tally",
            "--base-dir",
            "/tmp/hn",
            "--comments",
            "--format",
            "csv,json",
            "--top",
            "5",
            "a.json",
            "b.json",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.base_dir, "/tmp/hn");
        assert_eq!(config.files, vec!["a.json", "b.json"]);
        assert_eq!(config.mode, TextMode::Comments);
        assert_eq!(config.formats, vec![ExportFormat::Csv, ExportFormat::Json]);
        assert_eq!(config.top, Some(5));
    }

    #[test]
    fn test_flags_override_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[input]\nbase_dir = \"/from/toml\"\nfiles = [\"x.json\"]\n")
            .unwrap();
        let config_path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from(["city-tally", "--config", config_path.as_str(), "--base-dir", "/from/cli"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.base_dir, "/from/cli");
        assert_eq!(config.files, vec!["x.json"]);
    }

    #[test]
    fn test_keyword_flags() {
        let cli = CliConfig::parse_from(["city-tally", "--keyword", "Rust", "--keyword", "Go"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.keywords, vec!["Rust", "Go"]);

        let cli = CliConfig::parse_from(["city-tally", "--keywords", "--keyword", "remote"]);
        let config = cli.resolve().unwrap();
        assert!(config.keywords.contains(&"Full Time".to_string()));
        assert_eq!(config.keywords.iter().filter(|t| *t == "remote").count(), 1);
    }

    #[test]
    fn test_uppercase_format_is_accepted() {
        let cli = CliConfig::parse_from(["city-tally", "--format", "JSON"]);
        assert_eq!(cli.resolve().unwrap().formats, vec![ExportFormat::Json]);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let cli = CliConfig::parse_from(["city-tally", "--format", "xml"]);
        assert!(cli.resolve().is_err());
    }
}
