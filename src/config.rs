use crate::aggregator::RaggedPolicy;
use crate::error::{Result, TextMergeError};
use crate::scanner::FileFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PATTERN: &str = "*.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "negative_text.txt";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub concat: ConcatConfig,
    pub matrix: MatrixConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub directory: PathBuf,
    pub pattern: String,
    pub exclude_patterns: Vec<String>,
    pub max_depth: usize,
    pub sort: bool,
    pub normalize_newlines: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConcatConfig {
    pub output_path: PathBuf,
    pub atomic_write: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub ragged: RaggedPolicy,
    pub pad_value: String,
    pub preview_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            pattern: DEFAULT_PATTERN.to_string(),
            exclude_patterns: Vec::new(),
            max_depth: 1,
            sort: true,
            normalize_newlines: true,
        }
    }
}

impl Default for ConcatConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            atomic_write: true,
        }
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            ragged: RaggedPolicy::Keep,
            pad_value: String::new(),
            preview_rows: 10,
            export_path: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TextMergeError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TextMergeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| TextMergeError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["textmerge.toml", ".textmerge.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        tracing::debug!(path = default_path, "loading configuration");
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.directory {
            self.discovery.directory = directory.clone();
        }

        if let Some(ref pattern) = cli_args.pattern {
            self.discovery.pattern = pattern.trim().to_string();
        }

        if let Some(ref exclude) = cli_args.exclude {
            self.discovery.exclude_patterns.extend(exclude.clone());
        }

        if let Some(max_depth) = cli_args.max_depth {
            self.discovery.max_depth = max_depth;
        }

        if let Some(ref output_path) = cli_args.output_path {
            self.concat.output_path = output_path.clone();
        }

        if let Some(atomic_write) = cli_args.atomic_write {
            self.concat.atomic_write = atomic_write;
        }

        if let Some(ragged) = cli_args.ragged {
            self.matrix.ragged = ragged;
        }

        if let Some(ref pad_value) = cli_args.pad_value {
            self.matrix.pad_value = pad_value.clone();
        }

        if let Some(preview_rows) = cli_args.preview_rows {
            self.matrix.preview_rows = preview_rows;
        }

        if let Some(ref export_path) = cli_args.export_path {
            self.matrix.export_path = Some(export_path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.discovery.pattern.is_empty() {
            return Err(TextMergeError::Config {
                message: "A file pattern must be specified".to_string(),
            });
        }

        FileFilter::new(&self.discovery)?;

        if self.discovery.max_depth == 0 {
            return Err(TextMergeError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        if self.concat.output_path.as_os_str().is_empty() {
            return Err(TextMergeError::Config {
                message: "An output path must be specified".to_string(),
            });
        }

        if self.concat.output_path.is_dir() {
            return Err(TextMergeError::Config {
                message: format!(
                    "Output path is a directory: {}",
                    self.concat.output_path.display()
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub pattern: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub output_path: Option<PathBuf>,
    pub atomic_write: Option<bool>,
    pub ragged: Option<RaggedPolicy>,
    pub pad_value: Option<String>,
    pub preview_rows: Option<usize>,
    pub export_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_atomic_write(mut self, atomic_write: Option<bool>) -> Self {
        self.atomic_write = atomic_write;
        self
    }

    pub fn with_ragged(mut self, ragged: Option<RaggedPolicy>) -> Self {
        self.ragged = ragged;
        self
    }

    pub fn with_pad_value(mut self, pad_value: Option<String>) -> Self {
        self.pad_value = pad_value;
        self
    }

    pub fn with_preview_rows(mut self, preview_rows: Option<usize>) -> Self {
        self.preview_rows = preview_rows;
        self
    }

    pub fn with_export_path(mut self, export_path: Option<PathBuf>) -> Self {
        self.export_path = export_path;
        self
    }
}
