use crate::config::DiscoveryConfig;
use crate::error::{Result, TextMergeError};
use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::path::{Path, PathBuf};

// Shell glob semantics: case-sensitive, `*` never crosses a separator and
// never matches a leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

pub struct FileFilter {
    pattern: Pattern,
    exclude_patterns: Vec<Regex>,
    excluded_paths: Vec<PathBuf>,
}

impl FileFilter {
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let pattern =
            Pattern::new(&config.pattern).map_err(|e| TextMergeError::InvalidPattern {
                pattern: config.pattern.clone(),
                message: e.msg.to_string(),
            })?;

        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| TextMergeError::Config {
                    message: format!("Invalid exclude pattern '{}': {}", pattern, e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            pattern,
            exclude_patterns,
            excluded_paths: Vec::new(),
        })
    }

    /// Exclude one specific file from matching, whatever its name.
    ///
    /// Paths are compared after canonicalization, so a path that does not
    /// exist yet is remembered as given.
    pub fn exclude_path<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !self.excluded_paths.contains(&path) {
            self.excluded_paths.push(path);
        }
    }

    pub fn matches_name(&self, file_name: &str) -> bool {
        self.pattern.matches_with(file_name, MATCH_OPTIONS)
    }

    pub fn matches_any_exclude(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    pub fn is_excluded_path(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.excluded_paths.contains(&path)
    }

    /// Decide whether a file belongs to the file set.
    ///
    /// `relative_path` is the path below the discovery root and is what the
    /// exclude regexes see.
    pub fn is_selected(&self, path: &Path, relative_path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            return false;
        };

        if !self.matches_name(file_name) {
            return false;
        }

        if self.matches_any_exclude(&relative_path.to_string_lossy()) {
            return false;
        }

        !self.is_excluded_path(path)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}
