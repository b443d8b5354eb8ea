use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextMergeError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is not valid UTF-8 text: {path}")]
    Encoding { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Output file is also an input: {path}")]
    OutputIsInput { path: PathBuf },

    #[error("Line counts differ across {rows} files ({min_columns}..={max_columns} lines)")]
    RaggedMatrix {
        rows: usize,
        min_columns: usize,
        max_columns: usize,
    },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl TextMergeError {
    pub fn read<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        TextMergeError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        TextMergeError::Write {
            path: path.into(),
            source,
        }
    }

    /// Process exit code reported by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TextMergeError::Config { .. }
            | TextMergeError::InvalidPattern { .. }
            | TextMergeError::InvalidPath { .. }
            | TextMergeError::OutputIsInput { .. } => 2,
            TextMergeError::Read { .. } => 3,
            TextMergeError::Write { .. } => 4,
            TextMergeError::Encoding { .. } => 5,
            TextMergeError::RaggedMatrix { .. } => 6,
            TextMergeError::Cancelled => 130,
            TextMergeError::Io(_) => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TextMergeError {
    fn user_message(&self) -> String {
        match self {
            TextMergeError::Read { path, source } => match source.kind() {
                std::io::ErrorKind::NotFound => {
                    format!("Input file not found: {}", path.display())
                }
                std::io::ErrorKind::PermissionDenied => {
                    format!("Permission denied reading: {}", path.display())
                }
                _ => format!("Could not read {}: {}", path.display(), source),
            },
            TextMergeError::Write { path, source } => match source.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    format!("Permission denied writing: {}", path.display())
                }
                _ => format!("Could not write {}: {}", path.display(), source),
            },
            TextMergeError::Encoding { path } => {
                format!("{} does not contain valid UTF-8 text", path.display())
            }
            TextMergeError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            TextMergeError::OutputIsInput { path } => {
                format!(
                    "The output file {} is also one of the input files",
                    path.display()
                )
            }
            TextMergeError::RaggedMatrix {
                rows,
                min_columns,
                max_columns,
            } => format!(
                "Cannot build a rectangular matrix: {} files have between {} and {} lines",
                rows, min_columns, max_columns
            ),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TextMergeError::Read { .. } => Some(
                "Check that every matched file still exists and is readable.".to_string(),
            ),
            TextMergeError::Write { .. } => Some(
                "Ensure the output directory exists and you have write permission, or pick another path with --output.".to_string(),
            ),
            TextMergeError::Encoding { .. } => Some(
                "Exclude binary or non UTF-8 files with --exclude or narrow the --pattern.".to_string(),
            ),
            TextMergeError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are valid.".to_string(),
            ),
            TextMergeError::InvalidPattern { .. } => Some(
                "Use a shell-style glob such as '*.txt' or 'notes_*.md'.".to_string(),
            ),
            TextMergeError::InvalidPath { .. } => Some(
                "Pass an existing directory with --dir.".to_string(),
            ),
            TextMergeError::OutputIsInput { .. } => Some(
                "Write the output outside the input set, e.g. with --output ../merged.txt.".to_string(),
            ),
            TextMergeError::RaggedMatrix { .. } => Some(
                "Use --ragged keep to report the ragged shape, or --ragged pad to fill short rows.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for TextMergeError {
    fn from(error: toml::de::Error) -> Self {
        TextMergeError::Config {
            message: error.to_string(),
        }
    }
}

impl From<walkdir::Error> for TextMergeError {
    fn from(error: walkdir::Error) -> Self {
        let message = error.to_string();
        match error.into_io_error() {
            Some(io_error) => TextMergeError::Io(io_error),
            None => TextMergeError::InvalidPath { path: message },
        }
    }
}

pub type Result<T> = std::result::Result<T, TextMergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = TextMergeError::read(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(error.user_message().contains("Input file not found"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_ragged_message() {
        let error = TextMergeError::RaggedMatrix {
            rows: 3,
            min_columns: 1,
            max_columns: 4,
        };
        assert!(error.user_message().contains("between 1 and 4 lines"));
        assert_eq!(error.exit_code(), 6);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(TextMergeError::Cancelled.exit_code(), 130);
        assert_eq!(
            TextMergeError::Encoding {
                path: PathBuf::from("a.txt")
            }
            .exit_code(),
            5
        );
        assert_eq!(
            TextMergeError::Config {
                message: "bad".to_string()
            }
            .exit_code(),
            2
        );
    }
}
