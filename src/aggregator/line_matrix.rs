//! Files-by-lines view of a file set.

use crate::aggregator::text::{read_text, split_lines};
use crate::error::{Result, TextMergeError};
use crate::ui::GracefulShutdown;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// What to do when files have different line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RaggedPolicy {
    /// Keep rows as they are and report a ragged shape
    #[default]
    Keep,
    /// Fail when line counts differ
    Reject,
    /// Pad short rows at the end with the pad value
    Pad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MatrixShape {
    Rectangular {
        rows: usize,
        columns: usize,
    },
    Ragged {
        rows: usize,
        min_columns: usize,
        max_columns: usize,
    },
}

impl MatrixShape {
    pub fn rows(&self) -> usize {
        match self {
            MatrixShape::Rectangular { rows, .. } | MatrixShape::Ragged { rows, .. } => *rows,
        }
    }

    pub fn is_ragged(&self) -> bool {
        matches!(self, MatrixShape::Ragged { .. })
    }
}

impl fmt::Display for MatrixShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixShape::Rectangular { rows, columns } => write!(f, "({}, {})", rows, columns),
            MatrixShape::Ragged {
                rows,
                min_columns,
                max_columns,
            } => write!(
                f,
                "({},) ragged, {}..={} lines per file",
                rows, min_columns, max_columns
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineMatrix {
    files: Vec<PathBuf>,
    rows: Vec<Vec<String>>,
}

impl LineMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, file: PathBuf, lines: Vec<String>) {
        self.files.push(file);
        self.rows.push(lines);
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows paired with the file they came from.
    pub fn head(&self, n: usize) -> impl Iterator<Item = (&Path, &[String])> {
        self.files
            .iter()
            .zip(self.rows.iter())
            .take(n)
            .map(|(file, row)| (file.as_path(), row.as_slice()))
    }

    pub fn shape(&self) -> MatrixShape {
        let rows = self.rows.len();
        let min_columns = self.rows.iter().map(Vec::len).min().unwrap_or(0);
        let max_columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);

        if min_columns == max_columns {
            MatrixShape::Rectangular {
                rows,
                columns: max_columns,
            }
        } else {
            MatrixShape::Ragged {
                rows,
                min_columns,
                max_columns,
            }
        }
    }

    /// Apply `policy` to a possibly ragged matrix.
    pub fn rectangularize(mut self, policy: RaggedPolicy, pad_value: &str) -> Result<Self> {
        let MatrixShape::Ragged {
            rows,
            min_columns,
            max_columns,
        } = self.shape()
        else {
            return Ok(self);
        };

        match policy {
            RaggedPolicy::Keep => Ok(self),
            RaggedPolicy::Reject => Err(TextMergeError::RaggedMatrix {
                rows,
                min_columns,
                max_columns,
            }),
            RaggedPolicy::Pad => {
                for row in &mut self.rows {
                    row.resize(max_columns, pad_value.to_string());
                }
                Ok(self)
            }
        }
    }
}

pub struct LineMatrixBuilder {
    normalize_newlines: bool,
    shutdown: Option<GracefulShutdown>,
}

impl LineMatrixBuilder {
    pub fn new() -> Self {
        Self {
            normalize_newlines: true,
            shutdown: None,
        }
    }

    pub fn with_normalize_newlines(mut self, normalize: bool) -> Self {
        self.normalize_newlines = normalize;
        self
    }

    pub fn with_shutdown(mut self, shutdown: GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn build(&self, files: &[PathBuf]) -> Result<LineMatrix> {
        let mut matrix = LineMatrix::new();

        for file in files {
            if let Some(ref shutdown) = self.shutdown {
                shutdown.check_shutdown()?;
            }

            let text = read_text(file, self.normalize_newlines)?;
            let lines = split_lines(&text);
            tracing::debug!(path = %file.display(), lines = lines.len(), "read file");

            matrix.push_row(file.clone(), lines);
        }

        Ok(matrix)
    }
}

impl Default for LineMatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}
