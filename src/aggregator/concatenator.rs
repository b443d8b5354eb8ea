use crate::aggregator::text::read_text;
use crate::error::{Result, TextMergeError};
use crate::ui::GracefulShutdown;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

/// Written after every input file's content.
pub const SEPARATOR: &str = "\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcatEntry {
    pub path: PathBuf,
    /// Bytes appended to the output for this file, separator included.
    pub bytes_written: u64,
}

#[derive(Debug, Clone)]
pub struct ConcatProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub entries: Vec<ConcatEntry>,
}

impl ConcatProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
            entries: Vec::with_capacity(total_files),
        }
    }

    pub fn begin_file(&mut self, path: &Path) {
        self.current_file = Some(path.display().to_string());
    }

    pub fn finish_file(&mut self, path: &Path, bytes: u64) {
        self.files_processed += 1;
        self.bytes_written += bytes;
        self.entries.push(ConcatEntry {
            path: path.to_path_buf(),
            bytes_written: bytes,
        });
    }

    /// Zero-based position of the file currently being appended.
    pub fn index(&self) -> usize {
        self.files_processed
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcatReport {
    pub output_path: PathBuf,
    pub files: Vec<ConcatEntry>,
    pub total_bytes: u64,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
    pub atomic_write: bool,
}

impl ConcatReport {
    pub fn from_progress(progress: ConcatProgress, output_path: &Path, atomic_write: bool) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            duration: progress.elapsed(),
            total_bytes: progress.bytes_written,
            files: progress.entries,
            completed_at: Utc::now(),
            atomic_write,
        }
    }
}

pub struct Concatenator {
    normalize_newlines: bool,
    atomic_write: bool,
    buffer_size: usize,
    shutdown: Option<GracefulShutdown>,
}

impl Concatenator {
    pub fn new() -> Self {
        Self {
            normalize_newlines: true,
            atomic_write: true,
            buffer_size: 64 * 1024,
            shutdown: None,
        }
    }

    pub fn with_normalize_newlines(mut self, normalize: bool) -> Self {
        self.normalize_newlines = normalize;
        self
    }

    pub fn with_atomic_write(mut self, atomic: bool) -> Self {
        self.atomic_write = atomic;
        self
    }

    pub fn with_shutdown(mut self, shutdown: GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Write every input, in order, followed by one newline, into `output_path`.
    ///
    /// The output is truncated, never appended to. `progress_callback` runs
    /// before each input is read.
    pub fn concatenate(
        &self,
        inputs: &[PathBuf],
        output_path: &Path,
        progress_callback: Option<&dyn Fn(&ConcatProgress)>,
    ) -> Result<ConcatProgress> {
        check_output_not_input(inputs, output_path)?;

        let mut progress = ConcatProgress::new(inputs.len());

        if self.atomic_write {
            self.write_atomic(inputs, output_path, &mut progress, progress_callback)?;
        } else {
            self.write_in_place(inputs, output_path, &mut progress, progress_callback)?;
        }

        tracing::info!(
            output = %output_path.display(),
            files = progress.files_processed,
            bytes = progress.bytes_written,
            "concatenation finished"
        );

        Ok(progress)
    }

    // The temporary file lives next to the output so the final rename stays on
    // one filesystem. Dropping it on an error path deletes it.
    fn write_atomic(
        &self,
        inputs: &[PathBuf],
        output_path: &Path,
        progress: &mut ConcatProgress,
        progress_callback: Option<&dyn Fn(&ConcatProgress)>,
    ) -> Result<()> {
        let mut temp = NamedTempFile::new_in(output_directory(output_path))
            .map_err(|e| TextMergeError::write(output_path, e))?;

        {
            let mut writer = BufWriter::with_capacity(self.buffer_size, temp.as_file_mut());
            self.write_inputs(inputs, &mut writer, output_path, progress, progress_callback)?;
            writer
                .flush()
                .map_err(|e| TextMergeError::write(output_path, e))?;
        }

        apply_output_permissions(temp.as_file(), output_path)?;

        temp.persist(output_path)
            .map_err(|e| TextMergeError::write(output_path, e.error))?;

        Ok(())
    }

    fn write_in_place(
        &self,
        inputs: &[PathBuf],
        output_path: &Path,
        progress: &mut ConcatProgress,
        progress_callback: Option<&dyn Fn(&ConcatProgress)>,
    ) -> Result<()> {
        let file = fs::File::create(output_path).map_err(|e| TextMergeError::write(output_path, e))?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);

        self.write_inputs(inputs, &mut writer, output_path, progress, progress_callback)?;

        writer
            .flush()
            .map_err(|e| TextMergeError::write(output_path, e))?;

        Ok(())
    }

    fn write_inputs<W: Write>(
        &self,
        inputs: &[PathBuf],
        writer: &mut W,
        output_path: &Path,
        progress: &mut ConcatProgress,
        progress_callback: Option<&dyn Fn(&ConcatProgress)>,
    ) -> Result<()> {
        for input in inputs {
            if let Some(ref shutdown) = self.shutdown {
                shutdown.check_shutdown()?;
            }

            progress.begin_file(input);
            if let Some(callback) = progress_callback {
                callback(progress);
            }

            tracing::debug!(index = progress.index(), path = %input.display(), "appending file");

            let text = read_text(input, self.normalize_newlines)?;

            writer
                .write_all(text.as_bytes())
                .and_then(|_| writer.write_all(SEPARATOR.as_bytes()))
                .map_err(|e| TextMergeError::write(output_path, e))?;

            progress.finish_file(input, (text.len() + SEPARATOR.len()) as u64);
        }

        progress.current_file = None;
        Ok(())
    }
}

impl Default for Concatenator {
    fn default() -> Self {
        Self::new()
    }
}

fn output_directory(output_path: &Path) -> &Path {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn check_output_not_input(inputs: &[PathBuf], output_path: &Path) -> Result<()> {
    // An output that does not exist yet cannot alias an input.
    let Ok(output) = output_path.canonicalize() else {
        return Ok(());
    };

    for input in inputs {
        if input.canonicalize().is_ok_and(|p| p == output) {
            return Err(TextMergeError::OutputIsInput {
                path: input.clone(),
            });
        }
    }

    Ok(())
}

// Temporary files are created owner-only; keep the mode an existing output
// already had, or the usual 0644 for a new one.
fn apply_output_permissions(file: &fs::File, output_path: &Path) -> Result<()> {
    let permissions = match fs::metadata(output_path) {
        Ok(metadata) => metadata.permissions(),
        Err(_) => default_permissions(file)?,
    };

    file.set_permissions(permissions)
        .map_err(|e| TextMergeError::write(output_path, e))
}

#[cfg(unix)]
fn default_permissions(_file: &fs::File) -> Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(file: &fs::File) -> Result<fs::Permissions> {
    Ok(file.metadata()?.permissions())
}
