pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, Command, OutputFormat};
pub use config::{CliOverrides, ConcatConfig, Config, DiscoveryConfig, MatrixConfig};
pub use error::{Result, TextMergeError, UserFriendlyError};

// Core functionality re-exports
pub use aggregator::{
    ConcatProgress, ConcatReport, Concatenator, LineMatrix, LineMatrixBuilder, MatrixShape,
    RaggedPolicy,
};
pub use scanner::{FileDiscovery, FileFilter, TextFile};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface: discovery plus the two aggregation modes.
pub struct TextMerge {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl TextMerge {
    /// Create an instance that installs the Ctrl+C handler.
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(
            config,
            output_mode,
            verbose,
            quiet,
            shutdown,
        ))
    }

    /// Create an instance around an existing shutdown flag (no signal handler).
    pub fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        )
    }

    /// Find every matching file in the configured directory and print it.
    pub fn discover_files(&self) -> Result<Vec<TextFile>> {
        self.discover(None)
    }

    // `excluded` is skipped even when its name matches the pattern.
    fn discover(&self, excluded: Option<&Path>) -> Result<Vec<TextFile>> {
        self.shutdown.check_shutdown()?;
        self.output_formatter.start_operation(&format!(
            "Searching {} for {}",
            self.config.discovery.directory.display(),
            self.config.discovery.pattern
        ));

        let mut discovery = FileDiscovery::new(&self.config.discovery)?;
        if let Some(path) = excluded {
            discovery = discovery.with_excluded_path(path);
        }
        let files = discovery.discover(&self.config.discovery.directory)?;

        self.output_formatter.print_file_list(&files);
        if files.is_empty() {
            self.output_formatter.warning(&format!(
                "No files matching '{}' found in {}",
                self.config.discovery.pattern,
                self.config.discovery.directory.display()
            ));
        }

        Ok(files)
    }

    /// Concatenate the discovered files into the configured output path.
    ///
    /// The output path itself is left out of the file set, so a rerun never
    /// reads its own previous output.
    pub fn concatenate(&self) -> Result<ConcatReport> {
        let files = self.discover(Some(self.config.concat.output_path.as_path()))?;
        let inputs: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();
        self.concatenate_files(&inputs, &self.config.concat.output_path)
    }

    /// Concatenate an explicit list of inputs, printing progress as it goes.
    pub fn concatenate_files(&self, inputs: &[PathBuf], output_path: &Path) -> Result<ConcatReport> {
        self.output_formatter
            .start_operation(&format!("Concatenating into {}", output_path.display()));

        let file_progress = self.progress_manager.create_file_progress(inputs.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            let formatter = &self.output_formatter;
            move |progress: &ConcatProgress| {
                ui::progress::update_concat_progress(&pb, progress);
                if pb.is_hidden() {
                    formatter.print_progress_index(progress);
                }
            }
        };

        if !self.config.concat.atomic_write {
            self.output_formatter
                .info("Writing in place; a failure leaves partial output");
        }

        let concatenator = Concatenator::new()
            .with_normalize_newlines(self.config.discovery.normalize_newlines)
            .with_atomic_write(self.config.concat.atomic_write)
            .with_shutdown(self.shutdown.clone());

        let progress = match concatenator.concatenate(inputs, output_path, Some(&progress_callback)) {
            Ok(progress) => progress,
            Err(e) => {
                file_progress.abandon_with_message("Concatenation failed");
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Merged {} files", progress.files_processed),
            progress.elapsed(),
        );

        let report =
            ConcatReport::from_progress(progress, output_path, self.config.concat.atomic_write);
        self.output_formatter.print_concat_report(&report);

        Ok(report)
    }

    /// Read the discovered files into a line matrix, apply the ragged policy
    /// and print the shape and first rows.
    pub fn build_line_matrix(&self) -> Result<LineMatrix> {
        let files = self.discover_files()?;
        let inputs: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();

        self.output_formatter.start_operation("Building line matrix");
        let spinner = self.progress_manager.create_spinner("Reading files...");

        let builder = LineMatrixBuilder::new()
            .with_normalize_newlines(self.config.discovery.normalize_newlines)
            .with_shutdown(self.shutdown.clone());

        let matrix = builder.build(&inputs).and_then(|matrix| {
            matrix.rectangularize(self.config.matrix.ragged, &self.config.matrix.pad_value)
        });
        spinner.finish_and_clear();
        let matrix = matrix?;

        tracing::info!(shape = %matrix.shape(), "line matrix built");
        self.output_formatter
            .debug(&format!("Read {} files into the line matrix", matrix.len()));
        self.output_formatter
            .print_line_matrix(&matrix, self.config.matrix.preview_rows);

        if let Some(ref export_path) = self.config.matrix.export_path {
            export_matrix(&matrix, export_path)?;
            self.output_formatter
                .success(&format!("Exported matrix to {}", export_path.display()));
        }

        Ok(matrix)
    }

    /// Run the operation selected on the command line.
    pub fn run(&self, command: &Command) -> Result<()> {
        match command {
            Command::Concat { .. } => self.concatenate().map(|_| ()),
            Command::Matrix { .. } => self.build_line_matrix().map(|_| ()),
        }
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)
            .map_err(|e| TextMergeError::write(output_path.as_ref(), e))?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &TextMergeError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

fn export_matrix(matrix: &LineMatrix, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| TextMergeError::write(path, e))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), matrix)
        .map_err(|e| TextMergeError::write(path, e.into()))?;
    Ok(())
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
