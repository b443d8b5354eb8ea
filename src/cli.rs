use crate::aggregator::RaggedPolicy;
use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "textmerge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate the text files of a directory")]
#[command(
    long_about = "TextMerge collects the files of a directory that match a glob pattern and \
                  either concatenates them into one output file or reads them into a \
                  files-by-lines matrix."
)]
#[command(after_help = "EXAMPLES:\n  \
    textmerge concat\n  \
    textmerge concat --dir reviews/neg --output negative_text.txt\n  \
    textmerge matrix --dir reviews/pos --ragged pad --pad-value '<eof>'\n  \
    textmerge matrix --pattern '*.md' --output-format json")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory to search for input files
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Glob matched against file names
    #[arg(short, long, global = true, help = "File name pattern (default: *.txt)")]
    pub pattern: Option<String>,

    /// Regular expressions for relative paths to skip (comma-separated)
    #[arg(short, long, value_delimiter = ',', global = true)]
    pub exclude: Option<Vec<String>>,

    /// Directory levels to search (1 = only the directory itself)
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Concatenate every matching file into one output file
    Concat {
        /// Output file (default: negative_text.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write straight into the output file; a failure leaves it partially written
        #[arg(long)]
        in_place: bool,
    },

    /// Read every matching file into a files-by-lines matrix and report its shape
    Matrix {
        /// How to treat files with different line counts
        #[arg(long, value_enum)]
        ragged: Option<RaggedPolicy>,

        /// Value appended to short rows with --ragged pad
        #[arg(long)]
        pad_value: Option<String>,

        /// Number of rows to print
        #[arg(long)]
        preview_rows: Option<usize>,

        /// Write the whole matrix as JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<&OutputFormat> for OutputMode {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let overrides = CliOverrides::new()
            .with_directory(self.dir.clone())
            .with_pattern(self.pattern.clone())
            .with_exclude(self.exclude.clone())
            .with_max_depth(self.max_depth);

        match self.command {
            Some(Command::Concat {
                ref output,
                in_place,
            }) => overrides
                .with_output_path(output.clone())
                .with_atomic_write(in_place.then_some(false)),
            Some(Command::Matrix {
                ragged,
                ref pad_value,
                preview_rows,
                ref export,
            }) => overrides
                .with_ragged(ragged)
                .with_pad_value(pad_value.clone())
                .with_preview_rows(preview_rows)
                .with_export_path(export.clone()),
            None => overrides,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from(&self.output_format)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
