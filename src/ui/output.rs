use crate::aggregator::{ConcatProgress, ConcatReport, LineMatrix};
use crate::error::{TextMergeError, UserFriendlyError};
use crate::scanner::TextFile;
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &TextMergeError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Print the discovered file set, in processing order.
    pub fn print_file_list(&self, files: &[TextFile]) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                let title = format!("Found {} matching files", files.len());
                if self.use_colors {
                    println!("{}{}", INFO, style(title).cyan());
                } else {
                    println!("i {}", title);
                }
                for file in files {
                    println!("  - {} ({})", file.display_path(), format_bytes(file.size));
                }
            }
            OutputMode::Json => {
                let files: Vec<_> = files
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "path": f.display_path(),
                            "size": f.size
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "files",
                    "files": files
                }));
            }
            OutputMode::Plain => {
                let names: Vec<String> = files.iter().map(TextFile::display_path).collect();
                println!("{:?}", names);
            }
        }
    }

    /// Per-file progress line, printed when no progress bar is drawn.
    pub fn print_progress_index(&self, progress: &ConcatProgress) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => println!(
                "[{}/{}] {}",
                progress.index(),
                progress.total_files,
                progress.current_file.as_deref().unwrap_or("")
            ),
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "progress",
                    "index": progress.index(),
                    "total": progress.total_files,
                    "file": progress.current_file
                }));
            }
            OutputMode::Plain => println!("{}", progress.index()),
        }
    }

    pub fn print_concat_report(&self, report: &ConcatReport) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => {
                let mut value = serde_json::to_value(report).unwrap_or_default();
                if let Some(object) = value.as_object_mut() {
                    object.insert("type".to_string(), serde_json::json!("report"));
                }
                self.print_json_object(&value);
            }
            OutputMode::Plain => {
                println!("REPORT: Concatenation completed");
                println!("Output: {}", report.output_path.display());
                println!("Files: {}", report.files.len());
                println!("Size: {} bytes", report.total_bytes);
                println!("Duration: {:?}", report.duration);
            }
        }
    }

    /// Print the shape of `matrix` and its first `preview_rows` rows.
    pub fn print_line_matrix(&self, matrix: &LineMatrix, preview_rows: usize) {
        if self.quiet {
            return;
        }

        let shape = matrix.shape();

        match self.mode {
            OutputMode::Human => {
                self.print_header("Line Matrix");
                if self.use_colors {
                    println!("Shape: {}", style(shape).cyan().bold());
                } else {
                    println!("Shape: {}", shape);
                }

                if !matrix.is_empty() {
                    println!();
                    println!("First {} entries:", preview_rows.min(matrix.len()));
                    for (index, (file, row)) in matrix.head(preview_rows).enumerate() {
                        let name = file
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| file.display().to_string());
                        println!("  [{}] {}: {:?}", index, name, row);
                    }
                }
            }
            OutputMode::Json => {
                let preview: Vec<_> = matrix
                    .head(preview_rows)
                    .map(|(file, row)| {
                        serde_json::json!({
                            "file": file.display().to_string(),
                            "lines": row
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "line_matrix",
                    "shape": shape,
                    "display_shape": shape.to_string(),
                    "preview": preview
                }));
            }
            OutputMode::Plain => {
                println!("{}", shape);
                for (_, row) in matrix.head(preview_rows) {
                    println!("{:?}", row);
                }
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            let (emoji, styled) = match msg_type {
                MessageType::Success => (&CHECKMARK, style(message).green().bold()),
                MessageType::Error => (&CROSS, style(message).red().bold()),
                MessageType::Warning => (&WARNING, style(message).yellow().bold()),
                MessageType::Info => (&INFO, style(message).cyan()),
            };

            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, styled),
                _ => println!("{}{}", emoji, styled),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &ConcatReport) {
        println!();
        self.print_separator();

        let headline = format!("Wrote {}", report.output_path.display());
        if self.use_colors {
            println!("{}{}", CHECKMARK, style(headline).green().bold());
        } else {
            println!("✓ {}", headline);
        }

        println!();
        println!("  Files merged:  {}", report.files.len());
        println!("  Bytes written: {}", format_bytes(report.total_bytes));
        println!("  Time taken:    {}", format_duration(report.duration));

        self.print_separator();
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_creation() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert_eq!(formatter.mode, OutputMode::Plain);
        assert_eq!(formatter.verbose_level, 1);
        assert!(!formatter.use_colors);
        assert!(!formatter.quiet);
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(formatter.quiet);
        assert!(!formatter.should_show_message(0));
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(2));
        assert!(!formatter.should_show_message(3));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
    }
}
