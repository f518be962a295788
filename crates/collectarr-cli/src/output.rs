use clap::ValueEnum;
use collection_sync_core::{FailureKind, RunSummary};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "success", "message": msg.as_ref() }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "info", "message": msg.as_ref() }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "warning", "message": msg.as_ref() }));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }

    /// Print a pass's summary: counts, then one line per recorded failure
    pub fn summary(&self, summary: &RunSummary) {
        if self.format != OutputFormat::Human {
            let mut value = serde_json::to_value(summary).unwrap_or_default();
            if let Some(object) = value.as_object_mut() {
                object.insert("type".to_string(), json!("summary"));
                object.insert("duration_seconds".to_string(), json!(summary.duration.as_secs_f64()));
            }
            self.json(&value);
            return;
        }

        let counts = if summary.dry_run {
            format!(
                "{} would be added, {} already present",
                summary.titles_would_add, summary.titles_already_present
            )
        } else {
            format!(
                "{} added, {} already present",
                summary.titles_added, summary.titles_already_present
            )
        };
        let headline = format!(
            "Checked {}/{} collections in {:.1}s: {}",
            summary.collections_processed,
            summary.collections_total,
            summary.duration.as_secs_f64(),
            counts
        );

        if summary.is_clean() {
            self.success(headline);
            return;
        }

        self.warn(format!("{} ({} failures)", headline, summary.failure_count()));
        if self.quiet {
            return;
        }
        for failure in &summary.failures {
            let kind = match failure.kind {
                FailureKind::Fetch => "fetch",
                FailureKind::Add => "add",
                FailureKind::Task => "task",
            };
            println!("  {} {}: {}", kind.bright_black(), failure.context, failure.message);
        }
    }
}
