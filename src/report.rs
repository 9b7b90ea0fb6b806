use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::error::ScaffoldError;

pub const DOCS_URL: &str = "https://velist.dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Ok,
    Warn,
    Failed,
    Skipped,
}

impl StageStatus {
    fn as_str(self) -> &'static str {
        match self {
            StageStatus::Ok => "ok",
            StageStatus::Warn => "warn",
            StageStatus::Failed => "failed",
            StageStatus::Skipped => "skipped",
        }
    }
}

/// Everything the closing summary prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub project_name: String,
    pub project_path: String,
    pub next_steps: Vec<String>,
}

/// Console output for one run: spinners and colours in text mode,
/// one JSON object per line in JSON mode.
pub struct Reporter {
    output: OutputFormat,
}

impl Reporter {
    pub fn new(output: OutputFormat) -> Self {
        Self { output }
    }

    pub fn banner(&self) {
        if self.output == OutputFormat::Text {
            println!();
            println!("{}", "  ⚡ Velist".bold().cyan());
            println!("{}", "  Features-first fullstack framework".dimmed());
            println!();
        }
    }

    pub fn gap(&self) {
        if self.output == OutputFormat::Text {
            println!();
        }
    }

    /// Start a spinner for a stage. Hidden in JSON mode.
    pub fn start(&self, message: &str) -> ProgressBar {
        if self.output == OutputFormat::Json {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Stop the spinner and record how the stage ended.
    pub fn finish(&self, pb: ProgressBar, stage: &str, status: StageStatus, message: &str) {
        pb.finish_and_clear();
        match self.output {
            OutputFormat::Text => {
                let mark = match status {
                    StageStatus::Ok => "✓".green(),
                    StageStatus::Warn | StageStatus::Skipped => "!".yellow(),
                    StageStatus::Failed => "✗".red(),
                };
                println!("  {mark} {message}");
            }
            OutputFormat::Json => emit(&json!({
                "event": "stage",
                "stage": stage,
                "status": status.as_str(),
                "message": message,
            })),
        }
    }

    /// Record a stage that was requested but not attempted.
    pub fn skip(&self, stage: &str, message: &str) {
        self.finish(ProgressBar::hidden(), stage, StageStatus::Skipped, message);
    }

    /// Extra guidance printed under a failed stage.
    pub fn hint(&self, message: &str) {
        if self.output == OutputFormat::Text {
            println!("{}", format!("    {message}").yellow());
        }
    }

    pub fn summary(&self, summary: &Summary) -> Result<()> {
        match self.output {
            OutputFormat::Text => print!("{}", render_summary(summary)),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string(&json!({
                    "event": "summary",
                    "project": summary.project_name,
                    "path": summary.project_path,
                    "next_steps": summary.next_steps,
                    "docs": DOCS_URL,
                }))?
            ),
        }
        Ok(())
    }
}

/// Text-mode closing block: banner, next steps, credentials, docs link.
pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{}\n", "  ✓ Project created successfully!\n".green().bold()));
    out.push_str(&format!("{}\n", "  Next steps:\n".bold()));
    for step in &summary.next_steps {
        out.push_str(&format!("    {step}\n"));
    }
    out.push('\n');
    out.push_str(&format!("{}\n", "  Default credentials:".dimmed()));
    out.push_str(&format!("{}\n", "    Email: admin@example.com".dimmed()));
    out.push_str(&format!("{}\n", "    Password: password123\n".dimmed()));
    out.push_str(&format!("{}\n", format!("  Documentation: {DOCS_URL}\n").cyan()));
    out
}

fn emit(value: &serde_json::Value) {
    println!("{}", serde_json::to_string(value).unwrap_or_default());
}

/// Print a fatal error to stderr. The caller exits non-zero afterwards.
pub fn fatal(err: &anyhow::Error) {
    let message = match err.downcast_ref::<ScaffoldError>() {
        Some(ScaffoldError::DirectoryExists(name)) => {
            format!("\n  Error: Directory \"{name}\" already exists\n")
        }
        Some(ScaffoldError::InvalidName(reason)) => format!("\n  Error: {reason}\n"),
        Some(ScaffoldError::CloneFailed(_)) => concat!(
            "\n  Failed to clone repository.\n",
            "  Please check your internet connection and try again.\n"
        )
        .to_string(),
        Some(ScaffoldError::Cancelled) => "\n  Cancelled\n".to_string(),
        _ => format!("\n  Unexpected error: {err:#}\n"),
    };
    eprintln!("{}", message.red());
}
