use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::ProgressBar;

use crate::error::ScaffoldError;

/// One external command of a stage: program, arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl StepCommand {
    pub fn new<I, S>(program: &str, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
        }
    }
}

impl fmt::Display for StepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Executes stage commands. The scaffold pipeline only talks to the outside
/// world through this trait.
///
/// `pb` is the spinner of the running stage; anything printed while it
/// ticks goes through `pb.println`.
pub trait Runner {
    fn run(&mut self, cmd: &StepCommand, pb: &ProgressBar) -> Result<()>;
}

/// Runs commands as child processes, blocking until each exits.
/// Output is captured and only surfaced through errors.
pub struct ProcessRunner {
    verbose: bool,
}

impl ProcessRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Runner for ProcessRunner {
    fn run(&mut self, cmd: &StepCommand, pb: &ProgressBar) -> Result<()> {
        if self.verbose {
            pb.println(format!("  {} {}", "$".dimmed(), cmd.to_string().dimmed()));
        }

        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cmd.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Cannot start `{}`", cmd.program))?;

        if output.status.success() {
            return Ok(());
        }

        let err = ScaffoldError::CommandFailed {
            command: cmd.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if self.verbose {
            pb.println(format!("    {}", err.to_string().dimmed()));
        }
        Err(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = StepCommand::new("git", ["commit", "-m", "Initial commit"], Path::new("."));
        assert_eq!(cmd.to_string(), "git commit -m \"Initial commit\"");
    }

    #[test]
    fn missing_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = StepCommand::new("definitely-not-a-real-program-xyz", ["--version"], dir.path());
        assert!(ProcessRunner::new(false).run(&cmd, &ProgressBar::hidden()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let pb = ProgressBar::hidden();
        let mut runner = ProcessRunner::new(true);
        let ok = StepCommand::new("true", Vec::<String>::new(), dir.path());
        assert!(runner.run(&ok, &pb).is_ok());

        let failing = StepCommand::new("sh", ["-c", "echo boom >&2; exit 3"], dir.path());
        let err = runner.run(&failing, &pb).unwrap_err();
        match err.downcast_ref::<ScaffoldError>() {
            Some(ScaffoldError::CommandFailed { code, stderr, .. }) => {
                assert_eq!(*code, Some(3));
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn verbose_echo_is_printed_through_the_spinner() {
        use indicatif::{InMemoryTerm, ProgressDrawTarget};

        let term = InMemoryTerm::new(10, 80);
        let pb = ProgressBar::with_draw_target(
            None,
            ProgressDrawTarget::term_like(Box::new(term.clone())),
        );
        let dir = tempfile::tempdir().unwrap();
        let cmd = StepCommand::new("sh", ["-c", "exit 0"], dir.path());

        ProcessRunner::new(true).run(&cmd, &pb).unwrap();

        assert!(term.contents().contains("$ sh -c \"exit 0\""), "{}", term.contents());
    }
}
