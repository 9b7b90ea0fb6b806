use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Directory \"{0}\" already exists")]
    DirectoryExists(String),

    #[error("Invalid project name: {0}")]
    InvalidName(String),

    #[error("Failed to clone repository: {0}")]
    CloneFailed(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("`{command}` failed ({}){}", exit_label(.code), stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {c}"),
        None => "terminated by signal".into(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
