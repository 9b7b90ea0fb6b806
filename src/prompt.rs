use std::path::{Component, Path};

use anyhow::Result;
use inquire::validator::Validation;
use inquire::{Confirm, InquireError, Text};

use crate::error::ScaffoldError;

pub const DEFAULT_PROJECT_NAME: &str = "my-velist-app";

/// Check that a name stays inside the directory it is created in: no root,
/// no drive prefix, no `..`.
pub fn check_name_shape(value: &str) -> Result<(), String> {
    let name = value.trim();
    if name.is_empty() {
        return Err("Project name is required".into());
    }
    let escapes = Path::new(name)
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_) | Component::ParentDir));
    if escapes {
        return Err("Project name must be a path inside the current directory".into());
    }
    Ok(())
}

/// Check a candidate project name against the directory it would be created in.
pub fn validate_name(value: &str, cwd: &Path) -> Result<(), String> {
    check_name_shape(value)?;
    if cwd.join(value.trim()).exists() {
        return Err("Directory already exists".into());
    }
    Ok(())
}

/// Resolve the project name: a positional argument wins, `--yes` takes the
/// default, otherwise ask until a valid name is entered.
pub fn project_name(given: Option<&str>, accept_defaults: bool, cwd: &Path) -> Result<String> {
    if let Some(name) = given {
        check_name_shape(name).map_err(ScaffoldError::InvalidName)?;
        return Ok(name.trim().to_string());
    }
    if accept_defaults {
        return Ok(DEFAULT_PROJECT_NAME.to_string());
    }

    let cwd = cwd.to_path_buf();
    let name = Text::new("Project name:")
        .with_default(DEFAULT_PROJECT_NAME)
        .with_validator(
            move |value: &str| -> Result<Validation, inquire::CustomUserError> {
                Ok(match validate_name(value, &cwd) {
                    Ok(()) => Validation::Valid,
                    Err(msg) => Validation::Invalid(msg.into()),
                })
            },
        )
        .prompt()
        .map_err(prompt_error)?;
    Ok(name.trim().to_string())
}

/// Answer a yes/no question from a flag, from `--yes`, or interactively.
/// The default answer is always yes.
pub fn confirm(message: &str, preset: Option<bool>, accept_defaults: bool) -> Result<bool> {
    if let Some(answer) = preset {
        return Ok(answer);
    }
    if accept_defaults {
        return Ok(true);
    }
    Confirm::new(message)
        .with_default(true)
        .prompt()
        .map_err(prompt_error)
}

fn prompt_error(err: InquireError) -> anyhow::Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            ScaffoldError::Cancelled.into()
        }
        other => other.into(),
    }
}
