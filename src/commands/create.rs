use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ScaffoldError;
use crate::materialize::{self, ENV_EXAMPLE_FILE, ENV_FILE};
use crate::prompt;
use crate::report::{Reporter, StageStatus, Summary};
use crate::runner::{ProcessRunner, Runner, StepCommand};
use crate::secret::{SECRET_LEN, generate_secret};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<()> {
    let reporter = Reporter::new(cli.output);
    reporter.banner();

    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
    let project_name = prompt::project_name(cli.given_name(), cli.yes, &cwd)?;
    let project_path = cwd.join(&project_name);

    // Fail before asking anything else.
    ensure_absent(&project_path, &project_name)?;

    let install_deps = prompt::confirm("Install dependencies?", cli.install_choice(), cli.yes)?;
    let setup_database = prompt::confirm(
        "Setup database (migrate & seed)?",
        cli.setup_db_choice(),
        cli.yes,
    )?;
    reporter.gap();

    let config = Config::load(&cli);
    let plan = Plan {
        project_name,
        project_path,
        cwd,
        install_deps,
        setup_database,
    };

    let mut runner = ProcessRunner::new(cli.verbose);
    let outcome = scaffold(&plan, &config, &mut runner, &reporter)?;

    reporter.summary(&Summary {
        project_name: plan.project_name.clone(),
        project_path: plan.project_path.display().to_string(),
        next_steps: next_steps(&plan.project_name, &config.package_manager, &outcome),
    })
}

/// Resolved inputs for one run.
#[derive(Debug, Clone)]
pub struct Plan {
    pub project_name: String,
    pub project_path: PathBuf,
    /// Directory the clone runs from.
    pub cwd: PathBuf,
    pub install_deps: bool,
    pub setup_database: bool,
}

/// How an optional stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageOutcome {
    #[default]
    NotRequested,
    Done,
    Failed,
    /// Requested, but a prerequisite stage did not succeed.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    pub git_initialized: bool,
    pub env_configured: bool,
    pub install: StageOutcome,
    pub database: StageOutcome,
}

/// Run every stage in order. Only the directory guard and the template
/// fetch can fail the run; later stages degrade to warnings.
pub fn scaffold<R: Runner>(
    plan: &Plan,
    config: &Config,
    runner: &mut R,
    reporter: &Reporter,
) -> Result<Outcome> {
    ensure_absent(&plan.project_path, &plan.project_name)?;
    fetch_template(plan, config, runner, reporter)?;

    let git_initialized = reinit_repository(plan, runner, reporter);
    let env_configured = configure_environment(plan, reporter);

    let install = if plan.install_deps {
        install_dependencies(plan, config, runner, reporter)
    } else {
        StageOutcome::NotRequested
    };

    let database = match (plan.setup_database, install) {
        (false, _) => StageOutcome::NotRequested,
        (true, StageOutcome::Done) => setup_database(plan, config, runner, reporter),
        (true, _) => {
            reporter.skip("database", "Database setup skipped (dependencies not installed)");
            StageOutcome::Skipped
        }
    };

    Ok(Outcome {
        git_initialized,
        env_configured,
        install,
        database,
    })
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

fn ensure_absent(project_path: &Path, project_name: &str) -> Result<()> {
    if project_path.exists() {
        return Err(ScaffoldError::DirectoryExists(project_name.to_string()).into());
    }
    Ok(())
}

fn fetch_template<R: Runner>(
    plan: &Plan,
    config: &Config,
    runner: &mut R,
    reporter: &Reporter,
) -> Result<()> {
    let pb = reporter.start(&format!("Cloning Velist into {}...", plan.project_name));

    let result = clone_command(plan, config)
        .and_then(|cmd| runner.run(&cmd, &pb))
        .and_then(|()| strip_git_dir(&plan.project_path));

    match result {
        Ok(()) => {
            let message = format!("Created {}", plan.project_name);
            reporter.finish(pb, "clone", StageStatus::Ok, &message);
            Ok(())
        }
        Err(e) => {
            reporter.finish(pb, "clone", StageStatus::Failed, "Failed to clone repository");
            Err(ScaffoldError::CloneFailed(format!("{e:#}")).into())
        }
    }
}

fn clone_command(plan: &Plan, config: &Config) -> Result<StepCommand> {
    let target = plan
        .project_path
        .to_str()
        .with_context(|| format!("Path '{}' is not valid UTF-8", plan.project_path.display()))?;

    let mut args = vec!["clone", "--depth", "1"];
    if let Some(branch) = &config.branch {
        args.extend(["--branch", branch.as_str()]);
    }
    args.extend([config.template_repo.as_str(), target]);
    Ok(StepCommand::new("git", args, &plan.cwd))
}

fn strip_git_dir(project_path: &Path) -> Result<()> {
    let git_dir = project_path.join(".git");
    if git_dir.exists() {
        std::fs::remove_dir_all(&git_dir)
            .with_context(|| format!("Cannot remove '{}'", git_dir.display()))?;
    }
    Ok(())
}

fn reinit_repository<R: Runner>(plan: &Plan, runner: &mut R, reporter: &Reporter) -> bool {
    let pb = reporter.start("Initializing git repository...");
    let steps = [
        vec!["init"],
        vec!["add", "."],
        vec!["commit", "-m", "Initial commit"],
    ];

    let result = steps
        .into_iter()
        .try_for_each(|args| runner.run(&StepCommand::new("git", args, &plan.project_path), &pb));

    match result {
        Ok(()) => {
            reporter.finish(pb, "git", StageStatus::Ok, "Git repository initialized");
            true
        }
        Err(_) => {
            reporter.finish(pb, "git", StageStatus::Warn, "Git initialization skipped");
            false
        }
    }
}

fn configure_environment(plan: &Plan, reporter: &Reporter) -> bool {
    let pb = reporter.start("Setting up environment...");
    let secret = generate_secret(SECRET_LEN);

    match materialize::materialize(&plan.project_path, &plan.project_name, &secret) {
        Ok(done) => {
            let message = if done.env_written {
                "Environment configured"
            } else {
                "Environment configured (no .env.example found)"
            };
            reporter.finish(pb, "environment", StageStatus::Ok, message);
            true
        }
        Err(_) => {
            reporter.finish(
                pb,
                "environment",
                StageStatus::Warn,
                "Environment setup incomplete (non-critical)",
            );
            false
        }
    }
}

fn install_dependencies<R: Runner>(
    plan: &Plan,
    config: &Config,
    runner: &mut R,
    reporter: &Reporter,
) -> StageOutcome {
    let pb = reporter.start("Installing dependencies...");
    let pm = &config.package_manager;

    match runner.run(&StepCommand::new(pm, ["install"], &plan.project_path), &pb) {
        Ok(()) => {
            reporter.finish(pb, "install", StageStatus::Ok, "Dependencies installed");
            StageOutcome::Done
        }
        Err(_) => {
            reporter.finish(pb, "install", StageStatus::Failed, "Failed to install dependencies");
            reporter.hint(&format!("Run \"{pm} install\" manually to complete setup."));
            StageOutcome::Failed
        }
    }
}

fn setup_database<R: Runner>(
    plan: &Plan,
    config: &Config,
    runner: &mut R,
    reporter: &Reporter,
) -> StageOutcome {
    let pb = reporter.start("Setting up database...");
    let pm = &config.package_manager;

    let migrate = StepCommand::new(pm, ["run", "db:migrate"], &plan.project_path);
    let seed = StepCommand::new(pm, ["run", "db:seed"], &plan.project_path);
    let result = runner
        .run(&migrate, &pb)
        .and_then(|()| runner.run(&seed, &pb));

    match result {
        Ok(()) => {
            reporter.finish(pb, "database", StageStatus::Ok, "Database ready");
            StageOutcome::Done
        }
        Err(_) => {
            let manual = format!("{pm} run db:migrate && {pm} run db:seed");
            let message = format!("Database setup incomplete (run \"{manual}\" manually)");
            reporter.finish(pb, "database", StageStatus::Warn, &message);
            StageOutcome::Failed
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Commands the user still has to run, in order, derived from what each
/// stage actually did.
pub fn next_steps(project_name: &str, package_manager: &str, outcome: &Outcome) -> Vec<String> {
    let pm = package_manager;
    let mut steps = vec![format!("cd {project_name}")];

    if !outcome.git_initialized {
        steps.push("git init && git add . && git commit -m \"Initial commit\"".into());
    }
    if !outcome.env_configured {
        steps.push(format!("cp {ENV_EXAMPLE_FILE} {ENV_FILE}"));
    }
    if outcome.install != StageOutcome::Done {
        steps.push(format!("{pm} install"));
    }
    if outcome.install == StageOutcome::Done && outcome.database != StageOutcome::Done {
        steps.push(format!("{pm} run db:migrate"));
        steps.push(format!("{pm} run db:seed"));
    }

    steps.push(format!("{pm} run dev"));
    steps
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
