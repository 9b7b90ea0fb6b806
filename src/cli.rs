use clap::{Parser, ValueEnum};

/// Create a new Velist project from the official template.
#[derive(Parser, Debug)]
#[command(name = "create-velist", version, about)]
pub struct Cli {
    /// Directory name for the new project, created under the current directory.
    /// Prompted for when omitted.
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Install dependencies without asking.
    #[arg(long, conflicts_with = "skip_install")]
    pub install: bool,

    /// Skip dependency installation without asking.
    #[arg(long)]
    pub skip_install: bool,

    /// Run database migrations and seeds without asking.
    #[arg(long, conflicts_with = "skip_db")]
    pub setup_db: bool,

    /// Skip the database setup without asking.
    #[arg(long)]
    pub skip_db: bool,

    /// Accept the default answer for every question that was not given as a flag.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,

    /// Template repository to clone (overrides the config file).
    #[arg(long, value_name = "URL")]
    pub template: Option<String>,

    /// Branch or tag of the template to clone.
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Package manager used for install, migrations, seeds and the dev server.
    #[arg(long, value_name = "PROGRAM")]
    pub package_manager: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print every external command before running it.
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// `Some(answer)` when the install question was settled by a flag.
    pub fn install_choice(&self) -> Option<bool> {
        flag_pair(self.install, self.skip_install)
    }

    /// `Some(answer)` when the database question was settled by a flag.
    pub fn setup_db_choice(&self) -> Option<bool> {
        flag_pair(self.setup_db, self.skip_db)
    }

    /// The positional name, ignoring blank values.
    pub fn given_name(&self) -> Option<&str> {
        self.project_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable coloured output (default).
    Text,
    /// Newline-delimited JSON records – one per stage plus a final summary.
    Json,
}
