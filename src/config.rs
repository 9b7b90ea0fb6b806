use std::path::PathBuf;

use crate::cli::Cli;

pub const DEFAULT_TEMPLATE_REPO: &str = "https://github.com/velist-framework/velist.git";
pub const DEFAULT_PACKAGE_MANAGER: &str = "bun";

/// Settings for one scaffolding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub template_repo: String,
    pub branch: Option<String>,
    pub package_manager: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_repo: DEFAULT_TEMPLATE_REPO.into(),
            branch: None,
            package_manager: DEFAULT_PACKAGE_MANAGER.into(),
        }
    }
}

/// Config file schema (`~/.config/create-velist/config.yaml`).
#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    template_repo: Option<String>,
    branch: Option<String>,
    package_manager: Option<String>,
}

impl Config {
    pub fn load(cli: &Cli) -> Self {
        let file = config_file_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(p).ok())
            .map(|content| parse_file(&content))
            .unwrap_or_default();
        Self::merge(cli, file)
    }

    // Priority: CLI flag > config file > built-in default.
    fn merge(cli: &Cli, file: ConfigFile) -> Self {
        let defaults = Config::default();
        Self {
            template_repo: pick(cli.template.clone(), file.template_repo)
                .unwrap_or(defaults.template_repo),
            branch: pick(cli.branch.clone(), file.branch),
            package_manager: pick(cli.package_manager.clone(), file.package_manager)
                .unwrap_or(defaults.package_manager),
        }
    }
}

fn pick(flag: Option<String>, file: Option<String>) -> Option<String> {
    flag.or(file).filter(|v| !v.trim().is_empty())
}

// A malformed file is ignored rather than aborting the run.
fn parse_file(content: &str) -> ConfigFile {
    serde_yaml::from_str::<ConfigFile>(content).unwrap_or_default()
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("create-velist").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let cli = Cli::parse_from(["create-velist"]);
        assert_eq!(Config::merge(&cli, ConfigFile::default()), Config::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let cli = Cli::parse_from(["create-velist"]);
        let file = parse_file("template_repo: https://example.com/t.git\npackage_manager: pnpm\n");
        let cfg = Config::merge(&cli, file);
        assert_eq!(cfg.template_repo, "https://example.com/t.git");
        assert_eq!(cfg.package_manager, "pnpm");
        assert_eq!(cfg.branch, None);
    }

    #[test]
    fn flags_override_file() {
        let cli = Cli::parse_from([
            "create-velist",
            "--template",
            "https://example.com/flag.git",
            "--branch",
            "v2",
        ]);
        let file = parse_file("template_repo: https://example.com/file.git\nbranch: main\n");
        let cfg = Config::merge(&cli, file);
        assert_eq!(cfg.template_repo, "https://example.com/flag.git");
        assert_eq!(cfg.branch.as_deref(), Some("v2"));
        assert_eq!(cfg.package_manager, DEFAULT_PACKAGE_MANAGER);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let file = parse_file("template_repo: [unterminated");
        assert!(file.template_repo.is_none());
    }
}
