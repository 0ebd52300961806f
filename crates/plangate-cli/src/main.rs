mod check_cmds;
mod config;
mod inspect_cmds;
mod output;
mod refs_cmd;
#[cfg(test)]
mod test_util;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};

use check_cmds::ScopeOptions;
use config::PlangateConfig;

#[derive(Parser)]
#[command(name = "plangate", version, about = "Validate markdown plan documents before execution")]
struct Cli {
    /// Rule set TOML file (overrides PLANGATE_RULES env var)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check required sections, banned phrases, code blocks and evidence
    Quality {
        /// Path to the plan document
        plan: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that every file the plan modifies exists
    Scope {
        /// Path to the plan document
        plan: PathBuf,
        /// Directory that scope paths are relative to
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Report malformed table rows as violations
        #[arg(long)]
        strict: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the quality and scope checks together
    Check {
        /// Path to the plan document
        plan: PathBuf,
        /// Directory that scope paths are relative to
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Report malformed table rows as violations
        #[arg(long)]
        strict: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that every file named by the reference index exists
    Refs {
        /// Reference directory (overrides PLANGATE_REFERENCES_DIR env var)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Index file name inside the reference directory
        #[arg(long)]
        index: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the headings of a plan document
    Outline {
        /// Path to the plan document
        plan: PathBuf,
    },
    /// Print the effective rule set as TOML
    Rules,
    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a starter config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Show the resolved configuration
    Show,
}

/// Execute `plangate config init`: write the starter config file.
fn cmd_config_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile::starter();
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    if let Some(dir) = &cfg.references.dir {
        println!("  references.dir = {}", dir.display());
    }
    if let Some(index) = &cfg.references.index {
        println!("  references.index = {index}");
    }
    Ok(())
}

/// Execute `plangate config show`: print where each setting comes from.
fn cmd_config_show(cli_rules: Option<&Path>) -> anyhow::Result<()> {
    let path = config::config_path();
    let resolved = PlangateConfig::resolve(cli_rules, None, None)?;

    let state = if path.exists() { "" } else { " (not found)" };
    println!("config file:      {}{state}", path.display());
    match &resolved.rules_path {
        Some(rules) => println!("rules:            {}", rules.display()),
        None => println!("rules:            (embedded default)"),
    }
    println!("references.dir:   {}", resolved.references_dir.display());
    println!("references.index: {}", resolved.index_name);
    Ok(())
}

/// Dispatch a parsed command. `Ok(false)` means validation failed.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let cli_rules = cli.rules.as_deref();

    match cli.command {
        Commands::Quality { plan, json } => {
            let rules = PlangateConfig::resolve(cli_rules, None, None)?.rule_set()?;
            check_cmds::run_quality(&plan, &rules, json)
        }
        Commands::Scope {
            plan,
            root,
            strict,
            json,
        } => {
            let rules = PlangateConfig::resolve(cli_rules, None, None)?.rule_set()?;
            let options = ScopeOptions { root: &root, strict };
            check_cmds::run_scope(&plan, &rules, &options, json)
        }
        Commands::Check {
            plan,
            root,
            strict,
            json,
        } => {
            let rules = PlangateConfig::resolve(cli_rules, None, None)?.rule_set()?;
            let options = ScopeOptions { root: &root, strict };
            check_cmds::run_check(&plan, &rules, &options, json)
        }
        Commands::Refs { dir, index, json } => {
            let resolved = PlangateConfig::resolve(cli_rules, dir.as_deref(), index.as_deref())?;
            refs_cmd::run_refs(&resolved, json)
        }
        Commands::Outline { plan } => inspect_cmds::run_outline(&plan),
        Commands::Rules => {
            let rules = PlangateConfig::resolve(cli_rules, None, None)?.rule_set()?;
            inspect_cmds::run_rules(&rules)
        }
        Commands::Config { command } => {
            match command {
                ConfigCommands::Init { force } => cmd_config_init(force)?,
                ConfigCommands::Show => cmd_config_show(cli_rules)?,
            }
            Ok(true)
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(true)
        }
    }
}

fn main() {
    // Logs go to stderr; stdout carries only the OK/FAIL result.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}
