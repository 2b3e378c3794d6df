//! `rosdiag`: run diagnostics against RouterOS devices from the command line.
//!
//! ```bash
//! rosdiag run                          # every router, every category
//! rosdiag run -g WISP -c routing       # one group, one category
//! rosdiag run -r "CORE - Main PE" --json
//! rosdiag check -r "CORE - Main PE"
//! rosdiag import addresses.txt -o routers.json
//! rosdiag apply -r "CORE - Main PE" --scripts-dir ros
//! ```
//!
//! Set `RUST_LOG=debug` for per-command logging.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info};

use rosdiag::config::DEFAULT_CONFIG_PATH;
use rosdiag::error::ConfigError;
use rosdiag::import::{group_counts, parse_winbox_export, to_config_json};
use rosdiag::remediation::{RemediationPlan, apply_to_target, script_dir};
use rosdiag::render::{render_json, render_text};
use rosdiag::{
    CategorySet, DeviceTarget, FleetConfig, Result, SshConnector, run_diagnostics_on_routers,
    test_connection,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "MikroTik RouterOS SSH diagnostics", long_about = None)]
struct Args {
    /// Fleet configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run diagnostics
    Run {
        /// Only this router
        #[arg(short, long, conflicts_with = "group")]
        router: Option<String>,
        /// Only routers whose name starts with this group
        #[arg(short, long)]
        group: Option<String>,
        /// Categories: system, interfaces, routing, all (comma separated)
        #[arg(short, long, default_value = "all")]
        category: String,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Test the connection to one router
    Check {
        #[arg(short, long)]
        router: String,
    },
    /// Convert a WinBox address export into a fleet configuration
    Import {
        /// Export file
        input: PathBuf,
        /// Where to write the configuration
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,
    },
    /// Push remediation scripts to one router
    Apply {
        #[arg(short, long)]
        router: String,
        /// Root directory holding one script directory per router
        #[arg(long, default_value = "ros")]
        scripts_dir: PathBuf,
        /// Do not require or send the backup script
        #[arg(long)]
        skip_backup: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let outcome = match args.command {
        Command::Run {
            router,
            group,
            category,
            json,
        } => run(&args.config, router, group, &category, json).await,
        Command::Check { router } => check(&args.config, &router).await,
        Command::Import { input, output } => import(&input, &output),
        Command::Apply {
            router,
            scripts_dir,
            skip_backup,
        } => apply(&args.config, &router, &scripts_dir, skip_backup).await,
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn select(
    config: &FleetConfig,
    router: Option<&str>,
    group: Option<&str>,
) -> Result<Vec<Arc<DeviceTarget>>> {
    match (router, group) {
        (Some(name), _) => Ok(vec![config.router(name)?]),
        (None, Some(group)) => config.group(group),
        (None, None) => Ok(config.routers().to_vec()),
    }
}

async fn run(
    config_path: &Path,
    router: Option<String>,
    group: Option<String>,
    category: &str,
    json: bool,
) -> Result<bool> {
    let categories: CategorySet = category.parse()?;
    let config = FleetConfig::load(config_path)?;
    let targets = select(&config, router.as_deref(), group.as_deref())?;

    let connector = Arc::new(SshConnector::new(config.ssh().clone()));
    let reports = run_diagnostics_on_routers(connector, &targets, &categories).await;

    if json {
        println!("{}", render_json(&reports)?);
    } else {
        print!("{}", render_text(&reports));
    }

    let failed = reports.iter().filter(|r| r.has_failure()).count();
    info!("{} of {} router(s) OK", reports.len() - failed, reports.len());
    Ok(failed == 0)
}

async fn check(config_path: &Path, router: &str) -> Result<bool> {
    let config = FleetConfig::load(config_path)?;
    let target = config.router(router)?;
    let connector = SshConnector::new(config.ssh().clone());

    println!("Testing connection to {} ({})...", target.name, target.address());
    match test_connection(&connector, &target).await {
        Ok(identity) => {
            println!("[ OK ] Connected\n{}", identity.trim_end());
            Ok(true)
        }
        Err(e) => {
            println!("[FAIL] {e}");
            Ok(false)
        }
    }
}

fn import(input: &Path, output: &Path) -> Result<bool> {
    let text = fs::read_to_string(input).map_err(|source| ConfigError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let routers = parse_winbox_export(&text);
    if routers.is_empty() {
        println!("No routers found in {}", input.display());
        return Ok(false);
    }

    let json = to_config_json(&routers)?;
    fs::write(output, json).map_err(|source| ConfigError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    println!("Imported {} router(s) into {}", routers.len(), output.display());
    for (group, count) in group_counts(&routers) {
        println!("  {group:<30} {count}");
    }
    Ok(true)
}

async fn apply(
    config_path: &Path,
    router: &str,
    scripts_root: &Path,
    skip_backup: bool,
) -> Result<bool> {
    let config = FleetConfig::load(config_path)?;
    let target = config.router(router)?;
    let plan = RemediationPlan::load(script_dir(scripts_root, &target.name), skip_backup)?;
    let connector = SshConnector::new(config.ssh().clone());

    println!("Applying {} script(s) from {}", plan.scripts.len(), plan.dir.display());
    let report = apply_to_target(&connector, &target, &plan).await?;

    for outcome in &report.scripts {
        let status = if outcome.succeeded() { "[ OK ]" } else { "[FAIL]" };
        println!("{status} {} ({} commands)", outcome.name, outcome.commands.len());
        for (command, error) in outcome.failed_commands() {
            println!("       {command}\n         {error}");
        }
    }

    Ok(report.succeeded(&plan))
}
