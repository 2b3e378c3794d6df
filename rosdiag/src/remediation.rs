//! Pushing pre-built RouterOS scripts to a device.
//!
//! Scripts live in one directory per router under a scripts root:
//!
//! ```text
//! ros/
//!   CORE---Main-PE/
//!     BACKUP-FIRST.rsc
//!     optimization.rsc
//!     VERIFY-OPTIMIZATION.rsc
//! ```
//!
//! Each script is sent one command at a time. A script with a failed
//! command stops the push; later scripts are not sent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;

use crate::error::{Error, RemediationError, Result};
use crate::session::{Connector, RemoteSession};
use crate::target::DeviceTarget;

/// Configuration snapshot taken before any change is made.
pub const BACKUP_SCRIPT: &str = "BACKUP-FIRST.rsc";

/// The changes themselves.
pub const OPTIMIZATION_SCRIPT: &str = "optimization.rsc";

/// Read-only checks run after the changes.
pub const VERIFY_SCRIPT: &str = "VERIFY-OPTIMIZATION.rsc";

static UNSAFE_PATH_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.-]").expect("valid path regex"));

/// Directory holding the scripts for `target_name` under `root`.
pub fn script_dir(root: impl AsRef<Path>, target_name: &str) -> PathBuf {
    let dir_name = UNSAFE_PATH_CHARS.replace_all(target_name, "-").into_owned();
    root.as_ref().join(dir_name)
}

/// Split script text into the commands to send.
///
/// Blank lines and `#` comments are dropped. A line ending in `\` continues
/// on the next line.
pub fn script_commands(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut pending = String::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if pending.is_empty() && (trimmed.is_empty() || trimmed.starts_with('#')) {
            continue;
        }

        match trimmed.strip_suffix('\\') {
            Some(head) => {
                pending.push_str(head.trim_end());
                pending.push(' ');
            }
            None => {
                pending.push_str(trimmed);
                commands.push(std::mem::take(&mut pending).trim().to_string());
            }
        }
    }

    let tail = pending.trim();
    if !tail.is_empty() {
        commands.push(tail.to_string());
    }
    commands
}

/// One script ready to send.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub commands: Vec<String>,
}

/// The scripts to push to one device, in order.
#[derive(Debug, Clone)]
pub struct RemediationPlan {
    pub dir: PathBuf,
    pub scripts: Vec<Script>,
}

fn read_script(dir: &Path, name: &str, required: bool) -> Result<Option<Script>> {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(text) => {
            let commands = script_commands(&text);
            debug!("{}: {} command(s)", path.display(), commands.len());
            Ok(Some(Script {
                name: name.to_string(),
                commands,
            }))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if required {
                Err(RemediationError::MissingScript { path }.into())
            } else {
                debug!("{}: not present, skipping", path.display());
                Ok(None)
            }
        }
        Err(source) => Err(RemediationError::Io { path, source }.into()),
    }
}

impl RemediationPlan {
    /// Load the scripts in `dir`.
    ///
    /// The backup script is required unless `skip_backup` is set, the
    /// optimization script is always required, and the verify script is
    /// optional.
    pub fn load(dir: impl Into<PathBuf>, skip_backup: bool) -> Result<Self> {
        let dir = dir.into();
        let mut scripts = Vec::new();

        if skip_backup {
            warn!("Skipping configuration backup");
        } else if let Some(script) = read_script(&dir, BACKUP_SCRIPT, true)? {
            scripts.push(script);
        }
        if let Some(script) = read_script(&dir, OPTIMIZATION_SCRIPT, true)? {
            scripts.push(script);
        }
        if let Some(script) = read_script(&dir, VERIFY_SCRIPT, false)? {
            scripts.push(script);
        }

        Ok(Self { dir, scripts })
    }
}

/// What happened to one script.
#[derive(Debug)]
pub struct ScriptOutcome {
    pub name: String,
    /// One entry per command sent, in script order. Repeated commands keep
    /// their own entries.
    pub commands: Vec<(String, Result<String>)>,
}

impl ScriptOutcome {
    /// Commands that failed, with their errors.
    pub fn failed_commands(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.commands.iter().filter_map(|(command, result)| match result {
            Ok(_) => None,
            Err(e) => Some((command.as_str(), e)),
        })
    }

    pub fn succeeded(&self) -> bool {
        self.commands.iter().all(|(_, result)| result.is_ok())
    }
}

/// Result of pushing a plan.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Scripts that were sent, in order. The last one may have failed.
    pub scripts: Vec<ScriptOutcome>,
}

impl ApplyReport {
    /// True when every script was sent and none had a failed command.
    pub fn succeeded(&self, plan: &RemediationPlan) -> bool {
        self.scripts.len() == plan.scripts.len()
            && self.scripts.iter().all(ScriptOutcome::succeeded)
    }
}

/// Send every script in `plan` over `session`.
pub async fn apply<S: RemoteSession>(session: &mut S, plan: &RemediationPlan) -> ApplyReport {
    let mut report = ApplyReport::default();

    for script in &plan.scripts {
        info!("Applying {} ({} commands)", script.name, script.commands.len());
        let mut outcome = ScriptOutcome {
            name: script.name.clone(),
            commands: Vec::with_capacity(script.commands.len()),
        };
        for command in &script.commands {
            let result = session.run(command).await;
            outcome.commands.push((command.clone(), result));
        }

        let failed = !outcome.succeeded();
        if failed {
            for (command, error) in outcome.failed_commands() {
                warn!("{}: '{}' -> {}", script.name, command, error);
            }
        }
        report.scripts.push(outcome);

        if failed {
            warn!("Stopping after failed script {}", script.name);
            break;
        }
    }

    report
}

/// Open a session to `target`, apply `plan`, and close the session.
pub async fn apply_to_target<C: Connector>(
    connector: &C,
    target: &DeviceTarget,
    plan: &RemediationPlan,
) -> Result<ApplyReport> {
    let mut session = connector.open(target).await?;
    let report = apply(&mut session, plan).await;
    if let Err(e) = session.close().await {
        warn!("{}: failed to close session: {}", target.name, e);
    }
    Ok(report)
}
