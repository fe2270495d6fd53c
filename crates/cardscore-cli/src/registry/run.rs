use std::collections::BTreeMap;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{RegistryError, RegistryResult};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: String,
    pub contract_version: String,
    pub runs_dir: PathBuf,
    pub inputs: BTreeMap<String, PathBuf>,
    pub weights: BTreeMap<String, f64>,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
struct RunConfig<'a> {
    run_id: &'a str,
    started_at: String,
    command: &'a str,
    contract_version: &'a str,
    inputs: &'a BTreeMap<String, PathBuf>,
    weights: &'a BTreeMap<String, f64>,
    git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
struct GitInfo {
    commit: Option<String>,
    dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub report_path: PathBuf,
    pub markdown_path: PathBuf,
    pub rankings_path: PathBuf,
    pub logs_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx
        .runs_dir
        .join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        command: &ctx.command,
        contract_version: &ctx.contract_version,
        inputs: &ctx.inputs,
        weights: &ctx.weights,
        git: collect_git_info(),
    };
    write_json(&root.join("config.json"), &config)?;

    let logs_path = root.join("logs.ndjson");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        report_path: root.join("report.json"),
        markdown_path: root.join("report.md"),
        rankings_path: root.join("rankings.json"),
        logs_path,
        root,
    })
}

fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

pub fn write_markdown(path: &Path, contents: &str) -> RegistryResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}
