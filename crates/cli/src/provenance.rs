//! Run records written next to every JSON artifact the CLI produces.
//!
//! A record names the subcommand, the point file it read, the knobs it ran
//! with, and a few counts, so a results file can be traced back to its input.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const SIDECAR_SUFFIX: &str = "run.json";

/// Point file a run was fed.
#[derive(Debug, Serialize)]
pub struct InputRef {
    pub path: PathBuf,
    pub points: usize,
}

#[derive(Debug, Serialize)]
pub struct RunRecord {
    pub tool: &'static str,
    pub version: &'static str,
    /// `None` outside a git checkout.
    pub revision: Option<String>,
    pub mode: &'static str,
    pub input: InputRef,
    pub params: Value,
    pub summary: Value,
    pub output: PathBuf,
}

impl RunRecord {
    pub fn new(mode: &'static str, input: InputRef, params: Value) -> Self {
        Self {
            tool: "trifield",
            version: trifield::VERSION,
            revision: source_revision(),
            mode,
            input,
            params,
            summary: Value::Null,
            output: PathBuf::new(),
        }
    }

    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = summary;
        self
    }

    /// Write `<stem>.run.json` beside `artifact`.
    pub fn write_beside(mut self, artifact: &Path) -> Result<PathBuf> {
        self.output = artifact.to_path_buf();
        let path = sidecar_path(artifact);
        let body = serde_json::to_vec_pretty(&self)?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("results");
    artifact.with_file_name(format!("{stem}.{SIDECAR_SUFFIX}"))
}

/// Revision of the trifield sources: `TRIFIELD_REV` baked in at build time,
/// else `git rev-parse` on the crate directory.
fn source_revision() -> Option<String> {
    if let Some(rev) = option_env!("TRIFIELD_REV").filter(|s| !s.is_empty()) {
        return Some(rev.to_string());
    }
    let out = Command::new("git")
        .args(["-C", env!("CARGO_MANIFEST_DIR"), "rev-parse", "--short=12", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    let rev = rev.trim();
    (!rev.is_empty()).then(|| rev.to_string())
}
