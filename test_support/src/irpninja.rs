//! Helpers for invoking the built `irpninja` binary in tests.
//!
//! These utilities use `assert_cmd` to locate the `irpninja` executable and
//! run it in a controlled working directory with the toolchain variables
//! cleared, capturing stderr for assertions.

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::path::Path;

use crate::env::toolchain_vars;

/// Captured output from an `irpninja` invocation.
#[derive(Debug)]
pub struct IrpninjaRun {
    /// Captured stdout (lossy UTF-8).
    pub stdout: String,
    /// Captured stderr (lossy UTF-8).
    pub stderr: String,
    /// Whether the command exited successfully.
    pub success: bool,
}

/// Prepare an `irpninja` command rooted at `current_dir` with the toolchain
/// variables removed and `vars` applied.
///
/// # Errors
///
/// Returns an error when the binary cannot be located.
pub fn irpninja_cmd(current_dir: &Path, vars: &[(&str, &str)]) -> Result<Command> {
    let mut cmd = Command::cargo_bin("irpninja").context("locate irpninja binary")?;
    cmd.current_dir(current_dir);
    for key in toolchain_vars() {
        cmd.env_remove(key);
    }
    for (key, value) in vars {
        cmd.env(key, value);
    }
    Ok(cmd)
}

/// Run `irpninja` in `current_dir` with the supplied args and variables.
///
/// # Errors
///
/// Returns an error when `irpninja` cannot be located or the process cannot
/// be spawned.
pub fn run_irpninja_in(
    current_dir: &Path,
    args: &[&str],
    vars: &[(&str, &str)],
) -> Result<IrpninjaRun> {
    let output = irpninja_cmd(current_dir, vars)?
        .args(args)
        .output()
        .context("run irpninja command")?;
    Ok(IrpninjaRun {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
    })
}
