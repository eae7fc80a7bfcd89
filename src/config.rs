//! Server configuration: command-line flags with environment overrides.
//!
//! Environment variables win over flags when set:
//! - `WORKFLOW_BIND` — listen address
//! - `WORKFLOW_MAX_STEPS` — step ceiling per run, `0` for unbounded
//! - `WORKFLOW_RUN_TIMEOUT_SECS` — wall-clock budget per run, `0` for none

use std::time::Duration;

use clap::Args;
use tracing::instrument;

use crate::engine::RunLimits;
use crate::error::{Result, WorkflowError};

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
/// Step ceiling applied by the server unless overridden.
pub const DEFAULT_MAX_STEPS: usize = 1000;

pub const ENV_BIND: &str = "WORKFLOW_BIND";
pub const ENV_MAX_STEPS: &str = "WORKFLOW_MAX_STEPS";
pub const ENV_RUN_TIMEOUT_SECS: &str = "WORKFLOW_RUN_TIMEOUT_SECS";

/// Flags shared by the binaries.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ServerFlags {
  /// Address to listen on. Overridden by WORKFLOW_BIND if set.
  #[arg(long, value_name = "ADDR", default_value = DEFAULT_BIND)]
  pub bind: String,

  /// Maximum node executions per run; 0 disables the ceiling. Overridden by WORKFLOW_MAX_STEPS.
  #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_STEPS)]
  pub max_steps: usize,

  /// Wall-clock budget per run in seconds; 0 disables it. Overridden by WORKFLOW_RUN_TIMEOUT_SECS.
  #[arg(long, value_name = "SECS", default_value_t = 0)]
  pub run_timeout_secs: u64,
}

impl Default for ServerFlags {
  fn default() -> Self {
    Self {
      bind: DEFAULT_BIND.to_string(),
      max_steps: DEFAULT_MAX_STEPS,
      run_timeout_secs: 0,
    }
  }
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub bind: String,
  pub limits: RunLimits,
}

impl ServerConfig {
  /// Applies environment overrides (looked up through `env`) on top of `flags`.
  #[instrument(level = "trace", skip(env))]
  pub fn resolve<F>(flags: ServerFlags, env: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let limits = resolve_limits(flags.max_steps, flags.run_timeout_secs, &env)?;
    let bind = env(ENV_BIND).unwrap_or(flags.bind);
    Ok(Self { bind, limits })
  }

  /// [ServerConfig::resolve] against the process environment.
  pub fn from_env(flags: ServerFlags) -> Result<Self> {
    Self::resolve(flags, |key| std::env::var(key).ok())
  }
}

/// Run limits from flag values, with `WORKFLOW_MAX_STEPS` and
/// `WORKFLOW_RUN_TIMEOUT_SECS` (looked up through `env`) taking precedence.
/// `0` disables either limit.
pub fn resolve_limits<F>(max_steps: usize, run_timeout_secs: u64, env: F) -> Result<RunLimits>
where
  F: Fn(&str) -> Option<String>,
{
  let max_steps = match env(ENV_MAX_STEPS) {
    Some(v) => parse_number(ENV_MAX_STEPS, &v)?,
    None => max_steps,
  };
  let timeout_secs = match env(ENV_RUN_TIMEOUT_SECS) {
    Some(v) => parse_number(ENV_RUN_TIMEOUT_SECS, &v)?,
    None => run_timeout_secs,
  };

  let mut limits = RunLimits::unbounded();
  if max_steps > 0 {
    limits = limits.with_max_steps(max_steps);
  }
  if timeout_secs > 0 {
    limits = limits.with_timeout(Duration::from_secs(timeout_secs));
  }
  Ok(limits)
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
  value
    .trim()
    .parse()
    .map_err(|_| WorkflowError::Config(format!("{} must be a non-negative integer, got '{}'", key, value)))
}
