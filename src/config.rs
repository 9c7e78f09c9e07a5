//! Configuration management for the Git Status MCP Server
//!
//! Settings come from environment variables and can be overridden on the
//! command line.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable naming the git executable
pub const ENV_GIT_BIN: &str = "GIT_MCP_GIT_BIN";

/// Environment variable holding the per-command timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "GIT_MCP_TIMEOUT_MS";

/// Environment variable holding the directory used when a call omits one
pub const ENV_DEFAULT_DIR: &str = "GIT_MCP_DEFAULT_DIR";

/// Default git executable
pub const DEFAULT_GIT_BIN: &str = "git";

/// Default timeout for a single git invocation
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration for the Git Status MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// Executable invoked for every git command
    pub git_bin: String,

    /// Upper bound on a single git invocation
    pub timeout: Duration,

    /// Directory used when a call has no `directory` argument.
    /// `None` means the process working directory at call time.
    pub default_directory: Option<PathBuf>,
}

impl Config {
    /// Create a configuration from the process environment
    pub fn new() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let git_bin = lookup(ENV_GIT_BIN)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GIT_BIN.to_string());

        let timeout = match lookup(ENV_TIMEOUT_MS) {
            Some(raw) => parse_timeout_ms(ENV_TIMEOUT_MS, &raw)?,
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };

        let default_directory = lookup(ENV_DEFAULT_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let config = Self {
            git_bin,
            timeout,
            default_directory,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        git_bin: Option<String>,
        timeout_ms: Option<u64>,
        directory: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(bin) = git_bin {
            self.git_bin = bin;
        }
        if let Some(ms) = timeout_ms {
            self.timeout = timeout_from_ms("--timeout-ms", ms)?;
        }
        if let Some(dir) = directory {
            self.default_directory = Some(dir);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.git_bin.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: ENV_GIT_BIN.to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }

        if let Some(dir) = &self.default_directory {
            if !dir.is_dir() {
                return Err(ConfigError::DirNotFound {
                    path: dir.display().to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_bin: DEFAULT_GIT_BIN.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            default_directory: None,
        }
    }
}

fn parse_timeout_ms(var: &str, raw: &str) -> Result<Duration> {
    let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: format!("expected a number of milliseconds, got '{}'", raw),
    })?;
    timeout_from_ms(var, ms)
}

fn timeout_from_ms(var: &str, ms: u64) -> Result<Duration> {
    if ms == 0 {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::GitMcpError;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.git_bin, "git");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.default_directory.is_none());
    }

    #[test]
    fn test_env_values() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let config = Config::from_lookup(lookup_from(&[
            (ENV_GIT_BIN, "/usr/local/bin/git"),
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_DEFAULT_DIR, dir_str),
        ]))
        .unwrap();

        assert_eq!(config.git_bin, "/usr/local/bin/git");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.default_directory.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = Config::from_lookup(lookup_from(&[(ENV_TIMEOUT_MS, "0")])).unwrap_err();
        assert!(matches!(err, GitMcpError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_garbage_timeout() {
        let err = Config::from_lookup(lookup_from(&[(ENV_TIMEOUT_MS, "soon")])).unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_rejects_missing_default_directory() {
        let err = Config::from_lookup(lookup_from(&[(
            ENV_DEFAULT_DIR,
            "/definitely/not/a/real/dir",
        )]))
        .unwrap_err();
        assert!(matches!(err, GitMcpError::Config(ConfigError::DirNotFound { .. })));
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Config::from_lookup(lookup_from(&[(ENV_TIMEOUT_MS, "1000")]))
            .unwrap()
            .with_overrides(Some("git2".to_string()), Some(50), None)
            .unwrap();
        assert_eq!(config.git_bin, "git2");
        assert_eq!(config.timeout, Duration::from_millis(50));
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        let result = Config::default().with_overrides(None, Some(0), None);
        assert!(result.is_err());
    }
}
