use crate::{
    config::Config,
    error::{CleanerError, CleanerResult},
};
use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

/// Result of one package list update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Success,
    /// One or more sources could not be fetched; carries the comma separated
    /// diagnostic.
    FetchFailed(String),
    Interrupted,
}

#[async_trait]
pub trait PackageManager: Send {
    /// Refresh package lists from every enabled source.
    async fn update(&mut self) -> CleanerResult<UpdateOutcome>;

    /// Finalize the package cache after a successful update.
    async fn commit(&mut self) -> CleanerResult<()>;
}

/// `apt-get` backed package manager.
#[derive(Debug, Clone)]
pub struct AptGet {
    apt_get: PathBuf,
    apt_cache: PathBuf,
    update_args: Vec<String>,
}

enum RunResult {
    Finished(Output),
    Interrupted,
}

impl AptGet {
    pub fn new(config: &Config) -> Self {
        Self {
            apt_get: config.apt_get.clone(),
            apt_cache: config.apt_cache.clone(),
            update_args: config.update_args.clone(),
        }
    }

    async fn run(&self, program: &Path, args: &[String]) -> CleanerResult<RunResult> {
        debug!("Running {} {}", program.display(), args.join(" "));
        let child = Command::new(program)
            .args(args)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CleanerError::CommandFailed(format!(
                    "Failed to run command {}: {}",
                    program.display(),
                    e
                ))
            })?;

        tokio::select! {
            output = child.wait_with_output() => Ok(RunResult::Finished(output?)),
            _ = tokio::signal::ctrl_c() => Ok(RunResult::Interrupted),
        }
    }
}

#[async_trait]
impl PackageManager for AptGet {
    async fn update(&mut self) -> CleanerResult<UpdateOutcome> {
        let mut args = vec!["update".to_string()];
        args.extend(self.update_args.iter().cloned());

        let output = match self.run(&self.apt_get, &args).await? {
            RunResult::Finished(output) => output,
            RunResult::Interrupted => return Ok(UpdateOutcome::Interrupted),
        };
        if output.status.success() {
            info!("Package lists updated");
            return Ok(UpdateOutcome::Success);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("apt-get update exited with {}", output.status);
        Ok(UpdateOutcome::FetchFailed(fetch_diagnostic(&stderr)))
    }

    async fn commit(&mut self) -> CleanerResult<()> {
        let output = match self.run(&self.apt_cache, &["gencaches".to_string()]).await? {
            RunResult::Finished(output) => output,
            RunResult::Interrupted => return Err(CleanerError::Interrupted),
        };
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CleanerError::CommandFailed(format!(
                "Command {} gencaches failed: {}",
                self.apt_cache.display(),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Joins the `E:`/`W:` lines of apt's stderr into one comma separated
/// diagnostic. Falls back to the whole output when apt printed neither.
pub fn fetch_diagnostic(stderr: &str) -> String {
    let messages: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("E:") || line.starts_with("W:"))
        .collect();
    if messages.is_empty() {
        stderr.trim().to_string()
    } else {
        messages.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn apt_with(apt_get: PathBuf, apt_cache: PathBuf) -> AptGet {
        AptGet {
            apt_get,
            apt_cache,
            update_args: Vec::new(),
        }
    }

    #[test]
    fn test_fetch_diagnostic_joins_error_lines() {
        let stderr = "\
W: GPG error: http://a.example/ stable InRelease: NO_PUBKEY 0123
E: The repository 'http://a.example/ stable InRelease' is not signed.
N: Updating from such a repository can't be done securely.
";
        assert_eq!(
            fetch_diagnostic(stderr),
            "W: GPG error: http://a.example/ stable InRelease: NO_PUBKEY 0123, \
             E: The repository 'http://a.example/ stable InRelease' is not signed."
        );
        assert_eq!(fetch_diagnostic("  boom \n"), "boom");
    }

    #[test]
    fn test_update_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ok = script(dir.path(), "ok", "echo 'W: just a warning' >&2\nexit 0");
        let failing = script(
            dir.path(),
            "failing",
            "echo 'E: Failed to fetch http://bad.example/repo/ 404 Not Found' >&2\nexit 100",
        );

        tokio_test::block_on(async {
            let mut apt = apt_with(ok.clone(), ok.clone());
            assert_eq!(apt.update().await.unwrap(), UpdateOutcome::Success);
            apt.commit().await.unwrap();

            let mut apt = apt_with(failing.clone(), failing.clone());
            assert_eq!(
                apt.update().await.unwrap(),
                UpdateOutcome::FetchFailed(
                    "E: Failed to fetch http://bad.example/repo/ 404 Not Found".to_string()
                )
            );
            assert!(matches!(
                apt.commit().await,
                Err(CleanerError::CommandFailed(_))
            ));
        });
    }

    #[test]
    fn test_missing_binary_is_command_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-apt-get");
        tokio_test::block_on(async {
            let mut apt = apt_with(missing.clone(), missing.clone());
            assert!(matches!(
                apt.update().await,
                Err(CleanerError::CommandFailed(_))
            ));
        });
    }
}
