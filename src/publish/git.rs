//! Git publish step.

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;

use crate::config::PublishConfig;

/// Errors from the publish collaborator.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`git {command}` exited with {status:?}: {stderr}")]
    Git {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

/// Stages and ships the written result files.
pub trait Publisher: Send + Sync {
    fn publish(&self, files: &[PathBuf], message: &str) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// Commit message for a run: the ordering diff, or the configured default when nothing moved.
pub fn commit_message(diff: &str, default_message: &str) -> String {
    if diff.trim().is_empty() {
        default_message.to_string()
    } else {
        diff.to_string()
    }
}

/// Publishes by shelling out to `git` in a working directory.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    config: PublishConfig,
    workdir: PathBuf,
}

impl GitPublisher {
    pub fn new(config: PublishConfig, workdir: impl AsRef<Path>) -> Self {
        Self {
            config,
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    async fn git<I, S>(&self, args: I) -> Result<(), PublishError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let output = Command::new("git")
            .args(&args)
            .current_dir(&self.workdir)
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }
        Err(PublishError::Git {
            command: args
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" "),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl Publisher for GitPublisher {
    async fn publish(&self, files: &[PathBuf], message: &str) -> Result<(), PublishError> {
        let mut add: Vec<std::ffi::OsString> = vec!["add".into(), "--".into()];
        add.extend(files.iter().map(|f| f.as_os_str().to_os_string()));
        self.git(&add).await?;

        let email = format!("user.email={}", self.config.author_email);
        let name = format!("user.name={}", self.config.author_name);
        if let Err(e) = self
            .git(["-c", email.as_str(), "-c", name.as_str(), "commit", "-m", message])
            .await
        {
            tracing::warn!(error = %e, "Commit failed, continuing");
        }

        if self.config.push {
            self.git(["push"]).await?;
        }

        tracing::info!(files = files.len(), message = %message, "Published results");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_message() {
        assert_eq!(commit_message("a.io 🔺", "refresh"), "a.io 🔺");
        assert_eq!(commit_message("", "refresh"), "refresh");
        assert_eq!(commit_message("  ", "refresh"), "refresh");
    }

    #[tokio::test]
    async fn test_missing_workdir_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = GitPublisher::new(PublishConfig::default(), dir.path().join("gone"));
        let err = publisher
            .publish(&[PathBuf::from("dynamic_instances.json")], "msg")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Spawn(_)));
    }
}
