use crate::{
    apt::{PackageManager, UpdateOutcome},
    error::{CleanerError, CleanerResult},
    parser::failed_repo_urls,
    registry::{DisabledRecord, SourceRegistry},
};
use log::{debug, info};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Attempting,
    Disabling(String),
    Done,
}

/// Drives the update / disable / retry cycle until an update succeeds.
///
/// There is no retry cap: every failed attempt must disable at least one
/// source, otherwise [`SourceRegistry::disable`] fails and the loop stops.
pub struct RetryController<P: PackageManager> {
    manager: P,
    registry: SourceRegistry,
    disabled: Vec<DisabledRecord>,
    attempts: usize,
}

impl<P: PackageManager> RetryController<P> {
    pub fn new(manager: P, registry: SourceRegistry) -> Self {
        Self {
            manager,
            registry,
            disabled: Vec::new(),
            attempts: 0,
        }
    }

    /// Runs until the update succeeds. Raw fetch-failure diagnostics are
    /// written to `diagnostics`, one per line.
    pub async fn run<W: Write + Send>(&mut self, diagnostics: &mut W) -> CleanerResult<()> {
        let mut state = State::Attempting;
        loop {
            state = match state {
                State::Attempting => self.attempt(diagnostics).await?,
                State::Disabling(message) => self.disable(&message)?,
                State::Done => break,
            };
        }
        info!(
            "Update succeeded after {} attempt(s), {} source(s) disabled",
            self.attempts,
            self.disabled.len()
        );
        Ok(())
    }

    async fn attempt<W: Write + Send>(&mut self, diagnostics: &mut W) -> CleanerResult<State> {
        self.attempts += 1;
        debug!("Update attempt {}", self.attempts);
        match self.manager.update().await? {
            UpdateOutcome::Success => {
                self.manager.commit().await?;
                Ok(State::Done)
            }
            UpdateOutcome::FetchFailed(message) => {
                writeln!(diagnostics, "{}", message)?;
                Ok(State::Disabling(message))
            }
            UpdateOutcome::Interrupted => Err(CleanerError::Interrupted),
        }
    }

    fn disable(&mut self, message: &str) -> CleanerResult<State> {
        let records = self.registry.disable(failed_repo_urls(message))?;
        self.disabled.extend(records);
        Ok(State::Attempting)
    }

    pub fn disabled(&self) -> &[DisabledRecord] {
        &self.disabled
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn into_disabled(self) -> Vec<DisabledRecord> {
        self.disabled
    }
}
