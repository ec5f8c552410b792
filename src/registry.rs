use crate::{
    config::Config,
    deb822::Deb822Sources,
    error::{CleanerError, CleanerResult},
    source_list::SourceList,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What got disabled: the full entry text of a single-line source, or the
/// path of a deb822 file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisabledRecord(String);

impl DisabledRecord {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisabledRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One on-disk repository definition format.
pub trait SourceFormat {
    /// Disable whatever enabled definitions reference `url`. An empty result
    /// means nothing in this format matched.
    fn try_disable(&mut self, url: &str) -> CleanerResult<Vec<DisabledRecord>>;
}

/// Loose symmetric match between a configured URI and a candidate URL.
pub fn references_same_repo(configured: &str, candidate: &str) -> bool {
    configured.starts_with(candidate) || candidate.starts_with(configured)
}

pub struct SourceRegistry {
    config: Config,
}

impl SourceRegistry {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Disable every source referenced by `urls`.
    ///
    /// Single-line entries are tried first for each URL; deb822 files are
    /// only consulted when no single-line entry matched. Changed single-line
    /// files are saved once, after the whole batch.
    pub fn disable<I, S>(&self, urls: I) -> CleanerResult<Vec<DisabledRecord>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut single_line = SourceList::load(&self.config)?;
        let mut deb822 = Deb822Sources::new(&self.config);
        let mut disabled = Vec::new();
        let mut urls_seen = 0usize;

        {
            let mut formats: [&mut dyn SourceFormat; 2] = [&mut single_line, &mut deb822];
            for url in urls {
                let url = url.as_ref();
                if url.is_empty() {
                    continue;
                }
                urls_seen += 1;

                for format in formats.iter_mut() {
                    let records = format.try_disable(url)?;
                    if !records.is_empty() {
                        disabled.extend(records);
                        break;
                    }
                }
                debug!("Processed candidate URL {}", url);
            }
        }

        if disabled.is_empty() {
            return Err(if urls_seen > 0 {
                CleanerError::NoMatchableRepository(urls_seen)
            } else {
                CleanerError::EmptyUrlSet
            });
        }

        if single_line.is_dirty() {
            single_line.save()?;
        }

        for record in &disabled {
            info!("Disabled repository source: {}", record);
        }
        Ok(disabled)
    }
}
