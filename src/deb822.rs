//! deb822-style `*.sources` files.
//!
//! A whole file is disabled at once by renaming it, even when it holds more
//! than one stanza.

use crate::{
    config::Config,
    error::CleanerResult,
    parser::URL_REGEX,
    registry::{references_same_repo, DisabledRecord, SourceFormat},
    utils::files_with_extension,
};
use log::{debug, warn};
use std::path::{Path, PathBuf};

const URIS_FIELD: &str = "URIs";

#[derive(Debug, Clone)]
pub struct Deb822Sources {
    dir: PathBuf,
    extension: String,
    disabled_extension: String,
}

impl Deb822Sources {
    pub fn new(config: &Config) -> Self {
        Self {
            dir: config.sources_dir.clone(),
            extension: config.deb822_extension.clone(),
            disabled_extension: config.disabled_extension.clone(),
        }
    }

    fn disable_file(&self, path: &Path) -> CleanerResult<DisabledRecord> {
        let target = path.with_extension(&self.disabled_extension);
        if target.exists() {
            warn!("Overwriting {}", target.display());
        }
        std::fs::rename(path, &target)?;
        debug!("Renamed {} to {}", path.display(), target.display());
        Ok(DisabledRecord::new(path.display().to_string()))
    }
}

impl SourceFormat for Deb822Sources {
    fn try_disable(&mut self, url: &str) -> CleanerResult<Vec<DisabledRecord>> {
        let mut disabled = Vec::new();
        for path in files_with_extension(&self.dir, &self.extension)? {
            let content = std::fs::read_to_string(&path)?;
            if enabled_uris(&content).any(|uri| references_same_repo(uri, url)) {
                disabled.push(self.disable_file(&path)?);
            }
        }
        Ok(disabled)
    }
}

/// URLs listed in the `URIs` fields of every enabled stanza of `content`.
pub fn enabled_uris(content: &str) -> impl Iterator<Item = &str> {
    stanzas(content)
        .into_iter()
        .filter(|stanza| is_enabled(stanza))
        .flat_map(|stanza| {
            let mut in_uris = false;
            stanza
                .into_iter()
                .filter(move |line| {
                    if line.starts_with(char::is_whitespace) {
                        return in_uris;
                    }
                    in_uris = line.trim().starts_with(URIS_FIELD);
                    in_uris
                })
                .flat_map(|line| URL_REGEX.find_iter(line).map(|m| m.as_str()))
        })
}

/// Blank-line separated paragraphs, comment lines dropped.
fn stanzas(content: &str) -> Vec<Vec<&str>> {
    let mut stanzas = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
        } else if !line.trim_start().starts_with('#') {
            current.push(line);
        }
    }
    if !current.is_empty() {
        stanzas.push(current);
    }
    stanzas
}

fn is_enabled(stanza: &[&str]) -> bool {
    !stanza.iter().any(|line| {
        line.split_once(':').is_some_and(|(field, value)| {
            field.trim().eq_ignore_ascii_case("Enabled") && value.trim().eq_ignore_ascii_case("no")
        })
    })
}
