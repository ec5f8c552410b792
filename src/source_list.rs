//! One-line-per-entry APT source lists (`sources.list`, `sources.list.d/*.list`).

use crate::{
    config::Config,
    error::CleanerResult,
    registry::{references_same_repo, DisabledRecord, SourceFormat},
    utils::{files_with_extension, replace_file_contents},
};
use log::debug;
use std::path::{Path, PathBuf};

const ENTRY_TYPES: [&str; 2] = ["deb", "deb-src"];

/// A single line of a source list. Lines that are not repository entries
/// (blank lines, comments, garbage) are kept so the file can be written back
/// unchanged; they simply have no URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    line: String,
    kind: Option<String>,
    uri: Option<String>,
    disabled: bool,
    modified: bool,
}

impl SourceEntry {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let (disabled, body) = match trimmed.strip_prefix('#') {
            Some(rest) => (true, rest.trim_start_matches('#')),
            None => (false, trimmed),
        };
        let body = body.split('#').next().unwrap_or_default();

        let (kind, uri) = match parse_fields(body) {
            Some((kind, uri)) => (Some(kind), Some(uri)),
            None => (None, None),
        };

        Self {
            line: line.to_string(),
            kind,
            uri,
            disabled,
            modified: false,
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The line as it currently reads in the file.
    pub fn line(&self) -> &str {
        &self.line
    }

    fn disable(&mut self) {
        if self.disabled {
            return;
        }
        self.line = format!("# {}", self.line.trim_start());
        self.disabled = true;
        self.modified = true;
    }
}

/// Returns the entry type and URI of `body`, or `None` when it is not a
/// complete `type [options] uri suite [components]` entry.
fn parse_fields(body: &str) -> Option<(String, String)> {
    let mut tokens = body.split_whitespace();
    let kind = tokens.next().filter(|t| ENTRY_TYPES.contains(t))?;

    let mut uri = tokens.next()?;
    if uri.starts_with('[') {
        let mut option = uri;
        while !option.ends_with(']') {
            option = tokens.next()?;
        }
        uri = tokens.next()?;
    }

    // a suite is mandatory
    tokens.next()?;
    Some((kind.to_string(), uri.to_string()))
}

#[derive(Debug, Clone)]
struct SourceFile {
    path: PathBuf,
    entries: Vec<SourceEntry>,
    trailing_newline: bool,
}

impl SourceFile {
    fn load(path: &Path) -> CleanerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            entries: content.lines().map(SourceEntry::parse).collect(),
            trailing_newline: content.ends_with('\n'),
        })
    }

    fn is_modified(&self) -> bool {
        self.entries.iter().any(|e| e.modified)
    }

    fn render(&self) -> String {
        let mut content = self
            .entries
            .iter()
            .map(SourceEntry::line)
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline {
            content.push('\n');
        }
        content
    }
}

/// Every single-line source file, in the order APT reads them.
#[derive(Debug, Clone, Default)]
pub struct SourceList {
    files: Vec<SourceFile>,
}

impl SourceList {
    pub fn load(config: &Config) -> CleanerResult<Self> {
        let mut paths = Vec::new();
        if config.sources_list.is_file() {
            paths.push(config.sources_list.clone());
        }
        paths.extend(files_with_extension(&config.sources_dir, &config.list_extension)?);

        let files = paths
            .iter()
            .map(|path| SourceFile::load(path))
            .collect::<CleanerResult<Vec<_>>>()?;
        debug!("Loaded {} single-line source files", files.len());
        Ok(Self { files })
    }

    pub fn entries(&self) -> impl Iterator<Item = &SourceEntry> {
        self.files.iter().flat_map(|f| f.entries.iter())
    }

    pub fn is_dirty(&self) -> bool {
        self.files.iter().any(SourceFile::is_modified)
    }

    /// Rewrites every file that holds a changed entry.
    pub fn save(&mut self) -> CleanerResult<()> {
        for file in self.files.iter_mut().filter(|f| f.is_modified()) {
            replace_file_contents(&file.path, &file.render())?;
            debug!("Saved {}", file.path.display());
            for entry in &mut file.entries {
                entry.modified = false;
            }
        }
        Ok(())
    }
}

impl SourceFormat for SourceList {
    fn try_disable(&mut self, url: &str) -> CleanerResult<Vec<DisabledRecord>> {
        let entry = self
            .files
            .iter_mut()
            .flat_map(|f| f.entries.iter_mut())
            .filter(|e| !e.disabled)
            .find(|e| e.uri().is_some_and(|uri| references_same_repo(uri, url)));

        Ok(match entry {
            Some(entry) => {
                let record = DisabledRecord::new(entry.line.trim());
                entry.disable();
                vec![record]
            }
            None => Vec::new(),
        })
    }
}
