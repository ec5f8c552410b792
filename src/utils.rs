use crate::error::CleanerResult;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn is_root_user() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Regular files in `dir` whose extension is `extension`, sorted by name.
/// A missing directory has no files.
pub fn files_with_extension(dir: &Path, extension: &str) -> CleanerResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Atomically replaces the content of `path`, keeping its permissions.
pub fn replace_file_contents(path: &Path, content: &str) -> CleanerResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let permissions = std::fs::metadata(path)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_files_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.sources", "a.sources", "c.list", "d.sources.save"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("e.sources")).unwrap();

        let files = files_with_extension(dir.path(), "sources").unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.sources"), dir.path().join("b.sources")]
        );
        assert!(files_with_extension(&dir.path().join("missing"), "list").unwrap().is_empty());
    }

    #[test]
    fn test_replace_keeps_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.list");
        std::fs::write(&path, "old\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        replace_file_contents(&path, "new\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
