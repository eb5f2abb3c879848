use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Entry names of `dir` in the order the filesystem lists them.
/// Only regular files (following symlinks) are returned.
pub fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list entry in: {:?}", dir))?;
        if !entry.path().is_file() {
            continue;
        }
        // Names that are not valid UTF-8 can never match a frame pattern.
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    Ok(names)
}

/// Removes whatever lives at `dir` (recursively for directories) and
/// creates it again as an empty directory.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to remove directory: {:?}", dir))?,
        Ok(_) => fs::remove_file(dir)
            .with_context(|| format!("Failed to remove file in place of directory: {:?}", dir))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to inspect: {:?}", dir));
        }
    }

    fs::create_dir(dir).with_context(|| format!("Failed to create directory: {:?}", dir))
}

pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_file_names_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("frame1.png"), b"a").unwrap();
        fs::create_dir(dir.path().join("frame2.png")).unwrap();

        let names = list_file_names(dir.path()).unwrap();
        assert_eq!(names, vec!["frame1.png".to_string()]);
    }

    #[test]
    fn test_list_file_names_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_file_names(&dir.path().join("nope")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read directory"));
    }

    #[test]
    fn test_recreate_dir_clears_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Frames");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("old.png"), b"old").unwrap();
        fs::write(out.join("nested").join("deep.txt"), b"x").unwrap();

        recreate_dir(&out).unwrap();

        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_recreate_dir_replaces_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Frames");
        fs::write(&out, b"not a dir").unwrap();

        recreate_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_recreate_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Frames");

        recreate_dir(&out).unwrap();
        assert!(out.is_dir());
    }
}
