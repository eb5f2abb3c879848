use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::SubsampleConfig;

/// One project directory that holds a source frame directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectJob {
    pub name: String,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub jobs: Vec<ProjectJob>,
    /// Project directories without a source frame directory.
    pub skipped: Vec<String>,
}

/// Lists the immediate subdirectories of `root`. Nothing is modified.
pub fn discover(root: &Path, config: &SubsampleConfig) -> Result<Discovery> {
    if !root.is_dir() {
        anyhow::bail!("Root directory does not exist or is not a directory: {:?}", root);
    }

    let entries =
        fs::read_dir(root).with_context(|| format!("Failed to read root directory: {:?}", root))?;

    let mut discovery = Discovery::default();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list entry in: {:?}", root))?;
        let project_dir = entry.path();
        if !project_dir.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let source_dir = project_dir.join(&config.source_dir_name);
        if !source_dir.is_dir() {
            discovery.skipped.push(name);
            continue;
        }

        discovery.jobs.push(ProjectJob {
            name,
            source_dir,
            output_dir: project_dir.join(&config.output_dir_name),
        });
    }

    discovery.jobs.sort_by(|a, b| a.name.cmp(&b.name));
    discovery.skipped.sort();
    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_finds_only_projects_with_source() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("Shot02").join("FramesAll")).unwrap();
        fs::create_dir_all(root.path().join("Shot01").join("FramesAll")).unwrap();
        fs::create_dir_all(root.path().join("Empty")).unwrap();
        fs::create_dir_all(root.path().join("Other").join("Frames")).unwrap();
        fs::write(root.path().join("readme.txt"), b"hi").unwrap();

        let found = discover(root.path(), &SubsampleConfig::default()).unwrap();

        let names: Vec<&str> = found.jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["Shot01", "Shot02"]);
        assert_eq!(found.skipped, vec!["Empty".to_string(), "Other".to_string()]);

        let shot = &found.jobs[0];
        assert_eq!(shot.source_dir, root.path().join("Shot01").join("FramesAll"));
        assert_eq!(shot.output_dir, root.path().join("Shot01").join("Frames"));
    }

    #[test]
    fn test_source_name_that_is_a_file_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("Shot01")).unwrap();
        fs::write(root.path().join("Shot01").join("FramesAll"), b"oops").unwrap();

        let found = discover(root.path(), &SubsampleConfig::default()).unwrap();
        assert!(found.jobs.is_empty());
        assert_eq!(found.skipped, vec!["Shot01".to_string()]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("gone");
        assert!(discover(&missing, &SubsampleConfig::default()).is_err());
    }
}
