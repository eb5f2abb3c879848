use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Copied,
    DryRun,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: String,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub frames_found: usize,
    pub selected: Vec<String>,
    pub outcome: Outcome,
}

impl ProjectReport {
    pub fn failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub stride: usize,
    pub offset: usize,
    pub projects: Vec<ProjectReport>,
    pub skipped: Vec<String>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn failed_count(&self) -> usize {
        self.projects.iter().filter(|p| p.failed()).count()
    }

    pub fn copied_frames(&self) -> usize {
        self.projects
            .iter()
            .filter(|p| p.outcome == Outcome::Copied)
            .map(|p| p.selected.len())
            .sum()
    }
}
