use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};

use crate::shared::constants;

/// How matching frames are ordered before the stride is applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FrameOrder {
    /// Sort by the numeric frame index, ties broken by file name.
    Numeric,
    /// Keep whatever order the directory listing produced.
    Listing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubsampleConfig {
    pub root: PathBuf,
    pub stride: NonZeroUsize,
    pub offset: usize,
    pub source_dir_name: String,
    pub output_dir_name: String,
    pub prefix: String,
    pub extension: String,
    /// Overrides `prefix`/`extension` when set. Needs one capture group for the index.
    pub pattern: Option<String>,
    pub order: FrameOrder,
    pub fail_fast: bool,
    pub dry_run: bool,
    /// Worker threads; 0 means one per CPU.
    pub jobs: usize,
}

impl Default for SubsampleConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(constants::DEFAULT_ROOT),
            stride: NonZeroUsize::new(constants::DEFAULT_STRIDE).unwrap_or(NonZeroUsize::MIN),
            offset: constants::DEFAULT_OFFSET,
            source_dir_name: constants::SOURCE_DIR_NAME.to_string(),
            output_dir_name: constants::OUTPUT_DIR_NAME.to_string(),
            prefix: constants::FRAME_PREFIX.to_string(),
            extension: constants::FRAME_EXTENSION.to_string(),
            pattern: None,
            order: FrameOrder::Numeric,
            fail_fast: false,
            dry_run: false,
            jobs: 1,
        }
    }
}

impl SubsampleConfig {
    /// Reads a JSON config file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn validate(&self) -> Result<()> {
        check_dir_name("source directory", &self.source_dir_name)?;
        check_dir_name("output directory", &self.output_dir_name)?;
        if self.source_dir_name == self.output_dir_name {
            anyhow::bail!(
                "Source and output directory names must differ (both are '{}')",
                self.source_dir_name
            );
        }
        self.frame_pattern()?;
        Ok(())
    }

    pub fn frame_pattern(&self) -> Result<FramePattern> {
        match &self.pattern {
            Some(src) => FramePattern::from_regex(src),
            None => FramePattern::new(&self.prefix, &self.extension),
        }
    }

    pub fn worker_threads(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }
}

fn check_dir_name(what: &str, name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => anyhow::bail!("Invalid {} name '{}': expected a single path component", what, name),
    }
}

/// Whole-name matcher for frame files such as `frame12.png`.
#[derive(Debug, Clone)]
pub struct FramePattern {
    regex: Regex,
}

impl FramePattern {
    pub fn new(prefix: &str, extension: &str) -> Result<Self> {
        if extension.is_empty() {
            anyhow::bail!("Frame extension must not be empty");
        }
        let src = format!(
            r"^{}(\d+)\.{}$",
            regex::escape(prefix),
            regex::escape(extension.trim_start_matches('.'))
        );
        Self::from_regex(&src)
    }

    pub fn from_regex(src: &str) -> Result<Self> {
        let regex =
            Regex::new(src).with_context(|| format!("Invalid frame pattern: {}", src))?;
        // captures_len counts the implicit whole-match group.
        if regex.captures_len() != 2 {
            anyhow::bail!(
                "Frame pattern '{}' must have exactly one capture group for the frame index",
                src
            );
        }
        Ok(Self { regex })
    }

    /// Frame index embedded in `name`, or `None` when the name is not a frame.
    pub fn frame_index(&self, name: &str) -> Option<u64> {
        let digits = self.regex.captures(name)?.get(1)?.as_str();
        match digits.parse::<u64>() {
            Ok(index) => Some(index),
            Err(_) => {
                crate::utils::logger::warn(&format!(
                    "ignoring {}: frame index is not a decimal that fits in u64",
                    name
                ));
                None
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
