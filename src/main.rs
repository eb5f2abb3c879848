mod core;
mod shared;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::core::config::{FrameOrder, SubsampleConfig};
use crate::core::report::{Outcome, RunReport};
use crate::core::subsampler;

/// Keep every Nth frame of each project's FramesAll directory in its Frames directory.
///
/// WARNING: each project's output directory is deleted and rebuilt on every run.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory whose subdirectories are projects [default: .]
    root: Option<PathBuf>,
    /// Keep every Nth frame [default: 5]
    #[arg(short, long)]
    stride: Option<NonZeroUsize>,
    /// Position of the first kept frame; 0 keeps the first frame [default: 1]
    #[arg(long)]
    offset: Option<usize>,
    /// Name of the directory holding all frames [default: FramesAll]
    #[arg(long)]
    source_dir: Option<String>,
    /// Name of the directory to rebuild [default: Frames]
    #[arg(long)]
    output_dir: Option<String>,
    /// Frame file prefix [default: frame]
    #[arg(long)]
    prefix: Option<String>,
    /// Frame file extension [default: png]
    #[arg(long)]
    extension: Option<String>,
    /// Custom frame name regex with one capture group for the index
    #[arg(long)]
    pattern: Option<String>,
    /// Order frames by numeric index or keep raw listing order [default: numeric]
    #[arg(long, value_enum)]
    order: Option<FrameOrder>,
    /// Stop at the first project that fails
    #[arg(long, default_value_t = false)]
    fail_fast: bool,
    /// Show what would be copied without touching anything
    #[arg(short = 'n', long, default_value_t = false)]
    dry_run: bool,
    /// Projects processed in parallel; 0 uses every CPU [default: 1]
    #[arg(short, long)]
    jobs: Option<usize>,
    /// JSON config file; command line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the run report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Echo log lines to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    /// Where error.log and debug.log are written
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

impl Cli {
    fn into_config(self) -> Result<SubsampleConfig> {
        let mut config = match &self.config {
            Some(path) => SubsampleConfig::load(path)?,
            None => SubsampleConfig::default(),
        };

        if let Some(root) = self.root {
            config.root = root;
        }
        if let Some(stride) = self.stride {
            config.stride = stride;
        }
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        if let Some(name) = self.source_dir {
            config.source_dir_name = name;
        }
        if let Some(name) = self.output_dir {
            config.output_dir_name = name;
        }
        if let Some(prefix) = self.prefix {
            config.prefix = prefix;
        }
        if let Some(extension) = self.extension {
            config.extension = extension;
        }
        if self.pattern.is_some() {
            config.pattern = self.pattern;
        }
        if let Some(order) = self.order {
            config.order = order;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        config.fail_fast |= self.fail_fast;
        config.dry_run |= self.dry_run;

        Ok(config)
    }
}

fn print_summary(report: &RunReport) {
    for project in &report.projects {
        match &project.outcome {
            Outcome::Copied => println!(
                "{}: kept {} of {} frames -> {}",
                project.project,
                project.selected.len(),
                project.frames_found,
                project.output_dir.display()
            ),
            Outcome::DryRun => {
                println!(
                    "{}: would keep {} of {} frames -> {}",
                    project.project,
                    project.selected.len(),
                    project.frames_found,
                    project.output_dir.display()
                );
                for name in &project.selected {
                    println!("    {}", name);
                }
            }
            Outcome::Failed { error } => eprintln!("{}: FAILED: {}", project.project, error),
        }
    }

    println!(
        "{} projects, {} skipped, {} frames copied, {} failed ({} ms)",
        report.projects.len(),
        report.skipped.len(),
        report.copied_frames(),
        report.failed_count(),
        report.elapsed_ms
    );
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    crate::utils::logger::init(&cli.log_dir, cli.verbose);

    let json = cli.json;
    let config = cli.into_config()?;

    let report = match subsampler::run(&config) {
        Ok(report) => report,
        Err(err) => {
            crate::utils::logger::error(&format!("{:#}", err));
            return Err(err);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if report.failed_count() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_gives_default_config() {
        let config = Cli::parse_from(["framethin"]).into_config().unwrap();
        assert_eq!(config, SubsampleConfig::default());
        assert_eq!(config.stride.get(), 5);
        assert_eq!(config.root, PathBuf::from("."));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("framethin.json");
        std::fs::write(&path, r#"{ "stride": 3, "offset": 0, "output_dir_name": "Thin" }"#)
            .unwrap();

        let config = Cli::parse_from([
            "framethin",
            "shots",
            "--config",
            path.to_str().unwrap(),
            "--stride",
            "2",
            "--order",
            "listing",
            "-n",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.root, PathBuf::from("shots"));
        assert_eq!(config.stride.get(), 2);
        assert_eq!(config.offset, 0);
        assert_eq!(config.output_dir_name, "Thin");
        assert_eq!(config.order, FrameOrder::Listing);
        assert!(config.dry_run);
    }

    #[test]
    fn test_zero_stride_is_rejected() {
        assert!(Cli::try_parse_from(["framethin", "--stride", "0"]).is_err());
    }
}
