use anyhow::{Context, Result};
use rayon::prelude::*;
use std::time::Instant;

use super::config::{FramePattern, SubsampleConfig};
use super::discovery::{self, ProjectJob};
use super::report::{Outcome, ProjectReport, RunReport};
use super::selection;
use crate::utils::{file_utils, logger};

/// A failed project: whatever was learned before the error, plus the error.
type Failure = (ProjectReport, anyhow::Error);

/// Scans and selects frames for one project without touching the output.
/// The returned report carries `Outcome::DryRun`.
pub fn plan_project(
    job: &ProjectJob,
    config: &SubsampleConfig,
    pattern: &FramePattern,
) -> Result<ProjectReport> {
    let mut frames = selection::scan_frames(&job.source_dir, pattern)?;
    selection::sort_frames(&mut frames, config.order);
    let chosen = selection::select(&frames, config.stride, config.offset);

    logger::debug(&format!(
        "{}: {} frames found, {} selected",
        job.name,
        frames.len(),
        chosen.len()
    ));

    let mut report = empty_report(job);
    report.frames_found = frames.len();
    report.selected = chosen.iter().map(|f| f.name.clone()).collect();
    Ok(report)
}

/// Deletes the planned output directory with everything in it, recreates it
/// and copies the selected frames in.
pub fn apply_plan(plan: &ProjectReport) -> Result<()> {
    file_utils::recreate_dir(&plan.output_dir)?;
    for name in &plan.selected {
        file_utils::copy_file(&plan.source_dir.join(name), &plan.output_dir.join(name))?;
    }
    Ok(())
}

fn attempt(
    job: &ProjectJob,
    config: &SubsampleConfig,
    pattern: &FramePattern,
) -> std::result::Result<ProjectReport, Failure> {
    let mut report =
        plan_project(job, config, pattern).map_err(|err| (empty_report(job), err))?;
    if !config.dry_run {
        if let Err(err) = apply_plan(&report) {
            return Err((report, err));
        }
        report.outcome = Outcome::Copied;
    }
    Ok(report)
}

/// Rebuilds one project's output directory from its source frames.
///
/// The output directory is deleted with everything in it before the copy,
/// unless `config.dry_run` is set, in which case nothing is touched.
#[allow(dead_code)]
pub fn process_project(
    job: &ProjectJob,
    config: &SubsampleConfig,
    pattern: &FramePattern,
) -> Result<ProjectReport> {
    attempt(job, config, pattern).map_err(|(_, err)| err)
}

fn empty_report(job: &ProjectJob) -> ProjectReport {
    ProjectReport {
        project: job.name.clone(),
        source_dir: job.source_dir.clone(),
        output_dir: job.output_dir.clone(),
        frames_found: 0,
        selected: Vec::new(),
        outcome: Outcome::DryRun,
    }
}

/// Turns per-project results into reports. Every failure is logged; with
/// `fail_fast` the first one in project order is returned.
fn collect_reports(
    results: Vec<std::result::Result<ProjectReport, Failure>>,
    fail_fast: bool,
) -> Result<Vec<ProjectReport>> {
    let mut reports = Vec::with_capacity(results.len());
    let mut first_error = None;

    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err((mut partial, err)) => {
                let err = err.context(format!("Project '{}' failed", partial.project));
                logger::error(&format!("{:#}", err));
                partial.outcome = Outcome::Failed {
                    error: format!("{:#}", err),
                };
                reports.push(partial);
                if fail_fast && first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}

fn process_all(
    jobs: &[ProjectJob],
    config: &SubsampleConfig,
    pattern: &FramePattern,
) -> Result<Vec<ProjectReport>> {
    let threads = config.worker_threads();

    let results: Vec<_> = if threads > 1 && jobs.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to start worker pool")?;
        pool.install(|| {
            jobs.par_iter()
                .map(|job| attempt(job, config, pattern))
                .collect()
        })
    } else {
        let mut results = Vec::with_capacity(jobs.len());
        for job in jobs {
            let result = attempt(job, config, pattern);
            let stop = result.is_err() && config.fail_fast;
            results.push(result);
            if stop {
                break;
            }
        }
        results
    };

    collect_reports(results, config.fail_fast)
}

/// Subsamples every project under `config.root`.
///
/// A missing root or an invalid config aborts the run. A failing project is
/// recorded in the report and the others still run, unless `fail_fast`.
pub fn run(config: &SubsampleConfig) -> Result<RunReport> {
    let started = Instant::now();
    config.validate()?;
    let pattern = config.frame_pattern()?;

    logger::info(&format!(
        "run: root={} stride={} offset={} pattern={} order={:?} dry_run={}",
        config.root.display(),
        config.stride,
        config.offset,
        pattern.as_str(),
        config.order,
        config.dry_run
    ));

    let found = discovery::discover(&config.root, config)?;
    for name in &found.skipped {
        logger::debug(&format!("{}: no {} directory, skipped", name, config.source_dir_name));
    }

    let projects = process_all(&found.jobs, config, &pattern)?;

    let report = RunReport {
        root: config.root.clone(),
        stride: config.stride.get(),
        offset: config.offset,
        projects,
        skipped: found.skipped,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    logger::info(&format!(
        "done: {} projects, {} frames copied, {} failed in {} ms",
        report.projects.len(),
        report.copied_frames(),
        report.failed_count(),
        report.elapsed_ms
    ));
    Ok(report)
}
