use chrono::{DateTime, Local};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::models::job::FileJob;
use crate::models::options::{DEFAULT_EXTENSION, RemovalConfig};
use crate::processing::file::{FileReport, has_extension, preview_job, process_job};
use crate::processing::pattern::CommentMatcher;
use crate::utils::path::{destination_root, normalize_root, substitute_root, trim_path_quotes};

/// Knobs for a batch run beyond the removal rules themselves
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Extension of files to process, without the dot
    pub extension: String,
    /// Worker threads; 1 runs sequentially, 0 uses one per CPU
    pub threads: usize,
    /// Plan and filter into a sink without writing anything
    pub dry_run: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            threads: 1,
            dry_run: false,
        }
    }
}

/// Everything a batch run produced
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub files: Vec<FileReport>,
    pub dry_run: bool,
}

impl BatchReport {
    pub fn modified_files(&self) -> usize {
        self.files.iter().filter(|report| report.modified()).count()
    }

    pub fn comments_removed(&self) -> usize {
        self.files
            .iter()
            .map(|report| report.stats.comments_removed)
            .sum()
    }

    pub fn docstring_lines_removed(&self) -> usize {
        self.files
            .iter()
            .map(|report| report.stats.docstring_lines_removed)
            .sum()
    }
}

/// Mirror every `.py` file under `root_input` into a fresh `<label>_<timestamp>` sibling
pub fn run(
    root_input: &str,
    config: &RemovalConfig,
    destination_label: &str,
) -> Result<BatchReport> {
    run_with_options(root_input, config, destination_label, &BatchOptions::default())
}

pub fn run_with_options(
    root_input: &str,
    config: &RemovalConfig,
    destination_label: &str,
    options: &BatchOptions,
) -> Result<BatchReport> {
    let started_at = Local::now();
    run_at(root_input, config, destination_label, options, &started_at)
}

/// Batch run with an explicit start time, which fixes the destination folder name
pub fn run_at(
    root_input: &str,
    config: &RemovalConfig,
    destination_label: &str,
    options: &BatchOptions,
    started_at: &DateTime<Local>,
) -> Result<BatchReport> {
    let source_root = resolve_root(root_input)?;
    let matcher = CommentMatcher::new(&config.comment_prefixes)?;
    let destination_root = destination_root(&source_root, destination_label, started_at);

    let jobs = plan_jobs(&source_root, &destination_root, &options.extension)?;
    info!(
        "Processing {} file(s) from {} into {}",
        jobs.len(),
        source_root.display(),
        destination_root.display()
    );

    let handle = |job: &FileJob| {
        if options.dry_run {
            preview_job(job, config, matcher.as_ref(), &options.extension)
        } else {
            process_job(job, config, matcher.as_ref(), &options.extension)
        }
    };

    let files = match options.threads {
        1 => jobs.iter().map(handle).collect::<Result<Vec<_>>>()?,
        threads => {
            let threads = if threads == 0 { num_cpus::get() } else { threads };
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|err| Error::io(&source_root, std::io::Error::other(err)))?;
            pool.install(|| jobs.par_iter().map(handle).collect::<Result<Vec<_>>>())?
        }
    };

    info!("Finished {} file(s)", files.len());

    Ok(BatchReport {
        source_root,
        destination_root,
        files,
        dry_run: options.dry_run,
    })
}

/// Trim quotes from the user's input and require an existing directory.
///
/// The result is canonical, so `.` and `..` have a real parent to put the
/// output folder in.
pub fn resolve_root(root_input: &str) -> Result<PathBuf> {
    let root = PathBuf::from(normalize_root(trim_path_quotes(root_input)));

    if !root.exists() {
        return Err(Error::RootMissing(root));
    }
    if !root.is_dir() {
        return Err(Error::RootNotDirectory(root));
    }

    fs::canonicalize(&root).map_err(|err| Error::io(root, err))
}

/// Pair every matching file under `source_root` with its mirrored destination
pub fn plan_jobs(
    source_root: &Path,
    destination_root: &Path,
    extension: &str,
) -> Result<Vec<FileJob>> {
    let mut jobs = Vec::new();

    for entry in WalkDir::new(source_root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source_root.to_path_buf());
            Error::io(path, err.into())
        })?;

        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }

        let destination = substitute_root(entry.path(), source_root, destination_root);
        debug!("Planned {} -> {}", entry.path().display(), destination.display());
        jobs.push(FileJob::new(entry.path(), destination));
    }

    Ok(jobs)
}
