use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::job::FileJob;
use crate::models::options::{DEFAULT_EXTENSION, RemovalConfig};
use crate::processing::line::{LineProcessor, LineStats};
use crate::processing::pattern::CommentMatcher;

/// Outcome of filtering one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub job: FileJob,
    pub stats: LineStats,
}

impl FileReport {
    pub fn modified(&self) -> bool {
        self.stats.comments_removed > 0 || self.stats.docstring_lines_removed > 0
    }
}

/// Filter `source` into `destination` using the default `.py` extension.
///
/// The destination is opened in append mode; callers are expected to point it
/// at a path that does not exist yet.
pub fn process_file(
    source: &Path,
    destination: &Path,
    config: &RemovalConfig,
) -> Result<FileReport> {
    let matcher = CommentMatcher::new(&config.comment_prefixes)?;
    let job = FileJob::new(source, destination);
    process_job(&job, config, matcher.as_ref(), DEFAULT_EXTENSION)
}

/// Check every precondition of a job without touching the filesystem beyond metadata
pub fn validate_job(job: &FileJob, extension: &str) -> Result<()> {
    let metadata = match fs::metadata(&job.source) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::SourceMissing(job.source.clone()));
        }
        Err(err) => return Err(Error::io(&job.source, err)),
    };

    if !metadata.is_file() {
        return Err(Error::NotAFile(job.source.clone()));
    }

    for path in [&job.source, &job.destination] {
        if !has_extension(path, extension) {
            return Err(Error::WrongExtension {
                path: path.clone(),
                expected: extension.to_string(),
            });
        }
    }

    if job.source == job.destination {
        return Err(Error::SameSourceAndDestination(job.source.clone()));
    }

    Ok(())
}

/// Filter one job with an already compiled matcher
pub fn process_job(
    job: &FileJob,
    config: &RemovalConfig,
    matcher: Option<&CommentMatcher>,
    extension: &str,
) -> Result<FileReport> {
    validate_job(job, extension)?;

    if let Some(parent) = job.destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }
    }

    if job.destination.exists() {
        warn!(
            "Destination already exists, output will be appended: {}",
            job.destination.display()
        );
    }

    let reader = File::open(&job.source)
        .map(BufReader::new)
        .map_err(|err| Error::io(&job.source, err))?;
    let output = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&job.destination)
        .map_err(|err| Error::io(&job.destination, err))?;
    let mut writer = BufWriter::new(output);

    let mut processor = LineProcessor::new(config, matcher);
    let stats = processor
        .process(reader, &mut writer)
        .map_err(|err| err.into_file_error(&job.source, &job.destination))?;
    writer
        .flush()
        .map_err(|err| Error::io(&job.destination, err))?;

    debug!(
        "Filtered {} -> {} ({} comment(s), {} docstring line(s) removed)",
        job.source.display(),
        job.destination.display(),
        stats.comments_removed,
        stats.docstring_lines_removed
    );

    Ok(FileReport {
        job: job.clone(),
        stats,
    })
}

/// Run the filter without creating or writing the destination
pub fn preview_job(
    job: &FileJob,
    config: &RemovalConfig,
    matcher: Option<&CommentMatcher>,
    extension: &str,
) -> Result<FileReport> {
    validate_job(job, extension)?;

    let reader = File::open(&job.source)
        .map(BufReader::new)
        .map_err(|err| Error::io(&job.source, err))?;
    let mut processor = LineProcessor::new(config, matcher);
    let stats = processor
        .process(reader, &mut io::sink())
        .map_err(|err| err.into_file_error(&job.source, &job.destination))?;

    Ok(FileReport {
        job: job.clone(),
        stats,
    })
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(OsStr::to_str) == Some(extension)
}
