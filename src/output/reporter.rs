use crate::processing::batch::BatchReport;
use crate::processing::file::FileReport;

/// Prints per-file lines and the final summary to stdout
pub struct Reporter {
    verbose: bool,
    quiet: bool,
}

impl Reporter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn report(&self, batch: &BatchReport) {
        if self.quiet {
            return;
        }

        if self.verbose {
            for file in &batch.files {
                println!("{}", Self::file_line(file, batch.dry_run));
            }
        }

        println!("{}", Self::summary(batch));
    }

    fn file_line(file: &FileReport, dry_run: bool) -> String {
        let verb = if dry_run { "[DRY RUN] Would write" } else { "✓ Wrote" };
        format!(
            "{}: {} -> {} (removed {} comment(s), {} docstring line(s))",
            verb,
            file.job.source.display(),
            file.job.destination.display(),
            file.stats.comments_removed,
            file.stats.docstring_lines_removed
        )
    }

    pub fn summary(batch: &BatchReport) -> String {
        let mut summary = if batch.dry_run {
            format!(
                "\n[DRY RUN] Summary: {} files processed, {} would change",
                batch.files.len(),
                batch.modified_files()
            )
        } else {
            format!(
                "\nSummary: {} files processed, {} changed, output in {}",
                batch.files.len(),
                batch.modified_files(),
                batch.destination_root.display()
            )
        };

        summary.push_str(&format!(
            "\nRemoved {} comment(s) and {} docstring line(s)",
            batch.comments_removed(),
            batch.docstring_lines_removed()
        ));

        if batch.files.is_empty() {
            summary.push_str("\nNo matching files were found.");
        }

        summary
    }
}
