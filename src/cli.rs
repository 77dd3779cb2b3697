use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{ConfigSource, DEFAULT_LEVEL, LevelsConfig};
use crate::models::options::DEFAULT_EXTENSION;
use crate::output::reporter::Reporter;
use crate::processing::batch::{BatchOptions, run_with_options};

/// Command-line interface for the rmc tool
#[derive(Parser, Debug)]
#[command(
    name = "rmc",
    version,
    about = "Strip selected comments and docstrings from a Python source tree into a fresh copy.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory to process; asked for interactively when omitted
    pub root: Option<String>,

    /// Removal level to apply
    #[arg(short, long)]
    pub level: Option<String>,

    /// Levels file (.toml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name of the output folder, before the timestamp
    #[arg(long, default_value = "dst")]
    pub label: String,

    /// Extension of files to process
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Worker threads (0 = one per CPU)
    #[arg(short = 'j', long, default_value_t = 1)]
    pub threads: usize,

    /// Show what would be removed without writing anything
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    /// Print every processed file and enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List the available levels and exit
    #[arg(long, default_value_t = false)]
    pub list_levels: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a levels file with the built-in levels
    Init {
        /// Where to write the file
        #[arg(short, long, default_value = ".rmcrc.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn execute(self) -> Result<()> {
        if let Some(Commands::Init { output, force }) = &self.command {
            return Self::handle_init_command(output, *force);
        }

        let cwd = std::env::current_dir().context("Failed to read the current directory")?;
        let (levels, source) = LevelsConfig::discover(self.config.as_deref(), &cwd)?;
        match &source {
            ConfigSource::File(path) => info!("Using levels from {}", path.display()),
            ConfigSource::BuiltIn => info!("Using built-in levels"),
        }

        if self.list_levels {
            print!("{}", Self::describe_levels(&levels));
            return Ok(());
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stdout = io::stdout();

        let (root, level) = match &self.root {
            Some(root) => (
                root.clone(),
                self.level.clone().unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            ),
            None => {
                let root = prompt("Target directory", &mut input, &mut stdout)?;
                let level = match &self.level {
                    Some(level) => level.clone(),
                    None => {
                        let question = format!(
                            "Level [{}] (default {})",
                            levels.level_names().join("/"),
                            DEFAULT_LEVEL
                        );
                        let answer = prompt(&question, &mut input, &mut stdout)?;
                        match answer.trim() {
                            "" => DEFAULT_LEVEL.to_string(),
                            level => level.to_string(),
                        }
                    }
                };
                (root, level)
            }
        };

        let removal = levels.level(&level)?;
        let options = BatchOptions {
            extension: self.extension.clone(),
            threads: self.threads,
            dry_run: self.dry_run,
        };

        info!("Applying level {} to {}", level, root);
        let report = run_with_options(&root, removal, &self.label, &options)
            .with_context(|| format!("Failed to process {}", root))?;

        Reporter::new(self.verbose, self.quiet).report(&report);
        Ok(())
    }

    /// Write the levels template to `output_path`
    pub fn handle_init_command(output_path: &Path, force: bool) -> Result<()> {
        if output_path.exists() && !force {
            return Err(anyhow!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                output_path.display()
            ));
        }

        fs::write(output_path, LevelsConfig::template()).with_context(|| {
            format!("Failed to write configuration file: {}", output_path.display())
        })?;

        println!("Created configuration file: {}", output_path.display());
        Ok(())
    }

    fn describe_levels(levels: &LevelsConfig) -> String {
        let mut out = String::new();
        for (name, level) in &levels.levels {
            let targets = level
                .comment_prefixes
                .iter()
                .map(|prefix| format!("{:?}", prefix))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "{}: targets [{}], docstrings {}\n",
                name,
                targets,
                if level.strip_docstrings { "removed" } else { "kept" }
            ));
        }
        out
    }
}

/// Ask one question and return the answer without its line terminator
pub fn prompt<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    write!(output, "{}: ", question)?;
    output.flush()?;

    let mut answer = String::new();
    let read = input.read_line(&mut answer)?;
    if read == 0 {
        return Err(anyhow!("No input given for: {}", question));
    }

    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}
