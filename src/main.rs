use rmc::cli::Cli;
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli.execute()
}
