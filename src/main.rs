use anyhow::Context;
use clap::Parser;
use file_resolver::{formatter_for, FileResolver, OutputFormat, ResolverOptions};
use owo_colors::OwoColorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "file-resolver")]
#[command(about = "Resolve directories and files into an ordered, filtered file list")]
#[command(version)]
struct Cli {
    /// Directories or files to resolve, in order
    #[arg(value_name = "SOURCES", required = true)]
    sources: Vec<String>,

    /// Keep only files matching this glob (repeatable)
    #[arg(long = "include", short = 'i', value_name = "PATTERN")]
    includes: Vec<String>,

    /// Drop files matching this glob, applied after includes (repeatable)
    #[arg(long = "exclude", short = 'e', value_name = "PATTERN")]
    excludes: Vec<String>,

    /// Do not descend into symlinked directories
    #[arg(long)]
    no_follow_links: bool,

    /// Match patterns case-insensitively
    #[arg(long)]
    ignore_case: bool,

    /// Output format
    #[arg(long = "output-format", value_enum, default_value = "text")]
    output_format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short)]
    verbose: bool,
}

/// Log to stderr so stdout stays clean for the file list.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose).context("Failed to initialize logging")?;

    let options = ResolverOptions {
        follow_links: !cli.no_follow_links,
        case_sensitive: !cli.ignore_case,
    };
    let resolver = FileResolver::new(
        cli.sources,
        cli.includes.into_iter().map(Some).collect(),
        cli.excludes.into_iter().map(Some).collect(),
    )
    .with_options(options);

    match resolver.resolve() {
        Ok(files) => {
            tracing::info!(files = files.len(), "resolution complete");
            print!("{}", formatter_for(cli.output_format).format(&files));
            if cli.output_format == OutputFormat::Json {
                println!();
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            std::process::exit(2);
        }
    }
}
