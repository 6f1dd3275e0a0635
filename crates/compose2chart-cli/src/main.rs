//! compose2chart CLI - generate a Helm chart from docker-compose.yml

use clap::Parser;
use compose2chart_convert::ConvertOptions;
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

use error::CliError;

#[derive(Parser)]
#[command(name = "compose2chart")]
#[command(author = "compose2chart Contributors")]
#[command(about = "Generate a Helm chart from docker-compose.yml", long_about = None)]
struct Cli {
    /// Path to the docker-compose file
    #[arg(
        short = 'f',
        long = "file",
        env = "COMPOSE2CHART_FILE",
        default_value = "docker-compose.yml"
    )]
    file: PathBuf,

    /// Output directory for the generated Helm chart
    #[arg(short = 'o', long = "out", env = "COMPOSE2CHART_OUT", default_value = "./chart")]
    out: PathBuf,

    /// Chart name
    #[arg(
        short = 'n',
        long = "name",
        env = "COMPOSE2CHART_NAME",
        default_value = "generated-chart"
    )]
    name: String,

    /// Chart appVersion
    #[arg(long = "app-version", env = "COMPOSE2CHART_APP_VERSION", default_value = "0.1.0")]
    app_version: String,

    /// Chart version
    #[arg(long = "version", env = "COMPOSE2CHART_VERSION", default_value = "0.1.0")]
    version: String,

    /// Show what would be written without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let options = ConvertOptions {
        compose_file: cli.file,
        out_dir: cli.out,
        chart_name: cli.name,
        app_version: cli.app_version,
        version: cli.version,
        dry_run: cli.dry_run,
    };

    if let Err(err) = commands::convert::run(options, cli.quiet) {
        report(&err, cli.debug);
        std::process::exit(err.exit_code());
    }
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Level used when `RUST_LOG` is unset or invalid
fn default_log_level(debug: bool) -> &'static str {
    if debug { "debug" } else { "warn" }
}

/// A single diagnostic line, or the full report in debug mode
fn report(err: &CliError, debug: bool) {
    if debug {
        eprintln!("{:?}", miette::Report::new(err.clone()));
    } else {
        eprintln!("{} {}", style("error:").red().bold().for_stderr(), err);
    }
}
