//! MyLar installer CLI application
//!
//! Creates a new MyLar application: latest release download, extraction,
//! dependency installation, theme selection and asset build.

use std::error::Error as _;
use std::process;

use tracing::{error, info};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use mylar_installer::cli::{handle_new, Cli, Commands};
use mylar_installer::config::AppConfig;
use mylar_installer::constants::logging;
use mylar_installer::errors::AppError;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{} error: {}", e.category(), e);
        eprintln!("Error: {}", e);

        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run() -> Result<(), AppError> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let loaded = AppConfig::load(cli.global.config.clone()).await;

    // The subscriber must exist before a config error reaches `main`
    let configured_level = loaded.as_ref().ok().and_then(|c| c.logging.level.as_deref());
    init_logging(&cli, configured_level);
    let config = loaded?;
    info!("MyLar installer v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::New(args) => {
            info!("Executing new command");
            handle_new(args, &cli.global, config).await
        }
    }
}

/// Initialize logging from CLI flags, falling back to the configured level
fn init_logging(cli: &Cli, configured_level: Option<&str>) {
    let level = cli.global.effective_log_level(configured_level);

    let mut filter = EnvFilter::from_default_env();
    match format!("{}={}", logging::CRATE_TARGET, level).parse::<Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring log level '{}': {}", level, e),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
