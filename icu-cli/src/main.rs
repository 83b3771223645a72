//! `icu` - command line client for ICU privacy exposure checks.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use icu_check::{
    notices as check_notices, CheckRequestController, CheckResult, HttpAnalysisBackend,
    InputValidator, SubmitOutcome,
};
use icu_core::{AppConfig, InputKind};
use icu_report::{
    notices as report_notices, ExportOutcome, FsDownloadPort, HttpReportService, ReportExporter,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "icu", version, about = "See what the internet knows about you")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Analysis backend base URL, overriding the configuration
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a privacy exposure check
    Check {
        /// What is being checked: email, username or domain
        kind: InputKind,

        /// The identifier to check
        value: String,

        /// Also download a report; without a value the configured default format is used
        #[arg(long, value_name = "FORMAT")]
        report: Option<Option<String>>,
    },
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,icu=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config =
        AppConfig::load_with_env(cli.config.as_deref()).context("failed to load configuration")?;

    if let Some(url) = &cli.backend {
        config.backend.base_url.clone_from(url);
        config.validate().context("invalid --backend value")?;
    }

    Ok(config)
}

fn print_result(result: &CheckResult) {
    println!("Score: {}/100 ({})", result.score(), result.risk_band().label());

    if let Some(whois) = result.whois() {
        let status = if whois.registered {
            "registered"
        } else {
            "not registered"
        };
        println!("WHOIS: {status}");
        if let Some(registrar) = &whois.registrar {
            println!("  Registrar: {registrar}");
        }
        if let Some(created) = &whois.creation_date {
            println!("  Created: {created}");
        }
    }
    if let Some(accounts) = result.sherlock().filter(|a| !a.is_empty()) {
        println!("Username found on: {}", accounts.join(", "));
    }
    if let Some(services) = result.holehe().filter(|s| !s.is_empty()) {
        println!("Email registered with: {}", services.join(", "));
    }
    if !result.summary().is_empty() {
        println!("{}", result.summary());
    }
}

async fn run_check(
    config: &AppConfig,
    kind: InputKind,
    value: &str,
    report: Option<Option<String>>,
) -> anyhow::Result<()> {
    let backend = HttpAnalysisBackend::from_config(&config.backend)
        .context("failed to create analysis client")?;
    let controller = CheckRequestController::new(Arc::new(backend))
        .with_validator(InputValidator::from_config(&config.validation))
        .with_timeout(config.backend.timeout());

    let result = match controller.submit(kind, value).await {
        Ok(SubmitOutcome::Completed(result)) => result,
        Ok(SubmitOutcome::AlreadyInFlight) => bail!("a check is already in progress"),
        Err(e) => {
            eprintln!("{}", check_notices::check_failed(&e));
            return Err(e).context("privacy check failed");
        }
    };

    println!("{}", check_notices::check_complete(&result));
    print_result(&result);

    let Some(format) = report else {
        return Ok(());
    };
    let format = format.unwrap_or_else(|| config.reports.default_format.clone());

    let service = HttpReportService::from_config(&config.backend)
        .context("failed to create report client")?;
    let dir = config
        .download_dir()
        .context("failed to resolve download directory")?;
    let exporter = ReportExporter::new(Arc::new(service), Arc::new(FsDownloadPort::new(dir)));

    match exporter
        .export_report(controller.last_result().as_ref(), &format, kind, value)
        .await
    {
        Ok(ExportOutcome::Downloaded(receipt)) => {
            println!("{}", report_notices::report_downloaded(receipt.format));
            println!("Saved to {}", receipt.location);
            Ok(())
        }
        Ok(ExportOutcome::AlreadyInFlight) => bail!("a {format} export is already in progress"),
        Err(e) => {
            eprintln!("{}", report_notices::download_failed(&e));
            Err(e).context("report export failed")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting icu v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    match cli.command {
        Command::Check {
            kind,
            value,
            report,
        } => run_check(&config, kind, &value, report).await,
    }
}
