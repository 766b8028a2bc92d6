//! ipt-report main entry point
//!
//! This is the command-line interface for the IPT resource report.

use clap::Parser;
use ipt_report::config::{load_config_with_hash, Config};
use ipt_report::crawler::crawl;
use ipt_report::output::{
    log_statistics, write_report_to_path, write_report_to_stdout, CrawlStatistics,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ipt-report: one CSV report across many IPT instances
///
/// Crawls every IPT listed in the configuration file, collects the resources
/// each one publishes and writes them as a single CSV report.
#[derive(Parser, Debug)]
#[command(name = "ipt-report")]
#[command(version)]
#[command(about = "Consolidated resource report across IPT instances", long_about = None)]
struct Cli {
    /// Path to TOML configuration file listing the IPTs
    #[arg(short, long, value_name = "CONFIG", default_value = "ipts.toml")]
    file: PathBuf,

    /// Write the CSV report to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and list the IPTs that would be crawled
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.file.display());
    let config = match load_config_with_hash(&cli.file) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_crawl(&config, cli.output).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the CSV report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ipt_report=info,warn"),
            1 => EnvFilter::new("ipt_report=debug,info"),
            2 => EnvFilter::new("ipt_report=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== ipt-report Dry Run ===\n");

    println!("HTTP:");
    match config.http.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }
    match config.http.connect_timeout_secs {
        Some(secs) => println!("  Connect timeout: {}s", secs),
        None => println!("  Connect timeout: none"),
    }
    if let Some(agent) = &config.http.user_agent {
        println!("  User agent: {}", agent);
    }

    let sources = config.sources();
    println!("\nIPTs ({}):", sources.len());
    for source in &sources {
        println!("  - {}: {}", source.alias, source.url);
    }

    let skipped = config.ipts.len() - sources.len();
    if skipped > 0 {
        println!("\nSkipped {} entry with an empty alias", skipped);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = match crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    match &output {
        Some(path) => {
            write_report_to_path(&report, path)?;
            tracing::info!("Report written to: {}", path.display());
        }
        None => write_report_to_stdout(&report)?,
    }

    log_statistics(&CrawlStatistics::from_report(&report));

    Ok(())
}
