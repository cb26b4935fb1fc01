//! CLI for the AcreetionOS website end-to-end suite.
//!
//! ```bash
//! acreetion-e2e --base-url http://localhost:8080
//! acreetion-e2e --filter modal --fail-fast
//! acreetion-e2e --json report.json --screenshot-dir shots/
//! ```
//!
//! Exits non-zero if any case fails.

use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use acreetion_e2e::{suite, CaseSpec, SuiteConfig, SuiteReport, TestStatus, Viewport};

mod error;

use error::{CliError, CliResult};

/// End-to-end checks for the AcreetionOS website
#[derive(Debug, Parser)]
#[command(name = "acreetion-e2e", version, about)]
struct Cli {
    /// Base URL of the running site
    #[arg(long, env = "E2E_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Number of cases to run in parallel
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Per-assertion wait budget in milliseconds
    #[arg(long, default_value_t = 5_000)]
    timeout_ms: u64,

    /// Default viewport as WIDTHxHEIGHT, for cases without their own
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<Viewport>,

    /// Run the browser with a visible window
    #[arg(long)]
    headful: bool,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    no_sandbox: bool,

    /// Stop at the first failing case
    #[arg(long)]
    fail_fast: bool,

    /// Only run cases whose name contains this substring
    #[arg(long)]
    filter: Option<String>,

    /// Write the report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Capture failure screenshots into this directory
    #[arg(long)]
    screenshot_dir: Option<PathBuf>,

    /// Path to a chromium binary
    #[arg(long, env = "E2E_CHROMIUM_PATH")]
    chromium: Option<String>,

    /// Suppress per-case output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(all_passed) => {
            if all_passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{} {e}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    let cases = select_cases(cli.filter.as_deref())?;

    if !cli.quiet {
        println!(
            "Running {} case(s) against {}",
            cases.len(),
            style(&config.base_url).cyan()
        );
    }

    let report = execute(config, cases).await?;

    if !cli.quiet {
        print_report(&report);
    }
    if let Some(path) = &cli.json {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }

    Ok(report.all_passed())
}

#[cfg(feature = "browser")]
async fn execute(config: SuiteConfig, cases: Vec<CaseSpec>) -> CliResult<SuiteReport> {
    Ok(acreetion_e2e::run_site_suite(config, cases).await?)
}

#[cfg(not(feature = "browser"))]
async fn execute(_config: SuiteConfig, _cases: Vec<CaseSpec>) -> CliResult<SuiteReport> {
    Err(CliError::Config {
        message: "browser support not compiled in; rebuild with --features browser".to_string(),
    })
}

fn build_config(cli: &Cli) -> SuiteConfig {
    let mut config = SuiteConfig::new()
        .with_base_url(cli.base_url.clone())
        .with_headless(!cli.headful)
        .with_workers(cli.workers)
        .with_assertion_timeout(Duration::from_millis(cli.timeout_ms));
    if let Some(viewport) = cli.viewport {
        config = config.with_viewport(viewport);
    }
    if cli.no_sandbox {
        config = config.with_no_sandbox();
    }
    if cli.fail_fast {
        config = config.with_fail_fast();
    }
    if let Some(dir) = &cli.screenshot_dir {
        config = config.with_screenshot_dir(dir);
    }
    if let Some(path) = &cli.chromium {
        config = config.with_chromium_path(path);
    }
    config
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT (e.g. 1280x800), got {s:?}"))?;
    let width = w.trim().parse().map_err(|_| format!("invalid width {w:?}"))?;
    let height = h.trim().parse().map_err(|_| format!("invalid height {h:?}"))?;
    Ok(Viewport::new(width, height))
}

fn select_cases(filter: Option<&str>) -> CliResult<Vec<CaseSpec>> {
    let mut cases = suite::cases();
    if let Some(needle) = filter {
        cases.retain(|c| c.name.contains(needle));
        if cases.is_empty() {
            return Err(CliError::InvalidArgument {
                message: format!("no case name contains {needle:?}"),
            });
        }
    }
    Ok(cases)
}

fn print_report(report: &SuiteReport) {
    for result in &report.results {
        match result.status {
            TestStatus::Passed => println!(
                "  {} {} ({}ms)",
                style("PASS").green().bold(),
                result.name,
                result.duration.as_millis()
            ),
            TestStatus::Failed => {
                println!(
                    "  {} {} ({}ms)",
                    style("FAIL").red().bold(),
                    result.name,
                    result.duration.as_millis()
                );
                if let Some(error) = &result.error {
                    println!("       {error}");
                }
                if let Some(shot) = &result.screenshot {
                    println!("       screenshot: {}", shot.display());
                }
            }
            TestStatus::Skipped => {
                println!("  {} {}", style("SKIP").yellow(), result.name);
            }
        }
    }
    let totals = format!(
        "{} passed, {} failed, {} skipped in {}ms",
        report.passed_count(),
        report.failed_count(),
        report.skipped_count(),
        report.duration.as_millis()
    );
    if report.all_passed() {
        println!("{}", style(totals).green());
    } else {
        println!("{}", style(totals).red());
    }
}
