mod config;
mod display;
mod remote;
mod reports;
mod sampling;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use config::{ConfigError, DEFAULT_LOOPS, HarnessEnv, REQUIRED_VARS, parse_loop_count};
use remote::{CognitoAuthenticator, GraphqlRollClient, RollService, http_client};
use reports::{RunReport, generate_json_report};
use rollaudit_core::DieSpec;
use sampling::{SessionConfig, SessionSummary, StopSignal, run_session, stop_on_ctrl_c};

#[derive(Debug, Parser)]
#[command(name = "rollaudit-tester", version = "0.1.0")]
#[command(about = "Live randomness audit for a remote dice-rolling service")]
struct Args {
    /// Number of sampling loops (0 runs until Ctrl-C)
    loops: Option<String>,

    /// Rolls requested per loop
    #[arg(long, default_value_t = sampling::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Maximum rolls in flight at once
    #[arg(long, default_value_t = sampling::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Pause between loops, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Die type label sent with each roll
    #[arg(long, default_value = "d100")]
    die_type: String,

    /// Number of faces on the die
    #[arg(long, default_value_t = 100)]
    die_size: u32,

    /// Roll category understood by the service
    #[arg(long, default_value = "deltaGreen")]
    roll_type: String,

    /// Target number sent with each roll
    #[arg(long, default_value_t = 50)]
    target: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// End-of-run summary format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Write the JSON run summary to this path instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let max_loops = resolve_loop_count(args.loops.as_deref());
    let env = match HarnessEnv::from_env() {
        Ok(env) => env,
        Err(err) => {
            report_config_error(&err);
            std::process::exit(1);
        }
    };
    let die = DieSpec::new(&args.die_type, args.die_size, &args.roll_type, args.target)
        .context("invalid die description")?;

    announce_banner(&die, max_loops);

    let http = http_client(Duration::from_secs(args.timeout_secs))
        .context("failed to build HTTP client")?;

    println!("Getting Cognito access token...");
    let authenticator = CognitoAuthenticator::for_region(http.clone(), &env.region);
    let token = match authenticator.access_token(&env.credentials).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            log::error!("identity provider at {} issued no token", authenticator.endpoint());
            eprintln!("{}", "Failed to get access token".red());
            std::process::exit(1);
        }
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("{}", "Failed to get access token".red());
            std::process::exit(1);
        }
    };
    if args.verbose {
        println!("✅ Authenticated as {}", env.credentials.username);
    }

    let service: Arc<dyn RollService> = Arc::new(GraphqlRollClient::new(
        http,
        env.graphql_url,
        token,
        env.game_id,
    ));

    let (handle, mut stop) = StopSignal::new();
    stop_on_ctrl_c(handle);

    let session = session_config(&args, max_loops, die);
    let started_at = Utc::now();
    let summary = run_session(service, &session, &mut stop, &mut stdout())
        .await
        .context("failed to draw sampling frame")?;
    let finished_at = Utc::now();

    if summary.interrupted {
        println!(
            "\nStopped after {} loops with {} total rolls",
            summary.loops_completed,
            summary.samples.len()
        );
    }

    write_reports(&args, &RunReport::new(&summary, started_at, finished_at))?;
    log_summary(&summary);
    Ok(())
}

/// Loop count to run, with `None` meaning until interrupted.
fn resolve_loop_count(raw: Option<&str>) -> Option<u32> {
    let loops = parse_loop_count(raw).unwrap_or_else(|err| {
        log::warn!("{err}; falling back to {DEFAULT_LOOPS}");
        println!(
            "Error: Invalid number of loops '{}'. Using default of {DEFAULT_LOOPS}.",
            err.0
        );
        DEFAULT_LOOPS
    });
    (loops > 0).then_some(loops)
}

fn report_config_error(err: &ConfigError) {
    let ConfigError::MissingVariables(missing) = err;
    log::error!("{err}");
    eprintln!("{}", "Error: Missing required environment variables".red());
    for name in missing {
        eprintln!("  {name}");
    }
    eprintln!("Required: {}", REQUIRED_VARS.join(", "));
}

fn announce_banner(die: &DieSpec, max_loops: Option<u32>) {
    println!("{}", "🎲 Rollaudit Live Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
    let loops = max_loops.map_or_else(|| "until interrupted".to_string(), |l| l.to_string());
    println!(
        "Die: {} ({} faces, {} vs {}), loops: {loops}",
        die.label, die.faces, die.roll_type, die.target
    );
}

fn session_config(args: &Args, max_loops: Option<u32>, die: DieSpec) -> SessionConfig {
    SessionConfig {
        max_loops,
        batch_size: args.batch_size,
        concurrency: args.concurrency,
        delay: Duration::from_millis(args.delay_ms),
        die,
    }
}

fn log_summary(summary: &SessionSummary) {
    log::info!(
        "run finished: {} loops, {} rolls ({} failed)",
        summary.loops_completed,
        summary.samples.len(),
        summary.samples.failure_count()
    );
}

/// The live frames already carry the console report; only the JSON summary
/// needs writing at the end, and only when asked for.
fn write_reports(args: &Args, report: &RunReport) -> Result<()> {
    if args.report != "json" && args.output.is_none() {
        return Ok(());
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    generate_json_report(&mut output_target, report)?;
    output_target.flush_inner()?;
    if let Some(path) = &args.output {
        println!("📄 Run summary written to {}", path.display());
    }
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        self.writer().flush()
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
