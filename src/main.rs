//! Vito Heater - heating controller datapoint cache binary
//!
//! Polls the controller on a fast and a slow cadence and serves the cached
//! values as JSON.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vito_heater::{
    datapoints::table, start_web_server, DatapointCollector, Descriptor, PollConfig, Registry,
    SimulatedEngine, Snapshot, WebConfig, DEFAULT_SERVICE_NAME, DEFAULT_WEB_PORT,
};

#[derive(Parser)]
#[command(name = "vito_heater")]
#[command(about = "Heating controller datapoint cache with a JSON endpoint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Service name reported by the health endpoint
    #[arg(long, default_value = DEFAULT_SERVICE_NAME)]
    service_name: String,

    /// Fast group polling interval in seconds
    #[arg(long, default_value_t = 300)]
    fast_interval_secs: u64,

    /// Slow group polling interval in seconds
    #[arg(long, default_value_t = 3600)]
    slow_interval_secs: u64,

    /// Delay before the first read in seconds
    #[arg(long, default_value_t = 10)]
    startup_delay_secs: u64,

    /// JSON datapoint table to use instead of the built-in one
    #[arg(long)]
    datapoints: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the controller and serve the snapshot (default)
    Serve(ServeArgs),

    /// Read every group once, print the snapshot and exit
    Snapshot(SnapshotArgs),

    /// List the configured datapoints
    Datapoints,
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "json")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Serve(args)) => serve_command(&cli, args).await?,
        Some(Commands::Snapshot(args)) => snapshot_command(&cli, args)?,
        Some(Commands::Datapoints) => datapoints_command(&cli)?,
        None => serve_command(&cli, &ServeArgs::default()).await?,
    }

    Ok(())
}

fn log_level(cli: &Cli) -> Level {
    if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// `RUST_LOG` wins when set; otherwise the level chosen by the flags.
fn log_filter(level: Level, from_env: Option<EnvFilter>) -> EnvFilter {
    from_env.unwrap_or_else(|| EnvFilter::new(level.as_str().to_lowercase()))
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = log_filter(log_level(cli), EnvFilter::try_from_default_env().ok());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn poll_config(cli: &Cli) -> PollConfig {
    PollConfig::default()
        .with_fast_interval(Duration::from_secs(cli.fast_interval_secs))
        .with_slow_interval(Duration::from_secs(cli.slow_interval_secs))
        .with_startup_delay(Duration::from_secs(cli.startup_delay_secs))
}

fn load_table(cli: &Cli) -> anyhow::Result<Vec<Descriptor>> {
    Ok(match &cli.datapoints {
        Some(path) => {
            info!("Loading datapoints from {}", path.display());
            table::load_datapoints(path)?
        }
        None => table::default_datapoints(),
    })
}

/// Build the collector over the configured table.
///
/// Reads are answered by [`SimulatedEngine`] until a serial engine
/// implementing `ProtocolEngine` is plugged in here.
fn build_collector(cli: &Cli) -> anyhow::Result<DatapointCollector> {
    let registry = Registry::from_descriptors(load_table(cli)?)?;
    info!("Registered {} datapoints", registry.len());
    let engine = SimulatedEngine::new();
    Ok(DatapointCollector::new(registry, poll_config(cli), engine)?)
}

async fn serve_command(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    let collector = build_collector(cli)?;
    let stream = collector.start_stream()?;

    let web_config = WebConfig::new(&cli.host, cli.port)
        .with_cors(!args.no_cors)
        .with_service_name(&cli.service_name);

    info!("Web server configuration:");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - CORS enabled: {}", web_config.enable_cors);

    start_web_server(web_config, stream).await?;

    Ok(())
}

fn snapshot_command(cli: &Cli, args: &SnapshotArgs) -> anyhow::Result<()> {
    let mut collector = build_collector(cli)?;
    let document = collector.poll_all()?;

    match args.format.as_str() {
        "json" => println!("{}", document),
        "pretty" => println!("{}", Snapshot::new(collector.registry()).render_pretty()?),
        other => anyhow::bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }

    Ok(())
}

fn datapoints_command(cli: &Cli) -> anyhow::Result<()> {
    let descriptors = load_table(cli)?;

    println!("{:<36} {:<5} {:<8} {}", "NAME", "GROUP", "ADDRESS", "KIND");
    for d in &descriptors {
        println!(
            "{:<36} {:<5} {:#06x}   {}",
            d.name, d.group, d.address, d.kind
        );
    }
    println!();
    println!("{} datapoints", descriptors.len());

    Ok(())
}
