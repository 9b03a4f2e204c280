use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use aprsroute_tools::{
    format_parse_pretty, format_route_pretty, load_config, parse_line, route_line, RouteReport,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use router::{AliasRule, DuplicateFilter, RouterConfig};

#[derive(Parser)]
#[command(
    name = "aprsroute-tools",
    version,
    about = "APRS digipeater routing tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Route packets as a digipeater would and show the decision.
    Route {
        #[command(flatten)]
        station: StationArgs,
        /// Read packets from a file, one per line (`-` for stdin).
        #[arg(long)]
        input: Option<PathBuf>,
        /// Drop packets repeated within this many seconds.
        #[arg(long)]
        dedupe_secs: Option<u64>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        /// Packets in `SOURCE>DEST,PATH:PAYLOAD` form.
        packets: Vec<String>,
    },
    /// Parse packets and classify their path entries.
    Parse {
        #[command(flatten)]
        station: StationArgs,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        /// Packets in `SOURCE>DEST,PATH:PAYLOAD` form.
        #[arg(required = true)]
        packets: Vec<String>,
    },
}

#[derive(Args)]
struct StationArgs {
    /// Router configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Router callsign; overrides the config file.
    #[arg(long)]
    callsign: Option<String>,
    /// Generic trace alias to answer to; replaces the configured aliases.
    #[arg(long = "alias", value_name = "NAME")]
    aliases: Vec<String>,
    /// Fixed alias to answer to; replaces the configured aliases.
    #[arg(long = "fixed-alias", value_name = "NAME")]
    fixed_aliases: Vec<String>,
    /// Ignore path entries naming the router.
    #[arg(long)]
    no_explicit: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Route {
            station,
            input,
            dedupe_secs,
            format,
            mut packets,
        } => {
            let config = build_config(&station)?;
            if let Some(input) = &input {
                packets.extend(read_packets(input)?);
            }
            let mut filter = dedupe_secs.map(|secs| DuplicateFilter::new(Duration::from_secs(secs)));
            let started = Instant::now();
            let mut faults = 0usize;
            for text in &packets {
                let report = route_line(text, &config, filter.as_mut(), started.elapsed());
                if report.is_fault() {
                    faults += 1;
                }
                print_route_report(&report, format)?;
            }
            tracing::info!(packets = packets.len(), faults, "done");
        }
        Command::Parse {
            station,
            format,
            packets,
        } => {
            let config = build_config(&station)?;
            for text in &packets {
                let report = parse_line(text, &config)
                    .with_context(|| format!("parse packet {text:?}"))?;
                match format {
                    OutputFormat::Json => {
                        let json =
                            serde_json::to_string_pretty(&report).context("serialize json")?;
                        println!("{json}");
                    }
                    OutputFormat::Pretty => println!("{}", format_parse_pretty(&report)),
                }
            }
        }
    }
    Ok(())
}

fn build_config(station: &StationArgs) -> Result<RouterConfig> {
    let mut config = match (&station.config, &station.callsign) {
        (Some(path), _) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            load_config(&contents)?
        }
        (None, Some(callsign)) => RouterConfig::parse(callsign)
            .with_context(|| format!("invalid router callsign {callsign:?}"))?,
        (None, None) => anyhow::bail!("either --config or --callsign is required"),
    };

    if let (Some(_), Some(callsign)) = (&station.config, &station.callsign) {
        config.callsign = callsign
            .parse()
            .with_context(|| format!("invalid router callsign {callsign:?}"))?;
    }
    if !station.aliases.is_empty() || !station.fixed_aliases.is_empty() {
        config.aliases = station
            .aliases
            .iter()
            .map(|name| AliasRule::generic(name))
            .chain(station.fixed_aliases.iter().map(|name| AliasRule::fixed(name)))
            .collect();
    }
    if station.no_explicit {
        config.explicit_routing = false;
    }
    tracing::debug!(callsign = %config.callsign, aliases = config.aliases.len(), "router config");
    Ok(config)
}

fn read_packets(path: &Path) -> Result<Vec<String>> {
    let lines: Vec<String> = if path == Path::new("-") {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("read packets from stdin")?
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("read packets {}", path.display()))?
            .lines()
            .map(str::to_string)
            .collect()
    };
    Ok(lines
        .into_iter()
        .map(|line| line.trim_end_matches('\r').to_string())
        .filter(|line| !line.trim().is_empty())
        .collect())
}

fn print_route_report(report: &RouteReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(report).context("serialize json")?;
            println!("{json}");
        }
        OutputFormat::Pretty => println!("{}\n", format_route_pretty(report)),
    }
    Ok(())
}
