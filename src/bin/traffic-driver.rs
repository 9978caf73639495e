//! Traffic driver CLI - generates demo traffic against the orders API
//! so traces, logs, and metrics have something to show.

use clap::Parser;
use orders_core::driver::{self, DriverConfig};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(
    name = "traffic-driver",
    version,
    about = "Generate traffic against the orders API",
    after_help = "Use --loop to run until Ctrl+C; --interval sets seconds between cycles."
)]
struct Cli {
    /// Base URL of the API
    #[arg(default_value = "http://localhost:8000")]
    base_url: String,

    /// Number of cycles to run
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
        conflicts_with = "loop_forever"
    )]
    count: u64,

    /// Run indefinitely until Ctrl+C
    #[arg(short = 'l', long = "loop")]
    loop_forever: bool,

    /// Seconds between cycles
    #[arg(
        short = 'i',
        long,
        default_value_t = 12.0,
        value_name = "SEC",
        value_parser = parse_interval
    )]
    interval: f64,

    /// Print a line per cycle; default when running a single cycle
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn parse_interval(s: &str) -> Result<f64, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("invalid number of seconds: {s}"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err("interval must be a non-negative number of seconds".to_string());
    }
    Ok(secs)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let count = if cli.loop_forever {
        None
    } else {
        Some(cli.count)
    };
    let verbose = cli.verbose || (cli.count == 1 && !cli.loop_forever);

    let config = DriverConfig {
        base_url: cli.base_url.trim_end_matches('/').to_string(),
        count,
        interval: Duration::from_secs_f64(cli.interval),
        verbose,
    };

    // Stop flag raised on Ctrl+C; cycles in flight always finish
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!();
            eprintln!("Stopping after current cycle...");
            let _ = stop_tx.send(true);
        }
        // Keep the sender alive for the rest of the run
        std::future::pending::<()>().await
    });

    match driver::run(config, stop_rx).await {
        Ok(_cycles) => {
            println!();
            println!("Done. Check your telemetry backend for the traces and logs.");
        }
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Failed.");
            std::process::exit(1);
        }
    }
}
