use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use goose_rs::config::Settings;
use goose_rs::fetch::collect_fixes;
use goose_rs::{Error, Geofence, Position, Result};
use serde::Serialize;

/// Build a geofence from a recorded walk around the yard.
///
/// Record NMEA output (e.g. `cat /dev/serial0 > corners.nmea`) while standing
/// at each corner, then feed it here. The printed section goes into the
/// config file.
#[derive(Parser, Debug)]
#[command(name = "survey", version, about, long_about = None)]
struct Args {
    /// NMEA log to read; stdin when omitted
    input: Option<PathBuf>,

    /// Configuration file providing FAST_UPDATE_INTERVAL
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between samples, overriding FAST_UPDATE_INTERVAL
    #[arg(short, long)]
    interval: Option<u64>,
}

#[derive(Serialize)]
struct FenceSection {
    geofence: Geofence,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.logging.level.as_str()),
    )
    .init();

    if let Some(path) = &args.config {
        log::info!("Loaded {} ({})", path.display(), settings.summary());
    }

    let interval = match args.interval {
        Some(secs) => secs,
        None => sample_interval(settings.registry.fast_update_interval())?,
    };

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║     Geofence Survey                                  ║");
    println!("╚══════════════════════════════════════════════════════╝\n");
    println!("Sampling one fix every {} s\n", interval);

    let fixes = match &args.input {
        Some(path) => {
            log::info!("Reading {}", path.display());
            collect_fixes(BufReader::new(File::open(path)?), interval)?
        }
        None => collect_fixes(io::stdin().lock(), interval)?,
    };

    println!("{:^8} | {:^28}", "Sample", "Position");
    println!("{:-<8}-+-{:-<28}", "", "");
    for (i, fix) in fixes.iter().enumerate() {
        println!("{:^8} | {:^28}", i + 1, fix.to_string());
    }

    let fence = fence_from(&fixes)?;

    println!("\nFence: {}", fence);
    println!("  {:.1} m x {:.1} m\n", fence.width_m(), fence.height_m());
    println!("Add this to the config file:\n");
    print!("{}", toml::to_string_pretty(&FenceSection { geofence: fence })?);

    Ok(())
}

/// FAST_UPDATE_INTERVAL as a sample spacing; negative values are rejected.
fn sample_interval(configured: i64) -> Result<u64> {
    u64::try_from(configured).map_err(|_| Error::InvalidValue {
        name: "FAST_UPDATE_INTERVAL".to_string(),
        raw: configured.to_string(),
    })
}

/// Fails with `EmptySurvey` when there are no fixes or they span no area.
fn fence_from(fixes: &[Position]) -> Result<Geofence> {
    Geofence::from_fixes(fixes).ok_or(Error::EmptySurvey)
}
