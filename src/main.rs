use std::path::PathBuf;

use clap::{Parser, Subcommand};
use goose_rs::config::Settings;
use goose_rs::{Deployment, Error, ParamValue, Registry, Result, Terrain};

/// Inspect the tuning registry the robot starts with.
#[derive(Parser, Debug)]
#[command(name = "goose-rs", version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML). Without one, the snapshot values are used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deployment snapshot ("default" or "field-tuned"), replaces the file's
    #[arg(short, long)]
    deployment: Option<Deployment>,

    /// Override a value after loading, e.g. --set SMALL_BOX_THRESHOLD=1700
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every parameter with its kind and value
    Show,
    /// Print a single parameter
    Get { name: String },
    /// Print the effective configuration as TOML
    Dump,
    /// Print the drive profile for a terrain (grass or carpet)
    Profile { terrain: Terrain },
}

fn apply_override(registry: &mut Registry, assignment: &str) -> Result<()> {
    let (name, raw) = assignment
        .split_once('=')
        .ok_or_else(|| Error::InvalidValue {
            name: "--set".to_string(),
            raw: assignment.to_string(),
        })?;
    let name = name.trim();

    let kind = Registry::kind_of(name)?;
    let value = ParamValue::parse_as(name, kind, raw)?;
    registry.set(name, value)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_for(path, args.deployment)?,
        None => Settings::for_deployment(args.deployment.unwrap_or_default()),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.logging.level.as_str()),
    )
    .init();

    if let Some(path) = &args.config {
        log::info!("Loaded {} ({})", path.display(), settings.summary());
    }
    log::info!("Deployment: {}", settings.registry.deployment());

    for assignment in &args.set {
        apply_override(&mut settings.registry, assignment)?;
    }

    match args.command.unwrap_or(Command::Show) {
        Command::Show => {
            println!("Deployment: {}\n", settings.registry.deployment());
            println!("{:<22} | {:<8} | Value", "Name", "Kind");
            println!("{:-<22}-+-{:-<8}-+-{:-<30}", "", "", "");
            for (name, value) in settings.registry.iter() {
                println!("{:<22} | {:<8} | {}", name, value.kind().to_string(), value);
            }
            if let Some(fence) = settings.geofence {
                println!("\nGeofence: {}", fence);
                println!(
                    "  {:.1} m x {:.1} m",
                    fence.width_m(),
                    fence.height_m()
                );
            }
        }
        Command::Get { name } => {
            println!("{}", settings.registry.get(&name)?);
        }
        Command::Dump => {
            print!("{}", settings.to_toml()?);
        }
        Command::Profile { terrain } => {
            let profile = settings.registry.drive_profile(terrain);
            println!("{} ({})", terrain, terrain.param_name());
            println!("  forward kp:        {}", profile.forward_kp());
            println!("  forward ki:        {}", profile.forward_ki());
            println!("  rotation kp:       {}", profile.rot_kp());
            println!("  forward threshold: {}", profile.forward_threshold());
            println!("  rotation threshold: {}", profile.rot_threshold());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_override() {
        let mut registry = Registry::new();

        apply_override(&mut registry, "SMALL_BOX_THRESHOLD=1700").unwrap();
        assert_eq!(registry.small_box_threshold(), 1700);

        apply_override(&mut registry, "carpetProfile=0.0002,0,0.01,0.25,0.15").unwrap();
        assert_eq!(
            registry.drive_profile(Terrain::Carpet).as_tuple(),
            (0.0002, 0.0, 0.01, 0.25, 0.15)
        );

        apply_override(&mut registry, "TAG=a=b").unwrap();
        assert_eq!(registry.tag(), "a=b");
    }

    #[test]
    fn test_apply_override_errors() {
        let mut registry = Registry::new();

        assert!(matches!(
            apply_override(&mut registry, "SMALL_BOX_THRESHOLD"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            apply_override(&mut registry, "GOOSE_WEIGHT=4"),
            Err(Error::UnknownParameter(_))
        ));
        assert!(matches!(
            apply_override(&mut registry, "IDLE_THRESHOLD=lots"),
            Err(Error::InvalidValue { .. })
        ));
        assert_eq!(registry, Registry::new());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "goose-rs",
            "-d",
            "field-tuned",
            "--set",
            "IMAGE_WIDTH=360",
            "--set",
            "TAG=yard",
            "profile",
            "grass",
        ])
        .unwrap();

        assert_eq!(args.deployment, Some(Deployment::FieldTuned));
        assert_eq!(args.set.len(), 2);
        assert!(matches!(
            args.command,
            Some(Command::Profile {
                terrain: Terrain::Grass
            })
        ));
    }
}
