//! Configuration file for the tuning registry
//!
//! A TOML file picks a deployment snapshot and overrides individual values:
//!
//! ```toml
//! deployment = "field-tuned"
//!
//! [logging]
//! level = "debug"
//!
//! [overrides]
//! SMALL_BOX_THRESHOLD = 1700
//!
//! [profiles.grassProfile]
//! forward_kp = 0.001
//! forward_ki = 0.000000001
//! rot_kp = 0.08
//! forward_threshold = 0.2
//! rot_threshold = 0.75
//!
//! [geofence]
//! max_lat = 48.058
//! min_lat = 48.057
//! max_long = -123.119
//! min_long = -123.12
//! ```
//!
//! Every section is optional; an empty file yields the `default` deployment.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::drive_profile::DriveProfile;
use crate::error::{Error, Result};
use crate::geofence::Geofence;
use crate::param::{ParamKind, ParamValue};
use crate::registry::{Deployment, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// On-disk layout.
#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deployment: Option<String>,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    overrides: BTreeMap<String, toml::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    profiles: BTreeMap<String, DriveProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geofence: Option<Geofence>,
}

/// Everything a configuration file resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub registry: Registry,
    pub logging: LoggingConfig,
    pub geofence: Option<Geofence>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_deployment(Deployment::Default)
    }
}

impl Settings {
    /// Snapshot values with no overrides.
    pub fn for_deployment(deployment: Deployment) -> Self {
        Self {
            registry: Registry::for_deployment(deployment),
            logging: LoggingConfig::default(),
            geofence: None,
        }
    }

    /// Load configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// use goose_rs::config::Settings;
    ///
    /// let settings = Settings::load("goose.toml")?;
    /// println!("{}", settings.registry.small_box_threshold());
    /// # Ok::<(), goose_rs::error::Error>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_for(path, None)
    }

    /// Like [`Settings::load`], but `deployment` (when given) replaces the file's choice.
    /// The file's overrides still apply on top of it.
    pub fn load_for<P: AsRef<Path>>(path: P, deployment: Option<Deployment>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents, deployment)
    }

    /// One-line description for the startup log.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} deployment, {} changed values",
            self.registry.deployment(),
            self.registry.changed().len()
        );
        if let Some(fence) = &self.geofence {
            summary.push_str(&format!(", geofence {}", fence));
        }
        summary
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse(contents, None)
    }

    fn parse(contents: &str, deployment: Option<Deployment>) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;

        if let Some(fence) = &file.geofence {
            fence.validate()?;
        }

        let deployment = match (deployment, file.deployment.as_deref()) {
            (Some(d), _) => d,
            (None, Some(name)) => name.parse()?,
            (None, None) => Deployment::default(),
        };
        let mut registry = Registry::for_deployment(deployment);

        for (name, value) in file.overrides {
            let kind = Registry::kind_of(&name)?;
            let value = ParamValue::from_toml(&name, kind, value)?;
            registry.set(&name, value)?;
        }

        for (name, profile) in file.profiles {
            let kind = Registry::kind_of(&name)?;
            if kind != ParamKind::Profile {
                return Err(Error::TypeMismatch {
                    name,
                    expected: kind,
                    found: ParamKind::Profile,
                });
            }
            registry.set(&name, profile)?;
        }

        Ok(Self {
            registry,
            logging: file.logging,
            geofence: file.geofence,
        })
    }

    /// Serialize as a config file that loads back to `self`.
    ///
    /// Only values that differ from the deployment snapshot are written.
    pub fn to_toml(&self) -> Result<String> {
        let mut file = ConfigFile {
            deployment: Some(self.registry.deployment().to_string()),
            logging: self.logging.clone(),
            geofence: self.geofence,
            ..ConfigFile::default()
        };

        for (name, value) in self.registry.changed() {
            match value {
                ParamValue::Profile(profile) => {
                    file.profiles.insert(name.to_string(), profile);
                }
                scalar => {
                    file.overrides.insert(name.to_string(), scalar.to_toml()?);
                }
            }
        }

        Ok(toml::to_string_pretty(&file)?)
    }

    /// Save configuration to TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = self.to_toml()?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive_profile::Terrain;

    #[test]
    fn test_empty_file_is_default() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.logging.level, "info");
        assert!(settings.geofence.is_none());
    }

    #[test]
    fn test_deployment_and_overrides() {
        let settings = Settings::from_toml_str(
            r#"
            deployment = "field-tuned"

            [logging]
            level = "debug"

            [overrides]
            SMALL_BOX_THRESHOLD = 1700
            SIZE_SETPOINT = 60000
            FAST_UPDATE_INTERVAL = 2
            TAG = "yard"
            "#,
        )
        .unwrap();

        let registry = &settings.registry;
        assert_eq!(registry.deployment(), Deployment::FieldTuned);
        assert_eq!(registry.small_box_threshold(), 1700);
        assert_eq!(registry.size_setpoint(), 60000.0);
        assert_eq!(registry.fast_update_interval(), 2);
        assert_eq!(registry.tag(), "yard");
        // Untouched values come from the snapshot.
        assert_eq!(registry.idle_threshold(), 200);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_profile_section_replaces_bundle() {
        let settings = Settings::from_toml_str(
            r#"
            [profiles.carpetProfile]
            forward_kp = 0.0002
            forward_ki = 0.0
            rot_kp = 0.01
            forward_threshold = 0.25
            rot_threshold = 0.15
            "#,
        )
        .unwrap();

        assert_eq!(
            settings.registry.drive_profile(Terrain::Carpet),
            DriveProfile::new(0.0002, 0.0, 0.01, 0.25, 0.15)
        );
    }

    #[test]
    fn test_cli_deployment_wins() {
        let file = r#"
            deployment = "field-tuned"
            [overrides]
            IMAGE_WIDTH = 360
        "#;
        let settings = Settings::parse(file, Some(Deployment::Default)).unwrap();
        assert_eq!(settings.registry.deployment(), Deployment::Default);
        assert_eq!(settings.registry.small_box_threshold(), 2100);
        assert_eq!(settings.registry.image_width(), 360);
    }

    #[test]
    fn test_unknown_override_is_rejected() {
        let err = Settings::from_toml_str("[overrides]\nGOOSE_WEIGHT = 4\n");
        assert!(matches!(err, Err(Error::UnknownParameter(name)) if name == "GOOSE_WEIGHT"));

        let err = Settings::from_toml_str("[profiles.gravelProfile]\nforward_kp = 0.1\nforward_ki = 0.0\nrot_kp = 0.1\nforward_threshold = 0.1\nrot_threshold = 0.1\n");
        assert!(matches!(err, Err(Error::UnknownParameter(_))));
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let err = Settings::from_toml_str("[overrides]\nIDLE_THRESHOLD = \"200\"\n");
        assert!(matches!(err, Err(Error::TypeMismatch { .. })));

        let err = Settings::from_toml_str("[overrides]\nMAX_BUFFER_FRAMES = 7.5\n");
        assert!(matches!(err, Err(Error::TypeMismatch { .. })));

        let err = Settings::from_toml_str("[profiles.TAG]\nforward_kp = 0.1\nforward_ki = 0.0\nrot_kp = 0.1\nforward_threshold = 0.1\nrot_threshold = 0.1\n");
        assert!(matches!(err, Err(Error::TypeMismatch { .. })));

        let err = Settings::from_toml_str("deployment = \"indoor\"\n");
        assert!(matches!(err, Err(Error::UnknownDeployment(_))));

        assert!(matches!(
            Settings::from_toml_str("deployment = "),
            Err(Error::TomlDe(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let mut settings = Settings::for_deployment(Deployment::FieldTuned);
        settings.registry.set("CENTER_IN_PIXELS", 320.5).unwrap();
        settings.registry.set("ROT_THRESHOLD", 500_000_000_i64).unwrap();
        settings
            .registry
            .set("grassProfile", DriveProfile::new(0.002, 0.000000001, 0.09, 0.3, 0.6))
            .unwrap();
        settings.geofence = Some(Geofence {
            max_lat: 48.058,
            min_lat: 48.057,
            max_long: -123.119,
            min_long: -123.12,
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("goose.toml");
        settings.save(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        println!("{}", contents);
        assert!(contents.contains("deployment = \"field-tuned\""));
        assert!(contents.contains("[profiles.grassProfile]"));
        assert!(!contents.contains("SMALL_BOX_THRESHOLD"));

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_bad_geofence_is_rejected() {
        let unset = "[geofence]\nmax_lat = 48.058\nmin_lat = 48.057\nmax_long = 0.0\nmin_long = -123.12\n";
        assert!(matches!(
            Settings::from_toml_str(unset),
            Err(Error::InvalidGeofence(_))
        ));

        let inverted = "[geofence]\nmax_lat = 48.057\nmin_lat = 48.058\nmax_long = -123.119\nmin_long = -123.12\n";
        assert!(matches!(
            Settings::from_toml_str(inverted),
            Err(Error::InvalidGeofence(_))
        ));

        let good = "[geofence]\nmax_lat = 48.058\nmin_lat = 48.057\nmax_long = -123.119\nmin_long = -123.12\n";
        let settings = Settings::from_toml_str(good).unwrap();
        assert!(settings.geofence.is_some());
    }

    #[test]
    fn test_profile_thresholds_written_short() {
        let mut settings = Settings::default();
        settings
            .registry
            .set("carpetProfile", DriveProfile::new(0.0002, 0.0, 0.01, 0.2, 0.15))
            .unwrap();

        let contents = settings.to_toml().unwrap();
        println!("{}", contents);
        assert!(contents.contains("forward_threshold = 0.2\n"));
        assert!(contents.contains("rot_threshold = 0.15\n"));
        assert!(!contents.contains("0.2000000"));

        assert_eq!(Settings::from_toml_str(&contents).unwrap(), settings);
    }

    #[test]
    fn test_non_finite_override_is_rejected() {
        for raw in ["nan", "inf", "-inf"] {
            let contents = format!("[overrides]\nSIZE_SETPOINT = {}\n", raw);
            assert!(matches!(
                Settings::from_toml_str(&contents),
                Err(Error::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_summary() {
        let mut settings = Settings::for_deployment(Deployment::FieldTuned);
        assert_eq!(settings.summary(), "field-tuned deployment, 0 changed values");

        settings.registry.set("IDLE_THRESHOLD", 150).unwrap();
        assert_eq!(settings.summary(), "field-tuned deployment, 1 changed values");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("absent.toml"));
        assert!(matches!(err, Err(Error::Io(_))));
    }
}
