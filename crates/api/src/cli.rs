//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pharmaclock_domain::{Config, PermissionState};

/// Geofenced time clock for pharmacy branches
#[derive(Debug, Parser)]
#[command(name = "pharmaclock", version, about)]
pub struct Cli {
    /// Config file (TOML or JSON); environment and probed files otherwise
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Latitude reported by the device
    #[arg(long, global = true, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude reported by the device
    #[arg(long, global = true, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Accuracy of the reported position, in meters
    #[arg(long, global = true)]
    pub accuracy: Option<f64>,

    /// Location permission state to start from
    #[arg(long, global = true, value_enum)]
    pub permission: Option<PermissionArg>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show clock state and time worked
    Status {
        /// Keep the working time updated every minute
        #[arg(long)]
        watch: bool,
    },
    /// Clock in at the assigned branch
    In {
        #[arg(long)]
        notes: Option<String>,
    },
    /// Clock out of the open entry
    Out,
    /// Start or end a break
    Break {
        #[arg(value_enum)]
        action: BreakAction,
    },
    /// Check the current position against the branch geofence
    Locate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BreakAction {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PermissionArg {
    Granted,
    Denied,
    Prompt,
}

impl From<PermissionArg> for PermissionState {
    fn from(arg: PermissionArg) -> Self {
        match arg {
            PermissionArg::Granted => Self::Granted,
            PermissionArg::Denied => Self::Denied,
            PermissionArg::Prompt => Self::Prompt,
        }
    }
}

impl Cli {
    /// Flags take precedence over the loaded location settings.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let (Some(latitude), Some(longitude)) = (self.lat, self.lon) {
            config.location.latitude = Some(latitude);
            config.location.longitude = Some(longitude);
        }
        if let Some(accuracy) = self.accuracy {
            config.location.accuracy_meters = Some(accuracy);
        }
        if let Some(permission) = self.permission {
            config.location.permission = permission.into();
        }
    }
}
