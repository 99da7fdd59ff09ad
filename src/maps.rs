//! Maps deep links
//!
//! Each game carries one route URL per platform; the launcher hands the
//! selected URL to whatever opens URLs on this machine.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::{Command, Stdio};
use std::str::FromStr;
use tracing::debug;

/// Platform whose maps application handles route links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    #[default]
    Android,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Ios => write!(f, "ios"),
            Platform::Android => write!(f, "android"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ios" | "apple" => Ok(Platform::Ios),
            "android" | "google" => Ok(Platform::Android),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// Opens URLs in the platform's maps application
pub trait MapsLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Launcher that runs an external opener command (`xdg-open`, `open`, ...)
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MapsLauncher for CommandLauncher {
    fn open(&self, url: &str) -> Result<()> {
        debug!(program = %self.program, %url, "opening maps link");
        // The opener keeps running on its own; only a failed launch is an error
        Command::new(&self.program)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()?;
        Ok(())
    }
}
