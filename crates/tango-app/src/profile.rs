use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tango_config::Config;

/// `<config dir>/tango/profiles`
pub fn profiles_dir() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir().context("No config directory on this platform")?;
    Ok(config_dir.join("tango").join("profiles"))
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Create the profiles folder and a main profile from the defaults if missing
pub fn init_user_config(profiles_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(profiles_dir)?;

    let main_profile = profiles_dir.join("main.json");

    if !main_profile.exists() {
        let profile = Profile {
            name: "main".into(),
            value: Config::new(),
        };
        fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created main profile at {}", main_profile.display());
    }

    Ok(())
}

/// Load a user profile by name, defaulting to main if name not found
pub fn load_user_profile(profiles_dir: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = profiles_dir.join(format!("{name}.json"));

    if profile_file.exists() {
        read_profile(&profile_file)
    } else {
        tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
        let main_file = profiles_dir.join("main.json");
        if main_file.exists() {
            read_profile(&main_file)
        } else {
            Ok(Config::new())
        }
    }
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Invalid profile {}", path.display()))?;
    Ok(profile.value)
}
