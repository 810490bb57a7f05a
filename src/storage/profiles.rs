//! Saved health-profile storage

use anyhow::Result;
use std::path::Path;

use crate::profile::UserProfile;

/// File name of the saved profile inside the data directory.
pub const PROFILE_FILE: &str = "profile.json";

/// Load a saved profile from file
pub fn load_profile(path: &Path) -> Result<UserProfile> {
    let content = std::fs::read_to_string(path)?;
    let profile: UserProfile = serde_json::from_str(&content)?;
    Ok(profile)
}

/// Save a profile to file
pub fn save_profile(profile: &UserProfile, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(profile)?;
    std::fs::write(path, content)?;
    Ok(())
}
