//! Profile identity and reset commands

use anyhow::{bail, Result};

use marquee::{ProgressEngine, AVATARS};

/// Change username and/or avatar, keeping whichever is not given.
pub fn rename_command(
    engine: &ProgressEngine,
    username: Option<String>,
    avatar: Option<String>,
) -> Result<()> {
    if username.is_none() && avatar.is_none() {
        bail!(
            "Nothing to change. Pass a username and/or --avatar (one of {})",
            AVATARS.join(" ")
        );
    }

    let current = engine.profile()?;
    let username = username.unwrap_or(current.username);
    let avatar = avatar.unwrap_or(current.avatar);

    let profile = engine.set_identity(&username, &avatar)?;
    println!("Profile: {} {}", profile.avatar, profile.username);
    Ok(())
}

/// Delete all stored progress
pub fn reset_command(engine: &ProgressEngine, yes: bool) -> Result<()> {
    if !yes {
        bail!("This deletes all progress. Re-run with --yes to confirm.");
    }
    engine.reset()?;
    println!("Progress reset.");
    Ok(())
}
