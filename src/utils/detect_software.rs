use anyhow::bail;
use log::debug;
use log::info;
use std::process::Command;

/// Check that a scheduler utility can be spawned at all. Its exit status is not
/// inspected, since many of these tools exit non-zero without arguments
pub fn check_utility(utility: &str) -> anyhow::Result<()> {
    debug!("Checking for {}", utility);
    if let Ok(_output) = Command::new(utility).arg("-help").output() {
        info!("Found {}", utility);
        Ok(())
    } else {
        bail!("{} is either not installed or not in PATH", utility)
    }
}
