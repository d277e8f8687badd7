//! Process-table checks for the Steam client and Wine
//!
//! Detection is a point-in-time `pgrep` scan; nothing guards the window
//! between a check and a subsequent launch.

use std::path::Path;
use std::process::Command;

/// Pattern the Steam client shows up as in the wine loader's command line
pub const STEAM_PROCESS: &str = "steam.exe";

/// Helper processes Steam-under-Wine spawns alongside the client
const STEAM_HELPERS: [&str; 2] = ["steamwebhelper.exe", "steamservice.exe"];

/// Check whether a process matching the pattern is currently running.
/// `pgrep -f` matches the full command line, which is where the wine
/// loader keeps the .exe path.
pub fn is_running(pattern: &str) -> bool {
    Command::new("pgrep")
        .args(["-f", pattern])
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Kill every process matching the pattern. Nothing matching is the
/// expected steady state, so the result is ignored.
pub fn kill_all(pattern: &str) {
    let _ = Command::new("pkill").args(["-f", pattern]).status();
}

/// Stop the Steam client, its helpers, and the wineserver backing the
/// prefix. Every step is best-effort.
pub fn stop_steam_and_server(wineserver: Option<&Path>, prefix_root: &Path) {
    kill_all(STEAM_PROCESS);
    for helper in STEAM_HELPERS {
        kill_all(helper);
    }

    if let Some(wineserver) = wineserver {
        let _ = Command::new(wineserver)
            .arg("-k")
            .env("WINEPREFIX", prefix_root)
            .status();
    }
}
