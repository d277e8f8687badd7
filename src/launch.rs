//! Launch gate
//!
//! Builds the host and game commands with the right environment and working
//! directory, refuses a game launch while Steam is not running, and hands
//! the orchestrator process off to Wine via exec.

use std::error::Error;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::Command;

use crate::config::StrapConfig;
use crate::dxvk::{self, DLL_OVERRIDES};
use crate::prefix::Prefix;
use crate::process;
use crate::validate;

/// Arguments Steam needs to run under Wine without CEF sandboxing
pub const STEAM_ARGS: [&str; 2] = ["-no-cef-sandbox", "-vgui"];

/// Env vars that switch DXVK on; the Steam client must never see them
pub const OVERRIDE_ENV_VARS: [&str; 3] =
    ["WINEDLLOVERRIDES", "DXVK_LOG_PATH", "DXVK_LOG_LEVEL"];

/// Steam launches against the prefix's unmodified runtime DLLs: the
/// override toggles are explicitly unset even if the caller exported them.
pub fn steam_command(wine: &Path, prefix: &Prefix) -> Command {
    let mut cmd = Command::new(wine);
    cmd.arg("steam.exe");
    cmd.args(STEAM_ARGS);
    cmd.current_dir(prefix.steam_dir());
    cmd.env("WINEPREFIX", prefix.root());
    for var in OVERRIDE_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// The game launches with per-process override toggles, from the directory
/// its executable lives in so Wine resolves the copied DLLs first.
pub fn game_command(cfg: &StrapConfig, wine: &Path, prefix: &Prefix, exe: &Path) -> Command {
    let mut cmd = Command::new(wine);
    cmd.arg(exe.file_name().unwrap_or(exe.as_os_str()));
    if let Some(exe_dir) = exe.parent() {
        cmd.current_dir(exe_dir);
    }
    cmd.env("WINEPREFIX", prefix.root());
    cmd.env("WINEDLLOVERRIDES", DLL_OVERRIDES);
    cmd.env("DXVK_LOG_PATH", &cfg.dxvk_log_path);
    cmd.env("DXVK_LOG_LEVEL", &cfg.dxvk_log_level);
    cmd
}

/// Replace this process with the launched application. Only returns if the
/// exec itself failed; from here on the launched app owns the process.
pub fn hand_off(mut cmd: Command) -> Box<dyn Error> {
    let err = cmd.exec();
    format!("Failed to exec {:?}: {}", cmd.get_program(), err).into()
}

pub fn launch_steam(cfg: &StrapConfig) -> Result<(), Box<dyn Error>> {
    let (wine, prefix) = validate::preflight_host(cfg)?;
    println!(
        "[winestrap] Launching Steam from {}",
        prefix.steam_dir().display()
    );
    Err(hand_off(steam_command(&wine, &prefix)))
}

pub fn launch_game(cfg: &StrapConfig) -> Result<(), Box<dyn Error>> {
    let checked = validate::preflight(cfg)?;

    // Point-in-time scan; a Steam crash between this check and the exec is
    // not guarded against.
    if !process::is_running(process::STEAM_PROCESS) {
        return Err("Steam is not running inside the prefix. Start it first with \
                    `winestrap steam`, log in, then run `winestrap game` again."
            .into());
    }

    std::fs::create_dir_all(&cfg.dxvk_log_path)?;
    dxvk::deploy(&cfg.dxvk_bin(), &checked.game_dir, Some(&checked.game_exe))?;

    println!(
        "[winestrap] Launching {} with DXVK overrides",
        checked.game_exe.display()
    );
    Err(hand_off(game_command(
        cfg,
        &checked.wine,
        &checked.prefix,
        &checked.game_exe,
    )))
}
