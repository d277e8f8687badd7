//! Prefix reset and first-time setup
//!
//! The reset sequence is order-significant: stop everything still holding
//! the prefix, then drop the global override flags, then put any backed-up
//! system DLLs back. All three steps are safe to repeat.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::StrapConfig;
use crate::dxvk;
use crate::launch;
use crate::paths::{BIN_WINESERVER, PATH_HOME};
use crate::prefix::Prefix;
use crate::process;
use crate::validate;

/// Return the prefix to a clean state regardless of what a prior run left
/// behind. Every step is best-effort; the guarantee is only that no global
/// override configuration survives.
pub fn reset(prefix: &Prefix, wine: Option<&Path>, wineserver: Option<&Path>) {
    println!("[winestrap] Stopping Steam and wineserver...");
    process::stop_steam_and_server(wineserver, prefix.root());

    if let Some(wine) = wine {
        println!("[winestrap] Clearing global DLL overrides...");
        prefix.clear_override_flags(wine);
    }

    match prefix.restore_backup_if_present() {
        Ok(0) => {}
        Ok(n) => println!("[winestrap] Restored {} original DLL(s) into system32", n),
        Err(e) => eprintln!("[winestrap] Warning: backup restore failed: {}", e),
    }
}

/// Reset + override deployment. With `start_steam` the process hands off to
/// the Steam client afterwards and never returns.
pub fn run_setup(cfg: &StrapConfig, start_steam: bool) -> Result<(), Box<dyn Error>> {
    let checked = validate::preflight(cfg)?;

    reset(
        &checked.prefix,
        Some(checked.wine.as_path()),
        BIN_WINESERVER.as_deref(),
    );

    dxvk::deploy(&cfg.dxvk_bin(), &checked.game_dir, Some(&checked.game_exe))?;

    if start_steam {
        println!("[winestrap] Handing off to Steam...");
        return Err(launch::hand_off(launch::steam_command(
            &checked.wine,
            &checked.prefix,
        )));
    }

    println!("[winestrap] Setup complete. Start Steam with `winestrap steam`.");
    Ok(())
}

/// Create the prefix directory and let wineboot populate it
pub fn init_prefix(cfg: &StrapConfig) -> Result<(), Box<dyn Error>> {
    let wine = validate::wine_binary()?;
    std::fs::create_dir_all(&cfg.prefix)?;

    println!("[winestrap] Initializing prefix {}", cfg.prefix.display());
    let status = Command::new(&wine)
        .arg("wineboot")
        .env("WINEPREFIX", &cfg.prefix)
        .status()?;
    if !status.success() {
        return Err(format!("wineboot exited with {}", status).into());
    }
    Ok(())
}

/// Run the Steam installer inside the prefix and wait for it
pub fn install_steam(cfg: &StrapConfig, installer: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let wine = validate::wine_binary()?;
    let installer =
        installer.unwrap_or_else(|| PATH_HOME.join("Downloads/SteamSetup.exe"));
    if !installer.is_file() {
        return Err(format!("Steam installer not found at {}", installer.display()).into());
    }

    println!("[winestrap] Running Steam installer {}", installer.display());
    let status = Command::new(&wine)
        .arg(&installer)
        .env("WINEPREFIX", &cfg.prefix)
        .status()?;
    if !status.success() {
        return Err(format!("Steam installer exited with {}", status).into());
    }
    println!("[winestrap] Steam installed into {}", cfg.prefix.display());
    Ok(())
}
