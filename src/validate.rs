//! Read-only prerequisite checks
//!
//! Fail-fast in a fixed order: the first missing item aborts with a message
//! naming its path, before anything gets mutated.

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::config::StrapConfig;
use crate::dxvk::DXVK_DLLS;
use crate::paths::BIN_WINE;
use crate::prefix::Prefix;
use crate::scan;

/// Everything a launch needs, resolved and known to exist
#[derive(Debug)]
pub struct Checked {
    pub wine: PathBuf,
    pub prefix: Prefix,
    pub game_dir: PathBuf,
    pub game_exe: PathBuf,
}

pub fn wine_binary() -> Result<PathBuf, Box<dyn Error>> {
    BIN_WINE
        .clone()
        .ok_or_else(|| "wine not found. Install Wine first.".into())
}

fn require_dir(path: &Path, what: &str) -> Result<(), Box<dyn Error>> {
    if !path.is_dir() {
        return Err(format!("{} not found at {}", what, path.display()).into());
    }
    Ok(())
}

fn require_file(path: &Path, what: &str) -> Result<(), Box<dyn Error>> {
    if !path.is_file() {
        return Err(format!("{} not found at {}", what, path.display()).into());
    }
    Ok(())
}

/// Full preflight for setup and game launches. Check order is fixed: wine,
/// prefix, Steam dir, game dir, DXVK bin dir, the three DLLs, the game
/// executable.
pub fn preflight(cfg: &StrapConfig) -> Result<Checked, Box<dyn Error>> {
    let wine = wine_binary()?;
    preflight_with(cfg, wine)
}

pub fn preflight_with(cfg: &StrapConfig, wine: PathBuf) -> Result<Checked, Box<dyn Error>> {
    let prefix = Prefix::new(&cfg.prefix);
    require_dir(prefix.root(), "Wine prefix")?;
    require_dir(&prefix.steam_dir(), "Steam install")?;

    let game_dir = prefix.game_dir(&cfg.game);
    require_dir(&game_dir, "Game folder")?;

    let dxvk_bin = cfg.dxvk_bin();
    require_dir(&dxvk_bin, "DXVK bin directory")?;
    for dll in DXVK_DLLS {
        require_file(&dxvk_bin.join(dll), "DXVK binary")?;
    }

    let game_exe = scan::detect_exe(&game_dir)
        .ok_or_else(|| format!("No game executable found inside {}", game_dir.display()))?;

    Ok(Checked {
        wine,
        prefix,
        game_dir,
        game_exe,
    })
}

/// Reduced preflight for the Steam launch: the DXVK side is irrelevant
/// because the client runs without overrides.
pub fn preflight_host(cfg: &StrapConfig) -> Result<(PathBuf, Prefix), Box<dyn Error>> {
    let wine = wine_binary()?;
    let prefix = Prefix::new(&cfg.prefix);
    require_dir(prefix.root(), "Wine prefix")?;
    require_dir(&prefix.steam_dir(), "Steam install")?;
    require_file(&prefix.steam_exe(), "steam.exe")?;
    Ok((wine, prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("winestrap-{}-{:x}", tag, fastrand::u64(..)));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cfg_in(root: &Path) -> StrapConfig {
        StrapConfig {
            prefix: root.join("wined"),
            dxvk_dir: root.join("dxvk-release"),
            dxvk_log_path: root.join("dxvk-logs"),
            dxvk_log_level: "info".to_string(),
            game: "REPO".to_string(),
        }
    }

    #[test]
    fn test_preflight_fails_fast_in_order() {
        let root = temp_dir("preflight");
        let cfg = cfg_in(&root);
        let wine = root.join("wine");
        fs::write(&wine, "").unwrap();

        // Nothing exists yet: the prefix is reported first
        let err = preflight_with(&cfg, wine.clone()).unwrap_err().to_string();
        assert!(err.starts_with("Wine prefix not found"), "{}", err);

        let prefix = Prefix::new(&cfg.prefix);
        fs::create_dir_all(prefix.root()).unwrap();
        let err = preflight_with(&cfg, wine.clone()).unwrap_err().to_string();
        assert!(err.starts_with("Steam install not found"), "{}", err);

        fs::create_dir_all(prefix.steam_dir()).unwrap();
        let err = preflight_with(&cfg, wine.clone()).unwrap_err().to_string();
        assert!(err.starts_with("Game folder not found"), "{}", err);

        fs::create_dir_all(prefix.game_dir("REPO")).unwrap();
        let err = preflight_with(&cfg, wine.clone()).unwrap_err().to_string();
        assert!(err.starts_with("DXVK bin directory not found"), "{}", err);

        fs::create_dir_all(cfg.dxvk_bin()).unwrap();
        let err = preflight_with(&cfg, wine.clone()).unwrap_err().to_string();
        assert!(err.contains("dxgi.dll"), "{}", err);

        for dll in DXVK_DLLS {
            fs::write(cfg.dxvk_bin().join(dll), "dxvk").unwrap();
        }
        let err = preflight_with(&cfg, wine.clone()).unwrap_err().to_string();
        assert!(err.starts_with("No game executable"), "{}", err);

        fs::write(prefix.game_dir("REPO").join("REPO.exe"), "game").unwrap();
        let checked = preflight_with(&cfg, wine).unwrap();
        assert_eq!(checked.game_exe, prefix.game_dir("REPO").join("REPO.exe"));

        fs::remove_dir_all(&root).unwrap();
    }
}
