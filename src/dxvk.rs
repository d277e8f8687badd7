//! DXVK override binaries
//!
//! Validation and per-game deployment of the three translation DLLs. The
//! DLLs are always copied into the game's own folders, never installed
//! globally into the prefix.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The override binary set: the DXGI factory plus the two D3D device DLLs
pub const DXVK_DLLS: [&str; 3] = ["dxgi.dll", "d3d11.dll", "d3d10core.dll"];

/// WINEDLLOVERRIDES value that makes Wine prefer the copied DLLs
pub const DLL_OVERRIDES: &str = "dxgi,d3d11,d3d10core=n,b";

/// Check that all three DLLs exist in the DXVK bin directory
pub fn validate_dxvk_bin(dxvk_bin: &Path) -> Result<(), Box<dyn Error>> {
    for dll in DXVK_DLLS {
        let path = dxvk_bin.join(dll);
        if !path.is_file() {
            return Err(format!(
                "Missing {} in {}. Build DXVK first.",
                dll,
                dxvk_bin.display()
            )
            .into());
        }
    }
    Ok(())
}

/// Directories inside the game tree that need the override DLLs: the game
/// root, the folder the executable runs from, and any Unreal Binaries/Win64
/// folder the engine may relaunch the real binary from.
pub fn target_dirs(game_dir: &Path, exe: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = vec![game_dir.to_path_buf()];

    if let Some(exe) = exe
        && let Some(parent) = exe.parent()
        && parent != game_dir
        && !dirs.contains(&parent.to_path_buf())
    {
        dirs.push(parent.to_path_buf());
    }

    for entry in WalkDir::new(game_dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if entry.file_type().is_dir()
            && path.file_name().is_some_and(|n| n == "Win64")
            && path
                .parent()
                .and_then(|p| p.file_name())
                .is_some_and(|n| n == "Binaries")
            && !dirs.contains(&path.to_path_buf())
        {
            dirs.push(path.to_path_buf());
        }
    }

    dirs
}

/// Copy the override DLLs into every target directory, overwriting any
/// stale copies so the game never runs against an older DXVK build.
pub fn deploy(
    dxvk_bin: &Path,
    game_dir: &Path,
    exe: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    validate_dxvk_bin(dxvk_bin)?;

    for dir in target_dirs(game_dir, exe) {
        fs::create_dir_all(&dir)?;
        for dll in DXVK_DLLS {
            fs::copy(dxvk_bin.join(dll), dir.join(dll))?;
        }
        println!(
            "[winestrap] Copied {} -> {}",
            DXVK_DLLS.join(", "),
            dir.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("winestrap-{}-{:x}", tag, fastrand::u64(..)));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn fake_dxvk_bin(root: &Path) -> PathBuf {
        let bin = root.join("bin");
        fs::create_dir_all(&bin).unwrap();
        for dll in DXVK_DLLS {
            fs::write(bin.join(dll), format!("dxvk build of {}", dll)).unwrap();
        }
        bin
    }

    #[test]
    fn test_validate_names_missing_dll() {
        let root = temp_dir("validate");
        let bin = fake_dxvk_bin(&root);
        assert!(validate_dxvk_bin(&bin).is_ok());

        fs::remove_file(bin.join("d3d11.dll")).unwrap();
        let err = validate_dxvk_bin(&bin).unwrap_err().to_string();
        assert!(err.contains("d3d11.dll"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_deploy_copies_and_overwrites() {
        let root = temp_dir("deploy");
        let bin = fake_dxvk_bin(&root);
        let game = root.join("game");
        fs::create_dir_all(&game).unwrap();

        // Pre-existing stale copy must be overwritten
        fs::write(game.join("dxgi.dll"), "stale").unwrap();

        deploy(&bin, &game, None).unwrap();

        for dll in DXVK_DLLS {
            let deployed = fs::read(game.join(dll)).unwrap();
            let source = fs::read(bin.join(dll)).unwrap();
            assert_eq!(deployed, source, "{} differs from source", dll);
        }

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_target_dirs_include_exe_dir_and_win64() {
        let root = temp_dir("targets");
        let game = root.join("game");
        let exe_dir = game.join("Client");
        let win64 = game.join("Engine/Binaries/Win64");
        fs::create_dir_all(&exe_dir).unwrap();
        fs::create_dir_all(&win64).unwrap();

        let exe = exe_dir.join("Client.exe");
        let dirs = target_dirs(&game, Some(&exe));

        assert_eq!(dirs[0], game);
        assert!(dirs.contains(&exe_dir));
        assert!(dirs.contains(&win64));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_target_dirs_no_duplicate_for_root_exe() {
        let root = temp_dir("targets-root");
        let game = root.join("game");
        fs::create_dir_all(&game).unwrap();

        let exe = game.join("Game.exe");
        let dirs = target_dirs(&game, Some(&exe));
        assert_eq!(dirs, vec![game]);

        fs::remove_dir_all(&root).unwrap();
    }
}
