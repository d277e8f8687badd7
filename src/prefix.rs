//! The Wine prefix as an explicit external resource
//!
//! Everything the orchestrator touches inside the prefix goes through this
//! narrow interface: derived directories, the registry DLL-override flags,
//! and the conventional backup of original system DLLs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::dxvk::DXVK_DLLS;

/// Registry key whose values force override DLLs onto every app in the
/// prefix. The orchestrator's job is to keep these values absent.
pub const OVERRIDE_KEY: &str = r"HKEY_CURRENT_USER\Software\Wine\DllOverrides";

/// Conventional backup location: `<prefix>/dxvk-backup/system32/<dll>`
pub const BACKUP_DIR: &str = "dxvk-backup";

#[derive(Debug, Clone)]
pub struct Prefix {
    root: PathBuf,
}

impl Prefix {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Prefix { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn drive_c(&self) -> PathBuf {
        self.root.join("drive_c")
    }

    pub fn steam_dir(&self) -> PathBuf {
        self.drive_c().join("Program Files (x86)/Steam")
    }

    pub fn steam_exe(&self) -> PathBuf {
        self.steam_dir().join("steam.exe")
    }

    pub fn game_dir(&self, name: &str) -> PathBuf {
        self.steam_dir().join("steamapps/common").join(name)
    }

    pub fn system32(&self) -> PathBuf {
        self.drive_c().join("windows/system32")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR).join("system32")
    }

    /// Remove one DllOverrides value from the prefix registry. Best-effort:
    /// a missing key/value is the expected steady state, so failures are
    /// swallowed.
    pub fn clear_override_flag(&self, wine: &Path, dll: &str) {
        let value = dll.trim_end_matches(".dll");
        let _ = Command::new(wine)
            .args(["reg", "delete", OVERRIDE_KEY, "/v", value, "/f"])
            .env("WINEPREFIX", &self.root)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }

    pub fn clear_override_flags(&self, wine: &Path) {
        for dll in DXVK_DLLS {
            self.clear_override_flag(wine, dll);
        }
    }

    /// Copy backed-up original DLLs back into system32, overwriting any
    /// globally installed overrides. A missing backup directory means there
    /// is nothing to undo and is not an error. Returns the number of files
    /// restored.
    pub fn restore_backup_if_present(&self) -> io::Result<usize> {
        let backup = self.backup_dir();
        if !backup.is_dir() {
            return Ok(0);
        }

        let system32 = self.system32();
        fs::create_dir_all(&system32)?;

        let mut restored = 0;
        for dll in DXVK_DLLS {
            let src = backup.join(dll);
            if src.is_file() {
                fs::copy(&src, system32.join(dll))?;
                restored += 1;
            }
        }
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_prefix(tag: &str) -> Prefix {
        let root =
            std::env::temp_dir().join(format!("winestrap-{}-{:x}", tag, fastrand::u64(..)));
        fs::create_dir_all(&root).unwrap();
        Prefix::new(root)
    }

    #[test]
    fn test_derived_paths() {
        let pfx = Prefix::new("/home/user/wined");
        assert_eq!(
            pfx.steam_exe(),
            PathBuf::from("/home/user/wined/drive_c/Program Files (x86)/Steam/steam.exe")
        );
        assert_eq!(
            pfx.game_dir("REPO"),
            PathBuf::from(
                "/home/user/wined/drive_c/Program Files (x86)/Steam/steamapps/common/REPO"
            )
        );
        assert_eq!(
            pfx.system32(),
            PathBuf::from("/home/user/wined/drive_c/windows/system32")
        );
        assert_eq!(
            pfx.backup_dir(),
            PathBuf::from("/home/user/wined/dxvk-backup/system32")
        );
    }

    #[test]
    fn test_restore_without_backup_is_noop() {
        let pfx = temp_prefix("nobackup");
        assert_eq!(pfx.restore_backup_if_present().unwrap(), 0);
        // system32 must not have been conjured up as a side effect
        assert!(!pfx.system32().exists());
        fs::remove_dir_all(pfx.root()).unwrap();
    }

    #[test]
    fn test_restore_copies_backup_into_system32() {
        let pfx = temp_prefix("backup");
        fs::create_dir_all(pfx.backup_dir()).unwrap();
        for dll in DXVK_DLLS {
            fs::write(pfx.backup_dir().join(dll), format!("original {}", dll)).unwrap();
        }
        // A stale override sitting in system32 must be overwritten
        fs::create_dir_all(pfx.system32()).unwrap();
        fs::write(pfx.system32().join("dxgi.dll"), "dxvk override").unwrap();

        assert_eq!(pfx.restore_backup_if_present().unwrap(), 3);
        for dll in DXVK_DLLS {
            let restored = fs::read_to_string(pfx.system32().join(dll)).unwrap();
            assert_eq!(restored, format!("original {}", dll));
        }
        fs::remove_dir_all(pfx.root()).unwrap();
    }

    #[test]
    fn test_restore_skips_missing_backup_files() {
        let pfx = temp_prefix("partial");
        fs::create_dir_all(pfx.backup_dir()).unwrap();
        fs::write(pfx.backup_dir().join("dxgi.dll"), "original dxgi").unwrap();

        assert_eq!(pfx.restore_backup_if_present().unwrap(), 1);
        assert!(pfx.system32().join("dxgi.dll").is_file());
        assert!(!pfx.system32().join("d3d11.dll").exists());
        fs::remove_dir_all(pfx.root()).unwrap();
    }
}
