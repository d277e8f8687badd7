//! Steam library scanning inside the prefix
//!
//! Parses the appmanifest files Steam leaves in each library's steamapps
//! folder, follows libraryfolders.vdf to extra libraries, and guesses the
//! main executable of a game folder.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::prefix::Prefix;

/// Valve's KeyValues text format is just quoted pairs for our purposes
static KV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"\s+"([^"]*)""#).unwrap());

/// Executable names that are never the game itself
const SKIP_TOKENS: [&str; 9] = [
    "unitycrashhandler",
    "crashhandler",
    "unins",
    "uninstall",
    "setup",
    "launcherhelper",
    "steamerrorreporter",
    "vcredist",
    "dxsetup",
];

#[derive(Debug, Clone)]
pub struct GameEntry {
    pub appid: String,
    pub name: String,
    pub install_dir: String,
    pub library_root: PathBuf,
}

impl GameEntry {
    pub fn game_dir(&self) -> PathBuf {
        self.library_root
            .join("steamapps/common")
            .join(&self.install_dir)
    }

    pub fn detect_exe(&self) -> Option<PathBuf> {
        detect_exe(&self.game_dir())
    }

    pub fn display(&self) -> String {
        format!("{} [{}]", self.name, self.appid)
    }
}

/// Extract appid/name/installdir from one appmanifest_*.acf
pub fn parse_appmanifest(content: &str, library_root: &Path) -> Option<GameEntry> {
    let mut appid = None;
    let mut name = None;
    let mut install_dir = None;

    for caps in KV_RE.captures_iter(content) {
        match &caps[1] {
            "appid" => appid = Some(caps[2].to_string()),
            "name" => name = Some(caps[2].to_string()),
            "installdir" => install_dir = Some(caps[2].to_string()),
            _ => {}
        }
    }

    Some(GameEntry {
        appid: appid?,
        name: name?,
        install_dir: install_dir?,
        library_root: library_root.to_path_buf(),
    })
}

/// Steam inside the prefix records library paths as Windows paths; map
/// `C:\...` onto the prefix's drive_c.
pub fn windows_path_to_unix(prefix_root: &Path, value: &str) -> PathBuf {
    let normalized = value.replace("\\\\", "\\");
    let bytes = normalized.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
    {
        let drive = (bytes[0] as char).to_ascii_lowercase();
        let remainder = normalized[3..].replace('\\', "/");
        return prefix_root.join(format!("drive_{}", drive)).join(remainder);
    }
    PathBuf::from(normalized.replace('\\', "/"))
}

/// All Steam library roots: the install dir itself plus everything listed
/// in libraryfolders.vdf that actually exists.
pub fn library_roots(prefix: &Prefix) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    let steam_dir = prefix.steam_dir();
    if steam_dir.is_dir() {
        roots.push(steam_dir.clone());
    }

    let vdf_path = steam_dir.join("steamapps/libraryfolders.vdf");
    if let Ok(content) = fs::read_to_string(&vdf_path) {
        for caps in KV_RE.captures_iter(&content) {
            if &caps[1] == "path" {
                let converted = windows_path_to_unix(prefix.root(), &caps[2]);
                if converted.is_dir() && !roots.contains(&converted) {
                    roots.push(converted);
                }
            }
        }
    }

    roots
}

/// Every installed game across all library roots, sorted by name
pub fn scan_games(prefix: &Prefix) -> Vec<GameEntry> {
    let mut games = Vec::new();

    for root in library_roots(prefix) {
        let steamapps = root.join("steamapps");
        let Ok(entries) = fs::read_dir(&steamapps) else {
            continue;
        };

        let mut manifests: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("appmanifest_") && n.ends_with(".acf"))
            })
            .collect();
        manifests.sort();

        for manifest in manifests {
            if let Ok(content) = fs::read_to_string(&manifest)
                && let Some(entry) = parse_appmanifest(&content, &root)
            {
                games.push(entry);
            }
        }
    }

    games.sort_by_key(|g| g.name.to_lowercase());
    games
}

fn is_probably_not_game(lowered_name: &str) -> bool {
    SKIP_TOKENS.iter().any(|t| lowered_name.contains(t))
}

/// Guess the main executable of a game folder.
///
/// Unreal Shipping binaries win outright, then an exe matching the folder
/// name, then the largest exe in the root, then the largest exe anywhere
/// within a shallow depth. Helper/installer executables are skipped.
pub fn detect_exe(game_dir: &Path) -> Option<PathBuf> {
    if !game_dir.is_dir() {
        return None;
    }

    let mut shipping: Vec<(PathBuf, u64)> = Vec::new();
    let mut root_exes: Vec<(PathBuf, u64)> = Vec::new();
    let mut sub_exes: Vec<(PathBuf, u64)> = Vec::new();

    for entry in WalkDir::new(game_dir)
        .max_depth(8)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.path().file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let lowered = name.to_lowercase();
        if !lowered.ends_with(".exe") || is_probably_not_game(&lowered) {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if lowered.ends_with("shipping.exe") {
            shipping.push((entry.path().to_path_buf(), size));
        }
        if entry.depth() == 1 {
            root_exes.push((entry.path().to_path_buf(), size));
        } else {
            sub_exes.push((entry.path().to_path_buf(), size));
        }
    }

    shipping.sort_by_key(|(_, size)| std::cmp::Reverse(*size));
    if let Some((path, _)) = shipping.into_iter().next() {
        return Some(path);
    }

    if let Some(folder) = game_dir.file_name().and_then(|n| n.to_str()) {
        for candidate in [format!("{}.exe", folder), format!("{}.exe", folder.replace(' ', ""))]
        {
            let path = game_dir.join(&candidate);
            if path.is_file() {
                return Some(path);
            }
        }
    }

    root_exes.sort_by_key(|(_, size)| std::cmp::Reverse(*size));
    if let Some((path, _)) = root_exes.into_iter().next() {
        return Some(path);
    }

    sub_exes.sort_by_key(|(_, size)| std::cmp::Reverse(*size));
    sub_exes.into_iter().next().map(|(path, _)| path)
}
