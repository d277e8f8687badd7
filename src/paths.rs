use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

pub static PATH_HOME: LazyLock<PathBuf> =
    LazyLock::new(|| PathBuf::from(env::var("HOME").unwrap()));

pub static PATH_DATA: LazyLock<PathBuf> = LazyLock::new(|| {
    if let Ok(xdg_data_home) = env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data_home).join("winestrap");
    }
    PATH_HOME.join(".local/share/winestrap")
});

pub static PATH_CONFIG_FILE: LazyLock<PathBuf> =
    LazyLock::new(|| PATH_DATA.join("config.yaml"));

/// Resolve a binary by name: $PATH first, then the fixed locations
/// Homebrew and manual installs put things in.
fn find_bin(name: &str) -> Option<PathBuf> {
    if let Ok(path_var) = env::var("PATH") {
        for dir in env::split_paths(&path_var) {
            let bin = dir.join(name);
            if bin.exists() {
                return Some(bin);
            }
        }
    }

    let bin_candidates = [
        PathBuf::from("/opt/homebrew/bin"),
        PathBuf::from("/usr/local/bin"),
    ];

    for candidate in &bin_candidates {
        let bin = candidate.join(name);
        if bin.exists() {
            return Some(bin);
        }
    }

    None
}

pub static BIN_WINE: LazyLock<Option<PathBuf>> = LazyLock::new(|| find_bin("wine"));

pub static BIN_WINESERVER: LazyLock<Option<PathBuf>> =
    LazyLock::new(|| find_bin("wineserver"));
