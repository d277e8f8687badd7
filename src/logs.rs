//! DXVK log surfacing
//!
//! DXVK writes `<exe name>_d3d11.log` files into the configured log dir.
//! Find the newest one that looks like it belongs to the configured game
//! and print its tail.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const LOG_TAIL_LINES: usize = 200;

fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Newest d3d11 log in the log dir, preferring filenames that mention the
/// game. Log filenames vary with how the exe was named, so the match is a
/// lowercase, space-stripped substring check with an any-log fallback.
pub fn newest_game_log(log_dir: &Path, game: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(log_dir).ok()?;
    let all: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_d3d11.log"))
        })
        .collect();

    let needle = game.to_lowercase().replace(' ', "");
    let matching: Vec<PathBuf> = all
        .iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.to_lowercase().replace(' ', "").contains(&needle))
        })
        .cloned()
        .collect();

    let pool = if matching.is_empty() { all } else { matching };
    pool.into_iter().max_by_key(|p| mtime(p))
}

pub fn print_game_log(log_dir: &Path, game: &str) -> Result<(), Box<dyn Error>> {
    let Some(path) = newest_game_log(log_dir, game) else {
        return Err(format!(
            "No DXVK d3d11 log found in {} yet. Launch the game once with overrides enabled.",
            log_dir.display()
        )
        .into());
    };

    let text = fs::read_to_string(&path)?;
    let lines: Vec<&str> = text.lines().collect();
    let shown = lines.len().min(LOG_TAIL_LINES);

    println!(
        "[winestrap] --- DXVK log: {} (last {} lines) ---",
        path.display(),
        shown
    );
    for line in &lines[lines.len() - shown..] {
        println!("{}", line);
    }
    if lines.is_empty() {
        println!("(log is empty)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("winestrap-{}-{:x}", tag, fastrand::u64(..)));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_prefers_logs_matching_the_game() {
        let dir = temp_dir("logs-match");
        fs::write(dir.join("Other_d3d11.log"), "other").unwrap();
        fs::write(dir.join("REPO_d3d11.log"), "repo").unwrap();
        fs::write(dir.join("notes.txt"), "not a log").unwrap();

        let found = newest_game_log(&dir, "REPO").unwrap();
        assert_eq!(found, dir.join("REPO_d3d11.log"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_falls_back_to_any_d3d11_log() {
        let dir = temp_dir("logs-fallback");
        fs::write(dir.join("SomethingElse_d3d11.log"), "x").unwrap();

        let found = newest_game_log(&dir, "REPO").unwrap();
        assert_eq!(found, dir.join("SomethingElse_d3d11.log"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_none_when_no_logs() {
        let dir = temp_dir("logs-none");
        assert!(newest_game_log(&dir, "REPO").is_none());
        assert!(print_game_log(&dir, "REPO").is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
