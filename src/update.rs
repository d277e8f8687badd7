//! Release update check

/// Compare the running version against the latest GitHub release.
/// Returns false if any part of the process fails.
pub fn check_for_update() -> bool {
    if let Ok(response) = reqwest::blocking::Client::new()
        .get("https://api.github.com/repos/winestrap/winestrap/releases/latest")
        .header("User-Agent", "winestrap")
        .send()
    {
        if let Ok(release) = response.json::<serde_json::Value>() {
            if let Some(tag_name) = release["tag_name"].as_str() {
                let latest_version = tag_name.strip_prefix('v').unwrap_or(tag_name);
                let current_version = env!("CARGO_PKG_VERSION");

                if let (Ok(latest_semver), Ok(current_semver)) = (
                    semver::Version::parse(latest_version),
                    semver::Version::parse(current_version),
                ) {
                    return latest_semver > current_semver;
                }
            }
        }
    }

    false
}
