use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "winestrap",
    version,
    about = "Wine + DXVK launch orchestrator for Steam games"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Reset the prefix to a clean state and stage the DXVK overrides
    Setup {
        /// Also launch Steam once setup finishes
        #[arg(long)]
        launch: bool,
    },

    /// Launch the Steam client inside the prefix (no DXVK overrides)
    Steam,

    /// Launch the configured game with DXVK overrides (Steam must be running)
    #[command(alias = "repo")]
    Game {
        /// Game folder name under steamapps/common (defaults to the configured game)
        name: Option<String>,
    },

    /// Print the resolved configuration and whether Steam is running
    Status,

    /// List installed games found in the prefix's Steam libraries
    Games,

    /// Show the tail of the newest DXVK log for the configured game
    Logs,

    /// Create the prefix directory and initialize it with wineboot
    Init,

    /// Run the Steam installer inside the prefix
    InstallSteam {
        /// Path to SteamSetup.exe (defaults to ~/Downloads/SteamSetup.exe)
        #[arg(long)]
        installer: Option<PathBuf>,
    },
}
