mod cli;
mod config;
mod dxvk;
mod launch;
mod logs;
mod paths;
mod prefix;
mod process;
mod scan;
mod setup;
mod update;
mod validate;

use clap::{CommandFactory, Parser};
use std::error::Error;
use std::process::ExitCode;

use crate::cli::{Cli, Cmd};
use crate::config::StrapConfig;
use crate::paths::BIN_WINE;
use crate::prefix::Prefix;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    let mut cfg = StrapConfig::load();

    let result = match command {
        Cmd::Setup { launch } => setup::run_setup(&cfg, launch),
        Cmd::Steam => launch::launch_steam(&cfg),
        Cmd::Game { name } => {
            if let Some(name) = name {
                cfg.game = name;
            }
            launch::launch_game(&cfg)
        }
        Cmd::Status => status(&cfg),
        Cmd::Games => list_games(&cfg),
        Cmd::Logs => logs::print_game_log(&cfg.dxvk_log_path, &cfg.game),
        Cmd::Init => setup::init_prefix(&cfg),
        Cmd::InstallSteam { installer } => setup::install_steam(&cfg, installer),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[winestrap] Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn status(cfg: &StrapConfig) -> Result<(), Box<dyn Error>> {
    let prefix = Prefix::new(&cfg.prefix);

    println!("[winestrap] Wine prefix:   {}", cfg.prefix.display());
    println!("[winestrap] Steam dir:     {}", prefix.steam_dir().display());
    println!(
        "[winestrap] Game folder:   {}",
        prefix.game_dir(&cfg.game).display()
    );
    println!("[winestrap] DXVK bin:      {}", cfg.dxvk_bin().display());
    println!(
        "[winestrap] DXVK logs:     {} (level {})",
        cfg.dxvk_log_path.display(),
        cfg.dxvk_log_level
    );
    match &*BIN_WINE {
        Some(wine) => println!("[winestrap] Wine binary:   {}", wine.display()),
        None => println!("[winestrap] Wine binary:   not found"),
    }

    let running = process::is_running(process::STEAM_PROCESS);
    println!(
        "[winestrap] Steam running: {}",
        if running { "yes" } else { "no" }
    );

    if update::check_for_update() {
        println!("[winestrap] A newer winestrap release is available");
    }

    Ok(())
}

fn list_games(cfg: &StrapConfig) -> Result<(), Box<dyn Error>> {
    let prefix = Prefix::new(&cfg.prefix);
    let games = scan::scan_games(&prefix);

    if games.is_empty() {
        println!(
            "[winestrap] No installed games found under {}",
            prefix.steam_dir().display()
        );
        return Ok(());
    }

    for game in &games {
        let exe = game
            .detect_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no exe detected".to_string());
        println!("[winestrap] {} - {}", game.display(), exe);
    }
    println!("[winestrap] Found {} installed game(s)", games.len());

    Ok(())
}
