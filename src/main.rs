mod app;
mod cli;
mod config;
mod domain;
mod event;
mod export;
mod focus;
mod ids;
mod logging;
mod store;
mod tui;
mod types;
mod ui;

use anyhow::Result;
use chrono::Local;
use clap::Parser;

use config::Config;
use focus::{Alerts, TerminalAlerts};
use store::Store;

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let config = Config::new(cli_opts.data_dir, cli_opts.log_level);
    config.ensure_data_dir()?;

    // Runs without logs rather than not at all.
    let _logger = match logging::init(&config.log_level, &config.log_dir()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("loopos: logging disabled: {err}");
            None
        }
    };

    let store = Store::open(&config.store_path())?;
    if let Some(command) = cli_opts.command {
        return cli::run(command, &store);
    }

    let alerts = Alerts::new(Box::new(TerminalAlerts::new()));
    let mut app = app::App::new(store, config.data_dir.clone(), alerts, Local::now());
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
