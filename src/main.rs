mod api;
mod app;
mod config;
mod fixtures;
mod models;
mod parser;
mod stats;
mod store;
mod ui;

use crate::app::App;
use crate::config::Config;
use crate::store::Store;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenv::dotenv;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

// Local mirror when configured, bundled fixtures otherwise
fn local_store(config: &Config) -> Store {
    match config.data_dir() {
        Some(dir) => Store::load_or(
            dir,
            fixtures::users(),
            fixtures::projects(),
            fixtures::tasks(),
            fixtures::dashboard_stats(),
        ),
        None => Store::new(
            fixtures::users(),
            fixtures::projects(),
            fixtures::tasks(),
            fixtures::dashboard_stats(),
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::load();

    // A configured instance selects the fetch-based source; a failed load
    // degrades to the local path instead of aborting
    let store = match &config.instance_url {
        Some(instance_url) => match api::fetch_all(instance_url).await {
            Ok((users, projects, tasks, stats)) => Store::new(users, projects, tasks, stats),
            Err(err) => {
                eprintln!(
                    "Could not load from {}: {}. Falling back to local data.",
                    instance_url, err
                );
                local_store(&config)
            }
        },
        None => local_store(&config),
    };

    // Setup terminal UI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;

    let app = App::new(store);

    let res = ui::run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
