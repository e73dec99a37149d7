// folio: a TUI portfolio viewer.
// Shows a cached GitHub project feed and replays an animated career terminal.

mod app;
mod cache;
mod config;
mod error;
mod github;
mod i18n;
mod state;
mod ui;

use std::io;

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = config::Config::load();

    let mut terminal = ratatui::init();
    let result = app::App::new(config).run(&mut terminal);
    ratatui::restore();

    result
}
