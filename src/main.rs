use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::Path;

use clap::Parser;
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use soli_rs::app::App;
use soli_rs::config::Args;
use soli_rs::renderer::TuiRenderer;

/// Log to a file: the terminal belongs to the game.
fn init_logging(path: Option<&Path>) {
    let Some(path) = path else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_path().as_deref());

    // Setup terminal
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(out))?;

    let mut app = App::deal(args.seed, TuiRenderer::new(terminal), args.store());
    let result = app.run();

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;

    if let Err(e) = &result {
        log::error!("Terminal error: {e}");
    }
    result
}
