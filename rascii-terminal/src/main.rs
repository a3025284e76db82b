/// RASCII Terminal Demo - Scene graph rendered as ASCII art
///
/// Usage: rascii [config.ron]
///
/// Controls:
///   - WASD: Move the scene
///   - Arrow Keys: Turn the scene
///   - M: Toggle wireframe / filled
///   - R: Reset
///   - Q/ESC/Ctrl-C: Quit
use std::env;
use std::process::ExitCode;

use crossterm::terminal;
use rascii_terminal::{AppConfig, Result, TerminalApp};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // stdout belongs to the frame
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => {
            println!("Thank you for using RASCII!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "rascii failed");
            eprintln!("rascii: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = match env::args_os().nth(1) {
        Some(path) => {
            info!(path = %path.to_string_lossy(), "loading config");
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };

    let (columns, rows) = terminal::size()?;
    let config = config.fit_terminal(columns, rows);
    info!(
        width = config.render.width,
        height = config.render.height,
        fps = config.fps,
        "starting renderer"
    );

    let mut app = TerminalApp::new(config)?;
    app.run()
}
