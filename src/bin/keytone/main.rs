//! keytone - play the piano from the terminal
//!
//! Run with: cargo run --features cpal
//! Logs go to `keytone.log` in the system temp directory (override with
//! `KEYTONE_LOG`); filter with `RUST_LOG`.

mod app;
mod ui;

use std::{
    env,
    fs::File,
    io::{self, stdout},
    path::PathBuf,
    sync::Mutex,
};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use keytone::EngineConfig;
use tracing_subscriber::EnvFilter;

use app::App;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let terminal = ratatui::init();
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    run_session(
        || enable_input(enhanced),
        || App::new(EngineConfig::default(), enhanced).and_then(|mut app| app.run(terminal)),
        || {
            disable_input(enhanced);
            ratatui::restore();
        },
    )
}

/// Set up, run, and always tear down, whichever step fails.
fn run_session(
    setup: impl FnOnce() -> io::Result<()>,
    run: impl FnOnce() -> EyreResult<()>,
    teardown: impl FnOnce(),
) -> EyreResult<()> {
    let res = setup()
        .wrap_err("failed to configure terminal input")
        .and_then(|()| run());
    teardown();
    res
}

fn enable_input(enhanced: bool) -> io::Result<()> {
    execute!(stdout(), EnableMouseCapture)?;
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Ok(())
}

fn disable_input(enhanced: bool) {
    if enhanced {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout(), DisableMouseCapture);
}

fn init_logging() -> EyreResult<()> {
    let path = env::var_os("KEYTONE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("keytone.log"));
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
