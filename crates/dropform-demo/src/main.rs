#![forbid(unsafe_code)]

//! dropform demo binary entry point.

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use dropform_core::event::Event;
use dropform_core::terminal_session::{SessionOptions, TerminalSession};
use dropform_demo::app::App;
use dropform_demo::cli::{self, Opts};
use dropform_demo::present::Presenter;
use dropform_render::buffer::Buffer;
use tracing_subscriber::EnvFilter;

/// Spinner cadence while waiting for input.
const TICK: Duration = Duration::from_millis(80);

fn main() {
    let opts = cli::Opts::parse();

    if let Err(e) = init_logging() {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&opts) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

/// Log to the file named by `DROPFORM_DEMO_LOG`, if any. The terminal itself
/// belongs to the UI. `DROPFORM_DEMO_LOG_FORMAT=json` switches to JSON lines.
fn init_logging() -> io::Result<()> {
    let Ok(path) = std::env::var("DROPFORM_DEMO_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false);

    let json = std::env::var("DROPFORM_DEMO_LOG_FORMAT").is_ok_and(|v| v == "json");
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = installed {
        eprintln!("Logging disabled: {e}");
    }
    Ok(())
}

fn run(opts: &Opts) -> io::Result<()> {
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: true,
        bracketed_paste: true,
        ..Default::default()
    })?;
    let (width, height) = session.size()?;
    tracing::info!(width, height, page = %opts.page, "demo started");

    let mut presenter = Presenter::new(io::stdout());
    let mut buf = Buffer::new(width, height);
    let mut app = App::new(opts.clone());
    let started = Instant::now();
    let exit_after = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));

    presenter.clear_screen()?;
    let mut dirty = true;
    loop {
        if dirty {
            buf.clear();
            app.render(buf.bounds(), &mut buf);
            presenter.present(&buf)?;
            dirty = false;
        }

        if session.poll_event(TICK)?
            && let Some(event) = session.read_event()?
        {
            if let Event::Resize { width, height } = event {
                buf = Buffer::new(width, height);
                presenter.clear_screen()?;
            }
            dirty |= app.handle_event(&event);
        }
        dirty |= app.poll();

        if app.should_quit() {
            break;
        }
        if exit_after.is_some_and(|limit| started.elapsed() >= limit) {
            tracing::info!("exit timer elapsed");
            break;
        }
    }

    drop(session);
    tracing::info!("demo finished");
    Ok(())
}
