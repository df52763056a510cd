use crossterm::{
    cursor::{Hide, Show as ShowCursor},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::io::{BufWriter, Write, stdout};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use yanhua::audio::{AudioSink, Silent, TerminalBell};
use yanhua::config::{self, Command, Config};
use yanhua::engine::{FontRasterizer, GlyphRasterizer, NoGlyphs};
use yanhua::logging;
use yanhua::render::TerminalPresenter;
use yanhua::show::{Show, ShowSettings, TICK};

fn print_usage() {
    eprintln!("yanhua - Interactive terminal fireworks");
    eprintln!();
    eprintln!("Usage: yanhua [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bg-color RRGGBB  Background color as hex (default 0a050f)");
    eprintln!("  --font PATH        Font used for blessing bursts (default: first CJK system font)");
    eprintln!("  --shape NAME       Force every burst: circle, heart, star, ring, chrysanthemum, text");
    eprintln!("  --blessing TEXT    Text shown by text bursts");
    eprintln!("  --seed N           Seed the random source for a repeatable show");
    eprintln!("  --scale N          Surface pixels per half-block pixel, 1-16 (default 4)");
    eprintln!("  --sound            Ring the terminal bell on bursts");
    eprintln!("  --autoplay         Launch rockets without waiting for a click");
    eprintln!("  --config PATH      Read defaults from a TOML file");
    eprintln!("  --log-dir PATH     Directory for log files");
    eprintln!();
    eprintln!("Click (or press space) to launch. Press 'q', ESC, or Ctrl+C to exit");
}

fn load_glyphs(config: &Config) -> Box<dyn GlyphRasterizer> {
    match FontRasterizer::discover(config.font.as_deref()) {
        Ok(font) => {
            info!(font = font.name(), "font loaded");
            Box::new(font)
        }
        Err(e) => {
            warn!("text bursts disabled: {e}");
            Box::new(NoGlyphs)
        }
    }
}

fn audio_sink(config: &Config) -> Box<dyn AudioSink> {
    if config.sound { Box::new(TerminalBell::stderr()) } else { Box::new(Silent) }
}

fn is_exit(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    key.kind == KeyEventKind::Press
        && (key.code == KeyCode::Char('q')
            || key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(event::KeyModifiers::CONTROL)))
}

fn run_loop<W: Write>(show: &mut Show, presenter: &mut TerminalPresenter, out: &mut W) -> std::io::Result<()> {
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            if is_exit(&event) {
                break;
            }
            match &event {
                Event::Resize(cols, rows) => {
                    let (width, height) = presenter.surface_size(*cols, *rows);
                    show.resize(width, height);
                    execute!(out, Clear(ClearType::All))?;
                }
                _ => show.handle_event(&event),
            }
        }

        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        if accumulator > TICK * 3.0 {
            accumulator = TICK * 3.0;
        }

        let mut ticked = false;
        while accumulator >= TICK {
            show.update(TICK);
            accumulator -= TICK;
            ticked = true;
        }

        // The fade overlay is per tick, so only draw when time moved on.
        if ticked {
            presenter.present(show.render(), out)?;
        }
    }

    Ok(())
}

fn run(config: Config) -> std::io::Result<()> {
    let glyphs = load_glyphs(&config);
    let audio = audio_sink(&config);

    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

    let mut presenter = TerminalPresenter::new(config.scale);
    let result = terminal::size().and_then(|(cols, rows)| {
        let (width, height) = presenter.surface_size(cols, rows);
        let mut show = Show::new(ShowSettings::from(&config), width, height, glyphs, audio);
        let result = run_loop(&mut show, &mut presenter, &mut stdout);
        show.teardown();
        info!(explosions = show.explosions(), "exiting");
        result
    });

    execute!(stdout, ShowCursor, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    result
}

fn main() -> std::io::Result<()> {
    let config = match config::parse_args(env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let _log_guard = logging::init_logging(&config.log_dir);
    info!(?config, "starting");

    run(config)
}
