// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod diag;
mod error;
mod frame;
mod glyph;
mod item;
mod layout;
mod palette;
mod rain;
mod runtime;
mod scene;
mod show;
mod terminal;
mod timer;
mod tone;
mod typewriter;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{
    Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, detect_color_mode, print_list_words,
    Args, Config, RainConfig,
};
use crate::diag::Diagnostics;
use crate::error::StageError;
use crate::frame::Frame;
use crate::layout::Viewport;
use crate::palette::build_palette;
use crate::runtime::detect_color_mode_auto;
use crate::scene::draw_scene;
use crate::show::Show;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("CHUVA_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Red))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))))
}

fn print_check_bitcolor(args: &Args) {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let auto = detect_color_mode_auto();

    println!("BITCOLOR CHECK:");
    println!(
        "  COLORTERM: {}",
        if colorterm.is_empty() {
            "(unset)"
        } else {
            &colorterm
        }
    );
    println!(
        "  TERM: {}",
        if term.is_empty() { "(unset)" } else { &term }
    );
    println!("  auto_detected: {}", auto.label());
    match detect_color_mode(args) {
        Ok(effective) => {
            if args.colormode.is_some() {
                println!("  forced: {}", effective.label());
            }
            println!("  effective: {}", effective.label());
        }
        Err(e) => println!("  forced: {}", e),
    }
}

fn install_signal_handlers() {
    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

#[derive(Default)]
struct Pending {
    quit: bool,
    resize: Option<(u16, u16)>,
}

fn handle_event(ev: Event, show: &mut Show, pending: &mut Pending) {
    let now = Instant::now();
    match ev {
        Event::Resize(w, h) => pending.resize = Some((w, h)),
        Event::Key(k) if k.kind == KeyEventKind::Press => match (k.code, k.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => pending.quit = true,
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => pending.quit = true,
            (KeyCode::Char('m'), _) => {
                show.press_mute();
            }
            (KeyCode::Char('r'), _) => {
                show.press_replay(now);
            }
            _ => {}
        },
        Event::Mouse(m) => match m.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                show.pointer_moved(m.column, m.row, now);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                show.click(m.column, m.row, now);
            }
            _ => {}
        },
        _ => {}
    }
}

fn frame_loop(
    term: &mut Terminal,
    show: &mut Show,
    cfg: &Config,
    end_time: Option<Instant>,
) -> Result<(), StageError> {
    let palette = build_palette(cfg.color_mode, cfg.default_background);
    let (w, h) = (show.layout().viewport.cols, show.layout().viewport.rows);
    let mut frame = Frame::new(w, h, palette.bg);

    let target_period = Duration::from_secs_f64(1.0 / cfg.fps);
    let mut next_frame = Instant::now();

    loop {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            return Ok(());
        }
        let mut pending = Pending::default();

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                handle_event(Terminal::read_event()?, show, &mut pending);
            }

            if pending.quit || pending.resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if pending.quit {
            return Ok(());
        }

        if let Some((nw, nh)) = pending.resize {
            show.resize(Viewport::new(nw, nh));
            frame = Frame::new(nw, nh, palette.bg);
        }

        let now = Instant::now();
        show.tick(now);
        draw_scene(show, &mut frame, &palette, now);
        if frame.has_changes() {
            term.draw(&mut frame)?;
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }
}

fn run(cfg: &Config, mut diag: Diagnostics) -> (Diagnostics, Result<(), StageError>) {
    let tone = tone::open_default(&mut diag);
    let rng = match cfg.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let mut term = match Terminal::new() {
        Ok(t) => t,
        Err(e) => return (diag, Err(e.into())),
    };
    let (w, h) = match term.size() {
        Ok(s) => s,
        Err(e) => return (diag, Err(e.into())),
    };

    let mut show = Show::new(cfg, Viewport::new(w, h), rng, tone, diag);
    let start_time = Instant::now();
    let outcome = show.start(start_time).and_then(|()| {
        let end_time = cfg.duration.map(|d| start_time + d);
        frame_loop(&mut term, &mut show, cfg, end_time)
    });

    drop(term);
    (show.into_diagnostics(), outcome)
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    install_signal_handlers();

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_words {
        print_list_words(&RainConfig::default());
        return;
    }

    if args.check_bitcolor {
        print_check_bitcolor(&args);
        return;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return;
    }

    let cfg = match Config::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let (mut diag, outcome) = run(&cfg, Diagnostics::new());
    diag.flush_to_stderr();
    if let Err(e) = outcome {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
