// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::runtime::{detect_color_mode_auto, ColorMode};

pub const DEFAULT_MESSAGE: &str = " Pra mim, você é...\n    ";

pub const DEFAULT_HEARTS: [&str; 7] = ["❤️", "💖", "💝", "💕", "💗", "💓", "💞"];

pub const DEFAULT_WORDS: [&str; 33] = [
    "linda",
    "meu amor",
    "perfeita",
    "minha paz",
    "minha sorte grande",
    "incrível",
    "minha inspiração",
    "minha flor",
    "minha luz",
    "minha alegria",
    "cheiro bom de abraço",
    "razão de tantos sorrisos",
    "meu ponto fraco",
    "meu carinho constante",
    "meu porto seguro",
    "princesa",
    "minha prioridade",
    "meu abraço favorito",
    "minha companheira",
    "meu coração grita seu nome",
    "meu universo inteiro",
    "meu refúgio preferido",
    "meu sorriso diário",
    "meu pedaço de céu",
    "minha calmaria em dias turbulentos",
    "meu encanto diário",
    "meu farol em noites escuras",
    "meu sonho realizado",
    "meu abraço de ficar",
    "minha cura silenciosa",
    "minha razão de acreditar",
    "meu amor sereno",
    "meu bem mais precioso",
];

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

const DEFAULT_PARAMS_USAGE: &str = "\
DEFAULTS:
  chuva -t 50 --delay-ms 10 -i 200 -n 50 --fall 3,7 -f 60

KEYS:
  m mute   r replay   q/Esc quit   mouse: hover repels, click glows
";

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        DEFAULT_PARAMS_USAGE
            .replace("DEFAULTS:", "\x1b[1;36mDEFAULTS:\x1b[0m")
            .replace("KEYS:", "\x1b[1;36mKEYS:\x1b[0m")
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecondsRange {
    pub low: f64,
    pub high: f64,
}

impl FromStr for SecondsRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: MIN,MAX".to_string())?;
        let low: f64 = a
            .trim()
            .parse()
            .map_err(|_| "invalid min value".to_string())?;
        let high: f64 = b
            .trim()
            .parse()
            .map_err(|_| "invalid max value".to_string())?;
        if !low.is_finite() || !high.is_finite() || low <= 0.0 || low > high {
            return Err("range must be >0 and min <= max".to_string());
        }
        Ok(Self { low, high })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "chuva", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'm',
        long = "message",
        help_heading = "MESSAGE",
        help = "Text revealed by the typewriter (\\n starts a new line)"
    )]
    pub message: Option<String>,

    #[arg(
        short = 't',
        long = "typing-ms",
        default_value_t = 50,
        help_heading = "MESSAGE",
        help = "Milliseconds per typed character (min 1 max 2000)"
    )]
    pub typing_ms: u64,

    #[arg(
        long = "delay-ms",
        default_value_t = 10,
        help_heading = "MESSAGE",
        help = "Pause between the end of the message and the first drop (min 0 max 60000)"
    )]
    pub delay_ms: u64,

    #[arg(
        short = 'i',
        long = "interval-ms",
        default_value_t = 200,
        help_heading = "RAIN",
        help = "Milliseconds between spawn attempts (min 10 max 10000)"
    )]
    pub interval_ms: u64,

    #[arg(
        short = 'n',
        long = "max-items",
        default_value_t = 50,
        help_heading = "RAIN",
        help = "Maximum items falling at once (min 1 max 500)"
    )]
    pub max_items: usize,

    #[arg(
        long = "fall",
        default_value = "3,7",
        help_heading = "RAIN",
        help = "Fall duration range in seconds: MIN,MAX (min 0.1 max 120)"
    )]
    pub fall: SecondsRange,

    #[arg(
        long = "seed",
        help_heading = "RAIN",
        help = "Seed for the random generator (default: from the OS)"
    )]
    pub seed: Option<u64>,

    #[arg(long = "muted", help_heading = "CONTROLS", help = "Start with sound off")]
    pub muted: bool,

    #[arg(
        long = "no-mute-button",
        help_heading = "CONTROLS",
        help = "Hide the mute control (m key is ignored)"
    )]
    pub no_mute_button: bool,

    #[arg(
        long = "no-replay-button",
        help_heading = "CONTROLS",
        help = "Hide the replay control (r key is ignored)"
    )]
    pub no_replay_button: bool,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "GENERAL",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-words",
        help_heading = "HELP",
        help = "List the hearts and words that can fall and exit"
    )]
    pub list_words: bool,

    #[arg(long = "info", help_heading = "HELP", help = "Print version info and exit")]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RainConfig {
    pub spawn_interval: Duration,
    pub max_items: usize,
    pub min_fall: Duration,
    pub max_fall: Duration,
    pub frame_period: Duration,
    pub hearts: Vec<String>,
    pub words: Vec<String>,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            spawn_interval: Duration::from_millis(200),
            max_items: 50,
            min_fall: Duration::from_secs(3),
            max_fall: Duration::from_secs(7),
            frame_period: Duration::from_secs_f64(1.0 / 60.0),
            hearts: DEFAULT_HEARTS.iter().map(|s| s.to_string()).collect(),
            words: DEFAULT_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub message: String,
    pub typing_speed: Duration,
    pub delay_before_rain: Duration,
    pub rain: RainConfig,
    pub seed: Option<u64>,
    pub start_muted: bool,
    pub mute_control: bool,
    pub replay_control: bool,
    pub fps: f64,
    pub duration: Option<Duration>,
    pub color_mode: ColorMode,
    pub default_background: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            typing_speed: Duration::from_millis(50),
            delay_before_rain: Duration::from_millis(10),
            rain: RainConfig::default(),
            seed: None,
            start_muted: false,
            mute_control: true,
            replay_control: true,
            fps: 60.0,
            duration: None,
            color_mode: ColorMode::Color256,
            default_background: false,
        }
    }
}

fn require_u64_range(flag: &'static str, v: u64, min: u64, max: u64) -> Result<u64, ConfigError> {
    if v < min || v > max {
        return Err(ConfigError::out_of_range(flag, v, min, max));
    }
    Ok(v)
}

fn require_f64_range(flag: &'static str, v: f64, min: f64, max: f64) -> Result<f64, ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::NotFinite { flag, value: v });
    }
    if v < min || v > max {
        return Err(ConfigError::out_of_range(flag, v, min, max));
    }
    Ok(v)
}

pub fn detect_color_mode(args: &Args) -> Result<ColorMode, ConfigError> {
    match args.colormode {
        None => Ok(detect_color_mode_auto()),
        Some(m) => ColorMode::from_flag(m).ok_or_else(|| ConfigError::Invalid {
            flag: "--colormode",
            reason: format!("{} (allowed: 0,16,8,256,24,32)", m),
        }),
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let message = match &args.message {
            Some(m) => m.replace("\\n", "\n"),
            None => defaults.message,
        };
        if message.chars().all(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                flag: "--message",
                reason: "message must contain visible text".to_string(),
            });
        }

        let typing_ms = require_u64_range("--typing-ms", args.typing_ms, 1, 2000)?;
        let delay_ms = require_u64_range("--delay-ms", args.delay_ms, 0, 60_000)?;
        let interval_ms = require_u64_range("--interval-ms", args.interval_ms, 10, 10_000)?;
        let max_items =
            require_u64_range("--max-items", args.max_items as u64, 1, 500)? as usize;
        let fall_low = require_f64_range("--fall min", args.fall.low, 0.1, 120.0)?;
        let fall_high = require_f64_range("--fall max", args.fall.high, 0.1, 120.0)?;
        let fps = require_f64_range("--fps", args.fps, 1.0, 240.0)?;

        let duration = match args.duration {
            Some(s) if !s.is_finite() => {
                return Err(ConfigError::NotFinite {
                    flag: "--duration",
                    value: s,
                })
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
            _ => None,
        };

        Ok(Self {
            message,
            typing_speed: Duration::from_millis(typing_ms),
            delay_before_rain: Duration::from_millis(delay_ms),
            rain: RainConfig {
                spawn_interval: Duration::from_millis(interval_ms),
                max_items,
                min_fall: Duration::from_secs_f64(fall_low),
                max_fall: Duration::from_secs_f64(fall_high),
                frame_period: Duration::from_secs_f64(1.0 / fps),
                ..defaults.rain
            },
            seed: args.seed,
            start_muted: args.muted,
            mute_control: !args.no_mute_button,
            replay_control: !args.no_replay_button,
            fps,
            duration,
            color_mode: detect_color_mode(args)?,
            default_background: matches!(args.color_bg, ColorBg::DefaultBackground),
        })
    }
}

pub fn print_list_words(rain: &RainConfig) {
    if color_enabled_stdout() {
        println!("\x1b[1;36mHEARTS:\x1b[0m");
    } else {
        println!("HEARTS:");
    }
    println!("  {}", rain.hearts.join(" "));
    println!();
    if color_enabled_stdout() {
        println!("\x1b[1;36mWORDS:\x1b[0m");
    } else {
        println!("WORDS:");
    }
    for w in &rain.words {
        println!("  {}", w);
    }
}
