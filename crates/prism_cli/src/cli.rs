use clap::{Parser, ValueEnum};
use log::LevelFilter;
use prism_renderer::Threads;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "prism")]
#[command(about = "Render a Prism scene file with a recursive ray tracer")]
pub struct Args {
    /// Scene file (JSON)
    pub scene: PathBuf,

    /// Output image path, the format follows the extension. Defaults to the
    /// scene's own output path, then to `<scene name>.png`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Worker threads: a number, "auto" or "none". Overrides the scene file
    #[arg(short, long, value_parser = parse_threads)]
    pub threads: Option<Threads>,

    /// Log progress every N percent, 0 disables. Overrides the scene file
    #[arg(long)]
    pub progress: Option<f64>,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,
}

fn parse_threads(value: &str) -> Result<Threads, String> {
    match value {
        "none" => Ok(Threads::None),
        "auto" => Ok(Threads::Auto),
        _ => match value.parse::<usize>() {
            Ok(0) => Err("thread count must be at least 1".to_string()),
            Ok(n) => Ok(Threads::Count(n)),
            Err(_) => Err(format!("expected a number, \"auto\" or \"none\", got '{value}'")),
        },
    }
}
