use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevel(pub log::LevelFilter);
impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" | "warning" => log::LevelFilter::Warn,
            "error" | "critical" | "crit" => log::LevelFilter::Error,
            "off" | "none" => log::LevelFilter::Off,
            _ => return Err(format!("Invalid log level: {}", s)),
        };
        Ok(LogLevel(level))
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel(log::LevelFilter::Info)
    }
}

/// Install the process-wide logger. Everything goes to stderr; stdout carries
/// rendered scripts and accounting records only.
///
/// RUST_LOG, if set, takes precedence over the level given here.
pub fn setup_global_logger(log_level: LogLevel) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log_level.into())
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        });

    // A second init (tests, embedding) is harmless
    let _ = builder.try_init();
}
