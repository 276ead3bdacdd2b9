use std::sync::OnceLock;

use crate::runtime;

///////////////////////////////
/// Global Config Options
pub static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: runtime::LogLevel,
}

impl Config {
    /// Settings for this process. Falls back to defaults if `init` was never called
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(|| Config {
            log_level: runtime::LogLevel::default(),
        })
    }

    /// Store the settings and bring up logging. Only the first call has an effect
    pub fn init(log_level: runtime::LogLevel) -> &'static Config {
        let config = CONFIG.get_or_init(|| Config { log_level });
        runtime::setup_global_logger(config.log_level);
        config
    }
}
