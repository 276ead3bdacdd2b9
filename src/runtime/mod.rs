mod commands;
mod config;
mod error;
mod log;

pub use commands::Commands;
pub use config::*;
pub use error::Error;
pub use self::log::*;
