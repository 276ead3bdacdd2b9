mod command_to_string;
mod detect_software;
mod expand_and_resolve_path;
mod shell_quote;

pub use command_to_string::command_to_string;
pub use detect_software::check_utility;
pub use expand_and_resolve_path::expand_and_resolve_path;
pub use shell_quote::shell_quote;
