use std::ffi::OsStr;

use super::shell_quote;

/// Render a command the way it would be typed in a shell, quoting where needed.
/// Environment set on the command is shown as leading `KEY=value` pairs
pub fn command_to_string(cmd: &std::process::Command) -> String {
    let mut parts: Vec<String> = cmd
        .get_envs()
        .filter_map(|(k, v)| {
            v.map(|v| format!("{}={}", k.to_string_lossy(), shell_quote(&v.to_string_lossy())))
        })
        .collect();

    parts.push(shell_quote(&cmd.get_program().to_string_lossy()));
    parts.extend(cmd.get_args().map(|arg: &OsStr| shell_quote(&arg.to_string_lossy())));
    parts.join(" ")
}
