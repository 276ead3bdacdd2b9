use std::fmt::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use anyhow::bail;
use anyhow::Result;

use super::Scheduler;
use crate::runtime::Error;
use crate::utils::command_to_string;
use crate::utils::shell_quote;

pub const DEFAULT_JOB_NAME: &str = "genesweep";
pub const DEFAULT_MEMORY: &str = "2G";
pub const DEFAULT_SCRATCH: &str = "1G";
pub const DEFAULT_ARCH: &str = "linux-x64";
pub const DEFAULT_RUNTIME: &str = "24:00:00";
pub const DEFAULT_THROTTLE: usize = 250;

/// Everything needed to write the submission script of one sweep.
///
/// Resource requests apply uniformly to every task of the array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayJobSpec {
    pub scheduler: Scheduler,
    pub job_name: String,
    pub log_dir: PathBuf,
    pub memory: String,
    pub scratch: String,
    pub arch: Option<String>,
    pub runtime: String,
    /// Number of tasks; the array runs 1..=array_len
    pub array_len: usize,
    /// Most tasks allowed to run at once
    pub throttle: usize,
    /// The command every task runs, one word per element
    pub task_command: Vec<String>,
}

pub fn render_job_script(spec: &ArrayJobSpec) -> Result<String> {
    if spec.array_len == 0 {
        bail!("Cannot build an array job with no tasks; the gene list is empty");
    }
    if spec.throttle == 0 {
        bail!("Throttle must allow at least one running task");
    }
    if spec.task_command.is_empty() {
        bail!("No task command given");
    }
    if spec.job_name.is_empty() || spec.job_name.contains(char::is_whitespace) {
        bail!("Job name {:?} must be a single non-empty word", spec.job_name);
    }

    let log_dir = spec.log_dir.to_string_lossy();
    let mut s = String::new();
    writeln!(s, "#!/bin/bash")?;
    match spec.scheduler {
        Scheduler::Sge => {
            writeln!(s, "#$ -S /bin/bash")?;
            writeln!(s, "#$ -N {}", spec.job_name)?;
            writeln!(s, "#$ -o {}", log_dir)?;
            writeln!(s, "#$ -e {}", log_dir)?;
            writeln!(s, "#$ -cwd")?;
            writeln!(s, "#$ -r y")?;
            writeln!(s, "#$ -j n")?;
            writeln!(s, "#$ -l mem_free={}", spec.memory)?;
            writeln!(s, "#$ -l scratch={}", spec.scratch)?;
            if let Some(arch) = &spec.arch {
                writeln!(s, "#$ -l arch={}", arch)?;
            }
            writeln!(s, "#$ -l h_rt={}", spec.runtime)?;
            writeln!(s, "#$ -t 1-{}", spec.array_len)?;
            writeln!(s, "#$ -tc {}", spec.throttle)?;
        }
        Scheduler::Slurm => {
            // %A is the array job id, %a the task index
            writeln!(s, "#SBATCH --job-name={}", spec.job_name)?;
            writeln!(s, "#SBATCH --output={}/%x.o%A.%a", log_dir)?;
            writeln!(s, "#SBATCH --error={}/%x.e%A.%a", log_dir)?;
            writeln!(s, "#SBATCH --mem={}", spec.memory)?;
            writeln!(s, "#SBATCH --tmp={}", spec.scratch)?;
            if let Some(arch) = &spec.arch {
                writeln!(s, "#SBATCH --constraint={}", arch)?;
            }
            writeln!(s, "#SBATCH --time={}", spec.runtime)?;
            writeln!(s, "#SBATCH --array=1-{}%{}", spec.array_len, spec.throttle)?;
        }
    }
    writeln!(s)?;

    let words: Vec<String> = spec.task_command.iter().map(|w| shell_quote(w)).collect();
    writeln!(s, "{}", words.join(" \\\n    "))?;
    Ok(s)
}

/// Hand a written script to the scheduler; returns what the submit utility printed
pub fn submit_job_script(scheduler: Scheduler, path_script: &Path) -> Result<String, Error> {
    let utility = scheduler.submit_utility();
    let mut cmd = process::Command::new(utility);
    cmd.arg(path_script);
    let cmd_string = command_to_string(&cmd);
    log::info!("Submitting: {}", cmd_string);

    let output = cmd
        .output()
        .map_err(|_| Error::utility_not_executable(utility))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::utility_execution_error(utility, cmd_string, Some(stderr)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
