use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Args;

use super::ScriptArgs;
use crate::command::render_job_script;
use crate::command::submit_job_script;
use crate::utils::check_utility;

pub const DEFAULT_PATH_SCRIPT: &str = "genesweep_job.sh";

#[derive(Args)]
pub struct SubmitCMD {
    // Where to keep the submitted script
    #[arg(long = "script-out", value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_PATH_SCRIPT)]
    pub path_script: PathBuf,

    // Write and print the script, but do not submit
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[command(flatten)]
    pub script: ScriptArgs,
}

impl SubmitCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        let spec = self.script.build_spec()?;
        let script = render_job_script(&spec)?;

        fs::create_dir_all(&spec.log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", spec.log_dir))?;
        fs::write(&self.path_script, &script)
            .with_context(|| format!("Failed to write job script to {:?}", self.path_script))?;

        if self.dry_run {
            print!("{}", script);
            return Ok(());
        }

        let utility = spec.scheduler.submit_utility();
        check_utility(utility)?;
        let response = submit_job_script(spec.scheduler, &self.path_script)?;
        println!("{}", response);
        log::info!("Submitted {} tasks", spec.array_len);
        Ok(())
    }
}
