use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Args;

use super::run_cmd::DEFAULT_PATH_GENE_LIST;
use super::AnalysisArgs;
use crate::command::jobscript::*;
use crate::command::ArrayJobSpec;
use crate::command::GeneList;
use crate::command::IndexPolicy;
use crate::command::Scheduler;
use crate::utils::expand_and_resolve_path;

pub const DEFAULT_PATH_LOGS: &str = "logs";

/// Settings of the array job as a whole
#[derive(Args, Clone, Debug)]
pub struct ScriptArgs {
    // Gene list; its length sets the array size
    #[arg(short = 'g', long = "gene-list", env = "GENESWEEP_GENE_LIST", value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_PATH_GENE_LIST)]
    pub path_gene_list: PathBuf,

    #[arg(long = "scheduler", value_enum, default_value_t = Scheduler::Sge)]
    pub scheduler: Scheduler,

    #[arg(long = "job-name", default_value = DEFAULT_JOB_NAME)]
    pub job_name: String,

    // Directory for the scheduler's stdout/stderr logs
    #[arg(long = "log-dir", value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_PATH_LOGS)]
    pub log_dir: PathBuf,

    // Memory per task
    #[arg(long = "mem", default_value = DEFAULT_MEMORY)]
    pub memory: String,

    // Local scratch space per task
    #[arg(long = "scratch", default_value = DEFAULT_SCRATCH)]
    pub scratch: String,

    // Node architecture constraint; empty for none. Grid engine defaults to linux-x64, Slurm to none
    #[arg(long = "arch")]
    pub arch: Option<String>,

    // Wall-clock limit per task, h:mm:ss
    #[arg(long = "runtime", default_value = DEFAULT_RUNTIME)]
    pub runtime: String,

    // Most tasks running at once
    #[arg(long = "throttle", default_value_t = DEFAULT_THROTTLE)]
    pub throttle: usize,

    #[arg(long = "index-policy", value_enum, default_value_t = IndexPolicy::Reject)]
    pub index_policy: IndexPolicy,

    // genesweep binary the tasks should run. Defaults to this one
    #[arg(long = "genesweep-bin", value_parser = clap::value_parser!(PathBuf))]
    pub genesweep_bin: Option<PathBuf>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

impl ScriptArgs {
    pub fn arch(&self) -> Option<String> {
        let arch = match (&self.arch, self.scheduler) {
            (Some(arch), _) => Some(arch.clone()),
            (None, Scheduler::Sge) => Some(DEFAULT_ARCH.to_string()),
            (None, Scheduler::Slurm) => None,
        };
        arch.filter(|a| !a.is_empty())
    }

    pub fn build_spec(&self) -> Result<ArrayJobSpec> {
        let list = GeneList::from_file(&self.path_gene_list)?;
        let path_gene_list = expand_and_resolve_path(&self.path_gene_list)?;

        let genesweep_bin = match &self.genesweep_bin {
            Some(p) => expand_and_resolve_path(p)?,
            None => std::env::current_exe().context("Could not locate the genesweep binary")?,
        };

        let index_policy = match self.index_policy {
            IndexPolicy::Placeholder => "placeholder",
            IndexPolicy::Reject => "reject",
        };

        let mut task_command = vec![
            genesweep_bin.to_string_lossy().to_string(),
            "run".to_string(),
            "--gene-list".to_string(),
            path_gene_list.to_string_lossy().to_string(),
            "--index-policy".to_string(),
            index_policy.to_string(),
        ];
        task_command.extend(self.analysis.to_args()?);

        Ok(ArrayJobSpec {
            scheduler: self.scheduler,
            job_name: self.job_name.clone(),
            log_dir: expand_and_resolve_path(&self.log_dir)?,
            memory: self.memory.clone(),
            scratch: self.scratch.clone(),
            arch: self.arch(),
            runtime: self.runtime.clone(),
            array_len: list.len(),
            throttle: self.throttle,
            task_command,
        })
    }
}

#[derive(Args)]
pub struct ScriptCMD {
    // Write the script here instead of stdout
    #[arg(long = "script-out", value_parser = clap::value_parser!(PathBuf))]
    pub path_out: Option<PathBuf>,

    #[command(flatten)]
    pub script: ScriptArgs,
}

impl ScriptCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        let spec = self.script.build_spec()?;
        let script = render_job_script(&spec)?;
        match &self.path_out {
            Some(path_out) => {
                fs::write(path_out, script)
                    .with_context(|| format!("Failed to write job script to {:?}", path_out))?;
                log::info!("Wrote job script for {} tasks to {:?}", spec.array_len, path_out);
            }
            None => print!("{}", script),
        }
        Ok(())
    }
}
