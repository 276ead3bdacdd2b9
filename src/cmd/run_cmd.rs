use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::AnalysisArgs;
use crate::command::IndexPolicy;
use crate::command::RunTask;
use crate::command::Scheduler;
use crate::command::TaskEnv;
use crate::runtime::Config;

pub const DEFAULT_PATH_GENE_LIST: &str = "genes_hg19.txt";

#[derive(Args)]
pub struct RunCMD {
    // Gene list, one gene per line; line i belongs to task i
    #[arg(short = 'g', long = "gene-list", env = "GENESWEEP_GENE_LIST", value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_PATH_GENE_LIST)]
    pub path_gene_list: PathBuf,

    // Task index, 1-based. Defaults to SGE_TASK_ID / SLURM_ARRAY_TASK_ID
    #[arg(short = 't', long = "task-index")]
    pub task_index: Option<usize>,

    // Job to report accounting for. Defaults to JOB_ID / SLURM_JOB_ID
    #[arg(long = "job-id")]
    pub job_id: Option<String>,

    // Scheduler to query. Detected from the environment if not given
    #[arg(long = "scheduler", value_enum)]
    pub scheduler: Option<Scheduler>,

    // Scratch directory handed to the program as TMPDIR. Defaults to the job's TMPDIR
    #[arg(long = "scratch-dir", value_parser = clap::value_parser!(PathBuf))]
    pub scratch_dir: Option<PathBuf>,

    // What to do if the task index does not name a gene
    #[arg(long = "index-policy", value_enum, default_value_t = IndexPolicy::Reject)]
    pub index_policy: IndexPolicy,

    // Skip the accounting query after the program exits
    #[arg(long = "no-accounting")]
    pub no_accounting: bool,

    // Print the command for this task instead of running it
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

impl RunCMD {
    /// Run one array task. The returned code is the analysis program's exit code
    pub fn try_execute(&mut self) -> Result<i32> {
        log::debug!("Log level {:?}", Config::get().log_level);

        let env = TaskEnv::from_env();
        let task_index = env.task_index(self.task_index)?;

        let scheduler = self.scheduler.or(env.scheduler).unwrap_or(Scheduler::Sge);
        let job_id = self.job_id.clone().or(env.job_id.clone());
        let accounting = match job_id {
            Some(job_id) if !self.no_accounting => Some((scheduler, job_id)),
            _ => None,
        };

        let task = RunTask {
            path_gene_list: self.path_gene_list.clone(),
            task_index,
            index_policy: self.index_policy,
            program: self.analysis.program(),
            params: self.analysis.static_params(),
            scratch_dir: self.scratch_dir.clone().or(env.scratch_dir.clone()),
            accounting,
            dry_run: self.dry_run,
        };

        let code = task.run(&mut std::io::stdout().lock())?;
        log::info!("Task {} has finished with status {}", task_index, code);
        Ok(code)
    }
}
