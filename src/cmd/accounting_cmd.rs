use anyhow::Result;
use clap::Args;

use crate::command::query_accounting;
use crate::command::Scheduler;
use crate::command::TaskEnv;

#[derive(Args)]
pub struct AccountingCMD {
    // Job id. Defaults to JOB_ID / SLURM_JOB_ID
    pub job_id: Option<String>,

    #[arg(long = "scheduler", value_enum)]
    pub scheduler: Option<Scheduler>,

    // Print parsed key/value pairs as TSV instead of the raw record
    #[arg(long = "tsv")]
    pub tsv: bool,
}

impl AccountingCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        let env = TaskEnv::from_env();
        let scheduler = self.scheduler.or(env.scheduler).unwrap_or(Scheduler::Sge);
        let job_id = match self.job_id.clone().or(env.job_id) {
            Some(job_id) => job_id,
            None => anyhow::bail!("No job id given and none found in the environment"),
        };

        let record = query_accounting(scheduler, &job_id)?;
        if self.tsv {
            record.write_tsv(std::io::stdout().lock())?;
        } else {
            print!("{}", record.raw);
        }
        Ok(())
    }
}
