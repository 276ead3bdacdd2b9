use std::path::PathBuf;

use son_of_grid_engine as sge;

use super::Scheduler;
use crate::runtime::Error;

/// What the scheduler tells a running task about itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskEnv {
    pub scheduler: Option<Scheduler>,
    /// Variable name and raw value the index came from
    pub task_index_var: Option<(String, String)>,
    pub job_id: Option<String>,
    pub scratch_dir: Option<PathBuf>,
}

impl TaskEnv {
    /// Discover the running task. Inside a grid engine job the scratch
    /// directory comes from the engine's own view of the job
    pub fn from_env() -> TaskEnv {
        let lookup = |key: &str| std::env::var(key).ok();
        let mut env = TaskEnv::from_lookup(lookup);
        if env.in_grid_engine_job(lookup) {
            let info = sge::SystemInfo::discover();
            log::debug!("Grid engine reports {:?}", info);
            env.scratch_dir = Some(info.scratch_path);
        }
        env
    }

    /// A task started by grid engine itself: SGE_ROOT is exported to every job,
    /// and the job has an id
    pub fn in_grid_engine_job<F: Fn(&str) -> Option<String>>(&self, lookup: F) -> bool {
        self.scheduler == Some(Scheduler::Sge)
            && self.job_id.is_some()
            && lookup("SGE_ROOT").is_some_and(|v| !v.is_empty())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> TaskEnv {
        let scheduler = Scheduler::detect(&lookup);
        let pick = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(k).map(|v| (k.to_string(), v)))
        };

        let (task_index_var, job_id) = match scheduler {
            Some(Scheduler::Slurm) => (
                pick(&["SLURM_ARRAY_TASK_ID"]),
                pick(&["SLURM_JOB_ID"]).map(|(_, v)| v),
            ),
            Some(Scheduler::Sge) | None => (
                pick(&["SGE_TASK_ID"]),
                pick(&["JOB_ID"]).map(|(_, v)| v),
            ),
        };

        TaskEnv {
            scheduler,
            task_index_var,
            job_id,
            scratch_dir: lookup("TMPDIR").filter(|s| !s.is_empty()).map(PathBuf::from),
        }
    }

    /// The 1-based task index. An explicit value wins over the environment.
    ///
    /// Grid engine sets SGE_TASK_ID to "undefined" outside array jobs; that counts as missing
    pub fn task_index(&self, explicit: Option<usize>) -> Result<usize, Error> {
        if let Some(index) = explicit {
            return Ok(index);
        }
        match &self.task_index_var {
            Some((var, value)) => value.trim().parse::<usize>().map_err(|_| {
                Error::task_index_missing(Some(format!("{}={}", var, value)))
            }),
            None => Err(Error::task_index_missing(None::<String>)),
        }
    }
}
