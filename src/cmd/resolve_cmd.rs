use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::run_cmd::DEFAULT_PATH_GENE_LIST;
use crate::command::GeneList;
use crate::command::TaskEnv;

#[derive(Args)]
pub struct ResolveCMD {
    // Gene list, one gene per line
    #[arg(short = 'g', long = "gene-list", env = "GENESWEEP_GENE_LIST", value_parser = clap::value_parser!(PathBuf), default_value = DEFAULT_PATH_GENE_LIST)]
    pub path_gene_list: PathBuf,

    // Task index, 1-based. Defaults to SGE_TASK_ID / SLURM_ARRAY_TASK_ID
    #[arg(short = 't', long = "task-index")]
    pub task_index: Option<usize>,

    // Print the number of genes, i.e. the array size, instead
    #[arg(long = "count")]
    pub count: bool,
}

impl ResolveCMD {
    /// Print the gene of a task. Index 0 and indices past the end print an empty line
    pub fn try_execute(&mut self) -> Result<()> {
        let list = GeneList::from_file(&self.path_gene_list)?;
        if self.count {
            println!("{}", list.len());
            return Ok(());
        }

        let task_index = TaskEnv::from_env().task_index(self.task_index)?;
        if list.get(task_index).is_none() {
            log::warn!("Task index {} is outside the gene list (1..={})", task_index, list.len());
        }
        println!("{}", list.resolve(task_index));
        Ok(())
    }
}
